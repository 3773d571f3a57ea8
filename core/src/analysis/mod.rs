pub use observation::*;
pub use span::*;

mod observation;
mod span;
