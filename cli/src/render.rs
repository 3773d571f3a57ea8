use std::fmt;

use blockbusters_core::*;

/// Characters per half-column step of the hex layout.
const STEP: usize = 3;

pub fn colour_mark(colour: Colour) -> char {
    match colour {
        Colour::White => 'W',
        Colour::Blue => 'B',
        Colour::Red => 'R',
        Colour::Green => 'G',
        Colour::Gold => 'Y',
    }
}

fn cell_label(obs: &Observation, coords: Coord2) -> String {
    let cell = obs.cell(coords);
    match cell.tile {
        TileKind::Unused => "   ".into(),
        TileKind::Border(_) => "~~~".into(),
        TileKind::Playable if obs.phase == BoardPhase::ScramblingColours => {
            let mark = obs.shimmer[coords.to_nd_index()].map_or(' ', colour_mark);
            format!("{{{mark}}}")
        }
        TileKind::Playable => match (cell.owner, cell.letter) {
            (Owner::Claimed(colour), _) => format!("({})", colour_mark(colour)),
            (Owner::Forfeited, _) => "(-)".into(),
            (Owner::Unset, Some(letter)) if obs.contested == Some(coords) => {
                format!("<{letter}>")
            }
            (Owner::Unset, letter) => format!("[{}]", letter.unwrap_or(' ')),
        },
    }
}

/// Draws the board one map row per line, each row half a hex below the last.
pub fn board(obs: &Observation) -> String {
    let (rows, cols) = obs.size;
    let mut out = String::new();

    for row in 0..rows {
        let mut line = String::new();
        for col in 0..cols {
            let coords = (row, col);
            let x = usize::from(visual_column(coords)) * STEP;
            while line.len() < x {
                line.push(' ');
            }
            line.push_str(&cell_label(obs, coords));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn orientation_text(orientation: Orientation) -> &'static str {
    match orientation {
        Orientation::Horizontal => "left to right",
        Orientation::Vertical => "top to bottom",
    }
}

/// Scores, the posed question and the shown result under the board.
struct Status<'a>(&'a Observation);

impl fmt::Display for Status<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let obs = self.0;
        writeln!(f, "Phase: {:?}", obs.phase)?;

        for (i, player) in obs.players.iter().enumerate() {
            let marker = if i == obs.active_player { '>' } else { ' ' };
            writeln!(
                f,
                "{marker} {} ({}, {}) {} pts, streak {}, rounds {}",
                player.name,
                colour_mark(player.colour),
                orientation_text(player.orientation),
                player.score,
                player.consecutive,
                player.rounds_won,
            )?;
        }

        if obs.bonus_pending {
            writeln!(f, "Bonus pending, misses so far: {}", obs.chances)?;
        }

        if let Some(question) = &obs.question {
            writeln!(
                f,
                "[{}] {} ({:?}): {}",
                question.letter, question.category, question.difficulty, question.question
            )?;
            for (option, text) in OptionLetter::ALL.iter().zip(&question.options) {
                writeln!(f, "  {}) {text}", option.to_char())?;
            }
        }

        if let Some(result) = &obs.result {
            if result.correct {
                writeln!(f, "{} is correct!", result.chosen.to_char())?;
            } else {
                writeln!(
                    f,
                    "{} is wrong, the answer was {}",
                    result.chosen.to_char(),
                    result.answer.to_char()
                )?;
            }
        }

        if obs.phase == BoardPhase::GameOver {
            match obs.winner.and_then(|i| obs.players.get(i)) {
                Some(winner) => writeln!(f, "{} wins the board!", winner.name)?,
                None => writeln!(f, "Board over without a winner")?,
            }
        }
        Ok(())
    }
}

pub fn status(obs: &Observation) -> String {
    Status(obs).to_string()
}

pub fn resolution(resolution: Resolution) -> &'static str {
    match resolution {
        Resolution::Claimed => "Cell claimed",
        Resolution::Won => "Board won",
        Resolution::BonusOffered => "Missed, the cell passes on with a bonus",
        Resolution::Forfeited => "Missed again, the cell is forfeited",
    }
}
