use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use blockbusters_core::*;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// What to do when the board map file cannot be read.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MapPolicy {
    Retry,
    Ignore,
    Abort,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerSettings {
    pub name: String,
    pub colour: Colour,
    pub orientation: Orientation,
    /// Seats a computer player answering correctly this often.
    #[serde(default)]
    pub cpu_accuracy: Option<f64>,
}

impl PlayerSettings {
    fn new(name: &str, colour: Colour, orientation: Orientation) -> Self {
        Self {
            name: name.to_string(),
            colour,
            orientation,
            cpu_accuracy: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Board map file; the built-in board when unset.
    pub board: Option<PathBuf>,
    pub on_missing_board: MapPolicy,
    pub retry_attempts: u8,
    /// Question collections; the built-in set when empty.
    pub questions: Vec<PathBuf>,
    pub seed: Option<u64>,
    pub players: Vec<PlayerSettings>,
    pub game: GameConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board: None,
            on_missing_board: MapPolicy::Abort,
            retry_attempts: 2,
            questions: Vec::new(),
            seed: None,
            players: vec![
                PlayerSettings::new("1UP", Colour::White, Orientation::Horizontal),
                PlayerSettings::new("2UP", Colour::Blue, Orientation::Vertical),
            ],
            game: GameConfig::default(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Could not read settings {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid settings {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load_policy(&self) -> LoadPolicy {
        match self.on_missing_board {
            MapPolicy::Retry => LoadPolicy::Retry {
                attempts: self.retry_attempts,
            },
            MapPolicy::Ignore => LoadPolicy::Ignore,
            MapPolicy::Abort => LoadPolicy::Abort,
        }
    }

    pub fn load_grid(&self) -> Result<HexGrid> {
        let Some(path) = &self.board else {
            return Ok(HexGrid::standard());
        };
        HexGrid::load_with(self.load_policy(), || fs::read_to_string(path))
            .with_context(|| format!("Could not load board map {}", path.display()))
    }

    /// Turns the second seat into a computer player, adding seats if needed.
    pub fn seat_cpu(&mut self, accuracy: f64) {
        if self.players.is_empty() {
            self.players
                .push(PlayerSettings::new("1UP", Colour::White, Orientation::Horizontal));
        }
        if self.players.len() < 2 {
            self.players
                .push(PlayerSettings::new("CPU", Colour::Blue, Orientation::Vertical));
        }
        if let Some(seat) = self.players.get_mut(1) {
            seat.cpu_accuracy = Some(accuracy);
        }
    }

    pub fn seats(&self, seed: u64) -> Vec<Seat> {
        self.players
            .iter()
            .enumerate()
            .map(|(i, player)| {
                let state = PlayerState::new(&player.name, player.colour, player.orientation);
                match player.cpu_accuracy {
                    Some(accuracy) => {
                        Seat::cpu(state, accuracy, seed.wrapping_add(i as u64 + 1))
                    }
                    None => Seat::human(state),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
board = "assets/board.txt"
on_missing_board = "retry"
retry_attempts = 3
questions = ["assets/questions/general.xml"]
seed = 42

[game]
category = "science"
difficulty = "easy"

[game.rules]
bonus_points = 30

[[players]]
name = "Ann"
colour = "red"
orientation = "horizontal"

[[players]]
name = "Bot"
colour = "green"
orientation = "vertical"
cpu_accuracy = 0.75
"#;

    #[test]
    fn parse_full_settings() {
        let settings = Settings::parse(SAMPLE).unwrap();

        assert_eq!(settings.board, Some(PathBuf::from("assets/board.txt")));
        assert_eq!(settings.load_policy(), LoadPolicy::Retry { attempts: 3 });
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.game.category.as_deref(), Some("science"));
        assert_eq!(settings.game.difficulty, Some(Difficulty::Easy));
        assert_eq!(settings.game.rules.bonus_points, 30);
        assert_eq!(settings.game.rules.single_points, 50);
        assert_eq!(settings.game.excluded_letters, ['X', 'Z']);

        let seats = settings.seats(1);
        assert_eq!(seats.len(), 2);
        assert!(!seats[0].is_cpu());
        assert!(seats[1].is_cpu());
        assert_eq!(seats[1].state().colour, Colour::Green);
    }

    #[test]
    fn empty_settings_use_defaults() {
        let settings = Settings::parse("").unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.load_policy(), LoadPolicy::Abort);
        assert_eq!(settings.players.len(), 2);
        assert_eq!(settings.load_grid().unwrap(), HexGrid::standard());
    }

    #[test]
    fn seat_cpu_replaces_second_player() {
        let mut settings = Settings::default();
        settings.seat_cpu(0.5);
        assert_eq!(settings.players[1].cpu_accuracy, Some(0.5));

        let mut solo = Settings {
            players: vec![PlayerSettings::new("Ann", Colour::Red, Orientation::Horizontal)],
            ..Settings::default()
        };
        solo.seat_cpu(0.9);
        assert_eq!(solo.players.len(), 2);
        assert!(solo.seats(0)[1].is_cpu());
    }

    #[test]
    fn seat_cpu_fills_an_empty_table() {
        let mut settings = Settings::parse("players = []").unwrap();
        settings.seat_cpu(0.5);

        let seats = settings.seats(0);
        assert_eq!(seats.len(), 2);
        assert!(!seats[0].is_cpu());
        assert!(seats[1].is_cpu());
        assert_eq!(settings.players[0].colour, Colour::White);
        assert_eq!(settings.players[1].cpu_accuracy, Some(0.5));
    }

    #[test]
    fn missing_board_follows_policy() {
        let mut settings = Settings {
            board: Some(PathBuf::from("does/not/exist.txt")),
            ..Settings::default()
        };
        assert!(settings.load_grid().is_err());

        settings.on_missing_board = MapPolicy::Ignore;
        assert!(settings.load_grid().unwrap().playable_cells().is_empty());
    }

    #[test]
    fn bundled_board_matches_standard() {
        let grid = HexGrid::parse(include_str!("../../assets/board.txt")).unwrap();

        assert_eq!(grid, HexGrid::standard());
    }

    #[test]
    fn bundled_settings_parse() {
        let settings = Settings::parse(include_str!("../../assets/blockbusters.toml")).unwrap();

        assert_eq!(settings.players.len(), 2);
        assert!(!settings.questions.is_empty());
    }
}
