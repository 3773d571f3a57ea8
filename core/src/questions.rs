use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Parses the tags used by question files: `easy`, `medium`, `hard`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            t if t.eq_ignore_ascii_case("easy") => Some(Self::Easy),
            t if t.eq_ignore_ascii_case("medium") => Some(Self::Medium),
            t if t.eq_ignore_ascii_case("hard") => Some(Self::Hard),
            _ => None,
        }
    }
}

/// One of the four multiple-choice answers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
}

impl OptionLetter {
    pub const ALL: [OptionLetter; 4] = [Self::A, Self::B, Self::C, Self::D];

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn to_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub category: String,
    pub difficulty: Difficulty,
    pub question: String,
    pub options: [String; 4],
    pub answer: OptionLetter,
    /// Board letter the answer starts with.
    pub letter: char,
}

impl QuestionRecord {
    pub fn option(&self, option: OptionLetter) -> &str {
        &self.options[option.index()]
    }

    pub fn is_correct(&self, option: OptionLetter) -> bool {
        self.answer == option
    }

    /// Rejects records with any blank field; a blank record must never reach a player.
    pub fn validate(&self) -> Result<()> {
        if self.category.trim().is_empty() {
            return Err(GameError::IncompleteQuestion("category"));
        }
        if self.question.trim().is_empty() {
            return Err(GameError::IncompleteQuestion("question"));
        }
        for (option, text) in OptionLetter::ALL.iter().zip(&self.options) {
            if text.trim().is_empty() {
                return Err(GameError::IncompleteQuestion(match option {
                    OptionLetter::A => "option A",
                    OptionLetter::B => "option B",
                    OptionLetter::C => "option C",
                    OptionLetter::D => "option D",
                }));
            }
        }
        if !self.letter.is_ascii_alphabetic() {
            return Err(GameError::IncompleteQuestion("letter"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionFilter {
    pub letter: Option<char>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl QuestionFilter {
    pub fn matches(&self, record: &QuestionRecord) -> bool {
        self.letter
            .is_none_or(|letter| record.letter.eq_ignore_ascii_case(&letter))
            && self
                .category
                .as_deref()
                .is_none_or(|category| record.category.eq_ignore_ascii_case(category))
            && self
                .difficulty
                .is_none_or(|difficulty| record.difficulty == difficulty)
    }
}

/// Source of questions for the board.
pub trait QuestionSupplier {
    /// Returns a record matching `filter`, or [`GameError::QuestionNotFound`].
    fn next_question(&mut self, filter: &QuestionFilter) -> Result<QuestionRecord>;
}

/// In-memory question collection indexed by board letter.
#[derive(Clone, Debug)]
pub struct QuestionBank {
    records: Vec<QuestionRecord>,
    by_letter: HashMap<char, Vec<usize>>,
    rng: SmallRng,
}

impl QuestionBank {
    pub fn new(seed: u64) -> Self {
        Self {
            records: Vec::new(),
            by_letter: HashMap::new(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn insert(&mut self, record: QuestionRecord) -> Result<()> {
        record.validate()?;
        let letter = record.letter.to_ascii_uppercase();
        self.by_letter
            .entry(letter)
            .or_default()
            .push(self.records.len());
        self.records.push(record);
        Ok(())
    }

    /// Inserts every complete record, returning how many were rejected.
    pub fn extend(&mut self, records: impl IntoIterator<Item = QuestionRecord>) -> usize {
        let mut rejected = 0;
        for record in records {
            if let Err(err) = self.insert(record) {
                log::warn!("Skipping question: {err}");
                rejected += 1;
            }
        }
        rejected
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self
            .records
            .iter()
            .map(|record| record.category.as_str())
            .collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }

    pub fn has_letter(&self, letter: char) -> bool {
        self.by_letter.contains_key(&letter.to_ascii_uppercase())
    }
}

impl QuestionSupplier for QuestionBank {
    fn next_question(&mut self, filter: &QuestionFilter) -> Result<QuestionRecord> {
        let candidates: Vec<&QuestionRecord> = match filter.letter {
            Some(letter) => self
                .by_letter
                .get(&letter.to_ascii_uppercase())
                .into_iter()
                .flatten()
                .map(|&index| &self.records[index])
                .filter(|record| filter.matches(record))
                .collect(),
            None => self
                .records
                .iter()
                .filter(|record| filter.matches(record))
                .collect(),
        };

        candidates
            .choose(&mut self.rng)
            .map(|&record| record.clone())
            .ok_or(GameError::QuestionNotFound)
    }
}
