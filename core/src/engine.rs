use alloc::vec::Vec;
use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::*;

/// Supplier draws per selection before giving up on incomplete records.
const QUESTION_ATTEMPTS: usize = 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardPhase {
    /// Cells flash random colours before a fresh board.
    ScramblingColours,
    /// Reserved for a letter shuffle animation; nothing happens here.
    ScramblingLetters,
    Standard,
    /// Clears ownership and deals new letters on the next update.
    Resetting,
    GameOver,
}

impl BoardPhase {
    pub const fn accepts_input(self) -> bool {
        matches!(self, Self::Standard)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::GameOver)
    }
}

impl Default for BoardPhase {
    fn default() -> Self {
        Self::ScramblingColours
    }
}

/// Board-wide turn bookkeeping.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub phase: BoardPhase,
    /// Index of the `Engaging` seat.
    pub active: usize,
    /// Misses on the contested cell so far.
    pub chances: u8,
    pub bonus_pending: bool,
    pub contested: Option<Coord2>,
    pub winner: Option<usize>,
}

/// Where the active player is within one question cycle.
#[derive(Clone, Debug, PartialEq)]
pub enum TurnStage {
    Idle,
    QuestionPosed {
        cell: Coord2,
        question: QuestionRecord,
    },
    ResultDisplayed {
        cell: Coord2,
        question: QuestionRecord,
        chosen: OptionLetter,
        correct: bool,
        shown_secs: f64,
    },
}

impl Default for TurnStage {
    fn default() -> Self {
        Self::Idle
    }
}

/// Drives one board: turn order, chances, scoring, and the phase cycle.
#[derive(Clone, Debug)]
pub struct RoundEngine<S> {
    config: GameConfig,
    alphabet: Alphabet,
    grid: HexGrid,
    registry: ClaimRegistry,
    seats: Vec<Seat>,
    supplier: S,
    rng: SmallRng,
    round: RoundState,
    stage: TurnStage,
    last_resolution: Option<Resolution>,
    scramble_secs: f64,
    scramble_step_secs: f64,
    shimmer: Array2<Option<Colour>>,
}

impl<S: QuestionSupplier> RoundEngine<S> {
    pub fn new(
        grid: HexGrid,
        mut seats: Vec<Seat>,
        config: GameConfig,
        supplier: S,
        seed: u64,
    ) -> Result<Self> {
        let Some(first) = seats.first_mut() else {
            return Err(GameError::NoPlayers);
        };
        first.state_mut().turn = TurnState::Engaging;

        for (i, seat) in seats.iter().enumerate() {
            let state = seat.state();
            let conflict = seats[i + 1..].iter().any(|other| {
                other.state().colour == state.colour
                    && other.state().orientation != state.orientation
            });
            if conflict {
                return Err(GameError::ConflictingOrientation);
            }
        }

        let mut engine = Self {
            alphabet: config.alphabet(),
            config,
            shimmer: Array2::from_elem(grid.size().to_nd_index(), None),
            grid,
            registry: ClaimRegistry::new(),
            seats,
            supplier,
            rng: SmallRng::seed_from_u64(seed),
            round: RoundState::default(),
            stage: TurnStage::Idle,
            last_resolution: None,
            scramble_secs: 0.0,
            scramble_step_secs: 0.0,
        };
        engine
            .grid
            .assign_letters(&mut engine.rng, &engine.alphabet, &engine.registry)?;

        log::info!(
            "New game: {} players on {} cells",
            engine.seats.len(),
            engine.grid.playable_cells().len()
        );
        Ok(engine)
    }

    pub fn phase(&self) -> BoardPhase {
        self.round.phase
    }

    pub fn is_finished(&self) -> bool {
        self.round.phase.is_finished()
    }

    pub fn round(&self) -> RoundState {
        self.round
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &HexGrid {
        &self.grid
    }

    pub fn registry(&self) -> &ClaimRegistry {
        &self.registry
    }

    pub fn size(&self) -> Coord2 {
        self.grid.size()
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.grid.cell(coords, &self.registry)
    }

    /// Colour flashed on `coords` while scrambling, if any.
    pub fn shimmer_at(&self, coords: Coord2) -> Option<Colour> {
        self.shimmer.get(coords.to_nd_index()).copied().flatten()
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerState> + '_ {
        self.seats.iter().map(Contestant::state)
    }

    pub fn active_index(&self) -> usize {
        self.round.active
    }

    pub fn active_player(&self) -> &PlayerState {
        self.seats[self.round.active].state()
    }

    pub fn stage(&self) -> &TurnStage {
        &self.stage
    }

    pub fn current_question(&self) -> Option<&QuestionRecord> {
        match &self.stage {
            TurnStage::Idle => None,
            TurnStage::QuestionPosed { question, .. }
            | TurnStage::ResultDisplayed { question, .. } => Some(question),
        }
    }

    pub fn chances(&self) -> u8 {
        self.round.chances
    }

    pub fn bonus_pending(&self) -> bool {
        self.round.bonus_pending
    }

    /// Cell that was missed and is still open for the next player.
    pub fn contested(&self) -> Option<Coord2> {
        self.round.contested
    }

    pub fn winner(&self) -> Option<usize> {
        self.round.winner
    }

    pub fn last_resolution(&self) -> Option<Resolution> {
        self.last_resolution
    }

    pub fn supplier(&self) -> &S {
        &self.supplier
    }

    pub fn supplier_mut(&mut self) -> &mut S {
        &mut self.supplier
    }

    /// Letters the active player may pick right now.
    pub fn selectable_letters(&self) -> Vec<char> {
        if self.round.phase != BoardPhase::Standard || self.stage != TurnStage::Idle {
            return Vec::new();
        }
        match self.round.contested {
            Some(cell) => self.grid.letter(cell).into_iter().collect(),
            None => self.grid.open_letters().collect(),
        }
    }

    /// Puts a question for the cell carrying `letter` to the active player.
    ///
    /// Letters not on the board, or other than the contested cell's while one
    /// is contested, are ignored.
    pub fn select_cell(&mut self, letter: char) -> Result<SelectOutcome> {
        self.check_idle()?;

        let Some(cell) = self.grid.find_letter(letter) else {
            log::debug!("No open cell carries {letter:?}");
            return Ok(SelectOutcome::NoChange);
        };
        if self.round.contested.is_some_and(|contested| contested != cell) {
            log::debug!("{letter:?} ignored while another cell is contested");
            return Ok(SelectOutcome::NoChange);
        }

        let board_letter = self.grid.letter(cell).unwrap_or(letter);
        let question = self.fetch_question(board_letter)?;
        log::debug!(
            "{} selected {board_letter:?}: {}",
            self.active_player().name,
            question.question
        );
        self.stage = TurnStage::QuestionPosed { cell, question };
        Ok(SelectOutcome::QuestionPosed)
    }

    /// Answers the posed question; the result is shown before it takes effect.
    pub fn choose_option(&mut self, option: OptionLetter) -> Result<AnswerOutcome> {
        if self.round.phase.is_finished() {
            return Err(GameError::AlreadyEnded);
        }

        let (cell, question) = match core::mem::take(&mut self.stage) {
            TurnStage::QuestionPosed { cell, question } => (cell, question),
            other => {
                self.stage = other;
                return Err(GameError::NoQuestionPosed);
            }
        };

        let correct = question.is_correct(option);
        log::info!(
            "{} answered {} ({})",
            self.active_player().name,
            option.to_char(),
            if correct { "correct" } else { "incorrect" }
        );
        self.stage = TurnStage::ResultDisplayed {
            cell,
            question,
            chosen: option,
            correct,
            shown_secs: 0.0,
        };

        Ok(if correct {
            AnswerOutcome::Correct
        } else {
            AnswerOutcome::Incorrect
        })
    }

    /// Advances timers by `elapsed` seconds and lets computer seats act.
    pub fn update(&mut self, elapsed: f64) -> UpdateOutcome {
        let elapsed = if elapsed.is_finite() && elapsed > 0.0 {
            elapsed
        } else {
            0.0
        };

        match self.round.phase {
            BoardPhase::ScramblingColours => self.scramble_colours(elapsed),
            BoardPhase::ScramblingLetters | BoardPhase::GameOver => UpdateOutcome::NoChange,
            BoardPhase::Resetting => self.deal_board(),
            BoardPhase::Standard => match self.stage {
                TurnStage::Idle => self.poll_cell_pick(),
                TurnStage::QuestionPosed { .. } => self.poll_answer(),
                TurnStage::ResultDisplayed { .. } => self.advance_result(elapsed),
            },
        }
    }

    /// Starts a fresh board. Scores carry over.
    pub fn reset(&mut self) {
        log::info!("Resetting board");
        self.stage = TurnStage::Idle;
        self.round.chances = 0;
        self.round.bonus_pending = false;
        self.round.contested = None;
        self.round.winner = None;
        self.last_resolution = None;
        self.scramble_secs = 0.0;
        self.scramble_step_secs = 0.0;
        self.round.phase = BoardPhase::ScramblingColours;
    }

    /// Starts a fresh board with every score back at zero.
    pub fn restart(&mut self) {
        for seat in &mut self.seats {
            seat.state_mut().clear_progress();
        }
        self.reset();
    }

    fn check_idle(&self) -> Result<()> {
        match (self.round.phase, &self.stage) {
            (BoardPhase::GameOver, _) => Err(GameError::AlreadyEnded),
            (BoardPhase::Standard, TurnStage::Idle) => Ok(()),
            (BoardPhase::Standard, _) => Err(GameError::QuestionPending),
            (phase, _) => Err(GameError::NotAccepting(phase)),
        }
    }

    fn fetch_question(&mut self, letter: char) -> Result<QuestionRecord> {
        let filter = self.config.question_filter(letter);
        for _ in 0..QUESTION_ATTEMPTS {
            let question = self.supplier.next_question(&filter)?;
            match question.validate() {
                Ok(()) => return Ok(question),
                Err(err) => log::warn!("Rejected question for {letter:?}: {err}"),
            }
        }
        Err(GameError::QuestionNotFound)
    }

    fn scramble_colours(&mut self, elapsed: f64) -> UpdateOutcome {
        let rules = self.config.rules;
        self.scramble_secs += elapsed;
        self.scramble_step_secs += elapsed;

        if self.scramble_secs >= rules.scramble_secs {
            self.shimmer.fill(None);
            self.round.phase = BoardPhase::Resetting;
            return UpdateOutcome::PhaseChanged(self.round.phase);
        }
        if self.scramble_step_secs < rules.scramble_step_secs {
            return UpdateOutcome::NoChange;
        }
        self.scramble_step_secs = 0.0;

        let mut palette: Vec<Option<Colour>> = Vec::from([None]);
        for colour in self.players().map(|player| Some(player.colour)) {
            if !palette.contains(&colour) {
                palette.push(colour);
            }
        }
        for &coords in self.grid.playable_cells() {
            self.shimmer[coords.to_nd_index()] = palette.choose(&mut self.rng).copied().flatten();
        }
        UpdateOutcome::Scrambled
    }

    fn deal_board(&mut self) -> UpdateOutcome {
        self.registry.clear();
        if let Err(err) = self
            .grid
            .assign_letters(&mut self.rng, &self.alphabet, &self.registry)
        {
            log::error!("Could not deal letters: {err}");
            self.round.phase = BoardPhase::GameOver;
            return UpdateOutcome::PhaseChanged(self.round.phase);
        }
        if self.grid.open_letters().next().is_none() {
            log::warn!("Board has no playable cells, ending without a winner");
            self.round.phase = BoardPhase::GameOver;
            return UpdateOutcome::PhaseChanged(self.round.phase);
        }
        self.round.phase = BoardPhase::Standard;
        log::info!(
            "Board ready, {} to play",
            self.active_player().name
        );
        UpdateOutcome::PhaseChanged(self.round.phase)
    }

    fn poll_cell_pick(&mut self) -> UpdateOutcome {
        let open = self.selectable_letters();
        let Some(letter) = self.seats[self.round.active].picks_cell(&open) else {
            return UpdateOutcome::NoChange;
        };

        match self.select_cell(letter) {
            Ok(SelectOutcome::QuestionPosed) => UpdateOutcome::QuestionPosed,
            Ok(SelectOutcome::NoChange) => UpdateOutcome::NoChange,
            Err(err) => {
                log::warn!(
                    "{} could not select {letter:?}: {err}",
                    self.active_player().name
                );
                UpdateOutcome::NoChange
            }
        }
    }

    fn poll_answer(&mut self) -> UpdateOutcome {
        let TurnStage::QuestionPosed { question, .. } = &self.stage else {
            return UpdateOutcome::NoChange;
        };
        let Some(option) = self.seats[self.round.active].submits_answer(question) else {
            return UpdateOutcome::NoChange;
        };

        self.choose_option(option)
            .map_or(UpdateOutcome::NoChange, UpdateOutcome::Answered)
    }

    fn advance_result(&mut self, elapsed: f64) -> UpdateOutcome {
        let display_secs = self.config.rules.result_display_secs;
        let TurnStage::ResultDisplayed {
            cell,
            correct,
            shown_secs,
            ..
        } = &mut self.stage
        else {
            return UpdateOutcome::NoChange;
        };

        *shown_secs += elapsed;
        if *shown_secs < display_secs {
            return UpdateOutcome::NoChange;
        }
        let (cell, correct) = (*cell, *correct);
        self.stage = TurnStage::Idle;

        let resolution = if correct {
            self.claim(cell)
        } else {
            self.miss(cell)
        };
        self.last_resolution = Some(resolution);

        if !self.round.phase.is_finished() && self.grid.open_letters().next().is_none() {
            log::info!("No open cells left, the board ends without a winner");
            self.round.phase = BoardPhase::GameOver;
        }
        UpdateOutcome::Resolved(resolution)
    }

    fn claim(&mut self, cell: Coord2) -> Resolution {
        let (colour, orientation) = {
            let player = self.active_player();
            (player.colour, player.orientation)
        };
        if let Err(err) = self.registry.claim(cell, colour) {
            log::error!("Claim of {cell:?} failed: {err}");
        }
        self.grid.clear_letter(cell);

        let won = has_won(&self.grid, &self.registry, cell, colour, orientation);
        let win_type = if won { WinType::Round } else { WinType::Single };
        let points = self.config.rules.points(win_type, self.round.bonus_pending);

        let player = self.seats[self.round.active].state_mut();
        player.award(points, win_type);
        log::info!(
            "{} claimed {cell:?} for {points} points (total {})",
            player.name,
            player.score
        );

        self.round.chances = 0;
        self.round.bonus_pending = false;
        self.round.contested = None;

        if won {
            log::info!("{} wins the board", self.active_player().name);
            self.round.winner = Some(self.round.active);
            self.round.phase = BoardPhase::GameOver;
            Resolution::Won
        } else {
            Resolution::Claimed
        }
    }

    fn miss(&mut self, cell: Coord2) -> Resolution {
        self.seats[self.round.active].state_mut().miss();
        self.round.chances = self.round.chances.saturating_add(1);
        self.pass_turn();

        if self.round.chances >= self.config.rules.chances() {
            if let Err(err) = self.registry.forfeit(cell) {
                log::error!("Forfeit of {cell:?} failed: {err}");
            }
            self.grid.clear_letter(cell);
            self.round.chances = 0;
            self.round.bonus_pending = false;
            self.round.contested = None;
            log::info!("{cell:?} forfeited");
            Resolution::Forfeited
        } else {
            self.round.bonus_pending = true;
            self.round.contested = Some(cell);
            log::debug!("{cell:?} open to {} with a bonus", self.active_player().name);
            Resolution::BonusOffered
        }
    }

    fn pass_turn(&mut self) {
        self.seats[self.round.active].state_mut().turn = TurnState::Waiting;
        self.round.active = (self.round.active + 1) % self.seats.len();
        self.seats[self.round.active].state_mut().turn = TurnState::Engaging;
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::questions::tests::record;

    #[derive(Debug, Default)]
    struct FixedSupplier {
        served: usize,
        incomplete: usize,
    }

    impl QuestionSupplier for FixedSupplier {
        fn next_question(&mut self, filter: &QuestionFilter) -> Result<QuestionRecord> {
            self.served += 1;
            let mut question = record(filter.letter.unwrap_or('A'), "general", Difficulty::Easy);
            if self.served <= self.incomplete {
                question.question.clear();
            }
            Ok(question)
        }
    }

    fn seats() -> Vec<Seat> {
        vec![
            Seat::human(PlayerState::new("1UP", Colour::White, Orientation::Horizontal)),
            Seat::human(PlayerState::new("2UP", Colour::Blue, Orientation::Vertical)),
        ]
    }

    fn settle<S: QuestionSupplier>(engine: &mut RoundEngine<S>) {
        for _ in 0..100 {
            if engine.phase() == BoardPhase::Standard {
                return;
            }
            engine.update(0.25);
        }
        panic!("board never became ready");
    }

    fn engine() -> RoundEngine<FixedSupplier> {
        let mut engine = RoundEngine::new(
            HexGrid::standard(),
            seats(),
            GameConfig::default(),
            FixedSupplier::default(),
            42,
        )
        .unwrap();
        settle(&mut engine);
        engine
    }

    fn letter_at<S: QuestionSupplier>(engine: &RoundEngine<S>, cell: Coord2) -> char {
        engine.grid().letter(cell).unwrap()
    }

    /// Selects `cell`, answers with `option`, and waits out the result.
    fn play(
        engine: &mut RoundEngine<FixedSupplier>,
        cell: Coord2,
        option: OptionLetter,
    ) -> UpdateOutcome {
        let letter = letter_at(engine, cell);
        assert_eq!(engine.select_cell(letter), Ok(SelectOutcome::QuestionPosed));
        engine.choose_option(option).unwrap();
        engine.update(1.5)
    }

    #[test]
    fn correct_answer_claims_for_fifty_points() {
        let mut engine = engine();

        let outcome = play(&mut engine, (4, 1), OptionLetter::B);

        assert_eq!(outcome, UpdateOutcome::Resolved(Resolution::Claimed));
        assert_eq!(engine.cell_at((4, 1)).owner, Owner::Claimed(Colour::White));
        assert_eq!(engine.cell_at((4, 1)).letter, None);
        assert_eq!(engine.active_player().score, 50);
        assert_eq!(engine.active_player().consecutive, 1);
        assert_eq!(engine.active_index(), 0);
        assert_eq!(engine.chances(), 0);
    }

    #[test]
    fn two_misses_forfeit_the_cell() {
        let mut engine = engine();
        let letter = letter_at(&engine, (4, 1));

        let first = play(&mut engine, (4, 1), OptionLetter::A);
        assert_eq!(first, UpdateOutcome::Resolved(Resolution::BonusOffered));
        assert_eq!(engine.active_index(), 1);
        assert_eq!(engine.chances(), 1);
        assert!(engine.bonus_pending());
        assert_eq!(engine.contested(), Some((4, 1)));

        let second = play(&mut engine, (4, 1), OptionLetter::C);
        assert_eq!(second, UpdateOutcome::Resolved(Resolution::Forfeited));
        assert_eq!(engine.active_index(), 0);
        assert_eq!(engine.chances(), 0);
        assert!(!engine.bonus_pending());
        assert_eq!(engine.contested(), None);
        assert_eq!(engine.cell_at((4, 1)).owner, Owner::Forfeited);
        assert_eq!(engine.select_cell(letter), Ok(SelectOutcome::NoChange));
        assert!(engine.players().all(|player| player.score == 0));
        assert_eq!(engine.players().filter(|player| player.is_engaging()).count(), 1);
    }

    #[test]
    fn bonus_is_paid_once() {
        let mut engine = engine();

        play(&mut engine, (4, 1), OptionLetter::A);
        play(&mut engine, (4, 1), OptionLetter::B);
        assert_eq!(engine.active_player().name, "2UP");
        assert_eq!(engine.active_player().score, 75);
        assert!(!engine.bonus_pending());

        play(&mut engine, (6, 1), OptionLetter::B);
        assert_eq!(engine.active_player().score, 125);
    }

    #[test]
    fn contested_cell_locks_other_letters() {
        let mut engine = engine();
        play(&mut engine, (4, 1), OptionLetter::A);
        let other = letter_at(&engine, (6, 1));

        assert_eq!(engine.select_cell(other), Ok(SelectOutcome::NoChange));
        assert_eq!(engine.stage(), &TurnStage::Idle);
        assert_eq!(engine.selectable_letters(), vec![letter_at(&engine, (4, 1))]);
    }

    #[test]
    fn spanning_claim_wins_the_board() {
        let mut engine = engine();
        for cell in [(2, 0), (3, 1), (2, 1), (3, 2)] {
            assert_eq!(
                play(&mut engine, cell, OptionLetter::B),
                UpdateOutcome::Resolved(Resolution::Claimed)
            );
        }
        assert_eq!(engine.active_player().score, 200);

        let outcome = play(&mut engine, (2, 2), OptionLetter::B);

        assert_eq!(outcome, UpdateOutcome::Resolved(Resolution::Won));
        assert_eq!(engine.phase(), BoardPhase::GameOver);
        assert_eq!(engine.winner(), Some(0));
        let winner = engine.active_player();
        assert_eq!(winner.score, 700);
        assert_eq!(winner.rounds_won, 1);
        assert_eq!(winner.win_type, WinType::Round);
        assert_eq!(engine.select_cell('A'), Err(GameError::AlreadyEnded));
        assert_eq!(engine.update(1.0), UpdateOutcome::NoChange);
    }

    #[test]
    fn vertical_player_wins_top_to_bottom() {
        let mut engine = engine();
        play(&mut engine, (3, 1), OptionLetter::D);
        play(&mut engine, (3, 1), OptionLetter::B);
        play(&mut engine, (5, 1), OptionLetter::B);
        play(&mut engine, (7, 1), OptionLetter::B);

        let outcome = play(&mut engine, (9, 1), OptionLetter::B);

        assert_eq!(outcome, UpdateOutcome::Resolved(Resolution::Won));
        assert_eq!(engine.winner(), Some(1));
        assert_eq!(engine.active_player().score, 675);
    }

    #[test]
    fn input_is_rejected_outside_an_idle_turn() {
        let mut engine = RoundEngine::new(
            HexGrid::standard(),
            seats(),
            GameConfig::default(),
            FixedSupplier::default(),
            1,
        )
        .unwrap();

        assert_eq!(
            engine.select_cell('A'),
            Err(GameError::NotAccepting(BoardPhase::ScramblingColours))
        );

        settle(&mut engine);
        assert_eq!(
            engine.choose_option(OptionLetter::A),
            Err(GameError::NoQuestionPosed)
        );

        let letter = letter_at(&engine, (2, 0));
        engine.select_cell(letter).unwrap();
        assert_eq!(engine.select_cell(letter), Err(GameError::QuestionPending));
        engine.choose_option(OptionLetter::A).unwrap();
        assert_eq!(
            engine.choose_option(OptionLetter::B),
            Err(GameError::NoQuestionPosed)
        );
        assert_eq!(engine.select_cell(letter), Err(GameError::QuestionPending));
    }

    #[test]
    fn letters_not_on_the_board_are_ignored() {
        let mut engine = engine();

        assert_eq!(engine.select_cell('X'), Ok(SelectOutcome::NoChange));
        assert_eq!(engine.select_cell('7'), Ok(SelectOutcome::NoChange));
        assert_eq!(engine.supplier().served, 0);
    }

    #[test]
    fn lowercase_selection_matches() {
        let mut engine = engine();
        let letter = letter_at(&engine, (5, 2));

        let outcome = engine.select_cell(letter.to_ascii_lowercase()).unwrap();

        assert!(outcome.has_update());
        assert_eq!(engine.current_question().unwrap().letter, letter);
    }

    #[test]
    fn incomplete_records_are_skipped() {
        let mut engine = engine();
        engine.supplier_mut().incomplete = 1;
        let letter = letter_at(&engine, (2, 0));

        engine.select_cell(letter).unwrap();

        assert_eq!(engine.supplier().served, 2);
        assert!(!engine.current_question().unwrap().question.is_empty());
    }

    #[test]
    fn only_incomplete_records_is_not_found() {
        let mut engine = engine();
        engine.supplier_mut().incomplete = usize::MAX;
        let letter = letter_at(&engine, (2, 0));

        assert_eq!(engine.select_cell(letter), Err(GameError::QuestionNotFound));
        assert_eq!(engine.stage(), &TurnStage::Idle);
    }

    #[test]
    fn result_waits_for_display_time() {
        let mut engine = engine();
        let letter = letter_at(&engine, (2, 0));
        engine.select_cell(letter).unwrap();

        assert_eq!(
            engine.choose_option(OptionLetter::B),
            Ok(AnswerOutcome::Correct)
        );
        assert_eq!(engine.update(1.0), UpdateOutcome::NoChange);
        assert!(engine.registry().is_unset((2, 0)));
        assert_eq!(
            engine.update(0.5),
            UpdateOutcome::Resolved(Resolution::Claimed)
        );
        assert_eq!(engine.last_resolution(), Some(Resolution::Claimed));
    }

    #[test]
    fn reset_abandons_the_question_and_keeps_scores() {
        let mut engine = engine();
        play(&mut engine, (2, 0), OptionLetter::B);
        let letter = letter_at(&engine, (4, 0));
        engine.select_cell(letter).unwrap();

        engine.reset();

        assert_eq!(engine.phase(), BoardPhase::ScramblingColours);
        assert_eq!(engine.current_question(), None);
        settle(&mut engine);
        assert_eq!(engine.registry().claimed_count(), 0);
        assert_eq!(engine.grid().open_letters().count(), 20);
        assert_eq!(engine.active_player().score, 50);
    }

    #[test]
    fn restart_clears_scores() {
        let mut engine = engine();
        play(&mut engine, (2, 0), OptionLetter::B);

        engine.restart();
        settle(&mut engine);

        assert!(engine.players().all(|player| player.score == 0));
        assert!(engine.players().all(|player| player.rounds_won == 0));
    }

    #[test]
    fn scramble_flashes_player_colours() {
        let mut engine = RoundEngine::new(
            HexGrid::standard(),
            seats(),
            GameConfig::default(),
            FixedSupplier::default(),
            3,
        )
        .unwrap();

        assert_eq!(engine.update(0.1), UpdateOutcome::NoChange);
        assert_eq!(engine.update(0.2), UpdateOutcome::Scrambled);
        let flashed: Vec<Colour> = engine
            .grid()
            .playable_cells()
            .iter()
            .filter_map(|&coords| engine.shimmer_at(coords))
            .collect();
        assert!(!flashed.is_empty());
        assert!(flashed.iter().all(|&c| c == Colour::White || c == Colour::Blue));

        assert_eq!(
            engine.update(2.0),
            UpdateOutcome::PhaseChanged(BoardPhase::Resetting)
        );
        assert_eq!(engine.shimmer_at((2, 0)), None);
        assert_eq!(
            engine.update(0.0),
            UpdateOutcome::PhaseChanged(BoardPhase::Standard)
        );
    }

    #[test]
    fn computer_players_finish_a_board() {
        let seats = vec![
            Seat::cpu(
                PlayerState::new("CPU 1", Colour::White, Orientation::Horizontal),
                1.0,
                7,
            ),
            Seat::cpu(
                PlayerState::new("CPU 2", Colour::Blue, Orientation::Vertical),
                1.0,
                8,
            ),
        ];
        let mut engine = RoundEngine::new(
            HexGrid::standard(),
            seats,
            GameConfig::default(),
            FixedSupplier::default(),
            9,
        )
        .unwrap();
        settle(&mut engine);

        for _ in 0..10_000 {
            if engine.is_finished() {
                break;
            }
            engine.update(0.5);
        }

        assert_eq!(engine.winner(), Some(0));
        assert!(engine.active_player().score >= 500);
    }

    #[test]
    fn board_without_open_cells_ends_without_winner() {
        let grid = HexGrid::parse("1 0 1").unwrap();
        let seats = vec![Seat::human(PlayerState::new(
            "solo",
            Colour::Gold,
            Orientation::Horizontal,
        ))];
        let mut engine =
            RoundEngine::new(grid, seats, GameConfig::default(), FixedSupplier::default(), 0)
                .unwrap();
        settle(&mut engine);

        for cell in [(0, 0), (0, 2)] {
            play(&mut engine, cell, OptionLetter::A);
            assert_eq!(
                play(&mut engine, cell, OptionLetter::A),
                UpdateOutcome::Resolved(Resolution::Forfeited)
            );
        }

        assert_eq!(engine.phase(), BoardPhase::GameOver);
        assert_eq!(engine.winner(), None);
    }

    #[test]
    fn empty_board_ends_once_dealt() {
        let mut engine = RoundEngine::new(
            HexGrid::empty(),
            seats(),
            GameConfig::default(),
            FixedSupplier::default(),
            0,
        )
        .unwrap();

        let mut phases = Vec::new();
        for _ in 0..100 {
            if let UpdateOutcome::PhaseChanged(phase) = engine.update(0.5) {
                phases.push(phase);
            }
        }

        assert_eq!(phases.last(), Some(&BoardPhase::GameOver));
        assert!(!phases.contains(&BoardPhase::Standard));
        assert!(engine.is_finished());
        assert_eq!(engine.winner(), None);
        assert!(engine.selectable_letters().is_empty());

        engine.reset();
        for _ in 0..100 {
            engine.update(0.5);
        }
        assert_eq!(engine.phase(), BoardPhase::GameOver);
    }

    #[test]
    fn new_validates_seats() {
        let none = RoundEngine::new(
            HexGrid::standard(),
            Vec::new(),
            GameConfig::default(),
            FixedSupplier::default(),
            0,
        );
        assert_eq!(none.err(), Some(GameError::NoPlayers));

        let clash = vec![
            Seat::human(PlayerState::new("a", Colour::Red, Orientation::Horizontal)),
            Seat::human(PlayerState::new("b", Colour::Red, Orientation::Vertical)),
        ];
        let clash = RoundEngine::new(
            HexGrid::standard(),
            clash,
            GameConfig::default(),
            FixedSupplier::default(),
            0,
        );
        assert_eq!(clash.err(), Some(GameError::ConflictingOrientation));
    }

    #[test]
    fn too_small_alphabet_is_rejected() {
        let config = GameConfig {
            excluded_letters: ('A'..='M').collect(),
            ..GameConfig::default()
        };

        let result = RoundEngine::new(
            HexGrid::standard(),
            seats(),
            config,
            FixedSupplier::default(),
            0,
        );

        assert_eq!(
            result.err(),
            Some(GameError::AlphabetExhausted {
                needed: 20,
                available: 13
            })
        );
    }
}
