use rand::Rng;
use rand::rngs::SmallRng;
use std::time::Duration;

use crate::*;

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Owns the single shared board and decides which requests apply.
///
/// Every call runs to completion. Requests and timer ticks must be fed from one place so they never interleave,
/// which is why nothing in here locks. Rejected requests (round over, opened cell, out of bounds) return an empty
/// diff instead of an error.
pub struct GameEngine<S: Scheduler, R: Rng = SmallRng> {
    config: GameConfig,
    field: Field,
    round: Round,
    scheduler: S,
    rng: R,
    observer: Option<Box<dyn GameObserver + Send>>,
}

impl<S: Scheduler, R: Rng> GameEngine<S, R> {
    /// Validates `config` and generates the first board.
    pub fn new(config: GameConfig, scheduler: S, mut rng: R) -> Result<Self> {
        config.validate()?;
        let board = RandomBoardGenerator::new(&mut rng).generate(&config);
        Ok(Self::from_parts(config, board, scheduler, rng))
    }

    /// Starts the first round on a prepared board, later rounds are generated from `rng`.
    pub fn with_board(config: GameConfig, board: Board, scheduler: S, rng: R) -> Result<Self> {
        config.validate()?;
        if board.size() != config.size || board.mine_count() != config.mines {
            return Err(GameError::BoardMismatch);
        }
        Ok(Self::from_parts(config, board, scheduler, rng))
    }

    fn from_parts(config: GameConfig, board: Board, scheduler: S, rng: R) -> Self {
        log::debug!(
            "Engine created: {}x{} with {} mines",
            config.size.0,
            config.size.1,
            config.mines
        );
        Self {
            config,
            field: Field::new(board),
            round: Round::started(),
            scheduler,
            rng,
            observer: None,
        }
    }

    /// Registers the observer for every event, replacing any previous one.
    pub fn subscribe(&mut self, observer: impl GameObserver + Send + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.round.state()
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn opened_count(&self) -> CellCount {
        self.field.opened_count()
    }

    pub fn flags_count(&self) -> CellCount {
        self.field.flags_count()
    }

    pub fn mines_remaining(&self) -> CellCount {
        self.field.mines_remaining()
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<CellView> {
        self.field.board().cell(coords).map(Cell::view)
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Numeric sanity and bounds check for coordinates coming off the wire.
    pub fn is_valid_coordinate(&self, x: f64, y: f64) -> bool {
        self.coordinate(x, y).is_some()
    }

    /// Converts wire coordinates into board coordinates when they name a cell.
    pub fn coordinate(&self, x: f64, y: f64) -> Option<Coord2> {
        let (width, height) = self.config.size;
        let axis = |value: f64, end: Coord| {
            let in_range = value.is_finite() && value.fract() == 0.0 && value >= 0.0;
            (in_range && value < f64::from(end)).then_some(value as Coord)
        };
        Some((axis(x, width)?, axis(y, height)?))
    }

    /// Opens a cell, returns the cells that changed.
    pub fn open(&mut self, coords: Coord2) -> Vec<CellDiff> {
        if !self.accepts("open", coords) {
            return Vec::new();
        }

        let Reveal { outcome, diff } = self.field.open(coords);
        if !outcome.has_update() {
            log::trace!("Open at {:?} changed nothing", coords);
            return diff;
        }
        let ended = match outcome {
            RevealOutcome::HitMine => Some(Outcome::Lost),
            RevealOutcome::Won => Some(Outcome::Won),
            RevealOutcome::Revealed | RevealOutcome::NoChange => None,
        };
        self.finish_action(diff, ended)
    }

    /// Toggles a flag, returns the single changed cell if any.
    pub fn flag(&mut self, coords: Coord2) -> Vec<CellDiff> {
        if !self.accepts("flag", coords) {
            return Vec::new();
        }

        let (outcome, diff) = self.field.toggle_flag(coords);
        if !outcome.has_update() {
            log::trace!("Flag at {:?} changed nothing", coords);
            return Vec::new();
        }
        let ended = matches!(outcome, MarkOutcome::Won).then_some(Outcome::Won);
        self.finish_action(diff.into_iter().collect(), ended)
    }

    /// Delivers a fired timer. Ticks from timers the engine no longer waits on are dropped.
    pub fn tick(&mut self, timer: TimerId) {
        match self.round.tick(timer) {
            Tick::Ignored => {
                log::trace!("Ignoring stale tick from {:?}", timer);
            }
            Tick::Countdown(seconds_left) => {
                log::debug!("Restarting in {}s", seconds_left);
                self.notify(|observer| observer.on_restart_countdown(seconds_left));
            }
            Tick::Expired => {
                self.scheduler.cancel(timer);
                self.notify(|observer| observer.on_restart_countdown(0));
                self.restart();
            }
        }
    }

    /// Full visible state for a newly connected observer.
    pub fn load_snapshot(&self) -> Snapshot {
        Snapshot::from_field(&self.field, self.round.state())
    }

    fn accepts(&self, action: &str, coords: Coord2) -> bool {
        if let Err(err) = self.field.board().validate_coords(coords) {
            log::debug!("Dropping {} at {:?}: {}", action, coords, err);
            return false;
        }
        if !self.round.is_started() {
            log::debug!("Dropping {} at {:?}: round is over", action, coords);
            return false;
        }
        true
    }

    fn finish_action(&mut self, diff: Vec<CellDiff>, outcome: Option<Outcome>) -> Vec<CellDiff> {
        let ended = outcome.map(|outcome| self.end_round(outcome));
        self.notify(|observer| observer.on_update(&diff, ended));
        if ended.is_some_and(|ended| ended.seconds_left == 0) {
            self.restart();
        }
        diff
    }

    fn end_round(&mut self, outcome: Outcome) -> Ended {
        let timeout = self.config.restart_timeout_secs;
        let ended = self.round.end(outcome, timeout);
        log::debug!("Round ended: {:?}, restarting in {}s", outcome, timeout);
        if timeout > 0 {
            let timer = self.scheduler.start_interval(TICK_PERIOD);
            self.round.arm(timer);
        }
        ended
    }

    /// Replaces board, counters and round state in one go.
    fn restart(&mut self) {
        let board = RandomBoardGenerator::new(&mut self.rng).generate(&self.config);
        self.field = Field::new(board);
        self.round = Round::started();
        log::debug!("New round started");

        let snapshot = self.load_snapshot();
        self.notify(|observer| observer.on_started(&snapshot));
    }

    fn notify(&mut self, event: impl FnOnce(&mut (dyn GameObserver + Send))) {
        if let Some(observer) = self.observer.as_deref_mut() {
            event(observer);
        }
    }
}
