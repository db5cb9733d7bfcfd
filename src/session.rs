//! Top-level game loop owner
//!
//! A `Session` owns the live [`GameState`], the physics capability, the
//! score store and the game-over prompt. Frontends feed it frame times, held
//! input and key presses; it runs fixed ticks and handles restarts.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::highscores::{HighScores, save_score};
use crate::persistence::KeyValueStore;
use crate::platform::{KeyEvent, now_ms};
use crate::sim::{ArcadePhysics, GamePhase, GameState, PhysicsWorld, TickInput, tick};
use crate::tuning::Tuning;
use crate::ui::{NameEntry, NameEntryError};

/// What a key press did to the game-over prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    /// No prompt open, or the key only edited the text
    Pending,
    /// Blank name; the prompt stays open with an error
    Rejected(NameEntryError),
    /// Score stored under `name` and a new run started
    Restarted { name: String, score: u32 },
}

pub struct Session<P: PhysicsWorld = ArcadePhysics> {
    state: GameState,
    tuning: Tuning,
    physics: P,
    store: Box<dyn KeyValueStore>,
    prompt: Option<NameEntry>,
    input: TickInput,
    accumulator: f32,
    clock: fn() -> f64,
    runs: u32,
}

impl Session<ArcadePhysics> {
    /// Session with the built-in arcade physics
    pub fn new(tuning: Tuning, store: Box<dyn KeyValueStore>) -> Self {
        let physics = ArcadePhysics::new(tuning.gravity);
        Self::with_physics(tuning, physics, store)
    }
}

impl<P: PhysicsWorld> Session<P> {
    pub fn with_physics(tuning: Tuning, physics: P, store: Box<dyn KeyValueStore>) -> Self {
        let tuning = tuning.sanitized();
        log::info!("Starting run 1 with seed '{}'", tuning.level_seed);
        Self {
            state: GameState::new(tuning.clone()),
            tuning,
            physics,
            store,
            prompt: None,
            input: TickInput::default(),
            accumulator: 0.0,
            clock: now_ms,
            runs: 1,
        }
    }

    /// Replace the timestamp source
    pub fn with_clock(mut self, clock: fn() -> f64) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access for tools and tests
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn prompt(&self) -> Option<&NameEntry> {
        self.prompt.as_ref()
    }

    /// Number of runs started, including the current one
    pub fn runs(&self) -> u32 {
        self.runs
    }

    /// Held keys for upcoming ticks
    pub fn set_input(&mut self, input: TickInput) {
        self.input = input;
    }

    /// Run exactly one fixed tick with the current input
    pub fn step(&mut self) {
        let was_running = self.state.is_running();
        let input = self.input;
        tick(&mut self.state, &input, &self.physics, SIM_DT);
        if was_running && self.state.phase == GamePhase::GameOver {
            log::debug!("Opening name prompt");
            self.prompt = Some(NameEntry::new());
        }
    }

    /// Consume a frame's worth of time. Returns the number of ticks run.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Feed a key press to the game-over prompt
    pub fn handle_key(&mut self, key: KeyEvent) -> PromptOutcome {
        let Some(prompt) = self.prompt.as_mut() else {
            return PromptOutcome::Pending;
        };
        match prompt.handle_key(key) {
            None => PromptOutcome::Pending,
            Some(Err(e)) => PromptOutcome::Rejected(e),
            Some(Ok(name)) => self.finish_run(name),
        }
    }

    /// Submit the prompt as it stands (the on-screen button)
    pub fn submit(&mut self) -> PromptOutcome {
        let Some(prompt) = self.prompt.as_mut() else {
            return PromptOutcome::Pending;
        };
        match prompt.submit() {
            Err(e) => PromptOutcome::Rejected(e),
            Ok(name) => self.finish_run(name),
        }
    }

    fn finish_run(&mut self, name: String) -> PromptOutcome {
        let score = self.state.final_score.unwrap_or(self.state.score);
        save_score(self.store.as_mut(), &name, score, (self.clock)());
        self.restart();
        PromptOutcome::Restarted { name, score }
    }

    /// Discard the current run and start a new one on the same seeds
    pub fn restart(&mut self) {
        self.runs += 1;
        log::info!(
            "Starting run {} with seed '{}'",
            self.runs,
            self.tuning.level_seed
        );
        self.state = GameState::new(self.tuning.clone());
        self.prompt = None;
        self.input = TickInput::default();
        self.accumulator = 0.0;
    }

    /// Start a new run on a different level seed
    pub fn restart_with_seed(&mut self, seed: &str) {
        self.tuning.level_seed = seed.to_string();
        self.restart();
    }

    /// Current stored leaderboard
    pub fn leaderboard(&self) -> HighScores {
        HighScores::load(self.store.as_ref())
    }
}
