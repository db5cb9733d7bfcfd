//! Penguin Climb headless runner
//!
//! Plays one run with a simple autopilot, enters a name at the game-over
//! prompt and stores the score in a file-backed leaderboard.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use clap::Parser;
    use penguin_climb::persistence::FileStore;
    use penguin_climb::platform::KeyEvent;
    use penguin_climb::sim::{GameState, TickInput};
    use penguin_climb::{PromptOutcome, Session, Tuning};

    /// Play one autopiloted run and record it on the leaderboard
    #[derive(Debug, Parser)]
    #[command(author, version, about, long_about = None)]
    struct Options {
        /// Tuning JSON file (missing keys keep their defaults)
        #[arg(long, value_name = "FILE")]
        tuning: Option<PathBuf>,
        /// Directory holding the leaderboard
        #[arg(long = "data", value_name = "DIR", default_value = "penguin-climb-data")]
        data_dir: PathBuf,
        /// Name entered at the game-over prompt
        #[arg(long, value_name = "NAME", default_value = "autopilot")]
        name: String,
        /// Stop after this many ticks if the run has not ended
        #[arg(long = "ticks", value_name = "COUNT", default_value_t = 60 * 60 * 5)]
        max_ticks: u64,
        /// Level seed overriding the tuning file
        #[arg(long, value_name = "SEED")]
        seed: Option<String>,
    }

    /// Steer under the nearest platform above and hop when lined up
    fn autopilot(state: &GameState) -> TickInput {
        let player = &state.player;
        let feet = player.aabb().bottom();
        let target = state
            .column()
            .into_iter()
            .filter(|p| p.aabb().top() < feet - 5.0)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));
        let Some(target) = target else {
            return TickInput::default();
        };

        let dx = target.pos.x - player.pos.x;
        TickInput {
            left: dx < -4.0,
            right: dx > 4.0,
            jump: dx.abs() < target.width() / 2.0 + 70.0,
        }
    }

    pub fn run() {
        let opts = Options::parse();
        env_logger::init();

        let mut tuning = match &opts.tuning {
            Some(path) => Tuning::load(path),
            None => Tuning::default(),
        };
        if let Some(seed) = &opts.seed {
            tuning.level_seed = seed.clone();
        }

        let store = FileStore::new(&opts.data_dir);
        let mut session = Session::new(tuning, Box::new(store));
        log::info!(
            "Headless run: up to {} ticks, scores in {}",
            opts.max_ticks,
            opts.data_dir.display()
        );

        while session.state().is_running() && session.state().time_ticks < opts.max_ticks {
            let input = autopilot(session.state());
            session.set_input(input);
            session.step();
        }

        let state = session.state();
        let score = state.final_score.unwrap_or(state.score);
        println!(
            "{} after {} ticks: score {} (max {})",
            if state.is_running() { "Stopped" } else { "Game over" },
            state.time_ticks,
            score,
            state.tuning.max_score()
        );

        if session.prompt().is_none() {
            log::info!("Run did not end; score not recorded");
            return;
        }
        for c in opts.name.chars() {
            session.handle_key(KeyEvent::Char(c));
        }
        match session.handle_key(KeyEvent::Enter) {
            PromptOutcome::Restarted { name, score } => println!("Recorded {score} for {name}"),
            PromptOutcome::Rejected(e) => println!("Not recorded: {e}"),
            PromptOutcome::Pending => {}
        }

        println!("Leaderboard:");
        for (rank, name, score) in session.leaderboard().top(10) {
            println!("{rank:>3}. {name:<15} {score}");
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser build is driven through the library
}
