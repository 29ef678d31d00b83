use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use speedmath::bridge::Console;
use speedmath::machine::SessionStateMachine;
use speedmath::poll::PollLoop;
use speedmath::sound::{Mute, SimpleBeep, ToneIndicator};
use speedmath::storage::FileCounter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Timed mental arithmetic, played on a simulated keypad and LCD")]
struct Opts {
    /// file standing in for the EEPROM holding the total score
    #[arg(long, default_value = "speedmath.eeprom", value_name = "PATH")]
    score_file: PathBuf,

    /// poll period in milliseconds
    #[arg(long, default_value_t = 10, value_name = "MS")]
    tick_ms: u64,

    /// seed for the problem generator; random if not given
    #[arg(long)]
    seed: Option<u64>,

    /// don't drive the PC speaker
    #[arg(long)]
    mute: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let opts = Opts::parse();

    let rng = match opts.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let sound: Box<dyn ToneIndicator> = if opts.mute {
        Box::new(Mute::new())
    } else {
        Box::new(SimpleBeep::new())
    };

    let mut machine = SessionStateMachine::new(FileCounter::new(&opts.score_file), rng);
    log::info!(
        "score file {}, total so far {}",
        opts.score_file.display(),
        machine.cumulative_score()
    );

    let mut console = Console::new(sound)?;
    let poll = PollLoop::new(Duration::from_millis(opts.tick_ms));
    let steps = poll.run(&mut machine, &mut console, None)?;
    drop(console);

    // shove some junk on stdout to stop the cli messing up the last frame
    for _ in 0..8 {
        println!();
    }
    log::info!("quit after {} polls", steps);
    Ok(())
}
