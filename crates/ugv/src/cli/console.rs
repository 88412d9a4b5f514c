use anyhow::{Context, Result};
use clap::Args;
use std::io::Write as _;
use tokio::io::{AsyncBufReadExt, BufReader};
use ugv::{
    config::Config,
    console::{CommandError, Console, HELP, Reply, describe_outcome},
    frames::IntervalFrames,
    overlay::TerminalNotifier,
};
use ugv_core::motion::Frame;
use ugv_waypoints::FileStore;

#[derive(Args)]
pub struct ConsoleArgs {}

impl ConsoleArgs {
    pub fn run(&self, config: &Config) -> Result<()> {
        run_console(config)
    }
}

/// Multiplex operator input with frame ticks on a single thread.
#[tokio::main(flavor = "current_thread")]
async fn run_console(config: &Config) -> Result<()> {
    let mut console = Console::from_config(
        config,
        FileStore::new(&config.storage.dir),
        TerminalNotifier,
    );
    let mut frames = IntervalFrames::new(config.frames.rate_hz);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}");
    prompt();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read from stdin")? else {
                    break;
                };
                match console.execute_line(&line) {
                    Ok(Reply::Message(message)) => println!("{message}"),
                    Ok(Reply::Quit) => break,
                    Err(CommandError::Empty) => {}
                    Err(err) => println!("error: {err}"),
                }
                prompt();
            }
            _ = frames.tick(), if console.is_driving() => {
                if let Frame::Finished(outcome) = console.tick() {
                    println!("{}", describe_outcome(&outcome, console.vehicle()));
                    prompt();
                }
            }
        }
    }

    Ok(())
}

fn prompt() {
    print!("ugv> ");
    let _ = std::io::stdout().flush();
}
