use std::io::Write;
use std::time::Duration;

use clap::Subcommand;
use roomkeeper_core::{Event, Ticker};

use super::{describe, format_remaining, open_game, print_event, CliResult, Game};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start the countdown (no-op if it is already running)
    Start {
        #[arg(long)]
        json: bool,
    },
    /// Print the remaining time
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Show a live countdown until time runs out
    Watch,
}

pub fn run(action: TimerAction) -> CliResult {
    let (mut game, config) = open_game()?;
    // Surface an expiry that happened while nobody was watching.
    if let Some(event) = game.tick()? {
        println!("{}", describe(&event));
    }

    match action {
        TimerAction::Start { json } => match game.start_timer()? {
            Some(event) => print_event(&event, json)?,
            None => {
                if !json {
                    println!("Timer already running");
                }
                print_event(&game.timer_snapshot(), json)?;
            }
        },
        TimerAction::Status { json } => print_event(&game.timer_snapshot(), json)?,
        TimerAction::Watch => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            runtime.block_on(watch(&mut game, config.tick_interval()))?;
        }
    }
    Ok(())
}

/// Redraw the countdown on every tick. The ticker is cancelled as soon as
/// the timer stops running.
pub async fn watch(game: &mut Game, period: Duration) -> CliResult {
    if !game.timer().is_running() {
        println!("{}", describe(&game.timer_snapshot()));
        return Ok(());
    }

    let mut ticker = Ticker::every(period);
    ticker.start();
    let mut stdout = std::io::stdout();
    while ticker.next().await.is_some() {
        let expired = game.tick()?;
        write!(stdout, "\r{}  ", format_remaining(game.remaining_ms()))?;
        stdout.flush()?;
        if let Some(event @ Event::TimerExpired { .. }) = expired {
            writeln!(stdout)?;
            writeln!(stdout, "{}", describe(&event))?;
        }
        if !game.timer().is_running() {
            ticker.cancel();
            break;
        }
    }
    Ok(())
}
