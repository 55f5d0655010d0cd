use clap::Subcommand;

use super::{open_game, print_event, CliResult, Game};

#[derive(Subcommand)]
pub enum HintAction {
    /// Reveal a hint, spending one use unless the code is free
    Use {
        /// Hint code (case-insensitive)
        code: String,
        #[arg(long)]
        json: bool,
    },
    /// List all hint codes and titles
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show used, bonus and remaining hint uses
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Show the hint a link points at, without spending a use
    Open {
        /// Link as printed in link presentation mode
        link: String,
    },
}

pub fn run(action: HintAction) -> CliResult {
    let (mut game, _config) = open_game()?;
    match action {
        HintAction::Use { code, json } => {
            let event = game.use_hint(&code)?;
            print_event(&event, json)?;
        }
        HintAction::List { json } => print_list(&game, json)?,
        HintAction::Status { json } => print_status(&game, json)?,
        HintAction::Open { link } => {
            game.open_link(&link)?;
        }
    }
    Ok(())
}

pub fn print_list(game: &Game, json: bool) -> CliResult {
    if json {
        println!("{}", serde_json::to_string_pretty(game.hints())?);
        return Ok(());
    }
    if game.hints().is_empty() {
        println!("No hints registered");
    }
    for (code, record) in game.hints().iter() {
        println!("{code:<10} {}", record.title);
    }
    Ok(())
}

pub fn print_status(game: &Game, json: bool) -> CliResult {
    let quota = game.quota();
    if json {
        println!("{}", serde_json::to_string_pretty(&quota)?);
    } else {
        println!(
            "Hints used {}/{} ({} remaining, {} bonus)",
            quota.used, quota.max_uses, quota.remaining, quota.bonus
        );
    }
    Ok(())
}
