use clap::Subcommand;

use super::{open_game, print_event, CliResult};

#[derive(Subcommand)]
pub enum AdminAction {
    /// Grant one extra hint use (the admin code is required)
    Bonus {
        /// Shared admin code
        code: String,
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: AdminAction) -> CliResult {
    let (mut game, _config) = open_game()?;
    match action {
        AdminAction::Bonus { code, json } => {
            let event = game.grant_bonus(&code)?;
            print_event(&event, json)?;
        }
    }
    Ok(())
}
