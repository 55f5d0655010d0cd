//! Interactive game-master console.
//!
//! The admin session is transient, so admin actions that need an open
//! session (add, delete, resets) are only reachable from here. The session
//! ends with the console.

use std::io::{BufRead, Write};

use clap::{Parser, Subcommand};
use roomkeeper_core::{Clock, GameError, GameMaster, KeyValueStore, PresentationPort};

use super::{describe, format_remaining, open_game, CliResult};

#[derive(Parser)]
#[command(
    name = "console",
    no_binary_name = true,
    disable_version_flag = true,
    disable_help_flag = true
)]
struct ConsoleLine {
    #[command(subcommand)]
    command: ConsoleCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum ConsoleCommand {
    /// Start the countdown
    Start,
    /// Show the remaining time
    Time,
    /// Reveal a hint
    Use { code: String },
    /// Enter admin mode (asks for the code when omitted)
    Login { code: Option<String> },
    /// Grant one extra hint use
    Bonus { code: Option<String> },
    /// Add one hint (admin, once per session)
    Add,
    /// Delete a hint (admin, asks for confirmation)
    Remove { code: String },
    /// Set hint uses back to zero (admin)
    ResetUses,
    /// Stop the countdown and restore the default duration (admin)
    ResetTimer,
    /// Leave admin mode
    Logout,
    /// List hint codes and titles
    List,
    /// Show timer and hint quota
    Status,
    /// Leave the console
    #[command(alias = "exit")]
    Quit,
}

enum Flow {
    Continue,
    Quit,
}

pub fn run() -> CliResult {
    let (mut game, _config) = open_game()?;
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();
    session(&mut game, &mut input, &mut output)
}

/// Read commands until `quit` or end of input.
pub fn session<S, C, P, R, W>(
    game: &mut GameMaster<S, C, P>,
    input: &mut R,
    out: &mut W,
) -> CliResult
where
    S: KeyValueStore,
    C: Clock,
    P: PresentationPort,
    R: BufRead,
    W: Write,
{
    writeln!(out, "roomkeeper console; type 'help' for commands")?;
    loop {
        if let Some(event) = game.tick()? {
            writeln!(out, "{}", describe(&event))?;
        }
        let prompt = if game.session().is_active() { "admin> " } else { "gm> " };
        let Some(line) = prompt_line(input, out, prompt)? else {
            break;
        };
        if line.is_empty() {
            continue;
        }
        let command = match ConsoleLine::try_parse_from(line.split_whitespace()) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                write!(out, "{e}")?;
                continue;
            }
        };
        tracing::debug!(?command, "console command");
        match execute(game, command, input, out) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => writeln!(out, "error: {e}")?,
        }
    }
    if game.session().is_active() {
        writeln!(out, "{}", describe(&game.logout()))?;
    }
    Ok(())
}

fn execute<S, C, P, R, W>(
    game: &mut GameMaster<S, C, P>,
    command: ConsoleCommand,
    input: &mut R,
    out: &mut W,
) -> CliResult<Flow>
where
    S: KeyValueStore,
    C: Clock,
    P: PresentationPort,
    R: BufRead,
    W: Write,
{
    match command {
        ConsoleCommand::Start => match game.start_timer()? {
            Some(event) => writeln!(out, "{}", describe(&event))?,
            None => writeln!(out, "Timer already running")?,
        },
        ConsoleCommand::Time => {
            if let Some(event) = game.tick()? {
                writeln!(out, "{}", describe(&event))?;
            }
            writeln!(out, "{}", describe(&game.timer_snapshot()))?;
        }
        ConsoleCommand::Use { code } => {
            let event = game.use_hint(&code)?;
            writeln!(out, "{}", describe(&event))?;
        }
        ConsoleCommand::Login { code } => {
            let secret = secret_or_prompt(code, input, out)?;
            let event = game.login(&secret)?;
            writeln!(out, "{}", describe(&event))?;
        }
        ConsoleCommand::Bonus { code } => {
            let secret = secret_or_prompt(code, input, out)?;
            let event = game.grant_bonus(&secret)?;
            writeln!(out, "{}", describe(&event))?;
        }
        ConsoleCommand::Add => {
            // Refuse before asking for three fields.
            game.session().require_active()?;
            if game.session().add_remaining() == 0 {
                return Err(GameError::AddQuotaExhausted.into());
            }
            let code = prompt_line(input, out, "code: ")?.unwrap_or_default();
            let title = prompt_line(input, out, "title: ")?.unwrap_or_default();
            writeln!(out, "body (end with an empty line):")?;
            let body = read_block(input)?;
            let event = game.add_hint(&code, &title, &body)?;
            writeln!(out, "{}", describe(&event))?;
        }
        ConsoleCommand::Remove { code } => {
            let event = game.remove_hint(&code, |code, record| {
                let question = format!("Delete hint {code} \"{}\"? This cannot be undone [y/N] ", record.title);
                matches!(
                    prompt_line(input, out, &question),
                    Ok(Some(answer)) if answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
                )
            })?;
            writeln!(out, "{}", describe(&event))?;
        }
        ConsoleCommand::ResetUses => {
            let event = game.reset_uses()?;
            writeln!(out, "{}", describe(&event))?;
        }
        ConsoleCommand::ResetTimer => {
            let event = game.reset_timer()?;
            writeln!(out, "{}", describe(&event))?;
        }
        ConsoleCommand::Logout => writeln!(out, "{}", describe(&game.logout()))?,
        ConsoleCommand::List => {
            for (code, record) in game.hints().iter() {
                writeln!(out, "{code:<10} {}", record.title)?;
            }
        }
        ConsoleCommand::Status => {
            let quota = game.quota();
            writeln!(
                out,
                "time {} | hints {}/{} used, {} remaining | admin {}",
                format_remaining(game.remaining_ms()),
                quota.used,
                quota.max_uses,
                quota.remaining,
                if game.session().is_active() {
                    format!("on ({} add left)", game.session().add_remaining())
                } else {
                    "off".to_string()
                }
            )?;
        }
        ConsoleCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn secret_or_prompt<R: BufRead, W: Write>(
    given: Option<String>,
    input: &mut R,
    out: &mut W,
) -> CliResult<String> {
    match given {
        Some(secret) => Ok(secret),
        None => Ok(prompt_line(input, out, "admin code: ")?.unwrap_or_default()),
    }
}

/// Print `prompt` and read one line without its line ending. `None` at end
/// of input.
fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
) -> CliResult<Option<String>> {
    write!(out, "{prompt}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).trim().to_string()))
}

/// Lines up to the first empty one, joined with newlines.
fn read_block<R: BufRead>(input: &mut R) -> CliResult<String> {
    let mut lines = Vec::new();
    loop {
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            break;
        }
        lines.push(line.to_string());
    }
    Ok(lines.join("\n"))
}
