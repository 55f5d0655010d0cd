use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod presenter;

#[derive(Parser)]
#[command(name = "roomkeeper", version, about = "Escape-room timer and hint desk")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Countdown control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Hint requests and listings
    Hint {
        #[command(subcommand)]
        action: commands::hint::HintAction,
    },
    /// Admin actions that need no open session
    Admin {
        #[command(subcommand)]
        action: commands::admin::AdminAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Interactive game-master console (admin sessions live here)
    Console,
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("ROOMKEEPER_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Hint { action } => commands::hint::run(action),
        Commands::Admin { action } => commands::admin::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Console => commands::console::run(),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "roomkeeper", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
