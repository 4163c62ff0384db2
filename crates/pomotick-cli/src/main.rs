use clap::{Parser, Subcommand};
use pomotick_core::Config;
use tracing_subscriber::EnvFilter;

mod backend;
mod commands;
mod common;

#[derive(Parser)]
#[command(name = "pomotick", version, about = "Pomodoro timer for the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Task list
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Completed focus sessions
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Durations, goal, theme and sounds
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_env("POMOTICK_LOG")
        .or_else(|_| EnvFilter::try_new(&config.log.filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default();
    init_logging(&config);

    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action, &config),
        Commands::Task { action } => commands::task::run(action, &config),
        Commands::Stats { action } => commands::stats::run(action, &config),
        Commands::Settings { action } => commands::settings::run(action, &config),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
