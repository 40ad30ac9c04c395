//! roadquiz CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "roadquiz", version, about = "Timed driving-theory quiz")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the profile store (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a quiz
    Run {
        /// Path to a .toml question bank
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Countdown in seconds (overrides bank and config)
        #[arg(long)]
        time_limit: Option<u64>,

        /// Finish as soon as the last question is answered
        #[arg(long)]
        auto_finish: bool,

        /// Output directory for result reports
        #[arg(long)]
        output: Option<PathBuf>,

        /// Report format: json, html, all, none
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Validate question bank TOML files
    Validate {
        /// Path to a bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// Show a saved result report
    Review {
        /// Report JSON written by `run`
        report: PathBuf,

        /// Also write the result page as HTML
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Create an account and log in
    Register {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: Option<String>,

        /// Password (prompted on stdin when omitted)
        #[arg(long)]
        password: Option<String>,

        /// Accept the terms of use
        #[arg(long)]
        accept_terms: bool,
    },

    /// Log in to an existing account
    Login {
        #[arg(long)]
        username: String,

        /// Password (prompted on stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Log out
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Show or change the color theme: light, dark, toggle
    Theme { mode: Option<String> },

    /// List saved results of the logged-in user
    History {
        /// Show at most this many results
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Create starter config and example question bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("roadquiz=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let ctx = commands::Context {
        config_path: cli.config,
        data_dir: cli.data_dir,
    };

    let result = match cli.command {
        Commands::Run {
            bank,
            time_limit,
            auto_finish,
            output,
            format,
        } => commands::run::execute(&ctx, bank, time_limit, auto_finish, output, format).await,
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Review { report, html } => commands::review::execute(&ctx, report, html),
        Commands::Register {
            username,
            email,
            password,
            accept_terms,
        } => commands::register::execute(&ctx, username, email, password, accept_terms),
        Commands::Login { username, password } => {
            commands::login::execute(&ctx, username, password)
        }
        Commands::Logout => commands::logout::execute(&ctx),
        Commands::Whoami => commands::whoami::execute(&ctx),
        Commands::Theme { mode } => commands::theme::execute(&ctx, mode),
        Commands::History { limit } => commands::history::execute(&ctx, limit),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
