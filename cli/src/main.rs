mod console;
mod logging;
mod session;
mod table;
mod tui;

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use log::warn;
use taskmate_core::Config;

use crate::session::Session;

#[derive(Parser)]
#[command(name = "taskmate")]
#[command(about = "A chatty personal task tracker", long_about = None)]
struct Cli {
    /// Save file to use instead of ~/.taskmate/tasks.txt
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,
    /// Log level written to ~/.taskmate/logs (trace|debug|info|warn|error|off)
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Type commands line by line (default)
    Console,
    /// Open the chat window in the terminal
    Tui,
    /// Run a single command and exit (usage: run deadline essay /by 22/2/2022)
    Run {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },
    /// Print the task list as a table
    Table,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("warning: {:#}; using defaults", e);
            Config::default()
        }
    }
    .with_env_overrides();

    let data_file = config.resolve_data_file(cli.data_file)?;
    let level = config.resolve_log_level(cli.log_level);
    match config.resolve_log_dir() {
        Ok(dir) => {
            if let Err(e) = logging::init_logging(&level, &dir) {
                eprintln!("warning: logging disabled: {:#}", e);
            }
        }
        Err(e) => eprintln!("warning: logging disabled: {:#}", e),
    }

    let session = Session::open(data_file);

    match cli.command.unwrap_or(Commands::Console) {
        Commands::Console => console::run(session)?,
        Commands::Tui => tui::run(session)?,
        Commands::Run { args } => {
            let mut session = session;
            for notice in session.notices() {
                eprintln!("{}", notice);
            }
            let reply = session.respond(&args.join(" "));
            if reply.is_error {
                eprintln!("{}", reply.text);
                warn!("one-shot command failed: {}", reply.text);
                log::Log::flush(log::logger());
                process::exit(1);
            }
            println!("{}", reply.text);
        }
        Commands::Table => {
            for notice in session.notices() {
                eprintln!("{}", notice);
            }
            println!("{}", table::render(session.tasks()));
        }
    }

    Ok(())
}
