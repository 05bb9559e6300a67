use std::{io, path::PathBuf, process, sync::Arc};

use clap::Parser;
use log::{error, info};
use quiz_app_rust::{
    config::Config,
    handlers::command_handler::{execute_command, Command, QuizApp},
    loggers::file_logger::init_file_logger,
    storage::SqliteStorage,
};

#[derive(Parser)]
#[command(name = "quiz-app", version, about = "Author questions, play quizzes, keep scores")]
struct Cli {
    /// SQLite file holding questions and scores
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Directory for dated log files
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(database) = cli.database {
        config.database_path = database;
    }
    if let Some(log_dir) = cli.log_dir {
        config.log_dir = Some(log_dir);
    }

    if let Err(error) = init_file_logger(config.log_dir.as_deref(), config.log_level) {
        eprintln!("Logging disabled: {}", error);
    }
    info!("App started!");

    let storage = match SqliteStorage::open(&config.database_path) {
        Ok(storage) => Arc::new(storage),
        Err(error) => {
            error!("Could not open {}: {}", config.database_path.display(), error);
            eprintln!("Error: {}", error);
            process::exit(1);
        }
    };
    let mut app = QuizApp::new(storage);

    let mut input = io::stdin().lock();
    let mut output = io::stdout();

    if let Err(error) = execute_command(cli.command, &mut app, &mut input, &mut output).await {
        error!("Command failed: {}", error);
        eprintln!("Error: {}", error.user_message());
        process::exit(1);
    }
}
