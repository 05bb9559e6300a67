use std::path::Path;

use log::{info, LevelFilter, SetLoggerError};
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::runtime::ConfigErrors;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use thiserror::Error;

const LOG_PATTERN: &str = "{d(%H:%M:%S)(utc)} {l} - {m}{n}";

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Could not open log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid logger configuration: {0}")]
    Config(#[from] ConfigErrors),

    #[error("Logger already initialized: {0}")]
    SetLogger(#[from] SetLoggerError),
}

/// Logs to the console and, when `log_dir` is set, to `<log_dir>/<date>.log`.
pub fn init_file_logger(log_dir: Option<&Path>, level: LevelFilter) -> Result<(), LoggerError> {
    let mut root = Root::builder().appender("console");
    let mut config = Config::builder().appender(
        Appender::builder().build(
            "console",
            Box::new(
                ConsoleAppender::builder()
                    .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
                    .build(),
            ),
        ),
    );

    if let Some(log_dir) = log_dir {
        let current_date = chrono::offset::Utc::now().date_naive().to_string();
        let path = log_dir.join(format!("{}.log", current_date));

        let logfile = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build(path)?;

        config = config.appender(Appender::builder().build("logfile", Box::new(logfile)));
        root = root.appender("logfile");
    }

    let config = config.build(root.build(level))?;

    log4rs::init_config(config)?;
    info!("Logger initialized");

    Ok(())
}
