use crate::models::config::Config;
use simplelog::{ColorChoice, CombinedLogger, TermLogger, TerminalMode, WriteLogger};
use std::error::Error;
use std::fs::{self, OpenOptions};

/// Log to the terminal and append to the configured log file
pub fn init(config: &Config) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(config.log_dir())?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())?;

    let log_config = simplelog::Config::default();

    CombinedLogger::init(vec![
        TermLogger::new(
            config.log_level(),
            log_config.clone(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(config.log_level(), log_config, log_file),
    ])?;

    Ok(())
}
