use std::{fs, path::PathBuf};

use anyhow::Result;

use super::{CommandResult, CommandSummary, InitSummary, helper::finish};
use crate::config::{CONFIG_FILE_NAME, default_config_json};

/// Write the default config into the current directory.
pub fn init() -> Result<CommandResult> {
    let path = PathBuf::from(CONFIG_FILE_NAME);

    let error = if path.exists() {
        Some(format!("{} already exists", CONFIG_FILE_NAME))
    } else {
        fs::write(&path, default_config_json()?)?;
        None
    };

    Ok(finish(
        CommandSummary::Init(InitSummary { path, error }),
        Vec::new(),
    ))
}
