//! Config commands

use crate::config::{Config, KEYS};
use crate::ConfigCommands;

use super::CliError;

pub fn handle(action: ConfigCommands, mut config: Config, profile: Option<&str>) -> Result<(), CliError> {
    match action {
        ConfigCommands::Set { key, value } => {
            config.set(&key, value)?;
            let path = config.save(profile)?;
            println!("Set {key} in {}", path.display());
        }
        ConfigCommands::Get { key } => {
            let value = config.get(&key)?;
            println!("{key}: {}", value.unwrap_or_else(|| "(not set)".into()));
        }
        ConfigCommands::List => {
            for key in KEYS {
                let value = config.get(key)?;
                println!("{key}: {}", value.unwrap_or_else(|| "(not set)".into()));
            }
        }
    }
    Ok(())
}
