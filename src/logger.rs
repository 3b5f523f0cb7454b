use anyhow::{Context, Result};
use log::Level;
use simple_logger::init_with_level;
use std::{env, str::FromStr};

const LOG_LEVEL_VAR: &str = "MIGRATE_LOG_LEVEL";

pub fn init() -> Result<()> {
    let level = match env::var(LOG_LEVEL_VAR) {
        Ok(value) => parse_level(&value)?,
        Err(_) => Level::Info,
    };

    init_with_level(level)?;

    Ok(())
}

fn parse_level(value: &str) -> Result<Level> {
    Level::from_str(value.trim()).with_context(|| format!("invalid {}: `{}`", LOG_LEVEL_VAR, value))
}
