use anyhow::{bail, Result};

use prolug_bot::storage::path_utils;

/// `config show`: display the resolved config, defaults included.
pub fn run_show(config_path: Option<&str>) -> Result<()> {
    let config = super::load_config(config_path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

/// `config get <key>`: display a single value.
///
/// Key uses dot notation: `report.excluded_topic_channels`, `llm.groq.model`
pub fn run_get(config_path: Option<&str>, key: &str) -> Result<()> {
    let config = serde_json::to_value(super::load_config(config_path)?)?;
    match resolve_path(&config, key) {
        Some(v) => println!("{}", serde_json::to_string_pretty(v)?),
        None => bail!("Key not found: {}", key),
    }
    Ok(())
}

/// `config path`: where the default config is read from.
pub fn run_path() -> Result<()> {
    println!("{}", path_utils::config_path().display());
    Ok(())
}

fn resolve_path<'a>(value: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}
