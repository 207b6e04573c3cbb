//! Module for generating a starter configuration file.

use std::fs;
use std::io::Write;

use anyhow::{Result, bail};
use shared::config::Config;

/// Generates a configuration file in the specified format.
///
/// # Errors
/// Returns an error if the format is unsupported or if writing the file
/// fails.
pub fn generate_config(format: &str) -> Result<()> {
    let config = Config::with_defaults();
    let (file_name, serialized) = match format {
        "yaml" => ("config.yaml", serde_yml::to_string(&config)?),
        "json" => ("config.json", serde_json::to_string_pretty(&config)?),
        _ => bail!("Unsupported format. Use 'yaml' or 'json'."),
    };

    let mut file = fs::File::create(file_name)?;
    file.write_all(serialized.as_bytes())?;

    println!("Configuration file '{file_name}' generated successfully.");
    Ok(())
}
