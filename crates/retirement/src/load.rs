//! Scenario files
//!
//! Scenarios are authored as YAML (`.yaml`/`.yml`) or JSON (`.json`) files
//! holding one [`ScenarioConfig`]. Any other extension is read as YAML.

use std::fs;
use std::path::Path;

use color_eyre::eyre::{WrapErr, bail};
use jiff::civil::Date;
use retirement_core::{Scenario, ScenarioConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    pub fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Yaml,
        }
    }
}

pub fn parse_config(content: &str, format: Format) -> color_eyre::Result<ScenarioConfig> {
    let config: ScenarioConfig = match format {
        Format::Yaml => serde_saphyr::from_str(content).wrap_err("Failed to parse YAML scenario")?,
        Format::Json => serde_json::from_str(content).wrap_err("Failed to parse JSON scenario")?,
    };
    Ok(config)
}

/// Read a scenario configuration from `path`.
pub fn load_config(path: &Path) -> color_eyre::Result<ScenarioConfig> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read scenario {}", path.display()))?;
    let config = parse_config(&content, Format::of(path))
        .wrap_err_with(|| format!("Invalid scenario {}", path.display()))?;
    tracing::info!(
        scenario = %config.id,
        sources = config.sources.len(),
        path = %path.display(),
        "Loaded scenario"
    );
    Ok(config)
}

/// Load and plan every scenario, optionally projecting from another as-of
/// date.
pub fn load_scenarios<P: AsRef<Path>>(paths: &[P], as_of: Option<Date>) -> color_eyre::Result<Vec<Scenario>> {
    if paths.is_empty() {
        bail!("No scenario files given");
    }
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let mut config = load_config(path)?;
            if let Some(as_of) = as_of {
                config = config.with_as_of(as_of);
            }
            Scenario::from_config(config)
                .wrap_err_with(|| format!("Scenario {} is not valid", path.display()))
        })
        .collect()
}
