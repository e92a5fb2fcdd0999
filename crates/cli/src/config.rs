use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use controller::ControllerConfig;
use serde_json::Value;

/// Load `path` on top of `base`: the file only needs the fields it changes.
pub fn load(base: ControllerConfig, path: &Path) -> Result<ControllerConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let patch: Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    overlay(base, patch).with_context(|| format!("applying config {}", path.display()))
}

pub fn overlay(base: ControllerConfig, patch: Value) -> Result<ControllerConfig> {
    let mut merged = serde_json::to_value(base)?;
    merge(&mut merged, patch);
    let config: ControllerConfig = serde_json::from_value(merged)?;
    config.validate()?;
    Ok(config)
}

fn merge(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (k, v) in patch {
                merge(base.entry(k).or_insert(Value::Null), v);
            }
        }
        (base, patch) => *base = patch,
    }
}
