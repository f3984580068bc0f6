// Variable data files and command line assignments

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde_json::{Map, Value};

/// Strategy trait for data file formats
pub trait DataLoader: Send + Sync {
    fn load(&self, content: &str) -> Result<Value>;
    fn file_extensions(&self) -> &'static [&'static str];
}

/// YAML data files
pub struct YamlLoader;

impl DataLoader for YamlLoader {
    fn load(&self, content: &str) -> Result<Value> {
        Ok(serde_yaml::from_str(content)?)
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["yml", "yaml"]
    }
}

/// JSON data files
pub struct JsonLoader;

impl DataLoader for JsonLoader {
    fn load(&self, content: &str) -> Result<Value> {
        Ok(serde_json::from_str(content)?)
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["json"]
    }
}

/// Loaders in the order they are tried for files with an unknown extension.
fn loaders() -> [&'static dyn DataLoader; 2] {
    [&JsonLoader, &YamlLoader]
}

fn loader_for(path: &Path) -> Option<&'static dyn DataLoader> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    loaders()
        .into_iter()
        .find(|loader| loader.file_extensions().contains(&extension.as_str()))
}

/// Load template variables from a YAML or JSON file.
pub fn load_data_file(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read data file {}", path.display()))?;

    if let Some(loader) = loader_for(path) {
        return loader
            .load(&content)
            .with_context(|| format!("Invalid data file {}", path.display()));
    }

    tracing::debug!(path = %path.display(), "unknown data file extension, guessing format");
    let mut last_error = None;
    for loader in loaders() {
        match loader.load(&content) {
            Ok(value) => return Ok(value),
            Err(err) => last_error = Some(err),
        }
    }
    Err(last_error
        .unwrap_or_else(|| anyhow!("no data loader available"))
        .context(format!("Invalid data file {}", path.display())))
}

/// Split a `NAME=VALUE` assignment. The value may itself contain `=`.
pub fn parse_assignment(assignment: &str) -> Result<(String, String)> {
    let (name, value) = assignment
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected NAME=VALUE, got {:?}", assignment))?;
    if name.is_empty() {
        bail!("Missing variable name in {:?}", assignment);
    }
    Ok((name.to_string(), value.to_string()))
}

/// Set string variables on the root object of `data`, replacing what is there.
pub fn apply_overrides(data: Option<Value>, overrides: &[(String, String)]) -> Result<Value> {
    let mut root = match data {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map,
        Some(_) => bail!("Data file must contain a mapping of variable names to values"),
    };
    for (name, value) in overrides {
        root.insert(name.clone(), Value::String(value.clone()));
    }
    Ok(Value::Object(root))
}
