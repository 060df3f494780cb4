// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings file adapters.
//!
//! This module reads [`ResolveInputs`] from YAML or JSON settings files.

use crate::domain::{ConfigError, ResolveInputs, Result};
use crate::ports::InputsParser;
use std::fs;
use std::path::Path;

/// Maximum allowed size for settings files (10MB)
const MAX_SETTINGS_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// YAML settings parser.
///
/// # Examples
///
/// ```rust
/// use cfgresolve::adapters::YamlInputsParser;
/// use cfgresolve::ports::InputsParser;
///
/// let yaml = "configServerUrl: http://config:8888\napplication: orders\nprofile: prod\n";
/// let inputs = YamlInputsParser::new().parse(yaml).unwrap();
/// assert_eq!(inputs.profile, "prod");
/// ```
#[cfg(feature = "yaml")]
#[derive(Debug, Clone, Default)]
pub struct YamlInputsParser;

#[cfg(feature = "yaml")]
impl YamlInputsParser {
    /// Creates a new YAML parser.
    pub fn new() -> Self {
        YamlInputsParser
    }
}

#[cfg(feature = "yaml")]
impl InputsParser for YamlInputsParser {
    fn parse(&self, content: &str) -> Result<ResolveInputs> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: format!("Failed to parse YAML: {}", e),
            source: Some(Box::new(e)),
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}

/// JSON settings parser.
#[derive(Debug, Clone, Default)]
pub struct JsonInputsParser;

impl JsonInputsParser {
    /// Creates a new JSON parser.
    pub fn new() -> Self {
        JsonInputsParser
    }
}

impl InputsParser for JsonInputsParser {
    fn parse(&self, content: &str) -> Result<ResolveInputs> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError {
            message: format!("Failed to parse JSON: {}", e),
            source: Some(Box::new(e)),
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }
}

/// Reads a settings file, choosing the parser by file extension.
///
/// The path is canonicalized and files above 10MB are rejected before they
/// are read.
///
/// # Errors
///
/// `IoError` when the file cannot be read, `ParseError` when it is too large,
/// has an unsupported extension or does not parse.
pub fn load_inputs_file<P: AsRef<Path>>(path: P) -> Result<ResolveInputs> {
    let canonical_path = path.as_ref().canonicalize()?;
    let extension = canonical_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_string();

    let mut parsers: Vec<Box<dyn InputsParser>> = Vec::new();
    #[cfg(feature = "yaml")]
    parsers.push(Box::new(YamlInputsParser::new()));
    parsers.push(Box::new(JsonInputsParser::new()));
    let parser = parsers
        .into_iter()
        .find(|parser| parser.supports(&extension))
        .ok_or_else(|| ConfigError::ParseError {
            message: format!("Unsupported settings file extension: '{}'", extension),
            source: None,
        })?;

    let content = read_capped(&canonical_path)?;
    let inputs = parser.parse(&content)?;
    tracing::debug!(
        "Loaded resolution settings for {}/{} from {}",
        inputs.application,
        inputs.profile,
        file_name(&canonical_path)
    );
    Ok(inputs)
}

fn read_capped(path: &Path) -> Result<String> {
    let metadata = fs::metadata(path)?;
    if metadata.len() > MAX_SETTINGS_FILE_SIZE {
        return Err(ConfigError::ParseError {
            message: format!(
                "Settings file too large: {} bytes (max {} bytes)",
                metadata.len(),
                MAX_SETTINGS_FILE_SIZE
            ),
            source: None,
        });
    }
    Ok(fs::read_to_string(path)?)
}

fn file_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
}

#[cfg(feature = "yaml")]
impl ResolveInputs {
    /// Parses inputs from a YAML document.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        YamlInputsParser::new().parse(content)
    }

    /// Reads inputs from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let canonical_path = path.as_ref().canonicalize()?;
        Self::from_yaml_str(&read_capped(&canonical_path)?)
    }
}
