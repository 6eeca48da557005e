//! Configuration file loading

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info};

use super::WidgetConfig;

/// Configuration loading errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// File could not be read
    Io(io::ErrorKind),
    /// TOML syntax or type error, with the 1-based line if known
    Parse { line: Option<usize> },
    /// A value is out of range
    Invalid(&'static str),
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e.kind())
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(kind) => write!(f, "cannot read config: {}", kind),
            ConfigError::Parse { line: Some(line) } => write!(f, "invalid config at line {}", line),
            ConfigError::Parse { line: None } => f.write_str("invalid config"),
            ConfigError::Invalid(field) => write!(f, "config value out of range: {}", field),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse and validate a TOML document
pub fn parse_config(text: &str) -> Result<WidgetConfig, ConfigError> {
    let config: WidgetConfig = toml::from_str(text).map_err(|e| {
        debug!(error = %e, "toml parse error");
        ConfigError::Parse {
            line: e.span().map(|span| line_of(text, span.start)),
        }
    })?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from `path`
///
/// A missing file yields the defaults when `required` is false.
pub fn load_config(path: &Path, required: bool) -> Result<WidgetConfig, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound && !required => {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(WidgetConfig::default());
        }
        Err(e) => return Err(e.into()),
    };

    let config = parse_config(&text)?;
    info!(path = %path.display(), "loaded configuration");
    Ok(config)
}

/// 1-based line containing byte `offset`
fn line_of(text: &str, offset: usize) -> usize {
    let end = offset.min(text.len());
    text.as_bytes()[..end].iter().filter(|b| **b == b'\n').count() + 1
}
