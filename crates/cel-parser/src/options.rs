use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 128;
pub const DEFAULT_MAX_ERRORS: usize = 100;
/// Highest accepted `max_recursion_depth`; each level costs several parser
/// frames, and deeper nesting no longer fits a default main-thread stack.
pub const MAX_RECURSION_DEPTH_LIMIT: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserOptions {
    /// Maximum nesting of sub-expressions (parentheses, literal bodies,
    /// arguments, indexes, conditional branches).
    #[serde(default = "default_max_recursion_depth")]
    pub max_recursion_depth: usize,
    /// Accept `a.?b`, `a?.b`, `a[?b]`, `a?[b]` and `?`-prefixed entries.
    #[serde(default = "default_true")]
    pub enable_optional_syntax: bool,
    #[serde(default)]
    pub error_recovery: bool,
    #[serde(default = "default_max_errors")]
    pub max_errors: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
            enable_optional_syntax: true,
            error_recovery: false,
            max_errors: DEFAULT_MAX_ERRORS,
        }
    }
}

impl ParserOptions {
    pub fn with_max_recursion_depth(mut self, depth: usize) -> Self {
        self.max_recursion_depth = depth;
        self
    }

    pub fn with_optional_syntax(mut self, enabled: bool) -> Self {
        self.enable_optional_syntax = enabled;
        self
    }

    pub fn with_error_recovery(mut self, enabled: bool) -> Self {
        self.error_recovery = enabled;
        self
    }
}

fn default_max_recursion_depth() -> usize {
    DEFAULT_MAX_RECURSION_DEPTH
}

fn default_max_errors() -> usize {
    DEFAULT_MAX_ERRORS
}

fn default_true() -> bool {
    true
}

#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("read parser options failed `{path}`: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parser options parse failed: {0}")]
    Parse(String),
    #[error("parser options validation failed: {0:?}")]
    Validation(Vec<String>),
}

/// Loads options from a JSON or YAML file, chosen by extension.
pub fn load_parser_options(path: &Path) -> Result<ParserOptions, OptionsError> {
    let raw = fs::read_to_string(path).map_err(|source| OptionsError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;
    let options: ParserOptions = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(raw.as_str())
            .map_err(|error| OptionsError::Parse(format!("json decode error: {error}")))?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(raw.as_str())
            .map_err(|error| OptionsError::Parse(format!("yaml decode error: {error}")))?,
        _ => serde_yaml::from_str(raw.as_str())
            .or_else(|_| serde_json::from_str(raw.as_str()))
            .map_err(|error| OptionsError::Parse(error.to_string()))?,
    };

    let issues = validate_parser_options(&options);
    if !issues.is_empty() {
        return Err(OptionsError::Validation(issues));
    }
    Ok(options)
}

pub fn validate_parser_options(options: &ParserOptions) -> Vec<String> {
    let mut issues = Vec::new();
    if options.max_recursion_depth == 0 {
        issues.push("max_recursion_depth must be at least 1".to_string());
    }
    if options.max_recursion_depth > MAX_RECURSION_DEPTH_LIMIT {
        issues.push(format!(
            "max_recursion_depth must be at most {MAX_RECURSION_DEPTH_LIMIT}"
        ));
    }
    if options.max_errors == 0 {
        issues.push("max_errors must be at least 1".to_string());
    }
    issues
}

#[cfg(test)]
#[path = "options_test.rs"]
mod tests;
