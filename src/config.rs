//! Per-suite configuration.
//!
//! Every suite resolves its configuration once, when it is declared: each
//! override is checked against the fixed key set and the type of the
//! default, and every key that is not overridden keeps its default. A
//! resolved [`Config`] is therefore always total over the key set.
//!
//! ```rust
//! use soaper::{Config, ConfigValue};
//!
//! let config = Config::resolve([("tab_arrows", ConfigValue::from(true))]).unwrap();
//! assert!(config.tab_arrows);
//! assert_eq!(config.tab_width, 4);
//!
//! assert!(Config::resolve([("no_such_key", ConfigValue::from(1))]).is_err());
//! ```

use serde::Serialize;

use crate::error::{Result, SoaperError};

/// Every configuration key, in display order.
pub const KEYS: &[&str] = &[
    "autorun_tests",
    "show_suites",
    "show_suite_docstring",
    "show_results",
    "show_test_docstrings",
    "max_docstring_len",
    "max_test_name_len",
    "show_passes",
    "show_skips",
    "show_fails",
    "show_fail_docstring",
    "show_fail_message",
    "show_fail_context",
    "show_context_line_numbers",
    "tab_arrows",
    "tab_width",
];

/// A single override value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl ConfigValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Bool(_) => "bool",
            ConfigValue::Int(_) => "int",
            ConfigValue::Str(_) => "string",
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Int(value)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        ConfigValue::Int(value.into())
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Str(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Str(value)
    }
}

/// The resolved configuration of one suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Run the suite as soon as it is registered.
    pub autorun_tests: bool,

    pub show_suites: bool,
    pub show_suite_docstring: bool,
    /// Show the summary block after the last test.
    pub show_results: bool,
    pub show_test_docstrings: bool,
    pub max_docstring_len: usize,
    pub max_test_name_len: usize,

    pub show_passes: bool,
    pub show_skips: bool,

    pub show_fails: bool,
    pub show_fail_docstring: bool,
    pub show_fail_message: bool,
    pub show_fail_context: bool,
    pub show_context_line_numbers: bool,
    /// Render tabs in context lines as an arrow followed by padding.
    pub tab_arrows: bool,
    pub tab_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            autorun_tests: true,
            show_suites: true,
            show_suite_docstring: true,
            show_results: true,
            show_test_docstrings: false,
            max_docstring_len: 70,
            max_test_name_len: 40,
            show_passes: true,
            show_skips: true,
            show_fails: true,
            show_fail_docstring: true,
            show_fail_message: true,
            show_fail_context: true,
            show_context_line_numbers: true,
            tab_arrows: false,
            tab_width: 4,
        }
    }
}

impl Config {
    /// Applies `overrides` on top of the defaults.
    pub fn resolve<K, I>(overrides: I) -> Result<Self>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, ConfigValue)>,
    {
        let mut config = Config::default();
        for (key, value) in overrides {
            config.set(key.as_ref(), value)?;
        }
        Ok(config)
    }

    /// Resolves a YAML mapping of overrides, e.g. `tab_arrows: true`.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let document: serde_yaml::Value = serde_yaml::from_str(text)?;
        let mapping = match document {
            serde_yaml::Value::Mapping(mapping) => mapping,
            serde_yaml::Value::Null => return Ok(Config::default()),
            _ => return Err(SoaperError::ConfigShape),
        };

        let mut overrides = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let serde_yaml::Value::String(key) = key else {
                return Err(SoaperError::ConfigShape);
            };
            let value = yaml_to_value(&key, value)?;
            overrides.push((key, value));
        }
        Config::resolve(overrides)
    }

    /// Sets one key, checking that it exists and that the value has the right type.
    pub fn set(&mut self, key: &str, value: ConfigValue) -> Result<()> {
        match key {
            "autorun_tests" => self.autorun_tests = expect_bool(key, value)?,
            "show_suites" => self.show_suites = expect_bool(key, value)?,
            "show_suite_docstring" => self.show_suite_docstring = expect_bool(key, value)?,
            "show_results" => self.show_results = expect_bool(key, value)?,
            "show_test_docstrings" => self.show_test_docstrings = expect_bool(key, value)?,
            "max_docstring_len" => self.max_docstring_len = expect_len(key, value)?,
            "max_test_name_len" => self.max_test_name_len = expect_len(key, value)?,
            "show_passes" => self.show_passes = expect_bool(key, value)?,
            "show_skips" => self.show_skips = expect_bool(key, value)?,
            "show_fails" => self.show_fails = expect_bool(key, value)?,
            "show_fail_docstring" => self.show_fail_docstring = expect_bool(key, value)?,
            "show_fail_message" => self.show_fail_message = expect_bool(key, value)?,
            "show_fail_context" => self.show_fail_context = expect_bool(key, value)?,
            "show_context_line_numbers" => {
                self.show_context_line_numbers = expect_bool(key, value)?
            }
            "tab_arrows" => self.tab_arrows = expect_bool(key, value)?,
            "tab_width" => self.tab_width = expect_len(key, value)?,
            _ => {
                return Err(SoaperError::UnknownConfigKey {
                    key: key.to_string(),
                    valid: KEYS.join(", "),
                })
            }
        }
        Ok(())
    }
}

fn expect_bool(key: &str, value: ConfigValue) -> Result<bool> {
    match value {
        ConfigValue::Bool(b) => Ok(b),
        other => Err(mismatch(key, "bool", &other)),
    }
}

fn expect_len(key: &str, value: ConfigValue) -> Result<usize> {
    match value {
        ConfigValue::Int(n) => usize::try_from(n).map_err(|_| SoaperError::ConfigOutOfRange {
            key: key.to_string(),
            value: n,
        }),
        other => Err(mismatch(key, "int", &other)),
    }
}

fn mismatch(key: &str, expected: &'static str, found: &ConfigValue) -> SoaperError {
    SoaperError::ConfigTypeMismatch {
        key: key.to_string(),
        expected,
        found: found.type_name(),
    }
}

fn yaml_to_value(key: &str, value: serde_yaml::Value) -> Result<ConfigValue> {
    match value {
        serde_yaml::Value::Bool(b) => Ok(ConfigValue::Bool(b)),
        serde_yaml::Value::String(s) => Ok(ConfigValue::Str(s)),
        serde_yaml::Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(ConfigValue::Int(i)),
            None => Err(SoaperError::ConfigTypeMismatch {
                key: key.to_string(),
                expected: "int",
                found: "float",
            }),
        },
        _ => Err(SoaperError::ConfigTypeMismatch {
            key: key.to_string(),
            expected: "scalar",
            found: "collection",
        }),
    }
}
