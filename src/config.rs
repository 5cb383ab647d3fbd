//! Shop configuration
//!
//! Explicit configuration replacing process-wide settings: the shop currency
//! and the ordered list of active price modifier identifiers. Loadable from
//! YAML.

use std::{fs, path::Path};

use rusty_money::iso::{self, Currency};
use serde::Deserialize;
use thiserror::Error;

use crate::modifiers::{ModifierError, ModifierRegistry};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading a configuration file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown ISO currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Unresolvable modifier identifier
    #[error(transparent)]
    Modifier(#[from] ModifierError),
}

/// Shop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ShopConfig {
    /// ISO 4217 currency code for all carts and orders ("USD")
    pub currency: String,

    /// Active price modifier identifiers, applied in this order
    #[serde(default)]
    pub price_modifiers: Vec<String>,
}

impl ShopConfig {
    /// Parse a configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the document does not match the
    /// expected shape.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_norway::from_str(contents)?)
    }

    /// Load a configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Yaml`] if it cannot be parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Resolve the configured currency code.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] if the code is not a known
    /// ISO 4217 currency.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        iso::find(&self.currency).ok_or_else(|| ConfigError::UnknownCurrency(self.currency.clone()))
    }

    /// Resolve the configured modifier identifiers into a registry,
    /// preserving the configured order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Modifier`] for the first identifier that does
    /// not resolve.
    pub fn modifier_registry(&self) -> Result<ModifierRegistry, ConfigError> {
        Ok(ModifierRegistry::from_identifiers(&self.price_modifiers)?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use testresult::TestResult;

    use crate::modifiers::ModifierError;

    use super::*;

    #[test]
    fn parses_currency_and_modifiers() -> TestResult {
        let yaml = r"
currency: USD
price_modifiers:
  - ten-percent-tax
";
        let config = ShopConfig::from_yaml(yaml)?;

        assert_eq!(config.currency()?, iso::USD);
        assert_eq!(config.price_modifiers, ["ten-percent-tax"]);
        assert_eq!(config.modifier_registry()?.enabled_modifiers().len(), 1);

        Ok(())
    }

    #[test]
    fn modifiers_default_to_empty() -> TestResult {
        let config = ShopConfig::from_yaml("currency: GBP")?;

        assert!(config.price_modifiers.is_empty());
        assert!(config.modifier_registry()?.enabled_modifiers().is_empty());

        Ok(())
    }

    #[test]
    fn unknown_currency_errors() -> TestResult {
        let config = ShopConfig::from_yaml("currency: ZZZ")?;

        assert!(matches!(
            config.currency(),
            Err(ConfigError::UnknownCurrency(code)) if code == "ZZZ"
        ));

        Ok(())
    }

    #[test]
    fn unknown_modifier_identifier_errors() -> TestResult {
        let yaml = r"
currency: USD
price_modifiers:
  - no-such-modifier
";
        let config = ShopConfig::from_yaml(yaml)?;

        assert!(matches!(
            config.modifier_registry(),
            Err(ConfigError::Modifier(ModifierError::UnknownModifier(id))) if id == "no-such-modifier"
        ));

        Ok(())
    }

    #[test]
    fn invalid_yaml_errors() {
        let result = ShopConfig::from_yaml("currency: [not, a, string");

        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn loads_from_file() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "currency: USD")?;
        writeln!(file, "price_modifiers: [ten-percent-tax, five-percent-discount]")?;

        let config = ShopConfig::from_path(file.path())?;

        assert_eq!(config.price_modifiers.len(), 2);

        Ok(())
    }

    #[test]
    fn missing_file_errors() {
        let result = ShopConfig::from_path("/definitely/not/here.yaml");

        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
