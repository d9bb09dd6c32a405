//! Shopping behavior configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Defaults applied by the trip handlers
#[derive(Debug, Clone, Deserialize)]
pub struct ShoppingConfig {
    /// Category for shopping-only items merged into the vault without one
    #[serde(default = "default_category")]
    pub default_category: String,
}

impl ShoppingConfig {
    /// Validate shopping configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.default_category.trim().is_empty() {
            return Err(ValidationError::MissingRequired("shopping.default_category"));
        }
        Ok(())
    }
}

impl Default for ShoppingConfig {
    fn default() -> Self {
        Self {
            default_category: default_category(),
        }
    }
}

fn default_category() -> String {
    "Uncategorized".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_category_is_uncategorized() {
        assert_eq!(ShoppingConfig::default().default_category, "Uncategorized");
    }

    #[test]
    fn blank_default_category_is_rejected() {
        let config = ShoppingConfig {
            default_category: "   ".to_string(),
        };
        assert!(config.validate().is_err());
    }
}
