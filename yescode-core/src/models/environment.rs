//! Backend environment selection.

use serde::{Deserialize, Serialize};

/// Production backend.
const PRODUCTION_URL: &str = "https://co.yes.vg";

/// Test backend.
const TEST_URL: &str = "https://cotest.yes.vg";

/// Which backend an API key belongs to.
///
/// Detected once when the key is stored and persisted alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// `co.yes.vg`.
    #[default]
    Production,
    /// `cotest.yes.vg`.
    Test,
}

impl Environment {
    /// Both environments, in detection priority order.
    pub const ALL: [Environment; 2] = [Self::Production, Self::Test];

    /// Base URL of this environment.
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_URL,
            Self::Test => TEST_URL,
        }
    }

    /// Provider switching is only offered against production.
    pub fn provider_switching_available(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Capitalized name for messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Production => "Production",
            Self::Test => "Test",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Test => write!(f, "test"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_urls() {
        assert_eq!(Environment::Production.base_url(), "https://co.yes.vg");
        assert_eq!(Environment::Test.base_url(), "https://cotest.yes.vg");
    }

    #[test]
    fn test_switching_only_in_production() {
        assert!(Environment::Production.provider_switching_available());
        assert!(!Environment::Test.provider_switching_available());
    }
}
