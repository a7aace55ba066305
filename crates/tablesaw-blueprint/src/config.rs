//! Blueprint session configuration.

use serde::{Deserialize, Serialize};

/// Project-wide defaults consulted when a column declaration omits a
/// value.
///
/// Passed explicitly into the blueprint constructor so sessions stay
/// independently testable; there is no ambient global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlueprintConfig {
    /// Length used by string columns declared without an explicit length.
    /// When unset, the built-in default of 255 applies.
    pub default_string_length: Option<u32>,
}

impl BlueprintConfig {
    /// Creates a config with no overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the project-wide default string length.
    #[must_use]
    pub fn default_string_length(mut self, length: u32) -> Self {
        self.default_string_length = Some(length);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_style_config() {
        let config = BlueprintConfig::new().default_string_length(191);
        assert_eq!(config.default_string_length, Some(191));
        assert_eq!(BlueprintConfig::new().default_string_length, None);
    }
}
