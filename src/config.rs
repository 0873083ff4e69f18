//! Analysis parameters.
//!
//! A [`BridgeConfig`] is validated when it is built or loaded, so an analysis
//! never starts with an impossible size window.
//!
//! ```toml
//! min_ring_size = 3
//! max_ring_size = 8
//! bridge_length_max = 8
//! parallel = true
//! max_paths = 100000
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{BridgeError, Result};

pub const DEFAULT_MIN_RING_SIZE: usize = 3;
pub const DEFAULT_MAX_RING_SIZE: usize = 8;
pub const DEFAULT_BRIDGE_LENGTH_MAX: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    min_ring_size: usize,
    max_ring_size: usize,
    bridge_length_max: usize,
    parallel: bool,
    max_paths: Option<usize>,
    max_rings: Option<usize>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            min_ring_size: DEFAULT_MIN_RING_SIZE,
            max_ring_size: DEFAULT_MAX_RING_SIZE,
            bridge_length_max: DEFAULT_BRIDGE_LENGTH_MAX,
            parallel: true,
            max_paths: None,
            max_rings: None,
        }
    }
}

impl BridgeConfig {
    /// Ring size window `[min_ring_size, max_ring_size]` and the largest
    /// admissible bridging path, counted in vertices including both ends.
    ///
    /// # Errors
    /// [`BridgeError::InvalidConfiguration`] if a bound is zero or
    /// `min_ring_size > max_ring_size`.
    pub fn new(min_ring_size: usize, max_ring_size: usize, bridge_length_max: usize) -> Result<Self> {
        let config = Self {
            min_ring_size,
            max_ring_size,
            bridge_length_max,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| BridgeError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| BridgeError::Io {
            source,
            path: path.to_path_buf(),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Cap on simple paths enumerated per vertex pair.
    pub fn with_max_paths(mut self, limit: usize) -> Result<Self> {
        self.max_paths = Some(limit);
        self.validate()?;
        Ok(self)
    }

    /// Cap on elementary cycles enumerated per molecule.
    pub fn with_max_rings(mut self, limit: usize) -> Result<Self> {
        self.max_rings = Some(limit);
        self.validate()?;
        Ok(self)
    }

    pub fn min_ring_size(&self) -> usize {
        self.min_ring_size
    }

    pub fn max_ring_size(&self) -> usize {
        self.max_ring_size
    }

    pub fn bridge_length_max(&self) -> usize {
        self.bridge_length_max
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    pub fn max_paths(&self) -> Option<usize> {
        self.max_paths
    }

    pub fn max_rings(&self) -> Option<usize> {
        self.max_rings
    }

    pub fn accepts_ring_size(&self, size: usize) -> bool {
        (self.min_ring_size..=self.max_ring_size).contains(&size)
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("min_ring_size", self.min_ring_size),
            ("max_ring_size", self.max_ring_size),
            ("bridge_length_max", self.bridge_length_max),
        ] {
            if value == 0 {
                return Err(BridgeError::config(format!("{} must be positive", name)));
            }
        }
        if self.min_ring_size > self.max_ring_size {
            return Err(BridgeError::config(format!(
                "min_ring_size ({}) exceeds max_ring_size ({})",
                self.min_ring_size, self.max_ring_size
            )));
        }
        if self.max_paths == Some(0) {
            return Err(BridgeError::config("max_paths must be positive"));
        }
        if self.max_rings == Some(0) {
            return Err(BridgeError::config("max_rings must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.min_ring_size(), 3);
        assert_eq!(config.max_ring_size(), 8);
        assert_eq!(config.bridge_length_max(), 8);
        assert!(config.parallel());
        assert_eq!(config.max_paths(), None);
    }

    #[test]
    fn rejects_zero_bounds() {
        for (min, max, len) in [(0, 8, 8), (3, 0, 8), (3, 8, 0)] {
            let err = BridgeConfig::new(min, max, len).unwrap_err();
            assert!(matches!(err, BridgeError::InvalidConfiguration { .. }), "{:?}", (min, max, len));
        }
    }

    #[test]
    fn rejects_inverted_window() {
        let err = BridgeConfig::new(9, 8, 8).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration: min_ring_size (9) exceeds max_ring_size (8)"
        );
    }

    #[test]
    fn single_size_window_is_valid() {
        let config = BridgeConfig::new(6, 6, 4).unwrap();
        assert!(config.accepts_ring_size(6));
        assert!(!config.accepts_ring_size(5));
        assert!(!config.accepts_ring_size(7));
    }

    #[test]
    fn zero_caps_rejected() {
        assert!(BridgeConfig::default().with_max_paths(0).is_err());
        assert!(BridgeConfig::default().with_max_rings(0).is_err());
        assert_eq!(
            BridgeConfig::default().with_max_paths(10).unwrap().max_paths(),
            Some(10)
        );
    }

    #[test]
    fn toml_partial_override() {
        let config = BridgeConfig::from_toml_str("max_ring_size = 12\nparallel = false\n").unwrap();
        assert_eq!(config.min_ring_size(), 3);
        assert_eq!(config.max_ring_size(), 12);
        assert_eq!(config.bridge_length_max(), 8);
        assert!(!config.parallel());
    }

    #[test]
    fn toml_validation_applies() {
        assert!(BridgeConfig::from_toml_str("min_ring_size = 10").is_err());
        assert!(BridgeConfig::from_toml_str("bridge_length = 4").is_err());
        assert!(BridgeConfig::from_toml_str("min_ring_size = -1").is_err());
    }

    #[test]
    fn load_missing_file() {
        let err = BridgeConfig::load(Path::new("/nonexistent/bridgecrab.toml")).unwrap_err();
        assert!(matches!(err, BridgeError::Io { .. }));
    }
}
