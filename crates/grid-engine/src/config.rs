//! Configuration for the grid engine.

use serde::{Deserialize, Serialize};

/// Defaults used when persisting and post-processing grids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridEngineConfig {
    /// Value written to GSLIB files for empty cells, and read back as empty.
    pub null_sentinel: f64,

    /// Column name written on the third GSLIB header line.
    pub column_name: String,

    /// Title prefix written on the first GSLIB header line.
    pub title: String,

    /// Method used when resampling to a new shape.
    pub resample_method: ResampleMethod,

    /// Gaussian pyramid settings.
    pub pyramid: PyramidConfig,
}

impl Default for GridEngineConfig {
    fn default() -> Self {
        Self {
            null_sentinel: -99.0,
            column_name: "code".to_string(),
            title: "grid".to_string(),
            resample_method: ResampleMethod::Nearest,
            pyramid: PyramidConfig::default(),
        }
    }
}

impl GridEngineConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override fields from environment variables that are set and parse.
    pub fn apply_env(&mut self) {
        if let Ok(val) = std::env::var("GSLIB_NULL_SENTINEL") {
            if let Ok(sentinel) = val.parse() {
                self.null_sentinel = sentinel;
            }
        }

        if let Ok(val) = std::env::var("GSLIB_COLUMN_NAME") {
            self.column_name = val;
        }

        if let Ok(val) = std::env::var("GSLIB_TITLE") {
            self.title = val;
        }

        if let Ok(val) = std::env::var("GRID_RESAMPLE_METHOD") {
            self.resample_method = ResampleMethod::from_str(&val);
        }

        self.pyramid.apply_env();
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.null_sentinel.is_finite() {
            return Err("null_sentinel must be a finite number".to_string());
        }

        if self.column_name.trim().is_empty() {
            return Err("column_name must not be empty".to_string());
        }

        self.pyramid.validate()
    }
}

// ============================================================================
// Pyramid
// ============================================================================

/// Limits for multi-level pyramid generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PyramidConfig {
    /// Stop before a level whose smaller side would drop below this.
    pub min_dimension: usize,

    /// Maximum number of levels, counting the native grid as level 0.
    pub max_levels: usize,
}

impl Default for PyramidConfig {
    fn default() -> Self {
        Self {
            min_dimension: 4,
            max_levels: 8,
        }
    }
}

impl PyramidConfig {
    fn apply_env(&mut self) {
        if let Ok(val) = std::env::var("PYRAMID_MIN_DIMENSION") {
            if let Ok(n) = val.parse() {
                self.min_dimension = n;
            }
        }

        if let Ok(val) = std::env::var("PYRAMID_MAX_LEVELS") {
            if let Ok(n) = val.parse() {
                self.max_levels = n;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_dimension == 0 {
            return Err("pyramid.min_dimension must be > 0".to_string());
        }

        if self.max_levels == 0 {
            return Err("pyramid.max_levels must be > 0".to_string());
        }

        Ok(())
    }
}

// ============================================================================
// Resampling
// ============================================================================

/// Method used to resample a grid to a new shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResampleMethod {
    /// Copy the nearest source cell.
    #[default]
    Nearest,
    /// Bilinear interpolation (2D grids only).
    Bilinear,
}

impl ResampleMethod {
    /// Parse from string (case-insensitive). Unknown names fall back to nearest.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "bilinear" | "linear" => Self::Bilinear,
            _ => Self::Nearest,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Bilinear => "bilinear",
        }
    }
}

impl std::fmt::Display for ResampleMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GridEngineConfig::default();
        assert_eq!(config.null_sentinel, -99.0);
        assert_eq!(config.column_name, "code");
        assert_eq!(config.pyramid.min_dimension, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = GridEngineConfig {
            null_sentinel: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.null_sentinel = -999.0;
        config.column_name = "  ".to_string();
        assert!(config.validate().is_err());

        config.column_name = "facies".to_string();
        config.pyramid.max_levels = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: GridEngineConfig =
            serde_json::from_str(r#"{"null_sentinel": -999.25, "pyramid": {"max_levels": 3}}"#)
                .unwrap();
        assert_eq!(config.null_sentinel, -999.25);
        assert_eq!(config.column_name, "code");
        assert_eq!(config.pyramid.max_levels, 3);
        assert_eq!(config.pyramid.min_dimension, 4);
        assert_eq!(config.resample_method, ResampleMethod::Nearest);
    }

    #[test]
    fn test_resample_method_parse() {
        assert_eq!(ResampleMethod::from_str("BILINEAR"), ResampleMethod::Bilinear);
        assert_eq!(ResampleMethod::from_str("nearest"), ResampleMethod::Nearest);
        assert_eq!(ResampleMethod::from_str("cubic"), ResampleMethod::Nearest);
        assert_eq!(ResampleMethod::Bilinear.to_string(), "bilinear");
    }
}
