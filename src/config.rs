use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct MatchingConfig {
    /// Minimum Jaccard score for a confident match, in [0, 1].
    pub threshold: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self { threshold: 0.40 }
    }
}

/// Which source rows the engine processes. Rows outside the window pass
/// through to the output untouched.
#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct WindowConfig {
    pub start: usize,
    /// One past the last row to process; `None` means the full table.
    pub end: Option<usize>,
}

impl WindowConfig {
    pub fn resolve(&self, row_count: usize) -> RowWindow {
        let end = self.end.unwrap_or(row_count).min(row_count);
        RowWindow {
            start: self.start.min(end),
            end,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowWindow {
    pub start: usize,
    pub end: usize,
}

impl RowWindow {
    pub fn contains(&self, row: usize) -> bool {
        (self.start..self.end).contains(&row)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct ExportConfig {
    pub out_path: Option<String>,
    pub format: Option<String>, // csv|xlsx|both
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            out_path: None,
            format: Some("csv".into()),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct AppConfig {
    pub source_path: String,
    pub registry_path: String,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source_path.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "source_path",
            });
        }
        if self.registry_path.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "registry_path",
            });
        }
        if !(0.0..=1.0).contains(&self.matching.threshold) {
            return Err(ConfigError::InvalidValue {
                field: "matching.threshold",
                reason: format!("{} not in 0..=1", self.matching.threshold),
            });
        }
        if let Some(end) = self.window.end {
            if end < self.window.start {
                return Err(ConfigError::InvalidValue {
                    field: "window.end",
                    reason: format!("{} is before window.start {}", end, self.window.start),
                });
            }
        }
        if let Some(ref fmt) = self.export.format {
            match fmt.as_str() {
                "csv" | "xlsx" | "both" => {}
                other => {
                    return Err(ConfigError::InvalidValue {
                        field: "export.format",
                        reason: format!("unsupported: {}", other),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> AppConfig {
        AppConfig {
            source_path: "transactions.csv".into(),
            registry_path: "registry.csv".into(),
            ..Default::default()
        }
    }

    #[test]
    fn default_threshold_is_forty_percent() {
        let cfg = valid();
        assert!((cfg.matching.threshold - 0.40).abs() < f64::EPSILON);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let mut cfg = valid();
        cfg.matching.threshold = 1.5;
        assert!(cfg.validate().is_err());
        cfg.matching.threshold = -0.1;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_inverted_window() {
        let mut cfg = valid();
        cfg.window.start = 10;
        cfg.window.end = Some(5);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_unknown_format() {
        let mut cfg = valid();
        cfg.export.format = Some("parquet".into());
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn window_resolution_clamps_to_table() {
        let w = WindowConfig {
            start: 2,
            end: Some(100),
        };
        let rw = w.resolve(10);
        assert_eq!(rw, RowWindow { start: 2, end: 10 });
        assert!(rw.contains(2));
        assert!(rw.contains(9));
        assert!(!rw.contains(10));

        let full = WindowConfig::default().resolve(10);
        assert_eq!(full, RowWindow { start: 0, end: 10 });
    }
}
