// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Prep — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Run configuration.
//!
//! `PrepSettings` carries the behavior toggles and is threaded
//! explicitly into every conversion call; pipeline behavior is fully
//! determined by its inputs. `RunOptions` holds per-run bookkeeping
//! taken from the command surface: which source file, which
//! measurement time, and an optional variable scan.

use crate::error::{PrepError, PrepResult};
use crate::variable::Variable;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Behavior toggles and the target interpolation point count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepSettings {
    /// Apply Gaussian smoothing to variables with a configured width.
    #[serde(default = "default_true")]
    pub apply_smoothing: bool,
    /// Mark values beyond the outlier threshold as missing.
    #[serde(default)]
    pub remove_outliers: bool,
    /// Target interpolation point count. When absent, the native
    /// boundary-grid size is used (regridding without resampling).
    #[serde(default)]
    pub input_points: Option<usize>,
}

fn default_true() -> bool {
    true
}

impl Default for PrepSettings {
    fn default() -> Self {
        PrepSettings {
            apply_smoothing: true,
            remove_outliers: false,
            input_points: None,
        }
    }
}

impl PrepSettings {
    /// Load settings from a JSON file.
    pub fn from_file(path: &str) -> PrepResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&contents)?;
        Ok(settings)
    }
}

/// Machine that produced the referenced shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShotType {
    #[default]
    None,
    Nstx,
    NstxU,
    DiiiD,
    Mast,
}

/// Per-run options: source identification, measurement time, and an
/// optional variable scan.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub source_name: String,
    pub shot_type: ShotType,
    /// Requested measurement time; the nearest sample is used.
    pub input_time: Option<f64>,
    runid: Option<String>,
    time_idx: Option<usize>,
    time: Option<String>,
    var_to_scan: Option<String>,
    scan_range: Option<Array1<f64>>,
    scan_factor: Option<String>,
}

impl RunOptions {
    pub fn new(source_name: &str, shot_type: ShotType) -> Self {
        RunOptions {
            source_name: source_name.to_string(),
            shot_type,
            input_time: None,
            runid: None,
            time_idx: None,
            time: None,
            var_to_scan: None,
            scan_range: None,
            scan_factor: None,
        }
    }

    pub fn runid(&self) -> Option<&str> {
        self.runid.as_deref()
    }

    /// Record the run id reported by the source file. A mismatch with
    /// the source name is suspicious but not fatal.
    pub fn set_runid(&mut self, runid: &str) {
        let runid = runid.trim().to_string();
        if runid != self.source_name {
            log::warn!(
                "runid {} does not match source name {}",
                runid,
                self.source_name
            );
        }
        self.runid = Some(runid);
    }

    pub fn time_idx(&self) -> Option<usize> {
        self.time_idx
    }

    /// Measurement time actually selected, formatted for display.
    pub fn time(&self) -> Option<&str> {
        self.time.as_deref()
    }

    /// Select the measurement sample closest to the requested time.
    pub fn set_measurement_time(&mut self, time_var: &Variable) -> PrepResult<()> {
        let requested = self.input_time.ok_or_else(|| {
            PrepError::ConfigError("no measurement time requested".to_string())
        })?;
        let samples = time_var
            .time_trace()
            .ok_or_else(|| PrepError::MissingVariable(time_var.name().to_string()))?;

        let mut best = 0;
        for (i, &t) in samples.iter().enumerate() {
            if (t - requested).abs() < (samples[best] - requested).abs() {
                best = i;
            }
        }
        self.time_idx = Some(best);
        self.time = Some(format!("{:.3}", samples[best]));
        Ok(())
    }

    pub fn var_to_scan(&self) -> Option<&str> {
        self.var_to_scan.as_deref()
    }

    pub fn scan_range(&self) -> Option<&Array1<f64>> {
        self.scan_range.as_ref()
    }

    /// Configure a variable scan. The scanned name must exist in the
    /// input catalog and the range must be non-empty.
    pub fn set_scan_values(&mut self, var_to_scan: &str, scan_range: Array1<f64>) -> PrepResult<()> {
        crate::catalog::VariableSet::input().get(var_to_scan)?;
        if scan_range.is_empty() {
            return Err(PrepError::ConfigError(
                "scan range must not be empty".to_string(),
            ));
        }
        self.var_to_scan = Some(var_to_scan.to_string());
        self.scan_range = Some(scan_range);
        Ok(())
    }

    pub fn scan_factor(&self) -> Option<&str> {
        self.scan_factor.as_deref()
    }

    pub fn set_scan_factor(&mut self, factor: f64) {
        self.scan_factor = Some(format!("{factor:.3}"));
    }
}
