// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Prep — Variable
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! A named physical quantity with units, axis labels and values.
//!
//! Values are one of three shapes: a scalar, a 1-D time trace, or a
//! `[radius, time]` profile. Anything else is unrepresentable, which
//! replaces the runtime "must be a numeric array" check of older
//! tooling with a compile-time guarantee.

use crate::config::PrepSettings;
use crate::constants::GRADIENT_ORIGIN_EPSILON;
use crate::error::{PrepError, PrepResult};
use ndarray::{Array1, Array2};
use prep_math::gaussian::smooth_radial;

/// Label naming the coordinate array that governs a value axis.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AxisLabel {
    /// No axis (scalar quantities, or axis metadata absent).
    #[default]
    None,
    /// Native radial grid.
    X,
    /// Boundary (surface) grid.
    Xb,
    /// Time samples.
    Time,
    /// Alternate time base; treated as `Time`.
    Time3,
    /// Major-radius grid, mirrored about the magnetic axis.
    Rmajm,
    /// Anything this pipeline does not recognise.
    Other(String),
}

impl AxisLabel {
    /// Parse a dimension string as attached by the source-file reader.
    pub fn parse(s: &str) -> AxisLabel {
        match s {
            "" => AxisLabel::None,
            "X" => AxisLabel::X,
            "XB" => AxisLabel::Xb,
            "TIME" => AxisLabel::Time,
            "TIME3" => AxisLabel::Time3,
            "RMAJM" => AxisLabel::Rmajm,
            other => AxisLabel::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AxisLabel::None => "",
            AxisLabel::X => "X",
            AxisLabel::Xb => "XB",
            AxisLabel::Time => "TIME",
            AxisLabel::Time3 => "TIME3",
            AxisLabel::Rmajm => "RMAJM",
            AxisLabel::Other(s) => s,
        }
    }

    /// True for either time base.
    pub fn is_time(&self) -> bool {
        matches!(self, AxisLabel::Time | AxisLabel::Time3)
    }
}

/// Variable payload: scalar, time trace, or `[radius, time]` profile.
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    Scalar(f64),
    Time(Array1<f64>),
    Profile(Array2<f64>),
}

impl Values {
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Values::Scalar(_) => vec![],
            Values::Time(v) => vec![v.len()],
            Values::Profile(v) => vec![v.nrows(), v.ncols()],
        }
    }
}

/// A named physical quantity container.
///
/// Created empty by the catalog; populated by the source-file reader
/// or by a calculation stage. A `Variable` without values is treated
/// as absent and skipped by all consuming stages.
#[derive(Debug, Clone)]
pub struct Variable {
    name: &'static str,
    source_tag: Option<&'static str>,
    smoothing_width: Option<usize>,
    label: &'static str,
    units: String,
    dims: [AxisLabel; 2],
    values: Option<Values>,
}

impl Variable {
    pub fn new(name: &'static str) -> Self {
        Variable {
            name,
            source_tag: None,
            smoothing_width: None,
            label: "",
            units: String::new(),
            dims: [AxisLabel::None, AxisLabel::None],
            values: None,
        }
    }

    /// External-format identifier; absent for derived quantities.
    pub fn with_tag(mut self, tag: &'static str) -> Self {
        self.source_tag = Some(tag);
        self
    }

    /// Gaussian smoothing width along the radial axis.
    pub fn with_smoothing(mut self, width: usize) -> Self {
        self.smoothing_width = Some(width);
        self
    }

    /// Plot label in LaTeX format.
    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    pub fn with_units(mut self, units: &str) -> Self {
        self.units = units.to_string();
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn source_tag(&self) -> Option<&'static str> {
        self.source_tag
    }

    pub fn smoothing_width(&self) -> Option<usize> {
        self.smoothing_width
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn dims(&self) -> &[AxisLabel; 2] {
        &self.dims
    }

    /// Label of the first (radial) axis.
    pub fn xdim(&self) -> &AxisLabel {
        &self.dims[0]
    }

    pub fn values(&self) -> Option<&Values> {
        self.values.as_ref()
    }

    /// A variable without values is absent from the dataset.
    pub fn is_set(&self) -> bool {
        self.values.is_some()
    }

    /// Profile payload, if the variable holds one.
    pub fn profile(&self) -> Option<&Array2<f64>> {
        match &self.values {
            Some(Values::Profile(v)) => Some(v),
            _ => None,
        }
    }

    /// Time-trace payload, if the variable holds one.
    pub fn time_trace(&self) -> Option<&Array1<f64>> {
        match &self.values {
            Some(Values::Time(v)) => Some(v),
            _ => None,
        }
    }

    /// Assign values and, optionally, units and axis labels.
    ///
    /// Unless `smooth` is false, Gaussian smoothing is applied along
    /// the radial axis afterwards. Empty arrays are rejected.
    pub fn set(
        &mut self,
        values: Values,
        units: Option<&str>,
        dims: Option<[AxisLabel; 2]>,
        smooth: bool,
        settings: &PrepSettings,
    ) -> PrepResult<()> {
        match &values {
            Values::Time(v) if v.is_empty() => {
                return Err(PrepError::InvalidValues {
                    name: self.name.to_string(),
                    reason: "empty time trace".to_string(),
                });
            }
            Values::Profile(v) if v.nrows() == 0 || v.ncols() == 0 => {
                return Err(PrepError::InvalidValues {
                    name: self.name.to_string(),
                    reason: format!("empty profile of shape [{}, {}]", v.nrows(), v.ncols()),
                });
            }
            _ => {}
        }

        self.values = Some(values);
        if let Some(units) = units {
            self.units = units.to_string();
        }
        if let Some(dims) = dims {
            self.dims = dims;
        }
        if smooth {
            self.apply_smoothing(settings);
        }
        Ok(())
    }

    /// Gaussian filter with the configured width along the radial
    /// axis, leaving the time axis unfiltered (sigma `(width, 0)`).
    ///
    /// No-op when smoothing is disabled, no width is configured, or
    /// the payload has no radial axis.
    pub fn apply_smoothing(&mut self, settings: &PrepSettings) {
        if !settings.apply_smoothing {
            return;
        }
        let Some(width) = self.smoothing_width else {
            return;
        };
        if width == 0 {
            return;
        }
        if let Some(Values::Profile(v)) = &self.values {
            self.values = Some(Values::Profile(smooth_radial(v.view(), width as f64)));
        }
    }

    /// Clip all values to `[-limit, limit]`, then force the origin row
    /// to a small positive epsilon instead of zero.
    pub fn clamp_gradient(&mut self, limit: f64) -> PrepResult<()> {
        match &mut self.values {
            Some(Values::Profile(v)) => {
                v.mapv_inplace(|x| x.clamp(-limit, limit));
                for x in v.row_mut(0) {
                    *x = GRADIENT_ORIGIN_EPSILON;
                }
                Ok(())
            }
            _ => Err(PrepError::MissingVariable(self.name.to_string())),
        }
    }

    /// Mark values farther than `threshold_std` standard deviations
    /// from the mean as missing (NaN). Returns the number rejected.
    ///
    /// Missing entries propagate through smoothing and interpolation
    /// as NaN and must be resolved by [`Variable::remove_nan`] before
    /// the data reaches the driver. Zero-variance arrays reject
    /// nothing.
    pub fn reject_outliers(&mut self, threshold_std: f64, settings: &PrepSettings) -> usize {
        if !settings.remove_outliers {
            return 0;
        }
        let Some(Values::Profile(v)) = &mut self.values else {
            return 0;
        };
        let n = v.len() as f64;
        let mean = v.sum() / n;
        let std = (v.mapv(|x| (x - mean) * (x - mean)).sum() / n).sqrt();
        if std == 0.0 {
            return 0;
        }

        let mut rejected = 0;
        v.mapv_inplace(|x| {
            if (x - mean).abs() > threshold_std * std {
                rejected += 1;
                f64::NAN
            } else {
                x
            }
        });
        if rejected > 0 {
            log::info!(
                "rejected {} outlier(s) beyond {} sigma for {}",
                rejected,
                threshold_std,
                self.name
            );
        }
        rejected
    }

    /// Replace NaN entries with zero, emitting a diagnostic naming the
    /// variable. Returns the number replaced. Last-resort sanitization
    /// before values are handed to the driver.
    pub fn remove_nan(&mut self) -> usize {
        let mut replaced = 0;
        let mut fix = |x: f64| {
            if x.is_nan() {
                replaced += 1;
                0.0
            } else {
                x
            }
        };
        match &mut self.values {
            Some(Values::Scalar(v)) => *v = fix(*v),
            Some(Values::Time(v)) => v.mapv_inplace(&mut fix),
            Some(Values::Profile(v)) => v.mapv_inplace(&mut fix),
            None => {}
        }
        if replaced > 0 {
            log::warn!("nan values found for variable {}", self.name);
        }
        replaced
    }
}
