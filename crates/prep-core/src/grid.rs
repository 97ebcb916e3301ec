// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Prep — Grid
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Precomputed radial coordinate arrays shared by all conversions.

use ndarray::Array1;
use prep_types::catalog::VariableSet;
use prep_types::error::{PrepError, PrepResult};

/// 1-D coordinate arrays and point counts, derived once per run from
/// the independent variables and read-only afterwards.
///
/// Grids are assumed time-invariant in shape; only the first time
/// column is used to build the coordinate axes.
#[derive(Debug, Clone)]
pub struct GridContext {
    /// Native radial grid (first time column of `x`).
    pub x: Array1<f64>,
    /// Native boundary grid (first time column of `xb`).
    pub xb: Array1<f64>,
    /// Boundary grid with the magnetic-axis origin prepended.
    pub xb_with_origin: Array1<f64>,
    /// Interpolation target point count; never below `n_boundary`.
    pub n_interp: usize,
    /// Points in the boundary grid with origin.
    pub n_boundary: usize,
    /// Time samples in the source set.
    pub n_times: usize,
}

impl GridContext {
    /// Build the grid context from the independent variables of a
    /// source set. Fails if `x`, `xb` or `time` is unset, or if the
    /// time axis of `x` disagrees with the time array.
    pub fn from_set(vars: &VariableSet, requested_points: Option<usize>) -> PrepResult<Self> {
        let x = vars
            .get("x")?
            .profile()
            .ok_or_else(|| PrepError::MissingVariable("x".to_string()))?;
        let xb = vars
            .get("xb")?
            .profile()
            .ok_or_else(|| PrepError::MissingVariable("xb".to_string()))?;
        let time = vars
            .get("time")?
            .time_trace()
            .ok_or_else(|| PrepError::MissingVariable("time".to_string()))?;

        let n_times = time.len();
        if x.ncols() != n_times {
            return Err(PrepError::ShapeMismatch {
                name: "x".to_string(),
                expected: format!("[_, {n_times}]"),
                found: format!("[{}, {}]", x.nrows(), x.ncols()),
            });
        }

        let x_axis = x.column(0).to_owned();
        let xb_axis = xb.column(0).to_owned();
        check_strictly_increasing("x", x_axis.view())?;
        check_strictly_increasing("xb", xb_axis.view())?;
        let mut xb_with_origin = Array1::zeros(xb_axis.len() + 1);
        xb_with_origin.slice_mut(ndarray::s![1..]).assign(&xb_axis);

        let n_boundary = xb_with_origin.len();
        let requested = requested_points.unwrap_or(n_boundary);
        if requested < n_boundary {
            log::warn!(
                "requested interpolation points ({requested}) below the native boundary count ({n_boundary}); using {n_boundary}"
            );
        }

        Ok(GridContext {
            x: x_axis,
            xb: xb_axis,
            xb_with_origin,
            n_interp: requested.max(n_boundary),
            n_boundary,
            n_times,
        })
    }
}

/// Radial coordinates double as spline knots, so repeated or reversed
/// points make every regrid in the run ill-posed.
fn check_strictly_increasing(name: &str, axis: ndarray::ArrayView1<f64>) -> PrepResult<()> {
    for i in 1..axis.len() {
        if axis[i] <= axis[i - 1] {
            return Err(PrepError::InvalidValues {
                name: name.to_string(),
                reason: format!(
                    "coordinate not strictly increasing: [{i}] = {} <= [{}] = {}",
                    axis[i],
                    i - 1,
                    axis[i - 1]
                ),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};
    use prep_types::config::PrepSettings;
    use prep_types::variable::{AxisLabel, Values};

    fn populated_set() -> VariableSet {
        let settings = PrepSettings::default();
        let mut set = VariableSet::input();
        set.get_mut("time")
            .unwrap()
            .set(
                Values::Time(array![0.1, 0.2, 0.3]),
                Some("SECONDS"),
                None,
                false,
                &settings,
            )
            .unwrap();
        set.get_mut("x")
            .unwrap()
            .set(
                Values::Profile(Array2::from_shape_fn((5, 3), |(i, _)| 0.1 + 0.2 * i as f64)),
                None,
                Some([AxisLabel::X, AxisLabel::Time]),
                false,
                &settings,
            )
            .unwrap();
        set.get_mut("xb")
            .unwrap()
            .set(
                Values::Profile(Array2::from_shape_fn((5, 3), |(i, _)| 0.2 * (i + 1) as f64)),
                None,
                Some([AxisLabel::Xb, AxisLabel::Time]),
                false,
                &settings,
            )
            .unwrap();
        set
    }

    #[test]
    fn test_grid_context_construction() {
        let grid = GridContext::from_set(&populated_set(), Some(5)).unwrap();
        assert_eq!(grid.xb.len(), 5);
        assert_eq!(grid.xb_with_origin.len(), 6);
        assert_eq!(grid.xb_with_origin[0], 0.0);
        assert!((grid.xb_with_origin[1] - 0.2).abs() < 1e-12);
        assert!((grid.xb_with_origin[5] - 1.0).abs() < 1e-12);
        assert_eq!(grid.n_boundary, 6);
        assert_eq!(grid.n_times, 3);
        // Never fewer target points than the native boundary grid.
        assert_eq!(grid.n_interp, 6);
    }

    #[test]
    fn test_grid_context_default_points() {
        let grid = GridContext::from_set(&populated_set(), None).unwrap();
        assert_eq!(grid.n_interp, grid.n_boundary);
    }

    #[test]
    fn test_grid_context_requested_points() {
        let grid = GridContext::from_set(&populated_set(), Some(200)).unwrap();
        assert_eq!(grid.n_interp, 200);
    }

    #[test]
    fn test_grid_context_missing_coordinate() {
        let mut set = populated_set();
        *set.get_mut("time").unwrap() = prep_types::variable::Variable::new("Time");
        let err = GridContext::from_set(&set, None).unwrap_err();
        assert!(matches!(err, PrepError::MissingVariable(_)));
    }

    #[test]
    fn test_grid_context_rejects_duplicate_boundary_point() {
        let settings = PrepSettings::default();
        let mut set = populated_set();
        let knots = [0.2, 0.4, 0.4, 0.8, 1.0];
        set.get_mut("xb")
            .unwrap()
            .set(
                Values::Profile(Array2::from_shape_fn((5, 3), |(i, _)| knots[i])),
                None,
                Some([AxisLabel::Xb, AxisLabel::Time]),
                false,
                &settings,
            )
            .unwrap();
        let err = GridContext::from_set(&set, None).unwrap_err();
        match err {
            PrepError::InvalidValues { name, reason } => {
                assert_eq!(name, "xb");
                assert!(reason.contains("strictly increasing"), "{reason}");
            }
            other => panic!("expected InvalidValues, got {other:?}"),
        }
    }

    #[test]
    fn test_grid_context_rejects_decreasing_radial_point() {
        let settings = PrepSettings::default();
        let mut set = populated_set();
        let knots = [0.1, 0.3, 0.25, 0.7, 0.9];
        set.get_mut("x")
            .unwrap()
            .set(
                Values::Profile(Array2::from_shape_fn((5, 3), |(i, _)| knots[i])),
                None,
                Some([AxisLabel::X, AxisLabel::Time]),
                false,
                &settings,
            )
            .unwrap();
        let err = GridContext::from_set(&set, None).unwrap_err();
        assert!(matches!(err, PrepError::InvalidValues { ref name, .. } if name == "x"));
    }

    #[test]
    fn test_grid_context_time_mismatch() {
        let settings = PrepSettings::default();
        let mut set = populated_set();
        set.get_mut("time")
            .unwrap()
            .set(
                Values::Time(array![0.1, 0.2]),
                None,
                None,
                false,
                &settings,
            )
            .unwrap();
        let err = GridContext::from_set(&set, None).unwrap_err();
        assert!(matches!(err, PrepError::ShapeMismatch { .. }));
    }
}
