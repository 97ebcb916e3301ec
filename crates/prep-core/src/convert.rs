// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Prep — Convert
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Per-variable unit and grid normalization.
//!
//! Takes one source variable with native units and axis labels and
//! produces a copy in driver units on the canonical
//! `[boundary_with_origin, time]` grid. Reshaping all profile
//! variables onto a common grid lets the downstream calculation
//! stages vectorize over whole arrays.

use crate::grid::GridContext;
use crate::units::normalize_units;
use ndarray::{Array2, Axis};
use prep_math::spline::interp_columns;
use prep_types::config::PrepSettings;
use prep_types::constants::DEFAULT_OUTLIER_STD;
use prep_types::error::{PrepError, PrepResult};
use prep_types::variable::{AxisLabel, Values, Variable};

/// Convert one source variable into driver form.
///
/// Step 1 rescales units per the conversion table with smoothing
/// suppressed. Step 2 reshapes onto the canonical grid, dispatched on
/// the first-axis label, and assigns the result through the smoothing
/// path. An unrecognised axis label is a soft failure: the variable is
/// passed through unconverted with a warning.
pub fn convert_variable(
    source: &Variable,
    grid: &GridContext,
    settings: &PrepSettings,
) -> PrepResult<Variable> {
    let mut var = source.clone();

    if !var.is_set() {
        return Err(PrepError::MissingVariable(var.name().to_string()));
    }

    // Optional outlier rejection happens before any numeric transform
    // can smear the outliers into their neighbours.
    var.reject_outliers(DEFAULT_OUTLIER_STD, settings);

    // Step 1: unit normalization (pure rescale, no smoothing).
    if let Some((target, factor)) = normalize_units(var.units()) {
        let scaled = match var.values() {
            Some(Values::Scalar(v)) => Values::Scalar(v * factor),
            Some(Values::Time(v)) => Values::Time(v.mapv(|x| x * factor)),
            Some(Values::Profile(v)) => Values::Profile(v.mapv(|x| x * factor)),
            None => unreachable!("checked above"),
        };
        var.set(scaled, Some(target), None, false, settings)?;
    }

    // Step 2: reshape onto [boundary_with_origin, time], assigned
    // through the smoothing path.
    if let Some(reshaped) = reshape_values(&var, grid)? {
        var.set(reshaped, None, None, true, settings)?;
    }

    Ok(var)
}

/// Reshape dispatch on the first-axis label. Returns `None` when the
/// variable is to be kept as-is (scalars, unlabeled variables, and
/// the unrecognised-axis soft failure).
fn reshape_values(var: &Variable, grid: &GridContext) -> PrepResult<Option<Values>> {
    match (var.xdim(), var.values()) {
        // Scalars and unlabeled variables pass through unchanged.
        (_, Some(Values::Scalar(_))) | (AxisLabel::None, _) => Ok(None),

        // Time-only traces are tiled across the radial axis: every
        // radial point shares the same time value.
        (label, Some(Values::Time(trace))) if label.is_time() => {
            if trace.len() != grid.n_times {
                return Err(PrepError::ShapeMismatch {
                    name: var.name().to_string(),
                    expected: format!("[{}]", grid.n_times),
                    found: format!("[{}]", trace.len()),
                });
            }
            let tiled = Array2::from_shape_fn((grid.n_boundary, grid.n_times), |(_, j)| trace[j]);
            Ok(Some(Values::Profile(tiled)))
        }

        // Mirrored-radius variables carry both signs of the minor
        // radius; keep the non-negative half. A known simplification,
        // not a general treatment of the mirrored grid.
        (AxisLabel::Rmajm, Some(Values::Profile(profile))) => {
            let expected = 2 * grid.n_boundary - 1;
            if profile.nrows() != expected {
                return Err(PrepError::ShapeMismatch {
                    name: var.name().to_string(),
                    expected: format!("[{expected}, {}]", grid.n_times),
                    found: format!("[{}, {}]", profile.nrows(), profile.ncols()),
                });
            }
            let half = profile
                .slice_axis(Axis(0), (grid.n_boundary - 1..).into())
                .to_owned();
            Ok(Some(Values::Profile(half)))
        }

        // Profiles on the native X or XB grid are spline-regridded
        // onto the boundary grid with origin, one time column at a
        // time.
        (label @ (AxisLabel::X | AxisLabel::Xb), Some(Values::Profile(profile))) => {
            let axis = match label {
                AxisLabel::X => &grid.x,
                _ => &grid.xb,
            };
            if profile.nrows() != axis.len() || profile.ncols() != grid.n_times {
                return Err(PrepError::ShapeMismatch {
                    name: var.name().to_string(),
                    expected: format!("[{}, {}]", axis.len(), grid.n_times),
                    found: format!("[{}, {}]", profile.nrows(), profile.ncols()),
                });
            }
            let regridded = interp_columns(axis.view(), profile.view(), grid.xb_with_origin.view())
                .map_err(|e| PrepError::InvalidValues {
                    name: var.name().to_string(),
                    reason: e.to_string(),
                })?;
            Ok(Some(Values::Profile(regridded)))
        }

        // Soft failure: leave the variable unconverted and continue.
        (label, _) => {
            log::warn!(
                "unsupported axis label {} for variable {}; left unconverted",
                label.as_str(),
                var.name()
            );
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use prep_types::catalog::VariableSet;

    fn grid() -> GridContext {
        GridContext {
            x: array![0.1, 0.3, 0.5, 0.7, 0.9],
            xb: array![0.2, 0.4, 0.6, 0.8, 1.0],
            xb_with_origin: array![0.0, 0.2, 0.4, 0.6, 0.8, 1.0],
            n_interp: 6,
            n_boundary: 6,
            n_times: 3,
        }
    }

    fn settings() -> PrepSettings {
        PrepSettings {
            apply_smoothing: false,
            ..PrepSettings::default()
        }
    }

    fn var_with(values: Values, units: &str, xdim: AxisLabel) -> Variable {
        let mut var = Variable::new("Test Variable");
        var.set(
            values,
            Some(units),
            Some([xdim, AxisLabel::Time]),
            false,
            &settings(),
        )
        .unwrap();
        var
    }

    #[test]
    fn test_unit_rescale_cm_to_m() {
        let var = var_with(Values::Profile(array![[100.0]]), "CM", AxisLabel::None);
        let grid = GridContext {
            n_times: 1,
            ..grid()
        };
        let out = convert_variable(&var, &grid, &settings()).unwrap();
        assert_eq!(out.units(), "M");
        assert!((out.profile().unwrap()[[0, 0]] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_unit_pass_through() {
        let var = var_with(Values::Scalar(42.0), "TESLA", AxisLabel::None);
        let out = convert_variable(&var, &grid(), &settings()).unwrap();
        assert_eq!(out.units(), "TESLA");
        assert_eq!(out.values(), Some(&Values::Scalar(42.0)));
    }

    #[test]
    fn test_time_trace_tiled() {
        let var = var_with(Values::Time(array![1.0, 2.0, 3.0]), "", AxisLabel::Time);
        let out = convert_variable(&var, &grid(), &settings()).unwrap();
        let p = out.profile().unwrap();
        assert_eq!(p.dim(), (6, 3));
        for i in 0..6 {
            assert_eq!(p[[i, 0]], 1.0);
            assert_eq!(p[[i, 1]], 2.0);
            assert_eq!(p[[i, 2]], 3.0);
        }
    }

    #[test]
    fn test_time3_treated_as_time() {
        let var = var_with(Values::Time(array![4.0, 5.0, 6.0]), "", AxisLabel::Time3);
        let out = convert_variable(&var, &grid(), &settings()).unwrap();
        assert_eq!(out.profile().unwrap().dim(), (6, 3));
    }

    #[test]
    fn test_tiled_trace_length_checked() {
        let var = var_with(Values::Time(array![1.0, 2.0]), "", AxisLabel::Time);
        let err = convert_variable(&var, &grid(), &settings()).unwrap_err();
        assert!(matches!(err, PrepError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_mirrored_radius_takes_upper_half() {
        // 2 * n_boundary - 1 = 11 native rows.
        let profile = Array2::from_shape_fn((11, 3), |(i, _)| i as f64);
        let var = var_with(Values::Profile(profile), "", AxisLabel::Rmajm);
        let out = convert_variable(&var, &grid(), &settings()).unwrap();
        let p = out.profile().unwrap();
        assert_eq!(p.dim(), (6, 3));
        assert_eq!(p[[0, 0]], 5.0, "first kept row is the axis row");
        assert_eq!(p[[5, 0]], 10.0);
    }

    #[test]
    fn test_xb_profile_regridded() {
        let grid = grid();
        // Quadratic in the boundary coordinate, constant in time.
        let profile = Array2::from_shape_fn((5, 3), |(i, _)| {
            let s = grid.xb[i];
            s * s
        });
        let var = var_with(Values::Profile(profile), "", AxisLabel::Xb);
        let out = convert_variable(&var, &grid, &settings()).unwrap();
        let p = out.profile().unwrap();
        assert_eq!(p.dim(), (6, 3));
        // Rows that coincide with source knots are reproduced exactly.
        for k in 0..5 {
            let s = grid.xb[k];
            assert!((p[[k + 1, 0]] - s * s).abs() < 1e-10);
        }
    }

    #[test]
    fn test_x_profile_shape_checked() {
        let profile = Array2::from_elem((4, 3), 1.0); // x has 5 rows
        let var = var_with(Values::Profile(profile), "", AxisLabel::X);
        let err = convert_variable(&var, &grid(), &settings()).unwrap_err();
        assert!(matches!(err, PrepError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_unrecognised_axis_passes_through() {
        let profile = Array2::from_elem((7, 3), 2.0);
        let var = var_with(
            Values::Profile(profile.clone()),
            "",
            AxisLabel::Other("THETA".to_string()),
        );
        let out = convert_variable(&var, &grid(), &settings()).unwrap();
        assert_eq!(out.profile().unwrap(), &profile);
    }

    #[test]
    fn test_degenerate_source_grid_is_an_error() {
        // A repeated boundary coordinate cannot serve as spline knots;
        // the failure must name the variable, not panic.
        let bad_grid = GridContext {
            xb: array![0.2, 0.4, 0.4, 0.8, 1.0],
            ..grid()
        };
        let profile = Array2::from_elem((5, 3), 1.0);
        let var = var_with(Values::Profile(profile), "", AxisLabel::Xb);
        let err = convert_variable(&var, &bad_grid, &settings()).unwrap_err();
        match err {
            PrepError::InvalidValues { name, reason } => {
                assert_eq!(name, "Test Variable");
                assert!(reason.contains("strictly increasing"), "{reason}");
            }
            other => panic!("expected InvalidValues, got {other:?}"),
        }
    }

    #[test]
    fn test_unset_variable_is_an_error() {
        let set = VariableSet::input();
        let err = convert_variable(set.get("te").unwrap(), &grid(), &settings()).unwrap_err();
        assert!(matches!(err, PrepError::MissingVariable(_)));
    }

    #[test]
    fn test_smoothing_applied_on_reshape_only() {
        // A spiked XB profile with smoothing enabled: the unit rescale
        // must not smooth, the reshape must.
        let smooth_on = PrepSettings::default();
        let mut profile = Array2::zeros((5, 3));
        profile[[2, 0]] = 100.0; // CM
        let mut var = Variable::new("Test Variable").with_smoothing(1);
        var.set(
            Values::Profile(profile),
            Some("CM"),
            Some([AxisLabel::Xb, AxisLabel::Time]),
            false,
            &settings(),
        )
        .unwrap();

        let out = convert_variable(&var, &grid(), &smooth_on).unwrap();
        assert_eq!(out.units(), "M");
        let p = out.profile().unwrap();
        // The spike was rescaled to 1.0, regridded, then spread by the
        // Gaussian filter; the peak must sit strictly below 1.0.
        let peak = p.column(0).iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert!(peak < 1.0, "peak {peak} should be below the rescaled spike");
        assert!(peak > 0.0);
    }
}
