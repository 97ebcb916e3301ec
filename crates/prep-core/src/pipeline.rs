// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Prep — Pipeline
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Pipeline driver: converts a whole source set into driver form.

use crate::convert::convert_variable;
use crate::grid::GridContext;
use ndarray::{concatenate, Array2, Axis};
use prep_types::catalog::{SetKind, VariableSet, INDEPENDENT_NAMES};
use prep_types::config::PrepSettings;
use prep_types::error::{PrepError, PrepResult};
use prep_types::variable::Values;

/// Convert every populated, source-tagged variable of `source` onto
/// the canonical grid and into driver units.
///
/// The independent coordinates are copied as-is, except that the
/// boundary grid gets a zero origin row prepended. Dependent
/// variables absent from the source are silently omitted; conversion
/// order between them does not matter. The grid context is fully
/// constructed before the first conversion.
pub fn convert_inputs(source: &VariableSet, settings: &PrepSettings) -> PrepResult<VariableSet> {
    if source.kind() != SetKind::Input {
        return Err(PrepError::ConfigError(
            "convert_inputs requires an input-kind variable set".to_string(),
        ));
    }

    let grid = GridContext::from_set(source, settings.input_points)?;
    let mut dest = VariableSet::input();

    // Independent coordinates carry over unconverted.
    dest.replace("time", source.get("time")?.clone())?;
    dest.replace("x", source.get("x")?.clone())?;

    // The boundary grid gains the magnetic-axis origin row.
    let mut xb = source.get("xb")?.clone();
    let xb_values = xb
        .profile()
        .ok_or_else(|| PrepError::MissingVariable("xb".to_string()))?;
    let origin_row = Array2::zeros((1, grid.n_times));
    let with_origin = concatenate(Axis(0), &[origin_row.view(), xb_values.view()])
        .map_err(|e| PrepError::InvalidValues {
            name: "xb".to_string(),
            reason: e.to_string(),
        })?;
    xb.set(Values::Profile(with_origin), None, None, true, settings)?;
    dest.replace("xb", xb)?;

    // Dependent variables: convert everything tagged and populated.
    for name in source.tagged() {
        if INDEPENDENT_NAMES.contains(&name) {
            continue;
        }
        let var = source.get(name)?;
        if !var.is_set() {
            continue;
        }
        let mut converted = convert_variable(var, &grid, settings)?;
        // Resolve any missing-data markers before the values can
        // reach the driver.
        converted.remove_nan();
        dest.replace(name, converted)?;
    }

    Ok(dest)
}
