//! Unit normalization table.
//!
//! Source files tag quantities with CGS-flavoured units; the driver
//! expects the SI-like forms below. Matching is exact and
//! case-sensitive on the source string; anything outside the table
//! passes through unchanged. Rescaling is pure and never triggers
//! smoothing.

/// One row of the conversion table.
#[derive(Debug, Clone, Copy)]
pub struct UnitConversion {
    pub source: &'static str,
    pub factor: f64,
    pub target: &'static str,
}

/// The full conversion table; first match wins.
pub const UNIT_TABLE: [UnitConversion; 6] = [
    UnitConversion {
        source: "CM",
        factor: 1e-2,
        target: "M",
    },
    UnitConversion {
        source: "CM/SEC",
        factor: 1e-2,
        target: "M/SEC",
    },
    UnitConversion {
        source: "N/CM**3",
        factor: 1e6,
        target: "N/M**3",
    },
    UnitConversion {
        source: "EV",
        factor: 1e-3,
        target: "kEV",
    },
    UnitConversion {
        source: "CM**2/SEC",
        factor: 1e-4,
        target: "M**2/SEC",
    },
    UnitConversion {
        source: "AMPS",
        factor: 1e-6,
        target: "MAMPS",
    },
];

/// Look up the rescale factor and target unit for a source unit.
/// Returns `None` for units already in driver form.
pub fn normalize_units(units: &str) -> Option<(&'static str, f64)> {
    UNIT_TABLE
        .iter()
        .find(|c| c.source == units)
        .map(|c| (c.target, c.factor))
}
