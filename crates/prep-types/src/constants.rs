// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Prep — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

/// Value forced into the origin row after gradient clamping.
///
/// Gradients at the magnetic axis are physically near-zero, but an
/// exactly-zero value breaks downstream ratio calculations.
pub const GRADIENT_ORIGIN_EPSILON: f64 = 1e-6;

/// Default rejection threshold for outlier removal, in standard
/// deviations from the mean.
pub const DEFAULT_OUTLIER_STD: f64 = 4.0;
