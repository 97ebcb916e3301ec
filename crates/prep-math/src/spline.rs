// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Prep — Spline
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Natural cubic-spline interpolation with end-segment extrapolation.
//!
//! Used to regrid radial profiles from the native X/XB grids onto the
//! boundary grid with the origin point inserted. The origin lies below
//! the first boundary knot, so evaluation must extrapolate: outside the
//! knot range the cubic of the nearest end segment is extended.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use thiserror::Error;

/// A knot set that cannot support a spline fit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SplineError {
    #[error("spline needs at least 2 knots, got {count}")]
    TooFewKnots { count: usize },

    #[error("spline knots must be strictly increasing: x[{index}] = {value} <= x[{}] = {previous}", .index - 1)]
    NonMonotonicKnots {
        index: usize,
        value: f64,
        previous: f64,
    },
}

/// Natural cubic spline through strictly increasing knots.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    x: Array1<f64>,
    y: Array1<f64>,
    /// Second derivatives at the knots (zero at both ends).
    m: Array1<f64>,
}

impl CubicSpline {
    /// Fit a natural cubic spline.
    ///
    /// Fails if fewer than 2 knots are given or if `x` is not strictly
    /// increasing. Panics if `x` and `y` differ in length.
    pub fn new(x: ArrayView1<f64>, y: ArrayView1<f64>) -> Result<Self, SplineError> {
        let n = x.len();
        if n < 2 {
            return Err(SplineError::TooFewKnots { count: n });
        }
        assert_eq!(x.len(), y.len());
        for i in 1..n {
            if x[i] <= x[i - 1] {
                return Err(SplineError::NonMonotonicKnots {
                    index: i,
                    value: x[i],
                    previous: x[i - 1],
                });
            }
        }

        // Second-derivative system: identity rows at both ends give the
        // natural boundary condition M[0] = M[n-1] = 0.
        let mut sub = vec![0.0; n];
        let mut diag = vec![1.0; n];
        let mut sup = vec![0.0; n];
        let mut rhs = vec![0.0; n];
        for i in 1..n - 1 {
            let h0 = x[i] - x[i - 1];
            let h1 = x[i + 1] - x[i];
            sub[i] = h0;
            diag[i] = 2.0 * (h0 + h1);
            sup[i] = h1;
            rhs[i] = 6.0 * ((y[i + 1] - y[i]) / h1 - (y[i] - y[i - 1]) / h0);
        }
        let m = thomas(&sub, &diag, &sup, &rhs);

        Ok(CubicSpline {
            x: x.to_owned(),
            y: y.to_owned(),
            m: Array1::from(m),
        })
    }

    /// Evaluate the spline at `t`.
    ///
    /// Outside the knot range the cubic of the nearest end segment is
    /// extended rather than clamped.
    pub fn eval(&self, t: f64) -> f64 {
        let n = self.x.len();

        // Locate the segment [x[i], x[i+1]] containing t, clamping so
        // that out-of-range points fall on an end segment.
        let mut i = match self
            .x
            .as_slice()
            .expect("knots are contiguous")
            .binary_search_by(|v| v.partial_cmp(&t).expect("knots are finite"))
        {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };
        i = i.min(n - 2);

        let h = self.x[i + 1] - self.x[i];
        let a = (self.x[i + 1] - t) / h;
        let b = (t - self.x[i]) / h;
        a * self.y[i]
            + b * self.y[i + 1]
            + ((a * a * a - a) * self.m[i] + (b * b * b - b) * self.m[i + 1]) * h * h / 6.0
    }

    /// Evaluate at many points.
    pub fn eval_many(&self, ts: ArrayView1<f64>) -> Array1<f64> {
        ts.iter().map(|&t| self.eval(t)).collect()
    }
}

/// Regrid a `[src.len(), time]` profile onto `dst`, one spline fit per
/// time column. Returns a `[dst.len(), time]` array, or the fit error
/// when `src` is not a valid knot set.
///
/// Panics if the profile row count does not match `src`.
pub fn interp_columns(
    src: ArrayView1<f64>,
    values: ArrayView2<f64>,
    dst: ArrayView1<f64>,
) -> Result<Array2<f64>, SplineError> {
    let (n, t) = values.dim();
    assert_eq!(
        n,
        src.len(),
        "profile rows ({n}) must match the source grid ({})",
        src.len()
    );

    let mut out = Array2::zeros((dst.len(), t));
    for j in 0..t {
        let column: Array1<f64> = values.column(j).to_owned();
        let spline = CubicSpline::new(src, column.view())?;
        out.column_mut(j).assign(&spline.eval_many(dst));
    }
    Ok(out)
}

/// Thomas algorithm for a tridiagonal system. `sub[0]` and
/// `sup[n-1]` are unused. Panics on a zero pivot.
fn thomas(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[f64]) -> Vec<f64> {
    let n = rhs.len();
    let mut sup_p = vec![0.0; n];
    let mut rhs_p = vec![0.0; n];

    sup_p[0] = sup[0] / diag[0];
    rhs_p[0] = rhs[0] / diag[0];
    for i in 1..n {
        let pivot = diag[i] - sub[i] * sup_p[i - 1];
        assert!(pivot != 0.0, "singular tridiagonal system at row {i}");
        if i < n - 1 {
            sup_p[i] = sup[i] / pivot;
        }
        rhs_p[i] = (rhs[i] - sub[i] * rhs_p[i - 1]) / pivot;
    }

    let mut x = vec![0.0; n];
    x[n - 1] = rhs_p[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = rhs_p[i] - sup_p[i] * x[i + 1];
    }
    x
}
