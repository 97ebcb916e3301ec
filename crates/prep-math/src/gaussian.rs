// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Prep — Gaussian
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! 1-D Gaussian smoothing along the radial axis of a profile array.
//!
//! Profiles are stored as `[radius, time]`; smoothing runs down each
//! time column independently and never touches the time axis.

use ndarray::{Array2, ArrayView2};

/// Kernel truncation in units of sigma.
const TRUNCATE: f64 = 4.0;

/// Normalized Gaussian kernel of radius `truncate * sigma + 0.5`.
///
/// Returns a kernel of odd length `2r + 1`; `sigma <= 0` yields the
/// identity kernel `[1.0]`.
pub fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    if sigma <= 0.0 {
        return vec![1.0];
    }
    let radius = (TRUNCATE * sigma + 0.5) as usize;
    let mut kernel = Vec::with_capacity(2 * radius + 1);
    let denom = 2.0 * sigma * sigma;
    for i in 0..=2 * radius {
        let d = i as f64 - radius as f64;
        kernel.push((-d * d / denom).exp());
    }
    let sum: f64 = kernel.iter().sum();
    for k in kernel.iter_mut() {
        *k /= sum;
    }
    kernel
}

/// Map an out-of-range index back into `[0, n)` by reflecting about
/// the array edges: ... d c b a | a b c d | d c b a ...
fn reflect_index(mut i: isize, n: usize) -> usize {
    let n = n as isize;
    loop {
        if i < 0 {
            i = -i - 1;
        } else if i >= n {
            i = 2 * n - i - 1;
        } else {
            return i as usize;
        }
    }
}

/// Smooth a `[radius, time]` profile along axis 0 with the given sigma.
///
/// Each time column is convolved with a truncated Gaussian; boundary
/// samples use reflected values. The time axis is left unfiltered,
/// matching a sigma of `(width, 0)`.
pub fn smooth_radial(values: ArrayView2<f64>, sigma: f64) -> Array2<f64> {
    let kernel = gaussian_kernel(sigma);
    let radius = kernel.len() / 2;
    let (n, t) = values.dim();
    if n == 0 || radius == 0 {
        return values.to_owned();
    }

    let mut out = Array2::zeros((n, t));
    for j in 0..t {
        for i in 0..n {
            let mut acc = 0.0;
            for (k, &w) in kernel.iter().enumerate() {
                let src = reflect_index(i as isize + k as isize - radius as isize, n);
                acc += w * values[[src, j]];
            }
            out[[i, j]] = acc;
        }
    }
    out
}
