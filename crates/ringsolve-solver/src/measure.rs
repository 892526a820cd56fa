//! Resonance measurements on sampled spectra.
//!
//! Peaks are located with a local-maximum search; widths are measured by
//! linear interpolation of the half-maximum crossings on either side of a
//! peak.

use crate::error::{Error, Result};

/// A located resonance peak.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resonance {
    /// Sample index of the peak.
    pub index: usize,
    /// Abscissa of the peak.
    pub position: f64,
    /// Peak value.
    pub value: f64,
    /// Full width at half maximum.
    pub fwhm: f64,
}

/// Indices of interior local maxima.
///
/// A flat top is reported once, at its first sample.
pub fn local_maxima(values: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    let n = values.len();
    let mut i = 1;
    while i + 1 < n {
        if values[i] > values[i - 1] {
            // Walk over a plateau.
            let mut j = i;
            while j + 1 < n && values[j + 1] == values[i] {
                j += 1;
            }
            if j + 1 < n && values[j + 1] < values[i] {
                peaks.push(i);
            }
            i = j + 1;
        } else {
            i += 1;
        }
    }
    peaks
}

/// Index of the local maximum whose abscissa is closest to `target`.
pub fn nearest_peak(x: &[f64], y: &[f64], target: f64) -> Result<usize> {
    local_maxima(y)
        .into_iter()
        .min_by(|&a, &b| (x[a] - target).abs().total_cmp(&(x[b] - target).abs()))
        .ok_or(Error::PeakNotFound { target })
}

/// Interpolated abscissa where `y` crosses `level` between samples `i` and `i + 1`.
fn interpolate(x: &[f64], y: &[f64], i: usize, level: f64) -> f64 {
    let (y0, y1) = (y[i], y[i + 1]);
    if (y1 - y0).abs() < 1e-300 {
        return x[i];
    }
    x[i] + (level - y0) / (y1 - y0) * (x[i + 1] - x[i])
}

/// Half-maximum crossings `(left, right)` around the peak at `peak`.
pub fn half_maximum_crossings(x: &[f64], y: &[f64], peak: usize) -> Result<(f64, f64)> {
    let half = y[peak] / 2.0;

    let left = (0..peak)
        .rev()
        .find(|&i| y[i] <= half)
        .map(|i| interpolate(x, y, i, half))
        .ok_or(Error::HalfMaximumNotFound {
            side: "left",
            position: x[peak],
        })?;

    let right = (peak + 1..y.len())
        .find(|&i| y[i] <= half)
        .map(|i| interpolate(x, y, i - 1, half))
        .ok_or(Error::HalfMaximumNotFound {
            side: "right",
            position: x[peak],
        })?;

    Ok((left, right))
}

/// Full width at half maximum of the peak at `peak`.
pub fn fwhm(x: &[f64], y: &[f64], peak: usize) -> Result<f64> {
    let (left, right) = half_maximum_crossings(x, y, peak)?;
    Ok(right - left)
}

/// Locate the peak nearest `target` and measure its width.
pub fn resonance_near(x: &[f64], y: &[f64], target: f64) -> Result<Resonance> {
    if x.len() != y.len() {
        return Err(Error::DimensionMismatch {
            expected: x.len(),
            actual: y.len(),
        });
    }
    let index = nearest_peak(x, y, target)?;
    Ok(Resonance {
        index,
        position: x[index],
        value: y[index],
        fwhm: fwhm(x, y, index)?,
    })
}
