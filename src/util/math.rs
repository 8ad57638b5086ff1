//! Numeric helpers shared by the image layout and the operators.

/// Rounds `value` up to the next multiple of `align`.
pub(crate) fn align_up(value: usize, align: usize) -> Option<usize> {
    debug_assert!(align.is_power_of_two());
    value.checked_add(align - 1).map(|v| v & !(align - 1))
}

/// Rounds to the nearest integer, halves towards positive infinity.
pub(crate) fn round_half_up(value: f32) -> i64 {
    (value + 0.5).floor() as i64
}

/// Clamps an index computed on signed coordinates into `[0, len - 1]`.
#[inline]
pub(crate) fn clamp_index(index: i64, len: usize) -> usize {
    if index <= 0 {
        0
    } else {
        (index as usize).min(len - 1)
    }
}

/// Cubic convolution weights for the four taps around a sample at offset `t`.
///
/// Uses `a = -0.75`, matching the common bicubic resize kernel.
pub(crate) fn cubic_weights(t: f64) -> [f64; 4] {
    const A: f64 = -0.75;
    let w0 = ((A * (t + 1.0) - 5.0 * A) * (t + 1.0) + 8.0 * A) * (t + 1.0) - 4.0 * A;
    let w1 = ((A + 2.0) * t - (A + 3.0)) * t * t + 1.0;
    let w2 = ((A + 2.0) * (1.0 - t) - (A + 3.0)) * (1.0 - t) * (1.0 - t) + 1.0;
    let w3 = 1.0 - w0 - w1 - w2;
    [w0, w1, w2, w3]
}

/// Normalized 1D Gaussian taps for an odd kernel size.
///
/// Sigma follows `0.3 * ((size - 1) / 2 - 1) + 0.8`.
pub(crate) fn gaussian_taps(size: usize) -> Vec<f64> {
    debug_assert!(size % 2 == 1);
    let radius = (size / 2) as f64;
    let sigma = 0.3 * (radius - 1.0) + 0.8;
    let scale = -0.5 / (sigma * sigma);
    let mut taps: Vec<f64> = (0..size)
        .map(|i| {
            let d = i as f64 - radius;
            (scale * d * d).exp()
        })
        .collect();
    let sum: f64 = taps.iter().sum();
    for tap in &mut taps {
        *tap /= sum;
    }
    taps
}
