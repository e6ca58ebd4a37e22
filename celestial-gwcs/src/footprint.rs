/// Pixel corners of a `naxis1 x naxis2` image, counter-clockwise from the
/// bottom-left corner.
///
/// With `center` the 1-indexed centres of the corner pixels are used,
/// otherwise their outer edges.
pub fn footprint_corners(axes: (usize, usize), center: bool) -> [[f64; 2]; 4] {
    let (naxis1, naxis2) = (axes.0 as f64, axes.1 as f64);
    if center {
        [[1.0, 1.0], [1.0, naxis2], [naxis1, naxis2], [naxis1, 1.0]]
    } else {
        [
            [0.5, 0.5],
            [0.5, naxis2 + 0.5],
            [naxis1 + 0.5, naxis2 + 0.5],
            [naxis1 + 0.5, 0.5],
        ]
    }
}

/// The corners split into per-axis arrays, ready for evaluation.
pub(crate) fn corner_axes(corners: &[[f64; 2]; 4]) -> Vec<Vec<f64>> {
    vec![
        corners.iter().map(|c| c[0]).collect(),
        corners.iter().map(|c| c[1]).collect(),
    ]
}
