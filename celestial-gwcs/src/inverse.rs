//! Iterative inversion, used when a forward chain has no analytical inverse.

use std::fmt;

use celestial_models::math::wrap_longitude_difference;
use celestial_models::TransformChain;
use tracing::{debug, trace};

use crate::error::{WcsError, WcsResult};

/// Tuning for iterative inversion.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InvertOptions {
    pub max_iter: usize,
    pub tolerance: f64,
    /// Per-axis starting points in the input frame. Defaults to the target
    /// itself, which suits near-identity distortions.
    pub initial_guess: Option<Vec<Vec<f64>>>,
}

impl InvertOptions {
    pub const DEFAULT_MAX_ITER: usize = 50;
    pub const DEFAULT_TOL: f64 = 1e-12;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn initial_guess(mut self, guess: Vec<Vec<f64>>) -> Self {
        self.initial_guess = Some(guess);
        self
    }
}

impl Default for InvertOptions {
    fn default() -> Self {
        Self {
            max_iter: Self::DEFAULT_MAX_ITER,
            tolerance: Self::DEFAULT_TOL,
            initial_guess: None,
        }
    }
}

/// Strategy for inverting a chain numerically.
pub trait IterativeInverter: fmt::Debug + Send + Sync {
    fn invert(
        &self,
        forward: &TransformChain,
        coords: &[Vec<f64>],
        options: &InvertOptions,
    ) -> WcsResult<Vec<Vec<f64>>>;
}

/// Newton-Raphson on `forward(p) - target` with a finite-difference
/// Jacobian. Two-axis chains only.
///
/// When the chain ends in a longitude, differences along that axis are
/// taken across the shortest arc, so targets either side of 0/360 converge.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewtonInverter;

impl IterativeInverter for NewtonInverter {
    fn invert(
        &self,
        forward: &TransformChain,
        coords: &[Vec<f64>],
        options: &InvertOptions,
    ) -> WcsResult<Vec<Vec<f64>>> {
        if forward.n_inputs() != Some(2) || forward.n_outputs() != Some(2) || coords.len() != 2 {
            return Err(WcsError::invalid_parameter(
                "Newton inversion requires a two-axis chain and two coordinate axes",
            ));
        }
        let guess = options.initial_guess.as_deref().unwrap_or(coords);
        if guess.len() != 2 {
            return Err(WcsError::invalid_parameter(
                "initial guess must have two axes",
            ));
        }
        let n_points = broadcast_len(&[&coords[0], &coords[1], &guess[0], &guess[1]])?;

        let mut xs = Vec::with_capacity(n_points);
        let mut ys = Vec::with_capacity(n_points);
        for i in 0..n_points {
            let target = (at(&coords[0], i), at(&coords[1], i));
            let start = (at(&guess[0], i), at(&guess[1], i));
            let (x, y) = newton_raphson_2d(forward, target, start, options).map_err(|e| match e {
                WcsError::ConvergenceFailure { message } => {
                    WcsError::convergence_failure(format!("point {}: {}", i, message))
                }
                other => other,
            })?;
            xs.push(x);
            ys.push(y);
        }
        debug!(n_points, "iterative inversion converged");
        Ok(vec![xs, ys])
    }
}

#[inline]
fn at(axis: &[f64], i: usize) -> f64 {
    if axis.len() == 1 {
        axis[0]
    } else {
        axis[i]
    }
}

fn broadcast_len(axes: &[&Vec<f64>]) -> WcsResult<usize> {
    let n_points = axes.iter().map(|a| a.len()).max().unwrap_or(0);
    match axes.iter().find(|a| a.len() != 1 && a.len() != n_points) {
        Some(axis) => Err(WcsError::invalid_parameter(format!(
            "axis of length {} cannot broadcast to {}",
            axis.len(),
            n_points
        ))),
        None => Ok(n_points),
    }
}

fn eval_2d(forward: &TransformChain, x: f64, y: f64) -> WcsResult<(f64, f64)> {
    let out = forward.evaluate_point(&[x, y])?;
    Ok((out[0], out[1]))
}

fn newton_raphson_2d(
    forward: &TransformChain,
    target: (f64, f64),
    initial_guess: (f64, f64),
    options: &InvertOptions,
) -> WcsResult<(f64, f64)> {
    let lon_axis = forward.output_longitude_axis();
    let (mut x, mut y) = initial_guess;

    for iteration in 0..options.max_iter {
        let (fx, fy) = eval_2d(forward, x, y)?;
        let (dx, dy) = difference((fx, fy), target, lon_axis);

        if dx.abs() < options.tolerance && dy.abs() < options.tolerance {
            trace!(iteration, x, y, "Newton-Raphson converged");
            return Ok((x, y));
        }

        let (j11, j12, j21, j22) = compute_jacobian(forward, x, y, (fx, fy), lon_axis)?;
        let (delta_x, delta_y) = solve_2x2(j11, j12, j21, j22, dx, dy)?;

        x -= delta_x;
        y -= delta_y;

        // Steps below the float resolution of the point cannot shrink the residual further.
        if delta_x.abs() <= options.tolerance * x.abs().max(1.0)
            && delta_y.abs() <= options.tolerance * y.abs().max(1.0)
        {
            trace!(iteration, x, y, "Newton-Raphson step below tolerance");
            return Ok((x, y));
        }
    }

    Err(WcsError::convergence_failure(format!(
        "Newton-Raphson did not converge in {} iterations",
        options.max_iter
    )))
}

fn compute_jacobian(
    forward: &TransformChain,
    x: f64,
    y: f64,
    f0: (f64, f64),
    lon_axis: Option<usize>,
) -> WcsResult<(f64, f64, f64, f64)> {
    const H: f64 = 1e-8;
    let hx = H * x.abs().max(1.0);
    let hy = H * y.abs().max(1.0);
    let (dfx_dx, dfy_dx) = difference(eval_2d(forward, x + hx, y)?, f0, lon_axis);
    let (dfx_dy, dfy_dy) = difference(eval_2d(forward, x, y + hy)?, f0, lon_axis);

    Ok((dfx_dx / hx, dfx_dy / hy, dfy_dx / hx, dfy_dy / hy))
}

/// `a - b`, with the longitude axis wrapped into `(-180, 180]`.
#[inline]
fn difference(a: (f64, f64), b: (f64, f64), lon_axis: Option<usize>) -> (f64, f64) {
    let (dx, dy) = (a.0 - b.0, a.1 - b.1);
    match lon_axis {
        Some(0) => (wrap_longitude_difference(dx), dy),
        Some(1) => (dx, wrap_longitude_difference(dy)),
        _ => (dx, dy),
    }
}

fn solve_2x2(j11: f64, j12: f64, j21: f64, j22: f64, b1: f64, b2: f64) -> WcsResult<(f64, f64)> {
    let det = j11 * j22 - j12 * j21;
    if det.abs() < 1e-15 {
        return Err(WcsError::convergence_failure("singular Jacobian matrix"));
    }
    let inv_det = 1.0 / det;
    Ok((
        inv_det * (j22 * b1 - j12 * b2),
        inv_det * (-j21 * b1 + j11 * b2),
    ))
}
