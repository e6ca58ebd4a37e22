use crate::error::{ModelError, ModelResult};

pub(crate) const DETERMINANT_THRESHOLD: f64 = 1e-15;

#[inline]
pub(crate) fn asin_safe(sin_value: f64) -> f64 {
    sin_value.clamp(-1.0, 1.0).asin()
}

/// Wraps a longitude in degrees into `[0, 360)`.
#[inline]
pub fn normalize_longitude(lon_deg: f64) -> f64 {
    let wrapped = libm::fmod(lon_deg, 360.0);
    let wrapped = if wrapped < 0.0 { wrapped + 360.0 } else { wrapped };
    // Tiny negative inputs round up to exactly 360.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Wraps a longitude difference in degrees into `(-180, 180]`.
#[inline]
pub fn wrap_longitude_difference(delta_deg: f64) -> f64 {
    let wrapped = libm::fmod(delta_deg, 360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

#[inline]
pub(crate) fn power_term(x: f64, y: f64, p: u32, q: u32) -> f64 {
    x.powi(p as i32) * y.powi(q as i32)
}

#[inline]
pub(crate) fn check_nonzero_param(value: f64, context: &str) -> ModelResult<()> {
    if value.abs() < 1e-10 {
        return Err(ModelError::invalid_parameter(format!(
            "{}: parameter cannot be zero",
            context
        )));
    }
    Ok(())
}
