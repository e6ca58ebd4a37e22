//! Spherical stages: the gnomonic (TAN) projection and the native to
//! celestial rotation. Angles are carried in degrees on both sides.

use crate::error::{ModelError, ModelResult};
use crate::math::{asin_safe, normalize_longitude};

const HALF_PI: f64 = std::f64::consts::FRAC_PI_2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProjectionDirection {
    /// Projection plane `(x, y)` to native spherical `(phi, theta)`.
    PlaneToSphere,
    /// Native spherical `(phi, theta)` to projection plane `(x, y)`.
    SphereToPlane,
}

impl ProjectionDirection {
    pub fn reversed(self) -> Self {
        match self {
            Self::PlaneToSphere => Self::SphereToPlane,
            Self::SphereToPlane => Self::PlaneToSphere,
        }
    }
}

pub(crate) fn gnomonic(direction: ProjectionDirection, a: f64, b: f64) -> ModelResult<(f64, f64)> {
    match direction {
        ProjectionDirection::PlaneToSphere => Ok(deproject_tan(a, b)),
        ProjectionDirection::SphereToPlane => project_tan(a, b),
    }
}

fn project_tan(phi_deg: f64, theta_deg: f64) -> ModelResult<(f64, f64)> {
    let phi = phi_deg.to_radians();
    let theta = theta_deg.to_radians();

    if theta == HALF_PI {
        return Ok((0.0, 0.0));
    }
    if theta <= 0.0 {
        return Err(ModelError::singularity(
            "TAN projection undefined at theta <= 0",
        ));
    }
    let (rt_sin, rt_cos) = theta.sin_cos();
    let r_theta = rt_cos / rt_sin;
    let (ps, pc) = phi.sin_cos();
    Ok(((r_theta * ps).to_degrees(), (-r_theta * pc).to_degrees()))
}

fn deproject_tan(x_deg: f64, y_deg: f64) -> (f64, f64) {
    let x = x_deg.to_radians();
    let y = y_deg.to_radians();
    let r_theta = (x * x + y * y).sqrt();

    if r_theta == 0.0 {
        return (0.0, 90.0);
    }

    let phi = x.atan2(-y);
    let theta = 1.0_f64.atan2(r_theta);
    (phi.to_degrees(), theta.to_degrees())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RotationDirection {
    NativeToCelestial,
    CelestialToNative,
}

/// Euler rotation between native spherical and celestial coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "SkyRotationRecord"))]
pub struct SkyRotation {
    alpha_p: f64,
    delta_p: f64,
    phi_p: f64,
    direction: RotationDirection,
}

impl SkyRotation {
    /// Pole given in degrees: celestial `(alpha_p, delta_p)` and the native
    /// longitude of the celestial pole `phi_p`.
    pub fn new(alpha_p: f64, delta_p: f64, phi_p: f64) -> ModelResult<Self> {
        if !(-90.0..=90.0).contains(&delta_p) {
            return Err(ModelError::invalid_parameter(format!(
                "celestial pole latitude {} outside [-90, 90]",
                delta_p
            )));
        }
        Ok(Self {
            alpha_p,
            delta_p,
            phi_p,
            direction: RotationDirection::NativeToCelestial,
        })
    }

    /// Zenithal projections: the reference point is the native pole, so the
    /// celestial pole sits at `crval` with the default `LONPOLE`.
    pub fn from_crval(crval_lon: f64, crval_lat: f64) -> ModelResult<Self> {
        let phi_p = if crval_lat >= 90.0 { 0.0 } else { 180.0 };
        Self::new(crval_lon, crval_lat, phi_p)
    }

    #[inline]
    pub fn direction(&self) -> RotationDirection {
        self.direction
    }

    #[inline]
    pub fn pole(&self) -> (f64, f64, f64) {
        (self.alpha_p, self.delta_p, self.phi_p)
    }

    pub fn inverse(&self) -> Self {
        let direction = match self.direction {
            RotationDirection::NativeToCelestial => RotationDirection::CelestialToNative,
            RotationDirection::CelestialToNative => RotationDirection::NativeToCelestial,
        };
        Self { direction, ..*self }
    }

    pub fn apply(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        match self.direction {
            RotationDirection::NativeToCelestial => self.native_to_celestial(lon_deg, lat_deg),
            RotationDirection::CelestialToNative => self.celestial_to_native(lon_deg, lat_deg),
        }
    }

    fn native_to_celestial(&self, phi_deg: f64, theta_deg: f64) -> (f64, f64) {
        let (sin_delta_p, cos_delta_p) = self.delta_p.to_radians().sin_cos();
        let (sin_theta, cos_theta) = theta_deg.to_radians().sin_cos();
        let (sin_d_phi, cos_d_phi) = (phi_deg - self.phi_p).to_radians().sin_cos();

        let delta = asin_safe(sin_theta * sin_delta_p + cos_theta * cos_delta_p * cos_d_phi);

        let x = -cos_theta * sin_d_phi;
        let y = sin_theta * cos_delta_p - cos_theta * sin_delta_p * cos_d_phi;
        let alpha = self.alpha_p + x.atan2(y).to_degrees();

        (normalize_longitude(alpha), delta.to_degrees())
    }

    fn celestial_to_native(&self, alpha_deg: f64, delta_deg: f64) -> (f64, f64) {
        let (sin_delta_p, cos_delta_p) = self.delta_p.to_radians().sin_cos();
        let (sin_delta, cos_delta) = delta_deg.to_radians().sin_cos();
        let (sin_d_alpha, cos_d_alpha) = (alpha_deg - self.alpha_p).to_radians().sin_cos();

        let theta = asin_safe(sin_delta * sin_delta_p + cos_delta * cos_delta_p * cos_d_alpha);

        let x = -cos_delta * sin_d_alpha;
        let y = sin_delta * cos_delta_p - cos_delta * sin_delta_p * cos_d_alpha;
        let phi = self.phi_p + x.atan2(y).to_degrees();

        (wrap_native_longitude(phi), theta.to_degrees())
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct SkyRotationRecord {
    alpha_p: f64,
    delta_p: f64,
    phi_p: f64,
    direction: RotationDirection,
}

#[cfg(feature = "serde")]
impl TryFrom<SkyRotationRecord> for SkyRotation {
    type Error = ModelError;

    fn try_from(record: SkyRotationRecord) -> ModelResult<Self> {
        let rotation = SkyRotation::new(record.alpha_p, record.delta_p, record.phi_p)?;
        Ok(Self {
            direction: record.direction,
            ..rotation
        })
    }
}

fn wrap_native_longitude(phi_deg: f64) -> f64 {
    let wrapped = normalize_longitude(phi_deg);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}
