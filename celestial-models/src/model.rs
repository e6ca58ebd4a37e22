use crate::affine::Affine2D;
use crate::error::{ModelError, ModelResult};
use crate::math::check_nonzero_param;
use crate::polynomial::Polynomial2D;
use crate::spherical::{gnomonic, ProjectionDirection, SkyRotation};

/// A single parametric stage of a transform chain.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ModelRecord"))]
pub enum Model {
    Identity { n_axes: usize },
    Shift { offsets: Vec<f64> },
    Scale { factors: Vec<f64> },
    Affine(Affine2D),
    Rotation2D { angle_deg: f64 },
    Polynomial(Polynomial2D),
    Gnomonic { direction: ProjectionDirection },
    SkyRotation(SkyRotation),
}

impl Model {
    pub fn identity(n_axes: usize) -> Self {
        Self::Identity { n_axes }
    }

    pub fn shift(offsets: impl Into<Vec<f64>>) -> Self {
        Self::Shift {
            offsets: offsets.into(),
        }
    }

    pub fn scale(factors: impl Into<Vec<f64>>) -> ModelResult<Self> {
        let factors = factors.into();
        for &factor in &factors {
            check_nonzero_param(factor, "Scale")?;
        }
        Ok(Self::Scale { factors })
    }

    pub fn rotation(angle_deg: f64) -> Self {
        Self::Rotation2D { angle_deg }
    }

    pub fn pix2sky_tan() -> Self {
        Self::Gnomonic {
            direction: ProjectionDirection::PlaneToSphere,
        }
    }

    pub fn sky2pix_tan() -> Self {
        Self::Gnomonic {
            direction: ProjectionDirection::SphereToPlane,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Identity { .. } => "Identity",
            Self::Shift { .. } => "Shift",
            Self::Scale { .. } => "Scale",
            Self::Affine(_) => "Affine2D",
            Self::Rotation2D { .. } => "Rotation2D",
            Self::Polynomial(_) => "Polynomial2D",
            Self::Gnomonic {
                direction: ProjectionDirection::PlaneToSphere,
            } => "Pix2Sky_TAN",
            Self::Gnomonic {
                direction: ProjectionDirection::SphereToPlane,
            } => "Sky2Pix_TAN",
            Self::SkyRotation(_) => "SkyRotation",
        }
    }

    pub fn n_inputs(&self) -> usize {
        match self {
            Self::Identity { n_axes } => *n_axes,
            Self::Shift { offsets } => offsets.len(),
            Self::Scale { factors } => factors.len(),
            _ => 2,
        }
    }

    /// Every model here maps N axes onto N axes.
    #[inline]
    pub fn n_outputs(&self) -> usize {
        self.n_inputs()
    }

    /// Output axis that carries a wrapping longitude, if any.
    pub fn longitude_axis(&self) -> Option<usize> {
        match self {
            Self::SkyRotation(_)
            | Self::Gnomonic {
                direction: ProjectionDirection::PlaneToSphere,
            } => Some(0),
            _ => None,
        }
    }

    pub fn evaluate_point(&self, point: &[f64]) -> ModelResult<Vec<f64>> {
        if point.len() != self.n_inputs() {
            return Err(ModelError::dimension_mismatch(self.n_inputs(), point.len()));
        }
        match self {
            Self::Identity { .. } => Ok(point.to_vec()),
            Self::Shift { offsets } => Ok(point.iter().zip(offsets).map(|(v, o)| v + o).collect()),
            Self::Scale { factors } => Ok(point.iter().zip(factors).map(|(v, f)| v * f).collect()),
            Self::Affine(affine) => {
                let (x, y) = affine.apply(point[0], point[1]);
                Ok(vec![x, y])
            }
            Self::Rotation2D { angle_deg } => {
                let (s, c) = angle_deg.to_radians().sin_cos();
                Ok(vec![
                    c * point[0] - s * point[1],
                    s * point[0] + c * point[1],
                ])
            }
            Self::Polynomial(poly) => {
                let (x, y) = poly.apply(point[0], point[1]);
                Ok(vec![x, y])
            }
            Self::Gnomonic { direction } => {
                let (a, b) = gnomonic(*direction, point[0], point[1])?;
                Ok(vec![a, b])
            }
            Self::SkyRotation(rotation) => {
                let (lon, lat) = rotation.apply(point[0], point[1]);
                Ok(vec![lon, lat])
            }
        }
    }

    /// The analytical inverse, or [`ModelError::NoInverse`].
    pub fn inverse(&self) -> ModelResult<Model> {
        match self {
            Self::Identity { n_axes } => Ok(Self::identity(*n_axes)),
            Self::Shift { offsets } => Ok(Self::shift(
                offsets.iter().map(|o| -o).collect::<Vec<_>>(),
            )),
            Self::Scale { factors } => Ok(Self::Scale {
                factors: factors.iter().map(|f| 1.0 / f).collect(),
            }),
            Self::Affine(affine) => Ok(Self::Affine(affine.inverse())),
            Self::Rotation2D { angle_deg } => Ok(Self::rotation(-angle_deg)),
            Self::Polynomial(poly) => poly.inverse().map(Self::Polynomial),
            Self::Gnomonic { direction } => Ok(Self::Gnomonic {
                direction: direction.reversed(),
            }),
            Self::SkyRotation(rotation) => Ok(Self::SkyRotation(rotation.inverse())),
        }
    }
}

impl From<Affine2D> for Model {
    fn from(affine: Affine2D) -> Self {
        Self::Affine(affine)
    }
}

impl From<Polynomial2D> for Model {
    fn from(poly: Polynomial2D) -> Self {
        Self::Polynomial(poly)
    }
}

impl From<SkyRotation> for Model {
    fn from(rotation: SkyRotation) -> Self {
        Self::SkyRotation(rotation)
    }
}

/// Deserialized shape of [`Model`], checked through the constructors.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
enum ModelRecord {
    Identity { n_axes: usize },
    Shift { offsets: Vec<f64> },
    Scale { factors: Vec<f64> },
    Affine(Affine2D),
    Rotation2D { angle_deg: f64 },
    Polynomial(Polynomial2D),
    Gnomonic { direction: ProjectionDirection },
    SkyRotation(SkyRotation),
}

#[cfg(feature = "serde")]
impl TryFrom<ModelRecord> for Model {
    type Error = ModelError;

    fn try_from(record: ModelRecord) -> ModelResult<Self> {
        Ok(match record {
            ModelRecord::Identity { n_axes } => Self::identity(n_axes),
            ModelRecord::Shift { offsets } => Self::shift(offsets),
            ModelRecord::Scale { factors } => Self::scale(factors)?,
            ModelRecord::Affine(affine) => Self::Affine(affine),
            ModelRecord::Rotation2D { angle_deg } => Self::rotation(angle_deg),
            ModelRecord::Polynomial(poly) => Self::Polynomial(poly),
            ModelRecord::Gnomonic { direction } => Self::Gnomonic { direction },
            ModelRecord::SkyRotation(rotation) => Self::SkyRotation(rotation),
        })
    }
}
