use crate::error::{ModelError, ModelResult};
use crate::math::DETERMINANT_THRESHOLD;

/// `out = M * in + t` on two axes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "AffineRecord", into = "AffineRecord")
)]
pub struct Affine2D {
    matrix: [[f64; 2]; 2],
    translation: [f64; 2],
    matrix_inverse: [[f64; 2]; 2],
    determinant: f64,
}

impl Affine2D {
    pub fn new(matrix: [[f64; 2]; 2], translation: [f64; 2]) -> ModelResult<Self> {
        let determinant = matrix[0][0] * matrix[1][1] - matrix[0][1] * matrix[1][0];
        if determinant.abs() < DETERMINANT_THRESHOLD {
            return Err(ModelError::non_invertible_matrix(determinant));
        }
        let matrix_inverse = compute_inverse(matrix, determinant);
        Ok(Self {
            matrix,
            translation,
            matrix_inverse,
            determinant,
        })
    }

    /// FITS-style linear step: `CD * (p - crpix)`.
    pub fn from_cd(crpix: [f64; 2], cd: [[f64; 2]; 2]) -> ModelResult<Self> {
        let translation = [
            -(cd[0][0] * crpix[0] + cd[0][1] * crpix[1]),
            -(cd[1][0] * crpix[0] + cd[1][1] * crpix[1]),
        ];
        Self::new(cd, translation)
    }

    pub fn from_pc_cdelt(crpix: [f64; 2], pc: [[f64; 2]; 2], cdelt: [f64; 2]) -> ModelResult<Self> {
        let cd = [
            [cdelt[0] * pc[0][0], cdelt[0] * pc[0][1]],
            [cdelt[1] * pc[1][0], cdelt[1] * pc[1][1]],
        ];
        Self::from_cd(crpix, cd)
    }

    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let m = &self.matrix;
        (
            m[0][0] * x + m[0][1] * y + self.translation[0],
            m[1][0] * x + m[1][1] * y + self.translation[1],
        )
    }

    pub fn inverse(&self) -> Self {
        let inv = &self.matrix_inverse;
        let (tx, ty) = (self.translation[0], self.translation[1]);
        Self {
            matrix: self.matrix_inverse,
            translation: [
                -(inv[0][0] * tx + inv[0][1] * ty),
                -(inv[1][0] * tx + inv[1][1] * ty),
            ],
            matrix_inverse: self.matrix,
            determinant: 1.0 / self.determinant,
        }
    }

    #[inline]
    pub fn matrix(&self) -> [[f64; 2]; 2] {
        self.matrix
    }

    #[inline]
    pub fn translation(&self) -> [f64; 2] {
        self.translation
    }

    #[inline]
    pub fn determinant(&self) -> f64 {
        self.determinant
    }

    #[inline]
    pub fn pixel_scale(&self) -> f64 {
        libm::sqrt(self.determinant.abs())
    }
}

fn compute_inverse(m: [[f64; 2]; 2], det: f64) -> [[f64; 2]; 2] {
    let inv_det = 1.0 / det;
    [
        [m[1][1] * inv_det, -m[0][1] * inv_det],
        [-m[1][0] * inv_det, m[0][0] * inv_det],
    ]
}

/// Serialized form; the inverse and determinant are recomputed on load.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct AffineRecord {
    matrix: [[f64; 2]; 2],
    translation: [f64; 2],
}

#[cfg(feature = "serde")]
impl From<Affine2D> for AffineRecord {
    fn from(affine: Affine2D) -> Self {
        Self {
            matrix: affine.matrix,
            translation: affine.translation,
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<AffineRecord> for Affine2D {
    type Error = ModelError;

    fn try_from(record: AffineRecord) -> ModelResult<Self> {
        Affine2D::new(record.matrix, record.translation)
    }
}
