//! Ordered transform chains with named frame boundaries.
//!
//! A chain over frames `f0, f1, ..., fn` holds `n` models, `model[i]`
//! mapping `f[i]` onto `f[i + 1]`. Sub-chains are addressed by frame names,
//! inclusive of both endpoints, and the whole chain can be inverted when
//! every stage has an analytical inverse.
//!
//! ```
//! use celestial_models::{Model, TransformChain};
//!
//! let chain = TransformChain::new("detector")
//!     .then(Model::shift([-1.0, -1.0]), "offset")?
//!     .then(Model::scale([0.5, 0.5])?, "focal")?;
//!
//! let focal = chain.evaluate(&[vec![3.0], vec![5.0]])?;
//! assert_eq!(focal, vec![vec![1.0], vec![2.0]]);
//!
//! let tail = chain.slice("offset", "focal")?;
//! assert_eq!(tail.frames(), ["offset", "focal"]);
//! # Ok::<(), celestial_models::ModelError>(())
//! ```

use crate::error::{ModelError, ModelResult};
use crate::model::Model;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ChainRecord"))]
pub struct TransformChain {
    frames: Vec<String>,
    models: Vec<Model>,
}

impl TransformChain {
    /// An empty chain sitting at `frame`; evaluates as the identity.
    pub fn new(frame: impl Into<String>) -> Self {
        Self {
            frames: vec![frame.into()],
            models: Vec::new(),
        }
    }

    pub fn then(mut self, model: impl Into<Model>, frame: impl Into<String>) -> ModelResult<Self> {
        self.push(model, frame)?;
        Ok(self)
    }

    pub fn push(&mut self, model: impl Into<Model>, frame: impl Into<String>) -> ModelResult<()> {
        let model = model.into();
        let frame = frame.into();
        if self.frames.contains(&frame) {
            return Err(ModelError::duplicate_frame(frame));
        }
        if let Some(previous) = self.models.last() {
            if previous.n_outputs() != model.n_inputs() {
                return Err(ModelError::dimension_mismatch(
                    previous.n_outputs(),
                    model.n_inputs(),
                ));
            }
        }
        self.models.push(model);
        self.frames.push(frame);
        Ok(())
    }

    /// Names of every frame boundary, input first.
    #[inline]
    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    #[inline]
    pub fn models(&self) -> &[Model] {
        &self.models
    }

    #[inline]
    pub fn input_frame(&self) -> &str {
        &self.frames[0]
    }

    #[inline]
    pub fn output_frame(&self) -> &str {
        &self.frames[self.frames.len() - 1]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// `None` for an empty chain, which accepts any axis count.
    pub fn n_inputs(&self) -> Option<usize> {
        self.models.first().map(Model::n_inputs)
    }

    pub fn n_outputs(&self) -> Option<usize> {
        self.models.last().map(Model::n_outputs)
    }

    /// Output axis holding a longitude, taken from the last stage.
    pub fn output_longitude_axis(&self) -> Option<usize> {
        self.models.last().and_then(Model::longitude_axis)
    }

    pub fn contains_frame(&self, frame: &str) -> bool {
        self.frames.iter().any(|f| f == frame)
    }

    fn frame_index(&self, frame: &str) -> Option<usize> {
        self.frames.iter().position(|f| f == frame)
    }

    /// Sub-chain from `from` to `to`, inclusive of both endpoints.
    ///
    /// Fails with [`ModelError::FrameNotFound`] when either frame is missing
    /// or `to` comes before `from`.
    pub fn slice(&self, from: &str, to: &str) -> ModelResult<TransformChain> {
        match (self.frame_index(from), self.frame_index(to)) {
            (Some(start), Some(end)) if start <= end => Ok(Self {
                frames: self.frames[start..=end].to_vec(),
                models: self.models[start..end].to_vec(),
            }),
            _ => Err(ModelError::frame_not_found(from, to)),
        }
    }

    /// The reversed chain with every stage inverted.
    pub fn inverse(&self) -> ModelResult<TransformChain> {
        let models = self
            .models
            .iter()
            .rev()
            .map(Model::inverse)
            .collect::<ModelResult<Vec<_>>>()?;
        let frames = self.frames.iter().rev().cloned().collect();
        Ok(Self { frames, models })
    }

    pub fn evaluate_point(&self, point: &[f64]) -> ModelResult<Vec<f64>> {
        let mut current = point.to_vec();
        for model in &self.models {
            current = model.evaluate_point(&current)?;
        }
        Ok(current)
    }

    /// Evaluates per-axis arrays. Axes of length one broadcast against the
    /// others; every other length must agree.
    pub fn evaluate(&self, coords: &[Vec<f64>]) -> ModelResult<Vec<Vec<f64>>> {
        if let Some(n_inputs) = self.n_inputs() {
            if coords.len() != n_inputs {
                return Err(ModelError::dimension_mismatch(n_inputs, coords.len()));
            }
        }
        let n_points = broadcast_len(coords)?;
        let n_outputs = self.n_outputs().unwrap_or(coords.len());

        let mut result = vec![Vec::with_capacity(n_points); n_outputs];
        let mut point = vec![0.0; coords.len()];
        for i in 0..n_points {
            for (slot, axis) in point.iter_mut().zip(coords) {
                *slot = if axis.len() == 1 { axis[0] } else { axis[i] };
            }
            let out = self.evaluate_point(&point)?;
            for (column, value) in result.iter_mut().zip(out) {
                column.push(value);
            }
        }
        Ok(result)
    }
}

fn broadcast_len(coords: &[Vec<f64>]) -> ModelResult<usize> {
    let mut n_points: Option<usize> = None;
    for axis in coords {
        match (n_points, axis.len()) {
            (_, 1) => {}
            (None, len) => n_points = Some(len),
            (Some(n), len) if n == len => {}
            (Some(n), len) => {
                return Err(ModelError::shape_mismatch(format!(
                    "axis lengths {} and {}",
                    n, len
                )))
            }
        }
    }
    let any_scalar = coords.iter().any(|axis| axis.len() == 1);
    Ok(n_points.unwrap_or(usize::from(any_scalar)))
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct ChainRecord {
    frames: Vec<String>,
    models: Vec<Model>,
}

#[cfg(feature = "serde")]
impl TryFrom<ChainRecord> for TransformChain {
    type Error = ModelError;

    fn try_from(record: ChainRecord) -> ModelResult<Self> {
        let mut frames = record.frames.into_iter();
        let first = frames
            .next()
            .ok_or_else(|| ModelError::invalid_parameter("transform chain has no frames"))?;
        if frames.len() != record.models.len() {
            return Err(ModelError::invalid_parameter(format!(
                "{} models between {} frames",
                record.models.len(),
                frames.len() + 1
            )));
        }
        let mut chain = TransformChain::new(first);
        for (model, frame) in record.models.into_iter().zip(frames) {
            chain.push(model, frame)?;
        }
        Ok(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polynomial::Polynomial2D;
    use crate::spherical::SkyRotation;

    fn three_stage_chain() -> TransformChain {
        TransformChain::new("detector")
            .then(Model::shift([-1.0, -1.0]), "offset")
            .unwrap()
            .then(Model::scale([2.0, 3.0]).unwrap(), "focal")
            .unwrap()
            .then(Model::rotation(90.0), "rotated")
            .unwrap()
    }

    #[test]
    fn test_frames_in_order() {
        let chain = three_stage_chain();
        assert_eq!(chain.frames(), ["detector", "offset", "focal", "rotated"]);
        assert_eq!(chain.input_frame(), "detector");
        assert_eq!(chain.output_frame(), "rotated");
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn test_duplicate_frame_rejected() {
        let result = TransformChain::new("detector").then(Model::shift([1.0, 1.0]), "detector");
        assert_eq!(result.unwrap_err(), ModelError::duplicate_frame("detector"));
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let result = TransformChain::new("a")
            .then(Model::shift([1.0, 1.0, 1.0]), "b")
            .unwrap()
            .then(Model::rotation(10.0), "c");
        assert_eq!(result.unwrap_err(), ModelError::dimension_mismatch(3, 2));
    }

    #[test]
    fn test_slice_inclusive() {
        let chain = three_stage_chain();
        let sub = chain.slice("offset", "rotated").unwrap();
        assert_eq!(sub.frames(), ["offset", "focal", "rotated"]);
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.models(), &chain.models()[1..3]);
    }

    #[test]
    fn test_slice_same_frame_is_identity() {
        let chain = three_stage_chain();
        let sub = chain.slice("focal", "focal").unwrap();
        assert!(sub.is_empty());
        assert_eq!(sub.evaluate(&[vec![1.0], vec![2.0]]).unwrap(), vec![vec![1.0], vec![2.0]]);
    }

    #[test]
    fn test_slice_reversed_order_fails() {
        let chain = three_stage_chain();
        let err = chain.slice("focal", "detector").unwrap_err();
        assert!(err.is_frame_not_found());
    }

    #[test]
    fn test_slice_unknown_frame_fails() {
        let chain = three_stage_chain();
        assert!(chain.slice("detector", "sky").unwrap_err().is_frame_not_found());
        assert!(chain.slice("sky", "detector").unwrap_err().is_frame_not_found());
    }

    #[test]
    fn test_evaluate_arrays() {
        let chain = TransformChain::new("detector")
            .then(Model::shift([-1.0, -1.0]), "offset")
            .unwrap()
            .then(Model::scale([2.0, 3.0]).unwrap(), "focal")
            .unwrap();
        let out = chain
            .evaluate(&[vec![1.0, 2.0, 3.0], vec![1.0, 1.0, 2.0]])
            .unwrap();
        assert_eq!(out, vec![vec![0.0, 2.0, 4.0], vec![0.0, 0.0, 3.0]]);
    }

    #[test]
    fn test_evaluate_broadcasts_scalars() {
        let chain = TransformChain::new("a").then(Model::shift([1.0, 10.0]), "b").unwrap();
        let out = chain.evaluate(&[vec![1.0, 2.0], vec![0.0]]).unwrap();
        assert_eq!(out, vec![vec![2.0, 3.0], vec![10.0, 10.0]]);
    }

    #[test]
    fn test_evaluate_shape_mismatch() {
        let chain = TransformChain::new("a").then(Model::shift([1.0, 1.0]), "b").unwrap();
        let err = chain.evaluate(&[vec![1.0, 2.0], vec![1.0, 2.0, 3.0]]).unwrap_err();
        assert!(matches!(err, ModelError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_evaluate_wrong_axis_count() {
        let chain = three_stage_chain();
        let err = chain.evaluate(&[vec![1.0]]).unwrap_err();
        assert_eq!(err, ModelError::dimension_mismatch(2, 1));
    }

    #[test]
    fn test_inverse_roundtrip() {
        let chain = three_stage_chain();
        let inverse = chain.inverse().unwrap();
        assert_eq!(inverse.frames(), ["rotated", "focal", "offset", "detector"]);

        let forward = chain.evaluate_point(&[5.0, 7.0]).unwrap();
        let back = inverse.evaluate_point(&forward).unwrap();
        assert!((back[0] - 5.0).abs() < 1e-12);
        assert!((back[1] - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_inverse_unavailable() {
        let mut poly = Polynomial2D::new(2);
        poly.set_a(2, 0, 1e-4);
        let chain = three_stage_chain().then(poly, "distorted").unwrap();
        assert_eq!(chain.inverse().unwrap_err(), ModelError::no_inverse("Polynomial2D"));
    }

    #[test]
    fn test_output_longitude_axis() {
        assert_eq!(three_stage_chain().output_longitude_axis(), None);
        let sky = three_stage_chain()
            .then(Model::pix2sky_tan(), "native")
            .unwrap()
            .then(SkyRotation::from_crval(0.0, 10.0).unwrap(), "icrs")
            .unwrap();
        assert_eq!(sky.output_longitude_axis(), Some(0));
        assert_eq!(sky.slice("detector", "focal").unwrap().output_longitude_axis(), None);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = three_stage_chain();
        let mut copy = original.clone();
        copy.push(Model::shift([1.0, 1.0]), "extra").unwrap();
        assert_eq!(original.len(), 3);
        assert_eq!(copy.len(), 4);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip() {
        let chain = three_stage_chain();
        let json = serde_json::to_string(&chain).unwrap();
        let restored: TransformChain = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, chain);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_rejects_duplicate_frames() {
        let json = r#"{"frames":["a","a"],"models":[{"Rotation2D":{"angle_deg":1.0}}]}"#;
        assert!(serde_json::from_str::<TransformChain>(json).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_rejects_zero_scale() {
        let json = r#"{"frames":["a","b"],"models":[{"Scale":{"factors":[0.0,1.0]}}]}"#;
        assert!(serde_json::from_str::<TransformChain>(json).is_err());
        assert!(serde_json::from_str::<Model>(r#"{"Scale":{"factors":[0.0,1.0]}}"#).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_rejects_singular_affine() {
        let json = r#"{"frames":["a","b"],"models":[{"Affine":{
            "matrix":[[1.0,2.0],[2.0,4.0]],"translation":[0.0,0.0],
            "matrix_inverse":[[1.0,0.0],[0.0,1.0]],"determinant":1.0}}]}"#;
        assert!(serde_json::from_str::<TransformChain>(json).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_ignores_stored_affine_inverse() {
        let json = r#"{"frames":["a","b"],"models":[{"Affine":{
            "matrix":[[2.0,0.0],[0.0,2.0]],"translation":[1.0,2.0],
            "matrix_inverse":[[1.0,0.0],[0.0,1.0]],"determinant":1.0}}]}"#;
        let chain: TransformChain = serde_json::from_str(json).unwrap();
        let back = chain.inverse().unwrap().evaluate_point(&[3.0, 6.0]).unwrap();
        assert_eq!(back, vec![1.0, 2.0]);
    }
}
