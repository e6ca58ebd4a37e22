use std::fmt;
use std::sync::Arc;

use celestial_models::TransformChain;
use tracing::debug;

use crate::builder::WcsBuilder;
use crate::coordinate::WorldCoordinates;
use crate::error::{LookupError, WcsError, WcsResult};
use crate::footprint::{corner_axes, footprint_corners};
use crate::frame::{FrameRef, Unit};
use crate::inverse::{InvertOptions, IterativeInverter};

/// A named mapping from an input (detector) frame to an output (world)
/// frame through a chain of transform models.
///
/// The forward chain is optional; every operation that needs it fails with
/// [`WcsError::Configuration`] while it is unset.
#[derive(Debug, Clone)]
pub struct Wcs {
    forward_transform: Option<TransformChain>,
    input_frame: FrameRef,
    output_frame: FrameRef,
    name: String,
    inverter: Option<Arc<dyn IterativeInverter>>,
}

impl Wcs {
    pub fn new(
        output_frame: impl Into<FrameRef>,
        input_frame: impl Into<FrameRef>,
        forward_transform: Option<TransformChain>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            forward_transform,
            input_frame: input_frame.into(),
            output_frame: output_frame.into(),
            name: name.into(),
            inverter: None,
        }
    }

    pub fn builder(output_frame: impl Into<FrameRef>) -> WcsBuilder {
        WcsBuilder::new(output_frame)
    }

    /// Installs the fallback used by [`invert`](Self::invert) when the chain
    /// has no analytical inverse.
    pub fn with_inverter(mut self, inverter: impl IterativeInverter + 'static) -> Self {
        self.inverter = Some(Arc::new(inverter));
        self
    }

    pub(crate) fn set_inverter(&mut self, inverter: Option<Arc<dyn IterativeInverter>>) {
        self.inverter = inverter;
    }

    /// Units of the output frame.
    pub fn unit(&self) -> WcsResult<&[Unit]> {
        self.output_frame.unit()
    }

    #[inline]
    pub fn output_frame(&self) -> &FrameRef {
        &self.output_frame
    }

    #[inline]
    pub fn input_frame(&self) -> &FrameRef {
        &self.input_frame
    }

    #[inline]
    pub fn forward_transform(&self) -> Option<&TransformChain> {
        self.forward_transform.as_ref()
    }

    /// Stores an independent copy of `transform`.
    pub fn set_forward_transform(&mut self, transform: &TransformChain) {
        self.forward_transform = Some(transform.clone());
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    fn chain(&self) -> WcsResult<&TransformChain> {
        self.forward_transform
            .as_ref()
            .ok_or_else(WcsError::transform_not_set)
    }

    /// Runs the full forward chain and hands the result to the output frame.
    pub fn evaluate(&self, coords: &[Vec<f64>]) -> WcsResult<WorldCoordinates> {
        let raw = self.chain()?.evaluate(coords)?;
        match self.output_frame.as_frame() {
            Some(frame) => frame.world_coordinates(raw),
            None => Ok(WorldCoordinates::raw(raw)),
        }
    }

    /// Maps output coordinates back to the input frame.
    ///
    /// The analytical inverse of the chain is preferred. Without one the
    /// installed [`IterativeInverter`] runs with `options`; with neither the
    /// call fails with [`WcsError::InversionUnavailable`].
    pub fn invert(&self, coords: &[Vec<f64>], options: &InvertOptions) -> WcsResult<Vec<Vec<f64>>> {
        let chain = self.chain()?;
        match chain.inverse() {
            Ok(inverse) => Ok(inverse.evaluate(coords)?),
            Err(err) if err.is_no_inverse() => {
                debug!(wcs = %self.name, reason = %err, "falling back to iterative inversion");
                self.invert_iterative(chain, coords, options, &err.to_string())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn invert_iterative(
        &self,
        chain: &TransformChain,
        coords: &[Vec<f64>],
        options: &InvertOptions,
        reason: &str,
    ) -> WcsResult<Vec<Vec<f64>>> {
        match &self.inverter {
            Some(inverter) => inverter.invert(chain, coords, options),
            None => Err(WcsError::inversion_unavailable(format!(
                "{} and no iterative inverter is installed",
                reason
            ))),
        }
    }

    /// Evaluates the sub-chain from `from` to `to`, both inclusive.
    pub fn transform(&self, from: &str, to: &str, coords: &[Vec<f64>]) -> WcsResult<Vec<Vec<f64>>> {
        let sub = self.chain()?.slice(from, to)?;
        Ok(sub.evaluate(coords)?)
    }

    /// The sub-chain between two frames in either direction.
    ///
    /// A reversed request is served by inverting the forward slice. Missing
    /// frames and non-invertible reversed slices both give `Ok(None)`; the
    /// only error is an unset forward transform.
    pub fn get_transform(&self, from: &str, to: &str) -> WcsResult<Option<TransformChain>> {
        let chain = self.chain()?;
        match lookup_transform(chain, from, to) {
            Ok(sub) => Ok(Some(sub)),
            Err(err) => {
                debug!(wcs = %self.name, %err, "sub-chain lookup found nothing");
                Ok(None)
            }
        }
    }

    /// Names of every frame boundary in the forward chain.
    pub fn available_frames(&self) -> WcsResult<&[String]> {
        Ok(self.chain()?.frames())
    }

    /// World positions of the image corners, counter-clockwise from the
    /// bottom-left. See [`footprint_corners`].
    pub fn footprint(&self, axes: (usize, usize), center: bool) -> WcsResult<WorldCoordinates> {
        let corners = footprint_corners(axes, center);
        self.evaluate(&corner_axes(&corners))
    }

    /// Checks that the chain starts at the input frame and ends at the
    /// output frame, and that frame objects agree with its axis counts.
    pub fn validate(&self) -> WcsResult<()> {
        let Some(chain) = &self.forward_transform else {
            return Ok(());
        };
        if chain.input_frame() != self.input_frame.name() {
            return Err(WcsError::frame_mismatch(format!(
                "chain starts at '{}', input frame is '{}'",
                chain.input_frame(),
                self.input_frame.name()
            )));
        }
        if chain.output_frame() != self.output_frame.name() {
            return Err(WcsError::frame_mismatch(format!(
                "chain ends at '{}', output frame is '{}'",
                chain.output_frame(),
                self.output_frame.name()
            )));
        }
        if let (Some(frame), Some(n_inputs)) = (self.input_frame.as_frame(), chain.n_inputs()) {
            if frame.naxes() != n_inputs {
                return Err(WcsError::frame_mismatch(format!(
                    "input frame '{}' has {} axes, chain expects {}",
                    frame.name(),
                    frame.naxes(),
                    n_inputs
                )));
            }
        }
        if let (Some(frame), Some(n_outputs)) = (self.output_frame.as_frame(), chain.n_outputs()) {
            if frame.naxes() != n_outputs {
                return Err(WcsError::frame_mismatch(format!(
                    "output frame '{}' has {} axes, chain produces {}",
                    frame.name(),
                    frame.naxes(),
                    n_outputs
                )));
            }
        }
        Ok(())
    }
}

fn lookup_transform(
    chain: &TransformChain,
    from: &str,
    to: &str,
) -> Result<TransformChain, LookupError> {
    if let Ok(sub) = chain.slice(from, to) {
        return Ok(sub);
    }
    let reversed = chain.slice(to, from).map_err(|_| LookupError::NotFound {
        from: from.to_string(),
        to: to.to_string(),
    })?;
    reversed
        .inverse()
        .map_err(|source| LookupError::NotInvertible {
            from: from.to_string(),
            to: to.to_string(),
            source,
        })
}

impl fmt::Display for Wcs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "WCS '{}': {} -> {}",
            self.name, self.input_frame, self.output_frame
        )?;
        let Some(chain) = &self.forward_transform else {
            return write!(f, "  (no forward transform)");
        };
        let width = chain.frames().iter().map(String::len).max().unwrap_or(0);
        for (frame, model) in chain.frames().iter().zip(chain.models()) {
            writeln!(f, "  {:<width$}  {}", frame, model.kind(), width = width)?;
        }
        write!(f, "  {:<width$}  None", chain.output_frame(), width = width)
    }
}
