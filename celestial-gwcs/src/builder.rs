use std::sync::Arc;

use celestial_models::TransformChain;

use crate::error::WcsResult;
use crate::frame::FrameRef;
use crate::inverse::IterativeInverter;
use crate::wcs::Wcs;

pub const DEFAULT_INPUT_FRAME: &str = "detector";

#[derive(Debug, Clone)]
pub struct WcsBuilder {
    output_frame: FrameRef,
    input_frame: FrameRef,
    forward_transform: Option<TransformChain>,
    name: String,
    inverter: Option<Arc<dyn IterativeInverter>>,
}

impl WcsBuilder {
    pub fn new(output_frame: impl Into<FrameRef>) -> Self {
        Self {
            output_frame: output_frame.into(),
            input_frame: FrameRef::label(DEFAULT_INPUT_FRAME),
            forward_transform: None,
            name: String::new(),
            inverter: None,
        }
    }

    pub fn input_frame(mut self, frame: impl Into<FrameRef>) -> Self {
        self.input_frame = frame.into();
        self
    }

    pub fn forward_transform(mut self, transform: TransformChain) -> Self {
        self.forward_transform = Some(transform);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn inverter(mut self, inverter: impl IterativeInverter + 'static) -> Self {
        self.inverter = Some(Arc::new(inverter));
        self
    }

    /// Assembles the WCS without checking the chain against the frames.
    pub fn build(self) -> Wcs {
        let mut wcs = Wcs::new(
            self.output_frame,
            self.input_frame,
            self.forward_transform,
            self.name,
        );
        wcs.set_inverter(self.inverter);
        wcs
    }

    /// Like [`build`](Self::build), then runs [`Wcs::validate`].
    pub fn build_checked(self) -> WcsResult<Wcs> {
        let wcs = self.build();
        wcs.validate()?;
        Ok(wcs)
    }
}
