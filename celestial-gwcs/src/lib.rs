//! Generalized world coordinate systems.
//!
//! A [`Wcs`] maps detector coordinates to a world frame through a named
//! [`TransformChain`]. Any two frames of the chain can be evaluated in
//! isolation, and the whole mapping inverts analytically when every stage
//! allows it, or through an [`IterativeInverter`] otherwise.
//!
//! ```
//! use celestial_gwcs::{CelestialFrame, FrameRef, Wcs};
//! use celestial_models::{Affine2D, Model, SkyRotation, TransformChain};
//!
//! let chain = TransformChain::new("detector")
//!     .then(Affine2D::from_cd([512.0, 512.0], [[-1e-4, 0.0], [0.0, 1e-4]])?, "focal")?
//!     .then(Model::pix2sky_tan(), "native")?
//!     .then(SkyRotation::from_crval(150.0, 2.0)?, "icrs")?;
//!
//! let wcs = Wcs::builder(FrameRef::frame(CelestialFrame::icrs()))
//!     .forward_transform(chain)
//!     .build_checked()?;
//!
//! let sky = wcs.evaluate(&[vec![512.0], vec![512.0]])?;
//! assert!((sky.axis(0).unwrap().values()[0] - 150.0).abs() < 1e-9);
//! assert!((sky.axis(1).unwrap().values()[0] - 2.0).abs() < 1e-9);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod coordinate;
pub mod error;
pub mod footprint;
pub mod frame;
pub mod inverse;
pub mod wcs;

pub use builder::WcsBuilder;
pub use celestial_models::{Model, ModelError, TransformChain};
pub use coordinate::{WorldAxis, WorldCoordinates};
pub use error::{LookupError, WcsError, WcsResult};
pub use footprint::footprint_corners;
pub use frame::{CelestialFrame, CelestialReference, CoordinateFrame, FrameRef, GenericFrame, Unit};
pub use inverse::{InvertOptions, IterativeInverter, NewtonInverter};
pub use wcs::Wcs;
