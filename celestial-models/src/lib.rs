pub mod affine;
pub mod chain;
pub mod error;
pub mod math;
pub mod model;
pub mod polynomial;
pub mod spherical;

pub use affine::Affine2D;
pub use chain::TransformChain;
pub use error::{ModelError, ModelResult};
pub use model::Model;
pub use polynomial::{PolyTerm, Polynomial2D};
pub use spherical::{ProjectionDirection, RotationDirection, SkyRotation};
