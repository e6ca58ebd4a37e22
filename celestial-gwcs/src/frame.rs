//! Coordinate frames at the ends of a WCS pipeline.
//!
//! A frame is referenced either by a bare label or by an object
//! implementing [`CoordinateFrame`]. Only frame objects carry units and
//! know how to turn raw transform output into [`WorldCoordinates`].

use std::fmt;
use std::sync::Arc;

use celestial_models::math::normalize_longitude;

use crate::coordinate::{WorldAxis, WorldCoordinates};
use crate::error::{WcsError, WcsResult};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Unit {
    Pixel,
    Degree,
    Radian,
    Arcsec,
    Millimeter,
    Dimensionless,
    Other(String),
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixel => write!(f, "pix"),
            Self::Degree => write!(f, "deg"),
            Self::Radian => write!(f, "rad"),
            Self::Arcsec => write!(f, "arcsec"),
            Self::Millimeter => write!(f, "mm"),
            Self::Dimensionless => write!(f, ""),
            Self::Other(name) => write!(f, "{}", name),
        }
    }
}

pub trait CoordinateFrame: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn units(&self) -> &[Unit];

    fn axis_names(&self) -> &[String];

    #[inline]
    fn naxes(&self) -> usize {
        self.units().len()
    }

    /// Wraps raw transform output, attaching this frame's axis names and units.
    fn world_coordinates(&self, raw: Vec<Vec<f64>>) -> WcsResult<WorldCoordinates> {
        label_axes(self, raw)
    }
}

fn label_axes<F: CoordinateFrame + ?Sized>(
    frame: &F,
    raw: Vec<Vec<f64>>,
) -> WcsResult<WorldCoordinates> {
    if raw.len() != frame.naxes() {
        return Err(WcsError::frame_mismatch(format!(
            "frame '{}' has {} axes, transform produced {}",
            frame.name(),
            frame.naxes(),
            raw.len()
        )));
    }
    let axes = raw
        .into_iter()
        .zip(frame.axis_names().iter().zip(frame.units()))
        .map(|(values, (name, unit))| {
            WorldAxis::new(values)
                .with_name(name.clone())
                .with_unit(unit.clone())
        })
        .collect();
    Ok(WorldCoordinates::new(axes))
}

#[derive(Debug, Clone)]
pub enum FrameRef {
    Label(String),
    Frame(Arc<dyn CoordinateFrame>),
}

impl FrameRef {
    pub fn label(name: impl Into<String>) -> Self {
        Self::Label(name.into())
    }

    pub fn frame(frame: impl CoordinateFrame + 'static) -> Self {
        Self::Frame(Arc::new(frame))
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Label(name) => name,
            Self::Frame(frame) => frame.name(),
        }
    }

    pub fn unit(&self) -> WcsResult<&[Unit]> {
        match self {
            Self::Label(name) => Err(WcsError::unit_access(name.as_str())),
            Self::Frame(frame) => Ok(frame.units()),
        }
    }

    pub fn as_frame(&self) -> Option<&dyn CoordinateFrame> {
        match self {
            Self::Label(_) => None,
            Self::Frame(frame) => Some(frame.as_ref()),
        }
    }

    #[inline]
    pub fn is_label(&self) -> bool {
        matches!(self, Self::Label(_))
    }
}

impl From<&str> for FrameRef {
    fn from(name: &str) -> Self {
        Self::label(name)
    }
}

impl From<String> for FrameRef {
    fn from(name: String) -> Self {
        Self::Label(name)
    }
}

impl fmt::Display for FrameRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A frame with arbitrary axes and units and no further semantics.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericFrame {
    name: String,
    axis_names: Vec<String>,
    units: Vec<Unit>,
}

impl GenericFrame {
    pub fn new(
        name: impl Into<String>,
        axis_names: impl IntoIterator<Item = impl Into<String>>,
        units: Vec<Unit>,
    ) -> WcsResult<Self> {
        let axis_names: Vec<String> = axis_names.into_iter().map(Into::into).collect();
        if axis_names.len() != units.len() {
            return Err(WcsError::invalid_parameter(format!(
                "{} axis names for {} units",
                axis_names.len(),
                units.len()
            )));
        }
        Ok(Self {
            name: name.into(),
            axis_names,
            units,
        })
    }

    /// Two pixel axes named `x` and `y`.
    pub fn detector(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            axis_names: vec!["x".to_string(), "y".to_string()],
            units: vec![Unit::Pixel, Unit::Pixel],
        }
    }
}

impl CoordinateFrame for GenericFrame {
    fn name(&self) -> &str {
        &self.name
    }

    fn units(&self) -> &[Unit] {
        &self.units
    }

    fn axis_names(&self) -> &[String] {
        &self.axis_names
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CelestialReference {
    #[default]
    Icrs,
    Fk5,
    Galactic,
    Ecliptic,
    Supergalactic,
}

impl CelestialReference {
    pub fn axis_names(&self) -> [&'static str; 2] {
        match self {
            Self::Icrs | Self::Fk5 => ["ra", "dec"],
            Self::Galactic => ["l", "b"],
            Self::Ecliptic => ["lon", "lat"],
            Self::Supergalactic => ["sgl", "sgb"],
        }
    }
}

/// Longitude/latitude sky frame in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialFrame {
    name: String,
    reference: CelestialReference,
    axis_names: Vec<String>,
    units: Vec<Unit>,
}

impl CelestialFrame {
    pub fn new(name: impl Into<String>, reference: CelestialReference) -> Self {
        Self {
            name: name.into(),
            reference,
            axis_names: reference.axis_names().iter().map(|s| s.to_string()).collect(),
            units: vec![Unit::Degree, Unit::Degree],
        }
    }

    pub fn icrs() -> Self {
        Self::new("icrs", CelestialReference::Icrs)
    }

    #[inline]
    pub fn reference(&self) -> CelestialReference {
        self.reference
    }
}

impl CoordinateFrame for CelestialFrame {
    fn name(&self) -> &str {
        &self.name
    }

    fn units(&self) -> &[Unit] {
        &self.units
    }

    fn axis_names(&self) -> &[String] {
        &self.axis_names
    }

    /// Longitudes wrap into `[0, 360)`; latitudes outside `[-90, 90]` fail.
    /// NaN passes through untouched.
    fn world_coordinates(&self, mut raw: Vec<Vec<f64>>) -> WcsResult<WorldCoordinates> {
        if raw.len() == 2 {
            for lon in raw[0].iter_mut() {
                *lon = normalize_longitude(*lon);
            }
            if let Some(lat) = raw[1].iter().find(|lat| lat.abs() > 90.0) {
                return Err(WcsError::out_of_bounds(format!(
                    "latitude {} outside [-90, 90] in frame '{}'",
                    lat, self.name
                )));
            }
        }
        label_axes(self, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_has_no_unit() {
        let frame = FrameRef::from("sky");
        assert!(frame.is_label());
        assert_eq!(frame.name(), "sky");
        assert!(matches!(frame.unit(), Err(WcsError::UnitAccess { .. })));
        assert!(frame.as_frame().is_none());
    }

    #[test]
    fn test_frame_unit() {
        let frame = FrameRef::frame(CelestialFrame::icrs());
        assert_eq!(frame.name(), "icrs");
        assert_eq!(frame.unit().unwrap(), &[Unit::Degree, Unit::Degree]);
    }

    #[test]
    fn test_generic_frame_length_check() {
        let result = GenericFrame::new("focal", ["x", "y"], vec![Unit::Millimeter]);
        assert!(result.is_err());
    }

    #[test]
    fn test_generic_frame_attaches_labels() {
        let frame = GenericFrame::new("focal", ["x", "y"], vec![Unit::Millimeter; 2]).unwrap();
        let coords = frame
            .world_coordinates(vec![vec![1.0], vec![2.0]])
            .unwrap();
        assert_eq!(coords.axis(0).unwrap().name(), Some("x"));
        assert_eq!(coords.axis(1).unwrap().unit(), Some(&Unit::Millimeter));
    }

    #[test]
    fn test_world_coordinates_axis_count_mismatch() {
        let frame = GenericFrame::detector("detector");
        let result = frame.world_coordinates(vec![vec![1.0]]);
        assert!(matches!(result, Err(WcsError::FrameMismatch { .. })));
    }

    #[test]
    fn test_celestial_frame_wraps_longitude() {
        let frame = CelestialFrame::icrs();
        let coords = frame
            .world_coordinates(vec![vec![-10.0, 370.0], vec![0.0, 45.0]])
            .unwrap();
        assert_eq!(coords.axis(0).unwrap().values(), &[350.0, 10.0]);
        assert_eq!(coords.axis(0).unwrap().name(), Some("ra"));
        assert_eq!(coords.axis(1).unwrap().name(), Some("dec"));
    }

    #[test]
    fn test_celestial_frame_rejects_latitude() {
        let frame = CelestialFrame::new("gal", CelestialReference::Galactic);
        let result = frame.world_coordinates(vec![vec![0.0], vec![91.0]]);
        assert!(matches!(result, Err(WcsError::OutOfBounds { .. })));
    }

    #[test]
    fn test_unit_display() {
        assert_eq!(Unit::Degree.to_string(), "deg");
        assert_eq!(Unit::Other("Jy".into()).to_string(), "Jy");
    }
}
