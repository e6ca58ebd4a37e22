use crate::frame::Unit;

#[derive(Debug, Clone, PartialEq)]
pub struct WorldAxis {
    name: Option<String>,
    unit: Option<Unit>,
    values: Vec<f64>,
}

impl WorldAxis {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            name: None,
            unit: None,
            values,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    pub fn unit(&self) -> Option<&Unit> {
        self.unit.as_ref()
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Result of evaluating a WCS: one [`WorldAxis`] per output axis.
///
/// Frames attach names and units; a bare output label yields unlabelled
/// axes holding the raw transform output.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldCoordinates {
    axes: Vec<WorldAxis>,
}

impl WorldCoordinates {
    pub fn new(axes: Vec<WorldAxis>) -> Self {
        Self { axes }
    }

    pub fn raw(values: Vec<Vec<f64>>) -> Self {
        Self {
            axes: values.into_iter().map(WorldAxis::new).collect(),
        }
    }

    #[inline]
    pub fn axes(&self) -> &[WorldAxis] {
        &self.axes
    }

    #[inline]
    pub fn axis(&self, index: usize) -> Option<&WorldAxis> {
        self.axes.get(index)
    }

    #[inline]
    pub fn n_axes(&self) -> usize {
        self.axes.len()
    }

    pub fn n_points(&self) -> usize {
        self.axes.first().map_or(0, |axis| axis.values.len())
    }

    /// Per-axis values with names and units dropped.
    pub fn values(&self) -> Vec<Vec<f64>> {
        self.axes.iter().map(|axis| axis.values.clone()).collect()
    }

    /// Transposed view: one `Vec` per point, one entry per axis.
    pub fn points(&self) -> Vec<Vec<f64>> {
        (0..self.n_points())
            .map(|i| self.axes.iter().map(|axis| axis.values[i]).collect())
            .collect()
    }

    pub fn into_values(self) -> Vec<Vec<f64>> {
        self.axes.into_iter().map(|axis| axis.values).collect()
    }
}
