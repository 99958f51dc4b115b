use crate::error::TreeError;
use crate::geometry::Extent;

/// Deepest hierarchy a tree may be built with. Depth 10 is already
/// about 1.4 million nodes.
pub const MAX_DEPTH: u8 = 10;

/// How radius queries pick the leaves they scan.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RadiusSearch {
    /// Climb from the starting node until the query circle is enclosed (or
    /// the root is reached), then descend into every child the circle
    /// touches.
    #[default]
    Escalating,
    /// Scan only the starting leaf. Neighbours across a leaf border are
    /// missed.
    LeafLocal,
}

/// Shape of a [`CollisionTree`](crate::CollisionTree), fixed when it is built.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TreeConfig {
    pub max_depth: u8,
    pub leaf_width: f64,
    pub leaf_height: f64,
    pub radius_search: RadiusSearch,
}

impl TreeConfig {
    pub fn new(max_depth: u8, leaf_width: f64, leaf_height: f64) -> Self {
        Self {
            max_depth,
            leaf_width,
            leaf_height,
            radius_search: RadiusSearch::default(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: u8) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_leaf_size(mut self, width: f64, height: f64) -> Self {
        self.leaf_width = width;
        self.leaf_height = height;
        self
    }

    pub fn with_radius_search(mut self, radius_search: RadiusSearch) -> Self {
        self.radius_search = radius_search;
        self
    }

    pub fn validate(&self) -> Result<(), TreeError> {
        if self.max_depth > MAX_DEPTH {
            return Err(TreeError::InvalidConfig(format!(
                "max_depth {} exceeds the limit of {}",
                self.max_depth, MAX_DEPTH
            )));
        }
        for (name, value) in [("leaf_width", self.leaf_width), ("leaf_height", self.leaf_height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(TreeError::InvalidConfig(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        let grid = self.grid_extent();
        if !grid.width.is_finite() || !grid.height.is_finite() {
            return Err(TreeError::InvalidConfig(format!(
                "grid extent {} x {} is not finite",
                grid.width, grid.height
            )));
        }
        Ok(())
    }

    pub fn leaf_extent(&self) -> Extent {
        Extent::new(self.leaf_width, self.leaf_height)
    }

    /// Size of the whole grid: each level doubles both sides.
    pub fn grid_extent(&self) -> Extent {
        let scale = 2f64.powi(self.max_depth as i32);
        Extent::new(self.leaf_width * scale, self.leaf_height * scale)
    }

    /// Number of nodes in a complete hierarchy of this depth. Only meaningful
    /// for validated configs.
    pub(crate) fn node_count(&self) -> usize {
        ((1usize << (2 * (self.max_depth as usize + 1))) - 1) / 3
    }
}
