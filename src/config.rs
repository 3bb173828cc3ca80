//! Tuning knobs for triangulation and decomposition.

use num_traits::Float;
use serde::{Deserialize, Serialize};

/// Options accepted by [`decompose_with`](crate::decompose_with) and
/// [`triangulate_with`](crate::triangulate_with).
///
/// Tolerances are stored as `f64` so one configuration serves both `f32` and
/// `f64` vertex buffers. Missing fields take their defaults when deserialized.
///
/// Both tolerances are absolute, so they depend on the scale of the input.
/// `epsilon` is compared against cross products and coordinate differences,
/// `min_triangle_area` against areas. The defaults suit coordinates of order
/// one to a few thousand. For much smaller or larger geometry, scale them
/// with the data: for a bounding box of size `s`, an `epsilon` around
/// `1e-10 * s * s` and a `min_triangle_area` around `1e-12 * s * s`. With the
/// defaults, a polygon whose doubled area is below `1e-10` is rejected as
/// [`LoopDefect::ZeroArea`](crate::LoopDefect::ZeroArea).
///
/// # Example
///
/// ```
/// use convex_decomp::DecomposeOptions;
///
/// let options: DecomposeOptions =
///     serde_json::from_str(r#"{ "epsilon": 1e-9, "fixed_edges": [[0, 2]] }"#).unwrap();
/// assert_eq!(options.epsilon, 1e-9);
/// assert!(!options.refine);
/// assert!(options.is_fixed(2, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecomposeOptions {
    /// Orientation tolerance, compared against cross products (twice the
    /// signed triangle area).
    pub epsilon: f64,
    /// Triangles and regions with a smaller area are degenerate.
    pub min_triangle_area: f64,
    /// Run Lawson edge flips on the triangulation before merging.
    pub refine: bool,
    /// Diagonals, as vertex index pairs, that must stay region boundaries.
    pub fixed_edges: Vec<[usize; 2]>,
}

impl Default for DecomposeOptions {
    fn default() -> Self {
        Self {
            epsilon: 1e-10,
            min_triangle_area: 1e-12,
            refine: false,
            fixed_edges: Vec::new(),
        }
    }
}

impl DecomposeOptions {
    /// Returns the options with a different orientation tolerance.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Returns the options with a different degenerate-area threshold.
    pub fn with_min_triangle_area(mut self, area: f64) -> Self {
        self.min_triangle_area = area;
        self
    }

    /// Returns the options with refinement switched on or off.
    pub fn with_refine(mut self, refine: bool) -> Self {
        self.refine = refine;
        self
    }

    /// Returns the options with an extra fixed edge.
    pub fn with_fixed_edge(mut self, a: usize, b: usize) -> Self {
        self.fixed_edges.push([a, b]);
        self
    }

    /// Returns `true` if the undirected edge `a`-`b` is fixed.
    pub fn is_fixed(&self, a: usize, b: usize) -> bool {
        self.fixed_edges
            .iter()
            .any(|&[p, q]| (p == a && q == b) || (p == b && q == a))
    }

    /// Orientation tolerance converted to the vertex type.
    pub(crate) fn eps<F: Float>(&self) -> F {
        F::from(self.epsilon).unwrap_or_else(F::epsilon)
    }

    /// Minimum area converted to the vertex type.
    pub(crate) fn min_area<F: Float>(&self) -> F {
        F::from(self.min_triangle_area).unwrap_or_else(F::min_positive_value)
    }
}
