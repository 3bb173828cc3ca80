//! Error types for triangulation and convex decomposition.

use std::fmt;
use thiserror::Error;

/// Which input loop an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopRole {
    /// The outer boundary.
    Outer,
    /// The hole at this position in the caller's hole list.
    Hole(usize),
}

impl fmt::Display for LoopRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopRole::Outer => write!(f, "outer"),
            LoopRole::Hole(i) => write!(f, "hole #{}", i),
        }
    }
}

/// Why a loop was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoopDefect {
    /// Fewer than three distinct vertices.
    #[error("needs at least 3 distinct vertices, found {distinct}")]
    TooFewVertices {
        /// Number of distinct vertex indices in the loop.
        distinct: usize,
    },

    /// A loop entry does not address the vertex buffer.
    #[error("vertex index {index} is out of range for {len} vertices")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Length of the vertex buffer.
        len: usize,
    },

    /// A loop vertex has a NaN or infinite coordinate.
    #[error("vertex {index} has a non-finite coordinate")]
    NonFiniteVertex {
        /// The offending index.
        index: usize,
    },

    /// The same vertex index (or position) appears twice.
    #[error("vertex {index} appears more than once")]
    RepeatedVertex {
        /// The repeated vertex index.
        index: usize,
    },

    /// Two edges of the loop touch or cross, or an edge folds back.
    #[error("edges starting at positions {first} and {second} intersect")]
    SelfIntersection {
        /// Loop position of the first edge's start vertex.
        first: usize,
        /// Loop position of the second edge's start vertex.
        second: usize,
    },

    /// All vertices are collinear within tolerance.
    #[error("loop encloses no area")]
    ZeroArea,
}

/// Why a hole was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HoleDefect {
    /// The hole is not inside the outer boundary.
    #[error("lies outside the outer boundary")]
    OutsideOuter,

    /// An edge of the hole crosses or overlaps the outer boundary.
    #[error("crosses the outer boundary")]
    CrossesOuter,

    /// An edge of the hole crosses or overlaps another hole.
    #[error("crosses hole #{other}")]
    CrossesHole {
        /// The other hole.
        other: usize,
    },

    /// The hole lies inside another hole.
    #[error("is nested inside hole #{other}")]
    NestedInHole {
        /// The enclosing hole.
        other: usize,
    },

    /// The hole touches another loop at more than one point.
    #[error("touches the {other} loop at more than one point")]
    MultipleContacts {
        /// The other loop.
        other: LoopRole,
    },
}

/// Errors reported by [`triangulate`](crate::triangulate) and
/// [`decompose`](crate::decompose).
///
/// A call either returns a complete result or the first violation found.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecompError {
    /// A loop has fewer than 3 vertices or is not simple.
    #[error("malformed {role} loop: {defect}")]
    MalformedLoop {
        /// The rejected loop.
        role: LoopRole,
        /// What is wrong with it.
        defect: LoopDefect,
    },

    /// A hole is outside the outer boundary, crosses it, or crosses another hole.
    #[error("invalid topology for hole #{hole}: {defect}")]
    InvalidHoleTopology {
        /// Index of the hole in the caller's hole list.
        hole: usize,
        /// What is wrong with it.
        defect: HoleDefect,
    },

    /// A triangle or region with zero or negative area was produced.
    #[error("degenerate geometry: {indices:?} has area {area:e}")]
    DegenerateGeometry {
        /// Vertex indices of the offending triangle or region.
        indices: Vec<usize>,
        /// Its signed area.
        area: f64,
    },

    /// An internal consistency check failed; the input slipped past validation.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(String),
}

impl DecompError {
    pub(crate) fn malformed(role: LoopRole, defect: LoopDefect) -> Self {
        DecompError::MalformedLoop { role, defect }
    }

    pub(crate) fn hole(hole: usize, defect: HoleDefect) -> Self {
        DecompError::InvalidHoleTopology { hole, defect }
    }
}
