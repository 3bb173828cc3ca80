//! JSON exchange documents.
//!
//! A document carries the vertex buffer, the input loops and, once solved,
//! the convex regions:
//!
//! ```json
//! {
//!   "vertices": [[-4, 0], [-3, -2], [3, -2]],
//!   "input": { "outer": [0, 1, 2], "holes": [] },
//!   "output": [[0, 1, 2]]
//! }
//! ```
//!
//! `holes` and `output` may be omitted when reading.

use crate::config::DecomposeOptions;
use crate::error::DecompError;
use crate::polygon::decompose_with;
use crate::primitives::Point2;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors raised while reading, writing or solving a document.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The document is not valid JSON or does not match the schema.
    #[error("invalid document: {0}")]
    Json(#[from] serde_json::Error),

    /// The polygon in the document could not be decomposed.
    #[error(transparent)]
    Decomposition(#[from] DecompError),
}

/// The polygon loops of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecompositionInput {
    /// Outer loop.
    pub outer: Vec<usize>,
    /// Hole loops.
    #[serde(default)]
    pub holes: Vec<Vec<usize>>,
}

/// A polygon with holes and its convex decomposition.
///
/// # Example
///
/// ```
/// use convex_decomp::io::DecompositionDocument;
/// use convex_decomp::DecomposeOptions;
///
/// let json = r#"{
///     "vertices": [[0, 0], [2, 0], [2, 1], [1, 1], [1, 2], [0, 2]],
///     "input": { "outer": [0, 1, 2, 3, 4, 5] }
/// }"#;
///
/// let mut doc = DecompositionDocument::from_json(json).unwrap();
/// let regions = doc.solve(&DecomposeOptions::default()).unwrap();
/// assert!(regions.len() >= 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecompositionDocument {
    /// Vertex buffer as `[x, y]` pairs.
    pub vertices: Vec<[f64; 2]>,
    /// Input loops.
    pub input: DecompositionInput,
    /// Convex regions, empty until solved.
    #[serde(default)]
    pub output: Vec<Vec<usize>>,
}

impl DecompositionDocument {
    /// Creates an unsolved document.
    pub fn new(vertices: &[Point2<f64>], outer: Vec<usize>, holes: Vec<Vec<usize>>) -> Self {
        Self {
            vertices: vertices.iter().map(|&p| p.into()).collect(),
            input: DecompositionInput { outer, holes },
            output: Vec::new(),
        }
    }

    /// Parses a document.
    pub fn from_json(json: &str) -> Result<Self, ExchangeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the document with indentation.
    pub fn to_json(&self) -> Result<String, ExchangeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The vertex buffer as points.
    pub fn points(&self) -> Vec<Point2<f64>> {
        self.vertices.iter().map(|&p| Point2::from(p)).collect()
    }

    /// Decomposes the input and stores the regions in `output`.
    pub fn solve(&mut self, options: &DecomposeOptions) -> Result<&[Vec<usize>], ExchangeError> {
        let points = self.points();
        let regions = decompose_with(&points, &self.input.outer, &self.input.holes, options)?;
        debug!(regions = regions.len(), "solved document");
        self.output = regions.into_iter().map(|r| r.indices).collect();
        Ok(&self.output)
    }
}
