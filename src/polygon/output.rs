//! Canonical convex regions and index compaction.

use super::core::{is_convex_loop, signed_area};
use crate::error::DecompError;
use crate::primitives::Point2;
use crate::tolerance::{orient2d, Orientation};
use num_traits::Float;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A convex piece of a decomposition.
///
/// The loop is counter-clockwise, free of consecutive duplicates and starts at
/// its smallest vertex index. Indices refer to the caller's vertex buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConvexRegion {
    /// Vertex indices, counter-clockwise.
    pub indices: Vec<usize>,
}

impl ConvexRegion {
    /// Returns the number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if the region has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Area of the region.
    pub fn area<F: Float>(&self, vertices: &[Point2<F>]) -> F {
        signed_area(vertices, &self.indices)
    }

    /// Returns `true` if no corner turns clockwise by more than `eps`.
    pub fn is_convex<F: Float>(&self, vertices: &[Point2<F>], eps: F) -> bool {
        is_convex_loop(vertices, &self.indices, eps)
    }

    /// Resolves the indices to points.
    pub fn points<F: Float>(&self, vertices: &[Point2<F>]) -> Vec<Point2<F>> {
        self.indices.iter().map(|&i| vertices[i]).collect()
    }

    /// Returns `true` if the interiors of two convex regions intersect.
    ///
    /// Regions sharing an edge or a vertex do not overlap. Both regions must
    /// be counter-clockwise and convex.
    pub fn overlaps<F: Float>(&self, other: &Self, vertices: &[Point2<F>], eps: F) -> bool {
        !(self.separated_by_edge(other, vertices, eps)
            || other.separated_by_edge(self, vertices, eps))
    }

    /// Some edge of `self` has every vertex of `other` on or right of it.
    fn separated_by_edge<F: Float>(&self, other: &Self, vertices: &[Point2<F>], eps: F) -> bool {
        let n = self.indices.len();
        (0..n).any(|k| {
            let a = vertices[self.indices[k]];
            let b = vertices[self.indices[(k + 1) % n]];
            other
                .indices
                .iter()
                .all(|&i| orient2d(a, b, vertices[i], eps) != Orientation::CounterClockwise)
        })
    }
}

/// Turns raw region loops into canonical, sorted [`ConvexRegion`]s.
///
/// Each loop is made counter-clockwise, consecutive duplicate indices are
/// collapsed and the loop is rotated to start at its smallest index.
///
/// # Errors
///
/// - [`DecompError::InternalInvariantViolation`] if an index is out of range.
/// - [`DecompError::DegenerateGeometry`] if a loop has fewer than three
///   vertices or no area.
pub fn build_regions<F: Float>(
    vertices: &[Point2<F>],
    loops: &[Vec<usize>],
    eps: F,
) -> Result<Vec<ConvexRegion>, DecompError> {
    let mut regions = Vec::with_capacity(loops.len());

    for raw in loops {
        if let Some(&index) = raw.iter().find(|&&i| i >= vertices.len()) {
            return Err(DecompError::InternalInvariantViolation(format!(
                "region references vertex {} of {}",
                index,
                vertices.len()
            )));
        }

        let mut indices = raw.clone();
        indices.dedup();
        while indices.len() > 1 && indices.first() == indices.last() {
            indices.pop();
        }

        let mut area = signed_area(vertices, &indices);
        if area < F::zero() {
            indices.reverse();
            area = -area;
        }
        if indices.len() < 3 || area + area <= eps {
            return Err(DecompError::DegenerateGeometry {
                indices,
                area: area.to_f64().unwrap_or(f64::NAN),
            });
        }

        if let Some(start) = indices
            .iter()
            .enumerate()
            .min_by_key(|&(_, &i)| i)
            .map(|(pos, _)| pos)
        {
            indices.rotate_left(start);
        }
        regions.push(ConvexRegion { indices });
    }

    regions.sort_unstable();
    Ok(regions)
}

/// Compacts vertex indices to a dense `0..k` numbering.
///
/// Indices are numbered in the order they are first seen across all calls to
/// [`apply`](Remapper::apply); [`mapped`](Remapper::mapped) then extracts the
/// matching compact vertex buffer.
///
/// # Example
///
/// ```
/// use convex_decomp::polygon::Remapper;
///
/// let mut remapper = Remapper::new();
/// assert_eq!(remapper.apply(&[1, 4, 5]), vec![0, 1, 2]);
///
/// let points = [4.0, 8.0, 15.0, 16.0, 23.0, 42.0];
/// assert_eq!(remapper.mapped(&points), Some(vec![8.0, 23.0, 42.0]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Remapper {
    mapping: HashMap<usize, usize>,
    order: Vec<usize>,
}

impl Remapper {
    /// Creates an empty remapper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct indices seen so far.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no index has been seen.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Renumbers `indices`, assigning new numbers to unseen ones.
    pub fn apply(&mut self, indices: &[usize]) -> Vec<usize> {
        indices
            .iter()
            .map(|&index| {
                let next = self.order.len();
                let mapped = *self.mapping.entry(index).or_insert(next);
                if mapped == next {
                    self.order.push(index);
                }
                mapped
            })
            .collect()
    }

    /// Gathers the elements addressed so far, in their new order.
    ///
    /// Returns `None` if an applied index is out of range for `items`.
    pub fn mapped<T: Clone>(&self, items: &[T]) -> Option<Vec<T>> {
        self.order.iter().map(|&i| items.get(i).cloned()).collect()
    }
}
