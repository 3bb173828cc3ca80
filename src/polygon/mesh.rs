//! Triangle arena with neighbor links.
//!
//! Triangles are addressed by their position in the arena. Each one stores
//! its three vertex indices counter-clockwise and, for every edge, the index
//! of the triangle on the other side (`None` on the polygon boundary). The
//! links form the dual graph consumed by the convex merge.

use crate::error::DecompError;
use crate::primitives::Point2;
use num_traits::Float;
use std::collections::btree_map::{BTreeMap, Entry};

/// Undirected edge key: the two vertex indices in increasing order.
pub type EdgeKey = (usize, usize);

/// Builds the key of the undirected edge `a`-`b`.
#[inline]
pub fn edge_key(a: usize, b: usize) -> EdgeKey {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// A triangle of a [`Triangulation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    /// Vertex indices in counter-clockwise order.
    pub vertices: [usize; 3],
    /// `neighbors[i]` lies across the edge `vertices[i]` -> `vertices[i + 1]`.
    pub neighbors: [Option<usize>; 3],
}

impl Triangle {
    /// Creates a triangle without neighbor links.
    #[inline]
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self {
            vertices: [a, b, c],
            neighbors: [None; 3],
        }
    }

    /// Returns the directed edge `i` as `(start, end)`.
    #[inline]
    pub fn edge(&self, i: usize) -> (usize, usize) {
        (self.vertices[i], self.vertices[(i + 1) % 3])
    }

    /// Returns the vertex opposite edge `i`.
    #[inline]
    pub fn opposite(&self, i: usize) -> usize {
        self.vertices[(i + 2) % 3]
    }

    /// Finds the edge joining `a` and `b`, in either direction.
    pub fn edge_index(&self, a: usize, b: usize) -> Option<usize> {
        (0..3).find(|&i| edge_key(self.edge(i).0, self.edge(i).1) == edge_key(a, b))
    }

    /// Signed area of the triangle; positive for counter-clockwise.
    pub fn signed_area<F: Float>(&self, vertices: &[Point2<F>]) -> F {
        let [a, b, c] = self.vertices.map(|i| vertices[i]);
        (b - a).cross(c - a) / (F::one() + F::one())
    }
}

/// A triangulation of a polygon with holes.
///
/// Covers the outer loop minus the holes. Edges shared by two triangles are
/// diagonals, including the bridge edges introduced when holes were joined to
/// the outer loop; every other edge lies on an input loop.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Triangulation {
    triangles: Vec<Triangle>,
}

impl Triangulation {
    /// Links triangles that share an undirected edge.
    ///
    /// # Errors
    ///
    /// [`DecompError::InternalInvariantViolation`] if an edge is used by more
    /// than two triangles or twice in the same direction, which means the
    /// triangles overlap.
    pub fn from_triangles(corners: Vec<[usize; 3]>) -> Result<Self, DecompError> {
        let mut triangles: Vec<Triangle> = corners
            .into_iter()
            .map(|[a, b, c]| Triangle::new(a, b, c))
            .collect();

        let mut open: BTreeMap<EdgeKey, (usize, usize)> = BTreeMap::new();
        for t in 0..triangles.len() {
            for i in 0..3 {
                let (a, b) = triangles[t].edge(i);
                match open.entry(edge_key(a, b)) {
                    Entry::Vacant(slot) => {
                        slot.insert((t, i));
                    }
                    Entry::Occupied(slot) => {
                        let (u, j) = *slot.get();
                        if triangles[u].neighbors[j].is_some() {
                            return Err(DecompError::InternalInvariantViolation(format!(
                                "edge ({}, {}) is shared by more than two triangles",
                                a, b
                            )));
                        }
                        if triangles[u].edge(j) != (b, a) {
                            return Err(DecompError::InternalInvariantViolation(format!(
                                "triangles {} and {} overlap along edge ({}, {})",
                                u, t, a, b
                            )));
                        }
                        triangles[u].neighbors[j] = Some(t);
                        triangles[t].neighbors[i] = Some(u);
                    }
                }
            }
        }

        Ok(Self { triangles })
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if there are no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// The triangle arena.
    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub(crate) fn triangles_mut(&mut self) -> &mut [Triangle] {
        &mut self.triangles
    }

    /// Vertex index triples, one per triangle.
    pub fn indices(&self) -> Vec<[usize; 3]> {
        self.triangles.iter().map(|t| t.vertices).collect()
    }

    /// Total area covered by the triangles.
    pub fn area<F: Float>(&self, vertices: &[Point2<F>]) -> F {
        self.triangles
            .iter()
            .map(|t| t.signed_area(vertices))
            .fold(F::zero(), |a, b| a + b)
    }

    /// Shared edges as `(key, triangle, other_triangle)`, sorted by key.
    pub fn diagonals(&self) -> Vec<(EdgeKey, usize, usize)> {
        let mut diagonals: Vec<_> = self
            .triangles
            .iter()
            .enumerate()
            .flat_map(|(t, tri)| {
                (0..3).filter_map(move |i| {
                    let other = tri.neighbors[i]?;
                    (t < other).then(|| {
                        let (a, b) = tri.edge(i);
                        (edge_key(a, b), t, other)
                    })
                })
            })
            .collect();
        diagonals.sort_unstable();
        diagonals
    }
}
