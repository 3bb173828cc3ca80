//! Polygon-with-holes triangulation using ear clipping.
//!
//! Holes are first bridged into the outer loop (see [`bridge_holes`]); the
//! merged loop is then clipped ear by ear until a single triangle remains.
//!
//! # Algorithm
//!
//! The merged loop becomes a ring of nodes linked through `prev`/`next`
//! arrays. A node is an ear when:
//! - its corner turns strictly counter-clockwise,
//! - its triangle has more than the minimum area,
//! - no reflex or straight node of the ring lies inside or on the triangle.
//!
//! Ears wait in a priority queue keyed by shape: the ear whose smallest
//! interior angle is largest is clipped first, ties going to the lower node.
//! Clipping only changes the two neighbors, so only they are re-evaluated;
//! stale queue entries are skipped through per-node stamps.
//!
//! # Complexity
//!
//! - Time: O(n²) for a merged loop of n slots
//! - Space: O(n)
//!
//! # Example
//!
//! ```
//! use convex_decomp::{triangulate, Point2};
//!
//! let square = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(0.0, 1.0),
//! ];
//!
//! let mesh = triangulate(&square, &[0, 1, 2, 3], &[]).unwrap();
//!
//! // A square is divided into 2 triangles sharing one diagonal
//! assert_eq!(mesh.len(), 2);
//! assert_eq!(mesh.diagonals().len(), 1);
//! ```

use super::holes::bridge_holes;
use super::mesh::Triangulation;
use super::refine::refine;
use super::validate::{validate, ValidPolygon};
use crate::config::DecomposeOptions;
use crate::error::DecompError;
use crate::primitives::Point2;
use crate::tolerance::{orient2d, point_in_triangle, Orientation};
use num_traits::Float;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::{debug, trace};

/// Triangulates a polygon with holes using the default options.
///
/// `outer` and each hole are loops of indices into `vertices`, in either
/// winding. The returned triangles are counter-clockwise and reference the
/// caller's vertex indices only.
///
/// # Errors
///
/// Validation failures ([`DecompError::MalformedLoop`],
/// [`DecompError::InvalidHoleTopology`]) and the triangulation failures
/// described on [`triangulate_with`].
pub fn triangulate<F: Float>(
    vertices: &[Point2<F>],
    outer: &[usize],
    holes: &[Vec<usize>],
) -> Result<Triangulation, DecompError> {
    triangulate_with(vertices, outer, holes, &DecomposeOptions::default())
}

/// Triangulates a polygon with holes.
///
/// When `options.refine` is set, Lawson flips are applied before returning.
///
/// # Errors
///
/// Besides validation failures, [`DecompError::DegenerateGeometry`] if the
/// last triangle has no area, and [`DecompError::InternalInvariantViolation`]
/// if no ear can be found.
pub fn triangulate_with<F: Float>(
    vertices: &[Point2<F>],
    outer: &[usize],
    holes: &[Vec<usize>],
    options: &DecomposeOptions,
) -> Result<Triangulation, DecompError> {
    let polygon = validate(vertices, outer, holes, options.eps())?;
    triangulate_polygon(&polygon, options)
}

/// Triangulates an already validated polygon.
pub fn triangulate_polygon<F: Float>(
    polygon: &ValidPolygon<'_, F>,
    options: &DecomposeOptions,
) -> Result<Triangulation, DecompError> {
    let vertices = polygon.vertices();
    let eps = options.eps();

    let bridged = bridge_holes(polygon, eps)?;
    debug!(
        holes = bridged.bridges.len(),
        slots = bridged.indices.len(),
        "merged holes into outer loop"
    );

    let corners = clip_ears(vertices, &bridged.indices, eps, options.min_area())
        .map_err(|err| {
            debug!(%err, "ear clipping failed");
            err
        })?;
    let mut mesh = Triangulation::from_triangles(corners)?;

    if options.refine {
        let flips = refine(vertices, &mut mesh, &options.fixed_edges, eps);
        debug!(flips, "refined triangulation");
    }

    debug!(triangles = mesh.len(), "triangulated polygon");
    Ok(mesh)
}

/// Queue entry for a candidate ear.
#[derive(Debug, Clone, Copy)]
struct EarEntry<F> {
    node: usize,
    /// Largest corner cosine; smaller is better shaped.
    quality: F,
    stamp: usize,
}

impl<F: Float> PartialEq for EarEntry<F> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<F: Float> Eq for EarEntry<F> {}

impl<F: Float> PartialOrd for EarEntry<F> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<F: Float> Ord for EarEntry<F> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed on both keys: the max-heap pops the lowest quality, then the lowest node
        other
            .quality
            .partial_cmp(&self.quality)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Index-linked ring over the merged loop.
struct EarClipper<'a, F> {
    vertices: &'a [Point2<F>],
    ring: &'a [usize],
    prev: Vec<usize>,
    next: Vec<usize>,
    alive: Vec<bool>,
    stamp: Vec<usize>,
    eps: F,
    min_area: F,
}

impl<'a, F: Float> EarClipper<'a, F> {
    fn new(vertices: &'a [Point2<F>], ring: &'a [usize], eps: F, min_area: F) -> Self {
        let n = ring.len();
        Self {
            vertices,
            ring,
            prev: (0..n).map(|i| (i + n - 1) % n).collect(),
            next: (0..n).map(|i| (i + 1) % n).collect(),
            alive: vec![true; n],
            stamp: vec![0; n],
            eps,
            min_area,
        }
    }

    #[inline]
    fn point(&self, node: usize) -> Point2<F> {
        self.vertices[self.ring[node]]
    }

    fn is_convex(&self, node: usize) -> bool {
        orient2d(
            self.point(self.prev[node]),
            self.point(node),
            self.point(self.next[node]),
            self.eps,
        ) == Orientation::CounterClockwise
    }

    /// Returns the ear's quality, or `None` if `node` is not an ear.
    fn ear_quality(&self, node: usize) -> Option<F> {
        let (p, q) = (self.prev[node], self.next[node]);
        let (a, b, c) = (self.point(p), self.point(node), self.point(q));

        if orient2d(a, b, c, self.eps) != Orientation::CounterClockwise {
            return None;
        }
        let area = (b - a).cross(c - a) / (F::one() + F::one());
        if area <= self.min_area {
            return None;
        }

        let mut k = self.next[q];
        while k != p {
            let pk = self.point(k);
            let at_corner = pk.coincides(a, self.eps)
                || pk.coincides(b, self.eps)
                || pk.coincides(c, self.eps);
            if !at_corner
                && !self.is_convex(k)
                && point_in_triangle(pk, a, b, c, self.eps).is_covered()
            {
                return None;
            }
            k = self.next[k];
        }

        let cos_a = (b - a).cos_angle(c - a)?;
        let cos_b = (c - b).cos_angle(a - b)?;
        let cos_c = (a - c).cos_angle(b - c)?;
        Some(cos_a.max(cos_b).max(cos_c))
    }

    /// Invalidates queued entries of `node` and requeues it if it is an ear.
    fn refresh(&mut self, heap: &mut BinaryHeap<EarEntry<F>>, node: usize) {
        self.stamp[node] += 1;
        if let Some(quality) = self.ear_quality(node) {
            heap.push(EarEntry {
                node,
                quality,
                stamp: self.stamp[node],
            });
        }
    }

    fn pop(&self, heap: &mut BinaryHeap<EarEntry<F>>) -> Option<usize> {
        while let Some(entry) = heap.pop() {
            if self.alive[entry.node] && self.stamp[entry.node] == entry.stamp {
                return Some(entry.node);
            }
        }
        None
    }

    fn unlink(&mut self, node: usize) {
        let (p, q) = (self.prev[node], self.next[node]);
        self.next[p] = q;
        self.prev[q] = p;
        self.alive[node] = false;
    }
}

/// Ear-clips a weakly simple counter-clockwise loop of vertex indices.
///
/// Returns `ring.len() - 2` counter-clockwise triangles.
pub(crate) fn clip_ears<F: Float>(
    vertices: &[Point2<F>],
    ring: &[usize],
    eps: F,
    min_area: F,
) -> Result<Vec<[usize; 3]>, DecompError> {
    let n = ring.len();
    if n < 3 {
        return Err(DecompError::InternalInvariantViolation(format!(
            "cannot triangulate a loop of {} vertices",
            n
        )));
    }

    let mut clipper = EarClipper::new(vertices, ring, eps, min_area);
    let mut heap = BinaryHeap::with_capacity(n);
    let mut triangles = Vec::with_capacity(n - 2);
    let mut remaining = n;
    let mut last = 0;

    for node in 0..n {
        clipper.refresh(&mut heap, node);
    }

    while remaining > 3 {
        let ear = match clipper.pop(&mut heap) {
            Some(ear) => ear,
            None => {
                trace!(remaining, "ear queue exhausted, rescanning");
                let mut node = last;
                for _ in 0..remaining {
                    clipper.refresh(&mut heap, node);
                    node = clipper.next[node];
                }
                clipper.pop(&mut heap).ok_or_else(|| {
                    DecompError::InternalInvariantViolation(format!(
                        "no ear found with {} vertices left",
                        remaining
                    ))
                })?
            }
        };

        let (p, q) = (clipper.prev[ear], clipper.next[ear]);
        trace!(node = ear, vertex = ring[ear], "clipped ear");
        triangles.push([ring[p], ring[ear], ring[q]]);
        clipper.unlink(ear);
        remaining -= 1;
        last = p;

        clipper.refresh(&mut heap, p);
        clipper.refresh(&mut heap, q);
    }

    let (p, q) = (clipper.prev[last], clipper.next[last]);
    let (a, b, c) = (clipper.point(p), clipper.point(last), clipper.point(q));
    let area = (b - a).cross(c - a) / (F::one() + F::one());
    if orient2d(a, b, c, eps) != Orientation::CounterClockwise || area <= min_area {
        return Err(DecompError::DegenerateGeometry {
            indices: vec![ring[p], ring[last], ring[q]],
            area: area.to_f64().unwrap_or(f64::NAN),
        });
    }
    triangles.push([ring[p], ring[last], ring[q]]);

    Ok(triangles)
}
