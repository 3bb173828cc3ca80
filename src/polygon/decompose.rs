//! Convex decomposition of polygons with holes.
//!
//! Decomposes a polygon with holes into convex pieces by triangulating it and
//! then greedily removing diagonals.
//!
//! # Algorithm
//!
//! Hertel-Mehlhorn: every triangle starts as its own region; each diagonal is
//! visited once and removed if the union of the two regions on either side is
//! still convex. The result has at most 4 times the optimal number of convex
//! pieces.
//!
//! Diagonals are visited in increasing `(min, max)` vertex order. Regions are
//! tracked through a relabeling array over the triangle arena, so a merge is
//! one splice of two index loops plus a relabel.
//!
//! # Example
//!
//! ```
//! use convex_decomp::{decompose, Point2};
//!
//! // L-shaped polygon (non-convex)
//! let l_shape = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(2.0, 0.0),
//!     Point2::new(2.0, 1.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(1.0, 2.0),
//!     Point2::new(0.0, 2.0),
//! ];
//!
//! let parts = decompose(&l_shape, &[0, 1, 2, 3, 4, 5], &[]).unwrap();
//! assert!(parts.len() >= 2);
//! for part in &parts {
//!     assert!(part.is_convex(&l_shape, 1e-10));
//! }
//! ```

use super::core::is_convex_loop;
use super::mesh::Triangulation;
use super::output::{build_regions, ConvexRegion};
use super::triangulate::triangulate_polygon;
use super::validate::validate;
use crate::config::DecomposeOptions;
use crate::error::DecompError;
use crate::primitives::Point2;
use crate::tolerance::{orient2d, Orientation};
use num_traits::Float;
use tracing::{debug, trace};

/// Decomposes a polygon with holes into convex regions using the default
/// options.
///
/// # Errors
///
/// Any error of [`triangulate`](crate::triangulate), plus
/// [`DecompError::DegenerateGeometry`] for a region without area.
pub fn decompose<F: Float>(
    vertices: &[Point2<F>],
    outer: &[usize],
    holes: &[Vec<usize>],
) -> Result<Vec<ConvexRegion>, DecompError> {
    decompose_with(vertices, outer, holes, &DecomposeOptions::default())
}

/// Decomposes a polygon with holes into convex regions.
///
/// A convex outer loop without holes or fixed edges is returned as a single
/// region without triangulating.
///
/// # Example
///
/// ```
/// use convex_decomp::{decompose_with, DecomposeOptions, Point2};
///
/// let square = vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 0.0),
///     Point2::new(1.0, 1.0),
///     Point2::new(0.0, 1.0),
/// ];
///
/// // Pinning both diagonals keeps the square split in two.
/// let options = DecomposeOptions::default()
///     .with_fixed_edge(0, 2)
///     .with_fixed_edge(1, 3);
/// let parts = decompose_with(&square, &[0, 1, 2, 3], &[], &options).unwrap();
/// assert_eq!(parts.len(), 2);
/// ```
pub fn decompose_with<F: Float>(
    vertices: &[Point2<F>],
    outer: &[usize],
    holes: &[Vec<usize>],
    options: &DecomposeOptions,
) -> Result<Vec<ConvexRegion>, DecompError> {
    let eps = options.eps();
    let polygon = validate(vertices, outer, holes, eps)?;

    if polygon.holes().is_empty()
        && options.fixed_edges.is_empty()
        && is_convex_loop(vertices, polygon.outer(), eps)
    {
        debug!(vertices = polygon.outer().len(), "outer loop already convex");
        return build_regions(vertices, &[polygon.outer().to_vec()], eps);
    }

    let mesh = triangulate_polygon(&polygon, options)?;
    let loops = merge_convex(vertices, &mesh, options);
    build_regions(vertices, &loops, eps).map_err(|err| {
        debug!(%err, "region output failed");
        err
    })
}

/// Merges the triangles of `mesh` into convex regions.
///
/// Returns one counter-clockwise index loop per region. Diagonals listed in
/// `options.fixed_edges` are never removed.
pub fn merge_convex<F: Float>(
    vertices: &[Point2<F>],
    mesh: &Triangulation,
    options: &DecomposeOptions,
) -> Vec<Vec<usize>> {
    let eps = options.eps();
    let mut region_of: Vec<usize> = (0..mesh.len()).collect();
    let mut loops: Vec<Option<Vec<usize>>> = mesh
        .triangles()
        .iter()
        .map(|t| Some(t.vertices.to_vec()))
        .collect();

    let mut removed = 0;
    for ((a, b), t, u) in mesh.diagonals() {
        if options.is_fixed(a, b) {
            trace!(a, b, "kept fixed diagonal");
            continue;
        }
        let (ra, rb) = (region_of[t], region_of[u]);
        if ra == rb {
            continue;
        }

        // Orient the diagonal as it runs in the first triangle.
        let tri = mesh.triangles()[t];
        let Some(k) = tri.edge_index(a, b) else {
            continue;
        };
        let (p, q) = tri.edge(k);

        let merged = match (&loops[ra], &loops[rb]) {
            (Some(la), Some(lb)) => try_merge(vertices, la, lb, p, q, eps),
            _ => None,
        };
        let Some(merged) = merged else {
            trace!(a, b, "kept diagonal");
            continue;
        };

        loops[ra] = Some(merged);
        loops[rb] = None;
        for region in region_of.iter_mut().filter(|r| **r == rb) {
            *region = ra;
        }
        removed += 1;
        trace!(a, b, region = ra, "removed diagonal");
    }

    let regions: Vec<Vec<usize>> = loops.into_iter().flatten().collect();
    debug!(
        triangles = mesh.len(),
        removed,
        regions = regions.len(),
        "merged triangles into convex regions"
    );
    regions
}

/// Joins two CCW loops across the diagonal `p -> q` of `la` (`q -> p` in `lb`).
///
/// Returns `None` if the diagonal is missing or the union is not convex.
fn try_merge<F: Float>(
    vertices: &[Point2<F>],
    la: &[usize],
    lb: &[usize],
    p: usize,
    q: usize,
    eps: F,
) -> Option<Vec<usize>> {
    let (na, nb) = (la.len(), lb.len());
    let i = (0..na).find(|&i| la[i] == p && la[(i + 1) % na] == q)?;
    let j = (0..nb).find(|&j| lb[j] == q && lb[(j + 1) % nb] == p)?;

    // q .. p around `la`, then the far side of `lb` back towards q.
    let mut merged: Vec<usize> = (1..=na).map(|k| la[(i + k) % na]).collect();
    merged.extend((2..nb).map(|k| lb[(j + k) % nb]));

    cancel_spikes(&mut merged);
    if merged.len() < 3 {
        return None;
    }

    let n = merged.len();
    let joins_convex = (0..n)
        .filter(|&k| la.contains(&merged[k]) && lb.contains(&merged[k]))
        .all(|k| {
            let a = vertices[merged[(k + n - 1) % n]];
            let b = vertices[merged[k]];
            let c = vertices[merged[(k + 1) % n]];
            orient2d(a, b, c, eps) != Orientation::Clockwise
        });

    joins_convex.then_some(merged)
}

/// Removes `x, y, x` excursions left by further shared edges.
fn cancel_spikes(indices: &mut Vec<usize>) {
    let mut k = 0;
    while indices.len() > 3 && k < indices.len() {
        let n = indices.len();
        if indices[(k + n - 1) % n] == indices[(k + 1) % n] {
            // Drop the tip and one copy of the base.
            let (tip, base) = (k, (k + 1) % n);
            let (first, second) = if tip > base { (tip, base) } else { (base, tip) };
            indices.remove(first);
            indices.remove(second);
            k = k.saturating_sub(2);
        } else {
            k += 1;
        }
    }
}
