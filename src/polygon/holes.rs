//! Hole elimination by bridging.
//!
//! Each hole is spliced into the outer loop through a bridge edge, turning a
//! polygon with holes into a single weakly simple loop that an ear clipper can
//! consume. Holes are processed right to left: from the rightmost vertex `M`
//! of a hole a ray is cast in the +x direction, the nearest boundary edge it
//! hits gives a candidate endpoint, and reflex vertices inside the triangle
//! spanned by `M`, the hit point and the candidate take precedence if they
//! sit closer to the ray direction.
//!
//! A bridge duplicates both of its endpoints in the merged loop. Because the
//! loop stores vertex indices, the duplicates resolve back to the original
//! vertices when triangles are emitted.
//!
//! A hole that shares a vertex (by index or by position) with the loop built
//! so far needs no bridge: it is entered at the shared vertex, whichever of
//! its vertices that is, and the merged loop pinches there.

use super::core::rightmost_position;
use super::validate::ValidPolygon;
use crate::error::DecompError;
use crate::primitives::Point2;
use crate::tolerance::{in_cone, orient2d, point_in_triangle, Orientation};
use num_traits::Float;
use std::cmp::Ordering;
use tracing::trace;

/// A bridge edge joining a hole to the loop built so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bridge {
    /// Vertex on the outer side (outer loop or a previously bridged hole).
    pub outer: usize,
    /// Hole vertex the bridge enters at: the rightmost one, or the contact
    /// vertex for a touching hole.
    pub hole: usize,
    /// The hole touches the loop at `outer`/`hole` and no bridge edge was
    /// added. The two indices are equal or name coincident positions.
    pub contact: bool,
}

impl Bridge {
    /// Returns `true` if the bridge has zero length because the hole touches
    /// the loop at this vertex.
    pub fn is_contact(&self) -> bool {
        self.contact
    }
}

/// A polygon with holes flattened into a single counter-clockwise loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgedPolygon {
    /// Merged loop of vertex indices; bridge endpoints appear twice.
    pub indices: Vec<usize>,
    /// Bridges in insertion order.
    pub bridges: Vec<Bridge>,
}

/// Splices every hole of a validated polygon into its outer loop.
///
/// # Errors
///
/// [`DecompError::InternalInvariantViolation`] if no boundary edge is visible
/// from a hole, which cannot happen for validated input.
///
/// # Example
///
/// ```
/// use convex_decomp::polygon::{bridge_holes, validate};
/// use convex_decomp::Point2;
///
/// let vertices = vec![
///     Point2::new(-2.0, -2.0),
///     Point2::new(2.0, -2.0),
///     Point2::new(2.0, 2.0),
///     Point2::new(-2.0, 2.0),
///     Point2::new(-1.0, -1.0),
///     Point2::new(1.0, -1.0),
///     Point2::new(1.0, 1.0),
///     Point2::new(-1.0, 1.0),
/// ];
/// let polygon = validate(&vertices, &[0, 1, 2, 3], &[vec![7, 6, 5, 4]], 1e-10).unwrap();
/// let bridged = bridge_holes(&polygon, 1e-10).unwrap();
///
/// // Four outer vertices, four hole vertices, two bridge duplicates
/// assert_eq!(bridged.indices.len(), 10);
/// assert_eq!(bridged.bridges.len(), 1);
/// ```
pub fn bridge_holes<F: Float>(
    polygon: &ValidPolygon<'_, F>,
    eps: F,
) -> Result<BridgedPolygon, DecompError> {
    let vertices = polygon.vertices();
    let mut merged = polygon.outer().to_vec();
    let mut bridges = Vec::with_capacity(polygon.holes().len());

    // Rightmost vertex first, so a hole can only bridge to something already merged.
    let mut order: Vec<(usize, usize)> = polygon
        .holes()
        .iter()
        .enumerate()
        .map(|(h, hole)| (h, rightmost_position(vertices, hole)))
        .collect();
    order.sort_by(|&(ha, pa), &(hb, pb)| {
        let a = vertices[polygon.holes()[ha][pa]];
        let b = vertices[polygon.holes()[hb][pb]];
        b.x.partial_cmp(&a.x)
            .unwrap_or(Ordering::Equal)
            .then(b.y.partial_cmp(&a.y).unwrap_or(Ordering::Equal))
            .then(ha.cmp(&hb))
    });

    for (h, pos) in order {
        let hole = &polygon.holes()[h];
        let bridge = splice_hole(vertices, &mut merged, hole, pos, eps)?;
        trace!(hole = h, outer = bridge.outer, vertex = bridge.hole, "bridged hole");
        bridges.push(bridge);
    }

    Ok(BridgedPolygon {
        indices: merged,
        bridges,
    })
}

/// Inserts `hole`, whose rightmost vertex sits at loop position `pos`, into
/// `merged`.
fn splice_hole<F: Float>(
    vertices: &[Point2<F>],
    merged: &mut Vec<usize>,
    hole: &[usize],
    pos: usize,
    eps: F,
) -> Result<Bridge, DecompError> {
    if let Some(bridge) = splice_at_contact(vertices, merged, hole, eps) {
        return Ok(bridge);
    }

    let n = hole.len();
    let m = hole[pos];
    let mp = vertices[m];
    let slot = find_bridge_slot(vertices, merged, mp, eps).ok_or_else(|| {
        DecompError::InternalInvariantViolation(format!(
            "no boundary edge visible from hole vertex {}",
            m
        ))
    })?;

    // Several copies of the target may exist; use the one whose wedge sees M.
    let target = vertices[merged[slot]];
    let copies: Vec<usize> = (0..merged.len())
        .filter(|&s| vertices[merged[s]].coincides(target, eps))
        .collect();
    let slot = pick_by_cone(vertices, merged, &copies, mp, eps).unwrap_or(slot);
    let outer = merged[slot];

    let mut run: Vec<usize> = (0..=n).map(|k| hole[(pos + k) % n]).collect();
    run.push(outer);
    merged.splice(slot + 1..slot + 1, run);

    Ok(Bridge {
        outer,
        hole: m,
        contact: false,
    })
}

/// Splices `hole` in place if any of its vertices already lies on `merged`.
///
/// The hole is entered at the contact vertex and walked all the way around
/// back to it, so the merged loop pinches at that point without a bridge edge.
fn splice_at_contact<F: Float>(
    vertices: &[Point2<F>],
    merged: &mut Vec<usize>,
    hole: &[usize],
    eps: F,
) -> Option<Bridge> {
    let n = hole.len();
    for (pos, &v) in hole.iter().enumerate() {
        let p = vertices[v];
        let touching: Vec<usize> = (0..merged.len())
            .filter(|&s| merged[s] == v || vertices[merged[s]].coincides(p, eps))
            .collect();
        let Some(&first) = touching.first() else {
            continue;
        };

        let after = vertices[hole[(pos + 1) % n]];
        let slot = pick_by_cone(vertices, merged, &touching, after, eps).unwrap_or(first);
        let outer = merged[slot];
        let run: Vec<usize> = (1..=n).map(|k| hole[(pos + k) % n]).collect();
        merged.splice(slot + 1..slot + 1, run);
        return Some(Bridge {
            outer,
            hole: v,
            contact: true,
        });
    }
    None
}

/// Returns the first slot among `slots` whose interior wedge contains `p`.
fn pick_by_cone<F: Float>(
    vertices: &[Point2<F>],
    merged: &[usize],
    slots: &[usize],
    p: Point2<F>,
    eps: F,
) -> Option<usize> {
    let len = merged.len();
    slots.iter().copied().find(|&s| {
        let a = vertices[merged[(s + len - 1) % len]];
        let b = vertices[merged[s]];
        let c = vertices[merged[(s + 1) % len]];
        in_cone(a, b, c, p, eps)
    })
}

/// Finds the loop slot that `mp` can be joined to without crossing an edge.
fn find_bridge_slot<F: Float>(
    vertices: &[Point2<F>],
    merged: &[usize],
    mp: Point2<F>,
    eps: F,
) -> Option<usize> {
    let len = merged.len();

    // Nearest upward edge crossed by the ray y = mp.y, x >= mp.x.
    let mut hit: Option<(F, usize)> = None;
    for i in 0..len {
        let a = vertices[merged[i]];
        let b = vertices[merged[(i + 1) % len]];
        if !(a.y <= mp.y && b.y >= mp.y && a.y < b.y) {
            continue;
        }
        let x = a.x + (mp.y - a.y) * (b.x - a.x) / (b.y - a.y);
        if x < mp.x {
            continue;
        }
        if hit.map_or(true, |(best, _)| x < best) {
            hit = Some((x, i));
        }
    }
    let (hit_x, edge) = hit?;
    let hit_point = Point2::new(hit_x, mp.y);

    let a_slot = edge;
    let b_slot = (edge + 1) % len;
    let a = vertices[merged[a_slot]];
    let b = vertices[merged[b_slot]];
    if hit_point.coincides(a, eps) {
        return Some(a_slot);
    }
    if hit_point.coincides(b, eps) {
        return Some(b_slot);
    }

    // Larger x wins; on a vertical edge the endpoint nearer the ray does.
    let candidate = match a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal) {
        Ordering::Greater => a_slot,
        Ordering::Less => b_slot,
        Ordering::Equal if (a.y - mp.y).abs() <= (b.y - mp.y).abs() => a_slot,
        Ordering::Equal => b_slot,
    };
    let cp = vertices[merged[candidate]];

    let (t0, t1, t2) = match orient2d(mp, hit_point, cp, eps) {
        Orientation::Clockwise => (mp, cp, hit_point),
        _ => (mp, hit_point, cp),
    };

    // Reflex vertices inside the visibility triangle block the candidate.
    let mut best = candidate;
    let mut best_key: Option<(F, F)> = None;
    for s in 0..len {
        let p = vertices[merged[s]];
        if p.coincides(cp, eps) || p.coincides(mp, eps) {
            continue;
        }
        let prev = vertices[merged[(s + len - 1) % len]];
        let next = vertices[merged[(s + 1) % len]];
        if orient2d(prev, p, next, eps) == Orientation::CounterClockwise {
            continue;
        }
        if !point_in_triangle(p, t0, t1, t2, eps).is_covered() {
            continue;
        }
        let d = p - mp;
        let key = (d.y.abs().atan2(d.x), d.magnitude_squared());
        let better = match best_key {
            None => true,
            Some((angle, dist)) => key.0 < angle || (key.0 == angle && key.1 < dist),
        };
        if better {
            best = s;
            best_key = Some(key);
        }
    }

    Some(best)
}
