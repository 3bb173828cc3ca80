//! Input validation and winding normalization.
//!
//! Checks that the outer boundary and every hole are simple loops, fixes their
//! winding (outer CCW, holes CW) and verifies that holes sit strictly inside
//! the outer boundary without crossing it or each other.
//!
//! # Example
//!
//! ```
//! use convex_decomp::polygon::validate;
//! use convex_decomp::{DecompError, Point2};
//!
//! // A figure-8 crosses itself
//! let vertices = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(2.0, 2.0),
//!     Point2::new(2.0, 0.0),
//!     Point2::new(0.0, 2.0),
//! ];
//!
//! let result = validate(&vertices, &[0, 1, 2, 3], &[], 1e-10);
//! assert!(matches!(result, Err(DecompError::MalformedLoop { .. })));
//! ```

use super::core::{loop_area, loop_contains, signed_area};
use crate::error::{DecompError, HoleDefect, LoopDefect, LoopRole};
use crate::primitives::{Point2, Segment2};
use crate::tolerance::{orient2d, segments_intersect, Orientation, SegmentIntersection};
use num_traits::Float;

/// A polygon with holes that passed validation.
///
/// The outer loop is counter-clockwise and every hole clockwise. The vertex
/// buffer is borrowed; the loops are owned copies of the caller's lists.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidPolygon<'a, F> {
    vertices: &'a [Point2<F>],
    outer: Vec<usize>,
    holes: Vec<Vec<usize>>,
}

impl<'a, F: Float> ValidPolygon<'a, F> {
    /// The shared vertex buffer.
    #[inline]
    pub fn vertices(&self) -> &'a [Point2<F>] {
        self.vertices
    }

    /// The outer loop, counter-clockwise.
    #[inline]
    pub fn outer(&self) -> &[usize] {
        &self.outer
    }

    /// The non-empty holes, each clockwise, in caller order.
    #[inline]
    pub fn holes(&self) -> &[Vec<usize>] {
        &self.holes
    }

    /// Total number of loop entries over the outer loop and all holes.
    pub fn vertex_count(&self) -> usize {
        self.outer.len() + self.holes.iter().map(Vec::len).sum::<usize>()
    }

    /// Area of the outer loop minus the areas of the holes.
    pub fn area(&self) -> F {
        self.holes
            .iter()
            .fold(loop_area(self.vertices, &self.outer), |acc, hole| {
                acc - loop_area(self.vertices, hole)
            })
    }
}

/// Validates a polygon with holes and normalizes its winding.
///
/// Checks, in order:
/// 1. every index is in range, every loop vertex is finite and each loop has
///    at least 3 distinct vertices;
/// 2. each loop is simple;
/// 3. the outer loop is made CCW and every hole CW;
/// 4. every hole lies strictly inside the outer loop, and no two loops cross,
///    overlap, nest, or touch at more than one point.
///
/// Empty hole lists are ignored. Holes may touch the outer loop or another
/// hole at a single shared vertex.
///
/// # Errors
///
/// [`DecompError::MalformedLoop`] for the first two checks,
/// [`DecompError::InvalidHoleTopology`] for the last.
pub fn validate<'a, F: Float>(
    vertices: &'a [Point2<F>],
    outer: &[usize],
    holes: &[Vec<usize>],
    eps: F,
) -> Result<ValidPolygon<'a, F>, DecompError> {
    check_loop(vertices, outer, LoopRole::Outer, eps)?;
    for (i, hole) in holes.iter().enumerate() {
        if !hole.is_empty() {
            check_loop(vertices, hole, LoopRole::Hole(i), eps)?;
        }
    }

    let mut outer = outer.to_vec();
    if signed_area(vertices, &outer) < F::zero() {
        tracing::debug!("reversing clockwise outer loop");
        outer.reverse();
    }

    let mut kept: Vec<(usize, Vec<usize>)> = Vec::with_capacity(holes.len());
    for (i, hole) in holes.iter().enumerate() {
        if hole.is_empty() {
            continue;
        }
        let mut hole = hole.clone();
        if signed_area(vertices, &hole) > F::zero() {
            tracing::debug!(hole = i, "reversing counter-clockwise hole");
            hole.reverse();
        }
        kept.push((i, hole));
    }

    for (k, (id, hole)) in kept.iter().enumerate() {
        check_hole_against_outer(vertices, &outer, *id, hole, eps)?;
        for (other_id, other) in &kept[k + 1..] {
            check_hole_pair(vertices, (*id, hole), (*other_id, other), eps)?;
        }
    }

    Ok(ValidPolygon {
        vertices,
        outer,
        holes: kept.into_iter().map(|(_, hole)| hole).collect(),
    })
}

/// Checks that a single loop is in range, has 3 distinct vertices and is simple.
fn check_loop<F: Float>(
    vertices: &[Point2<F>],
    indices: &[usize],
    role: LoopRole,
    eps: F,
) -> Result<(), DecompError> {
    let malformed = |defect| Err(DecompError::malformed(role, defect));

    if let Some(&index) = indices.iter().find(|&&i| i >= vertices.len()) {
        return malformed(LoopDefect::IndexOutOfRange {
            index,
            len: vertices.len(),
        });
    }
    if let Some(&index) = indices
        .iter()
        .find(|&&i| !(vertices[i].x.is_finite() && vertices[i].y.is_finite()))
    {
        return malformed(LoopDefect::NonFiniteVertex { index });
    }

    let mut sorted = indices.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() < 3 {
        return malformed(LoopDefect::TooFewVertices {
            distinct: sorted.len(),
        });
    }
    if sorted.len() < indices.len() {
        let index = first_repeated(indices).unwrap_or(indices[0]);
        return malformed(LoopDefect::RepeatedVertex { index });
    }

    let n = indices.len();
    for i in 0..n {
        let a = vertices[indices[(i + n - 1) % n]];
        let b = vertices[indices[i]];
        let c = vertices[indices[(i + 1) % n]];

        if b.coincides(c, eps) {
            return malformed(LoopDefect::RepeatedVertex { index: indices[i] });
        }

        // Collinear turn that reverses direction: the two edges overlap.
        if orient2d(a, b, c, eps) == Orientation::Collinear && (a - b).dot(c - b) > F::zero() {
            return malformed(LoopDefect::SelfIntersection {
                first: (i + n - 1) % n,
                second: i,
            });
        }
    }

    for i in 0..n {
        let s1 = Segment2::from_indices(vertices, indices[i], indices[(i + 1) % n]);
        for j in (i + 2)..n {
            // Skip the edge that closes back onto edge i
            if (j + 1) % n == i {
                continue;
            }
            let s2 = Segment2::from_indices(vertices, indices[j], indices[(j + 1) % n]);
            if segments_intersect(s1, s2, eps) != SegmentIntersection::None {
                return malformed(LoopDefect::SelfIntersection {
                    first: i,
                    second: j,
                });
            }
        }
    }

    if loop_area(vertices, indices) * (F::one() + F::one()) <= eps {
        return malformed(LoopDefect::ZeroArea);
    }

    Ok(())
}

fn first_repeated(indices: &[usize]) -> Option<usize> {
    indices
        .iter()
        .enumerate()
        .find(|&(pos, index)| indices[..pos].contains(index))
        .map(|(_, &index)| index)
}

/// How two loops meet.
enum Contact<F> {
    /// The loops share no point.
    Disjoint,
    /// The loops share exactly one vertex position.
    Touching(Point2<F>),
    /// Edges cross, overlap, or a vertex lies inside an edge.
    Crossing,
    /// More than one shared vertex position.
    Multiple,
}

/// Classifies how the edges of two loops meet.
fn contact<F: Float>(vertices: &[Point2<F>], a: &[usize], b: &[usize], eps: F) -> Contact<F> {
    let mut touch: Option<Point2<F>> = None;

    for i in 0..a.len() {
        let (a0, a1) = (a[i], a[(i + 1) % a.len()]);
        let s1 = Segment2::from_indices(vertices, a0, a1);

        for j in 0..b.len() {
            let (b0, b1) = (b[j], b[(j + 1) % b.len()]);
            let s2 = Segment2::from_indices(vertices, b0, b1);

            let point = match segments_intersect(s1, s2, eps) {
                SegmentIntersection::None => continue,
                SegmentIntersection::Overlapping { .. } => return Contact::Crossing,
                SegmentIntersection::Point { point, .. } => point,
            };

            // Only a vertex shared by both edges is an allowed contact
            let shared = [s1.start, s1.end].into_iter().find(|p| {
                p.coincides(point, eps)
                    && (p.coincides(s2.start, eps) || p.coincides(s2.end, eps))
            });
            let Some(shared) = shared else {
                return Contact::Crossing;
            };

            match touch {
                None => touch = Some(shared),
                Some(previous) if previous.coincides(shared, eps) => {}
                Some(_) => return Contact::Multiple,
            }
        }
    }

    match touch {
        Some(point) => Contact::Touching(point),
        None => Contact::Disjoint,
    }
}

/// Picks a vertex of `indices` that does not sit on the contact point.
fn sample_vertex<F: Float>(
    vertices: &[Point2<F>],
    indices: &[usize],
    touch: Option<Point2<F>>,
    eps: F,
) -> Point2<F> {
    indices
        .iter()
        .map(|&i| vertices[i])
        .find(|p| touch.map_or(true, |t| !p.coincides(t, eps)))
        .unwrap_or(vertices[indices[0]])
}

fn touch_point<F>(contact: &Contact<F>) -> Option<Point2<F>>
where
    F: Copy,
{
    match contact {
        Contact::Touching(p) => Some(*p),
        _ => None,
    }
}

fn check_hole_against_outer<F: Float>(
    vertices: &[Point2<F>],
    outer: &[usize],
    id: usize,
    hole: &[usize],
    eps: F,
) -> Result<(), DecompError> {
    let contact = contact(vertices, hole, outer, eps);
    match contact {
        Contact::Crossing => return Err(DecompError::hole(id, HoleDefect::CrossesOuter)),
        Contact::Multiple => {
            return Err(DecompError::hole(
                id,
                HoleDefect::MultipleContacts {
                    other: LoopRole::Outer,
                },
            ))
        }
        Contact::Disjoint | Contact::Touching(_) => {}
    }

    let p = sample_vertex(vertices, hole, touch_point(&contact), eps);
    if !loop_contains(vertices, outer, p) {
        return Err(DecompError::hole(id, HoleDefect::OutsideOuter));
    }
    Ok(())
}

fn check_hole_pair<F: Float>(
    vertices: &[Point2<F>],
    (id, hole): (usize, &[usize]),
    (other_id, other): (usize, &[usize]),
    eps: F,
) -> Result<(), DecompError> {
    let contact = contact(vertices, hole, other, eps);
    match contact {
        Contact::Crossing => {
            return Err(DecompError::hole(
                id,
                HoleDefect::CrossesHole { other: other_id },
            ))
        }
        Contact::Multiple => {
            return Err(DecompError::hole(
                id,
                HoleDefect::MultipleContacts {
                    other: LoopRole::Hole(other_id),
                },
            ))
        }
        Contact::Disjoint | Contact::Touching(_) => {}
    }

    let touch = touch_point(&contact);
    if loop_contains(vertices, other, sample_vertex(vertices, hole, touch, eps)) {
        return Err(DecompError::hole(
            id,
            HoleDefect::NestedInHole { other: other_id },
        ));
    }
    if loop_contains(vertices, hole, sample_vertex(vertices, other, touch, eps)) {
        return Err(DecompError::hole(
            other_id,
            HoleDefect::NestedInHole { other: id },
        ));
    }
    Ok(())
}
