//! Basic measurements on index loops.
//!
//! A loop is a slice of indices into a shared vertex buffer, implicitly
//! closed (the last vertex connects to the first).

use crate::primitives::Point2;
use crate::tolerance::{orient2d, Orientation};
use num_traits::Float;

/// Winding direction of a loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    /// Positive signed area.
    CounterClockwise,
    /// Negative signed area.
    Clockwise,
}

/// Computes the signed area of an index loop using the shoelace formula.
///
/// Positive for CCW winding, negative for CW winding. Loops with fewer than
/// three entries have zero area.
pub fn signed_area<F: Float>(vertices: &[Point2<F>], indices: &[usize]) -> F {
    let n = indices.len();
    if n < 3 {
        return F::zero();
    }

    let mut area = F::zero();
    for i in 0..n {
        let a = vertices[indices[i]];
        let b = vertices[indices[(i + 1) % n]];
        area = area + a.to_vec().cross(b.to_vec());
    }

    area / (F::one() + F::one())
}

/// Computes the absolute area of an index loop.
pub fn loop_area<F: Float>(vertices: &[Point2<F>], indices: &[usize]) -> F {
    signed_area(vertices, indices).abs()
}

/// Returns the winding of a loop.
///
/// A loop with zero area reports `CounterClockwise`.
///
/// # Example
///
/// ```
/// use convex_decomp::polygon::{winding, Winding};
/// use convex_decomp::Point2;
///
/// let square = vec![
///     Point2::new(-2.0, -2.0),
///     Point2::new(2.0, -2.0),
///     Point2::new(2.0, 2.0),
///     Point2::new(-2.0, 2.0),
/// ];
/// assert_eq!(winding(&square, &[0, 1, 2, 3]), Winding::CounterClockwise);
/// assert_eq!(winding(&square, &[3, 2, 1, 0]), Winding::Clockwise);
/// ```
pub fn winding<F: Float>(vertices: &[Point2<F>], indices: &[usize]) -> Winding {
    if signed_area(vertices, indices) < F::zero() {
        Winding::Clockwise
    } else {
        Winding::CounterClockwise
    }
}

/// Tests if a CCW index loop is convex.
///
/// Every turn must be counter-clockwise or collinear within `eps`; a single
/// clockwise turn makes the loop non-convex.
pub fn is_convex_loop<F: Float>(vertices: &[Point2<F>], indices: &[usize], eps: F) -> bool {
    let n = indices.len();
    if n < 3 {
        return false;
    }

    (0..n).all(|i| {
        let a = vertices[indices[(i + n - 1) % n]];
        let b = vertices[indices[i]];
        let c = vertices[indices[(i + 1) % n]];
        orient2d(a, b, c, eps) != Orientation::Clockwise
    })
}

/// Tests if a point is inside an index loop using ray casting.
///
/// Points on the boundary may return either true or false; callers that
/// care pick a sample point off the boundary first.
pub fn loop_contains<F: Float>(vertices: &[Point2<F>], indices: &[usize], point: Point2<F>) -> bool {
    let n = indices.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let vi = vertices[indices[i]];
        let vj = vertices[indices[j]];

        if ((vi.y > point.y) != (vj.y > point.y))
            && (point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Returns the loop position of the rightmost vertex (max x, ties by max y).
pub(crate) fn rightmost_position<F: Float>(vertices: &[Point2<F>], indices: &[usize]) -> usize {
    let mut best = 0;
    for (pos, &index) in indices.iter().enumerate().skip(1) {
        let p = vertices[index];
        let q = vertices[indices[best]];
        if p.x > q.x || (p.x == q.x && p.y > q.y) {
            best = pos;
        }
    }
    best
}
