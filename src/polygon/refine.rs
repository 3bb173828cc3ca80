//! Lawson edge flips on a triangulation.
//!
//! Ear clipping tends to leave long thin triangles, which in turn make the
//! convex merge stop early. Flipping every diagonal whose opposite vertex
//! falls inside the neighbor's circumcircle maximizes the minimum angle of
//! the triangulation without changing its boundary.

use super::mesh::{edge_key, Triangle, Triangulation};
use crate::primitives::Point2;
use crate::tolerance::{in_circle, orient2d, Orientation};
use num_traits::Float;
use tracing::trace;

/// Flips diagonals until the triangulation is locally Delaunay.
///
/// A diagonal is flipped when it is not listed in `fixed_edges`, its two
/// triangles form a strictly convex quadrilateral and the far vertex of one
/// triangle lies inside the circumcircle of the other. Neighbor links stay
/// consistent. The number of passes is capped at the triangle count.
///
/// Returns the number of flips.
///
/// # Example
///
/// ```
/// use convex_decomp::polygon::{refine, Triangulation};
/// use convex_decomp::Point2;
///
/// let vertices = vec![
///     Point2::new(-3.0, 0.0),
///     Point2::new(0.0, -1.0),
///     Point2::new(3.0, 0.0),
///     Point2::new(0.0, 1.0),
/// ];
/// let mut mesh = Triangulation::from_triangles(vec![[0, 1, 2], [0, 2, 3]]).unwrap();
///
/// assert_eq!(refine(&vertices, &mut mesh, &[], 1e-10), 1);
/// assert_eq!(mesh.diagonals()[0].0, (1, 3));
/// ```
pub fn refine<F: Float>(
    vertices: &[Point2<F>],
    mesh: &mut Triangulation,
    fixed_edges: &[[usize; 2]],
    eps: F,
) -> usize {
    let is_fixed = |a: usize, b: usize| {
        fixed_edges
            .iter()
            .any(|&[p, q]| edge_key(p, q) == edge_key(a, b))
    };

    let mut flips = 0;
    for _ in 0..mesh.len() {
        let mut flipped = false;
        for t in 0..mesh.len() {
            for i in 0..3 {
                let (p, q) = mesh.triangles()[t].edge(i);
                if is_fixed(p, q) {
                    continue;
                }
                if flip_if_illegal(vertices, mesh, t, i, eps) {
                    flipped = true;
                    flips += 1;
                    break;
                }
            }
        }
        if !flipped {
            break;
        }
    }
    flips
}

/// Flips edge `i` of triangle `t` if it fails the in-circle test.
fn flip_if_illegal<F: Float>(
    vertices: &[Point2<F>],
    mesh: &mut Triangulation,
    t: usize,
    i: usize,
    eps: F,
) -> bool {
    let t1 = mesh.triangles()[t];
    let Some(u) = t1.neighbors[i] else {
        return false;
    };
    let t2 = mesh.triangles()[u];

    let (p, q) = t1.edge(i);
    let r = t1.opposite(i);
    let Some(j) = t2.edge_index(p, q) else {
        return false;
    };
    let s = t2.opposite(j);

    let [pp, qp, rp, sp] = [p, q, r, s].map(|v| vertices[v]);
    let convex = orient2d(sp, qp, rp, eps) == Orientation::CounterClockwise
        && orient2d(rp, pp, sp, eps) == Orientation::CounterClockwise;
    if !convex || !in_circle(pp, qp, rp, sp, eps) {
        return false;
    }

    let n_qr = t1.neighbors[(i + 1) % 3];
    let n_rp = t1.neighbors[(i + 2) % 3];
    let n_ps = t2.neighbors[(j + 1) % 3];
    let n_sq = t2.neighbors[(j + 2) % 3];

    let triangles = mesh.triangles_mut();
    triangles[t].vertices = [p, s, r];
    triangles[t].neighbors = [n_ps, Some(u), n_rp];
    triangles[u].vertices = [s, q, r];
    triangles[u].neighbors = [n_sq, n_qr, Some(t)];

    // Two outer neighbors changed sides.
    relink(triangles, n_ps, p, s, t);
    relink(triangles, n_qr, q, r, u);

    trace!(from = ?(p, q), to = ?(r, s), "flipped diagonal");
    true
}

fn relink(triangles: &mut [Triangle], neighbor: Option<usize>, a: usize, b: usize, to: usize) {
    if let Some(n) = neighbor {
        if let Some(k) = triangles[n].edge_index(a, b) {
            triangles[n].neighbors[k] = Some(to);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::triangulate;

    fn thin_quad() -> Vec<Point2<f64>> {
        vec![
            Point2::new(-3.0, 0.0),
            Point2::new(0.0, -1.0),
            Point2::new(3.0, 0.0),
            Point2::new(0.0, 1.0),
        ]
    }

    fn sorted(mut t: [usize; 3]) -> [usize; 3] {
        t.sort_unstable();
        t
    }

    #[test]
    fn test_flips_thin_diagonal() {
        let v = thin_quad();
        let mut mesh = Triangulation::from_triangles(vec![[0, 1, 2], [0, 2, 3]]).unwrap();

        assert_eq!(refine(&v, &mut mesh, &[], 1e-10), 1);

        let mut triangles: Vec<_> = mesh.indices().into_iter().map(sorted).collect();
        triangles.sort_unstable();
        assert_eq!(triangles, vec![[0, 1, 3], [1, 2, 3]]);
        for t in mesh.triangles() {
            assert!(t.signed_area(&v) > 0.0);
        }
    }

    #[test]
    fn test_fixed_edge_is_kept() {
        let v = thin_quad();
        let mut mesh = Triangulation::from_triangles(vec![[0, 1, 2], [0, 2, 3]]).unwrap();
        let before = mesh.clone();

        assert_eq!(refine(&v, &mut mesh, &[[2, 0]], 1e-10), 0);
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_links_stay_consistent() {
        // Flattened hexagon
        let v: Vec<Point2<f64>> = (0..6)
            .map(|k| {
                let a = k as f64 * std::f64::consts::PI / 3.0;
                Point2::new(a.cos(), a.sin() * 0.3)
            })
            .collect();
        let mut mesh = triangulate(&v, &[0, 1, 2, 3, 4, 5], &[]).unwrap();
        let area = mesh.area(&v);
        refine(&v, &mut mesh, &[], 1e-10);

        approx::assert_relative_eq!(mesh.area(&v), area, epsilon = 1e-12);
        for (t, tri) in mesh.triangles().iter().enumerate() {
            assert!(tri.signed_area(&v) > 0.0);
            for i in 0..3 {
                if let Some(u) = tri.neighbors[i] {
                    let (a, b) = tri.edge(i);
                    let k = mesh.triangles()[u].edge_index(a, b).unwrap();
                    assert_eq!(mesh.triangles()[u].neighbors[k], Some(t));
                }
            }
        }
    }

    #[test]
    fn test_delaunay_triangulation_is_stable() {
        let v = thin_quad();
        let mut mesh = Triangulation::from_triangles(vec![[0, 1, 3], [1, 2, 3]]).unwrap();
        assert_eq!(refine(&v, &mut mesh, &[], 1e-10), 0);
    }
}
