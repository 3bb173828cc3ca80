//! Property tests over randomly generated star polygons, plus a few fixed
//! shapes exercised through the public API only.

use approx::assert_relative_eq;
use proptest::prelude::*;

use convex_decomp::polygon::loop_area;
use convex_decomp::{
    decompose, decompose_with, triangulate, ConvexRegion, DecompError, DecomposeOptions,
    HoleDefect, LoopRole, Point2,
};

const EPS: f64 = 1e-10;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// A star-shaped polygon around the origin and an optional CW hole of
/// radius 1. Returns the vertex buffer, the outer loop and the holes.
fn star(
    spokes: &[(f64, f64)],
    hole: Option<usize>,
) -> (Vec<Point2<f64>>, Vec<usize>, Vec<Vec<usize>>) {
    let n = spokes.len();
    let step = 2.0 * std::f64::consts::PI / n as f64;

    let mut vertices: Vec<Point2<f64>> = spokes
        .iter()
        .enumerate()
        .map(|(i, &(jitter, radius))| {
            let angle = (i as f64 + jitter) * step;
            Point2::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect();
    let outer: Vec<usize> = (0..n).collect();

    let mut holes = Vec::new();
    if let Some(k) = hole {
        let hole_step = 2.0 * std::f64::consts::PI / k as f64;
        let base = vertices.len();
        vertices.extend((0..k).map(|j| {
            let angle = 0.3 - j as f64 * hole_step;
            Point2::new(angle.cos(), angle.sin())
        }));
        holes.push((base..base + k).collect());
    }

    (vertices, outer, holes)
}

fn spokes() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((-0.4f64..0.4, 2.0f64..4.0), 8..32)
}

fn hole() -> impl Strategy<Value = Option<usize>> {
    prop::option::of(3usize..8)
}

/// The star of `spokes` with a triangular hole hanging off outer vertex `k`.
///
/// The hole's other two vertices sit at radius 1 inside the fans on either
/// side of `k`. With `duplicate` the contact is a separate index at the same
/// position instead of the shared index `k`.
fn star_with_touching_hole(
    spokes: &[(f64, f64)],
    k: usize,
    duplicate: bool,
) -> (Vec<Point2<f64>>, Vec<usize>, Vec<Vec<usize>>) {
    let (mut vertices, outer, _) = star(spokes, None);
    let n = spokes.len();
    let k = k % n;
    let step = 2.0 * std::f64::consts::PI / n as f64;
    let theta = (k as f64 + spokes[k].0) * step;
    let delta = 0.15 * step;

    let base = vertices.len();
    vertices.push(Point2::new((theta + delta).cos(), (theta + delta).sin()));
    vertices.push(Point2::new((theta - delta).cos(), (theta - delta).sin()));
    let contact = if duplicate {
        vertices.push(vertices[k]);
        base + 2
    } else {
        k
    };

    (vertices, outer, vec![vec![contact, base, base + 1]])
}

/// A `cols` x `rows` block of 3x3 cells; every `Some` cell carries a
/// jittered quad hole.
fn perforated(
    cols: usize,
    rows: usize,
    cells: &[Option<[(f64, f64); 4]>],
) -> (Vec<Point2<f64>>, Vec<usize>, Vec<Vec<usize>>) {
    let (w, h) = (3.0 * cols as f64, 3.0 * rows as f64);
    let mut vertices = vec![
        Point2::new(0.0, 0.0),
        Point2::new(w, 0.0),
        Point2::new(w, h),
        Point2::new(0.0, h),
    ];
    let corners = [(0.75, 0.75), (2.25, 0.75), (2.25, 2.25), (0.75, 2.25)];

    let mut holes = Vec::new();
    for (cell, jitter) in cells.iter().enumerate() {
        let Some(jitter) = jitter else {
            continue;
        };
        let (x0, y0) = (3.0 * (cell % cols) as f64, 3.0 * (cell / cols) as f64);
        let start = vertices.len();
        for (&(cx, cy), &(dx, dy)) in corners.iter().zip(jitter) {
            vertices.push(Point2::new(x0 + cx + dx, y0 + cy + dy));
        }
        holes.push((start..start + 4).collect());
    }

    (vertices, vec![0, 1, 2, 3], holes)
}

fn grid() -> impl Strategy<Value = (usize, usize, Vec<Option<[(f64, f64); 4]>>)> {
    (1usize..4, 1usize..4).prop_flat_map(|(cols, rows)| {
        let jitter = prop::array::uniform4((-0.5f64..0.5, -0.5f64..0.5));
        (
            Just(cols),
            Just(rows),
            prop::collection::vec(prop::option::of(jitter), cols * rows),
        )
    })
}

/// Checks convexity, pairwise disjointness and area coverage of `regions`.
fn check_regions(
    vertices: &[Point2<f64>],
    outer: &[usize],
    holes: &[Vec<usize>],
    regions: &[ConvexRegion],
) -> Result<(), TestCaseError> {
    prop_assert!(!regions.is_empty());
    for (k, region) in regions.iter().enumerate() {
        prop_assert!(region.len() >= 3);
        prop_assert!(region.is_convex(vertices, EPS));
        prop_assert!(region.area(vertices) > 0.0);
        prop_assert!(region.indices.iter().all(|&i| i < vertices.len()));
        for other in &regions[k + 1..] {
            prop_assert!(
                !region.overlaps(other, vertices, EPS),
                "{:?} overlaps {:?}",
                region.indices,
                other.indices
            );
        }
    }

    let total: f64 = regions.iter().map(|r| r.area(vertices)).sum();
    let expected = covered_area(vertices, outer, holes);
    prop_assert!((total - expected).abs() < 1e-9 * expected.max(1.0));
    Ok(())
}

fn covered_area(vertices: &[Point2<f64>], outer: &[usize], holes: &[Vec<usize>]) -> f64 {
    loop_area(vertices, outer) - holes.iter().map(|h| loop_area(vertices, h)).sum::<f64>()
}

proptest! {
    #[test]
    fn triangle_count_matches_euler(spokes in spokes(), hole in hole()) {
        init_logging();
        let (vertices, outer, holes) = star(&spokes, hole);
        let mesh = triangulate(&vertices, &outer, &holes).unwrap();

        let hole_vertices: usize = holes.iter().map(Vec::len).sum();
        let expected = outer.len() + hole_vertices + 2 * holes.len() - 2;
        prop_assert_eq!(mesh.len(), expected);
    }

    #[test]
    fn triangles_tile_the_polygon(spokes in spokes(), hole in hole()) {
        let (vertices, outer, holes) = star(&spokes, hole);
        let mesh = triangulate(&vertices, &outer, &holes).unwrap();

        for t in mesh.triangles() {
            prop_assert!(t.signed_area(&vertices) > 0.0);
            for &v in &t.vertices {
                prop_assert!(v < vertices.len());
            }
        }

        let expected = covered_area(&vertices, &outer, &holes);
        prop_assert!((mesh.area(&vertices) - expected).abs() < 1e-9 * expected.max(1.0));
    }

    #[test]
    fn regions_are_convex_and_cover(spokes in spokes(), hole in hole(), refine in any::<bool>()) {
        let (vertices, outer, holes) = star(&spokes, hole);
        let options = DecomposeOptions::default().with_refine(refine);
        let regions = decompose_with(&vertices, &outer, &holes, &options).unwrap();
        check_regions(&vertices, &outer, &holes, &regions)?;
    }

    #[test]
    fn many_holes_decompose((cols, rows, cells) in grid(), refine in any::<bool>()) {
        init_logging();
        let (vertices, outer, holes) = perforated(cols, rows, &cells);
        let mesh = triangulate(&vertices, &outer, &holes).unwrap();
        prop_assert_eq!(mesh.len(), 4 + 4 * holes.len() + 2 * holes.len() - 2);

        let options = DecomposeOptions::default().with_refine(refine);
        let regions = decompose_with(&vertices, &outer, &holes, &options).unwrap();
        check_regions(&vertices, &outer, &holes, &regions)?;
    }

    #[test]
    fn touching_hole_decomposes(spokes in spokes(), k in 0usize..32, duplicate in any::<bool>()) {
        let (vertices, outer, holes) = star_with_touching_hole(&spokes, k, duplicate);

        // The contact vertex appears twice in the merged loop, no bridge is added.
        let mesh = triangulate(&vertices, &outer, &holes).unwrap();
        prop_assert_eq!(mesh.len(), outer.len() + 3 - 1);
        let expected = covered_area(&vertices, &outer, &holes);
        prop_assert!((mesh.area(&vertices) - expected).abs() < 1e-9 * expected.max(1.0));

        let regions = decompose(&vertices, &outer, &holes).unwrap();
        check_regions(&vertices, &outer, &holes, &regions)?;

        // Generated counter-clockwise.
        let hole = ConvexRegion { indices: holes[0].clone() };
        for region in &regions {
            prop_assert!(!region.overlaps(&hole, &vertices, EPS));
        }
    }

    #[test]
    fn regions_never_outnumber_triangles(spokes in spokes(), hole in hole()) {
        let (vertices, outer, holes) = star(&spokes, hole);
        let mesh = triangulate(&vertices, &outer, &holes).unwrap();
        let regions = decompose(&vertices, &outer, &holes).unwrap();
        prop_assert!(regions.len() <= mesh.len());
    }

    #[test]
    fn output_is_canonical(spokes in spokes(), hole in hole()) {
        let (vertices, outer, holes) = star(&spokes, hole);
        let regions = decompose(&vertices, &outer, &holes).unwrap();

        for region in &regions {
            let first = region.indices[0];
            prop_assert!(region.indices.iter().all(|&i| i >= first));
        }
        prop_assert!(regions.windows(2).all(|w| w[0] <= w[1]));

        let again = decompose(&vertices, &outer, &holes).unwrap();
        prop_assert_eq!(regions, again);
    }
}

#[test]
fn test_square_is_one_region() {
    init_logging();
    let vertices = vec![
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(1.0, 1.0),
        Point2::new(0.0, 1.0),
    ];
    let regions = decompose(&vertices, &[2, 3, 0, 1], &[]).unwrap();
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].indices, vec![0, 1, 2, 3]);
}

#[test]
fn test_l_shape() {
    let vertices = vec![
        Point2::new(0.0, 0.0),
        Point2::new(2.0, 0.0),
        Point2::new(2.0, 1.0),
        Point2::new(1.0, 1.0),
        Point2::new(1.0, 2.0),
        Point2::new(0.0, 2.0),
    ];
    let outer = [0, 1, 2, 3, 4, 5];

    let mesh = triangulate(&vertices, &outer, &[]).unwrap();
    assert_eq!(mesh.len(), 4);

    let regions = decompose(&vertices, &outer, &[]).unwrap();
    assert!(regions.len() >= 2);
    let area: f64 = regions.iter().map(|r| r.area(&vertices)).sum();
    assert_relative_eq!(area, 3.0, epsilon = 1e-12);
}

#[test]
fn test_square_with_hole() {
    let vertices = vec![
        Point2::new(-2.0, -2.0),
        Point2::new(2.0, -2.0),
        Point2::new(2.0, 2.0),
        Point2::new(-2.0, 2.0),
        Point2::new(-1.0, -1.0),
        Point2::new(1.0, -1.0),
        Point2::new(1.0, 1.0),
        Point2::new(-1.0, 1.0),
    ];
    let holes = vec![vec![4, 5, 6, 7]];

    let mesh = triangulate(&vertices, &[0, 1, 2, 3], &holes).unwrap();
    assert_eq!(mesh.len(), 8);

    let regions = decompose(&vertices, &[0, 1, 2, 3], &holes).unwrap();
    assert!(regions.len() >= 4);
    for region in &regions {
        assert!(region.is_convex(&vertices, EPS));
    }
    let area: f64 = regions.iter().map(|r| r.area(&vertices)).sum();
    assert_relative_eq!(area, 12.0, epsilon = 1e-9);
}

#[test]
fn test_holes_touching_each_other() {
    let vertices = vec![
        Point2::new(0.0, 0.0),
        Point2::new(10.0, 0.0),
        Point2::new(10.0, 4.0),
        Point2::new(0.0, 4.0),
        Point2::new(7.0, 2.0),
        Point2::new(5.0, 1.0),
        Point2::new(5.0, 3.0),
        Point2::new(2.0, 1.0),
        Point2::new(2.0, 3.0),
    ];
    let outer = [0, 1, 2, 3];
    let holes = vec![vec![4, 5, 6], vec![7, 8, 5]];

    let mesh = triangulate(&vertices, &outer, &holes).unwrap();
    assert_relative_eq!(mesh.area(&vertices), 35.0, epsilon = 1e-9);

    let regions = decompose(&vertices, &outer, &holes).unwrap();
    let total: f64 = regions.iter().map(|r| r.area(&vertices)).sum();
    assert_relative_eq!(total, 35.0, epsilon = 1e-9);
    for (k, region) in regions.iter().enumerate() {
        assert!(region.is_convex(&vertices, EPS));
        for other in &regions[k + 1..] {
            assert!(!region.overlaps(other, &vertices, EPS));
        }
    }
}

#[test]
fn test_bowtie_is_rejected() {
    let vertices = vec![
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 1.0),
        Point2::new(1.0, 0.0),
        Point2::new(0.0, 1.0),
    ];
    let err = decompose(&vertices, &[0, 1, 2, 3], &[]).unwrap_err();
    assert!(matches!(
        err,
        DecompError::MalformedLoop {
            role: LoopRole::Outer,
            ..
        }
    ));
}

#[test]
fn test_nan_vertex_is_rejected() {
    let vertices = vec![
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(f64::NAN, 1.0),
        Point2::new(0.0, 1.0),
    ];
    let err = decompose(&vertices, &[0, 1, 2, 3], &[]).unwrap_err();
    assert!(matches!(
        err,
        DecompError::MalformedLoop {
            role: LoopRole::Outer,
            ..
        }
    ));
}

#[test]
fn test_straddling_hole_is_rejected() {
    let vertices = vec![
        Point2::new(0.0, 0.0),
        Point2::new(4.0, 0.0),
        Point2::new(4.0, 4.0),
        Point2::new(0.0, 4.0),
        Point2::new(3.0, 1.0),
        Point2::new(5.0, 1.0),
        Point2::new(5.0, 3.0),
        Point2::new(3.0, 3.0),
    ];
    let err = decompose(&vertices, &[0, 1, 2, 3], &[vec![4, 5, 6, 7]]).unwrap_err();
    assert_eq!(
        err,
        DecompError::InvalidHoleTopology {
            hole: 0,
            defect: HoleDefect::CrossesOuter,
        }
    );
}

#[test]
fn test_f32_vertices() {
    let vertices = vec![
        Point2::new(0.0f32, 0.0),
        Point2::new(2.0, 0.0),
        Point2::new(2.0, 1.0),
        Point2::new(1.0, 1.0),
        Point2::new(1.0, 2.0),
        Point2::new(0.0, 2.0),
    ];
    let regions = decompose(&vertices, &[0, 1, 2, 3, 4, 5], &[]).unwrap();
    let area: f32 = regions.iter().map(|r| r.area(&vertices)).sum();
    assert!((area - 3.0).abs() < 1e-5);
}
