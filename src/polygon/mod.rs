//! Triangulation and convex decomposition of polygons with holes.
//!
//! Polygons are given as index loops into a shared vertex buffer: one outer
//! loop plus any number of hole loops. The pipeline is:
//! - validation and winding normalization ([`validate`])
//! - hole bridging and ear clipping ([`bridge_holes`], [`triangulate`])
//! - optional Lawson flips ([`refine`])
//! - Hertel-Mehlhorn merging ([`merge_convex`], [`decompose`])
//! - canonical output ([`build_regions`])
//!
//! # Example
//!
//! ```
//! use convex_decomp::polygon::decompose;
//! use convex_decomp::Point2;
//!
//! // A square with a square hole
//! let vertices = vec![
//!     Point2::new(-2.0, -2.0),
//!     Point2::new(2.0, -2.0),
//!     Point2::new(2.0, 2.0),
//!     Point2::new(-2.0, 2.0),
//!     Point2::new(-1.0, -1.0),
//!     Point2::new(1.0, -1.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(-1.0, 1.0),
//! ];
//!
//! let regions = decompose(&vertices, &[0, 1, 2, 3], &[vec![4, 5, 6, 7]]).unwrap();
//! let area: f64 = regions.iter().map(|r| r.area(&vertices)).sum();
//! assert!((area - 12.0).abs() < 1e-9);
//! ```

mod core;
mod decompose;
mod holes;
mod mesh;
mod output;
mod refine;
mod triangulate;
mod validate;

pub use self::core::{is_convex_loop, loop_area, loop_contains, signed_area, winding, Winding};
pub use decompose::{decompose, decompose_with, merge_convex};
pub use holes::{bridge_holes, Bridge, BridgedPolygon};
pub use mesh::{edge_key, EdgeKey, Triangle, Triangulation};
pub use output::{build_regions, ConvexRegion, Remapper};
pub use refine::refine;
pub use triangulate::{triangulate, triangulate_polygon, triangulate_with};
pub use validate::{validate, ValidPolygon};
