//! convex-decomp - Convex decomposition of polygons with holes
//!
//! Triangulates a 2D polygon with holes by ear clipping and merges the
//! triangles into convex pieces with the Hertel-Mehlhorn algorithm. Polygons
//! are index loops into a borrowed vertex buffer; results reference the same
//! indices, so no vertex is ever copied or synthesized.
//!
//! Every predicate takes the same explicit tolerance, configured through
//! [`DecomposeOptions`].
//!
//! # Example
//!
//! ```
//! use convex_decomp::{decompose, Point2};
//!
//! let vertices = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(2.0, 0.0),
//!     Point2::new(2.0, 1.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(1.0, 2.0),
//!     Point2::new(0.0, 2.0),
//! ];
//!
//! let regions = decompose(&vertices, &[0, 1, 2, 3, 4, 5], &[]).unwrap();
//! for region in &regions {
//!     assert!(region.is_convex(&vertices, 1e-10));
//! }
//! ```

pub mod config;
pub mod error;
pub mod io;
pub mod polygon;
pub mod primitives;
pub mod tolerance;

pub use config::DecomposeOptions;
pub use error::{DecompError, HoleDefect, LoopDefect, LoopRole};
pub use polygon::{
    decompose, decompose_with, triangulate, triangulate_with, ConvexRegion, Triangle,
    Triangulation,
};
pub use primitives::{Point2, Segment2, Vec2};
pub use tolerance::{orient2d, Orientation};
