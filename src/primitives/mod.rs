//! Floating-point geometric primitives.
//!
//! The kernel identifies vertices by their index into a caller-owned
//! `&[Point2<F>]` buffer; these types only carry the coordinates.

mod point2;
mod segment2;
mod vec2;

pub use point2::Point2;
pub use segment2::Segment2;
pub use vec2::Vec2;
