//! Foundation types: geometry and numeric helpers.

pub mod math;
pub mod point;
pub mod route;

pub use point::Point3;
pub use route::Route;
