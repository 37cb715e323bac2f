//! Planar polygon splitting and clipping for BSP-style geometry pipelines.
//!
//! The centerpiece is [`PolygonFactory::split_with_epsilon`], which cuts a
//! polygon with a plane into a front and a back half, treating vertices
//! within a tolerance of the plane as lying on it. Around it sit:
//!
//! - [`Plane3D`] and point classification ([`PlaneSide`])
//! - [`Polygon`], a capacity-bounded vertex loop, with area, normal,
//!   centroid and bounding-box queries
//! - whole-polygon classification ([`Classification`]) for callers building
//!   partition trees
//! - [`VertexAllocator`], the storage hook every polygon is allocated through
//! - [`Volume`], a convex brush that can be split into two closed brushes
//!
//! # Example
//!
//! ```
//! use nalgebra::{Point3, Vector3};
//! use polysplit::{Cuttable, Plane3D, Polygon};
//!
//! let square = Polygon::from_vertices(vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(4.0, 0.0, 0.0),
//!     Point3::new(4.0, 4.0, 0.0),
//!     Point3::new(0.0, 4.0, 0.0),
//! ]);
//! let plane = Plane3D::new(Vector3::new(1.0, 0.0, 0.0), 2.0);
//!
//! let (front, back) = square.cut(&plane).unwrap();
//! assert_eq!(front.unwrap().area().unwrap(), 8.0);
//! assert_eq!(back.unwrap().area().unwrap(), 8.0);
//! ```

mod allocator;
mod cuttable;
mod error;
mod factory;
mod measure;
mod plane;
mod polygon;
mod volume;

pub use allocator::{Heap, Pool, VertexAllocator, VertexBuffer};
pub use cuttable::{Cuttable, SplitResult};
pub use error::PolygonError;
pub use factory::PolygonFactory;
pub use measure::Aabb;
pub use plane::{Classification, DEFAULT_EPSILON, Plane3D, PlaneSide, validate_epsilon};
pub use polygon::Polygon;
pub use volume::Volume;
