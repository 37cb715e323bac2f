//! Polygon lifecycle: allocation, copies, and the plane operations that
//! produce new polygons.

use nalgebra::{Point3, Vector3};

use crate::cuttable::{SplitResult, split_polygon};
use crate::plane::validate_epsilon;
use crate::{DEFAULT_EPSILON, Heap, Plane3D, Polygon, PolygonError, VertexAllocator};

/// Creates, copies, splits and releases polygons through one allocator.
///
/// Every polygon a factory hands out owns a buffer from its allocator. Give
/// polygons back with [`release`](Self::release) so pooled storage can be
/// reused; dropping a polygon instead simply frees its buffer.
///
/// ```
/// use nalgebra::{Point3, Vector3};
/// use polysplit::{Plane3D, PolygonFactory, Pool};
///
/// let pool = Pool::new();
/// let factory = PolygonFactory::new(&pool).with_epsilon(0.01).unwrap();
///
/// let square = factory
///     .from_vertices(&[
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(4.0, 0.0, 0.0),
///         Point3::new(4.0, 4.0, 0.0),
///         Point3::new(0.0, 4.0, 0.0),
///     ])
///     .unwrap();
///
/// let plane = Plane3D::new(Vector3::new(1.0, 0.0, 0.0), 2.0);
/// let (front, back) = factory.split(&square, &plane).unwrap();
/// assert_eq!(front.as_ref().map(|p| p.len()), Some(4));
/// assert_eq!(back.as_ref().map(|p| p.len()), Some(4));
///
/// for polygon in [Some(square), front, back].into_iter().flatten() {
///     factory.release(polygon);
/// }
/// assert_eq!(pool.live(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct PolygonFactory<A = Heap> {
    allocator: A,
    epsilon: f32,
}

impl Default for PolygonFactory<Heap> {
    fn default() -> Self {
        Self::new(Heap)
    }
}

impl<A: VertexAllocator> PolygonFactory<A> {
    /// Creates a factory drawing storage from `allocator`, using
    /// [`DEFAULT_EPSILON`] for plane operations.
    pub fn new(allocator: A) -> Self {
        Self {
            allocator,
            epsilon: DEFAULT_EPSILON,
        }
    }

    /// Sets the tolerance used by [`split`](Self::split) and [`clip`](Self::clip).
    pub fn with_epsilon(mut self, epsilon: f32) -> Result<Self, PolygonError> {
        self.epsilon = validate_epsilon(epsilon)?;
        Ok(self)
    }

    /// Returns the tolerance used by the plane operations.
    #[inline]
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Returns the allocator backing this factory.
    #[inline]
    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    /// Allocates an empty polygon able to hold `capacity` vertices.
    pub fn allocate(&self, capacity: usize) -> Result<Polygon, PolygonError> {
        let buffer = self.allocator.allocate(capacity)?;
        Ok(Polygon::from_buffer(buffer, capacity))
    }

    /// Returns the polygon's storage to the allocator.
    pub fn release(&self, polygon: Polygon) {
        self.allocator.release(polygon.into_buffer());
    }

    /// Allocates a full polygon holding `vertices`.
    pub fn from_vertices(&self, vertices: &[Point3<f32>]) -> Result<Polygon, PolygonError> {
        let mut polygon = self.allocate(vertices.len())?;
        polygon.extend_from_slice(vertices)?;
        Ok(polygon)
    }

    /// Deep-copies a polygon, keeping its capacity.
    pub fn copy(&self, polygon: &Polygon) -> Result<Polygon, PolygonError> {
        let mut copy = self.allocate(polygon.capacity())?;
        copy.extend_from_slice(polygon.vertices())?;
        Ok(copy)
    }

    /// Returns a copy of the polygon with its winding reversed.
    pub fn reverse(&self, polygon: &Polygon) -> Result<Polygon, PolygonError> {
        let mut reversed = self.allocate(polygon.capacity())?;
        for vertex in polygon.vertices().iter().rev() {
            reversed.push(*vertex)?;
        }
        Ok(reversed)
    }

    /// Builds a square of half-width `size` lying on `plane`, centered on the
    /// point of the plane closest to the origin.
    ///
    /// The winding faces along the plane normal. Large squares are the usual
    /// seed for clipping a face out of a set of planes.
    pub fn from_plane(&self, plane: &Plane3D, size: f32) -> Result<Polygon, PolygonError> {
        let normal = plane.normal();

        // Pick an up vector away from the dominant axis of the normal.
        let up = match normal.iamax() {
            0 => Vector3::y(),
            1 => Vector3::z(),
            _ => Vector3::x(),
        };
        let up = (up - normal * up.dot(&normal)).normalize();
        let right = up.cross(&normal);

        let origin = plane.project_point(Point3::origin());
        let up = up * size;
        let right = right * size;

        self.from_vertices(&[
            origin - right + up,
            origin - right - up,
            origin + right - up,
            origin + right + up,
        ])
    }

    /// Splits a polygon with the factory's epsilon. See [`split_with_epsilon`](Self::split_with_epsilon).
    pub fn split(&self, polygon: &Polygon, plane: &Plane3D) -> Result<SplitResult, PolygonError> {
        self.split_with_epsilon(polygon, plane, self.epsilon)
    }

    /// Splits a polygon into the parts in front of and behind `plane`.
    ///
    /// - every vertex on the plane: `(None, None)`
    /// - nothing behind: `(Some(copy), None)`
    /// - nothing in front: `(None, Some(copy))`
    /// - otherwise both halves, each allocated with room for `len + 4` vertices
    ///
    /// The input is never modified.
    pub fn split_with_epsilon(
        &self,
        polygon: &Polygon,
        plane: &Plane3D,
        epsilon: f32,
    ) -> Result<SplitResult, PolygonError> {
        let epsilon = validate_epsilon(epsilon)?;
        split_polygon(self, polygon, plane, epsilon)
    }

    /// Keeps the part of a polygon in front of `plane`, with the factory's epsilon.
    pub fn clip(&self, polygon: &Polygon, plane: &Plane3D) -> Result<Polygon, PolygonError> {
        self.clip_with_epsilon(polygon, plane, self.epsilon)
    }

    /// Keeps the part of a polygon in front of `plane`.
    ///
    /// Returns an empty polygon when nothing lies in front, including when
    /// the whole polygon lies on the plane.
    pub fn clip_with_epsilon(
        &self,
        polygon: &Polygon,
        plane: &Plane3D,
        epsilon: f32,
    ) -> Result<Polygon, PolygonError> {
        let (front, back) = self.split_with_epsilon(polygon, plane, epsilon)?;
        if let Some(back) = back {
            self.release(back);
        }
        match front {
            Some(front) => Ok(front),
            None => self.allocate(0),
        }
    }
}
