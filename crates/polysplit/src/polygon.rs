//! Capacity-bounded polygon container.

use nalgebra::Point3;

use crate::allocator::VertexBuffer;
use crate::plane::side_of_distance;
use crate::{Classification, DEFAULT_EPSILON, Heap, Plane3D, PlaneSide, PolygonError, VertexAllocator};

/// A planar polygon in 3D space, defined by an ordered list of vertices.
///
/// The vertex order encodes the winding: viewed from the front (the side the
/// normal points to) vertices run counter-clockwise.
///
/// Capacity is fixed when the polygon is created and never grows; appending
/// past it is an error. Cloning deep-copies the vertices.
#[derive(Debug, Clone)]
pub struct Polygon {
    vertices: VertexBuffer,
    capacity: usize,
}

impl Polygon {
    /// Creates an empty polygon able to hold `capacity` vertices, allocated
    /// from the system heap.
    pub fn with_capacity(capacity: usize) -> Result<Self, PolygonError> {
        Ok(Self::from_buffer(Heap.allocate(capacity)?, capacity))
    }

    /// Creates a full polygon from a list of vertices. The capacity is the
    /// number of vertices given.
    pub fn from_vertices(vertices: Vec<Point3<f32>>) -> Self {
        let capacity = vertices.len();
        Self { vertices, capacity }
    }

    /// Wraps an allocator buffer. Any stale contents are discarded.
    pub(crate) fn from_buffer(mut buffer: VertexBuffer, capacity: usize) -> Self {
        buffer.clear();
        Self {
            vertices: buffer,
            capacity,
        }
    }

    /// Gives up the backing storage so it can be returned to its allocator.
    pub(crate) fn into_buffer(self) -> VertexBuffer {
        self.vertices
    }

    /// Appends a vertex.
    ///
    /// Fails with [`PolygonError::CapacityExceeded`] if the polygon is full.
    pub fn push(&mut self, vertex: Point3<f32>) -> Result<(), PolygonError> {
        if self.is_full() {
            return Err(PolygonError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.vertices.push(vertex);
        Ok(())
    }

    /// Appends every vertex of `vertices`, or none of them if they do not fit.
    pub fn extend_from_slice(&mut self, vertices: &[Point3<f32>]) -> Result<(), PolygonError> {
        if self.len() + vertices.len() > self.capacity {
            return Err(PolygonError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.vertices.extend_from_slice(vertices);
        Ok(())
    }

    /// Returns the vertices of the polygon.
    #[inline]
    pub fn vertices(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the polygon has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns the maximum number of vertices this polygon can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns true if no more vertices can be appended.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.vertices.len() >= self.capacity
    }

    /// Returns true if the polygon has enough vertices to enclose an area.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.vertices.len() >= 3
    }

    /// Classifies this polygon relative to a plane.
    /// Uses the default [`DEFAULT_EPSILON`] tolerance.
    pub fn classify(&self, plane: &Plane3D) -> Classification {
        self.classify_with_epsilon(plane, DEFAULT_EPSILON)
    }

    /// Classifies this polygon relative to a plane, with a custom epsilon.
    ///
    /// Returns:
    /// - `Spanning` as soon as both a front and a back vertex have been seen
    /// - `Front` if no vertex is behind and at least one is in front
    /// - `Back` if no vertex is in front and at least one is behind
    /// - `Coplanar` if every vertex lies on the plane
    pub fn classify_with_epsilon(&self, plane: &Plane3D, epsilon: f32) -> Classification {
        classify_vertices(&self.vertices, plane, epsilon)
    }
}

/// Classifies a set of points against a plane, stopping at the first pair
/// of vertices found on opposite sides.
pub(crate) fn classify_vertices<'a, I>(vertices: I, plane: &Plane3D, epsilon: f32) -> Classification
where
    I: IntoIterator<Item = &'a Point3<f32>>,
{
    let mut front = false;
    let mut back = false;

    for vertex in vertices {
        match side_of_distance(plane.signed_distance(*vertex), epsilon) {
            PlaneSide::Front if back => return Classification::Spanning,
            PlaneSide::Back if front => return Classification::Spanning,
            PlaneSide::Front => front = true,
            PlaneSide::Back => back = true,
            PlaneSide::OnPlane => {}
        }
    }

    match (front, back) {
        (true, _) => Classification::Front,
        (false, true) => Classification::Back,
        (false, false) => Classification::Coplanar,
    }
}

/// Polygons are equal when they have the same vertices in the same order,
/// regardless of spare capacity.
impl PartialEq for Polygon {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn make_polygon(points: &[[f32; 3]]) -> Polygon {
        Polygon::from_vertices(points.iter().map(|p| Point3::new(p[0], p[1], p[2])).collect())
    }

    #[test]
    fn with_capacity_starts_empty() {
        let polygon = Polygon::with_capacity(4).unwrap();
        assert!(polygon.is_empty());
        assert_eq!(polygon.capacity(), 4);
        assert!(!polygon.is_full());
        assert!(!polygon.is_valid());
    }

    #[test]
    fn push_up_to_capacity() {
        let mut polygon = Polygon::with_capacity(3).unwrap();
        polygon.push(Point3::new(0.0, 0.0, 0.0)).unwrap();
        polygon.push(Point3::new(1.0, 0.0, 0.0)).unwrap();
        polygon.push(Point3::new(0.0, 1.0, 0.0)).unwrap();

        assert!(polygon.is_full());
        assert!(polygon.is_valid());
        assert_eq!(
            polygon.push(Point3::new(1.0, 1.0, 0.0)),
            Err(PolygonError::CapacityExceeded { capacity: 3 })
        );
        assert_eq!(polygon.len(), 3);
    }

    #[test]
    fn extend_is_all_or_nothing() {
        let mut polygon = Polygon::with_capacity(4).unwrap();
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];

        polygon.extend_from_slice(&points).unwrap();
        assert_eq!(polygon.len(), 3);

        assert!(polygon.extend_from_slice(&points[..2]).is_err());
        assert_eq!(polygon.len(), 3);
    }

    #[test]
    fn from_vertices_is_full() {
        let polygon = make_polygon(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        assert_eq!(polygon.capacity(), 3);
        assert!(polygon.is_full());
    }

    #[test]
    fn clone_is_deep() {
        let original = make_polygon(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let copy = original.clone();
        let moved = original.into_buffer();

        assert_eq!(copy.vertices(), moved.as_slice());
        assert_eq!(copy.capacity(), 3);
    }

    #[test]
    fn equality_ignores_capacity() {
        let full = make_polygon(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let mut roomy = Polygon::with_capacity(10).unwrap();
        for v in full.vertices() {
            roomy.push(*v).unwrap();
        }
        assert_eq!(full, roomy);
    }

    #[test]
    fn classify_front_back_coplanar() {
        let plane = Plane3D::new(Vector3::new(0.0, 0.0, 1.0), 0.0);

        let above = make_polygon(&[[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]]);
        let below = make_polygon(&[[0.0, 0.0, -1.0], [1.0, 0.0, -1.0], [0.0, 1.0, -1.0]]);
        let flat = make_polygon(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);

        assert_eq!(above.classify(&plane), Classification::Front);
        assert_eq!(below.classify(&plane), Classification::Back);
        assert_eq!(flat.classify(&plane), Classification::Coplanar);
    }

    #[test]
    fn classify_touching_polygon_is_not_spanning() {
        // One edge lies on the plane, the rest in front.
        let plane = Plane3D::new(Vector3::new(0.0, 1.0, 0.0), 0.0);
        let polygon = make_polygon(&[[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0, 0.0]]);
        assert_eq!(polygon.classify(&plane), Classification::Front);
    }

    #[test]
    fn classify_spanning() {
        let plane = Plane3D::new(Vector3::new(1.0, 0.0, 0.0), 2.0);
        let square = make_polygon(&[
            [0.0, 0.0, 0.0],
            [4.0, 0.0, 0.0],
            [4.0, 4.0, 0.0],
            [0.0, 4.0, 0.0],
        ]);
        assert_eq!(square.classify(&plane), Classification::Spanning);
    }

    #[test]
    fn classify_triangle_against_own_plane() {
        let triangle = make_polygon(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        let plane = Plane3D::new(Vector3::new(1.0, 1.0, 1.0), 1.0);
        assert_eq!(triangle.classify_with_epsilon(&plane, 0.1), Classification::Coplanar);
    }

    #[test]
    fn classify_epsilon_changes_outcome() {
        let plane = Plane3D::new(Vector3::new(0.0, 0.0, 1.0), 0.0);
        let shallow = make_polygon(&[[0.0, 0.0, 0.05], [1.0, 0.0, -0.05], [0.0, 1.0, 0.0]]);

        assert_eq!(shallow.classify_with_epsilon(&plane, 0.1), Classification::Coplanar);
        assert_eq!(shallow.classify_with_epsilon(&plane, 0.01), Classification::Spanning);
    }
}
