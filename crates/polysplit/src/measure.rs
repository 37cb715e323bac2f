//! Geometric properties of polygons: area, normal, centroid and bounds.

use nalgebra::{Point3, Vector3};

use crate::{Plane3D, Polygon, PolygonError};

/// Sine of the largest reflex turn still accepted as straight by [`Polygon::is_convex`].
const CONVEXITY_TOLERANCE: f32 = 1e-4;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// The point with minimum coordinates.
    pub mins: Point3<f32>,
    /// The point with maximum coordinates.
    pub maxs: Point3<f32>,
}

impl Aabb {
    /// Creates a box from its two extreme corners.
    pub fn new(mins: Point3<f32>, maxs: Point3<f32>) -> Self {
        Self { mins, maxs }
    }

    /// Creates the smallest box containing every point, or `None` if there are no points.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point3<f32>>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut aabb = Self::new(first, first);
        for point in points {
            aabb.take_point(point);
        }
        Some(aabb)
    }

    /// Bounds a whole set of polygons, or `None` if they hold no vertices.
    pub fn from_polygons(polygons: &[Polygon]) -> Option<Self> {
        Self::from_points(polygons.iter().flat_map(|p| p.vertices().iter().copied()))
    }

    /// Enlarges this box so it also contains `point`.
    pub fn take_point(&mut self, point: Point3<f32>) {
        self.mins = self.mins.coords.inf(&point.coords).into();
        self.maxs = self.maxs.coords.sup(&point.coords).into();
    }

    /// Returns the smallest box containing both `self` and `other`.
    pub fn merged(&self, other: &Aabb) -> Aabb {
        Aabb {
            mins: self.mins.coords.inf(&other.mins.coords).into(),
            maxs: self.maxs.coords.sup(&other.maxs.coords).into(),
        }
    }

    /// Returns the size of the box along each axis.
    pub fn extents(&self) -> Vector3<f32> {
        self.maxs - self.mins
    }

    /// Returns the center of the box.
    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.mins, &self.maxs)
    }
}

impl Polygon {
    fn require_area(&self) -> Result<(), PolygonError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(PolygonError::Degenerate { count: self.len() })
        }
    }

    /// Cross products of the fan triangles `(v0, vi, vi+1)`, unscaled.
    fn fan_cross_products(&self) -> impl Iterator<Item = Vector3<f32>> + '_ {
        let vertices = self.vertices();
        let origin = vertices[0];
        vertices[1..]
            .windows(2)
            .map(move |edge| (edge[0] - origin).cross(&(edge[1] - origin)))
    }

    /// Computes the area of the polygon.
    ///
    /// The polygon is triangulated as a fan from its first vertex and the
    /// triangle areas are summed. The result does not depend on winding.
    pub fn area(&self) -> Result<f32, PolygonError> {
        self.require_area()?;
        Ok(self.fan_cross_products().map(|c| c.norm()).sum::<f32>() * 0.5)
    }

    /// Computes the vector area of the polygon.
    ///
    /// Each component is the signed area of the polygon projected onto the
    /// plane orthogonal to that axis (x: yz-plane, y: zx-plane, z: xy-plane).
    /// The vector points along the winding normal and its length equals the
    /// area of a planar polygon.
    pub fn projected_area(&self) -> Result<Vector3<f32>, PolygonError> {
        self.require_area()?;
        Ok(self.fan_cross_products().sum::<Vector3<f32>>() * 0.5)
    }

    /// Computes the unit normal of the polygon from its vector area.
    ///
    /// Unlike a cross product of the first three vertices this stays stable
    /// when the leading vertices are (nearly) collinear.
    pub fn normal(&self) -> Result<Vector3<f32>, PolygonError> {
        let area = self.projected_area()?;
        area.try_normalize(f32::EPSILON)
            .ok_or(PolygonError::Degenerate { count: self.len() })
    }

    /// Computes the centroid of the polygon as the mean of its vertices.
    pub fn centroid(&self) -> Result<Point3<f32>, PolygonError> {
        self.require_area()?;
        let sum: Vector3<f32> = self.vertices().iter().map(|p| p.coords).sum();
        Ok(Point3::from(sum / self.len() as f32))
    }

    /// Computes the axis-aligned bounding box of the vertices.
    pub fn bounding_box(&self) -> Result<Aabb, PolygonError> {
        Aabb::from_points(self.vertices().iter().copied())
            .ok_or(PolygonError::Degenerate { count: 0 })
    }

    /// Returns the plane this polygon lies on, through its first vertex and
    /// facing along its winding normal.
    pub fn plane(&self) -> Result<Plane3D, PolygonError> {
        let normal = self.normal()?;
        Ok(Plane3D::from_point_and_normal(self.vertices()[0], normal))
    }

    /// Returns true if every turn along the boundary bends the same way as
    /// the polygon normal. Collinear vertices are accepted.
    pub fn is_convex(&self) -> Result<bool, PolygonError> {
        let normal = self.normal()?;
        let vertices = self.vertices();
        let n = vertices.len();

        let convex = (0..n).all(|i| {
            let a = vertices[i];
            let b = vertices[(i + 1) % n];
            let c = vertices[(i + 2) % n];
            let turn = (b - a).cross(&(c - b)).dot(&normal);
            turn >= -CONVEXITY_TOLERANCE * (b - a).norm() * (c - b).norm()
        });
        Ok(convex)
    }
}

impl TryFrom<&Polygon> for Plane3D {
    type Error = PolygonError;

    fn try_from(polygon: &Polygon) -> Result<Self, Self::Error> {
        polygon.plane()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn make_polygon(points: &[[f32; 3]]) -> Polygon {
        Polygon::from_vertices(points.iter().map(|p| Point3::new(p[0], p[1], p[2])).collect())
    }

    fn square() -> Polygon {
        make_polygon(&[
            [0.0, 0.0, 0.0],
            [4.0, 0.0, 0.0],
            [4.0, 4.0, 0.0],
            [0.0, 4.0, 0.0],
        ])
    }

    fn slanted_triangle() -> Polygon {
        make_polygon(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    #[test]
    fn square_area_and_normal() {
        let square = square();
        assert_relative_eq!(square.area().unwrap(), 16.0);
        assert_relative_eq!(square.projected_area().unwrap(), Vector3::new(0.0, 0.0, 16.0));
        assert_relative_eq!(square.normal().unwrap(), Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn slanted_triangle_area_and_normal() {
        let triangle = slanted_triangle();
        let expected = Vector3::new(1.0, 1.0, 1.0).normalize();

        assert_relative_eq!(triangle.area().unwrap(), 3.0_f32.sqrt() / 2.0, epsilon = 1e-6);
        assert_relative_eq!(triangle.normal().unwrap(), expected, epsilon = 1e-6);
        assert_relative_eq!(
            triangle.projected_area().unwrap(),
            Vector3::new(0.5, 0.5, 0.5),
            epsilon = 1e-6
        );
    }

    #[test]
    fn reversed_winding_flips_projected_area_only() {
        // Same triangle as above, listed the other way round.
        let triangle = make_polygon(&[[1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]]);

        assert_relative_eq!(triangle.area().unwrap(), 3.0_f32.sqrt() / 2.0, epsilon = 1e-6);
        assert_relative_eq!(
            triangle.projected_area().unwrap(),
            Vector3::new(-0.5, -0.5, -0.5),
            epsilon = 1e-6
        );
    }

    #[test]
    fn normal_survives_collinear_leading_vertices() {
        // The first three vertices are collinear.
        let polygon = make_polygon(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [2.0, 2.0, 0.0],
            [0.0, 2.0, 0.0],
        ]);
        assert_relative_eq!(polygon.normal().unwrap(), Vector3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(polygon.area().unwrap(), 4.0);
    }

    #[test]
    fn degenerate_polygons_are_rejected() {
        let segment = make_polygon(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        let degenerate = PolygonError::Degenerate { count: 2 };

        assert_eq!(segment.area(), Err(degenerate));
        assert_eq!(segment.centroid(), Err(degenerate));
        assert!(segment.normal().is_err());
        assert!(segment.projected_area().is_err());

        let line = make_polygon(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        assert_eq!(line.normal(), Err(PolygonError::Degenerate { count: 3 }));
    }

    #[test]
    fn centroid_is_vertex_mean() {
        let centroid = square().centroid().unwrap();
        assert_relative_eq!(centroid, Point3::new(2.0, 2.0, 0.0));

        // Not area weighted: an extra vertex on an edge pulls the mean.
        let skewed = make_polygon(&[
            [0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [4.0, 0.0, 0.0],
            [4.0, 4.0, 0.0],
            [0.0, 4.0, 0.0],
        ]);
        assert_relative_eq!(skewed.centroid().unwrap(), Point3::new(2.0, 1.6, 0.0));
    }

    #[test]
    fn bounding_box_is_componentwise() {
        let triangle = make_polygon(&[[1.0, -2.0, 3.0], [-4.0, 5.0, 0.0], [2.0, 1.0, -6.0]]);
        let aabb = triangle.bounding_box().unwrap();
        assert_eq!(aabb.mins, Point3::new(-4.0, -2.0, -6.0));
        assert_eq!(aabb.maxs, Point3::new(2.0, 5.0, 3.0));
        assert_eq!(aabb.extents(), Vector3::new(6.0, 7.0, 9.0));
    }

    #[test]
    fn bounding_box_of_empty_polygon_fails() {
        let empty = Polygon::with_capacity(3).unwrap();
        assert_eq!(empty.bounding_box(), Err(PolygonError::Degenerate { count: 0 }));
    }

    #[test]
    fn bounds_of_polygon_list() {
        let far = make_polygon(&[[10.0, 10.0, 10.0], [11.0, 10.0, 10.0], [10.0, 11.0, 10.0]]);
        let aabb = Aabb::from_polygons(&[square(), far]).unwrap();
        assert_eq!(aabb.mins, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(aabb.maxs, Point3::new(11.0, 11.0, 10.0));

        assert!(Aabb::from_polygons(&[]).is_none());
    }

    #[test]
    fn merged_and_center() {
        let a = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Point3::new(-1.0, 2.0, 0.5), Point3::new(0.0, 3.0, 0.5));
        let merged = a.merged(&b);
        assert_eq!(merged.mins, Point3::new(-1.0, 0.0, 0.0));
        assert_eq!(merged.maxs, Point3::new(1.0, 3.0, 1.0));
        assert_eq!(merged.center(), Point3::new(0.0, 1.5, 0.5));
    }

    #[test]
    fn plane_through_polygon() {
        let polygon = make_polygon(&[[0.0, 0.0, 2.0], [1.0, 0.0, 2.0], [1.0, 1.0, 2.0]]);
        let plane = Plane3D::try_from(&polygon).unwrap();
        assert_relative_eq!(plane.normal(), Vector3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(plane.offset(), 2.0);
    }

    #[test]
    fn convexity() {
        assert!(square().is_convex().unwrap());
        assert!(slanted_triangle().is_convex().unwrap());

        let dart = make_polygon(&[
            [0.0, 0.0, 0.0],
            [4.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 4.0, 0.0],
        ]);
        assert!(!dart.is_convex().unwrap());
    }
}
