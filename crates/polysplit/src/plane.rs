//! Cutting planes and point classification.

use nalgebra::{Point3, Vector3};

use crate::PolygonError;

/// Default tolerance for plane classification, in world units.
///
/// Points within this distance of a plane are considered to lie on it. This
/// is the value level geometry has been built with; callers working at a
/// different scale should pass their own epsilon.
pub const DEFAULT_EPSILON: f32 = 0.1;

/// Which side of a plane a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// Point is in front of the plane (positive side of normal)
    Front,
    /// Point is behind the plane (negative side of normal)
    Back,
    /// Point lies on the plane (within epsilon tolerance)
    OnPlane,
}

/// Classification of a whole polygon or volume relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// No vertex is behind the plane, at least one is in front
    Front,
    /// No vertex is in front of the plane, at least one is behind
    Back,
    /// All vertices are on the plane (coplanar)
    Coplanar,
    /// Vertices are on both sides (spans the plane)
    Spanning,
}

/// Checks that `epsilon` is usable as a classification tolerance.
pub fn validate_epsilon(epsilon: f32) -> Result<f32, PolygonError> {
    // Written this way round so NaN is rejected too.
    if epsilon >= 0.0 {
        Ok(epsilon)
    } else {
        Err(PolygonError::InvalidEpsilon(epsilon))
    }
}

/// A cutting plane, stored as a unit normal and its distance from the origin.
///
/// Points with `normal · p - offset > 0` are in front. Every split, clip and
/// classification in this crate measures distances this way round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane3D {
    normal: Vector3<f32>,
    offset: f32,
}

impl Plane3D {
    /// Builds the plane `normal · p = offset`. Both are rescaled so the
    /// normal has unit length; tolerances are then in world units.
    ///
    /// # Panics
    /// Panics if the normal vector has zero length.
    pub fn new(normal: Vector3<f32>, offset: f32) -> Self {
        let norm = normal.norm();
        assert!(norm > f32::EPSILON, "Plane normal cannot be zero");
        Self {
            normal: normal / norm,
            offset: offset / norm,
        }
    }

    /// Builds the plane through `point` facing along `normal`.
    ///
    /// # Panics
    /// Panics if the normal vector has zero length.
    pub fn from_point_and_normal(point: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self::new(normal, normal.dot(&point.coords))
    }

    /// Builds the plane through a triangle, facing the side from which
    /// `a, b, c` run counter-clockwise.
    ///
    /// # Panics
    /// Panics if the points are collinear (or nearly so).
    pub fn from_three_points(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        Self::from_point_and_normal(a, (b - a).cross(&(c - a)))
    }

    #[inline]
    pub fn normal(&self) -> Vector3<f32> {
        self.normal
    }

    /// Distance from the origin to the plane, measured along the normal.
    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// `normal · point - offset`: positive in front, negative behind.
    #[inline]
    pub fn signed_distance(&self, point: Point3<f32>) -> f32 {
        self.normal.dot(&point.coords) - self.offset
    }

    /// Side of `point` with the [`DEFAULT_EPSILON`] band.
    #[inline]
    pub fn classify_point(&self, point: Point3<f32>) -> PlaneSide {
        self.classify_point_with_epsilon(point, DEFAULT_EPSILON)
    }

    /// Side of `point`; anything within `epsilon` of the plane is [`PlaneSide::OnPlane`].
    pub fn classify_point_with_epsilon(&self, point: Point3<f32>, epsilon: f32) -> PlaneSide {
        side_of_distance(self.signed_distance(point), epsilon)
    }

    /// The same plane facing the other way. Clipping by the flipped plane
    /// keeps what the original would put behind.
    #[inline]
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            offset: -self.offset,
        }
    }

    /// Closest point on the plane.
    #[inline]
    pub fn project_point(&self, point: Point3<f32>) -> Point3<f32> {
        point - self.normal * self.signed_distance(point)
    }
}

/// Maps a signed distance onto a side. Shared by every classifier so the
/// tolerance band is applied identically everywhere.
#[inline]
pub(crate) fn side_of_distance(distance: f32, epsilon: f32) -> PlaneSide {
    if distance > epsilon {
        PlaneSide::Front
    } else if distance < -epsilon {
        PlaneSide::Back
    } else {
        PlaneSide::OnPlane
    }
}
