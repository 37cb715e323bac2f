//! Polygon cutting/splitting against a plane.

use nalgebra::Point3;

use crate::plane::side_of_distance;
use crate::{DEFAULT_EPSILON, Plane3D, PlaneSide, Polygon, PolygonError, PolygonFactory, VertexAllocator};

/// The `(front, back)` halves produced by cutting something with a plane.
pub type SplitResult<T = Polygon> = (Option<T>, Option<T>);

/// Trait for geometry that can be cut by a plane.
///
/// The pieces are always allocated from the system heap. To draw them from
/// another allocator, such as a [`Pool`](crate::Pool), go through
/// [`PolygonFactory::split`] or [`PolygonFactory::split_volume`] instead.
pub trait Cuttable: Sized {
    /// Cuts the geometry by a plane, treating points within `epsilon` of the
    /// plane as lying on it.
    ///
    /// Returns `(front, back)` where:
    /// - `front`: `Some(part)` containing the part on the front side of the plane
    /// - `back`: `Some(part)` containing the part on the back side of the plane
    ///
    /// # Return values by classification
    ///
    /// - **Front**: `(Some(copy), None)` - entire geometry is in front
    /// - **Back**: `(None, Some(copy))` - entire geometry is behind
    /// - **Coplanar**: `(None, None)` - the caller decides what coplanar geometry means
    /// - **Spanning**: `(Some(front_part), Some(back_part))` - split into two pieces
    fn cut_with_epsilon(
        &self,
        plane: &Plane3D,
        epsilon: f32,
    ) -> Result<SplitResult<Self>, PolygonError>;

    /// Cuts the geometry by a plane with the default [`DEFAULT_EPSILON`] tolerance.
    fn cut(&self, plane: &Plane3D) -> Result<SplitResult<Self>, PolygonError> {
        self.cut_with_epsilon(plane, DEFAULT_EPSILON)
    }
}

impl Cuttable for Polygon {
    fn cut_with_epsilon(
        &self,
        plane: &Plane3D,
        epsilon: f32,
    ) -> Result<SplitResult<Self>, PolygonError> {
        PolygonFactory::default().split_with_epsilon(self, plane, epsilon)
    }
}

/// Splits a polygon into front and back parts.
///
/// Walks the polygon edges and builds two vertex lists, adding an
/// intersection point wherever an edge goes from strictly in front to
/// strictly behind (or back again). Vertices on the plane go to both halves
/// so each half stays a closed loop along the cut.
///
/// `epsilon` must already be validated.
pub(crate) fn split_polygon<A: VertexAllocator>(
    factory: &PolygonFactory<A>,
    polygon: &Polygon,
    plane: &Plane3D,
    epsilon: f32,
) -> Result<SplitResult, PolygonError> {
    let vertices = polygon.vertices();

    // Classify all vertices upfront
    let distances: Vec<f32> = vertices.iter().map(|v| plane.signed_distance(*v)).collect();
    let sides: Vec<PlaneSide> = distances
        .iter()
        .map(|d| side_of_distance(*d, epsilon))
        .collect();

    let front_count = sides.iter().filter(|s| **s == PlaneSide::Front).count();
    let back_count = sides.iter().filter(|s| **s == PlaneSide::Back).count();

    if front_count == 0 && back_count == 0 {
        log::trace!("{} vertices on the plane, nothing to split", vertices.len());
        return Ok((None, None));
    }
    if back_count == 0 {
        return Ok((Some(factory.copy(polygon)?), None));
    }
    if front_count == 0 {
        return Ok((None, Some(factory.copy(polygon)?)));
    }

    // Each crossing adds one vertex to both halves. A convex loop crosses at
    // most twice and keeps the usual `n + 4`; concave loops get one slot per
    // crossing.
    let n = vertices.len();
    let crossings = (0..n)
        .filter(|&i| {
            matches!(
                (sides[i], sides[(i + 1) % n]),
                (PlaneSide::Front, PlaneSide::Back) | (PlaneSide::Back, PlaneSide::Front)
            )
        })
        .count();
    let max_vertices = n + crossings.max(4);
    let mut front = factory.allocate(max_vertices)?;
    let mut back = match factory.allocate(max_vertices) {
        Ok(back) => back,
        Err(err) => {
            factory.release(front);
            return Err(err);
        }
    };

    if let Err(err) = fill_halves(polygon, plane, &distances, &sides, &mut front, &mut back) {
        factory.release(front);
        factory.release(back);
        return Err(err);
    }

    log::trace!(
        "split {} vertices into {} front and {} back",
        vertices.len(),
        front.len(),
        back.len()
    );
    Ok((Some(front), Some(back)))
}

fn fill_halves(
    polygon: &Polygon,
    plane: &Plane3D,
    distances: &[f32],
    sides: &[PlaneSide],
    front: &mut Polygon,
    back: &mut Polygon,
) -> Result<(), PolygonError> {
    let vertices = polygon.vertices();
    let n = vertices.len();

    for i in 0..n {
        let current = vertices[i];
        let next_idx = (i + 1) % n;

        match sides[i] {
            PlaneSide::Front => emit(front, current)?,
            PlaneSide::Back => emit(back, current)?,
            PlaneSide::OnPlane => {
                emit(front, current)?;
                emit(back, current)?;
                continue;
            }
        }

        // Edge stays on one side or ends on the plane: no split point
        if sides[next_idx] == PlaneSide::OnPlane || sides[next_idx] == sides[i] {
            continue;
        }

        let t = distances[i] / (distances[i] - distances[next_idx]);
        let mid = split_vertex(plane, current, vertices[next_idx], t);
        emit(front, mid)?;
        emit(back, mid)?;
    }

    Ok(())
}

/// Appends to a split half. Running out of room means the `n + 4` bound is wrong.
fn emit(half: &mut Polygon, vertex: Point3<f32>) -> Result<(), PolygonError> {
    half.push(vertex).map_err(|_| {
        log::error!(
            "split half overflowed its {} vertex estimate",
            half.capacity()
        );
        PolygonError::Internal("split produced more vertices than estimated")
    })
}

/// Interpolates the crossing point of `start -> end` at fraction `t`.
///
/// Components along an axis-aligned normal are snapped to the plane offset
/// to avoid round-off on axial cuts.
fn split_vertex(plane: &Plane3D, start: Point3<f32>, end: Point3<f32>, t: f32) -> Point3<f32> {
    let normal = plane.normal();
    let offset = plane.offset();

    let mut mid = start;
    for k in 0..3 {
        mid[k] = if normal[k] == 1.0 {
            offset
        } else if normal[k] == -1.0 {
            -offset
        } else {
            start[k] + t * (end[k] - start[k])
        };
    }
    mid
}
