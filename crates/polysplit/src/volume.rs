//! Convex volumes (brushes) bounded by polygons.

use nalgebra::Point3;

use crate::cuttable::SplitResult;
use crate::plane::validate_epsilon;
use crate::polygon::classify_vertices;
use crate::{
    Aabb, Classification, Cuttable, DEFAULT_EPSILON, Plane3D, Polygon, PolygonError,
    PolygonFactory, VertexAllocator,
};

/// A closed convex volume described by its side polygons.
///
/// Each side is wound so that its normal points out of the volume.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    sides: Vec<Polygon>,
}

impl Volume {
    /// Creates a volume from its outward-facing sides.
    pub fn from_sides(sides: Vec<Polygon>) -> Self {
        Self { sides }
    }

    /// Creates the axis-aligned box spanning `mins` to `maxs`.
    pub fn cuboid(mins: Point3<f32>, maxs: Point3<f32>) -> Self {
        let (x0, y0, z0) = (mins.x, mins.y, mins.z);
        let (x1, y1, z1) = (maxs.x, maxs.y, maxs.z);
        let face = |corners: [[f32; 3]; 4]| {
            Polygon::from_vertices(corners.iter().map(|c| Point3::new(c[0], c[1], c[2])).collect())
        };

        Self::from_sides(vec![
            // +X
            face([[x1, y0, z0], [x1, y1, z0], [x1, y1, z1], [x1, y0, z1]]),
            // -X
            face([[x0, y0, z0], [x0, y0, z1], [x0, y1, z1], [x0, y1, z0]]),
            // +Y
            face([[x0, y1, z0], [x0, y1, z1], [x1, y1, z1], [x1, y1, z0]]),
            // -Y
            face([[x0, y0, z0], [x1, y0, z0], [x1, y0, z1], [x0, y0, z1]]),
            // +Z
            face([[x0, y0, z1], [x1, y0, z1], [x1, y1, z1], [x0, y1, z1]]),
            // -Z
            face([[x0, y0, z0], [x0, y1, z0], [x1, y1, z0], [x1, y0, z0]]),
        ])
    }

    /// Returns the sides of the volume.
    #[inline]
    pub fn sides(&self) -> &[Polygon] {
        &self.sides
    }

    /// Returns the number of sides.
    #[inline]
    pub fn len(&self) -> usize {
        self.sides.len()
    }

    /// Returns true if the volume has no sides.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sides.is_empty()
    }

    /// Bounds every vertex of every side, or `None` for an empty volume.
    pub fn bounding_box(&self) -> Option<Aabb> {
        Aabb::from_polygons(&self.sides)
    }

    /// Sum of the side areas.
    pub fn surface_area(&self) -> Result<f32, PolygonError> {
        self.sides.iter().map(Polygon::area).sum()
    }

    /// Classifies the whole volume relative to a plane.
    pub fn classify(&self, plane: &Plane3D) -> Classification {
        self.classify_with_epsilon(plane, DEFAULT_EPSILON)
    }

    /// Classifies the whole volume relative to a plane, with a custom epsilon.
    pub fn classify_with_epsilon(&self, plane: &Plane3D, epsilon: f32) -> Classification {
        let vertices = self.sides.iter().flat_map(|side| side.vertices());
        classify_vertices(vertices, plane, epsilon)
    }
}

impl<A: VertexAllocator> PolygonFactory<A> {
    /// Deep-copies every side of a volume.
    pub fn copy_volume(&self, volume: &Volume) -> Result<Volume, PolygonError> {
        self.map_sides(volume, |side| self.copy(side))
    }

    /// Turns a volume inside out by reversing the winding of every side.
    pub fn reverse_volume(&self, volume: &Volume) -> Result<Volume, PolygonError> {
        self.map_sides(volume, |side| self.reverse(side))
    }

    /// Returns the storage of every side to the allocator.
    pub fn release_volume(&self, volume: Volume) {
        self.release_sides(volume.sides);
    }

    fn release_sides(&self, sides: Vec<Polygon>) {
        for side in sides {
            self.release(side);
        }
    }

    /// Builds a new volume side by side. On failure the sides built so far
    /// go back to the allocator.
    fn map_sides<F>(&self, volume: &Volume, mut f: F) -> Result<Volume, PolygonError>
    where
        F: FnMut(&Polygon) -> Result<Polygon, PolygonError>,
    {
        let mut sides = Vec::with_capacity(volume.len());
        for side in volume.sides() {
            match f(side) {
                Ok(side) => sides.push(side),
                Err(err) => {
                    self.release_sides(sides);
                    return Err(err);
                }
            }
        }
        Ok(Volume::from_sides(sides))
    }

    /// Splits a volume with the factory's epsilon.
    pub fn split_volume(
        &self,
        volume: &Volume,
        plane: &Plane3D,
    ) -> Result<SplitResult<Volume>, PolygonError> {
        self.split_volume_with_epsilon(volume, plane, self.epsilon())
    }

    /// Splits a convex volume into the parts in front of and behind `plane`.
    ///
    /// Every side is split; both halves are then closed with a cap polygon
    /// lying on the plane, facing `-normal` on the front half and `+normal`
    /// on the back half. Volumes that do not span the plane are copied whole
    /// to the side they are on, like polygons.
    pub fn split_volume_with_epsilon(
        &self,
        volume: &Volume,
        plane: &Plane3D,
        epsilon: f32,
    ) -> Result<SplitResult<Volume>, PolygonError> {
        let epsilon = validate_epsilon(epsilon)?;

        match volume.classify_with_epsilon(plane, epsilon) {
            Classification::Coplanar => return Ok((None, None)),
            Classification::Front => return Ok((Some(self.copy_volume(volume)?), None)),
            Classification::Back => return Ok((None, Some(self.copy_volume(volume)?))),
            Classification::Spanning => {}
        }

        let mut front_sides = Vec::with_capacity(volume.len() + 1);
        let mut back_sides = Vec::with_capacity(volume.len() + 1);

        if let Err(err) =
            self.fill_volume_halves(volume, plane, epsilon, &mut front_sides, &mut back_sides)
        {
            self.release_sides(front_sides);
            self.release_sides(back_sides);
            return Err(err);
        }

        Ok((
            Some(Volume::from_sides(front_sides)),
            Some(Volume::from_sides(back_sides)),
        ))
    }

    /// Splits every side into `front`/`back` and closes both with a cap.
    /// Whatever was pushed before a failure is left for the caller to release.
    fn fill_volume_halves(
        &self,
        volume: &Volume,
        plane: &Plane3D,
        epsilon: f32,
        front: &mut Vec<Polygon>,
        back: &mut Vec<Polygon>,
    ) -> Result<(), PolygonError> {
        for side in volume.sides() {
            match self.split_with_epsilon(side, plane, epsilon)? {
                (None, None) => {
                    // A side lying in the cut bounds the half its normal points away from.
                    let faces_along = side.normal()?.dot(&plane.normal()) > 0.0;
                    let copy = self.copy(side)?;
                    if faces_along {
                        back.push(copy);
                    } else {
                        front.push(copy);
                    }
                }
                (front_part, back_part) => {
                    front.extend(front_part);
                    back.extend(back_part);
                }
            }
        }

        if let Some(cap) = self.volume_cap(volume, plane, epsilon)? {
            match self.reverse(&cap) {
                Ok(reversed) => {
                    front.push(reversed);
                    back.push(cap);
                }
                Err(err) => {
                    self.release(cap);
                    return Err(err);
                }
            }
        }

        Ok(())
    }

    /// Cross-section of `volume` on `plane`, wound along the plane normal.
    fn volume_cap(
        &self,
        volume: &Volume,
        plane: &Plane3D,
        epsilon: f32,
    ) -> Result<Option<Polygon>, PolygonError> {
        let Some(bounds) = volume.bounding_box() else {
            return Ok(None);
        };
        // Half-width that covers every point of the volume projected on the plane.
        let reach = bounds.mins.coords.abs().sup(&bounds.maxs.coords.abs()).norm() + 1.0;
        let mut cap = self.from_plane(plane, reach)?;

        for side in volume.sides() {
            let clipped = side
                .plane()
                .and_then(|side_plane| self.clip_with_epsilon(&cap, &side_plane.flipped(), epsilon));
            let clipped = match clipped {
                Ok(clipped) => clipped,
                Err(err) => {
                    self.release(cap);
                    return Err(err);
                }
            };
            self.release(std::mem::replace(&mut cap, clipped));

            if !cap.is_valid() {
                log::debug!("cut plane misses the volume interior, no cap");
                self.release(cap);
                return Ok(None);
            }
        }

        Ok(Some(cap))
    }
}

impl Cuttable for Volume {
    fn cut_with_epsilon(
        &self,
        plane: &Plane3D,
        epsilon: f32,
    ) -> Result<SplitResult<Self>, PolygonError> {
        PolygonFactory::default().split_volume_with_epsilon(self, plane, epsilon)
    }
}
