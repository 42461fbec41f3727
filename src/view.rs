//! Visibility culling boundary
//!
//! Mirrors the classic frustum-plane test: the view volume is six planes
//! whose normals point inward, and a box is visible unless it sits fully
//! behind one of them. The simulation is 2D but the volume stays 3D so a
//! host renderer's camera planes drop in unchanged.

use glam::{Vec2, Vec3};

/// One clip plane; points with `normal . p + distance >= 0` are inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    #[inline]
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        self.normal.dot(p) + self.distance
    }
}

/// Axis-aligned box as center + half extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub center: Vec3,
    pub extents: Vec3,
}

impl Bounds {
    /// Cube around a 2D position, sized by the render scale.
    pub fn cube(position: Vec2, scale: f32) -> Self {
        Self {
            center: position.extend(0.0),
            extents: Vec3::splat(scale * 0.5),
        }
    }
}

/// Plane/AABB intersection over all six planes: the box is rejected when it
/// lies entirely on the negative side of any plane.
pub fn intersects(bounds: &Bounds, planes: &[Plane; 6]) -> bool {
    for plane in planes {
        let reach = bounds.extents.dot(plane.normal.abs());
        if plane.signed_distance(bounds.center) < -reach {
            return false;
        }
    }
    true
}

/// A view volume the integrator can cull against.
pub trait ViewVolume {
    fn frustum_planes(&self) -> [Plane; 6];
}

/// Orthographic reference volume: an axis-aligned rect around `center` with
/// a symmetric depth range.
#[derive(Debug, Clone, Copy)]
pub struct OrthoView {
    pub center: Vec2,
    pub half_extents: Vec2,
    pub depth: f32,
}

impl OrthoView {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
            depth: 1000.0,
        }
    }
}

impl ViewVolume for OrthoView {
    fn frustum_planes(&self) -> [Plane; 6] {
        let min = self.center - self.half_extents;
        let max = self.center + self.half_extents;
        [
            Plane::new(Vec3::X, -min.x),
            Plane::new(Vec3::NEG_X, max.x),
            Plane::new(Vec3::Y, -min.y),
            Plane::new(Vec3::NEG_Y, max.y),
            Plane::new(Vec3::Z, self.depth),
            Plane::new(Vec3::NEG_Z, self.depth),
        ]
    }
}
