//! Swept collision boundary
//!
//! The core never intersects geometry itself: every projectile issues one
//! swept query per step through [`CollisionQuery`], and the host supplies
//! whatever broadphase it has. [`SdfWorld`] is a reference backend built on
//! signed distance fields and sphere tracing, used by the demo driver and
//! the physics tests.

use glam::Vec2;

/// First contact along a swept path.
///
/// `point` is the projectile center at the moment of contact; `fraction` is
/// how much of the requested distance was consumed before it, in [0, 1].
/// A hit reported at `fraction == 0.0` means the origin already overlaps the
/// surface; the integrator treats that as a miss so a projectile spawned
/// adjacent to a wall survives its first step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepHit {
    pub point: Vec2,
    pub normal: Vec2,
    pub fraction: f32,
}

/// One swept query: from `origin` along `delta`, as a thin ray
/// (`radius = None`) or a circle of the given radius, limited to `distance`.
pub trait CollisionQuery {
    fn sweep(
        &self,
        origin: Vec2,
        radius: Option<f32>,
        delta: Vec2,
        distance: f32,
    ) -> Option<SweepHit>;
}

/// Reflect velocity off a surface with given normal.
///
/// Standard reflection: v' = v - 2(v.n)n
#[inline]
pub fn reflect(vel: Vec2, normal: Vec2) -> Vec2 {
    vel - 2.0 * vel.dot(normal) * normal
}

/// Static collision shapes expressed as signed distance functions.
#[derive(Debug, Clone, Copy)]
pub enum SdfShape {
    /// Solid half-space: points with `normal . p < offset` are inside.
    HalfPlane { normal: Vec2, offset: f32 },
    Circle { center: Vec2, radius: f32 },
    /// Line segment inflated to a capsule of the given thickness.
    Segment { a: Vec2, b: Vec2, thickness: f32 },
}

impl SdfShape {
    fn distance(&self, p: Vec2) -> f32 {
        match *self {
            SdfShape::HalfPlane { normal, offset } => normal.dot(p) - offset,
            SdfShape::Circle { center, radius } => (p - center).length() - radius,
            SdfShape::Segment { a, b, thickness } => {
                let ab = b - a;
                let len_sq = ab.length_squared();
                let t = if len_sq > 0.0 {
                    ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                (p - (a + ab * t)).length() - thickness * 0.5
            }
        }
    }
}

const MAX_MARCH_STEPS: usize = 64;
const MIN_MARCH_STEP: f32 = 1e-4;

/// Reference [`CollisionQuery`] backend: a set of static SDF shapes swept by
/// sphere tracing.
#[derive(Debug, Clone, Default)]
pub struct SdfWorld {
    shapes: Vec<SdfShape>,
}

impl SdfWorld {
    pub fn new(shapes: Vec<SdfShape>) -> Self {
        Self { shapes }
    }

    pub fn push(&mut self, shape: SdfShape) {
        self.shapes.push(shape);
    }

    fn distance(&self, p: Vec2) -> f32 {
        self.shapes
            .iter()
            .map(|s| s.distance(p))
            .fold(f32::MAX, f32::min)
    }

    /// Surface normal via central differences of the distance field.
    fn gradient(&self, p: Vec2) -> Vec2 {
        let eps = 1e-3;
        let dx = self.distance(p + Vec2::new(eps, 0.0)) - self.distance(p - Vec2::new(eps, 0.0));
        let dy = self.distance(p + Vec2::new(0.0, eps)) - self.distance(p - Vec2::new(0.0, eps));
        Vec2::new(dx, dy).normalize_or_zero()
    }
}

impl CollisionQuery for SdfWorld {
    fn sweep(
        &self,
        origin: Vec2,
        radius: Option<f32>,
        delta: Vec2,
        distance: f32,
    ) -> Option<SweepHit> {
        if self.shapes.is_empty() || distance <= 0.0 {
            return None;
        }
        let dir = delta.normalize_or_zero();
        if dir == Vec2::ZERO {
            return None;
        }
        let cast_radius = radius.unwrap_or(0.0);

        let mut t = 0.0;
        for _ in 0..MAX_MARCH_STEPS {
            let p = origin + dir * t;
            let d = self.distance(p);

            if d < cast_radius + MIN_MARCH_STEP {
                return Some(SweepHit {
                    point: p,
                    normal: self.gradient(p),
                    fraction: t / distance,
                });
            }

            // Sphere tracing: the surface is at least `d - cast_radius` away.
            t += (d - cast_radius).max(MIN_MARCH_STEP);
            if t >= distance {
                break;
            }
        }
        None
    }
}
