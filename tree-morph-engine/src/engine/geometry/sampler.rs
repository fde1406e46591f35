use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use constants::scene::{
    GROUND_HEIGHT, RIBBON_ANCHOR, RIBBON_HEIGHT_SPAN, RIBBON_RADIUS, RIBBON_TAPER, RIBBON_TURNS,
    TREE_HEIGHT, TREE_RADIUS, TREE_SPIRAL_JITTER, TREE_SPIRAL_TURNS,
};

/// Cone the tree formation occupies, base on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConeShape {
    pub height: f32,
    pub radius: f32,
    /// Full turns of the particle spiral from base to apex.
    pub turns: f32,
    /// Upper bound of the random angular offset added to each spiral sample.
    pub jitter: f32,
}

impl Default for ConeShape {
    fn default() -> Self {
        Self {
            height: TREE_HEIGHT,
            radius: TREE_RADIUS,
            turns: TREE_SPIRAL_TURNS,
            jitter: TREE_SPIRAL_JITTER,
        }
    }
}

impl ConeShape {
    /// Radius of the cone's cross-section at `height`.
    pub fn radius_at(&self, height: f32) -> f32 {
        if self.height <= 0.0 {
            return 0.0;
        }
        (1.0 - height / self.height).clamp(0.0, 1.0) * self.radius
    }
}

/// Helix the photo gallery is laid out on in the scattered formation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RibbonShape {
    #[serde(skip, default = "default_ribbon_anchor")]
    pub anchor: Vec3,
    pub radius: f32,
    /// Fraction of `radius` lost between the first and the last slot.
    pub taper: f32,
    pub turns: f32,
    pub height_span: f32,
}

fn default_ribbon_anchor() -> Vec3 {
    RIBBON_ANCHOR
}

impl Default for RibbonShape {
    fn default() -> Self {
        Self {
            anchor: RIBBON_ANCHOR,
            radius: RIBBON_RADIUS,
            taper: RIBBON_TAPER,
            turns: RIBBON_TURNS,
            height_span: RIBBON_HEIGHT_SPAN,
        }
    }
}

/// Point distributed uniformly through the volume of a sphere centred on the origin.
pub fn uniform_point_in_sphere<R: Rng>(rng: &mut R, radius: f32) -> Vec3 {
    let u: f32 = rng.random();
    let v: f32 = rng.random();
    let theta = TAU * u;
    let phi = (2.0 * v - 1.0).clamp(-1.0, 1.0).acos();
    // cbrt makes the shell density proportional to r^2, i.e. uniform in volume.
    let r = radius * rng.random::<f32>().cbrt();

    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

/// Point inside the cone on a helical path that winds `turns` times from base
/// to apex. Density grows toward the apex as the cross-section shrinks.
pub fn cone_spiral_point<R: Rng>(rng: &mut R, cone: &ConeShape) -> Vec3 {
    let t: f32 = rng.random();
    let height = t * cone.height;
    let radius = (1.0 - t) * cone.radius * rng.random::<f32>().sqrt();
    let angle = t * TAU * cone.turns + rng.random::<f32>() * cone.jitter;

    Vec3::new(radius * angle.cos(), height, radius * angle.sin())
}

/// Point on the cone's outer surface at a uniformly random height and angle.
pub fn cone_surface_point<R: Rng>(rng: &mut R, cone: &ConeShape) -> Vec3 {
    let t: f32 = rng.random();
    let radius = (1.0 - t) * cone.radius;
    let angle = rng.random::<f32>() * TAU;

    Vec3::new(radius * angle.cos(), t * cone.height, radius * angle.sin())
}

/// Slot `index` of `total` along the gallery helix. Height rises linearly with
/// the index while the radius tapers. `total == 0` yields the anchor.
pub fn ribbon_point(index: usize, total: usize, ribbon: &RibbonShape) -> Vec3 {
    if total == 0 {
        return ribbon.anchor;
    }

    ribbon_point_at(index.min(total) as f32 / total as f32, ribbon)
}

/// Point at fraction `t` of the gallery helix, `0` being the first slot.
pub fn ribbon_point_at(t: f32, ribbon: &RibbonShape) -> Vec3 {
    let angle = t * TAU * ribbon.turns;
    let radius = ribbon.radius * (1.0 - ribbon.taper * t);
    let height = (t - 0.5) * ribbon.height_span;

    ribbon.anchor + Vec3::new(radius * angle.cos(), height, radius * angle.sin())
}

/// Point on the ground inside the ring `[inner_radius, inner_radius + width]`.
pub fn ground_scatter_point<R: Rng>(rng: &mut R, inner_radius: f32, width: f32) -> Vec3 {
    let angle = rng.random::<f32>() * TAU;
    let r = inner_radius + rng.random::<f32>() * width.max(0.0);

    Vec3::new(angle.cos() * r, GROUND_HEIGHT, angle.sin() * r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn rng() -> Pcg64Mcg {
        Pcg64Mcg::seed_from_u64(7)
    }

    #[test]
    fn sphere_samples_stay_inside_radius() {
        let mut rng = rng();
        for _ in 0..5_000 {
            let p = uniform_point_in_sphere(&mut rng, 15.0);
            assert!(p.length() <= 15.0 + 1e-4, "{p:?} escaped the sphere");
        }
    }

    #[test]
    fn sphere_is_volume_uniform() {
        let mut rng = rng();
        let samples = 200_000;
        let inner = (0..samples)
            .filter(|_| uniform_point_in_sphere(&mut rng, 10.0).length() <= 5.0)
            .count();
        let fraction = inner as f64 / samples as f64;
        assert!(
            (fraction - 0.125).abs() < 0.006,
            "inner half-radius fraction {fraction} should approach 1/8"
        );
    }

    #[test]
    fn spiral_points_stay_inside_the_cone() {
        let mut rng = rng();
        let cone = ConeShape::default();
        for _ in 0..20_000 {
            let p = cone_spiral_point(&mut rng, &cone);
            assert!(p.y >= 0.0 && p.y <= cone.height);
            let planar = Vec2::new(p.x, p.z).length();
            let bound = (1.0 - p.y / cone.height) * cone.radius;
            assert!(planar <= bound + 1e-4, "planar {planar} exceeds {bound} at y {}", p.y);
        }
    }

    #[test]
    fn surface_points_sit_on_the_cone() {
        let mut rng = rng();
        let cone = ConeShape::default();
        for _ in 0..1_000 {
            let p = cone_surface_point(&mut rng, &cone);
            let planar = Vec2::new(p.x, p.z).length();
            assert!((planar - cone.radius_at(p.y)).abs() < 1e-3);
        }
    }

    #[test]
    fn ribbon_is_deterministic_and_rising() {
        let ribbon = RibbonShape::default();
        let a = ribbon_point(3, 10, &ribbon);
        let b = ribbon_point(3, 10, &ribbon);
        assert_eq!(a, b);

        let heights: Vec<f32> = (0..10).map(|i| ribbon_point(i, 10, &ribbon).y).collect();
        assert!(heights.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn empty_ribbon_returns_anchor() {
        let ribbon = RibbonShape::default();
        let p = ribbon_point(0, 0, &ribbon);
        assert!(p.is_finite());
        assert_eq!(p, ribbon.anchor);
    }

    #[test]
    fn ground_points_fall_in_the_ring() {
        let mut rng = rng();
        for _ in 0..2_000 {
            let p = ground_scatter_point(&mut rng, 5.0, 15.0);
            let r = Vec2::new(p.x, p.z).length();
            assert!((5.0 - 1e-4..=20.0 + 1e-4).contains(&r));
            assert_eq!(p.y, GROUND_HEIGHT);
        }
    }
}
