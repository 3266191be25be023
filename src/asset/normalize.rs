//! Bounding-volume normalization
//!
//! Arbitrary assets arrive at arbitrary scales and offsets. Normalization
//! computes a single translate-then-scale transform from the rest-pose
//! bounding box so that every model presents the same way: bounds center
//! at the origin, largest dimension mapped to the configured target size.

use cgmath::{Matrix4, Rad, Vector3};

use crate::error::VitrineError;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vector3<f32>,
    /// Maximum corner of the bounding box
    pub max: Vector3<f32>,
}

impl Aabb {
    /// Create a new AABB
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// An empty AABB that any included point will replace
    pub fn empty() -> Self {
        Self {
            min: Vector3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Vector3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    /// True if no point has been included yet
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Grow the box to include a point
    pub fn include(&mut self, v: Vector3<f32>) {
        self.min.x = self.min.x.min(v.x);
        self.min.y = self.min.y.min(v.y);
        self.min.z = self.min.z.min(v.z);
        self.max.x = self.max.x.max(v.x);
        self.max.y = self.max.y.max(v.y);
        self.max.z = self.max.z.max(v.z);
    }

    /// Create AABB from a set of vertices
    pub fn from_vertices(vertices: &[[f32; 3]]) -> Self {
        let mut aabb = Self::empty();
        for vertex in vertices {
            aabb.include(Vector3::new(vertex[0], vertex[1], vertex[2]));
        }
        aabb
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// Largest extent across the three axes
    pub fn max_dimension(&self) -> f32 {
        let size = self.size();
        size.x.max(size.y).max(size.z)
    }

    pub fn corners(&self) -> [Vector3<f32>; 8] {
        [
            Vector3::new(self.min.x, self.min.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.min.z),
            Vector3::new(self.min.x, self.max.y, self.min.z),
            Vector3::new(self.max.x, self.max.y, self.min.z),
            Vector3::new(self.min.x, self.min.y, self.max.z),
            Vector3::new(self.max.x, self.min.y, self.max.z),
            Vector3::new(self.min.x, self.max.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.max.z),
        ]
    }
}

/// The derived placement transform for one asset: computed once from the
/// rest-pose bounds, constant for the asset's life.
#[derive(Debug, Clone, Copy)]
pub struct NormalizedTransform {
    /// Translation that moves the bounds center to the origin
    pub translation: Vector3<f32>,
    /// Uniform scale mapping the largest dimension to the target size
    pub scale: f32,
    /// Fixed presentation tilt from the camera profile
    pub tilt: Rad<f32>,
}

impl NormalizedTransform {
    /// Derives the transform from an asset's bounding box.
    ///
    /// Fails with [`VitrineError::DegenerateAsset`] when the box has zero
    /// extent in every axis (a single point or an empty model), since no
    /// finite scale exists. The guard runs before the division so no
    /// NaN/Infinity transform can escape.
    pub fn from_bounds(
        bounds: &Aabb,
        target_size: f32,
        tilt: Rad<f32>,
    ) -> Result<Self, VitrineError> {
        if bounds.is_empty() {
            return Err(VitrineError::DegenerateAsset);
        }

        let max_dim = bounds.max_dimension();
        if max_dim <= 0.0 {
            return Err(VitrineError::DegenerateAsset);
        }

        Ok(Self {
            translation: -bounds.center(),
            scale: target_size / max_dim,
            tilt,
        })
    }

    /// Root matrix for the current frame: translate to center, scale
    /// uniformly, then apply hover spin and the fixed tilt.
    pub fn matrix(&self, spin: Rad<f32>) -> Matrix4<f32> {
        Matrix4::from_angle_x(self.tilt)
            * Matrix4::from_angle_y(spin)
            * Matrix4::from_scale(self.scale)
            * Matrix4::from_translation(self.translation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_aabb_from_vertices() {
        let vertices = vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [-1.0, -1.0, -1.0]];
        let aabb = Aabb::from_vertices(&vertices);

        assert_eq!(aabb.min, Vector3::new(-1.0, -1.0, -1.0));
        assert_eq!(aabb.max, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_centered_box_scale() {
        // Box spanning x [-2,2], y [-1,1], z [-1,1]: max dimension 4
        let bounds = Aabb::new(Vector3::new(-2.0, -1.0, -1.0), Vector3::new(2.0, 1.0, 1.0));
        let nt = NormalizedTransform::from_bounds(&bounds, 3.0, Rad(0.0)).unwrap();

        assert!((nt.scale - 0.75).abs() < EPS);
        assert!(nt.translation.x.abs() < EPS);
        assert!(nt.translation.y.abs() < EPS);
        assert!(nt.translation.z.abs() < EPS);
    }

    #[test]
    fn test_off_center_box_translation() {
        // Center at (5, 0, 0)
        let bounds = Aabb::new(Vector3::new(4.0, -1.0, -1.0), Vector3::new(6.0, 1.0, 1.0));
        let nt = NormalizedTransform::from_bounds(&bounds, 3.0, Rad(0.0)).unwrap();

        assert!((nt.translation.x + 5.0).abs() < EPS);
        assert!(nt.translation.y.abs() < EPS);
        assert!(nt.translation.z.abs() < EPS);
    }

    #[test]
    fn test_normalization_invariant_holds() {
        let bounds = Aabb::new(
            Vector3::new(10.0, -3.0, 2.0),
            Vector3::new(30.0, 5.0, 14.0),
        );
        let target = 1.5;
        let nt = NormalizedTransform::from_bounds(&bounds, target, Rad(0.0)).unwrap();
        let m = nt.matrix(Rad(0.0));

        // Bounds center maps to the origin
        let center = m * bounds.center().extend(1.0);
        assert!(center.x.abs() < EPS);
        assert!(center.y.abs() < EPS);
        assert!(center.z.abs() < EPS);

        // Largest dimension maps to the target size
        assert!((bounds.max_dimension() * nt.scale - target).abs() < EPS);
    }

    #[test]
    fn test_degenerate_bounds_rejected() {
        let point = Aabb::new(Vector3::new(1.0, 1.0, 1.0), Vector3::new(1.0, 1.0, 1.0));
        let result = NormalizedTransform::from_bounds(&point, 1.5, Rad(0.0));
        assert!(matches!(result, Err(VitrineError::DegenerateAsset)));

        let empty = Aabb::empty();
        let result = NormalizedTransform::from_bounds(&empty, 1.5, Rad(0.0));
        assert!(matches!(result, Err(VitrineError::DegenerateAsset)));

        // The guard must fire before any division: no NaN leaks
        assert!(result.is_err());
    }

    #[test]
    fn test_spin_rotates_about_origin() {
        let bounds = Aabb::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));
        let nt = NormalizedTransform::from_bounds(&bounds, 2.0, Rad(0.0)).unwrap();

        // A centered model's center stays pinned under spin
        let m = nt.matrix(Rad(std::f32::consts::FRAC_PI_2));
        let center = m * bounds.center().extend(1.0);
        assert!(center.x.abs() < EPS);
        assert!(center.y.abs() < EPS);
        assert!(center.z.abs() < EPS);
    }
}
