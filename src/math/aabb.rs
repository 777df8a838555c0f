use glam::{Mat4, Vec3};

/// Axis-aligned bounding box
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl AABB {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Tightest box around the points; None for an empty slice
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |acc, p| acc.include(p)))
    }

    pub fn include(&self, point: Vec3) -> AABB {
        AABB {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Largest side length
    pub fn max_extent(&self) -> f32 {
        self.size().max_element()
    }

    /// Bounds of this box after an affine transform (all eight corners)
    pub fn transformed(&self, transform: &Mat4) -> AABB {
        let (lo, hi) = (self.min, self.max);
        let corners = [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ];
        let moved = corners.map(|c| transform.transform_point3(c));
        let first = moved[0];
        moved[1..]
            .iter()
            .fold(AABB::new(first, first), |acc, &p| acc.include(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let aabb = AABB::from_points([
            Vec3::new(-1.0, -2.0, -3.0),
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::ZERO,
        ])
        .unwrap();
        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 2.0, 3.0));
        assert!(AABB::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_max_extent() {
        let aabb = AABB::new(Vec3::ZERO, Vec3::new(2.0, 5.0, 1.0));
        assert_eq!(aabb.max_extent(), 5.0);
        assert_eq!(aabb.center(), Vec3::new(1.0, 2.5, 0.5));
    }

    #[test]
    fn test_include_inside_point_is_noop() {
        let outer = AABB::new(Vec3::ZERO, Vec3::splat(5.0));
        assert_eq!(outer.include(Vec3::ONE), outer);
    }

    #[test]
    fn test_transformed_by_scale_and_translation() {
        let aabb = AABB::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let m = Mat4::from_translation(Vec3::new(0.0, 3.0, 0.0)) * Mat4::from_scale(Vec3::splat(2.0));
        let moved = aabb.transformed(&m);
        assert_eq!(moved.min, Vec3::new(-2.0, 1.0, -2.0));
        assert_eq!(moved.max, Vec3::new(2.0, 5.0, 2.0));
    }
}
