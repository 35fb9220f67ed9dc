//! Axis-aligned bounding box

use glam::Vec3;

/// Axis-aligned bounding box over positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Inverted box that any point or box joins into
    pub const EMPTY: Self = Self {
        min: Vec3::MAX,
        max: Vec3::MIN,
    };

    /// Degenerate box around a single point
    pub const fn from_point(point: Vec3) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    /// Grow to include `other`
    pub fn join(&mut self, other: &Aabb) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Grow to include `point`
    pub fn extend(&mut self, point: Vec3) {
        self.join(&Self::from_point(point));
    }

    pub fn extended(mut self, point: Vec3) -> Self {
        self.extend(point);
        self
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_and_center() {
        let mut bounds = Aabb::from_point(Vec3::new(-1.0, 0.0, 2.0));
        bounds.join(&Aabb::from_point(Vec3::new(3.0, 4.0, -2.0)));

        assert_eq!(bounds.min, Vec3::new(-1.0, 0.0, -2.0));
        assert_eq!(bounds.max, Vec3::new(3.0, 4.0, 2.0));
        assert_eq!(bounds.center(), Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(bounds.size(), Vec3::new(4.0, 4.0, 4.0));
    }

    #[test]
    fn test_empty_box() {
        let mut bounds = Aabb::default();
        assert!(bounds.is_empty());

        bounds.extend(Vec3::ONE);
        assert!(!bounds.is_empty());
        assert_eq!(bounds, Aabb::from_point(Vec3::ONE));
    }
}
