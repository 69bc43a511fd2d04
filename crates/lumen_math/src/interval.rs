/// A closed range `[min, max]` of ray parameters or box coordinates.
///
/// Empty when `min > max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Length of the range, negative when empty.
    pub fn size(&self) -> f64 {
        self.max - self.min
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Inclusive at both ends.
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// The overlap of two ranges; empty when they are disjoint.
    pub fn intersect(&self, other: &Interval) -> Interval {
        Interval::new(self.min.max(other.min), self.max.min(other.max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        let slab = Interval::new(-1.0, 1.0);
        assert_eq!(slab.size(), 2.0);
        assert!(slab.contains(-1.0) && slab.contains(1.0) && slab.contains(0.0));
        assert!(!slab.contains(1.000001));
    }

    #[test]
    fn test_overlap() {
        let ray_t = Interval::new(0.0, f64::INFINITY);
        assert_eq!(ray_t.intersect(&Interval::new(-3.0, 4.0)), Interval::new(0.0, 4.0));

        let behind = Interval::new(-5.0, -2.0);
        assert!(ray_t.intersect(&behind).is_empty());
        assert!(behind.intersect(&ray_t).is_empty());
    }

    #[test]
    fn test_degenerate_interval_is_not_empty() {
        let point = Interval::new(2.0, 2.0);
        assert!(!point.is_empty());
        assert_eq!(point.size(), 0.0);
        assert!(point.contains(2.0));
    }
}
