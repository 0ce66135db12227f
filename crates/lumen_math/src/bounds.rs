use glam::IVec2;

/// Integer 2-D point (pixel coordinates).
pub type Point2i = IVec2;

/// Half-open integer rectangle `[p_min, p_max)`, used to describe pixel
/// regions handed out by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bounds2i {
    pub p_min: Point2i,
    pub p_max: Point2i,
}

impl Bounds2i {
    pub fn new(p_min: Point2i, p_max: Point2i) -> Self {
        Self { p_min, p_max }
    }

    /// Bounds covering a `width x height` image starting at the origin.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(Point2i::ZERO, Point2i::new(width as i32, height as i32))
    }

    pub fn is_empty(&self) -> bool {
        self.p_min.x >= self.p_max.x || self.p_min.y >= self.p_max.y
    }

    /// Extent along each axis. Negative components for inverted bounds.
    pub fn diagonal(&self) -> IVec2 {
        self.p_max - self.p_min
    }

    /// Number of points covered.
    pub fn area(&self) -> u64 {
        if self.is_empty() {
            return 0;
        }
        let d = self.diagonal();
        d.x as u64 * d.y as u64
    }

    pub fn contains(&self, p: Point2i) -> bool {
        p.x >= self.p_min.x && p.x < self.p_max.x && p.y >= self.p_min.y && p.y < self.p_max.y
    }

    /// Overlap of two bounds. Empty when they are disjoint.
    pub fn intersect(&self, other: &Bounds2i) -> Bounds2i {
        Bounds2i::new(self.p_min.max(other.p_min), self.p_max.min(other.p_max))
    }

    /// Iterate the covered points in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Point2i> {
        let b = *self;
        let (xs, ys) = if b.is_empty() {
            (0..0, 0..0)
        } else {
            (b.p_min.x..b.p_max.x, b.p_min.y..b.p_max.y)
        };
        ys.flat_map(move |y| xs.clone().map(move |x| Point2i::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_area_and_empty() {
        let b = Bounds2i::from_size(4, 3);
        assert_eq!(b.area(), 12);
        assert!(!b.is_empty());

        let empty = Bounds2i::new(Point2i::new(2, 2), Point2i::new(2, 5));
        assert!(empty.is_empty());
        assert_eq!(empty.area(), 0);
        assert_eq!(empty.iter().count(), 0);
    }

    #[test]
    fn test_bounds_intersect() {
        let a = Bounds2i::from_size(10, 10);
        let b = Bounds2i::new(Point2i::new(8, 6), Point2i::new(16, 16));

        assert_eq!(a.intersect(&b), Bounds2i::new(Point2i::new(8, 6), Point2i::new(10, 10)));

        let far = Bounds2i::new(Point2i::new(20, 20), Point2i::new(30, 30));
        assert!(a.intersect(&far).is_empty());
    }

    #[test]
    fn test_bounds_iter_row_major() {
        let b = Bounds2i::new(Point2i::new(1, 1), Point2i::new(3, 3));
        let points: Vec<_> = b.iter().collect();

        assert_eq!(
            points,
            vec![
                Point2i::new(1, 1),
                Point2i::new(2, 1),
                Point2i::new(1, 2),
                Point2i::new(2, 2),
            ]
        );
        assert!(points.iter().all(|p| b.contains(*p)));
    }
}
