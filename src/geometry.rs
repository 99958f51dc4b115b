use std::f64::consts::FRAC_1_SQRT_2;

/// A location in the tree's 2D space.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Width and height of a rectangle.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

impl Extent {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// One of the four children of an internal node, in storage order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    NorthWest = 0,
    NorthEast = 1,
    SouthWest = 2,
    SouthEast = 3,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthWest,
        Quadrant::NorthEast,
        Quadrant::SouthWest,
        Quadrant::SouthEast,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    fn is_east(self) -> bool {
        matches!(self, Quadrant::NorthEast | Quadrant::SouthEast)
    }

    fn is_south(self) -> bool {
        matches!(self, Quadrant::SouthWest | Quadrant::SouthEast)
    }
}

/// Axis-aligned rectangle, half-open on both axes.
///
/// A point on the west or north edge is inside, a point on the east or south
/// edge is not. The corners are stored rather than recomputed from a size, so
/// a child built by [`quadrant`](Self::quadrant) shares its edges bit for bit
/// with its parent and siblings, and adjacent quadrants never both claim (or
/// both miss) a point.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub fn new(origin: Point, size: Extent) -> Self {
        Self {
            min: origin,
            max: Point::new(origin.x + size.width, origin.y + size.height),
        }
    }

    pub const fn from_corners(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    pub fn origin(&self) -> Point {
        self.min
    }

    pub fn size(&self) -> Extent {
        Extent::new(self.max.x - self.min.x, self.max.y - self.min.y)
    }

    pub fn mid(&self) -> Point {
        Point {
            x: self.min.x + (self.max.x - self.min.x) / 2.0,
            y: self.min.y + (self.max.y - self.min.y) / 2.0,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min.x && point.x < self.max.x && point.y >= self.min.y && point.y < self.max.y
    }

    /// Which quadrant of this rect `point` falls in. The x axis alone decides
    /// west/east and the y axis alone decides north/south.
    pub fn quadrant_of(&self, point: Point) -> Quadrant {
        let mid = self.mid();
        match (point.x >= mid.x, point.y >= mid.y) {
            (false, false) => Quadrant::NorthWest,
            (true, false) => Quadrant::NorthEast,
            (false, true) => Quadrant::SouthWest,
            (true, true) => Quadrant::SouthEast,
        }
    }

    /// The child rect for `quadrant`. Its edges are this rect's own min, mid
    /// and max values, the same ones `quadrant_of` compares against.
    pub fn quadrant(&self, quadrant: Quadrant) -> Rect {
        let mid = self.mid();
        let (min_x, max_x) = if quadrant.is_east() {
            (mid.x, self.max.x)
        } else {
            (self.min.x, mid.x)
        };
        let (min_y, max_y) = if quadrant.is_south() {
            (mid.y, self.max.y)
        } else {
            (self.min.y, mid.y)
        };
        Rect::from_corners(Point::new(min_x, min_y), Point::new(max_x, max_y))
    }

    /// True when all eight compass samples of the circle lie inside.
    pub fn encloses_circle(&self, center: Point, radius: f64) -> bool {
        circle_samples(center, radius)
            .iter()
            .all(|sample| self.contains(*sample))
    }

    /// Whether any part of the circle can reach into this rect.
    pub fn intersects_circle(&self, center: Point, radius: f64) -> bool {
        let dx = center.x - center.x.clamp(self.min.x, self.max.x);
        let dy = center.y - center.y.clamp(self.min.y, self.max.y);
        dx * dx + dy * dy <= radius * radius
    }
}

/// N, NE, E, SE, S, SW, W, NW points on the circle's boundary.
fn circle_samples(center: Point, radius: f64) -> [Point; 8] {
    let diagonal = radius * FRAC_1_SQRT_2;
    let Point { x, y } = center;
    [
        Point::new(x, y - radius),
        Point::new(x + diagonal, y - diagonal),
        Point::new(x + radius, y),
        Point::new(x + diagonal, y + diagonal),
        Point::new(x, y + radius),
        Point::new(x - diagonal, y + diagonal),
        Point::new(x - radius, y),
        Point::new(x - diagonal, y - diagonal),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(Point::new(x, y), Extent::new(w, h))
    }

    #[test]
    fn contains_is_half_open() {
        let r = rect(0.0, 0.0, 16.0, 9.0);
        assert!(r.contains(Point::new(0.0, 0.0)));
        assert!(r.contains(Point::new(15.9, 8.9)));
        assert!(!r.contains(Point::new(16.0, 4.0)));
        assert!(!r.contains(Point::new(4.0, 9.0)));
        assert!(!r.contains(Point::new(-0.1, 4.0)));
        assert!(!r.contains(Point::new(f64::NAN, 4.0)));
    }

    #[test]
    fn quadrant_of_tests_each_axis_independently() {
        // Wide rect so that the x and y midpoints differ.
        let r = rect(0.0, 0.0, 64.0, 36.0);
        assert_eq!(r.quadrant_of(Point::new(20.0, 1.0)), Quadrant::NorthWest);
        assert_eq!(r.quadrant_of(Point::new(20.0, 30.0)), Quadrant::SouthWest);
        assert_eq!(r.quadrant_of(Point::new(40.0, 1.0)), Quadrant::NorthEast);
        assert_eq!(r.quadrant_of(Point::new(40.0, 30.0)), Quadrant::SouthEast);
        // x between the two midpoints must not influence north/south.
        assert_eq!(r.quadrant_of(Point::new(25.0, 17.0)), Quadrant::NorthWest);
        assert_eq!(r.quadrant_of(Point::new(25.0, 18.0)), Quadrant::SouthWest);
    }

    #[test]
    fn points_on_partition_lines_go_east_and_south() {
        let r = rect(0.0, 0.0, 64.0, 36.0);
        assert_eq!(r.quadrant_of(Point::new(32.0, 0.0)), Quadrant::NorthEast);
        assert_eq!(r.quadrant_of(Point::new(0.0, 18.0)), Quadrant::SouthWest);
        assert_eq!(r.quadrant_of(Point::new(32.0, 18.0)), Quadrant::SouthEast);
    }

    #[test]
    fn quadrants_tile_the_parent() {
        let r = rect(8.0, 4.0, 64.0, 36.0);
        let parts: Vec<Rect> = Quadrant::ALL.iter().map(|q| r.quadrant(*q)).collect();

        for part in &parts {
            assert_eq!(part.size(), Extent::new(32.0, 18.0));
        }
        assert_eq!(parts[0].origin(), Point::new(8.0, 4.0));
        assert_eq!(parts[1].origin(), Point::new(40.0, 4.0));
        assert_eq!(parts[2].origin(), Point::new(8.0, 22.0));
        assert_eq!(parts[3].origin(), Point::new(40.0, 22.0));

        let area: f64 = parts.iter().map(|p| p.size().area()).sum();
        assert_eq!(area, r.size().area());

        // Every sampled point of the parent lands in exactly one child, the
        // one quadrant_of names.
        for i in 0..64 {
            for j in 0..36 {
                let p = Point::new(8.0 + i as f64, 4.0 + j as f64);
                let owners: Vec<_> = Quadrant::ALL
                    .iter()
                    .filter(|q| parts[q.index()].contains(p))
                    .collect();
                assert_eq!(owners, vec![&r.quadrant_of(p)]);
            }
        }
    }

    fn next_down(value: f64) -> f64 {
        debug_assert!(value > 0.0);
        f64::from_bits(value.to_bits() - 1)
    }

    #[test]
    fn quadrants_share_edges_for_fractional_sizes() {
        for (w, h) in [(0.1, 0.3), (0.7, 1.0 / 3.0), (1.0 / 3.0, 0.1)] {
            let mut pending = vec![(rect(0.0, 0.0, w * 64.0, h * 64.0), 0)];
            while let Some((r, depth)) = pending.pop() {
                let mid = r.mid();
                let parts: Vec<Rect> = Quadrant::ALL.iter().map(|q| r.quadrant(*q)).collect();
                assert_eq!(parts[0].max, mid);
                assert_eq!(parts[3].min, mid);
                assert_eq!(parts[1].min.x, parts[0].max.x);
                assert_eq!(parts[1].max.x, r.max.x);
                assert_eq!(parts[2].min.y, parts[0].max.y);
                assert_eq!(parts[2].max.y, r.max.y);

                // Points just inside each edge must land in a child that
                // contains them.
                for x in [r.min.x, next_down(mid.x), mid.x, next_down(r.max.x)] {
                    for y in [r.min.y, next_down(mid.y), mid.y, next_down(r.max.y)] {
                        let p = Point::new(x, y);
                        assert!(r.contains(p));
                        assert!(parts[r.quadrant_of(p).index()].contains(p), "{:?} in {:?}", p, r);
                    }
                }

                if depth < 6 {
                    pending.extend(parts.into_iter().map(|part| (part, depth + 1)));
                }
            }
        }
    }

    #[test]
    fn circle_enclosure_uses_compass_samples() {
        let r = rect(0.0, 0.0, 16.0, 9.0);
        assert!(r.encloses_circle(Point::new(8.0, 4.5), 4.0));
        assert!(!r.encloses_circle(Point::new(8.0, 4.5), 4.5));
        assert!(!r.encloses_circle(Point::new(1.0, 4.5), 2.0));
    }

    #[test]
    fn circle_intersection() {
        let r = rect(10.0, 10.0, 10.0, 10.0);
        assert!(r.intersects_circle(Point::new(15.0, 15.0), 1.0));
        assert!(r.intersects_circle(Point::new(5.0, 15.0), 5.0));
        assert!(!r.intersects_circle(Point::new(5.0, 15.0), 4.9));
        // Corner gap: the bounding boxes overlap but the circle misses.
        assert!(!r.intersects_circle(Point::new(7.0, 7.0), 4.0));
    }
}
