use core::fmt;
use std::ops::Add;

/// A position on a [CellGrid](crate::CellGrid). `x` is the column and `y` the
/// row; `y` grows downward so that coordinates match text-input order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Point {
        Point { x, y }
    }
    pub fn manhattan_distance(&self, other: &Point) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
    pub fn scaled(&self, factor: i32) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }
    /// The 4 orthogonally adjacent points at `step` distance, unfiltered.
    pub fn neumann_neighborhood(&self, step: i32) -> Vec<Point> {
        vec![
            Point::new(self.x + step, self.y),
            Point::new(self.x - step, self.y),
            Point::new(self.x, self.y + step),
            Point::new(self.x, self.y - step),
        ]
    }
    /// The 4 diagonally adjacent points at `step` distance, unfiltered.
    pub fn diagonal_neighborhood(&self, step: i32) -> Vec<Point> {
        vec![
            Point::new(self.x + step, self.y + step),
            Point::new(self.x + step, self.y - step),
            Point::new(self.x - step, self.y + step),
            Point::new(self.x - step, self.y - step),
        ]
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
