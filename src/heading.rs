use crate::point::Point;

/// One of the four cardinal headings a route can face. A closed enum rather
/// than an angle, so transition handling is exhaustive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Heading {
    #[default]
    East,
    North,
    West,
    South,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::East, Heading::North, Heading::West, Heading::South];

    /// Unit offset of one step along this heading. North points towards
    /// smaller `y` since `y` grows downward.
    pub fn offset(&self) -> Point {
        match self {
            Heading::East => Point::new(1, 0),
            Heading::North => Point::new(0, -1),
            Heading::West => Point::new(-1, 0),
            Heading::South => Point::new(0, 1),
        }
    }

    /// Rotates 90 degrees counterclockwise.
    pub fn turn_left(&self) -> Heading {
        match self {
            Heading::East => Heading::North,
            Heading::North => Heading::West,
            Heading::West => Heading::South,
            Heading::South => Heading::East,
        }
    }

    /// Rotates 90 degrees clockwise.
    pub fn turn_right(&self) -> Heading {
        match self {
            Heading::East => Heading::South,
            Heading::South => Heading::West,
            Heading::West => Heading::North,
            Heading::North => Heading::East,
        }
    }
}
