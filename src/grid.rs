use core::fmt;

use thiserror::Error;

use crate::point::Point;

/// What a single grid cell holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    Open,
    Wall,
    Start,
    Goal,
}

impl Cell {
    pub fn from_symbol(symbol: char) -> Option<Cell> {
        match symbol {
            '.' => Some(Cell::Open),
            '#' => Some(Cell::Wall),
            'S' => Some(Cell::Start),
            'E' => Some(Cell::Goal),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Cell::Open => '.',
            Cell::Wall => '#',
            Cell::Start => 'S',
            Cell::Goal => 'E',
        }
    }

    /// A route may occupy open space and the goal. Walls and the start
    /// marker itself are not traversable, so a route never re-enters its
    /// starting cell.
    pub fn is_traversable(&self) -> bool {
        matches!(self, Cell::Open | Cell::Goal)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GridParseError {
    #[error("grid input is empty")]
    Empty,
    #[error("line {line} is {found} cells wide, expected {expected}")]
    Ragged {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("unrecognized symbol {symbol:?} at {position}")]
    UnknownSymbol { symbol: char, position: Point },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NeighborQueryError {
    #[error("cannot combine a direction probe with diagonal neighbors")]
    DirectionWithDiagonals,
    #[error("step size must be at least 1, got {0}")]
    StepSize(i32),
}

/// Options for [CellGrid::neighbors]. The default query yields the 4
/// orthogonal neighbors at distance 1.
#[derive(Clone, Copy, Debug)]
pub struct NeighborQuery {
    /// Also yield the 4 diagonal neighbors. Mutually exclusive with
    /// `direction`.
    pub include_diagonals: bool,
    /// Probe a single ray instead of the full neighborhood: the only
    /// candidate is `position + direction * step_size`.
    pub direction: Option<Point>,
    /// Distance of every candidate from the queried position. Must be at
    /// least 1.
    pub step_size: i32,
}

impl Default for NeighborQuery {
    fn default() -> NeighborQuery {
        NeighborQuery {
            include_diagonals: false,
            direction: None,
            step_size: 1,
        }
    }
}

impl NeighborQuery {
    pub fn orthogonal() -> NeighborQuery {
        NeighborQuery::default()
    }
    pub fn with_diagonals() -> NeighborQuery {
        NeighborQuery {
            include_diagonals: true,
            ..NeighborQuery::default()
        }
    }
    pub fn probe(direction: Point) -> NeighborQuery {
        NeighborQuery {
            direction: Some(direction),
            ..NeighborQuery::default()
        }
    }
    pub fn at_step(mut self, step_size: i32) -> NeighborQuery {
        self.step_size = step_size;
        self
    }
}

/// A dense, rectangular grid of [Cell] values parsed from puzzle text.
/// Construction validates the input; after that the grid only changes
/// through single-cell overwrites such as obstacle placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellGrid {
    cells: Vec<Cell>,
    pub width: usize,
    pub height: usize,
}

impl CellGrid {
    pub fn new(width: usize, height: usize, default_value: Cell) -> CellGrid {
        CellGrid {
            cells: vec![default_value; width * height],
            width,
            height,
        }
    }

    /// Parses one character per cell. Fails fast on empty input, ragged
    /// lines and unknown symbols rather than producing a silently wrong
    /// grid.
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Result<CellGrid, GridParseError> {
        let lines: Vec<&str> = lines
            .iter()
            .map(|l| l.as_ref())
            .filter(|l| !l.is_empty())
            .collect();
        if lines.is_empty() {
            return Err(GridParseError::Empty);
        }
        let width = lines[0].chars().count();
        let height = lines.len();
        let mut cells = Vec::with_capacity(width * height);
        for (y, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(GridParseError::Ragged {
                    line: y,
                    expected: width,
                    found,
                });
            }
            for (x, symbol) in line.chars().enumerate() {
                let cell = Cell::from_symbol(symbol).ok_or(GridParseError::UnknownSymbol {
                    symbol,
                    position: Point::new(x as i32, y as i32),
                })?;
                cells.push(cell);
            }
        }
        Ok(CellGrid {
            cells,
            width,
            height,
        })
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.width
            && (point.y as usize) < self.height
    }

    fn ix(&self, point: Point) -> usize {
        point.y as usize * self.width + point.x as usize
    }

    /// The cell at `point`, or [None] when out of bounds. Coordinates
    /// outside the grid are never read.
    pub fn get(&self, point: Point) -> Option<Cell> {
        if self.in_bounds(point) {
            Some(self.cells[self.ix(point)])
        } else {
            None
        }
    }

    /// Overwrites a single cell. Panics when `point` is out of bounds.
    pub fn set(&mut self, point: Point, value: Cell) {
        assert!(self.in_bounds(point), "set out of bounds: {point}");
        let ix = self.ix(point);
        self.cells[ix] = value;
    }

    pub fn is_traversable(&self, point: Point) -> bool {
        self.get(point).is_some_and(|c| c.is_traversable())
    }

    /// All positions holding `cell`, in row-major order. Empty when the
    /// symbol does not occur; callers must handle a missing start or goal
    /// explicitly.
    pub fn locate(&self, cell: Cell) -> Vec<Point> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &c)| c == cell)
            .map(|(ix, _)| Point::new((ix % self.width) as i32, (ix / self.width) as i32))
            .collect()
    }

    /// The in-bounds orthogonal neighbors at distance 1. Infallible variant
    /// of [neighbors](Self::neighbors) for the common case.
    pub fn orthogonal_neighbors(&self, pos: Point) -> Vec<Point> {
        pos.neumann_neighborhood(1)
            .into_iter()
            .filter(|p| self.in_bounds(*p))
            .collect()
    }

    /// Candidate neighbor positions of `pos` under `query`. Out-of-bounds
    /// candidates are silently dropped; an inconsistent query (direction
    /// probe combined with diagonals, or a step size below 1) is rejected.
    pub fn neighbors(
        &self,
        pos: Point,
        query: &NeighborQuery,
    ) -> Result<Vec<Point>, NeighborQueryError> {
        if query.step_size < 1 {
            return Err(NeighborQueryError::StepSize(query.step_size));
        }
        if query.direction.is_some() && query.include_diagonals {
            return Err(NeighborQueryError::DirectionWithDiagonals);
        }
        let candidates = match query.direction {
            Some(direction) => vec![pos + direction.scaled(query.step_size)],
            None => {
                let mut candidates = pos.neumann_neighborhood(query.step_size);
                if query.include_diagonals {
                    candidates.extend(pos.diagonal_neighborhood(query.step_size));
                }
                candidates
            }
        };
        Ok(candidates
            .into_iter()
            .filter(|p| self.in_bounds(*p))
            .collect())
    }
}

impl fmt::Display for CellGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                write!(f, "{}", self.cells[y * self.width + x].symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CellGrid {
        CellGrid::parse(&["S..", ".#.", "..E"]).unwrap()
    }

    #[test]
    fn parse_round_trips_through_display() {
        let grid = sample();
        assert_eq!(grid.width, 3);
        assert_eq!(grid.height, 3);
        assert_eq!(grid.to_string(), "S..\n.#.\n..E\n");
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!(CellGrid::parse::<&str>(&[]), Err(GridParseError::Empty));
        assert_eq!(
            CellGrid::parse(&["..", "..."]),
            Err(GridParseError::Ragged {
                line: 1,
                expected: 2,
                found: 3
            })
        );
        assert_eq!(
            CellGrid::parse(&[".x"]),
            Err(GridParseError::UnknownSymbol {
                symbol: 'x',
                position: Point::new(1, 0)
            })
        );
    }

    #[test]
    fn locate_finds_all_or_nothing() {
        let grid = sample();
        assert_eq!(grid.locate(Cell::Start), vec![Point::new(0, 0)]);
        assert_eq!(grid.locate(Cell::Goal), vec![Point::new(2, 2)]);
        assert_eq!(grid.locate(Cell::Wall), vec![Point::new(1, 1)]);
        let no_walls = CellGrid::parse(&["S.", ".E"]).unwrap();
        assert!(no_walls.locate(Cell::Wall).is_empty());
    }

    #[test]
    fn get_rejects_out_of_bounds() {
        let grid = sample();
        assert_eq!(grid.get(Point::new(0, 0)), Some(Cell::Start));
        assert_eq!(grid.get(Point::new(-1, 0)), None);
        assert_eq!(grid.get(Point::new(3, 1)), None);
    }

    #[test]
    fn neighbors_filters_bounds() {
        let grid = sample();
        let corner = grid
            .neighbors(Point::new(0, 0), &NeighborQuery::orthogonal())
            .unwrap();
        assert_eq!(corner.len(), 2);
        let center = grid
            .neighbors(Point::new(1, 1), &NeighborQuery::with_diagonals())
            .unwrap();
        assert_eq!(center.len(), 8);
        let corner_diag = grid
            .neighbors(Point::new(0, 0), &NeighborQuery::with_diagonals())
            .unwrap();
        assert_eq!(corner_diag.len(), 3);
    }

    #[test]
    fn neighbors_probe_yields_single_ray() {
        let grid = sample();
        let probe = grid
            .neighbors(
                Point::new(0, 0),
                &NeighborQuery::probe(Point::new(1, 0)).at_step(2),
            )
            .unwrap();
        assert_eq!(probe, vec![Point::new(2, 0)]);
        // Probing off the edge is not an error, just empty.
        let off = grid
            .neighbors(Point::new(0, 0), &NeighborQuery::probe(Point::new(-1, 0)))
            .unwrap();
        assert!(off.is_empty());
    }

    #[test]
    fn neighbors_rejects_inconsistent_queries() {
        let grid = sample();
        let query = NeighborQuery {
            include_diagonals: true,
            direction: Some(Point::new(0, 1)),
            step_size: 1,
        };
        assert_eq!(
            grid.neighbors(Point::new(1, 1), &query),
            Err(NeighborQueryError::DirectionWithDiagonals)
        );
        assert_eq!(
            grid.neighbors(Point::new(1, 1), &NeighborQuery::orthogonal().at_step(0)),
            Err(NeighborQueryError::StepSize(0))
        );
    }

    #[test]
    fn larger_steps_stay_in_bounds() {
        let grid = sample();
        let far = grid
            .neighbors(Point::new(1, 1), &NeighborQuery::orthogonal().at_step(2))
            .unwrap();
        assert!(far.is_empty());
    }
}
