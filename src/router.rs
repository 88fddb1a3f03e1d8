use fxhash::FxHashSet;
use log::info;
use petgraph::unionfind::UnionFind;
use thiserror::Error;

use crate::grid::{Cell, CellGrid};
use crate::heading::Heading;
use crate::point::Point;
use crate::search::{best_first_search, best_first_search_exhaustive};
use crate::{STEP_COST, TURN_COST};

/// Errors constructing a [MazeRouter] from a parsed grid.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    #[error("grid has no start marker")]
    MissingStart,
    #[error("grid has no goal marker")]
    MissingGoal,
    #[error("grid has {0} start markers, expected one")]
    DuplicateStart(usize),
    #[error("grid has {0} goal markers, expected one")]
    DuplicateGoal(usize),
    #[error("endpoint {0} is outside the grid")]
    EndpointOutOfBounds(Point),
}

/// A shortest route: its total cost under the router's cost model and the
/// sequence of positions visited, start and goal included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub cost: i32,
    pub path: Vec<Point>,
}

/// A search state for turn-cost routing. States with the same position but
/// different headings are distinct nodes.
type RouteState = (Point, Heading);

/// [MazeRouter] answers routing questions about one [CellGrid]: turn-cost
/// shortest routes, the set of tiles on any optimal route, uniform-cost
/// walks and reachability. Connected components over non-wall cells are
/// maintained in a [UnionFind] so unreachable queries never flood the grid;
/// placing a wall marks them dirty, [update](Self::update) regenerates them.
///
/// All search state lives inside a single call. The router itself only
/// mutates through [set_blocked](Self::set_blocked); independent trials that
/// modify the grid should each clone their own router.
#[derive(Clone, Debug)]
pub struct MazeRouter {
    pub grid: CellGrid,
    pub start: Point,
    pub goal: Point,
    /// Cost of advancing one cell along the current heading.
    pub step_cost: i32,
    /// Cost of rotating 90 degrees in place.
    pub turn_cost: i32,
    components: UnionFind<usize>,
    components_dirty: bool,
}

impl MazeRouter {
    /// Builds a router from a grid carrying single `S` and `E` markers.
    /// Missing or duplicated markers are rejected up front.
    pub fn new(grid: CellGrid) -> Result<MazeRouter, MazeError> {
        let start = single_marker(&grid, Cell::Start)?;
        let goal = single_marker(&grid, Cell::Goal)?;
        Ok(Self::assemble(grid, start, goal))
    }

    /// Builds a router with explicit endpoints, for grids without markers
    /// such as obstacle-corruption maps.
    pub fn with_endpoints(
        grid: CellGrid,
        start: Point,
        goal: Point,
    ) -> Result<MazeRouter, MazeError> {
        for endpoint in [start, goal] {
            if !grid.in_bounds(endpoint) {
                return Err(MazeError::EndpointOutOfBounds(endpoint));
            }
        }
        Ok(Self::assemble(grid, start, goal))
    }

    fn assemble(grid: CellGrid, start: Point, goal: Point) -> MazeRouter {
        let mut router = MazeRouter {
            components: UnionFind::new(grid.width * grid.height),
            components_dirty: false,
            grid,
            start,
            goal,
            step_cost: STEP_COST,
            turn_cost: TURN_COST,
        };
        router.generate_components();
        router
    }

    fn ix(&self, point: Point) -> usize {
        point.y as usize * self.grid.width + point.x as usize
    }

    /// Anything but a wall takes part in connectivity: routes leave the
    /// start marker even though they never re-enter it.
    fn passable(&self, point: Point) -> bool {
        self.grid.get(point).is_some_and(|c| c != Cell::Wall)
    }

    /// Generates a new [UnionFind] structure and links up orthogonally
    /// adjacent non-wall cells.
    pub fn generate_components(&mut self) {
        info!("generating connected components");
        self.components = UnionFind::new(self.grid.width * self.grid.height);
        self.components_dirty = false;
        for y in 0..self.grid.height as i32 {
            for x in 0..self.grid.width as i32 {
                let point = Point::new(x, y);
                if !self.passable(point) {
                    continue;
                }
                let parent_ix = self.ix(point);
                for neighbor in [Point::new(x + 1, y), Point::new(x, y + 1)] {
                    if self.passable(neighbor) {
                        self.components.union(parent_ix, self.ix(neighbor));
                    }
                }
            }
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            info!("components are dirty: regenerating");
            self.generate_components();
        }
    }

    /// Places or clears a wall. Clearing joins the surrounding components
    /// immediately; placing flags the components as dirty since a component
    /// may have been split.
    pub fn set_blocked(&mut self, point: Point, blocked: bool) {
        if blocked {
            if self.grid.get(point) != Some(Cell::Wall) {
                self.components_dirty = true;
            }
            self.grid.set(point, Cell::Wall);
        } else {
            self.grid.set(point, Cell::Open);
            let p_ix = self.ix(point);
            for neighbor in self.grid.orthogonal_neighbors(point) {
                if self.passable(neighbor) {
                    self.components.union(p_ix, self.ix(neighbor));
                }
            }
        }
    }

    /// Checks if `from` and `to` are on different components. Out-of-bounds
    /// endpoints are trivially unreachable. Call [update](Self::update)
    /// first if walls were placed since the last regeneration.
    pub fn unreachable(&self, from: &Point, to: &Point) -> bool {
        if self.grid.in_bounds(*from) && self.grid.in_bounds(*to) {
            !self.components.equiv(self.ix(*from), self.ix(*to))
        } else {
            true
        }
    }

    pub fn reachable(&self, from: &Point, to: &Point) -> bool {
        !self.unreachable(from, to)
    }

    /// Transitions out of a route state: advance one cell along the current
    /// heading, or rotate 90 degrees either way. A turn is only offered if
    /// the cell ahead in the new heading is traversable, so turns never
    /// point off the grid or into a wall.
    fn route_transitions(&self, state: &RouteState) -> Vec<(RouteState, i32)> {
        let &(pos, heading) = state;
        let mut transitions = Vec::with_capacity(3);
        for turned in [heading.turn_left(), heading.turn_right()] {
            if self.grid.is_traversable(pos + turned.offset()) {
                transitions.push(((pos, turned), self.turn_cost));
            }
        }
        let ahead = pos + heading.offset();
        if self.grid.is_traversable(ahead) {
            transitions.push(((ahead, heading), self.step_cost));
        }
        transitions
    }

    /// The cheapest route from the start (facing [Heading::East]) to the
    /// goal position, any final heading. [None] when the goal is
    /// unreachable.
    pub fn route(&self) -> Option<Route> {
        if self.unreachable(&self.start, &self.goal) {
            info!("{} is not reachable from {}", self.goal, self.start);
            return None;
        }
        let initial: RouteState = (self.start, Heading::default());
        let goal = self.goal;
        let step_cost = self.step_cost;
        best_first_search(
            &initial,
            |state| self.route_transitions(state),
            |&(pos, _)| pos.manhattan_distance(&goal) * step_cost,
            |&(pos, _)| pos == goal,
        )
        .map(|(states, cost)| {
            let mut path: Vec<Point> = states.into_iter().map(|(pos, _)| pos).collect();
            // Turning in place repeats the position.
            path.dedup();
            Route { cost, path }
        })
    }

    /// The number of distinct positions lying on any optimal route: the
    /// union of tiles across all routes tied at the optimal cost, not the
    /// sum of their lengths. [None] when the goal is unreachable.
    pub fn optimal_tiles(&self) -> Option<usize> {
        let best = self.route()?;
        let initial: RouteState = (self.start, Heading::default());
        let goal = self.goal;
        let paths = best_first_search_exhaustive(
            &initial,
            best.cost,
            |state| self.route_transitions(state),
            |&(pos, _)| pos == goal,
        );
        let mut tiles: FxHashSet<Point> = FxHashSet::default();
        for path in &paths {
            tiles.extend(path.iter().map(|&(pos, _)| pos));
        }
        info!(
            "{} optimal routes at cost {} covering {} tiles",
            paths.len(),
            best.cost,
            tiles.len()
        );
        Some(tiles.len())
    }

    /// Uniform-cost shortest walk between two positions, headings ignored:
    /// every orthogonal step into a non-wall cell costs
    /// [step_cost](Self::step_cost). Returns the path and its cost, or
    /// [None] when `goal` is unreachable.
    pub fn walk(&self, start: Point, goal: Point) -> Option<(Vec<Point>, i32)> {
        if self.unreachable(&start, &goal) {
            info!("{} is not reachable from {}", goal, start);
            return None;
        }
        let step_cost = self.step_cost;
        best_first_search(
            &start,
            |&pos: &Point| {
                self.grid
                    .orthogonal_neighbors(pos)
                    .into_iter()
                    .filter(|&p| self.passable(p))
                    .map(|p| (p, step_cost))
                    .collect::<Vec<_>>()
            },
            |pos| pos.manhattan_distance(&goal) * step_cost,
            |&pos| pos == goal,
        )
    }

    /// Applies `obstacles` in order and returns the first one that cuts the
    /// goal off from the start, or [None] if connectivity survives the
    /// whole list. The router is left with all obstacles up to and
    /// including the blocking one placed.
    pub fn first_blocking_obstacle(&mut self, obstacles: &[Point]) -> Option<Point> {
        for &obstacle in obstacles {
            self.set_blocked(obstacle, true);
            self.update();
            if self.unreachable(&self.start, &self.goal) {
                info!("{} disconnects {} from {}", obstacle, self.goal, self.start);
                return Some(obstacle);
            }
        }
        None
    }
}

fn single_marker(grid: &CellGrid, cell: Cell) -> Result<Point, MazeError> {
    let found = grid.locate(cell);
    match (cell, found.len()) {
        (_, 1) => Ok(found[0]),
        (Cell::Start, 0) => Err(MazeError::MissingStart),
        (Cell::Start, n) => Err(MazeError::DuplicateStart(n)),
        (_, 0) => Err(MazeError::MissingGoal),
        (_, n) => Err(MazeError::DuplicateGoal(n)),
    }
}
