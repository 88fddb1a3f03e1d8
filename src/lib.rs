//! # maze_routing
//!
//! Maze routing on symbol grids. A puzzle-text grid of cells (open space,
//! walls, start and goal markers) is parsed into a [CellGrid]; a
//! [MazeRouter] then answers routing questions over it:
//!
//! - cheapest route under a turn-cost model (advancing costs [STEP_COST],
//!   rotating 90 degrees costs [TURN_COST]), searched over
//!   (position, heading) states;
//! - the set of tiles lying on *any* cost-tied optimal route;
//! - uniform-cost walks that ignore headings;
//! - the first obstacle in a sequence that disconnects start from goal,
//!   using pre-computed [connected components](https://en.wikipedia.org/wiki/Component_(graph_theory))
//!   to avoid flood-filling behaviour when no path exists.

pub mod grid;
pub mod heading;
pub mod point;
pub mod router;
mod search;

pub use grid::{Cell, CellGrid, GridParseError, NeighborQuery, NeighborQueryError};
pub use heading::Heading;
pub use point::Point;
pub use router::{MazeError, MazeRouter, Route};

/// Default cost of advancing one cell along the current heading.
pub const STEP_COST: i32 = 1;
/// Default cost of rotating 90 degrees in place.
pub const TURN_COST: i32 = 1000;
