//! End-to-end checks against two reference mazes with known answers: a
//! turn-cost maze with several tied optimal routes, and an obstacle
//! corruption grid where bytes fall until the exit is cut off.
use maze_routing::{Cell, CellGrid, MazeRouter, Point};

const TURN_MAZE: [&str; 15] = [
    "###############",
    "#.......#....E#",
    "#.#.###.#.###.#",
    "#.....#.#...#.#",
    "#.###.#####.#.#",
    "#.#.#.......#.#",
    "#.#.#####.###.#",
    "#...........#.#",
    "###.#.#####.#.#",
    "#...#.....#.#.#",
    "#.#.#.###.#.#.#",
    "#.....#...#.#.#",
    "#.###.#.#.#.#.#",
    "#S..#.....#...#",
    "###############",
];

#[test]
fn turn_maze_optimal_cost() {
    let router = MazeRouter::new(CellGrid::parse(&TURN_MAZE).unwrap()).unwrap();
    let route = router.route().unwrap();
    // 36 steps and 7 turns.
    assert_eq!(route.cost, 7036);
    assert_eq!(route.path[0], router.start);
    assert_eq!(*route.path.last().unwrap(), router.goal);
}

#[test]
fn turn_maze_tiles_on_any_optimal_route() {
    let router = MazeRouter::new(CellGrid::parse(&TURN_MAZE).unwrap()).unwrap();
    assert_eq!(router.optimal_tiles(), Some(45));
}

// (x, y) drop order for the 7x7 corruption grid.
const FALLING_BYTES: [(i32, i32); 25] = [
    (5, 4),
    (4, 2),
    (4, 5),
    (3, 0),
    (2, 1),
    (6, 3),
    (2, 4),
    (1, 5),
    (0, 6),
    (3, 3),
    (2, 6),
    (5, 1),
    (1, 2),
    (5, 5),
    (2, 5),
    (6, 5),
    (1, 4),
    (0, 4),
    (6, 4),
    (1, 1),
    (6, 1),
    (1, 0),
    (0, 5),
    (1, 6),
    (2, 0),
];

fn corruption_router() -> MazeRouter {
    let grid = CellGrid::new(7, 7, Cell::Open);
    MazeRouter::with_endpoints(grid, Point::new(0, 0), Point::new(6, 6)).unwrap()
}

#[test]
fn corrupted_grid_shortest_walk() {
    let mut router = corruption_router();
    for &(x, y) in &FALLING_BYTES[..12] {
        router.set_blocked(Point::new(x, y), true);
    }
    router.update();
    let (_, cost) = router.walk(router.start, router.goal).unwrap();
    assert_eq!(cost, 22);
}

#[test]
fn first_byte_cutting_off_the_exit() {
    let mut router = corruption_router();
    let obstacles: Vec<Point> = FALLING_BYTES.iter().map(|&(x, y)| Point::new(x, y)).collect();
    assert_eq!(
        router.first_blocking_obstacle(&obstacles),
        Some(Point::new(6, 1))
    );
}
