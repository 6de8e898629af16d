use std::collections::{HashSet, VecDeque};

use crate::error::MazeError;
use crate::types::{Direction, MazeView, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Wall,
    Floor,
    Dot { consumed: bool },
    PowerPellet { consumed: bool },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collectible {
    Dot,
    PowerPellet,
}

#[derive(Clone, Debug)]
pub struct Maze {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
    player_start: Vec2,
    total_collectibles: u32,
}

impl Maze {
    /// Parses a row-major layout. `#` wall, `.` dot, `o` power pellet,
    /// `P` player start, anything else open floor.
    pub fn build<S: AsRef<str>>(rows: &[S]) -> Result<Self, MazeError> {
        let Some(first) = rows.first() else {
            return Err(MazeError::EmptyLayout);
        };
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(MazeError::EmptyLayout);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        let mut player_start: Option<Vec2> = None;
        let mut total_collectibles = 0u32;

        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let actual = row.chars().count();
            if actual != width {
                return Err(MazeError::RaggedRow {
                    row: y,
                    expected: width,
                    actual,
                });
            }
            for (x, ch) in row.chars().enumerate() {
                let cell = match ch {
                    '#' => Cell::Wall,
                    '.' => {
                        total_collectibles += 1;
                        Cell::Dot { consumed: false }
                    }
                    'o' => {
                        total_collectibles += 1;
                        Cell::PowerPellet { consumed: false }
                    }
                    'P' => {
                        let here = Vec2::new(x as i32, y as i32);
                        if let Some(first) = player_start {
                            return Err(MazeError::MultiplePlayerStarts {
                                first,
                                second: here,
                            });
                        }
                        player_start = Some(here);
                        Cell::Floor
                    }
                    _ => Cell::Floor,
                };
                cells.push(cell);
            }
        }

        let Some(player_start) = player_start else {
            return Err(MazeError::MissingPlayerStart);
        };
        if total_collectibles == 0 {
            return Err(MazeError::NoCollectibles);
        }

        let maze = Self {
            width: width as i32,
            height: rows.len() as i32,
            cells,
            player_start,
            total_collectibles,
        };
        maze.ensure_collectibles_reachable()?;
        Ok(maze)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn player_start(&self) -> Vec2 {
        self.player_start
    }

    pub fn total_collectibles(&self) -> u32 {
        self.total_collectibles
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        match self.cell(x, y) {
            None | Some(Cell::Wall) => false,
            Some(_) => true,
        }
    }

    pub fn is_walkable_at(&self, pos: Vec2) -> bool {
        self.is_walkable(pos.x, pos.y)
    }

    pub fn collectible_at(&self, x: i32, y: i32) -> Option<Collectible> {
        match self.cell(x, y)? {
            Cell::Dot { consumed: false } => Some(Collectible::Dot),
            Cell::PowerPellet { consumed: false } => Some(Collectible::PowerPellet),
            _ => None,
        }
    }

    /// Idempotent: a consumed or empty cell is left alone.
    pub fn consume(&mut self, x: i32, y: i32) {
        let Some(idx) = self.index(x, y) else {
            return;
        };
        match &mut self.cells[idx] {
            Cell::Dot { consumed } | Cell::PowerPellet { consumed } => *consumed = true,
            Cell::Wall | Cell::Floor => {}
        }
    }

    pub fn reset_collectibles(&mut self) {
        for cell in &mut self.cells {
            if let Cell::Dot { consumed } | Cell::PowerPellet { consumed } = cell {
                *consumed = false;
            }
        }
    }

    pub fn remaining_collectibles(&self) -> u32 {
        self.cells
            .iter()
            .filter(|cell| {
                matches!(
                    cell,
                    Cell::Dot { consumed: false } | Cell::PowerPellet { consumed: false }
                )
            })
            .count() as u32
    }

    /// Walkable cardinal directions from (x,y) in Up, Down, Left, Right order,
    /// skipping the exact reverse of `exclude`.
    pub fn available_directions(&self, x: i32, y: i32, exclude: Direction) -> Vec<Direction> {
        let reverse = exclude.reverse();
        Direction::CARDINALS
            .into_iter()
            .filter(|dir| *dir != reverse)
            .filter(|dir| {
                let delta = dir.delta();
                self.is_walkable(x + delta.x, y + delta.y)
            })
            .collect()
    }

    pub fn to_view(&self) -> MazeView {
        let mut walls = Vec::new();
        let mut dots = Vec::new();
        let mut power_pellets = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                match self.cells[(y * self.width + x) as usize] {
                    Cell::Wall => walls.push(Vec2::new(x, y)),
                    Cell::Dot { consumed: false } => dots.push(Vec2::new(x, y)),
                    Cell::PowerPellet { consumed: false } => power_pellets.push(Vec2::new(x, y)),
                    _ => {}
                }
            }
        }
        MazeView {
            width: self.width,
            height: self.height,
            walls,
            dots,
            power_pellets,
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some((y * self.width + x) as usize)
    }

    fn ensure_collectibles_reachable(&self) -> Result<(), MazeError> {
        let reachable = self.reachable_from(self.player_start);
        for y in 0..self.height {
            for x in 0..self.width {
                if self.collectible_at(x, y).is_some() && !reachable.contains(&(x, y)) {
                    return Err(MazeError::UnreachableCollectible { x, y });
                }
            }
        }
        Ok(())
    }

    fn reachable_from(&self, start: Vec2) -> HashSet<(i32, i32)> {
        let mut out = HashSet::new();
        if !self.is_walkable(start.x, start.y) {
            return out;
        }

        let mut queue = VecDeque::new();
        out.insert((start.x, start.y));
        queue.push_back((start.x, start.y));

        while let Some((x, y)) = queue.pop_front() {
            for (nx, ny) in [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)] {
                if !self.is_walkable(nx, ny) {
                    continue;
                }
                if out.insert((nx, ny)) {
                    queue.push_back((nx, ny));
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::constants::REFERENCE_LAYOUT;
    use crate::error::MazeError;
    use crate::types::{Direction, Vec2};

    use super::{Cell, Collectible, Maze};

    fn reference() -> Maze {
        Maze::build(&REFERENCE_LAYOUT).expect("reference layout is valid")
    }

    #[test]
    fn reference_layout_dimensions_and_counts() {
        let maze = reference();
        assert_eq!(maze.width(), 19);
        assert_eq!(maze.height(), 21);
        assert_eq!(maze.player_start(), Vec2::new(9, 18));
        assert_eq!(maze.total_collectibles(), 176);
        assert_eq!(maze.remaining_collectibles(), 176);
        let view = maze.to_view();
        assert_eq!(view.power_pellets.len(), 4);
        assert_eq!(view.dots.len(), 172);
    }

    #[test]
    fn walkability_matches_cell_content() {
        let maze = reference();
        for y in 0..maze.height() {
            for x in 0..maze.width() {
                let is_wall = maze.cell(x, y) == Some(Cell::Wall);
                assert_eq!(maze.is_walkable(x, y), !is_wall, "cell ({x},{y})");
            }
        }
        // blank padding is open floor
        assert_eq!(maze.cell(0, 8), Some(Cell::Floor));
        assert!(maze.is_walkable(0, 8));
    }

    #[test]
    fn rows_above_and_below_the_grid_do_not_wrap() {
        let maze = reference();
        for (x, y) in [(5, -1), (5, 21), (0, -1), (18, 21), (19, 0), (-1, 20)] {
            assert!(!maze.is_walkable(x, y), "cell ({x},{y})");
            assert_eq!(maze.cell(x, y), None);
        }
    }

    #[test]
    fn consume_is_idempotent() {
        let mut maze = reference();
        assert_eq!(maze.collectible_at(1, 1), Some(Collectible::Dot));
        maze.consume(1, 1);
        assert_eq!(maze.collectible_at(1, 1), None);
        maze.consume(1, 1);
        maze.consume(9, 18);
        maze.consume(-3, 400);
        assert_eq!(maze.remaining_collectibles(), 175);

        assert_eq!(maze.collectible_at(1, 3), Some(Collectible::PowerPellet));
        maze.consume(1, 3);
        assert_eq!(maze.remaining_collectibles(), 174);

        maze.reset_collectibles();
        assert_eq!(maze.remaining_collectibles(), 176);
        assert_eq!(maze.collectible_at(1, 1), Some(Collectible::Dot));
    }

    #[test]
    fn available_directions_skips_reverse_and_walls() {
        let maze = reference();
        // (4,4) is a crossroads on the open corridor
        assert_eq!(
            maze.available_directions(4, 4, Direction::None),
            vec![
                Direction::Up,
                Direction::Down,
                Direction::Left,
                Direction::Right
            ]
        );
        assert_eq!(
            maze.available_directions(4, 4, Direction::Right),
            vec![Direction::Up, Direction::Down, Direction::Right]
        );
        // (1,1) corner: only Down and Right are open
        assert_eq!(
            maze.available_directions(1, 1, Direction::Up),
            vec![Direction::Right]
        );
        assert_eq!(
            maze.available_directions(1, 1, Direction::None),
            vec![Direction::Down, Direction::Right]
        );
    }

    #[test]
    fn dead_end_yields_empty_set_when_reverse_excluded() {
        let maze = Maze::build(&["#####", "#P.o#", "#####"]).expect("corridor maze");
        assert!(maze.available_directions(3, 1, Direction::Right).is_empty());
        assert_eq!(
            maze.available_directions(3, 1, Direction::None),
            vec![Direction::Left]
        );
    }

    #[test]
    fn build_rejects_malformed_layouts() {
        let empty: [&str; 0] = [];
        assert_eq!(Maze::build(&empty).unwrap_err(), MazeError::EmptyLayout);
        assert_eq!(Maze::build(&[""]).unwrap_err(), MazeError::EmptyLayout);
        assert_eq!(
            Maze::build(&["#####", "#P.#", "#####"]).unwrap_err(),
            MazeError::RaggedRow {
                row: 1,
                expected: 5,
                actual: 4
            }
        );
        assert_eq!(
            Maze::build(&["#####", "#..o#", "#####"]).unwrap_err(),
            MazeError::MissingPlayerStart
        );
        assert_eq!(
            Maze::build(&["#####", "#P P#", "#####"]).unwrap_err(),
            MazeError::MultiplePlayerStarts {
                first: Vec2::new(1, 1),
                second: Vec2::new(3, 1)
            }
        );
        assert_eq!(
            Maze::build(&["#####", "#P  #", "#####"]).unwrap_err(),
            MazeError::NoCollectibles
        );
        assert_eq!(
            Maze::build(&["#####", "#P#.#", "#####"]).unwrap_err(),
            MazeError::UnreachableCollectible { x: 3, y: 1 }
        );
    }

    proptest! {
        #[test]
        fn out_of_bounds_is_never_walkable(
            (x, y) in prop_oneof![
                (prop_oneof![-1000i32..0, 19i32..1000], -1000i32..1000),
                (0i32..19, prop_oneof![-1000i32..0, 21i32..1000]),
            ],
        ) {
            let maze = reference();
            prop_assert!(!maze.is_walkable(x, y));
            prop_assert!(maze.collectible_at(x, y).is_none());
        }
    }
}
