use crate::config::GhostSpawn;
use crate::engine::utils::manhattan_between;
use crate::maze::Maze;
use crate::types::{Direction, GhostMode, GhostView, Vec2};

#[derive(Clone, Debug)]
pub struct Ghost {
    name: String,
    pub(crate) position: Vec2,
    home: Vec2,
    pub(crate) heading: Direction,
    mode: GhostMode,
    base_color: String,
    frightened_color: String,
}

impl Ghost {
    pub fn new(spawn: &GhostSpawn, frightened_color: &str) -> Self {
        Self {
            name: spawn.name.clone(),
            position: Vec2::new(spawn.x, spawn.y),
            home: Vec2::new(spawn.x, spawn.y),
            heading: Direction::Up,
            mode: GhostMode::Normal,
            base_color: spawn.color.clone(),
            frightened_color: frightened_color.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn home(&self) -> Vec2 {
        self.home
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn mode(&self) -> GhostMode {
        self.mode
    }

    /// Cosmetic only; derived from the mode, never read by game logic.
    pub fn color_tag(&self) -> &str {
        match self.mode {
            GhostMode::Normal => &self.base_color,
            GhostMode::Frightened => &self.frightened_color,
        }
    }

    /// One-step greedy pursuit: the non-reversing walkable direction whose
    /// next cell is closest to the target. Ties go to the earliest of
    /// Up, Down, Left, Right. A dead end forces a reversal.
    pub fn choose_heading(&mut self, maze: &Maze, target: Vec2) {
        let options = maze.available_directions(self.position.x, self.position.y, self.heading);
        if options.is_empty() {
            self.heading = self.heading.reverse();
            return;
        }

        let mut best = options[0];
        let mut best_distance = i32::MAX;
        for dir in options {
            let distance = manhattan_between(self.position + dir.delta(), target);
            if distance < best_distance {
                best_distance = distance;
                best = dir;
            }
        }
        self.heading = best;
    }

    pub fn advance(&mut self, maze: &Maze, target: Vec2) -> Vec2 {
        self.choose_heading(maze, target);
        let next = self.position + self.heading.delta();
        if !self.heading.is_none() && maze.is_walkable_at(next) {
            self.position = next;
        }
        self.position
    }

    pub fn enter_frightened(&mut self) {
        self.mode = GhostMode::Frightened;
    }

    pub fn exit_frightened(&mut self) {
        self.mode = GhostMode::Normal;
    }

    pub fn collides_with(&self, pos: Vec2) -> bool {
        self.position == pos
    }

    /// Awards `points` and sends the ghost home. Only legal while frightened.
    pub fn consumed_by(&mut self, points: u32) -> u32 {
        debug_assert_eq!(
            self.mode,
            GhostMode::Frightened,
            "ghost {} consumed while not frightened",
            self.name
        );
        self.reset_to_home();
        points
    }

    pub fn reset_to_home(&mut self) {
        self.position = self.home;
        self.heading = Direction::Up;
        self.exit_frightened();
    }

    pub fn to_view(&self) -> GhostView {
        GhostView {
            name: self.name.clone(),
            x: self.position.x,
            y: self.position.y,
            dir: self.heading,
            mode: self.mode,
            color: self.color_tag().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPEN_ROOM: [&str; 7] = [
        "#######",
        "#.....#",
        "#.....#",
        "#..P..#",
        "#.....#",
        "#.....#",
        "#######",
    ];

    fn ghost_at(x: i32, y: i32) -> Ghost {
        Ghost::new(
            &GhostSpawn {
                name: "blinky".to_string(),
                x,
                y,
                color: "#ff0000".to_string(),
            },
            "#2121de",
        )
    }

    #[test]
    fn picks_direction_closest_to_target() {
        let maze = Maze::build(&OPEN_ROOM).expect("open room");
        let mut ghost = ghost_at(3, 3);
        ghost.heading = Direction::None;
        ghost.choose_heading(&maze, Vec2::new(1, 3));
        assert_eq!(ghost.heading(), Direction::Left);

        ghost.heading = Direction::None;
        ghost.choose_heading(&maze, Vec2::new(3, 5));
        assert_eq!(ghost.heading(), Direction::Down);
    }

    #[test]
    fn ties_follow_up_down_left_right_order() {
        let maze = Maze::build(&OPEN_ROOM).expect("open room");
        let mut ghost = ghost_at(3, 3);

        ghost.heading = Direction::None;
        ghost.choose_heading(&maze, Vec2::new(5, 1));
        assert_eq!(ghost.heading(), Direction::Up);

        ghost.heading = Direction::None;
        ghost.choose_heading(&maze, Vec2::new(1, 5));
        assert_eq!(ghost.heading(), Direction::Down);

        ghost.heading = Direction::None;
        ghost.choose_heading(&maze, Vec2::new(1, 1));
        assert_eq!(ghost.heading(), Direction::Up);

        ghost.heading = Direction::None;
        ghost.choose_heading(&maze, Vec2::new(5, 5));
        assert_eq!(ghost.heading(), Direction::Down);
    }

    #[test]
    fn never_reverses_while_alternatives_exist() {
        let maze = Maze::build(&OPEN_ROOM).expect("open room");
        let mut ghost = ghost_at(3, 3);
        ghost.heading = Direction::Up;
        // target straight behind: Up, Left and Right tie at distance 3
        ghost.choose_heading(&maze, Vec2::new(3, 5));
        assert_eq!(ghost.heading(), Direction::Up);
    }

    #[test]
    fn dead_end_forces_reversal() {
        let maze = Maze::build(&["######", "#P..o#", "######"]).expect("corridor");
        let mut ghost = ghost_at(4, 1);
        ghost.heading = Direction::Right;
        let pos = ghost.advance(&maze, Vec2::new(4, 1));
        assert_eq!(ghost.heading(), Direction::Left);
        assert_eq!(pos, Vec2::new(3, 1));
    }

    #[test]
    fn boxed_in_ghost_stays_put() {
        let maze = Maze::build(&["######", "# #P.#", "######"]).expect("pocket");
        let mut ghost = ghost_at(1, 1);
        ghost.heading = Direction::Right;
        let pos = ghost.advance(&maze, Vec2::new(3, 1));
        assert_eq!(ghost.heading(), Direction::Left);
        assert_eq!(pos, Vec2::new(1, 1));
    }

    #[test]
    fn advance_moves_one_cell_toward_target() {
        let maze = Maze::build(&OPEN_ROOM).expect("open room");
        let mut ghost = ghost_at(1, 1);
        ghost.heading = Direction::None;
        let before = manhattan_between(ghost.position(), Vec2::new(5, 5));
        let pos = ghost.advance(&maze, Vec2::new(5, 5));
        assert_eq!(manhattan_between(pos, Vec2::new(5, 5)), before - 1);
    }

    #[test]
    fn frightened_mode_swaps_color_tag_only() {
        let mut ghost = ghost_at(3, 3);
        assert_eq!(ghost.color_tag(), "#ff0000");
        ghost.enter_frightened();
        assert_eq!(ghost.mode(), GhostMode::Frightened);
        assert_eq!(ghost.color_tag(), "#2121de");
        ghost.exit_frightened();
        assert_eq!(ghost.mode(), GhostMode::Normal);
        assert_eq!(ghost.color_tag(), "#ff0000");
    }

    #[test]
    fn consumed_ghost_returns_home_calm_facing_up() {
        let mut ghost = ghost_at(3, 3);
        ghost.position = Vec2::new(1, 5);
        ghost.heading = Direction::Left;
        ghost.enter_frightened();

        assert_eq!(ghost.consumed_by(200), 200);
        assert_eq!(ghost.position(), ghost.home());
        assert_eq!(ghost.heading(), Direction::Up);
        assert_eq!(ghost.mode(), GhostMode::Normal);
        assert!(ghost.collides_with(Vec2::new(3, 3)));
        assert!(!ghost.collides_with(Vec2::new(3, 4)));
    }
}
