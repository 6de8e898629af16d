pub const PLAYER_INTERVAL_MS: u64 = 150;
pub const GHOST_INTERVAL_MS: u64 = 200;
pub const POWER_DURATION_MS: u64 = 5_000;

pub const DOT_SCORE: u32 = 10;
pub const PELLET_SCORE: u32 = 50;
pub const GHOST_SCORE: u32 = 200;
pub const STARTING_LIVES: u32 = 3;

pub const MOUTH_PHASE_STEP: f32 = 0.2;

pub const FRIGHTENED_COLOR: &str = "#2121de";

/// 19 x 21: the classic board clipped to the rows the game actually plays.
pub const REFERENCE_LAYOUT: [&str; 21] = [
    "###################",
    "#........#........#",
    "#.##.###.#.###.##.#",
    "#o##.###.#.###.##o#",
    "#.................#",
    "#.##.#.#####.#.##.#",
    "#....#...#...#....#",
    "####.###.#.###.####",
    "   #.#.......#.#   ",
    "   #.#.##.##.#.#   ",
    "####.#.#   #.#.####",
    "    ....# #....    ",
    "####.#.#####.#.####",
    "   #.#.......#.#   ",
    "   #.#.#####.#.#   ",
    "####.#...#...#.####",
    "#........#........#",
    "#.##.###.#.###.##.#",
    "#o.#.....P.....#.o#",
    "##.#.#.#####.#.#.##",
    "#....#...#...#....#",
];

/// (name, x, y, base color)
pub const REFERENCE_GHOSTS: [(&str, i32, i32, &str); 3] = [
    ("blinky", 9, 9, "#ff0000"),
    ("pinky", 10, 9, "#ffb8ff"),
    ("inky", 8, 9, "#00ffff"),
];
