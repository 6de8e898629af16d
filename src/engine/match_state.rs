use crate::types::MatchPhase;

/// Scoreboard, lifecycle flags and the two movement clocks.
#[derive(Clone, Debug)]
pub struct MatchState {
    score: u32,
    lives: u32,
    starting_lives: u32,
    phase: MatchPhase,
    paused: bool,
    collectibles_eaten: u32,
    collectibles_total: u32,
    player_clock_ms: u64,
    ghost_clock_ms: u64,
}

impl MatchState {
    pub fn new(starting_lives: u32, collectibles_total: u32) -> Self {
        Self {
            score: 0,
            lives: starting_lives,
            starting_lives,
            phase: MatchPhase::Idle,
            paused: false,
            collectibles_eaten: 0,
            collectibles_total,
            player_clock_ms: 0,
            ghost_clock_ms: 0,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn is_running(&self) -> bool {
        self.phase == MatchPhase::Running
    }

    pub fn collectibles_eaten(&self) -> u32 {
        self.collectibles_eaten
    }

    pub fn collectibles_total(&self) -> u32 {
        self.collectibles_total
    }

    pub fn is_cleared(&self) -> bool {
        self.collectibles_eaten == self.collectibles_total
    }

    pub(crate) fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub(crate) fn record_collectible(&mut self) {
        debug_assert!(self.collectibles_eaten < self.collectibles_total);
        self.collectibles_eaten = (self.collectibles_eaten + 1).min(self.collectibles_total);
    }

    /// Returns whether any lives remain.
    pub(crate) fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.lives > 0
    }

    pub(crate) fn set_phase(&mut self, phase: MatchPhase) {
        self.phase = phase;
        if phase != MatchPhase::Running {
            self.paused = false;
        }
    }

    pub(crate) fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub(crate) fn accumulate(&mut self, dt_ms: u64) {
        self.player_clock_ms = self.player_clock_ms.saturating_add(dt_ms);
        self.ghost_clock_ms = self.ghost_clock_ms.saturating_add(dt_ms);
    }

    pub(crate) fn take_player_tick(&mut self, interval_ms: u64) -> bool {
        take_tick(&mut self.player_clock_ms, interval_ms)
    }

    pub(crate) fn take_ghost_tick(&mut self, interval_ms: u64) -> bool {
        take_tick(&mut self.ghost_clock_ms, interval_ms)
    }

    pub(crate) fn clear_clocks(&mut self) {
        self.player_clock_ms = 0;
        self.ghost_clock_ms = 0;
    }

    pub(crate) fn reset_full(&mut self) {
        *self = Self::new(self.starting_lives, self.collectibles_total);
    }
}

fn take_tick(clock_ms: &mut u64, interval_ms: u64) -> bool {
    if *clock_ms < interval_ms {
        return false;
    }
    *clock_ms = 0;
    true
}
