use tracing::{debug, info, trace};

use crate::config::GameConfig;
use crate::error::GameResult;
use crate::maze::Maze;
use crate::types::{
    Direction, GameSummary, GhostMode, MatchOutcome, MatchPhase, RuntimeEvent, Snapshot,
};

mod ghost;
mod match_state;
mod player;
mod power_timer;
mod utils;

pub use self::ghost::Ghost;
pub use self::match_state::MatchState;
pub use self::player::{ConsumeOutcome, Player};
pub use self::power_timer::PowerModeTimer;
pub use self::utils::manhattan;

/// One self-contained match: maze, agents, scoreboard and the single
/// power-mode timer. Driven by `step` at whatever rate the host renders.
#[derive(Clone, Debug)]
pub struct GameEngine {
    pub config: GameConfig,

    maze: Maze,
    state: MatchState,
    player: Player,
    ghosts: Vec<Ghost>,
    power_timer: PowerModeTimer,
    events: Vec<RuntimeEvent>,

    now_ms: u64,
    tick_counter: u64,
    ghosts_eaten: u32,
    deaths: u32,
    started_at_ms: Option<u64>,
    finished_at_ms: Option<u64>,
}

impl GameEngine {
    pub fn new(config: GameConfig) -> GameResult<Self> {
        let maze = Maze::build(&config.layout)?;
        config.validate(maze.width(), maze.height())?;

        let state = MatchState::new(config.starting_lives, maze.total_collectibles());
        let player = Player::new(maze.player_start());
        let ghosts = config
            .ghosts
            .iter()
            .map(|spawn| Ghost::new(spawn, &config.frightened_color))
            .collect();

        debug!(
            width = maze.width(),
            height = maze.height(),
            collectibles = maze.total_collectibles(),
            "maze built"
        );

        Ok(Self {
            config,
            maze,
            state,
            player,
            ghosts,
            power_timer: PowerModeTimer::default(),
            events: Vec::new(),
            now_ms: 0,
            tick_counter: 0,
            ghosts_eaten: 0,
            deaths: 0,
            started_at_ms: None,
            finished_at_ms: None,
        })
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn phase(&self) -> MatchPhase {
        self.state.phase()
    }

    pub fn is_ended(&self) -> bool {
        self.state.phase().is_terminal()
    }

    pub fn power_mode_active(&self) -> bool {
        self.power_timer.is_pending()
    }

    pub fn start(&mut self) {
        if self.state.phase() != MatchPhase::Idle {
            return;
        }
        self.state.set_phase(MatchPhase::Running);
        self.started_at_ms = Some(self.now_ms);
        self.finished_at_ms = None;
        self.events.push(RuntimeEvent::MatchStarted);
        info!(lives = self.state.lives(), "match started");
    }

    pub fn set_paused(&mut self, paused: bool) {
        if !self.state.is_running() || self.state.paused() == paused {
            return;
        }
        self.state.set_paused(paused);
        self.events.push(RuntimeEvent::PausedChanged { paused });
        debug!(paused, "pause toggled");
    }

    pub fn toggle_pause(&mut self) {
        self.set_paused(!self.state.paused());
    }

    pub fn request_heading(&mut self, dir: Direction) {
        if dir.is_none() || !self.state.is_running() {
            return;
        }
        self.player.set_buffered_heading(dir);
    }

    pub fn step(&mut self, dt_ms: u64) {
        self.tick_counter += 1;
        self.now_ms = self.now_ms.saturating_add(dt_ms);

        // host time: expiry is honoured while paused and after the match ends
        if self.power_timer.fire_if_due(self.now_ms) {
            self.end_power_mode();
        }

        if !self.state.is_running() || self.state.paused() {
            return;
        }

        self.state.accumulate(dt_ms);
        if self.state.take_player_tick(self.config.player_interval_ms) {
            self.update_player();
        }
        if !self.state.is_running() {
            return;
        }
        if self.state.take_ghost_tick(self.config.ghost_interval_ms) {
            self.update_ghosts();
        }
    }

    fn update_player(&mut self) {
        let pos = self.player.advance(&self.maze);
        trace!(x = pos.x, y = pos.y, dir = ?self.player.heading(), "player tick");

        let outcome = self
            .player
            .consume(&mut self.maze, &mut self.state, self.config.scores());
        if outcome.ate_dot {
            self.events.push(RuntimeEvent::DotEaten { x: pos.x, y: pos.y });
        }
        if outcome.ate_pellet {
            self.events.push(RuntimeEvent::PelletEaten { x: pos.x, y: pos.y });
        }
        if outcome.points > 0 {
            self.events.push(RuntimeEvent::ScoreChanged {
                score: self.state.score(),
            });
        }
        if outcome.ate_pellet {
            self.activate_power_mode();
        }

        self.resolve_collisions();
    }

    fn update_ghosts(&mut self) {
        let target = self.player.position();
        for ghost in &mut self.ghosts {
            let pos = ghost.advance(&self.maze, target);
            trace!(ghost = ghost.name(), x = pos.x, y = pos.y, "ghost tick");
        }
        self.resolve_collisions();
    }

    /// Safe to call any number of times per frame. A death ends the pass
    /// early so the win check never runs in the same pass as a life loss.
    pub fn resolve_collisions(&mut self) {
        if !self.state.is_running() {
            return;
        }

        let player_pos = self.player.position();
        for idx in 0..self.ghosts.len() {
            if !self.ghosts[idx].collides_with(player_pos) {
                continue;
            }
            match self.ghosts[idx].mode() {
                GhostMode::Frightened => {
                    let points = self.ghosts[idx].consumed_by(self.config.ghost_score);
                    self.state.add_score(points);
                    self.ghosts_eaten += 1;
                    self.events.push(RuntimeEvent::GhostEaten {
                        name: self.ghosts[idx].name().to_string(),
                        points,
                    });
                    self.events.push(RuntimeEvent::ScoreChanged {
                        score: self.state.score(),
                    });
                    debug!(ghost = self.ghosts[idx].name(), points, "ghost eaten");
                }
                GhostMode::Normal => {
                    self.handle_player_caught();
                    return;
                }
            }
        }

        if self.state.is_cleared() {
            self.finish(MatchOutcome::Won);
        }
    }

    /// Arms (or re-arms) the power-mode timer and frightens every ghost.
    /// Ignored unless the match is running.
    pub fn activate_power_mode(&mut self) {
        if !self.state.is_running() {
            return;
        }
        let duration_ms = self.config.power_duration_ms;
        if self.power_timer.arm(self.now_ms, duration_ms) {
            debug!(now_ms = self.now_ms, "power mode extended");
        } else {
            debug!(now_ms = self.now_ms, duration_ms, "power mode started");
        }
        for ghost in &mut self.ghosts {
            ghost.enter_frightened();
        }
        self.events.push(RuntimeEvent::PowerModeStarted { duration_ms });
    }

    fn end_power_mode(&mut self) {
        for ghost in &mut self.ghosts {
            ghost.exit_frightened();
        }
        self.events.push(RuntimeEvent::PowerModeEnded);
        debug!(now_ms = self.now_ms, "power mode expired");
    }

    fn handle_player_caught(&mut self) {
        let has_lives = self.state.lose_life();
        self.deaths += 1;
        let lives_left = self.state.lives();
        self.events.push(RuntimeEvent::PlayerCaught { lives_left });
        self.events.push(RuntimeEvent::LivesChanged { lives: lives_left });
        debug!(lives_left, "player caught");

        if has_lives {
            self.reset_positions();
        } else {
            self.finish(MatchOutcome::Lost);
        }
    }

    /// Soft reset: agents back to their spawns, power mode dropped.
    /// Score and lives are untouched.
    pub fn reset_positions(&mut self) {
        if self.power_timer.cancel() {
            self.events.push(RuntimeEvent::PowerModeEnded);
        }
        self.player.reset_to(self.maze.player_start());
        for ghost in &mut self.ghosts {
            ghost.reset_to_home();
        }
        self.state.clear_clocks();
    }

    pub fn full_reset(&mut self, start_immediately: bool) {
        let score_before = self.state.score();
        let lives_before = self.state.lives();

        self.reset_positions();
        self.maze.reset_collectibles();
        self.state.reset_full();
        self.ghosts_eaten = 0;
        self.deaths = 0;
        self.started_at_ms = None;
        self.finished_at_ms = None;

        if self.state.score() != score_before {
            self.events.push(RuntimeEvent::ScoreChanged {
                score: self.state.score(),
            });
        }
        if self.state.lives() != lives_before {
            self.events.push(RuntimeEvent::LivesChanged {
                lives: self.state.lives(),
            });
        }
        info!(start_immediately, "match reset");

        if start_immediately {
            self.start();
        }
    }

    pub fn restart(&mut self) {
        self.full_reset(true);
    }

    fn finish(&mut self, outcome: MatchOutcome) {
        let phase = match outcome {
            MatchOutcome::Won => MatchPhase::Won,
            MatchOutcome::Lost => MatchPhase::Lost,
        };
        self.state.set_phase(phase);
        self.finished_at_ms = Some(self.now_ms);
        let final_score = self.state.score();
        self.events.push(RuntimeEvent::MatchOver {
            outcome,
            final_score,
        });
        info!(?outcome, final_score, "match over");
    }

    pub fn drain_events(&mut self) -> Vec<RuntimeEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn build_snapshot(&mut self, include_events: bool) -> Snapshot {
        Snapshot {
            tick: self.tick_counter,
            now_ms: self.now_ms,
            phase: self.state.phase(),
            paused: self.state.paused(),
            score: self.state.score(),
            lives: self.state.lives(),
            collectibles_eaten: self.state.collectibles_eaten(),
            collectibles_total: self.state.collectibles_total(),
            power_remaining_ms: self.power_timer.remaining_ms(self.now_ms),
            maze: self.maze.to_view(),
            player: self.player.to_view(),
            ghosts: self.ghosts.iter().map(Ghost::to_view).collect(),
            events: if include_events {
                self.drain_events()
            } else {
                Vec::new()
            },
        }
    }

    pub fn build_summary(&self) -> GameSummary {
        let outcome = match self.state.phase() {
            MatchPhase::Won => Some(MatchOutcome::Won),
            MatchPhase::Lost => Some(MatchOutcome::Lost),
            MatchPhase::Idle | MatchPhase::Running => None,
        };
        let duration_ms = match self.started_at_ms {
            Some(started) => self
                .finished_at_ms
                .unwrap_or(self.now_ms)
                .saturating_sub(started),
            None => 0,
        };
        GameSummary {
            outcome,
            score: self.state.score(),
            lives: self.state.lives(),
            collectibles_eaten: self.state.collectibles_eaten(),
            collectibles_total: self.state.collectibles_total(),
            ghosts_eaten: self.ghosts_eaten,
            deaths: self.deaths,
            duration_ms,
        }
    }
}
