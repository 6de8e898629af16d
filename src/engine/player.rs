use crate::config::ScoreTable;
use crate::constants::MOUTH_PHASE_STEP;
use crate::engine::match_state::MatchState;
use crate::maze::{Collectible, Maze};
use crate::types::{Direction, PlayerView, Vec2};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConsumeOutcome {
    pub ate_dot: bool,
    pub ate_pellet: bool,
    pub points: u32,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub(crate) position: Vec2,
    pub(crate) heading: Direction,
    pub(crate) buffered: Direction,
    mouth_phase: f32,
    mouth_step: f32,
}

impl Player {
    pub fn new(start: Vec2) -> Self {
        Self {
            position: start,
            heading: Direction::None,
            buffered: Direction::None,
            mouth_phase: 0.0,
            mouth_step: MOUTH_PHASE_STEP,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn buffered_heading(&self) -> Direction {
        self.buffered
    }

    pub fn mouth_phase(&self) -> f32 {
        self.mouth_phase
    }

    /// Last write wins; legality is only checked when the turn is attempted.
    pub fn set_buffered_heading(&mut self, dir: Direction) {
        self.buffered = dir;
    }

    pub fn advance(&mut self, maze: &Maze) -> Vec2 {
        if !self.buffered.is_none() && maze.is_walkable_at(self.position + self.buffered.delta()) {
            self.heading = self.buffered;
        }

        let next = self.position + self.heading.delta();
        if !self.heading.is_none() && maze.is_walkable_at(next) {
            self.position = next;
        }

        self.animate_mouth();
        self.position
    }

    pub fn consume(
        &mut self,
        maze: &mut Maze,
        state: &mut MatchState,
        scores: ScoreTable,
    ) -> ConsumeOutcome {
        let mut outcome = ConsumeOutcome::default();
        let Vec2 { x, y } = self.position;

        while let Some(item) = maze.collectible_at(x, y) {
            maze.consume(x, y);
            state.record_collectible();
            match item {
                Collectible::Dot => {
                    outcome.ate_dot = true;
                    outcome.points += scores.dot;
                }
                Collectible::PowerPellet => {
                    outcome.ate_pellet = true;
                    outcome.points += scores.pellet;
                }
            }
        }

        if outcome.points > 0 {
            state.add_score(outcome.points);
        }
        outcome
    }

    pub fn reset_to(&mut self, pos: Vec2) {
        self.position = pos;
        self.heading = Direction::None;
        self.buffered = Direction::None;
    }

    pub fn to_view(&self) -> PlayerView {
        PlayerView {
            x: self.position.x,
            y: self.position.y,
            dir: self.heading,
            mouth_phase: self.mouth_phase,
        }
    }

    fn animate_mouth(&mut self) {
        self.mouth_phase += self.mouth_step;
        if self.mouth_phase > 1.0 {
            self.mouth_phase = 2.0 - self.mouth_phase;
            self.mouth_step = -self.mouth_step;
        } else if self.mouth_phase < 0.0 {
            self.mouth_phase = -self.mouth_phase;
            self.mouth_step = -self.mouth_step;
        }
    }
}
