//! Game state and core simulation types
//!
//! A single owned `GameState` holds everything a run touches; the clock
//! and the tap resolver borrow it mutably and never overlap.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::{GameConfig, GameMode, KindWeights};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused (clock and taps frozen)
    Paused,
    /// Run ended, state frozen
    GameOver,
}

/// Entity kinds. Only numbers carry a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Number(u32),
    TimeBonus,
    Star,
    Bomb,
}

impl EntityKind {
    /// Face value of a number bubble
    pub fn value(&self) -> Option<u32> {
        match self {
            EntityKind::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, EntityKind::Number(_))
    }
}

/// A rising bubble or bonus token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub radius: f32,
    /// Upward distance per tick
    pub speed: f32,
    /// Wobble phase offset so neighbours don't sway in lockstep
    pub phase: f32,
    pub selected: bool,
    pub popping: bool,
    /// Radius scale during the pop animation (1 at rest)
    pub pop_scale: f32,
    pub opacity: f32,
}

impl Entity {
    pub fn new(id: u32, kind: EntityKind, pos: Vec2, radius: f32, speed: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            radius,
            speed,
            phase: 0.0,
            selected: false,
            popping: false,
            pop_scale: 1.0,
            opacity: 1.0,
        }
    }

    /// Freeze the entity and start its fade-out. Idempotent.
    pub fn pop(&mut self) {
        self.popping = true;
        self.selected = false;
    }

    /// Advance one tick of motion or pop animation
    pub fn advance(&mut self) {
        if self.popping {
            self.pop_scale += POP_STEP;
            self.opacity -= POP_STEP;
            return;
        }
        self.pos.y -= self.speed;
        self.pos.x += (self.pos.y * WOBBLE_FREQ + self.phase).sin() * WOBBLE_AMPLITUDE;
    }

    /// Fully faded entities are removed by the clock
    pub fn is_faded(&self) -> bool {
        self.opacity <= 0.0
    }

    /// Whole bubble is above the top edge
    pub fn is_above_top(&self) -> bool {
        self.pos.y < -self.radius
    }

    /// Live and tappable
    pub fn is_live(&self) -> bool {
        !self.popping
    }
}

/// The (at most two) selected number bubbles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Selection {
    ids: Vec<u32>,
    /// Bumped whenever the selection is cleared so stale deferred clears can tell
    generation: u64,
    /// A failed pair is on display, waiting for its deferred clear
    pending_clear: bool,
}

/// Upper bound on selected bubbles
pub const MAX_SELECTION: usize = 2;

impl Selection {
    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True while a mismatched pair awaits deselection
    pub fn is_locked(&self) -> bool {
        self.pending_clear
    }

    /// Add an id; refuses when full or locked
    pub fn insert(&mut self, id: u32) -> bool {
        if self.pending_clear || self.ids.len() >= MAX_SELECTION || self.contains(id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn remove(&mut self, id: u32) -> bool {
        let before = self.ids.len();
        self.ids.retain(|&s| s != id);
        self.ids.len() != before
    }

    /// Mark the current pair as a failed match on display
    pub fn lock(&mut self) {
        self.pending_clear = true;
    }

    /// Empty the selection and invalidate outstanding deferred clears
    pub fn clear(&mut self) -> Vec<u32> {
        self.generation += 1;
        self.pending_clear = false;
        std::mem::take(&mut self.ids)
    }
}

/// Tone of a floating indicator (renderer picks the colour)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndicatorTone {
    Good,
    Bad,
    Bonus,
}

/// Ephemeral floating text ("+20", "MISS", ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Indicator {
    pub text: String,
    pub pos: Vec2,
    pub tone: IndicatorTone,
    /// 1 when spawned, culled at 0
    pub life: f32,
}

impl Indicator {
    pub fn new(text: impl Into<String>, pos: Vec2, tone: IndicatorTone) -> Self {
        Self {
            text: text.into(),
            pos,
            tone,
            life: 1.0,
        }
    }

    pub fn advance(&mut self) {
        self.pos.y -= INDICATOR_RISE;
        self.life -= INDICATOR_FADE;
    }
}

/// Semantic feedback cues for haptics/audio collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feedback {
    /// A bubble was tapped or popped
    Pop,
    /// A pair matched
    Match,
    /// Follow-up pulse after a match
    Success,
    /// A bomb went off
    Bomb,
}

/// Work scheduled for a later tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DeferredAction {
    /// Deselect a failed pair, only if the selection is still that generation
    ClearSelection { generation: u64 },
    /// Emit a feedback cue later
    Feedback(Feedback),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Deferred {
    /// Simulation clock time at which the action runs
    pub due_ms: f64,
    pub action: DeferredAction,
}

/// Events emitted by the simulation for the front end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Feedback(Feedback),
    Matched { first: u32, second: u32, sum: u32 },
    Mismatched { first: u32, second: u32, sum: u32 },
    Missed { id: u32 },
    TargetChanged { target: u32 },
    TimeBonus { time_left: u32 },
    GameOver { score: u64 },
}

/// Per-run counters reported at game over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub matches: u32,
    pub mismatches: u32,
    pub misses: u32,
    pub bonuses: u32,
    pub spawned: u32,
    pub ticks: u64,
}

/// Complete game state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub rng: Pcg32,
    pub config: GameConfig,
    /// Playfield size (x right, y down)
    pub field: Vec2,
    pub score: u64,
    pub target: u32,
    pub time_left: u32,
    /// Gap between spawns (ms)
    pub spawn_rate_ms: f64,
    pub speed_multiplier: f32,
    pub phase: GamePhase,
    /// Live entities in spawn order
    pub entities: Vec<Entity>,
    pub selection: Selection,
    pub indicators: Vec<Indicator>,
    pub deferred: Vec<Deferred>,
    /// Undrained events for the front end
    pub events: Vec<GameEvent>,
    pub stats: SessionStats,
    /// Simulation clock (ms since start)
    pub clock_ms: f64,
    pub last_spawn_ms: f64,
    /// Time accumulated toward the next countdown second
    pub second_acc_ms: f64,
    /// x of the most recent spawns, newest last
    pub recent_spawn_x: Vec<f32>,
    next_id: u32,
}

impl GameState {
    /// Start a fresh run with the given seed
    pub fn new(seed: u64, mut config: GameConfig) -> Self {
        if !config.tuning.weights.is_valid() {
            log::warn!("Ignoring invalid kind weights {:?}", config.tuning.weights);
            config.tuning.weights = KindWeights::default();
        }

        let tuning = &config.tuning;
        let mut state = Self {
            rng: Pcg32::seed_from_u64(seed),
            field: Vec2::new(FIELD_WIDTH, FIELD_HEIGHT),
            score: 0,
            target: tuning.target.min.max(crate::tuning::MIN_TARGET),
            time_left: tuning.start_time_secs,
            spawn_rate_ms: tuning.initial_spawn_rate_ms,
            speed_multiplier: 1.0,
            phase: GamePhase::Playing,
            entities: Vec::new(),
            selection: Selection::default(),
            indicators: Vec::new(),
            deferred: Vec::new(),
            events: Vec::new(),
            stats: SessionStats::default(),
            clock_ms: 0.0,
            last_spawn_ms: 0.0,
            second_acc_ms: 0.0,
            recent_spawn_x: Vec::with_capacity(RECENT_SPAWN_WINDOW),
            next_id: 1,
            config,
        };

        super::difficulty::reroll_target(&mut state);
        log::info!(
            "Run started: mode={} seed={} target={} time={}s",
            state.mode().as_str(),
            seed,
            state.target,
            state.time_left
        );

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn mode(&self) -> GameMode {
        self.config.mode
    }

    /// Playing or paused (not over)
    pub fn is_active(&self) -> bool {
        self.phase != GamePhase::GameOver
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Resize the playfield (front end calls this on canvas resize)
    pub fn set_field_size(&mut self, width: f32, height: f32) {
        self.field = Vec2::new(width.max(1.0), height.max(1.0));
    }

    /// Place an entity directly. Returns its id.
    pub fn insert_entity(&mut self, kind: EntityKind, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        let radius = if kind.is_number() {
            BUBBLE_MIN_RADIUS + BUBBLE_RADIUS_SPREAD / 2.0
        } else {
            BONUS_RADIUS
        };
        self.entities
            .push(Entity::new(id, kind, pos, radius, self.speed_multiplier));
        id
    }

    pub fn entity(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entity_mut(&mut self, id: u32) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Queue an action `delay_ms` after the current clock
    pub fn schedule(&mut self, delay_ms: f64, action: DeferredAction) {
        self.deferred.push(Deferred {
            due_ms: self.clock_ms + delay_ms,
            action,
        });
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn feedback(&mut self, cue: Feedback) {
        self.events.push(GameEvent::Feedback(cue));
    }

    pub fn indicate(&mut self, text: impl Into<String>, pos: Vec2, tone: IndicatorTone) {
        self.indicators.push(Indicator::new(text, pos, tone));
    }

    /// Hand pending events to the front end
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Add points
    pub fn award(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Remove points, floored at zero
    pub fn penalize(&mut self, points: u64) {
        self.score = self.score.saturating_sub(points);
    }

    /// Toggle between playing and paused; no effect once over
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            GamePhase::GameOver => GamePhase::GameOver,
        };
    }

    /// Terminal transition. Runs at most once per run.
    pub fn end_game(&mut self) {
        if !self.is_active() {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.deferred.clear();
        log::info!(
            "Run over: score={} matches={} misses={} ticks={}",
            self.score,
            self.stats.matches,
            self.stats.misses,
            self.stats.ticks
        );
        self.emit(GameEvent::GameOver { score: self.score });
    }
}
