//! Data-driven game balance
//!
//! Every design-tunable number lives here so modes differ only by data.

use serde::{Deserialize, Serialize};

/// Difficulty mode selected before a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameMode {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Easy => "Easy",
            GameMode::Normal => "Normal",
            GameMode::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(GameMode::Easy),
            "normal" | "norm" => Some(GameMode::Normal),
            "hard" => Some(GameMode::Hard),
            _ => None,
        }
    }
}

/// What happens when an unpopped number floats off the top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MissPolicy {
    /// Counted as a miss; only the countdown ends the run
    #[default]
    Tolerate,
    /// Any miss ends the run immediately
    EndGame,
}

/// Probabilities for the non-number kinds. Numbers take the remainder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KindWeights {
    pub star: f32,
    pub bomb: f32,
    pub time_bonus: f32,
}

impl KindWeights {
    /// True when all weights are non-negative and the bonus share fits in 1
    pub fn is_valid(&self) -> bool {
        self.star >= 0.0
            && self.bomb >= 0.0
            && self.time_bonus >= 0.0
            && self.star + self.bomb + self.time_bonus <= 1.0
    }
}

impl Default for KindWeights {
    fn default() -> Self {
        Self {
            star: 0.02,
            bomb: 0.03,
            time_bonus: 0.05,
        }
    }
}

/// Inclusive target range, widened once the score passes a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRange {
    pub min: u32,
    pub max: u32,
    /// Score at which `scaled_max` replaces `max` (None = never)
    pub scale_at: Option<u64>,
    pub scaled_max: u32,
}

/// Smallest target for which a pair (1, target - 1) exists
pub const MIN_TARGET: u32 = 2;

/// Complete balance sheet for one mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Countdown length at start
    pub start_time_secs: u32,
    /// Initial gap between spawns
    pub initial_spawn_rate_ms: f64,
    /// Fastest allowed spawn pacing
    pub min_spawn_rate_ms: f64,
    /// Spawn gap shrink per point of score
    pub spawn_rate_per_point: f64,
    /// Kind draw
    pub weights: KindWeights,
    /// Chance a new number completes a pair with one already on screen
    pub guaranteed_match_chance: f32,
    /// Base rise speed range (multiplied by the speed multiplier)
    pub min_rise_speed: f32,
    pub max_rise_speed: f32,
    /// Speed multiplier gain on a match / on a star
    pub match_speed_step: f32,
    pub star_speed_step: f32,
    /// Points per matched bubble (a pair scores twice this)
    pub match_points: u64,
    pub star_points: u64,
    pub bomb_penalty: u64,
    /// Penalty applied to misses under the tolerant policy
    pub miss_penalty: u64,
    pub target: TargetRange,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::for_mode(GameMode::Normal)
    }
}

impl Tuning {
    /// Balance sheet for a mode
    pub fn for_mode(mode: GameMode) -> Self {
        let normal = Self {
            start_time_secs: 60,
            initial_spawn_rate_ms: 1500.0,
            min_spawn_rate_ms: 800.0,
            spawn_rate_per_point: 0.5,
            weights: KindWeights::default(),
            guaranteed_match_chance: 0.3,
            min_rise_speed: 0.5,
            max_rise_speed: 1.0,
            match_speed_step: 0.02,
            star_speed_step: 0.05,
            match_points: 10,
            star_points: 50,
            bomb_penalty: 10,
            miss_penalty: 0,
            target: TargetRange {
                min: 10,
                max: 20,
                scale_at: Some(200),
                scaled_max: 50,
            },
        };

        match mode {
            GameMode::Normal => normal,
            GameMode::Easy => Self {
                start_time_secs: 90,
                initial_spawn_rate_ms: 1800.0,
                guaranteed_match_chance: 0.5,
                weights: KindWeights {
                    star: 0.03,
                    bomb: 0.0,
                    time_bonus: 0.07,
                },
                target: TargetRange {
                    min: 5,
                    max: 12,
                    scale_at: None,
                    scaled_max: 12,
                },
                ..normal
            },
            GameMode::Hard => Self {
                start_time_secs: 45,
                initial_spawn_rate_ms: 1200.0,
                guaranteed_match_chance: 0.15,
                weights: KindWeights {
                    star: 0.02,
                    bomb: 0.06,
                    time_bonus: 0.04,
                },
                miss_penalty: 5,
                target: TargetRange {
                    min: 20,
                    max: 99,
                    scale_at: None,
                    scaled_max: 99,
                },
                ..normal
            },
        }
    }

    /// Target bounds for the current score, never below `MIN_TARGET`
    pub fn target_bounds(&self, score: u64) -> (u32, u32) {
        let max = match self.target.scale_at {
            Some(threshold) if score >= threshold => self.target.scaled_max,
            _ => self.target.max,
        };
        let min = self.target.min.max(MIN_TARGET);
        (min, max.max(min))
    }
}

/// Everything needed to start a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GameConfig {
    pub mode: GameMode,
    pub miss_policy: MissPolicy,
    pub tuning: Tuning,
}

impl GameConfig {
    pub fn new(mode: GameMode, miss_policy: MissPolicy) -> Self {
        Self {
            mode,
            miss_policy,
            tuning: Tuning::for_mode(mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!(GameMode::from_str("EASY"), Some(GameMode::Easy));
        assert_eq!(GameMode::from_str("hard"), Some(GameMode::Hard));
        assert_eq!(GameMode::from_str("nightmare"), None);
    }

    #[test]
    fn test_weights_valid_for_all_modes() {
        for mode in [GameMode::Easy, GameMode::Normal, GameMode::Hard] {
            let tuning = Tuning::for_mode(mode);
            assert!(tuning.weights.is_valid(), "{:?}", mode);
        }
    }

    #[test]
    fn test_target_bounds_scale_with_score() {
        let tuning = Tuning::for_mode(GameMode::Normal);
        assert_eq!(tuning.target_bounds(0), (10, 20));
        assert_eq!(tuning.target_bounds(199), (10, 20));
        assert_eq!(tuning.target_bounds(200), (10, 50));
    }

    #[test]
    fn test_target_bounds_never_below_two() {
        let mut tuning = Tuning::default();
        tuning.target = TargetRange {
            min: 0,
            max: 1,
            scale_at: None,
            scaled_max: 1,
        };
        let (min, max) = tuning.target_bounds(0);
        assert_eq!(min, MIN_TARGET);
        assert!(max >= min);
    }
}
