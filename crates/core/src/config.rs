//! Startup configuration
//!
//! Grid size, lane count, timing and every heuristic weight are injected here rather than
//! hardcoded. [`SimConfig::from_env`] layers environment variables over an optional JSON
//! file over the defaults.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::{
    DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH, DEFAULT_FALL_MS, DEFAULT_LANES,
    DEFAULT_MIN_FALL_MS, DEFAULT_SPEED_STEP_MS, DEFAULT_TICK_MS, MAX_BOARD_WIDTH,
    MIN_BOARD_HEIGHT, MIN_LANE_WIDTH,
};

/// How the travel-distance factor is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMode {
    /// Penalize every column of travel.
    #[default]
    Always,
    /// Penalize only placements within one column of home.
    AdjacentOnly,
}

/// Weights of the placement scoring function.
///
/// Rewards are positive, penalties negative. Relative magnitudes are a tuning choice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicWeights {
    /// Per row the placement completes.
    pub complete_lines: f64,
    /// Per empty cell the placement buries directly.
    pub covered_empty: f64,
    /// Per empty cell under occupied cells in the placement's own columns.
    pub nearby_empty: f64,
    /// Times the mean column height.
    pub average_height: f64,
    /// Times the summed (wrapped) neighbour height difference.
    pub height_variation: f64,
    /// Per column between the placement and the spawn column.
    pub distance: f64,
    pub distance_mode: DistanceMode,
    /// Bonus for a four-row clear while the stack is below the midline.
    pub tetris_bonus: f64,
    /// Per row of a smaller clear while the stack is below the midline.
    pub early_clear: f64,
    /// For using the lane's leftmost column (the tetris well) while low.
    pub well_column: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            complete_lines: 8.0,
            covered_empty: -6.0,
            nearby_empty: -1.5,
            average_height: -3.0,
            height_variation: -0.6,
            distance: -0.25,
            distance_mode: DistanceMode::Always,
            tetris_bonus: 0.0,
            early_clear: 0.0,
            well_column: 0.0,
        }
    }
}

impl HeuristicWeights {
    /// Whether the hold-for-a-tetris terms take part in scoring.
    pub fn tetris_strategy(&self) -> bool {
        self.tetris_bonus != 0.0 || self.early_clear != 0.0 || self.well_column != 0.0
    }
}

/// Fall interval ramp applied on every cleared line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedRamp {
    pub step_ms: u32,
    pub min_ms: u32,
}

impl Default for SpeedRamp {
    fn default() -> Self {
        Self {
            step_ms: DEFAULT_SPEED_STEP_MS,
            min_ms: DEFAULT_MIN_FALL_MS,
        }
    }
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub width: u16,
    pub height: u16,
    /// Games running side by side.
    pub lanes: usize,
    /// Milliseconds for a piece to fall one row.
    pub fall_ms: u32,
    /// Simulation tick interval.
    pub tick_ms: u32,
    /// Search-driven steering instead of human input.
    pub autoplay: bool,
    /// Columns the search may use past each side of a lane.
    pub lane_spill: u16,
    pub speed_ramp: Option<SpeedRamp>,
    /// RNG seed; `None` leaves the choice to the front end.
    pub seed: Option<u32>,
    pub weights: HeuristicWeights,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_BOARD_WIDTH,
            height: DEFAULT_BOARD_HEIGHT,
            lanes: DEFAULT_LANES,
            fall_ms: DEFAULT_FALL_MS,
            tick_ms: DEFAULT_TICK_MS,
            autoplay: true,
            lane_spill: 1,
            speed_ramp: None,
            seed: None,
            weights: HeuristicWeights::default(),
        }
    }
}

/// Invalid configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    WidthOutOfRange(u16),
    HeightTooSmall(u16),
    NoLanes,
    LaneTooNarrow { lane_width: u16 },
    SpillTooWide { lane_spill: u16, width: u16 },
    ZeroInterval(&'static str),
    RampTooSlow { min_ms: u32, fall_ms: u32 },
    BadValue { key: String, value: String },
    File { path: String, reason: String },
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::WidthOutOfRange(_)
            | ConfigError::HeightTooSmall(_)
            | ConfigError::NoLanes
            | ConfigError::LaneTooNarrow { .. }
            | ConfigError::SpillTooWide { .. } => "invalid_grid",
            ConfigError::ZeroInterval(_) | ConfigError::RampTooSlow { .. } => "invalid_timing",
            ConfigError::BadValue { .. } => "invalid_env",
            ConfigError::File { .. } => "invalid_file",
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::WidthOutOfRange(w) => {
                write!(f, "board width {} must be within 1..={}", w, MAX_BOARD_WIDTH)
            }
            ConfigError::HeightTooSmall(h) => {
                write!(f, "board height {} must be at least {}", h, MIN_BOARD_HEIGHT)
            }
            ConfigError::NoLanes => write!(f, "at least one lane is required"),
            ConfigError::LaneTooNarrow { lane_width } => write!(
                f,
                "lanes are {} columns wide, need at least {}",
                lane_width, MIN_LANE_WIDTH
            ),
            ConfigError::SpillTooWide { lane_spill, width } => write!(
                f,
                "lane_spill {} exceeds the board width {}",
                lane_spill, width
            ),
            ConfigError::ZeroInterval(name) => write!(f, "{} must be greater than zero", name),
            ConfigError::RampTooSlow { min_ms, fall_ms } => write!(
                f,
                "speed_ramp.min_ms {} is slower than fall_ms {}",
                min_ms, fall_ms
            ),
            ConfigError::BadValue { key, value } => {
                write!(f, "could not parse {}={:?}", key, value)
            }
            ConfigError::File { path, reason } => {
                write!(f, "could not load config file {}: {}", path, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl SimConfig {
    /// Width of the narrowest lane.
    pub fn lane_width(&self) -> u16 {
        if self.lanes == 0 {
            return 0;
        }
        (self.width as usize / self.lanes) as u16
    }

    /// Left edge column of `lane`.
    pub fn lane_left(&self, lane: usize) -> u16 {
        (self.width as usize * lane / self.lanes.max(1)) as u16
    }

    /// Columns owned by `lane`; lanes tile the full width.
    pub fn lane_columns(&self, lane: usize) -> std::ops::Range<u16> {
        self.lane_left(lane)..self.lane_left(lane + 1)
    }

    /// Delay between the first spawns of consecutive lanes.
    pub fn drop_spacing_ms(&self) -> u64 {
        self.height as u64 * self.fall_ms as u64 / self.lanes.max(1) as u64
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.width > MAX_BOARD_WIDTH {
            return Err(ConfigError::WidthOutOfRange(self.width));
        }
        if self.height < MIN_BOARD_HEIGHT {
            return Err(ConfigError::HeightTooSmall(self.height));
        }
        if self.lanes == 0 {
            return Err(ConfigError::NoLanes);
        }
        if self.lane_width() < MIN_LANE_WIDTH {
            return Err(ConfigError::LaneTooNarrow {
                lane_width: self.lane_width(),
            });
        }
        if self.lane_spill > self.width {
            return Err(ConfigError::SpillTooWide {
                lane_spill: self.lane_spill,
                width: self.width,
            });
        }
        if self.fall_ms == 0 {
            return Err(ConfigError::ZeroInterval("fall_ms"));
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroInterval("tick_ms"));
        }
        if let Some(ramp) = self.speed_ramp {
            if ramp.min_ms == 0 {
                return Err(ConfigError::ZeroInterval("speed_ramp.min_ms"));
            }
            if ramp.min_ms > self.fall_ms {
                return Err(ConfigError::RampTooSlow {
                    min_ms: ramp.min_ms,
                    fall_ms: self.fall_ms,
                });
            }
        }
        Ok(())
    }

    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::File {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::File {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| ConfigError::File {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Build from the process environment.
    ///
    /// `TETRIS_WALL_CONFIG` names an optional JSON file; `TETRIS_WALL_WIDTH`, `_HEIGHT`,
    /// `_LANES`, `_FALL_MS`, `_TICK_MS`, `_AUTOPLAY` and `_SEED` override single fields.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`SimConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match lookup("TETRIS_WALL_CONFIG")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
        {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(v) = parse_var(&lookup, "TETRIS_WALL_WIDTH")? {
            config.width = v;
        }
        if let Some(v) = parse_var(&lookup, "TETRIS_WALL_HEIGHT")? {
            config.height = v;
        }
        if let Some(v) = parse_var(&lookup, "TETRIS_WALL_LANES")? {
            config.lanes = v;
        }
        if let Some(v) = parse_var(&lookup, "TETRIS_WALL_FALL_MS")? {
            config.fall_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "TETRIS_WALL_TICK_MS")? {
            config.tick_ms = v;
        }
        if let Some(v) = lookup("TETRIS_WALL_AUTOPLAY") {
            config.autoplay = match v.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::BadValue {
                        key: "TETRIS_WALL_AUTOPLAY".to_string(),
                        value: v,
                    })
                }
            };
        }
        if let Some(v) = parse_var(&lookup, "TETRIS_WALL_SEED")? {
            config.seed = Some(v);
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::BadValue {
                key: key.to_string(),
                value: raw,
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.lane_width(), 16);
        assert_eq!(config.lane_left(3), 48);
        assert_eq!(config.lane_columns(5), 80..96);
        assert_eq!(config.drop_spacing_ms(), 64 * 300 / 6);
    }

    #[test]
    fn env_overrides_fields() {
        let config = SimConfig::from_lookup(lookup_from(&[
            ("TETRIS_WALL_WIDTH", "10"),
            ("TETRIS_WALL_HEIGHT", "20"),
            ("TETRIS_WALL_LANES", "1"),
            ("TETRIS_WALL_AUTOPLAY", "off"),
            ("TETRIS_WALL_SEED", "42"),
        ]))
        .unwrap();
        assert_eq!((config.width, config.height, config.lanes), (10, 20, 1));
        assert!(!config.autoplay);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn env_rejects_garbage() {
        let err = SimConfig::from_lookup(lookup_from(&[("TETRIS_WALL_LANES", "six")]))
            .unwrap_err();
        assert_eq!(err.code(), "invalid_env");
    }

    #[test]
    fn validate_rejects_narrow_lanes() {
        let config = SimConfig {
            width: 20,
            lanes: 6,
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::LaneTooNarrow { lane_width: 3 })
        );
    }

    #[test]
    fn validate_rejects_wide_board() {
        let config = SimConfig {
            width: 129,
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::WidthOutOfRange(129)));
    }

    #[test]
    fn validate_rejects_short_board_with_height_message() {
        let config = SimConfig {
            height: 3,
            ..SimConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err, ConfigError::HeightTooSmall(3));
        assert_eq!(err.to_string(), "board height 3 must be at least 4");
    }

    #[test]
    fn validate_rejects_spill_wider_than_board() {
        let config = SimConfig {
            lane_spill: u16::MAX,
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::SpillTooWide {
                lane_spill: u16::MAX,
                width: DEFAULT_BOARD_WIDTH,
            })
        );
    }

    #[test]
    fn validate_rejects_ramp_floor_above_base_speed() {
        let config = SimConfig {
            fall_ms: 100,
            speed_ramp: Some(SpeedRamp {
                step_ms: 5,
                min_ms: 150,
            }),
            ..SimConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.code(), "invalid_timing");
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let config = SimConfig::from_json(
            r#"{"lanes": 2, "speed_ramp": {"step_ms": 5, "min_ms": 100},
                "weights": {"distance_mode": "adjacent_only", "tetris_bonus": 20.0}}"#,
        )
        .unwrap();
        assert_eq!(config.lanes, 2);
        assert_eq!(config.width, DEFAULT_BOARD_WIDTH);
        assert_eq!(
            config.speed_ramp,
            Some(SpeedRamp {
                step_ms: 5,
                min_ms: 100
            })
        );
        assert_eq!(config.weights.distance_mode, DistanceMode::AdjacentOnly);
        assert!(config.weights.tetris_strategy());
        assert_eq!(config.weights.complete_lines, HeuristicWeights::default().complete_lines);
    }
}
