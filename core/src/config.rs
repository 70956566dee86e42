//! Match configuration supplied by the host.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Team, UnitKind, UNITS_PER_TEAM};

const DEFAULT_COLUMNS: u32 = 25;
const DEFAULT_ROWS: u32 = 25;
const DEFAULT_CELL_SIZE: f32 = 100.0;
const DEFAULT_OBSTACLE_PROBABILITY: f32 = 0.15;
const DEFAULT_SEED: u64 = 0x5eed_0f_9a1d;
const DEFAULT_PLAYER_HANDOFF_MS: u64 = 1_000;
const DEFAULT_AI_HANDOFF_MS: u64 = 2_000;

/// Inclusive damage interval rolled uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DamageRange {
    /// Smallest damage roll.
    pub min: u32,
    /// Largest damage roll.
    pub max: u32,
}

impl DamageRange {
    /// Creates a damage interval.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Reports whether `value` lies inside the interval.
    #[must_use]
    pub const fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Per-kind combat statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitStats {
    /// Starting health.
    pub health: u32,
    /// Maximum number of steps per move.
    pub movement_range: u32,
    /// Maximum Manhattan distance of an attack.
    pub attack_range: u32,
    /// Damage dealt by a successful attack.
    pub damage: DamageRange,
    /// Ranged units skip the clear-path requirement when attacking.
    #[serde(default)]
    pub ignores_obstacles_on_attack: bool,
}

impl UnitStats {
    /// Close-quarters fighter: sturdy, adjacent attacks only.
    pub const BRAWLER: Self = Self {
        health: 40,
        movement_range: 6,
        attack_range: 1,
        damage: DamageRange::new(1, 6),
        ignores_obstacles_on_attack: false,
    };

    /// Long-range shooter: fragile, fires over obstacles.
    pub const SNIPER: Self = Self {
        health: 20,
        movement_range: 3,
        attack_range: 10,
        damage: DamageRange::new(4, 8),
        ignores_obstacles_on_attack: true,
    };
}

/// Statistics for every unit kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct StatTable {
    /// Statistics applied to brawlers.
    pub brawler: UnitStats,
    /// Statistics applied to snipers.
    pub sniper: UnitStats,
}

impl StatTable {
    /// Looks up the statistics of a unit kind.
    #[must_use]
    pub const fn get(&self, kind: UnitKind) -> UnitStats {
        match kind {
            UnitKind::Brawler => self.brawler,
            UnitKind::Sniper => self.sniper,
        }
    }

    /// Mutable access used to tune a single kind.
    pub fn get_mut(&mut self, kind: UnitKind) -> &mut UnitStats {
        match kind {
            UnitKind::Brawler => &mut self.brawler,
            UnitKind::Sniper => &mut self.sniper,
        }
    }
}

impl Default for StatTable {
    fn default() -> Self {
        Self {
            brawler: UnitStats::BRAWLER,
            sniper: UnitStats::SNIPER,
        }
    }
}

/// Every tunable input of a match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Number of cell columns.
    pub columns: u32,
    /// Number of cell rows.
    pub rows: u32,
    /// Edge length of a cell in world units.
    pub cell_size: f32,
    /// Chance that the generator attempts an obstacle on each cell.
    pub obstacle_probability: f32,
    /// Seed feeding every random draw of the match.
    pub seed: u64,
    /// Per-kind statistics.
    pub units: StatTable,
    /// Damage dealt by a melee counter-attack.
    pub counter_damage: DamageRange,
    /// Delay before control passes from the player to the AI.
    pub player_handoff_delay_ms: u64,
    /// Delay before control passes from the AI to the player.
    pub ai_handoff_delay_ms: u64,
}

impl MatchConfig {
    /// Delay applied when `team` hands the turn over.
    #[must_use]
    pub const fn handoff_delay(&self, team: Team) -> Duration {
        match team {
            Team::Player => Duration::from_millis(self.player_handoff_delay_ms),
            Team::Ai => Duration::from_millis(self.ai_handoff_delay_ms),
        }
    }

    /// Number of cells on the board.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let cells = u64::from(self.columns) * u64::from(self.rows);
        usize::try_from(cells).unwrap_or(usize::MAX)
    }

    /// Checks the configuration for values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(ConfigError::EmptyGrid);
        }

        let required = UNITS_PER_TEAM * Team::ALL.len();
        if self.cell_count() < required {
            return Err(ConfigError::GridTooSmall {
                cells: self.cell_count(),
                required,
            });
        }

        if !(0.0..=1.0).contains(&self.obstacle_probability) {
            return Err(ConfigError::ObstacleProbability(self.obstacle_probability));
        }

        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(ConfigError::CellSize(self.cell_size));
        }

        for kind in UnitKind::ALL {
            let stats = self.units.get(kind);
            if stats.health == 0 {
                return Err(ConfigError::ZeroHealth(kind));
            }
            if stats.attack_range == 0 {
                return Err(ConfigError::ZeroAttackRange(kind));
            }
            if stats.damage.min == 0 || stats.damage.min > stats.damage.max {
                return Err(ConfigError::DamageRange(kind));
            }
        }

        if self.counter_damage.min > self.counter_damage.max {
            return Err(ConfigError::CounterDamageRange);
        }

        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            cell_size: DEFAULT_CELL_SIZE,
            obstacle_probability: DEFAULT_OBSTACLE_PROBABILITY,
            seed: DEFAULT_SEED,
            units: StatTable::default(),
            counter_damage: DamageRange::new(1, 3),
            player_handoff_delay_ms: DEFAULT_PLAYER_HANDOFF_MS,
            ai_handoff_delay_ms: DEFAULT_AI_HANDOFF_MS,
        }
    }
}

/// Configuration values the engine refuses to start with.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The board has no columns or no rows.
    #[error("grid must have at least one column and one row")]
    EmptyGrid,
    /// The board cannot hold every unit.
    #[error("grid has {cells} cells but {required} placements are required")]
    GridTooSmall {
        /// Cells on the board.
        cells: usize,
        /// Cells needed for every placement.
        required: usize,
    },
    /// The obstacle probability lies outside `[0, 1]`.
    #[error("obstacle probability {0} must lie within [0, 1]")]
    ObstacleProbability(f32),
    /// The cell size is not a positive finite number.
    #[error("cell size {0} must be positive")]
    CellSize(f32),
    /// A unit kind starts without health.
    #[error("{0:?} must start with positive health")]
    ZeroHealth(UnitKind),
    /// A unit kind cannot reach any target.
    #[error("{0:?} must have an attack range of at least one")]
    ZeroAttackRange(UnitKind),
    /// A unit kind has an empty or zero damage interval.
    #[error("{0:?} damage must satisfy 0 < min <= max")]
    DamageRange(UnitKind),
    /// The counter-attack interval is inverted.
    #[error("counter damage must satisfy min <= max")]
    CounterDamageRange,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_is_valid() {
        assert_eq!(MatchConfig::default().validate(), Ok(()));
    }

    #[test]
    fn default_stats_follow_unit_roles() {
        let table = StatTable::default();
        let brawler = table.get(UnitKind::Brawler);
        let sniper = table.get(UnitKind::Sniper);

        assert!(brawler.health > sniper.health);
        assert!(brawler.attack_range < sniper.attack_range);
        assert!(!brawler.ignores_obstacles_on_attack);
        assert!(sniper.ignores_obstacles_on_attack);
    }

    #[test]
    fn rejects_inverted_damage() {
        let mut config = MatchConfig::default();
        config.units.get_mut(UnitKind::Sniper).damage = DamageRange::new(9, 2);
        assert_eq!(
            config.validate(),
            Err(ConfigError::DamageRange(UnitKind::Sniper))
        );
    }

    #[test]
    fn rejects_boards_that_cannot_hold_every_unit() {
        let config = MatchConfig {
            columns: 3,
            rows: 1,
            ..MatchConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::GridTooSmall {
                cells: 3,
                required: 4
            })
        );
    }

    #[test]
    fn rejects_probability_outside_unit_interval() {
        let config = MatchConfig {
            obstacle_probability: 1.5,
            ..MatchConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ObstacleProbability(1.5)));
    }

    #[test]
    fn handoff_delay_depends_on_outgoing_team() {
        let config = MatchConfig::default();
        assert_eq!(config.handoff_delay(Team::Player), Duration::from_secs(1));
        assert_eq!(config.handoff_delay(Team::Ai), Duration::from_secs(2));
    }
}
