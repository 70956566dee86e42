#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Computer opponent that drives one team through placement and combat.
//!
//! The system issues one command per invocation while its team is acting, so
//! the host observes the outcome of every move and attack before the next one
//! is chosen. It never mutates the world directly.

use std::collections::BTreeSet;

use grid_tactics_core::{
    CellCoord, Command, Event, Phase, PlacementError, Team, UnitId, UnitKind, UnitSnapshot,
    UnitView,
};
use grid_tactics_world::{query, PathMode, World};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

/// Configuration parameters required to construct the AI system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    team: Team,
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration for the team the AI controls.
    #[must_use]
    pub const fn new(team: Team, rng_seed: u64) -> Self {
        Self { team, rng_seed }
    }
}

/// Pure system that plays one team.
#[derive(Debug)]
pub struct Ai {
    team: Team,
    rng: ChaCha8Rng,
    placement_due: bool,
    acting: bool,
    end_requested: bool,
    tried_moves: BTreeSet<UnitId>,
    tried_attacks: BTreeSet<UnitId>,
}

impl Ai {
    /// Creates a new AI using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            team: config.team,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            placement_due: false,
            acting: false,
            end_requested: false,
            tried_moves: BTreeSet::new(),
            tried_attacks: BTreeSet::new(),
        }
    }

    /// Team controlled by this AI.
    #[must_use]
    pub const fn team(&self) -> Team {
        self.team
    }

    /// Consumes events and the world state to emit the next commands.
    pub fn handle(&mut self, events: &[Event], world: &World, out: &mut Vec<Command>) {
        if events.is_empty() {
            return;
        }
        self.observe(events);

        if self.placement_due {
            self.placement_due = false;
            self.place(world, out);
            return;
        }

        if self.acting {
            self.act(world, out);
        }
    }

    fn observe(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::PlacementTurnStarted { team } => self.placement_due = *team == self.team,
                Event::PlacementRejected { team, cell, reason }
                    if *team == self.team && cell.is_some() =>
                {
                    debug!(?team, %reason, "placement rejected");
                    self.placement_due = matches!(
                        reason,
                        PlacementError::Occupied
                            | PlacementError::Obstacle
                            | PlacementError::OutOfBounds
                    );
                }
                Event::TurnStarted { team, .. } if *team == self.team => {
                    self.acting = true;
                    self.end_requested = false;
                    self.tried_moves.clear();
                    self.tried_attacks.clear();
                }
                Event::TurnStarted { .. } | Event::TurnCompleted { .. } | Event::GameOver { .. } => {
                    self.acting = false;
                }
                _ => {}
            }
        }
    }

    fn place(&mut self, world: &World, out: &mut Vec<Command>) {
        match self.choose_placement(world) {
            Ok((kind, cell)) => {
                debug!(team = ?self.team, ?kind, cell = %cell.label(), "ai placement chosen");
                out.push(Command::SelectUnitKind {
                    team: self.team,
                    kind,
                });
                out.push(Command::PlaceUnit {
                    team: self.team,
                    cell,
                });
            }
            Err(reason) => warn!(team = ?self.team, %reason, "ai cannot place a unit"),
        }
    }

    fn choose_placement(&mut self, world: &World) -> Result<(UnitKind, CellCoord), PlacementError> {
        let remaining = query::units_to_place(world, self.team);
        let kind = *remaining
            .choose(&mut self.rng)
            .ok_or(PlacementError::KindExhausted)?;
        let cell = query::find_random_empty_cell(world, &mut self.rng)
            .ok_or(PlacementError::NoEmptyCellAvailable)?;
        Ok((kind, cell))
    }

    fn act(&mut self, world: &World, out: &mut Vec<Command>) {
        if query::phase(world) != Phase::UnitAction
            || query::active_team(world) != Some(self.team)
            || query::pending_handoff(world).is_some()
        {
            return;
        }

        let view = query::unit_view(world);
        let own: Vec<UnitSnapshot> = view.team(self.team).copied().collect();

        for unit in &own {
            if unit.has_moved || !self.tried_moves.insert(unit.id) {
                continue;
            }
            if let Some(to) = approach_destination(world, &view, unit) {
                out.push(Command::MoveUnit { unit: unit.id, to });
                return;
            }
        }

        for unit in &own {
            if unit.has_attacked || !self.tried_attacks.insert(unit.id) {
                continue;
            }
            if let Some(target) = weakest_target(world, &view, unit) {
                out.push(Command::AttackUnit {
                    attacker: unit.id,
                    target,
                });
                return;
            }
        }

        if !self.end_requested {
            self.end_requested = true;
            out.push(Command::EndTurn { team: self.team });
        }
    }
}

/// Enemy closest to `unit` by Manhattan distance, ties broken by identifier.
fn nearest_enemy<'a>(view: &'a UnitView, unit: &UnitSnapshot) -> Option<&'a UnitSnapshot> {
    view.team(unit.team.opponent())
        .min_by_key(|enemy| (unit.cell.manhattan_distance(enemy.cell), enemy.id))
}

/// Cell that brings `unit` as close as its movement allows to the nearest
/// enemy, or `None` when it is already adjacent or cannot get closer.
fn approach_destination(world: &World, view: &UnitView, unit: &UnitSnapshot) -> Option<CellCoord> {
    let enemy = nearest_enemy(view, unit)?;
    if unit.cell.is_adjacent(enemy.cell) {
        return None;
    }
    let movement = query::config(world).units.get(unit.kind).movement_range;
    let movement = usize::try_from(movement).ok()?;
    let grid = query::grid(world);
    let unbounded = grid.columns().saturating_mul(grid.rows());

    let route = query::find_path(world, unit.cell, enemy.cell, unbounded, PathMode::Engagement);
    let steps = route.len().saturating_sub(1).min(movement);
    if steps > 0 {
        return route.get(steps - 1).copied();
    }

    let current = unit.cell.manhattan_distance(enemy.cell);
    query::reachable_cells(world, unit.id)
        .into_iter()
        .filter(|cell| cell.manhattan_distance(enemy.cell) < current)
        .min_by_key(|cell| (cell.manhattan_distance(enemy.cell), cell.row(), cell.column()))
}

/// Attackable enemy with the least health, then the closest, then the oldest.
fn weakest_target(world: &World, view: &UnitView, unit: &UnitSnapshot) -> Option<UnitId> {
    query::attack_targets(world, unit.id)
        .into_iter()
        .filter_map(|target| view.get(target))
        .min_by_key(|target| {
            (
                target.health,
                unit.cell.manhattan_distance(target.cell),
                target.id,
            )
        })
        .map(|target| target.id)
}
