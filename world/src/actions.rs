//! Validation and resolution of unit moves and attacks.
//!
//! Every resolver checks all preconditions before touching state, so a
//! rejected action leaves the grid and roster exactly as they were.

use grid_tactics_core::{AttackError, CellCoord, DamageRange, MoveError, Team, UnitId};
use rand::Rng;

use crate::{
    grid::Grid,
    pathfinding::{find_path, PathMode},
    units::{UnitRoster, UnitState},
};

/// Result of a successful move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MoveOutcome {
    pub(crate) from: CellCoord,
    pub(crate) to: CellCoord,
    pub(crate) path: Vec<CellCoord>,
}

/// Damage dealt back to a melee attacker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CounterOutcome {
    pub(crate) damage: u32,
    pub(crate) attacker_health: u32,
}

/// Unit removed from the board during an exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Casualty {
    pub(crate) unit: UnitId,
    pub(crate) team: Team,
    pub(crate) cell: CellCoord,
}

/// Result of a successful attack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct AttackOutcome {
    pub(crate) damage: u32,
    pub(crate) target_health: u32,
    pub(crate) counter: Option<CounterOutcome>,
    pub(crate) casualties: Vec<Casualty>,
}

/// Moves `unit` to `to` along a shortest path within its movement range.
pub(crate) fn move_unit(
    grid: &mut Grid,
    roster: &mut UnitRoster,
    unit: UnitId,
    to: CellCoord,
) -> Result<MoveOutcome, MoveError> {
    let state = roster.get(unit).ok_or(MoveError::UnknownUnit)?;
    if state.has_moved {
        return Err(MoveError::AlreadyMoved);
    }
    let slot = grid.cell_at(to).ok_or(MoveError::OutOfBounds)?;
    if slot.is_obstacle() {
        return Err(MoveError::Obstacle);
    }
    if slot.occupant().is_some() {
        return Err(MoveError::Occupied);
    }

    let from = state.cell;
    let range = state.stats.movement_range;
    if from.manhattan_distance(to) > range {
        return Err(MoveError::OutOfRange);
    }
    let path = find_path(grid, from, to, range, PathMode::Movement);
    if path.is_empty() {
        return Err(MoveError::NoPathFound);
    }

    let state = roster.get_mut(unit).ok_or(MoveError::UnknownUnit)?;
    state.cell = to;
    state.has_moved = true;
    grid.set_occupant(from, None);
    grid.set_occupant(to, Some(unit));

    Ok(MoveOutcome { from, to, path })
}

/// Reports whether `attacker` may strike `target` right now, ignoring turn
/// ownership.
pub(crate) fn check_attack(
    grid: &Grid,
    roster: &UnitRoster,
    attacker: UnitId,
    target: UnitId,
) -> Result<(), AttackError> {
    let attacking = roster.get(attacker).ok_or(AttackError::UnknownAttacker)?;
    let defending = roster.get(target).ok_or(AttackError::NoTarget)?;
    if attacking.has_attacked {
        return Err(AttackError::AlreadyAttacked);
    }
    if attacking.team == defending.team {
        return Err(AttackError::FriendlyFire);
    }
    within_reach(grid, attacking, defending)
}

/// Range and line rules shared by attacks and target highlighting.
///
/// Melee units need a walkable path no longer than their attack range that
/// ends on the target; ranged units only need the Manhattan distance.
pub(crate) fn within_reach(
    grid: &Grid,
    attacker: &UnitState,
    target: &UnitState,
) -> Result<(), AttackError> {
    let range = attacker.stats.attack_range;
    if attacker.cell.manhattan_distance(target.cell) > range {
        return Err(AttackError::OutOfRange);
    }
    if !attacker.stats.ignores_obstacles_on_attack
        && find_path(grid, attacker.cell, target.cell, range, PathMode::Engagement).is_empty()
    {
        return Err(AttackError::PathBlocked);
    }
    Ok(())
}

/// Resolves an attack, including any melee counter-attack and casualties.
pub(crate) fn attack_unit<R>(
    grid: &mut Grid,
    roster: &mut UnitRoster,
    rng: &mut R,
    counter_damage: DamageRange,
    attacker: UnitId,
    target: UnitId,
) -> Result<AttackOutcome, AttackError>
where
    R: Rng + ?Sized,
{
    check_attack(grid, roster, attacker, target)?;

    let attacking = roster.get_mut(attacker).ok_or(AttackError::UnknownAttacker)?;
    attacking.has_attacked = true;
    let damage_range = attacking.stats.damage;
    let attacker_cell = attacking.cell;

    let damage = roll(rng, damage_range);
    let defending = roster.get_mut(target).ok_or(AttackError::NoTarget)?;
    let target_destroyed = defending.take_damage(damage);
    let target_health = defending.health;
    let melee = defending.cell.is_adjacent(attacker_cell);

    let mut outcome = AttackOutcome {
        damage,
        target_health,
        counter: None,
        casualties: Vec::new(),
    };

    if target_destroyed {
        outcome.casualties.extend(destroy(grid, roster, target));
        return Ok(outcome);
    }

    if melee {
        let damage = roll(rng, counter_damage);
        let attacking = roster.get_mut(attacker).ok_or(AttackError::UnknownAttacker)?;
        let attacker_destroyed = attacking.take_damage(damage);
        outcome.counter = Some(CounterOutcome {
            damage,
            attacker_health: attacking.health,
        });
        if attacker_destroyed {
            outcome.casualties.extend(destroy(grid, roster, attacker));
        }
    }

    Ok(outcome)
}

fn roll<R>(rng: &mut R, range: DamageRange) -> u32
where
    R: Rng + ?Sized,
{
    if range.min >= range.max {
        return range.min;
    }
    rng.gen_range(range.min..=range.max)
}

fn destroy(grid: &mut Grid, roster: &mut UnitRoster, unit: UnitId) -> Option<Casualty> {
    let state = roster.remove(unit)?;
    if grid.occupant(state.cell) == Some(unit) {
        grid.set_occupant(state.cell, None);
    }
    Some(Casualty {
        unit,
        team: state.team,
        cell: state.cell,
    })
}
