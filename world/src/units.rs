//! Authoritative unit state management utilities.

use std::collections::BTreeMap;

use grid_tactics_core::{CellCoord, Team, UnitId, UnitKind, UnitSnapshot, UnitStats};

/// State of a living unit stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct UnitState {
    /// Identifier allocated by the world for the unit.
    pub(crate) id: UnitId,
    /// Team owning the unit.
    pub(crate) team: Team,
    /// Kind the unit was placed as.
    pub(crate) kind: UnitKind,
    /// Statistics captured at placement time.
    pub(crate) stats: UnitStats,
    /// Remaining health; the unit is removed when it reaches zero.
    pub(crate) health: u32,
    /// Cell the unit stands on.
    pub(crate) cell: CellCoord,
    pub(crate) has_moved: bool,
    pub(crate) has_attacked: bool,
}

impl UnitState {
    pub(crate) fn snapshot(&self, selected: bool) -> UnitSnapshot {
        UnitSnapshot {
            id: self.id,
            team: self.team,
            kind: self.kind,
            cell: self.cell,
            health: self.health,
            max_health: self.stats.health,
            has_moved: self.has_moved,
            has_attacked: self.has_attacked,
            selected,
        }
    }

    /// Subtracts damage and reports whether the unit was destroyed.
    pub(crate) fn take_damage(&mut self, amount: u32) -> bool {
        self.health = self.health.saturating_sub(amount);
        self.health == 0
    }

    pub(crate) fn reset_turn(&mut self) {
        self.has_moved = false;
        self.has_attacked = false;
    }
}

/// Registry that stores units and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct UnitRoster {
    entries: BTreeMap<UnitId, UnitState>,
    next_unit_id: UnitId,
}

impl UnitRoster {
    /// Creates an empty roster with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_unit_id: UnitId::new(0),
        }
    }

    /// Inserts a new unit at full health and returns its identifier.
    pub(crate) fn spawn(
        &mut self,
        team: Team,
        kind: UnitKind,
        stats: UnitStats,
        cell: CellCoord,
    ) -> UnitId {
        let id = self.next_unit_id;
        self.next_unit_id = UnitId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(
            id,
            UnitState {
                id,
                team,
                kind,
                stats,
                health: stats.health,
                cell,
                has_moved: false,
                has_attacked: false,
            },
        );
        id
    }

    pub(crate) fn get(&self, id: UnitId) -> Option<&UnitState> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: UnitId) -> Option<&mut UnitState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: UnitId) -> Option<UnitState> {
        self.entries.remove(&id)
    }

    /// Iterator over every living unit in identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &UnitState> {
        self.entries.values()
    }

    /// Iterator over the living units of one team in identifier order.
    pub(crate) fn team(&self, team: Team) -> impl Iterator<Item = &UnitState> {
        self.entries.values().filter(move |unit| unit.team == team)
    }

    pub(crate) fn team_size(&self, team: Team) -> usize {
        self.team(team).count()
    }

    pub(crate) fn reset_team(&mut self, team: Team) {
        self.entries
            .values_mut()
            .filter(|unit| unit.team == team)
            .for_each(UnitState::reset_turn);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_starts_empty_with_zero_identifier() {
        let roster = UnitRoster::new();
        assert!(roster.entries.is_empty());
        assert_eq!(roster.next_unit_id.get(), 0);
    }

    #[test]
    fn spawn_allocates_sequential_identifiers_at_full_health() {
        let mut roster = UnitRoster::new();
        let first = roster.spawn(
            Team::Player,
            UnitKind::Sniper,
            UnitStats::SNIPER,
            CellCoord::new(0, 0),
        );
        let second = roster.spawn(
            Team::Ai,
            UnitKind::Brawler,
            UnitStats::BRAWLER,
            CellCoord::new(1, 0),
        );

        assert_eq!(first, UnitId::new(0));
        assert_eq!(second, UnitId::new(1));
        assert_eq!(roster.get(second).map(|unit| unit.health), Some(40));
        assert_eq!(roster.team_size(Team::Player), 1);
    }

    #[test]
    fn damage_clamps_at_zero() {
        let mut roster = UnitRoster::new();
        let id = roster.spawn(
            Team::Player,
            UnitKind::Sniper,
            UnitStats::SNIPER,
            CellCoord::new(0, 0),
        );
        let unit = roster.get_mut(id).expect("unit exists");

        assert!(!unit.take_damage(15));
        assert_eq!(unit.health, 5);
        assert!(unit.take_damage(8));
        assert_eq!(unit.health, 0);
    }

    #[test]
    fn reset_only_touches_one_team() {
        let mut roster = UnitRoster::new();
        let player = roster.spawn(
            Team::Player,
            UnitKind::Brawler,
            UnitStats::BRAWLER,
            CellCoord::new(0, 0),
        );
        let ai = roster.spawn(
            Team::Ai,
            UnitKind::Brawler,
            UnitStats::BRAWLER,
            CellCoord::new(2, 0),
        );
        for id in [player, ai] {
            let unit = roster.get_mut(id).expect("unit exists");
            unit.has_moved = true;
            unit.has_attacked = true;
        }

        roster.reset_team(Team::Ai);

        let player_state = roster.get(player).expect("player unit");
        let ai_state = roster.get(ai).expect("ai unit");
        assert!(player_state.has_moved && player_state.has_attacked);
        assert!(!ai_state.has_moved && !ai_state.has_attacked);
        assert!(!ai_state.snapshot(false).is_exhausted());
    }
}
