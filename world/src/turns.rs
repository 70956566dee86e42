//! Bookkeeping for phases, placement order, selection and turn hand-offs.

use std::collections::BTreeMap;

use grid_tactics_core::{
    CellCoord, HandOffTicket, HighlightKind, Intent, Phase, Team, UnitId, UnitKind,
};

/// Unit kinds each team still has to place, plus their pending choice.
#[derive(Clone, Debug)]
pub(crate) struct PlacementLedger {
    remaining: BTreeMap<Team, Vec<UnitKind>>,
    selected: BTreeMap<Team, UnitKind>,
}

impl PlacementLedger {
    pub(crate) fn new() -> Self {
        Self {
            remaining: Team::ALL
                .into_iter()
                .map(|team| (team, UnitKind::ALL.to_vec()))
                .collect(),
            selected: BTreeMap::new(),
        }
    }

    pub(crate) fn remaining(&self, team: Team) -> &[UnitKind] {
        self.remaining
            .get(&team)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub(crate) fn can_place(&self, team: Team, kind: UnitKind) -> bool {
        self.remaining(team).contains(&kind)
    }

    pub(crate) fn selected(&self, team: Team) -> Option<UnitKind> {
        self.selected.get(&team).copied()
    }

    pub(crate) fn select(&mut self, team: Team, kind: UnitKind) {
        let _ = self.selected.insert(team, kind);
    }

    /// Marks `kind` as placed for `team` and clears the pending choice.
    pub(crate) fn consume(&mut self, team: Team, kind: UnitKind) {
        if let Some(kinds) = self.remaining.get_mut(&team) {
            kinds.retain(|remaining| *remaining != kind);
        }
        let _ = self.selected.remove(&team);
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.remaining.values().all(Vec::is_empty)
    }
}

/// Highlight currently requested from the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Highlight {
    pub(crate) kind: HighlightKind,
    pub(crate) cells: Vec<CellCoord>,
}

/// Hand-off waiting for the host timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PendingHandOff {
    pub(crate) ticket: HandOffTicket,
    pub(crate) to: Team,
}

/// Turn-level state machine data owned by the world.
#[derive(Clone, Debug)]
pub(crate) struct TurnState {
    pub(crate) phase: Phase,
    pub(crate) starting_team: Option<Team>,
    pub(crate) active_team: Team,
    pub(crate) turn: u32,
    pub(crate) selected_unit: Option<UnitId>,
    pub(crate) intent: Intent,
    pub(crate) highlight: Option<Highlight>,
    pub(crate) placement: PlacementLedger,
    pub(crate) pending_handoff: Option<PendingHandOff>,
    pub(crate) winner: Option<Team>,
    next_ticket: u64,
}

impl TurnState {
    pub(crate) fn new() -> Self {
        Self {
            phase: Phase::CoinToss,
            starting_team: None,
            active_team: Team::Player,
            turn: 0,
            selected_unit: None,
            intent: Intent::None,
            highlight: None,
            placement: PlacementLedger::new(),
            pending_handoff: None,
            winner: None,
            next_ticket: 0,
        }
    }

    /// Records a pending hand-off to `to` and returns its fresh ticket.
    pub(crate) fn schedule_handoff(&mut self, to: Team) -> HandOffTicket {
        self.next_ticket = self.next_ticket.saturating_add(1);
        let ticket = HandOffTicket::new(self.next_ticket);
        self.pending_handoff = Some(PendingHandOff { ticket, to });
        ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_tracks_each_team_separately() {
        let mut ledger = PlacementLedger::new();
        assert!(ledger.can_place(Team::Player, UnitKind::Sniper));

        ledger.select(Team::Player, UnitKind::Sniper);
        ledger.consume(Team::Player, UnitKind::Sniper);

        assert!(!ledger.can_place(Team::Player, UnitKind::Sniper));
        assert!(ledger.can_place(Team::Ai, UnitKind::Sniper));
        assert_eq!(ledger.selected(Team::Player), None);
        assert_eq!(ledger.remaining(Team::Player), &[UnitKind::Brawler]);
        assert!(!ledger.is_complete());

        ledger.consume(Team::Player, UnitKind::Brawler);
        ledger.consume(Team::Ai, UnitKind::Brawler);
        ledger.consume(Team::Ai, UnitKind::Sniper);
        assert!(ledger.is_complete());
    }

    #[test]
    fn each_handoff_gets_a_fresh_ticket() {
        let mut state = TurnState::new();
        let first = state.schedule_handoff(Team::Ai);
        let second = state.schedule_handoff(Team::Player);

        assert_ne!(first, second);
        assert_eq!(
            state.pending_handoff,
            Some(PendingHandOff {
                ticket: second,
                to: Team::Player
            })
        );
    }
}
