#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative match state for Grid Tactics.
//!
//! The world owns the board, the units and the turn state machine. Every
//! mutation goes through [`apply`], which fully resolves one command before
//! returning and reports the outcome as events. Read access goes through the
//! [`query`] module.

mod actions;
mod grid;
mod obstacles;
mod pathfinding;
mod turns;
mod units;

use grid_tactics_core::{
    AttackError, CellCoord, Command, ConfigError, Event, HandOffTicket, HighlightKind, Intent,
    IntentError, MatchConfig, MoveError, ObstacleError, Phase, PlacementError, Team, UnitId,
    UnitKind, UNITS_PER_TEAM,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, info};

pub use grid::{Cell, Grid};
pub use pathfinding::PathMode;

use turns::{Highlight, TurnState};
use units::{UnitRoster, UnitState};

/// Reasons a match cannot be created.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum WorldError {
    /// The configuration holds values the engine cannot run with.
    #[error("invalid match configuration: {0}")]
    Config(#[from] ConfigError),
    /// The generated board leaves too few free cells for every placement.
    #[error("board has {available} free cells but {required} are required")]
    InsufficientFreeCells {
        /// Free cells left after obstacle generation.
        available: usize,
        /// Cells needed for every placement.
        required: usize,
    },
}

/// Represents the authoritative Grid Tactics match state.
#[derive(Debug)]
pub struct World {
    config: MatchConfig,
    grid: Grid,
    units: UnitRoster,
    turn: TurnState,
    rng: ChaCha8Rng,
}

impl World {
    /// Validates the configuration, generates the board and waits for the coin toss.
    pub fn new(config: MatchConfig) -> Result<Self, WorldError> {
        config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut grid = Grid::new(config.columns, config.rows, config.cell_size);
        let mask = obstacles::generate(
            config.columns,
            config.rows,
            config.obstacle_probability,
            &mut rng,
        );
        grid.apply_obstacle_mask(&mask);

        let available = grid.empty_cells().count();
        let required = UNITS_PER_TEAM * Team::ALL.len();
        if available < required {
            return Err(WorldError::InsufficientFreeCells {
                available,
                required,
            });
        }

        info!(
            columns = config.columns,
            rows = config.rows,
            obstacles = grid.cell_count() - available,
            seed = config.seed,
            "generated board"
        );

        Ok(Self {
            config,
            grid,
            units: UnitRoster::new(),
            turn: TurnState::new(),
            rng,
        })
    }

    fn set_obstacle(&mut self, cell: CellCoord, obstacle: bool, out_events: &mut Vec<Event>) {
        let reason = match self.grid.cell_at(cell) {
            None => Some(ObstacleError::OutOfBounds),
            Some(slot) if slot.occupant().is_some() => Some(ObstacleError::Occupied),
            Some(_) => None,
        };
        if let Some(reason) = reason {
            debug!(cell = %cell.label(), %reason, "obstacle edit rejected");
            out_events.push(Event::ObstacleRejected { cell, reason });
            return;
        }

        self.grid.set_obstacle(cell, obstacle);
        debug!(cell = %cell.label(), obstacle, "obstacle edited");
        out_events.push(Event::ObstacleChanged { cell, obstacle });
    }

    fn toss_coin(&mut self, out_events: &mut Vec<Event>) {
        if self.turn.phase != Phase::CoinToss {
            debug!(phase = ?self.turn.phase, "coin toss ignored outside the coin toss phase");
            return;
        }

        let starting = if self.rng.gen_bool(0.5) {
            Team::Player
        } else {
            Team::Ai
        };
        self.turn.starting_team = Some(starting);
        self.turn.active_team = starting;
        self.turn.phase = Phase::Placement;

        info!(?starting, "coin toss decided the starting team");
        out_events.push(Event::CoinTossed { starting });
        out_events.push(Event::PhaseChanged {
            phase: Phase::Placement,
        });
        out_events.push(Event::PlacementTurnStarted { team: starting });
    }

    fn select_unit_kind(&mut self, team: Team, kind: UnitKind, out_events: &mut Vec<Event>) {
        let reason = if self.turn.phase != Phase::Placement {
            Some(PlacementError::InvalidPhase)
        } else if !self.turn.placement.can_place(team, kind) {
            Some(PlacementError::KindExhausted)
        } else {
            None
        };
        if let Some(reason) = reason {
            debug!(?team, ?kind, %reason, "unit kind selection rejected");
            out_events.push(Event::PlacementRejected {
                team,
                cell: None,
                reason,
            });
            return;
        }

        self.turn.placement.select(team, kind);
        out_events.push(Event::UnitKindSelected { team, kind });
    }

    fn validate_placement(&self, team: Team, cell: CellCoord) -> Result<UnitKind, PlacementError> {
        if self.turn.phase != Phase::Placement {
            return Err(PlacementError::InvalidPhase);
        }
        if team != self.turn.active_team {
            return Err(PlacementError::OutOfTurn);
        }
        let kind = self
            .turn
            .placement
            .selected(team)
            .ok_or(PlacementError::NoKindSelected)?;
        if !self.turn.placement.can_place(team, kind) {
            return Err(PlacementError::KindExhausted);
        }
        let slot = self.grid.cell_at(cell).ok_or(PlacementError::OutOfBounds)?;
        if slot.is_obstacle() {
            return Err(PlacementError::Obstacle);
        }
        if slot.occupant().is_some() {
            return Err(PlacementError::Occupied);
        }
        Ok(kind)
    }

    fn place_unit(&mut self, team: Team, cell: CellCoord, out_events: &mut Vec<Event>) {
        let kind = match self.validate_placement(team, cell) {
            Ok(kind) => kind,
            Err(reason) => {
                debug!(?team, cell = %cell.label(), %reason, "placement rejected");
                out_events.push(Event::PlacementRejected {
                    team,
                    cell: Some(cell),
                    reason,
                });
                return;
            }
        };

        let stats = self.config.units.get(kind);
        let unit = self.units.spawn(team, kind, stats, cell);
        self.grid.set_occupant(cell, Some(unit));
        self.turn.placement.consume(team, kind);

        info!(?team, ?kind, cell = %cell.label(), "unit placed");
        out_events.push(Event::UnitPlaced {
            unit,
            team,
            kind,
            cell,
        });

        if self.turn.placement.is_complete() {
            self.start_unit_action(out_events);
            return;
        }

        let next = if self.turn.placement.remaining(team.opponent()).is_empty() {
            team
        } else {
            team.opponent()
        };
        self.turn.active_team = next;
        out_events.push(Event::PlacementTurnStarted { team: next });
    }

    fn start_unit_action(&mut self, out_events: &mut Vec<Event>) {
        self.turn.phase = Phase::UnitAction;
        info!("all units placed, combat begins");
        out_events.push(Event::PhaseChanged {
            phase: Phase::UnitAction,
        });

        let starting = self.turn.starting_team.unwrap_or(self.turn.active_team);
        self.begin_turn(starting, 1, out_events);
    }

    fn begin_turn(&mut self, team: Team, turn: u32, out_events: &mut Vec<Event>) {
        self.turn.active_team = team;
        self.turn.turn = turn;
        self.units.reset_team(team);

        info!(?team, turn, "turn started");
        out_events.push(Event::TurnStarted { team, turn });

        self.check_turn_completion(out_events);
    }

    fn intent_guard(&self) -> Result<(), IntentError> {
        if self.turn.phase != Phase::UnitAction {
            return Err(IntentError::InvalidPhase);
        }
        if self.turn.pending_handoff.is_some() {
            return Err(IntentError::HandOffPending);
        }
        Ok(())
    }

    fn selected_state(&self) -> Result<&UnitState, IntentError> {
        let unit = self.turn.selected_unit.ok_or(IntentError::NothingSelected)?;
        self.units.get(unit).ok_or(IntentError::UnknownUnit)
    }

    fn select_unit(&mut self, unit: UnitId, out_events: &mut Vec<Event>) {
        if let Err(reason) = self.intent_guard() {
            return reject_intent(reason, out_events);
        }
        let Some(state) = self.units.get(unit) else {
            return reject_intent(IntentError::UnknownUnit, out_events);
        };
        if state.team != self.turn.active_team {
            return reject_intent(IntentError::NotActiveTeam, out_events);
        }
        let exhausted = state.has_moved && state.has_attacked;

        if self.turn.selected_unit == Some(unit) {
            if self.turn.intent == Intent::AwaitingMoveTarget {
                self.clear_selection_state(out_events);
                return;
            }
            self.clear_highlight(out_events);
            out_events.push(Event::UnitSelected { unit });
            return;
        }

        if exhausted {
            return reject_intent(IntentError::UnitExhausted, out_events);
        }

        self.clear_highlight(out_events);
        self.turn.selected_unit = Some(unit);
        debug!(unit = unit.get(), "unit selected");
        out_events.push(Event::UnitSelected { unit });
    }

    fn request_move(&mut self, out_events: &mut Vec<Event>) {
        if let Err(reason) = self.intent_guard() {
            return reject_intent(reason, out_events);
        }
        let (cell, range) = match self.selected_state() {
            Ok(state) if state.has_moved => {
                return reject_intent(IntentError::AlreadyMoved, out_events)
            }
            Ok(state) => (state.cell, state.stats.movement_range),
            Err(reason) => return reject_intent(reason, out_events),
        };

        let cells = pathfinding::reachable_cells(&self.grid, cell, range);
        debug!(from = %cell.label(), reachable = cells.len(), "movement range computed");
        self.show_highlight(HighlightKind::Movement, cells, out_events);
    }

    fn request_attack(&mut self, out_events: &mut Vec<Event>) {
        if let Err(reason) = self.intent_guard() {
            return reject_intent(reason, out_events);
        }
        let cells = match self.selected_state() {
            Ok(state) if state.has_attacked => {
                return reject_intent(IntentError::AlreadyAttacked, out_events)
            }
            Ok(state) => self
                .attack_targets_of(state)
                .into_iter()
                .map(|(_, cell)| cell)
                .collect::<Vec<_>>(),
            Err(reason) => return reject_intent(reason, out_events),
        };

        debug!(targets = cells.len(), "attack targets computed");
        self.show_highlight(HighlightKind::Attack, cells, out_events);
    }

    fn show_highlight(
        &mut self,
        kind: HighlightKind,
        mut cells: Vec<CellCoord>,
        out_events: &mut Vec<Event>,
    ) {
        cells.sort_by_key(|cell| (cell.row(), cell.column()));
        self.turn.intent = match kind {
            HighlightKind::Movement => Intent::AwaitingMoveTarget,
            HighlightKind::Attack => Intent::AwaitingAttackTarget,
        };
        self.turn.highlight = Some(Highlight {
            kind,
            cells: cells.clone(),
        });
        out_events.push(Event::HighlightChanged { kind, cells });
    }

    fn choose_target(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        if let Err(reason) = self.intent_guard() {
            return reject_intent(reason, out_events);
        }
        let Some(unit) = self.turn.selected_unit else {
            return reject_intent(IntentError::NothingSelected, out_events);
        };

        match self.turn.intent {
            Intent::None => reject_intent(IntentError::NoPendingIntent, out_events),
            Intent::AwaitingMoveTarget => self.resolve_move(unit, cell, out_events),
            Intent::AwaitingAttackTarget => match self.grid.occupant(cell) {
                Some(target) => self.resolve_attack(unit, target, out_events),
                None => {
                    debug!(cell = %cell.label(), "attack target cell is empty");
                    out_events.push(Event::AttackRejected {
                        attacker: unit,
                        reason: AttackError::NoTarget,
                    });
                }
            },
        }
    }

    fn move_unit(&mut self, unit: UnitId, to: CellCoord, out_events: &mut Vec<Event>) {
        let guard = if self.turn.phase != Phase::UnitAction {
            Err(MoveError::InvalidPhase)
        } else {
            match self.units.get(unit) {
                None => Err(MoveError::UnknownUnit),
                Some(state)
                    if state.team != self.turn.active_team
                        || self.turn.pending_handoff.is_some() =>
                {
                    Err(MoveError::OutOfTurn)
                }
                Some(_) => Ok(()),
            }
        };
        if let Err(reason) = guard {
            debug!(unit = unit.get(), to = %to.label(), %reason, "move rejected");
            out_events.push(Event::MoveRejected { unit, to, reason });
            return;
        }

        self.resolve_move(unit, to, out_events);
    }

    fn resolve_move(&mut self, unit: UnitId, to: CellCoord, out_events: &mut Vec<Event>) {
        match actions::move_unit(&mut self.grid, &mut self.units, unit, to) {
            Ok(outcome) => {
                debug!(
                    unit = unit.get(),
                    from = %outcome.from.label(),
                    to = %outcome.to.label(),
                    steps = outcome.path.len(),
                    "unit moved"
                );
                out_events.push(Event::UnitMoved {
                    unit,
                    from: outcome.from,
                    to: outcome.to,
                    path: outcome.path,
                });
                if self.turn.selected_unit == Some(unit) {
                    self.clear_selection_state(out_events);
                }
                self.check_turn_completion(out_events);
            }
            Err(reason) => {
                debug!(unit = unit.get(), to = %to.label(), %reason, "move rejected");
                out_events.push(Event::MoveRejected { unit, to, reason });
            }
        }
    }

    fn attack_unit(&mut self, attacker: UnitId, target: UnitId, out_events: &mut Vec<Event>) {
        let guard = if self.turn.phase != Phase::UnitAction {
            Err(AttackError::InvalidPhase)
        } else {
            match self.units.get(attacker) {
                None => Err(AttackError::UnknownAttacker),
                Some(state)
                    if state.team != self.turn.active_team
                        || self.turn.pending_handoff.is_some() =>
                {
                    Err(AttackError::OutOfTurn)
                }
                Some(_) => Ok(()),
            }
        };
        if let Err(reason) = guard {
            debug!(attacker = attacker.get(), %reason, "attack rejected");
            out_events.push(Event::AttackRejected { attacker, reason });
            return;
        }

        self.resolve_attack(attacker, target, out_events);
    }

    fn resolve_attack(&mut self, attacker: UnitId, target: UnitId, out_events: &mut Vec<Event>) {
        let counter_damage = self.config.counter_damage;
        let outcome = match actions::attack_unit(
            &mut self.grid,
            &mut self.units,
            &mut self.rng,
            counter_damage,
            attacker,
            target,
        ) {
            Ok(outcome) => outcome,
            Err(reason) => {
                debug!(attacker = attacker.get(), target = target.get(), %reason, "attack rejected");
                out_events.push(Event::AttackRejected { attacker, reason });
                return;
            }
        };

        debug!(
            attacker = attacker.get(),
            target = target.get(),
            damage = outcome.damage,
            remaining = outcome.target_health,
            "attack resolved"
        );
        out_events.push(Event::UnitAttacked {
            attacker,
            target,
            damage: outcome.damage,
            remaining_health: outcome.target_health,
        });
        if let Some(counter) = outcome.counter {
            debug!(
                unit = target.get(),
                damage = counter.damage,
                remaining = counter.attacker_health,
                "counter-attack resolved"
            );
            out_events.push(Event::CounterAttacked {
                unit: target,
                target: attacker,
                damage: counter.damage,
                remaining_health: counter.attacker_health,
            });
        }
        for casualty in &outcome.casualties {
            info!(
                unit = casualty.unit.get(),
                team = ?casualty.team,
                cell = %casualty.cell.label(),
                "unit destroyed"
            );
            out_events.push(Event::UnitDestroyed {
                unit: casualty.unit,
                team: casualty.team,
                cell: casualty.cell,
            });
        }

        let selection_spent = self
            .turn
            .selected_unit
            .is_some_and(|selected| selected == attacker || self.units.get(selected).is_none());
        if selection_spent {
            self.clear_selection_state(out_events);
        }

        if self.check_game_over(out_events) {
            return;
        }
        self.check_turn_completion(out_events);
    }

    fn end_turn(&mut self, team: Team, out_events: &mut Vec<Event>) {
        if self.turn.phase != Phase::UnitAction {
            return reject_intent(IntentError::InvalidPhase, out_events);
        }
        if team != self.turn.active_team {
            return reject_intent(IntentError::NotActiveTeam, out_events);
        }
        if self.turn.pending_handoff.is_some() {
            return reject_intent(IntentError::HandOffPending, out_events);
        }
        self.complete_turn(out_events);
    }

    fn check_turn_completion(&mut self, out_events: &mut Vec<Event>) {
        if self.turn.phase != Phase::UnitAction || self.turn.pending_handoff.is_some() {
            return;
        }
        let team = self.turn.active_team;
        let finished = self
            .units
            .team(team)
            .all(|unit| !self.can_still_act(unit));
        if finished {
            self.complete_turn(out_events);
        }
    }

    fn complete_turn(&mut self, out_events: &mut Vec<Event>) {
        let team = self.turn.active_team;
        self.clear_selection_state(out_events);

        info!(?team, turn = self.turn.turn, "turn completed");
        out_events.push(Event::TurnCompleted { team });

        let to = team.opponent();
        let delay = self.config.handoff_delay(team);
        let ticket = self.turn.schedule_handoff(to);
        debug!(ticket = ticket.get(), ?to, ?delay, "hand-off scheduled");
        out_events.push(Event::HandOffScheduled { ticket, to, delay });
    }

    fn fire_handoff(&mut self, ticket: HandOffTicket, out_events: &mut Vec<Event>) {
        let pending = match self.turn.pending_handoff {
            Some(pending) if pending.ticket == ticket && self.turn.phase == Phase::UnitAction => {
                pending
            }
            _ => {
                debug!(ticket = ticket.get(), "stale hand-off ignored");
                out_events.push(Event::StaleHandOffIgnored { ticket });
                return;
            }
        };

        self.turn.pending_handoff = None;
        let turn = self.turn.turn.saturating_add(1);
        self.begin_turn(pending.to, turn, out_events);
    }

    fn check_game_over(&mut self, out_events: &mut Vec<Event>) -> bool {
        let Some(loser) = Team::ALL
            .into_iter()
            .find(|team| self.units.team_size(*team) == 0)
        else {
            return false;
        };

        let winner = loser.opponent();
        self.clear_selection_state(out_events);
        self.turn.pending_handoff = None;
        self.turn.phase = Phase::GameOver;
        self.turn.winner = Some(winner);

        info!(?winner, turn = self.turn.turn, "match over");
        out_events.push(Event::PhaseChanged {
            phase: Phase::GameOver,
        });
        out_events.push(Event::GameOver { winner });
        true
    }

    fn clear_highlight(&mut self, out_events: &mut Vec<Event>) {
        self.turn.intent = Intent::None;
        if self.turn.highlight.take().is_some() {
            out_events.push(Event::HighlightCleared);
        }
    }

    fn clear_selection(&mut self, out_events: &mut Vec<Event>) {
        if self.turn.phase != Phase::UnitAction {
            return reject_intent(IntentError::InvalidPhase, out_events);
        }
        self.clear_selection_state(out_events);
    }

    fn clear_selection_state(&mut self, out_events: &mut Vec<Event>) {
        self.clear_highlight(out_events);
        if self.turn.selected_unit.take().is_some() {
            out_events.push(Event::SelectionCleared);
        }
    }

    fn attack_targets_of(&self, attacker: &UnitState) -> Vec<(UnitId, CellCoord)> {
        self.units
            .iter()
            .filter(|target| target.team != attacker.team)
            .filter(|target| actions::within_reach(&self.grid, attacker, target).is_ok())
            .map(|target| (target.id, target.cell))
            .collect()
    }

    fn can_still_act(&self, unit: &UnitState) -> bool {
        let can_move = !unit.has_moved
            && !pathfinding::reachable_cells(&self.grid, unit.cell, unit.stats.movement_range)
                .is_empty();
        let can_attack = !unit.has_attacked && !self.attack_targets_of(unit).is_empty();
        can_move || can_attack
    }
}

fn reject_intent(reason: IntentError, out_events: &mut Vec<Event>) {
    debug!(%reason, "intent rejected");
    out_events.push(Event::IntentRejected { reason });
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SetObstacle { cell, obstacle } => world.set_obstacle(cell, obstacle, out_events),
        Command::TossCoin => world.toss_coin(out_events),
        Command::SelectUnitKind { team, kind } => world.select_unit_kind(team, kind, out_events),
        Command::PlaceUnit { team, cell } => world.place_unit(team, cell, out_events),
        Command::SelectUnit { unit } => world.select_unit(unit, out_events),
        Command::ClearSelection => world.clear_selection(out_events),
        Command::RequestMove => world.request_move(out_events),
        Command::RequestAttack => world.request_attack(out_events),
        Command::ChooseTarget { cell } => world.choose_target(cell, out_events),
        Command::MoveUnit { unit, to } => world.move_unit(unit, to, out_events),
        Command::AttackUnit { attacker, target } => world.attack_unit(attacker, target, out_events),
        Command::EndTurn { team } => world.end_turn(team, out_events),
        Command::Tick { dt } => out_events.push(Event::TimeAdvanced { dt }),
        Command::FireHandOff { ticket } => world.fire_handoff(ticket, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use grid_tactics_core::{
        CellCoord, HandOffTicket, HighlightKind, Intent, MatchConfig, Phase, Team, UnitId,
        UnitKind, UnitSnapshot, UnitView,
    };
    use rand::Rng;

    use super::{obstacles, pathfinding, Cell, Grid, PathMode, World};

    /// Configuration the match was created with.
    #[must_use]
    pub fn config(world: &World) -> &MatchConfig {
        &world.config
    }

    /// Provides read-only access to the board.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Cell at the coordinate, or `None` when it lies outside the board.
    #[must_use]
    pub fn cell_at(world: &World, cell: CellCoord) -> Option<&Cell> {
        world.grid.cell_at(cell)
    }

    /// Reports whether the cell can receive a unit.
    #[must_use]
    pub fn is_cell_free(world: &World, cell: CellCoord) -> bool {
        world.grid.is_free(cell)
    }

    /// Reports whether every free cell can reach every other free cell.
    #[must_use]
    pub fn all_cells_reachable(world: &World) -> bool {
        obstacles::grid_is_connected(&world.grid)
    }

    /// Uniformly samples a free cell using the caller's random source.
    pub fn find_random_empty_cell<R>(world: &World, rng: &mut R) -> Option<CellCoord>
    where
        R: Rng + ?Sized,
    {
        world.grid.find_random_empty_cell(rng)
    }

    /// Current phase of the match.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.turn.phase
    }

    /// Team expected to act, or `None` before the coin toss.
    #[must_use]
    pub fn active_team(world: &World) -> Option<Team> {
        world
            .turn
            .starting_team
            .map(|_| world.turn.active_team)
    }

    /// Team that won the coin toss.
    #[must_use]
    pub fn starting_team(world: &World) -> Option<Team> {
        world.turn.starting_team
    }

    /// One-based unit-action turn counter; zero before combat starts.
    #[must_use]
    pub fn turn_number(world: &World) -> u32 {
        world.turn.turn
    }

    /// Unit currently selected, if any.
    #[must_use]
    pub fn selected_unit(world: &World) -> Option<UnitId> {
        world.turn.selected_unit
    }

    /// Pending intent of the selected unit.
    #[must_use]
    pub fn intent(world: &World) -> Intent {
        world.turn.intent
    }

    /// Highlight currently requested from the presentation layer.
    #[must_use]
    pub fn highlight(world: &World) -> Option<(HighlightKind, &[CellCoord])> {
        world
            .turn
            .highlight
            .as_ref()
            .map(|highlight| (highlight.kind, highlight.cells.as_slice()))
    }

    /// Ticket and destination team of the hand-off waiting for the host timer.
    #[must_use]
    pub fn pending_handoff(world: &World) -> Option<(HandOffTicket, Team)> {
        world
            .turn
            .pending_handoff
            .map(|pending| (pending.ticket, pending.to))
    }

    /// Winning team once the match is over.
    #[must_use]
    pub fn winner(world: &World) -> Option<Team> {
        world.turn.winner
    }

    /// Captures a read-only view of every living unit.
    #[must_use]
    pub fn unit_view(world: &World) -> UnitView {
        let snapshots = world
            .units
            .iter()
            .map(|unit| unit.snapshot(world.turn.selected_unit == Some(unit.id)))
            .collect();
        UnitView::from_snapshots(snapshots)
    }

    /// Snapshot of a single living unit.
    #[must_use]
    pub fn unit(world: &World, unit: UnitId) -> Option<UnitSnapshot> {
        world
            .units
            .get(unit)
            .map(|state| state.snapshot(world.turn.selected_unit == Some(unit)))
    }

    /// Unit kinds the team has not placed yet.
    #[must_use]
    pub fn units_to_place(world: &World, team: Team) -> Vec<UnitKind> {
        world.turn.placement.remaining(team).to_vec()
    }

    /// Reports whether the team may still place a unit of the kind.
    #[must_use]
    pub fn can_place_unit(world: &World, team: Team, kind: UnitKind) -> bool {
        world.turn.placement.can_place(team, kind)
    }

    /// Unit kind the team selected for its next placement.
    #[must_use]
    pub fn selected_unit_kind(world: &World, team: Team) -> Option<UnitKind> {
        world.turn.placement.selected(team)
    }

    /// Range-bounded shortest path on the current board; see [`PathMode`].
    #[must_use]
    pub fn find_path(
        world: &World,
        start: CellCoord,
        goal: CellCoord,
        max_range: u32,
        mode: PathMode,
    ) -> Vec<CellCoord> {
        pathfinding::find_path(&world.grid, start, goal, max_range, mode)
    }

    /// Cells the unit can walk to this turn, ignoring whether it already moved.
    #[must_use]
    pub fn reachable_cells(world: &World, unit: UnitId) -> Vec<CellCoord> {
        world.units.get(unit).map_or_else(Vec::new, |state| {
            pathfinding::reachable_cells(&world.grid, state.cell, state.stats.movement_range)
        })
    }

    /// Enemy units the unit could strike, ignoring whether it already attacked.
    #[must_use]
    pub fn attack_targets(world: &World, unit: UnitId) -> Vec<UnitId> {
        world.units.get(unit).map_or_else(Vec::new, |state| {
            world
                .attack_targets_of(state)
                .into_iter()
                .map(|(target, _)| target)
                .collect()
        })
    }

    /// Reports whether the unit still has a usable move or attack this turn.
    #[must_use]
    pub fn can_act(world: &World, unit: UnitId) -> bool {
        world
            .units
            .get(unit)
            .is_some_and(|state| world.can_still_act(state))
    }
}
