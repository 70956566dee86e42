#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Grid Tactics engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! that systems and presentation layers react to. Every rejected action is
//! reported as an event carrying a typed reason; nothing in the engine treats a
//! rejected action as fatal.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod config;

pub use config::{ConfigError, DamageRange, MatchConfig, StatTable, UnitStats};

/// Number of unit kinds every team must place before combat begins.
pub const UNITS_PER_TEAM: usize = UnitKind::ALL.len();

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Debug tool that marks or clears an obstacle on a single cell.
    SetObstacle {
        /// Cell whose obstacle flag should change.
        cell: CellCoord,
        /// Desired obstacle state.
        obstacle: bool,
    },
    /// Decides which team places first and acts first.
    TossCoin,
    /// Chooses the unit kind the next placement request will create.
    SelectUnitKind {
        /// Team making the choice.
        team: Team,
        /// Kind of unit to place next.
        kind: UnitKind,
    },
    /// Places the previously selected unit kind on the provided cell.
    PlaceUnit {
        /// Team requesting the placement.
        team: Team,
        /// Cell that should receive the unit.
        cell: CellCoord,
    },
    /// Selects a unit of the active team, or toggles off the current selection.
    SelectUnit {
        /// Unit being selected.
        unit: UnitId,
    },
    /// Drops the current selection and any highlight.
    ClearSelection,
    /// Exposes the movement range of the selected unit and awaits a target cell.
    RequestMove,
    /// Exposes the valid attack targets of the selected unit and awaits a target.
    RequestAttack,
    /// Resolves the pending intent of the selected unit against a clicked cell.
    ChooseTarget {
        /// Cell the presentation layer reported as clicked.
        cell: CellCoord,
    },
    /// Moves a unit directly, bypassing selection. Used by automated players.
    MoveUnit {
        /// Unit that should move.
        unit: UnitId,
        /// Destination cell.
        to: CellCoord,
    },
    /// Attacks a unit directly, bypassing selection. Used by automated players.
    AttackUnit {
        /// Unit performing the attack.
        attacker: UnitId,
        /// Unit receiving the attack.
        target: UnitId,
    },
    /// Ends the active team's turn.
    EndTurn {
        /// Team requesting the end of its turn.
        team: Team,
    },
    /// Advances the host clock by the provided delta time.
    Tick {
        /// Duration of time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Performs a previously scheduled turn hand-off.
    FireHandOff {
        /// Ticket issued when the hand-off was scheduled.
        ticket: HandOffTicket,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Indicates that the host clock advanced.
    TimeAdvanced {
        /// Duration of time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a cell's obstacle flag changed.
    ObstacleChanged {
        /// Cell that changed.
        cell: CellCoord,
        /// New obstacle state.
        obstacle: bool,
    },
    /// Reports that an obstacle edit was rejected.
    ObstacleRejected {
        /// Cell targeted by the edit.
        cell: CellCoord,
        /// Specific reason the edit failed.
        reason: ObstacleError,
    },
    /// Announces the coin toss result.
    CoinTossed {
        /// Team that won the toss and places first.
        starting: Team,
    },
    /// Announces that the match entered a new phase.
    PhaseChanged {
        /// Phase that became active.
        phase: Phase,
    },
    /// Announces which team must place the next unit.
    PlacementTurnStarted {
        /// Team expected to place.
        team: Team,
    },
    /// Confirms that a team chose the kind of its next placement.
    UnitKindSelected {
        /// Team that made the choice.
        team: Team,
        /// Kind selected for placement.
        kind: UnitKind,
    },
    /// Confirms that a unit entered the board.
    UnitPlaced {
        /// Identifier assigned to the unit.
        unit: UnitId,
        /// Team owning the unit.
        team: Team,
        /// Kind of the unit.
        kind: UnitKind,
        /// Cell the unit occupies.
        cell: CellCoord,
    },
    /// Reports that a placement request was rejected.
    PlacementRejected {
        /// Team that requested the placement.
        team: Team,
        /// Cell provided in the request, absent for unit kind selections.
        cell: Option<CellCoord>,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Announces the start of a unit-action turn.
    TurnStarted {
        /// Team that may act.
        team: Team,
        /// One-based turn counter across both teams.
        turn: u32,
    },
    /// Confirms that a unit became selected.
    UnitSelected {
        /// Selected unit.
        unit: UnitId,
    },
    /// Confirms that the selection was dropped.
    SelectionCleared,
    /// Reports that a selection or intent request was rejected.
    IntentRejected {
        /// Specific reason the request failed.
        reason: IntentError,
    },
    /// Requests that the presentation layer highlight a set of cells.
    HighlightChanged {
        /// Category of the highlight.
        kind: HighlightKind,
        /// Cells to highlight, in row-major order.
        cells: Vec<CellCoord>,
    },
    /// Requests that every highlight be removed.
    HighlightCleared,
    /// Confirms that a unit moved.
    UnitMoved {
        /// Unit that moved.
        unit: UnitId,
        /// Cell the unit occupied before moving.
        from: CellCoord,
        /// Cell the unit occupies after moving.
        to: CellCoord,
        /// Steps walked, excluding `from` and ending at `to`.
        path: Vec<CellCoord>,
    },
    /// Reports that a move request was rejected.
    MoveRejected {
        /// Unit targeted by the request.
        unit: UnitId,
        /// Destination provided in the request.
        to: CellCoord,
        /// Specific reason the move failed.
        reason: MoveError,
    },
    /// Confirms that an attack landed.
    UnitAttacked {
        /// Unit that attacked.
        attacker: UnitId,
        /// Unit that received the damage.
        target: UnitId,
        /// Damage dealt.
        damage: u32,
        /// Target health after the attack, clamped at zero.
        remaining_health: u32,
    },
    /// Confirms that a target struck back at a melee attacker.
    CounterAttacked {
        /// Unit striking back.
        unit: UnitId,
        /// Original attacker receiving the counter damage.
        target: UnitId,
        /// Damage dealt.
        damage: u32,
        /// Original attacker's health after the counter, clamped at zero.
        remaining_health: u32,
    },
    /// Reports that an attack request was rejected.
    AttackRejected {
        /// Unit that attempted the attack.
        attacker: UnitId,
        /// Specific reason the attack failed.
        reason: AttackError,
    },
    /// Confirms that a unit was destroyed and removed from the board.
    UnitDestroyed {
        /// Destroyed unit.
        unit: UnitId,
        /// Team that owned the unit.
        team: Team,
        /// Cell the unit occupied when destroyed.
        cell: CellCoord,
    },
    /// Announces that a team finished its turn.
    TurnCompleted {
        /// Team whose turn ended.
        team: Team,
    },
    /// Asks the host to fire a hand-off after the provided delay.
    HandOffScheduled {
        /// Ticket the host must echo back in [`Command::FireHandOff`].
        ticket: HandOffTicket,
        /// Team that will become active.
        to: Team,
        /// Delay the host should wait before firing.
        delay: Duration,
    },
    /// Reports that a hand-off fired after the match already moved on.
    StaleHandOffIgnored {
        /// Ticket carried by the stale request.
        ticket: HandOffTicket,
    },
    /// Announces the end of the match.
    GameOver {
        /// Team with surviving units.
        winner: Team,
    },
}

/// Sides taking part in a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    /// Human-controlled side.
    Player,
    /// Computer-controlled side.
    Ai,
}

impl Team {
    /// Both teams in a stable order.
    pub const ALL: [Team; 2] = [Team::Player, Team::Ai];

    /// Returns the opposing team.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Ai,
            Self::Ai => Self::Player,
        }
    }
}

/// Kinds of combatant a team can field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitKind {
    /// High health, short range melee fighter.
    Brawler,
    /// Low health, long range shooter that ignores obstacles.
    Sniper,
}

impl UnitKind {
    /// Every unit kind in a stable order.
    pub const ALL: [UnitKind; 2] = [UnitKind::Sniper, UnitKind::Brawler];
}

/// Phases of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the coin toss that picks the starting team.
    CoinToss,
    /// Teams alternate placing their units.
    Placement,
    /// Teams alternate moving and attacking.
    UnitAction,
    /// One team has no surviving units.
    GameOver,
}

/// Pending intent of the selected unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    /// No target is awaited.
    #[default]
    None,
    /// The next chosen cell is a move destination.
    AwaitingMoveTarget,
    /// The next chosen cell holds the attack target.
    AwaitingAttackTarget,
}

/// Category attached to highlight requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HighlightKind {
    /// Cells the selected unit can walk to.
    Movement,
    /// Cells holding enemies the selected unit can attack.
    Attack,
}

/// Unique identifier assigned to a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Ticket identifying a scheduled hand-off.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandOffTicket(u64);

impl HandOffTicket {
    /// Creates a ticket with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the ticket.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Reports whether the two cells share an edge.
    #[must_use]
    pub fn is_adjacent(self, other: CellCoord) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// Human-readable label: column letter followed by the one-based row.
    ///
    /// Columns past `Z` continue with `AA`, `AB`, ... so the label stays unique
    /// on wide boards.
    #[must_use]
    pub fn label(&self) -> String {
        let mut letters = Vec::new();
        let mut remaining = self.column;
        loop {
            let offset = u8::try_from(remaining % 26).unwrap_or(0);
            letters.push(char::from(b'A' + offset));
            if remaining < 26 {
                break;
            }
            remaining = remaining / 26 - 1;
        }
        letters.reverse();
        let column: String = letters.into_iter().collect();
        format!("{column}{}", u64::from(self.row) + 1)
    }
}

/// Reasons an obstacle edit may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum ObstacleError {
    /// The cell lies outside the board.
    #[error("cell lies outside the board")]
    OutOfBounds,
    /// A unit stands on the cell.
    #[error("cell is occupied by a unit")]
    Occupied,
}

/// Reasons a placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The match is not in the placement phase.
    #[error("placement is closed in the current phase")]
    InvalidPhase,
    /// Another team is expected to place.
    #[error("it is not this team's turn to place")]
    OutOfTurn,
    /// The team did not choose a unit kind before placing.
    #[error("no unit kind selected")]
    NoKindSelected,
    /// The team already placed a unit of this kind.
    #[error("unit kind already placed")]
    KindExhausted,
    /// The requested cell lies outside the board.
    #[error("cell lies outside the board")]
    OutOfBounds,
    /// The requested cell holds an obstacle.
    #[error("cell holds an obstacle")]
    Obstacle,
    /// The requested cell already holds a unit.
    #[error("cell is occupied")]
    Occupied,
    /// No free cell remains for an automated placement.
    #[error("no empty cell available")]
    NoEmptyCellAvailable,
}

/// Reasons a move request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum MoveError {
    /// The match is not in the unit-action phase.
    #[error("movement is closed in the current phase")]
    InvalidPhase,
    /// The unit does not belong to the active team, or its turn is ending.
    #[error("it is not this unit's turn")]
    OutOfTurn,
    /// No living unit carries the identifier.
    #[error("unknown unit")]
    UnknownUnit,
    /// The unit already moved this turn.
    #[error("unit already moved this turn")]
    AlreadyMoved,
    /// The destination lies outside the board.
    #[error("destination lies outside the board")]
    OutOfBounds,
    /// The destination holds an obstacle.
    #[error("destination holds an obstacle")]
    Obstacle,
    /// The destination holds a unit.
    #[error("destination is occupied")]
    Occupied,
    /// The destination is farther than the unit's movement range.
    #[error("destination is out of movement range")]
    OutOfRange,
    /// No walkable path within range reaches the destination.
    #[error("no path within range reaches the destination")]
    NoPathFound,
}

/// Reasons an attack request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum AttackError {
    /// The match is not in the unit-action phase.
    #[error("attacking is closed in the current phase")]
    InvalidPhase,
    /// The attacker does not belong to the active team, or its turn is ending.
    #[error("it is not this unit's turn")]
    OutOfTurn,
    /// No living unit carries the attacker identifier.
    #[error("unknown attacker")]
    UnknownAttacker,
    /// No living unit stands at the requested target.
    #[error("no target at the requested location")]
    NoTarget,
    /// The attacker already attacked this turn.
    #[error("unit already attacked this turn")]
    AlreadyAttacked,
    /// Attacker and target fight for the same team.
    #[error("cannot attack a friendly unit")]
    FriendlyFire,
    /// The target is farther than the attacker's range.
    #[error("target is out of attack range")]
    OutOfRange,
    /// A melee attacker has no clear path to the target.
    #[error("path to the target is blocked")]
    PathBlocked,
}

/// Reasons a selection or intent request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum IntentError {
    /// The match is not in the unit-action phase.
    #[error("selection is closed in the current phase")]
    InvalidPhase,
    /// The active team's turn is ending.
    #[error("turn hand-off in progress")]
    HandOffPending,
    /// No living unit carries the identifier.
    #[error("unknown unit")]
    UnknownUnit,
    /// The unit belongs to the inactive team.
    #[error("unit belongs to the inactive team")]
    NotActiveTeam,
    /// The unit already moved and attacked this turn.
    #[error("unit has no actions left this turn")]
    UnitExhausted,
    /// No unit is selected.
    #[error("no unit selected")]
    NothingSelected,
    /// A target was chosen without a pending move or attack intent.
    #[error("no move or attack is pending")]
    NoPendingIntent,
    /// The selected unit already moved this turn.
    #[error("unit already moved this turn")]
    AlreadyMoved,
    /// The selected unit already attacked this turn.
    #[error("unit already attacked this turn")]
    AlreadyAttacked,
}

/// Immutable representation of a single unit's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitSnapshot {
    /// Unique identifier assigned to the unit.
    pub id: UnitId,
    /// Team owning the unit.
    pub team: Team,
    /// Kind of the unit.
    pub kind: UnitKind,
    /// Cell currently occupied by the unit.
    pub cell: CellCoord,
    /// Remaining health.
    pub health: u32,
    /// Health the unit was placed with.
    pub max_health: u32,
    /// Indicates whether the unit moved this turn.
    pub has_moved: bool,
    /// Indicates whether the unit attacked this turn.
    pub has_attacked: bool,
    /// Indicates whether the unit is the current selection.
    pub selected: bool,
}

impl UnitSnapshot {
    /// Remaining health as a fraction of the starting health, for health bars.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health == 0 {
            return 0.0;
        }
        self.health as f32 / self.max_health as f32
    }

    /// Reports whether the unit spent both of its actions this turn.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.has_moved && self.has_attacked
    }
}

/// Read-only snapshot describing every living unit.
#[derive(Clone, Debug, Default)]
pub struct UnitView {
    snapshots: Vec<UnitSnapshot>,
}

impl UnitView {
    /// Creates a new unit view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<UnitSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured unit snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots.iter()
    }

    /// Iterator over the snapshots of a single team.
    pub fn team(&self, team: Team) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots
            .iter()
            .filter(move |snapshot| snapshot.team == team)
    }

    /// Snapshot of the unit with the provided identifier, if it is alive.
    #[must_use]
    pub fn get(&self, unit: UnitId) -> Option<&UnitSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == unit)
    }

    /// Snapshot of the unit standing on the provided cell, if any.
    #[must_use]
    pub fn at(&self, cell: CellCoord) -> Option<&UnitSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.cell == cell)
    }

    /// Number of living units captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<UnitSnapshot> {
        self.snapshots
    }
}
