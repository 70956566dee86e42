use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use grid_tactics_core::{CellCoord, Command, Event, MatchConfig, Phase, Team, UnitKind};
use grid_tactics_system_ai::{Ai, Config};
use grid_tactics_system_scheduler::HandOffScheduler;
use grid_tactics_world::{self as world, query, World};

const FRAME: Duration = Duration::from_millis(250);

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn open_board(columns: u32, rows: u32, seed: u64) -> World {
    World::new(MatchConfig {
        columns,
        rows,
        obstacle_probability: 0.0,
        seed,
        ..MatchConfig::default()
    })
    .expect("world")
}

/// Places both teams in alternation and returns the events of the last placement.
fn deploy(
    world: &mut World,
    player: [(UnitKind, CellCoord); 2],
    ai: [(UnitKind, CellCoord); 2],
) -> Vec<Event> {
    let _ = run(world, Command::TossCoin);
    let mut player = player.into_iter();
    let mut ai = ai.into_iter();
    let mut last = Vec::new();
    while query::phase(world) == Phase::Placement {
        let team = query::active_team(world).expect("placing team");
        let (kind, cell) = match team {
            Team::Player => player.next(),
            Team::Ai => ai.next(),
        }
        .expect("unit left to place");
        let _ = run(world, Command::SelectUnitKind { team, kind });
        last = run(world, Command::PlaceUnit { team, cell });
    }
    last
}

/// Ensures the AI team is acting and returns the events that started its turn.
fn hand_to_ai(world: &mut World, started: Vec<Event>) -> Vec<Event> {
    if query::active_team(world) == Some(Team::Ai) {
        return started;
    }
    let _ = run(world, Command::EndTurn { team: Team::Player });
    let (ticket, to) = query::pending_handoff(world).expect("hand-off scheduled");
    assert_eq!(to, Team::Ai);
    run(world, Command::FireHandOff { ticket })
}

/// Feeds the AI its own outcomes until it stops issuing commands.
fn drive(world: &mut World, ai: &mut Ai, events: Vec<Event>) -> Vec<Event> {
    let mut log = events.clone();
    let mut pending = events;
    while !pending.is_empty() {
        let mut commands = Vec::new();
        ai.handle(&pending, world, &mut commands);
        pending.clear();
        for command in commands {
            let produced = run(world, command);
            log.extend(produced.iter().cloned());
            pending.extend(produced);
        }
    }
    log
}

fn nearest_enemy_distance(world: &World, kind: UnitKind) -> u32 {
    let view = query::unit_view(world);
    let unit = view
        .team(Team::Ai)
        .find(|unit| unit.kind == kind)
        .expect("ai unit");
    view.team(Team::Player)
        .map(|enemy| unit.cell.manhattan_distance(enemy.cell))
        .min()
        .expect("player unit")
}

#[test]
fn ai_places_both_units_on_free_cells() {
    let mut world = open_board(6, 6, 21);
    let mut player = Ai::new(Config::new(Team::Player, 1));
    let mut ai = Ai::new(Config::new(Team::Ai, 2));
    assert_eq!(ai.team(), Team::Ai);

    let mut pending = run(&mut world, Command::TossCoin);
    while !pending.is_empty() && query::phase(&world) == Phase::Placement {
        let mut commands = Vec::new();
        player.handle(&pending, &world, &mut commands);
        ai.handle(&pending, &world, &mut commands);
        assert!(!commands.is_empty(), "the placing team must respond");
        pending.clear();
        for command in commands {
            pending.extend(run(&mut world, command));
        }
    }

    assert_eq!(query::phase(&world), Phase::UnitAction);
    let view = query::unit_view(&world);
    for team in Team::ALL {
        let mut kinds: Vec<UnitKind> = view.team(team).map(|unit| unit.kind).collect();
        kinds.sort();
        let mut expected = UnitKind::ALL.to_vec();
        expected.sort();
        assert_eq!(kinds, expected);
        assert!(query::units_to_place(&world, team).is_empty());
    }
    for unit in view.iter() {
        assert!(!query::grid(&world).is_obstacle(unit.cell));
    }
}

#[test]
fn ai_ignores_the_opponents_placement_turn() {
    let mut world = open_board(6, 6, 5);
    let mut ai = Ai::new(Config::new(Team::Ai, 8));
    let events = vec![Event::PlacementTurnStarted { team: Team::Player }];
    let mut commands = Vec::new();
    ai.handle(&events, &world, &mut commands);
    assert!(commands.is_empty());

    let _ = run(&mut world, Command::TossCoin);
    ai.handle(&[], &world, &mut commands);
    assert!(commands.is_empty());
}

#[test]
fn ai_advances_toward_the_nearest_enemy() {
    let mut world = open_board(16, 16, 3);
    let started = deploy(
        &mut world,
        [
            (UnitKind::Brawler, CellCoord::new(0, 0)),
            (UnitKind::Sniper, CellCoord::new(0, 1)),
        ],
        [
            (UnitKind::Brawler, CellCoord::new(15, 15)),
            (UnitKind::Sniper, CellCoord::new(15, 14)),
        ],
    );
    assert_eq!(nearest_enemy_distance(&world, UnitKind::Brawler), 29);
    assert_eq!(nearest_enemy_distance(&world, UnitKind::Sniper), 28);

    let events = hand_to_ai(&mut world, started);
    let mut ai = Ai::new(Config::new(Team::Ai, 13));
    let log = drive(&mut world, &mut ai, events);

    let brawler_range = query::config(&world).units.get(UnitKind::Brawler).movement_range;
    let sniper_range = query::config(&world).units.get(UnitKind::Sniper).movement_range;
    assert_eq!(
        nearest_enemy_distance(&world, UnitKind::Brawler),
        29 - brawler_range
    );
    assert_eq!(
        nearest_enemy_distance(&world, UnitKind::Sniper),
        28 - sniper_range
    );
    assert!(!log
        .iter()
        .any(|event| matches!(event, Event::UnitAttacked { .. })));
    assert!(log.contains(&Event::TurnCompleted { team: Team::Ai }));
}

#[test]
fn ai_strikes_the_weakest_enemy_in_reach() {
    let mut world = open_board(8, 8, 17);
    let started = deploy(
        &mut world,
        [
            (UnitKind::Sniper, CellCoord::new(0, 0)),
            (UnitKind::Brawler, CellCoord::new(3, 5)),
        ],
        [
            (UnitKind::Sniper, CellCoord::new(3, 3)),
            (UnitKind::Brawler, CellCoord::new(7, 7)),
        ],
    );
    let view = query::unit_view(&world);
    let id_of = |team: Team, kind: UnitKind| {
        view.team(team)
            .find(|unit| unit.kind == kind)
            .map(|unit| unit.id)
            .expect("unit")
    };
    let ai_sniper = id_of(Team::Ai, UnitKind::Sniper);
    let ai_brawler = id_of(Team::Ai, UnitKind::Brawler);
    let player_sniper = id_of(Team::Player, UnitKind::Sniper);
    let player_brawler = id_of(Team::Player, UnitKind::Brawler);

    let events = hand_to_ai(&mut world, started);
    let mut ai = Ai::new(Config::new(Team::Ai, 4));
    let log = drive(&mut world, &mut ai, events);

    let sniper_target = log.iter().find_map(|event| match event {
        Event::UnitAttacked {
            attacker, target, ..
        } if *attacker == ai_sniper => Some(*target),
        _ => None,
    });
    assert_eq!(sniper_target, Some(player_sniper));

    let brawler_target = log.iter().find_map(|event| match event {
        Event::UnitAttacked {
            attacker, target, ..
        } if *attacker == ai_brawler => Some(*target),
        _ => None,
    });
    assert_eq!(brawler_target, Some(player_brawler));
    assert_eq!(
        query::unit(&world, ai_sniper).map(|unit| unit.cell),
        Some(CellCoord::new(3, 4))
    );
}

fn play(seed: u64) -> (Vec<Event>, Option<Team>) {
    let mut world = World::new(MatchConfig {
        columns: 10,
        rows: 10,
        seed,
        ..MatchConfig::default()
    })
    .expect("world");
    let mut player = Ai::new(Config::new(Team::Player, seed ^ 0x5eed));
    let mut ai = Ai::new(Config::new(Team::Ai, seed.rotate_left(17)));
    let mut scheduler = HandOffScheduler::new();

    let mut log = Vec::new();
    let mut pending = run(&mut world, Command::TossCoin);
    for _ in 0..50_000 {
        if query::phase(&world) == Phase::GameOver {
            break;
        }
        if pending.is_empty() {
            pending = run(&mut world, Command::Tick { dt: FRAME });
        }
        log.extend(pending.iter().cloned());

        let mut commands = Vec::new();
        player.handle(&pending, &world, &mut commands);
        ai.handle(&pending, &world, &mut commands);
        scheduler.handle(&pending, &mut commands);
        pending.clear();
        for command in commands {
            pending.extend(run(&mut world, command));
        }
    }
    log.extend(pending);
    (log, query::winner(&world))
}

fn fingerprint(events: &[Event]) -> u64 {
    let mut hasher = DefaultHasher::new();
    events.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn ai_versus_ai_match_is_deterministic_and_finishes() {
    let (first, winner) = play(0xA1_2024);
    let (second, replayed_winner) = play(0xA1_2024);

    assert!(winner.is_some(), "match must reach a winner");
    assert_eq!(winner, replayed_winner);
    assert_eq!(first.len(), second.len());
    assert_eq!(fingerprint(&first), fingerprint(&second));
    assert!(first.contains(&Event::GameOver {
        winner: winner.expect("winner")
    }));
}
