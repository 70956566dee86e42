//! Text rendering of the board for terminal output.

use std::fmt::Write as _;

use grid_tactics_core::{CellCoord, Team, UnitKind};
use grid_tactics_world::{query, World};

const OBSTACLE: char = '#';
const FREE: char = '.';

/// Glyph used for a unit; player units are upper case.
fn unit_glyph(team: Team, kind: UnitKind) -> char {
    let glyph = match kind {
        UnitKind::Brawler => 'b',
        UnitKind::Sniper => 's',
    };
    match team {
        Team::Player => glyph.to_ascii_uppercase(),
        Team::Ai => glyph,
    }
}

/// Column header letters of a cell label.
fn column_letters(column: u32) -> String {
    CellCoord::new(column, 0)
        .label()
        .trim_end_matches(|character: char| character.is_ascii_digit())
        .to_owned()
}

/// Renders the board row by row with column letters and one-based row numbers.
pub(crate) fn render(world: &World) -> String {
    let grid = query::grid(world);
    let view = query::unit_view(world);
    let gutter = grid.rows().to_string().len();
    let width = (0..grid.columns())
        .map(|column| column_letters(column).len())
        .max()
        .unwrap_or(1);

    let mut out = String::new();
    let _ = write!(out, "{:gutter$} ", "");
    for column in 0..grid.columns() {
        let _ = write!(out, "{:>width$}", column_letters(column));
    }
    out.push('\n');

    for row in 0..grid.rows() {
        let _ = write!(out, "{:>gutter$} ", row + 1);
        for column in 0..grid.columns() {
            let cell = CellCoord::new(column, row);
            let glyph = match view.at(cell) {
                Some(unit) => unit_glyph(unit.team, unit.kind),
                None if grid.is_obstacle(cell) => OBSTACLE,
                None => FREE,
            };
            let _ = write!(out, "{glyph:>width$}");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_tactics_core::{Command, MatchConfig};
    use grid_tactics_world as world;

    #[test]
    fn renders_units_and_headers() {
        let mut world = World::new(MatchConfig {
            columns: 3,
            rows: 2,
            obstacle_probability: 0.0,
            ..MatchConfig::default()
        })
        .expect("world");
        let mut events = Vec::new();
        world::apply(&mut world, Command::TossCoin, &mut events);
        let team = query::active_team(&world).expect("placing team");
        world::apply(
            &mut world,
            Command::SelectUnitKind {
                team,
                kind: UnitKind::Sniper,
            },
            &mut events,
        );
        world::apply(
            &mut world,
            Command::PlaceUnit {
                team,
                cell: CellCoord::new(1, 1),
            },
            &mut events,
        );

        let expected_glyph = unit_glyph(team, UnitKind::Sniper);
        assert_eq!(
            render(&world),
            format!("  ABC\n1 ...\n2 .{expected_glyph}.\n")
        );
    }

    #[test]
    fn column_headers_continue_past_z() {
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(unit_glyph(Team::Player, UnitKind::Brawler), 'B');
        assert_eq!(unit_glyph(Team::Ai, UnitKind::Brawler), 'b');
    }
}
