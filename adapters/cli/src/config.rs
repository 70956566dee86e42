//! Loading of TOML match files.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use grid_tactics_core::MatchConfig;
use serde::Deserialize;

const DEFAULT_FRAME_MS: u64 = 250;
const DEFAULT_MAX_TURNS: u32 = 200;

/// Settings of the host loop driving the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct HostSettings {
    /// Simulated time between two host frames, in milliseconds.
    pub(crate) frame_ms: u64,
    /// Turn after which an unfinished match is abandoned.
    pub(crate) max_turns: u32,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            frame_ms: DEFAULT_FRAME_MS,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

/// Contents of a match file; every table is optional.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct MatchFile {
    #[serde(rename = "match")]
    pub(crate) rules: MatchConfig,
    pub(crate) host: HostSettings,
}

impl MatchFile {
    /// Reads and validates the file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read match file {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid match file {}", path.display()))
    }

    /// Parses and validates TOML contents.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let file: Self = toml::from_str(contents).context("malformed TOML")?;
        file.rules.validate()?;
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_tactics_core::UnitKind;

    #[test]
    fn empty_file_uses_defaults() {
        let file = MatchFile::parse("").expect("empty file parses");
        assert_eq!(file, MatchFile::default());
        assert_eq!(file.host.frame_ms, DEFAULT_FRAME_MS);
    }

    #[test]
    fn partial_tables_override_selected_fields() {
        let file = MatchFile::parse(
            r#"
            [match]
            columns = 14
            seed = 7
            ai_handoff_delay_ms = 500

            [match.units.sniper]
            health = 12
            movement_range = 2
            attack_range = 6
            damage = { min = 2, max = 5 }

            [host]
            max_turns = 40
            "#,
        )
        .expect("valid file");

        assert_eq!(file.rules.columns, 14);
        assert_eq!(file.rules.rows, MatchConfig::default().rows);
        assert_eq!(file.rules.seed, 7);
        assert_eq!(file.rules.ai_handoff_delay_ms, 500);
        assert_eq!(file.rules.units.get(UnitKind::Sniper).attack_range, 6);
        assert!(!file.rules.units.get(UnitKind::Sniper).ignores_obstacles_on_attack);
        assert_eq!(
            file.rules.units.get(UnitKind::Brawler),
            MatchConfig::default().units.get(UnitKind::Brawler)
        );
        assert_eq!(file.host.max_turns, 40);
        assert_eq!(file.host.frame_ms, DEFAULT_FRAME_MS);
    }

    #[test]
    fn invalid_rules_are_rejected() {
        let error = MatchFile::parse("[match]\nobstacle_probability = 1.5\n")
            .expect_err("probability out of range");
        assert!(error.to_string().contains("obstacle probability"));

        assert!(MatchFile::parse("[match\ncolumns = 3").is_err());
    }
}
