//! Practice mod descriptor
//!
//! Static metadata the mod-select screen needs, plus the compatibility rules
//! checked before a rewind session is created.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Gameplay mods relevant to compatibility with practice mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMod {
    Practice,
    NoFail,
    SuddenDeath,
    Perfect,
    Autoplay,
    Cinema,
    Relax,
    Hidden,
    HardRock,
    Easy,
    DoubleTime,
    HalfTime,
    Blinds,
    Magnetised,
    Repel,
}

impl GameMod {
    pub fn acronym(self) -> &'static str {
        match self {
            GameMod::Practice => "PR",
            GameMod::NoFail => "NF",
            GameMod::SuddenDeath => "SD",
            GameMod::Perfect => "PF",
            GameMod::Autoplay => "AT",
            GameMod::Cinema => "CN",
            GameMod::Relax => "RX",
            GameMod::Hidden => "HD",
            GameMod::HardRock => "HR",
            GameMod::Easy => "EZ",
            GameMod::DoubleTime => "DT",
            GameMod::HalfTime => "HT",
            GameMod::Blinds => "BL",
            GameMod::Magnetised => "MG",
            GameMod::Repel => "RP",
        }
    }

    /// Parse an acronym (case-insensitive)
    pub fn from_acronym(acronym: &str) -> Option<Self> {
        const ALL: [GameMod; 15] = [
            GameMod::Practice,
            GameMod::NoFail,
            GameMod::SuddenDeath,
            GameMod::Perfect,
            GameMod::Autoplay,
            GameMod::Cinema,
            GameMod::Relax,
            GameMod::Hidden,
            GameMod::HardRock,
            GameMod::Easy,
            GameMod::DoubleTime,
            GameMod::HalfTime,
            GameMod::Blinds,
            GameMod::Magnetised,
            GameMod::Repel,
        ];
        ALL.into_iter()
            .find(|m| m.acronym().eq_ignore_ascii_case(acronym.trim()))
    }
}

/// Letter grade awarded at the end of a play
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScoreRank {
    D,
    C,
    B,
    A,
    S,
    SH,
    X,
    XH,
}

/// The practice mod: rewind on miss, never fail
pub struct PracticeMod;

impl PracticeMod {
    pub const NAME: &'static str = "Practice";
    pub const ACRONYM: &'static str = "PR";
    pub const DESCRIPTION: &'static str = "You'll get that FC.";
    pub const SCORE_MULTIPLIER: f64 = 1.0;

    /// Practice plays are not comparable, so multiplayer rooms reject them
    pub fn valid_for_multiplayer() -> bool {
        false
    }

    pub fn valid_for_multiplayer_as_free_mod() -> bool {
        false
    }

    /// Health never drains to a fail while practising
    pub fn blocks_fail() -> bool {
        true
    }

    /// Rank is reported as earned; rewinds don't downgrade it
    pub fn adjust_rank(rank: ScoreRank, _accuracy: f64) -> ScoreRank {
        rank
    }

    /// Mods that cannot be active alongside practice
    ///
    /// Fail conditions contradict no-fail, autoplay never misses, and the
    /// cursor-moving mods fight the seek.
    pub fn incompatible_mods() -> &'static [GameMod] {
        &[
            GameMod::NoFail,
            GameMod::SuddenDeath,
            GameMod::Perfect,
            GameMod::Autoplay,
            GameMod::Cinema,
            GameMod::Blinds,
            GameMod::Magnetised,
            GameMod::Repel,
        ]
    }

    /// Reject a selection containing any incompatible mod
    pub fn check_compatibility(selected: &[GameMod]) -> Result<()> {
        let conflicts: Vec<String> = selected
            .iter()
            .filter(|m| Self::incompatible_mods().contains(*m))
            .map(|m| m.acronym().to_string())
            .collect();

        if conflicts.is_empty() {
            Ok(())
        } else {
            Err(Error::IncompatibleMods(conflicts))
        }
    }

    /// Parse a comma-separated acronym list such as `"HD,HR"`
    pub fn parse_mods(list: &str) -> Result<Vec<GameMod>> {
        list.split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                GameMod::from_acronym(s).ok_or_else(|| Error::UnknownMod(s.trim().to_string()))
            })
            .collect()
    }
}
