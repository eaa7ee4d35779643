//! Player record built from a sign-up form row.

use serde::{Deserialize, Serialize};

/// Unique identifier for a signed-up player (players from 1, substitutes from 201).
pub type PlayerId = u32;

/// Division value used when a rank is unknown or could not be parsed.
pub const UNKNOWN_DIVISION: i32 = -1;

/// Tier value used when a rank is unknown.
pub const UNKNOWN_TIER: &str = "N/A";

/// A signed-up player, in the shape the admin page imports.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    /// Full Riot id, e.g. `Summoner#NA1`.
    pub name: String,
    pub peak_rank_tier: String,
    /// Division number, or LP for apex tiers; [`UNKNOWN_DIVISION`] if unknown.
    pub peak_rank_division: i32,
    pub solo_rank_tier: String,
    pub solo_rank_division: i32,
    pub flex_rank_tier: String,
    pub flex_rank_division: i32,
    pub role: String,
    pub secondary_roles: Vec<String>,
    pub is_captain: bool,
    pub contact: String,
    pub timezone: String,
}

impl Player {
    /// Create a player with the given id and name. Ranks start unknown, role `fill`.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            peak_rank_tier: UNKNOWN_TIER.to_string(),
            peak_rank_division: UNKNOWN_DIVISION,
            solo_rank_tier: UNKNOWN_TIER.to_string(),
            solo_rank_division: UNKNOWN_DIVISION,
            flex_rank_tier: UNKNOWN_TIER.to_string(),
            flex_rank_division: UNKNOWN_DIVISION,
            role: "fill".to_string(),
            secondary_roles: Vec::new(),
            is_captain: false,
            contact: String::new(),
            timezone: String::new(),
        }
    }

    /// Riot game name and tag line, when the name has the `name#tag` form.
    pub fn riot_id(&self) -> Option<(&str, &str)> {
        let (name, tag) = self.name.split_once('#')?;
        if name.is_empty() || tag.is_empty() || tag.contains('#') {
            return None;
        }
        Some((name, tag))
    }
}

/// Players and substitutes from one sign-up export.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Signups {
    pub players: Vec<Player>,
    pub subs: Vec<Player>,
}
