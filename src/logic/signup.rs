//! Sign-up ingestion: turn a sign-up form CSV export into player records.

use crate::models::{Player, PlayerId, Signups, UNKNOWN_DIVISION, UNKNOWN_TIER};
use serde::Deserialize;
use std::io;

/// First id handed to regular players.
pub const FIRST_PLAYER_ID: PlayerId = 1;

/// First id handed to substitutes.
pub const FIRST_SUB_ID: PlayerId = 201;

/// Errors that can occur while reading a sign-up export.
#[derive(Debug)]
pub enum SignupError {
    /// A row could not be read or decoded.
    Csv(csv::Error),
}

impl std::fmt::Display for SignupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignupError::Csv(e) => write!(f, "Could not read sign-up CSV: {}", e),
        }
    }
}

impl std::error::Error for SignupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SignupError::Csv(e) => Some(e),
        }
    }
}

impl From<csv::Error> for SignupError {
    fn from(e: csv::Error) -> Self {
        SignupError::Csv(e)
    }
}

/// One form response, keyed by the form's column headers.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SignupRow {
    #[serde(rename = "Summoner Name (e.g. Summoner#NA1)")]
    summoner_name: String,
    #[serde(rename = "Preferred Role")]
    preferred_role: Option<String>,
    #[serde(rename = "Secondary Roles")]
    secondary_roles: String,
    #[serde(rename = "Do you want to be a Team Captain?")]
    captain: String,
    #[serde(rename = "Do you want to be a sub?")]
    sub: String,
    #[serde(rename = "Peak Rank Tier")]
    peak_rank_tier: String,
    #[serde(rename = "Peak Rank division")]
    peak_rank_division: String,
    #[serde(rename = "Peak LP")]
    peak_lp: String,
    #[serde(rename = "Discord Username")]
    contact: String,
    #[serde(rename = "Timezone")]
    timezone: String,
}

fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// Division number; `LP` means apex tier, where the LP column stands in for the division.
fn peak_division(division: &str, lp: &str) -> i32 {
    let raw = if division.trim() == "LP" { lp } else { division };
    raw.trim().parse().unwrap_or(UNKNOWN_DIVISION)
}

fn split_roles(roles: &str) -> Vec<String> {
    roles
        .split(',')
        .map(|r| r.trim().to_lowercase())
        .filter(|r| !r.is_empty())
        .collect()
}

impl SignupRow {
    fn into_player(self, id: PlayerId) -> Player {
        let role = self
            .preferred_role
            .map(|r| r.trim().to_lowercase())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| "fill".to_string());
        let peak_rank_tier = match title_case(self.peak_rank_tier.trim()) {
            tier if tier.is_empty() => UNKNOWN_TIER.to_string(),
            tier => tier,
        };
        Player {
            peak_rank_tier,
            peak_rank_division: peak_division(&self.peak_rank_division, &self.peak_lp),
            role,
            secondary_roles: split_roles(&self.secondary_roles),
            is_captain: is_yes(&self.captain),
            contact: self.contact.trim().to_string(),
            timezone: self.timezone.trim().to_string(),
            ..Player::new(id, self.summoner_name.trim())
        }
    }
}

/// Read a sign-up export (header row first) into players and substitutes.
///
/// Players are numbered from [`FIRST_PLAYER_ID`], substitutes from [`FIRST_SUB_ID`], each in
/// row order. Solo and flex ranks stay unknown: they come from the ranked-statistics service.
pub fn parse_signups<R: io::Read>(reader: R) -> Result<Signups, SignupError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let mut signups = Signups::default();
    let mut next_player = FIRST_PLAYER_ID;
    let mut next_sub = FIRST_SUB_ID;

    for row in csv_reader.deserialize::<SignupRow>() {
        let row = row?;
        if is_yes(&row.sub) {
            signups.subs.push(row.into_player(next_sub));
            next_sub += 1;
        } else {
            signups.players.push(row.into_player(next_player));
            next_player += 1;
        }
    }

    log::info!(
        "Read {} players and {} substitutes from sign-ups",
        signups.players.len(),
        signups.subs.len()
    );
    Ok(signups)
}
