//! Side assignment per tournament code, and the report the resolver returns.

use crate::models::game::{MatchId, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Starting side of a competitor in one game.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Side {
    Blue,
    Red,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Blue => Side::Red,
            Side::Red => Side::Blue,
        }
    }

    /// Sides `(team 1, team 2)` for the game at 0-based position `game_index` of a match.
    /// Team 1 starts on Blue and sides swap every game.
    pub fn for_game(game_index: usize) -> (Side, Side) {
        let team1 = if game_index % 2 == 0 { Side::Blue } else { Side::Red };
        (team1, team1.opposite())
    }
}

/// Who plays which side in the game identified by a tournament code.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeMetadataEntry {
    pub team1_id: TeamId,
    pub team2_id: TeamId,
    pub team1_side: Side,
    pub team2_side: Side,
}

impl CodeMetadataEntry {
    pub fn new(team1_id: TeamId, team2_id: TeamId, game_index: usize) -> Self {
        let (team1_side, team2_side) = Side::for_game(game_index);
        Self {
            team1_id,
            team2_id,
            team1_side,
            team2_side,
        }
    }

    /// Side played by `team_id` in this game, if it took part.
    pub fn side_of(&self, team_id: TeamId) -> Option<Side> {
        if team_id == self.team1_id {
            Some(self.team1_side)
        } else if team_id == self.team2_id {
            Some(self.team2_side)
        } else {
            None
        }
    }
}

/// Tournament code -> side assignment.
pub type CodeMetadata = BTreeMap<String, CodeMetadataEntry>;

/// Why the source document could not be read as a match list at all.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputShapeError {
    DocumentNotFound,
    NotAnObject,
    MissingMatches,
    MatchesNotArray,
    EmptyMatches,
}

impl std::fmt::Display for InputShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputShapeError::DocumentNotFound => write!(f, "Document not found"),
            InputShapeError::NotAnObject => write!(f, "Document is not an object"),
            InputShapeError::MissingMatches => write!(f, "Document has no 'matches' field"),
            InputShapeError::MatchesNotArray => write!(f, "'matches' field is not an array"),
            InputShapeError::EmptyMatches => write!(f, "'matches' array is empty"),
        }
    }
}

impl std::error::Error for InputShapeError {}

/// Why a single match record contributed no entries.
///
/// "Missing" team ids cover absent, null, zero, and non-integer values.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    NotAnObject,
    MissingTeam1Id,
    MissingTeam2Id,
    /// Absent, not an array, or empty.
    MissingTournamentCodes,
    NonStringCode { position: usize },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NotAnObject => write!(f, "match entry is not an object"),
            SkipReason::MissingTeam1Id => write!(f, "missing or invalid team1Id"),
            SkipReason::MissingTeam2Id => write!(f, "missing or invalid team2Id"),
            SkipReason::MissingTournamentCodes => write!(f, "missing or empty tournamentCodes"),
            SkipReason::NonStringCode { position } => {
                write!(f, "tournament code at position {} is not a string", position)
            }
        }
    }
}

/// A match record left out of the mapping.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedMatch {
    /// Position in the input list.
    pub index: usize,
    /// The record's `id`, when it had a readable one.
    pub match_id: Option<MatchId>,
    pub reason: SkipReason,
}

/// A code that appeared in more than one match; the later match's entry was kept.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateCode {
    pub code: String,
    /// Match whose entry was replaced.
    pub previous_match_index: usize,
    pub match_index: usize,
}

/// Mapping plus everything that was left out or overwritten while building it.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeMetadataReport {
    pub metadata: CodeMetadata,
    pub input_error: Option<InputShapeError>,
    pub skipped: Vec<SkippedMatch>,
    pub duplicates: Vec<DuplicateCode>,
    /// Matches that contributed entries.
    pub processed: usize,
}

impl CodeMetadataReport {
    pub fn from_input_error(error: InputShapeError) -> Self {
        Self {
            input_error: Some(error),
            ..Self::default()
        }
    }

    /// No input error, no skipped match, no duplicate code.
    pub fn is_clean(&self) -> bool {
        self.input_error.is_none() && self.skipped.is_empty() && self.duplicates.is_empty()
    }
}
