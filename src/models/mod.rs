//! Data structures: groups, matches, code metadata, standings, signed-up players.

mod game;
mod group;
mod metadata;
mod player;
mod standing;

pub use game::{Match, MatchId, MatchStatus, TeamId, TournamentCode, BYE_TEAM_ID};
pub use group::{ByeRule, Group};
pub use metadata::{
    CodeMetadata, CodeMetadataEntry, CodeMetadataReport, DuplicateCode, InputShapeError, Side,
    SkipReason, SkippedMatch,
};
pub use player::{Player, PlayerId, Signups, UNKNOWN_DIVISION, UNKNOWN_TIER};
pub use standing::{Standings, TeamStanding};
