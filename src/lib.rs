//! Grumble scheduler: library with models and scheduling logic.

pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use config::Config;
pub use logic::{
    attach_tournament_codes, generate_matches, generate_round_robin_matches, parse_signups,
    record_game_result, resolve_code_metadata, resolve_document, resolve_from_store,
    resolve_match_records, GameOutcome, SignupError, StandingsError, FIRST_PLAYER_ID,
    FIRST_SUB_ID, MATCHES_FIELD, WINS_NEEDED_FOR_MATCH,
};
pub use models::{
    ByeRule, CodeMetadata, CodeMetadataEntry, CodeMetadataReport, DuplicateCode, Group,
    InputShapeError, Match, MatchId, MatchStatus, Player, PlayerId, Side, Signups, SkipReason,
    SkippedMatch, Standings, TeamId, TeamStanding, TournamentCode, BYE_TEAM_ID, UNKNOWN_DIVISION,
    UNKNOWN_TIER,
};
pub use store::{DocumentStore, JsonDirStore, MemoryStore, StoreError};
