//! Scheduling logic: round-robin generation, code attachment, side resolution, game results,
//! sign-ups.

mod code_metadata;
mod codes;
mod round_robin;
mod signup;
mod standings;

pub use code_metadata::{
    resolve_code_metadata, resolve_document, resolve_from_store, resolve_match_records,
    MATCHES_FIELD,
};
pub use codes::attach_tournament_codes;
pub use round_robin::{generate_matches, generate_round_robin_matches};
pub use signup::{parse_signups, SignupError, FIRST_PLAYER_ID, FIRST_SUB_ID};
pub use standings::{record_game_result, GameOutcome, StandingsError, WINS_NEEDED_FOR_MATCH};
