//! Attaching issued tournament codes to their matches.

use crate::models::{Match, TournamentCode};
use std::collections::{HashMap, HashSet};

/// Append issued codes to their matches, in list order.
///
/// Only matches that had no codes before the call are filled; codes for matches that already
/// carry some are ignored. Returns the codes whose match id is not in `matches`.
pub fn attach_tournament_codes(
    matches: &mut [Match],
    codes: &[TournamentCode],
) -> Vec<TournamentCode> {
    let position: HashMap<_, _> = matches
        .iter()
        .enumerate()
        .map(|(i, m)| (m.id, i))
        .collect();
    let fillable: HashSet<_> = matches
        .iter()
        .filter(|m| m.tournament_codes.is_empty())
        .map(|m| m.id)
        .collect();

    let mut unmatched = Vec::new();
    for code in codes {
        match position.get(&code.match_id) {
            Some(&i) if fillable.contains(&code.match_id) => {
                matches[i].tournament_codes.push(code.code.clone());
            }
            Some(_) => {
                log::debug!(
                    "Match {} already has tournament codes, ignoring {}",
                    code.match_id,
                    code.code
                );
            }
            None => unmatched.push(code.clone()),
        }
    }
    unmatched
}
