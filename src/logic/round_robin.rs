//! Group stage: round-robin match generation with bye rotation.

use crate::models::{ByeRule, Group, Match, MatchId};

/// Hands out match ids 1, 2, 3, ... for one generation run.
#[derive(Debug)]
struct MatchIds {
    next: MatchId,
}

impl MatchIds {
    fn new() -> Self {
        Self { next: 1 }
    }

    fn take(&mut self) -> MatchId {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Generate every match for the given groups, in the order the groups are listed.
///
/// 1. For each group, one match per unordered pair `(team_ids[i], team_ids[j])`, `i < j`,
///    with `i` as the outer index.
/// 2. If `needs_bye` holds for the group, one bye match per member follows, in listed order.
/// 3. Ids run from 1 across all groups without gaps.
///
/// Empty and singleton groups contribute no pairings. Duplicate ids within a group are not
/// detected and produce duplicate pairings.
pub fn generate_matches<F>(groups: &[Group], needs_bye: F) -> Vec<Match>
where
    F: Fn(&Group) -> bool,
{
    let mut ids = MatchIds::new();
    let mut matches = Vec::new();

    for group in groups {
        let teams = &group.team_ids;
        matches.reserve(group.pairing_count());
        for (i, &team1) in teams.iter().enumerate() {
            for &team2 in &teams[i + 1..] {
                matches.push(Match::new(ids.take(), team1, team2));
            }
        }

        if needs_bye(group) {
            for &team in teams {
                matches.push(Match::bye(ids.take(), team));
            }
        }

        log::debug!(
            "Group {}: {} teams, {} matches generated so far",
            group.name,
            teams.len(),
            matches.len()
        );
    }

    matches
}

/// [`generate_matches`] with byes decided by a [`ByeRule`].
pub fn generate_round_robin_matches(groups: &[Group], byes: &ByeRule) -> Vec<Match> {
    generate_matches(groups, |group| byes.applies(group))
}
