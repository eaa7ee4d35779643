//! Group membership and the rule deciding which groups rotate a bye.

use crate::models::game::TeamId;
use serde::{Deserialize, Serialize};

/// A named group of competitors. Order of `team_ids` fixes pairing order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub name: String,
    pub team_ids: Vec<TeamId>,
}

impl Group {
    pub fn new(name: impl Into<String>, team_ids: Vec<TeamId>) -> Self {
        Self {
            name: name.into(),
            team_ids,
        }
    }

    /// Number of pairwise matches a full round-robin of this group needs.
    pub fn pairing_count(&self) -> usize {
        let n = self.team_ids.len();
        n * n.saturating_sub(1) / 2
    }
}

/// Which groups get one bye match per member after their pairings.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ByeRule {
    /// No group gets byes.
    #[default]
    None,
    /// Only the groups with these exact labels.
    Groups { names: Vec<String> },
    /// Every group with an odd number of members.
    OddSized,
}

impl ByeRule {
    /// Shorthand for a rule naming explicit groups.
    pub fn groups<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ByeRule::Groups {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn applies(&self, group: &Group) -> bool {
        match self {
            ByeRule::None => false,
            ByeRule::Groups { names } => names.iter().any(|n| *n == group.name),
            ByeRule::OddSized => group.team_ids.len() % 2 == 1,
        }
    }
}
