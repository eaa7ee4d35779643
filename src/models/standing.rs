//! Team standings: match and game records fed by game results.

use crate::models::game::TeamId;
use crate::models::group::Group;
use serde::{Deserialize, Serialize};

/// Match and game record of one team, in the shape the standings page reads.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStanding {
    pub id: TeamId,
    pub wins: u32,
    pub losses: u32,
    /// `wins-losses`, kept in step with the counters.
    pub record: String,
    pub game_wins: u32,
    pub game_losses: u32,
    /// `game_wins-game_losses`, kept in step with the counters.
    pub game_record: String,
}

impl TeamStanding {
    pub fn new(id: TeamId) -> Self {
        Self {
            id,
            wins: 0,
            losses: 0,
            record: "0-0".to_string(),
            game_wins: 0,
            game_losses: 0,
            game_record: "0-0".to_string(),
        }
    }

    pub fn add_game_win(&mut self) {
        self.game_wins += 1;
        self.game_record = format!("{}-{}", self.game_wins, self.game_losses);
    }

    pub fn add_game_loss(&mut self) {
        self.game_losses += 1;
        self.game_record = format!("{}-{}", self.game_wins, self.game_losses);
    }

    /// Record a match win for this team.
    pub fn add_win(&mut self) {
        self.wins += 1;
        self.record = format!("{}-{}", self.wins, self.losses);
    }

    /// Record a match loss for this team.
    pub fn add_loss(&mut self) {
        self.losses += 1;
        self.record = format!("{}-{}", self.wins, self.losses);
    }
}

/// Standings of every team in a stage.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Standings {
    pub teams: Vec<TeamStanding>,
}

impl Standings {
    /// One empty standing per team, in group order. Repeated ids are listed once.
    pub fn for_groups(groups: &[Group]) -> Self {
        let mut teams: Vec<TeamStanding> = Vec::new();
        for &id in groups.iter().flat_map(|g| g.team_ids.iter()) {
            if !teams.iter().any(|t| t.id == id) {
                teams.push(TeamStanding::new(id));
            }
        }
        Self { teams }
    }

    pub fn get(&self, id: TeamId) -> Option<&TeamStanding> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: TeamId) -> Option<&mut TeamStanding> {
        self.teams.iter_mut().find(|t| t.id == id)
    }
}
