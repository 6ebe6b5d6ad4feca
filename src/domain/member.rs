use serde::{Deserialize, Serialize};

use crate::domain::types::{MemberId, TeamId, TypeConstraintError, Username};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    /// Members may be stored without a username.
    pub username: Option<Username>,
    pub age: i32,
    pub team_id: Option<TeamId>,
}

impl Member {
    /// Builds a member from raw column values, validating each field.
    pub fn try_new(
        id: i32,
        username: Option<String>,
        age: i32,
        team_id: Option<i32>,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            id: MemberId::new(id)?,
            username: username.map(Username::new).transpose()?,
            age,
            team_id: team_id.map(TeamId::new).transpose()?,
        })
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewMember {
    pub username: Option<Username>,
    pub age: i32,
    pub team_id: Option<TeamId>,
}

impl NewMember {
    #[must_use]
    pub fn new(username: Option<Username>, age: i32, team_id: Option<TeamId>) -> Self {
        Self {
            username,
            age,
            team_id,
        }
    }
}

/// Flat member/team projection returned by searches.
///
/// The team columns come from a left join, so a member without a team is
/// reported with `team_id` and `team_name` set to `None`.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct MemberTeam {
    pub member_id: MemberId,
    pub username: Option<String>,
    pub age: i32,
    pub team_id: Option<TeamId>,
    pub team_name: Option<String>,
}

/// Aggregate figures over the ages of all members.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AgeStatistics {
    pub count: usize,
    pub sum: i64,
    pub average: Option<f64>,
    pub max: Option<i32>,
    pub min: Option<i32>,
}
