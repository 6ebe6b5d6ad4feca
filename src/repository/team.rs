//! Repository implementation for teams.

use diesel::dsl::{count, sum};
use diesel::prelude::*;

use crate::{
    domain::team::{NewTeam, Team, TeamAgeSummary},
    models::team::{NewTeam as DbNewTeam, Team as DbTeam},
    repository::{
        DieselRepository, TeamReader, TeamWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl TeamWriter for DieselRepository {
    fn create_team(&self, new_team: &NewTeam) -> RepositoryResult<Team> {
        use crate::schema::teams;

        let mut conn = self.conn()?;

        let db_new_team: DbNewTeam = new_team.into();

        let db_team = diesel::insert_into(teams::table)
            .values(&db_new_team)
            .get_result::<DbTeam>(&mut conn)?;

        Ok(Team::try_from(db_team)?)
    }
}

impl TeamReader for DieselRepository {
    fn list_teams(&self) -> RepositoryResult<Vec<Team>> {
        use crate::schema::teams;

        let mut conn = self.conn()?;
        let db_teams = teams::table
            .order(teams::id.asc())
            .load::<DbTeam>(&mut conn)?;

        db_teams
            .into_iter()
            .map(|team| Team::try_from(team).map_err(RepositoryError::from))
            .collect()
    }

    fn team_age_summaries(&self) -> RepositoryResult<Vec<TeamAgeSummary>> {
        use crate::schema::{members, teams};

        let mut conn = self.conn()?;
        let rows = members::table
            .inner_join(teams::table)
            .group_by(teams::name)
            .select((teams::name, count(members::id), sum(members::age)))
            .order(teams::name.asc())
            .load::<(String, i64, Option<i64>)>(&mut conn)?;

        let summaries = rows
            .into_iter()
            .map(|(team_name, member_count, age_sum)| TeamAgeSummary {
                team_name,
                member_count: member_count as usize,
                average_age: age_sum.unwrap_or_default() as f64 / member_count.max(1) as f64,
            })
            .collect();

        Ok(summaries)
    }
}
