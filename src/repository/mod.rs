use crate::{
    db::{DbConnection, DbPool, get_connection},
    domain::{
        member::{AgeStatistics, Member, MemberTeam, NewMember},
        predicate::FilterExpr,
        search::{SortKey, Window},
        team::{NewTeam, Team, TeamAgeSummary},
        types::{MemberId, Username},
    },
    repository::errors::RepositoryResult,
};

pub mod errors;
pub mod member;
pub mod member_team;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod team;

/// Diesel-backed repository sharing one SQLite connection pool.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }
}

/// Read access to the `members LEFT JOIN teams` projection.
///
/// Every method joins each member to its team with a left join, so members
/// without a team are never dropped. Results are ordered by `sort` followed
/// by the member id.
pub trait MemberTeamReader {
    fn fetch_member_teams(
        &self,
        filter: &FilterExpr,
        sort: &[SortKey],
        window: Option<Window>,
    ) -> RepositoryResult<Vec<MemberTeam>>;

    fn count_member_teams(&self, filter: &FilterExpr) -> RepositoryResult<usize>;

    /// Loads one window of rows and the total match count in a single call.
    fn fetch_member_teams_with_count(
        &self,
        filter: &FilterExpr,
        sort: &[SortKey],
        window: Window,
    ) -> RepositoryResult<(usize, Vec<MemberTeam>)>;
}

pub trait MemberReader {
    fn get_member_by_id(&self, id: MemberId) -> RepositoryResult<Option<Member>>;
    fn find_members_by_username(&self, username: &Username) -> RepositoryResult<Vec<Member>>;
    fn list_members(&self) -> RepositoryResult<Vec<Member>>;
    fn age_statistics(&self) -> RepositoryResult<AgeStatistics>;
}

pub trait MemberWriter {
    fn create_member(&self, new_member: &NewMember) -> RepositoryResult<Member>;
    /// Renames every member younger than `age`, returning the affected rows.
    fn rename_members_younger_than(&self, age: i32, username: &Username)
    -> RepositoryResult<usize>;
    /// Adds `delta` to the age of every member, returning the affected rows.
    fn add_to_member_ages(&self, delta: i32) -> RepositoryResult<usize>;
    fn delete_members_older_than(&self, age: i32) -> RepositoryResult<usize>;
}

pub trait TeamReader {
    fn list_teams(&self) -> RepositoryResult<Vec<Team>>;
    /// Per-team member count and average age, ordered by team name.
    fn team_age_summaries(&self) -> RepositoryResult<Vec<TeamAgeSummary>>;
}

pub trait TeamWriter {
    fn create_team(&self, new_team: &NewTeam) -> RepositoryResult<Team>;
}
