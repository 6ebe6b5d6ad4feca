//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::member::{AgeStatistics, Member, MemberTeam, NewMember};
use crate::domain::predicate::FilterExpr;
use crate::domain::search::{SortKey, Window};
use crate::domain::team::{NewTeam, Team, TeamAgeSummary};
use crate::domain::types::{MemberId, Username};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    MemberReader, MemberTeamReader, MemberWriter, TeamReader, TeamWriter,
};

mock! {
    pub Repository {}

    impl MemberTeamReader for Repository {
        fn fetch_member_teams(
            &self,
            filter: &FilterExpr,
            sort: &[SortKey],
            window: Option<Window>,
        ) -> RepositoryResult<Vec<MemberTeam>>;
        fn count_member_teams(&self, filter: &FilterExpr) -> RepositoryResult<usize>;
        fn fetch_member_teams_with_count(
            &self,
            filter: &FilterExpr,
            sort: &[SortKey],
            window: Window,
        ) -> RepositoryResult<(usize, Vec<MemberTeam>)>;
    }

    impl MemberReader for Repository {
        fn get_member_by_id(&self, id: MemberId) -> RepositoryResult<Option<Member>>;
        fn find_members_by_username(&self, username: &Username) -> RepositoryResult<Vec<Member>>;
        fn list_members(&self) -> RepositoryResult<Vec<Member>>;
        fn age_statistics(&self) -> RepositoryResult<AgeStatistics>;
    }

    impl MemberWriter for Repository {
        fn create_member(&self, new_member: &NewMember) -> RepositoryResult<Member>;
        fn rename_members_younger_than(
            &self,
            age: i32,
            username: &Username,
        ) -> RepositoryResult<usize>;
        fn add_to_member_ages(&self, delta: i32) -> RepositoryResult<usize>;
        fn delete_members_older_than(&self, age: i32) -> RepositoryResult<usize>;
    }

    impl TeamReader for Repository {
        fn list_teams(&self) -> RepositoryResult<Vec<Team>>;
        fn team_age_summaries(&self) -> RepositoryResult<Vec<TeamAgeSummary>>;
    }

    impl TeamWriter for Repository {
        fn create_team(&self, new_team: &NewTeam) -> RepositoryResult<Team>;
    }
}
