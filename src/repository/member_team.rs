//! Search queries over the `members LEFT JOIN teams` projection.
//!
//! Filters, ordering and the projection are all pushed into one SQL
//! statement; only the five projected columns are ever loaded.

use diesel::dsl::{IntoBoxed, LeftJoin};
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    db::DbConnection,
    domain::{
        member::MemberTeam,
        predicate::{Condition, FilterExpr},
        search::{NullOrdering, SortDirection, SortField, SortKey, Window},
    },
    models::member::MemberTeamRow,
    repository::{
        DieselRepository, MemberTeamReader,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::{members, teams},
};

type MemberTeamQuery<'a> = IntoBoxed<'a, LeftJoin<members::table, teams::table>, Sqlite>;

/// Starts a boxed left-join query restricted by every condition of `filter`.
fn filtered(filter: &FilterExpr) -> MemberTeamQuery<'static> {
    let mut query = members::table
        .left_join(teams::table)
        .into_boxed::<Sqlite>();

    for condition in filter.conditions() {
        query = match condition {
            Condition::UsernameEq(username) => {
                query.filter(members::username.eq(username.clone()))
            }
            Condition::TeamNameEq(name) => query.filter(teams::name.eq(name.clone())),
            Condition::AgeGoe(age) => query.filter(members::age.ge(*age)),
            Condition::AgeLoe(age) => query.filter(members::age.le(*age)),
        };
    }

    query
}

/// SQLite has no `NULLS FIRST/LAST`, so nulls are placed with an `IS NULL`
/// term ahead of the column itself.
macro_rules! order_by_key {
    ($query:ident, $column:expr, $key:expr) => {{
        let $query = match $key.nulls {
            NullOrdering::First => $query.then_order_by($column.is_not_null()),
            NullOrdering::Last => $query.then_order_by($column.is_null()),
        };
        match $key.direction {
            SortDirection::Asc => $query.then_order_by($column.asc()),
            SortDirection::Desc => $query.then_order_by($column.desc()),
        }
    }};
}

fn order_by(query: MemberTeamQuery<'static>, key: &SortKey) -> MemberTeamQuery<'static> {
    match key.field {
        SortField::MemberId => order_by_key!(query, members::id, key),
        SortField::Username => order_by_key!(query, members::username, key),
        SortField::Age => order_by_key!(query, members::age, key),
        SortField::TeamId => order_by_key!(query, teams::id, key),
        SortField::TeamName => order_by_key!(query, teams::name, key),
    }
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn load_rows(
    conn: &mut DbConnection,
    filter: &FilterExpr,
    sort: &[SortKey],
    window: Option<Window>,
) -> QueryResult<Vec<MemberTeamRow>> {
    let mut query = sort.iter().fold(filtered(filter), order_by);
    // Member id breaks ties so that repeated searches return identical pages.
    query = query.then_order_by(members::id.asc());

    if let Some(window) = window {
        query = query
            .offset(to_i64(window.offset))
            .limit(to_i64(window.limit));
    }

    query
        .select((
            members::id,
            members::username,
            members::age,
            teams::id.nullable(),
            teams::name.nullable(),
        ))
        .load::<MemberTeamRow>(conn)
}

fn count_rows(conn: &mut DbConnection, filter: &FilterExpr) -> QueryResult<i64> {
    filtered(filter).count().get_result::<i64>(conn)
}

fn into_domain(rows: Vec<MemberTeamRow>) -> RepositoryResult<Vec<MemberTeam>> {
    rows.into_iter()
        .map(|row| MemberTeam::try_from(row).map_err(RepositoryError::from))
        .collect()
}

impl MemberTeamReader for DieselRepository {
    fn fetch_member_teams(
        &self,
        filter: &FilterExpr,
        sort: &[SortKey],
        window: Option<Window>,
    ) -> RepositoryResult<Vec<MemberTeam>> {
        let mut conn = self.conn()?;
        let rows = load_rows(&mut conn, filter, sort, window)?;
        into_domain(rows)
    }

    fn count_member_teams(&self, filter: &FilterExpr) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let total = count_rows(&mut conn, filter)?;
        Ok(total as usize)
    }

    fn fetch_member_teams_with_count(
        &self,
        filter: &FilterExpr,
        sort: &[SortKey],
        window: Window,
    ) -> RepositoryResult<(usize, Vec<MemberTeam>)> {
        let mut conn = self.conn()?;

        // Both statements share one read transaction so the total matches the content.
        let (total, rows) = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let rows = load_rows(conn, filter, sort, Some(window))?;
            let total = count_rows(conn, filter)?;
            Ok((total, rows))
        })?;

        Ok((total as usize, into_domain(rows)?))
    }
}
