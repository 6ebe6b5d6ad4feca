//! Repository implementation for members, including bulk statements that
//! update rows directly without loading them first.

use diesel::dsl::{count, max, min, sum};
use diesel::prelude::*;

use crate::{
    domain::{
        member::{AgeStatistics, Member, NewMember},
        types::{MemberId, Username},
    },
    models::member::{Member as DbMember, NewMember as DbNewMember},
    repository::{
        DieselRepository, MemberReader, MemberWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

fn into_domain(db_members: Vec<DbMember>) -> RepositoryResult<Vec<Member>> {
    db_members
        .into_iter()
        .map(|member| Member::try_from(member).map_err(RepositoryError::from))
        .collect()
}

impl MemberWriter for DieselRepository {
    fn create_member(&self, new_member: &NewMember) -> RepositoryResult<Member> {
        use crate::schema::members;

        let mut conn = self.conn()?;

        let db_new_member: DbNewMember = new_member.into();

        let db_member = diesel::insert_into(members::table)
            .values(&db_new_member)
            .get_result::<DbMember>(&mut conn)?;

        Ok(Member::try_from(db_member)?)
    }

    fn rename_members_younger_than(
        &self,
        age: i32,
        username: &Username,
    ) -> RepositoryResult<usize> {
        use crate::schema::members;

        let mut conn = self.conn()?;
        let affected = diesel::update(members::table.filter(members::age.lt(age)))
            .set(members::username.eq(username.as_str()))
            .execute(&mut conn)?;

        log::info!("Renamed {affected} members younger than {age}");
        Ok(affected)
    }

    fn add_to_member_ages(&self, delta: i32) -> RepositoryResult<usize> {
        use crate::schema::members;

        let mut conn = self.conn()?;
        let affected = diesel::update(members::table)
            .set(members::age.eq(members::age + delta))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_members_older_than(&self, age: i32) -> RepositoryResult<usize> {
        use crate::schema::members;

        let mut conn = self.conn()?;
        let affected =
            diesel::delete(members::table.filter(members::age.gt(age))).execute(&mut conn)?;

        log::info!("Deleted {affected} members older than {age}");
        Ok(affected)
    }
}

impl MemberReader for DieselRepository {
    fn get_member_by_id(&self, id: MemberId) -> RepositoryResult<Option<Member>> {
        use crate::schema::members;

        let mut conn = self.conn()?;
        let db_member = members::table
            .find(id.get())
            .first::<DbMember>(&mut conn)
            .optional()?;

        db_member
            .map(|member| Member::try_from(member).map_err(RepositoryError::from))
            .transpose()
    }

    fn find_members_by_username(&self, username: &Username) -> RepositoryResult<Vec<Member>> {
        use crate::schema::members;

        let mut conn = self.conn()?;
        let db_members = members::table
            .filter(members::username.eq(username.as_str()))
            .order(members::id.asc())
            .load::<DbMember>(&mut conn)?;

        into_domain(db_members)
    }

    fn list_members(&self) -> RepositoryResult<Vec<Member>> {
        use crate::schema::members;

        let mut conn = self.conn()?;
        let db_members = members::table
            .order(members::id.asc())
            .load::<DbMember>(&mut conn)?;

        into_domain(db_members)
    }

    fn age_statistics(&self) -> RepositoryResult<AgeStatistics> {
        use crate::schema::members;

        let mut conn = self.conn()?;
        let (total, age_sum, age_max, age_min) = members::table
            .select((
                count(members::id),
                sum(members::age),
                max(members::age),
                min(members::age),
            ))
            .first::<(i64, Option<i64>, Option<i32>, Option<i32>)>(&mut conn)?;

        let sum = age_sum.unwrap_or_default();
        let average = (total > 0).then(|| sum as f64 / total as f64);

        Ok(AgeStatistics {
            count: total as usize,
            sum,
            average,
            max: age_max,
            min: age_min,
        })
    }
}
