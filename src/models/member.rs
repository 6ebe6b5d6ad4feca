use diesel::prelude::*;

use crate::domain::member::{
    Member as DomainMember, MemberTeam as DomainMemberTeam, NewMember as DomainNewMember,
};
use crate::domain::types::{MemberId, TeamId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::members)]
/// Diesel model for [`crate::domain::member::Member`].
pub struct Member {
    pub id: i32,
    pub username: Option<String>,
    pub age: i32,
    pub team_id: Option<i32>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::members)]
/// Insertable form of [`Member`].
pub struct NewMember<'a> {
    pub username: Option<&'a str>,
    pub age: i32,
    pub team_id: Option<i32>,
}

/// Row of the `members LEFT JOIN teams` projection.
///
/// Field order matches the selected columns:
/// `(members.id, members.username, members.age, teams.id, teams.name)`.
#[derive(Debug, Clone, Queryable)]
pub struct MemberTeamRow {
    pub member_id: i32,
    pub username: Option<String>,
    pub age: i32,
    pub team_id: Option<i32>,
    pub team_name: Option<String>,
}

impl TryFrom<Member> for DomainMember {
    type Error = TypeConstraintError;

    fn try_from(member: Member) -> Result<Self, Self::Error> {
        DomainMember::try_new(member.id, member.username, member.age, member.team_id)
    }
}

impl<'a> From<&'a DomainNewMember> for NewMember<'a> {
    fn from(member: &'a DomainNewMember) -> Self {
        Self {
            username: member.username.as_ref().map(|u| u.as_str()),
            age: member.age,
            team_id: member.team_id.map(TeamId::get),
        }
    }
}

impl TryFrom<MemberTeamRow> for DomainMemberTeam {
    type Error = TypeConstraintError;

    fn try_from(row: MemberTeamRow) -> Result<Self, Self::Error> {
        Ok(Self {
            member_id: MemberId::new(row.member_id)?,
            username: row.username,
            age: row.age,
            team_id: row.team_id.map(TeamId::new).transpose()?,
            team_name: row.team_name,
        })
    }
}
