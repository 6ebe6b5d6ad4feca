#![allow(dead_code)]

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use member_search::db::{DbPool, establish_connection_pool};
use member_search::domain::member::{Member, NewMember};
use member_search::domain::team::{NewTeam, Team};
use member_search::domain::types::{TeamName, Username};
use member_search::repository::{DieselRepository, MemberWriter, TeamWriter};
use tempfile::TempDir;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

/// Migrated SQLite database living in a temporary directory.
pub struct TestDb {
    pool: DbPool,
    _dir: TempDir,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(name);
        let pool = establish_connection_pool(path.to_str().expect("utf-8 path"))
            .expect("establish connection pool");

        let mut conn = pool.get().expect("get connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("run migrations");

        Self { pool, _dir: dir }
    }

    /// Database file with no tables, so every query fails.
    pub fn unmigrated(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(name);
        let pool = establish_connection_pool(path.to_str().expect("utf-8 path"))
            .expect("establish connection pool");

        Self { pool, _dir: dir }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool.clone())
    }
}

pub fn create_team(repo: &DieselRepository, name: &str) -> Team {
    repo.create_team(&NewTeam::new(TeamName::new(name).unwrap()))
        .expect("create team")
}

pub fn create_member(
    repo: &DieselRepository,
    username: Option<&str>,
    age: i32,
    team: Option<&Team>,
) -> Member {
    let new_member = NewMember::new(
        username.map(|u| Username::new(u).unwrap()),
        age,
        team.map(|t| t.id),
    );
    repo.create_member(&new_member).expect("create member")
}

/// Two teams with two members each: member1 (10) and member2 (20) in
/// teamA, member3 (30) and member4 (40) in teamB.
pub fn seed_members(repo: &DieselRepository) -> (Team, Team) {
    let team_a = create_team(repo, "teamA");
    let team_b = create_team(repo, "teamB");

    create_member(repo, Some("member1"), 10, Some(&team_a));
    create_member(repo, Some("member2"), 20, Some(&team_a));
    create_member(repo, Some("member3"), 30, Some(&team_b));
    create_member(repo, Some("member4"), 40, Some(&team_b));

    (team_a, team_b)
}
