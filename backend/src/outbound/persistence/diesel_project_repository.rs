//! PostgreSQL-backed `ProjectRepository` implementation using Diesel ORM.
//!
//! Membership changes run as single `UPDATE ... RETURNING` statements so each
//! one is atomic on its own.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Array, Uuid as SqlUuid};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ProjectRepository, ProjectRepositoryError};
use crate::domain::{FileTree, NewProject, Project, ProjectDraft, ProjectId, ProjectName, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error, unique_violation};
use super::models::{NewProjectRow, ProjectRow};
use super::pool::{DbPool, PoolError};
use super::schema::projects;

/// Appends ids not yet present, in first-occurrence order.
const ADD_MEMBERS_SQL: &str = r#"
UPDATE projects
SET users = users || ARRAY(
        SELECT firsts.candidate
        FROM (
            SELECT DISTINCT ON (candidate) candidate, ord
            FROM unnest($2::uuid[]) WITH ORDINALITY AS requested(candidate, ord)
            ORDER BY candidate, ord
        ) AS firsts
        WHERE firsts.candidate <> ALL(projects.users)
        ORDER BY firsts.ord
    ),
    updated_at = now()
WHERE id = $1
RETURNING id, name, users, file_tree, created_at, updated_at
"#;

/// Drops every listed id, keeping the survivors' order.
const REMOVE_MEMBERS_SQL: &str = r#"
UPDATE projects
SET users = ARRAY(
        SELECT member
        FROM unnest(projects.users) WITH ORDINALITY AS existing(member, ord)
        WHERE member <> ALL($2::uuid[])
        ORDER BY ord
    ),
    updated_at = now()
WHERE id = $1
RETURNING id, name, users, file_tree, created_at, updated_at
"#;

/// Diesel-backed implementation of the project repository port.
#[derive(Clone)]
pub struct DieselProjectRepository {
    pool: DbPool,
}

impl DieselProjectRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> ProjectRepositoryError {
    map_pool_error(error, |message| ProjectRepositoryError::connection(message))
}

fn map_diesel(error: diesel::result::Error) -> ProjectRepositoryError {
    map_diesel_error(
        error,
        ProjectRepositoryError::query,
        ProjectRepositoryError::connection,
    )
}

fn uuids(ids: &[UserId]) -> Vec<Uuid> {
    ids.iter().map(|id| *id.as_uuid()).collect()
}

/// Convert a database row into a validated domain project.
fn row_to_project(row: ProjectRow) -> Result<Project, ProjectRepositoryError> {
    let ProjectRow {
        id,
        name,
        users,
        file_tree,
        created_at,
        updated_at,
    } = row;

    let name =
        ProjectName::new(name).map_err(|err| ProjectRepositoryError::query(err.to_string()))?;
    let file_tree =
        FileTree::new(file_tree).map_err(|err| ProjectRepositoryError::query(err.to_string()))?;

    Project::new(ProjectDraft {
        id: ProjectId::from_uuid(id),
        name,
        users: users.into_iter().map(UserId::from_uuid).collect(),
        file_tree,
        created_at,
        updated_at,
    })
    .map_err(|err| ProjectRepositoryError::query(format!("project {id}: {err}")))
}

#[async_trait]
impl ProjectRepository for DieselProjectRepository {
    async fn create(&self, project: &NewProject) -> Result<Project, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let new_row = NewProjectRow {
            id: Uuid::new_v4(),
            name: project.name.as_ref(),
            users: vec![*project.owner.as_uuid()],
            file_tree: project.file_tree.as_value(),
        };

        let row = diesel::insert_into(projects::table)
            .values(&new_row)
            .returning(ProjectRow::as_returning())
            .get_result::<ProjectRow>(&mut conn)
            .await
            .map_err(|err| {
                if unique_violation(&err).is_some() {
                    ProjectRepositoryError::duplicate_name(project.name.as_ref())
                } else {
                    map_diesel(err)
                }
            })?;

        row_to_project(row)
    }

    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = projects::table
            .filter(projects::id.eq(id.as_uuid()))
            .select(ProjectRow::as_select())
            .first::<ProjectRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(row_to_project).transpose()
    }

    async fn find_for_member(
        &self,
        id: &ProjectId,
        member: &UserId,
    ) -> Result<Option<Project>, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = projects::table
            .filter(projects::id.eq(id.as_uuid()))
            .filter(projects::users.contains(vec![*member.as_uuid()]))
            .select(ProjectRow::as_select())
            .first::<ProjectRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(row_to_project).transpose()
    }

    async fn list_for_member(
        &self,
        member: &UserId,
    ) -> Result<Vec<Project>, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<ProjectRow> = projects::table
            .filter(projects::users.contains(vec![*member.as_uuid()]))
            .order(projects::created_at.asc())
            .select(ProjectRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        rows.into_iter().map(row_to_project).collect()
    }

    async fn add_members(
        &self,
        id: &ProjectId,
        users: &[UserId],
    ) -> Result<Option<Project>, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = sql_query(ADD_MEMBERS_SQL)
            .bind::<SqlUuid, _>(*id.as_uuid())
            .bind::<Array<SqlUuid>, _>(uuids(users))
            .get_result::<ProjectRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(row_to_project).transpose()
    }

    async fn remove_members(
        &self,
        id: &ProjectId,
        users: &[UserId],
    ) -> Result<Option<Project>, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = sql_query(REMOVE_MEMBERS_SQL)
            .bind::<SqlUuid, _>(*id.as_uuid())
            .bind::<Array<SqlUuid>, _>(uuids(users))
            .get_result::<ProjectRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(row_to_project).transpose()
    }

    async fn replace_file_tree(
        &self,
        id: &ProjectId,
        file_tree: &FileTree,
    ) -> Result<Option<Project>, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = diesel::update(projects::table.filter(projects::id.eq(id.as_uuid())))
            .set((
                projects::file_tree.eq(file_tree.as_value()),
                projects::updated_at.eq(Utc::now()),
            ))
            .returning(ProjectRow::as_returning())
            .get_result::<ProjectRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(row_to_project).transpose()
    }

    async fn delete(&self, id: &ProjectId) -> Result<bool, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let deleted = diesel::delete(projects::table.filter(projects::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(deleted > 0)
    }
}
