/*
 * Responsibility
 * - roles table reads for the catalog/admin surface
 * - activity filtering for grant decisions lives in grant_repo, not here
 */
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RoleRow {
    #[sqlx(rename = "roleId")]
    pub role_id: i64,

    pub name: String,
    pub description: Option<String>,

    #[sqlx(rename = "accessLevel")]
    pub access_level: i32,

    #[sqlx(rename = "isActive")]
    pub is_active: bool,

    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

pub async fn list(db: &PgPool) -> Result<Vec<RoleRow>, RepoError> {
    let rows = sqlx::query_as::<_, RoleRow>(
        r#"
        SELECT "roleId", name, description, "accessLevel", "isActive", "createdAt"
        FROM roles
        ORDER BY "accessLevel" DESC, name
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn get(db: &PgPool, role_id: i64) -> Result<Option<RoleRow>, RepoError> {
    let row = sqlx::query_as::<_, RoleRow>(
        r#"
        SELECT "roleId", name, description, "accessLevel", "isActive", "createdAt"
        FROM roles
        WHERE "roleId" = $1
        "#,
    )
    .bind(role_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}
