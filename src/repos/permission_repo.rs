/*
 * Responsibility
 * - permissions table reads for the catalog/admin surface
 */
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PermissionRow {
    #[sqlx(rename = "permissionId")]
    pub permission_id: i64,

    pub name: String,
    pub description: Option<String>,

    #[sqlx(rename = "isActive")]
    pub is_active: bool,

    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

pub async fn list(db: &PgPool) -> Result<Vec<PermissionRow>, RepoError> {
    let rows = sqlx::query_as::<_, PermissionRow>(
        r#"
        SELECT "permissionId", name, description, "isActive", "createdAt"
        FROM permissions
        ORDER BY name
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn get(db: &PgPool, permission_id: i64) -> Result<Option<PermissionRow>, RepoError> {
    let row = sqlx::query_as::<_, PermissionRow>(
        r#"
        SELECT "permissionId", name, description, "isActive", "createdAt"
        FROM permissions
        WHERE "permissionId" = $1
        "#,
    )
    .bind(permission_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}
