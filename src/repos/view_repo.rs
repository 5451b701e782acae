/*
 * Responsibility
 * - views table reads for the catalog/admin surface
 */
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ViewRow {
    #[sqlx(rename = "viewId")]
    pub view_id: i64,

    pub name: String,
    pub description: Option<String>,

    #[sqlx(rename = "routePattern")]
    pub route_pattern: String,

    #[sqlx(rename = "isActive")]
    pub is_active: bool,

    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

pub async fn list(db: &PgPool) -> Result<Vec<ViewRow>, RepoError> {
    let rows = sqlx::query_as::<_, ViewRow>(
        r#"
        SELECT "viewId", name, description, "routePattern", "isActive", "createdAt"
        FROM views
        ORDER BY name
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn get(db: &PgPool, view_id: i64) -> Result<Option<ViewRow>, RepoError> {
    let row = sqlx::query_as::<_, ViewRow>(
        r#"
        SELECT "viewId", name, description, "routePattern", "isActive", "createdAt"
        FROM views
        WHERE "viewId" = $1
        "#,
    )
    .bind(view_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

// All views assigned to a role, active or not. Admin listing shows the raw
// assignment state; activity filtering is a decision-time concern.
pub async fn list_for_role(db: &PgPool, role_id: i64) -> Result<Vec<ViewRow>, RepoError> {
    let rows = sqlx::query_as::<_, ViewRow>(
        r#"
        SELECT v."viewId", v.name, v.description, v."routePattern", v."isActive", v."createdAt"
        FROM views v
        JOIN role_views rv ON rv."viewId" = v."viewId"
        WHERE rv."roleId" = $1
        ORDER BY v.name
        "#,
    )
    .bind(role_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}
