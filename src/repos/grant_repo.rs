/*
 * Responsibility
 * - The aggregated grant queries the evaluator snapshots from
 *   (isActive filters applied here, at decision time)
 * - Assignment mutations (role_views / role_view_permissions), the only
 *   writes this service performs
 */
use sqlx::PgPool;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActiveRoleRow {
    #[sqlx(rename = "roleId")]
    pub role_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ViewGrantRow {
    pub name: String,
    #[sqlx(rename = "routePattern")]
    pub route_pattern: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActionGrantRow {
    #[sqlx(rename = "viewName")]
    pub view_name: String,
    #[sqlx(rename = "permissionName")]
    pub permission_name: String,
}

pub async fn active_role_by_name(
    db: &PgPool,
    role_name: &str,
) -> Result<Option<ActiveRoleRow>, RepoError> {
    let row = sqlx::query_as::<_, ActiveRoleRow>(
        r#"
        SELECT "roleId", name
        FROM roles
        WHERE name = $1 AND "isActive"
        "#,
    )
    .bind(role_name)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

// Active views the role may navigate to (RoleView rows).
pub async fn active_view_grants(db: &PgPool, role_id: i64) -> Result<Vec<ViewGrantRow>, RepoError> {
    let rows = sqlx::query_as::<_, ViewGrantRow>(
        r#"
        SELECT v.name, v."routePattern"
        FROM role_views rv
        JOIN views v ON v."viewId" = rv."viewId"
        WHERE rv."roleId" = $1 AND v."isActive"
        "#,
    )
    .bind(role_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

// Active (view, permission) pairs the role may perform (RoleViewPermission
// rows). Both the view and the permission must be active.
pub async fn active_action_grants(
    db: &PgPool,
    role_id: i64,
) -> Result<Vec<ActionGrantRow>, RepoError> {
    let rows = sqlx::query_as::<_, ActionGrantRow>(
        r#"
        SELECT v.name AS "viewName", p.name AS "permissionName"
        FROM role_view_permissions rvp
        JOIN views v ON v."viewId" = rvp."viewId"
        JOIN permissions p ON p."permissionId" = rvp."permissionId"
        WHERE rvp."roleId" = $1 AND v."isActive" AND p."isActive"
        "#,
    )
    .bind(role_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

// Returns false when the assignment already existed.
pub async fn assign_view(db: &PgPool, role_id: i64, view_id: i64) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        INSERT INTO role_views ("roleId", "viewId")
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(role_id)
    .bind(view_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

// Removing a view from a role also removes that pair's permission grants,
// in the same transaction: a later re-assign must start with no actions.
pub async fn unassign_view(db: &PgPool, role_id: i64, view_id: i64) -> Result<bool, RepoError> {
    let mut tx = db.begin().await.map_err(RepoError::Db)?;

    sqlx::query(
        r#"
        DELETE FROM role_view_permissions
        WHERE "roleId" = $1 AND "viewId" = $2
        "#,
    )
    .bind(role_id)
    .bind(view_id)
    .execute(&mut *tx)
    .await?;

    let result = sqlx::query(
        r#"
        DELETE FROM role_views
        WHERE "roleId" = $1 AND "viewId" = $2
        "#,
    )
    .bind(role_id)
    .bind(view_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await.map_err(RepoError::Db)?;

    Ok(result.rows_affected() > 0)
}

pub async fn assign_permission(
    db: &PgPool,
    role_id: i64,
    view_id: i64,
    permission_id: i64,
) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        INSERT INTO role_view_permissions ("roleId", "viewId", "permissionId")
        VALUES ($1, $2, $3)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(role_id)
    .bind(view_id)
    .bind(permission_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn unassign_permission(
    db: &PgPool,
    role_id: i64,
    view_id: i64,
    permission_id: i64,
) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM role_view_permissions
        WHERE "roleId" = $1 AND "viewId" = $2 AND "permissionId" = $3
        "#,
    )
    .bind(role_id)
    .bind(view_id)
    .bind(permission_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
