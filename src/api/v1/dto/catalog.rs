/*
 * Responsibility
 * - Role / View / Permission catalog response DTOs
 * - Internal ids are encoded to public ids at this boundary
 */
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::AppError;
use crate::repos::{permission_repo::PermissionRow, role_repo::RoleRow, view_repo::ViewRow};
use crate::services::id_codec::IdCodec;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub access_level: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl RoleResponse {
    pub fn from_row(codec: &IdCodec, row: RoleRow) -> Result<Self, AppError> {
        Ok(Self {
            id: codec.encode(row.role_id)?,
            name: row.name,
            description: row.description,
            access_level: row.access_level,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub route_pattern: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl ViewResponse {
    pub fn from_row(codec: &IdCodec, row: ViewRow) -> Result<Self, AppError> {
        Ok(Self {
            id: codec.encode(row.view_id)?,
            name: row.name,
            description: row.description,
            route_pattern: row.route_pattern,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl PermissionResponse {
    pub fn from_row(codec: &IdCodec, row: PermissionRow) -> Result<Self, AppError> {
        Ok(Self {
            id: codec.encode(row.permission_id)?,
            name: row.name,
            description: row.description,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct RolesListResponse {
    pub roles: Vec<RoleResponse>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ViewsListResponse {
    pub views: Vec<ViewResponse>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct PermissionsListResponse {
    pub permissions: Vec<PermissionResponse>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
