/*
 * Responsibility
 * - Verification request/response DTOs (wire shape of the read path)
 * - No validate(): a nonsense query is a denial, never a 400 — the read
 *   path always answers with a decision
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPermissionRequest {
    pub user_id: Uuid,
    pub view: String,
    pub permission: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyViewRequest {
    pub user_id: Uuid,
    pub view: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRouteRequest {
    pub user_id: Uuid,
    pub route: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyBatchRequest {
    pub queries: Vec<VerifyPermissionRequest>,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub granted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl VerifyResponse {
    pub fn decision(granted: bool) -> Self {
        Self {
            granted,
            message: (!granted).then(|| "access denied".to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchEntry {
    pub granted: bool,
}

#[derive(Debug, Serialize)]
pub struct VerifyBatchResponse {
    pub results: Vec<BatchEntry>,
}
