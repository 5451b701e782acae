/*
 * Responsibility
 * - Navigation response DTO: the filtered menu plus the role's landing route
 */
use serde::Serialize;

use crate::services::authz::navigation::NavGroup;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationResponse {
    pub groups: Vec<NavGroup>,
    // None for unknown roles: the frontend sends those back to login
    // instead of guessing a landing page.
    pub default_route: Option<&'static str>,
}
