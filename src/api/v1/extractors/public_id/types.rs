/*
 * Responsibility
 * - Per-resource "meaningful id types" over the generic PublicId
 * - Multi-parameter assignment routes decode their ids by hand in the
 *   handler; only single-id routes get an alias here
 */
use super::core::PublicId;

// roles
pub enum RoleTag {}
pub type PublicRoleId = PublicId<RoleTag>;
