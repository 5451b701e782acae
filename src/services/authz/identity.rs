/*
 * Responsibility
 * - The identity the evaluator works with: (userId, roleName) from verified claims
 * - KnownRole: closed enumeration of roles the UI special-cases (default route),
 *   with an explicit Unknown variant that fails closed
 */
use uuid::Uuid;

/// Identity resolved from an already-verified access token.
///
/// The evaluator never sees raw tokens; the auth middleware decodes and
/// validates the token and hands this value down. A token without a role
/// claim still yields an `Identity` (the user is authenticated), but every
/// grant decision for it resolves to denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role_name: Option<String>,
}

impl Identity {
    pub fn new(user_id: Uuid, role_name: Option<String>) -> Self {
        Self { user_id, role_name }
    }

    pub fn role_name(&self) -> Option<&str> {
        self.role_name.as_deref()
    }
}

/// Roles the frontend routes specially after login.
///
/// Deliberately a closed enum rather than lower-cased string comparison
/// scattered through callers: an unrecognized role is `Unknown` and gets no
/// default route, so nothing silently falls through to an admin landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownRole {
    Admin,
    Supervisor,
    Vendedor,
    Unknown,
}

impl KnownRole {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "admin" | "administrador" => Self::Admin,
            "supervisor" => Self::Supervisor,
            "vendedor" => Self::Vendedor,
            _ => Self::Unknown,
        }
    }

    /// Landing route after login. `None` for unknown roles: the caller must
    /// send those back to the login screen instead of guessing.
    pub fn default_route(self) -> Option<&'static str> {
        match self {
            Self::Admin => Some("/inicio"),
            Self::Supervisor => Some("/leads"),
            Self::Vendedor => Some("/leads"),
            Self::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_parse_case_insensitively() {
        assert_eq!(KnownRole::from_name("Admin"), KnownRole::Admin);
        assert_eq!(KnownRole::from_name("ADMINISTRADOR"), KnownRole::Admin);
        assert_eq!(KnownRole::from_name(" vendedor "), KnownRole::Vendedor);
        assert_eq!(KnownRole::from_name("supervisor"), KnownRole::Supervisor);
    }

    #[test]
    fn unrecognized_role_has_no_default_route() {
        let role = KnownRole::from_name("contador");
        assert_eq!(role, KnownRole::Unknown);
        assert_eq!(role.default_route(), None);
    }

    #[test]
    fn known_roles_have_default_routes() {
        assert_eq!(KnownRole::Admin.default_route(), Some("/inicio"));
        assert_eq!(KnownRole::Vendedor.default_route(), Some("/leads"));
    }
}
