pub mod identity;
pub mod public_id;

pub use identity::CallerIdentity;
pub use public_id::PublicRoleId;
