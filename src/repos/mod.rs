pub mod error;
pub mod grant_repo;
pub mod permission_repo;
pub mod role_repo;
pub mod view_repo;
