pub mod access_jwt;

pub use access_jwt::{AccessJwtError, AuthService};
