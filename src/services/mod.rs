pub mod auth;
pub mod authz;
pub mod cache;
pub mod id_codec;
