//! Sea-ORM entities for the identity tables

pub mod role;
pub mod user;
pub mod user_role;
