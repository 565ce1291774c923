pub mod admin_users;
pub mod audit_log;
pub mod auth;
pub mod health;
pub mod pages;
pub mod posts;
pub mod roles;
pub mod users;
