pub mod admin;
pub mod auth;
pub mod comments;
pub mod departments;
pub mod health;
pub mod home;
pub mod materials;
pub mod posts;
pub mod profile;
pub mod saved;
pub mod search;
pub mod study_groups;
pub mod subjects;
