//! `SeaORM` entities for the learning hub schema

pub mod comment;
pub mod department;
pub mod material;
pub mod post;
pub mod post_comment;
pub mod profile;
pub mod rating;
pub mod saved_material;
pub mod sea_orm_active_enums;
pub mod study_group;
pub mod study_group_member;
pub mod subject;
pub mod user;
