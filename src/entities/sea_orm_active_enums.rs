//! `SeaORM` string-backed enums

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum MaterialType {
    /// Class note
    #[default]
    #[sea_orm(string_value = "note")]
    Note,
    /// Presentation slide
    #[sea_orm(string_value = "slide")]
    Slide,
    #[sea_orm(string_value = "assignment")]
    Assignment,
    /// Reference book
    #[sea_orm(string_value = "book")]
    Book,
    /// Previous exam question
    #[sea_orm(string_value = "question")]
    Question,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum PostType {
    #[sea_orm(string_value = "personal")]
    Personal,
    #[default]
    #[sea_orm(string_value = "discussion")]
    Discussion,
    #[sea_orm(string_value = "question")]
    Question,
    #[sea_orm(string_value = "announcement")]
    Announcement,
    /// Resource sharing
    #[sea_orm(string_value = "resource")]
    Resource,
}

impl MaterialType {
    /// Parses the stored value (`"note"`, `"slide"`, ...).
    pub fn parse(value: &str) -> Option<Self> {
        Self::try_from_value(&value.to_string()).ok()
    }
}

impl PostType {
    pub fn parse(value: &str) -> Option<Self> {
        Self::try_from_value(&value.to_string()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_and_unknown_values() {
        assert_eq!(MaterialType::parse("slide"), Some(MaterialType::Slide));
        assert_eq!(MaterialType::parse("invalid_type"), None);
        assert_eq!(PostType::parse("resource"), Some(PostType::Resource));
        assert_eq!(PostType::parse(""), None);
    }

    #[test]
    fn test_defaults_match_schema_defaults() {
        assert_eq!(MaterialType::default().to_value(), "note");
        assert_eq!(PostType::default().to_value(), "discussion");
    }
}
