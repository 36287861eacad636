use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Colorways the catalog carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "clothes_color", rename_all = "lowercase")]
pub enum Color {
    Pink,
    Black,
    White,
    Yellow,
}

/// Sizes the catalog carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "clothes_size", rename_all = "lowercase")]
pub enum Size {
    Xs,
    S,
    M,
    L,
    Xl,
    Xxl,
}

/// Clothing item record in the database. Items are global, not owned by users.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ClothesItem {
    pub id: i64,
    pub name: String,
    pub color: Color,
    pub size: Size,
    pub photo_url: Option<String>,
    pub created_at: OffsetDateTime,
    pub last_modified_at: OffsetDateTime,
}

#[cfg(test)]
mod serde_tests {
    use super::*;

    #[test]
    fn color_and_size_use_lowercase_wire_names() {
        assert_eq!(serde_json::to_string(&Color::Pink).unwrap(), "\"pink\"");
        assert_eq!(serde_json::to_string(&Size::Xxl).unwrap(), "\"xxl\"");
        assert_eq!(
            serde_json::from_str::<Size>("\"xs\"").unwrap(),
            Size::Xs
        );
    }

    #[test]
    fn unknown_variants_are_rejected() {
        assert!(serde_json::from_str::<Color>("\"green\"").is_err());
        assert!(serde_json::from_str::<Size>("\"xxxl\"").is_err());
    }
}
