use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::clothes::repo_types::{Color, Size};

/// Request body for creating a catalog item.
#[derive(Debug, Deserialize)]
pub struct CreateClothesRequest {
    pub name: String,
    pub color: Color,
    pub size: Size,
    pub photo_url: Option<String>,
}

/// Catalog item returned to the client.
#[derive(Debug, Serialize)]
pub struct ClothesItemResponse {
    pub id: i64,
    pub name: String,
    pub color: Color,
    pub size: Size,
    pub photo_url: Option<String>,
    pub created_at: OffsetDateTime,
    pub last_modified_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 {
    50
}

#[cfg(test)]
mod dto_tests {
    use super::*;

    #[test]
    fn create_request_parses_enum_fields() {
        let req: CreateClothesRequest =
            serde_json::from_str(r#"{"name":"Summer Tee","color":"yellow","size":"m"}"#).unwrap();
        assert_eq!(req.name, "Summer Tee");
        assert_eq!(req.color, Color::Yellow);
        assert_eq!(req.size, Size::M);
        assert!(req.photo_url.is_none());
    }

    #[test]
    fn create_request_rejects_bad_color() {
        let res = serde_json::from_str::<CreateClothesRequest>(
            r#"{"name":"Summer Tee","color":"green","size":"m"}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn pagination_defaults_apply() {
        let p: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(p.limit, 50);
        assert_eq!(p.offset, 0);
    }
}
