use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Coarse permission tier attached to every user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    User,
}

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,                          // unique user ID
    pub email: String,                    // user email, unique
    #[serde(skip_serializing)]
    pub password_hash: String,            // Argon2 hash, not exposed in JSON
    pub full_name: String,                // two space-separated names
    pub phone: Option<String>,            // optional contact number
    pub role: Role,                       // defaults to 'user' at the store
    pub created_at: OffsetDateTime,       // set by the database
    pub last_modified_at: OffsetDateTime, // maintained by trigger
}
