use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{repo_types::Role, services::AuthUser},
    state::AppState,
};

use super::dto::{ClothesItemResponse, CreateClothesRequest, Pagination};
use super::repo;

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/clothes", get(list_clothes))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/clothes", post(create_clothes_item))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn list_clothes(
    State(state): State<AppState>,
    user: AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<ClothesItemResponse>>, (StatusCode, String)> {
    let items = repo::list(&state.db, p.limit, p.offset)
        .await
        .map_err(internal)?;
    let items = items
        .into_iter()
        .map(|c| ClothesItemResponse {
            id: c.id,
            name: c.name,
            color: c.color,
            size: c.size,
            photo_url: c.photo_url,
            created_at: c.created_at,
            last_modified_at: c.last_modified_at,
        })
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state, user, payload), fields(user_id = user.id))]
pub async fn create_clothes_item(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateClothesRequest>,
) -> Result<(StatusCode, HeaderMap, Json<ClothesItemResponse>), (StatusCode, String)> {
    user.require_role(&[Role::Admin, Role::SuperAdmin])?;

    if payload.name.trim().is_empty() {
        warn!("empty item name");
        return Err((StatusCode::BAD_REQUEST, "Name must not be empty".into()));
    }

    let item = repo::insert(
        &state.db,
        payload.name.trim(),
        payload.color,
        payload.size,
        payload.photo_url.as_deref(),
    )
    .await
    .map_err(internal)?;

    info!(item_id = item.id, "clothes item created");

    let mut headers = HeaderMap::new();
    headers.insert(
        axum::http::header::LOCATION,
        format!("/clothes/{}", item.id).parse().unwrap(),
    );

    Ok((
        StatusCode::CREATED,
        headers,
        Json(ClothesItemResponse {
            id: item.id,
            name: item.name,
            color: item.color,
            size: item.size,
            photo_url: item.photo_url,
            created_at: item.created_at,
            last_modified_at: item.last_modified_at,
        }),
    ))
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
