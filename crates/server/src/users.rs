//! Users API endpoints.
//!
//! Passwords are accepted on create/update only and never serialized back.

use api_types::{
    ListParams,
    user::{UserNew, UserPatch, UserView},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::User;

use crate::{ServerError, list_query, server::ServerState};

fn view(user: User) -> UserView {
    UserView {
        id: user.id,
        username: user.username,
        email: user.email,
        is_staff: user.is_staff,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<UserView>>, ServerError> {
    let users = state.engine.list_users(&list_query(params)).await?;
    Ok(Json(users.into_iter().map(view).collect()))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserNew>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let user = state
        .engine
        .create_user(engine::UserNew::new(
            payload.username,
            payload.email,
            payload.password,
        ))
        .await?;
    Ok((StatusCode::CREATED, Json(view(user))))
}

pub async fn retrieve(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<UserView>, ServerError> {
    let user = state.engine.user(id).await?;
    Ok(Json(view(user)))
}

pub async fn replace(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(payload): Json<UserNew>,
) -> Result<Json<UserView>, ServerError> {
    let patch = engine::UserPatch {
        username: Some(payload.username),
        email: Some(payload.email),
        password: Some(payload.password),
    };
    let user = state.engine.update_user(id, patch).await?;
    Ok(Json(view(user)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(payload): Json<UserPatch>,
) -> Result<Json<UserView>, ServerError> {
    if payload.username.is_none() && payload.email.is_none() && payload.password.is_none() {
        return Err(ServerError::Generic(
            "provide at least one of username, email or password".to_string(),
        ));
    }

    let patch = engine::UserPatch {
        username: payload.username,
        email: payload.email,
        password: payload.password,
    };
    let user = state.engine.update_user(id, patch).await?;
    Ok(Json(view(user)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
