//! Products API endpoints.

use api_types::{
    ListParams,
    product::{ProductNew, ProductPatch, ProductView},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Money, Product};

use crate::{ServerError, list_query, server::ServerState};

fn view(product: Product) -> ProductView {
    ProductView {
        id: product.id,
        name: product.name,
        description: product.description,
        photo: product.photo,
        quantity: product.quantity,
        price_minor: product.price.minor(),
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ProductView>>, ServerError> {
    let products = state.engine.list_products(&list_query(params)).await?;
    Ok(Json(products.into_iter().map(view).collect()))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductNew>,
) -> Result<(StatusCode, Json<ProductView>), ServerError> {
    let mut cmd = engine::ProductNew::new(
        payload.name,
        payload.quantity,
        Money::new(payload.price_minor),
    )
    .description(payload.description);
    cmd.photo = payload.photo;

    let product = state.engine.create_product(cmd).await?;
    Ok((StatusCode::CREATED, Json(view(product))))
}

pub async fn retrieve(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductView>, ServerError> {
    let product = state.engine.product(id).await?;
    Ok(Json(view(product)))
}

/// Full replacement: every field is written, a missing photo clears it.
pub async fn replace(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(payload): Json<ProductNew>,
) -> Result<Json<ProductView>, ServerError> {
    let patch = engine::ProductPatch {
        name: Some(payload.name),
        description: Some(payload.description),
        photo: Some(payload.photo),
        quantity: Some(payload.quantity),
        price: Some(Money::new(payload.price_minor)),
    };

    let product = state.engine.update_product(id, patch).await?;
    Ok(Json(view(product)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(payload): Json<ProductPatch>,
) -> Result<Json<ProductView>, ServerError> {
    let patch = engine::ProductPatch {
        name: payload.name,
        description: payload.description,
        photo: payload.photo.map(Some),
        quantity: payload.quantity,
        price: payload.price_minor.map(Money::new),
    };
    if patch.is_empty() {
        return Err(ServerError::Generic(
            "provide at least one field to update".to_string(),
        ));
    }

    let product = state.engine.update_product(id, patch).await?;
    Ok(Json(view(product)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
