//! Sales API endpoints.
//!
//! Creating and deleting a sale moves product stock and ledger revenue; see
//! [`engine::Engine::create_sale`] and [`engine::Engine::delete_sale`].

use api_types::{
    ListParams,
    sale::{SaleNew, SaleUpdate, SaleView},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{Sale, User};

use crate::{ServerError, list_query, server::ServerState};

fn view(sale: Sale) -> SaleView {
    SaleView {
        id: sale.id,
        product: sale.product_id,
        quantity_sold: sale.quantity_sold,
        sale_date: sale.sale_date,
        unit_price_minor: sale.unit_price.minor(),
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<SaleView>>, ServerError> {
    let sales = state.engine.list_sales(&list_query(params)).await?;
    Ok(Json(sales.into_iter().map(view).collect()))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<SaleNew>,
) -> Result<(StatusCode, Json<SaleView>), ServerError> {
    let mut cmd = engine::SaleNew::new(payload.product, payload.quantity_sold);
    if let Some(sale_date) = payload.sale_date {
        cmd = cmd.sale_date(sale_date.with_timezone(&Utc));
    }

    let sale = state.engine.create_sale(cmd).await?;
    tracing::debug!(sale_id = sale.id, username = %user.username, "sale created");
    Ok((StatusCode::CREATED, Json(view(sale))))
}

pub async fn retrieve(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<SaleView>, ServerError> {
    let sale = state.engine.sale(id).await?;
    Ok(Json(view(sale)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(payload): Json<SaleUpdate>,
) -> Result<Json<SaleView>, ServerError> {
    let sale = state
        .engine
        .update_sale(id, payload.sale_date.with_timezone(&Utc))
        .await?;
    Ok(Json(view(sale)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_sale(id).await?;
    tracing::debug!(sale_id = id, username = %user.username, "sale deleted");
    Ok(StatusCode::NO_CONTENT)
}
