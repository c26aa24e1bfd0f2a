//! Company endpoints (staff only) and the revenue-only financials view.

use api_types::{
    ListParams,
    company::{CompanyFinancialView, CompanyNew, CompanyPatch, CompanyView},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Company, CompanyFinancial, Money, User};

use crate::{ServerError, list_query, server::ServerState};

fn view(company: Company) -> CompanyView {
    CompanyView {
        id: company.id,
        company_name: company.company_name,
        total_revenue_minor: company.total_revenue.minor(),
    }
}

fn financial_view(financial: CompanyFinancial) -> CompanyFinancialView {
    CompanyFinancialView {
        id: financial.id,
        total_revenue_minor: financial.total_revenue.minor(),
    }
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<CompanyView>>, ServerError> {
    state.engine.require_staff(&user)?;
    let companies = state.engine.list_companies(&list_query(params)).await?;
    Ok(Json(companies.into_iter().map(view).collect()))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<CompanyNew>,
) -> Result<(StatusCode, Json<CompanyView>), ServerError> {
    state.engine.require_staff(&user)?;
    let company = state
        .engine
        .create_company(engine::CompanyNew {
            company_name: payload.company_name,
            total_revenue: Money::new(payload.total_revenue_minor),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(view(company))))
}

pub async fn retrieve(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<CompanyView>, ServerError> {
    state.engine.require_staff(&user)?;
    let company = state.engine.company(id).await?;
    Ok(Json(view(company)))
}

pub async fn replace(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(payload): Json<CompanyNew>,
) -> Result<Json<CompanyView>, ServerError> {
    state.engine.require_staff(&user)?;
    let patch = engine::CompanyPatch {
        company_name: Some(payload.company_name),
        total_revenue: Some(Money::new(payload.total_revenue_minor)),
    };
    let company = state.engine.update_company(id, patch).await?;
    Ok(Json(view(company)))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(payload): Json<CompanyPatch>,
) -> Result<Json<CompanyView>, ServerError> {
    state.engine.require_staff(&user)?;
    if payload.company_name.is_none() && payload.total_revenue_minor.is_none() {
        return Err(ServerError::Generic(
            "provide at least one of company_name or total_revenue_minor".to_string(),
        ));
    }

    let patch = engine::CompanyPatch {
        company_name: payload.company_name,
        total_revenue: payload.total_revenue_minor.map(Money::new),
    };
    let company = state.engine.update_company(id, patch).await?;
    Ok(Json(view(company)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    state.engine.require_staff(&user)?;
    state.engine.delete_company(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_financials(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<CompanyFinancialView>>, ServerError> {
    state.engine.require_financials_access(&user)?;
    let financials = state.engine.company_financials().await?;
    Ok(Json(financials.into_iter().map(financial_view).collect()))
}

pub async fn retrieve_financial(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<CompanyFinancialView>, ServerError> {
    state.engine.require_financials_access(&user)?;
    let financial = state.engine.company_financial(id).await?;
    Ok(Json(financial_view(financial)))
}
