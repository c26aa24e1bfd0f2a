use axum::{
    Router,
    extract::{Request, State},
    http::{HeaderValue, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};

use std::sync::Arc;

use crate::{companies, products, sales, users};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

fn unauthorized() -> Response {
    let mut response = StatusCode::UNAUTHORIZED.into_response();
    response.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"storekeep\""),
    );
    response
}

/// Basic authentication.
///
/// On success the authenticated [`engine::User`] is stored in the request
/// extensions for the handlers.
async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let Some(TypedHeader(auth_header)) = auth_header else {
        return Err(unauthorized());
    };
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(unauthorized());
    }

    let user = match state
        .engine
        .authenticate(auth_header.username(), auth_header.password())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::debug!(username = auth_header.username(), "invalid credentials");
            return Err(unauthorized());
        }
        Err(err) => {
            tracing::error!("authentication failed: {err}");
            return Err(StatusCode::INTERNAL_SERVER_ERROR.into_response());
        }
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Build the API router. Every route requires basic authentication.
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{id}",
            get(products::retrieve)
                .put(products::replace)
                .patch(products::update)
                .delete(products::delete),
        )
        .route("/sales", get(sales::list).post(sales::create))
        .route(
            "/sales/{id}",
            get(sales::retrieve)
                .patch(sales::update)
                .delete(sales::delete),
        )
        .route("/companies", get(companies::list).post(companies::create))
        .route(
            "/companies/{id}",
            get(companies::retrieve)
                .put(companies::replace)
                .patch(companies::update)
                .delete(companies::delete),
        )
        .route("/company-financials", get(companies::list_financials))
        .route("/company-financials/{id}", get(companies::retrieve_financial))
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/{id}",
            get(users::retrieve)
                .put(users::replace)
                .patch(users::update)
                .delete(users::delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}
