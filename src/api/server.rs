//! HTTP server for the merged catalog.
//!
//! # API Endpoints
//!
//! | Method | Path      | Description                                     |
//! |--------|-----------|-------------------------------------------------|
//! | GET    | `/`       | Full merged catalog as a JSON array             |
//! | GET    | `/hotels` | Catalog filtered by `ids` or `destination_ids`  |
//!
//! Supplying both query parameters is a client error (400). All responses
//! are JSON. The router carries a permissive CORS layer (the API is
//! read-only) and a 15 second request timeout; shutdown is graceful on
//! ctrl-c.

use axum::{
    extract::{Query, State},
    http::{header, Method, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde_json::Value;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer};
use tracing::info;

use super::types::{error_response, parse_destination_list, parse_id_list, HotelsQuery};
use crate::error::{ServerError, ServerResult};
use crate::models::Hotel;
use crate::store::HotelStore;

/// Build the catalog router over a shared store.
pub fn router(store: Arc<HotelStore>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/", get(get_all_hotels))
        .route("/hotels", get(query_hotels))
        .layer(cors)
        .layer(TimeoutLayer::new(Duration::from_secs(15)))
        .with_state(store)
}

/// Serve the catalog until ctrl-c.
pub async fn start_server(
    addr: SocketAddr,
    store: Arc<HotelStore>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(store);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("serving catalog on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

/// `GET /` - the full catalog.
async fn get_all_hotels(State(store): State<Arc<HotelStore>>) -> Json<Vec<Hotel>> {
    Json(store.get_all())
}

/// `GET /hotels` - the catalog filtered by identity or destination.
async fn query_hotels(
    State(store): State<Arc<HotelStore>>,
    Query(query): Query<HotelsQuery>,
) -> Result<Json<Vec<Hotel>>, (StatusCode, Json<Value>)> {
    filter_hotels(&store, &query)
        .map(Json)
        .map_err(|err| match err {
            ServerError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(error_response(&message)))
            }
            ServerError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(error_response(&message)),
            ),
        })
}

fn filter_hotels(store: &HotelStore, query: &HotelsQuery) -> ServerResult<Vec<Hotel>> {
    match (&query.ids, &query.destination_ids) {
        (Some(_), Some(_)) => Err(ServerError::BadRequest(
            "supply either 'ids' or 'destination_ids', not both".to_string(),
        )),
        (Some(ids), None) => Ok(store.filter_by_ids(&parse_id_list(ids))),
        (None, Some(destinations)) => {
            Ok(store.filter_by_destinations(&parse_destination_list(destinations)?))
        }
        (None, None) => Ok(store.get_all()),
    }
}
