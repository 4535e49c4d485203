//! HTTP routes

use crate::service::PredictionService;
use crate::types::{ErrorResponse, PredictQuery};
use serde_json::json;
use std::convert::Infallible;
use tracing::{error, info};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

/// All service routes with CORS and JSON error replies
pub fn routes(
    service: PredictionService,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let cors = warp::cors().allow_any_origin().allow_methods(vec!["GET"]);

    index()
        .or(predict(service.clone()))
        .or(health(service))
        .recover(handle_rejection)
        .with(cors)
}

/// `GET /`
fn index() -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path::end()
        .and(warp::get())
        .map(|| warp::reply::json(&json!({ "message": "FixTheGap API running" })))
}

/// `GET /predict?gender=&role=&experience=&location=`
fn predict(
    service: PredictionService,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path("predict")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<PredictQuery>())
        .and(with_service(service))
        .and_then(handle_predict)
}

/// `GET /health`
fn health(service: PredictionService) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(move || warp::reply::json(&service.health()))
}

fn with_service(
    service: PredictionService,
) -> impl Filter<Extract = (PredictionService,), Error = Infallible> + Clone {
    warp::any().map(move || service.clone())
}

/// Errors from the prediction flow are reported with status 200 so browser
/// clients can read the body.
async fn handle_predict(
    query: PredictQuery,
    service: PredictionService,
) -> Result<impl Reply, Infallible> {
    match service.predict(&query).await {
        Ok(response) => Ok(warp::reply::json(&response)),
        Err(e) => {
            if e.is_validation() {
                info!("Rejected prediction request: {}", e);
            } else {
                error!("Prediction failed: {}", e);
            }
            let body = ErrorResponse {
                error: e.to_string(),
                allowed_values: e.allowed_values().map(<[String]>::to_vec),
            };
            Ok(warp::reply::json(&body))
        }
    }
}

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
        (StatusCode::BAD_REQUEST, format!("Invalid query: {}", e))
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed".to_string(),
        )
    } else {
        error!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    };

    let body = ErrorResponse {
        error: message,
        allowed_values: None,
    };
    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}
