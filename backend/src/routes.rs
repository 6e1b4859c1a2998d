use actix_web::{web, HttpResponse, Responder};
use log::{error, info, warn};

use crate::error::PredictError;
use crate::models::{
    ApiResponse, BatchPredictResponse, HealthStatus, PredictRequest, PredictResponse,
};
use crate::{stats, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check)).service(
        web::scope("/api")
            .route("/predict", web::post().to(predict))
            .route("/batch-predict", web::post().to(batch_predict))
            .route("/model-info", web::get().to(model_info))
            .route("/stats", web::get().to(prediction_stats)),
    );
}

/// JSON extractor settings; body errors come back in the same `{success, error}` shape.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            warn!("Rejected request body: {}", err);
            stats::global().record_rejection();
            PredictError::MalformedBody(err.to_string()).into()
        })
}

pub async fn not_found() -> impl Responder {
    HttpResponse::NotFound().json(ApiResponse::<()>::error("endpoint not found"))
}

async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthStatus::ok())
}

async fn predict(
    state: web::Data<AppState>,
    req: web::Json<PredictRequest>,
) -> Result<HttpResponse, PredictError> {
    let vehicle = req.validate().map_err(|e| {
        warn!("Validation failed: {}", e);
        stats::global().record_rejection();
        e
    })?;

    let prediction = state.estimator.estimate(&vehicle);
    stats::global().record_prediction(&prediction);
    info!(
        "Prediction for {} {} ({}, {} mi): {}",
        vehicle.make, vehicle.model, vehicle.year, vehicle.mileage, prediction.price
    );

    Ok(HttpResponse::Ok().json(PredictResponse::new(prediction)))
}

async fn batch_predict(
    state: web::Data<AppState>,
    req: web::Json<Vec<PredictRequest>>,
) -> Result<HttpResponse, PredictError> {
    let requests = req.into_inner();
    info!("Batch prediction request: {} vehicles", requests.len());

    let checked = if requests.is_empty() {
        Err(PredictError::EmptyBatch)
    } else if requests.len() > state.max_batch_size {
        Err(PredictError::BatchTooLarge {
            size: requests.len(),
            limit: state.max_batch_size,
        })
    } else {
        requests
            .iter()
            .enumerate()
            .map(|(i, r)| {
                r.validate().map_err(|e| PredictError::InBatch {
                    index: i + 1,
                    source: Box::new(e),
                })
            })
            .collect::<Result<Vec<_>, _>>()
    };
    let vehicles = checked.map_err(|e| {
        warn!("Batch rejected: {}", e);
        stats::global().record_rejection();
        e
    })?;

    let estimator = state.estimator;
    let predictions = web::block(move || estimator.estimate_batch(&vehicles))
        .await
        .map_err(|e| {
            error!("Blocking pool failed during batch prediction: {}", e);
            PredictError::Internal(e.to_string())
        })?;

    for prediction in &predictions {
        stats::global().record_prediction(prediction);
    }
    info!("Batch prediction served: {} results", predictions.len());

    Ok(HttpResponse::Ok().json(BatchPredictResponse::new(predictions)))
}

async fn model_info(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::success(state.estimator.info()))
}

async fn prediction_stats() -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::success(stats::get_stats()))
}
