//! HTTP handlers.

use actix_web::HttpResponse;

use crate::services::ServiceError;

pub mod api;

/// Maps a service failure onto the matching HTTP status.
pub fn error_response(err: &ServiceError) -> HttpResponse {
    match err {
        ServiceError::InvalidPageRequest(_) | ServiceError::TypeConstraint(_) => {
            HttpResponse::BadRequest().body(err.to_string())
        }
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        ServiceError::StoreUnavailable(_) => HttpResponse::ServiceUnavailable().finish(),
    }
}
