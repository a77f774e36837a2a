mod addresses;
mod cache_stats;
mod pages;
mod process;


use rocket::serde::json::Json;
use rocket::{Catcher, Route};
use serde::{Deserialize, Serialize};

pub fn routes() -> Vec<Route> {
    rocket::routes![
        pages::index,
        process::process,
        addresses::addresses,
        cache_stats::cache_stats,
    ]
}

pub fn catchers() -> Vec<Catcher> {
    rocket::catchers![pages::not_found, pages::internal_error]
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// JSON error replies of the API routes
#[derive(Debug, rocket::Responder)]
pub enum ApiError {
    #[response(status = 400)]
    BadRequest(Json<ErrorBody>),
    #[response(status = 500)]
    Internal(Json<ErrorBody>),
}

impl ApiError {
    pub fn bad_request(message: &str) -> Self {
        ApiError::BadRequest(Json(ErrorBody {
            error: message.to_string(),
        }))
    }

    pub fn internal(message: &str) -> Self {
        ApiError::Internal(Json(ErrorBody {
            error: message.to_string(),
        }))
    }
}
