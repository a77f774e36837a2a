use super::ApiError;
use crate::models::context::ContextPointer;
use address_cache::{ProcessRequest, ProcessResponse};
use log::{error, warn};
use rocket::serde::json::{self, Json};
use rocket::State;

/// Deduplicate the submitted addresses and merge them into the cache
#[rocket::post("/process", data = "<request>")]
pub async fn process(
    context: &State<ContextPointer>,
    request: Result<Json<ProcessRequest>, json::Error<'_>>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let request = match request {
        Ok(request) => request.into_inner(),
        Err(e) => {
            warn!("Error binding JSON: {}", e);
            return Err(ApiError::bad_request("Invalid JSON format"));
        }
    };

    context.processor().process(request).map(Json).map_err(|e| {
        error!("Error processing addresses: {}", e);
        ApiError::internal("Processing failed")
    })
}
