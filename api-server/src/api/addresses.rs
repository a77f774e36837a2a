use super::ApiError;
use crate::models::context::ContextPointer;
use address_cache::Address;
use log::error;
use rocket::serde::json::Json;
use rocket::State;

/// Addresses stored for a person so far
#[rocket::get("/addresses?<name>&<last>")]
pub async fn addresses(
    context: &State<ContextPointer>,
    name: Option<String>,
    last: Option<String>,
) -> Result<Json<Vec<Address>>, ApiError> {
    let name = name.unwrap_or_default();
    let last = last.unwrap_or_default();

    context
        .processor()
        .cached(&name, &last)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Error loading cached addresses for {}_{}: {}", name, last, e);
            ApiError::internal("Cache unavailable")
        })
}
