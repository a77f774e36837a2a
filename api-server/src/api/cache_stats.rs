use crate::models::context::ContextPointer;
use address_cache::CacheStats;
use rocket::serde::json::Json;
use rocket::State;

/// Outcome counters of background cache updates
#[rocket::get("/cache/stats")]
pub fn cache_stats(context: &State<ContextPointer>) -> Json<CacheStats> {
    Json(context.processor().stats())
}
