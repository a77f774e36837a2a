use crate::models::context::{Context, ContextPointer};
use log::warn;
use rocket::response::content::RawHtml;
use rocket::{Request, State};
use tokio::fs;

async fn page(context: Option<&Context>, file: &str, fallback: &str) -> RawHtml<String> {
    if let Some(context) = context {
        let path = context.config().html_dir().join(file);
        match fs::read_to_string(&path).await {
            Ok(html) => return RawHtml(html),
            Err(e) => warn!("Cannot read page {}: {}", path.display(), e),
        }
    }
    RawHtml(format!("<!DOCTYPE html><html><body><h1>{}</h1></body></html>", fallback))
}

#[rocket::get("/")]
pub async fn index(context: &State<ContextPointer>) -> RawHtml<String> {
    page(Some(context.inner().as_ref()), "main.html", "Address processing").await
}

#[rocket::catch(404)]
pub async fn not_found(request: &Request<'_>) -> RawHtml<String> {
    let context = request.rocket().state::<ContextPointer>();
    page(context.map(|c| c.as_ref()), "404.html", "404 Not Found").await
}

#[rocket::catch(500)]
pub async fn internal_error(request: &Request<'_>) -> RawHtml<String> {
    let context = request.rocket().state::<ContextPointer>();
    page(context.map(|c| c.as_ref()), "500.html", "500 Internal Server Error").await
}
