mod api;
mod logging;
mod models;

use log::info;
use models::config::{Config, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
use models::context::{Context, ContextPointer};
use rocket::fairing::AdHoc;
use rocket::{Build, Rocket};
use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

pub fn build(config: Config) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("address", config.address()))
        .merge(("port", config.port()));
    let context: ContextPointer = Arc::new(Context::new(config));

    rocket::custom(figment)
        .manage(context)
        .mount("/", api::routes())
        .register("/", api::catchers())
        .attach(AdHoc::on_liftoff("Startup log", |_| {
            Box::pin(async { info!("Application started.") })
        }))
        .attach(AdHoc::on_shutdown("Shutdown log", |_| {
            Box::pin(async { info!("Application stopped.") })
        }))
}

#[rocket::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config_path = env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = Config::load(&config_path)
        .map_err(|e| format!("Failed to load configuration: {}", e))?;

    logging::init(&config)?;

    build(config).launch().await?;
    Ok(())
}
