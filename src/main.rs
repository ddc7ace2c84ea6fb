use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

mod config;
mod error;
mod qr;
mod request;
mod routes;
mod storage;

use config::Config;
use qr::QrService;
use storage::StorageService;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::load()?;
    let qr_service = QrService::new();
    let storage = StorageService::new(config.storage.save_dir.clone());

    log::info!("Starting QR code server on http://{}", config.bind_addr());
    log::info!("Saved QR codes go to {}", storage.dir().display());

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET"])
            .allow_any_header()
            .max_age(3600);
        App::new()
            .app_data(web::Data::new(qr_service.clone()))
            .app_data(web::Data::new(storage.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .configure(routes::configure)
    })
    .bind(config.bind_addr())?
    .run()
    .await?;

    Ok(())
}
