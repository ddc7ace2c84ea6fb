use actix_web::error::{InternalError, QueryPayloadError};
use actix_web::http::header::ContentType;
use actix_web::{web, HttpRequest, HttpResponse, Result};

use crate::qr::QrService;
use crate::request::{validate, QrQuery};
use crate::storage::StorageService;

/// Регистрация маршрутов сервиса
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(query_error))
        .route("/health", web::get().to(health))
        .route("/qr", web::get().to(qr))
        .route("/qr/save", web::get().to(qr_save));
}

async fn health() -> Result<HttpResponse> {
    Ok(plain_text(HttpResponse::Ok(), "Service is running".to_string()))
}

// Картинка прямо в теле ответа
async fn qr(
    qr_service: web::Data<QrService>,
    query: web::Query<QrQuery>,
) -> Result<HttpResponse> {
    let request = match validate(query.into_inner()) {
        Ok(request) => request,
        Err(e) => {
            log::warn!("Rejected QR request: {}", e);
            return Ok(plain_text(HttpResponse::BadRequest(), e.to_string()));
        }
    };

    match qr_service.encode(&request) {
        Ok(image) => Ok(HttpResponse::Ok()
            .content_type(image.content_type())
            .body(image.bytes)),
        Err(e) => {
            log::error!(
                "QR generation failed for {} bytes of contents: {}",
                request.contents.len(),
                e
            );
            Ok(plain_text(
                HttpResponse::BadRequest(),
                format!("Failed to generate QR code: {}", e),
            ))
        }
    }
}

// Сохранение на диск, в ответе только путь к файлу
async fn qr_save(
    qr_service: web::Data<QrService>,
    storage: web::Data<StorageService>,
    query: web::Query<QrQuery>,
) -> Result<HttpResponse> {
    let request = match validate(query.into_inner()) {
        Ok(request) => request,
        Err(e) => {
            log::warn!("Rejected QR save request: {}", e);
            return Ok(plain_text(HttpResponse::BadRequest(), e.to_string()));
        }
    };

    let saved = match qr_service.encode(&request) {
        Ok(image) => storage.save(&image).await,
        Err(e) => Err(e),
    };

    match saved {
        Ok(path) => {
            log::info!("Saved QR code to {}", path.display());
            Ok(plain_text(
                HttpResponse::Ok(),
                format!("Saved QR code to {}", path.display()),
            ))
        }
        Err(e) => {
            log::error!("Failed to save QR code: {}", e);
            Ok(plain_text(
                HttpResponse::InternalServerError(),
                format!("Failed to save QR code: {}", e),
            ))
        }
    }
}

fn plain_text(mut builder: actix_web::HttpResponseBuilder, body: String) -> HttpResponse {
    builder.content_type(ContentType::plaintext()).body(body)
}

/// Нечитаемая строка запроса (например `size=abc`) тоже ошибка клиента
fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::warn!("Invalid query string: {}", err);
    let response = plain_text(
        HttpResponse::BadRequest(),
        format!("Invalid query string: {}", err),
    );
    InternalError::from_response(err, response).into()
}
