use actix_cors::Cors;
use actix_web::http::header::{self, ContentDisposition, DispositionParam, DispositionType};
use actix_web::middleware::Compress;
use actix_web::{web, App, HttpResponse, HttpServer};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod certificate;
pub mod config;
pub mod db;
pub mod documents;
pub mod metrics;
pub mod models;
pub mod numbering;
pub mod service_report;

pub use crate::config::AppConfig;
pub use crate::db::AppState;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

/// Inline PDF response named after `name` (e.g. a certificate number).
pub fn pdf_response(name: &str, bytes: Vec<u8>) -> HttpResponse {
    let sanitized = sanitize_filename::sanitize(name.trim().replace('/', "-"));
    let stem = if sanitized.is_empty() {
        "document".to_string()
    } else {
        sanitized
    };

    HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Inline,
            parameters: vec![DispositionParam::Filename(format!("{}.pdf", stem))],
        })
        .body(bytes)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::certificate::routes::list_certificates,
        crate::certificate::routes::create_certificate,
        crate::certificate::routes::get_certificate,
        crate::certificate::routes::update_certificate,
        crate::certificate::routes::delete_certificate,
        crate::certificate::routes::download_certificate,
        crate::service_report::routes::list_services,
        crate::service_report::routes::create_service,
        crate::service_report::routes::get_service,
        crate::service_report::routes::update_service,
        crate::service_report::routes::delete_service,
        crate::service_report::routes::download_service
    ),
    components(
        schemas(
            certificate::model::CertificateRecord,
            certificate::model::Observation,
            certificate::model::CreateCertificateRequest,
            certificate::model::UpdateCertificateRequest,
            service_report::model::ServiceRecord,
            service_report::model::EngineerRemark,
            service_report::model::CreateServiceRequest,
            service_report::model::UpdateServiceRequest,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Certificates", description = "Calibration certificate endpoints."),
        (name = "Service Reports", description = "Field service report endpoints.")
    ),
    servers(
        (url = "http://127.0.0.1:8080", description = "Localhost server")
    )
)]
pub struct ApiDoc;

/// Register every `/api` route.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        actix_web::error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(ErrorResponse::bad_request(&message)),
        )
        .into()
    }))
    .configure(certificate::routes::config)
    .configure(service_report::routes::config);
}

pub async fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env()?;
    let app_state = web::Data::new(AppState::from_config(&config));

    let bind = (config.bind_address.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        let app_state = app_state.clone();
        let cors = Cors::default()
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://localhost:8080")
            .allowed_origin("http://127.0.0.1:8080")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .expose_headers(vec![header::CONTENT_DISPOSITION])
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(cors)
            .app_data(app_state)
            .service(web::scope("/api").configure(configure_api))
            .route("/metrics", web::get().to(metrics::metrics_handler))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind(bind)?
    .run()
    .await?;

    Ok(())
}
