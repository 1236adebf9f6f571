use crate::certificate::model::{
    CertificateRecord, CreateCertificateRequest, UpdateCertificateRequest,
};
use crate::{pdf_response, AppState, ErrorResponse};
use actix_web::{web, HttpResponse, Responder};

#[utoipa::path(
    context_path = "/api",
    tag = "Certificates",
    get,
    path = "/certificates",
    responses(
        (status = 200, description = "All certificates, oldest first", body = [CertificateRecord])
    )
)]
pub async fn list_certificates(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.certificates.list())
}

#[utoipa::path(
    context_path = "/api",
    tag = "Certificates",
    post,
    path = "/certificates",
    request_body = CreateCertificateRequest,
    responses(
        (status = 201, description = "Certificate created and rendered", body = CertificateRecord),
        (status = 500, description = "Number allocation or rendering failed", body = ErrorResponse)
    )
)]
pub async fn create_certificate(
    state: web::Data<AppState>,
    item: web::Json<CreateCertificateRequest>,
) -> impl Responder {
    match state.create_certificate(item.into_inner()).await {
        Ok(record) => HttpResponse::Created().json(record),
        Err(e) => e.to_response(),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Certificates",
    get,
    path = "/certificates/{id}",
    params(
        ("id" = String, Path, description = "Certificate ID")
    ),
    responses(
        (status = 200, description = "Certificate found", body = CertificateRecord),
        (status = 404, description = "Certificate not found", body = ErrorResponse)
    )
)]
pub async fn get_certificate(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    match state.certificates.get(&id) {
        Some(record) => HttpResponse::Ok().json(record),
        None => HttpResponse::NotFound()
            .json(ErrorResponse::not_found(&format!("Certificate {} not found", id))),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Certificates",
    put,
    path = "/certificates/{id}",
    params(
        ("id" = String, Path, description = "Certificate ID")
    ),
    request_body = UpdateCertificateRequest,
    responses(
        (status = 200, description = "Certificate updated and re-rendered", body = CertificateRecord),
        (status = 404, description = "Certificate not found", body = ErrorResponse)
    )
)]
pub async fn update_certificate(
    state: web::Data<AppState>,
    path: web::Path<String>,
    item: web::Json<UpdateCertificateRequest>,
) -> impl Responder {
    match state.update_certificate(&path.into_inner(), item.into_inner()).await {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(e) => e.to_response(),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Certificates",
    delete,
    path = "/certificates/{id}",
    params(
        ("id" = String, Path, description = "Certificate ID")
    ),
    responses(
        (status = 204, description = "Certificate and its PDF deleted"),
        (status = 404, description = "Certificate not found", body = ErrorResponse)
    )
)]
pub async fn delete_certificate(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    match state.delete_certificate(&path.into_inner()).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => e.to_response(),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Certificates",
    get,
    path = "/certificates/{id}/pdf",
    params(
        ("id" = String, Path, description = "Certificate ID")
    ),
    responses(
        (status = 200, description = "Certificate PDF", content_type = "application/pdf"),
        (status = 404, description = "Certificate not found", body = ErrorResponse),
        (status = 500, description = "Could not generate document", body = ErrorResponse)
    )
)]
pub async fn download_certificate(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    match state.certificate_pdf(&path.into_inner()).await {
        Ok((record, bytes)) => pdf_response(&record.certificate_no, bytes),
        Err(e) => e.to_response(),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/certificates")
            .route(web::get().to(list_certificates))
            .route(web::post().to(create_certificate)),
    )
    .service(
        web::resource("/certificates/{id}")
            .route(web::get().to(get_certificate))
            .route(web::put().to(update_certificate))
            .route(web::delete().to(delete_certificate)),
    )
    .service(web::resource("/certificates/{id}/pdf").route(web::get().to(download_certificate)));
}
