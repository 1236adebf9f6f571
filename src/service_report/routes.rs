use crate::service_report::model::{CreateServiceRequest, ServiceRecord, UpdateServiceRequest};
use crate::{pdf_response, AppState, ErrorResponse};
use actix_web::{web, HttpResponse, Responder};

#[utoipa::path(
    context_path = "/api",
    tag = "Service Reports",
    get,
    path = "/services",
    responses(
        (status = 200, description = "All service reports, oldest first", body = [ServiceRecord])
    )
)]
pub async fn list_services(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.services.list())
}

#[utoipa::path(
    context_path = "/api",
    tag = "Service Reports",
    post,
    path = "/services",
    request_body = CreateServiceRequest,
    responses(
        (status = 201, description = "Service report created and rendered", body = ServiceRecord),
        (status = 500, description = "Could not generate document", body = ErrorResponse)
    )
)]
pub async fn create_service(
    state: web::Data<AppState>,
    item: web::Json<CreateServiceRequest>,
) -> impl Responder {
    match state.create_service(item.into_inner()).await {
        Ok(record) => HttpResponse::Created().json(record),
        Err(e) => e.to_response(),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Service Reports",
    get,
    path = "/services/{id}",
    params(
        ("id" = String, Path, description = "Service report ID")
    ),
    responses(
        (status = 200, description = "Service report found", body = ServiceRecord),
        (status = 404, description = "Service report not found", body = ErrorResponse)
    )
)]
pub async fn get_service(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    match state.services.get(&id) {
        Some(record) => HttpResponse::Ok().json(record),
        None => HttpResponse::NotFound()
            .json(ErrorResponse::not_found(&format!("Service report {} not found", id))),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Service Reports",
    put,
    path = "/services/{id}",
    params(
        ("id" = String, Path, description = "Service report ID")
    ),
    request_body = UpdateServiceRequest,
    responses(
        (status = 200, description = "Service report updated and re-rendered", body = ServiceRecord),
        (status = 404, description = "Service report not found", body = ErrorResponse)
    )
)]
pub async fn update_service(
    state: web::Data<AppState>,
    path: web::Path<String>,
    item: web::Json<UpdateServiceRequest>,
) -> impl Responder {
    match state.update_service(&path.into_inner(), item.into_inner()).await {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(e) => e.to_response(),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Service Reports",
    delete,
    path = "/services/{id}",
    params(
        ("id" = String, Path, description = "Service report ID")
    ),
    responses(
        (status = 204, description = "Service report and its PDF deleted"),
        (status = 404, description = "Service report not found", body = ErrorResponse)
    )
)]
pub async fn delete_service(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    match state.delete_service(&path.into_inner()).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => e.to_response(),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Service Reports",
    get,
    path = "/services/{id}/pdf",
    params(
        ("id" = String, Path, description = "Service report ID")
    ),
    responses(
        (status = 200, description = "Service report PDF", content_type = "application/pdf"),
        (status = 404, description = "Service report not found", body = ErrorResponse),
        (status = 500, description = "Could not generate document", body = ErrorResponse)
    )
)]
pub async fn download_service(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    match state.service_pdf(&path.into_inner()).await {
        Ok((record, bytes)) => {
            let name = record
                .report_no
                .as_deref()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or(&record.service_id);
            pdf_response(name, bytes)
        }
        Err(e) => e.to_response(),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/services")
            .route(web::get().to(list_services))
            .route(web::post().to(create_service)),
    )
    .service(
        web::resource("/services/{id}")
            .route(web::get().to(get_service))
            .route(web::put().to(update_service))
            .route(web::delete().to(delete_service)),
    )
    .service(web::resource("/services/{id}/pdf").route(web::get().to(download_service)));
}
