//! Prometheus counters for numbering and document rendering.

use actix_web::{HttpResponse, Responder};
use lazy_static::lazy_static;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder};

lazy_static! {
    pub static ref CERTIFICATE_NUMBERS_ISSUED: IntCounter = register_int_counter!(
        "certificate_numbers_issued_total",
        "Certificate numbers handed out by the serial allocator"
    )
    .expect("metric can be registered");
    pub static ref COUNTER_PERSIST_FAILURES: IntCounter = register_int_counter!(
        "certificate_counter_persist_failures_total",
        "Failed writes of the certificate counter"
    )
    .expect("metric can be registered");
    pub static ref DOCUMENTS_RENDERED: IntCounterVec = register_int_counter_vec!(
        "documents_rendered_total",
        "PDF documents rendered and stored",
        &["kind"]
    )
    .expect("metric can be registered");
    pub static ref DOCUMENT_RENDER_FAILURES: IntCounterVec = register_int_counter_vec!(
        "document_render_failures_total",
        "PDF documents that could not be generated",
        &["kind"]
    )
    .expect("metric can be registered");
}

/// `GET /metrics` in the Prometheus text format.
pub async fn metrics_handler() -> impl Responder {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        log::error!("Failed to encode metrics: {}", e);
        return HttpResponse::InternalServerError().finish();
    }
    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
