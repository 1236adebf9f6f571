//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use actix_web::web;
use calibration_docs_server::certificate::model::{CertificateRecord, Observation};
use calibration_docs_server::documents::{AssetSource, DocumentGenerator, LocalDocumentStorage};
use calibration_docs_server::numbering::{MemoryCounterStore, SerialAllocator, DEFAULT_CERTIFICATE_PREFIX};
use calibration_docs_server::service_report::model::{
    CreateServiceRequest, EngineerRemark, ServiceRecord,
};
use calibration_docs_server::AppState;
use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::sync::Arc;
use tempfile::TempDir;

pub fn fixed_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(9, 15, 0)
        .unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// App state backed by an in-memory counter and a temporary document directory.
pub fn test_app_state() -> (TempDir, web::Data<AppState>) {
    let dir = tempfile::tempdir().unwrap();
    let allocator = SerialAllocator::new(
        Arc::new(MemoryCounterStore::new()),
        DEFAULT_CERTIFICATE_PREFIX,
    );
    let storage = Arc::new(LocalDocumentStorage::new(dir.path().join("documents")));
    let documents = DocumentGenerator::new(storage, AssetSource::new(dir.path().join("static")))
        .with_fixed_time(fixed_time());
    let state = web::Data::new(AppState::new(Arc::new(allocator), documents));
    (dir, state)
}

pub fn sample_certificate(id: &str, observations: usize) -> CertificateRecord {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 15, 0).unwrap();
    CertificateRecord {
        certificate_id: id.to_string(),
        certificate_no: "RPS/CERT/24-25/042".to_string(),
        customer_name: Some("Acme Refineries Ltd".to_string()),
        site_location: Some("Plant 2, Jamnagar".to_string()),
        make_model: Some("X-am 5000".to_string()),
        range: Some("0-100% LEL".to_string()),
        serial_no: Some("ARFH-0123".to_string()),
        calibration_gas: Some("CH4".to_string()),
        gas_canister_details: Some("Cylinder 4471".to_string()),
        date_of_calibration: Some("2024-05-10".to_string()),
        calibration_due_date: Some("2025-05-09".to_string()),
        engineer_name: Some("Ravi Kumar".to_string()),
        status: Some("Pass".to_string()),
        observations: (0..observations)
            .map(|i| Observation {
                gas: Some(format!("Gas {}", i + 1)),
                before: Some("2.3".to_string()),
                after: Some("2.5".to_string()),
            })
            .collect(),
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_service(id: &str, remarks: usize) -> ServiceRecord {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 15, 0).unwrap();
    let req = CreateServiceRequest {
        report_no: Some("SR-104".to_string()),
        nature_of_job: Some("Breakdown".to_string()),
        date: Some("2024-06-01".to_string()),
        customer_name: Some("Acme Refineries Ltd".to_string()),
        customer_location: Some("Plant 2, Jamnagar".to_string()),
        make_model_numbers: vec!["X-am 5000".to_string()],
        serial_numbers: vec!["ARFH-0123".to_string()],
        engineer_name: Some("Ravi Kumar".to_string()),
        engineer_remarks: (0..remarks)
            .map(|i| EngineerRemark {
                service_spares: Some(format!("Spare {}", i + 1)),
                part_no: Some("P-100".to_string()),
                rate: Some("1500".to_string()),
                quantity: Some("1".to_string()),
                po_no: Some("PO-9".to_string()),
            })
            .collect(),
        ..Default::default()
    };
    ServiceRecord::from_request(id.to_string(), req, now)
}
