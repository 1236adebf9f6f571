#[cfg(test)]
mod tests {
    use crate::documents::{
        AssetSource, DocumentGenerator, DocumentStorage, LocalDocumentStorage, StorageError,
    };
    use crate::numbering::{MemoryCounterStore, SerialAllocator, DEFAULT_CERTIFICATE_PREFIX};
    use crate::service_report::model::{
        CreateServiceRequest, EngineerRemark, ServiceRecord, UpdateServiceRequest,
    };
    use crate::{configure_api, AppState, ErrorResponse};
    use actix_web::{http::StatusCode, test as actix_test, web, App};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Store that rejects every write.
    struct ReadOnlyStorage;

    #[async_trait]
    impl DocumentStorage for ReadOnlyStorage {
        async fn put(&self, id: &str, _bytes: &[u8]) -> Result<PathBuf, StorageError> {
            Err(StorageError::Io {
                path: self.path_for(id)?,
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }

        async fn get(&self, _id: &str) -> Result<Option<Vec<u8>>, StorageError> {
            Ok(None)
        }

        async fn delete(&self, _id: &str) -> Result<bool, StorageError> {
            Ok(false)
        }

        fn path_for(&self, id: &str) -> Result<PathBuf, StorageError> {
            Ok(PathBuf::from("/read-only").join(format!("{}.pdf", id)))
        }
    }

    fn state_with(storage: Arc<dyn DocumentStorage>, assets: &std::path::Path) -> web::Data<AppState> {
        let allocator = SerialAllocator::new(
            Arc::new(MemoryCounterStore::new()),
            DEFAULT_CERTIFICATE_PREFIX,
        );
        let documents = DocumentGenerator::new(storage, AssetSource::new(assets));
        web::Data::new(AppState::new(Arc::new(allocator), documents))
    }

    fn test_state() -> (TempDir, web::Data<AppState>) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(LocalDocumentStorage::new(dir.path().join("documents")));
        let state = state_with(storage, dir.path());
        (dir, state)
    }

    #[test]
    fn test_create_request_tolerates_loose_lists() {
        let req: CreateServiceRequest = serde_json::from_str(
            r#"{
                "reportNo": "SR-1",
                "makeModelNumbers": ["X-am 5000", 6500, null],
                "serialNumbers": "ARFH-0123",
                "engineerRemarks": [
                    { "serviceSpares": "Sensor", "rate": 1500, "quantity": 2 }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(req.make_model_numbers, vec!["X-am 5000", "6500"]);
        assert!(req.serial_numbers.is_empty());
        assert_eq!(
            req.engineer_remarks,
            vec![EngineerRemark {
                service_spares: Some("Sensor".to_string()),
                rate: Some("1500".to_string()),
                quantity: Some("2".to_string()),
                ..Default::default()
            }]
        );
    }

    #[test]
    fn test_update_replaces_only_given_fields() {
        let created = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap();
        let mut record = ServiceRecord::from_request(
            "svc-1".to_string(),
            CreateServiceRequest {
                report_no: Some("SR-1".to_string()),
                serial_numbers: vec!["A1".to_string()],
                ..Default::default()
            },
            created,
        );

        let update: UpdateServiceRequest =
            serde_json::from_str(r#"{ "status": "Closed", "engineerRemarks": "none" }"#).unwrap();
        record.apply_update(update, later);

        assert_eq!(record.service_id, "svc-1");
        assert_eq!(record.report_no.as_deref(), Some("SR-1"));
        assert_eq!(record.serial_numbers, vec!["A1"]);
        assert_eq!(record.status.as_deref(), Some("Closed"));
        assert!(record.engineer_remarks.is_empty());
        assert_eq!(record.updated_at, later);
    }

    #[actix_web::test]
    async fn test_service_lifecycle() {
        let (dir, state) = test_state();
        let app = actix_test::init_service(
            App::new()
                .app_data(state.clone())
                .service(web::scope("/api").configure(configure_api)),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/api/services")
            .set_json(serde_json::json!({
                "reportNo": "SR-104",
                "customerName": "Acme",
                "engineerRemarks": [{ "serviceSpares": "Filter", "rate": "abc", "quantity": 1 }]
            }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: ServiceRecord = actix_test::read_body_json(resp).await;
        assert!(dir
            .path()
            .join("documents")
            .join(format!("{}.pdf", created.service_id))
            .exists());

        let req = actix_test::TestRequest::get().uri("/api/services").to_request();
        let all: Vec<ServiceRecord> = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(all.len(), 1);

        let req = actix_test::TestRequest::get()
            .uri(&format!("/api/services/{}/pdf", created.service_id))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let disposition = resp
            .headers()
            .get("content-disposition")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains("SR-104.pdf"));

        let req = actix_test::TestRequest::delete()
            .uri(&format!("/api/services/{}", created.service_id))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(state.services.is_empty());
    }

    #[actix_web::test]
    async fn test_storage_failure_reports_generic_error() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(Arc::new(ReadOnlyStorage), dir.path());
        let app = actix_test::init_service(
            App::new()
                .app_data(state.clone())
                .service(web::scope("/api").configure(configure_api)),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/api/services")
            .set_json(serde_json::json!({ "reportNo": "SR-9" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let error: ErrorResponse = actix_test::read_body_json(resp).await;
        assert_eq!(error.message, "could not generate document");
    }
}
