use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{lenient_opt_vec, lenient_vec, loose_string};

/// One gas reading taken before and after calibration.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    #[serde(default, deserialize_with = "loose_string")]
    #[schema(example = "Methane (CH4) 2.5% v/v")]
    pub gas: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    #[schema(example = "2.3")]
    pub before: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    #[schema(example = "2.5")]
    pub after: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    #[schema(example = "5f0c7a9e-2f6b-4d8e-9c55-0a1b2c3d4e5f")]
    pub certificate_id: String,
    #[schema(example = "RPS/CERT/24-25/007")]
    pub certificate_no: String,
    #[schema(example = "Acme Refineries Ltd")]
    pub customer_name: Option<String>,
    #[schema(example = "Plant 2, Jamnagar")]
    pub site_location: Option<String>,
    #[schema(example = "Dräger X-am 5000")]
    pub make_model: Option<String>,
    #[schema(example = "0-100% LEL")]
    pub range: Option<String>,
    #[schema(example = "ARFH-0123")]
    pub serial_no: Option<String>,
    #[schema(example = "CH4, O2, CO, H2S")]
    pub calibration_gas: Option<String>,
    #[schema(example = "Cylinder 4471, exp. 12/2026")]
    pub gas_canister_details: Option<String>,
    #[schema(example = "2024-05-10")]
    pub date_of_calibration: Option<String>,
    #[schema(example = "2025-05-09")]
    pub calibration_due_date: Option<String>,
    #[schema(example = "Ravi Kumar")]
    pub engineer_name: Option<String>,
    #[schema(example = "Pass")]
    pub status: Option<String>,
    pub observations: Vec<Observation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCertificateRequest {
    pub customer_name: Option<String>,
    pub site_location: Option<String>,
    pub make_model: Option<String>,
    pub range: Option<String>,
    pub serial_no: Option<String>,
    pub calibration_gas: Option<String>,
    pub gas_canister_details: Option<String>,
    pub date_of_calibration: Option<String>,
    pub calibration_due_date: Option<String>,
    pub engineer_name: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub observations: Vec<Observation>,
}

/// Partial update. Identity and certificate number cannot be changed.
#[derive(Deserialize, Debug, Clone, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCertificateRequest {
    pub customer_name: Option<String>,
    pub site_location: Option<String>,
    pub make_model: Option<String>,
    pub range: Option<String>,
    pub serial_no: Option<String>,
    pub calibration_gas: Option<String>,
    pub gas_canister_details: Option<String>,
    pub date_of_calibration: Option<String>,
    pub calibration_due_date: Option<String>,
    pub engineer_name: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_vec")]
    pub observations: Option<Vec<Observation>>,
}

impl CertificateRecord {
    /// Build a new record from a create request. The id and number are assigned by the caller.
    pub fn from_request(
        certificate_id: String,
        certificate_no: String,
        req: CreateCertificateRequest,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            certificate_id,
            certificate_no,
            customer_name: req.customer_name,
            site_location: req.site_location,
            make_model: req.make_model,
            range: req.range,
            serial_no: req.serial_no,
            calibration_gas: req.calibration_gas,
            gas_canister_details: req.gas_canister_details,
            date_of_calibration: req.date_of_calibration,
            calibration_due_date: req.calibration_due_date,
            engineer_name: req.engineer_name,
            status: req.status,
            observations: req.observations,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, req: UpdateCertificateRequest, now: DateTime<Utc>) {
        fn set(target: &mut Option<String>, value: Option<String>) {
            if value.is_some() {
                *target = value;
            }
        }

        set(&mut self.customer_name, req.customer_name);
        set(&mut self.site_location, req.site_location);
        set(&mut self.make_model, req.make_model);
        set(&mut self.range, req.range);
        set(&mut self.serial_no, req.serial_no);
        set(&mut self.calibration_gas, req.calibration_gas);
        set(&mut self.gas_canister_details, req.gas_canister_details);
        set(&mut self.date_of_calibration, req.date_of_calibration);
        set(&mut self.calibration_due_date, req.calibration_due_date);
        set(&mut self.engineer_name, req.engineer_name);
        set(&mut self.status, req.status);
        if let Some(observations) = req.observations {
            self.observations = observations;
        }
        self.updated_at = now;
    }
}
