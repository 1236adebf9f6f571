use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{lenient_opt_vec, lenient_vec, loose_string, loose_string_vec};

/// A line of the engineer remarks table: spares or services supplied on the job.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EngineerRemark {
    #[serde(default, deserialize_with = "loose_string")]
    #[schema(example = "O2 sensor replacement")]
    pub service_spares: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    #[schema(example = "SN-O2-77")]
    pub part_no: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    #[schema(example = "4500")]
    pub rate: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    #[schema(example = "1")]
    pub quantity: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    #[schema(example = "PO-2024-118")]
    pub po_no: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    #[schema(example = "9d2e1f70-3a4b-4c5d-8e9f-112233445566")]
    pub service_id: String,
    #[schema(example = "SR-0451")]
    pub report_no: Option<String>,
    #[schema(example = "AMC Visit")]
    pub nature_of_job: Option<String>,
    #[schema(example = "2024-07-02")]
    pub date: Option<String>,
    #[schema(example = "Vadodara")]
    pub place: Option<String>,
    #[schema(example = "At Site")]
    pub place_options: Option<String>,
    #[schema(example = "Acme Refineries Ltd")]
    pub customer_name: Option<String>,
    #[schema(example = "Plant 2, Jamnagar")]
    pub customer_location: Option<String>,
    #[schema(example = "S. Mehta")]
    pub contact_person: Option<String>,
    #[schema(example = "+91 98765 43210")]
    pub contact_number: Option<String>,
    #[schema(example = "Ravi Kumar")]
    pub service_engineer: Option<String>,
    #[schema(example = "ravi@example.com")]
    pub engineer_email: Option<String>,
    pub make_model_numbers: Vec<String>,
    pub serial_numbers: Vec<String>,
    #[schema(example = "Ravi Kumar")]
    pub engineer_name: Option<String>,
    #[schema(example = "Completed")]
    pub status: Option<String>,
    pub engineer_remarks: Vec<EngineerRemark>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    pub report_no: Option<String>,
    pub nature_of_job: Option<String>,
    pub date: Option<String>,
    pub place: Option<String>,
    pub place_options: Option<String>,
    pub customer_name: Option<String>,
    pub customer_location: Option<String>,
    pub contact_person: Option<String>,
    pub contact_number: Option<String>,
    pub service_engineer: Option<String>,
    pub engineer_email: Option<String>,
    #[serde(default, deserialize_with = "loose_string_vec")]
    pub make_model_numbers: Vec<String>,
    #[serde(default, deserialize_with = "loose_string_vec")]
    pub serial_numbers: Vec<String>,
    pub engineer_name: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub engineer_remarks: Vec<EngineerRemark>,
}

/// Partial update; the service id cannot be changed.
#[derive(Deserialize, Debug, Clone, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceRequest {
    pub report_no: Option<String>,
    pub nature_of_job: Option<String>,
    pub date: Option<String>,
    pub place: Option<String>,
    pub place_options: Option<String>,
    pub customer_name: Option<String>,
    pub customer_location: Option<String>,
    pub contact_person: Option<String>,
    pub contact_number: Option<String>,
    pub service_engineer: Option<String>,
    pub engineer_email: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_vec")]
    pub make_model_numbers: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_opt_vec")]
    pub serial_numbers: Option<Vec<String>>,
    pub engineer_name: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_vec")]
    pub engineer_remarks: Option<Vec<EngineerRemark>>,
}

impl ServiceRecord {
    pub fn from_request(service_id: String, req: CreateServiceRequest, now: DateTime<Utc>) -> Self {
        Self {
            service_id,
            report_no: req.report_no,
            nature_of_job: req.nature_of_job,
            date: req.date,
            place: req.place,
            place_options: req.place_options,
            customer_name: req.customer_name,
            customer_location: req.customer_location,
            contact_person: req.contact_person,
            contact_number: req.contact_number,
            service_engineer: req.service_engineer,
            engineer_email: req.engineer_email,
            make_model_numbers: req.make_model_numbers,
            serial_numbers: req.serial_numbers,
            engineer_name: req.engineer_name,
            status: req.status,
            engineer_remarks: req.engineer_remarks,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, req: UpdateServiceRequest, now: DateTime<Utc>) {
        fn set<T>(target: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *target = value;
            }
        }
        fn set_opt(target: &mut Option<String>, value: Option<String>) {
            if value.is_some() {
                *target = value;
            }
        }

        set_opt(&mut self.report_no, req.report_no);
        set_opt(&mut self.nature_of_job, req.nature_of_job);
        set_opt(&mut self.date, req.date);
        set_opt(&mut self.place, req.place);
        set_opt(&mut self.place_options, req.place_options);
        set_opt(&mut self.customer_name, req.customer_name);
        set_opt(&mut self.customer_location, req.customer_location);
        set_opt(&mut self.contact_person, req.contact_person);
        set_opt(&mut self.contact_number, req.contact_number);
        set_opt(&mut self.service_engineer, req.service_engineer);
        set_opt(&mut self.engineer_email, req.engineer_email);
        set(&mut self.make_model_numbers, req.make_model_numbers);
        set(&mut self.serial_numbers, req.serial_numbers);
        set_opt(&mut self.engineer_name, req.engineer_name);
        set_opt(&mut self.status, req.status);
        set(&mut self.engineer_remarks, req.engineer_remarks);
        self.updated_at = now;
    }
}
