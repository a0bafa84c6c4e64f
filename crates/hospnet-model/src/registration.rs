//! Patient registration submission payload.
//!
//! Serialized with camelCase keys as expected by the user-creation endpoint.

use serde::{Deserialize, Serialize};

use crate::ids::PatientId;

/// Role assigned to every self-registered patient.
pub const PATIENT_ROLE: &str = "patient";

/// Permissions granted to a newly registered patient account.
pub const PATIENT_PERMISSIONS: &[&str] = &[
    "view_own_records",
    "schedule_appointments",
    "view_own_appointments",
    "update_own_profile",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub permissions: Vec<String>,
    pub date_of_birth: String,
    pub health_insurance: String,
    pub patient_id: PatientId,
    pub additional_data: AdditionalData,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalData {
    pub address: Address,
    pub contact_info: ContactInfo,
    pub health_info: HealthInfo,
    pub preferences: Preferences,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub zip_code: String,
    pub street: String,
    pub number: String,
    pub complement: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub phone_number: String,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthInfo {
    pub allergies: String,
    pub chronic_conditions: String,
    /// Only present when a health plan is selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_expiration: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub receive_notifications: bool,
    pub allow_data_sharing: bool,
}
