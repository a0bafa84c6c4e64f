//! Registration payload assembly.

use hospnet_model::{
    AdditionalData, Address, ContactInfo, FieldValue, FormData, HealthInfo, PATIENT_PERMISSIONS, PATIENT_ROLE,
    PatientId, PatientRegistration, Preferences,
};
use hospnet_wizard::SubmissionError;

use super::fields::{
    ALLERGIES, ALLOW_DATA_SHARING, CHRONIC_CONDITIONS, CITY, COMPLEMENT, DATE_OF_BIRTH, EMAIL,
    EMERGENCY_CONTACT_NAME, EMERGENCY_CONTACT_PHONE, HEALTH_INSURANCE, INSURANCE_EXPIRATION,
    INSURANCE_NUMBER, NAME, NEIGHBORHOOD, NUMBER, PASSWORD, PHONE_NUMBER, RECEIVE_NOTIFICATIONS,
    STATE, STREET, ZIP_CODE,
};

/// Build the user-creation payload from the submission view.
///
/// `view` holds active fields only, so insurance details are absent
/// whenever no health plan is selected.
pub fn build_registration(view: &FormData) -> Result<PatientRegistration, SubmissionError> {
    let email = view.text(EMAIL);
    if email.is_empty() {
        return Err(SubmissionError::Build("email is missing".to_string()));
    }

    let optional = |name: &str| Some(view.text(name)).filter(|v| !v.is_empty()).map(str::to_string);

    Ok(PatientRegistration {
        name: view.text(NAME).to_string(),
        email: email.to_lowercase(),
        // Passwords are sent as typed; surrounding spaces are significant.
        password: view
            .get(PASSWORD)
            .and_then(FieldValue::as_text)
            .unwrap_or_default()
            .to_string(),
        role: PATIENT_ROLE.to_string(),
        permissions: PATIENT_PERMISSIONS.iter().map(ToString::to_string).collect(),
        date_of_birth: view.text(DATE_OF_BIRTH).to_string(),
        health_insurance: view.text(HEALTH_INSURANCE).to_string(),
        patient_id: PatientId::generate(),
        additional_data: AdditionalData {
            address: Address {
                zip_code: view.text(ZIP_CODE).to_string(),
                street: view.text(STREET).to_string(),
                number: view.text(NUMBER).to_string(),
                complement: view.text(COMPLEMENT).to_string(),
                neighborhood: view.text(NEIGHBORHOOD).to_string(),
                city: view.text(CITY).to_string(),
                state: view.text(STATE).to_string(),
            },
            contact_info: ContactInfo {
                phone_number: view.text(PHONE_NUMBER).to_string(),
                emergency_contact_name: view.text(EMERGENCY_CONTACT_NAME).to_string(),
                emergency_contact_phone: view.text(EMERGENCY_CONTACT_PHONE).to_string(),
            },
            health_info: HealthInfo {
                allergies: view.text(ALLERGIES).to_string(),
                chronic_conditions: view.text(CHRONIC_CONDITIONS).to_string(),
                insurance_number: optional(INSURANCE_NUMBER),
                insurance_expiration: optional(INSURANCE_EXPIRATION),
            },
            preferences: Preferences {
                receive_notifications: view.flag(RECEIVE_NOTIFICATIONS),
                allow_data_sharing: view.flag(ALLOW_DATA_SHARING),
            },
        },
    })
}
