//! Four-step patient self-registration.
//!
//! | step | title             | checked in order                                  |
//! |------|-------------------|---------------------------------------------------|
//! | 0    | Dados pessoais    | name, email, email format, password, length, confirmation, birth date |
//! | 1    | Endereço          | CEP (8 digits), street, number, neighborhood, city, state |
//! | 2    | Contato e saúde   | phone, emergency phone, insurance number when a plan is chosen |
//! | 3    | Termos            | terms of use, then privacy policy                 |

mod address;
mod dto;
mod service;

pub use address::{AddressLookup, AddressSuggestion, VIACEP_URL, ViaCepClient, autofill_address};
pub use dto::build_registration;
pub use service::{HttpUserService, RecordingUserService, RegistrationSubmitter, UserService};

use hospnet_model::{FieldKind, FieldModel, FormData};
use hospnet_validate::RuleSet;
use hospnet_validate::checks::format::digit_count;
use hospnet_wizard::{
    ConditionalSection, DefinitionError, GuardPredicate, StepDefinition, WizardDefinition,
};

/// Identifier of the registration wizard, recorded in drafts.
pub const WIZARD_ID: &str = "patient-registration";

/// Health plan choices meaning "no plan".
pub const NO_INSURANCE: [&str; 2] = ["Nenhum", "none"];

/// Brazilian state abbreviations accepted by the address step.
pub const STATES: [&str; 27] = [
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB",
    "PR", "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

/// Field names of the registration form.
pub mod fields {
    pub const NAME: &str = "name";
    pub const EMAIL: &str = "email";
    pub const PASSWORD: &str = "password";
    pub const CONFIRM_PASSWORD: &str = "confirmPassword";
    pub const DATE_OF_BIRTH: &str = "dateOfBirth";

    pub const ZIP_CODE: &str = "zipCode";
    pub const STREET: &str = "street";
    pub const NUMBER: &str = "number";
    pub const COMPLEMENT: &str = "complement";
    pub const NEIGHBORHOOD: &str = "neighborhood";
    pub const CITY: &str = "city";
    pub const STATE: &str = "state";

    pub const PHONE_NUMBER: &str = "phoneNumber";
    pub const EMERGENCY_CONTACT_NAME: &str = "emergencyContactName";
    pub const EMERGENCY_CONTACT_PHONE: &str = "emergencyContactPhone";
    pub const HEALTH_INSURANCE: &str = "healthInsurance";
    pub const INSURANCE_NUMBER: &str = "insuranceNumber";
    pub const INSURANCE_EXPIRATION: &str = "insuranceExpiration";
    pub const ALLERGIES: &str = "allergies";
    pub const CHRONIC_CONDITIONS: &str = "chronicConditions";

    pub const HAS_ACCEPTED_TERMS: &str = "hasAcceptedTerms";
    pub const HAS_ACCEPTED_PRIVACY_POLICY: &str = "hasAcceptedPrivacyPolicy";
    pub const RECEIVE_NOTIFICATIONS: &str = "receiveNotifications";
    pub const ALLOW_DATA_SHARING: &str = "allowDataSharing";
}

use fields::{
    ALLERGIES, ALLOW_DATA_SHARING, CHRONIC_CONDITIONS, CITY, COMPLEMENT, CONFIRM_PASSWORD,
    DATE_OF_BIRTH, EMAIL, EMERGENCY_CONTACT_NAME, EMERGENCY_CONTACT_PHONE, HAS_ACCEPTED_PRIVACY_POLICY,
    HAS_ACCEPTED_TERMS, HEALTH_INSURANCE, INSURANCE_EXPIRATION, INSURANCE_NUMBER, NAME, NEIGHBORHOOD,
    NUMBER, PASSWORD, PHONE_NUMBER, RECEIVE_NOTIFICATIONS, STATE, STREET, ZIP_CODE,
};

/// Phone numbers carry a two-digit area code plus 8 or 9 digits.
fn is_phone(value: &str) -> bool {
    matches!(digit_count(value), 10 | 11)
}

fn phone_check(field: &'static str) -> impl Fn(&FormData) -> bool + Send + Sync {
    move |data| {
        let value = data.text(field);
        value.is_empty() || is_phone(value)
    }
}

/// Build the registration wizard.
pub fn definition() -> Result<WizardDefinition, DefinitionError> {
    let personal = StepDefinition::new(0, "Dados pessoais")
        .fields([
            FieldModel::required(NAME, FieldKind::Text)?,
            FieldModel::required(EMAIL, FieldKind::Email)?,
            FieldModel::required(PASSWORD, FieldKind::Password)?,
            FieldModel::required(CONFIRM_PASSWORD, FieldKind::Password)?,
            FieldModel::required(DATE_OF_BIRTH, FieldKind::Date)?,
        ])
        .rules(
            RuleSet::new()
                .required(NAME, "Nome é obrigatório")
                .required(EMAIL, "Email é obrigatório")
                .email(EMAIL, "Email inválido")
                .required(PASSWORD, "Senha é obrigatória")
                .min_length(PASSWORD, 6, "A senha deve ter pelo menos 6 caracteres")
                .required(CONFIRM_PASSWORD, "Confirme sua senha")
                .equals(CONFIRM_PASSWORD, PASSWORD, "As senhas não coincidem")
                .required(DATE_OF_BIRTH, "Data de nascimento é obrigatória")
                .date(DATE_OF_BIRTH, true, "Data de nascimento inválida"),
        );

    let address = StepDefinition::new(1, "Endereço")
        .fields([
            FieldModel::required(ZIP_CODE, FieldKind::Masked)?,
            FieldModel::required(STREET, FieldKind::Text)?,
            FieldModel::required(NUMBER, FieldKind::Text)?,
            FieldModel::optional(COMPLEMENT, FieldKind::Text)?,
            FieldModel::required(NEIGHBORHOOD, FieldKind::Text)?,
            FieldModel::required(CITY, FieldKind::Text)?,
            FieldModel::required(STATE, FieldKind::Select)?,
        ])
        .rules(
            RuleSet::new()
                .required(ZIP_CODE, "CEP é obrigatório")
                .digits(ZIP_CODE, 8, "CEP inválido")
                .required(STREET, "Rua é obrigatória")
                .required(NUMBER, "Número é obrigatório")
                .required(NEIGHBORHOOD, "Bairro é obrigatório")
                .required(CITY, "Cidade é obrigatória")
                .required(STATE, "Estado é obrigatório")
                .one_of(STATE, STATES, "Estado inválido"),
        );

    let contact = StepDefinition::new(2, "Contato e saúde")
        .fields([
            FieldModel::required(PHONE_NUMBER, FieldKind::Masked)?,
            FieldModel::optional(EMERGENCY_CONTACT_NAME, FieldKind::Text)?,
            FieldModel::optional(EMERGENCY_CONTACT_PHONE, FieldKind::Masked)?,
            FieldModel::optional(HEALTH_INSURANCE, FieldKind::Select)?,
            FieldModel::required(INSURANCE_NUMBER, FieldKind::Text)?,
            FieldModel::optional(INSURANCE_EXPIRATION, FieldKind::Date)?,
            FieldModel::optional(ALLERGIES, FieldKind::Text)?,
            FieldModel::optional(CHRONIC_CONDITIONS, FieldKind::Text)?,
        ])
        .rules(
            RuleSet::new()
                .required(PHONE_NUMBER, "Telefone é obrigatório")
                .custom("phoneNumber.phone", PHONE_NUMBER, phone_check(PHONE_NUMBER), "Telefone inválido")
                .custom(
                    "emergencyContactPhone.phone",
                    EMERGENCY_CONTACT_PHONE,
                    phone_check(EMERGENCY_CONTACT_PHONE),
                    "Telefone de emergência inválido",
                )
                .required(INSURANCE_NUMBER, "Número da carteirinha é obrigatório")
                .date(INSURANCE_EXPIRATION, false, "Data de validade inválida"),
        );

    let terms = StepDefinition::new(3, "Termos")
        .fields([
            FieldModel::required(HAS_ACCEPTED_TERMS, FieldKind::Checkbox)?,
            FieldModel::required(HAS_ACCEPTED_PRIVACY_POLICY, FieldKind::Checkbox)?,
            FieldModel::optional(RECEIVE_NOTIFICATIONS, FieldKind::Checkbox)?,
            FieldModel::optional(ALLOW_DATA_SHARING, FieldKind::Checkbox)?,
        ])
        .rules(
            RuleSet::new()
                .must_be_true(HAS_ACCEPTED_TERMS, "Você deve aceitar os termos de uso")
                .must_be_true(
                    HAS_ACCEPTED_PRIVACY_POLICY,
                    "Você deve aceitar a política de privacidade",
                ),
        );

    WizardDefinition::builder(WIZARD_ID)
        .step(personal)
        .step(address)
        .step(contact)
        .step(terms)
        .section(ConditionalSection::new(
            HEALTH_INSURANCE,
            GuardPredicate::chosen_except(NO_INSURANCE),
            [INSURANCE_NUMBER, INSURANCE_EXPIRATION],
        ))
        .default_value(HEALTH_INSURANCE, NO_INSURANCE[0])
        .default_value(RECEIVE_NOTIFICATIONS, true)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_accepts_masked_landline_and_mobile() {
        assert!(is_phone("(11) 3456-7890"));
        assert!(is_phone("(11) 93456-7890"));
        assert!(!is_phone("3456-7890"));
    }

    #[test]
    fn definition_builds_with_four_steps() {
        let definition = definition().unwrap();
        assert_eq!(definition.step_count(), 4);
        assert_eq!(definition.step_of(INSURANCE_NUMBER), Some(2));
        assert!(definition.resolver().is_conditional(INSURANCE_EXPIRATION));
    }
}
