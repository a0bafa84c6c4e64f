//! Registration wizard scenarios.

use std::sync::Arc;

use async_trait::async_trait;
use hospnet_flows::LookupError;
use hospnet_flows::registration::{
    self, AddressLookup, AddressSuggestion, RecordingUserService, RegistrationSubmitter,
    autofill_address, build_registration, fields,
};
use hospnet_model::FieldValue;
use hospnet_validate::FieldError;
use hospnet_wizard::{SubmissionError, WizardEngine, WizardEvent, WizardPhase};

fn engine() -> WizardEngine {
    WizardEngine::new(Arc::new(registration::definition().unwrap()))
}

fn fill_personal(engine: &mut WizardEngine) {
    engine
        .set_fields([
            (fields::NAME, "Ana Souza"),
            (fields::EMAIL, "ana@example.com"),
            (fields::PASSWORD, "s3nh4-forte"),
            (fields::CONFIRM_PASSWORD, "s3nh4-forte"),
            (fields::DATE_OF_BIRTH, "1990-04-12"),
        ])
        .unwrap();
}

fn fill_address(engine: &mut WizardEngine) {
    engine
        .set_fields([
            (fields::ZIP_CODE, "01001-000"),
            (fields::STREET, "Praça da Sé"),
            (fields::NUMBER, "100"),
            (fields::NEIGHBORHOOD, "Sé"),
            (fields::CITY, "São Paulo"),
            (fields::STATE, "SP"),
        ])
        .unwrap();
}

fn fill_contact(engine: &mut WizardEngine, plan: &str) {
    engine
        .set_fields([
            (fields::PHONE_NUMBER, "(11) 98765-4321"),
            (fields::HEALTH_INSURANCE, plan),
            (fields::INSURANCE_NUMBER, "0042-77"),
        ])
        .unwrap();
}

fn accept_all(engine: &mut WizardEngine) {
    engine.set_field(fields::HAS_ACCEPTED_TERMS, true).unwrap();
    engine.set_field(fields::HAS_ACCEPTED_PRIVACY_POLICY, true).unwrap();
}

fn complete(plan: &str) -> WizardEngine {
    let mut engine = engine();
    fill_personal(&mut engine);
    assert!(engine.go_next());
    fill_address(&mut engine);
    assert!(engine.go_next());
    fill_contact(&mut engine, plan);
    assert!(engine.go_next());
    accept_all(&mut engine);
    engine
}

#[test]
fn malformed_email_is_first_error() {
    let mut engine = engine();
    fill_personal(&mut engine);
    engine.set_field(fields::EMAIL, "not-an-email").unwrap();
    let result = engine.validate_current_step();
    assert!(!result.ok);
    assert_eq!(result.first_error, Some(FieldError::new("email", "Email inválido")));
}

#[test]
fn short_password_fails_before_confirmation() {
    let mut engine = engine();
    fill_personal(&mut engine);
    engine
        .set_fields([(fields::PASSWORD, "abc12"), (fields::CONFIRM_PASSWORD, "zzz")])
        .unwrap();
    let error = engine.validate_current_step().first_error.unwrap();
    insta::assert_snapshot!(error.to_string(), @"password: A senha deve ter pelo menos 6 caracteres");
}

#[test]
fn terms_are_checked_before_privacy_policy() {
    let mut engine = complete("Nenhum");
    engine.set_field(fields::HAS_ACCEPTED_TERMS, false).unwrap();
    engine.set_field(fields::HAS_ACCEPTED_PRIVACY_POLICY, true).unwrap();
    assert_eq!(engine.validate_current_step().first_error.unwrap().field, fields::HAS_ACCEPTED_TERMS);
}

#[test]
fn every_step_blocks_on_a_missing_required_field() {
    let mut engine = engine();
    fill_personal(&mut engine);
    engine.set_field(fields::DATE_OF_BIRTH, "").unwrap();
    assert!(!engine.go_next());
    assert_eq!(engine.current_step(), 0);

    fill_personal(&mut engine);
    assert!(engine.go_next());
    fill_address(&mut engine);
    engine.set_field(fields::ZIP_CODE, "0100-100").unwrap();
    assert!(!engine.go_next());
    assert_eq!(engine.current_step(), 1);
    let events = engine.drain_events();
    assert!(matches!(
        events.last(),
        Some(WizardEvent::Notify(n)) if n.message == "CEP inválido"
    ));
}

#[test]
fn insurance_number_required_only_with_a_plan() {
    let mut engine = complete("Unimed");
    assert!(engine.go_previous());
    engine.set_field(fields::INSURANCE_NUMBER, "").unwrap();
    assert!(!engine.go_next());

    engine.set_field(fields::HEALTH_INSURANCE, "Nenhum").unwrap();
    assert!(engine.go_next());
}

#[test]
fn future_birth_date_is_rejected() {
    let mut engine = engine();
    fill_personal(&mut engine);
    engine.set_field(fields::DATE_OF_BIRTH, "2999-01-01").unwrap();
    assert_eq!(
        engine.validate_current_step().first_error.unwrap().message,
        "Data de nascimento inválida"
    );
}

#[tokio::test]
async fn full_run_submits_and_returns_patient_id() {
    let mut engine = complete("Unimed");
    let service = Arc::new(RecordingUserService::new());
    let submitter = RegistrationSubmitter::new(service.clone());

    let id = engine.submit(build_registration, &submitter).await.unwrap();

    let pattern = regex::Regex::new(r"^PTH-\d+$").unwrap();
    assert!(pattern.is_match(id.as_str()), "{id}");
    assert_eq!(engine.phase(), WizardPhase::Submitted(id.clone()));

    let created = service.created().await;
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].patient_id.as_str(), id.as_str());
    assert_eq!(
        created[0].additional_data.health_info.insurance_number.as_deref(),
        Some("0042-77")
    );
}

#[tokio::test]
async fn switching_plan_to_none_drops_insurance_from_payload() {
    let mut engine = complete("Unimed");
    assert!(engine.go_previous());
    engine.set_field(fields::HEALTH_INSURANCE, "Nenhum").unwrap();
    assert!(engine.go_next());
    assert_eq!(engine.data().text(fields::INSURANCE_NUMBER), "0042-77");

    let service = Arc::new(RecordingUserService::new());
    engine
        .submit(build_registration, &RegistrationSubmitter::new(service.clone()))
        .await
        .unwrap();

    let json = serde_json::to_value(&service.created().await[0]).unwrap();
    let health = &json["additionalData"]["healthInfo"];
    assert!(health.get("insuranceNumber").is_none());
    assert!(health.get("insuranceExpiration").is_none());
}

#[tokio::test]
async fn rejected_registration_stays_on_last_step() {
    let mut engine = complete("Nenhum");
    let submitter = RegistrationSubmitter::new(Arc::new(RecordingUserService::rejecting(500)));
    let err = engine.submit(build_registration, &submitter).await.unwrap_err();

    assert!(matches!(err, SubmissionError::Rejected(_)));
    assert_eq!(engine.phase(), WizardPhase::Step(3));
    insta::assert_snapshot!(
        engine.state().last_failure().unwrap(),
        @"Não foi possível concluir o envio. Tente novamente."
    );
    assert!(engine.data().flag(fields::HAS_ACCEPTED_TERMS));
}

struct FixedLookup(Option<AddressSuggestion>);

#[async_trait]
impl AddressLookup for FixedLookup {
    async fn lookup(&self, cep: &str) -> Result<AddressSuggestion, LookupError> {
        self.0.clone().ok_or_else(|| LookupError::NotFound(cep.to_string()))
    }
}

#[tokio::test]
async fn autofill_fills_address_and_ignores_failures() {
    let mut engine = engine();
    engine.set_field(fields::ZIP_CODE, "01001-000").unwrap();

    assert!(!autofill_address(&mut engine, &FixedLookup(None)).await);
    assert_eq!(engine.data().text(fields::CITY), "");

    let found = FixedLookup(Some(AddressSuggestion {
        street: "Praça da Sé".into(),
        neighborhood: "Sé".into(),
        city: "São Paulo".into(),
        state: "SP".into(),
    }));
    assert!(autofill_address(&mut engine, &found).await);
    assert_eq!(engine.data().get(fields::CITY), Some(&FieldValue::text("São Paulo")));
    assert!(engine.drain_events().is_empty());
}
