//! End-to-end behavior of the engine against a small three-step wizard.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use hospnet_model::{FieldKind, FieldModel, FormData, SubmissionId};
use hospnet_validate::RuleSet;
use hospnet_wizard::{
    ConditionalSection, GuardPredicate, StepDefinition, SubmissionError, SubmitConfig, Submitter,
    WizardDefinition, WizardEngine, WizardEvent, WizardPhase,
};

fn definition() -> Arc<WizardDefinition> {
    let field = |name: &str, kind| FieldModel::required(name, kind).unwrap();
    let optional = |name: &str, kind| FieldModel::optional(name, kind).unwrap();
    Arc::new(
        WizardDefinition::builder("visit")
            .step(
                StepDefinition::new(0, "Paciente")
                    .field(field("name", FieldKind::Text))
                    .field(field("email", FieldKind::Email))
                    .rules(
                        RuleSet::new()
                            .required("name", "Nome é obrigatório")
                            .required("email", "Email é obrigatório")
                            .email("email", "Email inválido"),
                    ),
            )
            .step(
                StepDefinition::new(1, "Convênio")
                    .field(optional("plan", FieldKind::Select))
                    .field(field("planNumber", FieldKind::Text))
                    .rules(RuleSet::new().required("planNumber", "Número do convênio é obrigatório")),
            )
            .step(
                StepDefinition::new(2, "Termos")
                    .field(field("terms", FieldKind::Checkbox))
                    .rules(RuleSet::new().must_be_true("terms", "Aceite os termos")),
            )
            .section(ConditionalSection::new(
                "plan",
                GuardPredicate::chosen_except(["Nenhum"]),
                ["planNumber"],
            ))
            .build()
            .unwrap(),
    )
}

fn at_final_step() -> WizardEngine {
    let mut engine = WizardEngine::new(definition());
    engine
        .set_fields([("name", "Ana"), ("email", "ana@example.com")])
        .unwrap();
    assert!(engine.go_next());
    engine.set_fields([("plan", "Unimed"), ("planNumber", "123")]).unwrap();
    assert!(engine.go_next());
    engine.set_field("terms", true).unwrap();
    engine.drain_events();
    engine
}

struct Accepting;

#[async_trait]
impl Submitter<FormData> for Accepting {
    async fn submit(&self, payload: &FormData) -> Result<SubmissionId, SubmissionError> {
        Ok(SubmissionId::new(payload.text("name")).unwrap())
    }
}

struct Flaky(AtomicUsize);

#[async_trait]
impl Submitter<FormData> for Flaky {
    async fn submit(&self, _payload: &FormData) -> Result<SubmissionId, SubmissionError> {
        if self.0.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(SubmissionError::Rejected("503".into()))
        } else {
            Ok(SubmissionId::new("ok").unwrap())
        }
    }
}

struct Stuck;

#[async_trait]
impl Submitter<FormData> for Stuck {
    async fn submit(&self, _payload: &FormData) -> Result<SubmissionId, SubmissionError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        unreachable!()
    }
}

fn as_is(data: &FormData) -> Result<FormData, SubmissionError> {
    Ok(data.clone())
}

#[test]
fn failing_step_blocks_and_notifies() {
    let mut engine = WizardEngine::new(definition());
    engine.set_fields([("name", "Ana"), ("email", "not-an-email")]).unwrap();
    assert!(!engine.go_next());
    assert_eq!(engine.current_step(), 0);
    let events = engine.drain_events();
    let [WizardEvent::Notify(notification)] = events.as_slice() else {
        panic!("unexpected events: {events:?}");
    };
    assert_eq!(notification.field.as_deref(), Some("email"));
    insta::assert_snapshot!(notification.message.as_str(), @"Email inválido");
}

#[test]
fn hidden_dependents_are_not_validated() {
    let mut engine = WizardEngine::new(definition());
    engine.set_fields([("name", "Ana"), ("email", "ana@example.com")]).unwrap();
    engine.go_next();
    engine.set_field("plan", "Nenhum").unwrap();
    assert!(!engine.is_active("planNumber"));
    assert!(engine.go_next());
    assert_eq!(engine.current_step(), 2);
}

#[test]
fn final_step_requests_submission_without_moving() {
    let mut engine = at_final_step();
    assert!(engine.go_next());
    assert_eq!(engine.current_step(), 2);
    assert_eq!(engine.drain_events(), [WizardEvent::SubmitRequested]);
}

#[test]
fn submission_view_drops_closed_sections() {
    let mut engine = at_final_step();
    engine.set_field("plan", "Nenhum").unwrap();
    let view = engine.submission_data();
    assert!(!view.contains("planNumber"));
    assert_eq!(engine.data().text("planNumber"), "123");
}

#[tokio::test]
async fn successful_submission_is_terminal() {
    let mut engine = at_final_step();
    let id = engine.submit(as_is, &Accepting).await.unwrap();
    assert_eq!(id.as_str(), "Ana");
    assert_eq!(engine.phase(), WizardPhase::Submitted(id.clone()));
    assert_eq!(engine.drain_events(), [WizardEvent::Submitted(id)]);
    assert!(matches!(
        engine.submit(as_is, &Accepting).await,
        Err(SubmissionError::AlreadySubmitted)
    ));
    assert!(engine.set_field("name", "Bia").is_err());
}

#[tokio::test]
async fn submit_before_final_step_is_refused() {
    let mut engine = WizardEngine::new(definition());
    let err = engine.submit(as_is, &Accepting).await.unwrap_err();
    assert!(matches!(err, SubmissionError::NotOnFinalStep { current: 0, total: 3 }));
}

#[tokio::test]
async fn rejected_submission_keeps_data_for_retry() {
    let mut engine = at_final_step();
    let submitter = Flaky(AtomicUsize::new(0));
    let err = engine.submit(as_is, &submitter).await.unwrap_err();
    assert!(err.is_recoverable());
    assert_eq!(engine.phase(), WizardPhase::Step(2));
    assert!(engine.can_retry());
    assert_eq!(engine.data().text("email"), "ana@example.com");
    assert!(matches!(
        engine.drain_events().as_slice(),
        [WizardEvent::SubmissionFailed { recoverable: true, .. }]
    ));

    engine.submit(as_is, &submitter).await.unwrap();
    assert!(engine.state().last_failure().is_none());
}

#[tokio::test(start_paused = true)]
async fn stuck_submission_times_out() {
    let mut engine = at_final_step().with_submit_config(SubmitConfig::with_timeout(Duration::from_secs(5)));
    let err = engine.submit(as_is, &Stuck).await.unwrap_err();
    assert!(matches!(err, SubmissionError::TimedOut(d) if d == Duration::from_secs(5)));
    assert_eq!(engine.phase(), WizardPhase::Step(2));
}

#[tokio::test]
async fn build_errors_return_to_last_step() {
    let mut engine = at_final_step();
    let err = engine
        .submit(
            |_: &FormData| -> Result<FormData, SubmissionError> { Err(SubmissionError::Build("bad date".into())) },
            &Accepting,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SubmissionError::Build(_)));
    assert!(!engine.state().is_submitting());
}

#[test]
fn draft_restores_step_and_values() {
    let mut engine = at_final_step();
    engine.set_field("plan", "Nenhum").unwrap();
    let draft = engine.snapshot();
    let json = serde_json::to_string(&draft).unwrap();

    let restored = WizardEngine::restore(definition(), serde_json::from_str(&json).unwrap()).unwrap();
    assert_eq!(restored.current_step(), 2);
    assert_eq!(restored.data(), engine.data());
    assert!(!restored.is_active("planNumber"));
}
