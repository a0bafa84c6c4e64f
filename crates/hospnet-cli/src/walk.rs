//! Walks a wizard step by step from an answers file.

use hospnet_flows::registration::fields::ZIP_CODE;
use hospnet_flows::registration::{AddressLookup, autofill_address};
use hospnet_model::FieldValue;
use hospnet_persistence::DraftAutoSaver;
use hospnet_validate::FieldError;
use hospnet_wizard::{NotificationLevel, WizardEngine, WizardError, WizardEvent};

use crate::answers::Answers;
use crate::logging::redact_value;

/// Where a walk stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkOutcome {
    /// Every step passed; the wizard is waiting for submission.
    ReadyToSubmit,
    Blocked {
        step: usize,
        title: String,
        error: FieldError,
    },
}

/// Validation status of one step, for reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub index: usize,
    pub title: String,
    pub error: Option<FieldError>,
}

/// Optional collaborators of a walk.
#[derive(Default)]
pub struct WalkOptions<'a> {
    /// Fills address fields once the step holding the CEP is answered.
    pub lookup: Option<&'a dyn AddressLookup>,
    pub saver: Option<&'a mut DraftAutoSaver>,
}

/// Answer each step in order and advance until blocked or ready to submit.
///
/// A restored engine is rewound to the first step so that every step is
/// validated again; values missing from `answers` keep their restored value.
pub async fn walk(
    engine: &mut WizardEngine,
    answers: &Answers,
    options: WalkOptions<'_>,
) -> Result<WalkOutcome, WizardError> {
    let WalkOptions { lookup, mut saver } = options;
    while engine.go_previous() {}
    engine.drain_events();

    loop {
        let index = engine.current_step();
        let (title, names) = match engine.definition().step(index) {
            Some(step) => (
                step.title().to_string(),
                step.field_models()
                    .iter()
                    .map(|f| f.name().to_string())
                    .collect::<Vec<_>>(),
            ),
            None => return Err(WizardError::DraftStepOutOfRange {
                step: index,
                count: engine.step_count(),
            }),
        };

        apply_answers(engine, answers, &names, true)?;
        if let Some(lookup) = lookup
            && names.iter().any(|n| n == ZIP_CODE)
            && autofill_address(engine, lookup).await
        {
            // Non-empty answers win over the lookup.
            apply_answers(engine, answers, &names, false)?;
        }

        if let Some(saver) = saver.as_deref_mut() {
            saver.note_change();
            if saver.tick(&engine.snapshot()).is_err() {
                tracing::debug!("continuing without a draft");
            }
        }

        let passed = engine.go_next();
        let events = engine.drain_events();
        if !passed {
            if let Some(saver) = saver.as_deref_mut()
                && saver.flush(&engine.snapshot()).is_err()
            {
                tracing::debug!("blocked step not saved");
            }
            let error = first_error(&events)
                .unwrap_or_else(|| FieldError::new("", "Etapa inválida"));
            tracing::info!(step = index, field = %error.field, "walk blocked");
            return Ok(WalkOutcome::Blocked {
                step: index,
                title,
                error,
            });
        }
        if events.contains(&WizardEvent::SubmitRequested) {
            tracing::debug!(wizard = engine.definition().id(), "all steps passed");
            return Ok(WalkOutcome::ReadyToSubmit);
        }
    }
}

/// Validate every step against the current data.
pub fn step_report(engine: &WizardEngine) -> Vec<StepReport> {
    engine
        .definition()
        .steps()
        .iter()
        .map(|step| StepReport {
            index: step.index(),
            title: step.title().to_string(),
            error: engine
                .validate_step(step.index())
                .and_then(|result| result.first_error),
        })
        .collect()
}

fn apply_answers(
    engine: &mut WizardEngine,
    answers: &Answers,
    names: &[String],
    include_empty: bool,
) -> Result<(), WizardError> {
    for name in names {
        let Some(value) = answers.get(name) else {
            continue;
        };
        if !include_empty && value.is_empty() {
            continue;
        }
        if let FieldValue::Text(text) = value {
            tracing::trace!(field = %name, value = redact_value(text), "answer");
        }
        engine.set_field(name, value.clone())?;
    }
    Ok(())
}

fn first_error(events: &[WizardEvent]) -> Option<FieldError> {
    events.iter().find_map(|event| match event {
        WizardEvent::Notify(n) if n.level == NotificationLevel::Error => Some(FieldError::new(
            n.field.clone().unwrap_or_default(),
            n.message.clone(),
        )),
        _ => None,
    })
}
