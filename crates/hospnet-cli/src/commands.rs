use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use hospnet_cli::answers::Answers;
use hospnet_cli::logging::masked_registration;
use hospnet_cli::settings::{Settings, default_draft_dir};
use hospnet_cli::walk::{WalkOptions, WalkOutcome, step_report, walk};
use hospnet_flows::registration::{
    self, AddressLookup, HttpUserService, RegistrationSubmitter, ViaCepClient, build_registration,
};
use hospnet_flows::workflow::{self, InMemoryWorkflowService, WorkflowService};
use hospnet_model::WorkflowRecord;
use hospnet_persistence::{DraftAutoSaver, discard_draft, draft_path, load_draft_if_present};
use hospnet_wizard::{SubmitConfig, WizardDefinition, WizardEngine};

use crate::cli::RegisterArgs;
use crate::summary::{print_blocked, print_departments, print_step_report};

/// Returns whether the registration went through (or, with `--dry-run`,
/// would have been sent).
pub async fn run_register(args: &RegisterArgs, settings: &Settings) -> Result<bool> {
    info!(answers = %args.answers.display(), dry_run = args.dry_run, "registering patient");
    let text = std::fs::read_to_string(&args.answers)
        .with_context(|| format!("read answers file {}", args.answers.display()))?;
    let answers = Answers::parse(&text).context("parse answers file")?;
    let definition = Arc::new(registration::definition().context("build registration wizard")?);
    answers.check_fields(&definition)?;

    let draft_file = args
        .draft
        .clone()
        .unwrap_or_else(|| draft_path(&default_draft_dir(), registration::WIZARD_ID));
    let mut engine = open_engine(&definition, &draft_file)
        .with_submit_config(SubmitConfig::with_timeout(settings.api.submit_timeout()));
    let mut saver = DraftAutoSaver::new(&draft_file, settings.autosave.clone());

    let client;
    let lookup: Option<&dyn AddressLookup> = if args.autofill_address {
        client = ViaCepClient::new(settings.lookup.base_url.as_str(), settings.lookup.timeout())
            .context("create address lookup client")?;
        Some(&client)
    } else {
        None
    };

    let outcome = walk(
        &mut engine,
        &answers,
        WalkOptions {
            lookup,
            saver: Some(&mut saver),
        },
    )
    .await
    .context("apply answers")?;

    if let WalkOutcome::Blocked { step, title, error } = outcome {
        print_blocked(step, &title, &error);
        if settings.autosave.enabled {
            eprintln!("Rascunho salvo em {}", draft_file.display());
        }
        return Ok(false);
    }

    if args.dry_run {
        let payload = build_registration(&engine.submission_data())?;
        let json = masked_registration(&payload).context("serialize registration")?;
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(true);
    }

    let service = HttpUserService::new(settings.api.base_url.as_str(), settings.api.submit_timeout())
        .context("create user service client")?;
    let submitter = RegistrationSubmitter::new(Arc::new(service));
    match engine.submit(build_registration, &submitter).await {
        Ok(id) => {
            if let Err(error) = discard_draft(&draft_file) {
                warn!(%error, "could not remove draft");
            }
            println!("Cadastro concluído. Identificador do paciente: {id}");
            Ok(true)
        }
        Err(error) => {
            saver.note_change();
            if let Err(save_error) = saver.flush(&engine.snapshot()) {
                warn!(error = %save_error, "draft not saved");
            }
            warn!(%error, "registration not submitted");
            eprintln!("{}", error.user_message());
            Ok(false)
        }
    }
}

/// Returns whether every step of the imported workflow is valid.
pub async fn run_workflow_validate(path: &Path) -> Result<bool> {
    let (_, record) = import(path).await?;
    let definition = Arc::new(workflow::definition().context("build workflow editor")?);
    let mut engine = WizardEngine::new(definition);
    workflow::load_record(&mut engine, &record).context("load workflow into the editor")?;

    let reports = step_report(&engine);
    print_step_report(&record.name, &reports);
    Ok(reports.iter().all(|report| report.error.is_none()))
}

pub async fn run_workflow_roundtrip(path: &Path) -> Result<()> {
    let (service, record) = import(path).await?;
    let document = service
        .export_workflow(&record.id)
        .await
        .with_context(|| format!("export workflow {}", record.id))?;
    println!("{document}");
    Ok(())
}

pub fn run_departments() {
    print_departments();
}

async fn import(path: &Path) -> Result<(InMemoryWorkflowService, WorkflowRecord)> {
    let document = std::fs::read_to_string(path)
        .with_context(|| format!("read export document {}", path.display()))?;
    let service = InMemoryWorkflowService::new();
    let record = service
        .import_workflow(&document)
        .await
        .with_context(|| format!("import {}", path.display()))?;
    info!(id = %record.id, name = %record.name, "workflow imported");
    Ok((service, record))
}

/// Resume from `draft_file` when it holds a usable draft.
fn open_engine(definition: &Arc<WizardDefinition>, draft_file: &Path) -> WizardEngine {
    match load_draft_if_present(draft_file) {
        Ok(Some(draft)) => match WizardEngine::restore(Arc::clone(definition), draft) {
            Ok(engine) => {
                info!(path = %draft_file.display(), step = engine.current_step(), "resuming draft");
                return engine;
            }
            Err(error) => warn!(%error, "ignoring draft"),
        },
        Ok(None) => {}
        Err(error) => warn!(
            %error,
            suggestion = %error.suggestion().unwrap_or_default(),
            "ignoring draft"
        ),
    }
    WizardEngine::new(Arc::clone(definition))
}
