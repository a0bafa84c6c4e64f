//! Workflow editor, entry forms and export/import.

use std::sync::Arc;

use hospnet_flows::ServiceError;
use hospnet_flows::workflow::{
    self, ExceptionFlowEditor, InMemoryWorkflowService, SlaEditor, WorkflowService,
    WorkflowSubmitter, apply_template, build_record, fields, find_template, load_record,
};
use hospnet_model::{
    CollectionItem, Department, ExceptionFlow, Priority, SlaSetting, TimeUnit, WorkflowExport,
    WorkflowModule, WorkflowRecord,
};
use hospnet_wizard::{CollectionEditor, WizardEngine, WizardPhase};

fn editor() -> WizardEngine {
    WizardEngine::new(Arc::new(workflow::definition().unwrap()))
}

fn sample_record() -> WorkflowRecord {
    let mut record = WorkflowRecord::new("Pronto atendimento");
    record.description = "Fluxo padrão do PA".into();
    record.template_id = Some("emergency-care".into());
    record.nodes = find_template("emergency-care").unwrap().modules();
    record.sla_settings = vec![
        SlaSetting {
            department_id: "triage".into(),
            max_time: 15,
            time_unit: TimeUnit::Minute,
            alert_at: 10,
        },
        SlaSetting {
            department_id: "inpatient".into(),
            max_time: 2,
            time_unit: TimeUnit::Day,
            alert_at: 1,
        },
    ];
    record.exception_flows = vec![ExceptionFlow {
        condition: "Parada cardiorrespiratória".into(),
        target_department: Department::Icu,
        priority: Priority::Critical,
    }];
    record
}

#[test]
fn duplicate_sla_department_add_returns_false() {
    let sla = SlaSetting {
        department_id: "triage".into(),
        max_time: 15,
        time_unit: TimeUnit::Minute,
        alert_at: 10,
    };
    let mut items = Vec::new();
    let mut editor = CollectionEditor::new(fields::SLA_SETTINGS, &mut items);
    assert!(editor.add(sla.to_item()));
    let again = SlaSetting { max_time: 30, ..sla };
    assert!(!editor.add(again.to_item()));
    assert_eq!(editor.len(), 1);
}

#[test]
fn editor_walks_all_steps_with_entry_forms() {
    let mut engine = editor();
    apply_template(&mut engine, find_template("outpatient-visit").unwrap()).unwrap();
    assert!(engine.go_next());

    engine
        .with_collection(fields::MODULES, |modules| modules.move_item(3, 0))
        .unwrap();
    assert_eq!(engine.data().items(fields::MODULES)[0].key, "dispensing");
    assert!(engine.go_next());

    let mut sla = SlaEditor::new().unwrap();
    sla.set(SlaSetting::DEPARTMENT, "outpatient").unwrap();
    sla.set(SlaSetting::MAX_TIME, "2").unwrap();
    sla.set(SlaSetting::TIME_UNIT, "hour").unwrap();
    sla.set(SlaSetting::ALERT_AT, "1").unwrap();
    sla.commit(&mut engine).unwrap();
    assert!(engine.go_next());

    engine.set_field(fields::ENABLE_EXCEPTION_FLOWS, true).unwrap();
    let mut flows = ExceptionFlowEditor::new().unwrap();
    flows.set(ExceptionFlow::CONDITION, "Resultado crítico").unwrap();
    flows.set(ExceptionFlow::TARGET, "emergency").unwrap();
    flows.set(ExceptionFlow::PRIORITY, "high").unwrap();
    flows.commit(&mut engine).unwrap();
    assert!(engine.go_next());
    assert_eq!(engine.current_step(), 3);

    let record = build_record(&engine.submission_data(), None).unwrap();
    assert_eq!(record.template_id.as_deref(), Some("outpatient-visit"));
    assert_eq!(record.nodes[0].module_id, "dispensing");
    assert_eq!(record.sla_settings[0].time_unit, TimeUnit::Hour);
    assert_eq!(record.exception_flows[0].priority, Priority::High);
}

#[test]
fn sla_alert_past_limit_blocks_the_step() {
    let mut engine = editor();
    let bad = CollectionItem::new("icu")
        .with(SlaSetting::MAX_TIME, "5")
        .with(SlaSetting::TIME_UNIT, "minute")
        .with(SlaSetting::ALERT_AT, "10");
    engine.with_collection(fields::SLA_SETTINGS, |items| items.add(bad)).unwrap();
    let error = engine.validate_step(2).unwrap().first_error.unwrap();
    insta::assert_snapshot!(error.message, @"O alerta deve ocorrer antes do tempo máximo");
}

#[test]
fn disabling_exception_flows_drops_them_from_the_record() {
    let mut engine = editor();
    load_record(&mut engine, &sample_record()).unwrap();
    engine.set_field(fields::ENABLE_EXCEPTION_FLOWS, false).unwrap();

    let record = build_record(&engine.submission_data(), None).unwrap();
    assert!(record.exception_flows.is_empty());
    assert_eq!(engine.data().items(fields::EXCEPTION_FLOWS).len(), 1);
}

#[tokio::test]
async fn export_then_import_reproduces_content() {
    let service = InMemoryWorkflowService::new();
    let original = service.create_custom_workflow(&sample_record()).await.unwrap();

    let document = service.export_workflow(&original.id).await.unwrap();
    let export: WorkflowExport = serde_json::from_str(&document).unwrap();
    assert_eq!(export.format_version, 1);

    let imported = service.import_workflow(&document).await.unwrap();
    assert_ne!(imported.id, original.id);
    assert!(imported.same_content(&original));
    assert_eq!(imported.nodes, original.nodes);
    assert_eq!(imported.sla_settings, original.sla_settings);
    assert_eq!(imported.exception_flows, original.exception_flows);
    assert_eq!(service.len().await, 2);
}

#[tokio::test]
async fn malformed_documents_are_rejected() {
    let service = InMemoryWorkflowService::new();
    let err = service.import_workflow("{\"workflow\": 3}").await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidDocument(_)));
    assert!(service.is_empty().await);
}

#[tokio::test]
async fn loaded_record_passes_every_step_and_updates_in_place() {
    let service = Arc::new(InMemoryWorkflowService::new());
    let stored = service.create_custom_workflow(&sample_record()).await.unwrap();

    let mut engine = editor();
    load_record(&mut engine, &stored).unwrap();
    for step in 0..engine.step_count() {
        assert!(engine.validate_step(step).unwrap().ok, "step {step}");
    }
    for _ in 0..3 {
        assert!(engine.go_next());
    }
    engine.set_field(fields::DESCRIPTION, "Revisado").unwrap();

    let base = stored.clone();
    let id = engine
        .submit(
            |view| build_record(view, Some(&base)),
            &WorkflowSubmitter::new(service.clone()),
        )
        .await
        .unwrap();

    assert_eq!(id.as_str(), stored.id.to_string());
    assert!(matches!(engine.phase(), WizardPhase::Submitted(_)));
    let updated = service.get_workflow(&stored.id).await.unwrap();
    assert_eq!(updated.description, "Revisado");
    assert_eq!(updated.created_at, stored.created_at);
    assert_eq!(service.len().await, 1);
}

#[test]
fn module_items_convert_back_to_modules() {
    let modules = find_template("elective-surgery").unwrap().modules();
    let items: Vec<CollectionItem> = modules.iter().map(WorkflowModule::to_item).collect();
    let back: Vec<WorkflowModule> = items
        .iter()
        .map(|i| WorkflowModule::try_from(i).unwrap())
        .collect();
    assert_eq!(back, modules);
}

fn with_sla(department: &str, max_time: u32, alert_at: u32) -> WorkflowRecord {
    let mut record = sample_record();
    record.sla_settings.push(SlaSetting {
        department_id: department.into(),
        max_time,
        time_unit: TimeUnit::Hour,
        alert_at,
    });
    record
}

fn with_condition(condition: &str) -> WorkflowRecord {
    let mut record = sample_record();
    record.exception_flows.push(ExceptionFlow {
        condition: condition.into(),
        target_department: Department::Surgery,
        priority: Priority::High,
    });
    record
}

fn loaded_step_error(record: &WorkflowRecord, step: usize) -> Option<String> {
    let mut engine = editor();
    load_record(&mut engine, record).unwrap();
    engine
        .validate_step(step)
        .unwrap()
        .first_error
        .map(|e| e.message)
}

#[test]
fn loaded_collections_are_checked_item_by_item() {
    let cases = [
        (with_sla("triage", 30, 20), 2, "Já existe um SLA para este departamento"),
        (with_sla("bogus", 30, 20), 2, "Departamento inválido"),
        (with_sla("icu", 0, 0), 2, "O tempo máximo deve ser um número inteiro positivo"),
        (with_sla("icu", 10, 0), 2, "O tempo de alerta deve ser um número inteiro positivo"),
        (with_condition("Parada cardiorrespiratória"), 3, "Já existe um fluxo para esta condição"),
        (with_condition("   "), 3, "Condição é obrigatória"),
    ];
    for (record, step, message) in cases {
        assert_eq!(loaded_step_error(&record, step).as_deref(), Some(message));
    }
    assert_eq!(loaded_step_error(&sample_record(), 2), None);
    assert_eq!(loaded_step_error(&sample_record(), 3), None);
}

#[test]
fn duplicate_module_ids_block_the_modules_step() {
    let mut record = sample_record();
    let first = record.nodes[0].clone();
    record.nodes.push(first);
    insta::assert_snapshot!(
        loaded_step_error(&record, 1).unwrap(),
        @"Já existe um módulo com este identificador"
    );
}

#[test]
fn records_with_broken_collections_cannot_be_built() {
    let mut engine = editor();
    load_record(&mut engine, &with_sla("triage", 30, 20)).unwrap();
    let err = build_record(&engine.submission_data(), None).unwrap_err();
    assert!(matches!(err, hospnet_wizard::SubmissionError::Build(_)));
}

#[tokio::test]
async fn import_refuses_broken_collections() {
    let service = InMemoryWorkflowService::new();
    let broken = [
        with_sla("triage", 30, 20),
        with_sla("bogus", 30, 20),
        with_sla("icu", 0, 5),
        with_condition(""),
    ];
    for record in broken {
        let document = serde_json::to_string(&WorkflowExport::new(record)).unwrap();
        let err = service.import_workflow(&document).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidRecord(_)), "{err}");
    }
    assert!(service.is_empty().await);
}

#[test]
fn renaming_an_sla_department_moves_its_key() {
    let mut engine = editor();
    load_record(&mut engine, &sample_record()).unwrap();

    let taken = engine
        .with_collection(fields::SLA_SETTINGS, |items| {
            items.update("triage", SlaSetting::DEPARTMENT, "inpatient")
        })
        .unwrap();
    assert!(!taken);

    let moved = engine
        .with_collection(fields::SLA_SETTINGS, |items| {
            items.update("triage", SlaSetting::DEPARTMENT, "emergency")
        })
        .unwrap();
    assert!(moved);

    let record = build_record(&engine.submission_data(), None).unwrap();
    assert_eq!(record.sla_settings[0].department_id, "emergency");
    assert_eq!(engine.data().items(fields::SLA_SETTINGS)[0].key, "emergency");
}
