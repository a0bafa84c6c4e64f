//! Custom workflow editor: template, modules, SLA settings, exception flows.

mod entry;
mod service;
mod template;

pub use entry::{EntryEditor, EntryItem, ExceptionFlowEditor, ModuleEditor, SlaEditor};
pub use service::{InMemoryWorkflowService, WorkflowService, WorkflowSubmitter};
pub use template::{TEMPLATES, WorkflowTemplate, find_template, template_ids};

use chrono::Utc;
use hospnet_model::{
    CollectionItem, Department, ExceptionFlow, FieldKind, FieldModel, FieldValue, FormData, SlaSetting,
    WorkflowModule, WorkflowRecord,
};
use hospnet_validate::RuleSet;
use hospnet_validate::checks::format::is_positive_integer;
use hospnet_wizard::{
    ConditionalSection, DefinitionError, GuardPredicate, StepDefinition, SubmissionError,
    WizardDefinition, WizardEngine, WizardError,
};

/// Identifier of the workflow editor wizard, recorded in drafts.
pub const WIZARD_ID: &str = "workflow-editor";

/// Field names of the workflow editor.
pub mod fields {
    pub const NAME: &str = "name";
    pub const DESCRIPTION: &str = "description";
    pub const TEMPLATE_ID: &str = "templateId";
    pub const MODULES: &str = "modules";
    pub const SLA_SETTINGS: &str = "slaSettings";
    pub const ENABLE_EXCEPTION_FLOWS: &str = "enableExceptionFlows";
    pub const EXCEPTION_FLOWS: &str = "exceptionFlows";
}

use fields::{
    DESCRIPTION, ENABLE_EXCEPTION_FLOWS, EXCEPTION_FLOWS, MODULES, NAME, SLA_SETTINGS, TEMPLATE_ID,
};

/// Whether an alert threshold fires no later than the limit. Unparseable
/// values pass; the number checks report them.
pub(crate) fn alert_within_limit(max_time: &str, alert_at: &str) -> bool {
    match (max_time.trim().parse::<u32>(), alert_at.trim().parse::<u32>()) {
        (Ok(max), Ok(alert)) => alert <= max,
        _ => true,
    }
}

fn every_item_positive(collection: &'static str, field: &'static str) -> impl Fn(&FormData) -> bool + Send + Sync {
    move |data| {
        data.items(collection)
            .iter()
            .all(|item| is_positive_integer(item.text(field)))
    }
}

fn all_items_parse<T>(field: &'static str) -> impl Fn(&FormData) -> bool + Send + Sync
where
    T: for<'a> TryFrom<&'a CollectionItem> + 'static,
{
    move |data| data.items(field).iter().all(|item| T::try_from(item).is_ok())
}

/// Build the workflow editor wizard.
pub fn definition() -> Result<WizardDefinition, DefinitionError> {
    let template = StepDefinition::new(0, "Modelo")
        .fields([
            FieldModel::required(NAME, FieldKind::Text)?,
            FieldModel::optional(DESCRIPTION, FieldKind::Text)?,
            FieldModel::optional(TEMPLATE_ID, FieldKind::Select)?,
        ])
        .rules(
            RuleSet::new()
                .required(NAME, "Nome do fluxo é obrigatório")
                .one_of(TEMPLATE_ID, template_ids(), "Modelo desconhecido"),
        );

    let modules = StepDefinition::new(1, "Módulos")
        .field(FieldModel::required(MODULES, FieldKind::Collection)?)
        .rules(
            RuleSet::new()
                .required(MODULES, "Adicione pelo menos um módulo")
                .unique_keys(MODULES, WorkflowModule::DUPLICATE_MESSAGE)
                .custom(
                    "modules.valid",
                    MODULES,
                    all_items_parse::<WorkflowModule>(MODULES),
                    "Módulo com departamento inválido",
                ),
        );

    let sla = StepDefinition::new(2, "SLA")
        .field(FieldModel::optional(SLA_SETTINGS, FieldKind::Collection)?)
        .rules(
            RuleSet::new()
                .unique_keys(SLA_SETTINGS, SlaSetting::DUPLICATE_MESSAGE)
                .custom(
                    "slaSettings.department",
                    SLA_SETTINGS,
                    |data| {
                        data.items(SLA_SETTINGS)
                            .iter()
                            .all(|item| Department::parse(&item.key).is_some())
                    },
                    "Departamento inválido",
                )
                .custom(
                    "slaSettings.max_time",
                    SLA_SETTINGS,
                    every_item_positive(SLA_SETTINGS, SlaSetting::MAX_TIME),
                    "O tempo máximo deve ser um número inteiro positivo",
                )
                .custom(
                    "slaSettings.alert_at",
                    SLA_SETTINGS,
                    every_item_positive(SLA_SETTINGS, SlaSetting::ALERT_AT),
                    "O tempo de alerta deve ser um número inteiro positivo",
                )
                .custom(
                    "slaSettings.valid",
                    SLA_SETTINGS,
                    all_items_parse::<SlaSetting>(SLA_SETTINGS),
                    "Configuração de SLA inválida",
                )
                .custom(
                    "slaSettings.alert_within_limit",
                    SLA_SETTINGS,
                    |data| {
                        data.items(SLA_SETTINGS).iter().all(|item| {
                            alert_within_limit(
                                item.text(SlaSetting::MAX_TIME),
                                item.text(SlaSetting::ALERT_AT),
                            )
                        })
                    },
                    "O alerta deve ocorrer antes do tempo máximo",
                ),
        );

    let exceptions = StepDefinition::new(3, "Exceções")
        .fields([
            FieldModel::optional(ENABLE_EXCEPTION_FLOWS, FieldKind::Checkbox)?,
            FieldModel::required(EXCEPTION_FLOWS, FieldKind::Collection)?,
        ])
        .rules(
            RuleSet::new()
                .required(EXCEPTION_FLOWS, "Adicione pelo menos um fluxo de exceção")
                .unique_keys(EXCEPTION_FLOWS, ExceptionFlow::DUPLICATE_MESSAGE)
                .custom(
                    "exceptionFlows.condition",
                    EXCEPTION_FLOWS,
                    |data| {
                        data.items(EXCEPTION_FLOWS).iter().all(|item| {
                            !item.key.trim().is_empty() || !item.text(ExceptionFlow::CONDITION).trim().is_empty()
                        })
                    },
                    "Condição é obrigatória",
                )
                .custom(
                    "exceptionFlows.valid",
                    EXCEPTION_FLOWS,
                    all_items_parse::<ExceptionFlow>(EXCEPTION_FLOWS),
                    "Fluxo de exceção inválido",
                ),
        );

    WizardDefinition::builder(WIZARD_ID)
        .step(template)
        .step(modules)
        .step(sla)
        .step(exceptions)
        .section(ConditionalSection::new(
            ENABLE_EXCEPTION_FLOWS,
            GuardPredicate::Truthy,
            [EXCEPTION_FLOWS],
        ))
        .collection_key(SLA_SETTINGS, SlaSetting::DEPARTMENT)
        .collection_key(EXCEPTION_FLOWS, ExceptionFlow::CONDITION)
        .build()
}

/// Fill an editor with an existing record, e.g. after import.
pub fn load_record(engine: &mut WizardEngine, record: &WorkflowRecord) -> Result<(), WizardError> {
    engine.set_field(NAME, record.name.as_str())?;
    engine.set_field(DESCRIPTION, record.description.as_str())?;
    engine.set_field(TEMPLATE_ID, record.template_id.clone().unwrap_or_default())?;
    engine.set_field(MODULES, FieldValue::Items(record.nodes.iter().map(WorkflowModule::to_item).collect()))?;
    engine.set_field(
        SLA_SETTINGS,
        FieldValue::Items(record.sla_settings.iter().map(SlaSetting::to_item).collect()),
    )?;
    engine.set_field(ENABLE_EXCEPTION_FLOWS, !record.exception_flows.is_empty())?;
    engine.set_field(
        EXCEPTION_FLOWS,
        FieldValue::Items(record.exception_flows.iter().map(ExceptionFlow::to_item).collect()),
    )?;
    Ok(())
}

/// Start from a template: records its id and replaces the module list.
pub fn apply_template(engine: &mut WizardEngine, template: &WorkflowTemplate) -> Result<(), WizardError> {
    engine.set_field(TEMPLATE_ID, template.id)?;
    if engine.data().text(NAME).is_empty() {
        engine.set_field(NAME, template.name)?;
    }
    let modules = template.modules().iter().map(WorkflowModule::to_item).collect();
    engine.set_field(MODULES, FieldValue::Items(modules))
}

/// Build a workflow record from the submission view.
///
/// `base` carries identity and creation time when editing an existing
/// record; otherwise a new id is assigned.
pub fn build_record(view: &FormData, base: Option<&WorkflowRecord>) -> Result<WorkflowRecord, SubmissionError> {
    fn collect<T>(view: &FormData, field: &str) -> Result<Vec<T>, SubmissionError>
    where
        T: for<'a> TryFrom<&'a CollectionItem, Error = hospnet_model::ModelError>,
    {
        view.items(field)
            .iter()
            .map(T::try_from)
            .collect::<Result<_, _>>()
            .map_err(|e| SubmissionError::Build(format!("{field}: {e}")))
    }

    let mut record = base.cloned().unwrap_or_else(|| WorkflowRecord::new(""));
    record.name = view.text(NAME).to_string();
    record.description = view.text(DESCRIPTION).to_string();
    record.template_id = Some(view.text(TEMPLATE_ID))
        .filter(|t| !t.is_empty())
        .map(str::to_string);
    record.nodes = collect(view, MODULES)?;
    record.sla_settings = collect(view, SLA_SETTINGS)?;
    record.exception_flows = collect(view, EXCEPTION_FLOWS)?;
    record.updated_at = Utc::now();
    record
        .check_integrity()
        .map_err(|e| SubmissionError::Build(e.to_string()))?;
    Ok(record)
}
