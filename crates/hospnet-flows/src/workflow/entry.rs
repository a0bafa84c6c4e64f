//! Small entry forms that append one item to a workflow collection.

use std::marker::PhantomData;
use std::sync::Arc;

use hospnet_model::{
    CollectionItem, Department, ExceptionFlow, FieldKind, FieldModel, FieldValue, FormData,
    ModelError, Priority, SlaSetting, TimeUnit, WorkflowModule,
};
use hospnet_validate::RuleSet;
use hospnet_wizard::{DefinitionError, StepDefinition, WizardDefinition, WizardEngine, WizardError};

use super::alert_within_limit;
use super::fields::{EXCEPTION_FLOWS, MODULES, SLA_SETTINGS};
use crate::error::EntryError;

/// An item type with its own one-step entry form.
pub trait EntryItem: Sized {
    /// Wizard id of the entry form.
    const FORM_ID: &'static str;
    /// Collection field of the workflow editor the item goes into.
    const COLLECTION: &'static str;
    const DUPLICATE_MESSAGE: &'static str;

    fn form() -> Result<WizardDefinition, DefinitionError>;
    fn from_form(data: &FormData) -> Result<Self, ModelError>;
    fn item(&self) -> CollectionItem;
}

/// Entry form bound to an item type. A committed entry is appended to the
/// target collection and the form starts over.
#[derive(Debug)]
pub struct EntryEditor<T> {
    definition: Arc<WizardDefinition>,
    form: WizardEngine,
    _item: PhantomData<fn() -> T>,
}

pub type SlaEditor = EntryEditor<SlaSetting>;
pub type ExceptionFlowEditor = EntryEditor<ExceptionFlow>;
pub type ModuleEditor = EntryEditor<WorkflowModule>;

impl<T: EntryItem> EntryEditor<T> {
    pub fn new() -> Result<Self, DefinitionError> {
        let definition = Arc::new(T::form()?);
        Ok(Self {
            form: WizardEngine::new(definition.clone()),
            definition,
            _item: PhantomData,
        })
    }

    pub fn form(&self) -> &WizardEngine {
        &self.form
    }

    pub fn set(&mut self, field: &str, value: impl Into<FieldValue>) -> Result<(), WizardError> {
        self.form.set_field(field, value)
    }

    /// Validate the form and append the item to `target`.
    ///
    /// Nothing is appended when the form is invalid or the key is taken.
    pub fn commit(&mut self, target: &mut WizardEngine) -> Result<T, EntryError> {
        self.form
            .validate_current_step()
            .into_result()
            .map_err(EntryError::Invalid)?;
        let entry = T::from_form(&self.form.submission_data())?;
        let item = entry.item();
        let key = item.key.clone();

        if !target.with_collection(T::COLLECTION, |items| items.add(item))? {
            return Err(EntryError::Duplicate {
                key,
                message: T::DUPLICATE_MESSAGE.to_string(),
            });
        }
        tracing::debug!(collection = T::COLLECTION, %key, "entry committed");
        self.form = WizardEngine::new(self.definition.clone());
        Ok(entry)
    }
}

impl EntryItem for SlaSetting {
    const FORM_ID: &'static str = "sla-entry";
    const COLLECTION: &'static str = SLA_SETTINGS;
    const DUPLICATE_MESSAGE: &'static str = "Já existe um SLA para este departamento";

    fn form() -> Result<WizardDefinition, DefinitionError> {
        let step = StepDefinition::new(0, "Novo SLA")
            .fields([
                FieldModel::required(Self::DEPARTMENT, FieldKind::Select)?,
                FieldModel::required(Self::MAX_TIME, FieldKind::Text)?,
                FieldModel::required(Self::TIME_UNIT, FieldKind::Select)?,
                FieldModel::required(Self::ALERT_AT, FieldKind::Text)?,
            ])
            .rules(
                RuleSet::new()
                    .required(Self::DEPARTMENT, "Selecione um departamento")
                    .one_of(Self::DEPARTMENT, Department::ids(), "Departamento inválido")
                    .required(Self::MAX_TIME, "Tempo máximo é obrigatório")
                    .positive_integer(Self::MAX_TIME, "O tempo máximo deve ser um número inteiro positivo")
                    .one_of(
                        Self::TIME_UNIT,
                        TimeUnit::all().iter().map(TimeUnit::id),
                        "Unidade de tempo inválida",
                    )
                    .required(Self::ALERT_AT, "Tempo de alerta é obrigatório")
                    .positive_integer(Self::ALERT_AT, "O tempo de alerta deve ser um número inteiro positivo")
                    .custom(
                        "alertAt.within_limit",
                        Self::ALERT_AT,
                        |data| alert_within_limit(data.text(Self::MAX_TIME), data.text(Self::ALERT_AT)),
                        "O alerta deve ocorrer antes do tempo máximo",
                    ),
            );
        WizardDefinition::builder(Self::FORM_ID)
            .step(step)
            .default_value(Self::TIME_UNIT, TimeUnit::Minute.id())
            .build()
    }

    fn from_form(data: &FormData) -> Result<Self, ModelError> {
        let item = CollectionItem::new(data.text(Self::DEPARTMENT))
            .with(Self::MAX_TIME, data.text(Self::MAX_TIME))
            .with(Self::TIME_UNIT, data.text(Self::TIME_UNIT))
            .with(Self::ALERT_AT, data.text(Self::ALERT_AT));
        Self::try_from(&item)
    }

    fn item(&self) -> CollectionItem {
        self.to_item()
    }
}

impl EntryItem for ExceptionFlow {
    const FORM_ID: &'static str = "exception-flow-entry";
    const COLLECTION: &'static str = EXCEPTION_FLOWS;
    const DUPLICATE_MESSAGE: &'static str = "Já existe um fluxo para esta condição";

    fn form() -> Result<WizardDefinition, DefinitionError> {
        let step = StepDefinition::new(0, "Novo fluxo de exceção")
            .fields([
                FieldModel::required(Self::CONDITION, FieldKind::Text)?,
                FieldModel::required(Self::TARGET, FieldKind::Select)?,
                FieldModel::required(Self::PRIORITY, FieldKind::Select)?,
            ])
            .rules(
                RuleSet::new()
                    .required(Self::CONDITION, "Condição é obrigatória")
                    .required(Self::TARGET, "Selecione o departamento de destino")
                    .one_of(Self::TARGET, Department::ids(), "Departamento inválido")
                    .one_of(
                        Self::PRIORITY,
                        Priority::all().iter().map(Priority::id),
                        "Prioridade inválida",
                    ),
            );
        WizardDefinition::builder(Self::FORM_ID)
            .step(step)
            .default_value(Self::PRIORITY, Priority::Medium.id())
            .build()
    }

    fn from_form(data: &FormData) -> Result<Self, ModelError> {
        let item = CollectionItem::new(data.text(Self::CONDITION))
            .with(Self::CONDITION, data.text(Self::CONDITION))
            .with(Self::TARGET, data.text(Self::TARGET))
            .with(Self::PRIORITY, data.text(Self::PRIORITY));
        Self::try_from(&item)
    }

    fn item(&self) -> CollectionItem {
        self.to_item()
    }
}

impl EntryItem for WorkflowModule {
    const FORM_ID: &'static str = "module-entry";
    const COLLECTION: &'static str = MODULES;
    const DUPLICATE_MESSAGE: &'static str = "Já existe um módulo com este identificador";

    fn form() -> Result<WizardDefinition, DefinitionError> {
        let step = StepDefinition::new(0, "Novo módulo")
            .fields([
                FieldModel::required(Self::MODULE_ID, FieldKind::Text)?,
                FieldModel::required(Self::NAME, FieldKind::Text)?,
                FieldModel::required(Self::DEPARTMENT, FieldKind::Select)?,
            ])
            .rules(
                RuleSet::new()
                    .required(Self::MODULE_ID, "Identificador do módulo é obrigatório")
                    .required(Self::NAME, "Nome do módulo é obrigatório")
                    .required(Self::DEPARTMENT, "Selecione um departamento")
                    .one_of(Self::DEPARTMENT, Department::ids(), "Departamento inválido"),
            );
        WizardDefinition::builder(Self::FORM_ID).step(step).build()
    }

    fn from_form(data: &FormData) -> Result<Self, ModelError> {
        let item = CollectionItem::new(data.text(Self::MODULE_ID))
            .with(Self::NAME, data.text(Self::NAME))
            .with(Self::DEPARTMENT, data.text(Self::DEPARTMENT));
        Self::try_from(&item)
    }

    fn item(&self) -> CollectionItem {
        self.to_item()
    }
}
