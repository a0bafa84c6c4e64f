//! Step and wizard definitions.
//!
//! A [`WizardDefinition`] is assembled once and checked at construction:
//! every field name is unique, every rule and conditional section refers to a
//! registered field, and every default value fits its field's kind. A running
//! engine can therefore treat an unknown field name as a caller bug.

use std::collections::{BTreeMap, BTreeSet};

use hospnet_model::{FieldKind, FieldModel, FieldValue, FormData};
use hospnet_validate::{Check, RuleSet, ValidationResult};

use crate::conditional::{ConditionalSection, ConditionalSectionResolver};
use crate::error::DefinitionError;

/// Message used for required fields that have no explicit `required` rule.
pub const DEFAULT_REQUIRED_MESSAGE: &str = "Campo obrigatório";

/// One page of a wizard: its fields and its ordered validation rules.
#[derive(Debug, Clone)]
pub struct StepDefinition {
    index: usize,
    title: String,
    fields: Vec<FieldModel>,
    rules: RuleSet,
}

impl StepDefinition {
    pub fn new(index: usize, title: impl Into<String>) -> Self {
        Self {
            index,
            title: title.into(),
            fields: Vec::new(),
            rules: RuleSet::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, field: FieldModel) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldModel>) -> Self {
        self.fields.extend(fields);
        self
    }

    #[must_use]
    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn field_models(&self) -> &[FieldModel] {
        &self.fields
    }

    pub fn rule_set(&self) -> &RuleSet {
        &self.rules
    }

    /// Run this step's rules, skipping rules on inactive fields.
    pub fn validate(&self, data: &FormData, active: &BTreeSet<String>) -> ValidationResult {
        self.rules.evaluate_active(data, |field| active.contains(field))
    }

    /// Append a generic `required` rule for each required field the
    /// explicit rules do not already cover, after the explicit ones.
    fn cover_required_fields(&mut self) {
        let covered: BTreeSet<String> = self
            .rules
            .rules()
            .iter()
            .filter(|r| matches!(r.check, Check::Required { .. } | Check::MustBeTrue { .. }))
            .map(|r| r.field().to_string())
            .collect();
        let missing: Vec<String> = self
            .fields
            .iter()
            .filter(|f| f.is_required() && !covered.contains(f.name()))
            .map(|f| f.name().to_string())
            .collect();
        for name in missing {
            self.rules = std::mem::take(&mut self.rules).required(&name, DEFAULT_REQUIRED_MESSAGE);
        }
    }
}

/// Immutable description of a wizard: ordered steps, conditional sections
/// and initial values.
#[derive(Debug, Clone)]
pub struct WizardDefinition {
    id: String,
    steps: Vec<StepDefinition>,
    registry: BTreeMap<String, (usize, FieldModel)>,
    resolver: ConditionalSectionResolver,
    defaults: FormData,
    collection_keys: BTreeMap<String, String>,
}

impl WizardDefinition {
    pub fn builder(id: impl Into<String>) -> WizardDefinitionBuilder {
        WizardDefinitionBuilder {
            id: id.into(),
            steps: Vec::new(),
            sections: Vec::new(),
            defaults: Vec::new(),
            collection_keys: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&StepDefinition> {
        self.steps.get(index)
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn field(&self, name: &str) -> Option<&FieldModel> {
        self.registry.get(name).map(|(_, f)| f)
    }

    /// Index of the step owning `name`.
    pub fn step_of(&self, name: &str) -> Option<usize> {
        self.registry.get(name).map(|(i, _)| *i)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.registry.keys().map(String::as_str)
    }

    /// Item field the keys of collection `name` are derived from, if any.
    pub fn collection_key(&self, name: &str) -> Option<&str> {
        self.collection_keys.get(name).map(String::as_str)
    }

    pub fn resolver(&self) -> &ConditionalSectionResolver {
        &self.resolver
    }

    /// Initial form data: every field at its default or empty value.
    pub fn initial_data(&self) -> FormData {
        self.defaults.clone()
    }
}

/// Builder for [`WizardDefinition`].
#[derive(Debug)]
pub struct WizardDefinitionBuilder {
    id: String,
    steps: Vec<StepDefinition>,
    sections: Vec<ConditionalSection>,
    defaults: Vec<(String, FieldValue)>,
    collection_keys: BTreeMap<String, String>,
}

impl WizardDefinitionBuilder {
    #[must_use]
    pub fn step(mut self, step: StepDefinition) -> Self {
        self.steps.push(step);
        self
    }

    #[must_use]
    pub fn section(mut self, section: ConditionalSection) -> Self {
        self.sections.push(section);
        self
    }

    #[must_use]
    pub fn default_value(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.defaults.push((field.into(), value.into()));
        self
    }

    /// Derive the keys of `collection` from the item field `key_field`.
    #[must_use]
    pub fn collection_key(mut self, collection: impl Into<String>, key_field: impl Into<String>) -> Self {
        self.collection_keys.insert(collection.into(), key_field.into());
        self
    }

    pub fn build(self) -> Result<WizardDefinition, DefinitionError> {
        if self.steps.is_empty() {
            return Err(DefinitionError::NoSteps);
        }

        let mut steps = self.steps;
        let mut registry = BTreeMap::new();
        for (expected, step) in steps.iter_mut().enumerate() {
            if step.index != expected {
                return Err(DefinitionError::StepIndexGap {
                    expected,
                    found: step.index,
                });
            }
            for field in &step.fields {
                if registry
                    .insert(field.name().to_string(), (expected, field.clone()))
                    .is_some()
                {
                    return Err(DefinitionError::DuplicateField(field.name().to_string()));
                }
            }
            step.cover_required_fields();
        }

        for step in &steps {
            for rule in step.rules.rules() {
                let other = match &rule.check {
                    Check::Equals { other, .. } => Some(other.as_str()),
                    _ => None,
                };
                for field in std::iter::once(rule.field()).chain(other) {
                    if !registry.contains_key(field) {
                        return Err(DefinitionError::UnknownRuleField {
                            step: step.index,
                            rule: rule.name.clone(),
                            field: field.to_string(),
                        });
                    }
                }
            }
        }

        for section in &self.sections {
            let names = std::iter::once(&section.guard_field).chain(&section.dependent_fields);
            for name in names {
                if !registry.contains_key(name) {
                    return Err(DefinitionError::UnknownSectionField(name.clone()));
                }
            }
        }

        for collection in self.collection_keys.keys() {
            match registry.get(collection) {
                Some((_, field)) if field.kind() == FieldKind::Collection => {}
                _ => return Err(DefinitionError::NotACollection(collection.clone())),
            }
        }

        let mut defaults: FormData = registry
            .iter()
            .map(|(name, (_, field))| (name.clone(), field.kind().empty_value()))
            .collect();
        for (name, value) in self.defaults {
            let Some((_, field)) = registry.get(&name) else {
                return Err(DefinitionError::UnknownDefaultField(name));
            };
            if !field.kind().accepts(&value) {
                return Err(DefinitionError::DefaultKindMismatch {
                    field: name,
                    kind: field.kind(),
                });
            }
            defaults.set(name, value);
        }

        let resolver = ConditionalSectionResolver::new(registry.keys().cloned().collect(), self.sections);

        tracing::debug!(wizard = %self.id, steps = steps.len(), fields = registry.len(), "wizard definition built");

        Ok(WizardDefinition {
            id: self.id,
            steps,
            registry,
            resolver,
            defaults,
            collection_keys: self.collection_keys,
        })
    }
}
