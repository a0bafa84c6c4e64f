//! Workflow configuration records: modules, SLA settings and exception flows.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::ids::WorkflowId;
use crate::value::{CollectionItem, FieldValue};

// =============================================================================
// ENUMERATIONS
// =============================================================================

/// Hospital departments a workflow can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Department {
    Triage,
    Emergency,
    Icu,
    Surgery,
    Radiology,
    Laboratory,
    Pharmacy,
    Inpatient,
    Outpatient,
    Administration,
}

impl Department {
    pub const fn all() -> &'static [Department] {
        &[
            Self::Triage,
            Self::Emergency,
            Self::Icu,
            Self::Surgery,
            Self::Radiology,
            Self::Laboratory,
            Self::Pharmacy,
            Self::Inpatient,
            Self::Outpatient,
            Self::Administration,
        ]
    }

    /// Identifier used in forms and JSON.
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Triage => "triage",
            Self::Emergency => "emergency",
            Self::Icu => "icu",
            Self::Surgery => "surgery",
            Self::Radiology => "radiology",
            Self::Laboratory => "laboratory",
            Self::Pharmacy => "pharmacy",
            Self::Inpatient => "inpatient",
            Self::Outpatient => "outpatient",
            Self::Administration => "administration",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Triage => "Triagem",
            Self::Emergency => "Pronto-socorro",
            Self::Icu => "UTI",
            Self::Surgery => "Centro cirúrgico",
            Self::Radiology => "Radiologia",
            Self::Laboratory => "Laboratório",
            Self::Pharmacy => "Farmácia",
            Self::Inpatient => "Internação",
            Self::Outpatient => "Ambulatório",
            Self::Administration => "Administração",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|d| d.id().eq_ignore_ascii_case(s))
    }

    pub fn ids() -> impl Iterator<Item = &'static str> {
        Self::all().iter().map(Department::id)
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Unit an SLA time budget is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
}

impl TimeUnit {
    pub const fn all() -> &'static [TimeUnit] {
        &[Self::Minute, Self::Hour, Self::Day, Self::Week, Self::Month]
    }

    pub const fn id(&self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|u| u.id().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Exception flow priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const fn all() -> &'static [Priority] {
        &[Self::Low, Self::Medium, Self::High, Self::Critical]
    }

    pub const fn id(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|p| p.id().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// =============================================================================
// COLLECTION RECORDS
// =============================================================================

/// Per-department time budget with an earlier alert threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlaSetting {
    pub department_id: String,
    pub max_time: u32,
    pub time_unit: TimeUnit,
    pub alert_at: u32,
}

impl SlaSetting {
    pub const DEPARTMENT: &'static str = "departmentId";
    pub const MAX_TIME: &'static str = "maxTime";
    pub const TIME_UNIT: &'static str = "timeUnit";
    pub const ALERT_AT: &'static str = "alertAt";

    pub fn to_item(&self) -> CollectionItem {
        CollectionItem::new(self.department_id.clone())
            .with(Self::DEPARTMENT, self.department_id.clone())
            .with(Self::MAX_TIME, self.max_time.to_string())
            .with(Self::TIME_UNIT, self.time_unit.id())
            .with(Self::ALERT_AT, self.alert_at.to_string())
    }
}

impl TryFrom<&CollectionItem> for SlaSetting {
    type Error = ModelError;

    fn try_from(item: &CollectionItem) -> Result<Self, Self::Error> {
        let department = Department::parse(&item.key).ok_or_else(|| ModelError::UnknownVariant {
            kind: "department",
            value: item.key.clone(),
        })?;
        let time_unit = item.text(Self::TIME_UNIT);
        Ok(Self {
            department_id: department.id().to_string(),
            max_time: parse_count(item, Self::MAX_TIME)?,
            time_unit: TimeUnit::parse(time_unit).ok_or_else(|| ModelError::UnknownVariant {
                kind: "time unit",
                value: time_unit.to_string(),
            })?,
            alert_at: parse_count(item, Self::ALERT_AT)?,
        })
    }
}

/// Rerouting rule applied when a condition is met during a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionFlow {
    pub condition: String,
    pub target_department: Department,
    pub priority: Priority,
}

impl ExceptionFlow {
    pub const CONDITION: &'static str = "condition";
    pub const TARGET: &'static str = "targetDepartment";
    pub const PRIORITY: &'static str = "priority";

    pub fn to_item(&self) -> CollectionItem {
        CollectionItem::new(self.condition.trim())
            .with(Self::CONDITION, self.condition.clone())
            .with(Self::TARGET, self.target_department.id())
            .with(Self::PRIORITY, self.priority.id())
    }
}

impl TryFrom<&CollectionItem> for ExceptionFlow {
    type Error = ModelError;

    fn try_from(item: &CollectionItem) -> Result<Self, Self::Error> {
        let condition = match item.text(Self::CONDITION) {
            "" => item.key.trim().to_string(),
            c => c.to_string(),
        };
        if condition.trim().is_empty() {
            return Err(ModelError::MissingItemField(Self::CONDITION.to_string()));
        }
        let target = item.text(Self::TARGET);
        let priority = item.text(Self::PRIORITY);
        Ok(Self {
            condition,
            target_department: Department::parse(target).ok_or_else(|| {
                ModelError::UnknownVariant {
                    kind: "department",
                    value: target.to_string(),
                }
            })?,
            priority: Priority::parse(priority).ok_or_else(|| ModelError::UnknownVariant {
                kind: "priority",
                value: priority.to_string(),
            })?,
        })
    }
}

/// One step (node) of a custom workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowModule {
    pub module_id: String,
    pub name: String,
    pub department: Department,
}

impl WorkflowModule {
    /// Name of the key when a module is entered through a form.
    pub const MODULE_ID: &'static str = "moduleId";
    pub const NAME: &'static str = "name";
    pub const DEPARTMENT: &'static str = "department";

    pub fn to_item(&self) -> CollectionItem {
        CollectionItem::new(self.module_id.clone())
            .with(Self::NAME, self.name.clone())
            .with(Self::DEPARTMENT, self.department.id())
    }
}

impl TryFrom<&CollectionItem> for WorkflowModule {
    type Error = ModelError;

    fn try_from(item: &CollectionItem) -> Result<Self, Self::Error> {
        if item.key.trim().is_empty() {
            return Err(ModelError::MissingItemField(Self::MODULE_ID.to_string()));
        }
        let department = item.text(Self::DEPARTMENT);
        Ok(Self {
            module_id: item.key.clone(),
            name: item.text(Self::NAME).to_string(),
            department: Department::parse(department).ok_or_else(|| {
                ModelError::UnknownVariant {
                    kind: "department",
                    value: department.to_string(),
                }
            })?,
        })
    }
}

fn parse_count(item: &CollectionItem, field: &str) -> Result<u32, ModelError> {
    let raw = item
        .get(field)
        .and_then(FieldValue::as_text)
        .ok_or_else(|| ModelError::MissingItemField(field.to_string()))?;
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| ModelError::InvalidItemField {
            field: field.to_string(),
            expected: "positive whole number",
        })
}

/// Convert every item, then require distinct keys.
fn check_items<T>(collection: &'static str, entries: &[T], to_item: fn(&T) -> CollectionItem) -> Result<(), ModelError>
where
    T: for<'a> TryFrom<&'a CollectionItem, Error = ModelError>,
{
    let mut seen = BTreeSet::new();
    for item in entries.iter().map(to_item) {
        T::try_from(&item)?;
        if !seen.insert(item.key.clone()) {
            return Err(ModelError::DuplicateKey {
                collection,
                key: item.key,
            });
        }
    }
    Ok(())
}

// =============================================================================
// WORKFLOW RECORD
// =============================================================================

/// A custom workflow as stored by the workflow service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRecord {
    pub id: WorkflowId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default)]
    pub nodes: Vec<WorkflowModule>,
    #[serde(default)]
    pub sla_settings: Vec<SlaSetting>,
    #[serde(default)]
    pub exception_flows: Vec<ExceptionFlow>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkflowRecord {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: WorkflowId::new(),
            name: name.into(),
            description: String::new(),
            template_id: None,
            nodes: Vec::new(),
            sla_settings: Vec::new(),
            exception_flows: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Check every collection entry: known departments, positive times,
    /// non-blank conditions and module ids, and no two entries under one key.
    ///
    /// Editor rules such as the alert threshold are not checked here.
    pub fn check_integrity(&self) -> Result<(), ModelError> {
        check_items("nodes", &self.nodes, WorkflowModule::to_item)?;
        check_items("slaSettings", &self.sla_settings, SlaSetting::to_item)?;
        check_items("exceptionFlows", &self.exception_flows, ExceptionFlow::to_item)
    }

    /// Same configuration content, ignoring identity and timestamps.
    pub fn same_content(&self, other: &Self) -> bool {
        self.name == other.name
            && self.description == other.description
            && self.template_id == other.template_id
            && self.nodes == other.nodes
            && self.sla_settings == other.sla_settings
            && self.exception_flows == other.exception_flows
    }
}

/// Current workflow export document version.
pub const EXPORT_FORMAT_VERSION: u32 = 1;

/// Portable export document wrapping a workflow record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowExport {
    pub format_version: u32,
    pub exported_at: DateTime<Utc>,
    pub workflow: WorkflowRecord,
}

impl WorkflowExport {
    pub fn new(workflow: WorkflowRecord) -> Self {
        Self {
            format_version: EXPORT_FORMAT_VERSION,
            exported_at: Utc::now(),
            workflow,
        }
    }
}
