//! Built-in workflow templates a custom workflow can start from.

use hospnet_model::{Department, WorkflowModule};

/// A starting point for a custom workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    stages: &'static [(&'static str, &'static str, Department)],
}

impl WorkflowTemplate {
    /// The template's modules, in order.
    pub fn modules(&self) -> Vec<WorkflowModule> {
        self.stages
            .iter()
            .map(|(id, name, department)| WorkflowModule {
                module_id: (*id).to_string(),
                name: (*name).to_string(),
                department: *department,
            })
            .collect()
    }
}

pub const TEMPLATES: &[WorkflowTemplate] = &[
    WorkflowTemplate {
        id: "emergency-care",
        name: "Atendimento de emergência",
        description: "Da triagem à internação",
        stages: &[
            ("triage", "Triagem", Department::Triage),
            ("emergency-care", "Atendimento", Department::Emergency),
            ("imaging", "Exames de imagem", Department::Radiology),
            ("lab-tests", "Exames laboratoriais", Department::Laboratory),
            ("admission", "Internação", Department::Inpatient),
        ],
    },
    WorkflowTemplate {
        id: "outpatient-visit",
        name: "Consulta ambulatorial",
        description: "Agendamento, consulta e dispensação",
        stages: &[
            ("check-in", "Recepção", Department::Administration),
            ("consultation", "Consulta", Department::Outpatient),
            ("lab-tests", "Exames laboratoriais", Department::Laboratory),
            ("dispensing", "Dispensação", Department::Pharmacy),
        ],
    },
    WorkflowTemplate {
        id: "elective-surgery",
        name: "Cirurgia eletiva",
        description: "Pré-operatório, cirurgia e recuperação",
        stages: &[
            ("pre-op", "Pré-operatório", Department::Administration),
            ("surgery", "Cirurgia", Department::Surgery),
            ("recovery", "Recuperação", Department::Icu),
            ("ward", "Enfermaria", Department::Inpatient),
            ("discharge-meds", "Medicação de alta", Department::Pharmacy),
        ],
    },
];

pub fn find_template(id: &str) -> Option<&'static WorkflowTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}

pub fn template_ids() -> impl Iterator<Item = &'static str> {
    TEMPLATES.iter().map(|t| t.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn module_ids_are_unique_within_each_template() {
        for template in TEMPLATES {
            let modules = template.modules();
            let ids: BTreeSet<_> = modules.iter().map(|m| m.module_id.as_str()).collect();
            assert_eq!(ids.len(), modules.len(), "{}", template.id);
        }
    }

    #[test]
    fn finds_by_id() {
        assert_eq!(find_template("outpatient-visit").map(|t| t.modules().len()), Some(4));
        assert!(find_template("unknown").is_none());
    }
}
