pub mod error;
pub mod field;
pub mod form;
pub mod ids;
pub mod registration;
pub mod value;
pub mod workflow;

pub use error::{ModelError, Result};
pub use field::{FieldKind, FieldModel};
pub use form::FormData;
pub use ids::{PatientId, SubmissionId, WorkflowId};
pub use registration::{
    AdditionalData, Address, ContactInfo, HealthInfo, PATIENT_PERMISSIONS, PATIENT_ROLE,
    PatientRegistration, Preferences,
};
pub use value::{CollectionItem, FieldValue};
pub use workflow::{
    Department, EXPORT_FORMAT_VERSION, ExceptionFlow, Priority, SlaSetting, TimeUnit,
    WorkflowExport, WorkflowModule, WorkflowRecord,
};
