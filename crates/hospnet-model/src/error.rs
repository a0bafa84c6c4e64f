use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ModelError {
    #[error("invalid field name: {0:?}")]
    InvalidFieldName(String),
    #[error("invalid submission id: {0:?}")]
    InvalidSubmissionId(String),
    #[error("invalid patient id: {0:?}")]
    InvalidPatientId(String),
    #[error("unknown {kind} value: {value:?}")]
    UnknownVariant { kind: &'static str, value: String },
    #[error("collection item is missing field '{0}'")]
    MissingItemField(String),
    #[error("collection item field '{field}' is not a valid {expected}")]
    InvalidItemField {
        field: String,
        expected: &'static str,
    },
    #[error("{collection} has more than one item keyed {key:?}")]
    DuplicateKey {
        collection: &'static str,
        key: String,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
