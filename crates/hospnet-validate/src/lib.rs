//! Form validation for hospnet wizards.
//!
//! Each wizard step owns a [`RuleSet`]: an ordered list of named [`Rule`]s,
//! each pairing a [`Check`] with the message shown when it fails. Evaluation
//! short-circuits, so a step reports exactly one error at a time:
//!
//! - **Presence**: required answers, ticked checkboxes
//! - **Format**: email shape, masked digit counts, ISO dates, whole numbers
//! - **Consistency**: field equality (password confirmation), unique
//!   collection keys, custom predicates
//!
//! # Example
//!
//! ```
//! use hospnet_model::{FieldValue, FormData};
//! use hospnet_validate::RuleSet;
//!
//! let rules = RuleSet::new()
//!     .required("email", "Email é obrigatório")
//!     .email("email", "Email inválido");
//!
//! let mut data = FormData::new();
//! data.set("email", FieldValue::text("not-an-email"));
//!
//! let result = rules.evaluate(&data);
//! assert_eq!(result.first_error.unwrap().message, "Email inválido");
//! ```

pub mod checks;
mod result;
mod rules;

pub use checks::{Check, Predicate};
pub use result::{FieldError, ValidationResult};
pub use rules::{Rule, RuleSet};
