//! Rule ordering and short-circuit behavior.

use hospnet_model::{FieldValue, FormData};
use hospnet_validate::{FieldError, RuleSet};
use proptest::prelude::*;

fn account_rules() -> RuleSet {
    RuleSet::new()
        .required("email", "Email é obrigatório")
        .email("email", "Email inválido")
        .required("password", "Senha é obrigatória")
        .min_length("password", 6, "A senha deve ter pelo menos 6 caracteres")
        .equals("confirmPassword", "password", "As senhas não coincidem")
}

fn form(pairs: &[(&str, &str)]) -> FormData {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), FieldValue::text(*v)))
        .collect()
}

#[test]
fn short_password_reported_before_mismatch() {
    let result = account_rules().evaluate(&form(&[
        ("email", "ana@example.com"),
        ("password", "abc12"),
        ("confirmPassword", "different"),
    ]));
    let error = result.first_error.expect("error");
    assert_eq!(error.field, "password");
    insta::assert_snapshot!(error.to_string(), @"password: A senha deve ter pelo menos 6 caracteres");
}

#[test]
fn mismatch_reported_when_password_long_enough() {
    let result = account_rules().evaluate(&form(&[
        ("email", "ana@example.com"),
        ("password", "abc123"),
        ("confirmPassword", "abc124"),
    ]));
    assert_eq!(
        result.first_error,
        Some(FieldError::new("confirmPassword", "As senhas não coincidem"))
    );
}

#[test]
fn all_valid_passes() {
    let result = account_rules().evaluate(&form(&[
        ("email", "ana@example.com"),
        ("password", "abc123"),
        ("confirmPassword", "abc123"),
    ]));
    assert!(result.ok);
    assert!(result.first_error.is_none());
}

proptest! {
    /// Whatever else is wrong, a malformed email is always the reported error.
    #[test]
    fn malformed_email_always_wins(password in ".{0,10}", confirm in ".{0,10}") {
        let result = account_rules().evaluate(&form(&[
            ("email", "not-an-email"),
            ("password", password.as_str()),
            ("confirmPassword", confirm.as_str()),
        ]));
        prop_assert!(!result.ok);
        prop_assert_eq!(result.first_error.unwrap().message, "Email inválido");
    }

    /// Evaluation is pure: running twice gives the same answer.
    #[test]
    fn evaluation_is_deterministic(email in "[a-z@.]{0,12}", password in "[a-z0-9]{0,8}") {
        let data = form(&[
            ("email", email.as_str()),
            ("password", password.as_str()),
            ("confirmPassword", password.as_str()),
        ]);
        let rules = account_rules();
        prop_assert_eq!(rules.evaluate(&data), rules.evaluate(&data));
    }
}
