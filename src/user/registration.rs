use crate::domain::{Registration, UserPatch};

const MIN_PASSWORD_LENGTH: usize = 8;

fn starts_with_digit(value: &str) -> bool {
    value.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// Checks a registration form, collecting every violated rule.
///
/// - name, surname and email must not start with a digit
/// - the password needs 8+ characters, an ASCII uppercase letter and a digit
pub fn validate_registration(form: &Registration) -> Result<(), Vec<String>> {
    let mut problems = Vec::new();

    for (field, value) in [
        ("name", &form.name),
        ("surname", &form.surname),
        ("email", &form.email),
    ] {
        if starts_with_digit(value) {
            problems.push(format!("{} should not start with a digit", field));
        }
    }

    let password = &form.password;
    let long_enough = password.chars().count() >= MIN_PASSWORD_LENGTH;
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(long_enough && has_upper && has_digit) {
        problems.push(
            "password must be at least 8 characters long and contain an uppercase letter and a digit"
                .to_string(),
        );
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}

/// An admin edit may leave fields out, but may not blank one.
pub fn validate_user_patch(patch: &UserPatch) -> Result<(), Vec<String>> {
    let problems: Vec<String> = [
        ("name", &patch.name),
        ("surname", &patch.surname),
        ("email", &patch.email),
    ]
    .into_iter()
    .filter(|(_, value)| value.as_deref().is_some_and(|v| v.trim().is_empty()))
    .map(|(field, _)| format!("{} must not be empty", field))
    .collect();

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}
