//! Request body validation for the users endpoints.
//!
//! Rules live in a static `{field, predicate, message}` table evaluated by
//! [`ValidationMode`]. Every violated rule is reported, in table order.
//!
//! Text rules coerce JSON values first: strings are used as-is, booleans use
//! their JSON text, numbers print with integral floats losing their `.0`,
//! `null` is the empty string, and arrays or objects fail every text rule.

use std::borrow::Cow;

use serde_json::{Map, Number, Value};

use crate::domain::{
    Cpf, EmailAddress, Error, FieldError, NewUser, Password, UserChanges, UserName,
    UserValidationError, has_cpf_length, is_valid_email, meets_password_length,
};

/// Whether fields are required or optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Every field must be present and valid.
    Create,
    /// Absent fields are skipped; present fields, `null` included, are checked.
    Update,
}

/// Newtype wrapper for request body field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) const fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const NAME: FieldName = FieldName::new("name");
pub(crate) const EMAIL: FieldName = FieldName::new("email");
pub(crate) const CPF: FieldName = FieldName::new("cpf");
pub(crate) const PASSWORD: FieldName = FieldName::new("password");

/// `None` means the field is absent from the body.
type Predicate = fn(Option<&Value>) -> bool;

struct FieldRule {
    field: FieldName,
    predicate: Predicate,
    message: &'static str,
}

const USER_RULES: [FieldRule; 4] = [
    FieldRule {
        field: NAME,
        predicate: is_json_string,
        message: "Name must be a string",
    },
    FieldRule {
        field: EMAIL,
        predicate: email_is_valid,
        message: "Email must be valid",
    },
    FieldRule {
        field: CPF,
        predicate: cpf_has_length,
        message: "CPF must have 11 characters",
    },
    FieldRule {
        field: PASSWORD,
        predicate: password_is_long_enough,
        message: "Password must be at least 6 characters long",
    },
];

/// Integral floats below 1e21 print without a fractional part, so
/// `12345678901.0` reads as `12345678901`.
fn number_text(number: &Number) -> String {
    const EXPONENT_THRESHOLD: f64 = 1e21;
    match number.as_f64() {
        Some(value)
            if number.is_f64() && value.fract() == 0.0 && value.abs() < EXPONENT_THRESHOLD =>
        {
            // Negative zero prints as "0".
            format!("{:.0}", value + 0.0)
        }
        _ => number.to_string(),
    }
}

fn coerce_text(value: Option<&Value>) -> Option<Cow<'_, str>> {
    match value {
        None | Some(Value::Null) => Some(Cow::Borrowed("")),
        Some(Value::String(text)) => Some(Cow::Borrowed(text.as_str())),
        Some(Value::Number(number)) => Some(Cow::Owned(number_text(number))),
        Some(Value::Bool(flag)) => Some(Cow::Owned(flag.to_string())),
        Some(Value::Array(_) | Value::Object(_)) => None,
    }
}

fn text_rule(value: Option<&Value>, check: fn(&str) -> bool) -> bool {
    coerce_text(value).is_some_and(|text| check(&text))
}

fn is_json_string(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::String(_)))
}

fn email_is_valid(value: Option<&Value>) -> bool {
    text_rule(value, is_valid_email)
}

fn cpf_has_length(value: Option<&Value>) -> bool {
    text_rule(value, has_cpf_length)
}

fn password_is_long_enough(value: Option<&Value>) -> bool {
    text_rule(value, meets_password_length)
}

/// Evaluate the user rule table against `body`.
///
/// Returns an empty list when the body is acceptable.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use users_api::inbound::http::validation::{ValidationMode, validate_user_fields};
///
/// let body = json!({"cpf": "123"});
/// let body = body.as_object().expect("object");
/// let errors = validate_user_fields(body, ValidationMode::Update);
/// assert_eq!(errors.len(), 1);
/// assert_eq!(errors[0].field, "cpf");
/// ```
pub fn validate_user_fields(body: &Map<String, Value>, mode: ValidationMode) -> Vec<FieldError> {
    USER_RULES
        .iter()
        .filter_map(|rule| {
            let value = body.get(rule.field.as_str());
            if mode == ValidationMode::Update && value.is_none() {
                return None;
            }
            (!(rule.predicate)(value)).then(|| FieldError::new(rule.field.as_str(), rule.message))
        })
        .collect()
}

fn text_field(body: &Map<String, Value>, field: FieldName) -> Option<String> {
    body.get(field.as_str())
        .and_then(|value| coerce_text(Some(value)))
        .map(Cow::into_owned)
}

fn field_error(field: FieldName) -> impl Fn(UserValidationError) -> Error {
    move |err| Error::validation(vec![FieldError::new(field.as_str(), err.to_string())])
}

/// Validate a create body and convert it into domain input.
///
/// # Errors
/// Returns a validation [`Error`] listing every violated rule.
pub fn parse_new_user(body: &Map<String, Value>) -> Result<NewUser, Error> {
    let errors = validate_user_fields(body, ValidationMode::Create);
    if !errors.is_empty() {
        return Err(Error::validation(errors));
    }

    Ok(NewUser {
        name: UserName::new(text_field(body, NAME).unwrap_or_default()),
        email: EmailAddress::new(text_field(body, EMAIL).unwrap_or_default())
            .map_err(field_error(EMAIL))?,
        cpf: Cpf::new(text_field(body, CPF).unwrap_or_default()).map_err(field_error(CPF))?,
        password: Password::new(text_field(body, PASSWORD).unwrap_or_default())
            .map_err(field_error(PASSWORD))?,
    })
}

/// Validate an update body and convert it into a change set.
///
/// Unknown fields are ignored; absent fields stay `None`.
///
/// # Errors
/// Returns a validation [`Error`] listing every violated rule.
pub fn parse_user_changes(body: &Map<String, Value>) -> Result<UserChanges, Error> {
    let errors = validate_user_fields(body, ValidationMode::Update);
    if !errors.is_empty() {
        return Err(Error::validation(errors));
    }

    Ok(UserChanges {
        name: text_field(body, NAME).map(UserName::new),
        email: text_field(body, EMAIL)
            .map(EmailAddress::new)
            .transpose()
            .map_err(field_error(EMAIL))?,
        cpf: text_field(body, CPF)
            .map(Cpf::new)
            .transpose()
            .map_err(field_error(CPF))?,
        password: text_field(body, PASSWORD)
            .map(Password::new)
            .transpose()
            .map_err(field_error(PASSWORD))?,
    })
}
