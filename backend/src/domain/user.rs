//! User entity and the field-level rules every stored user satisfies.
//!
//! Each attribute is a newtype whose constructor enforces its rule, so a
//! [`User`] value cannot exist in an invalid state. The text predicates are
//! exported so the inbound validation table applies exactly the same checks
//! to raw request bodies.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

mod email;

pub use email::is_valid_email;

/// Exact number of characters in a CPF.
pub const CPF_LENGTH: usize = 11;
/// Minimum number of characters in a password.
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Validation errors returned by the user field constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Identifier is not a syntactically valid UUID.
    InvalidId,
    /// Email address does not match the accepted syntax.
    InvalidEmail,
    /// CPF does not have exactly `expected` characters.
    InvalidCpfLength {
        /// Required character count.
        expected: usize,
    },
    /// Password is shorter than `min` characters.
    PasswordTooShort {
        /// Minimum character count.
        min: usize,
    },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "Invalid ID format"),
            Self::InvalidEmail => write!(f, "Email must be valid"),
            Self::InvalidCpfLength { expected } => {
                write!(f, "CPF must have {expected} characters")
            }
            Self::PasswordTooShort { min } => {
                write!(f, "Password must be at least {min} characters long")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Whether `value` has exactly [`CPF_LENGTH`] characters.
pub fn has_cpf_length(value: &str) -> bool {
    value.chars().count() == CPF_LENGTH
}

/// Whether `value` has at least [`PASSWORD_MIN_LENGTH`] characters.
pub fn meets_password_length(value: &str) -> bool {
    value.chars().count() >= PASSWORD_MIN_LENGTH
}

/// Opaque user identifier assigned by the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse an identifier from its textual form.
    ///
    /// Surrounding whitespace is rejected rather than trimmed.
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an identifier loaded from storage.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// User's name. Any string is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    /// Wrap a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Email address satisfying [`is_valid_email`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and wrap an email address.
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        if !is_valid_email(&email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Brazilian taxpayer number. Only the length is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cpf(String);

impl Cpf {
    /// Validate and wrap a CPF.
    pub fn new(cpf: impl Into<String>) -> Result<Self, UserValidationError> {
        let cpf = cpf.into();
        if !has_cpf_length(&cpf) {
            return Err(UserValidationError::InvalidCpfLength {
                expected: CPF_LENGTH,
            });
        }
        Ok(Self(cpf))
    }
}

impl AsRef<str> for Cpf {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Password as supplied by the client.
///
/// Stored and returned verbatim; the buffer is zeroed on drop and the value
/// is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate and wrap a password.
    pub fn new(password: impl Into<String>) -> Result<Self, UserValidationError> {
        let password = Zeroizing::new(password.into());
        if !meets_password_length(&password) {
            return Err(UserValidationError::PasswordTooShort {
                min: PASSWORD_MIN_LENGTH,
            });
        }
        Ok(Self(password))
    }
}

impl AsRef<str> for Password {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Validated input for creating a user; the identifier is assigned on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Display name.
    pub name: UserName,
    /// Contact address.
    pub email: EmailAddress,
    /// Eleven-character CPF.
    pub cpf: Cpf,
    /// Password, stored as provided.
    pub password: Password,
}

/// Partial replacement of user fields. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    /// Replacement name.
    pub name: Option<UserName>,
    /// Replacement email address.
    pub email: Option<EmailAddress>,
    /// Replacement CPF.
    pub cpf: Option<Cpf>,
    /// Replacement password.
    pub password: Option<Password>,
}

impl UserChanges {
    /// Whether no field would change.
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.cpf.is_none() && self.password.is_none()
    }
}

/// Stored user document.
///
/// ## Invariants
/// - `id` never changes after creation.
/// - `email`, `cpf` and `password` satisfy their field rules.
///
/// # Examples
/// ```
/// use users_api::domain::User;
///
/// let user = User::try_from_strings(
///     "3fa85f64-5717-4562-b3fc-2c963f66afa6",
///     "Ana",
///     "ana@x.com",
///     "12345678901",
///     "secret1",
/// )
/// .expect("valid user");
/// assert_eq!(user.email().as_ref(), "ana@x.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct User {
    id: UserId,
    name: UserName,
    email: EmailAddress,
    cpf: Cpf,
    password: Password,
}

impl User {
    /// Attach an identifier to validated creation input.
    pub fn new(id: UserId, fields: NewUser) -> Self {
        let NewUser {
            name,
            email,
            cpf,
            password,
        } = fields;
        Self {
            id,
            name,
            email,
            cpf,
            password,
        }
    }

    /// Fallible constructor from raw strings, enforcing every field rule.
    pub fn try_from_strings(
        id: &str,
        name: impl Into<String>,
        email: impl Into<String>,
        cpf: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        let id = UserId::parse(id)?;
        let fields = NewUser {
            name: UserName::new(name),
            email: EmailAddress::new(email)?,
            cpf: Cpf::new(cpf)?,
            password: Password::new(password)?,
        };
        Ok(Self::new(id, fields))
    }

    /// Return a copy with `changes` applied; the identifier is preserved.
    #[must_use]
    pub fn with_changes(self, changes: UserChanges) -> Self {
        let UserChanges {
            name,
            email,
            cpf,
            password,
        } = changes;
        Self {
            id: self.id,
            name: name.unwrap_or(self.name),
            email: email.unwrap_or(self.email),
            cpf: cpf.unwrap_or(self.cpf),
            password: password.unwrap_or(self.password),
        }
    }

    /// Stable identifier.
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// User's name.
    pub const fn name(&self) -> &UserName {
        &self.name
    }

    /// Email address.
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// CPF.
    pub const fn cpf(&self) -> &Cpf {
        &self.cpf
    }

    /// Password as stored.
    pub const fn password(&self) -> &Password {
        &self.password
    }
}

#[derive(Serialize, Deserialize)]
struct UserDto {
    id: String,
    name: String,
    email: String,
    cpf: String,
    password: String,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name.0,
            email: value.email.0,
            cpf: value.cpf.0,
            password: value.password.as_ref().to_owned(),
        }
    }
}

impl TryFrom<UserDto> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        Self::try_from_strings(&value.id, value.name, value.email, value.cpf, value.password)
    }
}
