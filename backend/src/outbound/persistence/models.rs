//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and never
//! leave it. Audit timestamps are written by the database and not selected.

use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{NewUser, User, UserChanges, UserId, UserValidationError};

use super::schema::users;

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub cpf: String,
    pub password: String,
}

impl TryFrom<UserRow> for User {
    type Error = UserValidationError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let UserRow {
            id,
            name,
            email,
            cpf,
            password,
        } = row;
        Self::try_from_strings(&id.to_string(), name, email, cpf, password)
    }
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub cpf: &'a str,
    pub password: &'a str,
}

impl<'a> NewUserRow<'a> {
    pub(crate) fn from_domain(id: &UserId, user: &'a NewUser) -> Self {
        Self {
            id: *id.as_uuid(),
            name: user.name.as_ref(),
            email: user.email.as_ref(),
            cpf: user.cpf.as_ref(),
            password: user.password.as_ref(),
        }
    }
}

/// Changeset for partial updates; `None` columns are left untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserChangeset<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub cpf: Option<&'a str>,
    pub password: Option<&'a str>,
}

impl<'a> From<&'a UserChanges> for UserChangeset<'a> {
    fn from(changes: &'a UserChanges) -> Self {
        Self {
            name: changes.name.as_ref().map(AsRef::as_ref),
            email: changes.email.as_ref().map(AsRef::as_ref),
            cpf: changes.cpf.as_ref().map(AsRef::as_ref),
            password: changes.password.as_ref().map(AsRef::as_ref),
        }
    }
}
