//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Stored user documents.
    ///
    /// `cpf` and `password` carry CHECK constraints mirroring the domain
    /// field rules. `updated_at` is maintained by a trigger.
    users (id) {
        /// Primary key: UUID v4 assigned on insert.
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        /// Exactly 11 characters.
        cpf -> Varchar,
        /// At least 6 characters, stored as supplied.
        password -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
