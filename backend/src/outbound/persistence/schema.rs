//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered citizens and managers.
    ///
    /// `(first_name, last_name)` carries a unique index.
    users (id) {
        id -> Uuid,
        first_name -> Varchar,
        last_name -> Varchar,
        /// `citizen` or `manager`.
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Reported issues.
    ///
    /// `user_id` is a plain column without a foreign key.
    issues (id) {
        id -> Uuid,
        /// Lifecycle state stored as its wire name.
        status -> Varchar,
        description -> Nullable<Varchar>,
        image_url -> Nullable<Varchar>,
        latitude -> Float8,
        longitude -> Float8,
        tags -> Array<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        user_id -> Nullable<Uuid>,
    }
}
