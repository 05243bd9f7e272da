//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `backend/migrations` exactly. `diesel print-schema`
//! regenerates them from a migrated database.

diesel::table! {
    /// Registered accounts. The table name is quoted in SQL because `user`
    /// is reserved in PostgreSQL.
    user (id) {
        id -> Int4,
        #[max_length = 100]
        username -> Varchar,
        #[max_length = 100]
        email -> Varchar,
        /// Stored verbatim.
        #[max_length = 100]
        password -> Varchar,
        points -> Int4,
    }
}

diesel::table! {
    /// Achievements held by a user.
    badge (id) {
        id -> Int4,
        #[max_length = 100]
        name -> Varchar,
        user_id -> Int4,
    }
}

diesel::table! {
    /// Submitted bug reports.
    bug_report (id) {
        id -> Int4,
        #[max_length = 255]
        title -> Varchar,
        description -> Text,
        #[max_length = 50]
        status -> Varchar,
        #[max_length = 50]
        severity -> Varchar,
        created_at -> Timestamptz,
        user_id -> Int4,
        /// Sanitised file name inside the upload directory.
        #[max_length = 255]
        screenshot -> Nullable<Varchar>,
        /// Sanitised file name inside the upload directory.
        #[max_length = 255]
        screen_recording -> Nullable<Varchar>,
    }
}

diesel::joinable!(badge -> user (user_id));
diesel::joinable!(bug_report -> user (user_id));

diesel::allow_tables_to_appear_in_same_query!(badge, bug_report, user);
