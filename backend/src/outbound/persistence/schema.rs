//! Table definitions mirroring `migrations/`.
//!
//! Regenerate with `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        /// Lower-cased sign-in email, unique.
        email -> Text,
        /// Argon2 PHC string.
        password_hash -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Collaborative projects.
    ///
    /// `users` is an ordered member array whose first element is the owner.
    /// Member ids are not foreign keys; deleted accounts may linger.
    projects (id) {
        id -> Uuid,
        /// Trimmed project name, unique.
        name -> Text,
        /// Ordered member ids, owner first.
        users -> Array<Uuid>,
        /// Opaque file tree document.
        file_tree -> Jsonb,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, projects);
