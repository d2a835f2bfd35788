//! Diesel schema for project persistence.

diesel::table! {
    /// Project records.
    projects (id) {
        /// Store-assigned project identifier.
        id -> Int8,
        /// Project name.
        #[max_length = 100]
        name -> Varchar,
        /// Free-text description.
        description -> Text,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Creating user.
        created_by -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
