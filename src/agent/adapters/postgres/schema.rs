//! Diesel schema for agent persistence.

diesel::table! {
    /// Registered AI agents.
    agents (id) {
        /// Store-assigned agent identifier.
        id -> Int8,
        /// Agent name.
        #[max_length = 100]
        name -> Varchar,
        /// Free-text description.
        description -> Text,
        /// Owning project.
        project_id -> Int8,
        /// Registering user.
        created_by -> Int8,
        /// Role within the project.
        #[max_length = 50]
        role -> Varchar,
        /// Seniority level.
        #[max_length = 20]
        level -> Varchar,
        /// Provider name.
        #[max_length = 50]
        provider -> Varchar,
        /// Model name.
        #[max_length = 100]
        model -> Varchar,
        /// Generation settings payload.
        config -> Jsonb,
        /// Runtime status.
        #[max_length = 20]
        status -> Varchar,
        /// Whether the agent may receive work.
        is_active -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
