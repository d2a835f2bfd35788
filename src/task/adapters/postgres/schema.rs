//! Diesel schema for task persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Store-assigned task identifier.
        id -> Int8,
        /// Owning project.
        project_id -> Int8,
        /// Task title.
        #[max_length = 200]
        title -> Varchar,
        /// Task description.
        description -> Text,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Priority.
        #[max_length = 20]
        priority -> Varchar,
        /// Assigned agent, if any.
        assigned_agent_id -> Nullable<Int8>,
        /// Reviewing user, if any.
        reviewer_id -> Nullable<Int8>,
        /// Creator identifier.
        created_by -> Int8,
        /// Creator kind (`user` or `agent`).
        #[max_length = 10]
        creator_type -> Varchar,
        /// Tag set.
        tags -> Array<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only task activity log.
    task_activities (id) {
        /// Store-assigned activity identifier.
        id -> Int8,
        /// Task the activity belongs to.
        task_id -> Int8,
        /// Actor identifier.
        actor_id -> Int8,
        /// Actor kind (`user` or `agent`).
        #[max_length = 10]
        actor_type -> Varchar,
        /// Kind of change.
        #[max_length = 30]
        action -> Varchar,
        /// Value before the change.
        old_value -> Nullable<Text>,
        /// Value after the change.
        new_value -> Nullable<Text>,
        /// Human-readable message.
        message -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(task_activities -> tasks (task_id));
diesel::allow_tables_to_appear_in_same_query!(tasks, task_activities);
