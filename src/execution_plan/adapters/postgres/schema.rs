//! Diesel schema for execution plans, assignments, and reports.

diesel::table! {
    /// Execution plan records. A partial unique index keeps at most one
    /// `active` plan per project.
    execution_plans (id) {
        /// Store-assigned plan identifier.
        id -> Int8,
        /// Owning project.
        project_id -> Int8,
        /// Creator identifier.
        created_by -> Int8,
        /// Creator kind (`user` or `agent`).
        #[max_length = 10]
        creator_type -> Varchar,
        /// Plan body.
        plan_data -> Jsonb,
        /// Plan status.
        #[max_length = 20]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tasks handed to agents under a plan.
    agent_assignments (id) {
        /// Store-assigned assignment identifier.
        id -> Int8,
        /// Owning plan.
        plan_id -> Int8,
        /// Assigned agent.
        agent_id -> Int8,
        /// Assigned task.
        task_id -> Int8,
        /// Assignment status.
        #[max_length = 20]
        status -> Varchar,
        /// Pick-up timestamp.
        started_at -> Nullable<Timestamptz>,
        /// End timestamp.
        completed_at -> Nullable<Timestamptz>,
        /// Completion report.
        report_data -> Nullable<Jsonb>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Immutable execution reports.
    execution_reports (id) {
        /// Store-assigned report identifier.
        id -> Int8,
        /// Owning project.
        project_id -> Int8,
        /// Report kind.
        #[max_length = 20]
        report_type -> Varchar,
        /// Generator identifier.
        generated_by -> Int8,
        /// Generator kind (`user` or `agent`).
        #[max_length = 10]
        generator_type -> Varchar,
        /// Report body.
        report_data -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(agent_assignments -> execution_plans (plan_id));
diesel::allow_tables_to_appear_in_same_query!(execution_plans, agent_assignments);
