//! Diesel schema for user persistence.

diesel::table! {
    /// User profile records.
    users (id) {
        /// Store-assigned user identifier.
        id -> Int8,
        /// Unique username.
        #[max_length = 50]
        username -> Varchar,
        /// Unique email address.
        #[max_length = 255]
        email -> Varchar,
        /// Avatar URL, empty when unset.
        #[max_length = 255]
        avatar_url -> Varchar,
        /// Account role.
        #[max_length = 20]
        role -> Varchar,
        /// Whether the account is enabled.
        is_active -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
