//! Diesel schema for issue persistence.

diesel::table! {
    /// Issue documents with the columns used for filtering and ordering.
    issues (id) {
        /// Issue identifier.
        id -> Uuid,
        /// Reporter identifier, absent for anonymous reports.
        #[max_length = 64]
        reporter_id -> Nullable<Varchar>,
        /// Assigned technician identifier.
        #[max_length = 64]
        technician_id -> Nullable<Varchar>,
        /// Lifecycle status.
        #[max_length = 16]
        status -> Varchar,
        /// Full issue document including images and messages.
        document -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
