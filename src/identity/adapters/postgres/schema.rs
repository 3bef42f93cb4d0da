//! Diesel schema for user profiles.

diesel::table! {
    /// User profiles mirrored from the identity collaborator.
    users (id) {
        /// Opaque user identifier.
        #[max_length = 64]
        id -> Varchar,
        /// Given name.
        first_name -> Text,
        /// Family name.
        last_name -> Text,
        /// Contact email.
        email -> Text,
        /// Optional contact phone.
        #[max_length = 32]
        phone -> Nullable<Varchar>,
        /// Role name.
        #[max_length = 16]
        role -> Varchar,
    }
}
