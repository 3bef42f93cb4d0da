//! Diesel schema for product persistence.

diesel::table! {
    /// Product documents with the columns used for search and ordering.
    products (id) {
        /// Product identifier.
        id -> Uuid,
        /// Product name.
        name -> Text,
        /// Product description.
        description -> Text,
        /// Product category.
        category -> Nullable<Text>,
        /// Price in minor units.
        price_cents -> Int8,
        /// Storefront visibility.
        is_active -> Bool,
        /// Full product document including images.
        document -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Inventory items products may reference.
    inventory_items (id) {
        /// Inventory reference.
        id -> Text,
        /// Model name.
        model_name -> Text,
        /// Brand name.
        brand_name -> Text,
        /// Units in stock.
        quantity -> Int4,
    }
}
