//! Product aggregate root.

use super::{CatalogDomainError, Price, ProductId};
use crate::media::domain::StoredImage;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated input for a new product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    name: String,
    description: String,
    price: Price,
    category: Option<String>,
    inventory_item: Option<String>,
}

impl ProductDraft {
    /// Creates a draft with a required name and price.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::EmptyName`] when the name is blank.
    pub fn new(name: &str, price: Price) -> Result<Self, CatalogDomainError> {
        Ok(Self {
            name: validated_name(name)?,
            description: String::new(),
            price,
            category: None,
            inventory_item: None,
        })
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        description.trim().clone_into(&mut self.description);
        self
    }

    /// Sets the category; blank values clear it.
    #[must_use]
    pub fn with_category(mut self, category: &str) -> Self {
        self.category = non_blank(category);
        self
    }

    /// Links the product to an inventory item reference.
    #[must_use]
    pub fn with_inventory_item(mut self, reference: &str) -> Self {
        self.inventory_item = non_blank(reference);
        self
    }

    /// Returns the product name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Partial update of product fields. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    name: Option<String>,
    description: Option<String>,
    price: Option<Price>,
    category: Option<String>,
    inventory_item: Option<String>,
    active: Option<bool>,
}

impl ProductPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the price.
    #[must_use]
    pub const fn with_price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    /// Replaces the category; an empty string clears it.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Replaces the inventory reference; an empty string clears it.
    #[must_use]
    pub fn with_inventory_item(mut self, reference: impl Into<String>) -> Self {
        self.inventory_item = Some(reference.into());
        self
    }

    /// Sets visibility.
    #[must_use]
    pub const fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }
}

fn validated_name(raw: &str) -> Result<String, CatalogDomainError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(CatalogDomainError::EmptyName);
    }
    Ok(name.to_owned())
}

fn non_blank(raw: &str) -> Option<String> {
    let value = raw.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

/// Catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    id: ProductId,
    name: String,
    description: String,
    price: Price,
    category: Option<String>,
    inventory_item: Option<String>,
    images: Vec<StoredImage>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    /// Creates an active product from a draft.
    #[must_use]
    pub fn create(draft: ProductDraft, images: Vec<StoredImage>, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        let ProductDraft {
            name,
            description,
            price,
            category,
            inventory_item,
        } = draft;
        Self {
            id: ProductId::new(),
            name,
            description,
            price,
            category,
            inventory_item,
            images,
            is_active: true,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the product identifier.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.id
    }

    /// Returns the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, possibly empty.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the price.
    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    /// Returns the category.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Returns the linked inventory item reference.
    #[must_use]
    pub fn inventory_item(&self) -> Option<&str> {
        self.inventory_item.as_deref()
    }

    /// Returns the images in display order.
    #[must_use]
    pub fn images(&self) -> &[StoredImage] {
        &self.images
    }

    /// Returns whether the product is listed in the storefront.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether `needle` occurs in the name, description or
    /// category, ignoring case.
    #[must_use]
    pub fn matches_text(&self, needle: &str) -> bool {
        let lowered = needle.to_lowercase();
        [Some(self.name.as_str()), Some(self.description.as_str()), self.category()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&lowered))
    }

    /// Applies a patch; nothing changes when the new name is blank.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::EmptyName`] for a blank name.
    pub fn apply_patch(
        &mut self,
        patch: ProductPatch,
        clock: &impl Clock,
    ) -> Result<(), CatalogDomainError> {
        let new_name = patch.name.as_deref().map(validated_name).transpose()?;
        if let Some(value) = new_name {
            self.name = value;
        }
        if let Some(value) = patch.description {
            value.trim().clone_into(&mut self.description);
        }
        if let Some(value) = patch.price {
            self.price = value;
        }
        if let Some(value) = patch.category {
            self.category = non_blank(&value);
        }
        if let Some(value) = patch.inventory_item {
            self.inventory_item = non_blank(&value);
        }
        if let Some(value) = patch.active {
            self.is_active = value;
        }
        self.touch(clock);
        Ok(())
    }

    /// Appends images, or replaces them when `replace` is set.
    ///
    /// Returns the images that were removed from the product.
    pub fn attach_images(
        &mut self,
        images: Vec<StoredImage>,
        replace: bool,
        clock: &impl Clock,
    ) -> Vec<StoredImage> {
        let removed = if replace {
            std::mem::replace(&mut self.images, images)
        } else {
            self.images.extend(images);
            Vec::new()
        };
        self.touch(clock);
        removed
    }

    /// Flips visibility and returns the new value.
    pub fn toggle_active(&mut self, clock: &impl Clock) -> bool {
        self.is_active = !self.is_active;
        self.touch(clock);
        self.is_active
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
