//! User-defined drink types
//!
//! Thin service over [`CustomTypeStore`] that normalizes input before it
//! reaches the store.

use crate::error::StoreError;
use crate::store::{CustomTypeStore, CustomTypeUpdate, NewCustomType};
use crate::types::UserId;
use sip_taste::{CustomDrinkType, DEFAULT_CUSTOM_COLOR, DEFAULT_CUSTOM_ICON};
use std::sync::Arc;
use tracing::debug;

/// Custom drink type operations for any owner
#[derive(Debug)]
pub struct CustomTypeService<S: CustomTypeStore + ?Sized> {
    store: Arc<S>,
}

impl<S: CustomTypeStore + ?Sized> Clone for CustomTypeService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: CustomTypeStore + ?Sized> CustomTypeService<S> {
    /// Create service over a store
    #[inline]
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Types owned by `owner`, oldest first
    ///
    /// # Errors
    /// Any [`StoreError`] from the fetch.
    pub async fn list(&self, owner: &UserId) -> Result<Vec<CustomDrinkType>, StoreError> {
        self.store.fetch_custom_types(owner).await
    }

    /// Create a type; missing icon and color take the defaults.
    ///
    /// # Errors
    /// [`StoreError::Rejected`] for a blank name, otherwise any store failure.
    pub async fn add(
        &self,
        owner: &UserId,
        name: &str,
        icon: Option<&str>,
        color: Option<&str>,
    ) -> Result<CustomDrinkType, StoreError> {
        let draft = NewCustomType {
            name: normalize_name(name)?,
            icon: icon.unwrap_or(DEFAULT_CUSTOM_ICON).to_string(),
            color: color.unwrap_or(DEFAULT_CUSTOM_COLOR).to_string(),
        };
        debug!(owner = %owner, name = %draft.name, "adding custom drink type");
        self.store.insert_custom_type(owner, draft).await
    }

    /// Apply a partial update owned by `owner`.
    ///
    /// # Errors
    /// [`StoreError::Rejected`] for a blank new name, otherwise any store failure.
    pub async fn update(
        &self,
        id: &str,
        owner: &UserId,
        mut update: CustomTypeUpdate,
    ) -> Result<CustomDrinkType, StoreError> {
        if let Some(name) = update.name.take() {
            update.name = Some(normalize_name(&name)?);
        }
        self.store.update_custom_type(id, owner, &update).await
    }

    /// Delete a type owned by `owner`
    ///
    /// # Errors
    /// Any [`StoreError`] from the delete.
    pub async fn delete(&self, id: &str, owner: &UserId) -> Result<(), StoreError> {
        self.store.delete_custom_type(id, owner).await
    }
}

fn normalize_name(name: &str) -> Result<String, StoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Rejected(
            "custom drink type name must not be blank".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
