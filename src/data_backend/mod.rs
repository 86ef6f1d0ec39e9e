use std::future::Future;

use crate::data_types::meal_data_types::{Meal, MealId, MealInput, MealPatch, SelectedOptions};
use crate::errors::StoreError;

pub mod memory_store;
pub mod supabase_store;

/// CRUD access to the `meals` table. Every call is one request/response
/// round trip, there is no batching and no retry.
pub trait MealStore: Send + Sync {
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<Meal>, StoreError>> + Send;

    /// The store assigns `id` and `created_at`.
    fn create(&self, meal: MealInput) -> impl Future<Output = Result<Meal, StoreError>> + Send;

    /// Fails with [`StoreError::MissingRecord`] when no row has this id.
    fn update(
        &self,
        id: &MealId,
        patch: MealPatch,
    ) -> impl Future<Output = Result<Meal, StoreError>> + Send;

    fn delete(&self, id: &MealId) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Writes exactly `selected` and `selected_options`.
    fn update_selection(
        &self,
        id: &MealId,
        selected: bool,
        selected_options: SelectedOptions,
    ) -> impl Future<Output = Result<Meal, StoreError>> + Send {
        self.update(id, MealPatch::selection(selected, selected_options))
    }
}
