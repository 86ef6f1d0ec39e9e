use std::sync::RwLock;

use chrono::Utc;
use uuid::Uuid;

use crate::data_backend::MealStore;
use crate::data_types::meal_data_types::{Meal, MealId, MealInput, MealPatch};
use crate::errors::StoreError;

/// Process-local table, used for dry runs and tests. Rows live as long as
/// the store does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<Meal>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_meals(meals: Vec<Meal>) -> Self {
        MemoryStore {
            rows: RwLock::new(meals),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Meal>> {
        // a panic while holding the lock leaves the rows intact
        self.rows.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Meal>> {
        self.rows.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl MealStore for MemoryStore {
    async fn fetch_all(&self) -> Result<Vec<Meal>, StoreError> {
        Ok(self.read().clone())
    }

    async fn create(&self, meal: MealInput) -> Result<Meal, StoreError> {
        let row = Meal {
            id: MealId::from(Uuid::new_v4().to_string()),
            name: meal.name,
            meal_type: meal.meal_type,
            ingredients: meal.ingredients,
            selected: meal.selected,
            selected_options: meal.selected_options,
            created_at: Some(Utc::now()),
        };
        self.write().push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: &MealId, patch: MealPatch) -> Result<Meal, StoreError> {
        let mut rows = self.write();
        let row = rows
            .iter_mut()
            .find(|row| &row.id == id)
            .ok_or_else(|| StoreError::MissingRecord(id.clone()))?;
        patch.apply_to(row);
        Ok(row.clone())
    }

    async fn delete(&self, id: &MealId) -> Result<(), StoreError> {
        self.write().retain(|row| &row.id != id);
        Ok(())
    }
}
