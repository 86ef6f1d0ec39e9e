use std::collections::HashSet;

use serde::Serialize;

use crate::data_types::meal_data_types::Meal;

/// Deduplicated union of the options of all selected meals. Items keep the
/// order of their first appearance, which is for display only.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct ShoppingList {
    items: Vec<String>,
}

impl ShoppingList {
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.iter().any(|i| i == item)
    }

    pub fn to_set(&self) -> HashSet<&str> {
        self.items.iter().map(String::as_str).collect()
    }
}

/// Unselected meals never contribute, even when their options were not
/// cleared.
pub fn derive_shopping_list<'a>(meals: impl IntoIterator<Item = &'a Meal>) -> ShoppingList {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut items = Vec::new();

    for meal in meals.into_iter().filter(|meal| meal.selected) {
        for option in meal.selected_options.iter() {
            if seen.insert(option.as_str()) {
                items.push(option.clone());
            }
        }
    }

    ShoppingList { items }
}
