use std::collections::BTreeSet;

use serde::Serialize;

use super::meal_data_types::MealId;

/// Which box of an ingredient row is meant.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(tag = "kind", content = "variant", rename_all = "snake_case")]
pub enum CheckboxTarget {
    /// the "include this optional ingredient" box
    Optional,
    Variant(String),
}

/// Structured checkbox key `(meal, ingredient index, target)`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionKey {
    pub meal_id: MealId,
    pub ingredient_index: usize,
    pub target: CheckboxTarget,
}

impl OptionKey {
    pub fn optional(meal_id: MealId, ingredient_index: usize) -> Self {
        OptionKey {
            meal_id,
            ingredient_index,
            target: CheckboxTarget::Optional,
        }
    }

    pub fn variant(meal_id: MealId, ingredient_index: usize, variant: impl Into<String>) -> Self {
        OptionKey {
            meal_id,
            ingredient_index,
            target: CheckboxTarget::Variant(variant.into()),
        }
    }
}

/// Live checkbox state of an options sheet. Unknown keys read as unchecked.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckboxState {
    checked: BTreeSet<OptionKey>,
}

impl CheckboxState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: OptionKey, checked: bool) {
        if checked {
            self.checked.insert(key);
        } else {
            self.checked.remove(&key);
        }
    }

    pub fn check(&mut self, key: OptionKey) {
        self.set(key, true);
    }

    pub fn uncheck(&mut self, key: &OptionKey) {
        self.checked.remove(key);
    }

    pub fn is_checked(&self, key: &OptionKey) -> bool {
        self.checked.contains(key)
    }

    pub fn checked(&self) -> impl Iterator<Item = &OptionKey> {
        self.checked.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.checked.is_empty()
    }
}

/// Per-ingredient annotation collected in the confirmation step before a
/// meal is first saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientAnnotation {
    pub optional: bool,
    /// raw comma separated variant text as typed by the user
    pub variants_text: String,
}
