use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned record id. PostgREST tables hand out either integer
/// identities or uuids, both are carried as an opaque string.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(from = "RawMealId", into = "String")]
pub struct MealId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMealId {
    Int(i64),
    Text(String),
}

impl From<RawMealId> for MealId {
    fn from(raw: RawMealId) -> Self {
        match raw {
            RawMealId::Int(id) => MealId(id.to_string()),
            RawMealId::Text(id) => MealId(id),
        }
    }
}

impl From<MealId> for String {
    fn from(id: MealId) -> Self {
        id.0
    }
}

impl From<&str> for MealId {
    fn from(id: &str) -> Self {
        MealId(id.to_string())
    }
}

impl From<String> for MealId {
    fn from(id: String) -> Self {
        MealId(id)
    }
}

impl MealId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub variants: Vec<String>,
}

impl Ingredient {
    /// The option string a chosen variant contributes, e.g. "whole milk".
    pub fn variant_option(&self, variant: &str) -> String {
        format!("{} {}", variant, self.name)
    }

    pub fn has_variant(&self, variant: &str) -> bool {
        self.variants.iter().any(|v| v == variant)
    }
}

/// Ordered set of option strings. Inserting an existing entry is a no-op,
/// so repeats coming from the store collapse on load.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SelectedOptions(Vec<String>);

impl From<Vec<String>> for SelectedOptions {
    fn from(options: Vec<String>) -> Self {
        options.into_iter().collect()
    }
}

impl From<SelectedOptions> for Vec<String> {
    fn from(options: SelectedOptions) -> Self {
        options.0
    }
}

impl FromIterator<String> for SelectedOptions {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        let mut options = SelectedOptions::default();
        for option in iter {
            options.insert(option);
        }
        options
    }
}

impl SelectedOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the option was already present.
    pub fn insert(&mut self, option: String) -> bool {
        if self.contains(&option) {
            return false;
        }
        self.0.push(option);
        true
    }

    pub fn remove(&mut self, option: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|o| o != option);
        before != self.0.len()
    }

    pub fn contains(&self, option: &str) -> bool {
        self.0.iter().any(|o| o == option)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// A row of the `meals` table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Meal {
    pub id: MealId,
    pub name: String,
    #[serde(rename = "type")]
    pub meal_type: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub selected_options: SelectedOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload, the store assigns `id` and `created_at`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MealInput {
    pub name: String,
    #[serde(rename = "type")]
    pub meal_type: String,
    pub ingredients: Vec<Ingredient>,
    pub selected: bool,
    pub selected_options: SelectedOptions,
}

impl MealInput {
    /// New meals and edited meals both start unselected with no options.
    pub fn new(name: String, meal_type: String, ingredients: Vec<Ingredient>) -> Self {
        MealInput {
            name,
            meal_type,
            ingredients,
            selected: false,
            selected_options: SelectedOptions::new(),
        }
    }
}

/// Partial update, only the fields that are `Some` get written.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct MealPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<Ingredient>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_options: Option<SelectedOptions>,
}

impl From<MealInput> for MealPatch {
    fn from(input: MealInput) -> Self {
        MealPatch {
            name: Some(input.name),
            meal_type: Some(input.meal_type),
            ingredients: Some(input.ingredients),
            selected: Some(input.selected),
            selected_options: Some(input.selected_options),
        }
    }
}

impl MealPatch {
    pub fn selection(selected: bool, selected_options: SelectedOptions) -> Self {
        MealPatch {
            selected: Some(selected),
            selected_options: Some(selected_options),
            ..Default::default()
        }
    }

    /// Applies the patch in place, used by stores that hold rows in memory.
    pub fn apply_to(self, meal: &mut Meal) {
        if let Some(name) = self.name {
            meal.name = name;
        }
        if let Some(meal_type) = self.meal_type {
            meal.meal_type = meal_type;
        }
        if let Some(ingredients) = self.ingredients {
            meal.ingredients = ingredients;
        }
        if let Some(selected) = self.selected {
            meal.selected = selected;
        }
        if let Some(selected_options) = self.selected_options {
            meal.selected_options = selected_options;
        }
    }
}
