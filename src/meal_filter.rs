use crate::constants::ALL_TYPES;
use crate::data_types::meal_data_types::Meal;

/// Type dropdown plus name search box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealFilter {
    pub meal_type: String,
    pub search_name: String,
}

impl Default for MealFilter {
    fn default() -> Self {
        MealFilter {
            meal_type: ALL_TYPES.to_string(),
            search_name: String::new(),
        }
    }
}

impl MealFilter {
    pub fn new(meal_type: Option<String>, search_name: Option<String>) -> Self {
        MealFilter {
            meal_type: meal_type.unwrap_or_else(|| ALL_TYPES.to_string()),
            search_name: search_name.unwrap_or_default().trim().to_string(),
        }
    }

    pub fn matches(&self, meal: &Meal) -> bool {
        let type_ok = self.meal_type == ALL_TYPES || meal.meal_type == self.meal_type;
        type_ok
            && meal
                .name
                .to_lowercase()
                .contains(&self.search_name.to_lowercase())
    }
}

/// Keeps source order.
pub fn filter_meals<'a>(meals: &'a [Meal], filter: &MealFilter) -> Vec<&'a Meal> {
    meals.iter().filter(|meal| filter.matches(meal)).collect()
}
