pub mod meal_data_types;
pub mod selection_data_types;

use serde::Serialize;

use crate::meal_filter::MealFilter;
use crate::selection_engine::OptionsSheet;
use crate::shopping_list::ShoppingList;
use meal_data_types::{Ingredient, Meal, MealId};
use selection_data_types::CheckboxState;

/// A meal definition as confirmed by the user, before it hits the store.
#[derive(Debug, Clone, PartialEq)]
pub struct MealDraft {
    pub name: String,
    pub meal_type: String,
    pub ingredients: Vec<Ingredient>,
}

/// Every user action the planner reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Refresh,
    ListMeals(MealFilter),
    CreateMeal(MealDraft),
    EditMeal {
        id: MealId,
        draft: MealDraft,
    },
    DeleteMeal(MealId),
    SelectMeal(MealId),
    DeselectMeal(MealId),
    ToggleMealSelection(MealId),
    OpenOptions(MealId),
    SaveSelections {
        id: MealId,
        checkboxes: CheckboxState,
    },
    ToggleOptionalIngredient {
        id: MealId,
        ingredient_index: usize,
    },
    ToggleVariantOption {
        id: MealId,
        ingredient_index: usize,
        variant: String,
    },
    GenerateShoppingList,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "view", content = "data", rename_all = "snake_case")]
pub enum ActionOutcome {
    Meals(Vec<Meal>),
    Saved(Meal),
    Options(OptionsSheet),
    Deleted(MealId),
    ShoppingList(ShoppingList),
}
