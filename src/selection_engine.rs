use serde::Serialize;

use crate::data_types::meal_data_types::{Ingredient, Meal, SelectedOptions};
use crate::data_types::selection_data_types::{CheckboxState, CheckboxTarget, OptionKey};
use crate::errors::ValidationError;

/// What the options dialog shows for one meal: its definition plus the
/// current box state.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct OptionsSheet {
    pub meal: Meal,
    pub checkboxes: CheckboxState,
}

impl OptionsSheet {
    pub fn open(meal: Meal) -> Self {
        let checkboxes = seed_checkboxes(&meal);
        OptionsSheet { meal, checkboxes }
    }
}

/// Full save pass. Recomputes the option set of `meal` from live checkbox
/// state, ignoring whatever was persisted before.
///
/// Per ingredient, checked variants contribute `"{variant} {name}"` and
/// suppress the bare name. Without a checked variant the bare name is used
/// when the ingredient is mandatory or its optional box is checked.
pub fn resolve_selected_options(meal: &Meal, checkboxes: &CheckboxState) -> SelectedOptions {
    let mut options = SelectedOptions::new();

    for (index, ingredient) in meal.ingredients.iter().enumerate() {
        let mut variant_satisfied = false;

        for variant in &ingredient.variants {
            let key = OptionKey::variant(meal.id.clone(), index, variant.as_str());
            if checkboxes.is_checked(&key) {
                options.insert(ingredient.variant_option(variant));
                variant_satisfied = true;
            }
        }

        if variant_satisfied {
            continue;
        }

        if !ingredient.optional
            || checkboxes.is_checked(&OptionKey::optional(meal.id.clone(), index))
        {
            options.insert(ingredient.name.clone());
        }
    }

    options
}

/// Box state matching what is persisted: a variant box is ticked when its
/// composite string is stored, an optional box when the bare name is.
pub fn seed_checkboxes(meal: &Meal) -> CheckboxState {
    let mut checkboxes = CheckboxState::new();

    for (index, ingredient) in meal.ingredients.iter().enumerate() {
        if ingredient.optional && meal.selected_options.contains(&ingredient.name) {
            checkboxes.check(OptionKey::optional(meal.id.clone(), index));
        }
        for variant in &ingredient.variants {
            if meal
                .selected_options
                .contains(&ingredient.variant_option(variant))
            {
                checkboxes.check(OptionKey::variant(meal.id.clone(), index, variant.as_str()));
            }
        }
    }

    checkboxes
}

/// Flips membership of one literal option string.
pub fn toggle_option(options: &SelectedOptions, option: &str) -> SelectedOptions {
    let mut toggled = options.clone();
    if !toggled.remove(option) {
        toggled.insert(option.to_string());
    }
    toggled
}

pub fn ingredient_at(meal: &Meal, index: usize) -> Result<&Ingredient, ValidationError> {
    meal.ingredients
        .get(index)
        .ok_or_else(|| ValidationError::IngredientIndex {
            meal_id: meal.id.clone(),
            index,
        })
}

/// Literal string toggled by the optional box of ingredient `index`. Only
/// optional ingredients have that box.
pub fn optional_option(meal: &Meal, index: usize) -> Result<String, ValidationError> {
    let ingredient = ingredient_at(meal, index)?;
    if !ingredient.optional {
        return Err(ValidationError::NotOptional {
            ingredient: ingredient.name.clone(),
        });
    }
    Ok(ingredient.name.clone())
}

/// Literal string toggled by the `variant` box of ingredient `index`.
pub fn variant_option(meal: &Meal, index: usize, variant: &str) -> Result<String, ValidationError> {
    let ingredient = ingredient_at(meal, index)?;
    if !ingredient.has_variant(variant) {
        return Err(ValidationError::UnknownVariant {
            ingredient: ingredient.name.clone(),
            variant: variant.to_string(),
        });
    }
    Ok(ingredient.variant_option(variant))
}

/// Rejects boxes that do not exist on the meal's options sheet.
pub fn check_keys(meal: &Meal, checkboxes: &CheckboxState) -> Result<(), ValidationError> {
    for key in checkboxes.checked().filter(|key| key.meal_id == meal.id) {
        match &key.target {
            CheckboxTarget::Optional => {
                optional_option(meal, key.ingredient_index)?;
            }
            CheckboxTarget::Variant(variant) => {
                variant_option(meal, key.ingredient_index, variant)?;
            }
        }
    }
    Ok(())
}
