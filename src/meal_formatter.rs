use crate::data_types::meal_data_types::Meal;
use crate::data_types::selection_data_types::OptionKey;
use crate::data_types::ActionOutcome;
use crate::selection_engine::OptionsSheet;
use crate::shopping_list::ShoppingList;

pub fn meals_to_msg(meals: &[Meal]) -> String {
    if meals.is_empty() {
        return "No meals.\n".to_string();
    }

    let mut msg = String::new();
    for meal in meals {
        let mark = if meal.selected { "[x]" } else { "[ ]" };
        msg += &format!("{} {} ({})  id: {}\n", mark, meal.name, meal.meal_type, meal.id);

        for ingr in &meal.ingredients {
            msg += &format!("     + {}", ingr.name);
            if ingr.optional {
                msg += " (optional)";
            }
            if !ingr.variants.is_empty() {
                msg += &format!(" [{}]", ingr.variants.join(", "));
            }
            msg += "\n";
        }

        if meal.selected && !meal.selected_options.is_empty() {
            let options: Vec<&str> = meal.selected_options.iter().map(String::as_str).collect();
            msg += &format!("   -> {}\n", options.join(", "));
        }
    }
    msg
}

/// Numbered ingredient rows with their boxes, indices are what the
/// `--include` and `--variant` flags refer to.
pub fn options_to_msg(sheet: &OptionsSheet) -> String {
    let meal = &sheet.meal;
    let mut msg = format!("Options for {} ({})\n", meal.name, meal.meal_type);

    if meal.ingredients.is_empty() {
        msg += " • no ingredients\n";
        return msg;
    }

    for (index, ingr) in meal.ingredients.iter().enumerate() {
        msg += &format!(" {:>2}. {}", index, ingr.name);
        if ingr.optional {
            let checked = sheet
                .checkboxes
                .is_checked(&OptionKey::optional(meal.id.clone(), index));
            msg += &format!("  [{}] include", if checked { "x" } else { " " });
        }
        msg += "\n";

        for variant in &ingr.variants {
            let checked = sheet
                .checkboxes
                .is_checked(&OptionKey::variant(meal.id.clone(), index, variant.as_str()));
            msg += &format!("       [{}] {}\n", if checked { "x" } else { " " }, variant);
        }
    }
    msg
}

pub fn shopping_list_to_msg(list: &ShoppingList) -> String {
    if list.is_empty() {
        return "Shopping list is empty.\n".to_string();
    }

    let mut msg = String::from("Shopping list\n");
    for item in list.iter() {
        msg += &format!(" • {}\n", item);
    }
    msg
}

pub fn outcome_to_msg(outcome: &ActionOutcome) -> String {
    match outcome {
        ActionOutcome::Meals(meals) => meals_to_msg(meals),
        ActionOutcome::Saved(meal) => meals_to_msg(std::slice::from_ref(meal)),
        ActionOutcome::Options(sheet) => options_to_msg(sheet),
        ActionOutcome::Deleted(id) => format!("Deleted meal {}\n", id),
        ActionOutcome::ShoppingList(list) => shopping_list_to_msg(list),
    }
}
