use regex_lite::Regex;
use static_init::dynamic;

use crate::data_types::meal_data_types::Ingredient;
use crate::data_types::selection_data_types::IngredientAnnotation;
use crate::errors::ValidationError;

/// Splits free ingredient text on newlines and commas. Tokens are trimmed and
/// empty ones dropped, duplicates are kept as separate entries.
pub fn parse_ingredient_names(txt: &str) -> Vec<String> {
    #[dynamic]
    static RE: Regex = Regex::new(r"[\n,]+").unwrap();

    RE.split(txt)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// "skim, whole ,," -> ["skim", "whole"]
pub fn parse_variants(txt: &str) -> Vec<String> {
    txt.split(',')
        .map(str::trim)
        .filter(|variant| !variant.is_empty())
        .map(str::to_string)
        .collect()
}

/// Pairs parsed names with their annotations by position. Names without an
/// annotation become plain, non-optional ingredients.
pub fn build_ingredients(names: Vec<String>, annotations: &[IngredientAnnotation]) -> Vec<Ingredient> {
    names
        .into_iter()
        .enumerate()
        .map(|(index, name)| match annotations.get(index) {
            Some(annotation) => Ingredient {
                name,
                optional: annotation.optional,
                variants: parse_variants(&annotation.variants_text),
            },
            None => Ingredient {
                name,
                optional: false,
                variants: Vec::new(),
            },
        })
        .collect()
}

/// Builds positional annotations from name based ones. A name annotation
/// applies to every entry carrying that name.
pub fn annotate_by_name(
    names: &[String],
    optional: &[String],
    variants: &[(String, String)],
) -> Result<Vec<IngredientAnnotation>, ValidationError> {
    let mut annotations = vec![IngredientAnnotation::default(); names.len()];

    for opt_name in optional {
        let mut matched = false;
        for (annotation, _) in annotations
            .iter_mut()
            .zip(names)
            .filter(|(_, name)| *name == opt_name)
        {
            annotation.optional = true;
            matched = true;
        }
        if !matched {
            return Err(ValidationError::UnknownIngredient(opt_name.clone()));
        }
    }

    for (var_name, variants_text) in variants {
        let mut matched = false;
        for (annotation, _) in annotations
            .iter_mut()
            .zip(names)
            .filter(|(_, name)| *name == var_name)
        {
            if !annotation.variants_text.is_empty() {
                annotation.variants_text.push(',');
            }
            annotation.variants_text.push_str(variants_text);
            matched = true;
        }
        if !matched {
            return Err(ValidationError::UnknownIngredient(var_name.clone()));
        }
    }

    Ok(annotations)
}

/// Text used to pre-fill the ingredient box when a meal is edited.
pub fn ingredients_to_text(ingredients: &[Ingredient]) -> String {
    ingredients
        .iter()
        .map(|ingr| ingr.name.as_str())
        .collect::<Vec<&str>>()
        .join("\n")
}
