use thiserror::Error;

use crate::data_types::meal_data_types::MealId;

/// Any persistence failure. A missing record is reported here too, there is
/// no separate not-found kind.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{endpoint}: request failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint}: store answered {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("{endpoint}: unreadable response: {source}")]
    Deserialization {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("meal {0} does not exist in the store")]
    MissingRecord(MealId),
    #[error("store returned no row for {0}")]
    EmptyResponse(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("meal name must not be empty")]
    EmptyMealName,
    #[error("meal {meal_id} has no ingredient at index {index}")]
    IngredientIndex { meal_id: MealId, index: usize },
    #[error("ingredient '{ingredient}' has no variant '{variant}'")]
    UnknownVariant { ingredient: String, variant: String },
    #[error("ingredient '{ingredient}' is not optional")]
    NotOptional { ingredient: String },
    #[error("meal {0} is not selected")]
    MealNotSelected(MealId),
    #[error("annotation '{0}' does not match any ingredient")]
    UnknownIngredient(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{var} is not a valid url: {reason}")]
    InvalidUrl { var: &'static str, reason: String },
    #[error("{0} cannot be sent as a header value")]
    InvalidKey(&'static str),
    #[error("http client setup failed: {0}")]
    HttpClient(String),
}

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("meal {0} is not in the current meal list")]
    UnknownMeal(MealId),
}
