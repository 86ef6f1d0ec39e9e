use std::sync::Arc;

use crate::constants::LOG_TARGET_PLANNER;
use crate::data_backend::MealStore;
use crate::data_types::meal_data_types::{Meal, MealId, MealInput, MealPatch, SelectedOptions};
use crate::data_types::selection_data_types::CheckboxState;
use crate::data_types::{Action, ActionOutcome, MealDraft};
use crate::errors::{PlannerError, StoreError, ValidationError};
use crate::meal_filter::{filter_meals, MealFilter};
use crate::selection_engine::{
    check_keys, optional_option, resolve_selected_options, toggle_option, variant_option,
    OptionsSheet,
};
use crate::shopping_list::{derive_shopping_list, ShoppingList};

/// Owns the store and the cached meal list. Every mutation is awaited, then
/// the whole list is fetched again and the cache replaced. A failed mutation
/// leaves the cache as it was.
pub struct MealPlanner<S: MealStore> {
    store: S,
    meals: Arc<Vec<Meal>>,
}

impl<S: MealStore> MealPlanner<S> {
    /// Starts with an empty cache, call [`MealPlanner::refresh`] to load.
    pub fn new(store: S) -> Self {
        MealPlanner {
            store,
            meals: Arc::new(Vec::new()),
        }
    }

    pub async fn load(store: S) -> Result<Self, PlannerError> {
        let mut planner = Self::new(store);
        planner.refresh().await?;
        Ok(planner)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current snapshot. Later refreshes never alter a handed out snapshot.
    pub fn meals(&self) -> Arc<Vec<Meal>> {
        Arc::clone(&self.meals)
    }

    pub async fn refresh(&mut self) -> Result<Arc<Vec<Meal>>, StoreError> {
        match self.store.fetch_all().await {
            Ok(meals) => {
                log::debug!(target: LOG_TARGET_PLANNER, "Loaded {} meals", meals.len());
                self.meals = Arc::new(meals);
                Ok(self.meals())
            }
            Err(e) => {
                log::error!(target: LOG_TARGET_PLANNER, "Loading meals failed: {}", e);
                Err(e)
            }
        }
    }

    fn find(&self, id: &MealId) -> Result<&Meal, PlannerError> {
        self.meals
            .iter()
            .find(|meal| &meal.id == id)
            .ok_or_else(|| PlannerError::UnknownMeal(id.clone()))
    }

    /// Logs the outcome of a store mutation and reloads the cache on success.
    async fn settle<T>(&mut self, what: String, result: Result<T, StoreError>) -> Result<T, PlannerError> {
        match result {
            Ok(value) => {
                log::info!(target: LOG_TARGET_PLANNER, "{}", what);
                self.refresh().await?;
                Ok(value)
            }
            Err(e) => {
                log::error!(target: LOG_TARGET_PLANNER, "{} failed: {}", what, e);
                Err(e.into())
            }
        }
    }

    pub fn list(&self, filter: &MealFilter) -> Vec<Meal> {
        filter_meals(&self.meals, filter).into_iter().cloned().collect()
    }

    pub async fn create_meal(&mut self, draft: MealDraft) -> Result<Meal, PlannerError> {
        let input = validate_draft(draft)?;
        let what = format!("Create meal '{}'", input.name);
        let result = self.store.create(input).await;
        self.settle(what, result).await
    }

    /// Replaces the definition and resets the selection of the meal.
    pub async fn edit_meal(&mut self, id: &MealId, draft: MealDraft) -> Result<Meal, PlannerError> {
        self.find(id)?;
        let input = validate_draft(draft)?;
        let result = self.store.update(id, MealPatch::from(input)).await;
        self.settle(format!("Edit meal {}", id), result).await
    }

    pub async fn delete_meal(&mut self, id: &MealId) -> Result<(), PlannerError> {
        self.find(id)?;
        let result = self.store.delete(id).await;
        self.settle(format!("Delete meal {}", id), result).await
    }

    /// Marks the meal as planned and opens its options sheet. Options are
    /// only filled by a later save or toggle.
    pub async fn select_meal(&mut self, id: &MealId) -> Result<OptionsSheet, PlannerError> {
        if !self.find(id)?.selected {
            let result = self
                .store
                .update_selection(id, true, SelectedOptions::new())
                .await;
            self.settle(format!("Select meal {}", id), result).await?;
        }
        self.open_options(id)
    }

    /// Unplans the meal and drops all of its options.
    pub async fn deselect_meal(&mut self, id: &MealId) -> Result<Meal, PlannerError> {
        self.find(id)?;
        let result = self
            .store
            .update_selection(id, false, SelectedOptions::new())
            .await;
        self.settle(format!("Deselect meal {}", id), result).await
    }

    /// Flips the meal checkbox. Returns the options sheet when the meal
    /// became selected.
    pub async fn toggle_meal_selection(
        &mut self,
        id: &MealId,
    ) -> Result<Option<OptionsSheet>, PlannerError> {
        if self.find(id)?.selected {
            self.deselect_meal(id).await?;
            Ok(None)
        } else {
            self.select_meal(id).await.map(Some)
        }
    }

    pub fn open_options(&self, id: &MealId) -> Result<OptionsSheet, PlannerError> {
        Ok(OptionsSheet::open(self.find(id)?.clone()))
    }

    /// Full save pass from live checkbox state. Replaces whatever options
    /// were stored before and keeps the meal selected.
    pub async fn save_selections(
        &mut self,
        id: &MealId,
        checkboxes: &CheckboxState,
    ) -> Result<Meal, PlannerError> {
        let meal = self.find(id)?;
        check_keys(meal, checkboxes)?;
        let options = resolve_selected_options(meal, checkboxes);

        let result = self.store.update_selection(id, true, options).await;
        self.settle(format!("Save options of meal {}", id), result).await
    }

    pub async fn toggle_optional_ingredient(
        &mut self,
        id: &MealId,
        ingredient_index: usize,
    ) -> Result<Meal, PlannerError> {
        let option = optional_option(self.find(id)?, ingredient_index)?;
        self.toggle_literal(id, option).await
    }

    pub async fn toggle_variant_option(
        &mut self,
        id: &MealId,
        ingredient_index: usize,
        variant: &str,
    ) -> Result<Meal, PlannerError> {
        let option = variant_option(self.find(id)?, ingredient_index, variant)?;
        self.toggle_literal(id, option).await
    }

    async fn toggle_literal(&mut self, id: &MealId, option: String) -> Result<Meal, PlannerError> {
        let meal = self.find(id)?;
        if !meal.selected {
            return Err(ValidationError::MealNotSelected(id.clone()).into());
        }
        let toggled = toggle_option(&meal.selected_options, &option);

        let result = self.store.update_selection(id, meal.selected, toggled).await;
        self.settle(format!("Toggle '{}' of meal {}", option, id), result)
            .await
    }

    /// Always derived from the current snapshot.
    pub fn shopping_list(&self) -> ShoppingList {
        derive_shopping_list(self.meals.iter())
    }

    /// Runs one user action. Store failures are logged where they happen,
    /// rejected input is logged here.
    pub async fn dispatch(&mut self, action: Action) -> Result<ActionOutcome, PlannerError> {
        match self.handle(action).await {
            Err(PlannerError::Store(e)) => Err(PlannerError::Store(e)),
            Err(e) => {
                log::warn!(target: LOG_TARGET_PLANNER, "Action rejected: {}", e);
                Err(e)
            }
            ok => ok,
        }
    }

    async fn handle(&mut self, action: Action) -> Result<ActionOutcome, PlannerError> {
        let outcome = match action {
            Action::Refresh => {
                let meals = self.refresh().await?;
                ActionOutcome::Meals(meals.to_vec())
            }
            Action::ListMeals(filter) => ActionOutcome::Meals(self.list(&filter)),
            Action::CreateMeal(draft) => ActionOutcome::Saved(self.create_meal(draft).await?),
            Action::EditMeal { id, draft } => {
                ActionOutcome::Saved(self.edit_meal(&id, draft).await?)
            }
            Action::DeleteMeal(id) => {
                self.delete_meal(&id).await?;
                ActionOutcome::Deleted(id)
            }
            Action::SelectMeal(id) => ActionOutcome::Options(self.select_meal(&id).await?),
            Action::DeselectMeal(id) => ActionOutcome::Saved(self.deselect_meal(&id).await?),
            Action::ToggleMealSelection(id) => match self.toggle_meal_selection(&id).await? {
                Some(sheet) => ActionOutcome::Options(sheet),
                None => ActionOutcome::Saved(self.find(&id)?.clone()),
            },
            Action::OpenOptions(id) => ActionOutcome::Options(self.open_options(&id)?),
            Action::SaveSelections { id, checkboxes } => {
                ActionOutcome::Saved(self.save_selections(&id, &checkboxes).await?)
            }
            Action::ToggleOptionalIngredient {
                id,
                ingredient_index,
            } => ActionOutcome::Saved(
                self.toggle_optional_ingredient(&id, ingredient_index)
                    .await?,
            ),
            Action::ToggleVariantOption {
                id,
                ingredient_index,
                variant,
            } => ActionOutcome::Saved(
                self.toggle_variant_option(&id, ingredient_index, &variant)
                    .await?,
            ),
            Action::GenerateShoppingList => ActionOutcome::ShoppingList(self.shopping_list()),
        };

        Ok(outcome)
    }
}

fn validate_draft(draft: MealDraft) -> Result<MealInput, ValidationError> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyMealName);
    }
    Ok(MealInput::new(
        name.to_string(),
        draft.meal_type.trim().to_string(),
        draft.ingredients,
    ))
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashSet};
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::data_backend::memory_store::MemoryStore;
    use crate::data_types::meal_data_types::Ingredient;
    use crate::data_types::selection_data_types::OptionKey;
    use crate::ingredient_parser::{annotate_by_name, build_ingredients, parse_ingredient_names};

    /// Memory store whose mutations can be switched to fail.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        broken: AtomicBool,
    }

    impl FlakyStore {
        fn break_mutations(&self) {
            self.broken.store(true, Ordering::SeqCst);
        }

        fn check(&self) -> Result<(), StoreError> {
            if self.broken.load(Ordering::SeqCst) {
                Err(StoreError::Api {
                    endpoint: "test".into(),
                    status: 503,
                    body: "unavailable".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    impl MealStore for FlakyStore {
        async fn fetch_all(&self) -> Result<Vec<Meal>, StoreError> {
            self.inner.fetch_all().await
        }

        async fn create(&self, meal: MealInput) -> Result<Meal, StoreError> {
            self.check()?;
            self.inner.create(meal).await
        }

        async fn update(&self, id: &MealId, patch: MealPatch) -> Result<Meal, StoreError> {
            self.check()?;
            self.inner.update(id, patch).await
        }

        async fn delete(&self, id: &MealId) -> Result<(), StoreError> {
            self.check()?;
            self.inner.delete(id).await
        }
    }

    fn draft(
        name: &str,
        meal_type: &str,
        text: &str,
        optional: &[&str],
        variants: &[(&str, &str)],
    ) -> MealDraft {
        let names = parse_ingredient_names(text);
        let optional: Vec<String> = optional.iter().map(|o| o.to_string()).collect();
        let variants: Vec<(String, String)> = variants
            .iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect();
        let annotations = annotate_by_name(&names, &optional, &variants).unwrap();
        MealDraft {
            name: name.into(),
            meal_type: meal_type.into(),
            ingredients: build_ingredients(names, &annotations),
        }
    }

    async fn planner_with_porridge() -> (MealPlanner<MemoryStore>, MealId) {
        let mut planner = MealPlanner::load(MemoryStore::new()).await.unwrap();
        let meal = planner
            .create_meal(draft(
                "Porridge",
                "Breakfast",
                "oats, milk\nhoney",
                &["honey"],
                &[("milk", "skim, whole")],
            ))
            .await
            .unwrap();
        (planner, meal.id)
    }

    fn option_set(meal: &Meal) -> BTreeSet<String> {
        meal.selected_options.iter().cloned().collect()
    }

    #[tokio::test]
    async fn create_refreshes_cache() {
        let (planner, id) = planner_with_porridge().await;
        let meals = planner.meals();
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].id, id);
        assert!(!meals[0].selected);
        assert_eq!(meals[0].ingredients[1].variants, vec!["skim", "whole"]);
        assert!(meals[0].ingredients[2].optional);
    }

    #[tokio::test]
    async fn empty_meal_name_is_rejected() {
        let mut planner = MealPlanner::new(MemoryStore::new());
        let err = planner
            .create_meal(draft("   ", "Lunch", "bread", &[], &[]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PlannerError::Validation(ValidationError::EmptyMealName)
        ));
        assert!(planner.store().fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn select_then_save_then_shop() {
        let (mut planner, id) = planner_with_porridge().await;

        let sheet = planner.select_meal(&id).await.unwrap();
        assert!(sheet.meal.selected);
        assert!(sheet.meal.selected_options.is_empty());
        assert!(sheet.checkboxes.is_empty());

        let mut boxes = sheet.checkboxes;
        boxes.check(OptionKey::variant(id.clone(), 1, "whole"));
        boxes.check(OptionKey::optional(id.clone(), 2));
        let saved = planner.save_selections(&id, &boxes).await.unwrap();
        assert_eq!(saved.selected_options.as_slice(), ["oats", "whole milk", "honey"]);

        let list = planner.shopping_list();
        assert_eq!(
            list.to_set(),
            HashSet::from(["oats", "whole milk", "honey"])
        );
    }

    #[tokio::test]
    async fn deselect_clears_options_and_contribution() {
        let (mut planner, id) = planner_with_porridge().await;
        planner.select_meal(&id).await.unwrap();
        planner.save_selections(&id, &CheckboxState::new()).await.unwrap();
        assert!(!planner.shopping_list().is_empty());

        let meal = planner.deselect_meal(&id).await.unwrap();
        assert!(!meal.selected);
        assert!(meal.selected_options.is_empty());
        assert!(planner.shopping_list().is_empty());
    }

    #[tokio::test]
    async fn toggles_flip_single_options() {
        let (mut planner, id) = planner_with_porridge().await;
        planner.select_meal(&id).await.unwrap();
        let saved = planner.save_selections(&id, &CheckboxState::new()).await.unwrap();
        let before = option_set(&saved);

        let once = planner.toggle_variant_option(&id, 1, "skim").await.unwrap();
        assert!(once.selected_options.contains("skim milk"));
        let twice = planner.toggle_variant_option(&id, 1, "skim").await.unwrap();
        assert_eq!(option_set(&twice), before);

        let once = planner.toggle_optional_ingredient(&id, 2).await.unwrap();
        assert!(once.selected_options.contains("honey"));
        let twice = planner.toggle_optional_ingredient(&id, 2).await.unwrap();
        assert_eq!(option_set(&twice), before);
        assert!(twice.selected);
    }

    #[tokio::test]
    async fn save_pass_wins_over_earlier_toggles() {
        let (mut planner, id) = planner_with_porridge().await;
        planner.select_meal(&id).await.unwrap();
        planner.toggle_optional_ingredient(&id, 2).await.unwrap();
        planner.toggle_variant_option(&id, 1, "skim").await.unwrap();

        let saved = planner.save_selections(&id, &CheckboxState::new()).await.unwrap();
        assert_eq!(saved.selected_options.as_slice(), ["oats", "milk"]);
    }

    #[tokio::test]
    async fn reopened_sheet_reflects_toggles() {
        let (mut planner, id) = planner_with_porridge().await;
        planner.select_meal(&id).await.unwrap();
        planner.toggle_variant_option(&id, 1, "whole").await.unwrap();

        let sheet = planner.open_options(&id).unwrap();
        assert!(sheet
            .checkboxes
            .is_checked(&OptionKey::variant(id.clone(), 1, "whole")));

        // selecting an already selected meal keeps its options
        let sheet = planner.select_meal(&id).await.unwrap();
        assert!(sheet.meal.selected_options.contains("whole milk"));
    }

    #[tokio::test]
    async fn toggles_need_a_selected_meal() {
        let (mut planner, id) = planner_with_porridge().await;
        let err = planner.toggle_optional_ingredient(&id, 2).await.unwrap_err();
        assert!(matches!(
            err,
            PlannerError::Validation(ValidationError::MealNotSelected(_))
        ));
    }

    #[tokio::test]
    async fn mandatory_ingredient_cannot_be_dropped() {
        let mut planner = MealPlanner::new(MemoryStore::new());
        let meal = planner
            .create_meal(draft("Sandwich", "Lunch", "bread", &[], &[]))
            .await
            .unwrap();
        planner.select_meal(&meal.id).await.unwrap();
        planner
            .save_selections(&meal.id, &CheckboxState::new())
            .await
            .unwrap();

        let err = planner
            .toggle_optional_ingredient(&meal.id, 0)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PlannerError::Validation(ValidationError::NotOptional { .. })
        ));

        let mut boxes = CheckboxState::new();
        boxes.check(OptionKey::optional(meal.id.clone(), 0));
        assert!(planner.save_selections(&meal.id, &boxes).await.is_err());

        assert_eq!(planner.shopping_list().to_set(), HashSet::from(["bread"]));
    }

    #[tokio::test]
    async fn bad_keys_are_rejected_before_writing() {
        let (mut planner, id) = planner_with_porridge().await;
        planner.select_meal(&id).await.unwrap();

        assert!(planner.toggle_variant_option(&id, 1, "oat").await.is_err());
        assert!(planner.toggle_optional_ingredient(&id, 9).await.is_err());

        let mut boxes = CheckboxState::new();
        boxes.check(OptionKey::optional(id.clone(), 5));
        assert!(planner.save_selections(&id, &boxes).await.is_err());
        assert!(planner.meals()[0].selected_options.is_empty());
    }

    #[tokio::test]
    async fn edit_replaces_ingredients_and_resets_selection() {
        let (mut planner, id) = planner_with_porridge().await;
        planner.select_meal(&id).await.unwrap();
        planner.save_selections(&id, &CheckboxState::new()).await.unwrap();

        let edited = planner
            .edit_meal(&id, draft("Porridge", "Breakfast", "oats\nwater", &[], &[]))
            .await
            .unwrap();
        assert_eq!(edited.id, id);
        assert_eq!(
            edited.ingredients,
            vec![
                Ingredient {
                    name: "oats".into(),
                    optional: false,
                    variants: vec![]
                },
                Ingredient {
                    name: "water".into(),
                    optional: false,
                    variants: vec![]
                },
            ]
        );
        assert!(!edited.selected);
        assert!(edited.selected_options.is_empty());
    }

    #[tokio::test]
    async fn unknown_meal_is_reported() {
        let (mut planner, _) = planner_with_porridge().await;
        let ghost = MealId::from("ghost");
        assert!(matches!(
            planner.delete_meal(&ghost).await,
            Err(PlannerError::UnknownMeal(_))
        ));
        assert!(matches!(
            planner.open_options(&ghost),
            Err(PlannerError::UnknownMeal(_))
        ));
    }

    #[tokio::test]
    async fn failed_mutation_keeps_snapshot() {
        let mut planner = MealPlanner::load(FlakyStore::default()).await.unwrap();
        let meal = planner
            .create_meal(draft("Soup", "Dinner", "leek, potato", &[], &[]))
            .await
            .unwrap();
        let before = planner.meals();

        planner.store().break_mutations();
        assert!(matches!(
            planner.select_meal(&meal.id).await,
            Err(PlannerError::Store(StoreError::Api { status: 503, .. }))
        ));
        assert!(planner.delete_meal(&meal.id).await.is_err());

        assert_eq!(planner.meals(), before);
        assert!(!planner.meals()[0].selected);
    }

    #[tokio::test]
    async fn snapshots_are_immutable() {
        let (mut planner, id) = planner_with_porridge().await;
        let old = planner.meals();
        planner.delete_meal(&id).await.unwrap();
        assert_eq!(old.len(), 1);
        assert!(planner.meals().is_empty());
    }

    #[tokio::test]
    async fn dispatch_routes_actions() {
        let mut planner = MealPlanner::new(MemoryStore::new());

        let outcome = planner
            .dispatch(Action::CreateMeal(draft("Oats", "Breakfast", "oats", &[], &[])))
            .await
            .unwrap();
        let ActionOutcome::Saved(oats) = outcome else {
            panic!("expected saved meal");
        };
        planner
            .dispatch(Action::CreateMeal(draft("Pasta", "Dinner", "pasta, basil", &["basil"], &[])))
            .await
            .unwrap();

        let outcome = planner
            .dispatch(Action::ListMeals(MealFilter::new(None, Some("oa".into()))))
            .await
            .unwrap();
        assert_eq!(outcome, ActionOutcome::Meals(vec![oats.clone()]));

        let outcome = planner
            .dispatch(Action::ToggleMealSelection(oats.id.clone()))
            .await
            .unwrap();
        assert!(matches!(outcome, ActionOutcome::Options(_)));

        planner
            .dispatch(Action::SaveSelections {
                id: oats.id.clone(),
                checkboxes: CheckboxState::new(),
            })
            .await
            .unwrap();

        let outcome = planner.dispatch(Action::GenerateShoppingList).await.unwrap();
        let ActionOutcome::ShoppingList(list) = outcome else {
            panic!("expected shopping list");
        };
        assert_eq!(list.to_set(), HashSet::from(["oats"]));

        let outcome = planner
            .dispatch(Action::ToggleMealSelection(oats.id.clone()))
            .await
            .unwrap();
        let ActionOutcome::Saved(meal) = outcome else {
            panic!("expected saved meal");
        };
        assert!(!meal.selected);

        let outcome = planner
            .dispatch(Action::DeleteMeal(oats.id.clone()))
            .await
            .unwrap();
        assert_eq!(outcome, ActionOutcome::Deleted(oats.id));
        assert_eq!(planner.meals().len(), 1);
    }
}
