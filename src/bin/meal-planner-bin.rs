use meal_planner_rs::config::StoreConfig;
use meal_planner_rs::constants::{ALL_TYPES, MEAL_TABLE};
use meal_planner_rs::data_types::meal_data_types::{Meal, MealId};
use meal_planner_rs::data_types::selection_data_types::{CheckboxState, OptionKey};
use meal_planner_rs::data_types::{Action, MealDraft};
use meal_planner_rs::ingredient_parser::{
    annotate_by_name, build_ingredients, ingredients_to_text, parse_ingredient_names,
};
use meal_planner_rs::meal_filter::MealFilter;
use meal_planner_rs::meal_formatter::outcome_to_msg;
use meal_planner_rs::shared_main::{connect_planner, logger_init};

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Plan meals and derive a shopping list from a Supabase `meals` table.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Supabase project url{n}Example: <https://abcdefgh.supabase.co>
    #[arg(long, env = "SUPABASE_URL")]
    url: String,
    /// Supabase anon (or service) key
    #[arg(long, env = "SUPABASE_ANON_KEY", hide_env_values = true)]
    key: String,
    /// Table holding the meals
    #[arg(long, env = "MEAL_TABLE", default_value = MEAL_TABLE)]
    table: String,
    /// Enable verbose logging (request timings){n}[SETS env: RUST_LOG=debug]
    #[arg(short, long)]
    verbose: bool,
    /// Print results as JSON
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// List meals, optionally filtered by type and name
    List {
        #[arg(long = "type", default_value = ALL_TYPES)]
        meal_type: String,
        /// case-insensitive part of the meal name
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Add a new meal
    Add(NewMealArgs),
    /// Replace a meal's definition, this resets its selection
    ///
    /// Without --ingredients, --optional and --variants the current ingredients are kept
    /// as they are. Passing any of them rebuilds the list and drops optional
    /// flags and variants that are not given again.
    Edit(EditMealArgs),
    /// Delete a meal
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Put a meal on the plan and show its options
    Select {
        #[arg(long)]
        id: String,
    },
    /// Take a meal off the plan, clearing its options
    Deselect {
        #[arg(long)]
        id: String,
    },
    /// Show the ingredient options of a meal
    Options {
        #[arg(long)]
        id: String,
    },
    /// Store ingredient choices for a selected meal
    SaveSelection {
        #[arg(long)]
        id: String,
        /// index of an optional ingredient to include
        #[arg(long = "include")]
        include: Vec<usize>,
        /// INDEX=VARIANT to pick a variant, repeatable
        #[arg(long = "variant", value_parser = parse_index_pair)]
        variants: Vec<(usize, String)>,
    },
    /// Flip a single optional ingredient
    ToggleOptional {
        #[arg(long)]
        id: String,
        #[arg(long)]
        index: usize,
    },
    /// Flip a single variant
    ToggleVariant {
        #[arg(long)]
        id: String,
        #[arg(long)]
        index: usize,
        #[arg(long)]
        variant: String,
    },
    /// Print the shopping list of all selected meals
    ShoppingList,
}

#[derive(clap::Args, Debug)]
struct NewMealArgs {
    #[arg(long)]
    name: String,
    #[arg(long = "type")]
    meal_type: String,
    /// ingredients separated by commas or newlines
    #[arg(long, default_value = "")]
    ingredients: String,
    /// ingredient name to mark optional, repeatable
    #[arg(long)]
    optional: Vec<String>,
    /// NAME=VARIANT,VARIANT for an ingredient, repeatable
    #[arg(long, value_parser = parse_name_pair)]
    variants: Vec<(String, String)>,
}

#[derive(clap::Args, Debug)]
struct EditMealArgs {
    #[arg(long)]
    id: String,
    /// keeps the current name when omitted
    #[arg(long)]
    name: Option<String>,
    /// keeps the current type when omitted
    #[arg(long = "type")]
    meal_type: Option<String>,
    /// keeps the current ingredient names when omitted
    #[arg(long)]
    ingredients: Option<String>,
    #[arg(long)]
    optional: Vec<String>,
    #[arg(long, value_parser = parse_name_pair)]
    variants: Vec<(String, String)>,
}

fn parse_name_pair(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((name, variants)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), variants.to_string()))
        }
        _ => Err(format!("expected NAME=VARIANT,VARIANT, got '{}'", arg)),
    }
}

fn parse_index_pair(arg: &str) -> Result<(usize, String), String> {
    let (index, variant) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=VARIANT, got '{}'", arg))?;
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid index '{}': {}", index, e))?;
    Ok((index, variant.trim().to_string()))
}

fn make_draft(
    name: String,
    meal_type: String,
    ingredients: &str,
    optional: &[String],
    variants: &[(String, String)],
) -> Result<MealDraft> {
    let names = parse_ingredient_names(ingredients);
    let annotations = annotate_by_name(&names, optional, variants)?;

    Ok(MealDraft {
        name,
        meal_type,
        ingredients: build_ingredients(names, &annotations),
    })
}

fn make_action(cmd: Cmd, meals: &[Meal]) -> Result<Action> {
    let action = match cmd {
        Cmd::List { meal_type, search } => {
            Action::ListMeals(MealFilter::new(Some(meal_type), Some(search)))
        }
        Cmd::Add(args) => Action::CreateMeal(make_draft(
            args.name,
            args.meal_type,
            &args.ingredients,
            &args.optional,
            &args.variants,
        )?),
        Cmd::Edit(args) => {
            let id = MealId::from(args.id);
            // unknown ids fall through to the planner, which reports them
            let current = meals.iter().find(|meal| meal.id == id);
            let keep_ingredients =
                args.ingredients.is_none() && args.optional.is_empty() && args.variants.is_empty();
            let ingredients = args.ingredients.unwrap_or_else(|| {
                current
                    .map(|meal| ingredients_to_text(&meal.ingredients))
                    .unwrap_or_default()
            });
            let name = args
                .name
                .or_else(|| current.map(|meal| meal.name.clone()))
                .unwrap_or_default();
            let meal_type = args
                .meal_type
                .or_else(|| current.map(|meal| meal.meal_type.clone()))
                .unwrap_or_default();

            let mut draft =
                make_draft(name, meal_type, &ingredients, &args.optional, &args.variants)?;
            if let Some(meal) = current.filter(|_| keep_ingredients) {
                draft.ingredients = meal.ingredients.clone();
            }
            Action::EditMeal { id, draft }
        }
        Cmd::Delete { id } => Action::DeleteMeal(id.into()),
        Cmd::Select { id } => Action::SelectMeal(id.into()),
        Cmd::Deselect { id } => Action::DeselectMeal(id.into()),
        Cmd::Options { id } => Action::OpenOptions(id.into()),
        Cmd::SaveSelection {
            id,
            include,
            variants,
        } => {
            let id = MealId::from(id);
            let mut checkboxes = CheckboxState::new();
            for index in include {
                checkboxes.check(OptionKey::optional(id.clone(), index));
            }
            for (index, variant) in variants {
                checkboxes.check(OptionKey::variant(id.clone(), index, variant));
            }
            Action::SaveSelections { id, checkboxes }
        }
        Cmd::ToggleOptional { id, index } => Action::ToggleOptionalIngredient {
            id: id.into(),
            ingredient_index: index,
        },
        Cmd::ToggleVariant { id, index, variant } => Action::ToggleVariantOption {
            id: id.into(),
            ingredient_index: index,
            variant,
        },
        Cmd::ShoppingList => Action::GenerateShoppingList,
    };

    Ok(action)
}

#[tokio::main]
async fn main() -> Result<()> {
    //// Args setup
    let args = Args::parse();

    if args.verbose {
        std::env::set_var("RUST_LOG", "debug");
    }

    logger_init(module_path!());

    // missing or broken connection parameters end the process here
    let config = StoreConfig::new(&args.url, &args.key, Some(&args.table))?;
    let mut planner = connect_planner(&config).await?;

    let action = make_action(args.cmd, &planner.meals())?;
    let outcome = planner.dispatch(action).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", outcome_to_msg(&outcome));
    }

    Ok(())
}
