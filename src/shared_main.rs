use std::env;

use crate::config::StoreConfig;
use crate::data_backend::supabase_store::SupabaseStore;
use crate::meal_planner::MealPlanner;

/// Info globally, `module` at debug level when `RUST_LOG=debug`.
pub fn logger_init(module: &str) {
    let debug = env::var(pretty_env_logger::env_logger::DEFAULT_FILTER_ENV).unwrap_or_default()
        == "debug";

    pretty_env_logger::formatted_timed_builder()
        .filter_level(log::LevelFilter::Info)
        .filter_module(
            module,
            if debug {
                log::LevelFilter::Debug
            } else {
                log::LevelFilter::Info
            },
        )
        .init();
}

/// Connects to the remote table and loads the meal list once.
pub async fn connect_planner(config: &StoreConfig) -> anyhow::Result<MealPlanner<SupabaseStore>> {
    let store = SupabaseStore::new(config)?;
    log::debug!("Using table {}", config.table_url());
    Ok(MealPlanner::load(store).await?)
}
