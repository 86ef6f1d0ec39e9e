pub const MEAL_TABLE: &str = "meals";
pub const REST_PATH: &str = "rest/v1";

pub const URL_ENV: &str = "SUPABASE_URL";
pub const KEY_ENV: &str = "SUPABASE_ANON_KEY";
pub const TABLE_ENV: &str = "MEAL_TABLE";

/// type filter value that matches every meal
pub const ALL_TYPES: &str = "All";

pub const LOG_TARGET_STORE: &str = "meal_planner_rs::Store";
pub const LOG_TARGET_PLANNER: &str = "meal_planner_rs::Planner";
