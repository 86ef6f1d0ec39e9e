pub mod config;
pub mod constants;
pub mod data_backend;
pub mod data_types;
pub mod errors;
pub mod ingredient_parser;
pub mod meal_filter;
pub mod meal_formatter;
pub mod meal_planner;
pub mod selection_engine;
pub mod shared_main;
pub mod shopping_list;
