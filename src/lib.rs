// 模組定義
pub mod algorithm;
pub mod alpha;
pub mod config;
pub mod data_provider;
pub mod domain_types;
pub mod portfolio;
pub mod universe;
