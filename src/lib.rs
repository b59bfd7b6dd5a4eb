// Plan Catalog Service - Core Library
// Exposes all modules for use in the operator CLI, API server, and tests

pub mod catalog;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod flags;
pub mod logging;
pub mod responses;
pub mod rules;
pub mod service;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use catalog::PlanCatalog;
pub use config::{ApiToken, AppConfig, LogFormat};
pub use db::{
    SqliteTaxRateStore, TaxRateStore,
    load_csv, setup_database, insert_tax_rates,
    get_all_active_tax_rates, archive_tax_rate, count_tax_rates,
};
pub use entities::{PasswordManagerPlanFeatures, Plan, PlanType, ProductType, TaxRate};
pub use error::{CatalogError, Result};
pub use flags::{
    ConfiguredFlags, FeatureFlagEvaluator, RequestContext,
    BILLING_PLANS_UPGRADE, BILLING_STARTER_PLAN,
};
pub use responses::{ListResponse, PlanResponse, TaxRateResponse};
pub use rules::{PlanFlags, PlanRule, PlanRuleEngine};
pub use service::PlanCatalogService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
