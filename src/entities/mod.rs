// Entity Models
//
// Each entity has:
// - Stable identity (plan type / tax rate id) that NEVER changes
// - Values that are read-only once loaded
// - Plans additionally carry one presentation field (legacy year)

pub mod plan;
pub mod tax_rate;

pub use plan::{PasswordManagerPlanFeatures, Plan, PlanType, ProductType};
pub use tax_rate::TaxRate;
