// 📚 Plan Catalog - The static table of every plan the service can offer
//
// The catalog is built once and shared behind an Arc. Nothing writes to it
// after construction: the plan rules clone whatever they return, so callers
// can hand the same catalog to any number of concurrent requests.

use crate::entities::{PasswordManagerPlanFeatures, Plan, PlanType, ProductType};
use std::sync::Arc;

// ============================================================================
// PLAN CATALOG
// ============================================================================

#[derive(Debug, Clone)]
pub struct PlanCatalog {
    plans: Arc<[Plan]>,
}

impl PlanCatalog {
    /// Create a catalog from an explicit plan list (order is preserved)
    pub fn new(plans: Vec<Plan>) -> Self {
        PlanCatalog {
            plans: plans.into(),
        }
    }

    /// The standard catalog: one plan per plan type, in enumeration order
    pub fn standard() -> Self {
        let plans = PlanType::ALL.iter().map(|t| standard_plan(*t)).collect();
        PlanCatalog::new(plans)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Plan> {
        self.plans.iter()
    }

    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    pub fn get(&self, plan_type: PlanType) -> Option<&Plan> {
        self.plans.iter().find(|p| p.plan_type == plan_type)
    }

    pub fn by_product(&self, product: ProductType) -> Vec<&Plan> {
        self.plans.iter().filter(|p| p.product == product).collect()
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

impl Default for PlanCatalog {
    fn default() -> Self {
        PlanCatalog::standard()
    }
}

// ============================================================================
// STANDARD PLANS
// ============================================================================

fn standard_plan(plan_type: PlanType) -> Plan {
    match plan_type {
        PlanType::Free => free(),
        PlanType::Custom => custom(),

        PlanType::FamiliesAnnually2019 => families(plan_type, "Families 2019", FamiliesPricing {
            base_seats: 5,
            base_price: 12.0,
            stripe_plan_id: "personal-org-annually",
            legacy_year: Some(2020),
        }),
        PlanType::FamiliesAnnually => families(plan_type, "Families", FamiliesPricing {
            base_seats: 6,
            base_price: 40.0,
            stripe_plan_id: "2020-families-org-annually",
            legacy_year: None,
        }),

        PlanType::TeamsMonthly2019 => business(plan_type, ProductType::Teams, "Teams (Monthly) 2019", Pricing {
            is_annual: false,
            base_seats: 5,
            base_price: 8.0,
            seat_price: 2.5,
            storage_price: 0.5,
            stripe_plan_id: Some("teams-org-monthly"),
            stripe_seat_plan_id: "teams-org-seat-monthly",
            legacy_year: Some(2020),
        }),
        PlanType::TeamsAnnually2019 => business(plan_type, ProductType::Teams, "Teams (Annually) 2019", Pricing {
            is_annual: true,
            base_seats: 5,
            base_price: 60.0,
            seat_price: 24.0,
            storage_price: 4.0,
            stripe_plan_id: Some("teams-org-annually"),
            stripe_seat_plan_id: "teams-org-seat-annually",
            legacy_year: Some(2020),
        }),
        PlanType::EnterpriseMonthly2019 => business(plan_type, ProductType::Enterprise, "Enterprise (Monthly) 2019", Pricing {
            is_annual: false,
            base_seats: 0,
            base_price: 0.0,
            seat_price: 4.0,
            storage_price: 0.5,
            stripe_plan_id: None,
            stripe_seat_plan_id: "enterprise-org-seat-monthly",
            legacy_year: Some(2020),
        }),
        PlanType::EnterpriseAnnually2019 => business(plan_type, ProductType::Enterprise, "Enterprise (Annually) 2019", Pricing {
            is_annual: true,
            base_seats: 0,
            base_price: 0.0,
            seat_price: 36.0,
            storage_price: 4.0,
            stripe_plan_id: None,
            stripe_seat_plan_id: "enterprise-org-seat-annually",
            legacy_year: Some(2020),
        }),

        PlanType::TeamsMonthly2020 => business(plan_type, ProductType::Teams, "Teams (Monthly) 2020", Pricing {
            is_annual: false,
            base_seats: 0,
            base_price: 0.0,
            seat_price: 4.0,
            storage_price: 0.5,
            stripe_plan_id: None,
            stripe_seat_plan_id: "2020-teams-org-seat-monthly",
            legacy_year: None,
        }),
        PlanType::TeamsAnnually2020 => business(plan_type, ProductType::Teams, "Teams (Annually) 2020", Pricing {
            is_annual: true,
            base_seats: 0,
            base_price: 0.0,
            seat_price: 36.0,
            storage_price: 4.0,
            stripe_plan_id: None,
            stripe_seat_plan_id: "2020-teams-org-seat-annually",
            legacy_year: None,
        }),
        PlanType::EnterpriseMonthly2020 => business(plan_type, ProductType::Enterprise, "Enterprise (Monthly) 2020", Pricing {
            is_annual: false,
            base_seats: 0,
            base_price: 0.0,
            seat_price: 6.0,
            storage_price: 0.5,
            stripe_plan_id: None,
            stripe_seat_plan_id: "2020-enterprise-org-seat-monthly",
            legacy_year: None,
        }),
        PlanType::EnterpriseAnnually2020 => business(plan_type, ProductType::Enterprise, "Enterprise (Annually) 2020", Pricing {
            is_annual: true,
            base_seats: 0,
            base_price: 0.0,
            seat_price: 60.0,
            storage_price: 4.0,
            stripe_plan_id: None,
            stripe_seat_plan_id: "2020-enterprise-org-seat-annually",
            legacy_year: None,
        }),

        PlanType::TeamsMonthly => business(plan_type, ProductType::Teams, "Teams (Monthly)", Pricing {
            is_annual: false,
            base_seats: 0,
            base_price: 0.0,
            seat_price: 5.0,
            storage_price: 0.5,
            stripe_plan_id: None,
            stripe_seat_plan_id: "2023-teams-org-seat-monthly",
            legacy_year: None,
        }),
        PlanType::TeamsAnnually => business(plan_type, ProductType::Teams, "Teams (Annually)", Pricing {
            is_annual: true,
            base_seats: 0,
            base_price: 0.0,
            seat_price: 48.0,
            storage_price: 4.0,
            stripe_plan_id: None,
            stripe_seat_plan_id: "2023-teams-org-seat-annually",
            legacy_year: None,
        }),
        PlanType::EnterpriseMonthly => business(plan_type, ProductType::Enterprise, "Enterprise (Monthly)", Pricing {
            is_annual: false,
            base_seats: 0,
            base_price: 0.0,
            seat_price: 7.0,
            storage_price: 0.5,
            stripe_plan_id: None,
            stripe_seat_plan_id: "2023-enterprise-org-seat-monthly",
            legacy_year: None,
        }),
        PlanType::EnterpriseAnnually => business(plan_type, ProductType::Enterprise, "Enterprise (Annually)", Pricing {
            is_annual: true,
            base_seats: 0,
            base_price: 0.0,
            seat_price: 72.0,
            storage_price: 4.0,
            stripe_plan_id: None,
            stripe_seat_plan_id: "2023-enterprise-org-seat-annually",
            legacy_year: None,
        }),

        PlanType::TeamsStarter => teams_starter(),
    }
}

fn free() -> Plan {
    let mut plan = Plan::new(PlanType::Free, ProductType::Free, "Free", false);
    plan.name_localization_key = "planNameFree".to_string();
    plan.description_localization_key = "planDescFree".to_string();
    plan.upgrade_sort_order = -1;
    plan.display_sort_order = -1;
    plan.password_manager = PasswordManagerPlanFeatures {
        base_seats: 2,
        max_seats: Some(2),
        max_collections: Some(2),
        ..Default::default()
    };
    plan
}

fn custom() -> Plan {
    let mut plan = Plan::new(PlanType::Custom, ProductType::Enterprise, "Custom", false);
    plan.name_localization_key = "planNameCustom".to_string();
    plan.description_localization_key = "planDescCustom".to_string();
    plan.can_be_used_by_business = true;
    plan.has_self_host = true;
    plan.has_policies = true;
    plan.has_groups = true;
    plan.has_directory = true;
    plan.has_events = true;
    plan.has_totp = true;
    plan.has_2fa = true;
    plan.has_api = true;
    plan.has_sso = true;
    plan.has_key_connector = true;
    plan.has_reset_password = true;
    plan.has_custom_permissions = true;
    plan.users_get_premium = true;
    plan.upgrade_sort_order = -1;
    plan.display_sort_order = -1;
    plan.disabled = true;
    plan
}

struct FamiliesPricing {
    base_seats: u32,
    base_price: f64,
    stripe_plan_id: &'static str,
    legacy_year: Option<u16>,
}

fn families(plan_type: PlanType, name: &str, pricing: FamiliesPricing) -> Plan {
    let mut plan = Plan::new(plan_type, ProductType::Families, name, true);
    plan.name_localization_key = "planNameFamilies".to_string();
    plan.description_localization_key = "planDescFamiliesV2".to_string();
    plan.trial_period_days = Some(7);
    plan.has_self_host = true;
    plan.has_totp = true;
    plan.users_get_premium = true;
    plan.upgrade_sort_order = 1;
    plan.display_sort_order = 1;
    plan.legacy_year = pricing.legacy_year;
    plan.password_manager = PasswordManagerPlanFeatures {
        stripe_plan_id: Some(pricing.stripe_plan_id.to_string()),
        stripe_storage_plan_id: Some("storage-gb-annually".to_string()),
        base_seats: pricing.base_seats,
        base_storage_gb: Some(1),
        max_seats: Some(pricing.base_seats),
        max_additional_storage: Some(99),
        base_price: pricing.base_price,
        additional_storage_price_per_gb: 4.0,
        has_additional_storage_option: true,
        ..Default::default()
    };
    plan
}

struct Pricing {
    is_annual: bool,
    base_seats: u32,
    base_price: f64,
    seat_price: f64,
    storage_price: f64,
    stripe_plan_id: Option<&'static str>,
    stripe_seat_plan_id: &'static str,
    legacy_year: Option<u16>,
}

/// Teams and Enterprise plans share a shape; Enterprise adds the policy,
/// SSO and self-host capabilities.
fn business(plan_type: PlanType, product: ProductType, name: &str, pricing: Pricing) -> Plan {
    let enterprise = product == ProductType::Enterprise;
    let mut plan = Plan::new(plan_type, product, name, pricing.is_annual);

    let (name_key, desc_key, sort) = if enterprise {
        ("planNameEnterprise", "planDescEnterpriseV2", 3)
    } else {
        ("planNameTeams", "planDescTeamsV2", 2)
    };
    plan.name_localization_key = name_key.to_string();
    plan.description_localization_key = desc_key.to_string();
    plan.can_be_used_by_business = true;
    plan.trial_period_days = Some(7);
    plan.has_groups = true;
    plan.has_directory = true;
    plan.has_events = true;
    plan.has_totp = true;
    plan.has_2fa = true;
    plan.has_api = true;
    plan.users_get_premium = true;
    plan.upgrade_sort_order = sort;
    plan.display_sort_order = sort;
    plan.legacy_year = pricing.legacy_year;

    if enterprise {
        plan.has_self_host = true;
        plan.has_policies = true;
        plan.has_sso = true;
        plan.has_key_connector = true;
        plan.has_reset_password = true;
        plan.has_custom_permissions = true;
    }

    let period = if pricing.is_annual { "annually" } else { "monthly" };
    plan.password_manager = PasswordManagerPlanFeatures {
        stripe_plan_id: pricing.stripe_plan_id.map(|s| s.to_string()),
        stripe_seat_plan_id: Some(pricing.stripe_seat_plan_id.to_string()),
        stripe_storage_plan_id: Some(format!("storage-gb-{}", period)),
        stripe_premium_access_plan_id: None,
        base_seats: pricing.base_seats,
        base_storage_gb: Some(1),
        max_seats: None,
        max_collections: None,
        max_additional_seats: None,
        max_additional_storage: Some(99),
        base_price: pricing.base_price,
        seat_price: pricing.seat_price,
        additional_storage_price_per_gb: pricing.storage_price,
        premium_access_option_price: 0.0,
        has_additional_seats_option: true,
        has_additional_storage_option: true,
        has_premium_access_option: false,
    };
    plan
}

fn teams_starter() -> Plan {
    let mut plan = Plan::new(PlanType::TeamsStarter, ProductType::TeamsStarter, "Teams (Starter)", false);
    plan.name_localization_key = "planNameTeamsStarter".to_string();
    plan.description_localization_key = "planDescTeams".to_string();
    plan.can_be_used_by_business = true;
    plan.trial_period_days = Some(7);
    plan.has_groups = true;
    plan.has_directory = true;
    plan.has_events = true;
    plan.has_totp = true;
    plan.has_2fa = true;
    plan.has_api = true;
    plan.users_get_premium = true;
    plan.upgrade_sort_order = 2;
    plan.display_sort_order = 2;
    plan.password_manager = PasswordManagerPlanFeatures {
        stripe_plan_id: Some("teams-starter".to_string()),
        stripe_storage_plan_id: Some("storage-gb-monthly".to_string()),
        base_seats: 10,
        base_storage_gb: Some(1),
        max_seats: Some(10),
        max_additional_storage: Some(99),
        base_price: 20.0,
        additional_storage_price_per_gb: 0.5,
        has_additional_storage_option: true,
        ..Default::default()
    };
    plan
}
