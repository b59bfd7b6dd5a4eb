// Wire models for the plan and tax rate endpoints.
// Field names are camelCase to match the web vault clients.

use crate::entities::{PasswordManagerPlanFeatures, Plan, PlanType, ProductType, TaxRate};
use serde::Serialize;

/// List envelope shared by every list endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub object: &'static str,
    pub data: Vec<T>,
    pub count: usize,
    pub continuation_token: Option<String>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        let count = data.len();
        Self {
            object: "list",
            data,
            count,
            continuation_token: None,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> FromIterator<T> for ListResponse<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        ListResponse::new(iter.into_iter().collect())
    }
}

// ============================================================================
// PLAN RESPONSE
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordManagerPlanFeaturesResponse {
    pub stripe_plan_id: Option<String>,
    pub stripe_seat_plan_id: Option<String>,
    pub stripe_storage_plan_id: Option<String>,
    pub stripe_premium_access_plan_id: Option<String>,
    pub base_seats: u32,
    pub base_storage_gb: Option<u16>,
    pub max_seats: Option<u32>,
    pub max_collections: Option<u32>,
    pub max_additional_seats: Option<u32>,
    pub max_additional_storage: Option<u16>,
    pub base_price: f64,
    pub seat_price: f64,
    pub additional_storage_price_per_gb: f64,
    pub premium_access_option_price: f64,
    pub has_additional_seats_option: bool,
    pub has_additional_storage_option: bool,
    pub has_premium_access_option: bool,
}

impl From<PasswordManagerPlanFeatures> for PasswordManagerPlanFeaturesResponse {
    fn from(pm: PasswordManagerPlanFeatures) -> Self {
        Self {
            stripe_plan_id: pm.stripe_plan_id,
            stripe_seat_plan_id: pm.stripe_seat_plan_id,
            stripe_storage_plan_id: pm.stripe_storage_plan_id,
            stripe_premium_access_plan_id: pm.stripe_premium_access_plan_id,
            base_seats: pm.base_seats,
            base_storage_gb: pm.base_storage_gb,
            max_seats: pm.max_seats,
            max_collections: pm.max_collections,
            max_additional_seats: pm.max_additional_seats,
            max_additional_storage: pm.max_additional_storage,
            base_price: pm.base_price,
            seat_price: pm.seat_price,
            additional_storage_price_per_gb: pm.additional_storage_price_per_gb,
            premium_access_option_price: pm.premium_access_option_price,
            has_additional_seats_option: pm.has_additional_seats_option,
            has_additional_storage_option: pm.has_additional_storage_option,
            has_premium_access_option: pm.has_premium_access_option,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub object: &'static str,
    #[serde(rename = "type")]
    pub plan_type: PlanType,
    pub product: ProductType,
    pub name: String,
    pub is_annual: bool,
    pub name_localization_key: String,
    pub description_localization_key: String,
    pub can_be_used_by_business: bool,
    pub trial_period_days: Option<u16>,
    pub has_self_host: bool,
    pub has_policies: bool,
    pub has_groups: bool,
    pub has_directory: bool,
    pub has_events: bool,
    pub has_totp: bool,
    #[serde(rename = "has2fa")]
    pub has_2fa: bool,
    pub has_api: bool,
    pub has_sso: bool,
    pub has_key_connector: bool,
    pub has_reset_password: bool,
    pub has_custom_permissions: bool,
    pub users_get_premium: bool,
    pub upgrade_sort_order: i32,
    pub display_sort_order: i32,
    pub legacy_year: Option<u16>,
    pub disabled: bool,
    pub password_manager: PasswordManagerPlanFeaturesResponse,
}

impl From<Plan> for PlanResponse {
    fn from(plan: Plan) -> Self {
        Self {
            object: "plan",
            plan_type: plan.plan_type,
            product: plan.product,
            name: plan.name,
            is_annual: plan.is_annual,
            name_localization_key: plan.name_localization_key,
            description_localization_key: plan.description_localization_key,
            can_be_used_by_business: plan.can_be_used_by_business,
            trial_period_days: plan.trial_period_days,
            has_self_host: plan.has_self_host,
            has_policies: plan.has_policies,
            has_groups: plan.has_groups,
            has_directory: plan.has_directory,
            has_events: plan.has_events,
            has_totp: plan.has_totp,
            has_2fa: plan.has_2fa,
            has_api: plan.has_api,
            has_sso: plan.has_sso,
            has_key_connector: plan.has_key_connector,
            has_reset_password: plan.has_reset_password,
            has_custom_permissions: plan.has_custom_permissions,
            users_get_premium: plan.users_get_premium,
            upgrade_sort_order: plan.upgrade_sort_order,
            display_sort_order: plan.display_sort_order,
            legacy_year: plan.legacy_year,
            disabled: plan.disabled,
            password_manager: plan.password_manager.into(),
        }
    }
}

// ============================================================================
// TAX RATE RESPONSE
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRateResponse {
    pub object: &'static str,
    pub id: String,
    pub country: String,
    pub state: Option<String>,
    pub postal_code: String,
    pub rate: f64,
}

impl From<TaxRate> for TaxRateResponse {
    fn from(rate: TaxRate) -> Self {
        Self {
            object: "taxRate",
            id: rate.id,
            country: rate.country,
            state: rate.state,
            postal_code: rate.postal_code,
            rate: rate.rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_envelope_shape() {
        let list: ListResponse<u32> = vec![1, 2, 3].into_iter().collect();
        let json = serde_json::to_value(&list).unwrap();

        assert_eq!(json["object"], "list");
        assert_eq!(json["count"], 3);
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
        assert!(json["continuationToken"].is_null());
    }

    #[test]
    fn test_plan_response_field_names() {
        let mut plan = Plan::new(PlanType::TeamsAnnually2020, ProductType::Teams, "Teams", true);
        plan.legacy_year = Some(2023);
        plan.has_2fa = true;

        let json = serde_json::to_value(PlanResponse::from(plan)).unwrap();

        assert_eq!(json["object"], "plan");
        assert_eq!(json["type"], 9);
        assert_eq!(json["product"], 2);
        assert_eq!(json["legacyYear"], 2023);
        assert_eq!(json["has2fa"], true);
        assert_eq!(json["isAnnual"], true);
        assert!(json["passwordManager"]["basePrice"].is_number());
    }

    #[test]
    fn test_tax_rate_response_field_names() {
        let rate = TaxRate::new("txr_1", "US", Some("NY"), "10001", 8.875);
        let json = serde_json::to_value(TaxRateResponse::from(rate)).unwrap();

        assert_eq!(json["object"], "taxRate");
        assert_eq!(json["postalCode"], "10001");
        assert_eq!(json["rate"], 8.875);
        assert!(json.get("active").is_none());
    }
}
