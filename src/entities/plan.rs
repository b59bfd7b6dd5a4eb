// 💳 Plan Entity - Subscription plans offered to organizations
//
// "Plan type is IDENTITY (never changes), legacy year is PRESENTATION (computed per request)"
//
// Everything on a plan is fixed at catalog construction except legacy_year,
// which the plan rules rewrite on a per-request copy.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ============================================================================
// PLAN TYPE
// ============================================================================

/// Plan type. The discriminant order is significant: the plan rules compare
/// types with `<=` / `>=` to find legacy vintages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PlanType {
    Free = 0,
    FamiliesAnnually2019 = 1,
    TeamsMonthly2019 = 2,
    TeamsAnnually2019 = 3,
    EnterpriseMonthly2019 = 4,
    EnterpriseAnnually2019 = 5,
    Custom = 6,
    FamiliesAnnually = 7,
    TeamsMonthly2020 = 8,
    TeamsAnnually2020 = 9,
    EnterpriseMonthly2020 = 10,
    EnterpriseAnnually2020 = 11,
    TeamsMonthly = 12,
    TeamsAnnually = 13,
    EnterpriseMonthly = 14,
    EnterpriseAnnually = 15,
    TeamsStarter = 16,
}

impl PlanType {
    /// All plan types in discriminant order
    pub const ALL: [PlanType; 17] = [
        PlanType::Free,
        PlanType::FamiliesAnnually2019,
        PlanType::TeamsMonthly2019,
        PlanType::TeamsAnnually2019,
        PlanType::EnterpriseMonthly2019,
        PlanType::EnterpriseAnnually2019,
        PlanType::Custom,
        PlanType::FamiliesAnnually,
        PlanType::TeamsMonthly2020,
        PlanType::TeamsAnnually2020,
        PlanType::EnterpriseMonthly2020,
        PlanType::EnterpriseAnnually2020,
        PlanType::TeamsMonthly,
        PlanType::TeamsAnnually,
        PlanType::EnterpriseMonthly,
        PlanType::EnterpriseAnnually,
        PlanType::TeamsStarter,
    ];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Free => "Free",
            PlanType::FamiliesAnnually2019 => "FamiliesAnnually2019",
            PlanType::TeamsMonthly2019 => "TeamsMonthly2019",
            PlanType::TeamsAnnually2019 => "TeamsAnnually2019",
            PlanType::EnterpriseMonthly2019 => "EnterpriseMonthly2019",
            PlanType::EnterpriseAnnually2019 => "EnterpriseAnnually2019",
            PlanType::Custom => "Custom",
            PlanType::FamiliesAnnually => "FamiliesAnnually",
            PlanType::TeamsMonthly2020 => "TeamsMonthly2020",
            PlanType::TeamsAnnually2020 => "TeamsAnnually2020",
            PlanType::EnterpriseMonthly2020 => "EnterpriseMonthly2020",
            PlanType::EnterpriseAnnually2020 => "EnterpriseAnnually2020",
            PlanType::TeamsMonthly => "TeamsMonthly",
            PlanType::TeamsAnnually => "TeamsAnnually",
            PlanType::EnterpriseMonthly => "EnterpriseMonthly",
            PlanType::EnterpriseAnnually => "EnterpriseAnnually",
            PlanType::TeamsStarter => "TeamsStarter",
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Web clients read plan types as integers
impl Serialize for PlanType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for PlanType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u8::deserialize(deserializer)?;
        PlanType::from_u8(value)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown plan type: {}", value)))
    }
}

// ============================================================================
// PRODUCT TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ProductType {
    Free = 0,
    Families = 1,
    Teams = 2,
    Enterprise = 3,
    TeamsStarter = 4,
}

impl ProductType {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ProductType::Free),
            1 => Some(ProductType::Families),
            2 => Some(ProductType::Teams),
            3 => Some(ProductType::Enterprise),
            4 => Some(ProductType::TeamsStarter),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Free => "Free",
            ProductType::Families => "Families",
            ProductType::Teams => "Teams",
            ProductType::Enterprise => "Enterprise",
            ProductType::TeamsStarter => "Teams Starter",
        }
    }
}

impl Serialize for ProductType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for ProductType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u8::deserialize(deserializer)?;
        ProductType::from_u8(value)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown product type: {}", value)))
    }
}

// ============================================================================
// PASSWORD MANAGER FEATURES
// ============================================================================

/// Seat, storage and pricing limits for the password manager part of a plan
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PasswordManagerPlanFeatures {
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

// ============================================================================
// PLAN ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    // ========================================================================
    // IDENTITY
    // ========================================================================
    pub plan_type: PlanType,
    pub product: ProductType,
    pub name: String,
    pub is_annual: bool,
    pub name_localization_key: String,
    pub description_localization_key: String,

    // ========================================================================
    // CAPABILITIES
    // ========================================================================
    pub can_be_used_by_business: bool,
    pub trial_period_days: Option<u16>,
    pub has_self_host: bool,
    pub has_policies: bool,
    pub has_groups: bool,
    pub has_directory: bool,
    pub has_events: bool,
    pub has_totp: bool,
    pub has_2fa: bool,
    pub has_api: bool,
    pub has_sso: bool,
    pub has_key_connector: bool,
    pub has_reset_password: bool,
    pub has_custom_permissions: bool,
    pub users_get_premium: bool,

    // ========================================================================
    // PRESENTATION
    // ========================================================================
    pub upgrade_sort_order: i32,
    pub display_sort_order: i32,
    pub disabled: bool,

    /// Pricing vintage shown next to superseded plans; `None` = not applicable
    pub legacy_year: Option<u16>,

    pub password_manager: PasswordManagerPlanFeatures,
}

impl Plan {
    /// Create a plan with no capabilities and zero pricing.
    /// The catalog fills in the rest field by field.
    pub fn new(plan_type: PlanType, product: ProductType, name: &str, is_annual: bool) -> Self {
        Plan {
            plan_type,
            product,
            name: name.to_string(),
            is_annual,
            name_localization_key: String::new(),
            description_localization_key: String::new(),
            can_be_used_by_business: false,
            trial_period_days: None,
            has_self_host: false,
            has_policies: false,
            has_groups: false,
            has_directory: false,
            has_events: false,
            has_totp: false,
            has_2fa: false,
            has_api: false,
            has_sso: false,
            has_key_connector: false,
            has_reset_password: false,
            has_custom_permissions: false,
            users_get_premium: false,
            upgrade_sort_order: 0,
            display_sort_order: 0,
            disabled: false,
            legacy_year: None,
            password_manager: PasswordManagerPlanFeatures::default(),
        }
    }

    /// Check whether this plan's type falls in the inclusive range
    pub fn type_between(&self, low: PlanType, high: PlanType) -> bool {
        self.plan_type >= low && self.plan_type <= high
    }
}
