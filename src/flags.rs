// 🚩 Feature Flags - Per-request boolean toggles
//
// Flags resolve against a RequestContext so a single user can be opted in
// ahead of everyone else. Values come from configuration; there is no
// remote flag service.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const BILLING_PLANS_UPGRADE: &str = "billing-plans-upgrade";
pub const BILLING_STARTER_PLAN: &str = "billing-starter-plan";

/// Who is asking; empty for anonymous requests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: Option<String>,
    pub client_version: Option<String>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        RequestContext::default()
    }

    pub fn for_user(user_id: &str) -> Self {
        RequestContext {
            user_id: Some(user_id.to_string()),
            client_version: None,
        }
    }
}

pub trait FeatureFlagEvaluator: Send + Sync {
    fn is_enabled(&self, key: &str, ctx: &RequestContext) -> bool;
}

// ============================================================================
// CONFIGURED FLAGS
// ============================================================================

/// Flag values from the `[flags]` config section.
///
/// ```toml
/// [flags]
/// billing-plans-upgrade = false
///
/// [flags.users.qa-account]
/// billing-plans-upgrade = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfiguredFlags {
    #[serde(flatten)]
    pub defaults: HashMap<String, bool>,

    #[serde(default)]
    pub users: HashMap<String, HashMap<String, bool>>,
}

impl ConfiguredFlags {
    pub fn new() -> Self {
        ConfiguredFlags::default()
    }

    pub fn with_default(mut self, key: &str, enabled: bool) -> Self {
        self.defaults.insert(key.to_string(), enabled);
        self
    }

    pub fn with_user_override(mut self, user_id: &str, key: &str, enabled: bool) -> Self {
        self.users
            .entry(user_id.to_string())
            .or_default()
            .insert(key.to_string(), enabled);
        self
    }
}

impl FeatureFlagEvaluator for ConfiguredFlags {
    fn is_enabled(&self, key: &str, ctx: &RequestContext) -> bool {
        let user_value = ctx
            .user_id
            .as_ref()
            .and_then(|id| self.users.get(id))
            .and_then(|flags| flags.get(key));

        match user_value {
            Some(enabled) => *enabled,
            None => self.defaults.get(key).copied().unwrap_or(false),
        }
    }
}
