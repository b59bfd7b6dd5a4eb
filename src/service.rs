// 🗂️ Plan Catalog Service - Plans and sales tax rates for the billing pages
//
// Stateless: every call reads the shared catalog / store and builds fresh
// response records.

use crate::catalog::PlanCatalog;
use crate::db::TaxRateStore;
use crate::error::Result;
use crate::flags::{FeatureFlagEvaluator, RequestContext, BILLING_PLANS_UPGRADE, BILLING_STARTER_PLAN};
use crate::responses::{ListResponse, PlanResponse, TaxRateResponse};
use crate::rules::{PlanFlags, PlanRuleEngine};
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Clone)]
pub struct PlanCatalogService {
    catalog: PlanCatalog,
    rules: PlanRuleEngine,
    flags: Arc<dyn FeatureFlagEvaluator>,
    tax_rates: Arc<dyn TaxRateStore>,
}

impl PlanCatalogService {
    pub fn new(
        catalog: PlanCatalog,
        flags: Arc<dyn FeatureFlagEvaluator>,
        tax_rates: Arc<dyn TaxRateStore>,
    ) -> Self {
        PlanCatalogService {
            catalog,
            rules: PlanRuleEngine::default(),
            flags,
            tax_rates,
        }
    }

    /// Replace the default visibility rules
    pub fn with_rules(mut self, rules: PlanRuleEngine) -> Self {
        self.rules = rules;
        self
    }

    pub fn catalog(&self) -> &PlanCatalog {
        &self.catalog
    }

    /// Resolve the plan flags for one request
    pub fn plan_flags(&self, ctx: &RequestContext) -> PlanFlags {
        PlanFlags::new(
            self.flags.is_enabled(BILLING_PLANS_UPGRADE, ctx),
            self.flags.is_enabled(BILLING_STARTER_PLAN, ctx),
        )
    }

    /// Plans visible to this request, in catalog order
    pub fn list_plans(&self, ctx: &RequestContext) -> ListResponse<PlanResponse> {
        let flags = self.plan_flags(ctx);
        let plans = self.rules.visible(&self.catalog, &flags);

        debug!(
            upgrade = flags.upgrade_enabled,
            starter = flags.starter_enabled,
            visible = plans.len(),
            "listing plans"
        );

        plans.into_iter().map(PlanResponse::from).collect()
    }

    /// All active tax rates. Store failures are returned unchanged.
    pub async fn list_tax_rates(&self) -> Result<ListResponse<TaxRateResponse>> {
        let rates = self.tax_rates.get_all_active().await.map_err(|e| {
            error!(error = %e, "failed to load active tax rates");
            e
        })?;

        debug!(count = rates.len(), "listing tax rates");

        Ok(rates.into_iter().map(TaxRateResponse::from).collect())
    }
}
