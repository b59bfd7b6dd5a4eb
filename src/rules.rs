// 🏷️ Plan Visibility Rules - Rules as Data
// Ordered predicates deciding which catalog plans a request may see,
// plus the legacy-year annotation applied to the survivors.

use crate::catalog::PlanCatalog;
use crate::entities::{Plan, PlanType, ProductType};

/// Highest plan type that predates the 2023 plan upgrade
pub const LEGACY_PLAN_THRESHOLD: PlanType = PlanType::EnterpriseAnnually2020;

/// Inclusive band of plan types that receive a legacy year annotation
pub const LEGACY_BAND: (PlanType, PlanType) =
    (PlanType::TeamsMonthly2020, PlanType::EnterpriseAnnually2020);

/// Legacy year shown on the 2020 plans once the upgrade is live
pub const UPGRADED_LEGACY_YEAR: u16 = 2023;

// ============================================================================
// FLAGS
// ============================================================================

/// Flag states a rule evaluation depends on, resolved once per request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanFlags {
    pub upgrade_enabled: bool,
    pub starter_enabled: bool,
}

impl PlanFlags {
    pub fn new(upgrade_enabled: bool, starter_enabled: bool) -> Self {
        PlanFlags {
            upgrade_enabled,
            starter_enabled,
        }
    }
}

// ============================================================================
// RULE DEFINITION
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct PlanRule {
    /// Rule name for logging
    pub name: &'static str,

    /// Returns true to keep the plan
    pub keep: fn(&Plan, &PlanFlags) -> bool,
}

/// Without the upgrade only pre-2023 plans and Teams Starter are offered
fn upgrade_gate(plan: &Plan, flags: &PlanFlags) -> bool {
    flags.upgrade_enabled
        || plan.plan_type <= LEGACY_PLAN_THRESHOLD
        || plan.plan_type == PlanType::TeamsStarter
}

/// Without the starter flag the Teams Starter product is hidden
fn starter_gate(plan: &Plan, flags: &PlanFlags) -> bool {
    flags.starter_enabled || plan.product != ProductType::TeamsStarter
}

pub const DEFAULT_RULES: [PlanRule; 2] = [
    PlanRule {
        name: "upgrade-gate",
        keep: upgrade_gate,
    },
    PlanRule {
        name: "starter-gate",
        keep: starter_gate,
    },
];

/// Rewrite the legacy year of plans in the legacy band; others are untouched
pub fn annotate_legacy_year(plan: &mut Plan, flags: &PlanFlags) {
    if !plan.type_between(LEGACY_BAND.0, LEGACY_BAND.1) {
        return;
    }

    plan.legacy_year = if flags.upgrade_enabled {
        Some(UPGRADED_LEGACY_YEAR)
    } else {
        None
    };
}

// ============================================================================
// RULE ENGINE
// ============================================================================

#[derive(Debug, Clone)]
pub struct PlanRuleEngine {
    rules: Vec<PlanRule>,
}

impl PlanRuleEngine {
    /// Create an engine with the given rules, evaluated in order
    pub fn from_rules(rules: Vec<PlanRule>) -> Self {
        PlanRuleEngine { rules }
    }

    pub fn rules(&self) -> &[PlanRule] {
        &self.rules
    }

    /// Name of the first rule rejecting the plan, or None if it is visible
    pub fn evaluate(&self, plan: &Plan, flags: &PlanFlags) -> Option<&'static str> {
        self.rules
            .iter()
            .find(|rule| !(rule.keep)(plan, flags))
            .map(|rule| rule.name)
    }

    pub fn is_visible(&self, plan: &Plan, flags: &PlanFlags) -> bool {
        self.evaluate(plan, flags).is_none()
    }

    /// Visible plans in catalog order, as annotated per-request copies
    pub fn visible(&self, catalog: &PlanCatalog, flags: &PlanFlags) -> Vec<Plan> {
        catalog
            .iter()
            .filter(|plan| match self.evaluate(plan, flags) {
                Some(rule) => {
                    tracing::trace!(plan = %plan.plan_type, rule, "plan hidden");
                    false
                }
                None => true,
            })
            .map(|plan| {
                let mut copy = plan.clone();
                annotate_legacy_year(&mut copy, flags);
                copy
            })
            .collect()
    }
}

impl Default for PlanRuleEngine {
    fn default() -> Self {
        PlanRuleEngine::from_rules(DEFAULT_RULES.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(plan_type: PlanType, product: ProductType) -> Plan {
        Plan::new(plan_type, product, plan_type.as_str(), false)
    }

    fn types(plans: &[Plan]) -> Vec<PlanType> {
        plans.iter().map(|p| p.plan_type).collect()
    }

    #[test]
    fn test_rules_run_in_order() {
        let engine = PlanRuleEngine::default();
        let names: Vec<_> = engine.rules().iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["upgrade-gate", "starter-gate"]);
    }

    #[test]
    fn test_evaluate_reports_first_rejecting_rule() {
        let engine = PlanRuleEngine::default();
        let flags = PlanFlags::new(false, false);

        let new_teams = plan(PlanType::TeamsMonthly, ProductType::Teams);
        assert_eq!(engine.evaluate(&new_teams, &flags), Some("upgrade-gate"));

        let starter = plan(PlanType::TeamsStarter, ProductType::TeamsStarter);
        assert_eq!(engine.evaluate(&starter, &flags), Some("starter-gate"));

        let old_teams = plan(PlanType::TeamsMonthly2020, ProductType::Teams);
        assert_eq!(engine.evaluate(&old_teams, &flags), None);
    }

    #[test]
    fn test_starter_type_passes_upgrade_gate() {
        let flags = PlanFlags::new(false, true);
        let starter = plan(PlanType::TeamsStarter, ProductType::TeamsStarter);
        assert!(PlanRuleEngine::default().is_visible(&starter, &flags));
    }

    #[test]
    fn test_starter_product_with_other_type_hidden_without_flag() {
        // A Teams Starter product on a legacy type passes the upgrade gate
        // but must still be caught by the starter gate.
        let flags = PlanFlags::new(false, false);
        let odd = plan(PlanType::TeamsMonthly2020, ProductType::TeamsStarter);
        assert_eq!(
            PlanRuleEngine::default().evaluate(&odd, &flags),
            Some("starter-gate")
        );
    }

    #[test]
    fn test_three_plan_catalog_without_flags() {
        let catalog = PlanCatalog::new(vec![
            plan(PlanType::Free, ProductType::Free),
            plan(PlanType::TeamsMonthly2020, ProductType::Teams),
            plan(PlanType::TeamsStarter, ProductType::TeamsStarter),
        ]);

        let visible = PlanRuleEngine::default().visible(&catalog, &PlanFlags::new(false, false));

        assert_eq!(types(&visible), vec![PlanType::Free, PlanType::TeamsMonthly2020]);
        assert_eq!(visible[1].legacy_year, None);
    }

    #[test]
    fn test_all_flag_combinations_against_standard_catalog() {
        let catalog = PlanCatalog::standard();
        let engine = PlanRuleEngine::default();

        for upgrade in [false, true] {
            for starter in [false, true] {
                let flags = PlanFlags::new(upgrade, starter);
                let visible = engine.visible(&catalog, &flags);

                let expected: Vec<PlanType> = catalog
                    .iter()
                    .filter(|p| {
                        (upgrade
                            || p.plan_type <= PlanType::EnterpriseAnnually2020
                            || p.plan_type == PlanType::TeamsStarter)
                            && (starter || p.product != ProductType::TeamsStarter)
                    })
                    .map(|p| p.plan_type)
                    .collect();

                assert_eq!(types(&visible), expected, "upgrade={} starter={}", upgrade, starter);

                if !starter {
                    assert!(visible.iter().all(|p| p.product != ProductType::TeamsStarter));
                }
            }
        }

        assert_eq!(engine.visible(&catalog, &PlanFlags::new(true, true)).len(), 17);
        assert_eq!(engine.visible(&catalog, &PlanFlags::new(false, false)).len(), 12);
        assert_eq!(engine.visible(&catalog, &PlanFlags::new(false, true)).len(), 13);
        assert_eq!(engine.visible(&catalog, &PlanFlags::new(true, false)).len(), 16);
    }

    #[test]
    fn test_legacy_year_band() {
        let catalog = PlanCatalog::standard();
        let engine = PlanRuleEngine::default();

        let off = engine.visible(&catalog, &PlanFlags::new(false, true));
        let on = engine.visible(&catalog, &PlanFlags::new(true, true));

        for p in off.iter().filter(|p| p.type_between(LEGACY_BAND.0, LEGACY_BAND.1)) {
            assert_eq!(p.legacy_year, None, "{}", p.plan_type);
        }
        for p in on.iter().filter(|p| p.type_between(LEGACY_BAND.0, LEGACY_BAND.1)) {
            assert_eq!(p.legacy_year, Some(2023), "{}", p.plan_type);
        }

        // Outside the band the catalog value is kept as is
        for p in off.iter().chain(on.iter()) {
            if !p.type_between(LEGACY_BAND.0, LEGACY_BAND.1) {
                assert_eq!(p.legacy_year, catalog.get(p.plan_type).unwrap().legacy_year);
            }
        }
    }

    #[test]
    fn test_annotate_overrides_existing_value_in_band() {
        let mut p = plan(PlanType::TeamsAnnually2020, ProductType::Teams);
        p.legacy_year = Some(1999);
        annotate_legacy_year(&mut p, &PlanFlags::new(false, false));
        assert_eq!(p.legacy_year, None);

        let mut outside = plan(PlanType::TeamsAnnually2019, ProductType::Teams);
        outside.legacy_year = Some(2020);
        annotate_legacy_year(&mut outside, &PlanFlags::new(true, false));
        assert_eq!(outside.legacy_year, Some(2020));
    }

    #[test]
    fn test_visible_never_mutates_catalog() {
        let catalog = PlanCatalog::standard();
        let before: Vec<Plan> = catalog.plans().to_vec();
        let engine = PlanRuleEngine::default();

        engine.visible(&catalog, &PlanFlags::new(true, true));
        engine.visible(&catalog, &PlanFlags::new(false, false));

        assert_eq!(catalog.plans(), before.as_slice());
    }
}
