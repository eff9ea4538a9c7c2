//! Attribute plan modifiers

use crate::diag::Diagnostics;
use crate::path::AttributePath;
use crate::value;
use std::sync::Arc;

/// Input to a plan modifier, scoped to one attribute
pub struct PlanModifyRequest<'a> {
    pub path: &'a AttributePath,
    pub config: &'a serde_json::Value,
    /// Prior state value; null when the resource is being created.
    pub state: &'a serde_json::Value,
    pub plan: &'a serde_json::Value,
    /// The whole prior state is null.
    pub creating: bool,
}

/// Output of a plan modifier
#[derive(Debug, Clone)]
pub struct PlanModifyResponse {
    pub plan: serde_json::Value,
    pub requires_replace: bool,
}

/// Plan-time attribute modifier
pub trait PlanModifier: Send + Sync {
    fn description(&self) -> String;

    fn modify(
        &self,
        req: &PlanModifyRequest<'_>,
        resp: &mut PlanModifyResponse,
        diags: &mut Diagnostics,
    );
}

/// Destroy and recreate the resource when the attribute changes
pub struct RequiresReplace;

pub fn requires_replace() -> Arc<dyn PlanModifier> {
    Arc::new(RequiresReplace)
}

impl PlanModifier for RequiresReplace {
    fn description(&self) -> String {
        "If the value of this attribute changes, the resource will be replaced.".to_string()
    }

    fn modify(
        &self,
        req: &PlanModifyRequest<'_>,
        resp: &mut PlanModifyResponse,
        _diags: &mut Diagnostics,
    ) {
        if req.creating || resp.plan == *req.state {
            return;
        }
        resp.requires_replace = true;
    }
}

/// Replace only when the user explicitly set the attribute
pub struct RequiresReplaceIfConfigured;

pub fn requires_replace_if_configured() -> Arc<dyn PlanModifier> {
    Arc::new(RequiresReplaceIfConfigured)
}

impl PlanModifier for RequiresReplaceIfConfigured {
    fn description(&self) -> String {
        "If the value of this attribute is configured and changes, the resource will be replaced."
            .to_string()
    }

    fn modify(
        &self,
        req: &PlanModifyRequest<'_>,
        resp: &mut PlanModifyResponse,
        _diags: &mut Diagnostics,
    ) {
        if req.creating || req.config.is_null() || resp.plan == *req.state {
            return;
        }
        resp.requires_replace = true;
    }
}

/// Carry the prior state value forward instead of planning unknown
pub struct UseStateForUnknown;

pub fn use_state_for_unknown() -> Arc<dyn PlanModifier> {
    Arc::new(UseStateForUnknown)
}

impl PlanModifier for UseStateForUnknown {
    fn description(&self) -> String {
        "Once set, the value of this attribute in state will not change.".to_string()
    }

    fn modify(
        &self,
        req: &PlanModifyRequest<'_>,
        resp: &mut PlanModifyResponse,
        _diags: &mut Diagnostics,
    ) {
        if req.creating || req.state.is_null() {
            return;
        }
        if !value::is_unknown(&resp.plan) || value::is_unknown(req.config) {
            return;
        }
        resp.plan = req.state.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(
        modifier: &Arc<dyn PlanModifier>,
        config: serde_json::Value,
        state: serde_json::Value,
        plan: serde_json::Value,
        creating: bool,
    ) -> PlanModifyResponse {
        let path = AttributePath::root("attr");
        let mut resp = PlanModifyResponse {
            plan: plan.clone(),
            requires_replace: false,
        };
        modifier.modify(
            &PlanModifyRequest {
                path: &path,
                config: &config,
                state: &state,
                plan: &plan,
                creating,
            },
            &mut resp,
            &mut Diagnostics::new(),
        );
        resp
    }

    #[test]
    fn test_requires_replace() {
        let m = requires_replace();
        let changed = run(&m, json!("b"), json!("a"), json!("b"), false);
        assert!(changed.requires_replace);

        let same = run(&m, json!("a"), json!("a"), json!("a"), false);
        assert!(!same.requires_replace);

        let create = run(&m, json!("b"), json!(null), json!("b"), true);
        assert!(!create.requires_replace);
    }

    #[test]
    fn test_requires_replace_if_configured() {
        let m = requires_replace_if_configured();
        let unset = run(&m, json!(null), json!("app"), json!(null), false);
        assert!(!unset.requires_replace);

        let set = run(&m, json!("other"), json!("app"), json!("other"), false);
        assert!(set.requires_replace);
    }

    #[test]
    fn test_use_state_for_unknown() {
        let m = use_state_for_unknown();
        let unknown = value::unknown();

        let kept = run(&m, json!(null), json!("id-1"), unknown.clone(), false);
        assert_eq!(kept.plan, json!("id-1"));

        let create = run(&m, json!(null), json!(null), unknown.clone(), true);
        assert_eq!(create.plan, unknown);

        let known = run(&m, json!(null), json!("id-1"), json!("id-2"), false);
        assert_eq!(known.plan, json!("id-2"));
    }
}
