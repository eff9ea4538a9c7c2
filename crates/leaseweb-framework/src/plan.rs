//! Config validation and plan computation
//!
//! Planning mirrors what the host expects of a provider:
//!
//! 1. The proposed state takes config values, except for computed attributes
//!    left null in config which keep their prior state value.
//! 2. If the resource is new or changing, computed attributes that are null
//!    in config become unknown.
//! 3. Attribute plan modifiers run, outermost attribute first.
//!
//! The resource's own `modify_plan` runs afterwards, in the server.

use crate::diag::Diagnostics;
use crate::path::AttributePath;
use crate::planmodifier::{PlanModifyRequest, PlanModifyResponse};
use crate::schema::{AttributeKind, Attributes, Schema};
use crate::validator::ValidateRequest;
use crate::value;
use serde_json::{Map, Value as Raw};

/// Outcome of planning a resource change
#[derive(Debug, Clone, PartialEq)]
pub struct PlanResult {
    pub planned_state: Raw,
    pub requires_replace: Vec<AttributePath>,
}

fn get<'a>(object: &'a Raw, name: &str) -> &'a Raw {
    static NULL: Raw = Raw::Null;
    object.get(name).unwrap_or(&NULL)
}

/// Validate a configuration object against a schema.
pub fn validate_config(schema: &Schema, config: &Raw) -> Diagnostics {
    let mut diags = Diagnostics::new();
    if config.is_null() {
        return diags;
    }
    validate_attributes(
        &schema.attributes,
        config,
        &AttributePath::empty(),
        config,
        &mut diags,
    );
    diags
}

fn validate_attributes(
    attributes: &Attributes,
    object: &Raw,
    path: &AttributePath,
    config: &Raw,
    diags: &mut Diagnostics,
) {
    for (name, attribute) in attributes {
        let child = path.at_name(name.clone());
        let raw = get(object, name);

        if attribute.required && raw.is_null() {
            diags.add_attribute_error(
                child.clone(),
                "Missing Configuration for Required Attribute",
                format!(
                    "Must set a configuration value for the {} attribute as the provider has marked it as required.",
                    child
                ),
            );
            continue;
        }

        if attribute.is_computed_only() && value::is_known(raw) {
            diags.add_attribute_error(
                child.clone(),
                "Invalid Configuration for Read-Only Attribute",
                format!(
                    "Cannot set value for the {} attribute as the provider has marked it as read-only. Remove the configuration line setting the value.",
                    child
                ),
            );
            continue;
        }

        if !value::is_known(raw) {
            continue;
        }

        for validator in &attribute.validators {
            validator.validate(
                &ValidateRequest {
                    path: &child,
                    value: raw,
                    config,
                },
                diags,
            );
        }

        match &attribute.kind {
            AttributeKind::SingleNested(nested) if raw.is_object() => {
                validate_attributes(nested, raw, &child, config, diags);
            }
            AttributeKind::ListNested(nested) => {
                if let Some(items) = raw.as_array() {
                    for (i, item) in items.iter().enumerate() {
                        if item.is_object() {
                            validate_attributes(nested, item, &child.at_index(i), config, diags);
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

/// Merge config with prior state into the proposed new state.
pub fn propose_new_state(schema: &Schema, prior: &Raw, config: &Raw) -> Raw {
    if config.is_null() {
        return Raw::Null;
    }
    propose_object(&schema.attributes, prior, config)
}

fn propose_object(attributes: &Attributes, prior: &Raw, config: &Raw) -> Raw {
    let mut out = Map::new();
    for (name, attribute) in attributes {
        let c = get(config, name);
        let p = get(prior, name);
        let proposed = match &attribute.kind {
            AttributeKind::SingleNested(nested) if c.is_object() => {
                propose_object(nested, p, c)
            }
            _ if attribute.computed && c.is_null() => p.clone(),
            _ => c.clone(),
        };
        out.insert(name.clone(), proposed);
    }
    Raw::Object(out)
}

fn mark_computed_nulls_unknown(attributes: &Attributes, plan: &mut Raw, config: &Raw) {
    let Some(object) = plan.as_object_mut() else {
        return;
    };
    for (name, attribute) in attributes {
        let c = get(config, name);
        let Some(planned) = object.get_mut(name) else {
            continue;
        };
        if attribute.computed && c.is_null() {
            *planned = value::unknown();
            continue;
        }
        if let (AttributeKind::SingleNested(nested), true) = (&attribute.kind, c.is_object()) {
            mark_computed_nulls_unknown(nested, planned, c);
        }
    }
}

struct ModifierScope<'a> {
    creating: bool,
    requires_replace: &'a mut Vec<AttributePath>,
    diags: &'a mut Diagnostics,
}

fn run_plan_modifiers(
    attributes: &Attributes,
    path: &AttributePath,
    config: &Raw,
    state: &Raw,
    plan: &mut Raw,
    scope: &mut ModifierScope<'_>,
) {
    let Some(object) = plan.as_object_mut() else {
        return;
    };
    for (name, attribute) in attributes {
        let child = path.at_name(name.clone());
        let c = get(config, name);
        let s = get(state, name);
        let Some(planned) = object.get_mut(name) else {
            continue;
        };

        let mut resp = PlanModifyResponse {
            plan: planned.clone(),
            requires_replace: false,
        };
        for modifier in &attribute.plan_modifiers {
            let current = resp.plan.clone();
            modifier.modify(
                &PlanModifyRequest {
                    path: &child,
                    config: c,
                    state: s,
                    plan: &current,
                    creating: scope.creating,
                },
                &mut resp,
                scope.diags,
            );
        }
        *planned = resp.plan;
        if resp.requires_replace {
            tracing::debug!(attribute = %child, "Attribute change requires replacement");
            scope.requires_replace.push(child.clone());
        }

        if let AttributeKind::SingleNested(nested) = &attribute.kind {
            if planned.is_object() {
                run_plan_modifiers(nested, &child, c, s, planned, scope);
            }
        }
    }
}

/// Compute the planned state for a resource change.
///
/// A null config plans destruction; modifiers do not run in that case.
pub fn plan_resource_change(
    schema: &Schema,
    prior: &Raw,
    config: &Raw,
    diags: &mut Diagnostics,
) -> PlanResult {
    if config.is_null() {
        return PlanResult {
            planned_state: Raw::Null,
            requires_replace: Vec::new(),
        };
    }

    let creating = prior.is_null();
    let mut planned = propose_new_state(schema, prior, config);
    if creating || planned != *prior {
        mark_computed_nulls_unknown(&schema.attributes, &mut planned, config);
    }

    let mut requires_replace = Vec::new();
    let mut scope = ModifierScope {
        creating,
        requires_replace: &mut requires_replace,
        diags,
    };
    run_plan_modifiers(
        &schema.attributes,
        &AttributePath::empty(),
        config,
        prior,
        &mut planned,
        &mut scope,
    );

    PlanResult {
        planned_state: planned,
        requires_replace,
    }
}
