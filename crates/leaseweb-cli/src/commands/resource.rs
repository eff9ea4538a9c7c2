use crate::{input, output};
use colored::Colorize;
use leaseweb_framework::{Context, ProviderServer};
use serde_json::Value;
use std::path::Path;
use tracing::info;

pub fn validate(server: &ProviderServer, type_name: &str, config: &Path) -> anyhow::Result<()> {
    let config = input::read_json(config)?;
    let diags = if server.data_source_types().any(|t| t == type_name) {
        server.validate_data_source_config(type_name, &config)
    } else {
        server.validate_resource_config(type_name, &config)
    };
    output::report(&diags)?;
    eprintln!("{}", "✓ Configuration is valid".green());
    Ok(())
}

pub async fn plan(
    server: &ProviderServer,
    ctx: &Context,
    type_name: &str,
    config: &Path,
    state: Option<&Path>,
) -> anyhow::Result<()> {
    let config = input::read_json(config)?;
    let prior = input::read_state(state)?;

    let resp = server
        .plan_resource_change(ctx, type_name, prior.clone(), config)
        .await;
    output::report(&resp.diagnostics)?;

    describe_action(&prior, &resp.planned_state, &resp.requires_replace);
    output::emit(&resp.planned_state, None)
}

pub async fn apply(
    server: &ProviderServer,
    ctx: &Context,
    type_name: &str,
    config: &Path,
    state: Option<&Path>,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let config = input::read_json(config)?;
    let mut prior = input::read_state(state)?;

    let mut plan = server
        .plan_resource_change(ctx, type_name, prior.clone(), config.clone())
        .await;
    output::report(&plan.diagnostics)?;
    describe_action(&prior, &plan.planned_state, &plan.requires_replace);

    if !plan.requires_replace.is_empty() {
        info!(type_name, "Destroying before re-create");
        let destroyed = server
            .apply_resource_change(ctx, type_name, prior, Value::Null, Value::Null)
            .await;
        output::report(&destroyed.diagnostics)?;

        prior = Value::Null;
        plan = server
            .plan_resource_change(ctx, type_name, Value::Null, config.clone())
            .await;
        output::report(&plan.diagnostics)?;
    }

    let resp = server
        .apply_resource_change(ctx, type_name, prior, plan.planned_state, config)
        .await;
    output::report(&resp.diagnostics)?;
    output::emit(&resp.state, out)
}

pub async fn read(
    server: &ProviderServer,
    ctx: &Context,
    type_name: &str,
    state: &Path,
) -> anyhow::Result<()> {
    let state = input::read_json(state)?;

    let resp = server.read_resource(ctx, type_name, state).await;
    output::report(&resp.diagnostics)?;
    if resp.state.is_null() {
        eprintln!("{}", "! Object no longer exists upstream".yellow());
    }
    output::emit(&resp.state, None)
}

pub async fn import(
    server: &ProviderServer,
    ctx: &Context,
    type_name: &str,
    id: &str,
) -> anyhow::Result<()> {
    info!(type_name, id, "Importing");

    let resp = server.import_resource_state(ctx, type_name, id).await;
    output::report(&resp.diagnostics)?;
    output::emit(&resp.state, None)
}

fn describe_action(
    prior: &Value,
    planned: &Value,
    requires_replace: &[leaseweb_framework::AttributePath],
) {
    let action = match (prior.is_null(), planned.is_null()) {
        (true, true) => "no-op".normal(),
        (true, false) => "create".green(),
        (false, true) => "destroy".red(),
        (false, false) if !requires_replace.is_empty() => "replace".red(),
        (false, false) if prior == planned => "no-op".normal(),
        (false, false) => "update".yellow(),
    };
    eprintln!("{} {}", "Plan:".bold(), action);
    for path in requires_replace {
        eprintln!("  {} {}", "forces replacement:".dimmed(), path);
    }
}
