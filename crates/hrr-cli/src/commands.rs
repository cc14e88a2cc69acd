//! Subcommand handlers
//!
//! Every handler returns a JSON value; `main` prints it. Engine errors
//! propagate as `anyhow` errors with the engine's message as context.

use crate::manifest::ManifestAnalyzer;
use crate::store::DiskStore;
use anyhow::{anyhow, bail, Context as _};
use clap::ArgMatches;
use hrr_core::{ApplyOptions, EngineConfig, RenameEngine, RenameRequest, SymbolId};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;

/// Engine and store assembled from the global flags
struct Session {
    engine: RenameEngine,
    store: DiskStore,
}

impl Session {
    async fn open(args: &ArgMatches) -> anyhow::Result<Self> {
        let manifest = path_arg(args, "manifest")?;
        let root = path_arg(args, "root")?;
        let config_path = path_arg(args, "config")?;

        let config = EngineConfig::load(&config_path)
            .with_context(|| format!("loading {}", config_path.display()))?;
        let analyzer = ManifestAnalyzer::load(&manifest)
            .await
            .with_context(|| format!("loading {}", manifest.display()))?;

        tracing::info!(
            manifest = %manifest.display(),
            root = %root.display(),
            symbols = analyzer.symbol_count(),
            "session opened"
        );

        Ok(Self {
            engine: RenameEngine::new(Arc::new(analyzer)).with_config(config),
            store: DiskStore::new(root),
        })
    }
}

fn path_arg(args: &ArgMatches, name: &str) -> anyhow::Result<PathBuf> {
    args.get_one::<PathBuf>(name)
        .cloned()
        .ok_or_else(|| anyhow!("missing --{name}"))
}

fn str_arg<'a>(args: &'a ArgMatches, name: &str) -> anyhow::Result<&'a str> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing <{name}>"))
}

fn request_arg(args: &ArgMatches) -> anyhow::Result<RenameRequest> {
    Ok(RenameRequest::parse(
        str_arg(args, "symbol")?,
        str_arg(args, "new-name")?,
    )?)
}

/// Parse a `SYMBOL=NAME` pair
///
/// # Errors
/// Fails when the `=` is missing or the symbol id is malformed.
pub fn parse_rename_pair(pair: &str) -> anyhow::Result<RenameRequest> {
    let (symbol, name) = pair
        .rsplit_once('=')
        .ok_or_else(|| anyhow!("expected SYMBOL=NAME, got '{pair}'"))?;
    Ok(RenameRequest::parse(symbol, name)?)
}

fn to_json<T: Serialize>(value: &T) -> anyhow::Result<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Run the selected subcommand
///
/// # Errors
/// Returns any argument, manifest, configuration or engine error.
pub async fn run(matches: &ArgMatches) -> anyhow::Result<Value> {
    let Some((name, args)) = matches.subcommand() else {
        bail!("no subcommand given");
    };
    let session = Session::open(args).await?;
    let engine = &session.engine;

    match name {
        "plan" => to_json(&engine.plan_rename(&request_arg(args)?).await?),
        "apply" => {
            let request = request_arg(args)?;
            let outcome = engine
                .execute_rename(&request, &session.store, args.get_flag("dry-run"))
                .await?;
            to_json(&outcome)
        }
        "batch" => {
            let requests = args
                .get_many::<String>("rename")
                .into_iter()
                .flatten()
                .map(|pair| parse_rename_pair(pair))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let plan = engine.plan_batch_rename(&requests).await?;
            if !args.get_flag("apply") {
                return to_json(&plan);
            }

            let validation = engine.validate_rename(&plan.edit).await?;
            let options = if args.get_flag("dry-run") {
                ApplyOptions::dry_run()
            } else {
                ApplyOptions::write()
            };
            let applied = engine
                .apply_workspace_edit(&plan.edit, options, &session.store)
                .await?;
            if !applied.written {
                return Ok(json!({
                    "plan": to_json(&plan)?,
                    "validation": to_json(&validation)?,
                    "applied": to_json(&applied)?,
                }));
            }

            let mut integrity = Vec::with_capacity(plan.plans.len());
            for rename in &plan.plans {
                let edited: Vec<PathBuf> = rename.edit.files().into_iter().collect();
                let report = engine
                    .verify_post_edit_integrity(
                        &rename.symbol_id,
                        &rename.new_name,
                        &edited,
                        &session.store,
                    )
                    .await?;
                integrity.push(json!({
                    "symbol_id": rename.symbol_id,
                    "report": to_json(&report)?,
                }));
            }
            let hot_reload = engine
                .prepare_hot_reload(&plan.edit, &requests, &session.store)
                .await?;
            Ok(json!({
                "plan": to_json(&plan)?,
                "validation": to_json(&validation)?,
                "applied": to_json(&applied)?,
                "integrity": integrity,
                "hot_reload": to_json(&hot_reload)?,
            }))
        }
        "cascade" => {
            let symbols = args
                .get_many::<String>("symbols")
                .into_iter()
                .flatten()
                .map(|s| s.parse::<SymbolId>())
                .collect::<Result<Vec<_>, _>>()?;
            to_json(&engine.compute_hot_reload_cascade(&symbols).await?)
        }
        "safety" => to_json(&engine.check_hot_reload_safety(&request_arg(args)?).await?),
        "impact" => to_json(&engine.analyze_rename_impact(&request_arg(args)?).await?),
        "verify" => {
            let request = request_arg(args)?;
            let files: Vec<PathBuf> = args
                .get_many::<PathBuf>("files")
                .into_iter()
                .flatten()
                .cloned()
                .collect();
            let report = engine
                .verify_post_edit_integrity(
                    &request.symbol_id,
                    &request.new_name,
                    &files,
                    &session.store,
                )
                .await?;
            to_json(&report)
        }
        "locate" => {
            let file = path_arg(args, "file")?;
            let offset = args
                .get_one::<usize>("offset")
                .copied()
                .ok_or_else(|| anyhow!("missing <offset>"))?;
            let found = engine.symbol_at_position(&file, offset).await?;
            Ok(json!({ "path": file, "offset": offset, "symbol_id": found }))
        }
        other => bail!("unknown subcommand '{other}'"),
    }
}
