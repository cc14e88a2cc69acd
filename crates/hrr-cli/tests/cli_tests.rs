//! End-to-end tests of the `hrr` subcommands against a temporary project.

use hrr_cli::{build_cli, run};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;

const SCRIPT: &str = "scripts/scr_move.gml";
const STEP: &str = "objects/obj_player/step.gml";

struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("scripts")).unwrap();
        std::fs::create_dir_all(root.join("objects/obj_player")).unwrap();
        std::fs::write(root.join(SCRIPT), "function scr_move() { x += 1; }").unwrap();
        std::fs::write(root.join(STEP), "scr_move();").unwrap();

        let manifest = json!({
            "occurrences": {
                "proj/script/scr_move": [
                    { "path": SCRIPT, "start": 9, "end": 17, "kind": "definition" },
                    { "path": STEP, "start": 0, "end": 8, "kind": "reference", "scope_id": "obj_player" }
                ]
            },
            "bindings": [
                { "name": "scr_jump", "scope_id": "obj_player", "symbol_id": "proj/script/scr_jump" }
            ],
            "dependents": {
                "proj/script/scr_move": [
                    { "symbol_id": "proj/event/obj_player/step", "file_path": STEP }
                ]
            },
            "reserved_words": ["player"],
            "file_symbols": {
                SCRIPT: ["proj/script/scr_walk"],
                STEP: ["proj/event/obj_player/step"]
            }
        });
        std::fs::write(
            root.join("manifest.json"),
            serde_json::to_string_pretty(&manifest).unwrap(),
        )
        .unwrap();
        Self { dir }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.root().join(path)).unwrap()
    }

    async fn hrr(&self, args: &[&str]) -> anyhow::Result<Value> {
        let manifest = self.root().join("manifest.json");
        let config = self.root().join("hrr.toml");
        let mut argv = vec![
            "hrr".to_string(),
            "--manifest".to_string(),
            manifest.display().to_string(),
            "--root".to_string(),
            self.root().display().to_string(),
            "--config".to_string(),
            config.display().to_string(),
        ];
        argv.extend(args.iter().map(|a| (*a).to_string()));
        let matches = build_cli().try_get_matches_from(argv)?;
        run(&matches).await
    }
}

#[tokio::test]
async fn plan_lists_one_edit_per_occurrence() {
    let project = Project::new();
    let plan = project
        .hrr(&["plan", "proj/script/scr_move", "scr_walk"])
        .await
        .unwrap();

    assert_eq!(plan["old_name"], "scr_move");
    assert_eq!(plan["new_name"], "scr_walk");
    assert_eq!(project.read(STEP), "scr_move();");
}

#[tokio::test]
async fn apply_rewrites_files_and_prepares_reload() {
    let project = Project::new();
    let outcome = project
        .hrr(&["apply", "proj/script/scr_move", "scr_walk"])
        .await
        .unwrap();

    assert_eq!(project.read(SCRIPT), "function scr_walk() { x += 1; }");
    assert_eq!(project.read(STEP), "scr_walk();");
    assert_eq!(outcome["applied"]["written"], true);
    assert_eq!(outcome["integrity"]["valid"], true);

    let updates = outcome["hot_reload"]["updates"].as_array().unwrap();
    assert_eq!(updates[0]["symbol_id"], "proj/script/scr_walk");
    assert_eq!(outcome["hot_reload"]["patches"][0]["kind"], "script");
}

#[tokio::test]
async fn dry_run_leaves_disk_alone() {
    let project = Project::new();
    let outcome = project
        .hrr(&["apply", "proj/script/scr_move", "scr_walk", "--dry-run"])
        .await
        .unwrap();

    assert_eq!(project.read(STEP), "scr_move();");
    assert_eq!(outcome["applied"]["written"], false);
    assert_eq!(outcome["applied"]["files"][STEP], "scr_walk();");
    assert!(outcome["hot_reload"].is_null());
}

#[tokio::test]
async fn reserved_name_is_an_error() {
    let project = Project::new();
    let err = project
        .hrr(&["apply", "proj/script/scr_move", "Player"])
        .await
        .unwrap_err();

    assert!(err.to_string().contains("conflict"), "{err:#}");
    assert_eq!(project.read(STEP), "scr_move();");
}

#[tokio::test]
async fn shadowing_name_is_an_error() {
    let project = Project::new();
    let err = project
        .hrr(&["plan", "proj/script/scr_move", "scr_jump"])
        .await
        .unwrap_err();
    let rename = err.downcast_ref::<hrr_core::RenameError>().unwrap();
    assert_eq!(rename.conflicts()[0].kind, hrr_core::ConflictKind::Shadow);
}

#[tokio::test]
async fn cascade_orders_dependents_after_changes() {
    let project = Project::new();
    let cascade = project
        .hrr(&["cascade", "proj/script/scr_move"])
        .await
        .unwrap();

    assert_eq!(
        cascade["order"],
        json!(["proj/script/scr_move", "proj/event/obj_player/step"])
    );
    assert_eq!(cascade["metadata"]["has_circular"], false);
}

#[tokio::test]
async fn impact_and_safety_do_not_write() {
    let project = Project::new();
    let impact = project
        .hrr(&["impact", "proj/script/scr_move", "scr_walk"])
        .await
        .unwrap();
    assert_eq!(impact["valid"], true);
    assert_eq!(impact["summary"]["total_occurrences"], 2);
    assert_eq!(impact["summary"]["dependent_symbols"], 1);

    let safety = project
        .hrr(&["safety", "proj/script/scr_move", "scr_walk"])
        .await
        .unwrap();
    assert_eq!(safety["safe"], true);
    assert_eq!(project.read(SCRIPT), "function scr_move() { x += 1; }");
}

#[tokio::test]
async fn batch_apply_writes_merged_edit() {
    let project = Project::new();
    let result = project
        .hrr(&["batch", "--rename", "proj/script/scr_move=scr_walk", "--apply"])
        .await
        .unwrap();

    assert_eq!(result["applied"]["written"], true);
    assert_eq!(project.read(STEP), "scr_walk();");

    let integrity = result["integrity"].as_array().unwrap();
    assert_eq!(integrity.len(), 1);
    assert_eq!(integrity[0]["symbol_id"], "proj/script/scr_move");
    assert_eq!(integrity[0]["report"]["valid"], true);
    assert_eq!(integrity[0]["report"]["files_checked"], 2);
}

#[tokio::test]
async fn batch_dry_run_skips_integrity() {
    let project = Project::new();
    let result = project
        .hrr(&[
            "batch",
            "--rename",
            "proj/script/scr_move=scr_walk",
            "--apply",
            "--dry-run",
        ])
        .await
        .unwrap();

    assert_eq!(result["applied"]["written"], false);
    assert!(result["integrity"].is_null());
    assert_eq!(project.read(STEP), "scr_move();");
}

#[tokio::test]
async fn verify_reports_leftovers() {
    let project = Project::new();
    let report = project
        .hrr(&["verify", "proj/script/scr_move", "scr_walk", STEP])
        .await
        .unwrap();

    assert_eq!(report["valid"], false);
    assert_eq!(report["files_checked"], 1);
}

#[tokio::test]
async fn locate_finds_symbol_under_offset() {
    let project = Project::new();
    let found = project.hrr(&["locate", STEP, "3"]).await.unwrap();
    assert_eq!(found["symbol_id"], "proj/script/scr_move");
}

#[tokio::test]
async fn malformed_config_is_reported() {
    let project = Project::new();
    std::fs::write(project.root().join("hrr.toml"), "max_edits_per_file = \"many\"").unwrap();
    let err = project
        .hrr(&["plan", "proj/script/scr_move", "scr_walk"])
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("hrr.toml"));
}
