//! Functional tests for rename planning, conflict detection and batches.
//!
//! These tests drive the engine through stub collaborators only:
//! - plan_rename produces one edit per occurrence and nothing else
//! - reserved and shadow conflicts block, other conflicts do not
//! - plan_batch_rename rejects collisions and circular chains before planning

use hrr_core::{ConflictKind, RenameEngine, RenameError, RenameRequest};
use hrr_symbol::Occurrence;
use hrr_test_utils::{sid, StubAnalyzer};
use pretty_assertions::assert_eq;
use std::path::Path;
use std::sync::Arc;

fn engine(analyzer: StubAnalyzer) -> RenameEngine {
    RenameEngine::new(Arc::new(analyzer))
}

fn request(id: &str, new_name: &str) -> RenameRequest {
    RenameRequest::parse(id, new_name).unwrap()
}

fn scr_old_analyzer() -> StubAnalyzer {
    StubAnalyzer::new()
        .with_occurrences(
            "proj/script/scr_old",
            vec![
                Occurrence::definition("a.gml", 10, 17),
                Occurrence::reference("a.gml", 40, 47),
            ],
        )
        .with_lookup()
}

#[tokio::test]
async fn two_occurrences_yield_two_descending_edits() {
    let plan = engine(scr_old_analyzer())
        .plan_rename(&request("proj/script/scr_old", "scr_new"))
        .await
        .unwrap();

    assert_eq!(plan.edit.len(), 2);
    let grouped = plan.edit.group_by_file();
    let spans: Vec<_> = grouped[Path::new("a.gml")]
        .iter()
        .map(|e| (e.start, e.end))
        .collect();
    assert_eq!(spans, vec![(40, 47), (10, 17)]);
}

#[tokio::test]
async fn edit_set_matches_reported_occurrences_exactly() {
    let occurrences = vec![
        Occurrence::definition("scripts/scr_move.gml", 9, 17),
        Occurrence::reference("objects/obj_player/step.gml", 120, 128),
        Occurrence::reference("objects/obj_player/step.gml", 4, 12),
        Occurrence::reference("objects/obj_enemy/step.gml", 0, 8),
    ];
    let analyzer = StubAnalyzer::new()
        .with_occurrences("proj/script/scr_move", occurrences.clone())
        .with_lookup();

    let plan = engine(analyzer)
        .plan_rename(&request("proj/script/scr_move", "scr_walk"))
        .await
        .unwrap();

    let mut planned: Vec<_> = plan
        .edit
        .edits()
        .iter()
        .map(|e| (e.path.clone(), e.start, e.end))
        .collect();
    let mut expected: Vec<_> = occurrences
        .iter()
        .map(|o| (o.path.clone(), o.start, o.end))
        .collect();
    planned.sort();
    expected.sort();
    assert_eq!(planned, expected);
    assert_eq!(plan.edit.files().len(), 3);
}

#[tokio::test]
async fn if_conflicts_in_every_case() {
    let engine = engine(scr_old_analyzer());
    for name in ["if", "If", "IF", "iF"] {
        let err = engine
            .plan_rename(&request("proj/script/scr_old", name))
            .await
            .unwrap_err();
        assert!(err.is_conflict(), "{name} should conflict");
        assert!(err
            .conflicts()
            .iter()
            .any(|c| c.kind == ConflictKind::Reserved));
    }
}

#[tokio::test]
async fn shadow_and_reserved_are_reported_together() {
    let analyzer = StubAnalyzer::new()
        .with_occurrences(
            "proj/script/scr_old",
            vec![Occurrence::reference("a.gml", 0, 7).in_scope("obj_player")],
        )
        .with_keywords(&["scr_taken"])
        .with_binding("scr_taken", Some("obj_player"), "proj/script/scr_taken");

    let err = engine(analyzer)
        .plan_rename(&request("proj/script/scr_old", "scr_taken"))
        .await
        .unwrap_err();

    let kinds: Vec<_> = err.conflicts().iter().map(|c| c.kind).collect();
    assert_eq!(kinds, vec![ConflictKind::Shadow, ConflictKind::Reserved]);
}

#[tokio::test]
async fn shadow_lookup_runs_once_per_scope() {
    let analyzer = Arc::new(
        StubAnalyzer::new()
            .with_occurrences(
                "proj/var/obj_player/hp",
                vec![
                    Occurrence::definition("create.gml", 0, 2).in_scope("obj_player"),
                    Occurrence::reference("step.gml", 5, 7).in_scope("obj_player"),
                    Occurrence::reference("step.gml", 20, 22).in_scope("obj_player"),
                    Occurrence::reference("draw.gml", 8, 10),
                ],
            )
            .with_lookup(),
    );
    let engine = RenameEngine::new(analyzer.clone());

    engine
        .plan_rename(&request("proj/var/obj_player/hp", "health"))
        .await
        .unwrap();
    assert_eq!(analyzer.lookup_calls(), 2);
}

#[tokio::test]
async fn failing_lookup_is_informational() {
    let analyzer = StubAnalyzer::new()
        .with_occurrences(
            "proj/script/scr_old",
            vec![Occurrence::reference("a.gml", 0, 7)],
        )
        .failing("lookup");

    let plan = engine(analyzer)
        .plan_rename(&request("proj/script/scr_old", "scr_new"))
        .await
        .unwrap();
    assert_eq!(plan.edit.len(), 1);
    assert_eq!(plan.notices.len(), 1);
    assert_eq!(plan.notices[0].kind, ConflictKind::AnalysisError);
}

#[tokio::test]
async fn failing_occurrence_query_propagates() {
    let analyzer = StubAnalyzer::new()
        .with_symbol("proj/script/scr_old")
        .failing("get_symbol_occurrences");

    let err = engine(analyzer)
        .plan_rename(&request("proj/script/scr_old", "scr_new"))
        .await
        .unwrap_err();
    assert!(matches!(err, RenameError::Collaborator(_)));
}

#[tokio::test]
async fn circular_chain_names_every_member() {
    let analyzer = StubAnalyzer::new()
        .with_occurrences("proj/script/A", vec![Occurrence::definition("a.gml", 0, 1)])
        .with_occurrences("proj/script/B", vec![Occurrence::definition("b.gml", 0, 1)])
        .with_occurrences("proj/script/C", vec![Occurrence::definition("c.gml", 0, 1)]);
    let analyzer = Arc::new(analyzer);
    let engine = RenameEngine::new(analyzer.clone());

    let err = engine
        .plan_batch_rename(&[
            request("proj/script/A", "B"),
            request("proj/script/B", "C"),
            request("proj/script/C", "A"),
        ])
        .await
        .unwrap_err();

    let cycle = err.cycle().expect("circular rename error");
    for member in ["proj/script/A", "proj/script/B", "proj/script/C"] {
        assert!(cycle.contains(&sid(member)), "{member} missing from {cycle:?}");
    }
    assert_eq!(cycle.first(), cycle.last());
    assert_eq!(analyzer.occurrence_calls(), 0, "no rename may be planned");
}

#[tokio::test]
async fn collision_fails_before_planning() {
    let analyzer = Arc::new(
        StubAnalyzer::new()
            .with_occurrences("proj/script/A", vec![Occurrence::definition("a.gml", 0, 1)])
            .with_occurrences("proj/script/C", vec![Occurrence::definition("c.gml", 0, 1)]),
    );
    let engine = RenameEngine::new(analyzer.clone());

    let err = engine
        .plan_batch_rename(&[request("proj/script/A", "B"), request("proj/script/C", "B")])
        .await
        .unwrap_err();

    match err {
        RenameError::BatchCollision { new_name, symbols } => {
            assert_eq!(new_name, "B");
            assert_eq!(symbols, vec![sid("proj/script/A"), sid("proj/script/C")]);
        }
        other => panic!("expected BatchCollision, got {other:?}"),
    }
    assert_eq!(analyzer.occurrence_calls(), 0);
}

#[tokio::test]
async fn batch_merges_independent_renames() {
    let analyzer = StubAnalyzer::new()
        .with_occurrences(
            "proj/script/scr_a",
            vec![
                Occurrence::definition("a.gml", 0, 5),
                Occurrence::reference("shared.gml", 0, 5),
            ],
        )
        .with_occurrences(
            "proj/script/scr_b",
            vec![
                Occurrence::definition("b.gml", 0, 5),
                Occurrence::reference("shared.gml", 10, 15),
            ],
        )
        .with_lookup();

    let batch = engine(analyzer)
        .plan_batch_rename(&[
            request("proj/script/scr_a", "scr_alpha"),
            request("proj/script/scr_b", "scr_beta"),
        ])
        .await
        .unwrap();

    assert_eq!(batch.plans.len(), 2);
    assert_eq!(batch.edit.len(), 4);
    assert_eq!(batch.edit.edits_for(Path::new("shared.gml")).len(), 2);
    assert!(batch.edit.validate().is_ok());
}

#[tokio::test]
async fn batch_with_overlapping_plans_fails_validation() {
    let analyzer = StubAnalyzer::new()
        .with_occurrences("proj/script/scr_a", vec![Occurrence::reference("x.gml", 0, 10)])
        .with_occurrences("proj/script/scr_b", vec![Occurrence::reference("x.gml", 5, 15)]);

    let err = engine(analyzer)
        .plan_batch_rename(&[
            request("proj/script/scr_a", "scr_alpha"),
            request("proj/script/scr_b", "scr_beta"),
        ])
        .await
        .unwrap_err();
    assert!(matches!(err, RenameError::Edit(hrr_edit::EditError::Overlap { .. })));
}

#[tokio::test]
async fn batch_fails_as_a_whole_when_one_rename_conflicts() {
    let analyzer = StubAnalyzer::new()
        .with_occurrences("proj/script/scr_a", vec![Occurrence::reference("a.gml", 0, 5)])
        .with_occurrences("proj/script/scr_b", vec![Occurrence::reference("b.gml", 0, 5)]);

    let err = engine(analyzer)
        .plan_batch_rename(&[
            request("proj/script/scr_a", "scr_alpha"),
            request("proj/script/scr_b", "return"),
        ])
        .await
        .unwrap_err();
    assert!(err.is_conflict());
}
