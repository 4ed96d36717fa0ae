//! End-to-end traversal scenarios.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use lineage_core::constants::TEMP_SENTINEL;
use lineage_core::errors::{HistoryError, LineageError, LineageResult};
use lineage_core::{Document, IDocumentStore, Link, Project, TraversalLimits, Value};
use lineage_history::{HistoryEngine, HistoryResult};
use lineage_store::DocumentStore;
use test_fixtures::{brick, init_tracing, t, ProjectBuilder};

fn used_ids(history: &HistoryResult) -> HashSet<String> {
    history.used().map(|p| p.brick.id.clone()).collect()
}

/// Temporal causality: no link may flow forward in time.
fn assert_causal(history: &HistoryResult) {
    for link in &history.links {
        if let (Some(src), Some(dst)) = (&link.src, &link.dst) {
            let src_time = history.registry[src].exec_time().unwrap();
            let dst_time = history.registry[dst].exec_time().unwrap();
            assert!(
                src_time <= dst_time,
                "link {link:?} flows forward in time"
            );
        }
    }
}

/// Links reference only used processes present in the registry.
fn assert_used_subset(history: &HistoryResult) {
    for link in &history.links {
        for endpoint in [&link.src, &link.dst].into_iter().flatten() {
            let process = history
                .registry
                .get(endpoint)
                .unwrap_or_else(|| panic!("link endpoint {endpoint} not in registry"));
            assert!(process.used, "link endpoint {endpoint} is unused");
        }
    }
}

#[test]
fn linear_history_end_to_end() {
    init_tracing();
    let project = ProjectBuilder::new()
        .tracked("raw/input.nii")
        .with_brick(
            brick("pre.brain_extraction")
                .id("B1")
                .input("in0", "raw/input.nii")
                .output("a_out", "sub/a.nii")
                .done_at(t(10)),
        )
        .with_brick(
            brick("pre.normalize")
                .id("B2")
                .input("in", "sub/a.nii")
                .output("out", "sub/b.nii")
                .done_at(t(20)),
        )
        .build();

    let history = HistoryEngine::new(&project).data_history("sub/b.nii").unwrap();

    assert_eq!(used_ids(&history), HashSet::from(["B1".into(), "B2".into()]));
    let expected: HashSet<Link> = HashSet::from([
        Link::from_boundary("in0", "B1"),
        Link::between("B1", "a_out", "B2", "in"),
        Link::to_boundary("B2", "out"),
    ]);
    assert_eq!(history.links, expected);
    assert_causal(&history);
    assert_used_subset(&history);
}

#[test]
fn overwritten_branch_is_dropped_from_the_used_set() {
    let project = ProjectBuilder::new()
        .tracked("raw/input.nii")
        .with_brick(
            brick("pre.legacy")
                .id("B0")
                .output("a_out", "sub/a.nii")
                .done_at(t(0)),
        )
        .with_brick(
            brick("pre.brain_extraction")
                .id("B1")
                .input("in0", "raw/input.nii")
                .output("a_out", "sub/a.nii")
                .done_at(t(10)),
        )
        .with_brick(
            brick("pre.normalize")
                .id("B2")
                .input("in", "sub/a.nii")
                .output("out", "sub/b.nii")
                .done_at(t(20)),
        )
        .build();

    let history = HistoryEngine::new(&project).data_history("sub/b.nii").unwrap();

    // B0 was overwritten at a.nii: fetched, but not part of the history.
    assert!(history.registry.contains_key("B0"));
    assert!(!history.registry["B0"].used);
    assert_eq!(used_ids(&history), HashSet::from(["B1".into(), "B2".into()]));
    assert!(history
        .links
        .iter()
        .all(|l| l.src.as_deref() != Some("B0") && l.dst.as_deref() != Some("B0")));
    assert_used_subset(&history);
}

/// A store wrapper counting brick-document fetches per identifier.
struct CountingStore {
    inner: DocumentStore,
    brick_fetches: Arc<Mutex<std::collections::HashMap<String, usize>>>,
}

impl IDocumentStore for CountingStore {
    fn has_document(&self, collection: &str, key: &str) -> LineageResult<bool> {
        self.inner.has_document(collection, key)
    }

    fn get_document(&self, collection: &str, key: &str) -> LineageResult<Option<Document>> {
        if collection == lineage_core::constants::BRICK_COLLECTION {
            *self
                .brick_fetches
                .lock()
                .unwrap()
                .entry(key.to_string())
                .or_insert(0) += 1;
        }
        self.inner.get_document(collection, key)
    }

    fn documents(
        &self,
        collection: &str,
        keys: Option<&[String]>,
        fields: Option<&[&str]>,
    ) -> LineageResult<Vec<Document>> {
        self.inner.documents(collection, keys, fields)
    }

    fn get_value(
        &self,
        collection: &str,
        key: &str,
        field: &str,
    ) -> LineageResult<Option<Value>> {
        self.inner.get_value(collection, key, field)
    }

    fn set_document(&self, collection: &str, key: &str, doc: &Document) -> LineageResult<()> {
        self.inner.set_document(collection, key, doc)
    }

    fn set_value(
        &self,
        collection: &str,
        key: &str,
        field: &str,
        value: &Value,
    ) -> LineageResult<()> {
        self.inner.set_value(collection, key, field, value)
    }
}

#[test]
fn diamond_dependencies_terminate_and_visit_once() {
    // A → B, A → C, B → D, C → D.
    let project = ProjectBuilder::new()
        .tracked("raw/seed.nii")
        .with_brick(
            brick("step.a")
                .id("A")
                .input("in", "raw/seed.nii")
                .output("out", "sub/a.nii")
                .done_at(t(0)),
        )
        .with_brick(
            brick("step.b")
                .id("B")
                .input("in", "sub/a.nii")
                .output("out", "sub/b.nii")
                .done_at(t(10)),
        )
        .with_brick(
            brick("step.c")
                .id("C")
                .input("in", "sub/a.nii")
                .output("out", "sub/c.nii")
                .done_at(t(10)),
        )
        .with_brick(
            brick("step.d")
                .id("D")
                .input("left", "sub/b.nii")
                .input("right", "sub/c.nii")
                .output("out", "sub/d.nii")
                .done_at(t(20)),
        )
        .build();

    // Rebuild the project around a counting store sharing the same data.
    let brick_fetches = Arc::new(Mutex::new(std::collections::HashMap::new()));
    let counting = CountingStore {
        inner: clone_store(&project),
        brick_fetches: Arc::clone(&brick_fetches),
    };
    let project = Project::new("/data/project", Box::new(counting));

    let history = HistoryEngine::new(&project).data_history("sub/d.nii").unwrap();

    assert_eq!(
        used_ids(&history),
        HashSet::from(["A".into(), "B".into(), "C".into(), "D".into()])
    );
    let expected: HashSet<Link> = HashSet::from([
        Link::from_boundary("in", "A"),
        Link::between("A", "out", "B", "in"),
        Link::between("A", "out", "C", "in"),
        Link::between("B", "out", "D", "left"),
        Link::between("C", "out", "D", "right"),
        Link::to_boundary("D", "out"),
    ]);
    assert_eq!(history.links, expected);
    assert_causal(&history);
    assert_used_subset(&history);

    // The shared ancestor was fetched exactly once despite being reachable
    // from both branches.
    assert_eq!(brick_fetches.lock().unwrap()["A"], 1);
}

/// Copy every document of a built project's store into a fresh one.
fn clone_store(project: &Project) -> DocumentStore {
    let fresh = DocumentStore::open_in_memory().unwrap();
    for collection in [
        lineage_core::constants::CURRENT_COLLECTION,
        lineage_core::constants::BRICK_COLLECTION,
    ] {
        for mut doc in project.store().documents(collection, None, None).unwrap() {
            let key = doc
                .shift_remove(lineage_core::constants::KEY_FIELD)
                .and_then(|v| v.as_text().map(str::to_string))
                .unwrap();
            fresh.set_document(collection, &key, &doc).unwrap();
        }
    }
    fresh
}

#[test]
fn fresh_external_input_becomes_a_boundary_link() {
    let project = ProjectBuilder::new()
        .tracked("raw/external.nii")
        .with_brick(
            brick("step.only")
                .id("P")
                .input("in", "raw/external.nii")
                .output("out", "sub/out.nii")
                .done_at(t(10)),
        )
        .build();

    let history = HistoryEngine::new(&project).data_history("sub/out.nii").unwrap();

    let boundary: Vec<&Link> = history
        .links
        .iter()
        .filter(|l| l.src.is_none())
        .collect();
    assert_eq!(boundary, vec![&Link::from_boundary("in", "P")]);
}

#[test]
fn in_place_modification_is_a_boundary_not_a_self_loop() {
    let project = ProjectBuilder::new()
        .with_brick(
            brick("step.inplace")
                .id("M")
                .input("io", "sub/x.nii")
                .output("io_out", "sub/x.nii")
                .done_at(t(10)),
        )
        .build();

    let history = HistoryEngine::new(&project).data_history("sub/x.nii").unwrap();

    assert_eq!(used_ids(&history), HashSet::from(["M".into()]));
    let expected: HashSet<Link> = HashSet::from([
        Link::from_boundary("io", "M"),
        Link::to_boundary("M", "io_out"),
    ]);
    assert_eq!(history.links, expected);
}

#[test]
fn tied_seeds_are_both_kept() {
    let project = ProjectBuilder::new()
        .with_brick(
            brick("batch.left")
                .id("L")
                .output("out", "sub/s.nii")
                .done_at(t(10)),
        )
        .with_brick(
            brick("batch.right")
                .id("R")
                .output("out", "sub/s.nii")
                .done_at(t(10)),
        )
        .build();

    let history = HistoryEngine::new(&project).data_history("sub/s.nii").unwrap();

    assert_eq!(used_ids(&history), HashSet::from(["L".into(), "R".into()]));
    assert!(history.links.contains(&Link::to_boundary("L", "out")));
    assert!(history.links.contains(&Link::to_boundary("R", "out")));
}

#[test]
fn temp_dependency_is_resolved_and_walked() {
    let project = ProjectBuilder::new()
        .tracked("raw/seed.nii")
        .with_brick(
            brick("gen.scratch")
                .id("A")
                .input("src", "raw/seed.nii")
                .output("out", "sub/out.nii")
                .output("scratch", TEMP_SENTINEL)
                .done_at(t(10)),
        )
        .with_brick(
            brick("use.scratch")
                .id("P")
                .input("work", TEMP_SENTINEL)
                .output("out", "sub/out.nii")
                .done_at(t(20)),
        )
        .build();

    let history = HistoryEngine::new(&project).data_history("sub/out.nii").unwrap();

    assert_eq!(used_ids(&history), HashSet::from(["A".into(), "P".into()]));
    let expected: HashSet<Link> = HashSet::from([
        Link::between("A", "scratch", "P", "work"),
        Link::from_boundary("src", "A"),
        Link::to_boundary("P", "out"),
    ]);
    assert_eq!(history.links, expected);
    assert_causal(&history);
}

#[test]
fn untracked_filename_yields_an_empty_result() {
    let project = ProjectBuilder::new().build();
    let history = HistoryEngine::new(&project).data_history("nope.nii").unwrap();
    assert!(history.registry.is_empty());
    assert!(history.links.is_empty());
    assert!(!history.has_history());
}

#[test]
fn file_with_no_recorded_bricks_has_no_history() {
    let project = ProjectBuilder::new().tracked("raw/input.nii").build();
    let history = HistoryEngine::new(&project)
        .data_history("raw/input.nii")
        .unwrap();
    assert!(!history.has_history());
}

#[test]
fn traversal_ceiling_is_enforced() {
    let project = ProjectBuilder::new()
        .tracked("raw/seed.nii")
        .with_brick(
            brick("step.a")
                .id("A")
                .input("in", "raw/seed.nii")
                .output("out", "sub/a.nii")
                .done_at(t(0)),
        )
        .with_brick(
            brick("step.b")
                .id("B")
                .input("in", "sub/a.nii")
                .output("out", "sub/b.nii")
                .done_at(t(10)),
        )
        .build();

    let engine = HistoryEngine::with_limits(&project, TraversalLimits { max_processes: 1 });
    let result = engine.data_history("sub/b.nii");
    assert!(matches!(
        result,
        Err(LineageError::History(HistoryError::TraversalCeiling {
            max_processes: 1
        }))
    ));
}
