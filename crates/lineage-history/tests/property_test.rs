//! Property tests for the traversal engine.

use proptest::prelude::*;

use lineage_history::HistoryEngine;
use test_fixtures::{brick, t, ProjectBuilder};

proptest! {
    /// A linear chain of any depth reconstructs completely: every step is
    /// used, interior links connect consecutive steps, and exactly two
    /// boundary links frame the chain.
    #[test]
    fn chain_history_is_complete(depth in 1usize..6) {
        let mut builder = ProjectBuilder::new().tracked("f0.nii");
        for i in 1..=depth {
            builder = builder.with_brick(
                brick(&format!("chain.step{i}"))
                    .id(&format!("B{i}"))
                    .input("in", format!("f{}.nii", i - 1))
                    .output("out", format!("f{i}.nii"))
                    .done_at(t(10 * i as i64)),
            );
        }
        let project = builder.build();

        let history = HistoryEngine::new(&project)
            .data_history(&format!("f{depth}.nii"))
            .unwrap();

        prop_assert_eq!(history.used().count(), depth);

        let interior = history.links.iter().filter(|l| !l.is_boundary()).count();
        let boundary = history.links.iter().filter(|l| l.is_boundary()).count();
        prop_assert_eq!(interior, depth - 1);
        prop_assert_eq!(boundary, 2);

        // Temporal causality over every interior link.
        for link in &history.links {
            if let (Some(src), Some(dst)) = (&link.src, &link.dst) {
                let src_time = history.registry[src].exec_time().unwrap();
                let dst_time = history.registry[dst].exec_time().unwrap();
                prop_assert!(src_time <= dst_time);
            }
        }
    }

    /// Querying any file of the chain reconstructs exactly its prefix.
    #[test]
    fn chain_prefix_is_reconstructed(depth in 2usize..6, query in 1usize..5) {
        let query = query.min(depth);
        let mut builder = ProjectBuilder::new().tracked("f0.nii");
        for i in 1..=depth {
            builder = builder.with_brick(
                brick(&format!("chain.step{i}"))
                    .id(&format!("B{i}"))
                    .input("in", format!("f{}.nii", i - 1))
                    .output("out", format!("f{i}.nii"))
                    .done_at(t(10 * i as i64)),
            );
        }
        let project = builder.build();

        let history = HistoryEngine::new(&project)
            .data_history(&format!("f{query}.nii"))
            .unwrap();

        // Steps after the queried file cannot appear: the traversal only
        // walks backward in time.
        prop_assert_eq!(history.used().count(), query);
        for process in history.used() {
            let index: usize = process.brick.id[1..].parse().unwrap();
            prop_assert!(index <= query);
        }
    }
}
