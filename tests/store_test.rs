//! Integration tests for the store layer: the typed item store and the
//! three per-category index structures working over one write stream.

use pretty_assertions::assert_eq;

use reasoning_store::store::{
    Category, DecisionData, KeywordIndex, Payload, SequentialStore, ThoughtData, TypedItemStore,
    VisualData, VisualElement, VisualOperation, VisualStore,
};

fn thought(n: u32) -> ThoughtData {
    ThoughtData::new(format!("step {}", n), n, 4, true)
}

mod ordering_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_branches_interleave_in_global_order() {
        // Thoughts 1..3 on the main line, 2 and 4 on branch "b".
        let mut store = SequentialStore::new();
        store.add(thought(1));
        store.add(thought(2).with_branch("b", 1));
        store.add(thought(3));
        store.add(thought(4).with_branch("b", 1));

        let global: Vec<u32> = store.get_all().iter().map(|t| t.thought_number).collect();
        assert_eq!(global, vec![1, 2, 3, 4]);

        let branch: Vec<u32> = store
            .get_branch("b")
            .iter()
            .map(|t| t.thought_number)
            .collect();
        assert_eq!(branch, vec![2, 4]);
    }

    #[test]
    fn test_revision_listed_and_kept_in_place() {
        let mut store = SequentialStore::new();
        store.add(thought(1));
        store.add(thought(2));
        store.add(thought(5).as_revision_of(2));

        let revisions: Vec<u32> = store
            .get_revisions(2)
            .iter()
            .map(|t| t.thought_number)
            .collect();
        assert_eq!(revisions, vec![5]);

        // The revision is grouped, not relocated: it still shows up in the
        // global ordering at its own sequence number.
        let global: Vec<u32> = store.get_all().iter().map(|t| t.thought_number).collect();
        assert_eq!(global, vec![1, 2, 5]);
    }
}

mod replay_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_diagram_fold_is_idempotent_over_prefix() {
        // Create n1, transform it, transform an unknown id (no-op), then
        // update that id (insert).
        let log = vec![
            VisualData::new(VisualOperation::Create, "d", "graph")
                .with_elements(vec![VisualElement::node("n1", "start")]),
            VisualData::new(VisualOperation::Transform, "d", "graph")
                .with_elements(vec![VisualElement::node("n1", "renamed")]),
            VisualData::new(VisualOperation::Transform, "d", "graph")
                .with_elements(vec![VisualElement::node("n2", "phantom")]),
            VisualData::new(VisualOperation::Update, "d", "graph")
                .with_elements(vec![VisualElement::node("n2", "real")]),
        ];

        let first = VisualStore::from_operations(log.clone());
        let second = VisualStore::from_operations(log.clone());
        assert_eq!(first.diagram_state("d"), second.diagram_state("d"));

        let state = first.diagram_state("d");
        let labels: Vec<&str> = state
            .iter()
            .map(|e| e.label.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(labels, vec!["renamed", "real"]);

        // Prefix up to the failed transform: n2 never appeared.
        let prefix = VisualStore::from_operations(log[..3].to_vec());
        let state = prefix.diagram_state("d");
        let ids: Vec<&str> = state.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["n1"]);
    }

    #[test]
    fn test_sequential_rebuild_equals_live_index() {
        let thoughts = vec![
            thought(1),
            thought(2).with_branch("alt", 1),
            thought(3).as_revision_of(1),
            thought(4).with_branch("alt", 1),
        ];

        let mut live = SequentialStore::new();
        for t in thoughts.clone() {
            live.add(t);
        }
        let rebuilt = SequentialStore::from_thoughts(thoughts);

        assert_eq!(rebuilt.get_all(), live.get_all());
        assert_eq!(rebuilt.get_branch("alt"), live.get_branch("alt"));
        assert_eq!(rebuilt.get_revisions(1), live.get_revisions(1));
    }
}

mod keyword_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_or_semantics_resolved_against_store() {
        let mut store = TypedItemStore::new();
        let mut index = KeywordIndex::new();

        let d1 = DecisionData::new("Should we migrate the database", "pros-cons", "dec-1");
        let d2 = DecisionData::new("Should we refactor the database layer", "pros-cons", "dec-2");
        for (id, decision) in [("a", d1), ("b", d2)] {
            index.index(id, &decision.decision_statement);
            store.insert(id, Payload::Decision(decision));
        }

        // Union of per-term matches: "migrate" only hits the first decision,
        // "layer" only the second; the query returns both.
        let ids = index.search("migrate layer");
        let decisions: Vec<&str> = ids
            .iter()
            .filter_map(|id| store.get(id))
            .map(|item| match &item.payload {
                Payload::Decision(d) => d.decision_id.as_str(),
                other => panic!("unexpected payload: {:?}", other),
            })
            .collect();
        assert_eq!(decisions, vec!["dec-1", "dec-2"]);
    }

    #[test]
    fn test_stale_ids_drop_silently() {
        let store = TypedItemStore::new();
        let mut index = KeywordIndex::new();
        index.index("ghost", "orphaned database entry");

        let resolved: Vec<_> = index
            .search("database")
            .iter()
            .filter_map(|id| store.get(id))
            .collect();
        assert!(resolved.is_empty());
    }
}

mod grouped_round_trip_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_export_import_preserves_category_multisets() {
        let mut store = TypedItemStore::new();
        store.insert("t-a", Payload::Thought(thought(1)));
        store.insert("t-b", Payload::Thought(thought(2)));
        store.insert(
            "d-a",
            Payload::Decision(DecisionData::new("ship it", "pros-cons", "dec-1")),
        );

        let exported = store.export_grouped();
        store.clear();
        store.import_grouped(exported.clone());

        assert_eq!(store.export_grouped(), exported);
        assert_eq!(store.count(Category::Thought), 2);
        assert_eq!(store.count(Category::Decision), 1);
        // Fresh ids are synthesized per (category, index).
        assert!(store.get("t-a").is_none());
        assert!(store.get("thought-0").is_some());
    }
}
