//! Tests for category tags, payload records, and the typed item store.

use std::str::FromStr;

use serde_json::json;

use super::*;

fn thought(n: u32) -> Payload {
    Payload::Thought(ThoughtData::new(format!("step {}", n), n, 3, true))
}

fn decision(id: &str, statement: &str) -> Payload {
    Payload::Decision(DecisionData::new(statement, "weighted-criteria", id))
}

mod category_tests {
    use super::*;

    #[test]
    fn test_display_round_trips_through_from_str() {
        for category in Category::ALL {
            let tag = category.to_string();
            assert_eq!(Category::from_str(&tag).unwrap(), category);
        }
    }

    #[test]
    fn test_from_str_rejects_unknown_tags() {
        assert!(Category::from_str("telepathy").is_err());
        assert!(Category::from_str("").is_err());
    }

    #[test]
    fn test_serde_uses_snake_case_tags() {
        let json = serde_json::to_string(&Category::MentalModel).unwrap();
        assert_eq!(json, "\"mental_model\"");

        let back: Category = serde_json::from_str("\"visual\"").unwrap();
        assert_eq!(back, Category::Visual);
    }

    #[test]
    fn test_every_category_has_distinct_tool_name() {
        let mut names: Vec<&str> = Category::ALL.iter().map(|c| c.tool_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Category::ALL.len());
    }
}

mod payload_tests {
    use super::*;

    #[test]
    fn test_category_matches_variant() {
        assert_eq!(thought(1).category(), Category::Thought);
        assert_eq!(decision("d-1", "x").category(), Category::Decision);
        assert_eq!(
            Payload::Visual(VisualData::new(VisualOperation::Create, "d", "graph")).category(),
            Category::Visual
        );
    }

    #[test]
    fn test_keyword_text_designated_fields() {
        let d = decision("d-1", "Should we migrate");
        assert_eq!(d.keyword_text(), Some("Should we migrate"));

        let m = Payload::MentalModel(MentalModelData::new("first_principles", "slow builds"));
        assert_eq!(m.keyword_text(), Some("slow builds"));

        // Visual only carries text when an observation is present.
        let bare = Payload::Visual(VisualData::new(VisualOperation::Create, "d", "graph"));
        assert_eq!(bare.keyword_text(), None);
        let observed = Payload::Visual(
            VisualData::new(VisualOperation::Create, "d", "graph")
                .with_observation("dense cluster"),
        );
        assert_eq!(observed.keyword_text(), Some("dense cluster"));
    }

    #[test]
    fn test_canonical_keys() {
        assert_eq!(decision("d-7", "x").canonical_key(), Some("d-7"));
        assert_eq!(
            Payload::Scientific(ScientificInquiryData::new("observation", "inq-1"))
                .canonical_key(),
            Some("inq-1")
        );
        assert_eq!(thought(1).canonical_key(), None);
    }

    #[test]
    fn test_from_parts_decodes_camel_case_wire_form() {
        let value = json!({
            "thought": "check the cache",
            "thoughtNumber": 2,
            "totalThoughts": 4,
            "nextThoughtNeeded": true,
            "branchId": "alt",
            "branchFromThought": 1
        });

        let payload = Payload::from_parts(Category::Thought, value).unwrap();
        match payload {
            Payload::Thought(t) => {
                assert_eq!(t.thought_number, 2);
                assert_eq!(t.branch_id.as_deref(), Some("alt"));
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_from_parts_rejects_wrong_shape() {
        let value = json!({ "definitely": "not a thought" });
        assert!(Payload::from_parts(Category::Thought, value).is_err());
    }

    #[test]
    fn test_payload_serializes_flat() {
        let payload = decision("d-1", "pick a database");
        let value = serde_json::to_value(&payload).unwrap();
        // Untagged: the record's own fields sit at the top level.
        assert_eq!(value["decisionId"], "d-1");
        assert!(value.get("Decision").is_none());
    }
}

mod typed_store_tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut store = TypedItemStore::new();
        store.insert("t-1", thought(1));

        let item = store.get("t-1").unwrap();
        assert_eq!(item.category, Category::Thought);
        assert!(store.get("t-2").is_none());
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut store = TypedItemStore::new();
        store.insert("t-1", thought(1));
        store.insert("d-1", decision("d-1", "first"));
        store.insert("t-1", thought(9));

        assert_eq!(store.len(), 2);
        let ids: Vec<&str> = store.get_all().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["t-1", "d-1"]);
        match &store.get("t-1").unwrap().payload {
            Payload::Thought(t) => assert_eq!(t.thought_number, 9),
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_get_by_category_preserves_insertion_order() {
        let mut store = TypedItemStore::new();
        store.insert("t-2", thought(2));
        store.insert("d-1", decision("d-1", "x"));
        store.insert("t-1", thought(1));

        let thoughts = store.get_by_category(Category::Thought);
        let numbers: Vec<u32> = thoughts
            .iter()
            .map(|p| match p {
                Payload::Thought(t) => t.thought_number,
                other => panic!("unexpected payload: {:?}", other),
            })
            .collect();
        // Insertion order, not sequence order: ordering is the index's job.
        assert_eq!(numbers, vec![2, 1]);
        assert!(store.get_by_category(Category::Creative).is_empty());
    }

    #[test]
    fn test_counts_by_category_skips_empty() {
        let mut store = TypedItemStore::new();
        store.insert("t-1", thought(1));
        store.insert("t-2", thought(2));
        store.insert("d-1", decision("d-1", "x"));

        let counts = store.counts_by_category();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&Category::Thought], 2);
        assert_eq!(counts[&Category::Decision], 1);
        assert!(!counts.contains_key(&Category::Visual));
    }

    #[test]
    fn test_clear_is_irreversible() {
        let mut store = TypedItemStore::new();
        store.insert("t-1", thought(1));
        store.clear();

        assert!(store.is_empty());
        assert!(store.get("t-1").is_none());
    }

    #[test]
    fn test_grouped_round_trip_preserves_content_not_ids() {
        let mut store = TypedItemStore::new();
        store.insert("original-a", thought(1));
        store.insert("original-b", thought(2));
        store.insert("original-c", decision("d-1", "x"));

        let exported = store.export_grouped();
        store.import_grouped(exported.clone());

        // Ids are resynthesized per (category, index)...
        assert!(store.get("original-a").is_none());
        assert!(store.get("thought-0").is_some());
        assert!(store.get("thought-1").is_some());
        assert!(store.get("decision-0").is_some());

        // ...but per-category payloads and their order survive.
        assert_eq!(store.export_grouped(), exported);
    }

    #[test]
    fn test_import_grouped_skips_mis_filed_payloads() {
        let mut store = TypedItemStore::new();
        let mut grouped = std::collections::BTreeMap::new();
        grouped.insert(Category::Decision, vec![thought(1), decision("d-1", "x")]);
        store.import_grouped(grouped);

        assert_eq!(store.len(), 1);
        assert_eq!(store.count(Category::Decision), 1);
        assert_eq!(store.count(Category::Thought), 0);
    }
}
