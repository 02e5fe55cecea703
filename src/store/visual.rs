//! Event-sourced diagram state reconstruction for visual reasoning records.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use super::{ElementType, VisualData, VisualElement, VisualOperation};

/// Complexity metrics for one diagram.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramComplexity {
    /// Number of node elements in the current state.
    pub node_count: usize,
    /// Number of edge elements in the current state.
    pub edge_count: usize,
    /// Number of container elements in the current state.
    pub container_count: usize,
    /// Number of annotation elements in the current state.
    pub annotation_count: usize,
    /// Number of operations applied to the diagram.
    pub operation_count: usize,
    /// Edge count over the maximum possible undirected edge count,
    /// `nodes * (nodes - 1) / 2`; zero when fewer than two nodes exist.
    pub connection_density: f64,
}

/// Store and materializer for visual reasoning operations.
///
/// Keeps, per diagram, the ordered operation log and the current element
/// state folded from it; diagram ids are additionally grouped by diagram
/// type. The fold is a pure function of the log prefix, so replaying the
/// same log always reproduces the same state.
#[derive(Debug, Default)]
pub struct VisualStore {
    operations: HashMap<String, Vec<VisualData>>,
    diagrams_by_type: HashMap<String, BTreeSet<String>>,
    states: HashMap<String, Vec<VisualElement>>,
}

impl VisualStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an operation to its diagram's log and fold it into the
    /// materialized state in the same call.
    pub fn add(&mut self, operation: VisualData) {
        let diagram_id = operation.diagram_id.clone();

        self.diagrams_by_type
            .entry(operation.diagram_type.clone())
            .or_default()
            .insert(diagram_id.clone());

        let state = self.states.entry(diagram_id.clone()).or_default();
        Self::apply(state, &operation);

        self.operations.entry(diagram_id).or_default().push(operation);
    }

    /// Rebuild the store by replaying every operation through
    /// [`add`](Self::add), in stored order.
    pub fn from_operations<I>(operations: I) -> Self
    where
        I: IntoIterator<Item = VisualData>,
    {
        let mut store = Self::new();
        for operation in operations {
            store.add(operation);
        }
        store
    }

    /// Fold one operation into a diagram's element state.
    fn apply(state: &mut Vec<VisualElement>, operation: &VisualData) {
        let elements = operation.elements.as_deref().unwrap_or(&[]);
        match operation.operation {
            // Appends unconditionally; a duplicated id is resolved by
            // whichever update/transform matches it next.
            VisualOperation::Create => {
                state.extend(elements.iter().cloned());
            }
            VisualOperation::Update => {
                for element in elements {
                    match state.iter_mut().find(|e| e.id == element.id) {
                        Some(existing) => *existing = element.clone(),
                        None => state.push(element.clone()),
                    }
                }
            }
            VisualOperation::Delete => {
                let removed: BTreeSet<&str> =
                    elements.iter().map(|e| e.id.as_str()).collect();
                state.retain(|e| !removed.contains(e.id.as_str()));
            }
            // Unlike update, transform never inserts: unmatched ids drop.
            VisualOperation::Transform => {
                for element in elements {
                    if let Some(existing) = state.iter_mut().find(|e| e.id == element.id) {
                        *existing = element.clone();
                    }
                }
            }
        }
    }

    /// The current materialized elements of a diagram; empty if unknown.
    pub fn diagram_state(&self, diagram_id: &str) -> Vec<VisualElement> {
        self.states.get(diagram_id).cloned().unwrap_or_default()
    }

    /// The ordered operation log of a diagram; empty if unknown.
    pub fn operations(&self, diagram_id: &str) -> &[VisualData] {
        self.operations
            .get(diagram_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Diagram ids of a given diagram type; empty if unknown.
    pub fn diagrams_of_type(&self, diagram_type: &str) -> Vec<String> {
        self.diagrams_by_type
            .get(diagram_type)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Complexity metrics for a diagram. An unknown diagram yields all-zero
    /// metrics rather than an error.
    pub fn complexity(&self, diagram_id: &str) -> DiagramComplexity {
        let state = self.states.get(diagram_id);
        let count_kind = |kind: ElementType| {
            state
                .map(|s| s.iter().filter(|e| e.element_type == kind).count())
                .unwrap_or(0)
        };

        let node_count = count_kind(ElementType::Node);
        let edge_count = count_kind(ElementType::Edge);

        let connection_density = if node_count > 1 {
            let max_edges = (node_count * (node_count - 1) / 2) as f64;
            edge_count as f64 / max_edges
        } else {
            0.0
        };

        DiagramComplexity {
            node_count,
            edge_count,
            container_count: count_kind(ElementType::Container),
            annotation_count: count_kind(ElementType::Annotation),
            operation_count: self
                .operations
                .get(diagram_id)
                .map(Vec::len)
                .unwrap_or(0),
            connection_density,
        }
    }

    /// Diagrams structurally similar to the given one.
    ///
    /// Similarity is `1 / (1 + |node delta| + |edge delta|)`; ids scoring
    /// above 0.5 are returned in descending similarity order, excluding the
    /// query diagram itself.
    pub fn find_similar(&self, diagram_id: &str) -> Vec<String> {
        let reference = self.complexity(diagram_id);
        let mut scored: Vec<(f64, String)> = self
            .states
            .keys()
            .filter(|id| id.as_str() != diagram_id)
            .map(|id| {
                let other = self.complexity(id);
                let node_delta = reference.node_count.abs_diff(other.node_count);
                let edge_delta = reference.edge_count.abs_diff(other.edge_count);
                let similarity = 1.0 / (1.0 + (node_delta + edge_delta) as f64);
                (similarity, id.clone())
            })
            .filter(|(similarity, _)| *similarity > 0.5)
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.into_iter().map(|(_, id)| id).collect()
    }

    /// Remove all logs, groupings, and materialized states.
    pub fn clear(&mut self) {
        self.operations.clear();
        self.diagrams_by_type.clear();
        self.states.clear();
    }
}
