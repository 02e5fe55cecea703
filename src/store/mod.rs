//! Store layer for reasoning session records.
//!
//! This module provides the closed category set, the per-category payload
//! record types, and the generic [`TypedItemStore`] that maps opaque ids to
//! `(category, payload)` pairs. The richer per-category structures live in
//! the sibling modules: [`sequential`] (branch/revision index), [`visual`]
//! (diagram reconstruction), and [`keyword`] (inverted text index).

pub mod keyword;
pub mod sequential;
pub mod visual;

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;

pub use keyword::KeywordIndex;
pub use sequential::SequentialStore;
pub use visual::{DiagramComplexity, VisualStore};

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// The closed set of reasoning record categories.
///
/// The snake_case strings double as wire tags: they are the map keys in
/// grouped export/import and the `categoryTag` field in session envelopes.
/// Adding a category is a compile-time-checked change; every dispatch over
/// categories matches exhaustively.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Sequential chain-of-thought steps.
    Thought,
    /// Mental model applications.
    MentalModel,
    /// Debugging approach sessions.
    Debugging,
    /// Multi-persona collaborative reasoning.
    Collaborative,
    /// Decision framework analyses.
    Decision,
    /// Metacognitive monitoring assessments.
    Metacognitive,
    /// Scientific method inquiries.
    Scientific,
    /// Creative thinking sessions.
    Creative,
    /// Systems thinking analyses.
    Systems,
    /// Visual reasoning / diagram operations.
    Visual,
}

impl Category {
    /// All categories, in wire-tag order.
    pub const ALL: [Category; 10] = [
        Category::Thought,
        Category::MentalModel,
        Category::Debugging,
        Category::Collaborative,
        Category::Decision,
        Category::Metacognitive,
        Category::Scientific,
        Category::Creative,
        Category::Systems,
        Category::Visual,
    ];

    /// The logical tool name reported in session statistics.
    pub fn tool_name(&self) -> &'static str {
        match self {
            Category::Thought => "sequentialthinking",
            Category::MentalModel => "mentalmodel",
            Category::Debugging => "debuggingapproach",
            Category::Collaborative => "collaborativereasoning",
            Category::Decision => "decisionframework",
            Category::Metacognitive => "metacognitivemonitoring",
            Category::Scientific => "scientificmethod",
            Category::Creative => "creativethinking",
            Category::Systems => "systemsthinking",
            Category::Visual => "visualreasoning",
        }
    }

    /// Prefix used when synthesizing item ids for this category.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Category::Thought => "thought",
            Category::MentalModel => "model",
            Category::Debugging => "debug",
            Category::Collaborative => "collab",
            Category::Decision => "decision",
            Category::Metacognitive => "meta",
            Category::Scientific => "sci",
            Category::Creative => "creative",
            Category::Systems => "systems",
            Category::Visual => "visual",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Thought => write!(f, "thought"),
            Category::MentalModel => write!(f, "mental_model"),
            Category::Debugging => write!(f, "debugging"),
            Category::Collaborative => write!(f, "collaborative"),
            Category::Decision => write!(f, "decision"),
            Category::Metacognitive => write!(f, "metacognitive"),
            Category::Scientific => write!(f, "scientific"),
            Category::Creative => write!(f, "creative"),
            Category::Systems => write!(f, "systems"),
            Category::Visual => write!(f, "visual"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "thought" => Ok(Category::Thought),
            "mental_model" => Ok(Category::MentalModel),
            "debugging" => Ok(Category::Debugging),
            "collaborative" => Ok(Category::Collaborative),
            "decision" => Ok(Category::Decision),
            "metacognitive" => Ok(Category::Metacognitive),
            "scientific" => Ok(Category::Scientific),
            "creative" => Ok(Category::Creative),
            "systems" => Ok(Category::Systems),
            "visual" => Ok(Category::Visual),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// A single step in a sequential chain of thought.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtData {
    /// The thought content.
    pub thought: String,
    /// Caller-supplied sequence number. Shared across branches; not enforced
    /// unique.
    pub thought_number: u32,
    /// Caller's current estimate of total thoughts needed.
    pub total_thoughts: u32,
    /// Whether the caller expects to continue the chain.
    pub next_thought_needed: bool,
    /// Whether this thought revises an earlier one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_revision: Option<bool>,
    /// Sequence number of the thought being revised.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revises_thought: Option<u32>,
    /// Sequence number this branch diverged from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_from_thought: Option<u32>,
    /// Branch identifier grouping a divergent line of reasoning.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
    /// Whether the caller wants to extend past `total_thoughts`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs_more_thoughts: Option<bool>,
}

impl ThoughtData {
    /// Create a new thought step.
    pub fn new(
        thought: impl Into<String>,
        thought_number: u32,
        total_thoughts: u32,
        next_thought_needed: bool,
    ) -> Self {
        Self {
            thought: thought.into(),
            thought_number,
            total_thoughts,
            next_thought_needed,
            is_revision: None,
            revises_thought: None,
            branch_from_thought: None,
            branch_id: None,
            needs_more_thoughts: None,
        }
    }

    /// Mark this thought as a member of a branch.
    pub fn with_branch(mut self, branch_id: impl Into<String>, branched_from: u32) -> Self {
        self.branch_id = Some(branch_id.into());
        self.branch_from_thought = Some(branched_from);
        self
    }

    /// Mark this thought as a revision of an earlier sequence number.
    pub fn as_revision_of(mut self, revises_thought: u32) -> Self {
        self.is_revision = Some(true);
        self.revises_thought = Some(revises_thought);
        self
    }
}

/// A mental model applied to a problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentalModelData {
    /// Name of the model (e.g., "first_principles").
    pub model_name: String,
    /// The problem being analyzed.
    pub problem: String,
    /// Steps taken applying the model.
    pub steps: Vec<String>,
    /// Reasoning narrative.
    pub reasoning: String,
    /// Conclusion reached.
    pub conclusion: String,
}

impl MentalModelData {
    /// Create a new mental model record.
    pub fn new(model_name: impl Into<String>, problem: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            problem: problem.into(),
            steps: Vec::new(),
            reasoning: String::new(),
            conclusion: String::new(),
        }
    }
}

/// A debugging approach session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebuggingSession {
    /// Name of the approach (e.g., "binary_search").
    pub approach_name: String,
    /// The issue under investigation.
    pub issue: String,
    /// Steps taken.
    pub steps: Vec<String>,
    /// Findings so far.
    pub findings: String,
    /// Resolution, if reached.
    pub resolution: String,
}

impl DebuggingSession {
    /// Create a new debugging session record.
    pub fn new(approach_name: impl Into<String>, issue: impl Into<String>) -> Self {
        Self {
            approach_name: approach_name.into(),
            issue: issue.into(),
            steps: Vec::new(),
            findings: String::new(),
            resolution: String::new(),
        }
    }
}

/// A multi-persona collaborative reasoning session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaborativeSession {
    /// Topic under discussion.
    pub topic: String,
    /// Persona definitions (free-form records).
    pub personas: Vec<serde_json::Value>,
    /// Contributions made so far (free-form records).
    pub contributions: Vec<serde_json::Value>,
    /// Current stage (e.g., "ideation", "synthesis").
    pub stage: String,
    /// Persona currently holding the floor.
    pub active_persona_id: String,
    /// Session-level identifier, distinct from the store id.
    pub session_id: String,
    /// Iteration counter.
    pub iteration: u32,
    /// Whether another contribution is expected.
    pub next_contribution_needed: bool,
}

impl CollaborativeSession {
    /// Create a new collaborative session record.
    pub fn new(topic: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            personas: Vec::new(),
            contributions: Vec::new(),
            stage: "problem-definition".to_string(),
            active_persona_id: String::new(),
            session_id: session_id.into(),
            iteration: 0,
            next_contribution_needed: true,
        }
    }
}

/// A decision framework analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionData {
    /// The decision being analyzed. This is the designated text field for
    /// keyword indexing.
    pub decision_statement: String,
    /// Options under consideration (free-form records).
    pub options: Vec<serde_json::Value>,
    /// Analysis type (e.g., "weighted-criteria", "expected-utility").
    pub analysis_type: String,
    /// Current stage of the analysis.
    pub stage: String,
    /// Analysis-level identifier, distinct from the store id.
    pub decision_id: String,
    /// Iteration counter.
    pub iteration: u32,
    /// Whether another stage is expected.
    pub next_stage_needed: bool,
    /// Evaluation criteria (free-form records).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criteria: Option<Vec<serde_json::Value>>,
    /// Recommendation, once reached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl DecisionData {
    /// Create a new decision analysis record.
    pub fn new(
        decision_statement: impl Into<String>,
        analysis_type: impl Into<String>,
        decision_id: impl Into<String>,
    ) -> Self {
        Self {
            decision_statement: decision_statement.into(),
            options: Vec::new(),
            analysis_type: analysis_type.into(),
            stage: "problem-definition".to_string(),
            decision_id: decision_id.into(),
            iteration: 0,
            next_stage_needed: true,
            criteria: None,
            recommendation: None,
        }
    }

    /// Set the evaluation criteria.
    pub fn with_criteria(mut self, criteria: Vec<serde_json::Value>) -> Self {
        self.criteria = Some(criteria);
        self
    }

    /// Set the recommendation.
    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }
}

/// A metacognitive monitoring assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetacognitiveData {
    /// The task whose reasoning is being monitored.
    pub task: String,
    /// Current monitoring stage.
    pub stage: String,
    /// Monitoring-level identifier, distinct from the store id.
    pub monitoring_id: String,
    /// Iteration counter.
    pub iteration: u32,
    /// Overall confidence (0.0-1.0).
    pub overall_confidence: f64,
    /// Areas of identified uncertainty.
    pub uncertainty_areas: Vec<String>,
    /// Recommended approach given the assessment.
    pub recommended_approach: String,
    /// Whether another assessment pass is expected.
    pub next_assessment_needed: bool,
    /// Knowledge assessment (free-form record).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knowledge_assessment: Option<serde_json::Value>,
    /// Claims under evaluation (free-form records).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claims: Option<Vec<serde_json::Value>>,
}

impl MetacognitiveData {
    /// Create a new metacognitive assessment record.
    pub fn new(task: impl Into<String>, monitoring_id: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            stage: "knowledge-assessment".to_string(),
            monitoring_id: monitoring_id.into(),
            iteration: 0,
            overall_confidence: 0.5,
            uncertainty_areas: Vec::new(),
            recommended_approach: String::new(),
            next_assessment_needed: true,
            knowledge_assessment: None,
            claims: None,
        }
    }
}

/// A scientific method inquiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScientificInquiryData {
    /// Current inquiry stage (observation, hypothesis, experiment, ...).
    pub stage: String,
    /// Inquiry-level identifier, distinct from the store id.
    pub inquiry_id: String,
    /// Iteration counter.
    pub iteration: u32,
    /// Whether another stage is expected.
    pub next_stage_needed: bool,
    /// Observation text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
    /// Research question. This is the designated text field for keyword
    /// indexing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    /// Hypothesis (free-form record).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hypothesis: Option<serde_json::Value>,
    /// Experiment design (free-form record).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experiment: Option<serde_json::Value>,
    /// Analysis text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    /// Conclusion text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<String>,
}

impl ScientificInquiryData {
    /// Create a new scientific inquiry record.
    pub fn new(stage: impl Into<String>, inquiry_id: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            inquiry_id: inquiry_id.into(),
            iteration: 0,
            next_stage_needed: true,
            observation: None,
            question: None,
            hypothesis: None,
            experiment: None,
            analysis: None,
            conclusion: None,
        }
    }

    /// Set the research question.
    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = Some(question.into());
        self
    }
}

/// A creative thinking session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeData {
    /// The creative prompt.
    pub prompt: String,
    /// Ideas generated.
    pub ideas: Vec<String>,
    /// Techniques applied.
    pub techniques: Vec<String>,
    /// Connections drawn between ideas.
    pub connections: Vec<String>,
    /// Insights reached.
    pub insights: Vec<String>,
    /// Session-level identifier, distinct from the store id.
    pub session_id: String,
    /// Iteration counter.
    pub iteration: u32,
    /// Whether another idea round is expected.
    pub next_idea_needed: bool,
}

impl CreativeData {
    /// Create a new creative thinking record.
    pub fn new(prompt: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ideas: Vec::new(),
            techniques: Vec::new(),
            connections: Vec::new(),
            insights: Vec::new(),
            session_id: session_id.into(),
            iteration: 0,
            next_idea_needed: true,
        }
    }
}

/// A systems thinking analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemsData {
    /// The system under analysis.
    pub system: String,
    /// Components identified.
    pub components: Vec<String>,
    /// Relationships between components (free-form records).
    pub relationships: Vec<serde_json::Value>,
    /// Feedback loops identified (free-form records).
    pub feedback_loops: Vec<serde_json::Value>,
    /// Emergent properties observed.
    pub emergent_properties: Vec<String>,
    /// Leverage points identified.
    pub leverage_points: Vec<String>,
    /// Session-level identifier, distinct from the store id.
    pub session_id: String,
    /// Iteration counter.
    pub iteration: u32,
    /// Whether another analysis pass is expected.
    pub next_analysis_needed: bool,
}

impl SystemsData {
    /// Create a new systems analysis record.
    pub fn new(system: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            components: Vec::new(),
            relationships: Vec::new(),
            feedback_loops: Vec::new(),
            emergent_properties: Vec::new(),
            leverage_points: Vec::new(),
            session_id: session_id.into(),
            iteration: 0,
            next_analysis_needed: true,
        }
    }
}

/// Kind of visual diagram operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualOperation {
    /// Append all carried elements unconditionally.
    #[default]
    Create,
    /// Upsert carried elements by id.
    Update,
    /// Remove current elements whose ids are carried.
    Delete,
    /// Replace carried elements by id only where one already exists.
    Transform,
}

impl std::fmt::Display for VisualOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VisualOperation::Create => write!(f, "create"),
            VisualOperation::Update => write!(f, "update"),
            VisualOperation::Delete => write!(f, "delete"),
            VisualOperation::Transform => write!(f, "transform"),
        }
    }
}

impl std::str::FromStr for VisualOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "create" => Ok(VisualOperation::Create),
            "update" => Ok(VisualOperation::Update),
            "delete" => Ok(VisualOperation::Delete),
            "transform" => Ok(VisualOperation::Transform),
            _ => Err(format!("Unknown visual operation: {}", s)),
        }
    }
}

/// Kind of diagram element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    /// A vertex in the diagram.
    #[default]
    Node,
    /// A connection between two nodes.
    Edge,
    /// A grouping container.
    Container,
    /// A free-standing annotation.
    Annotation,
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementType::Node => write!(f, "node"),
            ElementType::Edge => write!(f, "edge"),
            ElementType::Container => write!(f, "container"),
            ElementType::Annotation => write!(f, "annotation"),
        }
    }
}

impl std::str::FromStr for ElementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "node" => Ok(ElementType::Node),
            "edge" => Ok(ElementType::Edge),
            "container" => Ok(ElementType::Container),
            "annotation" => Ok(ElementType::Annotation),
            _ => Err(format!("Unknown element type: {}", s)),
        }
    }
}

/// A single diagram element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualElement {
    /// Stable element identifier within the diagram.
    pub id: String,
    /// Element kind.
    #[serde(rename = "type")]
    pub element_type: ElementType,
    /// Display label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Free-form visual properties.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub properties: serde_json::Value,
    /// Source node id (edges only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Target node id (edges only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Contained element ids (containers only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contains: Option<Vec<String>>,
}

impl VisualElement {
    /// Create a new element of the given kind.
    pub fn new(id: impl Into<String>, element_type: ElementType) -> Self {
        Self {
            id: id.into(),
            element_type,
            label: None,
            properties: serde_json::Value::Null,
            source: None,
            target: None,
            contains: None,
        }
    }

    /// Create a node element.
    pub fn node(id: impl Into<String>, label: impl Into<String>) -> Self {
        let mut el = Self::new(id, ElementType::Node);
        el.label = Some(label.into());
        el
    }

    /// Create an edge element between two nodes.
    pub fn edge(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        let mut el = Self::new(id, ElementType::Edge);
        el.source = Some(source.into());
        el.target = Some(target.into());
        el
    }
}

/// A visual reasoning operation against a diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualData {
    /// Operation kind.
    pub operation: VisualOperation,
    /// Target diagram identifier.
    pub diagram_id: String,
    /// Diagram type (e.g., "graph", "flowchart", "state_diagram").
    pub diagram_type: String,
    /// Iteration counter.
    pub iteration: u32,
    /// Whether another operation is expected.
    pub next_operation_needed: bool,
    /// Elements carried by the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<VisualElement>>,
    /// Transformation kind, for transform operations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transformation_type: Option<String>,
    /// Observation text about the diagram.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
    /// Insight derived from the diagram.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight: Option<String>,
    /// Hypothesis suggested by the diagram.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hypothesis: Option<String>,
}

impl VisualData {
    /// Create a new visual operation record.
    pub fn new(
        operation: VisualOperation,
        diagram_id: impl Into<String>,
        diagram_type: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            diagram_id: diagram_id.into(),
            diagram_type: diagram_type.into(),
            iteration: 0,
            next_operation_needed: true,
            elements: None,
            transformation_type: None,
            observation: None,
            insight: None,
            hypothesis: None,
        }
    }

    /// Set the carried elements.
    pub fn with_elements(mut self, elements: Vec<VisualElement>) -> Self {
        self.elements = Some(elements);
        self
    }

    /// Set the observation text.
    pub fn with_observation(mut self, observation: impl Into<String>) -> Self {
        self.observation = Some(observation.into());
        self
    }
}

/// A category-tagged payload.
///
/// Serializes untagged: the envelope or grouping map that carries a payload
/// also carries its category, so the record itself stays flat on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// Sequential thought step.
    Thought(ThoughtData),
    /// Mental model application.
    MentalModel(MentalModelData),
    /// Debugging session.
    Debugging(DebuggingSession),
    /// Collaborative session.
    Collaborative(CollaborativeSession),
    /// Decision analysis.
    Decision(DecisionData),
    /// Metacognitive assessment.
    Metacognitive(MetacognitiveData),
    /// Scientific inquiry.
    Scientific(ScientificInquiryData),
    /// Creative session.
    Creative(CreativeData),
    /// Systems analysis.
    Systems(SystemsData),
    /// Visual operation.
    Visual(VisualData),
}

impl Payload {
    /// The category this payload belongs to.
    pub fn category(&self) -> Category {
        match self {
            Payload::Thought(_) => Category::Thought,
            Payload::MentalModel(_) => Category::MentalModel,
            Payload::Debugging(_) => Category::Debugging,
            Payload::Collaborative(_) => Category::Collaborative,
            Payload::Decision(_) => Category::Decision,
            Payload::Metacognitive(_) => Category::Metacognitive,
            Payload::Scientific(_) => Category::Scientific,
            Payload::Creative(_) => Category::Creative,
            Payload::Systems(_) => Category::Systems,
            Payload::Visual(_) => Category::Visual,
        }
    }

    /// The designated text field used for keyword indexing, where one exists.
    pub fn keyword_text(&self) -> Option<&str> {
        match self {
            Payload::Thought(t) => Some(&t.thought),
            Payload::MentalModel(m) => Some(&m.problem),
            Payload::Debugging(d) => Some(&d.issue),
            Payload::Collaborative(c) => Some(&c.topic),
            Payload::Decision(d) => Some(&d.decision_statement),
            Payload::Metacognitive(m) => Some(&m.task),
            Payload::Scientific(s) => s.question.as_deref(),
            Payload::Creative(c) => Some(&c.prompt),
            Payload::Systems(s) => Some(&s.system),
            Payload::Visual(v) => v.observation.as_deref(),
        }
    }

    /// The session-level canonical key carried by the payload, where one
    /// exists. Distinct from the store id.
    pub fn canonical_key(&self) -> Option<&str> {
        match self {
            Payload::Collaborative(c) => Some(&c.session_id),
            Payload::Decision(d) => Some(&d.decision_id),
            Payload::Metacognitive(m) => Some(&m.monitoring_id),
            Payload::Scientific(s) => Some(&s.inquiry_id),
            _ => None,
        }
    }

    /// Decode a payload of a known category from its wire representation.
    pub fn from_parts(
        category: Category,
        value: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        Ok(match category {
            Category::Thought => Payload::Thought(serde_json::from_value(value)?),
            Category::MentalModel => Payload::MentalModel(serde_json::from_value(value)?),
            Category::Debugging => Payload::Debugging(serde_json::from_value(value)?),
            Category::Collaborative => Payload::Collaborative(serde_json::from_value(value)?),
            Category::Decision => Payload::Decision(serde_json::from_value(value)?),
            Category::Metacognitive => Payload::Metacognitive(serde_json::from_value(value)?),
            Category::Scientific => Payload::Scientific(serde_json::from_value(value)?),
            Category::Creative => Payload::Creative(serde_json::from_value(value)?),
            Category::Systems => Payload::Systems(serde_json::from_value(value)?),
            Category::Visual => Payload::Visual(serde_json::from_value(value)?),
        })
    }
}

/// An item held by the [`TypedItemStore`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredItem {
    /// Opaque identifier, unique within a session.
    pub id: String,
    /// Category tag.
    pub category: Category,
    /// Category-specific payload.
    pub payload: Payload,
}

/// Generic type-tagged item store.
///
/// Maps opaque ids to `(category, payload)` pairs, preserving insertion
/// order. Writes are last-write-wins by id; an overwrite keeps the item's
/// original position. Category reads are linear filters over all entries,
/// which is acceptable at session scale.
#[derive(Debug, Default)]
pub struct TypedItemStore {
    entries: Vec<StoredItem>,
    index: HashMap<String, usize>,
}

impl TypedItemStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an item. The category is derived from the payload,
    /// so a mis-tagged entry is not expressible.
    pub fn insert(&mut self, id: impl Into<String>, payload: Payload) {
        let id = id.into();
        let category = payload.category();
        match self.index.get(&id) {
            Some(&pos) => {
                self.entries[pos] = StoredItem {
                    id,
                    category,
                    payload,
                };
            }
            None => {
                self.index.insert(id.clone(), self.entries.len());
                self.entries.push(StoredItem {
                    id,
                    category,
                    payload,
                });
            }
        }
    }

    /// Look up a single item by id.
    pub fn get(&self, id: &str) -> Option<&StoredItem> {
        self.index.get(id).map(|&pos| &self.entries[pos])
    }

    /// All payloads tagged with `category`, in insertion order.
    pub fn get_by_category(&self, category: Category) -> Vec<&Payload> {
        self.entries
            .iter()
            .filter(|item| item.category == category)
            .map(|item| &item.payload)
            .collect()
    }

    /// All items in insertion order.
    pub fn get_all(&self) -> &[StoredItem] {
        &self.entries
    }

    /// Remove every item. Irreversible.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Number of items in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no items.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of items tagged with `category`.
    pub fn count(&self, category: Category) -> usize {
        self.entries
            .iter()
            .filter(|item| item.category == category)
            .count()
    }

    /// Per-category cardinality, computed in a single pass. Categories with
    /// no items are absent from the map.
    pub fn counts_by_category(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for item in &self.entries {
            *counts.entry(item.category).or_insert(0) += 1;
        }
        counts
    }

    /// Export every payload, grouped by category in insertion order.
    pub fn export_grouped(&self) -> BTreeMap<Category, Vec<Payload>> {
        let mut grouped: BTreeMap<Category, Vec<Payload>> = BTreeMap::new();
        for item in &self.entries {
            grouped
                .entry(item.category)
                .or_default()
                .push(item.payload.clone());
        }
        grouped
    }

    /// Clear the store, then re-insert every payload under a synthesized id
    /// per `(category, index)`. Original ids do not survive the round trip;
    /// category membership and in-category order do. A payload filed under
    /// the wrong category key is skipped rather than inserted mis-tagged.
    pub fn import_grouped(&mut self, grouped: BTreeMap<Category, Vec<Payload>>) {
        self.clear();
        for (category, payloads) in grouped {
            for (i, payload) in payloads.into_iter().enumerate() {
                if payload.category() != category {
                    warn!(
                        expected = %category,
                        actual = %payload.category(),
                        "skipping payload filed under the wrong category"
                    );
                    continue;
                }
                self.insert(format!("{}-{}", category, i), payload);
            }
        }
    }
}
