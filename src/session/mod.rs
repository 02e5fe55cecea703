//! Session orchestration for reasoning stores.
//!
//! This module provides:
//! - [`ReasoningSession`], the per-session orchestrator wiring the typed
//!   item store, the per-category indices, versioned export/import, and
//!   inactivity-based eviction
//! - [`SessionRegistry`], the outer map guarding concurrent session
//!   creation and eviction
//! - The id-generator seam used when synthesizing item ids

pub mod ids;
mod registry;

pub use ids::{CounterIdGenerator, IdGenerator, UuidIdGenerator};
pub use registry::SessionRegistry;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard, Notify};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::store::{
    Category, CollaborativeSession, CreativeData, DebuggingSession, DecisionData,
    DiagramComplexity, KeywordIndex, MentalModelData, MetacognitiveData, Payload,
    ScientificInquiryData, SequentialStore, SystemsData, ThoughtData, TypedItemStore, VisualData,
    VisualElement, VisualStore,
};

/// Version string stamped into every export envelope.
pub const EXPORT_FORMAT_VERSION: &str = "1.0";

/// Outcome of an add against a capacity-bounded category.
///
/// Capacity is reported as a value, never an error: the caller decides what
/// a full session means for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AddOutcome {
    /// The item was stored under the given id.
    Accepted {
        /// Synthesized store id.
        id: String,
    },
    /// The session already holds the configured maximum; nothing was stored.
    CapacityReached {
        /// The configured cap that was hit.
        limit: usize,
    },
}

impl AddOutcome {
    /// Whether the item was stored.
    pub fn is_accepted(&self) -> bool {
        matches!(self, AddOutcome::Accepted { .. })
    }

    /// The stored id, if the add was accepted.
    pub fn id(&self) -> Option<&str> {
        match self {
            AddOutcome::Accepted { id } => Some(id),
            AddOutcome::CapacityReached { .. } => None,
        }
    }
}

/// Aggregate statistics for one session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    /// Session identifier.
    pub session_id: String,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session was last touched.
    pub last_accessed: DateTime<Utc>,
    /// Logical tool name and item count for every nonzero category.
    pub tool_usage: BTreeMap<String, usize>,
    /// Total items across all nonzero categories.
    pub total_operations: usize,
    /// Items in the thought category.
    pub thought_count: usize,
    /// Whether the session is still live.
    pub is_active: bool,
    /// Thought adds remaining before the cap.
    pub remaining_thoughts: usize,
}

/// Versioned wrapper for one exported payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    /// Envelope format version.
    pub format_version: String,
    /// When the export was taken.
    pub exported_at: DateTime<Utc>,
    /// Exporting session id.
    pub session_id: String,
    /// Category of the wrapped payload.
    pub category_tag: Category,
    /// The wrapped payload.
    pub payload: Payload,
}

/// Result shape of [`ReasoningSession::export`].
///
/// A result set of exactly one envelope is returned unwrapped; anything else
/// is a sequence. Callers must handle both shapes, symmetric with
/// [`ReasoningSession::import`] accepting either.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Export {
    /// Exactly one envelope, unwrapped.
    Single(Box<ExportEnvelope>),
    /// Zero or several envelopes.
    Many(Vec<ExportEnvelope>),
}

impl Export {
    /// Number of envelopes carried.
    pub fn len(&self) -> usize {
        match self {
            Export::Single(_) => 1,
            Export::Many(envelopes) => envelopes.len(),
        }
    }

    /// Whether the export carries no envelopes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten into a list of envelopes.
    pub fn into_envelopes(self) -> Vec<ExportEnvelope> {
        match self {
            Export::Single(envelope) => vec![*envelope],
            Export::Many(envelopes) => envelopes,
        }
    }
}

/// Per-batch result of [`ReasoningSession::import`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Envelopes applied.
    pub imported: usize,
    /// Envelopes skipped (unknown tag, undecodable payload, or capacity).
    pub skipped: usize,
}

/// Mutable per-session state behind the lock.
struct SessionState {
    store: TypedItemStore,
    sequential: SequentialStore,
    visual: VisualStore,
    keywords: HashMap<Category, KeywordIndex>,
    last_access: DateTime<Utc>,
    deadline: Instant,
    cleaned: bool,
}

impl SessionState {
    fn clear(&mut self) {
        self.store.clear();
        self.sequential.clear();
        self.visual.clear();
        self.keywords.clear();
        self.cleaned = true;
    }
}

struct SessionInner {
    id: String,
    config: SessionConfig,
    ids: Arc<dyn IdGenerator>,
    created_at: DateTime<Utc>,
    state: Mutex<SessionState>,
    shutdown: Notify,
}

/// One reasoning session: identity, configuration, stores, and lifecycle.
///
/// Cheaply clonable handle over shared state. Every add/get operation
/// touches the session (updates last-access and pushes the eviction
/// deadline out); a background watcher task clears the session once the
/// inactivity window elapses without a touch. There is exactly one watcher
/// per session, so touches coalesce instead of stacking timers.
///
/// Once cleaned (by expiry or [`cleanup`](Self::cleanup)), the session is
/// terminal: every facade returns [`SessionError::Terminated`] and a new
/// session must be constructed.
///
/// Construction spawns the watcher, so it must happen inside a tokio
/// runtime.
#[derive(Clone)]
pub struct ReasoningSession {
    inner: Arc<SessionInner>,
}

impl ReasoningSession {
    /// Create a session with the default UUID-backed id generator.
    pub fn new(id: impl Into<String>, config: SessionConfig) -> Self {
        Self::with_id_generator(id, config, Arc::new(UuidIdGenerator))
    }

    /// Create a session with an injected id generator.
    pub fn with_id_generator(
        id: impl Into<String>,
        config: SessionConfig,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        let now = Utc::now();
        let deadline = Instant::now() + config.session_timeout;
        let inner = Arc::new(SessionInner {
            id: id.into(),
            config,
            ids,
            created_at: now,
            state: Mutex::new(SessionState {
                store: TypedItemStore::new(),
                sequential: SequentialStore::new(),
                visual: VisualStore::new(),
                keywords: HashMap::new(),
                last_access: now,
                deadline,
                cleaned: false,
            }),
            shutdown: Notify::new(),
        });

        info!(session_id = %inner.id, timeout = ?inner.config.session_timeout, "session created");
        Self::spawn_watcher(Arc::clone(&inner));
        Self { inner }
    }

    /// Background eviction task: sleep until the deadline, re-check after
    /// waking (a touch while asleep just moves the wake-up out), clear on
    /// true expiry. Exits early when `cleanup` signals shutdown.
    fn spawn_watcher(inner: Arc<SessionInner>) {
        tokio::spawn(async move {
            loop {
                let deadline = {
                    let state = inner.state.lock().await;
                    if state.cleaned {
                        return;
                    }
                    state.deadline
                };

                tokio::select! {
                    _ = tokio::time::sleep_until(deadline) => {}
                    _ = inner.shutdown.notified() => return,
                }

                let mut state = inner.state.lock().await;
                if state.cleaned {
                    return;
                }
                if Instant::now() >= state.deadline {
                    state.clear();
                    info!(session_id = %inner.id, "session expired after inactivity; store cleared");
                    return;
                }
            }
        });
    }

    /// Acquire the state lock and touch the session.
    async fn lock_and_touch(&self) -> SessionResult<MutexGuard<'_, SessionState>> {
        let mut state = self.inner.state.lock().await;
        if state.cleaned {
            return Err(SessionError::Terminated {
                session_id: self.inner.id.clone(),
            });
        }
        state.last_access = Utc::now();
        state.deadline = Instant::now() + self.inner.config.session_timeout;
        Ok(state)
    }

    /// Store a payload and update every derived structure in the same call.
    fn insert_payload(&self, state: &mut SessionState, id: String, payload: Payload) {
        if self.inner.config.keyword_indexing {
            if let Some(text) = payload.keyword_text() {
                state
                    .keywords
                    .entry(payload.category())
                    .or_default()
                    .index(&id, text);
            }
        }

        match &payload {
            Payload::Thought(thought) => state.sequential.add(thought.clone()),
            Payload::Visual(operation) => state.visual.add(operation.clone()),
            _ => {}
        }

        state.store.insert(id, payload);
    }

    /// Add for the uncapped categories.
    async fn add_uncapped(&self, payload: Payload) -> SessionResult<String> {
        let mut state = self.lock_and_touch().await?;
        let id = self.inner.ids.next_id(payload.category());
        self.insert_payload(&mut state, id.clone(), payload);
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Add facades
    // ------------------------------------------------------------------

    /// Add a thought. The thought category is capped per session; a full
    /// session reports [`AddOutcome::CapacityReached`] and stores nothing.
    pub async fn add_thought(&self, thought: ThoughtData) -> SessionResult<AddOutcome> {
        let mut state = self.lock_and_touch().await?;
        let limit = self.inner.config.max_thoughts_per_session;
        if state.store.count(Category::Thought) >= limit {
            debug!(session_id = %self.inner.id, limit, "thought capacity reached; add rejected");
            return Ok(AddOutcome::CapacityReached { limit });
        }

        let id = self.inner.ids.next_id(Category::Thought);
        self.insert_payload(&mut state, id.clone(), Payload::Thought(thought));
        Ok(AddOutcome::Accepted { id })
    }

    /// Add a mental model record.
    pub async fn add_mental_model(&self, data: MentalModelData) -> SessionResult<String> {
        self.add_uncapped(Payload::MentalModel(data)).await
    }

    /// Add a debugging session record.
    pub async fn add_debugging_session(&self, data: DebuggingSession) -> SessionResult<String> {
        self.add_uncapped(Payload::Debugging(data)).await
    }

    /// Add a collaborative session record.
    pub async fn add_collaborative_session(
        &self,
        data: CollaborativeSession,
    ) -> SessionResult<String> {
        self.add_uncapped(Payload::Collaborative(data)).await
    }

    /// Add a decision analysis record.
    pub async fn add_decision(&self, data: DecisionData) -> SessionResult<String> {
        self.add_uncapped(Payload::Decision(data)).await
    }

    /// Add a metacognitive assessment record.
    pub async fn add_metacognitive(&self, data: MetacognitiveData) -> SessionResult<String> {
        self.add_uncapped(Payload::Metacognitive(data)).await
    }

    /// Add a scientific inquiry record.
    pub async fn add_scientific_inquiry(
        &self,
        data: ScientificInquiryData,
    ) -> SessionResult<String> {
        self.add_uncapped(Payload::Scientific(data)).await
    }

    /// Add a creative thinking record.
    pub async fn add_creative_session(&self, data: CreativeData) -> SessionResult<String> {
        self.add_uncapped(Payload::Creative(data)).await
    }

    /// Add a systems analysis record.
    pub async fn add_systems_analysis(&self, data: SystemsData) -> SessionResult<String> {
        self.add_uncapped(Payload::Systems(data)).await
    }

    /// Add a visual operation; the diagram's materialized state is folded
    /// forward in the same call.
    pub async fn add_visual_operation(&self, data: VisualData) -> SessionResult<String> {
        self.add_uncapped(Payload::Visual(data)).await
    }

    // ------------------------------------------------------------------
    // Get facades
    // ------------------------------------------------------------------

    /// All thoughts in global order: ascending by sequence number,
    /// branches interleaved in the shared numbering space.
    pub async fn get_thoughts(&self) -> SessionResult<Vec<ThoughtData>> {
        let state = self.lock_and_touch().await?;
        Ok(state.sequential.get_all())
    }

    /// Insertion-order thoughts of one branch; empty if unknown.
    pub async fn get_branch(&self, branch_id: &str) -> SessionResult<Vec<ThoughtData>> {
        let state = self.lock_and_touch().await?;
        Ok(state.sequential.get_branch(branch_id))
    }

    /// Insertion-order revisions of a sequence number; empty if unknown.
    pub async fn get_revisions(&self, thought_number: u32) -> SessionResult<Vec<ThoughtData>> {
        let state = self.lock_and_touch().await?;
        Ok(state.sequential.get_revisions(thought_number))
    }

    /// All mental model records, in insertion order.
    pub async fn get_mental_models(&self) -> SessionResult<Vec<MentalModelData>> {
        let state = self.lock_and_touch().await?;
        Ok(state
            .store
            .get_by_category(Category::MentalModel)
            .into_iter()
            .filter_map(|p| match p {
                Payload::MentalModel(m) => Some(m.clone()),
                _ => None,
            })
            .collect())
    }

    /// All debugging session records, in insertion order.
    pub async fn get_debugging_sessions(&self) -> SessionResult<Vec<DebuggingSession>> {
        let state = self.lock_and_touch().await?;
        Ok(state
            .store
            .get_by_category(Category::Debugging)
            .into_iter()
            .filter_map(|p| match p {
                Payload::Debugging(d) => Some(d.clone()),
                _ => None,
            })
            .collect())
    }

    /// All collaborative session records, in insertion order.
    pub async fn get_collaborative_sessions(&self) -> SessionResult<Vec<CollaborativeSession>> {
        let state = self.lock_and_touch().await?;
        Ok(state
            .store
            .get_by_category(Category::Collaborative)
            .into_iter()
            .filter_map(|p| match p {
                Payload::Collaborative(c) => Some(c.clone()),
                _ => None,
            })
            .collect())
    }

    /// First collaborative session whose `sessionId` field matches; `None`
    /// if absent.
    pub async fn find_collaborative_session(
        &self,
        session_id: &str,
    ) -> SessionResult<Option<CollaborativeSession>> {
        Ok(self
            .find_by_key(Category::Collaborative, session_id)
            .await?
            .and_then(|p| match p {
                Payload::Collaborative(c) => Some(c),
                _ => None,
            }))
    }

    /// All decision records, in insertion order.
    pub async fn get_decisions(&self) -> SessionResult<Vec<DecisionData>> {
        let state = self.lock_and_touch().await?;
        Ok(state
            .store
            .get_by_category(Category::Decision)
            .into_iter()
            .filter_map(|p| match p {
                Payload::Decision(d) => Some(d.clone()),
                _ => None,
            })
            .collect())
    }

    /// First decision whose `decisionId` field matches; `None` if absent.
    pub async fn find_decision(&self, decision_id: &str) -> SessionResult<Option<DecisionData>> {
        Ok(self
            .find_by_key(Category::Decision, decision_id)
            .await?
            .and_then(|p| match p {
                Payload::Decision(d) => Some(d),
                _ => None,
            }))
    }

    /// All metacognitive assessment records, in insertion order.
    pub async fn get_metacognitive_assessments(&self) -> SessionResult<Vec<MetacognitiveData>> {
        let state = self.lock_and_touch().await?;
        Ok(state
            .store
            .get_by_category(Category::Metacognitive)
            .into_iter()
            .filter_map(|p| match p {
                Payload::Metacognitive(m) => Some(m.clone()),
                _ => None,
            })
            .collect())
    }

    /// First assessment whose `monitoringId` field matches; `None` if
    /// absent.
    pub async fn find_metacognitive_assessment(
        &self,
        monitoring_id: &str,
    ) -> SessionResult<Option<MetacognitiveData>> {
        Ok(self
            .find_by_key(Category::Metacognitive, monitoring_id)
            .await?
            .and_then(|p| match p {
                Payload::Metacognitive(m) => Some(m),
                _ => None,
            }))
    }

    /// All scientific inquiry records, in insertion order.
    pub async fn get_scientific_inquiries(&self) -> SessionResult<Vec<ScientificInquiryData>> {
        let state = self.lock_and_touch().await?;
        Ok(state
            .store
            .get_by_category(Category::Scientific)
            .into_iter()
            .filter_map(|p| match p {
                Payload::Scientific(s) => Some(s.clone()),
                _ => None,
            })
            .collect())
    }

    /// First inquiry whose `inquiryId` field matches; `None` if absent.
    pub async fn find_scientific_inquiry(
        &self,
        inquiry_id: &str,
    ) -> SessionResult<Option<ScientificInquiryData>> {
        Ok(self
            .find_by_key(Category::Scientific, inquiry_id)
            .await?
            .and_then(|p| match p {
                Payload::Scientific(s) => Some(s),
                _ => None,
            }))
    }

    /// All creative thinking records, in insertion order.
    pub async fn get_creative_sessions(&self) -> SessionResult<Vec<CreativeData>> {
        let state = self.lock_and_touch().await?;
        Ok(state
            .store
            .get_by_category(Category::Creative)
            .into_iter()
            .filter_map(|p| match p {
                Payload::Creative(c) => Some(c.clone()),
                _ => None,
            })
            .collect())
    }

    /// All systems analysis records, in insertion order.
    pub async fn get_systems_analyses(&self) -> SessionResult<Vec<SystemsData>> {
        let state = self.lock_and_touch().await?;
        Ok(state
            .store
            .get_by_category(Category::Systems)
            .into_iter()
            .filter_map(|p| match p {
                Payload::Systems(s) => Some(s.clone()),
                _ => None,
            })
            .collect())
    }

    /// The ordered operation log of one diagram; empty if unknown.
    pub async fn get_visual_operations(&self, diagram_id: &str) -> SessionResult<Vec<VisualData>> {
        let state = self.lock_and_touch().await?;
        Ok(state.visual.operations(diagram_id).to_vec())
    }

    /// The current materialized elements of a diagram; empty if unknown.
    pub async fn get_diagram_state(&self, diagram_id: &str) -> SessionResult<Vec<VisualElement>> {
        let state = self.lock_and_touch().await?;
        Ok(state.visual.diagram_state(diagram_id))
    }

    /// Complexity metrics for a diagram.
    pub async fn get_diagram_complexity(
        &self,
        diagram_id: &str,
    ) -> SessionResult<DiagramComplexity> {
        let state = self.lock_and_touch().await?;
        Ok(state.visual.complexity(diagram_id))
    }

    /// Ids of diagrams structurally similar to the given one.
    pub async fn find_similar_diagrams(&self, diagram_id: &str) -> SessionResult<Vec<String>> {
        let state = self.lock_and_touch().await?;
        Ok(state.visual.find_similar(diagram_id))
    }

    /// Diagram ids of a given diagram type; empty if unknown.
    pub async fn get_diagrams_of_type(&self, diagram_type: &str) -> SessionResult<Vec<String>> {
        let state = self.lock_and_touch().await?;
        Ok(state.visual.diagrams_of_type(diagram_type))
    }

    /// First-match linear scan for a payload by its canonical key field.
    async fn find_by_key(&self, category: Category, key: &str) -> SessionResult<Option<Payload>> {
        let state = self.lock_and_touch().await?;
        Ok(state
            .store
            .get_by_category(category)
            .into_iter()
            .find(|p| p.canonical_key() == Some(key))
            .cloned())
    }

    /// Keyword search within one category (OR-semantics over query terms).
    ///
    /// Ids that no longer resolve to a stored item are dropped silently.
    /// Returns nothing when keyword indexing is disabled by configuration.
    pub async fn search(&self, category: Category, query: &str) -> SessionResult<Vec<Payload>> {
        let state = self.lock_and_touch().await?;
        let Some(index) = state.keywords.get(&category) else {
            return Ok(Vec::new());
        };
        Ok(index
            .search(query)
            .iter()
            .filter_map(|id| state.store.get(id))
            .filter(|item| item.category == category)
            .map(|item| item.payload.clone())
            .collect())
    }

    // ------------------------------------------------------------------
    // Aggregates, export/import, lifecycle
    // ------------------------------------------------------------------

    /// Aggregate statistics across all nonzero categories.
    pub async fn stats(&self) -> SessionResult<SessionStats> {
        let state = self.lock_and_touch().await?;
        let counts = state.store.counts_by_category();

        let mut tool_usage = BTreeMap::new();
        let mut total_operations = 0;
        for (category, count) in &counts {
            tool_usage.insert(category.tool_name().to_string(), *count);
            total_operations += count;
        }

        let thought_count = counts.get(&Category::Thought).copied().unwrap_or(0);
        let limit = self.inner.config.max_thoughts_per_session;

        Ok(SessionStats {
            session_id: self.inner.id.clone(),
            created_at: self.inner.created_at,
            last_accessed: state.last_access,
            tool_usage,
            total_operations,
            thought_count,
            is_active: !state.cleaned,
            remaining_thoughts: limit.saturating_sub(thought_count),
        })
    }

    /// Export the session's payloads wrapped in versioned envelopes,
    /// optionally filtered to one category. Exactly one matching payload is
    /// returned unwrapped; see [`Export`].
    pub async fn export(&self, filter: Option<Category>) -> SessionResult<Export> {
        let state = self.lock_and_touch().await?;
        let exported_at = Utc::now();

        let mut envelopes: Vec<ExportEnvelope> = state
            .store
            .get_all()
            .iter()
            .filter(|item| filter.map_or(true, |category| item.category == category))
            .map(|item| ExportEnvelope {
                format_version: EXPORT_FORMAT_VERSION.to_string(),
                exported_at,
                session_id: self.inner.id.clone(),
                category_tag: item.category,
                payload: item.payload.clone(),
            })
            .collect();

        Ok(if envelopes.len() == 1 {
            Export::Single(Box::new(envelopes.remove(0)))
        } else {
            Export::Many(envelopes)
        })
    }

    /// Export filtered by wire tag.
    ///
    /// Unlike import, which skips envelopes with unknown tags, an unknown
    /// tag here is refused: an empty result would be indistinguishable from
    /// an empty category.
    pub async fn export_by_tag(&self, tag: &str) -> SessionResult<Export> {
        let category = tag
            .parse::<Category>()
            .map_err(|_| SessionError::UnknownCategory {
                tag: tag.to_string(),
            })?;
        self.export(Some(category)).await
    }

    /// Import a single envelope or a batch of envelopes.
    ///
    /// Each envelope is routed to its category's add path by `categoryTag`.
    /// Envelopes with an unknown tag or an undecodable payload are skipped
    /// with a warning; valid envelopes in the same batch still apply. A
    /// thought rejected by the capacity cap counts as skipped.
    pub async fn import(&self, value: serde_json::Value) -> SessionResult<ImportSummary> {
        let mut state = self.lock_and_touch().await?;

        // A bare envelope is a batch of one.
        let batch = match value {
            serde_json::Value::Array(items) => items,
            single => vec![single],
        };

        let mut imported = 0;
        let mut skipped = 0;
        for envelope in batch {
            let Some(tag) = envelope.get("categoryTag").and_then(|v| v.as_str()) else {
                warn!(session_id = %self.inner.id, "skipping envelope without a category tag");
                skipped += 1;
                continue;
            };
            let Ok(category) = tag.parse::<Category>() else {
                warn!(session_id = %self.inner.id, tag, "skipping envelope with unknown category tag");
                skipped += 1;
                continue;
            };
            let payload_value = envelope.get("payload").cloned().unwrap_or(serde_json::Value::Null);
            let payload = match Payload::from_parts(category, payload_value) {
                Ok(payload) => payload,
                Err(error) => {
                    warn!(session_id = %self.inner.id, %category, %error, "skipping undecodable envelope payload");
                    skipped += 1;
                    continue;
                }
            };

            if category == Category::Thought
                && state.store.count(Category::Thought)
                    >= self.inner.config.max_thoughts_per_session
            {
                debug!(session_id = %self.inner.id, "thought capacity reached during import; envelope skipped");
                skipped += 1;
                continue;
            }

            let id = self.inner.ids.next_id(category);
            self.insert_payload(&mut state, id, payload);
            imported += 1;
        }

        Ok(ImportSummary { imported, skipped })
    }

    /// Capture the session's payloads grouped by category.
    pub async fn snapshot(&self) -> SessionResult<BTreeMap<Category, Vec<Payload>>> {
        let state = self.lock_and_touch().await?;
        Ok(state.store.export_grouped())
    }

    /// Replace the session's contents with a grouped snapshot.
    ///
    /// Derived structures are rebuilt by replaying every payload through
    /// the same insert path the live writes use. Ids are resynthesized by
    /// the session's own generator, so items added after a restore can
    /// never collide with restored ones. Payloads filed under the wrong
    /// category key are skipped with a warning.
    pub async fn restore(&self, grouped: BTreeMap<Category, Vec<Payload>>) -> SessionResult<()> {
        let mut state = self.lock_and_touch().await?;
        state.store.clear();
        state.sequential.clear();
        state.visual.clear();
        state.keywords.clear();

        for (category, payloads) in grouped {
            for payload in payloads {
                if payload.category() != category {
                    warn!(
                        session_id = %self.inner.id,
                        expected = %category,
                        actual = %payload.category(),
                        "skipping restored payload filed under the wrong category"
                    );
                    continue;
                }
                let id = self.inner.ids.next_id(category);
                self.insert_payload(&mut state, id, payload);
            }
        }

        Ok(())
    }

    /// Tear the session down: clear every structure and stop the watcher.
    ///
    /// Idempotent, and converges with timer expiry on the same terminal
    /// state; calling it on an already-cleaned session is a no-op.
    pub async fn cleanup(&self) {
        {
            let mut state = self.inner.state.lock().await;
            if !state.cleaned {
                state.clear();
                info!(session_id = %self.inner.id, "session cleaned up");
            }
        }
        self.inner.shutdown.notify_waiters();
    }

    /// Whether the session is still live (not yet expired or cleaned up).
    pub async fn is_active(&self) -> bool {
        !self.inner.state.lock().await.cleaned
    }

    /// The session identifier.
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// When the session was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.inner.created_at
    }

    /// When the session was last touched.
    pub async fn last_accessed(&self) -> DateTime<Utc> {
        self.inner.state.lock().await.last_access
    }
}
