//! Angle fan-out orchestrator — the core of the generation pipeline.
//!
//! Flow per request: resolve angles → for each angle (until the draft cap is
//! met): web search → build prompt → model call → record outcome → aggregate.
//! A single angle's failure never aborts the request; the request fails only
//! when every attempted angle fails.
//!
//! The orchestrator is stateless: all per-request state lives in the call,
//! so it is safe to run for concurrent requests.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::llm_client::CompletionProvider;
use crate::prompts::{build_generation_prompt, GENERATION_SYSTEM};
use crate::search_client::SearchProvider;

/// Generation wants variety; analysis wants determinism.
pub const GENERATION_TEMPERATURE: f32 = 0.75;
/// Posts can run long; allow more output room than analysis needs.
pub const GENERATION_MAX_TOKENS: u32 = 1500;

/// Bounds on per-request fan-out work.
#[derive(Debug, Clone, Copy)]
pub struct FanoutLimits {
    /// Stop launching angle units once this many drafts have succeeded.
    pub max_drafts: usize,
    /// Snippets requested per angle search.
    pub search_results_per_angle: usize,
}

impl Default for FanoutLimits {
    fn default() -> Self {
        Self {
            max_drafts: 3,
            search_results_per_angle: 3,
        }
    }
}

/// Request body for draft generation.
///
/// `subjects_or_angles` accepts either a JSON list or a single string; a
/// blank string normalizes to the empty list.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub style_id: Uuid,
    pub topic: String,
    pub key_points: String,
    pub cta: Option<String>,
    #[serde(default, deserialize_with = "string_or_list")]
    pub subjects_or_angles: Vec<String>,
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<StringOrList>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(StringOrList::One(s)) if s.trim().is_empty() => Vec::new(),
        Some(StringOrList::One(s)) => vec![s],
        Some(StringOrList::Many(list)) => list,
    })
}

/// Pipeline-level failure. Per-angle causes are logged, not surfaced.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to generate any drafts: all {attempted} angle attempt(s) failed")]
    AllAttemptsFailed { attempted: usize },
}

/// Result of one angle's unit of work, held in angle order until aggregation.
#[derive(Debug)]
enum AngleOutcome {
    Success(String),
    Failure { angle: String, cause: String },
}

/// Runs the multi-angle generation pipeline.
///
/// Angle resolution: the request's angle list verbatim when non-empty,
/// otherwise the topic itself as the sole angle — the pipeline always has at
/// least one unit of work.
///
/// Returned drafts preserve the input angle order and never exceed
/// `limits.max_drafts`.
pub async fn generate_drafts(
    llm: &dyn CompletionProvider,
    search: &dyn SearchProvider,
    style_analysis: &Value,
    request: &GenerateRequest,
    limits: FanoutLimits,
) -> Result<Vec<String>, PipelineError> {
    let angles: Vec<&str> = if request.subjects_or_angles.is_empty() {
        vec![request.topic.as_str()]
    } else {
        request.subjects_or_angles.iter().map(String::as_str).collect()
    };

    let mut outcomes: Vec<AngleOutcome> = Vec::with_capacity(angles.len());
    let mut successes = 0usize;

    for (i, angle) in angles.iter().enumerate() {
        if successes >= limits.max_drafts {
            info!(
                "draft cap {} reached; skipping {} remaining angle(s)",
                limits.max_drafts,
                angles.len() - i
            );
            break;
        }

        info!("exploring angle {}/{}: {angle}", i + 1, angles.len());

        // Search degradation is non-fatal: an empty result list is a valid
        // input to the prompt builder.
        let query = format!("{} {}", request.topic, angle);
        let results = search.search(&query, limits.search_results_per_angle).await;
        debug!("{} search snippet(s) for query {query:?}", results.len());

        let prompt = build_generation_prompt(
            style_analysis,
            &request.topic,
            &request.key_points,
            request.cta.as_deref(),
            angle,
            &results,
        );

        let outcome = match llm
            .complete(&prompt, GENERATION_SYSTEM, GENERATION_MAX_TOKENS, GENERATION_TEMPERATURE)
            .await
        {
            Ok(draft) if draft.trim().is_empty() => AngleOutcome::Failure {
                angle: (*angle).to_string(),
                cause: "model returned an empty draft".to_string(),
            },
            Ok(draft) => {
                successes += 1;
                AngleOutcome::Success(draft.trim().to_string())
            }
            Err(e) => AngleOutcome::Failure {
                angle: (*angle).to_string(),
                cause: e.to_string(),
            },
        };
        outcomes.push(outcome);
    }

    let attempted = outcomes.len();
    let mut drafts = Vec::with_capacity(successes);
    for outcome in outcomes {
        match outcome {
            AngleOutcome::Success(draft) => drafts.push(draft),
            AngleOutcome::Failure { angle, cause } => {
                warn!("no draft for angle {angle:?}: {cause}");
            }
        }
    }

    if drafts.is_empty() {
        return Err(PipelineError::AllAttemptsFailed { attempted });
    }

    info!("generated {}/{} draft(s)", drafts.len(), attempted);
    Ok(drafts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::search_client::{BraveSearchClient, SearchResult};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted completion double: pops one entry per call.
    /// `Some(text)` completes with the text; `None` fails with a rate limit.
    struct StubLlm {
        script: Mutex<VecDeque<Option<String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl StubLlm {
        fn new(script: Vec<Option<&str>>) -> Self {
            Self {
                script: Mutex::new(
                    script.into_iter().map(|s| s.map(String::from)).collect(),
                ),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionProvider for StubLlm {
        async fn complete(
            &self,
            prompt: &str,
            _system: &str,
            _max_tokens: u32,
            _temperature: f32,
        ) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match self.script.lock().unwrap().pop_front() {
                Some(Some(text)) => Ok(text),
                Some(None) => Err(LlmError::RateLimited),
                None => panic!("more model calls than scripted"),
            }
        }
    }

    /// Search double that records queries and answers from a fixed script.
    struct StubSearch {
        script: Mutex<VecDeque<Vec<SearchResult>>>,
        queries: Mutex<Vec<String>>,
    }

    impl StubSearch {
        fn new(script: Vec<Vec<SearchResult>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                queries: Mutex::new(Vec::new()),
            }
        }

        fn empty() -> Self {
            Self::new(Vec::new())
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SearchProvider for StubSearch {
        async fn search(&self, query: &str, _count: usize) -> Vec<SearchResult> {
            self.queries.lock().unwrap().push(query.to_string());
            self.script.lock().unwrap().pop_front().unwrap_or_default()
        }
    }

    fn snippet(title: &str) -> SearchResult {
        SearchResult {
            title: title.to_string(),
            description: format!("about {title}"),
        }
    }

    fn request(topic: &str, angles: &[&str]) -> GenerateRequest {
        GenerateRequest {
            style_id: Uuid::new_v4(),
            topic: topic.to_string(),
            key_points: "- point one\n- point two".to_string(),
            cta: None,
            subjects_or_angles: angles.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn analysis() -> Value {
        json!({"overall_tone": "Informal", "perspective": "First-person"})
    }

    #[tokio::test]
    async fn two_angles_preserve_order_and_call_counts() {
        // Snippets for "A", nothing for "B"; both model calls succeed.
        let llm = StubLlm::new(vec![Some("draft for A"), Some("draft for B")]);
        let search = StubSearch::new(vec![vec![snippet("a-context")], vec![]]);
        let req = request("Remote Work", &["A", "B"]);

        let drafts = generate_drafts(&llm, &search, &analysis(), &req, FanoutLimits::default())
            .await
            .unwrap();

        assert_eq!(drafts, vec!["draft for A", "draft for B"]);
        assert_eq!(llm.calls(), 2);
        assert_eq!(search.queries(), vec!["Remote Work A", "Remote Work B"]);
    }

    #[tokio::test]
    async fn empty_angle_list_synthesizes_topic_as_sole_angle() {
        let llm = StubLlm::new(vec![Some("the one draft")]);
        let search = StubSearch::new(vec![vec![]]);
        let req = request("Remote Work", &[]);

        let drafts = generate_drafts(&llm, &search, &analysis(), &req, FanoutLimits::default())
            .await
            .unwrap();

        assert_eq!(drafts.len(), 1);
        assert_eq!(llm.calls(), 1);
        // Known quirk: the topic is used as both topic and angle, so the
        // fallback query doubles it.
        assert_eq!(search.queries(), vec!["Remote Work Remote Work"]);
    }

    #[tokio::test]
    async fn stops_launching_work_once_cap_is_met() {
        let llm = StubLlm::new(vec![Some("d1"), Some("d2"), Some("d3")]);
        let search = StubSearch::empty();
        let req = request("Topic", &["a", "b", "c", "d", "e", "f"]);

        let drafts = generate_drafts(&llm, &search, &analysis(), &req, FanoutLimits::default())
            .await
            .unwrap();

        assert_eq!(drafts.len(), 3);
        assert_eq!(llm.calls(), 3);
        assert_eq!(search.queries().len(), 3);
    }

    #[tokio::test]
    async fn failures_beyond_cap_keep_the_pipeline_going() {
        // First two angles fail; cap 2 is only met after four attempts.
        let llm = StubLlm::new(vec![None, None, Some("d1"), Some("d2")]);
        let search = StubSearch::empty();
        let req = request("Topic", &["a", "b", "c", "d", "e"]);
        let limits = FanoutLimits {
            max_drafts: 2,
            ..FanoutLimits::default()
        };

        let drafts = generate_drafts(&llm, &search, &analysis(), &req, limits)
            .await
            .unwrap();

        assert_eq!(drafts, vec!["d1", "d2"]);
        assert_eq!(llm.calls(), 4);
    }

    #[tokio::test]
    async fn single_angle_failure_is_swallowed() {
        let llm = StubLlm::new(vec![None, Some("draft for B")]);
        let search = StubSearch::empty();
        let req = request("Topic", &["A", "B"]);

        let drafts = generate_drafts(&llm, &search, &analysis(), &req, FanoutLimits::default())
            .await
            .unwrap();

        assert_eq!(drafts, vec!["draft for B"]);
    }

    #[tokio::test]
    async fn whitespace_only_draft_counts_as_failure() {
        let llm = StubLlm::new(vec![Some("   \n\t  "), Some("real draft")]);
        let search = StubSearch::empty();
        let req = request("Topic", &["A", "B"]);

        let drafts = generate_drafts(&llm, &search, &analysis(), &req, FanoutLimits::default())
            .await
            .unwrap();

        assert_eq!(drafts, vec!["real draft"]);
        assert_eq!(llm.calls(), 2);
    }

    #[tokio::test]
    async fn all_failures_aggregate_to_all_attempts_failed() {
        let llm = StubLlm::new(vec![None, None]);
        let search = StubSearch::empty();
        let req = request("Topic", &["A", "B"]);

        let err = generate_drafts(&llm, &search, &analysis(), &req, FanoutLimits::default())
            .await
            .unwrap_err();

        let PipelineError::AllAttemptsFailed { attempted } = err;
        assert_eq!(attempted, 2);
        assert_eq!(llm.calls(), 2);
    }

    #[tokio::test]
    async fn unconfigured_search_does_not_block_generation() {
        // Real search client with no credential: silent no-search mode.
        let llm = StubLlm::new(vec![Some("draft without context")]);
        let search = BraveSearchClient::new(None);
        let req = request("Remote Work", &["hiring"]);

        let drafts = generate_drafts(&llm, &search, &analysis(), &req, FanoutLimits::default())
            .await
            .unwrap();

        assert_eq!(drafts, vec!["draft without context"]);
    }

    #[tokio::test]
    async fn search_snippets_reach_the_prompt() {
        let llm = StubLlm::new(vec![Some("draft")]);
        let search = StubSearch::new(vec![vec![snippet("remote onboarding")]]);
        let req = request("Remote Work", &["onboarding"]);

        generate_drafts(&llm, &search, &analysis(), &req, FanoutLimits::default())
            .await
            .unwrap();

        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[0].contains("- Title: remote onboarding"));
        assert!(prompts[0].contains("**Specific Angle/Focus for this draft:** onboarding"));
    }

    #[test]
    fn request_accepts_angles_as_list() {
        let req: GenerateRequest = serde_json::from_value(json!({
            "style_id": Uuid::new_v4(),
            "topic": "t",
            "key_points": "k",
            "subjects_or_angles": ["a", "b"]
        }))
        .unwrap();
        assert_eq!(req.subjects_or_angles, vec!["a", "b"]);
    }

    #[test]
    fn request_accepts_single_string_angle() {
        let req: GenerateRequest = serde_json::from_value(json!({
            "style_id": Uuid::new_v4(),
            "topic": "t",
            "key_points": "k",
            "subjects_or_angles": "just one"
        }))
        .unwrap();
        assert_eq!(req.subjects_or_angles, vec!["just one"]);
    }

    #[test]
    fn request_normalizes_blank_string_and_missing_field_to_empty() {
        let blank: GenerateRequest = serde_json::from_value(json!({
            "style_id": Uuid::new_v4(),
            "topic": "t",
            "key_points": "k",
            "subjects_or_angles": "   "
        }))
        .unwrap();
        assert!(blank.subjects_or_angles.is_empty());

        let missing: GenerateRequest = serde_json::from_value(json!({
            "style_id": Uuid::new_v4(),
            "topic": "t",
            "key_points": "k"
        }))
        .unwrap();
        assert!(missing.subjects_or_angles.is_empty());
    }
}
