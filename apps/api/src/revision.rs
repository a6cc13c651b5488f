//! Bounded revision loop — re-invokes the LLM until a reply satisfies a check.
//!
//! Each rejected reply is appended to the conversation as an assistant turn,
//! followed by the correction as a user turn, so the model sees exactly what
//! was wrong. After `max_attempts` replies the loop gives up with
//! `AppError::ConstraintUnsatisfied`.

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::{parse_json, CompletionRequest, CompletionService, Turn};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevisionPolicy {
    pub max_attempts: u32,
}

impl RevisionPolicy {
    /// `max_attempts` is clamped to at least one call.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }
}

impl Default for RevisionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

/// Outcome of a check on one reply. `Err` carries the correction instruction.
pub type Verdict = Result<(), String>;

/// Why a reply was not accepted.
enum Rejection {
    /// Send the reply back with this correction.
    Revise(String),
    /// Stop the loop.
    Fatal(AppError),
}

/// Text-mode loop. Returns the first reply for which `check` passes.
pub async fn revise_text<F>(
    llm: &dyn CompletionService,
    request: CompletionRequest,
    policy: RevisionPolicy,
    stage: &'static str,
    check: F,
) -> Result<String, AppError>
where
    F: Fn(&str) -> Verdict,
{
    revise(llm, request, policy, stage, |reply| {
        check(reply)
            .map(|()| reply.to_string())
            .map_err(Rejection::Revise)
    })
    .await
}

/// JSON-mode loop. A reply that does not parse as `T` fails immediately;
/// a reply that parses but fails `check` is sent back for revision.
pub async fn revise_json<T, F>(
    llm: &dyn CompletionService,
    request: CompletionRequest,
    policy: RevisionPolicy,
    stage: &'static str,
    check: F,
) -> Result<T, AppError>
where
    T: DeserializeOwned,
    F: Fn(&T) -> Verdict,
{
    revise(llm, request, policy, stage, |reply| {
        let value: T = parse_json(reply).map_err(|e| {
            Rejection::Fatal(AppError::Llm(format!("{stage} returned malformed JSON: {e}")))
        })?;
        check(&value).map(|()| value).map_err(Rejection::Revise)
    })
    .await
}

async fn revise<T, F>(
    llm: &dyn CompletionService,
    mut request: CompletionRequest,
    policy: RevisionPolicy,
    stage: &'static str,
    accept: F,
) -> Result<T, AppError>
where
    F: Fn(&str) -> Result<T, Rejection>,
{
    let mut last_reason = String::new();

    for attempt in 1..=policy.max_attempts {
        let reply = llm
            .complete(&request)
            .await
            .map_err(|e| AppError::Llm(format!("{stage} call failed: {e}")))?;

        match accept(&reply) {
            Ok(value) => {
                if attempt > 1 {
                    info!(stage, attempt, "Constraint satisfied after revision");
                }
                return Ok(value);
            }
            Err(Rejection::Fatal(e)) => return Err(e),
            Err(Rejection::Revise(correction)) => {
                warn!(
                    stage,
                    attempt,
                    max_attempts = policy.max_attempts,
                    "Constraint not satisfied, requesting revision: {}",
                    correction
                );
                request.history.push(Turn::assistant(reply));
                request.history.push(Turn::user(correction.clone()));
                last_reason = correction;
            }
        }
    }

    Err(AppError::ConstraintUnsatisfied {
        stage,
        attempts: policy.max_attempts,
        reason: last_reason,
    })
}

/// Counts characters (not bytes); Hangul syllables count as one each.
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}
