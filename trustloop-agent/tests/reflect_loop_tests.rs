use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use trustloop_agent::{
    BoundaryPolicy, FnCorrector, FnScorer, LlmCorrector, ReflectLoop, Verdict,
};
use trustloop_core::{TrustError, TrustScorer};
use trustloop_model::{MockLlm, RetryConfig};

/// Scorer returning a scripted sequence of scores and recording what it saw.
struct ScriptedScorer {
    scores: Mutex<VecDeque<f64>>,
    seen: Mutex<Vec<String>>,
}

impl ScriptedScorer {
    fn new(scores: &[f64]) -> Arc<Self> {
        Arc::new(Self {
            scores: Mutex::new(scores.iter().copied().collect()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TrustScorer for ScriptedScorer {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn score(&self, text: &str) -> trustloop_core::Result<f64> {
        self.seen.lock().unwrap().push(text.to_string());
        self.scores
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TrustError::Service("script exhausted".to_string()))
    }
}

fn numbered_corrector(calls: Arc<AtomicU32>) -> FnCorrector {
    FnCorrector::new("numbered", move |_text| {
        let calls = Arc::clone(&calls);
        async move {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(format!("revision {n}"))
        }
    })
}

#[tokio::test]
async fn fail_then_pass_returns_corrected_text_after_two_iterations() {
    let scorer = ScriptedScorer::new(&[0.86, 0.91]);
    let corrections = Arc::new(AtomicU32::new(0));

    let corrector = Arc::new(numbered_corrector(corrections.clone()));
    let outcome = ReflectLoop::new(scorer.clone(), corrector)
        .with_threshold(0.87)
        .with_max_iterations(3)
        .run("original")
        .await
        .unwrap();

    assert_eq!(outcome.final_text, "revision 1");
    assert_eq!(outcome.iterations(), 2);
    assert_eq!(outcome.history.len(), 2);
    assert!(outcome.converged());
    assert_eq!(outcome.history[0].verdict, Verdict::Fail);
    assert_eq!(outcome.history[0].candidate.text(), "original");
    assert_eq!(outcome.history[1].verdict, Verdict::Pass);
    assert_eq!(outcome.final_score(), Some(0.91));
    assert_eq!(corrections.load(Ordering::SeqCst), 1);
    assert_eq!(scorer.seen(), vec!["original", "revision 1"]);
}

#[tokio::test]
async fn single_iteration_bound_returns_original_text() {
    let scorer = ScriptedScorer::new(&[0.5]);
    let corrections = Arc::new(AtomicU32::new(0));

    let outcome = ReflectLoop::new(scorer, Arc::new(numbered_corrector(corrections.clone())))
        .with_threshold(0.87)
        .with_max_iterations(1)
        .run("original")
        .await
        .unwrap();

    assert_eq!(outcome.final_text, "original");
    assert_eq!(outcome.iterations(), 1);
    assert_eq!(outcome.verdict, Verdict::Fail);
    assert!(!outcome.converged());
    assert_eq!(corrections.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn immediate_pass_leaves_text_unmodified() {
    let scorer = ScriptedScorer::new(&[0.99]);
    let corrections = Arc::new(AtomicU32::new(0));

    let outcome = ReflectLoop::new(scorer, Arc::new(numbered_corrector(corrections.clone())))
        .run("already reliable")
        .await
        .unwrap();

    assert_eq!(outcome.final_text, "already reliable");
    assert_eq!(outcome.iterations(), 1);
    assert!(outcome.converged());
    assert_eq!(corrections.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn huge_iteration_bound_only_pays_for_iterations_run() {
    let scorer = ScriptedScorer::new(&[0.99]);

    let outcome = ReflectLoop::new(scorer.clone(), Arc::new(FnCorrector::identity()))
        .with_max_iterations(u32::MAX)
        .run("already fine")
        .await
        .unwrap();

    assert!(outcome.converged());
    assert_eq!(outcome.iterations(), 1);
    assert_eq!(outcome.final_text, "already fine");
    assert_eq!(scorer.seen(), vec!["already fine"]);
}

#[tokio::test]
async fn exhaustion_returns_last_scored_candidate() {
    let scorer = ScriptedScorer::new(&[0.2, 0.4, 0.6]);
    let corrections = Arc::new(AtomicU32::new(0));

    let outcome = ReflectLoop::new(scorer, Arc::new(numbered_corrector(corrections.clone())))
        .with_max_iterations(3)
        .run("original")
        .await
        .unwrap();

    assert_eq!(outcome.final_text, "revision 2");
    assert_eq!(outcome.scores(), vec![0.2, 0.4, 0.6]);
    assert_eq!(outcome.verdict, Verdict::Fail);
    assert_eq!(corrections.load(Ordering::SeqCst), 2);
    assert_eq!(outcome.corrections(), 2);
}

#[tokio::test]
async fn boundary_score_follows_policy() {
    let inclusive = ReflectLoop::new(
        ScriptedScorer::new(&[0.87]),
        Arc::new(FnCorrector::identity()),
    )
        .with_threshold(0.87)
        .with_max_iterations(1)
        .run("text")
        .await
        .unwrap();
    assert_eq!(inclusive.verdict, Verdict::Pass);

    let strict = ReflectLoop::new(
        ScriptedScorer::new(&[0.87]),
        Arc::new(FnCorrector::identity()),
    )
        .with_threshold(0.87)
        .with_boundary(BoundaryPolicy::Strict)
        .with_max_iterations(1)
        .run("text")
        .await
        .unwrap();
    assert_eq!(strict.verdict, Verdict::Fail);
}

#[tokio::test]
async fn scorer_failure_aborts_run_without_retry_policy() {
    let attempts = Arc::new(AtomicU32::new(0));
    let scorer = {
        let attempts = Arc::clone(&attempts);
        FnScorer::new("flaky", move |_text| {
            let attempts = Arc::clone(&attempts);
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<f64, _>(TrustError::Service("HTTP 429 rate limit".to_string()))
            }
        })
    };

    let err = ReflectLoop::new(Arc::new(scorer), Arc::new(FnCorrector::identity()))
        .run("text")
        .await
        .unwrap_err();

    assert!(matches!(err, TrustError::Service(_)));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn retry_policy_recovers_from_transient_scorer_failure() {
    let attempts = Arc::new(AtomicU32::new(0));
    let scorer = {
        let attempts = Arc::clone(&attempts);
        FnScorer::new("flaky", move |_text| {
            let attempts = Arc::clone(&attempts);
            async move {
                if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                    return Err(TrustError::Service("503 unavailable".to_string()));
                }
                Ok(0.95)
            }
        })
    };

    let outcome = ReflectLoop::new(Arc::new(scorer), Arc::new(FnCorrector::identity()))
        .with_retry_config(
            RetryConfig::default()
                .with_max_retries(2)
                .with_initial_delay(Duration::ZERO)
                .with_max_delay(Duration::ZERO),
        )
        .run("text")
        .await
        .unwrap();

    assert!(outcome.converged());
    assert_eq!(outcome.iterations(), 1);
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn corrector_failure_propagates() {
    let corrector = FnCorrector::new("broken", |_text| async move {
        Err::<String, _>(TrustError::Service("HTTP 401 unauthorized".to_string()))
    });

    let err = ReflectLoop::new(ScriptedScorer::new(&[0.1, 0.9]), Arc::new(corrector))
        .run("text")
        .await
        .unwrap_err();
    assert!(matches!(err, TrustError::Service(_)));
}

#[tokio::test]
async fn iteration_callbacks_see_every_entry() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let outcome = ReflectLoop::new(
        ScriptedScorer::new(&[0.3, 0.5, 0.9]),
        Arc::new(FnCorrector::identity()),
    )
        .with_max_iterations(5)
        .on_iteration(Box::new(move |entry| {
            sink.lock().unwrap().push((entry.iteration, entry.verdict));
        }))
        .run("text")
        .await
        .unwrap();

    assert_eq!(outcome.iterations(), 3);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![(1, Verdict::Fail), (2, Verdict::Fail), (3, Verdict::Pass)]
    );
}

#[tokio::test]
async fn llm_corrector_drives_the_loop() {
    let model = Arc::new(
        MockLlm::new("corrector")
            .with_turn("The Eiffel Tower is about 330 metres tall.")
            .with_turn("unused"),
    );
    let scorer = Arc::new(FnScorer::new("keyword", |text| async move {
        Ok(if text.contains("330") { 0.93 } else { 0.41 })
    }));

    let outcome = ReflectLoop::new(scorer, Arc::new(LlmCorrector::new(model.clone())))
        .run("The Eiffel Tower is 500 metres tall.")
        .await
        .unwrap();

    assert!(outcome.converged());
    assert_eq!(outcome.final_text, "The Eiffel Tower is about 330 metres tall.");
    assert_eq!(model.call_count(), 1);
}

#[tokio::test]
async fn history_serializes_for_audit() {
    let outcome = ReflectLoop::new(
        ScriptedScorer::new(&[0.5, 0.9]),
        Arc::new(FnCorrector::identity()),
    )
        .run("text")
        .await
        .unwrap();

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["verdict"], "PASS");
    assert_eq!(json["history"][0]["verdict"], "FAIL");
    assert_eq!(json["history"][1]["iteration"], 2);
    assert_eq!(json["history"][1]["candidate"]["score"], 0.9);
}
