//! End-to-end tests for the moderator and the batch runner

mod common;

use common::{comments, FailingGenerator, MockGenerator};
use commentguard_classifiers::moderator::PREFILTER_EXPLANATION;
use commentguard_classifiers::{
    BatchModerator, ContentModerator, DecisionPath, HeuristicClassifier, ProfanityFilter,
    RemoteClassifier, TextGenerator,
};
use commentguard_core::dataset::{
    EXPLANATION, IS_OFFENSIVE, MOCK_MODE, OFFENSE_TYPE, PRE_FILTERED,
};
use commentguard_core::{Error, OffenseType};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn remote_moderator(generator: Arc<dyn TextGenerator>, prefilter: bool) -> ContentModerator {
    let remote = RemoteClassifier::new(generator).with_request_delay(Duration::ZERO);
    let filter = prefilter.then(|| ProfanityFilter::new().unwrap());
    ContentModerator::remote(remote, filter)
}

#[tokio::test]
async fn test_prefilter_hit_makes_no_remote_call() {
    let generator = Arc::new(MockGenerator::json(false, None, "fine"));
    let moderator = remote_moderator(generator.clone(), true);

    for text in ["what the fuck", "You BASTARD", "total bullshit, mate"] {
        let result = moderator.classify(text).await;
        assert_eq!(result.path, DecisionPath::PreFiltered);
        assert!(result.verdict.is_offensive);
        assert_eq!(result.verdict.offense_type, Some(OffenseType::Profanity));
        assert!(result.verdict.pre_filtered);
        assert!(!result.verdict.mock_mode);
        assert_eq!(result.verdict.explanation, PREFILTER_EXPLANATION);
    }

    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_remote_verdict_is_used() {
    let generator = Arc::new(MockGenerator::json(true, Some("hate_speech"), "Targets a group"));
    let moderator = remote_moderator(generator.clone(), true);

    let result = moderator.classify("Those people ruin everything").await;

    assert_eq!(result.path, DecisionPath::Remote);
    assert_eq!(result.verdict.offense_type, Some(OffenseType::HateSpeech));
    assert_eq!(result.verdict.explanation, "Targets a group");
    assert!(!result.verdict.mock_mode);
    assert!(!result.verdict.pre_filtered);
    assert_eq!(generator.call_count(), 1);
    assert!(generator.prompts()[0].contains("\"Those people ruin everything\""));
}

#[tokio::test]
async fn test_remote_failure_matches_heuristic() {
    let generator = Arc::new(FailingGenerator::new());
    let moderator = remote_moderator(generator.clone(), false);
    let heuristic = HeuristicClassifier::new();

    for text in [
        "I will kill you",
        "You are all idiots, go away",
        "Great discussion today!",
        "This app is useless and annoying!",
    ] {
        let result = moderator.classify(text).await;
        let expected = heuristic.evaluate(text);

        assert!(matches!(result.path, DecisionPath::HeuristicFallback { .. }));
        assert_eq!(result.verdict.is_offensive, expected.is_offensive);
        assert_eq!(result.verdict.offense_type, expected.offense_type);
        assert!(result.verdict.mock_mode);
        assert!(!result.verdict.pre_filtered);
    }

    assert_eq!(generator.call_count(), 4);
}

#[tokio::test]
async fn test_fallback_reason_is_reported() {
    let generator = Arc::new(FailingGenerator::new().with_error("HTTP 429"));
    let moderator = remote_moderator(generator, false);

    let result = moderator.classify("hello").await;
    let reason = result.path.fallback_reason().unwrap();
    assert!(reason.contains("HTTP 429"));
}

#[tokio::test]
async fn test_unparseable_reply_falls_back() {
    let generator = Arc::new(MockGenerator::new("{\"verdict\": \"maybe\"}"));
    let moderator = remote_moderator(generator, false);

    let result = moderator.classify("I will kill you").await;

    assert!(matches!(result.path, DecisionPath::HeuristicFallback { .. }));
    assert_eq!(result.verdict.offense_type, Some(OffenseType::Threat));
    assert!(result.verdict.mock_mode);
}

#[tokio::test]
async fn test_free_text_reply_is_remote_verdict() {
    let generator = Arc::new(MockGenerator::new(
        "Yes, this is a threat. explanation: promises violence",
    ));
    let moderator = remote_moderator(generator, false);

    let result = moderator.classify("watch your back").await;

    assert_eq!(result.path, DecisionPath::Remote);
    assert_eq!(result.verdict.offense_type, Some(OffenseType::Threat));
    assert_eq!(result.verdict.explanation, "promises violence");
    assert!(!result.verdict.mock_mode);
}

#[tokio::test]
async fn test_offline_end_to_end_example() {
    let mut data = comments(&[
        (1, "You are all idiots, go away"),
        (2, "Great discussion today!"),
        (3, "I will kill you"),
    ]);
    let batch = BatchModerator::new(ContentModerator::offline(Some(ProfanityFilter::new().unwrap())));

    let summary = batch
        .classify_all(&mut data, "comment_text", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.classified, 3);
    assert_eq!(summary.heuristic, 3);
    assert_eq!(summary.pre_filtered, 0);

    assert_eq!(data.get(0, IS_OFFENSIVE), Some(&json!(true)));
    assert_eq!(data.get(0, OFFENSE_TYPE), Some(&json!("harassment")));
    assert_eq!(data.get(1, IS_OFFENSIVE), Some(&json!(false)));
    assert_eq!(data.get(1, OFFENSE_TYPE), Some(&Value::Null));
    assert_eq!(data.get(2, IS_OFFENSIVE), Some(&json!(true)));
    assert_eq!(data.get(2, OFFENSE_TYPE), Some(&json!("threat")));

    for row in 0..3 {
        assert_eq!(data.get(row, MOCK_MODE), Some(&json!(true)));
        assert_eq!(data.get(row, PRE_FILTERED), Some(&json!(false)));
        assert!(data.get(row, EXPLANATION).unwrap().is_string());
    }
}

#[tokio::test]
async fn test_rerun_on_classified_dataset_is_a_no_op() {
    let mut data = comments(&[(1, "I will kill you"), (2, "hello")]);
    BatchModerator::new(ContentModerator::offline(None))
        .classify_all(&mut data, "comment_text", &CancellationToken::new())
        .await
        .unwrap();
    let snapshot = data.clone();

    let generator = Arc::new(MockGenerator::json(true, Some("toxicity"), "changed"));
    let summary = BatchModerator::new(remote_moderator(generator.clone(), true))
        .classify_all(&mut data, "comment_text", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(data, snapshot);
    assert_eq!(summary.classified, 0);
    assert_eq!(summary.skipped, 2);
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_partial_rerun_only_classifies_pending_rows() {
    let mut data = comments(&[(1, "first"), (2, "second"), (3, "third")]);

    // row 2 was finished by an earlier run
    let mut done = data.row(1).unwrap().clone();
    done.insert(IS_OFFENSIVE.into(), json!(true));
    done.insert(OFFENSE_TYPE.into(), json!("misinformation"));
    done.insert(EXPLANATION.into(), json!("from an earlier run"));
    done.insert(PRE_FILTERED.into(), json!(false));
    done.insert(MOCK_MODE.into(), json!(false));
    data.replace_row(1, done.clone()).unwrap();

    let generator = Arc::new(MockGenerator::json(false, None, "Harmless"));
    let summary = BatchModerator::new(remote_moderator(generator.clone(), true))
        .classify_all(&mut data, "comment_text", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(generator.call_count(), 2);
    assert_eq!(summary.remote, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(data.row(1).unwrap(), &done);
    assert_eq!(data.get(0, EXPLANATION), Some(&json!("Harmless")));
    assert_eq!(data.get(2, EXPLANATION), Some(&json!("Harmless")));
    assert!(generator.prompts()[1].contains("\"third\""));
}

#[tokio::test]
async fn test_only_explanation_marks_a_row_done() {
    let mut data = comments(&[(1, "I will kill you")]);
    let mut row = data.row(0).unwrap().clone();
    row.insert(IS_OFFENSIVE.into(), json!(true));
    row.insert(OFFENSE_TYPE.into(), json!("toxicity"));
    data.replace_row(0, row).unwrap();

    BatchModerator::new(ContentModerator::offline(None))
        .classify_all(&mut data, "comment_text", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(data.get(0, OFFENSE_TYPE), Some(&json!("threat")));
}

/// Cancels the shared token when the moderator is asked about a given text
struct CancellingGenerator {
    trigger: &'static str,
    cancel: CancellationToken,
}

#[async_trait::async_trait]
impl TextGenerator for CancellingGenerator {
    async fn generate(&self, prompt: &str) -> commentguard_core::Result<String> {
        if prompt.contains(self.trigger) {
            self.cancel.cancel();
        }
        Ok(r#"{"is_offensive": false, "offense_type": null, "explanation": "ok"}"#.to_string())
    }

    fn model(&self) -> &str {
        "cancelling"
    }
}

#[tokio::test]
async fn test_cancellation_keeps_finished_rows() {
    let cancel = CancellationToken::new();
    let generator = Arc::new(CancellingGenerator {
        trigger: "second",
        cancel: cancel.clone(),
    });
    let mut data = comments(&[(1, "first"), (2, "second"), (3, "third")]);

    let err = BatchModerator::new(remote_moderator(generator, false))
        .classify_all(&mut data, "comment_text", &cancel)
        .await
        .unwrap_err();

    // the row in flight when the interrupt arrived still completes
    assert!(matches!(err, Error::Cancelled { processed: 2 }));
    assert_eq!(data.get(0, EXPLANATION), Some(&json!("ok")));
    assert_eq!(data.get(1, EXPLANATION), Some(&json!("ok")));
    assert_eq!(data.get(2, EXPLANATION), Some(&Value::Null));
    assert_eq!(data.get(2, MOCK_MODE), Some(&json!(false)));

    // resuming picks up where the interrupted run stopped
    let generator = Arc::new(MockGenerator::json(false, None, "resumed"));
    BatchModerator::new(remote_moderator(generator.clone(), false))
        .classify_all(&mut data, "comment_text", &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(generator.call_count(), 1);
    assert_eq!(data.get(2, EXPLANATION), Some(&json!("resumed")));
}
