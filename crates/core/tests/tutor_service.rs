//! Integration tests for the tutoring sequence

mod support;

use std::sync::Arc;

use studylens_common::{ApiError, CallContext, EventLevel, EventLog, EventQuery};
use studylens_core::TutorService;
use studylens_domain::GenerationKind;
use support::{ScriptedGenerator, ScriptedRecognizer};

fn service(
    recognizer: Arc<ScriptedRecognizer>,
    generator: Arc<ScriptedGenerator>,
) -> (TutorService, Arc<EventLog>) {
    let events = Arc::new(EventLog::new(100));
    (TutorService::new(recognizer, generator, events.clone()), events)
}

fn levels(events: &EventLog, session: &str) -> Vec<EventLevel> {
    events.query(&EventQuery::new().session(session)).into_iter().map(|e| e.level).collect()
}

#[tokio::test]
async fn analyze_page_recognizes_then_explains() {
    let recognizer = Arc::new(ScriptedRecognizer::returning(Ok("Newton's laws".into())));
    let generator = Arc::new(ScriptedGenerator::returning(Ok("Objects keep moving".into())));
    let (service, events) = service(recognizer.clone(), generator.clone());
    let ctx = CallContext::for_session("page-1");

    let analysis = service.analyze_page(b"png-bytes", Some("Summarize"), &ctx).await.unwrap();

    assert_eq!(analysis.extracted_text, "Newton's laws");
    assert_eq!(analysis.explanation, "Objects keep moving");
    assert_eq!(recognizer.images.lock().as_slice(), &[b"png-bytes".to_vec()]);

    let requests = generator.requests.lock();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].kind, GenerationKind::Explanation);
    assert_eq!(requests[0].directive, "Summarize");
    assert_eq!(requests[0].content, "Newton's laws");

    assert_eq!(levels(&events, "page-1"), vec![EventLevel::Info, EventLevel::Success]);
}

#[tokio::test]
async fn empty_recognition_skips_generation_with_warning() {
    let recognizer = Arc::new(ScriptedRecognizer::returning(Ok("   ".into())));
    let generator = Arc::new(ScriptedGenerator::default());
    let (service, events) = service(recognizer, generator.clone());
    let ctx = CallContext::for_session("blank");

    let analysis = service.analyze_page(b"img", None, &ctx).await.unwrap();

    assert!(!analysis.has_text());
    assert!(analysis.explanation.is_empty());
    assert!(generator.requests.lock().is_empty());
    assert_eq!(levels(&events, "blank"), vec![EventLevel::Info, EventLevel::Warning]);
}

#[tokio::test]
async fn recognition_failure_is_propagated_and_logged() {
    let failure = ApiError::Api { status: 403, body: "forbidden".into() };
    let recognizer = Arc::new(ScriptedRecognizer::returning(Err(failure.clone())));
    let generator = Arc::new(ScriptedGenerator::default());
    let (service, events) = service(recognizer, generator.clone());
    let ctx = CallContext::for_session("fail");

    let err = service.analyze_page(b"img", None, &ctx).await.unwrap_err();

    assert_eq!(err, failure);
    assert!(generator.requests.lock().is_empty());
    let logged = events.query(&EventQuery::new().session("fail").level(EventLevel::Error));
    assert_eq!(logged.len(), 1);
    assert!(logged[0].message.contains("403"));
}

#[tokio::test]
async fn ask_and_examples_use_their_generation_kinds() {
    let generator = Arc::new(ScriptedGenerator::default());
    let (service, events) = service(Arc::new(ScriptedRecognizer::default()), generator.clone());
    let ctx = CallContext::for_session("qa");

    service.ask("Water boils at 100C.", "When?", &ctx).await.unwrap();
    service.examples("Fractions", "addition", &ctx).await.unwrap();

    let kinds: Vec<_> = generator.requests.lock().iter().map(|r| r.kind).collect();
    assert_eq!(kinds, vec![GenerationKind::Answer, GenerationKind::Examples]);
    assert_eq!(
        levels(&events, "qa"),
        vec![EventLevel::Info, EventLevel::Success, EventLevel::Info, EventLevel::Success]
    );
}

#[tokio::test]
async fn blank_question_is_rejected_before_generation() {
    let generator = Arc::new(ScriptedGenerator::default());
    let (service, _events) = service(Arc::new(ScriptedRecognizer::default()), generator.clone());

    let err = service.ask("material", "  ", &CallContext::new()).await.unwrap_err();

    assert!(matches!(err, ApiError::Config(_)));
    assert!(generator.requests.lock().is_empty());
}
