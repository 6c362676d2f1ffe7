//! End-to-end digest runs over the in-memory collaborators.

use std::sync::Arc;

use distill::testing::MockGenerator;
use distill::{
    domain_key, run_digest, DistillConfig, DistillJob, EmptyOutputPolicy, JobQueue,
    MemoryJobQueue, MemoryStore, ModelVariant, PageRecord, RunContext, RunOutcome,
};

const PAGE_URL: &str = "https://www.example.org/news/article-1";

const PAGE_HTML: &str = r#"<html>
  <head><title>Quarterly Report</title></head>
  <body>
    <div id="main"><p>Revenue grew in the third quarter.</p><div class="promo">BUY NOW</div></div>
    <footer>contact us</footer>
  </body>
</html>"#;

fn context(store: Arc<MemoryStore>, generator: MockGenerator) -> RunContext {
    RunContext {
        metadata: store.clone(),
        content: store.clone(),
        rules: store,
        generator: Arc::new(generator),
        config: DistillConfig::default(),
    }
}

fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.put_page(PageRecord::new(PAGE_URL), PAGE_HTML.as_bytes().to_vec());
    store
}

#[tokio::test]
async fn happy_path_persists_markdown_and_stamps_metadata() {
    let store = seeded_store();
    let generator = MockGenerator::new().with_response("# Quarterly Report\n\nRevenue grew.");
    let ctx = context(store.clone(), generator);

    let report = run_digest(&ctx, &DistillJob::new(PAGE_URL)).await;

    assert_eq!(report.outcome, RunOutcome::Success);
    assert_eq!(report.status, 200);
    assert_eq!(
        report.markdown.as_deref(),
        Some("# Quarterly Report\n\nRevenue grew.")
    );

    let record = store.record_for_url(PAGE_URL).unwrap();
    assert!(record.generated_at.is_some());
    assert_eq!(
        store.object(&record.markdown_key()).unwrap(),
        b"# Quarterly Report\n\nRevenue grew."
    );
}

#[tokio::test]
async fn missing_metadata_is_a_hard_404() {
    let store = Arc::new(MemoryStore::new());
    let ctx = context(store, MockGenerator::new());

    let report = run_digest(&ctx, &DistillJob::new("https://example.org/unknown")).await;

    assert_eq!(report.outcome, RunOutcome::HardFail);
    assert_eq!(report.status, 404);
    assert!(report.markdown.is_none());
}

#[tokio::test]
async fn missing_raw_content_is_a_hard_404() {
    let store = Arc::new(MemoryStore::new());
    store.put_record(PageRecord::new(PAGE_URL));
    let ctx = context(store, MockGenerator::new());

    let report = run_digest(&ctx, &DistillJob::new(PAGE_URL)).await;

    assert_eq!(report.outcome, RunOutcome::HardFail);
    assert_eq!(report.status, 404);
}

#[tokio::test]
async fn generator_failure_is_a_soft_500_with_nothing_persisted() {
    let store = seeded_store();
    let ctx = context(store.clone(), MockGenerator::new().failing("upstream 503"));

    let report = run_digest(&ctx, &DistillJob::new(PAGE_URL)).await;

    assert_eq!(report.outcome, RunOutcome::SoftFail);
    assert_eq!(report.status, 500);

    let record = store.record_for_url(PAGE_URL).unwrap();
    assert!(record.generated_at.is_none());
    assert!(store.object(&record.markdown_key()).is_none());
}

#[tokio::test]
async fn rules_drive_extraction_and_exclusions() {
    let store = seeded_store();
    store.put_rules(
        domain_key(PAGE_URL).unwrap(),
        r#"[{"type": "css", "selector": "#main", "exclude": ".promo"}]"#,
    );
    let generator = MockGenerator::new().with_response("# Quarterly Report");
    let ctx = context(store, generator.clone());

    let report = run_digest(&ctx, &DistillJob::new(PAGE_URL)).await;
    assert!(report.is_success());

    let calls = generator.calls();
    assert_eq!(calls.len(), 1);
    // system + one chunk + trailing instruction
    assert_eq!(calls[0].messages.len(), 3);
    let chunk = &calls[0].messages[1].content;
    assert!(chunk.contains("Revenue grew"));
    assert!(!chunk.contains("BUY NOW"));
    assert!(!chunk.contains("contact us"));
}

#[tokio::test]
async fn full_text_variant_skips_rules_and_uses_body_text() {
    let store = seeded_store();
    store.put_rules(
        domain_key(PAGE_URL).unwrap(),
        r#"[{"type": "css", "selector": "#main"}]"#,
    );
    let generator = MockGenerator::new().with_response("# Quarterly Report");
    let ctx = context(store, generator.clone());

    let job = DistillJob::new(PAGE_URL).with_variant(ModelVariant::FullText);
    let report = run_digest(&ctx, &job).await;
    assert!(report.is_success());

    let call = &generator.calls()[0];
    assert_eq!(call.model, DistillConfig::default().secondary_model);
    let chunk = &call.messages[1].content;
    assert!(chunk.contains("contact us"), "whole body expected: {chunk}");
    assert!(!chunk.contains("<p>"), "plain text expected: {chunk}");
}

#[tokio::test]
async fn empty_output_policy_selects_the_outcome() {
    let store = seeded_store();

    let ctx = context(store.clone(), MockGenerator::new().with_response("   "));
    let report = run_digest(&ctx, &DistillJob::new(PAGE_URL)).await;
    assert_eq!(report.outcome, RunOutcome::HardFail);

    let mut ctx = context(store, MockGenerator::new().with_response("   "));
    ctx.config = DistillConfig::default().with_empty_output(EmptyOutputPolicy::SoftFail);
    let report = run_digest(&ctx, &DistillJob::new(PAGE_URL)).await;
    assert_eq!(report.outcome, RunOutcome::SoftFail);
}

#[tokio::test]
async fn oversized_fragments_are_split_into_multiple_chunk_messages() {
    let store = Arc::new(MemoryStore::new());
    let body = "word ".repeat(400);
    let html =
        format!("<html><head><title>T</title></head><body><p>{body}</p></body></html>");
    store.put_page(PageRecord::new(PAGE_URL), html.into_bytes());

    let generator = MockGenerator::new().with_response("# T");
    let mut ctx = context(store, generator.clone());
    ctx.config = DistillConfig::default().with_max_chunk_size(500);

    let report = run_digest(&ctx, &DistillJob::new(PAGE_URL)).await;
    assert!(report.is_success());

    let call = &generator.calls()[0];
    assert!(
        call.messages.len() > 3,
        "expected several chunk messages, got {}",
        call.messages.len()
    );
}

#[tokio::test]
async fn additional_prompt_reaches_the_final_message_verbatim() {
    let store = seeded_store();
    let generator = MockGenerator::new().with_response("# Quarterly Report");
    let ctx = context(store, generator.clone());

    let job = DistillJob::new(PAGE_URL).with_additional_prompt("Focus on finances.");
    let report = run_digest(&ctx, &job).await;
    assert!(report.is_success());

    let call = &generator.calls()[0];
    let last = call.messages.last().unwrap();
    assert!(last.content.ends_with("Focus on finances."));
}

#[tokio::test]
async fn per_job_overrides_reach_the_generator() {
    let store = seeded_store();
    let generator = MockGenerator::new().with_response("# Quarterly Report");
    let ctx = context(store, generator.clone());

    let job = DistillJob::new(PAGE_URL).with_max_tokens(77);
    run_digest(&ctx, &job).await;

    assert_eq!(generator.calls()[0].max_tokens, 77);
}

#[tokio::test]
async fn undecodable_content_is_a_soft_failure() {
    let store = Arc::new(MemoryStore::new());
    store.put_page(PageRecord::new(PAGE_URL), vec![0xff, 0xfe, 0x00]);
    let ctx = context(store, MockGenerator::new());

    let report = run_digest(&ctx, &DistillJob::new(PAGE_URL)).await;
    assert_eq!(report.outcome, RunOutcome::SoftFail);
}

#[tokio::test]
async fn unparsable_rule_text_falls_back_to_the_whole_body() {
    let store = seeded_store();
    store.put_rules(domain_key(PAGE_URL).unwrap(), "not json at all");
    let generator = MockGenerator::new().with_response("# Quarterly Report");
    let ctx = context(store, generator.clone());

    let report = run_digest(&ctx, &DistillJob::new(PAGE_URL)).await;
    assert!(report.is_success());
    // Fallback body fragment includes the footer the rule would have cut.
    assert!(generator.calls()[0].messages[1].content.contains("contact us"));
}

#[tokio::test]
async fn queue_semantics_redeliver_with_incremented_attempts() {
    let queue = MemoryJobQueue::new();
    queue.enqueue(DistillJob::new(PAGE_URL)).await.unwrap();

    let delivery = queue.next().await.unwrap().unwrap();
    assert_eq!(delivery.attempt, 1);

    queue.redeliver(delivery).await.unwrap();
    let delivery = queue.next().await.unwrap().unwrap();
    assert_eq!(delivery.attempt, 2);
    queue.ack(&delivery).await.unwrap();
}
