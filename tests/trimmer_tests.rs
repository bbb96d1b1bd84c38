mod common;

use common::*;
use state_tracer::trace::{TraceLineAnnotator, TraceTrimmer, ELLIPSIS};
use std::sync::Arc;

const ENTRY: &str = "at useDebuggableState (http://localhost:3000/static/js/main.js:5:10)";

async fn trim(fetcher: MockFetcher, trace: &[&str], is_initial_value: bool) -> (Vec<String>, String, String) {
    let fetcher = Arc::new(fetcher);
    let resolver = resolver(&fetcher);
    let parser = parser();
    let trimmer = TraceTrimmer::new(TraceLineAnnotator::new(&resolver, &parser), &parser, "?");

    let trimmed = trimmer.trim(trace.iter().copied(), is_initial_value).await;
    (trimmed.lines, trimmed.property_name, trimmed.preview)
}

#[tokio::test]
async fn test_initial_value_keeps_declaring_frame() {
    let trace = [
        "StateChangeEvent (from: undefined, to: 0)",
        "    at Object.render (http://localhost:3000/static/js/vendor.js:3:3)",
        ENTRY,
        "    const [count, setCount] = useDebuggableState(0);",
        "    at renderWithHooks (http://localhost:3000/static/js/vendor.js:14803:18)",
        "    at mountIndeterminateComponent (http://localhost:3000/static/js/vendor.js:17482:13)",
    ];

    let (lines, name, _) = trim(MockFetcher::new(), &trace, true).await;
    assert_eq!(
        lines,
        vec![
            "StateChangeEvent (from: undefined, to: 0)",
            "at Object.render (http://localhost:3000/static/js/vendor.js:3:3)",
            ENTRY,
            "const [count, setCount] = useDebuggableState(0);",
            ELLIPSIS,
        ]
    );
    assert_eq!(name, "count");
}

#[tokio::test]
async fn test_update_stops_at_entry_frame() {
    let trace = [
        "StateChangeEvent (from: 0, to: 1)",
        ENTRY,
        "    const [count, setCount] = useDebuggableState(0);",
        "    at renderWithHooks (http://localhost:3000/static/js/vendor.js:14803:18)",
    ];

    let (lines, name, _) = trim(MockFetcher::new(), &trace, false).await;
    assert_eq!(lines, vec!["StateChangeEvent (from: 0, to: 1)", ENTRY, ELLIPSIS]);
    assert_eq!(name, "?");
}

#[tokio::test]
async fn test_initial_value_without_destructuring_keeps_going() {
    let trace = [
        "StateChangeEvent (from: undefined, to: 0)",
        ENTRY,
        "    at useCounter (http://localhost:3000/static/js/main.js:7:1)",
        "    at Counter (http://localhost:3000/static/js/main.js:8:1)",
    ];

    let (lines, name, _) = trim(MockFetcher::new(), &trace, true).await;
    assert_eq!(lines.len(), 4);
    assert!(!lines.iter().any(|l| l == ELLIPSIS));
    assert_eq!(name, "?");
}

#[tokio::test]
async fn test_resumes_after_dispatch_frame() {
    let trace = [
        "StateChangeEvent (from: 1, to: 2)",
        ENTRY,
        "    at Counter (http://localhost:3000/static/js/main.js:10:5)",
        "    at renderWithHooks (http://localhost:3000/static/js/vendor.js:14803:18)",
        "    at dispatchAction",
        "    at onClick (http://localhost:3000/static/js/main.js:12:40)",
        "    at HTMLUnknownElement.callCallback (http://localhost:3000/static/js/vendor.js:3945:14)",
    ];

    let fetcher = MockFetcher::new();
    let (lines, _, _) = trim(fetcher, &trace, false).await;
    assert_eq!(
        lines,
        vec![
            "StateChangeEvent (from: 1, to: 2)",
            ENTRY,
            ELLIPSIS,
            "at onClick (http://localhost:3000/static/js/main.js:12:40)",
            "at HTMLUnknownElement.callCallback (http://localhost:3000/static/js/vendor.js:3945:14)",
        ]
    );
}

#[tokio::test]
async fn test_skipped_lines_are_never_resolved() {
    let trace = [
        "StateChangeEvent (from: 1, to: 2)",
        "    at useDebuggableState (http://localhost:3000/static/js/app.js:5:10)",
        "    at renderWithHooks (http://localhost:3000/static/js/vendor.js:14803:18)",
    ];

    let fetcher = Arc::new(MockFetcher::new());
    let resolver = resolver(&fetcher);
    let parser = parser();
    let trimmer = TraceTrimmer::new(TraceLineAnnotator::new(&resolver, &parser), &parser, "?");
    trimmer.trim(trace.iter().copied(), false).await;

    assert_eq!(fetcher.calls_to(VENDOR_MAP), 0);
    assert_eq!(fetcher.calls_to("http://localhost:3000/static/js/app.js.map"), 1);
}

#[tokio::test]
async fn test_binding_name_comes_from_resolved_preview() {
    let trace = [
        "StateChangeEvent (from: undefined, to: 0)",
        ENTRY,
        "    at Counter (http://localhost:3000/static/js/main.js:10:5)",
        "    at renderWithHooks (http://localhost:3000/static/js/vendor.js:14803:18)",
    ];

    let (lines, name, preview) = trim(MockFetcher::with_app_map(), &trace, true).await;
    assert_eq!(
        lines,
        vec![
            "StateChangeEvent (from: undefined, to: 0)".to_string(),
            ENTRY.to_string(),
            format!("at Counter (src/App.ts:42:3)\n└  {}", PREVIEW),
            ELLIPSIS.to_string(),
        ]
    );
    assert_eq!(name, "count");
    assert_eq!(preview, PREVIEW);
}

#[tokio::test]
async fn test_mapped_line_without_source_text_keeps_continuation() {
    let fetcher = Arc::new(MockFetcher::new().respond(BUNDLE_MAP, app_map_without_content_json()));
    let resolver = resolver(&fetcher);
    let parser = parser();
    let annotator = TraceLineAnnotator::new(&resolver, &parser);

    let line = annotator
        .annotate("at Counter (http://localhost:3000/static/js/main.js:10:5)")
        .await;
    assert_eq!(line.text, "at Counter (src/App.ts:42:3)\n└  ");
    assert_eq!(line.preview.as_deref(), Some(""));
    assert_eq!(fetcher.calls_to("http://localhost:3000/static/js/src/App.ts"), 1);

    let unmapped = annotator
        .annotate("at onClick (http://localhost:3000/static/js/main.js:12:40)")
        .await;
    assert_eq!(unmapped.text, "at onClick (http://localhost:3000/static/js/main.js:12:40)");
    assert_eq!(unmapped.preview, None);
}

#[tokio::test]
async fn test_preview_follows_last_mapped_line() {
    let trace = [
        "StateChangeEvent (from: 1, to: 2)",
        "    at Counter (http://localhost:3000/static/js/main.js:10:5)",
        "    at Legacy (http://localhost:3000/static/js/legacy.js:10:5)",
        "    at renderWithHooks (http://localhost:3000/static/js/vendor.js:14803:18)",
    ];
    let fetcher = MockFetcher::with_app_map().respond(
        "http://localhost:3000/static/js/legacy.js.map",
        app_map_without_content_json(),
    );

    let (lines, _, preview) = trim(fetcher, &trace, false).await;
    assert_eq!(lines[1], format!("at Counter (src/App.ts:42:3)\n└  {}", PREVIEW));
    assert_eq!(lines[2], "at Legacy (src/App.ts:42:3)\n└  ");
    assert_eq!(preview, "");
}
