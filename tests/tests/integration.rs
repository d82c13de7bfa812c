use std::sync::Arc;

use futures::future::join_all;
use typeflow_foundation::chain::{ChainedConverter, ChainedConverterConfig, PathSignature};
use typeflow_foundation::converters::{ContentTypeReplacer, IfNeededConverter, ReplacementRule};
use typeflow_kernel::{
    ConversionError, ConverterArgs, Representation, RepresentationConverter,
    RepresentationMetadata, TypedRepresentationConverter, ValuePreferences,
};
use typeflow_testing::{MockConverter, assert_converter_called};

fn pool(converters: &[&MockConverter]) -> Vec<Arc<dyn TypedRepresentationConverter>> {
    converters.iter().map(|c| c.typed()).collect()
}

fn chain(converters: &[&MockConverter]) -> ChainedConverter {
    ChainedConverter::new(pool(converters)).unwrap()
}

fn chain_with_cache(converters: &[&MockConverter], size: usize) -> ChainedConverter {
    let config = ChainedConverterConfig::new().with_max_cache_size(size);
    ChainedConverter::with_config(pool(converters), config).unwrap()
}

fn request(content_type: &str, preferences: &[(&str, f64)]) -> ConverterArgs {
    ConverterArgs::new(
        Representation::typed(content_type, "data"),
        preferences.iter().copied().collect(),
    )
}

fn declaration_calls(converters: &[&MockConverter]) -> usize {
    converters.iter().map(|c| c.declaration_calls()).sum()
}

#[tokio::test]
async fn test_construction_requires_converters() {
    let err = ChainedConverter::new(Vec::new()).unwrap_err();
    assert!(matches!(err, ConversionError::Configuration(_)));
    assert_eq!(err.to_string(), "At least 1 converter is required.");

    let one = MockConverter::simple("one", "a/a", "b/b");
    assert!(ChainedConverter::new(pool(&[&one])).is_ok());
}

#[tokio::test]
async fn test_missing_content_type_fails_for_any_preferences() {
    let conv = MockConverter::simple("conv", "a/a", "x/x");
    let chain = chain(&[&conv]);

    for preferences in [
        ValuePreferences::new(),
        ValuePreferences::any(),
        ValuePreferences::single("x/x", 1.0),
    ] {
        let args = ConverterArgs::new(
            Representation::new(RepresentationMetadata::new(), "data"),
            preferences,
        );
        let err = chain.handle_safe(args).await.unwrap_err();
        assert_eq!(err.to_string(), "Missing Content-Type header.");
        assert_eq!(err.status_code(), 400);
    }
    assert_eq!(conv.declaration_calls(), 0);
    assert!(chain.cache().is_empty());
}

#[tokio::test]
async fn test_acceptable_source_invokes_no_converter() {
    let conv = MockConverter::simple("conv", "a/a", "x/x");
    let chain = chain(&[&conv]);
    let args = request("a/a", &[("x/x", 1.0), ("a/*", 0.3)]);
    let input = args.representation.clone();

    let result = chain.handle_safe(args).await.unwrap();

    assert_eq!(result, input);
    assert_converter_called!(conv, 0);
    assert_eq!(conv.declaration_calls(), 0);
}

#[tokio::test]
async fn test_absent_preferences_behave_like_any() {
    let conv = MockConverter::simple("conv", "a/a", "x/x");
    let chain = chain(&[&conv]);

    let empty = chain.handle_safe(request("a/a", &[])).await.unwrap();
    let any = chain.handle_safe(request("a/a", &[("*/*", 1.0)])).await.unwrap();

    assert_eq!(empty.content_type(), Some("a/a"));
    assert_eq!(any.content_type(), Some("a/a"));
    // both requests share one signature
    assert_eq!(chain.cache().len(), 1);
    assert!(chain.cache().contains(&PathSignature::new("a/a", &ValuePreferences::any())));
    assert_eq!(chain.cache().stats().hits, 3);
}

#[tokio::test]
async fn test_fewest_hops_then_highest_weight() {
    let best = MockConverter::new("best", &[("a/a", 1.0)], &[("c/c", 0.9)]);
    let close = MockConverter::new("close", &[("a/a", 0.8)], &[("c/c", 1.0)]);
    let half = MockConverter::new("half", &[("a/a", 0.5)], &[("c/c", 1.0)]);
    let low = MockConverter::new("low", &[("a/a", 1.0)], &[("c/c", 0.5)]);
    let last = MockConverter::simple("last", "c/c", "x/x");
    let chain = chain(&[&close, &half, &best, &low, &last]);

    let result = chain
        .handle_safe(request("a/a", &[("x/x", 1.0)]))
        .await
        .unwrap();

    assert_eq!(result.content_type(), Some("x/x"));
    assert_converter_called!(best, 1);
    assert_converter_called!(last, 1);
    assert_converter_called!(close, 0);
    assert_converter_called!(half, 0);
    assert_converter_called!(low, 0);
}

#[tokio::test]
async fn test_intermediate_hop_is_forced_to_chosen_type() {
    let split = MockConverter::new("split", &[("a/a", 1.0)], &[("b/b", 0.8), ("c/c", 0.6)]);
    let join = MockConverter::new("join", &[("b/b", 0.1), ("c/*", 0.9)], &[("x/x", 1.0)]);
    let chain = chain(&[&split, &join]);

    let result = chain
        .handle_safe(request("a/a", &[("x/x", 1.0)]))
        .await
        .unwrap();
    assert_eq!(result.content_type(), Some("x/x"));

    let split_calls = split.history().await;
    assert_eq!(split_calls.len(), 1);
    assert_eq!(split_calls[0].preferences, ValuePreferences::single("c/c", 1.0));

    let join_calls = join.history().await;
    assert_eq!(join_calls[0].representation.content_type(), Some("c/c"));
    assert_eq!(join_calls[0].preferences, ValuePreferences::single("x/x", 1.0));
}

#[tokio::test]
async fn test_final_hop_targets_chosen_pattern() {
    let conv = MockConverter::new("conv", &[("a/a", 1.0)], &[("x/x", 1.0), ("y/y", 1.0)]);
    let chain = chain(&[&conv]);

    let result = chain
        .handle_safe(request("a/a", &[("x/x", 0.4), ("y/y", 0.9)]))
        .await
        .unwrap();

    assert_eq!(result.content_type(), Some("y/y"));
    let calls = conv.history().await;
    assert_eq!(calls[0].preferences, ValuePreferences::single("y/y", 1.0));
}

#[tokio::test]
async fn test_metadata_is_carried_through_the_chain() {
    let first = MockConverter::simple("first", "a/a", "b/b");
    let second = MockConverter::simple("second", "b/b", "c/c");
    let chain = chain(&[&first, &second]);
    let metadata = RepresentationMetadata::new()
        .with_content_type("a/a")
        .with_property("slug", serde_json::json!("resource"));
    let args = ConverterArgs::new(
        Representation::new(metadata, "payload"),
        ValuePreferences::single("c/c", 1.0),
    );

    let result = chain.handle_safe(args).await.unwrap();

    assert_eq!(result.content_type(), Some("c/c"));
    assert_eq!(&result.data[..], b"payload");
    assert_eq!(
        result.metadata.property("slug"),
        Some(&serde_json::json!("resource"))
    );
}

#[tokio::test]
async fn test_repeated_request_uses_cached_path() {
    let first = MockConverter::simple("first", "a/a", "b/b");
    let second = MockConverter::simple("second", "b/b", "x/x");
    let chain = chain(&[&first, &second]);

    chain.can_handle(&request("a/a", &[("x/x", 1.0)])).await.unwrap();
    let after_first = declaration_calls(&[&first, &second]);
    assert!(after_first > 0);

    chain.handle_safe(request("a/a", &[("x/x", 1.0)])).await.unwrap();
    chain.handle_safe(request("a/a", &[("x/x", 1.0)])).await.unwrap();

    assert_eq!(declaration_calls(&[&first, &second]), after_first);
    assert_converter_called!(first, 2);
    assert_converter_called!(second, 2);
}

#[tokio::test]
async fn test_cached_path_execution_fetches_no_declarations() {
    let first = MockConverter::simple("first", "a/a", "b/b");
    let second = MockConverter::simple("second", "b/b", "x/x");
    let chain = chain(&[&first, &second]);

    chain.handle_safe(request("a/a", &[("x/x", 1.0)])).await.unwrap();
    let after_first = declaration_calls(&[&first, &second]);

    for _ in 0..3 {
        let result = chain
            .handle_safe(request("a/a", &[("x/x", 1.0)]))
            .await
            .unwrap();
        assert_eq!(result.content_type(), Some("x/x"));
    }

    assert_eq!(declaration_calls(&[&first, &second]), after_first);
    assert_converter_called!(first, 4);
    assert_converter_called!(second, 4);
}

#[tokio::test]
async fn test_capacity_one_evicts_previous_signature() {
    let conv = MockConverter::new("conv", &[("a/a", 1.0), ("b/b", 1.0)], &[("x/x", 1.0)]);
    let chain = chain_with_cache(&[&conv], 1);

    chain.can_handle(&request("a/a", &[("x/x", 1.0)])).await.unwrap();
    chain.can_handle(&request("b/b", &[("x/x", 1.0)])).await.unwrap();
    let before = conv.input_type_calls();

    chain.can_handle(&request("a/a", &[("x/x", 1.0)])).await.unwrap();

    assert!(conv.input_type_calls() > before);
    assert_eq!(chain.cache().len(), 1);
}

#[tokio::test]
async fn test_capacity_two_evicts_least_recently_used() {
    let conv = MockConverter::new(
        "conv",
        &[("t/0", 1.0), ("t/1", 1.0), ("t/2", 1.0)],
        &[("x/x", 1.0)],
    );
    let chain = chain_with_cache(&[&conv], 2);
    let targets = ValuePreferences::single("x/x", 1.0);
    let key = |n: usize| PathSignature::new(&format!("t/{n}"), &targets);

    for n in [0, 1, 0, 2] {
        chain
            .can_handle(&request(&format!("t/{n}"), &[("x/x", 1.0)]))
            .await
            .unwrap();
    }

    assert!(chain.cache().contains(&key(0)));
    assert!(!chain.cache().contains(&key(1)));
    assert!(chain.cache().contains(&key(2)));

    let calls = conv.declaration_calls();
    chain.can_handle(&request("t/0", &[("x/x", 1.0)])).await.unwrap();
    chain.can_handle(&request("t/2", &[("x/x", 1.0)])).await.unwrap();
    assert_eq!(conv.declaration_calls(), calls);
}

#[tokio::test]
async fn test_different_preferences_do_not_share_paths() {
    let conv = MockConverter::new("conv", &[("a/a", 1.0)], &[("x/x", 1.0), ("y/y", 1.0)]);
    let chain = chain(&[&conv]);

    let to_x = chain.handle_safe(request("a/a", &[("x/x", 1.0)])).await.unwrap();
    let to_y = chain.handle_safe(request("a/a", &[("y/y", 1.0)])).await.unwrap();
    let weighted = chain
        .handle_safe(request("a/a", &[("x/x", 0.2), ("y/y", 0.1)]))
        .await
        .unwrap();

    assert_eq!(to_x.content_type(), Some("x/x"));
    assert_eq!(to_y.content_type(), Some("y/y"));
    assert_eq!(weighted.content_type(), Some("x/x"));
    assert_eq!(chain.cache().len(), 3);
}

#[tokio::test]
async fn test_unreachable_target_reports_no_path() {
    let conv = MockConverter::simple("conv", "a/a", "x/x");
    let chain = chain(&[&conv]);

    let err = chain
        .can_handle(&request("b/b", &[("x/x", 1.0)]))
        .await
        .unwrap_err();

    assert!(matches!(err, ConversionError::NoPath { .. }));
    assert_eq!(
        err.to_string(),
        "No conversion path could be made from b/b to x/x,internal/quads."
    );
    assert_eq!(err.status_code(), 501);
    assert!(chain.cache().is_empty());
}

#[tokio::test]
async fn test_hop_failure_is_not_retried() {
    let broken = MockConverter::simple("broken", "a/a", "x/x");
    let detour = MockConverter::simple("detour", "a/a", "b/b");
    let onward = MockConverter::simple("onward", "b/b", "x/x");
    broken
        .set_failure(ConversionError::ExecutionFailed("corrupt input".into()))
        .await;
    let chain = chain(&[&broken, &detour, &onward]);

    let err = chain
        .handle_safe(request("a/a", &[("x/x", 1.0)]))
        .await
        .unwrap_err();

    assert_eq!(err, ConversionError::ExecutionFailed("corrupt input".into()));
    assert_converter_called!(broken, 1);
    assert_converter_called!(detour, 0);
    assert_converter_called!(onward, 0);
}

#[tokio::test]
async fn test_cached_paths_outlive_declaration_changes() {
    let conv = MockConverter::new("conv", &[("a/a", 1.0)], &[("x/x", 1.0), ("y/y", 1.0)]);
    let chain = chain(&[&conv]);
    chain.can_handle(&request("a/a", &[("x/x", 1.0)])).await.unwrap();

    conv.set_outputs(&[("y/y", 1.0)]).await;
    let calls = conv.declaration_calls();

    // the stale path is still served from the cache
    assert!(chain.can_handle(&request("a/a", &[("x/x", 1.0)])).await.is_ok());
    assert_eq!(conv.declaration_calls(), calls);

    // a new signature sees the new declarations
    let err = chain
        .can_handle(&request("a/a", &[("x/x", 0.5)]))
        .await
        .unwrap_err();
    assert!(matches!(err, ConversionError::NoPath { .. }));
}

#[tokio::test]
async fn test_concurrent_requests_share_the_cache() {
    let first = MockConverter::simple("first", "a/a", "b/b");
    let second = MockConverter::simple("second", "b/b", "x/x");
    let chain = Arc::new(chain(&[&first, &second]));

    let handles = (0..16).map(|_| {
        let chain = Arc::clone(&chain);
        tokio::spawn(async move { chain.handle_safe(request("a/a", &[("x/x", 1.0)])).await })
    });
    let results = join_all(handles).await;

    for result in results {
        let converted = result.unwrap().unwrap();
        assert_eq!(converted.content_type(), Some("x/x"));
    }
    assert_eq!(chain.cache().len(), 1);
    assert_converter_called!(first, 16);
    assert_converter_called!(second, 16);
}

#[tokio::test]
async fn test_replacers_and_mocks_chain_together() {
    let relabel = ContentTypeReplacer::new(
        "relabel",
        vec![ReplacementRule::new("application/n-triples", ["text/turtle"])],
    );
    let parse = MockConverter::simple("parse", "text/turtle", "internal/quads");
    let converters: Vec<Arc<dyn TypedRepresentationConverter>> =
        vec![Arc::new(relabel), parse.typed()];
    let chain = ChainedConverter::new(converters).unwrap();

    let result = chain
        .handle_safe(request("application/n-triples", &[("internal/quads", 1.0)]))
        .await
        .unwrap();

    assert_eq!(result.content_type(), Some("internal/quads"));
    let calls = parse.history().await;
    assert_eq!(calls[0].representation.content_type(), Some("text/turtle"));
}

#[tokio::test]
async fn test_if_needed_skips_chain_for_acceptable_input() {
    let conv = MockConverter::simple("conv", "a/a", "x/x");
    let chain: Arc<dyn RepresentationConverter> = Arc::new(chain(&[&conv]));
    let converter = IfNeededConverter::new(chain);

    let same = converter
        .handle_safe(request("x/x", &[("x/x", 1.0)]))
        .await
        .unwrap();
    let converted = converter
        .handle_safe(request("a/a", &[("x/x", 1.0)]))
        .await
        .unwrap();

    assert_eq!(same.content_type(), Some("x/x"));
    assert_eq!(converted.content_type(), Some("x/x"));
    assert_converter_called!(conv, 1);
}
