//! Behavioural tests for the paged cache: population, hits, admission,
//! eviction, refresh and failure handling.

mod common;

use std::sync::Arc;

use common::{setup_test_logging, CountingSource};
use rowpager::{CacheConfig, CellValue, PagedCache, RowFilter, RowSourceError};

async fn cache(
    rows: usize,
    page_size: usize,
    max_pages: usize,
) -> (Arc<CountingSource>, PagedCache<CountingSource>) {
    setup_test_logging();
    let source = Arc::new(CountingSource::numbered(rows));
    let cache = PagedCache::new(source.clone(), CacheConfig::new(page_size, max_pages).unwrap())
        .await
        .expect("cache should populate");
    (source, cache)
}

fn label(row: usize) -> Option<CellValue> {
    Some(CellValue::Text(format!("row-{row}")))
}

#[tokio::test]
async fn test_scenario_two_pages_then_partial_third() {
    let (source, mut cache) = cache(1200, 500, 8).await;

    assert_eq!(cache.used_pages(), 2);
    assert_eq!(cache.resident_bounds(), vec![(0, 499), (500, 999)]);
    assert_eq!(source.fetch_count(), 2);

    assert_eq!(cache.retrieve_element(700, 2).await.unwrap(), label(700));
    assert_eq!(source.fetch_count(), 2, "hit must not reach the source");

    assert_eq!(
        cache.retrieve_element(1100, 0).await.unwrap(),
        Some(CellValue::Integer(1100))
    );
    assert_eq!(source.fetch_count(), 3);
    assert_eq!(source.last_fetch_start(), Some(1000));
    assert_eq!(cache.used_pages(), 3);
    assert_eq!(cache.resident_bounds()[2], (1000, 1499));
}

#[tokio::test]
async fn test_miss_triggers_exactly_one_aligned_fetch() {
    let (source, mut cache) = cache(1000, 100, 8).await;
    let before = source.fetch_count();

    assert_eq!(cache.retrieve_element(345, 2).await.unwrap(), label(345));

    assert_eq!(source.fetch_count(), before + 1);
    let call = source.fetch_log().pop().unwrap();
    assert_eq!(call.start, 300);
    assert_eq!(call.page_size, 100);
    assert_eq!(call.filter, None);
}

#[tokio::test]
async fn test_admission_fills_slots_in_order_before_evicting() {
    let (_source, mut cache) = cache(1000, 10, 8).await;
    assert_eq!(cache.used_pages(), 2);

    for (i, row) in (20..80).step_by(10).enumerate() {
        cache.retrieve_element(row, 0).await.unwrap();
        assert_eq!(cache.used_pages(), 3 + i);
        assert_eq!(cache.resident_bounds()[2 + i], (row, row + 9));
    }

    assert_eq!(cache.used_pages(), 8);
    assert_eq!(cache.stats().evictions, 0);
}

#[tokio::test]
async fn test_full_pool_evicts_exactly_one_slot_per_miss() {
    let (_source, mut cache) = cache(1000, 10, 8).await;
    for row in (20..80).step_by(10) {
        cache.retrieve_element(row, 0).await.unwrap();
    }

    cache.retrieve_element(500, 0).await.unwrap();
    assert_eq!(cache.used_pages(), 8);
    assert_eq!(cache.stats().evictions, 1);
    // Farthest from [500, 509] is the page ending lowest.
    assert_eq!(cache.resident_bounds()[0], (500, 509));

    cache.retrieve_element(900, 0).await.unwrap();
    assert_eq!(cache.used_pages(), 8);
    assert_eq!(cache.stats().evictions, 2);
    assert_eq!(cache.resident_bounds()[1], (900, 909));
}

#[tokio::test]
async fn test_scenario_far_row_replaces_farthest_page() {
    let (source, mut cache) = cache(10_000, 100, 8).await;
    for row in (200..800).step_by(100) {
        cache.retrieve_element(row, 0).await.unwrap();
    }
    let expected_before: Vec<(usize, usize)> = (0..8).map(|i| (i * 100, i * 100 + 99)).collect();
    assert_eq!(cache.resident_bounds(), expected_before);

    assert_eq!(
        cache.retrieve_element(5000, 0).await.unwrap(),
        Some(CellValue::Integer(5000))
    );

    let mut expected_after = expected_before;
    expected_after[0] = (5000, 5099);
    assert_eq!(cache.resident_bounds(), expected_after);
    assert_eq!(source.last_fetch_start(), Some(5000));
}

#[tokio::test]
async fn test_repeated_hits_are_idempotent() {
    let (source, mut cache) = cache(300, 50, 4).await;
    let fetches = source.fetch_count();

    let first = cache.retrieve_element(42, 1).await.unwrap();
    let second = cache.retrieve_element(42, 1).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first, Some(CellValue::from("even")));
    assert_eq!(source.fetch_count(), fetches);
    assert_eq!(cache.stats().hits, 2);
}

#[tokio::test]
async fn test_empty_dataset() {
    let (source, mut cache) = cache(0, 25, 8).await;

    assert_eq!(cache.used_pages(), 1);
    assert_eq!(cache.resident_bounds(), vec![(0, 24)]);
    assert_eq!(cache.retrieve_element(0, 0).await.unwrap(), None);
    assert_eq!(source.fetch_count(), 1, "empty page is a hit, not a miss");
}

#[tokio::test]
async fn test_request_past_end_admits_empty_page() {
    let (_source, mut cache) = cache(120, 50, 8).await;

    assert_eq!(cache.retrieve_element(130, 0).await.unwrap(), None);
    assert_eq!(cache.retrieve_element(160, 0).await.unwrap(), None);
    assert_eq!(cache.used_pages(), 4);
    assert_eq!(cache.resident_bounds()[3], (150, 199));
}

#[tokio::test]
async fn test_lookup_at_index_limit_returns_none() {
    let (source, mut cache) = cache(10, 500, 8).await;

    assert_eq!(cache.retrieve_element(usize::MAX, 0).await.unwrap(), None);

    let (low, high) = cache.resident_bounds()[1];
    assert_eq!(low, usize::MAX - usize::MAX % 500);
    assert_eq!(high, usize::MAX);
    assert_eq!(source.last_fetch_start(), Some(low));

    // The saturated page now serves the top of the index space as a hit.
    assert_eq!(cache.retrieve_element(usize::MAX - 1, 0).await.unwrap(), None);
    assert_eq!(cache.used_pages(), 2);
}

#[tokio::test]
async fn test_failed_fetch_leaves_pool_unchanged() {
    let (source, mut cache) = cache(1000, 100, 3).await;
    cache.retrieve_element(250, 0).await.unwrap();
    let bounds = cache.resident_bounds();
    let stats = cache.stats();

    source.set_failing(true);
    let err = cache.retrieve_element(900, 0).await.unwrap_err();
    assert!(matches!(err, RowSourceError::Unavailable(_)));
    assert_eq!(cache.resident_bounds(), bounds);
    assert_eq!(cache.stats().fetches, stats.fetches);
    assert_eq!(cache.stats().evictions, stats.evictions);

    // Hits are still served while the source is down.
    assert_eq!(cache.retrieve_element(260, 2).await.unwrap(), label(260));

    source.set_failing(false);
    assert_eq!(
        cache.retrieve_element(900, 0).await.unwrap(),
        Some(CellValue::Integer(900))
    );
}

#[tokio::test]
async fn test_construction_propagates_source_failure() {
    let source = Arc::new(CountingSource::numbered(10));
    source.set_failing(true);

    let result = PagedCache::new(source.clone(), CacheConfig::default()).await;
    assert!(matches!(result, Err(RowSourceError::Unavailable(_))));
    assert_eq!(source.row_count_calls(), 1);
}

#[tokio::test]
async fn test_filter_forwarded_to_every_call() {
    let source = Arc::new(CountingSource::numbered(100));
    let filter = RowFilter::new("parity", "odd");
    let config = CacheConfig::new(10, 2)
        .unwrap()
        .with_filter(filter.clone())
        .unwrap();
    let mut cache = PagedCache::new(source.clone(), config).await.unwrap();

    assert_eq!(cache.row_count(), 50);
    assert_eq!(cache.retrieve_element(0, 0).await.unwrap(), Some(CellValue::Integer(1)));
    assert_eq!(cache.retrieve_element(30, 0).await.unwrap(), Some(CellValue::Integer(61)));
    assert_eq!(cache.retrieve_element(60, 0).await.unwrap(), None);

    let log = source.fetch_log();
    assert!(log.len() >= 3);
    assert!(log.iter().all(|call| call.filter.as_ref() == Some(&filter)));
}

#[tokio::test]
async fn test_refresh_replaces_rows_in_place() {
    let (source, mut cache) = cache(100, 10, 8).await;
    assert_eq!(cache.retrieve_element(5, 2).await.unwrap(), label(5));

    source.set_cell(5, 2, CellValue::from("edited"));
    assert_eq!(cache.retrieve_element(5, 2).await.unwrap(), label(5), "stale until refreshed");

    let fetches = source.fetch_count();
    cache.refresh_cache_by_range(5, 5).await.unwrap();

    assert_eq!(source.fetch_count(), fetches + 1);
    assert_eq!(cache.retrieve_element(5, 2).await.unwrap(), Some(CellValue::from("edited")));
    assert_eq!(cache.resident_bounds(), vec![(0, 9), (10, 19)]);
    assert_eq!(cache.used_pages(), 2);
    assert_eq!(cache.stats().refreshes, 1);
}

#[tokio::test]
async fn test_refresh_refetches_from_range_start() {
    let (source, mut cache) = cache(100, 10, 8).await;
    let fetches = source.fetch_count();

    cache.refresh_cache_by_range(5, 15).await.unwrap();

    let log = source.fetch_log();
    assert_eq!(log.len(), fetches + 2, "one refresh per covering slot");
    assert!(log[fetches..].iter().all(|call| call.start == 0));
    assert_eq!(cache.resident_bounds(), vec![(0, 9), (10, 19)]);
}

#[tokio::test]
async fn test_refresh_outside_resident_pages_is_noop() {
    let (source, mut cache) = cache(100, 10, 8).await;
    let fetches = source.fetch_count();

    cache.refresh_cache_by_range(40, 60).await.unwrap();

    assert_eq!(source.fetch_count(), fetches);
    assert_eq!(cache.stats().refreshes, 0);
}

#[tokio::test]
async fn test_refresh_propagates_failure() {
    let (source, mut cache) = cache(100, 10, 8).await;
    source.set_failing(true);

    let result = cache.refresh_cache_by_range(0, 0).await;
    assert!(matches!(result, Err(RowSourceError::Unavailable(_))));
    assert_eq!(cache.used_pages(), 2);
}

#[tokio::test]
async fn test_instances_with_different_page_sizes_are_independent() {
    let source = Arc::new(CountingSource::numbered(1000));
    let mut small = PagedCache::new(source.clone(), CacheConfig::new(10, 4).unwrap())
        .await
        .unwrap();
    let mut large = PagedCache::new(source.clone(), CacheConfig::new(250, 4).unwrap())
        .await
        .unwrap();

    assert_eq!(small.resident_bounds(), vec![(0, 9), (10, 19)]);
    assert_eq!(large.resident_bounds(), vec![(0, 249), (250, 499)]);

    assert_eq!(small.retrieve_element(123, 0).await.unwrap(), Some(CellValue::Integer(123)));
    assert_eq!(large.retrieve_element(623, 0).await.unwrap(), Some(CellValue::Integer(623)));
    assert_eq!(small.resident_bounds()[2], (120, 129));
    assert_eq!(large.resident_bounds()[2], (500, 749));
}
