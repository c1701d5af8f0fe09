// Глобальные счётчики — один тест на бинарь, чтобы параллельные тесты не мешали.

mod common;

use common::FakeMapBuilder;
use RunIndex::metrics;
use RunIndex::Direction;

#[test]
fn counters_follow_cache_outcomes() {
    metrics::reset();

    let m = FakeMapBuilder::new()
        .add_both(1, "A")
        .add(3, "B")
        .add_unloadable(4)
        .add_both(5, "C")
        .add_unloadable_cache(6)
        .add(6, "F")
        .add_bogus_cache(7, 8, "H")
        .make();

    m.get(&1); // valid
    m.get(&3); // miss + load
    m.get(&6); // unusable + load
    m.get(&8); // miss + load
    m.search(&2, Direction::Asc); // bound 5 valid, gap-scan 2..5: 3 present
    m.search(&7, Direction::Desc); // граница 7 чужая -> полный обход вниз: 6

    let s = metrics::snapshot();
    assert_eq!(s.cache_valid, 2);
    assert_eq!(s.cache_unusable, 1);
    assert_eq!(s.cache_mismatched, 1);
    assert_eq!(s.cache_misses, 2);
    assert_eq!(s.gap_scans, 1);
    assert_eq!(s.gap_scan_keys, 1);
    assert_eq!(s.uncached_scans, 1);
    // get: 3, 6, 8; gap-scan: 3; полный обход: 6
    assert_eq!(s.loader_calls, 5);
    assert_eq!(s.loader_unloadable, 0);
    assert!(s.cache_hit_ratio() > 0.0);
    assert_eq!(s.avg_gap_scan_keys(), 1.0);

    metrics::reset();
    assert_eq!(metrics::snapshot().loader_calls, 0);
}
