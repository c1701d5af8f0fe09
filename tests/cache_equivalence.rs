// Метаморфический тест: для случайного состояния хранилища и случайного состояния
// кэша (пустые, верные, битые, чужие и устаревшие записи) каждый запрос даёт
// тот же результат, что и индекс без кэша.

mod common;

use oorandom::Rand64;

use common::FakeMapBuilder;
use RunIndex::{Direction, IndexBuilder, MemoPolicy};

const KEY_SPACE: u64 = 40;

fn random_setup(rng: &mut Rand64) -> FakeMapBuilder {
    let mut b = FakeMapBuilder::new();
    for k in 0..KEY_SPACE {
        let v = format!("v{k}");
        // 0..3 — нет ключа, 3..7 — обычная запись, 7..8 — не загружается, 8..10 — запись + кэш
        match rng.rand_range(0..10) {
            0..=2 => {}
            3..=6 => b = b.add(k, &v),
            7 => b = b.add_unloadable(k),
            _ => b = b.add_both(k, &v),
        }
    }
    // поверх — порча кэша
    let damage = rng.rand_range(0..8);
    for _ in 0..damage {
        let k = rng.rand_range(0..KEY_SPACE);
        match rng.rand_range(0..3) {
            0 => b = b.add_unloadable_cache(k),
            1 => {
                // чужая запись под ключом k; владелец тоже становится авторитетным
                let owner = rng.rand_range(KEY_SPACE..KEY_SPACE + 5);
                b = b.add_bogus_cache(k, owner, &format!("o{owner}"));
            }
            _ => {
                // устаревшая запись: ключа нет в KeyIndex, но в кэше он верный
                let stale = rng.rand_range(KEY_SPACE + 10..KEY_SPACE + 20);
                b = b.add_cache_only(stale, "stale");
            }
        }
    }
    b
}

fn check_equivalent(setup: &FakeMapBuilder, seed: u128) {
    let plain = setup.make_uncached();
    let cached = setup.make();

    for q in 0..KEY_SPACE + 25 {
        assert_eq!(cached.get(&q), plain.get(&q), "seed {seed}: get({q})");
        for dir in [Direction::Exact, Direction::Asc, Direction::Desc] {
            assert_eq!(
                cached.search(&q, dir),
                plain.search(&q, dir),
                "seed {seed}: search({q}, {dir})"
            );
        }
    }
    assert_eq!(cached.entries(), plain.entries(), "seed {seed}: entries");
    assert_eq!(cached.oldest(), plain.oldest(), "seed {seed}: oldest");
    assert_eq!(cached.newest(), plain.newest(), "seed {seed}: newest");
}

#[test]
fn cached_results_match_uncached_for_random_states() {
    for i in 0..200u128 {
        let seed = i * 0xC0FFEE + 1;
        let mut rng = Rand64::new(seed);
        let setup = random_setup(&mut rng);
        check_equivalent(&setup, seed);
    }
}

#[test]
fn memoized_results_match_plain() {
    let mut rng = Rand64::new(0xA11CE);
    for policy in [MemoPolicy::Unloadable, MemoPolicy::All] {
        let setup = random_setup(&mut rng);
        let memo = setup
            .clone()
            .config(IndexBuilder::from_default().memo(policy).build())
            .make();
        let plain = setup.make_uncached();

        // дважды: второй проход идёт через memo-таблицу
        for _ in 0..2 {
            for q in 0..KEY_SPACE + 25 {
                for dir in [Direction::Exact, Direction::Asc, Direction::Desc] {
                    assert_eq!(memo.search(&q, dir), plain.search(&q, dir), "{policy}: {q} {dir}");
                }
            }
        }
    }
}

#[test]
fn memo_bounds_repeated_unloadable_loads() {
    let setup = FakeMapBuilder::new()
        .add(1, "A")
        .add_unloadable(2)
        .add_unloadable(3)
        .add(4, "D");

    let plain = setup.make_uncached();
    let memo = setup
        .clone()
        .config(IndexBuilder::from_default().memo(MemoPolicy::Unloadable).build())
        .make_uncached();

    for _ in 0..5 {
        assert_eq!(plain.search(&2, Direction::Asc), memo.search(&2, Direction::Asc));
    }
    assert_eq!(plain.loader().calls_for(2), 5);
    assert_eq!(memo.loader().calls_for(2), 1);
    assert_eq!(memo.loader().calls_for(3), 1);
    // Present не запоминается при политике unloadable
    assert_eq!(memo.loader().calls_for(4), 5);
}
