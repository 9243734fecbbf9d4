//! Commit-window behavior of the arena under push/pop churn.
//!
//! These tests drive the arena through patterns the buffer produces: many
//! small pushes, temp regions around transient work, and full resets on
//! reload.

use pagedit_arena::{Arena, ArenaConfig, DEFAULT_COMMIT_GRANULARITY};

fn arena_with_threshold(decommit_threshold: usize) -> Arena {
    Arena::new(ArenaConfig {
        reserve_size: 8 << 20,
        commit_granularity: DEFAULT_COMMIT_GRANULARITY,
        decommit_threshold,
    })
    .unwrap()
}

#[test]
fn test_invariant_holds_across_churn() {
    let mut arena = arena_with_threshold(256 << 10);
    for round in 0..50usize {
        let mark = arena.pos();
        for i in 0..200usize {
            arena.push(1 + (i * 7 + round) % 97, 8);
            assert!(arena.pos() <= arena.committed());
            assert!(arena.committed() <= arena.reserved());
        }
        arena.pop_to(mark + (round % 3) * 64);
        assert!(arena.pos() <= arena.committed());
    }
}

#[test]
fn test_small_pops_do_not_thrash_commit() {
    let mut arena = arena_with_threshold(1 << 20);
    arena.push(512 << 10, 1);
    let committed = arena.committed();

    for _ in 0..100 {
        let temp = arena.begin_temp();
        drop(temp);
        arena.pop(4096);
        arena.push(4096, 1);
    }
    assert_eq!(arena.committed(), committed);
}

#[test]
fn test_reset_releases_large_commit() {
    let mut arena = arena_with_threshold(1 << 20);
    arena.push(4 << 20, 1);
    assert!(arena.committed() >= 4 << 20);

    arena.reset();
    assert!(arena.committed() < 1 << 20);
    assert_eq!(arena.peak(), 4 << 20);
}

#[test]
fn test_regions_below_position_survive_temp_work() {
    let mut arena = arena_with_threshold(0);
    let header = arena.push_bytes(b"persistent header");
    {
        let mut temp = arena.begin_temp();
        for _ in 0..64 {
            temp.push(4096, 16);
        }
    }
    assert_eq!(arena.bytes(header), b"persistent header");
    assert_eq!(arena.pos(), header.end());
}
