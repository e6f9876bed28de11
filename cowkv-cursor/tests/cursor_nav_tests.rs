mod common;

use common::*;
use cowkv_cursor::{Cursor, LowerBound, Probe, generalized_search, linear_search};
use cowkv_result::Error;
use cowkv_storage::{BuildConfig, Inode, PageResolver, Tx};

fn expected(entries: &[Inode]) -> Vec<(Vec<u8>, Option<Vec<u8>>)> {
    entries
        .iter()
        .map(|e| (e.key.clone(), (!e.is_bucket()).then(|| e.value.clone())))
        .collect()
}

#[test]
fn forward_and_reverse_iteration_visit_every_entry() {
    init_tracing_for_tests();
    let mut rng = seeded_rng(21);
    let entries = random_entries(&mut rng, 500, EDGE_ALPHABET, 5, 9);
    let want = expected(&entries);
    let configs = [
        BuildConfig::narrow(1, 2),
        BuildConfig::narrow(5, 3),
        BuildConfig::default(),
    ];
    for config in configs {
        let (pager, root) = build_tree(&entries, config).unwrap();
        let tx = Tx::new(&pager, root);
        let mut c = Cursor::new(&tx);

        let mut forward = Vec::new();
        let mut at = c.first().unwrap();
        while let Some(kv) = at {
            forward.push(owned(Some(kv)).unwrap());
            at = c.next().unwrap();
        }
        assert_eq!(forward, want, "{config:?}");

        let mut reverse = Vec::new();
        let mut at = c.last().unwrap();
        while let Some(kv) = at {
            reverse.push(owned(Some(kv)).unwrap());
            at = c.prev().unwrap();
        }
        reverse.reverse();
        assert_eq!(reverse, want, "{config:?}");
    }
}

#[test]
fn seek_finds_lower_bound() {
    let mut rng = seeded_rng(99);
    let entries = random_entries(&mut rng, 300, EDGE_ALPHABET, 4, 0);
    let (pager, root) = build_tree(&entries, BuildConfig::narrow(3, 3)).unwrap();
    let tx = Tx::new(&pager, root);
    let mut c = Cursor::new(&tx);
    for _ in 0..500 {
        let target = random_key(&mut rng, EDGE_ALPHABET, 5);
        let want = entries.iter().find(|e| e.key >= target).map(|e| e.key.clone());
        assert_eq!(key_of(c.seek(&target).unwrap()), want, "target {target:?}");
    }
}

#[test]
fn seek_custom_accepts_other_searches_and_closures() {
    let mut rng = seeded_rng(5);
    let entries = random_entries(&mut rng, 200, EDGE_ALPHABET, 3, 0);
    let (pager, root) = build_tree(&entries, BuildConfig::narrow(4, 4)).unwrap();
    let tx = Tx::new(&pager, root);
    let mut c = Cursor::new(&tx);
    for e in entries.iter().step_by(7) {
        let target = e.key.as_slice();
        let by_binary = key_of(c.seek(target).unwrap());
        let by_linear = key_of(c.seek_custom(linear_search, LowerBound::new(target)).unwrap());
        let by_closure = key_of(
            c.seek_custom(generalized_search, |k: &[u8]| {
                if k < target {
                    Probe::BEFORE
                } else if k == target {
                    Probe::EXACT
                } else {
                    Probe::PAST
                }
            })
            .unwrap(),
        );
        assert_eq!(by_binary, Some(e.key.clone()));
        assert_eq!(by_linear, by_binary);
        assert_eq!(by_closure, by_binary);
    }
}

#[test]
fn next_after_prefix_seek_continues_in_order() {
    let entries = numbered_entries(&[b"a1", b"a2", b"a3", b"b1", b"b2"]);
    let (pager, root) = build_tree(&entries, BuildConfig::narrow(2, 2)).unwrap();
    let tx = Tx::new(&pager, root);
    let mut c = Cursor::new(&tx);
    assert_eq!(
        key_of(c.seek_last_with_prefix(b"a").unwrap()),
        Some(b"a3".to_vec())
    );
    assert_eq!(key_of(c.key_value()), Some(b"a3".to_vec()));
    assert_eq!(key_of(c.next().unwrap()), Some(b"b1".to_vec()));
    assert_eq!(key_of(c.prev().unwrap()), Some(b"a3".to_vec()));
    assert_eq!(key_of(c.prev().unwrap()), Some(b"a2".to_vec()));
}

#[test]
fn unpositioned_cursor_has_no_entry() {
    let (pager, root) = build_tree(&numbered_entries(&[b"a"]), BuildConfig::default()).unwrap();
    let tx = Tx::new(&pager, root);
    let mut c = Cursor::new(&tx);
    assert_eq!(c.key_value(), None);
    assert_eq!(c.next().unwrap(), None);
    assert_eq!(c.prev().unwrap(), None);
}

#[test]
fn empty_tree_yields_nothing() {
    let (pager, root) = build_tree(&[], BuildConfig::default()).unwrap();
    let tx = Tx::new(&pager, root);
    let mut c = Cursor::new(&tx);
    assert_eq!(c.first().unwrap(), None);
    assert_eq!(c.last().unwrap(), None);
    assert_eq!(c.seek(b"a").unwrap(), None);
}

#[test]
fn closed_transaction_rejects_cursor_operations() {
    let entries = numbered_entries(&[b"a", b"b"]);
    let (pager, root) = build_tree(&entries, BuildConfig::default()).unwrap();
    let tx = Tx::new(&pager, root);
    let mut c = Cursor::new(&tx);
    assert!(c.first().unwrap().is_some());
    tx.close();
    assert!(matches!(c.next(), Err(Error::TxClosed)));
    assert!(matches!(c.seek(b"a"), Err(Error::TxClosed)));
    assert!(matches!(c.seek_last_with_prefix(b"a"), Err(Error::TxClosed)));
    assert!(matches!(c.seek_last_with_prefix_slow(b"a"), Err(Error::TxClosed)));
    // argument checks come first
    assert!(matches!(
        c.seek_last_with_prefix(b""),
        Err(Error::InvalidArgumentError(_))
    ));
}

#[test]
fn cursor_works_through_a_trait_object() {
    let entries = numbered_entries(&[b"x", b"xy", b"y"]);
    let (pager, root) = build_tree(&entries, BuildConfig::default()).unwrap();
    let tx = Tx::new(&pager, root);
    let resolver: &dyn PageResolver = &tx;
    let mut c = Cursor::new(resolver);
    assert_eq!(
        key_of(c.seek_last_with_prefix(b"x").unwrap()),
        Some(b"xy".to_vec())
    );
}

#[test]
fn concurrent_cursors_share_a_transaction() {
    let mut rng = seeded_rng(77);
    let entries = random_entries(&mut rng, 1_000, EDGE_ALPHABET, 4, 0);
    let (pager, root) = build_tree(&entries, BuildConfig::narrow(8, 4)).unwrap();
    let tx = Tx::new(&pager, root);
    let prefixes = candidate_prefixes(&entries);

    let results: Vec<Vec<OwnedEntry>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                s.spawn(|| {
                    let mut c = Cursor::new(&tx);
                    prefixes
                        .iter()
                        .map(|p| owned(c.seek_last_with_prefix(p).unwrap()))
                        .collect::<Vec<OwnedEntry>>()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(results.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(results[0].len(), prefixes.len());
}
