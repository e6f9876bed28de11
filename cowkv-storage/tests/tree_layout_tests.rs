use cowkv_storage::{
    BuildConfig, EntrySource, Inode, MemPager, Node, PageId, PageKind, PageResolver, Pager, Tx,
};
use cowkv_test_utils::{
    EDGE_ALPHABET, build_tree, init_tracing_for_tests, random_entries, seeded_rng,
};

/// Smallest key under `id`, following the leftmost child down.
fn subtree_min(pager: &MemPager, mut id: PageId) -> Option<Vec<u8>> {
    loop {
        let page = pager.page(id)?;
        match page.kind() {
            PageKind::Leaf => return (page.entry_count() > 0).then(|| page.key_at(0).to_vec()),
            _ => id = page.child_at(0)?,
        }
    }
}

fn leftmost_leaf(pager: &MemPager, mut id: PageId) -> PageId {
    while let Some(page) = pager.page(id).filter(|p| p.kind() == PageKind::Branch) {
        id = page.child_at(0).unwrap();
    }
    id
}

#[test]
fn leaf_chain_holds_every_entry_in_order() {
    init_tracing_for_tests();
    for (seed, config) in [
        (1, BuildConfig::narrow(1, 2)),
        (2, BuildConfig::narrow(7, 3)),
        (3, BuildConfig::default()),
    ] {
        let entries = random_entries(&mut seeded_rng(seed), 600, EDGE_ALPHABET, 5, 4);
        let (pager, root) = build_tree(&entries, config).unwrap();

        let mut seen: Vec<Inode> = Vec::new();
        let mut next = Some(leftmost_leaf(&pager, root));
        while let Some(id) = next {
            let page = pager.page(id).unwrap();
            seen.extend(Node::read(page).unwrap().inodes().iter().cloned());
            next = page.next_leaf();
        }
        assert_eq!(seen, entries, "{config:?}");
    }
}

#[test]
fn every_branch_key_is_its_child_minimum() {
    let entries = random_entries(&mut seeded_rng(9), 800, EDGE_ALPHABET, 4, 0);
    let (pager, root) = build_tree(&entries, BuildConfig::narrow(3, 3)).unwrap();

    let mut pending = vec![root];
    let mut branches = 0;
    while let Some(id) = pending.pop() {
        let page = pager.page(id).unwrap();
        if page.kind() != PageKind::Branch {
            continue;
        }
        branches += 1;
        for i in 0..page.entry_count() {
            let child = page.child_at(i).unwrap();
            assert_eq!(Some(page.key_at(i).to_vec()), subtree_min(&pager, child));
            pending.push(child);
        }
    }
    assert!(branches > 1);
}

#[test]
fn transaction_resolves_from_many_threads() {
    let entries = random_entries(&mut seeded_rng(4), 300, EDGE_ALPHABET, 4, 0);
    let (pager, root) = build_tree(&entries, BuildConfig::narrow(8, 8)).unwrap();
    let mut tx = Tx::new(&pager, root);
    let leaf = leftmost_leaf(&pager, root);
    let dirty = vec![Inode::leaf(entries[0].key.clone(), b"dirty".to_vec())];
    tx.materialize(Node::leaf(leaf, dirty).unwrap());

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                let source = tx.resolve(leaf).unwrap();
                assert_eq!(source.entry_count(), 1);
                assert_eq!(source.value_at(0), b"dirty");
                assert_eq!(tx.resolve(tx.root()).unwrap().id(), root);
            });
        }
    });
}
