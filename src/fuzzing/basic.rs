use super::*;

qc!(new, _new);
fn _new(list: Vec<TestPrefix>) -> bool {
    let ops: Vec<_> = list.into_iter().map(Operation::Add).collect();
    match apply(&ops) {
        Some((trie, set)) => trie.len() == set.len() && trie.into_iter().eq(set),
        None => false,
    }
}

qc!(new_mods, _new_mods);
fn _new_mods(ops: Vec<Operation<TestPrefix>>) -> bool {
    match apply(&ops) {
        Some((trie, set)) => {
            trie.len() == set.len() && trie.depth() <= 32 && trie.iter().eq(set.iter())
        }
        None => false,
    }
}

qc!(equality, _equality);
fn _equality(ops: Vec<Operation<TestPrefix>>) -> bool {
    let Some((trie, _)) = apply(&ops) else {
        return false;
    };
    let clone = trie.clone().into_iter().collect::<PrefixTrie<_>>();
    let mut networks: Vec<TestPrefix> = trie.iter().copied().collect();
    networks.reverse();
    let reversed = networks.into_iter().collect::<PrefixTrie<_>>();
    trie == clone
        && trie == reversed
        && trie.structure() == clone.structure()
        && clone.structure() == reversed.structure()
}

qc!(idempotent_insert, _idempotent_insert);
fn _idempotent_insert((mut trie, p): (PrefixTrie<TestPrefix>, TestPrefix)) -> bool {
    let _ = trie.insert(p);
    let once = trie.structure();
    trie.insert(p) == Ok(false) && trie.structure() == once
}

qc!(remove_absent, _remove_absent);
fn _remove_absent((mut trie, p): (PrefixTrie<TestPrefix>, TestPrefix)) -> bool {
    if trie.contains_network(&p) != Ok(false) {
        return true;
    }
    let before = trie.structure();
    trie.remove(&p) == Ok(None) && trie.structure() == before
}

qc!(insert_remove_restores, _insert_remove_restores);
fn _insert_remove_restores((mut trie, p): (PrefixTrie<TestPrefix>, TestPrefix)) -> bool {
    if trie.contains_network(&p) != Ok(false) {
        return true;
    }
    let before = trie.structure();
    trie.insert(p) == Ok(true)
        && trie.remove(&p) == Ok(Some(p))
        && trie.check_invariants().is_ok()
        && trie.structure() == before
}
