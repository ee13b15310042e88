use super::*;
use itertools::Itertools;

/// All networks of `set` that contain `addr`, from the least to the most specific one.
fn oracle(set: &[TestPrefix], addr: u32) -> Vec<TestPrefix> {
    set.iter()
        .filter(|p| p.contains_number(addr))
        .copied()
        .sorted_by_key(|p| p.1)
        .collect()
}

/// Addresses close to the stored networks, plus some random ones.
fn probes(set: &[TestPrefix], random: &[u32]) -> Vec<u32> {
    set.iter()
        .flat_map(|p| [p.0, p.0 | (u32::MAX >> p.1.min(31)), p.0 ^ 1])
        .chain(random.iter().copied())
        .collect()
}

qc!(contains, _contains);
fn _contains((ops, random): (Vec<Operation<TestPrefix>>, Vec<u32>)) -> bool {
    let Some((trie, set)) = apply(&ops) else {
        return false;
    };
    probes(&set, &random)
        .into_iter()
        .all(|a| trie.contains(a) == Ok(!oracle(&set, a).is_empty()))
}

qc!(containing_networks, _containing_networks);
fn _containing_networks((ops, random): (Vec<Operation<TestPrefix>>, Vec<u32>)) -> bool {
    let Some((trie, set)) = apply(&ops) else {
        return false;
    };
    probes(&set, &random).into_iter().all(|a| {
        let want = oracle(&set, a);
        match trie.containing_networks(a) {
            Ok(got) => {
                got.windows(2).all(|w| w[0].1 < w[1].1)
                    && trie.longest_match(a) == Ok(want.last().copied())
                    && got == want
            }
            Err(_) => false,
        }
    })
}

qc!(queries_after_remove, _queries_after_remove);
fn _queries_after_remove((trie, random): (PrefixTrie<TestPrefix>, Vec<u32>)) -> bool {
    // removing every other network leaves the queries of the rest intact
    let all: Vec<TestPrefix> = trie.iter().copied().collect();
    let mut trie = trie;
    let mut kept = Vec::new();
    for (i, p) in all.iter().enumerate() {
        if i % 2 == 0 {
            if trie.remove(p) != Ok(Some(*p)) {
                return false;
            }
        } else {
            kept.push(*p);
        }
    }
    trie.check_invariants().is_ok()
        && probes(&all, &random).into_iter().all(|a| {
            trie.containing_networks(a) == Ok(oracle(&kept, a))
        })
}
