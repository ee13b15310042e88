//! Module for testing using fuzzing (quickcheck)

use std::fmt::Debug;

use crate::*;
use itertools::Itertools;
use quickcheck::Arbitrary;

#[derive(Debug, PartialEq, Clone, Copy)]
enum Operation<P> {
    Add(P),
    Remove(P),
}

#[cfg(miri)]
const DEFAULT_NUM_TESTS: usize = 10;
#[cfg(not(miri))]
const DEFAULT_NUM_TESTS: usize = 10000;
const DEFAULT_GEN_SIZE: usize = 100;

fn proptest_runner<A: Arbitrary + Debug + PartialEq, F: Fn(A) -> bool>(f: F) {
    let num_tests: usize = std::env::var("QUICKCHECK_TESTS")
        .ok()
        .and_then(|x| x.parse::<usize>().ok())
        .unwrap_or(DEFAULT_NUM_TESTS);

    let gen_size: usize = std::env::var("QUICKCHECK_GENERATOR_SIZE")
        .ok()
        .and_then(|x| x.parse::<usize>().ok())
        .unwrap_or(DEFAULT_GEN_SIZE);

    let mut gen = quickcheck::Gen::new(gen_size);

    for _ in 0..num_tests {
        let input = A::arbitrary(&mut gen);
        let input_c = input.clone();
        let success = f(input_c);
        if !success {
            shrink_failure(f, input)
        }
    }
}

fn shrink_failure<A: Arbitrary + Debug + PartialEq, F: Fn(A) -> bool>(f: F, input: A) -> ! {
    for i in input.shrink() {
        let i_c = i.clone();
        let success = f(i_c);
        if !success {
            shrink_failure(f, i)
        }
    }
    // all shrunken inputs work, so `input` is the minimal failing input
    panic!(
        "[QUICKCHECK] Test case failed!\n  Minimal input:\n    {:?}",
        input
    );
}

macro_rules! qc {
    ($name:ident, $f:ident) => {
        #[test]
        fn $name() {
            proptest_runner($f)
        }
    };
}

mod basic;
mod queries;

/// Apply all operations to both the trie and a `HashSet`. Returns `None` if any intermediate
/// state of the trie violates its invariants.
fn apply(ops: &[Operation<TestPrefix>]) -> Option<(PrefixTrie<TestPrefix>, Vec<TestPrefix>)> {
    let mut trie = PrefixTrie::new();
    let mut set = std::collections::HashSet::new();
    for op in ops {
        match *op {
            Operation::Add(p) => {
                let new = trie.insert(p).ok()?;
                if new != set.insert(p) {
                    return None;
                }
            }
            Operation::Remove(p) => {
                let removed = trie.remove(&p).ok()?;
                if removed != set.take(&p) {
                    return None;
                }
            }
        }
        if let Err(e) = trie.check_invariants() {
            eprintln!("{}", e);
            return None;
        }
    }
    Some((trie, set.into_iter().sorted().collect()))
}

impl<P: Network + Arbitrary> Arbitrary for PrefixTrie<P> {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        <Vec<P> as Arbitrary>::arbitrary(g).into_iter().collect()
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let elems = self.clone().into_iter().collect::<Vec<_>>();
        let shrinked = elems.shrink();
        Box::new(shrinked.map(PrefixTrie::from_iter))
    }
}

impl<P: Arbitrary> Arbitrary for Operation<P> {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let p = P::arbitrary(g);
        if g.choose(&[
            true, true, true, true, true, true, true, false, false, false,
        ])
        .copied()
        .unwrap_or_default()
        {
            Self::Add(p)
        } else {
            Self::Remove(p)
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        match self {
            Operation::Add(p) => Box::new(p.shrink().map(Operation::Add)),
            Operation::Remove(p) => Box::new(p.shrink().map(Operation::Remove)),
        }
    }
}

/// A 32-bit network with mostly short prefixes, such that random networks overlap often.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
struct TestPrefix(u32, u8);

impl Debug for TestPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let addr = format!("{:032b}", self.0)[..(self.1 as usize).max(1)].to_string();
        write!(f, "0b{addr}/{}", self.1)
    }
}

impl Arbitrary for TestPrefix {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        #[rustfmt::skip]
        let len: u8 = *g
            .choose(&[
                0,
                1, 1,
                2, 2, 2,
                3, 3, 3, 3,
                4, 4, 4, 4, 4,
                5, 5, 5, 5, 5, 5,
                6, 6, 6, 6, 6, 6, 6,
                7, 7, 7, 7, 7, 7, 7, 7,
                8, 8, 8, 8, 8, 8, 8, 8, 8,
                9, 9, 9, 9, 9, 9, 9, 9, 9, 9,
                16, 24, 31, 32,
            ])
            .unwrap();
        let x = u32::arbitrary(g);
        Self::from_number_len(x, len)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        if self.1 == 0 {
            quickcheck::empty_shrinker()
        } else {
            let len = self.1 - 1;
            let x = Self::from_number_len(self.0, len);
            quickcheck::single_shrinker(x)
        }
    }
}

impl Network for TestPrefix {
    type Number = u32;

    fn number(&self) -> Self::Number {
        self.0
    }

    fn prefix_len(&self) -> u8 {
        self.1
    }

    fn from_number_len(number: Self::Number, len: u8) -> Self {
        let (x, len) = <(u32, u8) as Network>::from_number_len(number, len);
        Self(x, len)
    }
}
