//! Module for testing using fuzzing (quickcheck)

use std::fmt::Debug;

use quickcheck::{Arbitrary, Gen};

use crate::*;

mod basic;

#[cfg(miri)]
const DEFAULT_NUM_TESTS: usize = 10;
#[cfg(not(miri))]
const DEFAULT_NUM_TESTS: usize = 1000;
const DEFAULT_GEN_SIZE: usize = 60;

fn proptest_runner<A: Arbitrary + Debug + PartialEq, F: Fn(A) -> bool>(f: F) {
    let num_tests: usize = std::env::var("QUICKCHECK_TESTS")
        .ok()
        .and_then(|x| x.parse::<usize>().ok())
        .unwrap_or(DEFAULT_NUM_TESTS);

    let gen_size: usize = std::env::var("QUICKCHECK_GENERATOR_SIZE")
        .ok()
        .and_then(|x| x.parse::<usize>().ok())
        .unwrap_or(DEFAULT_GEN_SIZE);

    let mut gen = Gen::new(gen_size);

    for _ in 0..num_tests {
        let input = A::arbitrary(&mut gen);
        if !f(input.clone()) {
            shrink_failure(f, input)
        }
    }
}

fn shrink_failure<A: Arbitrary + Debug + PartialEq, F: Fn(A) -> bool>(f: F, input: A) -> ! {
    for smaller in input.shrink() {
        if !f(smaller.clone()) {
            shrink_failure(f, smaller)
        }
    }
    // all shrunken inputs pass, so `input` is minimal
    panic!(
        "[QUICKCHECK] Test case failed!\n  Minimal input:\n    {:?}",
        input
    );
}

#[allow(missing_docs)]
#[macro_export]
macro_rules! qc {
    ($name:ident, $f:ident) => {
        #[test]
        fn $name() {
            proptest_runner($f)
        }
    };
}

/// One randomized v4 insertion. Prefix lengths are kept short so that the
/// generated prefixes nest and collide often.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Insert {
    addr: u32,
    len: u8,
    priority: u8,
}

impl Insert {
    fn net(&self) -> ipnet::IpNet {
        ipnet::IpNet::V4(ipnet::Ipv4Net::new(self.addr.into(), self.len).unwrap())
    }

    fn apply(&self, store: &mut CidrStore) {
        let entry = Entry::new(self.net()).with_priority([self.priority]);
        store.insert(self.net(), entry).unwrap();
    }
}

impl Arbitrary for Insert {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = u8::arbitrary(g) % 12 + 1;
        let addr = u32::arbitrary(g) & (u32::MAX << (32 - len));
        Self {
            addr,
            len,
            priority: u8::arbitrary(g) % 4,
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let this = *self;
        Box::new(
            this.len
                .shrink()
                .filter(|len| *len >= 1)
                .map(move |len| Insert {
                    addr: this.addr & (u32::MAX << (32 - len)),
                    len,
                    priority: this.priority,
                }),
        )
    }
}

fn build(inserts: &[Insert]) -> CidrStore {
    let mut store = CidrStore::new();
    for insert in inserts {
        insert.apply(&mut store);
    }
    store
}
