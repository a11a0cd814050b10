#![no_main]

use std::collections::{HashMap, HashSet};

use libfuzzer_sys::fuzz_target;
use rankkit::ranking::CardinalityRanking;

// Fuzz arbitrary operation sequences on CardinalityRanking
//
// Tests random sequences of add_member, remove_group, snapshot, top, clear
// against a map-of-sets model, checking structural invariants after each step.
fuzz_target!(|data: &[u8]| {
    let mut ranking: CardinalityRanking<u8, u8> = CardinalityRanking::new();
    let mut model: HashMap<u8, HashSet<u8>> = HashMap::new();

    for chunk in data.chunks_exact(3) {
        let (op, a, b) = (chunk[0] % 16, chunk[1] % 32, chunk[2]);

        match op {
            0..=11 => {
                // add_member
                let expected = model.entry(a).or_default().insert(b);
                assert_eq!(ranking.add_member(a, b), Ok(expected));
            }
            12 => {
                // remove_group
                let expected = model.remove(&a).map(|s| s.len());
                assert_eq!(ranking.remove_group(&a), expected);
            }
            13 => {
                // snapshot
                let snapshot = ranking.snapshot();
                assert_eq!(snapshot.len(), model.len());
                assert!(snapshot.windows(2).all(|w| w[0].cardinality >= w[1].cardinality));
                for entry in &snapshot {
                    assert_eq!(entry.cardinality, model[&entry.group].len());
                }
            }
            14 => {
                // top
                let n = usize::from(b % 8);
                let top = ranking.top(n);
                assert_eq!(top.len(), n.min(model.len()));
            }
            _ => {
                // clear (rare)
                if b == 0 {
                    ranking.clear();
                    model.clear();
                }
            }
        }

        if let Err(err) = ranking.check_invariants() {
            panic!("invariant violated: {err}");
        }
    }

    assert_eq!(ranking.len(), model.len());
    assert_eq!(
        ranking.total_members(),
        model.values().map(HashSet::len).sum::<usize>()
    );
});
