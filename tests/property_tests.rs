#![cfg(feature = "runtime")]
// Property-based tests using proptest
// These tests generate random buffer sets and command sequences and verify invariants

mod common;

use bufed::model::buffer::BufferFlags;
use bufed::model::registry::BufferRegistry;
use common::harness::BufedTestHarness;
use crossterm::event::{KeyCode, KeyModifiers};
use proptest::prelude::*;

/// Generate random list operations
#[derive(Debug, Clone)]
enum ListOp {
    /// A buffer list key
    Key(char),
    Down,
    Up,
    End,
    /// Another part of the editor destroys a buffer behind the list's back
    DestroyExternal(usize),
}

impl ListOp {
    /// Apply this operation to the test harness
    fn apply(&self, harness: &mut BufedTestHarness) {
        match self {
            Self::Key(c) => harness.press(*c),
            Self::Down => harness.send_key(KeyCode::Down, KeyModifiers::NONE),
            Self::Up => harness.send_key(KeyCode::Up, KeyModifiers::NONE),
            Self::End => harness.send_key(KeyCode::End, KeyModifiers::NONE),
            Self::DestroyExternal(n) => {
                let ids: Vec<_> = harness
                    .bench
                    .enumerate()
                    .into_iter()
                    .filter(|b| b.name != "*bufed*")
                    .map(|b| b.id)
                    .collect();
                if !ids.is_empty() {
                    harness.bench.destroy_now(ids[n % ids.len()]);
                }
            }
        }
    }
}

/// Strategy for generating random list operations; never closes the list
fn list_op_strategy() -> impl Strategy<Value = ListOp> {
    prop_oneof![
        3 => prop::sample::select(vec![
            'a', 'r', 'k', 'x', 'U', '%', '~', 'u', 'b', 'f', 'z', 't', 'm',
        ])
        .prop_map(ListOp::Key),
        2 => Just(ListOp::Down),
        1 => Just(ListOp::Up),
        1 => Just(ListOp::End),
        1 => (0usize..16).prop_map(ListOp::DestroyExternal),
    ]
}

/// (size, is system) per buffer
fn buffers_strategy() -> impl Strategy<Value = Vec<(u64, bool)>> {
    prop::collection::vec((0u64..1000, prop::bool::weighted(0.3)), 1..12)
}

fn harness_with(buffers: &[(u64, bool)]) -> BufedTestHarness {
    let mut harness = BufedTestHarness::new(&[]).without_preview();
    for (i, (size, system)) in buffers.iter().enumerate() {
        let (size, system) = (*size, *system);
        harness.bench.add_buffer_with(&format!("buf{i}"), |info| {
            info.size = size;
            if system {
                info.flags |= BufferFlags::SYSTEM;
            }
        });
    }
    harness
}

fn system_flags(harness: &BufedTestHarness) -> Vec<bool> {
    harness
        .list()
        .state()
        .items
        .iter()
        .map(|item| {
            item.buffer
                .peek()
                .and_then(|id| harness.bench.get(id))
                .is_some_and(|b| b.is_system())
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 100,
        max_shrink_iters: 1000,
        ..ProptestConfig::default()
    })]

    /// Property test: the default filter hides exactly the system buffers
    #[test]
    fn prop_filter_hides_system_buffers(buffers in buffers_strategy()) {
        let mut harness = harness_with(&buffers);
        harness.open(false);
        prop_assert!(system_flags(&harness).iter().all(|system| !system));

        let user_count = harness
            .bench
            .enumerate()
            .into_iter()
            .filter(|b| !b.is_system())
            .count();
        prop_assert_eq!(harness.labels().len(), user_count);

        harness.press('a');
        prop_assert_eq!(harness.labels().len(), harness.bench.buffer_count());
    }

    /// Property test: system buffers sort after every user buffer, whatever the key
    #[test]
    fn prop_system_buffers_last(
        buffers in buffers_strategy(),
        keys in prop::collection::vec(prop::sample::select(vec!['b', 'f', 'z', 't', 'm', 'u']), 1..6),
    ) {
        let mut harness = harness_with(&buffers);
        harness.open(true);
        for key in &keys {
            harness.press(*key);
        }
        if harness.list().sort_mask().is_empty() {
            return Ok(());
        }

        let flags = system_flags(&harness);
        let first_system = flags.iter().position(|s| *s).unwrap_or(flags.len());
        prop_assert!(
            flags[first_system..].iter().all(|s| *s),
            "user buffer after a system buffer: {:?} keys {:?}",
            harness.labels(),
            keys
        );
    }

    /// Property test: re-selecting a sort key reverses the user rows when keys are distinct
    #[test]
    fn prop_second_toggle_reverses(sizes in prop::collection::hash_set(1u64..10_000, 1..12)) {
        let buffers: Vec<(u64, bool)> = sizes.into_iter().map(|s| (s, false)).collect();
        let mut harness = harness_with(&buffers);
        harness.open(false);

        harness.press('z');
        let ascending = harness.labels();
        harness.press('z');
        let mut descending = harness.labels();
        descending.reverse();
        prop_assert_eq!(ascending, descending);
    }

    /// Property test: random commands interleaved with external destruction never
    /// leave the cursor off the rows or a live row pointing at a dead buffer
    #[test]
    fn prop_rows_stay_consistent(
        buffers in buffers_strategy(),
        ops in prop::collection::vec(list_op_strategy(), 1..40),
    ) {
        let mut harness = harness_with(&buffers);
        harness.open(false);

        for op in &ops {
            op.apply(&mut harness);

            let rows = harness.labels().len();
            let cursor = harness.list().cursor_line();
            prop_assert!(
                cursor < rows.max(1),
                "cursor {} with {} rows after {:?}",
                cursor,
                rows,
                op
            );
            // Rendering tolerates dead rows
            let _ = harness.screen_text();
        }

        harness.press('r');
        for item in &harness.list().state().items {
            let id = item.buffer.peek();
            prop_assert!(id.is_some_and(|id| harness.bench.exists(id)));
        }
    }
}
