//! Property-based invariant tests for view and pane rotation.
//!
//! ## Invariants
//!
//! 1. Neighbour lookup: `next_name` at i is views[(i+1) mod N],
//!    `previous_name` at i is views[(i-1+N) mod N]
//! 2. Cadence: exactly one navigation per interval until `stop_loop`
//! 3. Silence: after `stop_loop`, no navigation regardless of elapsed time
//! 4. Pane cycle: visible pane advances by one per firing with period N
//! 5. Idempotent stop: repeated stops leave state unchanged

use core::time::Duration;

use dashswitch_backend::{ElementId, Host, HostDocument};
use dashswitch_runtime::{PaneRotator, RotationPhase, ViewName, ViewRotator};
use dashswitch_web::SimHost;
use proptest::prelude::*;

// ── Strategies ────────────────────────────────────────────────────────────

fn arb_views(max_n: usize) -> impl Strategy<Value = Vec<ViewName>> {
    prop::collection::hash_set("[a-z]{1,8}", 1..max_n).prop_map(|set| {
        let mut names: Vec<String> = set.into_iter().collect();
        names.sort();
        names.into_iter().map(ViewName::from).collect()
    })
}

fn arb_views_with_index(max_n: usize) -> impl Strategy<Value = (Vec<ViewName>, usize)> {
    arb_views(max_n).prop_flat_map(|views| {
        let len = views.len();
        (Just(views), 0..len)
    })
}

fn arb_interval_ms() -> impl Strategy<Value = u64> {
    1u64..120_000
}

fn drain_until(host: &mut SimHost, rotator: &mut ViewRotator, deadline: Duration) -> usize {
    let mut navigations = 0;
    while let Some(id) = host.timers_mut().pop_due(deadline) {
        if rotator.on_timer(host, id).is_some() {
            navigations += 1;
        }
    }
    host.timers_mut().advance_to(deadline);
    navigations
}

// ── 1. Neighbour lookup ───────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn neighbours_wrap_circularly((views, index) in arb_views_with_index(16)) {
        let n = views.len();
        let rotator = ViewRotator::new(views.clone(), views[index].as_str());
        prop_assert_eq!(rotator.current_index(), index);
        prop_assert_eq!(rotator.current_name(), Some(&views[index]));
        prop_assert_eq!(rotator.next_name(), Some(&views[(index + 1) % n]));
        prop_assert_eq!(rotator.previous_name(), Some(&views[(index + n - 1) % n]));
    }

    #[test]
    fn lookups_do_not_mutate((views, index) in arb_views_with_index(16)) {
        let rotator = ViewRotator::new(views.clone(), views[index].as_str());
        for _ in 0..3 {
            let _ = rotator.next_name();
            let _ = rotator.previous_name();
        }
        prop_assert_eq!(rotator.current_index(), index);
        prop_assert_eq!(rotator.phase(), RotationPhase::Idle);
    }
}

// ── 2/3. Cadence and silence ──────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn one_navigation_per_interval(
        (views, index) in arb_views_with_index(8),
        interval_ms in arb_interval_ms(),
        cycles in 1usize..20,
    ) {
        let mut host = SimHost::new(views[index].path());
        let mut rotator = ViewRotator::new(views.clone(), views[index].as_str());
        let interval = Duration::from_millis(interval_ms);
        rotator.start(&mut host, interval);

        let end = interval * cycles as u32;
        let navigations = drain_until(&mut host, &mut rotator, end);
        prop_assert_eq!(navigations, cycles);
        prop_assert_eq!(rotator.current_index(), (index + cycles) % views.len());

        let expected: Vec<String> = (1..=cycles)
            .map(|step| views[(index + step) % views.len()].path())
            .collect();
        prop_assert_eq!(host.navigator_ref().history(), expected.as_slice());
    }

    #[test]
    fn no_navigation_after_stop(
        (views, index) in arb_views_with_index(8),
        interval_ms in arb_interval_ms(),
        cycles in 0usize..5,
        idle_cycles in 1u32..50,
    ) {
        let mut host = SimHost::new("/");
        let mut rotator = ViewRotator::new(views.clone(), views[index].as_str());
        let interval = Duration::from_millis(interval_ms);
        rotator.start(&mut host, interval);
        drain_until(&mut host, &mut rotator, interval * cycles as u32);

        rotator.stop_loop(host.timers_mut());
        let position = rotator.current_index();
        let seen = host.navigator_ref().history().len();

        let later = host.timers_ref().now() + interval * idle_cycles;
        prop_assert_eq!(drain_until(&mut host, &mut rotator, later), 0);
        prop_assert_eq!(host.navigator_ref().history().len(), seen);

        // 5. Idempotent stop.
        rotator.stop_loop(host.timers_mut());
        prop_assert_eq!(rotator.current_index(), position);
        prop_assert_eq!(rotator.phase(), RotationPhase::Stopped);
    }
}

// ── 4. Pane cycle ─────────────────────────────────────────────────────────

fn pane_fixture(host: &mut SimHost, count: usize) -> (ElementId, Vec<ElementId>) {
    let doc = host.document_mut();
    let root = doc.root();
    let container = doc.append(root, "li");
    let panes = (0..count).map(|_| doc.append(container, "div")).collect();
    (container, panes)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn pane_cycle_has_period_n(count in 2usize..9, firings in 0usize..40) {
        let mut host = SimHost::new("/");
        let (container, panes) = pane_fixture(&mut host, count);
        let mut rotator = PaneRotator::new(container, panes.clone()).expect("two or more panes");
        rotator.start(&mut host, Duration::from_millis(5000));

        for _ in 0..firings {
            let id = host.timers_mut().pop_due(Duration::MAX).expect("armed");
            prop_assert!(rotator.on_timer(&mut host, id));
        }

        let expected = (1 + firings) % count;
        prop_assert_eq!(rotator.visible_index(), expected);
        let shown: Vec<usize> = panes
            .iter()
            .enumerate()
            .filter(|(_, pane)| host.document_ref().is_visible(**pane))
            .map(|(index, _)| index)
            .collect();
        prop_assert_eq!(shown, vec![expected]);
    }

    #[test]
    fn pane_stop_is_idempotent(count in 2usize..6, stops in 1usize..4) {
        let mut host = SimHost::new("/");
        let (container, panes) = pane_fixture(&mut host, count);
        let mut rotator = PaneRotator::new(container, panes).expect("two or more panes");
        rotator.start(&mut host, Duration::from_millis(5000));
        let visible = rotator.visible_index();
        for _ in 0..stops {
            rotator.stop(host.timers_mut());
        }
        prop_assert!(!rotator.is_running());
        prop_assert_eq!(rotator.visible_index(), visible);
        prop_assert_eq!(host.timers_ref().pending_count(), 0);
    }
}
