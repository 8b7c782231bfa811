#![no_main]

use core::time::Duration;

use arbitrary::Arbitrary;
use dashswitch_backend::{Host, HostDocument};
use dashswitch_runtime::RotationPhase;
use dashswitch_web::{SimDocument, SimHost, SimPage};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Step {
    Advance(u16),
    Skip,
    TogglePause,
    Shutdown,
}

#[derive(Debug, Arbitrary)]
struct Scenario {
    interval_ms: u16,
    view_count: u8,
    steps: Vec<Step>,
}

fuzz_target!(|scenario: Scenario| {
    if scenario.steps.len() > 256 {
        return;
    }
    let view_count = usize::from(scenario.view_count % 6) + 2;
    let views: Vec<String> = (0..view_count).map(|i| format!("v{i}")).collect();

    let mut doc = SimDocument::new();
    let root = doc.root();
    let container = doc.append_with_id(root, "div", "container");
    doc.set_attribute(container, "data-switcher-dashboards", &views.join(" "));
    doc.set_attribute(
        container,
        "data-switcher-interval",
        &scenario.interval_ms.max(1).to_string(),
    );
    doc.append_with_id(container, "div", "dc-switcher-controls");
    let mut page = SimPage::mount(SimHost::with_document("/v0", doc));

    for step in scenario.steps {
        let seen = page.navigations().len();
        match step {
            Step::Advance(ms) => {
                page.advance(Duration::from_millis(u64::from(ms)));
            }
            Step::Skip => {
                page.click_id("dc-switcher-next");
            }
            Step::TogglePause => {
                page.click_id("dc-switcher-pause-reset");
            }
            Step::Shutdown => {
                page.shutdown();
                page.advance(Duration::from_secs(3600));
                assert_eq!(page.navigations().len(), seen, "navigation after shutdown");
                return;
            }
        }

        let board = page.board();
        let rotator = board.view_rotator();
        let controls = board.controls().expect("controls mounted");

        // The visible countdown never exceeds the configured interval.
        assert!(controls.remaining() <= controls.countdown().interval());

        // Navigation only ever targets a configured view, one step at a time.
        for path in &page.navigations()[seen..] {
            assert!(views.iter().any(|view| path == &format!("/{view}")));
        }
        assert!(rotator.current_index() < view_count);

        // Paused means no armed rotation timer.
        if !controls.is_running() {
            assert_ne!(rotator.phase(), RotationPhase::Running);
        }

        let icon = controls.pause_element().expect("pause control");
        let doc = page.host().document_ref();
        assert!(doc.has_class(icon, "fa-pause") != doc.has_class(icon, "fa-play"));
    }
});
