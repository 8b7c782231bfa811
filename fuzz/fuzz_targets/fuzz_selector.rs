#![no_main]

use dashswitch_backend::HostDocument;
use dashswitch_web::SimDocument;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|selector: &str| {
    if selector.len() > 512 {
        return;
    }

    let mut doc = SimDocument::new();
    let root = doc.root();
    let container = doc.append_with_id(root, "div", "container");
    doc.set_attribute(container, "data-switcher-dashboards", "a b");
    let grid = doc.append(container, "ul");
    doc.set_attribute(grid, "class", "gridster wide");
    let item = doc.append(grid, "li");
    doc.append(item, "div");

    // Matching must never panic and only returns attached elements in document order.
    let found = doc.query_all(selector);
    for pair in found.windows(2) {
        assert!(pair[0].as_raw() < pair[1].as_raw(), "results out of order");
    }
    assert!(found.iter().all(|el| doc.is_attached(*el)));
});
