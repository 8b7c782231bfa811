#![no_main]

use std::collections::HashSet;

use dashswitch_runtime::{parse_interval, parse_view_list, view_from_path};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (&str, &str, &str)| {
    let (views, interval, path) = input;
    if views.len() > 4096 {
        return;
    }

    let parsed = parse_view_list(views);

    // Either disabled or at least two distinct, non-empty tokens.
    assert!(parsed.is_empty() || parsed.len() >= 2);
    let mut seen = HashSet::new();
    for view in &parsed {
        assert!(!view.as_str().is_empty());
        assert!(!view.as_str().contains(|c: char| c == ',' || c.is_whitespace()));
        assert!(seen.insert(view.as_str()), "duplicate view survived parsing");
    }

    // Positive or disabled; never a zero-length period.
    if let Some(period) = parse_interval(Some(interval), 60_000) {
        assert!(!period.is_zero());
    }

    // The derived view never contains a separator.
    assert!(!view_from_path(path).contains('/'));
});
