//! Domain-specific assertion macros for trawl harnesses.
//!
//! These wrap `pretty_assertions` and add failure messages that show the
//! session's buffer and selection next to the mismatch.

// ---------------------------------------------------------------------------
// Result assertions
// ---------------------------------------------------------------------------

/// Assert the labels of a candidate list, in order.
///
/// ```rust
/// assert_labels!(session.view().results, ["IOTC"]);
/// ```
#[macro_export]
macro_rules! assert_labels {
    ($items:expr, [$($label:expr),* $(,)?]) => {{
        let items: &[trawl_core::DataItem] = &$items;
        let actual: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
        let expected: Vec<&str> = vec![$($label),*];
        pretty_assertions::assert_eq!(actual, expected, "candidate labels differ");
    }};
}

/// Assert that no two candidates share an id.
#[macro_export]
macro_rules! assert_unique_ids {
    ($items:expr) => {{
        let items: &[trawl_core::DataItem] = &$items;
        let mut seen = std::collections::HashSet::new();
        for item in items {
            if !seen.insert(item.id.as_str()) {
                panic!(
                    "assert_unique_ids! failed: id {:?} appears more than once.\n  items: {:?}",
                    item.id,
                    items.iter().map(|i| i.id.as_str()).collect::<Vec<_>>()
                );
            }
        }
    }};
}

// ---------------------------------------------------------------------------
// Session assertions
// ---------------------------------------------------------------------------

/// Assert the session's phase.
///
/// ```rust
/// assert_phase!(session, SearchPhase::Merged);
/// ```
#[macro_export]
macro_rules! assert_phase {
    ($session:expr, $phase:expr) => {{
        let expected: trawl_core::SearchPhase = $phase;
        let actual = $session.phase();
        if actual != expected {
            panic!(
                "assert_phase! failed:\n  expected: {}\n  actual:   {}\n  text: {:?}\n  loading: {}",
                expected,
                actual,
                $session.state().text,
                $session.state().loading
            );
        }
    }};
}

/// Assert that the selection holds exactly these ids, in order.
#[macro_export]
macro_rules! assert_selected {
    ($session:expr, [$($id:expr),* $(,)?]) => {{
        let actual: Vec<&str> = $session.selection().iter().map(|i| i.id.as_str()).collect();
        let expected: Vec<&str> = vec![$($id),*];
        pretty_assertions::assert_eq!(
            actual,
            expected,
            "selection differs for buffer {:?}",
            $session.state().text
        );
    }};
}
