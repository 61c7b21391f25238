//! Custom test assertions for E2E tests

use earth_wallpapers::Event;
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;
use tokio::sync::broadcast;

/// File names (not directories) directly inside `dir`; empty if it is missing
pub fn file_names(dir: &Path) -> BTreeSet<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return BTreeSet::new();
    };
    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect()
}

/// Assert no file name appears in both directories
pub fn assert_mutually_exclusive(accepted: &Path, invalid: &Path) {
    let accepted = file_names(accepted);
    let invalid = file_names(invalid);
    let both: Vec<_> = accepted.intersection(&invalid).collect();
    assert!(
        both.is_empty(),
        "files present in both accepted and quarantine: {both:?}"
    );
}

/// Drain every event currently buffered
pub fn drain(events: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

/// Wait for the first event matching `pred`
pub async fn wait_for_event(
    events: &mut broadcast::Receiver<Event>,
    timeout: Duration,
    pred: impl Fn(&Event) -> bool,
) -> Option<Event> {
    tokio::time::timeout(timeout, async {
        loop {
            match events.recv().await {
                Ok(event) if pred(&event) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    })
    .await
    .ok()
    .flatten()
}
