use std::time::Duration;

use chrono::Utc;

use crate::misc::time_ago::{parse_timestamp, relative_age};

/// Renders the relative age of an RFC 3339 timestamp ("42 seconds ago"),
/// re-rendering once per second for as long as it is shown.
///
/// Immediate mode makes teardown structural: a label that is no longer drawn
/// schedules no further repaints. An unparseable timestamp renders nothing.
pub fn time_ago_label(ui: &mut egui::Ui, timestamp: &str) {
    let Some(then) = parse_timestamp(timestamp) else {
        return;
    };
    ui.label(relative_age(Utc::now(), then).to_string());
    ui.ctx().request_repaint_after(Duration::from_secs(1));
}
