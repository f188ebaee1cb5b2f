//! Log pane for the project detail view.

use std::ops::Range;

/// Log lines of the bound project, replaced wholesale on every successful
/// non-empty poll.
#[derive(Debug, Default)]
pub struct LogPane {
    project_id: Option<String>,
    lines: Vec<String>,
    /// Scroll position as a line offset from the bottom.
    scroll_offset: usize,
    applied_seq: Option<u64>,
}

impl LogPane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the pane to a project (or unbind it). Changing the binding
    /// clears the pane.
    pub fn bind(&mut self, project_id: Option<String>) {
        if self.project_id == project_id {
            return;
        }
        self.project_id = project_id;
        self.lines.clear();
        self.scroll_offset = 0;
        self.applied_seq = None;
    }

    pub fn bound(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// Apply the result of log fetch number `seq` for `project_id`.
    ///
    /// Returns true when the pane content was replaced. Results for another
    /// project, stale results, and empty results leave the pane untouched.
    pub fn apply(&mut self, seq: u64, project_id: &str, lines: Vec<String>) -> bool {
        if self.project_id.as_deref() != Some(project_id) {
            tracing::debug!(event = "client.logs.unbound_dropped", project_id, seq);
            return false;
        }
        if self.applied_seq.is_some_and(|applied| seq <= applied) {
            tracing::debug!(event = "client.logs.stale_dropped", project_id, seq);
            return false;
        }
        self.applied_seq = Some(seq);
        if lines.is_empty() {
            return false;
        }
        self.lines = lines;
        self.scroll_offset = 0;
        true
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn scroll_up(&mut self, n: usize) {
        let max_scroll = self.lines.len().saturating_sub(1);
        self.scroll_offset = (self.scroll_offset + n).min(max_scroll);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(n);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = self.lines.len().saturating_sub(1);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }

    /// Indices of the lines visible in a viewport of `height` rows.
    pub fn visible_range(&self, height: usize) -> Range<usize> {
        let total = self.lines.len();
        let start = if total <= height {
            0
        } else {
            total.saturating_sub(height).saturating_sub(self.scroll_offset)
        };
        start..(start + height).min(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("line {}", i)).collect()
    }

    #[test]
    fn test_apply_replaces_and_scrolls_to_bottom() {
        let mut pane = LogPane::new();
        pane.bind(Some("p1".to_string()));

        assert!(pane.apply(1, "p1", lines(50)));
        pane.scroll_up(20);
        assert_eq!(pane.scroll_offset(), 20);

        assert!(pane.apply(2, "p1", vec!["fresh".to_string()]));
        assert_eq!(pane.lines(), &["fresh".to_string()]);
        assert_eq!(pane.scroll_offset(), 0);
    }

    #[test]
    fn test_empty_result_keeps_pane() {
        let mut pane = LogPane::new();
        pane.bind(Some("p1".to_string()));
        pane.apply(1, "p1", lines(3));

        assert!(!pane.apply(2, "p1", Vec::new()));
        assert_eq!(pane.lines().len(), 3);
    }

    #[test]
    fn test_unbound_and_stale_results_dropped() {
        let mut pane = LogPane::new();
        assert!(!pane.apply(1, "p1", lines(3)));

        pane.bind(Some("p1".to_string()));
        assert!(!pane.apply(1, "p2", lines(3)));
        assert!(pane.apply(3, "p1", lines(3)));
        assert!(!pane.apply(2, "p1", lines(1)));
        assert_eq!(pane.lines().len(), 3);
    }

    #[test]
    fn test_rebind_clears() {
        let mut pane = LogPane::new();
        pane.bind(Some("p1".to_string()));
        pane.apply(1, "p1", lines(3));

        pane.bind(Some("p1".to_string()));
        assert_eq!(pane.lines().len(), 3);

        pane.bind(Some("p2".to_string()));
        assert!(pane.lines().is_empty());
        assert_eq!(pane.bound(), Some("p2"));
        // Sequence numbers restart per binding
        assert!(pane.apply(1, "p2", lines(2)));
    }

    #[test]
    fn test_visible_range_follows_scroll() {
        let mut pane = LogPane::new();
        pane.bind(Some("p1".to_string()));
        pane.apply(1, "p1", lines(30));

        assert_eq!(pane.visible_range(10), 20..30);
        pane.scroll_up(5);
        assert_eq!(pane.visible_range(10), 15..25);
        pane.scroll_to_top();
        assert_eq!(pane.visible_range(10), 0..10);
        pane.scroll_to_bottom();
        assert_eq!(pane.visible_range(50), 0..30);
    }
}
