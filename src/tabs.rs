//! Schedule/notes panel switching.
//!
//! Only one panel is visible at a time. The tab bar and the panel body are
//! both drawn from the same `Tab` value, so they always switch together.

use crate::config::LabelsConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Schedule,
    Notes,
}

impl Tab {
    /// Tabs in display order
    pub const ALL: [Tab; 2] = [Tab::Schedule, Tab::Notes];

    /// The other tab
    pub fn toggle(self) -> Self {
        match self {
            Tab::Schedule => Tab::Notes,
            Tab::Notes => Tab::Schedule,
        }
    }

    pub fn title(self, labels: &LabelsConfig) -> &str {
        match self {
            Tab::Schedule => &labels.schedule_tab,
            Tab::Notes => &labels.notes_tab,
        }
    }
}
