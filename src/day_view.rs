//! Schedule and notes panels for the selected day.
//!
//! Panels move through `Idle -> Loading -> Ready | Failed`. Both panels are
//! always updated together from a single provider result, so the view never
//! mixes data from one response with an error from another.
//!
//! Every fetch carries a [`RequestTag`]. Only the result matching the most
//! recently issued tag is applied; anything older is dropped.

use crate::client::{ClientError, DayData, Note, ScheduleItem};
use crate::config::LabelsConfig;
use crate::date::{CalendarDate, DayKey};

/// Identifies one day-data request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTag {
    pub seq: u64,
    pub key: DayKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Panel<T> {
    Idle,
    Loading,
    Ready(Vec<T>),
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Entry,
    Placeholder,
    Error,
}

/// One display line of a panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRow {
    pub text: String,
    pub kind: RowKind,
}

impl PanelRow {
    fn entry(text: String) -> Self {
        Self {
            text,
            kind: RowKind::Entry,
        }
    }

    fn placeholder(text: &str) -> Self {
        Self {
            text: text.to_string(),
            kind: RowKind::Placeholder,
        }
    }
}

/// Text shown for one panel entry
pub trait RowText {
    fn row_text(&self) -> String;
}

impl RowText for ScheduleItem {
    fn row_text(&self) -> String {
        self.display()
    }
}

impl RowText for Note {
    fn row_text(&self) -> String {
        self.text.clone()
    }
}

impl<T: RowText> Panel<T> {
    /// Lines to draw; `empty` is used when the provider sent nothing
    pub fn rows(&self, empty: &str, labels: &LabelsConfig) -> Vec<PanelRow> {
        match self {
            Panel::Idle => Vec::new(),
            Panel::Loading => vec![PanelRow::placeholder(&labels.loading)],
            Panel::Ready(entries) if entries.is_empty() => vec![PanelRow::placeholder(empty)],
            Panel::Ready(entries) => entries
                .iter()
                .map(|e| PanelRow::entry(e.row_text()))
                .collect(),
            Panel::Failed => vec![PanelRow {
                text: labels.load_error.clone(),
                kind: RowKind::Error,
            }],
        }
    }
}

pub struct DayView {
    date: Option<CalendarDate>,
    schedule: Panel<ScheduleItem>,
    notes: Panel<Note>,
    latest: Option<RequestTag>,
}

impl Default for DayView {
    fn default() -> Self {
        Self::new()
    }
}

impl DayView {
    pub fn new() -> Self {
        Self {
            date: None,
            schedule: Panel::Idle,
            notes: Panel::Idle,
            latest: None,
        }
    }

    /// Show `date` with both panels loading; `tag` becomes the only
    /// request whose result will be accepted
    pub fn begin(&mut self, date: CalendarDate, tag: RequestTag) {
        self.date = Some(date);
        self.schedule = Panel::Loading;
        self.notes = Panel::Loading;
        self.latest = Some(tag);
    }

    /// Apply a provider result. Returns `false` if `tag` is stale.
    pub fn apply(&mut self, tag: &RequestTag, result: Result<DayData, ClientError>) -> bool {
        if self.latest.as_ref() != Some(tag) {
            return false;
        }
        self.latest = None;

        match result {
            Ok(data) => {
                self.schedule = Panel::Ready(data.items.unwrap_or_default());
                self.notes = Panel::Ready(data.notes.unwrap_or_default());
            }
            Err(_) => {
                self.schedule = Panel::Failed;
                self.notes = Panel::Failed;
            }
        }
        true
    }

    pub fn date(&self) -> Option<CalendarDate> {
        self.date
    }

    pub fn schedule(&self) -> &Panel<ScheduleItem> {
        &self.schedule
    }

    pub fn notes(&self) -> &Panel<Note> {
        &self.notes
    }

    /// A request is outstanding
    pub fn is_loading(&self) -> bool {
        self.latest.is_some()
    }

    pub fn schedule_rows(&self, labels: &LabelsConfig) -> Vec<PanelRow> {
        self.schedule.rows(&labels.no_events, labels)
    }

    pub fn note_rows(&self, labels: &LabelsConfig) -> Vec<PanelRow> {
        self.notes.rows(&labels.no_notes, labels)
    }
}

/// Scroll position of the day panel body.
///
/// The offset is the first visible row. In follow mode the panel stays
/// pinned to its last row, so rows appended by a refetch come into view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelScroll {
    offset: usize,
    follow: bool,
}

impl PanelScroll {
    /// First visible row for `rows` rows in a body `height` rows tall
    pub fn offset(&self, rows: usize, height: usize) -> usize {
        let max_offset = rows.saturating_sub(height);
        if self.follow {
            max_offset
        } else {
            self.offset.min(max_offset)
        }
    }

    /// Move by `delta` rows, clamped to the content
    pub fn scroll_by(&mut self, delta: isize, rows: usize, height: usize) {
        let max_offset = rows.saturating_sub(height);
        self.offset = self
            .offset(rows, height)
            .saturating_add_signed(delta)
            .min(max_offset);
        // Scrolling back down to the end resumes following
        self.follow = delta > 0 && self.offset == max_offset;
    }

    /// Pin to the last row
    pub fn scroll_to_bottom(&mut self) {
        self.follow = true;
    }

    /// Back to the top
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_following(&self) -> bool {
        self.follow
    }
}
