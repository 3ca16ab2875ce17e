use crate::client::{ClientError, DayData};
use crate::config::Config;
use crate::date::{CalendarDate, DateFormatter, DayKey};
use crate::day_view::{DayView, PanelRow, PanelScroll, RequestTag};
use crate::grid::{self, Direction, MonthGrid};
use crate::preference::ThemePreference;
use crate::state::ViewState;
use crate::tabs::Tab;

/// Where keyboard input goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Arrow keys move the grid cursor
    Grid,
    /// Characters go into the note input
    NoteInput,
}

/// Everything that can happen to the dashboard: user input and provider results
#[derive(Debug, Clone)]
pub enum Message {
    PreviousMonth,
    NextMonth,
    /// Click on a grid cell
    SelectCell(usize),
    MoveCursor(Direction),
    /// Keyboard equivalent of clicking the cell under the cursor
    SelectCursor,
    SelectTab(Tab),
    ToggleTab,
    /// Scroll the day panel by rows (negative is up)
    ScrollPanel(isize),
    /// Scroll the day panel by whole pages
    PagePanel(isize),
    ToggleTheme,
    FocusNoteInput,
    FocusGrid,
    NoteChar(char),
    NoteBackspace,
    SubmitNote,
    DismissAlert,
    DayLoaded {
        tag: RequestTag,
        result: Result<DayData, ClientError>,
    },
    NoteSubmitted {
        key: DayKey,
        result: Result<(), ClientError>,
    },
    Quit,
}

/// Provider work requested by the controller, run by the event loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchDay(RequestTag),
    SubmitNote { key: DayKey, text: String },
}

/// Dashboard controller. All state changes go through [`App::update`].
pub struct App {
    state: ViewState,
    grid: MonthGrid,
    day: DayView,
    theme: ThemePreference,
    config: Config,
    formatter: DateFormatter,
    today: CalendarDate,
    focus: Focus,
    cursor: usize,
    note_input: String,
    /// A note POST is in flight
    pending_note: bool,
    scroll: PanelScroll,
    /// Rows the day panel body can show; updated from the terminal size
    panel_height: usize,
    /// Blocking alert; swallows input until dismissed
    alert: Option<String>,
    next_seq: u64,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, theme: ThemePreference, today: CalendarDate) -> Self {
        let state = ViewState::new(today, theme.mode());
        let grid = MonthGrid::render(state.reference_month, state.selected_day, today);
        let cursor = grid.selected_index().unwrap_or(0);
        let formatter = DateFormatter::new(&config.appearance);

        Self {
            state,
            grid,
            day: DayView::new(),
            theme,
            config,
            formatter,
            today,
            focus: Focus::Grid,
            cursor,
            note_input: String::new(),
            pending_note: false,
            scroll: PanelScroll::default(),
            panel_height: 1,
            alert: None,
            next_seq: 0,
            should_quit: false,
        }
    }

    /// Initial load of the selected day
    pub fn start(&mut self) -> Vec<Effect> {
        vec![self.load_day()]
    }

    pub fn update(&mut self, msg: Message) -> Vec<Effect> {
        if self.alert.is_some() {
            match msg {
                Message::DismissAlert => self.alert = None,
                Message::Quit => self.should_quit = true,
                Message::DayLoaded { tag, result } => self.day_loaded(tag, result),
                Message::NoteSubmitted { key, result } => return self.note_submitted(key, result),
                _ => {}
            }
            return Vec::new();
        }

        match msg {
            Message::PreviousMonth => {
                self.state = self.state.previous_month();
                self.rebuild_grid();
            }
            Message::NextMonth => {
                self.state = self.state.next_month();
                self.rebuild_grid();
            }
            Message::SelectCell(index) => return self.select_cell(index),
            Message::MoveCursor(direction) => {
                self.cursor = grid::step(self.cursor, direction);
            }
            Message::SelectCursor => return self.select_cell(self.cursor),
            Message::SelectTab(tab) => self.switch_tab(tab),
            Message::ToggleTab => self.switch_tab(self.state.active_tab.toggle()),
            Message::ScrollPanel(rows) => self.scroll_panel(rows),
            Message::PagePanel(pages) => {
                let page = self.panel_height.max(1) as isize;
                self.scroll_panel(pages.saturating_mul(page));
            }
            Message::ToggleTheme => {
                let mode = self.theme.toggle();
                self.state = self.state.with_theme(mode);
            }
            Message::FocusNoteInput => {
                if self.state.active_tab != Tab::Notes {
                    self.switch_tab(Tab::Notes);
                }
                self.focus = Focus::NoteInput;
            }
            Message::FocusGrid => self.focus = Focus::Grid,
            Message::NoteChar(c) => self.note_input.push(c),
            Message::NoteBackspace => {
                self.note_input.pop();
            }
            Message::SubmitNote => return self.submit_note(),
            Message::DismissAlert => {}
            Message::DayLoaded { tag, result } => self.day_loaded(tag, result),
            Message::NoteSubmitted { key, result } => return self.note_submitted(key, result),
            Message::Quit => self.should_quit = true,
        }
        Vec::new()
    }

    /// Click on a cell: move the selected tag, update the selection, fetch
    fn select_cell(&mut self, index: usize) -> Vec<Effect> {
        let Some(date) = self.grid.select(index) else {
            return Vec::new();
        };
        self.cursor = index;
        self.state = self.state.with_selected_day(date);
        vec![self.load_day()]
    }

    /// Put both panels into loading and issue a fetch for the selected day
    fn load_day(&mut self) -> Effect {
        self.next_seq += 1;
        let tag = RequestTag {
            seq: self.next_seq,
            key: self.state.selected_key(),
        };
        tracing::debug!("Requesting day {} (#{})", tag.key, tag.seq);
        self.day.begin(self.state.selected_day, tag.clone());
        self.scroll.reset();
        Effect::FetchDay(tag)
    }

    fn day_loaded(&mut self, tag: RequestTag, result: Result<DayData, ClientError>) {
        if let Err(ref e) = result {
            tracing::warn!("Loading day {} failed: {}", tag.key, e);
        }
        if !self.day.apply(&tag, result) {
            tracing::debug!("Dropping stale response for {} (#{})", tag.key, tag.seq);
        }
    }

    fn submit_note(&mut self) -> Vec<Effect> {
        let text = self.note_input.trim();
        if text.is_empty() || self.pending_note {
            return Vec::new();
        }
        self.pending_note = true;
        vec![Effect::SubmitNote {
            key: self.state.selected_key(),
            text: text.to_string(),
        }]
    }

    fn note_submitted(&mut self, key: DayKey, result: Result<(), ClientError>) -> Vec<Effect> {
        self.pending_note = false;
        match result {
            Ok(()) => {
                tracing::info!("Added note for {}", key);
                self.note_input.clear();
                let fetch = self.load_day();
                // New notes are appended; keep the end of the list in view
                self.scroll.scroll_to_bottom();
                vec![fetch]
            }
            Err(e) => {
                tracing::warn!("Adding note for {} failed: {}", key, e);
                self.alert = Some(self.config.labels.note_error.clone());
                Vec::new()
            }
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.state = self.state.with_tab(tab);
        self.scroll.reset();
        if tab != Tab::Notes {
            self.focus = Focus::Grid;
        }
    }

    fn scroll_panel(&mut self, rows: isize) {
        let count = self.panel_rows().len();
        self.scroll.scroll_by(rows, count, self.panel_height);
    }

    /// New month on screen; the cursor lands on the selected day if it is
    /// visible, otherwise on the 1st
    fn rebuild_grid(&mut self) {
        self.grid = MonthGrid::render(
            self.state.reference_month,
            self.state.selected_day,
            self.today,
        );
        self.cursor = self
            .grid
            .selected_index()
            .or_else(|| self.grid.index_of(&DayKey::from_date(self.state.reference_month)))
            .unwrap_or(0);
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn grid(&self) -> &MonthGrid {
        &self.grid
    }

    pub fn day_view(&self) -> &DayView {
        &self.day
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn formatter(&self) -> &DateFormatter {
        &self.formatter
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn note_input(&self) -> &str {
        &self.note_input
    }

    /// Rows of the active panel
    pub fn panel_rows(&self) -> Vec<PanelRow> {
        let labels = &self.config.labels;
        match self.state.active_tab {
            Tab::Schedule => self.day.schedule_rows(labels),
            Tab::Notes => self.day.note_rows(labels),
        }
    }

    /// First visible panel row for a body `height` rows tall
    pub fn panel_offset(&self, height: usize) -> usize {
        self.scroll.offset(self.panel_rows().len(), height)
    }

    /// Record how many rows the panel body shows, for paging and clamping
    pub fn set_panel_height(&mut self, height: usize) {
        self.panel_height = height.max(1);
    }

    pub fn note_pending(&self) -> bool {
        self.pending_note
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// `Date: 05.03.2024` line shown above both panels
    pub fn date_line(&self) -> Option<String> {
        self.day.date().map(|date| {
            format!(
                "{}{}",
                self.config.labels.date_prefix,
                self.formatter.display(date)
            )
        })
    }

    /// Icon on the theme toggle (offers the other theme)
    pub fn theme_icon(&self) -> &str {
        self.state.theme.toggle_icon(&self.config.appearance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Note, ScheduleItem};
    use crate::day_view::{Panel, RowKind};
    use crate::preference::{MemoryStore, PreferenceStore, ThemeMode, THEME_KEY};
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> CalendarDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn app_with_store(store: MemoryStore) -> App {
        let theme = ThemePreference::load(Box::new(store));
        App::new(Config::default(), theme, ymd(2024, 3, 15))
    }

    fn app() -> App {
        app_with_store(MemoryStore::default())
    }

    fn fetch_tag(effects: &[Effect]) -> RequestTag {
        match effects {
            [Effect::FetchDay(tag)] => tag.clone(),
            other => panic!("expected one fetch, got {:?}", other),
        }
    }

    fn type_note(app: &mut App, text: &str) {
        app.update(Message::FocusNoteInput);
        for c in text.chars() {
            app.update(Message::NoteChar(c));
        }
    }

    #[test]
    fn test_start_loads_today() {
        let mut app = app();
        let tag = fetch_tag(&app.start());

        assert_eq!(tag.key.as_str(), "2024-03-15");
        assert_eq!(app.date_line().as_deref(), Some("Date: 15.03.2024"));
        assert_eq!(app.day_view().schedule(), &Panel::Loading);
        assert_eq!(app.grid().cell(app.cursor()).unwrap().key.as_str(), "2024-03-15");
    }

    #[test]
    fn test_select_cell_issues_exactly_one_fetch() {
        let mut app = app();
        app.start();

        // index 0 of March 2024 is Feb 26
        let tag = fetch_tag(&app.update(Message::SelectCell(0)));

        assert_eq!(tag.key.as_str(), "2024-02-26");
        assert_eq!(app.state().selected_day, ymd(2024, 2, 26));
        assert_eq!(app.grid().selected_index(), Some(0));
        assert_eq!(app.grid().cells().iter().filter(|c| c.selected).count(), 1);
        assert_eq!(app.day_view().notes(), &Panel::Loading);
    }

    #[test]
    fn test_select_cell_out_of_range_does_nothing() {
        let mut app = app();
        assert!(app.update(Message::SelectCell(99)).is_empty());
        assert_eq!(app.state().selected_day, ymd(2024, 3, 15));
    }

    #[test]
    fn test_navigation_never_moves_selection() {
        let mut app = app();
        app.start();

        assert!(app.update(Message::NextMonth).is_empty());
        assert_eq!(app.state().reference_month, ymd(2024, 4, 1));
        assert_eq!(app.state().selected_day, ymd(2024, 3, 15));
        assert_eq!(app.grid().selected_index(), None);

        app.update(Message::PreviousMonth);
        app.update(Message::PreviousMonth);
        assert_eq!(app.state().reference_month, ymd(2024, 2, 1));
        assert_eq!(app.state().selected_day, ymd(2024, 3, 15));

        app.update(Message::NextMonth);
        assert!(app.grid().selected_index().is_some());
    }

    #[test]
    fn test_navigation_moves_cursor_to_visible_day() {
        let mut app = app();

        // April 2024 starts on a Monday, so the 1st is cell 0
        app.update(Message::NextMonth);
        assert_eq!(app.cursor(), 0);
        assert_eq!(app.grid().cell(app.cursor()).unwrap().key.as_str(), "2024-04-01");

        app.update(Message::PreviousMonth);
        assert_eq!(app.grid().cell(app.cursor()).unwrap().key.as_str(), "2024-03-15");
    }

    #[test]
    fn test_cursor_select_matches_click() {
        let mut app = app();
        app.start();
        let start = app.cursor();

        app.update(Message::MoveCursor(Direction::Right));
        let tag = fetch_tag(&app.update(Message::SelectCursor));

        assert_eq!(app.cursor(), start + 1);
        assert_eq!(tag.key.as_str(), "2024-03-16");
    }

    #[test]
    fn test_loaded_day_renders() {
        let mut app = app();
        let tag = fetch_tag(&app.start());

        let data = DayData {
            items: Some(vec![ScheduleItem {
                time: Some("09:00".to_string()),
                text: "Algebra".to_string(),
            }]),
            notes: Some(vec![Note {
                text: "bring ruler".to_string(),
            }]),
        };
        app.update(Message::DayLoaded {
            tag,
            result: Ok(data),
        });

        let labels = &app.config().labels;
        assert_eq!(app.day_view().schedule_rows(labels)[0].text, "09:00 — Algebra");
        assert_eq!(app.day_view().note_rows(labels)[0].text, "bring ruler");
    }

    #[test]
    fn test_network_failure_shows_error_in_both_panels() {
        let mut app = app();
        let tag = fetch_tag(&app.start());

        app.update(Message::DayLoaded {
            tag,
            result: Err(ClientError::Network("connection refused".to_string())),
        });

        let labels = &app.config().labels;
        let schedule = app.day_view().schedule_rows(labels);
        let notes = app.day_view().note_rows(labels);
        assert_eq!(schedule.len(), 1);
        assert_eq!(notes.len(), 1);
        assert_eq!(schedule[0].kind, RowKind::Error);
        assert_eq!(notes[0].kind, RowKind::Error);
    }

    #[test]
    fn test_stale_response_does_not_overwrite_newer_selection() {
        let mut app = app();
        let first = fetch_tag(&app.start());
        let second = fetch_tag(&app.update(Message::SelectCell(0)));

        app.update(Message::DayLoaded {
            tag: first,
            result: Ok(DayData {
                items: Some(vec![ScheduleItem {
                    time: None,
                    text: "wrong day".to_string(),
                }]),
                notes: None,
            }),
        });
        assert_eq!(app.day_view().schedule(), &Panel::Loading);

        app.update(Message::DayLoaded {
            tag: second,
            result: Ok(DayData::default()),
        });
        assert_eq!(app.day_view().schedule(), &Panel::Ready(vec![]));
    }

    #[test]
    fn test_blank_note_is_skipped() {
        let mut app = app();
        app.start();
        type_note(&mut app, "   \t ");

        assert!(app.update(Message::SubmitNote).is_empty());
        assert_eq!(app.note_input(), "   \t ");
    }

    #[test]
    fn test_note_submission_sends_trimmed_text() {
        let mut app = app();
        app.start();
        type_note(&mut app, "  buy milk ");

        let effects = app.update(Message::SubmitNote);
        assert_eq!(
            effects,
            vec![Effect::SubmitNote {
                key: "2024-03-15".parse().unwrap(),
                text: "buy milk".to_string(),
            }]
        );
        // nothing is cleared until the provider confirms
        assert_eq!(app.note_input(), "  buy milk ");
    }

    #[test]
    fn test_successful_note_clears_input_and_refetches_once() {
        let mut app = app();
        app.start();
        type_note(&mut app, "buy milk");
        app.update(Message::SubmitNote);

        let effects = app.update(Message::NoteSubmitted {
            key: "2024-03-15".parse().unwrap(),
            result: Ok(()),
        });

        let tag = fetch_tag(&effects);
        assert_eq!(tag.key.as_str(), "2024-03-15");
        assert_eq!(app.note_input(), "");
        assert_eq!(app.day_view().notes(), &Panel::Loading);
    }

    #[test]
    fn test_failed_note_alerts_and_keeps_input() {
        let mut app = app();
        app.start();
        type_note(&mut app, "buy milk");
        app.update(Message::SubmitNote);

        let effects = app.update(Message::NoteSubmitted {
            key: "2024-03-15".parse().unwrap(),
            result: Err(ClientError::Network("timeout".to_string())),
        });

        assert!(effects.is_empty());
        assert_eq!(app.alert(), Some("Failed to add note"));
        assert_eq!(app.note_input(), "buy milk");

        // alert blocks other input until dismissed
        assert!(app.update(Message::SelectCell(0)).is_empty());
        assert_eq!(app.state().selected_day, ymd(2024, 3, 15));

        app.update(Message::DismissAlert);
        assert_eq!(app.alert(), None);
        assert_eq!(app.update(Message::SubmitNote).len(), 1);
    }

    fn load_notes(app: &mut App, tag: RequestTag, count: usize) {
        let notes = (1..=count)
            .map(|i| Note {
                text: format!("note-{}", i),
            })
            .collect();
        app.update(Message::DayLoaded {
            tag,
            result: Ok(DayData {
                items: None,
                notes: Some(notes),
            }),
        });
    }

    #[test]
    fn test_second_submit_waits_for_first() {
        let mut app = app();
        app.start();
        type_note(&mut app, "buy milk");

        assert_eq!(app.update(Message::SubmitNote).len(), 1);
        assert!(app.note_pending());
        assert!(app.update(Message::SubmitNote).is_empty());

        app.update(Message::NoteSubmitted {
            key: "2024-03-15".parse().unwrap(),
            result: Err(ClientError::Network("timeout".to_string())),
        });
        assert!(!app.note_pending());
        app.update(Message::DismissAlert);
        assert_eq!(app.update(Message::SubmitNote).len(), 1);
    }

    #[test]
    fn test_panel_scrolls_within_rows() {
        let mut app = app();
        let tag = fetch_tag(&app.start());
        load_notes(&mut app, tag, 30);
        app.update(Message::SelectTab(Tab::Notes));
        app.set_panel_height(10);

        assert_eq!(app.panel_offset(10), 0);
        app.update(Message::PagePanel(1));
        assert_eq!(app.panel_offset(10), 10);
        app.update(Message::ScrollPanel(100));
        assert_eq!(app.panel_offset(10), 20);
        app.update(Message::ScrollPanel(-3));
        assert_eq!(app.panel_offset(10), 17);

        // switching tabs starts the other panel at the top
        app.update(Message::ToggleTab);
        assert_eq!(app.panel_offset(10), 0);
    }

    #[test]
    fn test_added_note_is_scrolled_into_view() {
        let mut app = app();
        let tag = fetch_tag(&app.start());
        load_notes(&mut app, tag, 29);
        type_note(&mut app, "note-30");
        app.update(Message::SubmitNote);

        let refetch = fetch_tag(&app.update(Message::NoteSubmitted {
            key: "2024-03-15".parse().unwrap(),
            result: Ok(()),
        }));
        load_notes(&mut app, refetch, 30);

        let offset = app.panel_offset(10);
        assert_eq!(offset, 20);
        assert_eq!(app.panel_rows()[offset + 9].text, "note-30");
    }

    #[test]
    fn test_tabs_switch_together() {
        let mut app = app();
        assert_eq!(app.state().active_tab, Tab::Schedule);

        app.update(Message::SelectTab(Tab::Notes));
        assert_eq!(app.state().active_tab, Tab::Notes);

        app.update(Message::ToggleTab);
        assert_eq!(app.state().active_tab, Tab::Schedule);
    }

    #[test]
    fn test_leaving_notes_tab_releases_input_focus() {
        let mut app = app();
        app.update(Message::FocusNoteInput);
        assert_eq!(app.focus(), Focus::NoteInput);
        assert_eq!(app.state().active_tab, Tab::Notes);

        app.update(Message::SelectTab(Tab::Schedule));
        assert_eq!(app.focus(), Focus::Grid);
    }

    #[test]
    fn test_theme_toggle_twice_round_trips() {
        let mut store = MemoryStore::default();
        store.set(THEME_KEY, "light").unwrap();
        let mut app = app_with_store(store.clone());
        let icon = app.theme_icon().to_string();

        app.update(Message::ToggleTheme);
        assert_eq!(app.state().theme, ThemeMode::Dark);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
        assert_ne!(app.theme_icon(), icon);

        app.update(Message::ToggleTheme);
        assert_eq!(app.state().theme, ThemeMode::Light);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("light"));
        assert_eq!(app.theme_icon(), icon);
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        app.update(Message::Quit);
        assert!(app.should_quit());
    }
}
