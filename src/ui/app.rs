use crate::inventory::{export_known_shortcuts, RankedEntry};
use chrono::{DateTime, Local, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;

/// File name offered when the export prompt opens.
pub const DEFAULT_EXPORT_FILE: &str = "software.txt";

/// Rows moved by `PageUp` / `PageDown`.
pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Export,
}

pub struct App {
    pub entries: Vec<RankedEntry>,
    pub selected_index: usize,
    pub should_quit: bool,
    pub mode: InputMode,
    pub search_query: String,
    pub known_only: bool,
    pub export_path: String,
    pub status: Option<String>,
}

impl App {
    pub fn new(entries: Vec<RankedEntry>) -> Self {
        Self {
            entries,
            selected_index: 0,
            should_quit: false,
            mode: InputMode::Normal,
            search_query: String::new(),
            known_only: false,
            export_path: DEFAULT_EXPORT_FILE.to_string(),
            status: None,
        }
    }

    /// Entries passing the known-only and search filters, in ranked order.
    pub fn visible_entries(&self) -> Vec<&RankedEntry> {
        let query = self.search_query.to_lowercase();
        self.entries
            .iter()
            .filter(|e| !self.known_only || e.is_known_shortcut)
            .filter(|e| query.is_empty() || e.name.to_lowercase().contains(&query))
            .collect()
    }

    pub fn known_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_known_shortcut).count()
    }

    pub fn next(&mut self) {
        let len = self.visible_entries().len();
        if len > 0 && self.selected_index < len - 1 {
            self.selected_index += 1;
        }
    }

    pub fn previous(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn page_down(&mut self) {
        let last = self.visible_entries().len().saturating_sub(1);
        self.selected_index = (self.selected_index + PAGE_SIZE).min(last);
    }

    pub fn page_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(PAGE_SIZE);
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    pub fn select_last(&mut self) {
        self.selected_index = self.visible_entries().len().saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let last = self.visible_entries().len().saturating_sub(1);
        self.selected_index = self.selected_index.min(last);
    }

    pub fn toggle_known_only(&mut self) {
        self.known_only = !self.known_only;
        self.selected_index = 0;
    }

    pub fn enter_search_mode(&mut self) {
        self.mode = InputMode::Search;
        self.status = None;
    }

    pub fn exit_search_mode(&mut self) {
        self.mode = InputMode::Normal;
        self.search_query.clear();
        self.clamp_selection();
    }

    /// Leave search mode keeping the current filter.
    pub fn accept_search(&mut self) {
        self.mode = InputMode::Normal;
    }

    pub fn search_push_char(&mut self, c: char) {
        self.search_query.push(c);
        self.selected_index = 0;
    }

    pub fn search_pop_char(&mut self) {
        self.search_query.pop();
        self.clamp_selection();
    }

    pub fn begin_export(&mut self) {
        self.mode = InputMode::Export;
        self.status = None;
    }

    pub fn cancel_export(&mut self) {
        self.mode = InputMode::Normal;
        self.status = Some("Export canceled".to_string());
    }

    /// Write the known-shortcut export to the prompted path.
    ///
    /// A failed write only sets the status line; entries are untouched.
    pub fn confirm_export(&mut self) {
        self.mode = InputMode::Normal;

        let target = self.export_path.trim();
        if target.is_empty() {
            self.status = Some("Export canceled".to_string());
            return;
        }

        let path = PathBuf::from(target);
        self.status = Some(match export_known_shortcuts(&self.entries, &path) {
            Ok(written) => format!("Saved {} names to {}", written, path.display()),
            Err(err) => format!("Export failed: {:#}", err),
        });
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.mode {
            InputMode::Search => match key.code {
                KeyCode::Esc => self.exit_search_mode(),
                KeyCode::Enter => self.accept_search(),
                KeyCode::Down => self.next(),
                KeyCode::Up => self.previous(),
                KeyCode::Backspace => self.search_pop_char(),
                KeyCode::Char(c) => self.search_push_char(c),
                _ => {}
            },
            InputMode::Export => match key.code {
                KeyCode::Esc => self.cancel_export(),
                KeyCode::Enter => self.confirm_export(),
                KeyCode::Backspace => {
                    self.export_path.pop();
                }
                KeyCode::Char(c) => self.export_path.push(c),
                _ => {}
            },
            InputMode::Normal => match key.code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Char('j') | KeyCode::Down => self.next(),
                KeyCode::Char('k') | KeyCode::Up => self.previous(),
                KeyCode::PageDown => self.page_down(),
                KeyCode::PageUp => self.page_up(),
                KeyCode::Char('g') | KeyCode::Home => self.select_first(),
                KeyCode::Char('G') | KeyCode::End => self.select_last(),
                KeyCode::Char('/') => self.enter_search_mode(),
                KeyCode::Char('f') => self.toggle_known_only(),
                KeyCode::Char('s') => self.begin_export(),
                _ => {}
            },
        }
    }
}

/// Local-time rendering of a last-run timestamp, `-` when unknown.
pub fn format_last_run(last_run: Option<DateTime<Utc>>) -> String {
    match last_run {
        Some(ts) => ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}
