use std::io::Error;

use clap::ValueEnum;
use derive_setters::Setters;
use ratatui::crossterm::event::KeyEvent;

#[derive(Debug)]
pub enum AppError {
    IoError(Error),
    InvalidPageSize(usize),
    InvalidFilter(String),
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        AppError::IoError(err)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::IoError(e) => write!(f, "io error: {e}"),
            AppError::InvalidPageSize(n) => write!(f, "invalid page size: {n}"),
            AppError::InvalidFilter(e) => write!(f, "invalid filter: {e}"),
        }
    }
}

/// The sidebar pages of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Page {
    Dashboard,
    Recruiters,
    Clients,
    Candidates,
    Performance,
    Analytics,
    Schedule,
    Reports,
    Targets,
}

pub const PAGES: [Page; 9] = [
    Page::Dashboard,
    Page::Recruiters,
    Page::Clients,
    Page::Candidates,
    Page::Performance,
    Page::Analytics,
    Page::Schedule,
    Page::Reports,
    Page::Targets,
];

impl Page {
    pub fn label(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Recruiters => "Recruiters",
            Page::Clients => "Clients",
            Page::Candidates => "Candidates",
            Page::Performance => "Performance",
            Page::Analytics => "Analytics",
            Page::Schedule => "Schedule",
            Page::Reports => "Reports",
            Page::Targets => "Targets",
        }
    }

    pub fn from_index(idx: usize) -> Option<Page> {
        PAGES.get(idx).copied()
    }

    pub fn next(&self) -> Page {
        let pos = PAGES.iter().position(|p| p == self).unwrap_or(0);
        PAGES[(pos + 1) % PAGES.len()]
    }

    pub fn prev(&self) -> Page {
        let pos = PAGES.iter().position(|p| p == self).unwrap_or(0);
        PAGES[(pos + PAGES.len() - 1) % PAGES.len()]
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label().to_lowercase())
    }
}

#[derive(Debug, Clone, Setters)]
pub struct AppConfig {
    pub event_poll_time: u64,
    pub fetch_delay_ms: u64,
    pub page_size: usize,
    pub start_page: Page,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            event_poll_time: 100,
            fetch_delay_ms: 500,
            page_size: 10,
            start_page: Page::Dashboard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CmdMode {
    Search,
    Filter,
}

#[derive(Debug)]
pub enum Message {
    Quit,
    Help,
    Exit,
    SwitchPage(Page),
    NextPage,
    PrevPage,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    TablePageNext,
    TablePagePrev,
    TablePageFirst,
    TablePageLast,
    CyclePageSize,
    ToggleSort,
    EnterSearch,
    EnterFilter,
    ClearFilters,
    CyclePrefilter(usize),
    Refresh,
    OpenRecord,
    EditRecord,
    DeleteRecord,
    CopyRow,
    CopyCell,
    ExportCsv,
    RawKey(KeyEvent),
}

pub const HELP_TEXT: &str = "\
 staffdeck key bindings

 1-9        switch page          Tab/S-Tab  next/prev page
 j/k ↓/↑    move row cursor      h/l ←/→    move column cursor
 n/p        next/prev table page g/G        first/last table page
 z          cycle page size      s          sort by column (asc/desc)
 /          search               f          filter (key=value, key=a..b)
 F          clear all filters    D/T        cycle dropdown filters
 r          refresh data         Enter      open record details
 e          edit record          d          delete record
 y          copy row (csv)       Y          copy cell
 x          export table as csv  ?          this help
 Esc        close / back         q          quit
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_cycle_wraps() {
        assert_eq!(Page::Targets.next(), Page::Dashboard);
        assert_eq!(Page::Dashboard.prev(), Page::Targets);
        assert_eq!(Page::Dashboard.next(), Page::Recruiters);
    }

    #[test]
    fn page_from_index() {
        assert_eq!(Page::from_index(0), Some(Page::Dashboard));
        assert_eq!(Page::from_index(8), Some(Page::Targets));
        assert_eq!(Page::from_index(9), None);
    }
}
