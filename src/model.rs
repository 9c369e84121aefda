use std::collections::HashMap;
use std::time::Instant;

use arboard::Clipboard;
use ratatui::crossterm::event::KeyEvent;
use tracing::{debug, error, info, trace, warn};

use crate::data::{DataProvider, EntityKind};
use crate::domain::{AppConfig, AppError, CmdMode, HELP_TEXT, Message, Page};
use crate::engine::{self, Composer, FilterValue, RecordMutator, TableState, TableViewData};
use crate::inputter::{InputResult, Inputter};
use crate::pages::{self, TablePageSpec};
use crate::record::Record;

#[derive(Debug, PartialEq)]
pub enum Status {
    Ready,
    Loading,
    Quitting,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Modus {
    Page,
    Record,
    Popup,
    CmdInput,
}

/// Per-page view state: the composer, the engine state and the cursor.
/// A fresh one is built whenever the user navigates to a page, so search,
/// filters, sort and pagination never leak across pages.
pub struct PageView {
    pub composer: Composer,
    pub table: TableState,
    pub cursor_row: usize,
    pub cursor_col: usize,
    pub prefilters: Vec<Option<String>>,
}

impl PageView {
    fn new(page_size: usize, prefilter_count: usize) -> Self {
        PageView {
            composer: Composer::default(),
            table: TableState::new(page_size),
            cursor_row: 0,
            cursor_col: 0,
            prefilters: vec![None; prefilter_count],
        }
    }
}

/// Everything the UI needs to render the active table page in one pass.
pub struct TableContext {
    pub spec: TablePageSpec,
    pub records: Vec<Record>,
    pub view: TableViewData,
}

pub struct Model {
    config: AppConfig,
    pub status: Status,
    modus: Modus,
    previous_modus: Modus,
    page: Page,
    data: HashMap<EntityKind, Vec<Record>>,
    view: PageView,
    record_detail: Option<Record>,
    popup_message: String,
    show_popup: bool,
    input: Inputter,
    cmd_mode: Option<CmdMode>,
    last_input: InputResult,
    active_cmdinput: bool,
    status_message: String,
    last_status_message_update: Instant,
    clipboard: Option<Clipboard>,
    provider: Box<dyn DataProvider>,
    mutator: Box<dyn RecordMutator>,
}

impl Model {
    pub fn new(
        config: AppConfig,
        provider: Box<dyn DataProvider>,
        mutator: Box<dyn RecordMutator>,
    ) -> Self {
        let clipboard = match Clipboard::new() {
            Ok(c) => Some(c),
            Err(e) => {
                warn!("Clipboard unavailable: {e}");
                None
            }
        };
        let start_page = config.start_page;
        let mut model = Self {
            config,
            status: Status::Ready,
            modus: Modus::Page,
            previous_modus: Modus::Page,
            page: start_page,
            data: HashMap::new(),
            view: PageView::new(10, 0),
            record_detail: None,
            popup_message: String::new(),
            show_popup: false,
            input: Inputter::default(),
            cmd_mode: None,
            last_input: InputResult::default(),
            active_cmdinput: false,
            status_message: "Started staffdeck!".to_string(),
            last_status_message_update: Instant::now(),
            clipboard,
            provider,
            mutator,
        };
        model.switch_page(start_page);
        model
    }

    // ----------------------- Accessors for the UI ------------------------ //

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn show_popup(&self) -> bool {
        self.show_popup
    }

    pub fn popup_message(&self) -> &str {
        &self.popup_message
    }

    pub fn record_detail(&self) -> Option<&Record> {
        self.record_detail.as_ref()
    }

    pub fn cmdline(&self) -> Option<(CmdMode, &InputResult)> {
        if self.active_cmdinput {
            self.cmd_mode.map(|mode| (mode, &self.last_input))
        } else {
            None
        }
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.view.cursor_row, self.view.cursor_col)
    }

    pub fn page_view(&self) -> &PageView {
        &self.view
    }

    /// True while the command line consumes raw key events.
    pub fn raw_keyevents(&self) -> bool {
        self.active_cmdinput
    }

    pub fn records(&self, kind: EntityKind) -> &[Record] {
        self.data.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has_loaded(&self, kind: EntityKind) -> bool {
        self.data.contains_key(&kind)
    }

    /// The active page's records after the dropdown pre-filters, plus the
    /// engine view over them. `None` on chart/card pages.
    pub fn table_context(&self) -> Option<TableContext> {
        let spec = pages::table_page(self.page)?;
        let records = self.prefiltered_records(&spec);
        let view = engine::apply(&records, &self.view.composer, &self.view.table);
        Some(TableContext { spec, records, view })
    }

    fn prefiltered_records(&self, spec: &TablePageSpec) -> Vec<Record> {
        let records = self.records(spec.kind);
        records
            .iter()
            .filter(|r| {
                spec.prefilters
                    .iter()
                    .zip(&self.view.prefilters)
                    .all(|(key, selection)| match selection {
                        Some(wanted) => {
                            r.get(key).map(|v| v.display()).as_deref() == Some(wanted.as_str())
                        }
                        None => true,
                    })
            })
            .cloned()
            .collect()
    }

    /// Distinct values of a pre-filter key over the full record list, in
    /// first-seen order.
    pub fn prefilter_values(&self, kind: EntityKind, key: &str) -> Vec<String> {
        let mut seen = Vec::new();
        for record in self.records(kind) {
            if let Some(v) = record.get(key) {
                let s = v.display();
                if !seen.contains(&s) {
                    seen.push(s);
                }
            }
        }
        seen
    }

    pub fn selected_record(&self) -> Option<Record> {
        let ctx = self.table_context()?;
        let idx = *ctx.view.rows.get(self.view.cursor_row)?;
        ctx.records.get(idx).cloned()
    }

    // ----------------------------- Updates ------------------------------ //

    pub fn update(&mut self, message: Message) -> Result<(), AppError> {
        trace!("Update: modus {:?}, message {:?}", self.modus, message);
        match self.modus {
            Modus::Page => match message {
                Message::Quit => self.quit(),
                Message::Help => self.show_help(),
                Message::Exit => (),
                Message::SwitchPage(page) => self.switch_page(page),
                Message::NextPage => self.switch_page(self.page.next()),
                Message::PrevPage => self.switch_page(self.page.prev()),
                Message::MoveUp => self.move_cursor_row(-1),
                Message::MoveDown => self.move_cursor_row(1),
                Message::MoveLeft => self.move_cursor_col(-1),
                Message::MoveRight => self.move_cursor_col(1),
                Message::TablePageFirst => self.table_page(PageMove::First),
                Message::TablePageLast => self.table_page(PageMove::Last),
                Message::TablePageNext => self.table_page(PageMove::Next),
                Message::TablePagePrev => self.table_page(PageMove::Prev),
                Message::CyclePageSize => self.cycle_page_size(),
                Message::ToggleSort => self.toggle_sort(),
                Message::EnterSearch => self.enter_cmd_mode(CmdMode::Search),
                Message::EnterFilter => self.enter_cmd_mode(CmdMode::Filter),
                Message::ClearFilters => self.clear_filters(),
                Message::CyclePrefilter(idx) => self.cycle_prefilter(idx),
                Message::Refresh => self.refresh(),
                Message::OpenRecord => self.open_record(),
                Message::EditRecord => self.edit_record(),
                Message::DeleteRecord => self.delete_record(),
                Message::CopyRow => self.copy_row(),
                Message::CopyCell => self.copy_cell(),
                Message::ExportCsv => self.export_csv(),
                Message::RawKey(_) => (),
            },
            Modus::Record => match message {
                Message::Quit => self.quit(),
                Message::Help => self.show_help(),
                Message::Exit | Message::OpenRecord => self.close_record(),
                Message::CopyRow => self.copy_row(),
                _ => (),
            },
            Modus::Popup => match message {
                Message::Quit => self.quit(),
                Message::Exit | Message::Help => self.close_popup(),
                _ => (),
            },
            Modus::CmdInput => {
                if let Message::RawKey(key) = message {
                    self.raw_input(key);
                }
            }
        }
        Ok(())
    }

    pub fn quit(&mut self) {
        self.status = Status::Quitting;
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.last_status_message_update = Instant::now();
    }

    // --------------------------- Navigation ------------------------------ //

    fn switch_page(&mut self, page: Page) {
        self.page = page;
        let prefilter_count = pages::table_page(page)
            .map(|spec| spec.prefilters.len())
            .unwrap_or(0);
        // Per-view state dies with the view it belongs to.
        self.view = PageView::new(self.config.page_size, prefilter_count);
        self.record_detail = None;
        info!("Switched to page {:?}", page);

        if let Some(spec) = pages::table_page(page) {
            self.ensure_loaded(spec.kind);
        } else if page == Page::Dashboard {
            self.ensure_loaded(EntityKind::Recruiters);
            self.ensure_loaded(EntityKind::Performance);
        }
        self.set_status_message(format!("Viewing {}", page.label()));
    }

    fn ensure_loaded(&mut self, kind: EntityKind) {
        if self.data.contains_key(&kind) {
            return;
        }
        self.fetch(kind);
    }

    fn fetch(&mut self, kind: EntityKind) {
        self.status = Status::Loading;
        self.set_status_message("Loading ...".to_string());
        let start_time = Instant::now();
        match self.provider.fetch(kind) {
            Ok(records) => {
                self.set_status_message(format!(
                    "Loaded {} {} in {}ms",
                    records.len(),
                    kind.label(),
                    start_time.elapsed().as_millis()
                ));
                self.data.insert(kind, records);
            }
            Err(e) => {
                // Stale-but-available: keep whatever was displayed before.
                error!("Fetching {} failed: {e}", kind.label());
                self.set_status_message(format!("Fetching {} failed!", kind.label()));
            }
        }
        self.status = Status::Ready;
    }

    fn refresh(&mut self) {
        let kinds: Vec<EntityKind> = match pages::table_page(self.page) {
            Some(spec) => vec![spec.kind],
            None if self.page == Page::Dashboard => {
                vec![EntityKind::Recruiters, EntityKind::Performance]
            }
            None => Vec::new(),
        };
        for kind in kinds {
            self.fetch(kind);
        }
        self.clamp_cursor();
    }

    // ------------------------- Table interaction -------------------------- //

    fn visible_row_count(&self) -> usize {
        self.table_context().map(|ctx| ctx.view.rows.len()).unwrap_or(0)
    }

    fn column_count(&self) -> usize {
        pages::table_page(self.page)
            .map(|spec| spec.columns.len())
            .unwrap_or(0)
    }

    fn clamp_cursor(&mut self) {
        let rows = self.visible_row_count();
        self.view.cursor_row = self.view.cursor_row.min(rows.saturating_sub(1));
        let cols = self.column_count();
        self.view.cursor_col = self.view.cursor_col.min(cols.saturating_sub(1));
    }

    fn move_cursor_row(&mut self, delta: i64) {
        let rows = self.visible_row_count();
        if rows == 0 {
            self.view.cursor_row = 0;
            return;
        }
        let next = self.view.cursor_row as i64 + delta;
        self.view.cursor_row = next.clamp(0, rows as i64 - 1) as usize;
    }

    fn move_cursor_col(&mut self, delta: i64) {
        let cols = self.column_count();
        if cols == 0 {
            return;
        }
        let next = self.view.cursor_col as i64 + delta;
        self.view.cursor_col = next.clamp(0, cols as i64 - 1) as usize;
    }

    fn table_page(&mut self, movement: PageMove) {
        let Some(ctx) = self.table_context() else {
            return;
        };
        let total = ctx.view.total_pages;
        let pagination = &mut self.view.table.pagination;
        match movement {
            PageMove::First => pagination.first_page(total),
            PageMove::Prev => pagination.previous_page(total),
            PageMove::Next => pagination.next_page(total),
            PageMove::Last => pagination.last_page(total),
        }
        self.view.cursor_row = 0;
    }

    fn cycle_page_size(&mut self) {
        self.view.table.pagination.cycle_items_per_page();
        self.view.cursor_row = 0;
        let size = self.view.table.pagination.items_per_page;
        self.set_status_message(format!("Showing {size} entries per page"));
    }

    fn toggle_sort(&mut self) {
        let Some(spec) = pages::table_page(self.page) else {
            return;
        };
        let Some(column) = spec.columns.get(self.view.cursor_col) else {
            return;
        };
        if !column.sortable {
            self.set_status_message(format!("Column \"{}\" is not sortable", column.label));
            return;
        }
        self.view.table.toggle_sort(column.key);
        self.set_status_message(format!("Sorted by {}", column.label));
    }

    fn cycle_prefilter(&mut self, idx: usize) {
        let Some(spec) = pages::table_page(self.page) else {
            return;
        };
        let Some(key) = spec.prefilters.get(idx).copied() else {
            return;
        };
        let values = self.prefilter_values(spec.kind, key);
        let current = &self.view.prefilters[idx];
        let next = match current {
            None => values.first().cloned(),
            Some(v) => {
                let pos = values.iter().position(|x| x == v);
                match pos {
                    Some(p) if p + 1 < values.len() => Some(values[p + 1].clone()),
                    _ => None,
                }
            }
        };
        self.view.prefilters[idx] = next.clone();
        // The upstream count changed; back to the first page.
        self.view.table.pagination.reset();
        self.view.cursor_row = 0;
        match next {
            Some(v) => self.set_status_message(format!("{key}: {v}")),
            None => self.set_status_message(format!("{key}: all")),
        }
    }

    fn clear_filters(&mut self) {
        self.view.composer.clear_all();
        self.view.table.pagination.reset();
        self.view.cursor_row = 0;
        self.set_status_message("Cleared all filters");
    }

    // -------------------------- Record actions --------------------------- //

    fn open_record(&mut self) {
        if let Some(record) = self.selected_record() {
            self.mutator.view(&record);
            self.record_detail = Some(record);
            self.previous_modus = self.modus;
            self.modus = Modus::Record;
        }
    }

    fn close_record(&mut self) {
        self.record_detail = None;
        self.previous_modus = Modus::Record;
        self.modus = Modus::Page;
    }

    fn edit_record(&mut self) {
        if let Some(record) = self.selected_record() {
            self.mutator.edit(&record);
            self.set_status_message("Edit requested");
        }
    }

    fn delete_record(&mut self) {
        if let Some(record) = self.selected_record() {
            self.mutator.delete(&record);
            self.set_status_message("Delete requested");
        }
    }

    // ----------------------------- Clipboard ----------------------------- //

    fn wrap_cell_content(c: &str) -> String {
        let needs_escaping = c.contains('"');
        let needs_wrapping = c.chars().any(|c| c == ' ' || c == '\t' || c == ',');
        let mut out = String::from(c);

        if needs_escaping {
            out = out.replace('"', "\"\"");
        }
        if needs_wrapping {
            out = format!("\"{out}\"");
        }
        out
    }

    fn copy_to_clipboard(&mut self, content: String) -> bool {
        match self.clipboard.as_mut() {
            Some(clipboard) => match clipboard.set_text(content) {
                Ok(_) => {
                    self.set_status_message("Copied to clipboard");
                    true
                }
                Err(e) => {
                    debug!("Error copying to clipboard: {e:?}");
                    self.set_status_message("Copying to clipboard failed!");
                    false
                }
            },
            None => {
                self.set_status_message("No clipboard available!");
                false
            }
        }
    }

    /// CSV snapshot of the active table: header plus every matched row in
    /// the current sort order, ignoring pagination.
    pub fn csv_snapshot(&self) -> Option<String> {
        let ctx = self.table_context()?;
        let header = ctx
            .spec
            .columns
            .iter()
            .map(|c| c.label.to_string())
            .collect::<Vec<String>>()
            .join(",");

        let rows = engine::search_rows(&ctx.records, &self.view.composer.search_text);
        let rows = engine::filter_rows(&ctx.records, rows, self.view.composer.filters());
        let rows = engine::sort_rows(&ctx.records, rows, self.view.table.sort.as_ref());

        let mut lines = vec![header];
        for idx in rows {
            let record = &ctx.records[idx];
            let line = ctx
                .spec
                .columns
                .iter()
                .map(|c| {
                    let cell = record.get(c.key).map(|v| v.display()).unwrap_or_default();
                    Self::wrap_cell_content(&cell)
                })
                .collect::<Vec<String>>()
                .join(",");
            lines.push(line);
        }
        Some(lines.join("\n"))
    }

    fn export_csv(&mut self) {
        let Some(csv) = self.csv_snapshot() else {
            self.set_status_message("No table on this page");
            return;
        };
        let rows = csv.lines().count() - 1;
        if self.copy_to_clipboard(csv) {
            self.set_status_message(format!("Exported {rows} rows as CSV"));
        }
    }

    fn copy_row(&mut self) {
        let record = match (&self.record_detail, self.selected_record()) {
            (Some(r), _) => Some(r.clone()),
            (None, r) => r,
        };
        if let Some(record) = record {
            let content = record
                .fields()
                .map(|(_, v)| Self::wrap_cell_content(&v.display()))
                .collect::<Vec<String>>()
                .join(",");
            self.copy_to_clipboard(content);
        }
    }

    fn copy_cell(&mut self) {
        let Some(spec) = pages::table_page(self.page) else {
            return;
        };
        let Some(column) = spec.columns.get(self.view.cursor_col) else {
            return;
        };
        if let Some(record) = self.selected_record() {
            let cell = record
                .get(column.key)
                .map(|v| v.display())
                .unwrap_or_default();
            trace!("Cell content: {cell}");
            self.copy_to_clipboard(cell);
        }
    }

    // ------------------------- Popup and cmdline -------------------------- //

    fn show_help(&mut self) {
        self.previous_modus = self.modus;
        self.modus = Modus::Popup;
        self.popup_message = HELP_TEXT.to_string();
        self.show_popup = true;
    }

    fn close_popup(&mut self) {
        self.modus = self.previous_modus;
        self.previous_modus = Modus::Popup;
        self.show_popup = false;
    }

    fn enter_cmd_mode(&mut self, mode: CmdMode) {
        if pages::table_page(self.page).is_none() {
            self.set_status_message("No table on this page");
            return;
        }
        trace!("Entering command mode {mode:?}");
        self.previous_modus = self.modus;
        self.modus = Modus::CmdInput;
        self.cmd_mode = Some(mode);
        self.active_cmdinput = true;
        self.input.clear();
        self.last_input = self.input.snapshot();
    }

    fn raw_input(&mut self, key: KeyEvent) {
        self.last_input = self.input.read(key);
        if self.last_input.finished {
            self.handle_cmd_input();
        }
    }

    fn handle_cmd_input(&mut self) {
        self.active_cmdinput = false;
        self.modus = self.previous_modus;
        self.previous_modus = Modus::CmdInput;

        let input = self.last_input.clone();
        let mode = self.cmd_mode.take();
        if input.canceled {
            self.set_status_message("Canceled");
            return;
        }

        match mode {
            Some(CmdMode::Search) => {
                self.view.composer.set_search(input.input.trim());
                // A changed search invalidates the current page.
                self.view.table.pagination.reset();
                self.view.cursor_row = 0;
                if self.view.composer.search_text.is_empty() {
                    self.set_status_message("Cleared search");
                } else {
                    let matched = self
                        .table_context()
                        .map(|ctx| ctx.view.total_matched)
                        .unwrap_or(0);
                    self.set_status_message(format!("Found {matched} results"));
                }
            }
            Some(CmdMode::Filter) => match parse_filter(input.input.trim()) {
                Ok((key, value)) => {
                    self.view.composer.set_filter(&key, value);
                    self.view.table.pagination.reset();
                    self.view.cursor_row = 0;
                    self.set_status_message(format!(
                        "{} active filters",
                        self.view.composer.active_filter_count()
                    ));
                }
                Err(e) => {
                    self.set_status_message(format!("{e}"));
                }
            },
            None => {
                debug!("Cmd input finished without a mode");
            }
        }
    }
}

enum PageMove {
    First,
    Prev,
    Next,
    Last,
}

/// Parse command-line filter syntax: `key=value` for a substring filter,
/// `key=` to drop the key, and `key=from..to` (dates, either side
/// optional) for a date range.
fn parse_filter(input: &str) -> Result<(String, FilterValue), AppError> {
    let Some((key, value)) = input.split_once('=') else {
        return Err(AppError::InvalidFilter(format!(
            "expected key=value, got \"{input}\""
        )));
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(AppError::InvalidFilter("empty filter key".to_string()));
    }
    let value = value.trim();
    if let Some((from, to)) = value.split_once("..") {
        let parse_bound = |s: &str| -> Result<Option<chrono::NaiveDate>, AppError> {
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<chrono::NaiveDate>()
                .map(Some)
                .map_err(|_| AppError::InvalidFilter(format!("bad date \"{s}\"")))
        };
        let range = FilterValue::DateRange {
            from: parse_bound(from)?,
            to: parse_bound(to)?,
        };
        return Ok((key.to_string(), range));
    }
    Ok((key.to_string(), FilterValue::Text(value.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{FailingProvider, SampleDataProvider};
    use crate::engine::LoggingMutator;
    use ratatui::crossterm::event::KeyCode;
    use std::time::Duration;

    fn model() -> Model {
        let config = AppConfig::default()
            .fetch_delay_ms(0)
            .start_page(Page::Recruiters);
        Model::new(
            config,
            Box::new(SampleDataProvider::new(Duration::ZERO)),
            Box::new(LoggingMutator),
        )
    }

    fn type_line(m: &mut Model, line: &str) {
        for c in line.chars() {
            m.update(Message::RawKey(KeyEvent::from(KeyCode::Char(c)))).unwrap();
        }
        m.update(Message::RawKey(KeyEvent::from(KeyCode::Enter))).unwrap();
    }

    #[test]
    fn start_page_loads_records() {
        let m = model();
        assert_eq!(m.page(), Page::Recruiters);
        assert!(m.has_loaded(EntityKind::Recruiters));
        let ctx = m.table_context().unwrap();
        assert_eq!(ctx.view.total_records, 8);
        assert_eq!(ctx.view.total_matched, 8);
    }

    #[test]
    fn search_narrows_and_resets_page(){
        let mut m = model();
        m.update(Message::TablePageNext).unwrap();
        m.update(Message::EnterSearch).unwrap();
        assert!(m.raw_keyevents());
        type_line(&mut m, "mumbai");
        assert!(!m.raw_keyevents());
        let ctx = m.table_context().unwrap();
        assert_eq!(ctx.view.current_page, 1);
        assert_eq!(ctx.view.total_matched, 1);
        let name = ctx.records[ctx.view.rows[0]].get("name").unwrap().display();
        assert_eq!(name, "Priya Sharma");
    }

    #[test]
    fn filter_input_applies_and_counts() {
        let mut m = model();
        m.update(Message::EnterFilter).unwrap();
        type_line(&mut m, "department=tech");
        let ctx = m.table_context().unwrap();
        // Technology and IT Services don't both contain "tech"; substring
        // match keeps Technology rows only.
        assert_eq!(ctx.view.total_matched, 2);
        assert_eq!(m.page_view().composer.active_filter_count(), 1);

        // Removing via empty value leaves no filters.
        m.update(Message::EnterFilter).unwrap();
        type_line(&mut m, "department=");
        assert_eq!(m.page_view().composer.active_filter_count(), 0);
    }

    #[test]
    fn date_range_filter_from_cmdline() {
        let mut m = model();
        m.update(Message::EnterFilter).unwrap();
        type_line(&mut m, "joinDate=2023-01-01..2023-12-31");
        let ctx = m.table_context().unwrap();
        // Recruiters who joined in 2023: Priya, Anita, Deepika, Sneha.
        assert_eq!(ctx.view.total_matched, 4);
    }

    #[test]
    fn canceled_input_changes_nothing() {
        let mut m = model();
        m.update(Message::EnterSearch).unwrap();
        m.update(Message::RawKey(KeyEvent::from(KeyCode::Char('x')))).unwrap();
        m.update(Message::RawKey(KeyEvent::from(KeyCode::Esc))).unwrap();
        assert_eq!(m.page_view().composer.search_text, "");
        assert_eq!(m.table_context().unwrap().view.total_matched, 8);
    }

    #[test]
    fn page_switch_resets_view_state() {
        let mut m = model();
        m.update(Message::EnterSearch).unwrap();
        type_line(&mut m, "priya");
        assert_eq!(m.table_context().unwrap().view.total_matched, 1);

        m.update(Message::SwitchPage(Page::Clients)).unwrap();
        m.update(Message::SwitchPage(Page::Recruiters)).unwrap();
        assert_eq!(m.page_view().composer.search_text, "");
        assert_eq!(m.table_context().unwrap().view.total_matched, 8);
    }

    #[test]
    fn failed_fetch_keeps_prior_records() {
        let mut m = model();
        assert_eq!(m.records(EntityKind::Recruiters).len(), 8);
        // Swap in a provider that always fails; refresh must not clear.
        m.provider = Box::new(FailingProvider);
        m.update(Message::Refresh).unwrap();
        assert_eq!(m.records(EntityKind::Recruiters).len(), 8);
        assert!(m.status_message().contains("failed"));
    }

    #[test]
    fn failed_initial_fetch_shows_empty_not_crash() {
        let config = AppConfig::default().start_page(Page::Clients);
        let m = Model::new(config, Box::new(FailingProvider), Box::new(LoggingMutator));
        assert!(!m.has_loaded(EntityKind::Clients));
        let ctx = m.table_context().unwrap();
        assert_eq!(ctx.view.total_matched, 0);
        assert_eq!(ctx.view.total_pages, 1);
    }

    #[test]
    fn sort_via_cursor_column() {
        let mut m = model();
        // Column 3 is "hired".
        m.update(Message::MoveRight).unwrap();
        m.update(Message::MoveRight).unwrap();
        m.update(Message::MoveRight).unwrap();
        m.update(Message::ToggleSort).unwrap();
        let ctx = m.table_context().unwrap();
        let first = ctx.records[ctx.view.rows[0]].get("name").unwrap().display();
        assert_eq!(first, "Arjun Nair"); // 12 hired, the minimum

        m.update(Message::ToggleSort).unwrap();
        let ctx = m.table_context().unwrap();
        let first = ctx.records[ctx.view.rows[0]].get("name").unwrap().display();
        assert_eq!(first, "Karthik Krishnan"); // 30 hired, the maximum
    }

    #[test]
    fn unsortable_column_is_refused() {
        let mut m = model();
        // Last column ("trend") is not sortable.
        for _ in 0..10 {
            m.update(Message::MoveRight).unwrap();
        }
        m.update(Message::ToggleSort).unwrap();
        assert!(m.page_view().table.sort.is_none());
    }

    #[test]
    fn prefilter_cycles_and_resets_page() {
        let mut m = model();
        m.update(Message::CyclePrefilter(0)).unwrap();
        // First distinct department is "Technology".
        assert_eq!(
            m.page_view().prefilters[0].as_deref(),
            Some("Technology")
        );
        let ctx = m.table_context().unwrap();
        assert_eq!(ctx.view.total_matched, 2);
        assert_eq!(ctx.view.current_page, 1);
    }

    #[test]
    fn cycle_page_size_resets_page() {
        let mut m = model();
        m.update(Message::CyclePageSize).unwrap();
        // Default 10 cycles to 20.
        assert_eq!(m.page_view().table.pagination.items_per_page, 20);
        assert_eq!(m.page_view().table.pagination.current_page, 1);
    }

    #[test]
    fn open_and_close_record_detail() {
        let mut m = model();
        m.update(Message::OpenRecord).unwrap();
        assert!(m.record_detail().is_some());
        m.update(Message::Exit).unwrap();
        assert!(m.record_detail().is_none());
    }

    #[test]
    fn help_popup_toggles() {
        let mut m = model();
        m.update(Message::Help).unwrap();
        assert!(m.show_popup());
        m.update(Message::Exit).unwrap();
        assert!(!m.show_popup());
    }

    #[test]
    fn csv_cell_wrapping() {
        assert_eq!(Model::wrap_cell_content("plain"), "plain");
        assert_eq!(
            Model::wrap_cell_content("Mumbai, Maharashtra"),
            "\"Mumbai, Maharashtra\""
        );
        assert_eq!(Model::wrap_cell_content("say \"hi\""), "say \"\"hi\"\"");
    }

    #[test]
    fn parse_filter_syntax() {
        assert!(matches!(
            parse_filter("status=active"),
            Ok((key, FilterValue::Text(v))) if key == "status" && v == "active"
        ));
        assert!(matches!(
            parse_filter("joinDate=2023-01-01..").unwrap().1,
            FilterValue::DateRange { from: Some(_), to: None }
        ));
        assert!(parse_filter("no equals sign").is_err());
        assert!(parse_filter("=value").is_err());
        assert!(parse_filter("joinDate=oops..").is_err());
    }

    #[test]
    fn csv_snapshot_covers_all_matched_rows() {
        let mut m = model();
        m.update(Message::EnterFilter).unwrap();
        type_line(&mut m, "department=tech");
        let csv = m.csv_snapshot().unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        // Header plus the two Technology recruiters.
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Recruiter Name,Department"));
        assert!(lines[1].contains("Priya Sharma"));
        assert!(lines[2].contains("Karthik Krishnan"));
        // Fields with commas are quoted.
        assert!(lines[1].contains("\"") || !lines[1].contains(", "));
    }

    #[test]
    fn quit_sets_status() {
        let mut m = model();
        m.update(Message::Quit).unwrap();
        assert_eq!(m.status, Status::Quitting);
    }
}
