use std::collections::BTreeMap;

use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::record::{Record, Value, compare_values};

/// The selectable page sizes. No free-text entry exists, so no other
/// value can ever reach the pagination state.
pub const PAGE_SIZES: [usize; 4] = [5, 10, 20, 50];

/// Maximum number of page-number buttons shown at once.
const PAGE_BUTTON_SPAN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
}

/// One active filter constraint. Text filters are case-insensitive
/// substring matches; a date range keeps records whose date value under
/// the key falls within the inclusive bounds.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    DateRange {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
}

impl FilterValue {
    fn is_empty(&self) -> bool {
        match self {
            FilterValue::Text(t) => t.is_empty(),
            FilterValue::DateRange { from, to } => from.is_none() && to.is_none(),
        }
    }

    fn matches(&self, value: Option<&Value>) -> bool {
        // A filter key absent from the record is a mismatch.
        let Some(value) = value else {
            return false;
        };
        match self {
            FilterValue::Text(t) => value.folded().contains(&t.to_lowercase()),
            FilterValue::DateRange { from, to } => match value.as_date() {
                Some(d) => from.is_none_or(|f| d >= f) && to.is_none_or(|t| d <= t),
                None => false,
            },
        }
    }
}

impl std::fmt::Display for FilterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterValue::Text(t) => write!(f, "{t}"),
            FilterValue::DateRange { from, to } => {
                let fmt_bound = |b: &Option<NaiveDate>| {
                    b.map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_default()
                };
                write!(f, "{}..{}", fmt_bound(from), fmt_bound(to))
            }
        }
    }
}

/// Active substring-match constraints keyed by field name.
pub type FilterSet = BTreeMap<String, FilterValue>;

/// Search text and filter set with their derived state, owned by each
/// table page. Removing one filter key leaves the others untouched;
/// clearing all empties the set including any date-range entry.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    pub search_text: String,
    filters: FilterSet,
}

impl Composer {
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        trace!("Search text set to {:?}", self.search_text);
    }

    /// Insert or replace one filter. An empty value removes the key
    /// instead, so the active count only ever counts real constraints.
    pub fn set_filter(&mut self, key: &str, value: FilterValue) {
        if value.is_empty() {
            self.filters.remove(key);
        } else {
            self.filters.insert(key.to_string(), value);
        }
        debug!("Filters now: {:?}", self.filters);
    }

    pub fn remove_filter(&mut self, key: &str) {
        self.filters.remove(key);
    }

    pub fn clear_all(&mut self) {
        self.filters.clear();
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// Number of keys currently present; any non-empty value counts once.
    pub fn active_filter_count(&self) -> usize {
        self.filters.len()
    }
}

/// 1-based pagination state. `current_page` is kept inside
/// `[1, max(1, total_pages)]` by every mutator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pagination {
    pub current_page: usize,
    pub items_per_page: usize,
}

impl Pagination {
    pub fn new(items_per_page: usize) -> Self {
        let items_per_page = if PAGE_SIZES.contains(&items_per_page) {
            items_per_page
        } else {
            10
        };
        Pagination {
            current_page: 1,
            items_per_page,
        }
    }

    /// Total pages for `count` matched records; an empty result still has
    /// one (empty) page.
    pub fn total_pages(&self, count: usize) -> usize {
        std::cmp::max(1, count.div_ceil(self.items_per_page))
    }

    /// Clamp an arbitrary requested page into the valid range.
    pub fn go_to_page(&mut self, page: i64, total_pages: usize) {
        let page = page.clamp(1, total_pages.max(1) as i64);
        self.current_page = page as usize;
    }

    pub fn first_page(&mut self, total_pages: usize) {
        self.go_to_page(1, total_pages);
    }

    pub fn previous_page(&mut self, total_pages: usize) {
        self.go_to_page(self.current_page as i64 - 1, total_pages);
    }

    pub fn next_page(&mut self, total_pages: usize) {
        self.go_to_page(self.current_page as i64 + 1, total_pages);
    }

    pub fn last_page(&mut self, total_pages: usize) {
        self.go_to_page(total_pages as i64, total_pages);
    }

    /// Switch to a new page size from the enumerated set. Any change
    /// resets to page 1; the upstream count changed meaning.
    pub fn set_items_per_page(&mut self, size: usize) -> bool {
        if !PAGE_SIZES.contains(&size) {
            return false;
        }
        self.items_per_page = size;
        self.current_page = 1;
        true
    }

    pub fn cycle_items_per_page(&mut self) {
        let pos = PAGE_SIZES
            .iter()
            .position(|&s| s == self.items_per_page)
            .unwrap_or(0);
        let next = PAGE_SIZES[(pos + 1) % PAGE_SIZES.len()];
        self.set_items_per_page(next);
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }
}

/// Sort and pagination state for one table view. Search and filters live
/// in the [`Composer`]; together they are the whole per-view UI state.
#[derive(Debug, Clone)]
pub struct TableState {
    pub sort: Option<SortSpec>,
    pub pagination: Pagination,
}

impl TableState {
    pub fn new(page_size: usize) -> Self {
        TableState {
            sort: None,
            pagination: Pagination::new(page_size),
        }
    }

    /// Header-click cycle: unsorted-by-key -> ascending -> descending.
    /// There is no third click back to unsorted.
    pub fn toggle_sort(&mut self, key: &str) {
        let direction = match &self.sort {
            Some(spec) if spec.key == key && spec.direction == SortDirection::Ascending => {
                SortDirection::Descending
            }
            _ => SortDirection::Ascending,
        };
        self.sort = Some(SortSpec {
            key: key.to_string(),
            direction,
        });
        trace!("Sort set to {:?}", self.sort);
    }
}

/// Result of running the search -> filter -> sort -> page pipeline:
/// the visible slice as indices into the input record list, plus the
/// summary counts the pagination footer renders.
#[derive(Debug, Clone, PartialEq)]
pub struct TableViewData {
    pub rows: Vec<usize>,
    pub total_matched: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub start_item: usize,
    pub end_item: usize,
    pub total_records: usize,
}

/// Search stage: keep records where any field contains the search text,
/// case-insensitive. Runs over the record list in parallel; row order is
/// preserved. Empty text keeps everything.
pub fn search_rows(records: &[Record], search_text: &str) -> Vec<usize> {
    if search_text.is_empty() {
        return (0..records.len()).collect();
    }
    let needle = search_text.to_lowercase();
    records
        .par_iter()
        .enumerate()
        .filter(|(_, r)| r.matches_search(&needle))
        .map(|(idx, _)| idx)
        .collect()
}

/// Filter stage: conjunction of all active constraints. A key missing
/// from a record excludes that record.
pub fn filter_rows(records: &[Record], rows: Vec<usize>, filters: &FilterSet) -> Vec<usize> {
    if filters.is_empty() {
        return rows;
    }
    rows.into_iter()
        .filter(|&idx| {
            filters
                .iter()
                .all(|(key, fv)| fv.matches(records[idx].get(key)))
        })
        .collect()
}

/// Sort stage: stable sort of the filtered rows by the sort key's value.
/// Without an active sort the filter-stage order is preserved.
pub fn sort_rows(records: &[Record], mut rows: Vec<usize>, sort: Option<&SortSpec>) -> Vec<usize> {
    let Some(spec) = sort else {
        return rows;
    };
    rows.sort_by(|&a, &b| {
        let va = records[a].get(&spec.key);
        let vb = records[b].get(&spec.key);
        // Missing values stay last in both directions; the direction only
        // flips the order of comparable pairs.
        match (va, vb) {
            (None, _) | (_, None) => compare_values(va, vb),
            _ => {
                let ord = compare_values(va, vb);
                match spec.direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            }
        }
    });
    rows
}

/// Page stage: slice `[(p-1)*n, p*n)` out of the sorted rows.
pub fn page_rows(rows: &[usize], pagination: &Pagination) -> Vec<usize> {
    let start = (pagination.current_page - 1) * pagination.items_per_page;
    let end = std::cmp::min(start + pagination.items_per_page, rows.len());
    if start >= rows.len() {
        return Vec::new();
    }
    rows[start..end].to_vec()
}

/// Run the full pipeline for one view. The passed state is not mutated;
/// an out-of-range `current_page` is clamped for the slice and reported
/// back through `current_page`.
pub fn apply(records: &[Record], composer: &Composer, state: &TableState) -> TableViewData {
    let rows = search_rows(records, &composer.search_text);
    let rows = filter_rows(records, rows, composer.filters());
    let rows = sort_rows(records, rows, state.sort.as_ref());

    let total_matched = rows.len();
    let total_pages = state.pagination.total_pages(total_matched);
    let mut pagination = state.pagination;
    pagination.go_to_page(pagination.current_page as i64, total_pages);

    let page = page_rows(&rows, &pagination);
    let start_item = if total_matched == 0 {
        0
    } else {
        (pagination.current_page - 1) * pagination.items_per_page + 1
    };
    let end_item = std::cmp::min(
        pagination.current_page * pagination.items_per_page,
        total_matched,
    );

    trace!(
        "Pipeline: {} records -> {} matched, page {}/{}",
        records.len(),
        total_matched,
        pagination.current_page,
        total_pages
    );

    TableViewData {
        rows: page,
        total_matched,
        total_pages,
        current_page: pagination.current_page,
        start_item,
        end_item,
        total_records: records.len(),
    }
}

/// The page-number button set: at most five numbers, windowed around the
/// current page, anchored at the ends.
pub fn page_window(current_page: usize, total_pages: usize) -> Vec<usize> {
    if total_pages <= PAGE_BUTTON_SPAN {
        return (1..=total_pages).collect();
    }
    if current_page <= 3 {
        (1..=PAGE_BUTTON_SPAN).collect()
    } else if current_page >= total_pages - 2 {
        (total_pages - PAGE_BUTTON_SPAN + 1..=total_pages).collect()
    } else {
        (current_page - 2..=current_page + 2).collect()
    }
}

/// Injected command interface for row-level side actions. The engine
/// never mutates its input list; applying an edit or delete is the
/// caller's concern.
pub trait RecordMutator {
    fn view(&self, record: &Record);
    fn edit(&self, record: &Record);
    fn delete(&self, record: &Record);
}

/// Default mutator: log the request and do nothing else.
pub struct LoggingMutator;

impl RecordMutator for LoggingMutator {
    fn view(&self, record: &Record) {
        debug!("View record: {}", record_label(record));
    }

    fn edit(&self, record: &Record) {
        debug!("Edit record: {}", record_label(record));
    }

    fn delete(&self, record: &Record) {
        debug!("Delete record: {}", record_label(record));
    }
}

fn record_label(record: &Record) -> String {
    record
        .get("name")
        .or_else(|| record.get("title"))
        .map(|v| v.display())
        .unwrap_or_else(|| "<unnamed>".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Vec<Record> {
        vec![
            Record::new().with("name", "Bob").with("age", 30),
            Record::new().with("name", "Amy").with("age", 30),
            Record::new().with("name", "Cid").with("age", 20),
        ]
    }

    fn numbered(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| Record::new().with("id", i as i64).with("name", format!("rec{i}")))
            .collect()
    }

    fn text(t: &str) -> FilterValue {
        FilterValue::Text(t.to_string())
    }

    #[test]
    fn empty_search_keeps_everything() {
        let records = people();
        assert_eq!(search_rows(&records, ""), vec![0, 1, 2]);
    }

    #[test]
    fn search_returns_subset_in_order() {
        let records = people();
        let hits = search_rows(&records, "30");
        assert_eq!(hits, vec![0, 1]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let records = vec![
            Record::new().with("location", "Mumbai, Maharashtra"),
            Record::new().with("location", "New Delhi"),
        ];
        assert_eq!(search_rows(&records, "mumbai"), vec![0]);
        assert_eq!(search_rows(&records, "MUMBAI"), vec![0]);
    }

    #[test]
    fn empty_filter_set_keeps_everything() {
        let records = people();
        let rows = filter_rows(&records, vec![0, 1, 2], &FilterSet::new());
        assert_eq!(rows, vec![0, 1, 2]);
    }

    #[test]
    fn filters_compose_with_and() {
        let records = vec![
            Record::new().with("status", "active").with("dept", "Tech"),
            Record::new().with("status", "active").with("dept", "Finance"),
            Record::new().with("status", "pending").with("dept", "Tech"),
        ];
        let mut filters = FilterSet::new();
        filters.insert("status".into(), text("active"));
        filters.insert("dept".into(), text("tech"));
        let rows = filter_rows(&records, vec![0, 1, 2], &filters);
        assert_eq!(rows, vec![0]);
    }

    #[test]
    fn missing_filter_key_excludes_record() {
        let records = vec![
            Record::new().with("status", "active"),
            Record::new().with("name", "no status field"),
        ];
        let mut filters = FilterSet::new();
        filters.insert("status".into(), text("active"));
        let rows = filter_rows(&records, vec![0, 1], &filters);
        assert_eq!(rows, vec![0]);
    }

    #[test]
    fn date_range_filter_inclusive_bounds() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        let records = vec![
            Record::new().with("joined", d(2023, 1, 15)),
            Record::new().with("joined", d(2022, 11, 8)),
            Record::new().with("joined", "not a date"),
        ];
        let mut filters = FilterSet::new();
        filters.insert(
            "joined".into(),
            FilterValue::DateRange {
                from: Some(d(2023, 1, 1)),
                to: Some(d(2023, 12, 31)),
            },
        );
        assert_eq!(filter_rows(&records, vec![0, 1, 2], &filters), vec![0]);

        // Open lower bound
        filters.insert(
            "joined".into(),
            FilterValue::DateRange {
                from: None,
                to: Some(d(2023, 1, 15)),
            },
        );
        assert_eq!(filter_rows(&records, vec![0, 1, 2], &filters), vec![0, 1]);
    }

    #[test]
    fn sort_ascending_by_number_is_stable() {
        let records = people();
        let sort = SortSpec {
            key: "age".into(),
            direction: SortDirection::Ascending,
        };
        let rows = sort_rows(&records, vec![0, 1, 2], Some(&sort));
        // Cid(20) first, then Bob before Amy preserved from input order.
        assert_eq!(rows, vec![2, 0, 1]);
    }

    #[test]
    fn sort_is_idempotent() {
        let records = people();
        let sort = SortSpec {
            key: "age".into(),
            direction: SortDirection::Descending,
        };
        let once = sort_rows(&records, vec![0, 1, 2], Some(&sort));
        let twice = sort_rows(&records, once.clone(), Some(&sort));
        assert_eq!(once, twice);
    }

    #[test]
    fn no_sort_preserves_filter_order() {
        let records = people();
        let rows = sort_rows(&records, vec![2, 0, 1], None);
        assert_eq!(rows, vec![2, 0, 1]);
    }

    #[test]
    fn missing_sort_key_orders_last_in_both_directions() {
        let records = vec![
            Record::new().with("name", "a"),
            Record::new().with("name", "b").with("age", 40),
            Record::new().with("name", "c").with("age", 10),
        ];
        let asc = SortSpec {
            key: "age".into(),
            direction: SortDirection::Ascending,
        };
        assert_eq!(sort_rows(&records, vec![0, 1, 2], Some(&asc)), vec![2, 1, 0]);

        let desc = SortSpec {
            key: "age".into(),
            direction: SortDirection::Descending,
        };
        assert_eq!(
            sort_rows(&records, vec![0, 1, 2], Some(&desc)),
            vec![1, 2, 0]
        );
    }

    #[test]
    fn pagination_is_a_total_partition() {
        let pagination = Pagination::new(10);
        let all: Vec<usize> = (0..23).collect();
        let total_pages = pagination.total_pages(23);
        assert_eq!(total_pages, 3);

        let mut seen = Vec::new();
        for page in 1..=total_pages {
            let mut p = pagination;
            p.go_to_page(page as i64, total_pages);
            seen.extend(page_rows(&all, &p));
        }
        assert_eq!(seen, all);
    }

    #[test]
    fn scenario_23_records_page_3_has_3_rows() {
        let records = numbered(23);
        let composer = Composer::default();
        let mut state = TableState::new(10);
        state.pagination.go_to_page(3, 3);
        let view = apply(&records, &composer, &state);
        assert_eq!(view.total_pages, 3);
        assert_eq!(view.rows.len(), 3);
        assert_eq!(view.start_item, 21);
        assert_eq!(view.end_item, 23);
    }

    #[test]
    fn zero_matches_is_one_empty_page() {
        let records = people();
        let mut composer = Composer::default();
        composer.set_search("no such text");
        let state = TableState::new(10);
        let view = apply(&records, &composer, &state);
        assert_eq!(view.total_matched, 0);
        assert_eq!(view.total_pages, 1);
        assert!(view.rows.is_empty());
        assert_eq!(view.start_item, 0);
        assert_eq!(view.end_item, 0);
    }

    #[test]
    fn go_to_page_clamps_out_of_range_input() {
        let mut p = Pagination::new(10);
        p.go_to_page(-5, 3);
        assert_eq!(p.current_page, 1);
        p.go_to_page(999, 3);
        assert_eq!(p.current_page, 3);
        p.go_to_page(2, 3);
        assert_eq!(p.current_page, 2);
    }

    #[test]
    fn navigation_delegates_to_go_to_page() {
        let mut p = Pagination::new(5);
        p.next_page(4);
        p.next_page(4);
        assert_eq!(p.current_page, 3);
        p.previous_page(4);
        assert_eq!(p.current_page, 2);
        p.last_page(4);
        assert_eq!(p.current_page, 4);
        p.next_page(4);
        assert_eq!(p.current_page, 4);
        p.first_page(4);
        assert_eq!(p.current_page, 1);
        p.previous_page(4);
        assert_eq!(p.current_page, 1);
    }

    #[test]
    fn items_per_page_restricted_to_enumerated_set() {
        let mut p = Pagination::new(10);
        assert!(!p.set_items_per_page(7));
        assert_eq!(p.items_per_page, 10);
        assert!(p.set_items_per_page(50));
        assert_eq!(p.items_per_page, 50);
    }

    #[test]
    fn changing_items_per_page_resets_to_page_1() {
        let mut p = Pagination::new(10);
        p.go_to_page(3, 5);
        assert_eq!(p.current_page, 3);
        p.set_items_per_page(20);
        assert_eq!(p.current_page, 1);
    }

    #[test]
    fn cycle_walks_the_enumerated_set() {
        let mut p = Pagination::new(5);
        p.cycle_items_per_page();
        assert_eq!(p.items_per_page, 10);
        p.cycle_items_per_page();
        assert_eq!(p.items_per_page, 20);
        p.cycle_items_per_page();
        assert_eq!(p.items_per_page, 50);
        p.cycle_items_per_page();
        assert_eq!(p.items_per_page, 5);
    }

    #[test]
    fn stale_page_is_clamped_by_apply() {
        let records = numbered(23);
        let composer = Composer::default();
        let mut state = TableState::new(10);
        state.pagination.current_page = 3;
        // A filter narrows the set to one page; the view clamps.
        let mut c = composer.clone();
        c.set_search("rec1");
        let view = apply(&records, &c, &state);
        // rec1, rec10..rec19 -> 11 matches, 2 pages
        assert_eq!(view.total_matched, 11);
        assert_eq!(view.total_pages, 2);
        assert_eq!(view.current_page, 2);
        assert_eq!(view.rows.len(), 1);
    }

    #[test]
    fn sort_toggle_cycles_asc_desc_only() {
        let mut state = TableState::new(10);
        state.toggle_sort("age");
        assert_eq!(
            state.sort,
            Some(SortSpec {
                key: "age".into(),
                direction: SortDirection::Ascending
            })
        );
        state.toggle_sort("age");
        assert_eq!(
            state.sort.as_ref().unwrap().direction,
            SortDirection::Descending
        );
        // Third toggle goes back to ascending, never to unsorted.
        state.toggle_sort("age");
        assert_eq!(
            state.sort.as_ref().unwrap().direction,
            SortDirection::Ascending
        );
        // A different key starts ascending again.
        state.toggle_sort("name");
        assert_eq!(
            state.sort,
            Some(SortSpec {
                key: "name".into(),
                direction: SortDirection::Ascending
            })
        );
    }

    #[test]
    fn page_window_anchoring() {
        assert_eq!(page_window(1, 3), vec![1, 2, 3]);
        assert_eq!(page_window(1, 5), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(2, 10), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(3, 10), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(4, 10), vec![2, 3, 4, 5, 6]);
        assert_eq!(page_window(6, 10), vec![4, 5, 6, 7, 8]);
        assert_eq!(page_window(8, 10), vec![6, 7, 8, 9, 10]);
        assert_eq!(page_window(10, 10), vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn composer_active_count_and_removal() {
        let mut c = Composer::default();
        assert_eq!(c.active_filter_count(), 0);
        c.set_filter("status", text("active"));
        c.set_filter("dept", text("tech"));
        c.set_filter(
            "joined",
            FilterValue::DateRange {
                from: NaiveDate::from_ymd_opt(2024, 1, 1),
                to: None,
            },
        );
        assert_eq!(c.active_filter_count(), 3);

        // Removing one key keeps the others.
        c.remove_filter("dept");
        assert_eq!(c.active_filter_count(), 2);
        assert!(c.filters().contains_key("status"));
        assert!(c.filters().contains_key("joined"));

        // An empty value never counts.
        c.set_filter("status", text(""));
        assert_eq!(c.active_filter_count(), 1);

        // Clear-all resets the set including the date range.
        c.clear_all();
        assert_eq!(c.active_filter_count(), 0);
        assert!(c.filters().is_empty());
    }

    #[test]
    fn full_pipeline_search_filter_sort_page() {
        let records = vec![
            Record::new().with("name", "Priya").with("dept", "Tech").with("hired", 25),
            Record::new().with("name", "Rahul").with("dept", "Finance").with("hired", 18),
            Record::new().with("name", "Anita").with("dept", "Tech").with("hired", 22),
            Record::new().with("name", "Karthik").with("dept", "Tech").with("hired", 30),
        ];
        let mut composer = Composer::default();
        composer.set_filter("dept", text("tech"));
        let mut state = TableState::new(5);
        state.toggle_sort("hired");

        let view = apply(&records, &composer, &state);
        assert_eq!(view.total_matched, 3);
        assert_eq!(view.rows, vec![2, 0, 3]);
        assert_eq!(view.total_records, 4);
    }
}
