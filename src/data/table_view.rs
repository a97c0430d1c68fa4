//! Filtered, sorted and paginated projection of the registry.
//!
//! This is the data side of the table the presentation layer draws. It
//! never mutates the registry; a view is rebuilt from a snapshot whenever
//! the display needs it.

use crate::data::application::Application;
use crate::search_filter::{FilterMode, SearchFilter};
use std::cmp::Ordering;

pub const ROWS_PER_PAGE_OPTIONS: [usize; 3] = [5, 10, 25];
pub const DEFAULT_ROWS_PER_PAGE: usize = 10;

/// Displayed columns of the application table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Type,
    Name,
    Path,
}

impl Column {
    pub const ALL: [Column; 3] = [Column::Type, Column::Name, Column::Path];

    pub fn header(&self) -> &'static str {
        match self {
            Column::Type => "Tipo de despliegue",
            Column::Name => "Aplicación",
            Column::Path => "Path",
        }
    }

    /// Raw field value, used for sorting and export
    pub fn raw<'a>(&self, app: &'a Application) -> &'a str {
        match self {
            Column::Type => &app.type_code,
            Column::Name => &app.name,
            Column::Path => &app.path,
        }
    }

    /// Value as shown in the table
    pub fn display(&self, app: &Application) -> String {
        match self {
            Column::Type => app.type_label().to_string(),
            other => other.raw(app).to_string(),
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "type" | "idtype" => Some(Column::Type),
            "name" => Some(Column::Name),
            "path" => Some(Column::Path),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: Column,
    pub order: SortOrder,
}

/// Everything the table needs besides the data itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOptions {
    pub filter: String,
    pub filter_mode: FilterMode,
    pub sort: Option<SortSpec>,
    /// Zero-based page index
    pub page: usize,
    pub rows_per_page: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            filter: String::new(),
            filter_mode: FilterMode::Contains,
            sort: None,
            page: 0,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
        }
    }
}

/// Snap an arbitrary page size onto one of the offered options
pub fn normalize_rows_per_page(rows: usize) -> usize {
    if ROWS_PER_PAGE_OPTIONS.contains(&rows) {
        rows
    } else {
        DEFAULT_ROWS_PER_PAGE
    }
}

/// One rendered page of the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub rows: Vec<Application>,
    /// Records left after filtering, across all pages
    pub total_records: usize,
    /// Zero-based page actually shown (clamped)
    pub page: usize,
    pub page_count: usize,
    pub rows_per_page: usize,
}

impl PageView {
    /// One-based position of the first row shown, 0 when empty
    pub fn first(&self) -> usize {
        if self.total_records == 0 {
            0
        } else {
            self.page * self.rows_per_page + 1
        }
    }

    /// One-based position of the last row shown, 0 when empty
    pub fn last(&self) -> usize {
        if self.total_records == 0 {
            0
        } else {
            self.first() + self.rows.len() - 1
        }
    }

    pub fn report(&self) -> String {
        format!(
            "Showing {} to {} of {} applications",
            self.first(),
            self.last(),
            self.total_records
        )
    }
}

/// Filtered and sorted records, all pages
pub fn filtered_sorted(records: &[Application], options: &ViewOptions) -> Vec<Application> {
    let mut rows: Vec<Application> =
        SearchFilter::matching_indices(records, &options.filter, options.filter_mode)
            .into_iter()
            .map(|idx| records[idx].clone())
            .collect();

    if let Some(sort) = options.sort {
        // sort_by is stable, ties keep registry order
        rows.sort_by(|a, b| {
            let ordering = compare_values(sort.column.raw(a), sort.column.raw(b));
            match sort.order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });
    }

    rows
}

/// Numeric when both sides parse as numbers, otherwise case-insensitive text
fn compare_values(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

pub fn build_page(records: &[Application], options: &ViewOptions) -> PageView {
    let rows_per_page = normalize_rows_per_page(options.rows_per_page);
    let all_rows = filtered_sorted(records, options);
    let total_records = all_rows.len();
    let page_count = total_records.div_ceil(rows_per_page).max(1);
    let page = options.page.min(page_count - 1);

    let rows = all_rows
        .into_iter()
        .skip(page * rows_per_page)
        .take(rows_per_page)
        .collect();

    PageView {
        rows,
        total_records,
        page,
        page_count,
        rows_per_page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<Application> {
        (0..n)
            .map(|i| {
                Application::new(
                    if i % 2 == 0 { "1" } else { "2" },
                    &format!("app-{:02}", i),
                    &format!("/svc/{}", i),
                )
                .with_id(format!("ID{:03}", i).as_str())
            })
            .collect()
    }

    #[test]
    fn test_empty_page_report() {
        let page = build_page(&[], &ViewOptions::default());
        assert_eq!(page.report(), "Showing 0 to 0 of 0 applications");
        assert_eq!(page.page_count, 1);
    }

    #[test]
    fn test_pagination_and_clamping() {
        let data = records(23);
        let mut options = ViewOptions::default();

        let page = build_page(&data, &options);
        assert_eq!(page.rows.len(), 10);
        assert_eq!(page.report(), "Showing 1 to 10 of 23 applications");
        assert_eq!(page.page_count, 3);

        options.page = 2;
        let page = build_page(&data, &options);
        assert_eq!(page.report(), "Showing 21 to 23 of 23 applications");

        options.page = 99;
        let page = build_page(&data, &options);
        assert_eq!(page.page, 2);
    }

    #[test]
    fn test_rows_per_page_snaps_to_options() {
        assert_eq!(normalize_rows_per_page(25), 25);
        assert_eq!(normalize_rows_per_page(7), DEFAULT_ROWS_PER_PAGE);
    }

    #[test]
    fn test_sort_descending_by_name() {
        let data = records(3);
        let options = ViewOptions {
            sort: Some(SortSpec {
                column: Column::Name,
                order: SortOrder::Descending,
            }),
            ..Default::default()
        };
        let names: Vec<_> = filtered_sorted(&data, &options)
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["app-02", "app-01", "app-00"]);
    }

    #[test]
    fn test_sort_by_type_is_stable() {
        let data = records(4);
        let options = ViewOptions {
            sort: Some(SortSpec {
                column: Column::Type,
                order: SortOrder::Ascending,
            }),
            ..Default::default()
        };
        let names: Vec<_> = filtered_sorted(&data, &options)
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["app-00", "app-02", "app-01", "app-03"]);
    }

    #[test]
    fn test_filter_counts_towards_total() {
        let data = records(12);
        let options = ViewOptions {
            filter: "app-1".to_string(),
            ..Default::default()
        };
        let page = build_page(&data, &options);
        assert_eq!(page.total_records, 2);
        assert_eq!(page.report(), "Showing 1 to 2 of 2 applications");
    }

    #[test]
    fn test_type_column_displays_label() {
        let app = Application::new("1", "Billing", "/svc/billing");
        assert_eq!(Column::Type.display(&app), "WEB");
        assert_eq!(Column::Type.raw(&app), "1");
        assert_eq!(Column::parse("PATH"), Some(Column::Path));
    }
}
