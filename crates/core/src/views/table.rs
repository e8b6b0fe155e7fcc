use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::campaign::Campaign;

/// Column a campaign table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Name,
    Status,
    Impressions,
    Clicks,
    Ctr,
    Spend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Active sort of a table. No sort at all is `None` on the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

/// One displayed row with its absolute position in the sorted table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow<'a> {
    /// 1-based row number across all pages
    pub number: usize,
    pub campaign: &'a Campaign,
}

/// The rows of the current page plus the bounds needed to render the pager.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage<'a> {
    pub rows: Vec<TableRow<'a>>,
    /// 1-based current page
    pub page: usize,
    pub page_count: usize,
    /// 0-based index of the first row on this page
    pub start: usize,
    /// Exclusive end index of this page's slice
    pub end: usize,
    pub total: usize,
}

impl TablePage<'_> {
    /// e.g. `"Showing 1–10 of 47"`
    pub fn range_label(&self) -> String {
        let first = if self.total == 0 { 0 } else { self.start + 1 };
        format!("Showing {first}–{} of {}", self.end, self.total)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }

    /// The pager is only shown when there is more than one page.
    pub fn shows_pager(&self) -> bool {
        self.page_count > 1
    }
}

/// Sortable, paginated campaign table.
///
/// Clicking a column cycles unsorted → ascending → descending → unsorted;
/// clicking another column starts it at ascending. Every sort change goes
/// back to page 1.
#[derive(Debug, Clone)]
pub struct CampaignTable {
    rows: Vec<Campaign>,
    sort: Option<SortState>,
    current_page: usize,
    page_size: usize,
}

impl CampaignTable {
    pub fn new(page_size: usize) -> Self {
        Self {
            rows: Vec::new(),
            sort: None,
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn with_rows(rows: Vec<Campaign>, page_size: usize) -> Self {
        let mut table = Self::new(page_size);
        table.rows = rows;
        table
    }

    /// Replace all rows. The sort is kept and the page clamped.
    pub fn set_rows(&mut self, rows: Vec<Campaign>) {
        self.rows = rows;
        self.current_page = self.clamp_page(self.current_page);
    }

    /// Rows in their original (unsorted) order.
    #[must_use]
    pub fn rows(&self) -> &[Campaign] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn sort_state(&self) -> Option<SortState> {
        self.sort
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Header click on `field`. Returns the new sort (None = unsorted).
    pub fn request_sort(&mut self, field: SortField) -> Option<SortState> {
        self.sort = match self.sort {
            Some(current) if current.field == field => match current.direction {
                SortDirection::Ascending => Some(SortState {
                    field,
                    direction: SortDirection::Descending,
                }),
                SortDirection::Descending => None,
            },
            _ => Some(SortState {
                field,
                direction: SortDirection::Ascending,
            }),
        };
        self.current_page = 1;
        self.sort
    }

    /// Rows in display order.
    #[must_use]
    pub fn sorted_rows(&self) -> Vec<&Campaign> {
        let mut rows: Vec<&Campaign> = self.rows.iter().collect();
        if let Some(sort) = self.sort {
            rows.sort_by(|a, b| {
                let ordering = compare(sort.field, a, b);
                match sort.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }
        rows
    }

    /// `ceil(rows / page_size)`; 0 for an empty table.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.rows.len().div_ceil(self.page_size)
    }

    #[must_use]
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Jump to `page`, clamped into `[1, page_count]`. Returns the page landed on.
    pub fn go_to_page(&mut self, page: usize) -> usize {
        self.current_page = self.clamp_page(page);
        self.current_page
    }

    pub fn next_page(&mut self) -> usize {
        self.go_to_page(self.current_page.saturating_add(1))
    }

    pub fn previous_page(&mut self) -> usize {
        self.go_to_page(self.current_page.saturating_sub(1))
    }

    /// The slice of sorted rows on the current page.
    #[must_use]
    pub fn page(&self) -> TablePage<'_> {
        let sorted = self.sorted_rows();
        let total = sorted.len();
        let start = ((self.current_page - 1) * self.page_size).min(total);
        let end = (start + self.page_size).min(total);

        let rows = sorted[start..end]
            .iter()
            .copied()
            .enumerate()
            .map(|(offset, campaign)| TableRow {
                number: start + offset + 1,
                campaign,
            })
            .collect();

        TablePage {
            rows,
            page: self.current_page,
            page_count: self.page_count(),
            start,
            end,
            total,
        }
    }

    fn clamp_page(&self, page: usize) -> usize {
        page.clamp(1, self.page_count().max(1))
    }
}

fn compare(field: SortField, a: &Campaign, b: &Campaign) -> Ordering {
    match field {
        SortField::Name => locale_compare(&a.name, &b.name),
        SortField::Status => locale_compare(a.status.as_str(), b.status.as_str()),
        SortField::Impressions => a.impressions.cmp(&b.impressions),
        SortField::Clicks => a.clicks.cmp(&b.clicks),
        SortField::Ctr => a.ctr.total_cmp(&b.ctr),
        SortField::Spend => a.spend.total_cmp(&b.spend),
    }
}

/// Compares on base letters first, ignoring case and accents, so "Émile"
/// sorts between "Dora" and "Zeta". Ties go to the unaccented string, then
/// to lowercase.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(&base_letters(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

fn base_letters(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}
