// ═══════════════════════════════════════════════════════════════════
// Table Tests — sorting cycle, pagination, range labels
// ═══════════════════════════════════════════════════════════════════

use chrono::{TimeZone, Utc};
use std::cmp::Ordering;

use campaign_dashboard_core::models::campaign::{Campaign, CampaignStatus};
use campaign_dashboard_core::views::table::{
    locale_compare, CampaignTable, SortDirection, SortField, SortState,
};

fn campaign(id: usize, name: &str, status: CampaignStatus, impressions: u64) -> Campaign {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    Campaign {
        id: format!("c{id}"),
        name: name.to_string(),
        status,
        impressions,
        clicks: impressions / 20,
        ctr: 5.0 - id as f64 * 0.1,
        spend: id as f64 * 10.0,
        start_date: start,
        end_date: start,
    }
}

fn numbered(n: usize) -> Vec<Campaign> {
    (1..=n)
        .map(|i| campaign(i, &format!("Campaign {i:02}"), CampaignStatus::Active, (i as u64 * 7919) % 1000))
        .collect()
}

fn ids(table: &CampaignTable) -> Vec<String> {
    table.sorted_rows().iter().map(|c| c.id.clone()).collect()
}

// ═══════════════════════════════════════════════════════════════════
// Pagination
// ═══════════════════════════════════════════════════════════════════

mod pagination {
    use super::*;

    #[test]
    fn forty_seven_rows_make_five_pages() {
        let mut table = CampaignTable::with_rows(numbered(47), 10);
        assert_eq!(table.page_count(), 5);

        assert_eq!(table.go_to_page(5), 5);
        let page = table.page();
        assert_eq!(page.rows.len(), 7);
        assert_eq!(page.start, 40);
        assert_eq!(page.end, 47);
        assert_eq!(page.rows[0].number, 41);
        assert_eq!(page.rows[6].number, 47);
        assert_eq!(page.range_label(), "Showing 41–47 of 47");
        assert!(page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn first_page_label() {
        let table = CampaignTable::with_rows(numbered(47), 10);
        let page = table.page();
        assert_eq!(page.page, 1);
        assert_eq!(page.rows.len(), 10);
        assert_eq!(page.range_label(), "Showing 1–10 of 47");
        assert!(!page.has_previous());
        assert!(page.has_next());
        assert!(page.shows_pager());
    }

    #[test]
    fn out_of_range_pages_are_clamped() {
        let mut table = CampaignTable::with_rows(numbered(47), 10);
        assert_eq!(table.go_to_page(0), 1);
        assert_eq!(table.go_to_page(6), 5);
        assert_eq!(table.go_to_page(usize::MAX), 5);
        assert_eq!(table.current_page(), 5);
    }

    #[test]
    fn next_and_previous_stop_at_the_edges() {
        let mut table = CampaignTable::with_rows(numbered(25), 10);
        assert_eq!(table.previous_page(), 1);
        assert_eq!(table.next_page(), 2);
        assert_eq!(table.next_page(), 3);
        assert_eq!(table.next_page(), 3);
        assert_eq!(table.previous_page(), 2);
    }

    #[test]
    fn exact_multiple_of_page_size() {
        let table = CampaignTable::with_rows(numbered(20), 10);
        assert_eq!(table.page_count(), 2);
    }

    #[test]
    fn single_page_hides_pager() {
        let table = CampaignTable::with_rows(numbered(4), 10);
        let page = table.page();
        assert_eq!(table.page_count(), 1);
        assert!(!page.shows_pager());
        assert_eq!(page.range_label(), "Showing 1–4 of 4");
    }

    #[test]
    fn empty_table() {
        let mut table = CampaignTable::new(10);
        assert!(table.is_empty());
        assert_eq!(table.page_count(), 0);
        assert_eq!(table.go_to_page(3), 1);
        let page = table.page();
        assert!(page.rows.is_empty());
        assert_eq!(page.range_label(), "Showing 0–0 of 0");
        assert!(!page.has_next());
    }

    #[test]
    fn zero_page_size_is_raised_to_one() {
        let table = CampaignTable::with_rows(numbered(3), 0);
        assert_eq!(table.page_size(), 1);
        assert_eq!(table.page_count(), 3);
    }

    #[test]
    fn set_rows_clamps_current_page() {
        let mut table = CampaignTable::with_rows(numbered(47), 10);
        table.go_to_page(5);
        table.set_rows(numbered(12));
        assert_eq!(table.current_page(), 2);
        assert_eq!(table.len(), 12);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Sorting
// ═══════════════════════════════════════════════════════════════════

mod sorting {
    use super::*;

    fn mixed() -> Vec<Campaign> {
        vec![
            campaign(1, "delta", CampaignStatus::Paused, 300),
            campaign(2, "Alpha", CampaignStatus::Active, 100),
            campaign(3, "charlie", CampaignStatus::Completed, 500),
            campaign(4, "Bravo", CampaignStatus::Active, 200),
        ]
    }

    #[test]
    fn unsorted_keeps_original_order() {
        let table = CampaignTable::with_rows(mixed(), 10);
        assert_eq!(table.sort_state(), None);
        assert_eq!(ids(&table), vec!["c1", "c2", "c3", "c4"]);
    }

    #[test]
    fn cycle_ascending_descending_none() {
        let mut table = CampaignTable::with_rows(mixed(), 10);
        let original = ids(&table);

        let state = table.request_sort(SortField::Name);
        assert_eq!(
            state,
            Some(SortState {
                field: SortField::Name,
                direction: SortDirection::Ascending,
            })
        );
        assert_eq!(ids(&table), vec!["c2", "c4", "c3", "c1"]);

        let state = table.request_sort(SortField::Name);
        assert_eq!(state.map(|s| s.direction), Some(SortDirection::Descending));
        assert_eq!(ids(&table), vec!["c1", "c3", "c4", "c2"]);

        assert_eq!(table.request_sort(SortField::Name), None);
        assert_eq!(ids(&table), original);
    }

    #[test]
    fn other_column_starts_ascending() {
        let mut table = CampaignTable::with_rows(mixed(), 10);
        table.request_sort(SortField::Name);
        table.request_sort(SortField::Name);

        let state = table.request_sort(SortField::Impressions).unwrap();
        assert_eq!(state.field, SortField::Impressions);
        assert_eq!(state.direction, SortDirection::Ascending);
        assert_eq!(ids(&table), vec!["c2", "c4", "c1", "c3"]);
    }

    #[test]
    fn every_sort_change_returns_to_page_one() {
        let mut table = CampaignTable::with_rows(numbered(47), 10);
        table.go_to_page(4);
        table.request_sort(SortField::Clicks);
        assert_eq!(table.current_page(), 1);

        table.go_to_page(3);
        table.request_sort(SortField::Clicks);
        assert_eq!(table.current_page(), 1);

        table.go_to_page(2);
        table.request_sort(SortField::Clicks);
        assert_eq!(table.current_page(), 1);
        assert_eq!(table.sort_state(), None);
    }

    #[test]
    fn status_sorts_by_wire_name() {
        let mut table = CampaignTable::with_rows(mixed(), 10);
        table.request_sort(SortField::Status);
        let statuses: Vec<CampaignStatus> =
            table.sorted_rows().iter().map(|c| c.status).collect();
        assert_eq!(
            statuses,
            vec![
                CampaignStatus::Active,
                CampaignStatus::Active,
                CampaignStatus::Completed,
                CampaignStatus::Paused,
            ]
        );
        // stable: equal statuses keep input order
        assert_eq!(ids(&table)[..2], ["c2".to_string(), "c4".to_string()]);
    }

    #[test]
    fn numeric_columns() {
        let mut table = CampaignTable::with_rows(mixed(), 10);

        table.request_sort(SortField::Spend);
        table.request_sort(SortField::Spend);
        assert_eq!(ids(&table), vec!["c4", "c3", "c2", "c1"]);

        table.request_sort(SortField::Ctr);
        assert_eq!(ids(&table), vec!["c4", "c3", "c2", "c1"]);
    }

    #[test]
    fn nan_metrics_sort_without_panicking() {
        let mut rows = mixed();
        rows[1].ctr = f64::NAN;
        rows[3].spend = f64::NAN;
        let mut table = CampaignTable::with_rows(rows, 10);

        table.request_sort(SortField::Ctr);
        assert_eq!(ids(&table), vec!["c4", "c3", "c1", "c2"]);

        table.request_sort(SortField::Spend);
        assert_eq!(ids(&table), vec!["c1", "c2", "c3", "c4"]);
        table.request_sort(SortField::Spend);
        assert_eq!(ids(&table), vec!["c4", "c3", "c2", "c1"]);
    }

    #[test]
    fn sorting_does_not_touch_stored_rows() {
        let mut table = CampaignTable::with_rows(mixed(), 10);
        table.request_sort(SortField::Impressions);
        let stored: Vec<&str> = table.rows().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(stored, vec!["c1", "c2", "c3", "c4"]);
    }

    #[test]
    fn row_numbers_follow_sorted_order_across_pages() {
        let mut table = CampaignTable::with_rows(numbered(15), 10);
        table.request_sort(SortField::Spend);
        table.request_sort(SortField::Spend);
        table.go_to_page(2);
        let page = table.page();
        assert_eq!(page.rows.len(), 5);
        assert_eq!(page.rows[0].number, 11);
        assert_eq!(page.rows[0].campaign.id, "c5");
    }
}

// ═══════════════════════════════════════════════════════════════════
// locale_compare
// ═══════════════════════════════════════════════════════════════════

mod collation {
    use super::*;

    #[test]
    fn case_insensitive_primary_order() {
        assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_compare("Zebra", "apple"), Ordering::Greater);
    }

    #[test]
    fn lowercase_first_on_case_only_difference() {
        assert_eq!(locale_compare("alpha", "Alpha"), Ordering::Less);
        assert_eq!(locale_compare("Alpha", "alpha"), Ordering::Greater);
        assert_eq!(locale_compare("alpha", "alpha"), Ordering::Equal);
    }

    #[test]
    fn accents_sort_with_their_base_letter() {
        assert_eq!(locale_compare("Émile Launch", "Zeta Push"), Ordering::Less);
        assert_eq!(locale_compare("été", "eu"), Ordering::Less);
        assert_eq!(locale_compare("Ångström", "Bravo"), Ordering::Less);
        assert_eq!(locale_compare("Zürich", "Zulu"), Ordering::Greater);
    }

    #[test]
    fn unaccented_first_on_accent_only_difference() {
        assert_eq!(locale_compare("ete", "été"), Ordering::Less);
        assert_eq!(locale_compare("été", "ete"), Ordering::Greater);
        assert_eq!(locale_compare("été", "été"), Ordering::Equal);
    }

    #[test]
    fn name_column_places_accented_names_in_order() {
        let mut table = CampaignTable::with_rows(
            vec![
                campaign(1, "Zeta Push", CampaignStatus::Active, 1),
                campaign(2, "Émile Launch", CampaignStatus::Active, 2),
                campaign(3, "delta", CampaignStatus::Active, 3),
                campaign(4, "Alpha", CampaignStatus::Active, 4),
            ],
            10,
        );
        table.request_sort(SortField::Name);
        assert_eq!(ids(&table), vec!["c4", "c3", "c2", "c1"]);
    }
}
