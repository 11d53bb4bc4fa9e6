//! End-to-end behaviour of the table engine
//!
//! These tests verify that:
//! - filtering only ever narrows the ingested collection, in order
//! - sorting permutes without dropping or duplicating rows
//! - paging returns the right window and never panics
//! - selection is keyed, survives view changes and is observed per page

use data_table::prelude::*;
use serde_json::{Value, json};

fn columns() -> Vec<ColumnDescriptor<Value>> {
    vec![
        ColumnDescriptor::new("id", "ID"),
        ColumnDescriptor::new("name", "Name"),
        ColumnDescriptor::new("address.city", "City"),
        ColumnDescriptor::new("lastVisit", "Last Visit"),
    ]
}

fn patients() -> Vec<Value> {
    vec![
        json!({"id": "P001", "name": "John Doe", "address": {"city": "Boston"}, "lastVisit": "2024-03-02"}),
        json!({"id": "P002", "name": "Jane Smith", "address": {"city": "Austin"}, "lastVisit": "2023-11-20"}),
        json!({"id": "P003", "name": "Robert Brown", "address": {"city": "Denver"}}),
        json!({"id": "P004", "name": "Emily Davis", "address": {"city": "Boston"}, "lastVisit": "2024-01-15T09:30:00Z"}),
        json!({"id": "P005", "name": "Michael Johnson", "lastVisit": null}),
    ]
}

fn table(rows: Vec<Value>) -> DataTable<Value> {
    DataTable::new(rows, columns(), TableConfig::default()).expect("valid table")
}

fn keys(rows: Vec<&Value>) -> Vec<String> {
    rows.iter().map(|r| r.key()).collect()
}

// =============================================================================
// Scenarios
// =============================================================================

mod scenario_tests {
    use super::*;

    #[test]
    fn test_sort_by_name_ascending() {
        let rows = vec![json!({"name": "Beta", "id": 2}), json!({"name": "Alpha", "id": 1})];
        let mut table = table(rows);
        table.set_sort(SortState::asc("name"));

        let names: Vec<_> = table.sorted().iter().map(|r| r["name"].clone()).collect();
        assert_eq!(names, vec![json!("Alpha"), json!("Beta")]);
    }

    #[test]
    fn test_third_page_holds_last_five_of_25() {
        let rows: Vec<Value> = (0..25).map(|i| json!({"id": i, "name": format!("Item {}", i)})).collect();
        let mut table = table(rows);
        table.set_page(2, 10);

        let page: Vec<i64> = table.page_rows().iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(page, (20..25).collect::<Vec<_>>());
    }

    #[test]
    fn test_search_john_excludes_jane() {
        let rows = vec![
            json!({"id": 1, "name": "John Doe"}),
            json!({"id": 2, "name": "Jane Smith"}),
        ];
        let mut table = table(rows);
        table.set_search_term("john");

        let names: Vec<_> = table.filtered().iter().map(|r| r["name"].clone()).collect();
        assert_eq!(names, vec![json!("John Doe")]);
    }

    #[test]
    fn test_filtered_out_selection_kept_but_not_counted_on_page() {
        let rows = patients();
        let mut table = table(rows.clone());

        table.toggle_row(&rows[1]); // Jane Smith
        table.set_search_term("boston");

        assert!(table.is_selected(&rows[1]));
        assert_eq!(table.selection_len(), 1);
        assert!(!table.is_all_selected());
        assert!(table.is_indeterminate());

        table.select_all_visible();
        assert!(table.is_all_selected());
        assert_eq!(keys(table.selected_rows()), vec!["P001", "P002", "P004"]);
    }

    #[test]
    fn test_missing_sort_value_last_ascending() {
        let mut table = table(patients());
        table.set_sort(SortState::asc("lastVisit"));
        assert_eq!(
            keys(table.sorted()),
            vec!["P002", "P004", "P001", "P003", "P005"]
        );

        table.set_sort(SortState::desc("lastVisit"));
        assert_eq!(
            keys(table.sorted()),
            vec!["P003", "P005", "P001", "P004", "P002"]
        );
    }
}

// =============================================================================
// Properties
// =============================================================================

mod property_tests {
    use super::*;

    fn many() -> Vec<Value> {
        (0..40)
            .map(|i| {
                json!({
                    "id": i,
                    "name": format!("Patient {:02}", (i * 7) % 40),
                    "address": {"city": (["Boston", "Austin", "Denver"][i % 3])},
                })
            })
            .collect()
    }

    #[test]
    fn test_filtered_is_ordered_subset() {
        let rows = many();
        let mut table = table(rows.clone());
        table.set_filter("address.city", json!("bos"));
        table.set_search_term("1");

        let all = keys(rows.iter().collect());
        let filtered = keys(table.filtered());
        let mut cursor = all.iter();
        for key in &filtered {
            assert!(cursor.any(|k| k == key), "{key} out of order or not ingested");
        }
    }

    #[test]
    fn test_clearing_restores_ingested_order() {
        let rows = many();
        let mut table = table(rows.clone());
        table.set_filter("name", json!("3"));
        table.set_search_term("denver");
        table.set_sort(SortState::desc("name"));

        table.clear_filters();
        assert_eq!(keys(table.filtered()), keys(rows.iter().collect()));
    }

    #[test]
    fn test_sorted_is_permutation_of_filtered() {
        let mut table = table(many());
        table.set_filter("address.city", json!("a"));
        for sort in [SortState::asc("name"), SortState::desc("address.city"), SortState::asc("missing")] {
            table.set_sort(sort);
            let mut filtered = keys(table.filtered());
            let mut sorted = keys(table.sorted());
            filtered.sort();
            sorted.sort();
            assert_eq!(filtered, sorted);
        }
    }

    #[test]
    fn test_page_length_matches_window() {
        let mut table = table(many());
        for size in [1usize, 7, 10, 40, 100] {
            for index in 0..8 {
                table.set_page(index, size);
                let page = table.page_state();
                let expected = size.min(40usize.saturating_sub(page.page_index * size));
                assert_eq!(table.page_rows().len(), expected);
                assert!(page.page_index <= 40usize.div_ceil(size) - 1);
            }
        }
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        let rows = many();
        let mut table = table(rows.clone());
        table.toggle_row(&rows[3]);
        let before = keys(table.selected_rows());

        table.toggle_row(&rows[9]);
        table.toggle_row(&rows[9]);
        assert_eq!(keys(table.selected_rows()), before);
    }

    #[test]
    fn test_selection_survives_sort_and_paging() {
        let rows = many();
        let mut table = table(rows.clone());
        table.set_page(1, 10);
        table.select_all_visible();

        table.set_sort(SortState::desc("name"));
        table.set_page(3, 10);
        assert_eq!(table.selection_len(), 10);
        assert!(table.is_selected(&rows[15]));
    }
}

// =============================================================================
// Graceful degradation
// =============================================================================

mod degradation_tests {
    use super::*;

    #[test]
    fn test_malformed_paths_never_match() {
        let mut table = table(patients());
        table.set_filter("address.city.zip", json!("bos"));
        assert_eq!(table.total_records(), 0);
        assert!(matches!(table.empty_state(), Some(EmptyState::NoMatches(_))));
    }

    #[test]
    fn test_sort_on_unknown_path_keeps_order() {
        let mut table = table(patients());
        table.set_sort(SortState::asc("does.not.exist"));
        assert_eq!(keys(table.sorted()), keys(table.filtered()));
    }

    #[test]
    fn test_mixed_types_sort_without_panic() {
        let rows = vec![
            json!({"id": 1, "v": 10}),
            json!({"id": 2, "v": "ten"}),
            json!({"id": 3, "v": true}),
            json!({"id": 4, "v": "2024-01-01"}),
            json!({"id": 5, "v": {"nested": 1}}),
        ];
        let mut table = table(rows);
        table.set_sort(SortState::asc("v"));
        assert_eq!(table.sorted().len(), 5);
        // Objects resolve to no value and go last
        assert_eq!(table.sorted()[4]["id"], 5);
    }

    #[test]
    fn test_cell_content_is_escaped() {
        let rows = vec![json!({"id": 1, "name": "<b onclick=\"steal()\">Bob</b>"})];
        let table = table(rows);
        let row = table.rows()[0].clone();
        let cell = table.cell(&row, "name").unwrap();
        assert!(!cell.contains('<'));
        assert!(!cell.contains('"'));
    }
}

// =============================================================================
// Date-like text
// =============================================================================

mod date_text_tests {
    use super::*;

    fn visits() -> DataTable<Value> {
        table(vec![
            json!({"id": "V1", "lastVisit": "2023-12-31T23:00:00-05:00"}),
            json!({"id": "V2", "lastVisit": "2024-03-01T10:30:00Z"}),
            json!({"id": "V3", "lastVisit": "2024-01-01T02:00:00Z"}),
        ])
    }

    #[test]
    fn test_search_matches_stored_date_text() {
        let mut table = visits();
        table.set_search_term("2023-12-31");
        assert_eq!(keys(table.filtered()), vec!["V1"]);

        table.set_search_term("10:30:00Z");
        assert_eq!(keys(table.filtered()), vec!["V2"]);
    }

    #[test]
    fn test_filter_matches_offset_suffix() {
        let mut table = visits();
        table.set_filter("lastVisit", json!("-05:00"));
        assert_eq!(keys(table.filtered()), vec!["V1"]);
    }

    #[test]
    fn test_cell_shows_stored_date_text() {
        let table = visits();
        let row = table.rows()[0].clone();
        assert_eq!(
            table.cell(&row, "lastVisit").as_deref(),
            Some("2023-12-31T23:00:00-05:00")
        );
    }

    #[test]
    fn test_dates_still_sort_by_instant() {
        let mut table = visits();
        table.set_sort(SortState::asc("lastVisit"));
        // V1 is 2024-01-01T04:00Z, after V3
        assert_eq!(keys(table.sorted()), vec!["V3", "V1", "V2"]);
    }
}
