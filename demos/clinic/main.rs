//! Patient list example
//!
//! This example demonstrates:
//! - Implementing `Record` for a typed struct with a nested field
//! - Custom cell renderers and sticky columns
//! - Debounced search through a `TableHandle`
//! - Listening to table events
//!
//! Run with `RUST_LOG=data_table=debug cargo run --example clinic`

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use data_table::prelude::*;
use serde::Serialize;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Serialize)]
struct Address {
    city: String,
    zip: String,
}

#[derive(Debug, Clone, Serialize)]
struct Patient {
    id: String,
    name: String,
    age: i64,
    address: Address,
    last_visit: Option<DateTime<Utc>>,
}

impl Record for Patient {
    fn key(&self) -> String {
        self.id.clone()
    }

    fn field(&self, path: &str) -> Option<FieldValue> {
        match path {
            "id" => Some(self.id.as_str().into()),
            "name" => Some(self.name.as_str().into()),
            "age" => Some(self.age.into()),
            "address.city" => Some(self.address.city.as_str().into()),
            "address.zip" => Some(self.address.zip.as_str().into()),
            "lastVisit" => self.last_visit.map(FieldValue::from),
            _ => None,
        }
    }
}

fn visit(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .map(|dt| dt.and_utc())
}

fn patients() -> Vec<Patient> {
    let raw = [
        ("P001", "John Doe", 45, "Boston", "02101", visit(2024, 3, 2)),
        ("P002", "Jane Smith", 32, "Austin", "73301", visit(2023, 11, 20)),
        ("P003", "Robert Brown", 58, "Denver", "80201", None),
        ("P004", "Emily Davis", 27, "Boston", "02118", visit(2024, 1, 15)),
        ("P005", "Michael Johnson", 61, "Seattle", "98101", visit(2022, 6, 9)),
        ("P006", "Sarah <Lee>", 39, "Austin", "73344", visit(2024, 2, 28)),
        ("P007", "Johnny Walker", 50, "Denver", "80202", None),
    ];
    raw.into_iter()
        .map(|(id, name, age, city, zip, last_visit)| Patient {
            id: id.to_string(),
            name: name.to_string(),
            age,
            address: Address {
                city: city.to_string(),
                zip: zip.to_string(),
            },
            last_visit,
        })
        .collect()
}

fn columns() -> Vec<ColumnDescriptor<Patient>> {
    vec![
        ColumnDescriptor::new("id", "Patient ID").sticky(StickyEdge::Start).width("100px"),
        ColumnDescriptor::new("name", "Name"),
        ColumnDescriptor::new("age", "Age").align(Align::Right).searchable(false),
        ColumnDescriptor::new("address.city", "City"),
        ColumnDescriptor::new("lastVisit", "Last Visit").render(|p: &Patient| {
            p.last_visit
                .map(|d| d.format("%b %-d, %Y").to_string())
                .unwrap_or_else(|| "Never".to_string())
        }),
    ]
}

fn print_page(table: &DataTable<Patient>) {
    println!("{}", table.result_summary());
    if let Some(empty) = table.empty_state() {
        println!("   ({})", empty.message());
        return;
    }
    for row in table.page_rows() {
        let cells: Vec<String> = table
            .columns()
            .iter()
            .map(|c| table.cell_content(row, c))
            .collect();
        let mark = if table.is_selected(row) { "[x]" } else { "[ ]" };
        println!("   {} {}", mark, cells.join(" | "));
    }
    println!();
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("Patient List Example");
    println!("====================\n");

    let config = TableConfig {
        page_size: 5,
        show_selection: true,
        search_debounce_ms: 300,
        ..TableConfig::default()
    };
    let table = DataTable::new(patients(), columns(), config)?;
    let mut events = table.subscribe();
    let handle = TableHandle::new(table);

    print_page(&*handle.read().await);

    println!("Sorting by last visit (newest first):");
    handle.write().await.sort_by("lastVisit", SortDirection::Desc);
    print_page(&*handle.read().await);

    println!("Typing \"joh\" one keystroke at a time:");
    for term in ["j", "jo", "joh"] {
        handle.set_search_term(term)?;
        tokio::time::sleep(Duration::from_millis(80)).await;
    }
    tokio::time::sleep(Duration::from_millis(400)).await;
    print_page(&*handle.read().await);

    println!("Selecting everything on the page:");
    {
        let mut table = handle.write().await;
        table.toggle_all_visible();
        println!("   all selected: {}", table.is_all_selected());
    }
    print_page(&*handle.read().await);

    println!("Filtering by city = Nowhere:");
    {
        let mut table = handle.write().await;
        table.clear_search();
        table.set_filter("address.city", serde_json::json!("Nowhere"));
    }
    print_page(&*handle.read().await);

    println!("Selected rows (still kept while filtered out):");
    println!("{}\n", handle.read().await.export_json()?);

    println!("Events:");
    while let Ok(envelope) = events.try_recv() {
        println!("   {} at {}", envelope.event.name(), envelope.timestamp.format("%H:%M:%S%.3f"));
    }

    Ok(())
}
