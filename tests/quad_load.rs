// Loading quadrangle records into a table.
//
// Records are built in-memory in the listing's fixed layout: a 40-column
// name, then state, DRG name and four coordinates.
use chained_hashmap::quad::{load_table, QuadError};
use chained_hashmap::{DuplicatePolicy, TableConfig};
use std::io::Cursor;

fn record(name: &str, drg: &str, x: f32, y: f32) -> String {
    format!(
        "{:<40}AK {} {:.3} {:.3} {:.3} {:.3}\n",
        name,
        drg,
        x,
        y,
        x + 0.25,
        y + 0.125
    )
}

fn listing(n: usize) -> String {
    (0..n)
        .map(|i| {
            record(
                &format!("Quad {i}"),
                &format!("o{:05}a{}", 60_000 + i, i % 8 + 1),
                -150.0 + i as f32 * 0.25,
                60.0,
            )
        })
        .collect()
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// Test: a full listing loads with growth.
// Verifies: every record is keyed by its cleaned DRG name and the table grew
// past its initial 13 buckets.
#[test]
fn loads_listing_keyed_by_drg_name() {
    init_logger();
    let text = listing(150);
    let loaded = load_table(
        Cursor::new(text),
        TableConfig::new().capacity_hint(10),
        256,
    )
    .expect("load");
    assert_eq!(loaded.records, 150);
    assert_eq!(loaded.duplicates, 0);
    assert_eq!(loaded.table.len(), 150);
    assert_eq!(loaded.table.capacity(), 1_021);

    let r = loaded.table.get("o60042a3").expect("record 42");
    assert_eq!(r.quad_name, "Quad 42");
    assert_eq!(r.state, "AK");
    assert_eq!(r.x1, -150.0 + 42.0 * 0.25);
}

// Test: blank lines and punctuation in DRG names.
// Verifies: blank lines are skipped and keys are stripped to alphanumerics.
#[test]
fn skips_blank_lines_and_cleans_keys() {
    init_logger();
    let text = format!(
        "{}\n\n{}   \n",
        record("First", "o61-149a1", -149.0, 61.0).trim_end(),
        record("Second", "o61.149a2", -148.75, 61.0).trim_end()
    );
    let loaded = load_table(Cursor::new(text), TableConfig::new(), 256).unwrap();
    assert_eq!(loaded.records, 2);
    assert!(loaded.table.contains_key("o61149a1"));
    assert!(loaded.table.contains_key("o61149a2"));
}

// Test: repeated DRG names.
// Verifies: under Reject the first record stays and the repeat is counted;
// under Replace the last record wins.
#[test]
fn duplicate_drg_names_follow_policy() {
    init_logger();
    let text = format!(
        "{}{}",
        record("Original", "o1a1", -1.0, 1.0),
        record("Repeat", "o1a1", -2.0, 2.0)
    );

    let loaded = load_table(Cursor::new(text.clone()), TableConfig::new(), 256).unwrap();
    assert_eq!(loaded.records, 2);
    assert_eq!(loaded.duplicates, 1);
    assert_eq!(loaded.table.get("o1a1").unwrap().quad_name, "Original");

    let config = TableConfig::new().duplicates(DuplicatePolicy::Replace);
    let loaded = load_table(Cursor::new(text), config, 256).unwrap();
    assert_eq!(loaded.duplicates, 0);
    assert_eq!(loaded.table.len(), 1);
    assert_eq!(loaded.table.get("o1a1").unwrap().quad_name, "Repeat");
}

// Test: malformed input.
// Verifies: the error names the 1-based line; bad table config surfaces as a
// table error.
#[test]
fn reports_bad_line_number() {
    init_logger();
    let text = format!("{}{:<40}AK o2a1 x y z w\n", record("Good", "o1a1", 0.0, 0.0), "Bad");
    match load_table(Cursor::new(text), TableConfig::new(), 256) {
        Err(QuadError::Line { line, source }) => {
            assert_eq!(line, 2);
            assert!(matches!(*source, QuadError::InvalidNumber { field: "x1", .. }));
        }
        other => panic!("unexpected result: {:?}", other.map(|l| l.records)),
    }

    let bad = TableConfig::new().capacity_hint(usize::MAX);
    assert!(matches!(
        load_table(Cursor::new(String::new()), bad, 256),
        Err(QuadError::Table(_))
    ));
}
