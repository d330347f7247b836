//! Basic table storage example

use rowpack_core::{Row, Table};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Run with RUST_LOG=debug to watch the store at work
    tracing_subscriber::fmt::init();

    println!("Rowpack Basic Table Example\n");

    let dir = std::env::temp_dir().join("rowpack_basic_table");
    std::fs::create_dir_all(&dir)?;

    // Open (or create) a contacts table
    let mut table = Table::open("Contacts", &dir, "contacts.dat", &["Name", "City", "Phone"])?;
    println!(
        "Opened table '{}' with {} rows at {}",
        table.name(),
        table.row_count(),
        table.full_path().display()
    );

    // Insert a few rows; Name is the key, so rerunning this example
    // does not duplicate anyone
    for (name, city, phone) in [
        ("Alice", "Lisbon", "351-555-0101"),
        ("Bob", "Oslo", "47-555-0189"),
        ("Carol", "Quebec", "1-555-0147"),
    ] {
        let mut row = Row::new();
        row.add_field("Name", name, true)?;
        row.add_field("City", city, false)?;
        row.add_field("Phone", phone, false)?;

        if table.add_row(&row)? {
            println!("Inserted {}", name);
        } else {
            println!("Skipped {} (key already present)", name);
        }
    }

    table.save()?;
    println!("\nSaved {} rows", table.row_count());

    // Read everything back through a fresh handle
    let table = Table::open("Contacts", &dir, "contacts.dat", &["Name", "City", "Phone"])?;
    println!("\nStored contacts:");
    for row in table.rows() {
        println!("  {} | {} | {}", row[0], row[1], row[2]);
    }

    let raw = std::fs::read(table.full_path())?;
    println!(
        "\nFile size on disk: {} bytes (every character stored as a 12-bit code word)",
        raw.len()
    );

    Ok(())
}
