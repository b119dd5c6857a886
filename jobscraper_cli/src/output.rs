use anyhow::Result;
use jobscraper_lib::store;
use jobscraper_lib::JobRecord;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::Table;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            "markdown" | "md" => OutputFormat::Markdown,
            _ => OutputFormat::Table,
        }
    }
}

// -- Table builder --

/// One column per field seen in any record; absent fields render empty.
fn build_table(records: &[JobRecord]) -> Table {
    let cols = store::columns(records);
    let mut builder = Builder::default();
    builder.push_record(cols.iter().cloned());
    for record in records {
        builder.push_record(
            cols.iter()
                .map(|c| record.get(c).unwrap_or_default().to_string()),
        );
    }
    builder.build()
}

// -- Table output --

pub fn print_records_table(records: &[JobRecord]) {
    println!("{}", build_table(records));
}

// -- Markdown output --

pub fn print_records_markdown(records: &[JobRecord]) {
    let mut table = build_table(records);
    table.with(Style::markdown());
    println!("{}", table);
}

// -- CSV output --

pub fn print_records_csv(records: &[JobRecord]) -> Result<()> {
    store::write_csv(records, std::io::stdout())?;
    Ok(())
}

// -- JSON output --

pub fn print_json(records: &[JobRecord]) -> Result<()> {
    store::write_json(records, std::io::stdout())?;
    println!();
    Ok(())
}

pub fn print_records(records: &[JobRecord], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => print_records_table(records),
        OutputFormat::Markdown => print_records_markdown(records),
        OutputFormat::Csv => print_records_csv(records)?,
        OutputFormat::Json => print_json(records)?,
    }
    Ok(())
}
