use crate::error::{Error, Result};
use crate::period::Period;
use crate::planner::{self, Granularity};
use chrono::Utc;
use comfy_table::{Table, presets::UTF8_FULL};

/// Show which partitions a period/resolution pair would query.
pub fn run(period: &str, resolution: u32, end: Option<i64>) -> Result<()> {
    let period = Period::parse(period).ok_or_else(|| Error::InvalidPeriod(period.to_string()))?;
    let end = end.unwrap_or_else(|| Utc::now().timestamp());
    let window = period.window_ending(end);

    let granularity = Granularity::select(window, resolution);
    let min_sample_interval = window.len_secs() as f64 / resolution.max(1) as f64;
    let entries = planner::plan(window, resolution)?;

    println!("# period: {period} | window: [{}, {}]", window.start, window.end);
    println!(
        "# min sample interval: {min_sample_interval:.0}s -> {granularity:?} granularity, {} range quer{}",
        entries.len(),
        if entries.len() == 1 { "y" } else { "ies" },
    );

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "#",
        "Partition key",
        "Key column",
        "Index",
        "Predicate",
    ]);

    let predicate = format!("timestamp BETWEEN {} AND {}", window.start, window.end);
    for (i, entry) in entries.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            entry.key.clone(),
            entry.granularity.key_column().to_string(),
            entry
                .granularity
                .index_name()
                .unwrap_or("(primary key)")
                .to_string(),
            predicate.clone(),
        ]);
    }

    println!("{table}");
    Ok(())
}
