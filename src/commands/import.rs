use crate::error::{Error, Result};
use crate::model::Sample;
use crate::store::SqliteStore;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Bulk-load `timestamp,value` CSV lines into the reading store.
pub fn run(db: &Path, file: &Path) -> Result<()> {
    let reader: Box<dyn BufRead> = if file == Path::new("-") {
        Box::new(BufReader::new(io::stdin()))
    } else {
        Box::new(BufReader::new(File::open(file)?))
    };

    let samples = parse_csv(reader)?;
    if samples.is_empty() {
        println!("No readings to import");
        return Ok(());
    }

    let mut store = SqliteStore::open(db)?;
    let written = store.import_batch(&samples)?;
    println!("Imported {} readings into {}", written, db.display());
    Ok(())
}

fn parse_csv<R: BufRead>(reader: R) -> Result<Vec<Sample>> {
    let mut samples = Vec::new();
    let mut rows_seen = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        rows_seen += 1;

        match parse_line(text) {
            Ok(sample) => samples.push(sample),
            // tolerate a header as the first non-comment, non-blank row
            Err(_) if rows_seen == 1 => continue,
            Err(reason) => {
                return Err(Error::MalformedReading {
                    line: index + 1,
                    reason,
                });
            }
        }
    }

    Ok(samples)
}

fn parse_line(text: &str) -> std::result::Result<Sample, String> {
    let (stamp, value) = text
        .split_once(',')
        .ok_or_else(|| "expected `timestamp,value`".to_string())?;
    let timestamp: i64 = stamp
        .trim()
        .parse()
        .map_err(|_| format!("bad timestamp '{}'", stamp.trim()))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("bad value '{}'", value.trim()))?;
    Ok(Sample { timestamp, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_rows() {
        let input = "1552000000,20.5\n1552000600,21.0\n";
        let samples = parse_csv(input.as_bytes()).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].value, 21.0);
    }

    #[test]
    fn tolerates_a_header_row_comments_and_blank_lines() {
        let input = "timestamp,value\n# sensor 3\n\n1552000000, 20.5\n";
        let samples = parse_csv(input.as_bytes()).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].timestamp, 1_552_000_000);
    }

    #[test]
    fn tolerates_a_header_row_preceded_by_comments() {
        let input = "# exported 2019-03-07\n\ntimestamp,value\n1552000000,20.5\n";
        let samples = parse_csv(input.as_bytes()).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].value, 20.5);
    }

    #[test]
    fn only_the_first_row_may_be_a_header() {
        let input = "1552000000,20.5\ntimestamp,value\n";
        let result = parse_csv(input.as_bytes());
        match result {
            Err(Error::MalformedReading { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected MalformedReading, got {other:?}"),
        }
    }

    #[test]
    fn reports_the_offending_line() {
        let input = "1552000000,20.5\nnot-a-reading\n";
        let result = parse_csv(input.as_bytes());
        match result {
            Err(Error::MalformedReading { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected MalformedReading, got {other:?}"),
        }
    }
}
