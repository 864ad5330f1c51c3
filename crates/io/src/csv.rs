//! CSV snapshot ingestion.

use phasebill_consolidate::ConsolidateError;

use crate::table::Table;

/// Parse CSV content into a [`Table`]. The first record is the header row;
/// headers are trimmed. The delimiter is sniffed because schedule exports
/// from Spanish-locale Excel arrive semicolon-separated.
pub fn read_csv(source: &str, content: &str) -> Result<Table, ConsolidateError> {
    let delimiter = sniff_delimiter(content);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut headers = Vec::new();
    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            ConsolidateError::Io(format!("{source}: malformed CSV at record {index}: {e}"))
        })?;
        if index == 0 {
            headers = record.iter().map(|f| f.trim().to_string()).collect();
        } else {
            rows.push(record.iter().map(|f| f.to_string()).collect());
        }
    }

    if headers.is_empty() {
        return Err(ConsolidateError::Io(format!("{source}: empty CSV, no header row")));
    }

    Ok(Table {
        source: source.to_string(),
        headers,
        rows,
    })
}

/// Decode raw bytes as UTF-8, falling back to Windows-1252 (common for
/// Excel-exported CSVs with accented text).
pub fn decode_bytes(bytes: Vec<u8>) -> String {
    let decoded = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    };
    // A UTF-8 BOM would otherwise glue itself to the first header.
    decoded.trim_start_matches('\u{feff}').to_string()
}

/// Pick the delimiter whose field count is consistent across the first few
/// lines. Candidates: comma, semicolon, tab.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b',', b';', b'\t'];
    let sample: Vec<&str> = content.lines().take(10).collect();
    if sample.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;
    for &delim in candidates {
        let counts: Vec<usize> = sample
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;
        if score > best_score {
            best_score = score;
            best = delim;
        }
    }
    best
}
