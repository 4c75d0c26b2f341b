//! Parser for the supervisor's box-drawn status table.
//!
//! ```text
//! ┌──────────┬────┬──────┐
//! │ App name │ id │ mode │     header row
//! ├──────────┼────┼──────┤     separator
//! │ net64    │ 0  │ fork │     data row(s)
//! └──────────┴────┴──────┘
//! ```
//!
//! Splitting on `│` yields the leading border, the header cells, one
//! segment for the gap between rows (separator line or bare newline), the
//! data cells, and the trailing border. Column names are normalized to
//! lower case with spaces replaced by underscores.

use std::collections::BTreeMap;

use crate::error::{SettingsError, SettingsResult};

/// Vertical box-drawing character separating cells.
pub const COLUMN_DELIMITER: char = '\u{2502}';

/// One data row keyed by normalized column name.
pub type ProcessStatusRow = BTreeMap<String, String>;

/// Parse a table holding exactly one header row and one data row.
pub fn parse_status_table(listing: &str) -> SettingsResult<ProcessStatusRow> {
    let cells = inner_segments(listing)?;
    let column_count = cells.len() / 2;
    if column_count == 0 {
        return Err(SettingsError::Parse("status table has no columns".to_string()));
    }

    let mut row = ProcessStatusRow::new();
    for index in 0..column_count {
        // +1 skips the gap segment between the header and data rows
        let value = cells.get(index + column_count + 1).ok_or_else(|| {
            SettingsError::Parse(format!("status table row is missing column {}", index))
        })?;
        row.insert(normalize_column(cells[index]), value.trim().to_string());
    }

    Ok(row)
}

/// Parse a table with any number of data rows.
///
/// Rows are recovered by treating every separator or newline segment as a
/// row break, so the column count comes from the header row itself.
pub fn parse_status_rows(listing: &str) -> SettingsResult<Vec<ProcessStatusRow>> {
    let mut rows: Vec<Vec<&str>> = vec![Vec::new()];
    for segment in inner_segments(listing)? {
        if is_row_break(segment) {
            if rows.last().is_some_and(|row| !row.is_empty()) {
                rows.push(Vec::new());
            }
        } else if let Some(row) = rows.last_mut() {
            row.push(segment);
        }
    }
    if rows.last().is_some_and(Vec::is_empty) {
        rows.pop();
    }

    let (header, data) = rows
        .split_first()
        .ok_or_else(|| SettingsError::Parse("status table has no header row".to_string()))?;
    let columns: Vec<String> = header.iter().map(|cell| normalize_column(cell)).collect();

    data.iter()
        .enumerate()
        .map(|(index, cells)| {
            if cells.len() != columns.len() {
                return Err(SettingsError::Parse(format!(
                    "status table row {} has {} cells, expected {}",
                    index,
                    cells.len(),
                    columns.len()
                )));
            }
            Ok(columns
                .iter()
                .cloned()
                .zip(cells.iter().map(|cell| cell.trim().to_string()))
                .collect::<ProcessStatusRow>())
        })
        .collect()
}

/// Segments between the leading and trailing borders.
fn inner_segments(listing: &str) -> SettingsResult<Vec<&str>> {
    let mut segments: Vec<&str> = listing.split(COLUMN_DELIMITER).skip(1).collect();
    if segments.pop().is_none() || segments.is_empty() {
        return Err(SettingsError::Parse("input is not a status table".to_string()));
    }
    Ok(segments)
}

fn normalize_column(cell: &str) -> String {
    cell.trim().to_lowercase().replace(' ', "_")
}

fn is_box_drawing(c: char) -> bool {
    ('\u{2500}'..='\u{257F}').contains(&c)
}

fn is_row_break(segment: &str) -> bool {
    segment.is_empty()
        || (segment.chars().all(|c| c.is_whitespace() || is_box_drawing(c))
            && segment.chars().any(|c| c == '\n' || is_box_drawing(c)))
}
