//! Cell-level parsing shared by the CSV and JSON sources.

use crate::error::{KpiError, Result};

/// Parses a monthly reading cell.
///
/// Empty cells and a lone `-` are blank. Commas are accepted only as
/// thousands separators between groups of three digits in the integer part.
/// Anything else that is not a finite number is rejected.
///
/// # Arguments
///
/// * `row` - 1-based data row number, for error reporting
/// * `column` - Month key of the cell
/// * `raw` - Cell text as read
///
/// # Errors
///
/// Returns [`KpiError::InvalidReading`] for non-numeric text.
pub(crate) fn parse_reading(row: usize, column: &str, raw: &str) -> Result<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return Ok(None);
    }
    let invalid = || KpiError::InvalidReading {
        row,
        column: column.to_string(),
        value: trimmed.to_string(),
    };
    let cleaned = strip_thousands(trimmed).ok_or_else(invalid)?;
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(invalid()),
    }
}

/// Removes thousands separators, or `None` when a comma sits anywhere other
/// than between three-digit groups of the integer part.
fn strip_thousands(raw: &str) -> Option<String> {
    if !raw.contains(',') {
        return Some(raw.to_string());
    }
    let unsigned = raw.trim_start_matches(['-', '+']);
    let sign = &raw[..raw.len() - unsigned.len()];
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (unsigned, None),
    };
    if fraction.is_some_and(|frac| frac.contains(',')) {
        return None;
    }

    let mut groups = integer.split(',');
    let lead = groups.next()?;
    if lead.is_empty() || lead.len() > 3 || !lead.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut digits = String::from(sign);
    digits.push_str(lead);
    for group in groups {
        if group.len() != 3 || !group.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.push_str(group);
    }
    if let Some(frac) = fraction {
        digits.push('.');
        digits.push_str(frac);
    }
    Some(digits)
}
