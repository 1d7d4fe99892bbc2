//! Text repair and Unicode normalization for decoded tables.
//!
//! Runs between encoding resolution and schema validation. Purely a
//! `RawTable -> RawTable` transformation; structure is never changed.
//!
//! Three steps per text cell:
//!
//! 1. mojibake repair — best-effort reversal of UTF-8 bytes that were
//!    re-decoded as windows-1252 (`MÃ¼ller` → `Müller`);
//! 2. NFC composition, so visually identical strings compare equal;
//! 3. optional ASCII transliteration, only when explicitly requested via
//!    [`NormalizeOptions::ascii_fallback`] (never by default).
//!
//! Columns whose non-empty values all read as numbers are left untouched.

use encoding_rs::WINDOWS_1252;
use unicode_normalization::{UnicodeNormalization, is_nfc};

use crate::types::RawTable;

/// Options for the text normalizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Transliterate non-ASCII letters to ASCII equivalents (`ü` → `u`).
    ///
    /// Last-resort mode for consumers that cannot render non-ASCII text;
    /// off by default.
    pub ascii_fallback: bool,
}

/// Repair and normalize all text columns of `table`, headers included.
pub fn normalize_table(mut table: RawTable, options: &NormalizeOptions) -> RawTable {
    let textual: Vec<bool> = (0..table.columns.len())
        .map(|idx| !is_numeric_column(&table, idx))
        .collect();

    for name in &mut table.columns {
        *name = normalize_text(name, options);
    }
    for row in &mut table.rows {
        for (idx, cell) in row.iter_mut().enumerate() {
            if textual.get(idx).copied().unwrap_or(true) {
                *cell = normalize_text(cell, options);
            }
        }
    }
    table
}

fn normalize_text(s: &str, options: &NormalizeOptions) -> String {
    let repaired = repair_mojibake(s);
    let composed = if is_nfc(&repaired) {
        repaired
    } else {
        repaired.nfc().collect()
    };
    if options.ascii_fallback {
        deunicode::deunicode(&composed)
    } else {
        composed
    }
}

/// Best-effort reversal of UTF-8 text mis-decoded as windows-1252.
///
/// When marker characters typical of that corruption are present, re-encode
/// the string to windows-1252 and strictly re-decode the bytes as UTF-8. The
/// result is kept only if it is valid UTF-8 and actually different, so clean
/// text that merely contains a marker (e.g. `Åsa`) survives unchanged. Two
/// rounds cover doubly mis-decoded input.
pub fn repair_mojibake(s: &str) -> String {
    let mut current = s.to_owned();
    for _ in 0..2 {
        if !looks_garbled(&current) {
            break;
        }
        let fixed = {
            let (bytes, _, had_unmappable) = WINDOWS_1252.encode(&current);
            if had_unmappable {
                break;
            }
            match std::str::from_utf8(&bytes) {
                Ok(decoded) if decoded != current => Some(decoded.to_owned()),
                _ => None,
            }
        };
        match fixed {
            Some(f) => current = f,
            None => break,
        }
    }
    current
}

// Lead bytes of multi-byte UTF-8 sequences, as windows-1252 renders them.
fn looks_garbled(s: &str) -> bool {
    s.chars().any(|c| matches!(c, 'Ã' | 'Â' | 'Å' | 'Ä')) || s.contains("â€")
}

fn is_numeric_column(table: &RawTable, idx: usize) -> bool {
    let mut saw_value = false;
    for row in &table.rows {
        let Some(cell) = row.get(idx) else { continue };
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            continue;
        }
        saw_value = true;
        if trimmed.replace(',', ".").parse::<f64>().is_err() {
            return false;
        }
    }
    saw_value
}
