//! Encoding and separator resolution.
//!
//! Export files arrive with unknown encoding and locale dialect, so the
//! resolver walks an ordered strategy list: for each candidate encoding, for
//! each candidate separator, strictly decode the whole buffer and parse it as
//! a delimited table. The first pair that decodes and parses into more than
//! zero columns wins. Every failed attempt is recorded so the terminal
//! [`IngestError::EncodingDetection`] names what was tried and why it failed.
//!
//! The parse step is strict about row arity, which is what makes the `;`
//! fallback reachable: a semicolon-separated European file with decimal
//! commas parses ragged under `,` and errors out, instead of silently
//! collapsing into one column.

use encoding_rs::{Encoding, ISO_8859_2, ISO_8859_15, UTF_8, WINDOWS_1250, WINDOWS_1252};
use tracing::{debug, info};

use crate::error::{IngestError, IngestResult};
use crate::types::RawTable;

/// Candidate encodings tried in order when no byte-order mark is present:
/// UTF-8 first, then the single-byte Western/Central-European set.
pub const DEFAULT_ENCODINGS: &[&Encoding] =
    &[UTF_8, WINDOWS_1252, ISO_8859_2, WINDOWS_1250, ISO_8859_15];

/// Field separators tried in order for every candidate encoding.
pub const DEFAULT_SEPARATORS: &[u8] = &[b',', b';'];

/// A successfully decoded table plus the diagnostics of how it was decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTable {
    /// The parsed table.
    pub table: RawTable,
    /// Name of the encoding that was used.
    pub encoding: &'static str,
    /// The field separator that was used.
    pub separator: u8,
    /// True when the strict candidates all failed and the table was decoded
    /// with replacement characters.
    pub lossy: bool,
}

/// Resolve `buf` into a [`DecodedTable`] using ordered candidate lists.
///
/// A byte-order mark moves the indicated encoding to the front of the
/// candidate list and is stripped before decoding. If no strict candidate
/// succeeds, the first candidate is retried with a lossy decode before
/// giving up.
pub fn resolve_bytes(
    buf: &[u8],
    encodings: &[&'static Encoding],
    separators: &[u8],
) -> IngestResult<DecodedTable> {
    if buf.is_empty() {
        return Err(IngestError::EmptyInput);
    }

    let (payload, candidates) = match Encoding::for_bom(buf) {
        Some((bom_encoding, bom_len)) => {
            let mut list = vec![bom_encoding];
            list.extend(encodings.iter().copied().filter(|e| *e != bom_encoding));
            (&buf[bom_len..], list)
        }
        None => (buf, encodings.to_vec()),
    };

    let mut attempts: Vec<String> = Vec::new();
    for encoding in &candidates {
        let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(payload)
        else {
            attempts.push(format!("{}: malformed byte sequence", encoding.name()));
            continue;
        };
        for &separator in separators {
            match parse_delimited(&text, separator) {
                Ok(table) if table.column_count() > 0 => {
                    info!(
                        encoding = encoding.name(),
                        separator = %char::from(separator),
                        rows = table.row_count(),
                        "resolved input table"
                    );
                    return Ok(DecodedTable {
                        table,
                        encoding: encoding.name(),
                        separator,
                        lossy: false,
                    });
                }
                Ok(_) => attempts.push(format!(
                    "{} + '{}': parsed zero columns",
                    encoding.name(),
                    char::from(separator)
                )),
                Err(e) => attempts.push(format!(
                    "{} + '{}': {e}",
                    encoding.name(),
                    char::from(separator)
                )),
            }
        }
    }

    // Last resort: replacement decoding with the first candidate.
    if let Some(&fallback) = candidates.first() {
        let (text, _) = fallback.decode_without_bom_handling(payload);
        for &separator in separators {
            if let Ok(table) = parse_delimited(&text, separator) {
                if table.column_count() > 0 {
                    debug!(encoding = fallback.name(), "accepted lossy decode");
                    return Ok(DecodedTable {
                        table,
                        encoding: fallback.name(),
                        separator,
                        lossy: true,
                    });
                }
            }
        }
        attempts.push(format!(
            "{} (lossy): no separator produced a table",
            fallback.name()
        ));
    } else {
        attempts.push("no candidate encodings configured".to_string());
    }

    Err(IngestError::EncodingDetection { attempts })
}

fn parse_delimited(text: &str, separator: u8) -> Result<RawTable, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(separator)
        .has_headers(true)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_owned).collect());
    }
    Ok(RawTable::new(columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "DATE,PLAYER,SOURCE,CHEST,SCORE";

    #[test]
    fn empty_buffer_fails_before_any_decode() {
        let err = resolve_bytes(b"", DEFAULT_ENCODINGS, DEFAULT_SEPARATORS).unwrap_err();
        assert!(matches!(err, IngestError::EmptyInput));
    }

    #[test]
    fn utf8_comma_resolves_first() {
        let input = format!("{HEADER}\n2024-01-01,Alice,Guild,Gold,100\n");
        let decoded =
            resolve_bytes(input.as_bytes(), DEFAULT_ENCODINGS, DEFAULT_SEPARATORS).unwrap();
        assert_eq!(decoded.encoding, "UTF-8");
        assert_eq!(decoded.separator, b',');
        assert!(!decoded.lossy);
        assert_eq!(decoded.table.columns.len(), 5);
        assert_eq!(decoded.table.rows[0][1], "Alice");
    }

    #[test]
    fn utf8_bom_is_promoted_and_stripped() {
        let mut input = b"\xEF\xBB\xBF".to_vec();
        input.extend_from_slice(format!("{HEADER}\n2024-01-01,Alice,Guild,Gold,100\n").as_bytes());
        let decoded = resolve_bytes(&input, DEFAULT_ENCODINGS, DEFAULT_SEPARATORS).unwrap();
        assert_eq!(decoded.encoding, "UTF-8");
        // BOM must not be glued onto the first header.
        assert_eq!(decoded.table.columns[0], "DATE");
    }

    #[test]
    fn invalid_utf8_falls_back_to_windows_1252() {
        let mut input = format!("{HEADER}\n2024-01-01,M").into_bytes();
        input.push(0xFC); // ü in windows-1252, malformed as UTF-8
        input.extend_from_slice(b"ller,Guild,Gold,100\n");
        let decoded = resolve_bytes(&input, DEFAULT_ENCODINGS, DEFAULT_SEPARATORS).unwrap();
        assert_eq!(decoded.encoding, "windows-1252");
        assert_eq!(decoded.table.rows[0][1], "Müller");
    }

    #[test]
    fn decimal_commas_push_resolution_to_semicolon() {
        let input = "DATE;PLAYER;SOURCE;CHEST;SCORE\n01/02/2024;Alice;Guild;Gold;1,5\n";
        let decoded =
            resolve_bytes(input.as_bytes(), DEFAULT_ENCODINGS, DEFAULT_SEPARATORS).unwrap();
        assert_eq!(decoded.separator, b';');
        assert_eq!(decoded.table.rows[0][4], "1,5");
    }

    #[test]
    fn unparseable_input_reports_every_attempt() {
        // Ragged under ',' (3 fields vs 2) and under ';' (1 field vs 2).
        let input = "A,B;C\na,b,c\n";
        let err = resolve_bytes(input.as_bytes(), DEFAULT_ENCODINGS, DEFAULT_SEPARATORS)
            .unwrap_err();
        let IngestError::EncodingDetection { attempts } = err else {
            panic!("expected EncodingDetection, got {err:?}");
        };
        assert!(!attempts.is_empty());
        assert!(attempts.iter().any(|a| a.contains("UTF-8")));
        assert!(attempts.iter().any(|a| a.contains("windows-1252")));
    }

    #[test]
    fn lossy_fallback_is_flagged() {
        let mut input = format!("{HEADER}\n2024-01-01,M").into_bytes();
        input.push(0xFC);
        input.extend_from_slice(b"ller,Guild,Gold,100\n");
        // Restricting candidates to UTF-8 forces the replacement decode.
        let decoded = resolve_bytes(&input, &[UTF_8], DEFAULT_SEPARATORS).unwrap();
        assert!(decoded.lossy);
        assert_eq!(decoded.encoding, "UTF-8");
        assert!(decoded.table.rows[0][1].contains('\u{FFFD}'));
    }
}
