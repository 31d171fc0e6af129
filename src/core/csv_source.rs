//! Comma-separated input shared by the protocol registry and the lookup table.
//!
//! The first physical line is always the header, even when blank. Data rows are
//! split on every comma with no quote handling.

use std::io::{BufRead, BufReader, Read};

use crate::error::Result;

/// Split off the first line and return it with a reader over the remaining rows.
pub(crate) fn split_header<R: Read>(
    reader: R,
) -> Result<(csv::StringRecord, csv::Reader<BufReader<R>>)> {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    reader.read_until(b'\n', &mut buf)?;
    let line = String::from_utf8_lossy(&buf);
    let header: csv::StringRecord = line.split(',').map(str::trim).collect();

    let rows = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    Ok((header, rows))
}

/// Number of fields once trailing empty fields are dropped.
pub(crate) fn populated_len(record: &csv::StringRecord) -> usize {
    record
        .as_byte_record()
        .iter()
        .rposition(|field| !field.is_empty())
        .map_or(0, |last| last + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_first_line_is_the_header() {
        let (header, mut rows) = split_header("\n6,tcp\n".as_bytes()).unwrap();
        assert_eq!(header.len(), 1);
        assert_eq!(&header[0], "");
        let first = rows.records().next().unwrap().unwrap();
        assert_eq!(&first[0], "6");
    }

    #[test]
    fn test_header_fields_trimmed() {
        let (header, _) = split_header(" DstPort , tag \r\n".as_bytes()).unwrap();
        assert_eq!(header.iter().collect::<Vec<_>>(), vec!["DstPort", "tag"]);
    }

    #[test]
    fn test_quotes_are_plain_characters() {
        let (_, mut rows) = split_header("h\n\"a,b\n".as_bytes()).unwrap();
        let rec = rows.records().next().unwrap().unwrap();
        assert_eq!(rec.len(), 2);
        assert_eq!(&rec[0], "\"a");
    }

    #[test]
    fn test_populated_len_ignores_trailing_empties() {
        let rec = csv::StringRecord::from(vec!["443", "tcp", "", ""]);
        assert_eq!(populated_len(&rec), 2);
        let rec = csv::StringRecord::from(vec!["443", "", "https"]);
        assert_eq!(populated_len(&rec), 3);
        assert_eq!(populated_len(&csv::StringRecord::new()), 0);
    }
}
