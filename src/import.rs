//! CSV import of recipient/amount pairs into the form's text fields.
//!
//! Rows are `recipient,amount`; an optional header row is skipped. The
//! imported values land in the same raw text fields the user types into, so
//! the normal parsing/validation path applies unchanged.

use anyhow::{anyhow, Result};
use std::io::Read;
use std::path::Path;

/// CSV rows rejoined into the form's two newline-separated text fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedLists {
    pub recipients: String,
    pub amounts: String,
}

/// Read a `recipient,amount` CSV file into form field text.
pub fn read_recipients_csv(path: &Path) -> Result<ImportedLists> {
    let file = std::fs::File::open(path)
        .map_err(|e| anyhow!("cannot open {}: {}", path.display(), e))?;
    read_from(file)
}

fn read_from<R: Read>(input: R) -> Result<ImportedLists> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut recipients = Vec::new();
    let mut amounts = Vec::new();

    for (row_num, record) in reader.records().enumerate() {
        let record = record?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        if record.len() < 2 {
            return Err(anyhow!("row {}: expected `recipient,amount`", row_num + 1));
        }

        let recipient = record[0].trim();
        let amount = record[1].trim();

        // Tolerate a header row
        if row_num == 0 && !recipient.starts_with("0x") {
            continue;
        }

        recipients.push(recipient.to_string());
        amounts.push(amount.to_string());
    }

    if recipients.is_empty() {
        return Err(anyhow!("no recipient rows found"));
    }

    Ok(ImportedLists {
        recipients: recipients.join("\n"),
        amounts: amounts.join("\n"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_plain_rows() {
        let csv = "0xaaa,100\n0xbbb,200\n";
        let lists = read_from(csv.as_bytes()).unwrap();
        assert_eq!(lists.recipients, "0xaaa\n0xbbb");
        assert_eq!(lists.amounts, "100\n200");
    }

    #[test]
    fn test_header_row_is_skipped() {
        let csv = "recipient,amount\n0xaaa,100\n";
        let lists = read_from(csv.as_bytes()).unwrap();
        assert_eq!(lists.recipients, "0xaaa");
        assert_eq!(lists.amounts, "100");
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let csv = "0xaaa,100\n,\n0xbbb,200\n";
        let lists = read_from(csv.as_bytes()).unwrap();
        assert_eq!(lists.recipients, "0xaaa\n0xbbb");
    }

    #[test]
    fn test_single_column_row_is_an_error() {
        let csv = "0xaaa,100\n0xbbb\n";
        let err = read_from(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn test_header_only_file_is_an_error() {
        let csv = "recipient,amount\n";
        assert!(read_from(csv.as_bytes()).is_err());
    }
}
