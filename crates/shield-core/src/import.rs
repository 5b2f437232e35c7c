//! CSV transaction import
//!
//! Reads a header row and matches columns by name, ignoring case and
//! surrounding whitespace:
//!
//! | column        | required | notes                                        |
//! |---------------|----------|----------------------------------------------|
//! | `description` | yes      |                                              |
//! | `amount`      | yes      | `$`, `,` and spaces stripped; `(x)` is `-x`  |
//! | `date`        | no       | normalized to `YYYY-MM-DD`                   |
//! | `merchant`    | no       |                                              |
//! | `category`    | no       |                                              |
//! | `type`        | no       | debit / credit                               |
//!
//! Other columns are ignored. Empty optional cells become `None`.

use std::io::Read;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Transaction;

/// Column positions resolved from the header row
struct Columns {
    description: usize,
    amount: usize,
    date: Option<usize>,
    merchant: Option<usize>,
    category: Option<usize>,
    transaction_type: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        Ok(Self {
            description: find("description")
                .ok_or_else(|| Error::Import("Missing 'description' column".into()))?,
            amount: find("amount")
                .ok_or_else(|| Error::Import("Missing 'amount' column".into()))?,
            date: find("date"),
            merchant: find("merchant"),
            category: find("category"),
            transaction_type: find("type"),
        })
    }
}

/// Parse transactions from CSV data with a header row
pub fn parse_transactions_csv<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut transactions = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let row = i + 1;
        let record = result?;
        let tx = parse_record(&record, &columns)
            .map_err(|e| Error::Import(format!("Row {}: {}", row, import_message(e))))?;
        transactions.push(tx);
    }

    debug!("Parsed {} transactions from CSV", transactions.len());
    Ok(transactions)
}

fn import_message(e: Error) -> String {
    match e {
        Error::Import(msg) => msg,
        other => other.to_string(),
    }
}

fn parse_record(record: &StringRecord, columns: &Columns) -> Result<Transaction> {
    let cell = |idx: Option<usize>| {
        idx.and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    let description = cell(Some(columns.description))
        .ok_or_else(|| Error::Import("Missing description".into()))?
        .to_string();

    let amount_str =
        cell(Some(columns.amount)).ok_or_else(|| Error::Import("Missing amount".into()))?;
    let amount = parse_amount(amount_str)?;

    let date = cell(columns.date)
        .map(parse_date)
        .transpose()?
        .map(|d| d.format("%Y-%m-%d").to_string());

    Ok(Transaction {
        date,
        description,
        merchant: cell(columns.merchant).map(String::from),
        category: cell(columns.category).map(String::from),
        amount,
        transaction_type: cell(columns.transaction_type).map(String::from),
    })
}

/// Parse a date string in various formats
fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    // Two-digit years before four so "01/15/24" is not read as year 24
    let formats = [
        "%Y-%m-%d", // 2024-01-15
        "%m/%d/%y", // 01/15/24
        "%m/%d/%Y", // 01/15/2024
    ];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    Err(Error::Import(format!("Unable to parse date: {}", s)))
}

/// Parse an amount string, handling currency symbols and commas
fn parse_amount(s: &str) -> Result<f64> {
    let cleaned: String = s
        .trim()
        .replace(['$', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| Error::Import(format!("Unable to parse amount: {}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_date("01/15/2024").unwrap(), expected);
        assert_eq!(parse_date("2024-01-15").unwrap(), expected);
        assert_eq!(parse_date("01/15/24").unwrap(), expected);
        assert!(parse_date("15.01.2024").is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$1,234.56").unwrap(), 1234.56);
        assert_eq!(parse_amount("-123.45").unwrap(), -123.45);
        assert_eq!(parse_amount("(100.00)").unwrap(), -100.00);
        assert_eq!(parse_amount(" 12 ").unwrap(), 12.0);
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("inf").is_err());
    }

    #[test]
    fn test_parse_full_csv() {
        let csv = "\
Date,Description,Merchant,Category,Type,Amount
01/15/2024,Weekly groceries,Safeway,groceries,debit,$82.10
2024-01-16,Paycheck,,,credit,\"(2,500.00)\"
";

        let transactions = parse_transactions_csv(csv.as_bytes()).unwrap();
        assert_eq!(transactions.len(), 2);

        assert_eq!(transactions[0].date.as_deref(), Some("2024-01-15"));
        assert_eq!(transactions[0].description, "Weekly groceries");
        assert_eq!(transactions[0].merchant.as_deref(), Some("Safeway"));
        assert_eq!(transactions[0].category.as_deref(), Some("groceries"));
        assert_eq!(transactions[0].transaction_type.as_deref(), Some("debit"));
        assert_eq!(transactions[0].amount, 82.10);

        assert_eq!(transactions[1].merchant, None);
        assert_eq!(transactions[1].category, None);
        assert_eq!(transactions[1].amount, -2500.0);
        assert!(transactions[1].validate().is_ok());
    }

    #[test]
    fn test_headers_are_case_insensitive_and_order_free() {
        let csv = " AMOUNT ,Notes,description\n12.5,ignored,Lunch\n";
        let transactions = parse_transactions_csv(csv.as_bytes()).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].description, "Lunch");
        assert_eq!(transactions[0].amount, 12.5);
        assert_eq!(transactions[0].date, None);
    }

    #[test]
    fn test_missing_required_column() {
        let err = parse_transactions_csv("Date,Amount\n2024-01-01,5\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("description"));
    }

    #[test]
    fn test_row_errors_carry_row_number() {
        let csv = "description,amount,date\nok,1,2024-01-01\nbad,lots,2024-01-02\n";
        let err = parse_transactions_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Import(_)));
        assert_eq!(
            err.to_string(),
            "Import error: Row 2: Unable to parse amount: lots"
        );

        let csv = "description,amount,date\nok,1,someday\n";
        let err = parse_transactions_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Row 1: Unable to parse date"));
    }

    #[test]
    fn test_short_rows_leave_optional_cells_empty() {
        let csv = "description,amount,category\nCoffee,3.25\n";
        let transactions = parse_transactions_csv(csv.as_bytes()).unwrap();
        assert_eq!(transactions[0].category, None);
    }

    #[test]
    fn test_empty_file_with_header() {
        let transactions = parse_transactions_csv("description,amount\n".as_bytes()).unwrap();
        assert!(transactions.is_empty());
    }
}
