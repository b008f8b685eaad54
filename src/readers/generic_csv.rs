//! Generic CSV export reader
//!
//! Handles the common "one row per transaction" CSV export with a known
//! header. Two stock configurations are registered by default: the
//! comma-delimited and the semicolon-delimited variant of the
//! `date,bank,account,label,amount,fee` layout.
//!
//! Ids are derived from the identifying columns of each row, so the same
//! row in two overlapping exports resolves to the same id and merging is
//! idempotent. Identical rows within one file get a disambiguation suffix.

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

use crate::error::{MoneyManagerError, MoneyManagerResult};
use crate::models::Transaction;

use super::Reader;

/// Column layout of a CSV export
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    pub date: usize,
    pub bank: Option<usize>,
    pub account: Option<usize>,
    pub label: usize,
    pub amount: usize,
    pub fee: Option<usize>,
    /// Primary date format; common alternatives are tried as a fallback
    pub date_format: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            date: 0,
            bank: Some(1),
            account: Some(2),
            label: 3,
            amount: 4,
            fee: Some(5),
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

/// A configurable reader for header-identified CSV exports
pub struct CsvExportReader {
    name: String,
    delimiter: u8,
    /// Expected header line, compared case-insensitively
    header: String,
    mapping: ColumnMapping,
    /// Bank name used when the export has no bank column
    fallback_bank: String,
    /// Account name used when the export has no account column
    fallback_account: String,
}

impl CsvExportReader {
    pub fn new(
        name: impl Into<String>,
        delimiter: u8,
        header: impl Into<String>,
        mapping: ColumnMapping,
    ) -> Self {
        Self {
            name: name.into(),
            delimiter,
            header: header.into(),
            mapping,
            fallback_bank: "unknown".to_string(),
            fallback_account: "unknown".to_string(),
        }
    }

    /// Comma-delimited `date,bank,account,label,amount,fee`
    pub fn generic() -> Self {
        Self::new(
            "generic-csv",
            b',',
            "date,bank,account,label,amount,fee",
            ColumnMapping::default(),
        )
    }

    /// Semicolon-delimited variant of the same layout
    pub fn generic_semicolon() -> Self {
        Self::new(
            "generic-csv-semicolon",
            b';',
            "date;bank;account;label;amount;fee",
            ColumnMapping::default(),
        )
    }

    fn field<'a>(record: &'a csv::StringRecord, index: usize, what: &str) -> MoneyManagerResult<&'a str> {
        record.get(index).map(str::trim).ok_or_else(|| {
            MoneyManagerError::Import(format!("Missing {what} column in record"))
        })
    }

    fn parse_record(
        &self,
        record: &csv::StringRecord,
        row: usize,
        seen_ids: &mut HashSet<String>,
    ) -> MoneyManagerResult<Transaction> {
        let context = |e: String| MoneyManagerError::Import(format!("Row {}: {e}", row + 1));

        let date_str = Self::field(record, self.mapping.date, "date")?;
        let date = parse_date(date_str, &self.mapping.date_format).map_err(context)?;

        let label = Self::field(record, self.mapping.label, "label")?.to_string();

        let amount_str = Self::field(record, self.mapping.amount, "amount")?;
        let amount = parse_amount(amount_str).map_err(context)?;

        let fee_str = match self.mapping.fee {
            Some(col) => record.get(col).map(str::trim).unwrap_or(""),
            None => "",
        };
        let fee = if fee_str.is_empty() {
            None
        } else {
            Some(parse_amount(fee_str).map_err(context)?)
        };

        let bank = self
            .mapping
            .bank
            .and_then(|col| record.get(col))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.fallback_bank)
            .to_string();
        let account = self
            .mapping
            .account
            .and_then(|col| record.get(col))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.fallback_account)
            .to_string();

        let id = derive_id(
            &[date_str, &bank, &account, &label, amount_str, fee_str],
            seen_ids,
        );

        Ok(Transaction {
            id,
            bank_name: bank,
            account_name: account,
            amount,
            label,
            date,
            fee,
        })
    }
}

impl Reader for CsvExportReader {
    fn name(&self) -> &str {
        &self.name
    }

    fn sniff(&self, header: &[u8]) -> bool {
        let line = String::from_utf8_lossy(header);
        let line = line.trim_start_matches('\u{feff}').trim();
        line.eq_ignore_ascii_case(&self.header)
    }

    fn read(&self, content: &[u8]) -> MoneyManagerResult<Vec<Transaction>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(content);

        let mut seen_ids = HashSet::new();
        let mut transactions = Vec::new();
        for (row, result) in reader.records().enumerate() {
            let record = result
                .map_err(|e| MoneyManagerError::Import(format!("Row {}: {e}", row + 1)))?;
            transactions.push(self.parse_record(&record, row, &mut seen_ids)?);
        }
        Ok(transactions)
    }
}

/// Hash the identifying columns into a stable id, suffixing repeats so two
/// identical rows in one file stay distinct transactions
fn derive_id(parts: &[&str], seen: &mut HashSet<String>) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update([0]);
    }
    let base = hex::encode(&hasher.finalize()[..16]);

    let mut id = base.clone();
    let mut n = 0;
    while seen.contains(&id) {
        n += 1;
        id = format!("{base}-{n}");
    }
    seen.insert(id.clone());
    id
}

/// Parse a date, trying the primary format then common alternatives
fn parse_date(s: &str, primary_format: &str) -> Result<NaiveDate, String> {
    if let Ok(date) = NaiveDate::parse_from_str(s, primary_format) {
        return Ok(date);
    }

    let formats = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    for format in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Ok(date);
        }
    }

    Err(format!("Could not parse date: '{s}'"))
}

/// Parse an amount, tolerating currency symbols, grouping separators and
/// the accounting parentheses-negative convention
fn parse_amount(s: &str) -> Result<Decimal, String> {
    let cleaned: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}' && *c != '€' && *c != '$')
        .collect();

    let (negative, cleaned) = if cleaned.starts_with('(') && cleaned.ends_with(')') {
        (true, cleaned[1..cleaned.len() - 1].to_string())
    } else {
        (false, cleaned)
    };

    // When both separators appear, the rightmost one is the decimal point:
    // "1.234,56" is European grouping, "1,234.56" is US grouping. A lone
    // comma is a decimal separator ("-52,30").
    let normalized = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        _ => cleaned.replace(',', "."),
    };

    let amount: Decimal = normalized
        .parse()
        .map_err(|_| format!("Could not parse amount: '{s}'"))?;
    Ok(if negative { -amount } else { amount })
}
