use std::collections::HashMap;

use crate::error::{ReportError, ReportResult};

pub const PRODUCT_FIELD: &str = "Product";
pub const SALES_FIELD: &str = "Sales";
pub const STOCK_FIELD: &str = "Stock";

/// One keyed input table: where it lives and which columns to sum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub key: String,
    pub key_field: &'static str,
    pub value_field: &'static str,
}

impl Dataset {
    pub const DEFAULT_SALES_KEY: &'static str = "sales/sample_sales.csv";
    pub const DEFAULT_INVENTORY_KEY: &'static str = "inventory/sample_inventory.csv";

    pub fn sales(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            key_field: PRODUCT_FIELD,
            value_field: SALES_FIELD,
        }
    }

    pub fn inventory(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            key_field: PRODUCT_FIELD,
            value_field: STOCK_FIELD,
        }
    }
}

/// Per-product totals, iterated in the order products were first seen.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Aggregate {
    totals: Vec<(String, i64)>,
    index: HashMap<String, usize>,
}

impl Aggregate {
    /// Adds `value` to the running total for `key`. Returns the new total, or
    /// `None` if it would overflow (the total is left unchanged).
    pub fn add(&mut self, key: &str, value: i64) -> Option<i64> {
        match self.index.get(key) {
            Some(&slot) => {
                let total = &mut self.totals[slot].1;
                *total = total.checked_add(value)?;
                Some(*total)
            }
            None => {
                self.index.insert(key.to_owned(), self.totals.len());
                self.totals.push((key.to_owned(), value));
                Some(value)
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<i64> {
        self.index.get(key).map(|&slot| self.totals[slot].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.totals.iter().map(|(key, total)| (key.as_str(), *total))
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

/// Sums `value_field` per distinct `key_field` over a headed CSV table.
pub fn aggregate(text: &str, key_field: &str, value_field: &str) -> ReportResult<Aggregate> {
    // The CSV reader buffers internally, a &[u8] is all it needs.
    let mut rdr = csv::Reader::from_reader(text.as_bytes());
    let headers = rdr
        .headers()
        .map_err(|e| ReportError::malformed_row(1, e))?
        .clone();

    let mut result = Aggregate::default();
    if headers.is_empty() {
        return Ok(result);
    }

    let key_col = column_index(&headers, key_field)?;
    let value_col = column_index(&headers, value_field)?;

    for row in rdr.records() {
        let row = row.map_err(|e| {
            let line = e.position().map_or(0, |p| p.line());
            ReportError::malformed_row(line, e)
        })?;
        let line = row.position().map_or(0, |p| p.line());

        let key = row.get(key_col).unwrap_or_default();
        let raw = row.get(value_col).unwrap_or_default();
        let value = trim_and_parse_i64(raw).map_err(|e| {
            ReportError::malformed_row(line, format!("{value_field} value {raw:?}: {e}"))
        })?;

        result.add(key, value).ok_or_else(|| {
            ReportError::malformed_row(line, format!("{value_field} total for {key:?} overflows"))
        })?;
    }

    Ok(result)
}

fn column_index(headers: &csv::StringRecord, field: &str) -> ReportResult<usize> {
    headers
        .iter()
        .position(|h| h.trim() == field)
        .ok_or_else(|| ReportError::malformed_row(1, format!("missing column {field:?}")))
}

fn trim_and_parse_i64(s: &str) -> Result<i64, std::num::ParseIntError> {
    s.trim().parse::<i64>()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALES: &str = "Product,Sales\nWidget,100\nWidget,50\nGadget,30\n";

    #[test]
    fn sums_duplicate_keys() {
        let totals = aggregate(SALES, "Product", "Sales").unwrap();

        assert_eq!(totals.len(), 2);
        assert_eq!(totals.get("Widget"), Some(150));
        assert_eq!(totals.get("Gadget"), Some(30));
        assert_eq!(totals.get("Gizmo"), None);
    }

    #[test]
    fn keeps_first_seen_order() {
        let text = "Product,Sales\nB,1\nA,2\nB,3\nC,4\nA,5\n";
        let totals = aggregate(text, "Product", "Sales").unwrap();

        let collected: Vec<_> = totals.iter().collect();
        assert_eq!(collected, vec![("B", 4), ("A", 7), ("C", 4)]);
    }

    #[test]
    fn reads_columns_by_header_name() {
        let text = "Warehouse,Stock,Product\nnorth,7,Widget\nsouth, 3 ,Widget\n";
        let totals = aggregate(text, "Product", "Stock").unwrap();

        assert_eq!(totals.get("Widget"), Some(10));
    }

    #[test]
    fn product_keys_are_kept_verbatim() {
        let text = "Product,Sales\n Widget ,1\nWidget,2\n Widget ,4\n";
        let totals = aggregate(text, "Product", "Sales").unwrap();

        let collected: Vec<_> = totals.iter().collect();
        assert_eq!(collected, vec![(" Widget ", 5), ("Widget", 2)]);
    }

    #[test]
    fn header_only_is_empty() {
        let totals = aggregate("Product,Sales\n", "Product", "Sales").unwrap();
        assert!(totals.is_empty());
    }

    #[test]
    fn empty_text_is_empty() {
        let totals = aggregate("", "Product", "Sales").unwrap();
        assert!(totals.is_empty());
    }

    #[test]
    fn non_integer_value_is_rejected() {
        let text = "Product,Sales\nWidget,100\nGadget,abc\n";
        let err = aggregate(text, "Product", "Sales").unwrap_err();

        match err {
            ReportError::MalformedRow { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("\"abc\""), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_value_is_rejected() {
        let text = "Product,Sales\nWidget,\n";
        let err = aggregate(text, "Product", "Sales").unwrap_err();
        assert!(matches!(err, ReportError::MalformedRow { line: 2, .. }));
    }

    #[test]
    fn missing_column_is_rejected() {
        let text = "Product,Quantity\nWidget,1\n";
        let err = aggregate(text, "Product", "Sales").unwrap_err();

        assert!(matches!(err, ReportError::MalformedRow { line: 1, .. }));
        assert!(err.to_string().contains("missing column \"Sales\""));
    }

    #[test]
    fn ragged_row_is_rejected() {
        let text = "Product,Sales\nWidget,1,extra\n";
        let err = aggregate(text, "Product", "Sales").unwrap_err();
        assert!(matches!(err, ReportError::MalformedRow { .. }));
    }

    #[test]
    fn overflowing_total_is_rejected() {
        let text = format!("Product,Sales\nWidget,{}\nWidget,1\n", i64::MAX);
        let err = aggregate(&text, "Product", "Sales").unwrap_err();
        assert!(matches!(err, ReportError::MalformedRow { line: 3, .. }));
    }

    #[test]
    fn dataset_columns() {
        let sales = Dataset::sales(Dataset::DEFAULT_SALES_KEY);
        assert_eq!(sales.key, "sales/sample_sales.csv");
        assert_eq!((sales.key_field, sales.value_field), ("Product", "Sales"));

        let inventory = Dataset::inventory("inventory/today.csv");
        assert_eq!(inventory.value_field, "Stock");
    }
}
