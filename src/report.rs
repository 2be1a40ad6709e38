use serde::{Serialize, Serializer};
use std::fmt;
use tracing::debug;

use crate::error::{ReportError, ReportResult};
use crate::records::{aggregate, Aggregate, PRODUCT_FIELD, SALES_FIELD, STOCK_FIELD};

pub const HEADER: [&str; 4] = ["Product", "Total Sales", "Total Inventory", "Sales Ratio"];

/// Sales divided by inventory, held as an exact count of hundredths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SalesRatio(i128);

impl SalesRatio {
    /// Rounds `sales / inventory` to two decimals, ties away from zero.
    /// Zero or negative inventory gives a ratio of zero.
    pub fn compute(sales: i64, inventory: i64) -> Self {
        if inventory <= 0 {
            return Self(0);
        }

        let numerator = i128::from(sales) * 100;
        let denominator = i128::from(inventory);
        let magnitude = numerator.abs();
        let mut hundredths = magnitude / denominator;
        if (magnitude % denominator) * 2 >= denominator {
            hundredths += 1;
        }

        Self(if numerator < 0 { -hundredths } else { hundredths })
    }

    pub fn hundredths(&self) -> i128 {
        self.0
    }
}

impl fmt::Display for SalesRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct ReportRow {
    #[serde(rename = "Product")]
    pub product: String,
    #[serde(rename = "Total Sales")]
    pub total_sales: i64,
    #[serde(rename = "Total Inventory")]
    pub total_inventory: i64,
    #[serde(rename = "Sales Ratio", serialize_with = "serialize_ratio_2dp")]
    pub sales_ratio: SalesRatio,
}

#[derive(Debug, Default, PartialEq, Clone)]
pub struct Report {
    pub rows: Vec<ReportRow>,
}

impl Report {
    /// Renders the report as CSV. The header row is always written, even
    /// when there are no rows.
    pub fn to_csv(&self) -> ReportResult<String> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());

        wtr.write_record(HEADER).map_err(ReportError::render)?;
        for row in &self.rows {
            wtr.serialize(row).map_err(ReportError::render)?;
        }

        let bytes = wtr.into_inner().map_err(ReportError::render)?;
        String::from_utf8(bytes).map_err(ReportError::render)
    }
}

/// Joins the two aggregates, driven by sales: every sales product gets a row,
/// products only present in inventory are left out.
pub fn build_report(sales: &Aggregate, inventory: &Aggregate) -> Report {
    let rows = sales
        .iter()
        .map(|(product, total_sales)| {
            let total_inventory = inventory.get(product).unwrap_or(0);
            ReportRow {
                product: product.to_owned(),
                total_sales,
                total_inventory,
                sales_ratio: SalesRatio::compute(total_sales, total_inventory),
            }
        })
        .collect();

    Report { rows }
}

/// Aggregates both input tables and renders the joined report as CSV.
pub fn generate_report(sales_text: &str, inventory_text: &str) -> ReportResult<String> {
    let sales = aggregate(sales_text, PRODUCT_FIELD, SALES_FIELD)?;
    let inventory = aggregate(inventory_text, PRODUCT_FIELD, STOCK_FIELD)?;

    let report = build_report(&sales, &inventory);
    debug!(
        sales_products = sales.len(),
        inventory_products = inventory.len(),
        rows = report.rows.len(),
        "Built report"
    );

    report.to_csv()
}

fn serialize_ratio_2dp<S>(value: &SalesRatio, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(value)
}
