use crate::error::{AnalysisError, LoadError};
use crate::types::*;
use crate::util::{days_between, parse_datetime_safe, parse_f64_safe};
use chrono::Datelike;
use csv::{ReaderBuilder, Trim};
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanReport {
    pub total_rows: usize,
    pub cleaned_rows: usize,
    /// Rows left out because at least one date failed to parse.
    pub dropped_rows: usize,
}

pub fn read_rows<P: AsRef<Path>>(path: P) -> Result<Vec<RawRow>, LoadError> {
    let file = File::open(path.as_ref())?;
    debug!(path = %path.as_ref().display(), "reading order log");
    read_rows_from(file)
}

/// Header-driven CSV read. Every record becomes a column-to-text map; blank
/// lines are skipped and short lines simply lack the trailing columns.
pub fn read_rows_from<R: Read>(reader: R) -> Result<Vec<RawRow>, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(LoadError::Empty);
    }
    info!(rows = rows.len(), "order log read");
    Ok(rows)
}

/// Columns of the first row's schema that are missing. Only the first row is
/// checked; later rows lacking a column degrade to empty/unparsable values.
pub fn missing_columns(first: &RawRow) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|col| !first.contains_key(**col))
        .map(|col| col.to_string())
        .collect()
}

/// Validate the batch and derive the temporal fields of every usable row.
///
/// A missing required column fails the whole batch. Rows with any unparsable
/// date are dropped and counted in the returned report; if that leaves
/// nothing, the batch has no usable data.
pub fn clean(rows: &[RawRow]) -> Result<(Vec<CleanRecord>, CleanReport), AnalysisError> {
    let Some(first) = rows.first() else {
        return Err(AnalysisError::NoUsableData);
    };
    let missing = missing_columns(first);
    if !missing.is_empty() {
        return Err(AnalysisError::Schema { missing });
    }

    let mut records = Vec::with_capacity(rows.len());
    let mut dropped_rows = 0usize;
    for row in rows {
        match clean_row(row) {
            Some(record) => records.push(record),
            None => dropped_rows += 1,
        }
    }

    if dropped_rows > 0 {
        warn!(dropped_rows, "rows skipped due to unparsable dates");
    }
    if records.is_empty() {
        return Err(AnalysisError::NoUsableData);
    }

    let report = CleanReport {
        total_rows: rows.len(),
        cleaned_rows: records.len(),
        dropped_rows,
    };
    info!(cleaned = report.cleaned_rows, total = report.total_rows, "records cleaned");
    Ok((records, report))
}

fn clean_row(row: &RawRow) -> Option<CleanRecord> {
    let field = |col: &str| row.get(col).map(String::as_str);
    let order_date = parse_datetime_safe(field(ORDER_DATE))?;
    let expected_date = parse_datetime_safe(field(EXPECTED_DELIVERY_DATE))?;
    let actual_date = parse_datetime_safe(field(ACTUAL_DELIVERY_DATE))?;

    let text = |col: &str| field(col).unwrap_or_default().trim().to_string();
    let extra = row
        .iter()
        .filter(|(k, _)| !REQUIRED_COLUMNS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    Some(CleanRecord {
        order_id: text(ORDER_ID),
        supplier: text(SUPPLIER),
        product_category: text(PRODUCT_CATEGORY),
        transportation_mode: text(TRANSPORTATION_MODE),
        supplier_location: text(SUPPLIER_LOCATION),
        disruption_type: text(DISRUPTION_TYPE),
        customer_demand: parse_f64_safe(field(CUSTOMER_DEMAND)),
        order_quantity: parse_f64_safe(field(ORDER_QUANTITY)),
        month: order_date.month(),
        year: order_date.year(),
        lead_time: days_between(order_date, actual_date).max(0),
        expected_lead_time: days_between(order_date, expected_date).max(0),
        delay: days_between(expected_date, actual_date),
        order_date,
        expected_date,
        actual_date,
        extra,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn order(order: &str, expected: &str, actual: &str) -> RawRow {
        raw(&[
            (ORDER_ID, "O-1"),
            (SUPPLIER, "Acme"),
            (ORDER_DATE, order),
            (EXPECTED_DELIVERY_DATE, expected),
            (ACTUAL_DELIVERY_DATE, actual),
            (PRODUCT_CATEGORY, "Tools"),
            (TRANSPORTATION_MODE, "Sea"),
            (SUPPLIER_LOCATION, "Busan"),
            (DISRUPTION_TYPE, "None"),
            (CUSTOMER_DEMAND, "120"),
            (ORDER_QUANTITY, "150"),
        ])
    }

    #[test]
    fn test_clean_derives_temporal_fields() {
        let (records, report) = clean(&[order("2024-03-01", "2024-03-11", "2024-03-14")]).unwrap();
        assert_eq!(report.cleaned_rows, 1);
        let r = &records[0];
        assert_eq!((r.year, r.month), (2024, 3));
        assert_eq!(r.lead_time, 13);
        assert_eq!(r.expected_lead_time, 10);
        assert_eq!(r.delay, 3);
        assert_eq!(r.customer_demand, Some(120.0));
        assert_eq!(r.order_quantity, Some(150.0));
    }

    #[test]
    fn test_clean_clamps_lead_times_but_not_delay() {
        // delivered "before" it was ordered, and well ahead of schedule
        let (records, _) = clean(&[order("2024-03-10", "2024-03-05", "2024-03-01")]).unwrap();
        let r = &records[0];
        assert_eq!(r.lead_time, 0);
        assert_eq!(r.expected_lead_time, 0);
        assert_eq!(r.delay, -4);
    }

    #[test]
    fn test_clean_early_half_days_round_up() {
        let rows = vec![
            order("2024-01-01 00:00", "2024-01-03 00:00", "2024-01-02 12:00"),
            order("2024-01-01 00:00", "2024-01-03 00:00", "2024-01-01 12:00"),
        ];
        let (records, _) = clean(&rows).unwrap();
        assert_eq!(records[0].delay, 0);
        assert_eq!(records[1].delay, -1);
    }

    #[test]
    fn test_clean_accepts_rfc3339_timestamps() {
        let rows = vec![order(
            "2024-01-01T00:00:00Z",
            "2024-01-03T00:00:00Z",
            "2024-01-04T00:00:00.000Z",
        )];
        let (records, report) = clean(&rows).unwrap();
        assert_eq!(report.dropped_rows, 0);
        assert_eq!(records[0].lead_time, 3);
        assert_eq!(records[0].expected_lead_time, 2);
        assert_eq!(records[0].delay, 1);
    }

    #[test]
    fn test_clean_drops_unparsable_dates() {
        let rows = vec![
            order("2024-01-01", "2024-01-05", "2024-01-06"),
            order("2024-01-02", "2024-01-05", "soon"),
            order("2024-01-03", "2024-01-07", "2024-01-07"),
        ];
        let (records, report) = clean(&rows).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(report.dropped_rows, 1);
        assert_eq!(report.total_rows, 3);
    }

    #[test]
    fn test_clean_schema_error_lists_missing_columns() {
        let mut row = order("2024-01-01", "2024-01-05", "2024-01-06");
        row.remove(SUPPLIER);
        row.remove(ORDER_QUANTITY);
        let err = clean(&[row]).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::Schema {
                missing: vec![SUPPLIER.to_string(), ORDER_QUANTITY.to_string()]
            }
        );
    }

    #[test]
    fn test_clean_checks_only_first_row_schema() {
        let mut second = order("2024-01-02", "2024-01-05", "2024-01-06");
        second.remove(SUPPLIER);
        let rows = vec![order("2024-01-01", "2024-01-05", "2024-01-06"), second];
        let (records, _) = clean(&rows).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].supplier, "");
    }

    #[test]
    fn test_clean_all_dropped_is_no_usable_data() {
        let rows = vec![order("bad", "2024-01-05", "2024-01-06")];
        assert_eq!(clean(&rows).unwrap_err(), AnalysisError::NoUsableData);
        assert_eq!(clean(&[]).unwrap_err(), AnalysisError::NoUsableData);
    }

    #[test]
    fn test_read_rows_from_csv_text() {
        let csv = "Order_ID,Supplier,Notes\nO-1, Acme ,rush\n\nO-2,Globex\n";
        let rows = read_rows_from(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Supplier"], "Acme");
        assert_eq!(rows[0]["Notes"], "rush");
        assert!(!rows[1].contains_key("Notes"));
    }

    #[test]
    fn test_read_rows_header_only_is_empty() {
        let err = read_rows_from("Order_ID,Supplier\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Empty));
    }
}
