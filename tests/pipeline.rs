use std::io::Write;
use supply_report::output::{export_analysis, BULLWHIP_FORECAST_FILE, LEAD_TIME_FORECAST_FILE};
use supply_report::types::GroupKey;
use supply_report::{analyze, clean, read_rows, AnalysisError, LoadError};
use tempfile::NamedTempFile;

const HEADER: &str = "Order_ID,Supplier,Order_Date,Expected_Delivery_Date,Actual_Delivery_Date,Product_Category,Transportation_Mode,Supplier_Location,Disruption_Type,Customer_Demand,Order_Quantity";

fn write_csv(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", lines.join("\n")).unwrap();
    file
}

fn four_months_constant_lead_time() -> Vec<&'static str> {
    vec![
        HEADER,
        "O-1,Acme,2024-01-03,2024-01-08,2024-01-08,Tools,Sea,Busan,None,100,120",
        "O-2,Globex,2024-01-20,2024-01-24,2024-01-25,Parts,Air,Lyon,Weather,80,90",
        "O-3,Acme,2024-02-05,2024-02-10,2024-02-10,Tools,Sea,Busan,None,110,150",
        "O-4,Initech,2024-03-11,2024-03-14,2024-03-16,Food,Road,Austin,Strike,95,95",
        "O-5,Globex,2024-04-01,2024-04-07,2024-04-06,Parts,Air,Lyon,None,105,100",
    ]
}

#[test]
fn test_constant_lead_time_forecasts_flat() {
    let file = write_csv(&four_months_constant_lead_time());
    let rows = read_rows(file.path()).unwrap();
    let analysis = analyze(&rows).unwrap();

    assert_eq!(analysis.lead_time_series.values(), vec![5.0, 5.0, 5.0, 5.0]);
    let f = &analysis.lead_time_forecast;
    assert_eq!(f.len(), 7);
    assert_eq!(&f.labels[4..], &["May 2024", "Jun 2024", "Jul 2024"]);
    assert_eq!(f.forecast_values(), vec![5.0, 5.0, 5.0]);
    assert!(f.forecast[..4].iter().all(Option::is_none));
    assert!(f.historical[4..].iter().all(Option::is_none));
}

#[test]
fn test_missing_supplier_column_is_schema_error() {
    let file = write_csv(&[
        "Order_ID,Order_Date,Expected_Delivery_Date,Actual_Delivery_Date,Product_Category,Transportation_Mode,Supplier_Location,Disruption_Type,Customer_Demand,Order_Quantity",
        "O-1,2024-01-03,2024-01-08,2024-01-08,Tools,Sea,Busan,None,100,120",
    ]);
    let rows = read_rows(file.path()).unwrap();
    let err = analyze(&rows).unwrap_err();
    assert_eq!(
        err,
        AnalysisError::Schema {
            missing: vec!["Supplier".to_string()]
        }
    );
    assert!(err.to_string().contains("Supplier"));
}

#[test]
fn test_unparsable_actual_date_row_is_excluded() {
    let file = write_csv(&[
        HEADER,
        "O-1,Acme,2024-01-03,2024-01-08,2024-01-08,Tools,Sea,Busan,None,100,120",
        "O-2,Acme,2024-01-04,2024-01-08,pending,Tools,Sea,Busan,None,100,120",
        "O-3,Acme,2024-01-05,2024-01-08,2024-01-09,Tools,Sea,Busan,None,100,120",
    ]);
    let rows = read_rows(file.path()).unwrap();
    let (records, report) = clean(&rows).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(report.dropped_rows, 1);
    assert!(records.iter().all(|r| r.lead_time >= 0 && r.expected_lead_time >= 0));
}

#[test]
fn test_two_periods_is_insufficient_history() {
    let file = write_csv(&[
        HEADER,
        "O-1,Acme,2024-01-03,2024-01-08,2024-01-08,Tools,Sea,Busan,None,100,120",
        "O-2,Acme,2024-02-03,2024-02-08,2024-02-08,Tools,Sea,Busan,None,100,120",
    ]);
    let rows = read_rows(file.path()).unwrap();
    assert_eq!(
        analyze(&rows).unwrap_err(),
        AnalysisError::InsufficientHistory {
            needed: 3,
            available: 2
        }
    );
}

#[test]
fn test_key_metrics_and_charts() {
    let file = write_csv(&four_months_constant_lead_time());
    let analysis = analyze(&read_rows(file.path()).unwrap()).unwrap();
    let m = &analysis.key_metrics;

    // Every lead time is 5, so the first key in order wins ties.
    assert_eq!(m.highest_lead_supplier.key, GroupKey::Text("Acme".to_string()));
    assert_eq!(m.highest_lead_supplier.value, 5.0);
    assert_eq!(m.lowest_lead_transport.key, GroupKey::Text("Air".to_string()));
    // Jan: (0 + 1) / 2, Mar: 2
    assert_eq!(m.highest_delay_month.key, GroupKey::Number(3));
    assert_eq!(m.highest_delay_month.value, 2.0);
    assert_eq!(m.longest_delay_disruption.key, GroupKey::Text("Strike".to_string()));

    assert_eq!(analysis.grouped.supplier_lead_times.len(), 3);
    assert_eq!(analysis.transport_delays.labels, vec!["Air", "Road", "Sea"]);
    assert_eq!(analysis.seasonal_lead_times.values[0], Some(5.0));
    assert_eq!(analysis.seasonal_lead_times.values[11], None);
    assert_eq!(analysis.demand_vs_orders.labels.len(), 4);
    assert_eq!(analysis.demand_vs_orders.customer_demand[0], Some(90.0));
    assert!(analysis.bullwhip_series.values().iter().all(|r| *r >= 0.0));
    assert!(analysis.bullwhip_forecast.forecast_values().iter().all(|r| *r >= 1.0));
    assert_eq!(analysis.variability.len(), 5);
}

#[test]
fn test_rerun_does_not_leak_previous_records() {
    let first = write_csv(&four_months_constant_lead_time());
    let a = analyze(&read_rows(first.path()).unwrap()).unwrap();

    let mut lines = four_months_constant_lead_time();
    lines.truncate(4);
    lines.push("O-9,Umbrella,2024-05-01,2024-05-04,2024-05-04,Tools,Rail,Kyiv,None,50,50");
    let second = write_csv(&lines);
    let b = analyze(&read_rows(second.path()).unwrap()).unwrap();

    assert_eq!(a.clean_report.cleaned_rows, 5);
    assert_eq!(b.clean_report.cleaned_rows, 4);
    assert!(!b
        .grouped
        .supplier_lead_times
        .contains_key(&GroupKey::Text("Initech".to_string())));
    assert_eq!(b.lead_time_series.labels(), vec!["Jan 2024", "Feb 2024", "May 2024"]);
}

#[test]
fn test_header_only_file_is_empty() {
    let file = write_csv(&[HEADER]);
    assert!(matches!(read_rows(file.path()), Err(LoadError::Empty)));
}

#[test]
fn test_export_writes_json_and_forecast_csvs() {
    let file = write_csv(&four_months_constant_lead_time());
    let analysis = analyze(&read_rows(file.path()).unwrap()).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let written = export_analysis(dir.path(), &analysis).unwrap();
    assert_eq!(written.len(), 3);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&written[0]).unwrap()).unwrap();
    assert_eq!(json["clean_report"]["cleaned_rows"], 5);
    assert_eq!(json["grouped"]["monthly_delays"]["3"], 2.0);
    assert_eq!(json["key_metrics"]["highest_delay_month"]["key"], 3);

    let lead = std::fs::read_to_string(dir.path().join(LEAD_TIME_FORECAST_FILE)).unwrap();
    assert!(lead.starts_with("Period,Historical,Forecast"));
    assert!(lead.contains("Jul 2024,-,5.00"));
    assert!(dir.path().join(BULLWHIP_FORECAST_FILE).exists());
}
