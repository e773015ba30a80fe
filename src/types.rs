use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use tabled::Tabled;

use crate::util::month_name;

/// One input line, column name to raw text, as read from the CSV header.
pub type RawRow = BTreeMap<String, String>;

pub const ORDER_ID: &str = "Order_ID";
pub const SUPPLIER: &str = "Supplier";
pub const ORDER_DATE: &str = "Order_Date";
pub const EXPECTED_DELIVERY_DATE: &str = "Expected_Delivery_Date";
pub const ACTUAL_DELIVERY_DATE: &str = "Actual_Delivery_Date";
pub const PRODUCT_CATEGORY: &str = "Product_Category";
pub const TRANSPORTATION_MODE: &str = "Transportation_Mode";
pub const SUPPLIER_LOCATION: &str = "Supplier_Location";
pub const DISRUPTION_TYPE: &str = "Disruption_Type";
pub const CUSTOMER_DEMAND: &str = "Customer_Demand";
pub const ORDER_QUANTITY: &str = "Order_Quantity";

/// Columns every input must carry, in the order they are reported when missing.
pub const REQUIRED_COLUMNS: [&str; 11] = [
    ORDER_ID,
    SUPPLIER,
    ORDER_DATE,
    EXPECTED_DELIVERY_DATE,
    ACTUAL_DELIVERY_DATE,
    PRODUCT_CATEGORY,
    TRANSPORTATION_MODE,
    SUPPLIER_LOCATION,
    DISRUPTION_TYPE,
    CUSTOMER_DEMAND,
    ORDER_QUANTITY,
];

/// A validated order with its derived temporal fields. Built once per usable
/// input row and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct CleanRecord {
    pub order_id: String,
    pub supplier: String,
    pub product_category: String,
    pub transportation_mode: String,
    pub supplier_location: String,
    pub disruption_type: String,
    pub customer_demand: Option<f64>,
    pub order_quantity: Option<f64>,
    pub order_date: NaiveDateTime,
    pub expected_date: NaiveDateTime,
    pub actual_date: NaiveDateTime,
    /// 1..=12, taken from `order_date`.
    pub month: u32,
    pub year: i32,
    /// Order to actual delivery, never below 0.
    pub lead_time: i64,
    /// Order to expected delivery, never below 0.
    pub expected_lead_time: i64,
    /// Actual minus expected delivery; negative means early.
    pub delay: i64,
    /// Columns outside the required set, carried through untouched.
    pub extra: BTreeMap<String, String>,
}

/// Key of a grouped aggregate: a text column (supplier, mode, ...) or a small
/// integer column (month, year).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    Number(i64),
    Text(String),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Number(n) => write!(f, "{}", n),
            GroupKey::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for GroupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GroupKey::Number(n) => serializer.serialize_i64(*n),
            GroupKey::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// Group key to arithmetic mean of the grouped field.
pub type GroupedAverage = BTreeMap<GroupKey, f64>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extremum {
    pub key: GroupKey,
    pub value: f64,
}

/// Calendar year-month bucket. Field order gives the derived `Ord` its
/// (year, month) tuple comparison, so periods sort correctly across years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PeriodKey {
    pub year: i32,
    pub month: u32,
}

impl PeriodKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Zero-padded `YYYY-MM`, lexically ordered the same way as the key.
    pub fn sort_key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Human label such as `Mar 2024`.
    pub fn label(&self) -> String {
        format!("{} {}", month_name(self.month), self.year)
    }

    /// The following calendar month, wrapping December into January.
    pub fn next(&self) -> Self {
        if self.month >= 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodPoint {
    pub period: PeriodKey,
    pub label: String,
    pub value: f64,
}

/// Ordered per-period values, at most one point per (year, month).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeriodSeries {
    pub points: Vec<PeriodPoint>,
}

impl PeriodSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        self.points.iter().map(|p| p.label.clone()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn last_period(&self) -> Option<PeriodKey> {
        self.points.last().map(|p| p.period)
    }
}

/// Historical and forecast values on one shared label axis. Each side is
/// `None` over the other side's domain so both plot as one continuous line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSeries {
    pub labels: Vec<String>,
    pub historical: Vec<Option<f64>>,
    pub forecast: Vec<Option<f64>>,
}

impl ForecastSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Just the extrapolated values, in order.
    pub fn forecast_values(&self) -> Vec<f64> {
        self.forecast.iter().flatten().copied().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBars {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Jan..Dec profile; months without records have no value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalProfile {
    pub labels: Vec<String>,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandOrderSeries {
    pub labels: Vec<String>,
    pub customer_demand: Vec<Option<f64>>,
    pub order_quantity: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariabilityPoint {
    pub supplier: String,
    pub period: String,
    /// Order quantity variability, percent.
    pub x: f64,
    /// Lead time variability, percent.
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyMetrics {
    pub highest_lead_supplier: Extremum,
    pub lowest_lead_transport: Extremum,
    pub highest_delay_month: Extremum,
    pub longest_delay_disruption: Extremum,
    pub shortest_lead_category: Extremum,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedAverages {
    pub supplier_lead_times: GroupedAverage,
    pub transport_mode_lead_times: GroupedAverage,
    pub monthly_delays: GroupedAverage,
    pub disruption_delays: GroupedAverage,
    pub category_lead_times: GroupedAverage,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MetricRow {
    #[serde(rename = "Metric")]
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[serde(rename = "Key")]
    #[tabled(rename = "Key")]
    pub key: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CategoryRow {
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ForecastRow {
    #[serde(rename = "Period")]
    #[tabled(rename = "Period")]
    pub period: String,
    #[serde(rename = "Historical")]
    #[tabled(rename = "Historical")]
    pub historical: String,
    #[serde(rename = "Forecast")]
    #[tabled(rename = "Forecast")]
    pub forecast: String,
}
