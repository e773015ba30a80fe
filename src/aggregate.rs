use crate::error::AnalysisError;
use crate::types::{CleanRecord, Extremum, GroupKey, GroupedAverage};
use std::collections::BTreeMap;

pub use crate::util::coefficient_of_variation;

/// Column a set of records can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    Supplier,
    TransportationMode,
    ProductCategory,
    SupplierLocation,
    DisruptionType,
    Month,
    Year,
}

impl GroupField {
    /// Group key of a record, `None` when the column is empty.
    pub fn key_of(self, r: &CleanRecord) -> Option<GroupKey> {
        let text = |s: &str| (!s.is_empty()).then(|| GroupKey::Text(s.to_string()));
        match self {
            GroupField::Supplier => text(&r.supplier),
            GroupField::TransportationMode => text(&r.transportation_mode),
            GroupField::ProductCategory => text(&r.product_category),
            GroupField::SupplierLocation => text(&r.supplier_location),
            GroupField::DisruptionType => text(&r.disruption_type),
            GroupField::Month => Some(GroupKey::Number(r.month as i64)),
            GroupField::Year => Some(GroupKey::Number(r.year as i64)),
        }
    }
}

/// Numeric column that can be averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueField {
    LeadTime,
    ExpectedLeadTime,
    Delay,
    CustomerDemand,
    OrderQuantity,
}

impl ValueField {
    pub fn value_of(self, r: &CleanRecord) -> Option<f64> {
        match self {
            ValueField::LeadTime => Some(r.lead_time as f64),
            ValueField::ExpectedLeadTime => Some(r.expected_lead_time as f64),
            ValueField::Delay => Some(r.delay as f64),
            ValueField::CustomerDemand => r.customer_demand,
            ValueField::OrderQuantity => r.order_quantity,
        }
    }
}

/// Mean of `value` per distinct `group` key. Records with an empty key or a
/// missing value count toward no group.
pub fn average_by_group(
    records: &[CleanRecord],
    group: GroupField,
    value: ValueField,
) -> GroupedAverage {
    let mut acc: BTreeMap<GroupKey, (f64, usize)> = BTreeMap::new();
    for r in records {
        let (Some(key), Some(v)) = (group.key_of(r), value.value_of(r)) else {
            continue;
        };
        let e = acc.entry(key).or_insert((0.0, 0));
        e.0 += v;
        e.1 += 1;
    }
    acc.into_iter()
        .map(|(key, (sum, count))| (key, sum / count as f64))
        .collect()
}

/// Entry with the largest mean. Ties keep the first key in key order.
pub fn highest_entry(averages: &GroupedAverage, metric: &str) -> Result<Extremum, AnalysisError> {
    pick_entry(averages, metric, |candidate, best| candidate > best)
}

/// Entry with the smallest mean. Ties keep the first key in key order.
pub fn lowest_entry(averages: &GroupedAverage, metric: &str) -> Result<Extremum, AnalysisError> {
    pick_entry(averages, metric, |candidate, best| candidate < best)
}

fn pick_entry(
    averages: &GroupedAverage,
    metric: &str,
    better: impl Fn(f64, f64) -> bool,
) -> Result<Extremum, AnalysisError> {
    averages
        .iter()
        .fold(None::<(&GroupKey, f64)>, |best, (key, value)| match best {
            Some((_, b)) if !better(*value, b) => best,
            _ => Some((key, *value)),
        })
        .map(|(key, value)| Extremum {
            key: key.clone(),
            value,
        })
        .ok_or_else(|| AnalysisError::EmptyAggregate(metric.to_string()))
}
