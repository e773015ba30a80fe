use crate::aggregate::{average_by_group, GroupField, ValueField};
use crate::types::*;
use crate::util::{average, coefficient_of_variation, MONTH_NAMES};
use std::collections::BTreeMap;

/// Records bucketed by calendar period, in period order.
pub fn bucket_by_period(records: &[CleanRecord]) -> BTreeMap<PeriodKey, Vec<&CleanRecord>> {
    let mut buckets: BTreeMap<PeriodKey, Vec<&CleanRecord>> = BTreeMap::new();
    for r in records {
        buckets
            .entry(PeriodKey::new(r.year, r.month))
            .or_default()
            .push(r);
    }
    buckets
}

fn point(period: PeriodKey, value: f64) -> PeriodPoint {
    PeriodPoint {
        period,
        label: period.label(),
        value,
    }
}

fn field_values(members: &[&CleanRecord], field: ValueField) -> Vec<f64> {
    members.iter().filter_map(|r| field.value_of(r)).collect()
}

/// Mean of `field` per period. Periods where no record carries the field are
/// left out rather than given a made-up value.
pub fn build_period_series(records: &[CleanRecord], field: ValueField) -> PeriodSeries {
    let points = bucket_by_period(records)
        .into_iter()
        .filter_map(|(period, members)| {
            average(&field_values(&members, field)).map(|v| point(period, v))
        })
        .collect();
    PeriodSeries { points }
}

/// Order variability over demand variability for one set of records. A
/// period whose demand does not vary reports 1 (no amplification detectable).
pub fn bullwhip_ratio(members: &[&CleanRecord]) -> f64 {
    let demand_cv = coefficient_of_variation(&field_values(members, ValueField::CustomerDemand)).abs();
    let order_cv = coefficient_of_variation(&field_values(members, ValueField::OrderQuantity)).abs();
    if demand_cv > 0.0 {
        order_cv / demand_cv
    } else {
        1.0
    }
}

pub fn build_bullwhip_series(records: &[CleanRecord]) -> PeriodSeries {
    let points = bucket_by_period(records)
        .into_iter()
        .map(|(period, members)| point(period, bullwhip_ratio(&members)))
        .collect();
    PeriodSeries { points }
}

/// Mean demand and mean order quantity on one shared period axis.
pub fn build_demand_order_series(records: &[CleanRecord]) -> DemandOrderSeries {
    let buckets = bucket_by_period(records);
    let mut out = DemandOrderSeries {
        labels: Vec::with_capacity(buckets.len()),
        customer_demand: Vec::with_capacity(buckets.len()),
        order_quantity: Vec::with_capacity(buckets.len()),
    };
    for (period, members) in buckets {
        out.labels.push(period.label());
        out.customer_demand
            .push(average(&field_values(&members, ValueField::CustomerDemand)));
        out.order_quantity
            .push(average(&field_values(&members, ValueField::OrderQuantity)));
    }
    out
}

/// Mean lead time per calendar month (all years folded together), Jan..Dec.
pub fn build_seasonal_profile(records: &[CleanRecord]) -> SeasonalProfile {
    let by_month = average_by_group(records, GroupField::Month, ValueField::LeadTime);
    let values = (1..=12i64)
        .map(|m| by_month.get(&GroupKey::Number(m)).copied())
        .collect();
    SeasonalProfile {
        labels: MONTH_NAMES.iter().map(|m| m.to_string()).collect(),
        values,
    }
}

/// Mean delay per transportation mode, in mode order.
pub fn build_transport_delays(records: &[CleanRecord]) -> CategoryBars {
    let avg = average_by_group(records, GroupField::TransportationMode, ValueField::Delay);
    CategoryBars {
        labels: avg.keys().map(|k| k.to_string()).collect(),
        values: avg.values().copied().collect(),
    }
}

/// One scatter point per (supplier, period): order quantity variability
/// against lead time variability.
pub fn build_variability_points(records: &[CleanRecord]) -> Vec<VariabilityPoint> {
    let mut groups: BTreeMap<(&str, PeriodKey), Vec<&CleanRecord>> = BTreeMap::new();
    for r in records {
        groups
            .entry((r.supplier.as_str(), PeriodKey::new(r.year, r.month)))
            .or_default()
            .push(r);
    }
    groups
        .into_iter()
        .map(|((supplier, period), members)| VariabilityPoint {
            supplier: supplier.to_string(),
            period: period.label(),
            x: coefficient_of_variation(&field_values(&members, ValueField::OrderQuantity)),
            y: coefficient_of_variation(&field_values(&members, ValueField::LeadTime)),
        })
        .filter(|p| p.x.is_finite() && p.y.is_finite())
        .collect()
}
