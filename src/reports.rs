use crate::aggregate::{average_by_group, highest_entry, lowest_entry, GroupField, ValueField};
use crate::error::AnalysisError;
use crate::forecast::{forecast, ForecastKind};
use crate::loader::{clean, CleanReport};
use crate::series::*;
use crate::types::*;
use crate::util::{format_number, format_optional, month_name};
use serde::Serialize;
use tracing::info;

/// Everything one run derives from an order log. Each call to [`analyze`]
/// builds a fresh value; nothing is kept between runs.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub clean_report: CleanReport,
    pub key_metrics: KeyMetrics,
    pub grouped: GroupedAverages,
    pub transport_delays: CategoryBars,
    pub seasonal_lead_times: SeasonalProfile,
    pub demand_vs_orders: DemandOrderSeries,
    pub variability: Vec<VariabilityPoint>,
    pub lead_time_series: PeriodSeries,
    pub bullwhip_series: PeriodSeries,
    pub lead_time_forecast: ForecastSeries,
    pub bullwhip_forecast: ForecastSeries,
}

/// Run the full pipeline over raw rows. Any fatal error aborts before a
/// result exists, so callers never see a partially filled analysis.
pub fn analyze(rows: &[RawRow]) -> Result<Analysis, AnalysisError> {
    let (records, clean_report) = clean(rows)?;

    let grouped = generate_grouped_averages(&records);
    let key_metrics = generate_key_metrics(&grouped)?;

    let lead_time_series = build_period_series(&records, ValueField::LeadTime);
    let bullwhip_series = build_bullwhip_series(&records);
    let lead_time_forecast = forecast(&lead_time_series, ForecastKind::Level)?;
    let bullwhip_forecast = forecast(&bullwhip_series, ForecastKind::Ratio)?;

    let analysis = Analysis {
        clean_report,
        key_metrics,
        grouped,
        transport_delays: build_transport_delays(&records),
        seasonal_lead_times: build_seasonal_profile(&records),
        demand_vs_orders: build_demand_order_series(&records),
        variability: build_variability_points(&records),
        lead_time_series,
        bullwhip_series,
        lead_time_forecast,
        bullwhip_forecast,
    };
    info!(
        records = analysis.clean_report.cleaned_rows,
        periods = analysis.lead_time_series.len(),
        "analysis complete"
    );
    Ok(analysis)
}

pub fn generate_grouped_averages(records: &[CleanRecord]) -> GroupedAverages {
    GroupedAverages {
        supplier_lead_times: average_by_group(records, GroupField::Supplier, ValueField::LeadTime),
        transport_mode_lead_times: average_by_group(
            records,
            GroupField::TransportationMode,
            ValueField::LeadTime,
        ),
        monthly_delays: average_by_group(records, GroupField::Month, ValueField::Delay),
        disruption_delays: average_by_group(records, GroupField::DisruptionType, ValueField::Delay),
        category_lead_times: average_by_group(
            records,
            GroupField::ProductCategory,
            ValueField::LeadTime,
        ),
    }
}

pub fn generate_key_metrics(grouped: &GroupedAverages) -> Result<KeyMetrics, AnalysisError> {
    Ok(KeyMetrics {
        highest_lead_supplier: highest_entry(&grouped.supplier_lead_times, "supplier lead time")?,
        lowest_lead_transport: lowest_entry(
            &grouped.transport_mode_lead_times,
            "transportation mode lead time",
        )?,
        highest_delay_month: highest_entry(&grouped.monthly_delays, "monthly delay")?,
        longest_delay_disruption: highest_entry(&grouped.disruption_delays, "disruption delay")?,
        shortest_lead_category: lowest_entry(&grouped.category_lead_times, "category lead time")?,
    })
}

fn metric_row(metric: &str, key: String, value: f64) -> MetricRow {
    MetricRow {
        metric: metric.to_string(),
        key,
        value: format!("{} days", format_number(value, 1)),
    }
}

pub fn key_metric_rows(m: &KeyMetrics) -> Vec<MetricRow> {
    let month = match &m.highest_delay_month.key {
        GroupKey::Number(n) => month_name(*n as u32).to_string(),
        other => other.to_string(),
    };
    vec![
        metric_row(
            "Supplier with highest avg lead time",
            m.highest_lead_supplier.key.to_string(),
            m.highest_lead_supplier.value,
        ),
        metric_row(
            "Transport mode with lowest avg lead time",
            m.lowest_lead_transport.key.to_string(),
            m.lowest_lead_transport.value,
        ),
        metric_row("Month with highest avg delay", month, m.highest_delay_month.value),
        metric_row(
            "Disruption with longest avg delay",
            m.longest_delay_disruption.key.to_string(),
            m.longest_delay_disruption.value,
        ),
        metric_row(
            "Category with shortest lead time",
            m.shortest_lead_category.key.to_string(),
            m.shortest_lead_category.value,
        ),
    ]
}

pub fn transport_delay_rows(bars: &CategoryBars) -> Vec<CategoryRow> {
    bars.labels
        .iter()
        .zip(&bars.values)
        .map(|(label, value)| CategoryRow {
            category: label.clone(),
            value: format_number(*value, 1),
        })
        .collect()
}

pub fn seasonal_rows(profile: &SeasonalProfile) -> Vec<CategoryRow> {
    profile
        .labels
        .iter()
        .zip(&profile.values)
        .map(|(label, value)| CategoryRow {
            category: label.clone(),
            value: format_optional(*value, 1),
        })
        .collect()
}

pub fn forecast_rows(series: &ForecastSeries, decimals: usize) -> Vec<ForecastRow> {
    series
        .labels
        .iter()
        .zip(series.historical.iter().zip(&series.forecast))
        .map(|(label, (historical, projected))| ForecastRow {
            period: label.clone(),
            historical: format_optional(*historical, decimals),
            forecast: format_optional(*projected, decimals),
        })
        .collect()
}
