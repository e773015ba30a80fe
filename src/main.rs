// Entry point and high-level CLI flow.
//
// One run reads the order log, cleans it, prints the key metrics and
// forecasts as markdown tables, and (unless --no-export) writes the full
// analysis as JSON plus one CSV per forecast.
use clap::Parser;
use std::process::ExitCode;
use supply_report::config::{init_logging, Cli};
use supply_report::output::{export_analysis, preview_table_rows};
use supply_report::reports::{forecast_rows, key_metric_rows, seasonal_rows, transport_delay_rows};
use supply_report::util::format_int;
use supply_report::{analyze, read_rows, Analysis};

fn print_analysis(analysis: &Analysis, max_rows: usize) {
    let report = &analysis.clean_report;
    println!(
        "Processing dataset... ({} rows loaded, {} usable)",
        format_int(report.total_rows),
        format_int(report.cleaned_rows)
    );
    if report.dropped_rows > 0 {
        println!(
            "Note: {} rows skipped due to unparsable dates.",
            format_int(report.dropped_rows)
        );
    }
    println!();

    println!("Key Metrics\n");
    preview_table_rows(&key_metric_rows(&analysis.key_metrics), max_rows);

    println!("Transportation Mode Impact on Delays (avg days)\n");
    preview_table_rows(&transport_delay_rows(&analysis.transport_delays), max_rows);

    println!("Seasonal Lead Time Pattern (avg days)\n");
    preview_table_rows(&seasonal_rows(&analysis.seasonal_lead_times), 12);

    println!("Lead Time Forecast (days)\n");
    let lead = forecast_rows(&analysis.lead_time_forecast, 1);
    preview_table_rows(&lead[lead.len().saturating_sub(max_rows + 3)..], max_rows + 3);

    println!("Bullwhip Ratio Forecast\n");
    let bullwhip = forecast_rows(&analysis.bullwhip_forecast, 2);
    preview_table_rows(&bullwhip[bullwhip.len().saturating_sub(max_rows + 3)..], max_rows + 3);
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let rows = read_rows(&cli.input)?;
    let analysis = analyze(&rows)?;
    print_analysis(&analysis, cli.preview_rows);

    if !cli.no_export {
        for path in export_analysis(&cli.out_dir, &analysis)? {
            println!("(Exported to {})", path.display());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
