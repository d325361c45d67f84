use anyhow::Result;
use num_format::{CustomFormat, Grouping, ToFormattedString};
use tracing::Level;

pub(super) fn init_logging(verbose: bool) {
    tracing_subscriber::fmt()
        .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
        .init();
}

pub(super) fn format_population(population: usize) -> Result<String> {
    let fmt = CustomFormat::builder()
        .grouping(Grouping::Standard)
        .separator("_")
        .build()?;
    Ok(population.to_formatted_string(&fmt))
}
