use libcnb::data::buildpack::Buildpack as BuildpackInfo;
use sui_buildpack::domain::config::{ConfigurationRow, ValueSource};
use tracing_subscriber::EnvFilter;

/// Install the log subscriber. Repeated calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .try_init();
}

pub fn header(buildpack: &BuildpackInfo) {
    let name = buildpack
        .name
        .clone()
        .unwrap_or_else(|| buildpack.id.to_string());
    println!(
        "{} {}",
        console::style(name).bold(),
        console::style(buildpack.version.to_string()).dim()
    );
}

/// Print the resolved configuration, one option per line
pub fn configuration(rows: &[ConfigurationRow]) {
    if rows.is_empty() {
        return;
    }

    println!("  {}", console::style("Build Configuration:").bold());
    for line in configuration_lines(rows) {
        println!("{}", line);
    }
}

pub fn configuration_lines(rows: &[ConfigurationRow]) -> Vec<String> {
    let width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0);

    rows.iter()
        .map(|row| {
            let source = match row.source {
                ValueSource::Environment => "",
                ValueSource::Default => " (default)",
                ValueSource::Unset => " (unset)",
            };
            let mut line = format!("    ${:<width$}  {}{}", row.name, row.value, source, width = width);
            if !row.description.is_empty() {
                line.push_str(&format!("  {}", row.description));
            }
            line
        })
        .collect()
}

pub fn error(error: &libcnb::Error<anyhow::Error>) {
    let lines = match error {
        libcnb::Error::BuildpackError(e) => error_lines(e),
        other => other.to_string().lines().map(str::to_string).collect(),
    };

    eprintln!("\n{}", console::style("[Error: Sui buildpack failed]").red().bold());
    for line in lines {
        eprintln!("{} {}", console::style("  |").red(), line);
    }
}

/// The outermost message, then one `caused by:` line per underlying error
pub fn error_lines(error: &anyhow::Error) -> Vec<String> {
    error
        .chain()
        .enumerate()
        .map(|(i, cause)| match i {
            0 => cause.to_string(),
            _ => format!("  caused by: {}", cause),
        })
        .collect()
}
