use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "inkboard=info";

/// Pick the filter directive: `RUST_LOG` wins, then the settings value, then `inkboard=info`.
pub fn filter_directive(settings_filter: Option<&str>) -> String {
    std::env::var("RUST_LOG")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| settings_filter.map(str::to_owned))
        .unwrap_or_else(|| DEFAULT_FILTER.to_owned())
}

/// Install the global fmt subscriber. Calling this again is a no-op.
pub fn init(settings_filter: Option<&str>) {
    let directive = filter_directive(settings_filter);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
