use tracing_subscriber::EnvFilter;

// builds the log filter from a directive such as `info` or `bookstore=debug,tower_http=warn`,
// an unparseable directive falls back to info
pub(crate) fn log_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

// required to enable CloudWatch error logging by the runtime
pub fn setup_tracing(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(level))
        // disable printing the name of the module in every log line.
        .with_target(false)
        // this needs to be set to false, otherwise ANSI color codes will
        // show up in a confusing manner in CloudWatch logs.
        .with_ansi(false)
        // disabling time is handy because CloudWatch will add the ingestion time.
        .without_time()
        .json()
        .try_init();
}
