use tracing_subscriber::EnvFilter;

/// Send diagnostics to stderr so stdout carries only results.
///
/// `--verbose` forces `debug`; otherwise `RUST_LOG` wins over the `warn`
/// default.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
