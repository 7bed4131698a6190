use tracing_subscriber::EnvFilter;

const DEFAULT_LEVEL: &str = "info";

/// Installs the global subscriber. `RUST_LOG` overrides the default `info`
/// level. Output goes to stderr; stdout carries protocol responses.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    // A second call finds a subscriber already installed and is ignored.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_twice_is_harmless() {
        super::init();
        super::init();
        tracing::info!("logging initialised");
    }
}
