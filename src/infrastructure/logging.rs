use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber. Output goes to stderr so that stdout stays
/// reserved for data; `RUST_LOG` overrides `default_filter`.
pub fn init_tracing(default_filter: &str) {
    init_tracing_with(default_filter, &[]);
}

/// Same as [`init_tracing`], with `forced` directives applied on top of
/// whatever `RUST_LOG` says.
pub fn init_tracing_with(default_filter: &str, forced: &[&str]) {
    tracing_subscriber::registry()
        .with(env_filter(default_filter, forced))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Filter from `RUST_LOG` (or `default_filter`) plus `forced` directives.
/// A forced directive for a target replaces any `RUST_LOG` directive for the
/// same target, so `RUST_LOG=off` cannot silence it.
pub fn env_filter(default_filter: &str, forced: &[&str]) -> EnvFilter {
    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    for directive in forced {
        match directive.parse() {
            Ok(d) => filter = filter.add_directive(d),
            Err(e) => eprintln!("ignoring log directive {}: {}", directive, e),
        }
    }
    filter
}
