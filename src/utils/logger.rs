use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "ecs_describer=debug,aws_config=info,warn"
    } else {
        "ecs_describer=info,warn"
    }
}

/// `RUST_LOG` wins over the built-in directive when it is set.
fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

pub fn init_cli_logger(verbose: bool) {
    // stdout carries the snapshot, so logs go to stderr
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_lambda_logger() {
    tracing_subscriber::registry()
        .with(env_filter(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .json()
                .with_current_span(false),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_keeps_sdk_noise_down() {
        assert_eq!(default_directive(false), "ecs_describer=info,warn");
        assert!(default_directive(true).starts_with("ecs_describer=debug"));
        assert!(default_directive(true).ends_with(",warn"));
        assert!(EnvFilter::try_new(default_directive(true)).is_ok());
    }
}
