//! Flow command-line front end.
//!
//! The binary (`flow`) is a thin layer over `flow_eval`: it reads script
//! text, runs it, and turns errors and `exit` requests into process exit
//! statuses.

pub mod commands;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber.
///
/// Does nothing unless `FLOW_LOG` or `RUST_LOG` is set; the variable holds an
/// `EnvFilter` directive such as `flow_eval=debug`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        let directives = std::env::var("FLOW_LOG").or_else(|_| std::env::var("RUST_LOG"));
        if let Ok(directives) = directives {
            tracing_subscriber::registry()
                .with(EnvFilter::new(directives))
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_bracketed_fields(true),
                )
                .init();
        }
    });
}
