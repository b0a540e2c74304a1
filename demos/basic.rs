//! Basic usage example

use envparse::env;
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    // Print fallback warnings; set RUST_LOG=off to silence them
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install subscriber: {e}"))?;

    // Set environment variables for demonstration
    std::env::set_var("SERVER_ADDR", "0.0.0.0:3000");
    std::env::set_var("MAX_RETRIES", "abc");
    std::env::set_var("FEATURE_FLAGS", "search,export");
    std::env::set_var("ENABLE_CACHE", "1");

    let server_addr = env("SERVER_ADDR").def("127.0.0.1:8080".to_string()).as_str();
    // Malformed: falls back to 3 with a warning
    let max_retries = env("MAX_RETRIES").def(3).as_int();
    // Unset: falls back to 5s with a warning
    let lookup_timeout = env("LOOKUP_TIMEOUT")
        .def(Duration::from_secs(5))
        .as_duration();
    let feature_flags = env("FEATURE_FLAGS").def(Vec::<String>::new()).as_str_list();
    let enable_cache = env("ENABLE_CACHE").def(false).as_bool();

    println!("Configuration loaded:");
    println!("  Server Address: {}", server_addr);
    println!("  Max Retries: {}", max_retries);
    println!("  Lookup Timeout: {:?}", lookup_timeout);
    println!("  Feature Flags: {:?}", feature_flags);
    println!("  Enable Cache: {}", enable_cache);

    Ok(())
}
