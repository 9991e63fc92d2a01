//! Startup utilities.

use kedai_config::AppConfig;
use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
    __              __      _
   / /_____  ____/ /___ _(_)
  / //_/ _ \/ __  / __ `/ /
 / ,< /  __/ /_/ / /_/ / /
/_/|_|\___/\__,_/\__,_/_/

        Redis workbench
    "#);
}

/// Prints what the instance is connected to.
pub fn print_startup_info(config: &AppConfig, redis: bool, listening: bool) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("Environment: {}", config.app.environment);
    if redis {
        info!("Redis:       {} (pool size {})", config.redis.url, config.redis.pool_size);
    } else {
        info!("Redis:       disabled, using in-memory storage");
    }
    info!("Cache TTL:   {}s default", config.cache.default_ttl_secs);
    if listening {
        info!("Channels:    {}", config.listener.channels.join(", "));
        if !config.listener.patterns.is_empty() {
            info!("Patterns:    {}", config.listener.patterns.join(", "));
        }
    }
    info!("{}", separator);
}
