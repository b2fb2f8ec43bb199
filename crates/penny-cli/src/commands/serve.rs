//! Server command implementation

use anyhow::Result;
use penny_core::ServiceConfig;

pub async fn cmd_serve(
    mut config: ServiceConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    println!("🚀 Starting Penny web server...");
    println!(
        "   Listening: http://{}:{}",
        config.server.host, config.server.port
    );
    println!("   AI backend: {:?}", config.ai.backend);
    if config.server.allowed_origins.is_empty() {
        println!("   CORS: any origin");
    } else {
        println!("   CORS: {}", config.server.allowed_origins.join(", "));
    }
    if config.categorizer.strict_labels {
        println!("   Strict labels: on");
    }
    println!();

    penny_server::serve(config).await
}
