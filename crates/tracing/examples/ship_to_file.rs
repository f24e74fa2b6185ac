use std::sync::Arc;
use std::time::Duration;

use logship_sink_file::FileSink;
use logship_tracing::init;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Ship every tracing event to a local file
    let sink = Arc::new(FileSink::new("logs/demo.log")?);
    let _provider = init(sink)?;

    tracing::info!(target: "demo", "starting up");
    tracing::warn!(target: "demo", attempts = 2, "retrying connection");
    tracing::error!(target: "demo", "giving up");

    // Give the worker a moment to drain before the process exits
    tokio::time::sleep(Duration::from_millis(100)).await;

    println!("wrote logs/demo.log");

    Ok(())
}
