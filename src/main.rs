use anyhow::Result;
use netspeedmon::*;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    tracing::info!("{} starting", version::banner());

    let app_config = config::AppConfig::load()?;
    let monitor = worker::Monitor::new(
        worker::WorkerDeps {
            source: counter_repo::from_config(&app_config.counters),
            sink: sink::from_config(app_config.presentation.sink),
        },
        worker::WorkerConfig {
            counter_reset: app_config.monitor.counter_reset,
            stats_log_interval_secs: app_config.monitor.stats_log_interval_secs,
        },
    );

    if app_config.monitor.autostart {
        monitor
            .start()
            .await
            .map_err(|e| anyhow::anyhow!("starting monitor: {}", e))?;
    } else {
        tracing::info!("autostart disabled; idle until shutdown");
    }

    shutdown_signal().await;
    tracing::info!("Received shutdown signal");
    monitor.stop().await;
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
