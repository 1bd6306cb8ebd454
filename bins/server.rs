use std::process::ExitCode;

use common::utils::logging;
use configs::AppConfig;
use dotenvy::dotenv;
use tracing::{error, info, warn};
use uuid::Uuid;

fn main() -> ExitCode {
    // .env must be loaded before config and RUST_LOG are read
    dotenv().ok();

    let cfg = match AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            logging::init_logging_default();
            error!(service = "persons-api", event = "config_invalid", error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    logging::init_logging(&cfg.logging.level, cfg.log_format());
    for w in &cfg.warnings {
        warn!(service = "persons-api", event = "config_fallback", "{w}");
    }

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "persons-api",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = cfg.server.worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "persons-api", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "persons-api",
        event = "start",
        %service_id,
        pid,
        version,
        environment = ?cfg.environment,
        threads = cfg.server.worker_threads.unwrap_or_default(),
        "persons api starting"
    );

    match rt.block_on(server::run(cfg)) {
        Ok(()) => {
            info!(service = "persons-api", event = "stop", %service_id, pid, "persons api stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "persons-api", event = "run_failed", error = %e, "server::run returned error");
            ExitCode::FAILURE
        }
    }
}
