//! # TaskFlow API Server
//!
//! HTTP server for the TaskFlow personal kanban board:
//! - Token-authenticated task CRUD, scoped per user
//! - Signup/login with Argon2id password hashing and JWT bearer tokens
//! - Daily reminder digest scheduler running alongside the server
//!
//! Storage is Postgres when `DATABASE_URL` is set, otherwise an
//! in-process store suitable for development.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskflow-api
//! ```

use std::sync::Arc;

use taskflow_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskflow_reminder::{
    mailer::{Mailer, SmtpMailer},
    scheduler::{ReminderScheduler, SchedulerConfig},
};
use taskflow_shared::{
    db::{migrations, pool},
    store::{MemStore, PgStore, Store},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskflow_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "TaskFlow API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    // Storage backend: Postgres when configured, in-memory otherwise
    let store: Arc<dyn Store> = match &config.database {
        Some(db_config) => {
            let pool = pool::create_pool(db_config.clone()).await?;
            migrations::run_migrations(&pool).await?;
            tracing::info!("Connected to Postgres");
            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory store (data is not persisted)");
            Arc::new(MemStore::new())
        }
    };

    let mut state = AppState::new(store.clone(), config.clone());

    // Reminder scheduler, when mail is configured
    let mut shutdown_tokens = Vec::new();
    if let Some(smtp_config) = config.smtp.clone() {
        let mailer: Arc<dyn Mailer> = Arc::new(SmtpMailer::new(smtp_config)?);
        let scheduler = Arc::new(ReminderScheduler::with_config(
            store,
            mailer,
            SchedulerConfig {
                hour: config.reminder_hour,
            },
        ));
        shutdown_tokens.push(scheduler.shutdown_token());
        state = state.with_scheduler(scheduler.clone());

        tokio::spawn(async move {
            if let Err(e) = scheduler.run().await {
                tracing::error!(error = %e, "Reminder scheduler exited with error");
            }
        });
    } else {
        tracing::info!("SMTP not configured; reminder scheduler disabled");
    }

    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    for token in shutdown_tokens {
        token.cancel();
    }
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, draining...");
}
