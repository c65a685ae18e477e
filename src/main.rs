use workshop_booking::{app, db, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "workshop_booking=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = AppState::init().await?;

    if app_state.config.db.run_migrations {
        db::migrate(&app_state.db).await?;
    } else {
        tracing::info!("RUN_MIGRATIONS=false, skipping migrations");
    }

    tracing::info!(services = ?app_state.config.services, "starting");
    let router = app::build_app(app_state);
    app::serve(router).await
}
