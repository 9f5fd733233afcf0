use sea_orm::Database;
use tracing::info;

use association::config::AssocConfig;
use association::router::build_router;
use association::state::AppState;
use association::usecase::auth::EnsureDefaultAdminUseCase;

#[tokio::main]
async fn main() {
    assoc_core::tracing::init_tracing();

    let config = AssocConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db: std::sync::Arc::new(db),
        session_secret: config.session_secret,
        static_dir: config.static_dir.into(),
    };

    let bootstrap = EnsureDefaultAdminUseCase {
        repo: state.user_repo(),
    };
    bootstrap
        .execute(&config.admin_password, &config.admin_email)
        .await
        .expect("failed to bootstrap admin account");

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("association service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
