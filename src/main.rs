use axum::{
    routing::{get, post},
    Router,
};
use quiz_master_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware, routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);
    app_state.auth_service.ensure_admin().await?;

    let base_routes = Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login));

    let user_api = Router::new()
        .route("/api/quizzes", get(routes::quizzes::list_quizzes))
        .route("/api/quizzes/:id", get(routes::quizzes::get_quiz))
        .route("/api/quizzes/:id/submit", post(routes::quizzes::submit_quiz))
        .route("/api/dashboard/history", get(routes::dashboard::get_history))
        .route("/api/dashboard/summary", get(routes::dashboard::get_summary))
        .layer(axum::middleware::from_fn(
            middleware::auth::require_auth,
        ));

    let admin_api = Router::new()
        .route(
            "/api/admin/subjects",
            get(routes::catalog::list_subjects).post(routes::catalog::create_subject),
        )
        .route(
            "/api/admin/subjects/:id",
            axum::routing::patch(routes::catalog::update_subject)
                .delete(routes::catalog::delete_subject),
        )
        .route(
            "/api/admin/subjects/:id/chapters",
            get(routes::catalog::list_chapters).post(routes::catalog::create_chapter),
        )
        .route(
            "/api/admin/chapters/:id",
            axum::routing::patch(routes::catalog::update_chapter)
                .delete(routes::catalog::delete_chapter),
        )
        .route(
            "/api/admin/quizzes",
            get(routes::catalog::list_quizzes).post(routes::catalog::create_quiz),
        )
        .route(
            "/api/admin/quizzes/:id",
            axum::routing::patch(routes::catalog::update_quiz)
                .delete(routes::catalog::delete_quiz),
        )
        .route(
            "/api/admin/questions",
            post(routes::catalog::create_question),
        )
        .route(
            "/api/admin/questions/:id",
            axum::routing::patch(routes::catalog::update_question)
                .delete(routes::catalog::delete_question),
        )
        .route(
            "/api/admin/stats/subjects",
            get(routes::dashboard::get_subject_stats),
        )
        .route(
            "/api/admin/stats/chapters",
            get(routes::dashboard::get_chapter_stats),
        )
        .layer(axum::middleware::from_fn(
            middleware::auth::require_admin,
        ));

    let app = base_routes
        .merge(user_api)
        .merge(admin_api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
