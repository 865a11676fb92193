/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use todo_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let app = build_router(AppState::new(pool, config)?);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{auth::jwt_auth_layer, security::SecurityHeadersLayer},
    routes,
};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::{sync::Arc, time::Duration};
use todo_shared::{
    auth::jwt::{JwtError, TokenService},
    services::{auth::AuthService, todo::TodoService},
    store::{
        postgres::{PgTodoRepository, PgUserStore},
        TodoRepository, UserStore,
    },
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned per request; everything inside is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tokens: Arc<TokenService>,
    pub auth: AuthService,
    pub todos: TodoService,
}

impl AppState {
    /// State backed by PostgreSQL
    pub fn new(pool: PgPool, config: Config) -> Result<Self, JwtError> {
        Self::with_stores(
            config,
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgTodoRepository::new(pool)),
        )
    }

    /// State over arbitrary store implementations
    pub fn with_stores(
        config: Config,
        users: Arc<dyn UserStore>,
        todos: Arc<dyn TodoRepository>,
    ) -> Result<Self, JwtError> {
        let tokens = Arc::new(TokenService::new(config.token_settings())?);

        Ok(Self {
            config: Arc::new(config),
            auth: AuthService::new(users, tokens.clone()),
            todos: TodoService::new(todos),
            tokens,
        })
    }
}

/// Builds the router with all routes and middleware
///
/// ```text
/// /
/// ├── GET  /health
/// ├── /api/auth/
/// │   ├── POST /register
/// │   └── POST /login
/// └── /api/todoitems/             (bearer token required)
///     ├── GET    /                 list, optional date filters
///     ├── POST   /                 create
///     ├── GET    /:id
///     ├── PUT    /:id              replace
///     └── DELETE /:id
/// ```
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let todo_routes = Router::new()
        .route(
            "/",
            get(routes::todo_items::list_todo_items).post(routes::todo_items::create_todo_item),
        )
        .route(
            "/:id",
            get(routes::todo_items::get_todo_item)
                .put(routes::todo_items::update_todo_item)
                .delete(routes::todo_items::delete_todo_item),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/todoitems", todo_routes);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config.api.cors_origins))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([header::LOCATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
