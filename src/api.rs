use std::{io, sync::Arc};

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{Config, Directory};

mod auth;
pub use auth::{API_KEY_HEADER, ApiKey};

/// Errors returned to HTTP clients.
pub mod error;
pub use error::ApiError;

mod handlers;

/// State shared by every request handler.
#[derive(Debug, Clone)]
pub struct AppState {
    store: Arc<Directory>,
    api_key: Option<Arc<str>>,
}

impl AppState {
    /// Creates the state from an opened store and the add-recipe secret.
    #[must_use]
    pub fn new(store: Directory, api_key: Option<String>) -> Self {
        Self {
            store: Arc::new(store),
            api_key: api_key.map(Arc::from),
        }
    }

    /// Opens the store named in `config` and builds the state around it.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn from_config(config: &Config) -> io::Result<Self> {
        let store = Directory::open(config.data_directory.clone())?;
        Ok(Self::new(store, config.api_key.clone()))
    }

    /// The recipe store.
    #[must_use]
    pub const fn store(&self) -> &Arc<Directory> {
        &self.store
    }

    /// The secret callers must present to add recipes, if one is configured.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}

/// Builds the HTTP router serving the recipe API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/favicon.ico", get(handlers::favicon))
        .route(
            "/cocktails/",
            get(handlers::list_cocktails).post(handlers::add_cocktail),
        )
        .route("/cocktails/ingredients/", get(handlers::list_ingredients))
        .route("/cocktails/glasses/", get(handlers::list_glass_types))
        .route(
            "/cocktails/ingredient/{ingredient}",
            get(handlers::cocktails_by_ingredient),
        )
        .route(
            "/cocktails/ingredients/{ingredients}",
            get(handlers::cocktails_by_all_ingredients),
        )
        .route("/cocktails/glass/{glass}", get(handlers::cocktails_by_glass))
        .route("/cocktails/{name}", get(handlers::get_cocktail))
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
