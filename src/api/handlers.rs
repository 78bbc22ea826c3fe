use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::Html,
};
use serde::Serialize;

use crate::{
    Directory, NewRecipe, Recipe, StoreError,
    api::{AppState, auth::ApiKey, error::ApiError},
};

#[derive(Debug, Serialize)]
pub(super) struct Message {
    message: String,
}

impl Message {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// Runs a store operation on the blocking thread pool.
async fn with_store<T, F>(state: &AppState, context: &'static str, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Directory) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(state.store());
    tokio::task::spawn_blocking(move || f(store.as_ref()))
        .await
        .map_err(|e| ApiError::internal(context, e))?
        .map_err(|e| ApiError::from_store(e, context))
}

fn names(recipes: Vec<Recipe>) -> Json<Vec<String>> {
    Json(recipes.into_iter().map(|recipe| recipe.name).collect())
}

#[allow(clippy::unused_async)]
pub(super) async fn root() -> Json<Message> {
    Message::new("Welcome to Cocktail Recipes API")
}

#[allow(clippy::unused_async)]
pub(super) async fn favicon() -> Html<&'static str> {
    Html(
        r#"<link rel="icon" href="data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'><text y='.9em' font-size='90'>🍸</text></svg>">"#,
    )
}

#[allow(clippy::unused_async)]
pub(super) async fn not_found() -> ApiError {
    ApiError::NotFound("Not Found".to_string())
}

#[allow(clippy::unused_async)]
pub(super) async fn method_not_allowed() -> ApiError {
    ApiError::Invalid {
        status: StatusCode::METHOD_NOT_ALLOWED,
        detail: "Method Not Allowed".to_string(),
    }
}

pub(super) async fn list_cocktails(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    with_store(&state, "Error listing cocktails", Directory::list_names)
        .await
        .map(Json)
}

pub(super) async fn get_cocktail(
    State(state): State<AppState>,
    name: Result<Path<String>, PathRejection>,
) -> Result<Json<Recipe>, ApiError> {
    let Path(name) = name?;
    with_store(&state, "Error reading cocktail", move |store| {
        store.get(&name)
    })
    .await
    .map(Json)
}

pub(super) async fn cocktails_by_ingredient(
    State(state): State<AppState>,
    ingredient: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<String>>, ApiError> {
    let Path(ingredient) = ingredient?;
    with_store(&state, "Error searching by ingredient", move |store| {
        store.find_by_ingredient(&ingredient)
    })
    .await
    .map(names)
}

pub(super) async fn cocktails_by_all_ingredients(
    State(state): State<AppState>,
    ingredients: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<String>>, ApiError> {
    let Path(ingredients) = ingredients?;
    with_store(&state, "Error searching by ingredients", move |store| {
        store.find_by_all_ingredients(&ingredients)
    })
    .await
    .map(names)
}

pub(super) async fn cocktails_by_glass(
    State(state): State<AppState>,
    glass: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<String>>, ApiError> {
    let Path(glass) = glass?;
    with_store(&state, "Error searching by glass", move |store| {
        store.find_by_glass(&glass)
    })
    .await
    .map(names)
}

pub(super) async fn list_ingredients(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    with_store(&state, "Error listing ingredients", Directory::list_ingredients)
        .await
        .map(Json)
}

pub(super) async fn list_glass_types(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    with_store(&state, "Error listing glass types", Directory::list_glass_types)
        .await
        .map(Json)
}

pub(super) async fn add_cocktail(
    State(state): State<AppState>,
    _key: ApiKey,
    payload: Result<Json<NewRecipe>, JsonRejection>,
) -> Result<Json<Message>, ApiError> {
    let Json(recipe) = payload?;
    let recipe = with_store(&state, "Error adding cocktail", move |store| {
        store.add(recipe)
    })
    .await?;
    Ok(Message::new(format!(
        "Cocktail {} added successfully",
        recipe.name
    )))
}
