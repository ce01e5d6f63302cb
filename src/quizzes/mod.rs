mod edit;
pub mod generate;
pub mod model;
pub mod questions;
pub mod service;

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/edit", get(edit::edit_page))
        .route("/{id}/save", post(edit::save))
        .route("/{id}/publish", post(edit::publish))
        .route("/{id}/questions", post(edit::add_question))
        .route("/{id}/questions/{qid}", post(edit::update_question))
        .route("/{id}/questions/{qid}/delete", post(edit::delete_question))
}
