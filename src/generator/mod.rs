mod customize;
pub mod draft;
mod preview;
mod publish;
pub mod upload;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::AppState;

pub use draft::{GenerationSettings, QuizDraft, Step};
pub use upload::UploadedFile;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(upload::upload_page).post(upload::upload))
        .route("/customize", get(customize::customize_page))
        .route("/generate", post(customize::generate))
        .route("/preview", get(preview::preview_page))
        .route("/preview/add", post(preview::add_question))
        .route("/preview/{qid}", post(preview::update_question))
        .route("/preview/{qid}/delete", post(preview::delete_question))
        .route("/publish", post(publish::publish))
        // body limit sits above the 20 MiB acceptance cap
        .layer(DefaultBodyLimit::max(32 * 1024 * 1024))
}
