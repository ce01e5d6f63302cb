use axum::{
    debug_handler,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{AppResult, include_res, session::USER_ID};
use crate::quizzes::{model::Quiz, service};

use super::draft::{self, Step};

/// Commits the session draft as a published quiz. Terminal for the wizard.
#[debug_handler]
pub(crate) async fn publish(
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    let draft = draft::load(&session).await?;
    if !draft.step_allowed(Step::Preview) {
        return Ok(Redirect::to("/g").into_response());
    }

    let user_id = session.get::<String>(USER_ID).await?;
    let mut quiz = Quiz::draft(&draft.title, &draft.description);
    quiz.published = true;

    let (saved, _questions) =
        service::save_quiz(&db_pool, user_id.as_deref(), &quiz, &draft.questions).await?;
    draft::clear(&session).await?;

    let quiz_id = saved.id.map(|id| id.to_string()).unwrap_or_default();
    tracing::info!("published quiz {quiz_id}");

    Ok(Html(
        include_res!(str, "/pages/generator/published.html")
            .replace("{title}", &saved.title)
            .replace("{code}", saved.invitation_code.as_deref().unwrap_or(""))
            .replace("{id}", &quiz_id),
    )
    .into_response())
}
