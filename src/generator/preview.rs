use axum::{
    Form, debug_handler,
    extract::Path,
    response::{Html, IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::{AppError, AppResult, include_res};
use crate::quizzes::model::QuestionId;
use crate::quizzes::questions::{self, QuestionForm};

use super::draft::{self, Step};

#[debug_handler]
pub(crate) async fn preview_page(session: Session) -> AppResult<Response> {
    let draft = draft::load(&session).await?;
    if !draft.step_allowed(Step::Preview) {
        let back = if draft.step_allowed(Step::Customize) { "/g/customize" } else { "/g" };
        return Ok(Redirect::to(back).into_response());
    }

    let mut items = String::new();
    for question in &draft.questions {
        items += &questions::question_item_html(question, "/g/preview");
    }

    Ok(Html(
        include_res!(str, "/pages/generator/preview.html")
            .replace("{title}", &draft.title)
            .replace("{count}", &draft.questions.len().to_string())
            .replace("{items}", &items),
    )
    .into_response())
}

#[debug_handler]
pub(crate) async fn add_question(
    session: Session,
    Form(form): Form<QuestionForm>,
) -> AppResult<Response> {
    let mut draft = draft::load(&session).await?;
    if !draft.step_allowed(Step::Customize) {
        return Ok(Redirect::to("/g").into_response());
    }

    draft.add_question(form.into_question()?);
    draft::store(&session, &draft).await?;
    Ok(Redirect::to("/g/preview").into_response())
}

#[debug_handler]
pub(crate) async fn update_question(
    Path(qid): Path<String>,
    session: Session,
    Form(form): Form<QuestionForm>,
) -> AppResult<Response> {
    let mut draft = draft::load(&session).await?;
    let Some(qid) = QuestionId::parse(&qid) else {
        return Err(AppError::NotFound("question"));
    };
    let Some(question) = draft.question_mut(qid) else {
        return Err(AppError::NotFound("question"));
    };

    form.apply_to(question)?;
    draft::store(&session, &draft).await?;
    Ok(Redirect::to("/g/preview").into_response())
}

#[debug_handler]
pub(crate) async fn delete_question(
    Path(qid): Path<String>,
    session: Session,
) -> AppResult<Response> {
    let mut draft = draft::load(&session).await?;
    let Some(qid) = QuestionId::parse(&qid) else {
        return Err(AppError::NotFound("question"));
    };
    if !draft.remove_question(qid) {
        return Err(AppError::NotFound("question"));
    }

    draft::store(&session, &draft).await?;
    Ok(Redirect::to("/g/preview").into_response())
}
