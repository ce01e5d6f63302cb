use axum::{
    Form, debug_handler,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    AppError, AppResult, include_res,
    session::{EDIT_DRAFT, USER_ID},
};

use super::model::{Question, QuestionId, Quiz};
use super::questions::{self, QuestionForm};
use super::service;

/// Working copy of a stored quiz. Question edits live here until the
/// professor hits save, which persists the whole sequence at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct EditDraft {
    quiz: Quiz,
    questions: Vec<Question>,
}

impl EditDraft {
    fn add_question(&mut self, mut question: Question) {
        let tag = self
            .questions
            .iter()
            .map(|q| match q.id {
                QuestionId::New(tag) => tag + 1,
                QuestionId::Existing(_) => 0,
            })
            .max()
            .unwrap_or(0);
        question.id = QuestionId::New(tag);
        question.order_position = self
            .questions
            .iter()
            .map(|q| q.order_position + 1)
            .max()
            .unwrap_or(0);
        self.questions.push(question);
    }
}

#[derive(Deserialize)]
pub(crate) struct QuizIdAndQuestion {
    id: Uuid,
    qid: String,
}

#[debug_handler]
pub(crate) async fn edit_page(
    Path(quiz_id): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    if session.get::<String>(USER_ID).await?.is_none() {
        return Ok(Redirect::to(&format!("/login?return_url=/q/{quiz_id}/edit")).into_response());
    }

    // keep unsaved question edits across page loads
    let draft = match session.get::<EditDraft>(EDIT_DRAFT).await? {
        Some(draft) if draft.quiz.id == Some(quiz_id) => draft,
        _ => {
            let (quiz, questions) = service::quiz_with_questions(&db_pool, quiz_id).await?;
            let draft = EditDraft { quiz, questions };
            session.insert(EDIT_DRAFT, &draft).await?;
            draft
        }
    };

    let mut items = String::new();
    for question in &draft.questions {
        items += &questions::question_item_html(question, &format!("/q/{quiz_id}/questions"));
    }

    Ok(Html(
        include_res!(str, "/pages/quiz_edit.html")
            .replace("{id}", &quiz_id.to_string())
            .replace("{title}", &draft.quiz.title)
            .replace("{description}", draft.quiz.description.as_deref().unwrap_or(""))
            .replace("{status}", if draft.quiz.published { "Published" } else { "Draft" })
            .replace("{code}", draft.quiz.invitation_code.as_deref().unwrap_or("-"))
            .replace("{items}", &items),
    )
    .into_response())
}

#[debug_handler]
pub(crate) async fn add_question(
    Path(quiz_id): Path<Uuid>,
    session: Session,
    Form(form): Form<QuestionForm>,
) -> AppResult<Response> {
    let Some(mut draft) = edit_draft_for(&session, quiz_id).await? else {
        return Ok(back_to_edit(quiz_id));
    };

    draft.add_question(form.into_question()?);
    session.insert(EDIT_DRAFT, &draft).await?;
    Ok(back_to_edit(quiz_id))
}

#[debug_handler]
pub(crate) async fn update_question(
    Path(QuizIdAndQuestion { id: quiz_id, qid }): Path<QuizIdAndQuestion>,
    session: Session,
    Form(form): Form<QuestionForm>,
) -> AppResult<Response> {
    let Some(mut draft) = edit_draft_for(&session, quiz_id).await? else {
        return Ok(back_to_edit(quiz_id));
    };
    let Some(qid) = QuestionId::parse(&qid) else {
        return Err(AppError::NotFound("question"));
    };
    let Some(question) = draft.questions.iter_mut().find(|q| q.id == qid) else {
        return Err(AppError::NotFound("question"));
    };

    form.apply_to(question)?;
    session.insert(EDIT_DRAFT, &draft).await?;
    Ok(back_to_edit(quiz_id))
}

#[debug_handler]
pub(crate) async fn delete_question(
    Path(QuizIdAndQuestion { id: quiz_id, qid }): Path<QuizIdAndQuestion>,
    session: Session,
) -> AppResult<Response> {
    let Some(mut draft) = edit_draft_for(&session, quiz_id).await? else {
        return Ok(back_to_edit(quiz_id));
    };
    let Some(qid) = QuestionId::parse(&qid) else {
        return Err(AppError::NotFound("question"));
    };

    let before = draft.questions.len();
    draft.questions.retain(|q| q.id != qid);
    if draft.questions.len() == before {
        return Err(AppError::NotFound("question"));
    }

    session.insert(EDIT_DRAFT, &draft).await?;
    Ok(back_to_edit(quiz_id))
}

#[debug_handler]
pub(crate) async fn save(
    Path(quiz_id): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    let user_id = session.get::<String>(USER_ID).await?;
    let Some(draft) = edit_draft_for(&session, quiz_id).await? else {
        return Ok(back_to_edit(quiz_id));
    };

    // published flag is carried over as-is; a published quiz gets its
    // code rotated by the save
    service::save_quiz(&db_pool, user_id.as_deref(), &draft.quiz, &draft.questions).await?;
    session.remove::<EditDraft>(EDIT_DRAFT).await?;

    Ok(Redirect::to("/").into_response())
}

#[debug_handler]
pub(crate) async fn publish(
    Path(quiz_id): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    if session.get::<String>(USER_ID).await?.is_none() {
        return Err(AppError::Unauthenticated);
    }

    service::publish_quiz(&db_pool, quiz_id).await?;
    // drop any stale working copy so the edit page shows the new code
    session.remove::<EditDraft>(EDIT_DRAFT).await?;

    Ok(back_to_edit(quiz_id))
}

async fn edit_draft_for(session: &Session, quiz_id: Uuid) -> AppResult<Option<EditDraft>> {
    Ok(session
        .get::<EditDraft>(EDIT_DRAFT)
        .await?
        .filter(|draft| draft.quiz.id == Some(quiz_id)))
}

fn back_to_edit(quiz_id: Uuid) -> Response {
    Redirect::to(&format!("/q/{quiz_id}/edit")).into_response()
}
