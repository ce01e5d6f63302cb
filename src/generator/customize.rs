use axum::{
    Form, debug_handler,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::{AppError, AppResult, include_res};
use crate::quizzes::generate::{self, Difficulty};
use crate::quizzes::model::QuestionType;

use super::draft::{self, GenerationSettings, Step};

#[derive(Debug, Deserialize)]
pub(crate) struct CustomizeForm {
    num_questions: u32,
    #[serde(default)]
    multiple_choice: Option<String>,
    #[serde(default)]
    true_false: Option<String>,
    #[serde(default)]
    essay: Option<String>,
    difficulty: String,
}

#[debug_handler]
pub(crate) async fn customize_page(session: Session) -> AppResult<Response> {
    let draft = draft::load(&session).await?;
    if !draft.step_allowed(Step::Customize) {
        return Ok(Redirect::to("/g").into_response());
    }

    let settings = &draft.settings;
    let checked = |kind: QuestionType| {
        if settings.question_types.contains(&kind) { "checked" } else { "" }
    };
    let selected = |difficulty: Difficulty| {
        if settings.difficulty == difficulty { "checked" } else { "" }
    };

    Ok(Html(
        include_res!(str, "/pages/generator/customize.html")
            .replace("{file_name}", draft.file.as_ref().map(|f| f.name.as_str()).unwrap_or(""))
            .replace("{num_questions}", &settings.num_questions.to_string())
            .replace("{mc_checked}", checked(QuestionType::MultipleChoice))
            .replace("{tf_checked}", checked(QuestionType::TrueFalse))
            .replace("{essay_checked}", checked(QuestionType::Essay))
            .replace("{easy_checked}", selected(Difficulty::Easy))
            .replace("{medium_checked}", selected(Difficulty::Medium))
            .replace("{hard_checked}", selected(Difficulty::Hard)),
    )
    .into_response())
}

#[debug_handler]
pub(crate) async fn generate(
    session: Session,
    Form(form): Form<CustomizeForm>,
) -> AppResult<Response> {
    let mut draft = draft::load(&session).await?;
    if !draft.step_allowed(Step::Customize) {
        return Ok(Redirect::to("/g").into_response());
    }

    let mut question_types = Vec::new();
    if form.multiple_choice.is_some() {
        question_types.push(QuestionType::MultipleChoice);
    }
    if form.true_false.is_some() {
        question_types.push(QuestionType::TrueFalse);
    }
    if form.essay.is_some() {
        question_types.push(QuestionType::Essay);
    }
    if question_types.is_empty() {
        return Err(AppError::Validation("Select at least one question type".into()));
    }

    let num_questions = form.num_questions.clamp(1, 50);
    let difficulty = Difficulty::from_param(&form.difficulty);

    let Some(file) = draft.file.clone() else {
        return Ok(Redirect::to("/g").into_response());
    };

    let questions =
        generate::questions_from_file(&file, num_questions, difficulty, &question_types).await;

    draft.settings = GenerationSettings { num_questions, question_types, difficulty };
    draft.set_questions(questions);
    draft::store(&session, &draft).await?;

    Ok(Redirect::to("/g/preview").into_response())
}
