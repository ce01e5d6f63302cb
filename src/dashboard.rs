use axum::{
    debug_handler,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use rand::Rng;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{AppResult, include_res, session::USER_ID};
use crate::quizzes::{model::Quiz, service};

#[debug_handler]
pub async fn index(
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    let Some(user_id) = session.get::<String>(USER_ID).await? else {
        return Ok(Redirect::to("/login").into_response());
    };

    let quizzes = service::user_quizzes(&db_pool, &user_id).await?;

    let published = quizzes.iter().filter(|q| q.published).count();
    let mut cards = String::new();
    for quiz in &quizzes {
        cards += &quiz_card(quiz);
    }
    if quizzes.is_empty() {
        cards = "<p class=\"empty\">No quizzes created yet</p>".to_owned();
    }

    Ok(Html(
        include_res!(str, "/pages/dashboard.html")
            .replace("{total}", &quizzes.len().to_string())
            .replace("{this_month}", &created_this_month(&quizzes).to_string())
            .replace("{published}", &published.to_string())
            .replace("{rate}", &completion_rate(&quizzes).to_string())
            .replace("{quiz_cards}", &cards),
    )
    .into_response())
}

/// Published share of all quizzes, rounded to the nearest percent.
pub fn completion_rate(quizzes: &[Quiz]) -> u32 {
    if quizzes.is_empty() {
        return 0;
    }
    let published = quizzes.iter().filter(|q| q.published).count();
    ((published as f64 / quizzes.len() as f64) * 100.0).round() as u32
}

fn created_this_month(quizzes: &[Quiz]) -> usize {
    let now = time::OffsetDateTime::now_utc();
    let month = format!("{:04}-{:02}", now.year(), u8::from(now.month()));
    quizzes
        .iter()
        .filter(|q| q.created_at.as_deref().is_some_and(|c| c.starts_with(&month)))
        .count()
}

fn quiz_card(quiz: &Quiz) -> String {
    let id = quiz.id.map(|id| id.to_string()).unwrap_or_default();
    let created = quiz.created_at.as_deref().unwrap_or("");
    let created_day = created.get(..10).unwrap_or(created);

    let code_row = match quiz.invitation_code.as_deref() {
        Some(code) if quiz.published => format!(
            "<div class=\"row\"><span>Invitation Code</span><code>{code}</code></div>"
        ),
        _ => String::new(),
    };

    // display-only placeholder, regenerated every render
    let performance = rand::rng().random_range(70..=100);

    include_res!(str, "/pages/quiz_card.html")
        .replace("{id}", &id)
        .replace("{title}", &quiz.title)
        .replace("{status}", if quiz.published { "Published" } else { "Draft" })
        .replace("{code_row}", &code_row)
        .replace("{created}", created_day)
        .replace("{performance}", &performance.to_string())
}
