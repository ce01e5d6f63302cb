use rand::seq::IndexedRandom;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{AppError, AppResult};

use super::model::{Question, QuestionId, QuestionType, Quiz};

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// 6 characters over the base-36 alphabet, uppercased. Not guaranteed
/// globally unique.
pub fn invitation_code() -> String {
    let mut rng = rand::rng();
    (0..6)
        .map(|_| *CODE_ALPHABET.choose(&mut rng).unwrap() as char)
        .collect()
}

pub async fn user_quizzes(pool: &SqlitePool, user_id: &str) -> AppResult<Vec<Quiz>> {
    let rows: Vec<QuizRow> = sqlx::query_as(
        "SELECT id,title,description,published,invitation_code,user_id,created_at
         FROM quizzes WHERE user_id=? ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(quiz_from_row).collect()
}

pub async fn quiz_with_questions(
    pool: &SqlitePool,
    quiz_id: Uuid,
) -> AppResult<(Quiz, Vec<Question>)> {
    let Some(quiz) = quiz_row(pool, quiz_id).await? else {
        return Err(AppError::NotFound("quiz"));
    };

    // second read is a separate statement; a quiz deleted in between
    // yields a partial result rather than an error
    let rows: Vec<(String, String, String, String, Option<String>, i64)> = sqlx::query_as(
        "SELECT id,text,type,options,correct_answer,order_position
         FROM quiz_questions WHERE quiz_id=? ORDER BY order_position ASC",
    )
    .bind(quiz_id.to_string())
    .fetch_all(pool)
    .await?;

    let mut questions = Vec::with_capacity(rows.len());
    for (id, text, kind, options, correct_answer, order_position) in rows {
        questions.push(Question {
            id: QuestionId::Existing(Uuid::parse_str(&id)?),
            text,
            kind: QuestionType::parse(&kind)
                .ok_or_else(|| anyhow::anyhow!("unknown question type {kind}"))?,
            options: serde_json::from_str(&options)?,
            correct_answer,
            order_position: order_position as u32,
        });
    }

    Ok((quiz, questions))
}

/// Upserts the quiz row and its full question sequence. A published quiz
/// gets a fresh invitation code on every save, re-saves included.
pub async fn save_quiz(
    pool: &SqlitePool,
    user_id: Option<&str>,
    quiz: &Quiz,
    questions: &[Question],
) -> AppResult<(Quiz, Vec<Question>)> {
    let Some(user_id) = user_id else {
        return Err(AppError::Unauthenticated);
    };

    let invitation_code = quiz.published.then(invitation_code);
    let quiz_id = quiz.id.unwrap_or_else(Uuid::now_v7);

    sqlx::query(
        "INSERT INTO quizzes (id,title,description,published,invitation_code,user_id)
         VALUES (?,?,?,?,?,?)
         ON CONFLICT(id) DO UPDATE SET
             title=excluded.title,
             description=excluded.description,
             published=excluded.published,
             invitation_code=excluded.invitation_code,
             user_id=excluded.user_id",
    )
    .bind(quiz_id.to_string())
    .bind(&quiz.title)
    .bind(&quiz.description)
    .bind(quiz.published)
    .bind(&invitation_code)
    .bind(user_id)
    .execute(pool)
    .await?;

    let saved = quiz_row(pool, quiz_id)
        .await?
        .ok_or(AppError::NotFound("quiz"))?;

    // no transaction around the question batch; a failure here leaves the
    // quiz row updated and the questions stale
    let mut saved_questions = Vec::with_capacity(questions.len());
    for question in questions {
        let id = match question.id {
            QuestionId::Existing(id) => id,
            QuestionId::New(_) => Uuid::now_v7(),
        };
        sqlx::query(
            "INSERT INTO quiz_questions (id,quiz_id,text,type,options,correct_answer,order_position)
             VALUES (?,?,?,?,?,?,?)
             ON CONFLICT(id) DO UPDATE SET
                 quiz_id=excluded.quiz_id,
                 text=excluded.text,
                 type=excluded.type,
                 options=excluded.options,
                 correct_answer=excluded.correct_answer,
                 order_position=excluded.order_position",
        )
        .bind(id.to_string())
        .bind(quiz_id.to_string())
        .bind(&question.text)
        .bind(question.kind.as_str())
        .bind(serde_json::to_string(&question.options)?)
        .bind(&question.correct_answer)
        .bind(question.order_position as i64)
        .execute(pool)
        .await?;

        saved_questions.push(Question {
            id: QuestionId::Existing(id),
            ..question.clone()
        });
    }

    Ok((saved, saved_questions))
}

/// Republishing always rotates the invitation code.
pub async fn publish_quiz(pool: &SqlitePool, quiz_id: Uuid) -> AppResult<Quiz> {
    let code = invitation_code();
    let result = sqlx::query("UPDATE quizzes SET published=?, invitation_code=? WHERE id=?")
        .bind(true)
        .bind(&code)
        .bind(quiz_id.to_string())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("quiz"));
    }

    quiz_row(pool, quiz_id)
        .await?
        .ok_or(AppError::NotFound("quiz"))
}

type QuizRow = (String, String, Option<String>, bool, Option<String>, String, String);

async fn quiz_row(pool: &SqlitePool, quiz_id: Uuid) -> AppResult<Option<Quiz>> {
    let row: Option<QuizRow> = sqlx::query_as(
        "SELECT id,title,description,published,invitation_code,user_id,created_at
         FROM quizzes WHERE id=?",
    )
    .bind(quiz_id.to_string())
    .fetch_optional(pool)
    .await?;

    row.map(quiz_from_row).transpose()
}

fn quiz_from_row(row: QuizRow) -> AppResult<Quiz> {
    let (id, title, description, published, invitation_code, user_id, created_at) = row;
    Ok(Quiz {
        id: Some(Uuid::parse_str(&id)?),
        title,
        description,
        published,
        invitation_code,
        user_id: Some(user_id),
        created_at: Some(created_at),
    })
}

#[cfg(test)]
mod tests {
    use sqlx::sqlite::SqlitePoolOptions;

    use crate::db;
    use crate::quizzes::model::{QuestionOption, QuestionType};

    use super::*;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::init(&pool).await.unwrap();
        pool
    }

    fn code_shaped(code: &str) -> bool {
        code.len() == 6 && code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    }

    fn choice_question(tag: u32, position: u32) -> Question {
        Question {
            id: QuestionId::New(tag),
            text: format!("Question {tag}?"),
            kind: QuestionType::MultipleChoice,
            options: vec![
                QuestionOption { id: "a".into(), text: "first".into() },
                QuestionOption { id: "b".into(), text: "second".into() },
                QuestionOption { id: "c".into(), text: "third".into() },
                QuestionOption { id: "d".into(), text: "fourth".into() },
            ],
            correct_answer: Some("a".into()),
            order_position: position,
        }
    }

    #[test]
    fn invitation_code_is_six_base36_uppercase_chars() {
        for _ in 0..100 {
            let code = invitation_code();
            assert!(code_shaped(&code), "bad code {code}");
        }
    }

    #[tokio::test]
    async fn published_save_returns_invitation_code() {
        let pool = test_pool().await;
        let mut quiz = Quiz::draft("Networks", "");
        quiz.published = true;

        let (saved, _) = save_quiz(&pool, Some("prof-1"), &quiz, &[]).await.unwrap();
        assert!(saved.published);
        assert!(code_shaped(saved.invitation_code.as_deref().unwrap()));
    }

    #[tokio::test]
    async fn unpublished_save_has_no_invitation_code() {
        let pool = test_pool().await;
        let quiz = Quiz::draft("Networks", "");

        let (saved, _) = save_quiz(&pool, Some("prof-1"), &quiz, &[]).await.unwrap();
        assert!(!saved.published);
        assert_eq!(saved.invitation_code, None);
    }

    #[tokio::test]
    async fn resaving_unpublished_quiz_is_idempotent() {
        let pool = test_pool().await;
        let quiz = Quiz::draft("Databases", "week 3");

        let (first, _) = save_quiz(&pool, Some("prof-1"), &quiz, &[]).await.unwrap();
        let (second, _) = save_quiz(&pool, Some("prof-1"), &first, &[]).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.title, second.title);
        assert_eq!(first.description, second.description);
        assert_eq!(second.invitation_code, None);

        let listed = user_quizzes(&pool, "prof-1").await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn republishing_rotates_the_invitation_code() {
        let pool = test_pool().await;
        let mut quiz = Quiz::draft("Compilers", "");
        quiz.published = true;

        let (first, _) = save_quiz(&pool, Some("prof-1"), &quiz, &[]).await.unwrap();
        let (second, _) = save_quiz(&pool, Some("prof-1"), &first, &[]).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_ne!(first.invitation_code, second.invitation_code);
    }

    #[tokio::test]
    async fn saving_without_identity_is_rejected() {
        let pool = test_pool().await;
        let quiz = Quiz::draft("Networks", "");

        let err = save_quiz(&pool, None, &quiz, &[]).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));
    }

    #[tokio::test]
    async fn questions_come_back_sorted_by_order_position() {
        let pool = test_pool().await;
        let quiz = Quiz::draft("Sorting", "");
        let questions = vec![
            choice_question(0, 2),
            choice_question(1, 0),
            choice_question(2, 1),
        ];

        let (saved, _) = save_quiz(&pool, Some("prof-1"), &quiz, &questions).await.unwrap();
        let (_, fetched) = quiz_with_questions(&pool, saved.id.unwrap()).await.unwrap();

        let positions: Vec<u32> = fetched.iter().map(|q| q.order_position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert_eq!(fetched[0].text, "Question 1?");
        assert_eq!(fetched[2].text, "Question 0?");
    }

    #[tokio::test]
    async fn new_questions_get_server_ids_and_keep_them_on_resave() {
        let pool = test_pool().await;
        let quiz = Quiz::draft("Graphs", "");

        let (saved, questions) =
            save_quiz(&pool, Some("prof-1"), &quiz, &[choice_question(0, 0)]).await.unwrap();
        let first_id = match questions[0].id {
            QuestionId::Existing(id) => id,
            QuestionId::New(_) => panic!("save left a draft id behind"),
        };

        let (_, resaved) = save_quiz(&pool, Some("prof-1"), &saved, &questions).await.unwrap();
        assert_eq!(resaved[0].id, QuestionId::Existing(first_id));

        let (_, fetched) = quiz_with_questions(&pool, saved.id.unwrap()).await.unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].id, QuestionId::Existing(first_id));
        assert_eq!(fetched[0].options.len(), 4);
        assert_eq!(fetched[0].correct_answer.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn missing_quiz_is_not_found() {
        let pool = test_pool().await;
        let err = quiz_with_questions(&pool, Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound("quiz")));

        let err = publish_quiz(&pool, Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound("quiz")));
    }

    #[tokio::test]
    async fn publish_by_id_sets_flag_and_mints_code() {
        let pool = test_pool().await;
        let quiz = Quiz::draft("Crypto", "");
        let (saved, _) = save_quiz(&pool, Some("prof-1"), &quiz, &[]).await.unwrap();

        let published = publish_quiz(&pool, saved.id.unwrap()).await.unwrap();
        assert!(published.published);
        assert!(code_shaped(published.invitation_code.as_deref().unwrap()));

        let again = publish_quiz(&pool, saved.id.unwrap()).await.unwrap();
        assert_ne!(published.invitation_code, again.invitation_code);
    }

    #[tokio::test]
    async fn quizzes_list_newest_first_per_owner() {
        let pool = test_pool().await;
        let (old, _) = save_quiz(&pool, Some("prof-1"), &Quiz::draft("Old", ""), &[]).await.unwrap();
        let (_new, _) = save_quiz(&pool, Some("prof-1"), &Quiz::draft("New", ""), &[]).await.unwrap();
        save_quiz(&pool, Some("prof-2"), &Quiz::draft("Other owner", ""), &[]).await.unwrap();

        sqlx::query("UPDATE quizzes SET created_at='2020-01-01T00:00:00.000Z' WHERE id=?")
            .bind(old.id.unwrap().to_string())
            .execute(&pool)
            .await
            .unwrap();

        let listed = user_quizzes(&pool, "prof-1").await.unwrap();
        let titles: Vec<&str> = listed.iter().map(|q| q.title.as_str()).collect();
        assert_eq!(titles, vec!["New", "Old"]);
    }
}
