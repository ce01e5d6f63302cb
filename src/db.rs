use sqlx::SqlitePool;

// created_at is assigned by the store on insert and survives upserts.
const CREATE_QUIZZES: &str = "
CREATE TABLE IF NOT EXISTS quizzes (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT,
    published INTEGER NOT NULL DEFAULT 0,
    invitation_code TEXT,
    user_id TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now'))
)";

const CREATE_QUIZ_QUESTIONS: &str = "
CREATE TABLE IF NOT EXISTS quiz_questions (
    id TEXT PRIMARY KEY,
    quiz_id TEXT NOT NULL,
    text TEXT NOT NULL,
    type TEXT NOT NULL,
    options TEXT NOT NULL,
    correct_answer TEXT,
    order_position INTEGER NOT NULL
)";

pub async fn init(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_QUIZZES).execute(pool).await?;
    sqlx::query(CREATE_QUIZ_QUESTIONS).execute(pool).await?;
    Ok(())
}
