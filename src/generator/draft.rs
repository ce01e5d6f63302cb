use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::AppResult;
use crate::quizzes::generate::Difficulty;
use crate::quizzes::model::{Question, QuestionId, QuestionType};
use crate::session::DRAFT;

use super::upload::UploadedFile;

/// Wizard tabs in flow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    Upload,
    Customize,
    Preview,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub num_questions: u32,
    pub question_types: Vec<QuestionType>,
    pub difficulty: Difficulty,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        GenerationSettings {
            num_questions: 10,
            question_types: vec![
                QuestionType::MultipleChoice,
                QuestionType::TrueFalse,
                QuestionType::Essay,
            ],
            difficulty: Difficulty::Medium,
        }
    }
}

/// Draft quiz held in the session until publish commits it. Abandoning the
/// flow discards it with the session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizDraft {
    pub title: String,
    pub description: String,
    pub file: Option<UploadedFile>,
    pub settings: GenerationSettings,
    pub questions: Vec<Question>,
    next_tag: u32,
}

impl QuizDraft {
    pub fn step_allowed(&self, step: Step) -> bool {
        match step {
            Step::Upload => true,
            Step::Customize => self.file.is_some() && !self.title.trim().is_empty(),
            Step::Preview => self.step_allowed(Step::Customize) && !self.questions.is_empty(),
        }
    }

    /// Replaces the question set with a freshly generated one.
    pub fn set_questions(&mut self, questions: Vec<Question>) {
        self.next_tag = questions.len() as u32;
        self.questions = questions;
    }

    pub fn add_question(&mut self, mut question: Question) {
        question.id = QuestionId::New(self.next_tag);
        self.next_tag += 1;
        question.order_position = self
            .questions
            .iter()
            .map(|q| q.order_position + 1)
            .max()
            .unwrap_or(0);
        self.questions.push(question);
    }

    pub fn question_mut(&mut self, id: QuestionId) -> Option<&mut Question> {
        self.questions.iter_mut().find(|q| q.id == id)
    }

    pub fn remove_question(&mut self, id: QuestionId) -> bool {
        let before = self.questions.len();
        self.questions.retain(|q| q.id != id);
        self.questions.len() != before
    }
}

pub async fn load(session: &Session) -> AppResult<QuizDraft> {
    Ok(session.get::<QuizDraft>(DRAFT).await?.unwrap_or_default())
}

pub async fn store(session: &Session, draft: &QuizDraft) -> AppResult<()> {
    session.insert(DRAFT, draft).await?;
    Ok(())
}

pub async fn clear(session: &Session) -> AppResult<()> {
    session.remove::<QuizDraft>(DRAFT).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::quizzes::model::QuestionOption;

    use super::*;

    fn essay(text: &str) -> Question {
        Question {
            id: QuestionId::New(0),
            text: text.into(),
            kind: QuestionType::Essay,
            options: Vec::new(),
            correct_answer: None,
            order_position: 0,
        }
    }

    #[test]
    fn empty_draft_only_allows_upload() {
        let draft = QuizDraft::default();
        assert!(draft.step_allowed(Step::Upload));
        assert!(!draft.step_allowed(Step::Customize));
        assert!(!draft.step_allowed(Step::Preview));
    }

    #[test]
    fn customize_needs_both_file_and_title() {
        let mut draft = QuizDraft::default();
        draft.file = Some(UploadedFile { name: "notes.txt".into(), size: 10 });
        assert!(!draft.step_allowed(Step::Customize));

        draft.title = "   ".into();
        assert!(!draft.step_allowed(Step::Customize));

        draft.title = "Week 1".into();
        assert!(draft.step_allowed(Step::Customize));
        assert!(!draft.step_allowed(Step::Preview));
    }

    #[test]
    fn preview_needs_at_least_one_question() {
        let mut draft = QuizDraft::default();
        draft.title = "Week 1".into();
        draft.file = Some(UploadedFile { name: "notes.txt".into(), size: 10 });
        draft.set_questions(vec![essay("Discuss.")]);
        assert!(draft.step_allowed(Step::Preview));

        let id = draft.questions[0].id;
        assert!(draft.remove_question(id));
        assert!(!draft.step_allowed(Step::Preview));
    }

    #[test]
    fn added_questions_get_unique_tags_and_next_position() {
        let mut draft = QuizDraft::default();
        draft.set_questions(vec![essay("One."), essay("Two.")]);
        draft.questions[0].id = QuestionId::New(0);
        draft.questions[1].id = QuestionId::New(1);
        draft.questions[1].order_position = 1;

        draft.add_question(essay("Three."));
        let added = &draft.questions[2];
        assert_eq!(added.id, QuestionId::New(2));
        assert_eq!(added.order_position, 2);

        draft.add_question(essay("Four."));
        assert_eq!(draft.questions[3].id, QuestionId::New(3));
    }

    #[test]
    fn remove_question_reports_missing_ids() {
        let mut draft = QuizDraft::default();
        draft.set_questions(vec![essay("One.")]);
        assert!(!draft.remove_question(QuestionId::New(99)));
        assert_eq!(draft.questions.len(), 1);
    }

    #[test]
    fn question_mut_finds_by_id() {
        let mut draft = QuizDraft::default();
        let mut q = essay("One.");
        q.options = vec![QuestionOption { id: "a".into(), text: "True".into() }];
        draft.set_questions(vec![q]);

        let id = draft.questions[0].id;
        assert!(draft.question_mut(id).is_some());
        assert!(draft.question_mut(QuestionId::New(42)).is_none());
    }
}
