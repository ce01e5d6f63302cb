use serde::Deserialize;

use crate::{AppError, AppResult, include_res};

use super::model::{Question, QuestionId, QuestionOption, QuestionType};

/// Form payload shared by the wizard preview and the quiz edit page.
#[derive(Debug, Deserialize)]
pub struct QuestionForm {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub option_a: String,
    #[serde(default)]
    pub option_b: String,
    #[serde(default)]
    pub option_c: String,
    #[serde(default)]
    pub option_d: String,
    #[serde(default)]
    pub correct_answer: String,
}

impl QuestionForm {
    /// Builds a fresh question; the owning draft assigns id and position.
    pub fn into_question(self) -> AppResult<Question> {
        let (text, kind, options, correct_answer) = self.into_parts()?;
        Ok(Question {
            id: QuestionId::New(0),
            text,
            kind,
            options,
            correct_answer,
            order_position: 0,
        })
    }

    /// Overwrites everything but id and position.
    pub fn apply_to(self, question: &mut Question) -> AppResult<()> {
        let (text, kind, options, correct_answer) = self.into_parts()?;
        question.text = text;
        question.kind = kind;
        question.options = options;
        question.correct_answer = correct_answer;
        Ok(())
    }

    fn into_parts(self) -> AppResult<(String, QuestionType, Vec<QuestionOption>, Option<String>)> {
        let kind = QuestionType::parse(&self.kind)
            .ok_or_else(|| AppError::Validation("Unknown question type".into()))?;
        if self.text.trim().is_empty() {
            return Err(AppError::Validation("Question text is required".into()));
        }

        Ok(match kind {
            QuestionType::MultipleChoice => {
                let options = vec![
                    QuestionOption { id: "a".into(), text: self.option_a },
                    QuestionOption { id: "b".into(), text: self.option_b },
                    QuestionOption { id: "c".into(), text: self.option_c },
                    QuestionOption { id: "d".into(), text: self.option_d },
                ];
                let correct = if self.correct_answer.is_empty() {
                    "a".to_owned()
                } else {
                    self.correct_answer
                };
                if !options.iter().any(|option| option.id == correct) {
                    return Err(AppError::Validation(
                        "Correct answer must name one of the options".into(),
                    ));
                }
                (self.text, kind, options, Some(correct))
            }
            QuestionType::TrueFalse => {
                let options = vec![
                    QuestionOption { id: "a".into(), text: "True".into() },
                    QuestionOption { id: "b".into(), text: "False".into() },
                ];
                let correct = match self.correct_answer.as_str() {
                    "b" => "b",
                    _ => "a",
                };
                (self.text, kind, options, Some(correct.to_owned()))
            }
            QuestionType::Essay => (self.text, kind, Vec::new(), None),
        })
    }
}

pub fn question_item_html(question: &Question, post_base: &str) -> String {
    let mut options = String::new();
    for option in &question.options {
        let marker = if question.correct_answer.as_deref() == Some(option.id.as_str()) {
            " (correct)"
        } else {
            ""
        };
        options += &format!(
            "<li><strong>{}.</strong> {}{marker}</li>\n",
            option.id, option.text
        );
    }

    let option_text = |id: &str| {
        question
            .options
            .iter()
            .find(|option| option.id == id)
            .map(|option| option.text.as_str())
            .unwrap_or("")
    };

    include_res!(str, "/pages/question_item.html")
        .replace("{base}", post_base)
        .replace("{qid}", &question.id.to_string())
        .replace("{number}", &(question.order_position + 1).to_string())
        .replace("{kind_label}", question.kind.label())
        .replace("{options}", &options)
        .replace("{option_a}", option_text("a"))
        .replace("{option_b}", option_text("b"))
        .replace("{option_c}", option_text("c"))
        .replace("{option_d}", option_text("d"))
        .replace("{correct}", question.correct_answer.as_deref().unwrap_or(""))
        .replace("{text}", &question.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(kind: &str) -> QuestionForm {
        QuestionForm {
            text: "What is a monad?".into(),
            kind: kind.into(),
            option_a: "one".into(),
            option_b: "two".into(),
            option_c: "three".into(),
            option_d: "four".into(),
            correct_answer: String::new(),
        }
    }

    #[test]
    fn multiple_choice_defaults_correct_answer_to_a() {
        let question = form("multiple_choice").into_question().unwrap();
        assert_eq!(question.options.len(), 4);
        assert_eq!(question.correct_answer.as_deref(), Some("a"));
    }

    #[test]
    fn correct_answer_must_match_an_option() {
        let mut bad = form("multiple_choice");
        bad.correct_answer = "e".into();
        assert!(matches!(bad.into_question(), Err(AppError::Validation(_))));

        let mut good = form("multiple_choice");
        good.correct_answer = "c".into();
        let question = good.into_question().unwrap();
        assert_eq!(question.correct_answer.as_deref(), Some("c"));
    }

    #[test]
    fn essay_forms_drop_options_and_answer() {
        let question = form("essay").into_question().unwrap();
        assert!(question.options.is_empty());
        assert_eq!(question.correct_answer, None);
    }

    #[test]
    fn switching_type_on_edit_rebuilds_options() {
        let mut question = form("multiple_choice").into_question().unwrap();
        let original_id = question.id;

        form("true_false").apply_to(&mut question).unwrap();
        assert_eq!(question.id, original_id);
        assert_eq!(question.kind, QuestionType::TrueFalse);
        assert_eq!(question.options.len(), 2);
        assert_eq!(question.correct_answer.as_deref(), Some("a"));
    }

    #[test]
    fn blank_text_is_rejected() {
        let mut blank = form("essay");
        blank.text = "   ".into();
        assert!(matches!(blank.into_question(), Err(AppError::Validation(_))));
    }
}
