use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    Essay,
}

impl QuestionType {
    pub fn as_str(self) -> &'static str {
        use QuestionType::*;
        match self {
            MultipleChoice => "multiple_choice",
            TrueFalse => "true_false",
            Essay => "essay",
        }
    }

    pub fn label(self) -> &'static str {
        use QuestionType::*;
        match self {
            MultipleChoice => "Multiple Choice",
            TrueFalse => "True/False",
            Essay => "Essay",
        }
    }

    pub fn parse(value: &str) -> Option<QuestionType> {
        use QuestionType::*;
        match value {
            "multiple_choice" => Some(MultipleChoice),
            "true_false" => Some(TrueFalse),
            "essay" => Some(Essay),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: String,
    pub text: String,
}

/// Identity of a question within a draft: `New` questions carry a
/// draft-local tag until save mints them a real id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionId {
    New(u32),
    Existing(Uuid),
}

impl QuestionId {
    pub fn parse(value: &str) -> Option<QuestionId> {
        if let Some(tag) = value.strip_prefix("new-") {
            tag.parse().ok().map(QuestionId::New)
        } else {
            Uuid::parse_str(value).ok().map(QuestionId::Existing)
        }
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            QuestionId::New(tag) => write!(f, "new-{tag}"),
            QuestionId::Existing(id) => write!(f, "{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub options: Vec<QuestionOption>,
    pub correct_answer: Option<String>,
    pub order_position: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub published: bool,
    pub invitation_code: Option<String>,
    pub user_id: Option<String>,
    pub created_at: Option<String>,
}

impl Quiz {
    pub fn draft(title: &str, description: &str) -> Quiz {
        Quiz {
            id: None,
            title: title.to_owned(),
            description: (!description.trim().is_empty()).then(|| description.to_owned()),
            published: false,
            invitation_code: None,
            user_id: None,
            created_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_type_round_trips_through_str() {
        for kind in [QuestionType::MultipleChoice, QuestionType::TrueFalse, QuestionType::Essay] {
            assert_eq!(QuestionType::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(QuestionType::parse("fill_in_the_blank"), None);
    }

    #[test]
    fn question_id_round_trips_through_display() {
        let new = QuestionId::New(7);
        assert_eq!(QuestionId::parse(&new.to_string()), Some(new));

        let existing = QuestionId::Existing(Uuid::now_v7());
        assert_eq!(QuestionId::parse(&existing.to_string()), Some(existing));

        assert_eq!(QuestionId::parse("new-x"), None);
        assert_eq!(QuestionId::parse("not-a-uuid"), None);
    }

    #[test]
    fn blank_description_becomes_none() {
        assert_eq!(Quiz::draft("Quiz", "  ").description, None);
        assert_eq!(Quiz::draft("Quiz", "intro").description.as_deref(), Some("intro"));
    }
}
