use std::time::Duration;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::generator::UploadedFile;

use super::model::{Question, QuestionId, QuestionOption, QuestionType};

/// Stands in for a real inference round trip.
const PROCESSING_DELAY: Duration = Duration::from_secs(2);

const TOPICS: [&str; 12] = [
    "Neural Networks", "Deep Learning", "Machine Learning",
    "Artificial Intelligence", "Data Science", "Natural Language Processing",
    "Computer Vision", "Reinforcement Learning", "Statistical Analysis",
    "Big Data", "Quantum Computing", "Blockchain",
];

const EASY_PREFIXES: &[&str] = &["What is", "Define", "Explain", "Describe"];
const MEDIUM_PREFIXES: &[&str] = &["How does", "Compare and contrast", "Analyze"];
const HARD_PREFIXES: &[&str] = &["Critically evaluate", "Synthesize", "Hypothesize about"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Unrecognized values get the medium pool.
    pub fn from_param(value: &str) -> Difficulty {
        match value {
            "easy" => Difficulty::Easy,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    fn prefixes(self) -> &'static [&'static str] {
        match self {
            Difficulty::Easy => EASY_PREFIXES,
            Difficulty::Medium => MEDIUM_PREFIXES,
            Difficulty::Hard => HARD_PREFIXES,
        }
    }
}

/// Pretends to read the uploaded material and assembles `count` template
/// questions after a fixed delay. The upload is only acknowledged; nothing
/// reads its content.
pub async fn questions_from_file(
    _file: &UploadedFile,
    count: u32,
    difficulty: Difficulty,
    allowed_types: &[QuestionType],
) -> Vec<Question> {
    tokio::time::sleep(PROCESSING_DELAY).await;

    let mut rng = rand::rng();
    (0..count)
        .map(|i| {
            let kind = allowed_types
                .choose(&mut rng)
                .copied()
                .unwrap_or(QuestionType::Essay);
            let topic = TOPICS.choose(&mut rng).unwrap();
            build_question(i, kind, topic, difficulty, &mut rng)
        })
        .collect()
}

fn build_question(
    position: u32,
    kind: QuestionType,
    topic: &str,
    difficulty: Difficulty,
    rng: &mut impl Rng,
) -> Question {
    let id = QuestionId::New(position);
    match kind {
        QuestionType::MultipleChoice => Question {
            id,
            text: format!("{} {topic}?", difficulty.prefixes().choose(rng).unwrap()),
            kind,
            options: choice_options(topic),
            // the stub always crowns option a
            correct_answer: Some("a".into()),
            order_position: position,
        },
        QuestionType::TrueFalse => Question {
            id,
            text: statement(topic, rng),
            kind,
            options: vec![
                QuestionOption { id: "a".into(), text: "True".into() },
                QuestionOption { id: "b".into(), text: "False".into() },
            ],
            correct_answer: Some(if rng.random_bool(0.5) { "a" } else { "b" }.into()),
            order_position: position,
        },
        QuestionType::Essay => Question {
            id,
            text: essay_prompt(topic, rng),
            kind,
            options: Vec::new(),
            correct_answer: None,
            order_position: position,
        },
    }
}

fn choice_options(topic: &str) -> Vec<QuestionOption> {
    let texts = [
        format!("The primary framework for implementing {topic}"),
        format!("A methodology for analyzing {topic} systems"),
        format!("The process of optimizing {topic} algorithms"),
        format!("An application of {topic} in real-world scenarios"),
    ];
    ["a", "b", "c", "d"]
        .into_iter()
        .zip(texts)
        .map(|(id, text)| QuestionOption { id: id.into(), text })
        .collect()
}

fn statement(topic: &str, rng: &mut impl Rng) -> String {
    match rng.random_range(0..5) {
        0 => format!("{topic} is a fundamental concept in computer science."),
        1 => format!("{topic} can only be implemented using Python."),
        2 => format!("{topic} has applications in healthcare."),
        3 => format!("{topic} requires specialized hardware."),
        _ => format!("{topic} was invented in the 1950s."),
    }
}

fn essay_prompt(topic: &str, rng: &mut impl Rng) -> String {
    match rng.random_range(0..5) {
        0 => format!("Explain the importance of {topic} in modern technology."),
        1 => format!("Discuss the ethical implications of {topic}."),
        2 => format!("How might {topic} evolve over the next decade?"),
        3 => format!("Compare the approaches to {topic} in different industries."),
        _ => format!("What are the limitations of current {topic} technologies?"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload() -> UploadedFile {
        UploadedFile { name: "lecture_notes.pdf".into(), size: 1024 }
    }

    #[tokio::test(start_paused = true)]
    async fn produces_exactly_count_multiple_choice_questions() {
        let questions = questions_from_file(
            &upload(),
            12,
            Difficulty::Medium,
            &[QuestionType::MultipleChoice],
        )
        .await;

        assert_eq!(questions.len(), 12);
        for (i, question) in questions.iter().enumerate() {
            assert_eq!(question.kind, QuestionType::MultipleChoice);
            assert_eq!(question.options.len(), 4);
            assert_eq!(question.correct_answer.as_deref(), Some("a"));
            assert_eq!(question.order_position, i as u32);
            assert_eq!(question.id, QuestionId::New(i as u32));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn zero_count_yields_empty_sequence() {
        let questions =
            questions_from_file(&upload(), 0, Difficulty::Easy, &[QuestionType::Essay]).await;
        assert!(questions.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn true_false_questions_have_two_options_and_an_answer() {
        let questions =
            questions_from_file(&upload(), 20, Difficulty::Hard, &[QuestionType::TrueFalse]).await;

        for question in questions {
            assert_eq!(question.options.len(), 2);
            assert_eq!(question.options[0].text, "True");
            assert_eq!(question.options[1].text, "False");
            let answer = question.correct_answer.as_deref().unwrap();
            assert!(answer == "a" || answer == "b");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn essay_questions_have_no_options_and_no_answer() {
        let questions =
            questions_from_file(&upload(), 5, Difficulty::Medium, &[QuestionType::Essay]).await;

        for question in questions {
            assert!(question.options.is_empty());
            assert_eq!(question.correct_answer, None);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn only_allowed_types_are_generated() {
        let allowed = [QuestionType::TrueFalse, QuestionType::Essay];
        let questions =
            questions_from_file(&upload(), 30, Difficulty::Easy, &allowed).await;

        for question in questions {
            assert!(allowed.contains(&question.kind));
        }
    }

    #[test]
    fn unknown_difficulty_falls_back_to_medium() {
        assert_eq!(Difficulty::from_param("easy"), Difficulty::Easy);
        assert_eq!(Difficulty::from_param("hard"), Difficulty::Hard);
        assert_eq!(Difficulty::from_param("brutal"), Difficulty::Medium);
        assert_eq!(Difficulty::from_param(""), Difficulty::Medium);
    }
}
