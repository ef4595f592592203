//! Survey, question and answer records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Store-assigned survey identity, strictly increasing
    SurveyId
);
id_type!(
    /// 1-based position of a question within its survey
    QuestionId
);
id_type!(
    /// Messaging platform user identity
    UserId
);
id_type!(
    /// Messaging platform chat identity
    ChatId
);

/// A survey and its ordered questions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Survey {
    pub id: SurveyId,
    pub creator_id: UserId,
    pub title: String,
    pub description: String,
    pub questions: Vec<Question>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Survey {
    /// Look up a question by id
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// The question following `id`, if any
    pub fn next_question(&self, id: QuestionId) -> Option<&Question> {
        self.question(QuestionId(id.0 + 1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<String>,
}

/// A single recorded choice. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub user_id: UserId,
    pub survey_id: SurveyId,
    pub question_id: QuestionId,
    pub answer: String,
    pub answered_at: DateTime<Utc>,
}

impl Answer {
    pub fn new(
        user_id: UserId,
        survey_id: SurveyId,
        question_id: QuestionId,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            survey_id,
            question_id,
            answer: answer.into(),
            answered_at: Utc::now(),
        }
    }
}
