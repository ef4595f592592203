//! Dialogue state types

use crate::store::{ChatId, QuestionId, Survey, SurveyId, UserId};
use serde::{Deserialize, Serialize};

/// What input the bot expects next from a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DialogueState {
    /// No authoring session in progress
    #[default]
    Idle,

    /// "Create survey" received, waiting for the title
    AwaitingTitle,

    /// Survey created, waiting for its description
    AwaitingDescription { survey_id: SurveyId },

    /// Waiting for the text of the next question
    AwaitingQuestion { survey_id: SurveyId },

    /// Collecting options for an open question until "done"
    AwaitingOptions {
        survey_id: SurveyId,
        question_id: QuestionId,
    },

    /// Question closed; add another or finish
    Confirming { survey_id: SurveyId },
}

impl DialogueState {
    /// The survey this label refers to, if any
    pub fn survey_id(&self) -> Option<SurveyId> {
        match self {
            DialogueState::Idle | DialogueState::AwaitingTitle => None,
            DialogueState::AwaitingDescription { survey_id }
            | DialogueState::AwaitingQuestion { survey_id }
            | DialogueState::AwaitingOptions { survey_id, .. }
            | DialogueState::Confirming { survey_id } => Some(*survey_id),
        }
    }
}

/// Per-event context handed to the transition function
#[derive(Debug, Clone)]
pub struct DialogueContext {
    pub user_id: UserId,
    pub chat_id: ChatId,
    /// Snapshot of the survey named by the current label
    pub survey: Option<Survey>,
}

impl DialogueContext {
    pub fn new(user_id: UserId, chat_id: ChatId) -> Self {
        Self {
            user_id,
            chat_id,
            survey: None,
        }
    }

    pub fn with_survey(mut self, survey: Option<Survey>) -> Self {
        self.survey = survey;
        self
    }
}
