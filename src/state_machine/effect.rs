//! Effects produced by dialogue transitions

use crate::reply::Reply;
use crate::store::{QuestionId, SurveyId};

/// Effects to be executed after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send a message to the user's chat
    Reply(Reply),

    /// Persist the new label (clears it when idle)
    PersistState,

    /// Create a survey; yields `Event::SurveyCreated`
    CreateSurvey { title: String },

    SetDescription {
        survey_id: SurveyId,
        description: String,
    },

    /// Append a question; yields `Event::QuestionAdded`
    AppendQuestion { survey_id: SurveyId, text: String },

    AppendOption {
        survey_id: SurveyId,
        question_id: QuestionId,
        option: String,
    },

    /// Reply with the list of active surveys
    ShowActiveSurveys,

    /// Reply with the surveys the user created
    ShowOwnSurveys,
}
