//! Pure state transition function
//!
//! Given the same label, context and event it always produces the same
//! outcome. Store mutations and message delivery are returned as effects.

use super::event::{is_add_question, is_done, Command};
use super::{DialogueContext, DialogueState, Effect, Event};
use crate::reply::{self, MIN_OPTIONS};
use crate::store::{Question, QuestionId, Survey, SurveyId};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: DialogueState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: DialogueState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_reply(self, reply: reply::Reply) -> Self {
        self.with_effect(Effect::Reply(reply))
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Survey {0} referenced by the dialogue no longer exists")]
    SurveyNotFound(SurveyId),
    #[error("Question {question_id} not found in survey {survey_id}")]
    QuestionNotFound {
        survey_id: SurveyId,
        question_id: QuestionId,
    },
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

pub fn transition(
    state: &DialogueState,
    context: &DialogueContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (*state, event) {
        // ============================================================
        // Menu commands (any state)
        // ============================================================
        (current, Event::Command(Command::Start)) => {
            Ok(TransitionResult::new(current).with_reply(reply::main_menu("Choose an action:")))
        }

        (_, Event::Command(Command::Cancel)) => Ok(TransitionResult::new(DialogueState::Idle)
            .with_effect(Effect::PersistState)
            .with_reply(reply::cancelled())
            .with_reply(reply::main_menu("Back to the main menu."))),

        (_, Event::Command(Command::CreateSurvey)) => {
            Ok(TransitionResult::new(DialogueState::AwaitingTitle)
                .with_effect(Effect::PersistState)
                .with_reply(reply::ask_title()))
        }

        (current, Event::Command(Command::ListSurveys)) => {
            Ok(TransitionResult::new(current).with_effect(Effect::ShowActiveSurveys))
        }

        (current, Event::Command(Command::MySurveys)) => {
            Ok(TransitionResult::new(current).with_effect(Effect::ShowOwnSurveys))
        }

        // ============================================================
        // Authoring
        // ============================================================
        (DialogueState::Idle, Event::Text { .. }) => Ok(TransitionResult::new(DialogueState::Idle)
            .with_reply(reply::Reply::text(reply::UNKNOWN_COMMAND))),

        // The store assigns the id; the label advances on SurveyCreated
        (DialogueState::AwaitingTitle, Event::Text { text }) => {
            Ok(TransitionResult::new(DialogueState::AwaitingTitle)
                .with_effect(Effect::CreateSurvey { title: text }))
        }

        (DialogueState::AwaitingTitle, Event::SurveyCreated { survey_id }) => {
            Ok(
                TransitionResult::new(DialogueState::AwaitingDescription { survey_id })
                    .with_effect(Effect::PersistState)
                    .with_reply(reply::ask_description()),
            )
        }

        (DialogueState::AwaitingDescription { survey_id }, Event::Text { text }) => {
            require_survey(context, survey_id)?;
            Ok(
                TransitionResult::new(DialogueState::AwaitingQuestion { survey_id })
                    .with_effect(Effect::SetDescription {
                        survey_id,
                        description: text,
                    })
                    .with_effect(Effect::PersistState)
                    .with_reply(reply::ask_question()),
            )
        }

        (DialogueState::AwaitingQuestion { survey_id }, Event::Text { text }) => {
            require_survey(context, survey_id)?;
            Ok(TransitionResult::new(*state)
                .with_effect(Effect::AppendQuestion { survey_id, text }))
        }

        (
            DialogueState::AwaitingQuestion { survey_id },
            Event::QuestionAdded {
                survey_id: added_to,
                question_id,
            },
        ) if added_to == survey_id => Ok(TransitionResult::new(DialogueState::AwaitingOptions {
            survey_id,
            question_id,
        })
        .with_effect(Effect::PersistState)
        .with_reply(reply::ask_options())),

        (
            DialogueState::AwaitingOptions {
                survey_id,
                question_id,
            },
            Event::Text { text },
        ) => {
            let question = require_question(context, survey_id, question_id)?;
            if is_done(&text) {
                if question.options.len() < MIN_OPTIONS {
                    return Ok(TransitionResult::new(*state)
                        .with_reply(reply::need_more_options(question.options.len())));
                }
                return Ok(TransitionResult::new(DialogueState::Confirming { survey_id })
                    .with_effect(Effect::PersistState)
                    .with_reply(reply::ask_confirmation()));
            }
            let added = reply::option_added(&text);
            Ok(TransitionResult::new(*state)
                .with_effect(Effect::AppendOption {
                    survey_id,
                    question_id,
                    option: text,
                })
                .with_reply(added))
        }

        (DialogueState::Confirming { survey_id }, Event::Text { text }) => {
            if is_add_question(&text) {
                return Ok(
                    TransitionResult::new(DialogueState::AwaitingQuestion { survey_id })
                        .with_effect(Effect::PersistState)
                        .with_reply(reply::ask_question()),
                );
            }
            Ok(TransitionResult::new(DialogueState::Idle)
                .with_effect(Effect::PersistState)
                .with_reply(reply::survey_saved()))
        }

        // ============================================================
        // Invalid Transitions
        // ============================================================
        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {state:?} with event {event:?}"
        ))),
    }
}

fn require_survey(
    context: &DialogueContext,
    survey_id: SurveyId,
) -> Result<&Survey, TransitionError> {
    context
        .survey
        .as_ref()
        .filter(|s| s.id == survey_id)
        .ok_or(TransitionError::SurveyNotFound(survey_id))
}

fn require_question(
    context: &DialogueContext,
    survey_id: SurveyId,
    question_id: QuestionId,
) -> Result<&Question, TransitionError> {
    require_survey(context, survey_id)?
        .question(question_id)
        .ok_or(TransitionError::QuestionNotFound {
            survey_id,
            question_id,
        })
}
