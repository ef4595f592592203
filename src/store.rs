//! Survey and dialogue storage
//!
//! Both stores are trait objects owning their own synchronization, so the
//! dialogue runtime only depends on these contracts.

mod memory;
mod types;

pub use memory::{InMemoryDialogueStore, InMemorySurveyStore};
pub use types::*;

use crate::state_machine::DialogueState;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Survey not found: {0}")]
    SurveyNotFound(SurveyId),
    #[error("Question {question_id} not found in survey {survey_id}")]
    QuestionNotFound {
        survey_id: SurveyId,
        question_id: QuestionId,
    },
    #[error("Option {option:?} is not offered by question {question_id} of survey {survey_id}")]
    InvalidOption {
        survey_id: SurveyId,
        question_id: QuestionId,
        option: String,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Per-user dialogue labels. A missing entry reads as `Idle`.
#[async_trait]
pub trait DialogueStore: Send + Sync {
    async fn get(&self, user_id: UserId) -> DialogueState;

    /// Overwrite the label. Setting `Idle` is the same as `clear`.
    async fn set(&self, user_id: UserId, state: DialogueState);

    async fn clear(&self, user_id: UserId);
}

/// Surveys and the append-only answer log
#[async_trait]
pub trait SurveyStore: Send + Sync {
    /// Create an active survey and return its freshly assigned id
    async fn create_survey(&self, creator_id: UserId, title: &str) -> SurveyId;

    async fn get_survey(&self, survey_id: SurveyId) -> Option<Survey>;

    async fn list_active(&self) -> Vec<Survey>;

    async fn list_by_creator(&self, creator_id: UserId) -> Vec<Survey>;

    async fn set_description(&self, survey_id: SurveyId, description: &str) -> StoreResult<()>;

    /// Append a question and return its 1-based id
    async fn append_question(&self, survey_id: SurveyId, text: &str) -> StoreResult<QuestionId>;

    async fn append_option(
        &self,
        survey_id: SurveyId,
        question_id: QuestionId,
        option: &str,
    ) -> StoreResult<()>;

    /// Append an answer. The referenced question must exist and offer the option.
    async fn record_answer(&self, answer: Answer) -> StoreResult<()>;

    /// Answers for one survey in insertion order
    async fn answers_for(&self, survey_id: SurveyId) -> Vec<Answer>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: DialogueStore + ?Sized> DialogueStore for Arc<T> {
    async fn get(&self, user_id: UserId) -> DialogueState {
        (**self).get(user_id).await
    }

    async fn set(&self, user_id: UserId, state: DialogueState) {
        (**self).set(user_id, state).await;
    }

    async fn clear(&self, user_id: UserId) {
        (**self).clear(user_id).await;
    }
}

#[async_trait]
impl<T: SurveyStore + ?Sized> SurveyStore for Arc<T> {
    async fn create_survey(&self, creator_id: UserId, title: &str) -> SurveyId {
        (**self).create_survey(creator_id, title).await
    }

    async fn get_survey(&self, survey_id: SurveyId) -> Option<Survey> {
        (**self).get_survey(survey_id).await
    }

    async fn list_active(&self) -> Vec<Survey> {
        (**self).list_active().await
    }

    async fn list_by_creator(&self, creator_id: UserId) -> Vec<Survey> {
        (**self).list_by_creator(creator_id).await
    }

    async fn set_description(&self, survey_id: SurveyId, description: &str) -> StoreResult<()> {
        (**self).set_description(survey_id, description).await
    }

    async fn append_question(&self, survey_id: SurveyId, text: &str) -> StoreResult<QuestionId> {
        (**self).append_question(survey_id, text).await
    }

    async fn append_option(
        &self,
        survey_id: SurveyId,
        question_id: QuestionId,
        option: &str,
    ) -> StoreResult<()> {
        (**self).append_option(survey_id, question_id, option).await
    }

    async fn record_answer(&self, answer: Answer) -> StoreResult<()> {
        (**self).record_answer(answer).await
    }

    async fn answers_for(&self, survey_id: SurveyId) -> Vec<Answer> {
        (**self).answers_for(survey_id).await
    }
}
