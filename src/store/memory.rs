//! Process-lifetime in-memory stores

use super::{
    Answer, DialogueStore, Question, QuestionId, StoreError, StoreResult, Survey, SurveyId,
    SurveyStore, UserId,
};
use crate::state_machine::DialogueState;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Dialogue labels behind a single mutex
#[derive(Default)]
pub struct InMemoryDialogueStore {
    states: Mutex<HashMap<UserId, DialogueState>>,
}

impl InMemoryDialogueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn states(&self) -> MutexGuard<'_, HashMap<UserId, DialogueState>> {
        // Every write is a single insert/remove, so a poisoned map is still consistent
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl DialogueStore for InMemoryDialogueStore {
    async fn get(&self, user_id: UserId) -> DialogueState {
        self.states().get(&user_id).copied().unwrap_or_default()
    }

    async fn set(&self, user_id: UserId, state: DialogueState) {
        let mut states = self.states();
        if state == DialogueState::Idle {
            states.remove(&user_id);
        } else {
            states.insert(user_id, state);
        }
    }

    async fn clear(&self, user_id: UserId) {
        self.states().remove(&user_id);
    }
}

#[derive(Default)]
struct SurveyTables {
    surveys: BTreeMap<SurveyId, Survey>,
    answers: Vec<Answer>,
    last_id: i64,
}

impl SurveyTables {
    fn survey_mut(&mut self, survey_id: SurveyId) -> StoreResult<&mut Survey> {
        self.surveys
            .get_mut(&survey_id)
            .ok_or(StoreError::SurveyNotFound(survey_id))
    }
}

/// Surveys and answers behind one read/write lock
#[derive(Default)]
pub struct InMemorySurveyStore {
    tables: RwLock<SurveyTables>,
}

impl InMemorySurveyStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, SurveyTables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SurveyTables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SurveyStore for InMemorySurveyStore {
    async fn create_survey(&self, creator_id: UserId, title: &str) -> SurveyId {
        let mut tables = self.write();
        tables.last_id += 1;
        let id = SurveyId(tables.last_id);
        tables.surveys.insert(
            id,
            Survey {
                id,
                creator_id,
                title: title.to_string(),
                description: String::new(),
                questions: Vec::new(),
                is_active: true,
                created_at: Utc::now(),
            },
        );
        tracing::debug!(survey_id = %id, creator_id = %creator_id, "Survey created");
        id
    }

    async fn get_survey(&self, survey_id: SurveyId) -> Option<Survey> {
        self.read().surveys.get(&survey_id).cloned()
    }

    async fn list_active(&self) -> Vec<Survey> {
        self.read()
            .surveys
            .values()
            .filter(|s| s.is_active)
            .cloned()
            .collect()
    }

    async fn list_by_creator(&self, creator_id: UserId) -> Vec<Survey> {
        self.read()
            .surveys
            .values()
            .filter(|s| s.is_active && s.creator_id == creator_id)
            .cloned()
            .collect()
    }

    async fn set_description(&self, survey_id: SurveyId, description: &str) -> StoreResult<()> {
        let mut tables = self.write();
        tables.survey_mut(survey_id)?.description = description.to_string();
        Ok(())
    }

    async fn append_question(&self, survey_id: SurveyId, text: &str) -> StoreResult<QuestionId> {
        let mut tables = self.write();
        let survey = tables.survey_mut(survey_id)?;
        #[allow(clippy::cast_possible_wrap)]
        let question_id = QuestionId(survey.questions.len() as i64 + 1);
        survey.questions.push(Question {
            id: question_id,
            text: text.to_string(),
            options: Vec::new(),
        });
        Ok(question_id)
    }

    async fn append_option(
        &self,
        survey_id: SurveyId,
        question_id: QuestionId,
        option: &str,
    ) -> StoreResult<()> {
        let mut tables = self.write();
        let question = tables
            .survey_mut(survey_id)?
            .questions
            .iter_mut()
            .find(|q| q.id == question_id)
            .ok_or(StoreError::QuestionNotFound {
                survey_id,
                question_id,
            })?;
        question.options.push(option.to_string());
        Ok(())
    }

    async fn record_answer(&self, answer: Answer) -> StoreResult<()> {
        let mut tables = self.write();
        let survey = tables
            .surveys
            .get(&answer.survey_id)
            .ok_or(StoreError::SurveyNotFound(answer.survey_id))?;
        let question = survey
            .question(answer.question_id)
            .ok_or(StoreError::QuestionNotFound {
                survey_id: answer.survey_id,
                question_id: answer.question_id,
            })?;
        if !question.options.contains(&answer.answer) {
            return Err(StoreError::InvalidOption {
                survey_id: answer.survey_id,
                question_id: answer.question_id,
                option: answer.answer,
            });
        }
        tables.answers.push(answer);
        Ok(())
    }

    async fn answers_for(&self, survey_id: SurveyId) -> Vec<Answer> {
        self.read()
            .answers
            .iter()
            .filter(|a| a.survey_id == survey_id)
            .cloned()
            .collect()
    }
}
