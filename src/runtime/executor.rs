//! Dialogue runtime executor

use super::traits::Transport;
use super::Inbound;

use crate::reply::{self, Reply, GENERIC_ERROR, SELECTION_FAILED};
use crate::state_machine::{transition, DialogueContext, DialogueState, Effect, Event, TransitionError};
use crate::store::{ChatId, DialogueStore, StoreError, SurveyStore, UserId};
use crate::survey_taking::{self, Selection, SelectionError};
use thiserror::Error;
use tokio::sync::mpsc;

/// Per-event failure. Always recovered: logged and answered with a generic reply.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
}

impl RuntimeError {
    /// The survey or question behind the current label is gone
    fn is_not_found(&self) -> bool {
        matches!(
            self,
            RuntimeError::Transition(
                TransitionError::SurveyNotFound(_) | TransitionError::QuestionNotFound { .. }
            ) | RuntimeError::Store(
                StoreError::SurveyNotFound(_) | StoreError::QuestionNotFound { .. }
            )
        )
    }
}

/// Generic dialogue runtime that can work with any store and transport implementations
pub struct BotRuntime<D, S, T>
where
    D: DialogueStore + 'static,
    S: SurveyStore + 'static,
    T: Transport + 'static,
{
    dialogues: D,
    surveys: S,
    transport: T,
}

impl<D, S, T> BotRuntime<D, S, T>
where
    D: DialogueStore + 'static,
    S: SurveyStore + 'static,
    T: Transport + 'static,
{
    pub fn new(dialogues: D, surveys: S, transport: T) -> Self {
        Self {
            dialogues,
            surveys,
            transport,
        }
    }

    /// Process inbound events until every sender is dropped
    pub async fn run(&self, mut inbound_rx: mpsc::Receiver<Inbound>) {
        tracing::info!("Starting dialogue runtime");

        while let Some(inbound) = inbound_rx.recv().await {
            tracing::debug!(user_id = %inbound.user_id(), "Processing inbound event");
            self.handle(inbound).await;
        }

        tracing::info!("Dialogue runtime stopped");
    }

    /// Handle one inbound event. Failures are logged and surfaced to the chat.
    pub async fn handle(&self, inbound: Inbound) {
        match inbound {
            Inbound::Message {
                user_id,
                chat_id,
                text,
            } => {
                if let Err(e) = self.process_message(user_id, chat_id, text).await {
                    tracing::warn!(user_id = %user_id, error = %e, "Failed to handle message");
                    if e.is_not_found() {
                        // Nothing left to author against
                        self.dialogues.clear(user_id).await;
                    }
                    self.send(chat_id, &Reply::text(GENERIC_ERROR)).await;
                }
            }
            Inbound::Selection {
                callback_id,
                user_id,
                chat_id,
                payload,
            } => {
                if let Err(e) = self.process_selection(user_id, chat_id, &payload).await {
                    tracing::warn!(
                        user_id = %user_id,
                        payload = %payload,
                        error = %e,
                        "Failed to handle selection"
                    );
                    self.send(chat_id, &Reply::text(SELECTION_FAILED)).await;
                }
                if let Err(e) = self.transport.acknowledge(&callback_id).await {
                    tracing::warn!(callback_id = %callback_id, error = %e, "Failed to acknowledge selection");
                }
            }
        }
    }

    async fn process_message(
        &self,
        user_id: UserId,
        chat_id: ChatId,
        text: String,
    ) -> Result<(), RuntimeError> {
        let mut state = self.dialogues.get(user_id).await;

        // Store effects feed ids back as events
        let mut events_to_process = vec![Event::from_message(text)];

        while let Some(event) = events_to_process.pop() {
            let survey = match state.survey_id() {
                Some(survey_id) => self.surveys.get_survey(survey_id).await,
                None => None,
            };
            let context = DialogueContext::new(user_id, chat_id).with_survey(survey);

            // Pure state transition
            let result = transition(&state, &context, event)?;

            if result.new_state != state {
                tracing::debug!(
                    user_id = %user_id,
                    from = ?state,
                    to = ?result.new_state,
                    "Dialogue transition"
                );
            }
            state = result.new_state;

            for effect in result.effects {
                if let Some(generated_event) = self.execute_effect(&context, state, effect).await? {
                    events_to_process.push(generated_event);
                }
            }
        }

        Ok(())
    }

    async fn execute_effect(
        &self,
        context: &DialogueContext,
        state: DialogueState,
        effect: Effect,
    ) -> Result<Option<Event>, RuntimeError> {
        let DialogueContext {
            user_id, chat_id, ..
        } = *context;

        match effect {
            Effect::Reply(reply) => {
                self.send(chat_id, &reply).await;
                Ok(None)
            }

            Effect::PersistState => {
                match state {
                    DialogueState::Idle => self.dialogues.clear(user_id).await,
                    state => self.dialogues.set(user_id, state).await,
                }
                Ok(None)
            }

            Effect::CreateSurvey { title } => {
                let survey_id = self.surveys.create_survey(user_id, &title).await;
                tracing::info!(user_id = %user_id, survey_id = %survey_id, "Survey authoring started");
                Ok(Some(Event::SurveyCreated { survey_id }))
            }

            Effect::SetDescription {
                survey_id,
                description,
            } => {
                self.surveys.set_description(survey_id, &description).await?;
                Ok(None)
            }

            Effect::AppendQuestion { survey_id, text } => {
                let question_id = self.surveys.append_question(survey_id, &text).await?;
                tracing::debug!(survey_id = %survey_id, question_id = %question_id, "Question added");
                Ok(Some(Event::QuestionAdded {
                    survey_id,
                    question_id,
                }))
            }

            Effect::AppendOption {
                survey_id,
                question_id,
                option,
            } => {
                self.surveys
                    .append_option(survey_id, question_id, &option)
                    .await?;
                Ok(None)
            }

            Effect::ShowActiveSurveys => {
                let surveys = self.surveys.list_active().await;
                self.send(chat_id, &reply::survey_list(&surveys)).await;
                Ok(None)
            }

            Effect::ShowOwnSurveys => {
                let mut own = Vec::new();
                for survey in self.surveys.list_by_creator(user_id).await {
                    let answers = self.surveys.answers_for(survey.id).await.len();
                    own.push((survey, answers));
                }
                self.send(chat_id, &reply::own_surveys(&own)).await;
                Ok(None)
            }
        }
    }

    async fn process_selection(
        &self,
        user_id: UserId,
        chat_id: ChatId,
        payload: &str,
    ) -> Result<(), RuntimeError> {
        match payload.parse::<Selection>()? {
            Selection::ViewSurvey { survey_id } => {
                let survey = self
                    .surveys
                    .get_survey(survey_id)
                    .await
                    .ok_or(SelectionError::SurveyNotFound(survey_id))?;
                self.send(chat_id, &survey_taking::survey_intro(&survey)).await;
            }
            Selection::Answer {
                survey_id,
                question_id,
                option_index,
            } => {
                let survey = self
                    .surveys
                    .get_survey(survey_id)
                    .await
                    .ok_or(SelectionError::SurveyNotFound(survey_id))?;
                let outcome = survey_taking::answer(&survey, user_id, question_id, option_index)?;
                self.surveys.record_answer(outcome.answer).await?;
                tracing::info!(
                    user_id = %user_id,
                    survey_id = %survey_id,
                    question_id = %question_id,
                    "Answer recorded"
                );
                self.send(chat_id, &outcome.reply).await;
            }
        }
        Ok(())
    }

    /// Fire-and-forget delivery; failures never roll back state
    async fn send(&self, chat_id: ChatId, reply: &Reply) {
        if let Err(e) = self.transport.send(chat_id, reply).await {
            tracing::warn!(chat_id = %chat_id, error = %e, "Failed to deliver reply");
        }
    }
}
