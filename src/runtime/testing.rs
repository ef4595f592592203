//! Mock implementations for testing
//!
//! These mocks enable integration testing without real I/O.

use super::traits::*;
use super::{BotRuntime, Inbound};
use crate::reply::Reply;
use crate::store::{ChatId, InMemoryDialogueStore, InMemorySurveyStore, UserId};
use crate::telegram::TransportError;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

// ============================================================================
// Recording Transport
// ============================================================================

/// Transport that records every delivery instead of sending it
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(ChatId, Reply)>>,
    acknowledged: Mutex<Vec<String>>,
    fail_sends: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose sends always fail (acknowledgements still succeed)
    pub fn failing() -> Self {
        Self {
            fail_sends: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(ChatId, Reply)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|(_, reply)| reply.text).collect()
    }

    pub fn last_text(&self) -> Option<String> {
        self.texts().pop()
    }

    pub fn acknowledged(&self) -> Vec<String> {
        self.acknowledged.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, chat_id: ChatId, reply: &Reply) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push((chat_id, reply.clone()));
        if self.fail_sends {
            return Err(TransportError::Api {
                code: 403,
                description: "Forbidden: bot was blocked by the user".to_string(),
            });
        }
        Ok(())
    }

    async fn acknowledge(&self, callback_id: &str) -> Result<(), TransportError> {
        self.acknowledged
            .lock()
            .unwrap()
            .push(callback_id.to_string());
        Ok(())
    }
}

// ============================================================================
// Test Runtime
// ============================================================================

pub type TestRuntime =
    BotRuntime<Arc<InMemoryDialogueStore>, Arc<InMemorySurveyStore>, Arc<RecordingTransport>>;

/// Runtime wired to in-memory stores, with handles kept for inspection
pub struct Harness {
    pub runtime: TestRuntime,
    pub dialogues: Arc<InMemoryDialogueStore>,
    pub surveys: Arc<InMemorySurveyStore>,
    pub transport: Arc<RecordingTransport>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_transport(RecordingTransport::new())
    }

    pub fn with_transport(transport: RecordingTransport) -> Self {
        let dialogues = Arc::new(InMemoryDialogueStore::new());
        let surveys = Arc::new(InMemorySurveyStore::new());
        let transport = Arc::new(transport);
        Self {
            runtime: BotRuntime::new(dialogues.clone(), surveys.clone(), transport.clone()),
            dialogues,
            surveys,
            transport,
        }
    }

    /// User `user` types `text` in their private chat (chat id = user id)
    pub async fn say(&self, user: i64, text: &str) {
        self.runtime
            .handle(Inbound::Message {
                user_id: UserId(user),
                chat_id: ChatId(user),
                text: text.to_string(),
            })
            .await;
    }

    /// User `user` presses an inline button carrying `payload`
    pub async fn press(&self, user: i64, payload: &str) {
        self.runtime
            .handle(Inbound::Selection {
                callback_id: format!("cb-{user}-{payload}"),
                user_id: UserId(user),
                chat_id: ChatId(user),
                payload: payload.to_string(),
            })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reply::{self, Keyboard, GENERIC_ERROR, SELECTION_FAILED, UNKNOWN_COMMAND};
    use crate::state_machine::DialogueState;
    use crate::store::{DialogueStore, QuestionId, SurveyId, SurveyStore};
    use crate::survey_taking::{COMPLETED, NO_QUESTIONS};

    const AUTHOR: i64 = 10;

    /// Author a two-question survey and return its id
    async fn author_lunch_survey(h: &Harness) -> SurveyId {
        for text in [
            "/start",
            "Create survey",
            "Lunch",
            "Team lunch",
            "Where?",
            "Cafe",
            "Park",
            "done",
            "Add another question",
            "When?",
            "Noon",
            "One",
            "done",
            "Finish survey",
        ] {
            h.say(AUTHOR, text).await;
        }
        h.surveys.list_by_creator(UserId(AUTHOR)).await[0].id
    }

    #[tokio::test]
    async fn test_full_authoring_scenario() {
        let h = Harness::new();
        for text in ["Create survey", "T", "D", "Q1", "A", "B", "Готово"] {
            h.say(AUTHOR, text).await;
        }
        assert!(matches!(
            h.dialogues.get(UserId(AUTHOR)).await,
            DialogueState::Confirming { .. }
        ));
        h.say(AUTHOR, "Finish survey").await;

        assert_eq!(h.dialogues.get(UserId(AUTHOR)).await, DialogueState::Idle);
        let surveys = h.surveys.list_active().await;
        assert_eq!(surveys.len(), 1);
        let survey = &surveys[0];
        assert_eq!(survey.title, "T");
        assert_eq!(survey.description, "D");
        assert!(survey.is_active);
        assert_eq!(survey.questions.len(), 1);
        assert_eq!(survey.questions[0].text, "Q1");
        assert_eq!(survey.questions[0].options, vec!["A", "B"]);
        assert_eq!(h.transport.last_text().unwrap(), reply::survey_saved().text);
    }

    #[tokio::test]
    async fn test_each_step_is_persisted() {
        let h = Harness::new();
        h.say(AUTHOR, "Create survey").await;
        assert_eq!(h.dialogues.get(UserId(AUTHOR)).await, DialogueState::AwaitingTitle);

        h.say(AUTHOR, "T").await;
        let survey_id = h.surveys.list_active().await[0].id;
        assert_eq!(
            h.dialogues.get(UserId(AUTHOR)).await,
            DialogueState::AwaitingDescription { survey_id }
        );

        h.say(AUTHOR, "D").await;
        h.say(AUTHOR, "Q1").await;
        assert_eq!(
            h.dialogues.get(UserId(AUTHOR)).await,
            DialogueState::AwaitingOptions {
                survey_id,
                question_id: QuestionId(1)
            }
        );
    }

    #[tokio::test]
    async fn test_done_with_one_option_reprompts() {
        let h = Harness::new();
        for text in ["Create survey", "T", "D", "Q1", "A", "done"] {
            h.say(AUTHOR, text).await;
        }
        assert!(matches!(
            h.dialogues.get(UserId(AUTHOR)).await,
            DialogueState::AwaitingOptions { .. }
        ));
        assert_eq!(h.transport.last_text().unwrap(), reply::need_more_options(1).text);
    }

    #[tokio::test]
    async fn test_cancel_mid_authoring_keeps_partial_survey() {
        let h = Harness::new();
        for text in ["Create survey", "T", "D", "/stop"] {
            h.say(AUTHOR, text).await;
        }
        assert_eq!(h.dialogues.get(UserId(AUTHOR)).await, DialogueState::Idle);
        // abandoned drafts stay in the store
        assert_eq!(h.surveys.list_active().await.len(), 1);
    }

    #[tokio::test]
    async fn test_stop_with_arguments_cancels_option_collection() {
        let h = Harness::new();
        for text in ["Create survey", "T", "D", "Q1", "A", "/stop now"] {
            h.say(AUTHOR, text).await;
        }
        assert_eq!(h.dialogues.get(UserId(AUTHOR)).await, DialogueState::Idle);
        let survey = &h.surveys.list_active().await[0];
        assert_eq!(survey.questions[0].options, vec!["A"]);
    }

    #[tokio::test]
    async fn test_start_with_deep_link_parameter_shows_menu() {
        let h = Harness::new();
        h.say(AUTHOR, "/start ref123").await;
        assert_eq!(
            h.transport.last_text().unwrap(),
            reply::main_menu("Choose an action:").text
        );
    }

    #[tokio::test]
    async fn test_idle_free_text_is_unknown_command() {
        let h = Harness::new();
        h.say(AUTHOR, "hello").await;
        assert_eq!(h.transport.texts(), vec![UNKNOWN_COMMAND.to_string()]);
        assert_eq!(h.dialogues.get(UserId(AUTHOR)).await, DialogueState::Idle);
    }

    #[tokio::test]
    async fn test_vanished_survey_resets_dialogue() {
        let h = Harness::new();
        h.dialogues
            .set(
                UserId(AUTHOR),
                DialogueState::AwaitingQuestion {
                    survey_id: SurveyId(99),
                },
            )
            .await;

        h.say(AUTHOR, "Q1").await;

        assert_eq!(h.transport.last_text().unwrap(), GENERIC_ERROR);
        assert_eq!(h.dialogues.get(UserId(AUTHOR)).await, DialogueState::Idle);
    }

    #[tokio::test]
    async fn test_listing_shows_survey_buttons() {
        let h = Harness::new();
        let survey_id = author_lunch_survey(&h).await;
        h.transport.clear();

        h.say(20, "Available surveys").await;

        let sent = h.transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, ChatId(20));
        let Some(Keyboard::Inline(rows)) = &sent[0].1.keyboard else {
            panic!("expected inline keyboard");
        };
        assert_eq!(rows[0][0].label, "Lunch");
        assert_eq!(rows[0][0].payload, format!("survey_{survey_id}"));
    }

    #[tokio::test]
    async fn test_taking_a_survey_end_to_end() {
        let h = Harness::new();
        let survey_id = author_lunch_survey(&h).await;
        h.transport.clear();

        h.press(20, &format!("survey_{survey_id}")).await;
        assert!(h.transport.last_text().unwrap().ends_with("Question 1: Where?"));

        h.press(20, &format!("ans_{survey_id}_1_1")).await;
        assert_eq!(h.transport.last_text().unwrap(), "Question 2: When?");

        // last option of the last question
        h.press(20, &format!("ans_{survey_id}_2_1")).await;
        let last = h.transport.sent().pop().unwrap().1;
        assert_eq!(last.text, COMPLETED);
        assert!(last.keyboard.is_none());

        let answers = h.surveys.answers_for(survey_id).await;
        let recorded: Vec<_> = answers.iter().map(|a| a.answer.as_str()).collect();
        assert_eq!(recorded, vec!["Park", "One"]);
        assert_eq!(h.transport.acknowledged().len(), 3);
    }

    #[tokio::test]
    async fn test_answers_from_two_users_arrive_in_order() {
        let h = Harness::new();
        let survey_id = author_lunch_survey(&h).await;

        h.press(20, &format!("ans_{survey_id}_1_0")).await;
        h.press(30, &format!("ans_{survey_id}_1_1")).await;

        let answers = h.surveys.answers_for(survey_id).await;
        assert_eq!(answers.len(), 2);
        assert_eq!(answers[0].user_id, UserId(20));
        assert_eq!(answers[0].answer, "Cafe");
        assert_eq!(answers[1].user_id, UserId(30));
        assert_eq!(answers[1].answer, "Park");
    }

    #[tokio::test]
    async fn test_malformed_selections_change_nothing() {
        let h = Harness::new();
        let survey_id = author_lunch_survey(&h).await;
        let before = h.surveys.get_survey(survey_id).await;
        h.transport.clear();

        for payload in [
            "ans_1_2".to_string(),
            "survey_x".to_string(),
            "vote_1".to_string(),
            format!("ans_{survey_id}_1_7"),
            format!("ans_{survey_id}_9_0"),
            "survey_404".to_string(),
        ] {
            h.press(20, &payload).await;
        }

        assert!(h.transport.texts().iter().all(|t| t == SELECTION_FAILED));
        assert_eq!(h.transport.acknowledged().len(), 6);
        assert!(h.surveys.answers_for(survey_id).await.is_empty());
        assert_eq!(h.surveys.get_survey(survey_id).await, before);
        assert_eq!(h.dialogues.get(UserId(20)).await, DialogueState::Idle);
    }

    #[tokio::test]
    async fn test_survey_without_questions() {
        let h = Harness::new();
        h.say(AUTHOR, "Create survey").await;
        h.say(AUTHOR, "Empty").await;
        let survey_id = h.surveys.list_active().await[0].id;

        h.press(20, &format!("survey_{survey_id}")).await;
        assert!(h.transport.last_text().unwrap().ends_with(NO_QUESTIONS));
    }

    #[tokio::test]
    async fn test_my_surveys_counts_answers() {
        let h = Harness::new();
        let survey_id = author_lunch_survey(&h).await;
        h.press(20, &format!("ans_{survey_id}_1_0")).await;
        h.transport.clear();

        h.say(AUTHOR, "My surveys").await;
        assert!(h
            .transport
            .last_text()
            .unwrap()
            .contains("Lunch (2 questions, 1 answer)"));

        h.say(20, "Мои опросы").await;
        assert_eq!(
            h.transport.last_text().unwrap(),
            reply::own_surveys(&[]).text
        );
    }

    #[tokio::test]
    async fn test_delivery_failure_does_not_roll_back() {
        let h = Harness::with_transport(RecordingTransport::failing());
        for text in ["Create survey", "T", "D"] {
            h.say(AUTHOR, text).await;
        }
        assert!(matches!(
            h.dialogues.get(UserId(AUTHOR)).await,
            DialogueState::AwaitingQuestion { .. }
        ));
        assert_eq!(h.surveys.list_active().await[0].description, "D");
    }

    #[tokio::test]
    async fn test_run_drains_channel_in_order() {
        let h = Harness::new();
        let (tx, rx) = tokio::sync::mpsc::channel(8);
        for text in ["Create survey", "T"] {
            tx.send(Inbound::Message {
                user_id: UserId(AUTHOR),
                chat_id: ChatId(AUTHOR),
                text: text.to_string(),
            })
            .await
            .unwrap();
        }
        drop(tx);

        h.runtime.run(rx).await;

        assert!(matches!(
            h.dialogues.get(UserId(AUTHOR)).await,
            DialogueState::AwaitingDescription { .. }
        ));
    }
}
