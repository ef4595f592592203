//! Events that drive the dialogue

use crate::reply::{ADD_QUESTION, AVAILABLE_SURVEYS, CREATE_SURVEY, MY_SURVEYS};
use crate::store::{QuestionId, SurveyId};

/// Menu commands, recognised in every state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Show the main menu
    Start,
    /// Abandon the current authoring session
    Cancel,
    CreateSurvey,
    ListSurveys,
    MySurveys,
}

impl Command {
    /// Recognise a command from message text (slash commands or menu labels)
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(command) = text.strip_prefix('/') {
            // "/start@my_bot" in group chats; arguments ("/start ref123") are ignored
            let word = command.split_whitespace().next().unwrap_or_default();
            let name = word.split('@').next().unwrap_or_default();
            return match name {
                "start" => Some(Command::Start),
                "stop" | "cancel" => Some(Command::Cancel),
                "create" => Some(Command::CreateSurvey),
                "surveys" => Some(Command::ListSurveys),
                "mysurveys" => Some(Command::MySurveys),
                _ => None,
            };
        }
        match text {
            CREATE_SURVEY | "Создать опрос" => Some(Command::CreateSurvey),
            AVAILABLE_SURVEYS | "Доступные опросы" => Some(Command::ListSurveys),
            MY_SURVEYS | "Мои опросы" => Some(Command::MySurveys),
            _ => None,
        }
    }
}

/// Events that trigger dialogue transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // User events
    Command(Command),
    Text { text: String },

    // Store events, fed back once the store has assigned an id
    SurveyCreated { survey_id: SurveyId },
    QuestionAdded {
        survey_id: SurveyId,
        question_id: QuestionId,
    },
}

impl Event {
    /// Classify an inbound message: commands win over free text
    pub fn from_message(text: impl Into<String>) -> Self {
        let text = text.into();
        match Command::parse(&text) {
            Some(command) => Event::Command(command),
            None => Event::Text { text },
        }
    }
}

/// "done" closes the open question (case-insensitive)
pub fn is_done(text: &str) -> bool {
    let text = text.trim().to_lowercase();
    text == "done" || text == "готово"
}

pub fn is_add_question(text: &str) -> bool {
    let text = text.trim();
    text.eq_ignore_ascii_case(ADD_QUESTION) || text == "Добавить ещё вопрос"
}
