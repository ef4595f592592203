//! Outbound replies and the bot's fixed texts

use crate::store::{Question, Survey};
use crate::survey_taking::Selection;

pub const CREATE_SURVEY: &str = "Create survey";
pub const MY_SURVEYS: &str = "My surveys";
pub const AVAILABLE_SURVEYS: &str = "Available surveys";
pub const ADD_QUESTION: &str = "Add another question";
pub const FINISH_SURVEY: &str = "Finish survey";

pub const UNKNOWN_COMMAND: &str = "Unknown command. Send /start to see the menu.";
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again.";
pub const SELECTION_FAILED: &str = "Could not process this selection.";

/// Minimum options a question needs before authoring can move past it
pub const MIN_OPTIONS: usize = 2;

/// A labeled button carrying a selection payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub payload: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// Persistent keyboard whose buttons send their label as text
    Reply(Vec<Vec<String>>),
    /// Buttons attached to the message that produce selection events
    Inline(Vec<Vec<InlineButton>>),
    /// Hide any persistent keyboard
    Remove,
}

/// A text message plus optional button layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

fn reply_rows(rows: Vec<Vec<&str>>) -> Keyboard {
    Keyboard::Reply(
        rows.into_iter()
            .map(|row| row.into_iter().map(str::to_string).collect())
            .collect(),
    )
}

pub fn main_menu(text: &str) -> Reply {
    Reply::text(text).with_keyboard(reply_rows(vec![
        vec![CREATE_SURVEY, MY_SURVEYS],
        vec![AVAILABLE_SURVEYS],
    ]))
}

pub fn ask_title() -> Reply {
    Reply::text("Enter the survey title:").with_keyboard(Keyboard::Remove)
}

pub fn ask_description() -> Reply {
    Reply::text("Enter the survey description:")
}

pub fn ask_question() -> Reply {
    Reply::text("Enter a question:").with_keyboard(Keyboard::Remove)
}

pub fn ask_options() -> Reply {
    Reply::text("Send answer options one per message. Type 'done' when finished:")
}

pub fn option_added(option: &str) -> Reply {
    Reply::text(format!(
        "Option '{option}' added. Send another option or type 'done':"
    ))
}

pub fn need_more_options(have: usize) -> Reply {
    Reply::text(format!(
        "A question needs at least {MIN_OPTIONS} options (it has {have}). Keep adding options:"
    ))
}

pub fn ask_confirmation() -> Reply {
    Reply::text("Add another question or finish the survey?")
        .with_keyboard(reply_rows(vec![vec![ADD_QUESTION, FINISH_SURVEY]]))
}

pub fn survey_saved() -> Reply {
    main_menu("Survey saved. Choose an action:")
}

pub fn cancelled() -> Reply {
    Reply::text("Current operation cancelled.").with_keyboard(Keyboard::Remove)
}

/// Inline list of surveys, one button per survey
pub fn survey_list(surveys: &[Survey]) -> Reply {
    if surveys.is_empty() {
        return Reply::text("No surveys available.");
    }
    let rows = surveys
        .iter()
        .map(|survey| {
            vec![InlineButton {
                label: survey.title.clone(),
                payload: Selection::ViewSurvey {
                    survey_id: survey.id,
                }
                .payload(),
            }]
        })
        .collect();
    Reply::text("Available surveys:").with_keyboard(Keyboard::Inline(rows))
}

/// The caller's own surveys with how many answers each has collected
pub fn own_surveys(surveys: &[(Survey, usize)]) -> Reply {
    if surveys.is_empty() {
        return Reply::text("You have not created any surveys.");
    }
    let mut text = String::from("Your surveys:\n");
    for (survey, answers) in surveys {
        text.push_str(&format!(
            "\n• {} ({}, {})",
            survey.title,
            count(survey.questions.len(), "question"),
            count(*answers, "answer")
        ));
    }
    Reply::text(text)
}

fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// A question with one button per option
pub fn question_prompt(survey: &Survey, question: &Question, heading: String) -> Reply {
    let rows = question
        .options
        .iter()
        .enumerate()
        .map(|(option_index, option)| {
            vec![InlineButton {
                label: option.clone(),
                payload: Selection::Answer {
                    survey_id: survey.id,
                    question_id: question.id,
                    option_index,
                }
                .payload(),
            }]
        })
        .collect();
    Reply::text(heading).with_keyboard(Keyboard::Inline(rows))
}
