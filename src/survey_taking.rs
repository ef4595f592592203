//! Survey taking through inline selections
//!
//! Respondents never touch the dialogue label: every button press carries the
//! full address of what was chosen, so each selection is handled on its own.

use crate::reply::{self, Reply};
use crate::store::{Answer, Question, QuestionId, Survey, SurveyId, UserId};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const COMPLETED: &str = "Thank you for taking the survey!";
pub const NO_QUESTIONS: &str = "This survey has no questions.";

/// A decoded inline-button payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// `survey_<id>`
    ViewSurvey { survey_id: SurveyId },
    /// `ans_<survey>_<question>_<option index>`
    Answer {
        survey_id: SurveyId,
        question_id: QuestionId,
        option_index: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Unknown selection prefix: {0:?}")]
    UnknownPrefix(String),
    #[error("Selection {payload:?} has {found} fields, expected {expected}")]
    FieldCount {
        payload: String,
        expected: usize,
        found: usize,
    },
    #[error("Invalid number in selection: {0:?}")]
    InvalidNumber(String),
    #[error("Survey not found: {0}")]
    SurveyNotFound(SurveyId),
    #[error("Question {question_id} not found in survey {survey_id}")]
    QuestionNotFound {
        survey_id: SurveyId,
        question_id: QuestionId,
    },
    #[error("Option {option_index} out of range for question {question_id} ({available} options)")]
    OptionOutOfRange {
        question_id: QuestionId,
        option_index: usize,
        available: usize,
    },
}

impl Selection {
    /// Encode for an inline button
    pub fn payload(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::ViewSurvey { survey_id } => write!(f, "survey_{survey_id}"),
            Selection::Answer {
                survey_id,
                question_id,
                option_index,
            } => write!(f, "ans_{survey_id}_{question_id}_{option_index}"),
        }
    }
}

fn number<T: FromStr>(field: &str) -> Result<T, SelectionError> {
    field
        .parse()
        .map_err(|_| SelectionError::InvalidNumber(field.to_string()))
}

impl FromStr for Selection {
    type Err = SelectionError;

    fn from_str(payload: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = payload.split('_').collect();
        let field_count = |expected: usize| {
            if fields.len() == expected {
                Ok(())
            } else {
                Err(SelectionError::FieldCount {
                    payload: payload.to_string(),
                    expected,
                    found: fields.len(),
                })
            }
        };

        match fields.first().copied() {
            Some("survey") => {
                field_count(2)?;
                Ok(Selection::ViewSurvey {
                    survey_id: SurveyId(number(fields[1])?),
                })
            }
            Some("ans") => {
                field_count(4)?;
                Ok(Selection::Answer {
                    survey_id: SurveyId(number(fields[1])?),
                    question_id: QuestionId(number(fields[2])?),
                    option_index: number(fields[3])?,
                })
            }
            _ => Err(SelectionError::UnknownPrefix(payload.to_string())),
        }
    }
}

fn heading(question: &Question) -> String {
    format!("Question {}: {}", question.id, question.text)
}

/// Title, description and the first question of a survey
pub fn survey_intro(survey: &Survey) -> Reply {
    let mut text = format!("Survey: {}", survey.title);
    if !survey.description.is_empty() {
        text.push_str("\n\n");
        text.push_str(&survey.description);
    }

    let Some(first) = survey.questions.first() else {
        text.push_str("\n\n");
        text.push_str(NO_QUESTIONS);
        return Reply::text(text);
    };

    text.push_str("\n\n");
    text.push_str(&heading(first));
    reply::question_prompt(survey, first, text)
}

/// A validated answer and what to show next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub answer: Answer,
    pub reply: Reply,
}

/// Resolve a button press against the survey it names
pub fn answer(
    survey: &Survey,
    user_id: UserId,
    question_id: QuestionId,
    option_index: usize,
) -> Result<AnswerOutcome, SelectionError> {
    let question = survey
        .question(question_id)
        .ok_or(SelectionError::QuestionNotFound {
            survey_id: survey.id,
            question_id,
        })?;
    let option = question
        .options
        .get(option_index)
        .ok_or(SelectionError::OptionOutOfRange {
            question_id,
            option_index,
            available: question.options.len(),
        })?;

    let reply = match survey.next_question(question_id) {
        Some(next) => reply::question_prompt(survey, next, heading(next)),
        None => Reply::text(COMPLETED),
    };

    Ok(AnswerOutcome {
        answer: Answer::new(user_id, survey.id, question_id, option.as_str()),
        reply,
    })
}
