//! Quiz session: walk the questions, grade answers, report the score.

use crate::models::QuizQuestion;
use serde::{Deserialize, Serialize};

/// Feedback for one answered question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub correct_option: usize,
    pub explanation: String,
}

/// Final score of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOutcome {
    pub score: u32,
    pub total: u32,
}

impl QuizOutcome {
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            0
        } else {
            ((self.score as f64 / self.total as f64) * 100.0).round() as u32
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    current: usize,
    score: u32,
    answered: bool,
}

impl QuizSession {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self {
            questions,
            current: 0,
            score: 0,
            answered: false,
        }
    }

    /// Question awaiting an answer, `None` once the quiz is over
    pub fn current(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.current)
    }

    pub fn position(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Grade `option` for the current question
    ///
    /// Only the first answer to a question counts; later calls return the
    /// same feedback without touching the score.
    pub fn answer(&mut self, option: usize) -> Option<AnswerFeedback> {
        let question = self.questions.get(self.current)?;
        let correct = option == question.correct_answer;

        if !self.answered {
            self.answered = true;
            if correct {
                self.score += 1;
            }
        }

        Some(AnswerFeedback {
            correct,
            correct_option: question.correct_answer,
            explanation: question.explanation.clone(),
        })
    }

    /// Move to the next question
    pub fn advance(&mut self) {
        if self.current < self.questions.len() {
            self.current += 1;
            self.answered = false;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.questions.len()
    }

    pub fn outcome(&self) -> QuizOutcome {
        QuizOutcome {
            score: self.score,
            total: self.questions.len() as u32,
        }
    }
}
