//! Command handlers for studyctl

use anyhow::{Context as _, Result};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use study_common::models::{self, ExplanationContent, Flashcard, QuizQuestion, SummaryContent};
use study_common::prompts::truncate_chars;
use study_common::stats::{recent_activity, DashboardStats};
use study_common::{
    ActivityKind, ActivityLog, Difficulty, FileStore, HttpTransport, QuizSession,
    ResponseAcquirer, StudyAssistant, StudyConfig, StudyError, SummaryMode,
};

use crate::display;

/// Recent entries shown on the dashboard
const DASHBOARD_RECENT: usize = 5;

/// Characters of summarized text used as its history label
const SUMMARY_LABEL_CHARS: usize = 60;

/// Shared state for one invocation
pub struct Context {
    pub config: StudyConfig,
    pub config_path: Option<PathBuf>,
    pub json: bool,
}

impl Context {
    pub fn load(explicit: Option<&Path>, json: bool) -> Result<Self> {
        let config = StudyConfig::load(explicit)?;
        let config_path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => StudyConfig::user_config_path().ok(),
        };

        Ok(Self {
            config,
            config_path,
            json,
        })
    }

    fn activity_log(&self) -> ActivityLog<FileStore> {
        let store = FileStore::new(self.config.storage.resolved_data_dir());
        ActivityLog::from_config(store, &self.config.storage)
    }

    fn assistant(&self) -> Result<StudyAssistant<HttpTransport>> {
        let acquirer = ResponseAcquirer::from_config(&self.config.llm)?;
        Ok(StudyAssistant::new(acquirer))
    }

    fn print_json(&self, value: &impl serde::Serialize) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

pub async fn explain(ctx: &Context, topic: &str, difficulty: &str) -> Result<()> {
    let difficulty: Difficulty = difficulty.parse()?;
    let assistant = ctx.assistant()?;

    let result = assistant.explain(topic, difficulty).await?;
    ctx.activity_log()
        .add_to_history(ActivityKind::TopicExplained, &result.topic);

    if ctx.json {
        return ctx.print_json(&result);
    }

    let content: ExplanationContent =
        models::from_value(&result.content).context("Unexpected explanation format")?;
    display::print_explanation(&result.topic, result.difficulty, &content);
    Ok(())
}

pub async fn summarize(
    ctx: &Context,
    text: Option<&str>,
    file: Option<&Path>,
    mode: &str,
) -> Result<()> {
    let mode: SummaryMode = mode.parse()?;

    let (content, label) = match (text, file) {
        (_, Some(path)) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let label = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            (content, label)
        }
        (Some(text), None) => {
            let label = truncate_chars(text.trim(), SUMMARY_LABEL_CHARS).to_string();
            (text.to_string(), label)
        }
        (None, None) => anyhow::bail!("Nothing to summarize: pass text or --file"),
    };

    let assistant = ctx.assistant()?;
    let summary = assistant.summarize(&content, mode).await?;
    ctx.activity_log().add_to_history(ActivityKind::Summary, &label);

    if ctx.json {
        return ctx.print_json(&summary);
    }

    let content: SummaryContent =
        models::from_value(&summary).context("Unexpected summary format")?;
    display::print_summary(mode, &content);
    Ok(())
}

pub async fn quiz(ctx: &Context, topic: &str) -> Result<()> {
    let assistant = ctx.assistant()?;
    let log = ctx.activity_log();

    let topic = topic.trim();
    if topic.is_empty() {
        return Err(StudyError::InvalidInput("topic must not be empty".to_string()).into());
    }

    log.add_to_history(ActivityKind::QuizGeneration, topic);
    let value = assistant.generate_quiz(topic).await?;

    if ctx.json {
        return ctx.print_json(&value);
    }

    let questions: Vec<QuizQuestion> =
        models::from_value(&value).context("Unexpected quiz format")?;
    let questions = answerable_questions(questions)?;

    let mut session = QuizSession::new(questions);
    let stdin = io::stdin();
    let mut input = stdin.lock();

    while let Some(question) = session.current().cloned() {
        display::print_question(session.position() + 1, session.len(), &question);

        let choice = match read_choice(&mut input, question.options.len())? {
            Some(choice) => choice,
            None => {
                println!("\nQuiz abandoned; score not recorded.");
                return Ok(());
            }
        };

        if let Some(feedback) = session.answer(choice) {
            display::print_feedback(&question, &feedback);
        }
        session.advance();
    }

    let outcome = session.outcome();
    log.save_quiz_result(topic, outcome.score, outcome.total);
    display::print_quiz_outcome(&outcome);
    Ok(())
}

pub async fn flashcards(ctx: &Context, topic: &str) -> Result<()> {
    let assistant = ctx.assistant()?;

    let value = assistant.generate_flashcards(topic).await?;
    ctx.activity_log()
        .add_to_history(ActivityKind::Flashcards, topic.trim());

    if ctx.json {
        return ctx.print_json(&value);
    }

    let cards: Vec<Flashcard> =
        models::from_value(&value).context("Unexpected flashcard format")?;
    display::print_flashcards(topic.trim(), &cards);
    Ok(())
}

pub fn history(ctx: &Context, limit: usize) -> Result<()> {
    let history = ctx.activity_log().history();
    let shown = recent_activity(&history, limit);

    if ctx.json {
        return ctx.print_json(&shown);
    }

    display::print_history(shown);
    Ok(())
}

pub fn scores(ctx: &Context) -> Result<()> {
    let scores = ctx.activity_log().quiz_scores();

    if ctx.json {
        return ctx.print_json(&scores);
    }

    display::print_scores(&scores);
    Ok(())
}

pub fn dashboard(ctx: &Context) -> Result<()> {
    let log = ctx.activity_log();
    let history = log.history();
    let scores = log.quiz_scores();
    let stats = DashboardStats::from_scores(&scores);
    let recent = recent_activity(&history, DASHBOARD_RECENT);

    if ctx.json {
        return ctx.print_json(&serde_json::json!({
            "totalQuizzes": stats.total_quizzes,
            "averagePercent": stats.average_percent,
            "weakAreas": stats.weak_areas,
            "recentActivity": recent,
        }));
    }

    display::print_dashboard(&stats, recent, &scores);
    Ok(())
}

pub fn clear(ctx: &Context, yes: bool) -> Result<()> {
    if !yes {
        print!("Delete all history and quiz scores? [y/N] ");
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            println!("Nothing deleted.");
            return Ok(());
        }
    }

    ctx.activity_log().clear();
    println!("History and quiz scores cleared.");
    Ok(())
}

pub fn config(ctx: &Context, show_path: bool) -> Result<()> {
    if show_path {
        match &ctx.config_path {
            Some(path) => println!("{}", path.display()),
            None => anyhow::bail!("Cannot determine config directory"),
        }
        return Ok(());
    }

    let redacted = ctx.config.redacted();
    if ctx.json {
        return ctx.print_json(&redacted);
    }

    print!(
        "{}",
        toml::to_string_pretty(&redacted).context("Failed to serialize configuration")?
    );
    println!(
        "# data_dir = {:?}",
        ctx.config.storage.resolved_data_dir().display().to_string()
    );
    println!(
        "# token = {}",
        if ctx.config.llm.resolve_api_key().is_some() {
            "set"
        } else {
            "missing"
        }
    );
    Ok(())
}

/// Drop questions with no options; an empty result is a malformed quiz
pub(crate) fn answerable_questions(questions: Vec<QuizQuestion>) -> Result<Vec<QuizQuestion>> {
    let total = questions.len();
    let kept: Vec<QuizQuestion> = questions
        .into_iter()
        .filter(|q| !q.options.is_empty())
        .collect();

    if kept.len() < total {
        tracing::warn!("Dropped {} quiz question(s) without options", total - kept.len());
    }
    if kept.is_empty() {
        return Err(StudyError::MalformedResponse {
            reason: "quiz has no answerable questions".to_string(),
            excerpt: format!("{} question(s) received", total),
        }
        .into());
    }
    Ok(kept)
}

/// Read an option letter (A-D) or number (1-4); `None` on end of input
fn read_choice(input: &mut impl BufRead, option_count: usize) -> Result<Option<usize>> {
    if option_count == 0 {
        return Ok(None);
    }

    loop {
        print!("Your answer: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        match parse_choice(&line, option_count) {
            Some(choice) => return Ok(Some(choice)),
            None => println!(
                "Enter a letter (A-{}) or a number (1-{}).",
                option_letter(option_count.saturating_sub(1)),
                option_count
            ),
        }
    }
}

/// Parse "b", "B" or "2" into a zero-based option index
pub(crate) fn parse_choice(input: &str, option_count: usize) -> Option<usize> {
    let trimmed = input.trim();

    let index = if let Ok(n) = trimmed.parse::<usize>() {
        n.checked_sub(1)?
    } else {
        let mut chars = trimmed.chars();
        let c = chars.next()?.to_ascii_uppercase();
        if chars.next().is_some() || !c.is_ascii_uppercase() {
            return None;
        }
        (c as u8 - b'A') as usize
    };

    (index < option_count).then_some(index)
}

pub(crate) fn option_letter(index: usize) -> char {
    (b'A' + (index.min(25) as u8)) as char
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choice_letters_and_numbers() {
        assert_eq!(parse_choice("a", 4), Some(0));
        assert_eq!(parse_choice(" D\n", 4), Some(3));
        assert_eq!(parse_choice("2", 4), Some(1));
    }

    #[test]
    fn test_parse_choice_out_of_range() {
        assert_eq!(parse_choice("E", 4), None);
        assert_eq!(parse_choice("0", 4), None);
        assert_eq!(parse_choice("5", 4), None);
        assert_eq!(parse_choice("ab", 4), None);
        assert_eq!(parse_choice("", 4), None);
        assert_eq!(parse_choice("?", 4), None);
    }

    fn question(id: u32, options: &[&str]) -> QuizQuestion {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "question": format!("Q{}", id),
            "options": options,
            "correctAnswer": 0,
        }))
        .unwrap()
    }

    #[test]
    fn test_answerable_questions_drops_optionless() {
        let kept = answerable_questions(vec![
            question(1, &["a", "b"]),
            question(2, &[]),
            question(3, &["c"]),
        ])
        .unwrap();
        let ids: Vec<String> = kept.iter().map(|q| q.question.clone()).collect();
        assert_eq!(ids, vec!["Q1", "Q3"]);
    }

    #[test]
    fn test_quiz_without_options_is_malformed() {
        let err = answerable_questions(vec![question(1, &[])]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StudyError>(),
            Some(StudyError::MalformedResponse { .. })
        ));

        let err = answerable_questions(Vec::new()).unwrap_err();
        assert_eq!(err.downcast_ref::<StudyError>().map(StudyError::exit_code), Some(65));
    }

    #[test]
    fn test_read_choice_without_options_returns_none() {
        let mut input = std::io::Cursor::new("A\n1\na\n0\n");
        assert_eq!(read_choice(&mut input, 0).unwrap(), None);
        // Nothing was consumed
        assert_eq!(input.position(), 0);
    }

    #[test]
    fn test_read_choice_accepts_after_retry() {
        let mut input = std::io::Cursor::new("z\nb\n");
        assert_eq!(read_choice(&mut input, 4).unwrap(), Some(1));
    }

    #[test]
    fn test_option_letter() {
        assert_eq!(option_letter(0), 'A');
        assert_eq!(option_letter(3), 'D');
    }
}
