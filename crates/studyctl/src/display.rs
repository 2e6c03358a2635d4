//! Terminal rendering for studyctl

use owo_colors::OwoColorize;
use study_common::activity_log::{HistoryEntry, QuizScoreEntry};
use study_common::models::{ExplanationContent, Flashcard, QuizQuestion, SummaryContent};
use study_common::quiz::{AnswerFeedback, QuizOutcome};
use study_common::{DashboardStats, Difficulty, SummaryMode};

use crate::commands::option_letter;

const HR: &str = "────────────────────────────────────────────────────────────";

fn header(title: &str) {
    println!("\n{}", title.bold().cyan());
    println!("{}", HR.dimmed());
}

fn bullets(items: &[String]) {
    for item in items {
        println!("  • {}", item);
    }
}

pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {:#}", "error:".red().bold(), err);
}

pub fn print_explanation(topic: &str, difficulty: Difficulty, content: &ExplanationContent) {
    header(&format!("{} ({})", topic, difficulty));
    println!("{}\n", content.summary);

    if !content.key_points.is_empty() {
        println!("{}", "Key points".bold());
        bullets(&content.key_points);
        println!();
    }
    if !content.analogy.is_empty() {
        println!("{} {}", "Analogy:".bold(), content.analogy);
    }
    if !content.example.is_empty() {
        println!("{} {}", "Example:".bold(), content.example);
    }
}

pub fn print_summary(mode: SummaryMode, content: &SummaryContent) {
    header(&format!("Summary for {}", mode));
    bullets(&content.summary);

    if !content.key_definitions.is_empty() {
        println!("\n{}", "Key definitions".bold());
        for def in &content.key_definitions {
            println!("  {}: {}", def.term.yellow(), def.definition);
        }
    }
    if !content.formulas.is_empty() {
        println!("\n{}", "Formulas".bold());
        bullets(&content.formulas);
    }
    if !content.exam_tips.is_empty() {
        println!("\n{}", "Exam tips".bold());
        bullets(&content.exam_tips);
    }
}

pub fn print_question(number: usize, total: usize, question: &QuizQuestion) {
    println!("\n{} {}", format!("[{}/{}]", number, total).dimmed(), question.question.bold());
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}) {}", option_letter(i), option);
    }
}

pub fn print_feedback(question: &QuizQuestion, feedback: &AnswerFeedback) {
    if feedback.correct {
        println!("{}", "Correct!".green().bold());
    } else {
        let right = question
            .options
            .get(feedback.correct_option)
            .map(String::as_str)
            .unwrap_or("?");
        println!(
            "{} The answer is {}) {}",
            "Incorrect.".red().bold(),
            option_letter(feedback.correct_option),
            right
        );
    }
    if !feedback.explanation.is_empty() {
        println!("{}", feedback.explanation.dimmed());
    }
}

pub fn print_quiz_outcome(outcome: &QuizOutcome) {
    header("Quiz complete");
    println!(
        "You scored {} out of {} ({}%)",
        outcome.score.bold(),
        outcome.total,
        outcome.percent()
    );
}

pub fn print_flashcards(topic: &str, cards: &[Flashcard]) {
    header(&format!("Flashcards: {}", topic));
    for (i, card) in cards.iter().enumerate() {
        println!("{} {}", format!("{:>2}.", i + 1).dimmed(), card.front.bold());
        println!("    {}", card.back);
    }
}

pub fn print_history(history: &[HistoryEntry]) {
    header("Recent activity");
    if history.is_empty() {
        println!("No activity yet. Start learning!");
        return;
    }
    for entry in history {
        println!(
            "  {:<40} {:<16} {}",
            entry.topic,
            entry.activity_type.dimmed(),
            entry.date.format("%Y-%m-%d")
        );
    }
}

pub fn print_scores(scores: &[QuizScoreEntry]) {
    header("Past quizzes");
    if scores.is_empty() {
        println!("No quizzes taken yet.");
        return;
    }
    for entry in scores {
        let result = format!("{}/{}", entry.score, entry.total);
        let colored = if entry.ratio() >= 0.6 {
            result.green().to_string()
        } else {
            result.red().to_string()
        };
        println!(
            "  {:<40} {:>8} {}",
            entry.topic,
            colored,
            entry.date.format("%Y-%m-%d")
        );
    }
}

pub fn print_dashboard(stats: &DashboardStats, recent: &[HistoryEntry], scores: &[QuizScoreEntry]) {
    header("Learning dashboard");
    println!(
        "{} {}%  ({} quizzes)",
        "Average quiz score:".bold(),
        stats.average_percent,
        stats.total_quizzes
    );

    println!("\n{}", "Focus areas".bold());
    if stats.weak_areas.is_empty() {
        println!("  No weak areas detected yet. Keep it up!");
    } else {
        bullets(&stats.weak_areas);
    }

    print_history(recent);
    print_scores(scores);
}
