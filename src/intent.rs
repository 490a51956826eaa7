//! Intent dispatch: one shared ordered rule table recognizes the
//! domain-specific commands (schedule, expense, study, weather, mood) and
//! routes them to small CRUD handlers before the general resolver chain is
//! ever consulted.

use crate::apis::{weather_city, MultiApiClient};
use crate::store::{self, ExpenseRecord, ScheduleRecord, Store, StudyRecord};
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use regex::Regex;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentTag {
    Schedule,
    Expense,
    Study,
    Weather,
    Mood,
    General,
}

/// Checked in declaration order; the first matching rule wins.
static INTENT_RULES: Lazy<Vec<(IntentTag, Regex)>> = Lazy::new(|| {
    vec![
        (
            IntentTag::Schedule,
            Regex::new(r"schedule|reminder|meeting|appointment").unwrap(),
        ),
        (
            IntentTag::Expense,
            Regex::new(r"expense|spend|spent|kharcha|paisa").unwrap(),
        ),
        (
            IntentTag::Study,
            Regex::new(r"study|studied|padhai|assignment").unwrap(),
        ),
        (
            IntentTag::Weather,
            Regex::new(r"weather|mausam|temperature").unwrap(),
        ),
        (
            IntentTag::Mood,
            Regex::new(r"feeling|mood|stressed|happy|sad|tired|khush|udaas|pareshan").unwrap(),
        ),
    ]
});

pub fn classify(text: &str) -> IntentTag {
    let text_lower = text.to_lowercase();
    for (tag, pattern) in INTENT_RULES.iter() {
        if pattern.is_match(&text_lower) {
            return *tag;
        }
    }
    IntentTag::General
}

/// Routes a recognized command to its handler. The caller classifies once
/// and passes the tag in; `None` means the input is a general question for
/// the resolver chain.
pub fn dispatch(
    tag: IntentTag,
    input: &str,
    store: &mut Store,
    apis: &MultiApiClient,
) -> Option<String> {
    match tag {
        IntentTag::General => None,
        IntentTag::Schedule => Some(handle_schedule(input, store)),
        IntentTag::Expense => Some(handle_expense(input, store)),
        IntentTag::Study => Some(handle_study(input, store)),
        IntentTag::Weather => Some(apis.weather_report(weather_city(&input.to_lowercase()))),
        IntentTag::Mood => Some(mood_reply(input).unwrap_or_else(|| {
            "I'm here for you. Tell me more about how you're feeling.".to_string()
        })),
    }
}

// --- Expenses ---

static ADD_EXPENSE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)add expense:\s*(?P<amount>\d+(?:\.\d+)?)\s+for\s+(?P<rest>.+)").unwrap()
});

const EXPENSE_USAGE: &str =
    "Format: Add expense: [amount] for [category] - [description]\nExample: Add expense: 50 for food - Lunch";

fn handle_expense(input: &str, store: &mut Store) -> String {
    let text_lower = input.to_lowercase();

    if text_lower.contains("add expense") {
        return add_expense(input, store);
    }
    if ["month", "summary", "total"].iter().any(|k| text_lower.contains(k)) {
        return monthly_expense_summary(store);
    }
    todays_expenses(store)
}

fn add_expense(input: &str, store: &mut Store) -> String {
    let captures = match ADD_EXPENSE_RE.captures(input) {
        Some(c) => c,
        None => return EXPENSE_USAGE.to_string(),
    };
    let amount: f64 = match captures["amount"].parse() {
        Ok(a) => a,
        Err(_) => return EXPENSE_USAGE.to_string(),
    };

    let rest = captures["rest"].trim();
    let (category, description) = match rest.split_once('-') {
        Some((category, description)) => (category.trim(), description.trim()),
        None => (rest, ""),
    };

    let record = ExpenseRecord {
        amount,
        category: category.to_lowercase(),
        description: description.to_string(),
        date: store::today(),
        time: store::now_time(),
    };
    let confirmation = if description.is_empty() {
        format!("Expense added: \u{20b9}{} for {}", amount, record.category)
    } else {
        format!(
            "Expense added: \u{20b9}{} for {} - {}",
            amount, record.category, description
        )
    };

    match store.add_expense(record) {
        Ok(()) => confirmation,
        Err(err) => {
            log::error!("Failed to save expense: {:#}", err);
            "Error adding expense. Please try again.".to_string()
        }
    }
}

fn todays_expenses(store: &Store) -> String {
    let today = store::today();
    let expenses = store.expenses_on(&today);
    if expenses.is_empty() {
        return "No expenses recorded for today.".to_string();
    }

    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    let mut result = format!("Today's expenses (total \u{20b9}{}):\n", total);
    for expense in expenses {
        result.push_str(&format!("- \u{20b9}{} - {}", expense.amount, expense.category));
        if !expense.description.is_empty() {
            result.push_str(&format!(" ({})", expense.description));
        }
        result.push_str(&format!(" at {}\n", expense.time));
    }
    result
}

fn monthly_expense_summary(store: &Store) -> String {
    let month = store::current_month();
    let expenses = store.expenses_in_month(&month);
    if expenses.is_empty() {
        return "No expenses recorded for this month.".to_string();
    }

    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    let mut by_category: HashMap<&str, f64> = HashMap::new();
    for expense in &expenses {
        *by_category.entry(expense.category.as_str()).or_insert(0.0) += expense.amount;
    }
    let mut categories: Vec<(&str, f64)> = by_category.into_iter().collect();
    categories.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut result = format!("Monthly expense summary (\u{20b9}{}):\n", total);
    for (category, amount) in categories {
        let percentage = if total > 0.0 { amount / total * 100.0 } else { 0.0 };
        result.push_str(&format!("- {}: \u{20b9}{} ({:.1}%)\n", category, amount, percentage));
    }
    result
}

// --- Schedule ---

static ADD_SCHEDULE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)add schedule:\s*(?P<rest>.+)").unwrap());

const SCHEDULE_USAGE: &str =
    "To add a schedule entry, use:\nAdd schedule: [Title] on [when]\nExample: Add schedule: Python class on 10:00";

fn handle_schedule(input: &str, store: &mut Store) -> String {
    let text_lower = input.to_lowercase();
    if text_lower.contains("add schedule") {
        return add_schedule(input, store);
    }
    todays_schedule(store)
}

fn add_schedule(input: &str, store: &mut Store) -> String {
    let captures = match ADD_SCHEDULE_RE.captures(input) {
        Some(c) => c,
        None => return SCHEDULE_USAGE.to_string(),
    };
    let rest = captures["rest"].trim();
    let (title, time) = match rest.split_once(" on ") {
        Some((title, when)) => (title.trim().to_string(), when.trim().to_string()),
        None => (rest.to_string(), store::now_time()),
    };

    let record = ScheduleRecord {
        title: title.clone(),
        description: input.to_string(),
        date: store::today(),
        time,
    };
    match store.add_schedule(record) {
        Ok(()) => format!("Schedule added: {}", title),
        Err(err) => {
            log::error!("Failed to save schedule entry: {:#}", err);
            "Error adding schedule entry. Please try again.".to_string()
        }
    }
}

fn todays_schedule(store: &Store) -> String {
    let today = store::today();
    let entries = store.schedule_on(&today);
    if entries.is_empty() {
        return "No schedule for today. You're free!".to_string();
    }

    let mut result = String::from("Today's schedule:\n");
    for entry in entries {
        result.push_str(&format!("- {} - {}\n", entry.time, entry.title));
    }
    result
}

// --- Study sessions ---

static LOG_STUDY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)log study:\s*(?P<subject>.+?)\s+for\s+(?P<minutes>\d+)\s*minutes?(?:\s*-\s*(?P<notes>.+))?")
        .unwrap()
});

const STUDY_USAGE: &str =
    "To log a study session, use:\nLog study: [Subject] for [Minutes] minutes - [Notes]\nExample: Log study: Python for 60 minutes - Learned loops";

fn handle_study(input: &str, store: &mut Store) -> String {
    let text_lower = input.to_lowercase();
    if text_lower.contains("log study") {
        return log_study(input, store);
    }
    study_stats(store)
}

fn log_study(input: &str, store: &mut Store) -> String {
    let captures = match LOG_STUDY_RE.captures(input) {
        Some(c) => c,
        None => return STUDY_USAGE.to_string(),
    };
    let subject = captures["subject"].trim().to_string();
    let minutes: u32 = match captures["minutes"].parse() {
        Ok(m) => m,
        Err(_) => return STUDY_USAGE.to_string(),
    };
    let notes = captures
        .name("notes")
        .map(|n| n.as_str().trim().to_string())
        .unwrap_or_default();

    let record = StudyRecord {
        subject: subject.clone(),
        duration_minutes: minutes,
        date: store::today(),
        time: store::now_time(),
        notes,
    };
    match store.add_study_session(record) {
        Ok(()) => format!("Study session logged: {} for {} minutes", subject, minutes),
        Err(err) => {
            log::error!("Failed to save study session: {:#}", err);
            "Error logging study session. Please try again.".to_string()
        }
    }
}

fn study_stats(store: &Store) -> String {
    let sessions = store.study_sessions();
    if sessions.is_empty() {
        return "No study sessions recorded yet.".to_string();
    }

    let today = store::today();
    let today_sessions = store.study_sessions_on(&today);
    let today_minutes: u32 = today_sessions.iter().map(|s| s.duration_minutes).sum();

    let mut result = String::from("Study statistics:\n");
    result.push_str(&format!("Total sessions: {}\n", sessions.len()));
    result.push_str(&format!(
        "Today: {} sessions, {} minutes ({}h {}m)\n",
        today_sessions.len(),
        today_minutes,
        today_minutes / 60,
        today_minutes % 60
    ));
    for session in today_sessions {
        result.push_str(&format!("- {} - {}\n", session.time, session.subject));
    }
    result
}

// --- Mood ---

const POSITIVE_WORDS: &[&str] = &[
    "happy", "good", "great", "awesome", "excellent", "wonderful", "khush", "accha", "badhiya",
    "mast", "zabardast",
];

const NEGATIVE_WORDS: &[&str] = &[
    "sad", "bad", "terrible", "awful", "stressed", "worried", "tired", "udaas", "bura",
    "pareshan", "tension",
];

const MOTIVATIONAL_QUOTES: &[&str] = &[
    "Every expert was once a beginner. Keep going!",
    "Success is not final, failure is not fatal. Keep trying!",
    "The only way to do great work is to love what you do.",
    "Believe in yourself and all that you are!",
    "Focus on progress, not perfection.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Positive,
    Negative,
    Neutral,
}

pub fn detect_mood(text: &str) -> Mood {
    let text_lower = text.to_lowercase();
    let positive = POSITIVE_WORDS.iter().filter(|w| text_lower.contains(*w)).count();
    let negative = NEGATIVE_WORDS.iter().filter(|w| text_lower.contains(*w)).count();
    if positive > negative {
        Mood::Positive
    } else if negative > positive {
        Mood::Negative
    } else {
        Mood::Neutral
    }
}

/// A short empathetic line for emotionally loaded input, `None` when the
/// mood reads neutral.
pub fn mood_reply(text: &str) -> Option<String> {
    match detect_mood(text) {
        Mood::Positive => Some("That's great to hear! Keep up the positive energy!".to_string()),
        Mood::Negative => {
            let quote = MOTIVATIONAL_QUOTES
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or(MOTIVATIONAL_QUOTES[0]);
            Some(format!("I understand you're feeling down. {}", quote))
        }
        Mood::Neutral => None,
    }
}
