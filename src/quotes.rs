//! Motivational quote selection for the dashboard.
//!
//! Pool choice is deterministic given a task summary and the hour of day
//! (context beats time of day); the pick within the chosen pool is random.
//! Randomness stays confined here — the parse path never touches it.

use rand::seq::SliceRandom;

use crate::store::TaskSummary;

const OVERDUE_QUOTES: &[&str] = &[
    "It's never too late to start fresh. Let's tackle those overdue tasks!",
    "Every moment is a new beginning. Time to catch up!",
    "Challenges are what make life interesting. Overcoming them is what makes life meaningful.",
    "The best time to plant a tree was 20 years ago. The second best time is now.",
];

const ALL_DONE_QUOTES: &[&str] = &[
    "Congratulations! You've completed all your tasks. You're amazing!",
    "Well done! All tasks completed. Time to celebrate!",
    "You did it! Every task is done. You're a productivity superstar!",
    "Outstanding work! You've conquered your to-do list!",
];

const DUE_TODAY_QUOTES: &[&str] = &[
    "Today is the day! Let's make it count.",
    "Today's accomplishments were yesterday's impossibilities.",
    "Focus on today, and tomorrow will take care of itself.",
    "Make today so awesome that yesterday gets jealous!",
];

const EARLY_MORNING_QUOTES: &[&str] = &[
    "Early bird catches the worm! Great start to your day!",
    "The sun is rising, and so are your possibilities!",
    "Every sunrise is a new opportunity to shine!",
    "Morning is when the magic happens!",
];

const MORNING_QUOTES: &[&str] = &[
    "Good morning! Let's make today productive!",
    "Rise and shine! Your tasks are waiting!",
    "Morning coffee and morning tasks - perfect combination!",
    "Today is a blank page. Write a great story!",
];

const AFTERNOON_QUOTES: &[&str] = &[
    "Afternoon energy! Keep the momentum going!",
    "Power through the afternoon like a champion!",
    "Afternoon focus time - let's get things done!",
    "The afternoon is your time to shine!",
];

const EVENING_QUOTES: &[&str] = &[
    "Evening reflection time. How did today go?",
    "End the day with accomplishment, not regret.",
    "Evening is perfect for wrapping up loose ends.",
    "Finish strong! Tomorrow's success starts today.",
];

/// Pick the quote pool for the current task state and hour.
///
/// Context first: overdue work, a cleared list, or tasks due today override
/// the time-of-day pools.
pub fn quote_pool(summary: Option<&TaskSummary>, hour: u32) -> &'static [&'static str] {
    if let Some(summary) = summary {
        if summary.overdue > 0 {
            return OVERDUE_QUOTES;
        }
        if summary.total > 0 && summary.pending == 0 {
            return ALL_DONE_QUOTES;
        }
        if summary.due_today > 0 {
            return DUE_TODAY_QUOTES;
        }
    }

    match hour {
        0..=5 => EARLY_MORNING_QUOTES,
        6..=11 => MORNING_QUOTES,
        12..=17 => AFTERNOON_QUOTES,
        _ => EVENING_QUOTES,
    }
}

/// A quote for the day: random pick within the context-selected pool.
pub fn daily_quote(summary: Option<&TaskSummary>, hour: u32) -> &'static str {
    let pool = quote_pool(summary, hour);
    pool.choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("Keep going!")
}
