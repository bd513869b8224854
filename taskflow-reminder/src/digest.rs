/// Digest composition
///
/// One email per user per run: a plain-text list of that user's tasks
/// due today, one `- [PRIORITY] title` line each.

use chrono::NaiveDate;

use crate::mailer::DigestEmail;
use taskflow_shared::models::task::Task;
use taskflow_shared::models::user::User;

/// Composes the daily digest for one user
///
/// The caller guarantees `tasks` is non-empty and already filtered to
/// the given date with status other than done.
pub fn compose_digest(user: &User, date: NaiveDate, tasks: &[Task]) -> DigestEmail {
    let lines: Vec<String> = tasks
        .iter()
        .map(|t| format!("- [{}] {}", t.priority.as_str().to_uppercase(), t.title))
        .collect();

    DigestEmail {
        to: user.email.clone(),
        subject: format!("Daily Task Reminder - {}", date),
        body: format!(
            "Good Morning!\n\nYou have the following tasks due today:\n\n{}\n\nGood luck!",
            lines.join("\n")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use taskflow_shared::models::task::{TaskPriority, TaskStatus};

    fn user() -> User {
        User {
            id: 1,
            email: "a@example.com".to_string(),
            password_hash: "hash".to_string(),
            name: None,
            created_at: Utc::now(),
        }
    }

    fn task(title: &str, priority: TaskPriority) -> Task {
        Task {
            id: 1,
            title: title.to_string(),
            description: None,
            priority,
            due_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            status: TaskStatus::Todo,
            tags: Vec::new(),
            attachments: 0,
        }
    }

    #[test]
    fn test_digest_format() {
        let tasks = vec![
            task("Pay rent", TaskPriority::High),
            task("Water plants", TaskPriority::Low),
        ];
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let email = compose_digest(&user(), date, &tasks);

        assert_eq!(email.to, "a@example.com");
        assert_eq!(email.subject, "Daily Task Reminder - 2024-03-01");
        assert!(email.body.contains("- [HIGH] Pay rent\n- [LOW] Water plants"));
        assert!(email.body.starts_with("Good Morning!"));
    }
}
