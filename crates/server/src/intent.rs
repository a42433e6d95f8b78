//! Rule-based intent detection for the agentic task-creation action.
//!
//! Deliberately a substring check, not a parser: "create task restock flour"
//! or "add task: call supplier" triggers task creation with everything after
//! the first "task" as the title.

/// Detect a task-creation intent and extract the task title.
///
/// Returns `None` when the message carries no intent or the extracted title
/// is empty. The title is lowercased with its first letter capitalized.
pub fn parse_task_intent(message: &str) -> Option<String> {
    let lower = message.to_lowercase();
    if !lower.contains("create task") && !lower.contains("add task") {
        return None;
    }

    let position = lower.find("task")?;
    let title = lower[position + "task".len()..]
        .trim_matches(|c: char| c.is_whitespace() || c == ':')
        .to_string();

    if title.is_empty() {
        return None;
    }

    Some(capitalize(&title))
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_task_intent() {
        assert_eq!(
            parse_task_intent("Please create task restock flour"),
            Some("Restock flour".to_string())
        );
    }

    #[test]
    fn test_add_task_intent_with_colon() {
        assert_eq!(
            parse_task_intent("add task: call the rice supplier"),
            Some("Call the rice supplier".to_string())
        );
    }

    #[test]
    fn test_case_insensitive_match() {
        assert_eq!(
            parse_task_intent("CREATE TASK audit the cold storage"),
            Some("Audit the cold storage".to_string())
        );
    }

    #[test]
    fn test_no_intent() {
        assert_eq!(parse_task_intent("how much rice is in stock?"), None);
        assert_eq!(parse_task_intent("is this task done?"), None);
    }

    #[test]
    fn test_empty_title_is_no_intent() {
        assert_eq!(parse_task_intent("create task"), None);
        assert_eq!(parse_task_intent("add task :  "), None);
    }
}
