//! Prompt construction and response parsing for README summaries

use super::entity::ReadmeSummary;

pub const SYSTEM_PROMPT: &str = "You are a technical documentation expert. \
You specialize in summarizing GitHub README files for managers.";

const SUMMARY_LABEL: &str = "Summary:";
const KEY_POINTS_LABEL: &str = "Key Points:";
const STACK_LABEL: &str = "Technical Stack:";
const PROJECT_TYPE_LABEL: &str = "Project Type:";

/// Build the user message asking for the fixed line format
pub fn build_user_prompt(readme: &str) -> String {
    format!(
        "Please summarize the following README file and answer in exactly this format:\n\n\
         {SUMMARY_LABEL} [Short summary]\n\
         {KEY_POINTS_LABEL}\n\
         - [Point 1]\n\
         - [Point 2]\n\
         - [Point 3]\n\
         {STACK_LABEL} [Technologies]\n\
         {PROJECT_TYPE_LABEL} [Type]\n\n\
         README content:\n{readme}"
    )
}

/// Truncate to at most `max_chars` characters without splitting a char
pub fn truncate_chars(content: &str, max_chars: usize) -> &str {
    match content.char_indices().nth(max_chars) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}

fn labelled_value<'a>(lines: &[&'a str], label: &str) -> Option<&'a str> {
    lines
        .iter()
        .find_map(|line| line.strip_prefix(label))
        .map(str::trim)
}

/// Parse the model output into a summary
///
/// Missing lines yield empty fields; validation of the result is left to
/// the caller.
pub fn parse_summary(output: &str) -> ReadmeSummary {
    let lines: Vec<&str> = output.lines().map(str::trim).collect();

    let summary = labelled_value(&lines, SUMMARY_LABEL)
        .unwrap_or_default()
        .to_string();

    let key_points = lines
        .iter()
        .filter_map(|line| line.strip_prefix('-'))
        .map(|point| point.trim().to_string())
        .filter(|point| !point.is_empty())
        .collect();

    let technical_stack = labelled_value(&lines, STACK_LABEL)
        .map(|stack| {
            stack
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect()
        })
        .or(Some(Vec::new()));

    let project_type = labelled_value(&lines, PROJECT_TYPE_LABEL)
        .unwrap_or_default()
        .to_string();

    ReadmeSummary {
        summary,
        key_points,
        technical_stack,
        project_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompt_contains_format_and_content() {
        let prompt = build_user_prompt("# My Project");
        assert!(prompt.contains("Summary: [Short summary]"));
        assert!(prompt.contains("Key Points:"));
        assert!(prompt.contains("Technical Stack: [Technologies]"));
        assert!(prompt.contains("Project Type: [Type]"));
        assert!(prompt.ends_with("# My Project"));
    }

    #[test]
    fn test_parse_well_formed_output() {
        let output = "Summary: An ergonomic web framework.\n\
                      Key Points:\n\
                      - Built on tower\n\
                      - Macro-free routing\n\
                      -   Extractors\n\
                      Technical Stack: Rust, Tokio , hyper,\n\
                      Project Type: Library";

        let summary = parse_summary(output);

        assert_eq!(summary.summary, "An ergonomic web framework.");
        assert_eq!(
            summary.key_points,
            vec!["Built on tower", "Macro-free routing", "Extractors"]
        );
        assert_eq!(
            summary.technical_stack,
            Some(vec!["Rust".to_string(), "Tokio".to_string(), "hyper".to_string()])
        );
        assert_eq!(summary.project_type, "Library");
    }

    #[test]
    fn test_parse_missing_lines() {
        let summary = parse_summary("I could not read that README.");

        assert!(summary.summary.is_empty());
        assert!(summary.key_points.is_empty());
        assert_eq!(summary.technical_stack, Some(vec![]));
        assert!(summary.project_type.is_empty());
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("日本語", 1), "日");
        assert_eq!(truncate_chars("", 0), "");
    }
}
