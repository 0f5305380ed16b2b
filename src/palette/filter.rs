use crate::model::{Command, Page};

pub trait CommandMatcher: Send + Sync {
    /// `query` is already trimmed, lowercased and non-empty.
    fn matches(&self, query: &str, command: &Command) -> bool;
}

/// Case-insensitive substring match over label, subtitle and keywords.
#[derive(Debug, Default)]
pub struct ContainsMatcher;

impl CommandMatcher for ContainsMatcher {
    fn matches(&self, query: &str, command: &Command) -> bool {
        let field_matches = |field: &str| normalize(field).contains(query);

        field_matches(command.label.as_str())
            || command.subtitle.as_deref().is_some_and(field_matches)
            || command.keywords.iter().any(|keyword| field_matches(keyword.as_str()))
    }
}

pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Visible commands of `page` matching `query`, in page order.
pub fn filter_commands<'a>(page: &'a Page, query: &str) -> Vec<&'a Command> {
    filter_commands_with(&ContainsMatcher, page, query)
}

pub fn filter_commands_with<'a>(
    matcher: &dyn CommandMatcher,
    page: &'a Page,
    query: &str,
) -> Vec<&'a Command> {
    let query = normalize(query);
    page.commands
        .iter()
        .filter(|command| !command.hidden)
        .filter(|command| query.is_empty() || matcher.matches(&query, command))
        .collect()
}
