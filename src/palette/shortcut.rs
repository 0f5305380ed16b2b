use crate::model::{Command, Page, PageMode};

/// Finds the command bound to `key` on `page`.
///
/// Shortcuts are ignored on input pages and while a filter query is typed, so
/// they never swallow ordinary text entry.
pub fn resolve_shortcut<'a>(
    page: &'a Page,
    key: &str,
    query: &str,
    active_item_id: Option<&str>,
) -> Option<&'a Command> {
    if page.mode != PageMode::List || !query.is_empty() {
        return None;
    }

    let key = key.to_lowercase();
    page.commands
        .iter()
        .filter(|command| command.is_enabled())
        .find(|command| {
            command.shortcuts.iter().any(|shortcut| {
                shortcut.key.to_lowercase() == key
                    && shortcut
                        .target_item_id
                        .as_deref()
                        .is_none_or(|target| Some(target) == active_item_id)
            })
        })
}

#[cfg(test)]
mod tests {
    use crate::model::{Command, Page, Shortcut};

    use super::resolve_shortcut;

    fn page() -> Page {
        Page::new("root", "Root").with_commands(vec![
            Command::action("hidden", "Hidden")
                .hidden()
                .with_shortcut(Shortcut::new("h")),
            Command::action("off", "Off")
                .disabled()
                .with_shortcut(Shortcut::new("h")),
            Command::action("help", "Help").with_shortcut(Shortcut::new("H")),
            Command::action("delete", "Delete").with_shortcut(Shortcut::scoped("d", "row")),
            Command::action("row", "Row"),
        ])
    }

    fn resolved(page: &Page, key: &str, query: &str, active: Option<&str>) -> Option<String> {
        resolve_shortcut(page, key, query, active).map(|command| command.id.clone())
    }

    #[test]
    fn skips_hidden_and_disabled_and_matches_case_insensitively() {
        let page = page();
        assert_eq!(resolved(&page, "h", "", None).as_deref(), Some("help"));
    }

    #[test]
    fn scoped_shortcut_requires_its_target_to_be_active() {
        let page = page();
        assert_eq!(resolved(&page, "d", "", Some("help")), None);
        assert_eq!(resolved(&page, "d", "", Some("row")).as_deref(), Some("delete"));
    }

    #[test]
    fn shortcuts_are_inert_while_typing_or_on_input_pages() {
        let page = page();
        assert_eq!(resolved(&page, "h", "x", None), None);

        let mut input = page.clone();
        input.mode = crate::model::PageMode::Input;
        assert_eq!(resolved(&input, "h", "", None), None);
    }
}
