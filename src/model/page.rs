use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Opaque payload an adapter attaches to pages and commands.
///
/// The engine never inspects it; it only hands it back on later adapter calls.
pub type Meta = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandIntent {
    Page,
    #[default]
    Action,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageMode {
    #[default]
    List,
    Input,
}

impl PageMode {
    pub fn id(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Input => "input",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcut {
    pub key: String,
    /// Scoped shortcut: only fires while this item is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_item_id: Option<String>,
}

impl Shortcut {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            target_item_id: None,
        }
    }

    pub fn scoped(key: impl Into<String>, target_item_id: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            target_item_id: Some(target_item_id.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Command {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    pub hidden: bool,
    pub disabled: bool,
    pub intent: CommandIntent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_page_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shortcuts: Vec<Shortcut>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl Command {
    pub fn action(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            intent: CommandIntent::Action,
            ..Self::default()
        }
    }

    pub fn page(
        id: impl Into<String>,
        label: impl Into<String>,
        child_page_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            intent: CommandIntent::Page,
            child_page_id: Some(child_page_id.into()),
            ..Self::default()
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_shortcut(mut self, shortcut: Shortcut) -> Self {
        self.shortcuts.push(shortcut);
        self
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Visible and activatable.
    pub fn is_enabled(&self) -> bool {
        !self.hidden && !self.disabled
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Page {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub mode: PageMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submit_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_state_text: Option<String>,
    pub commands: Vec<Command>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl Page {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn input(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            mode: PageMode::Input,
            ..Self::new(id, title)
        }
    }

    pub fn with_commands(mut self, commands: Vec<Command>) -> Self {
        self.commands = commands;
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn command(&self, id: &str) -> Option<&Command> {
        self.commands.iter().find(|command| command.id == id)
    }

    /// Checks the shape invariants an adapter must uphold.
    pub fn validate(&self) -> AppResult<()> {
        if self.id.trim().is_empty() {
            return Err(AppError::invalid_page("<unnamed>", "page id is empty"));
        }

        let mut seen = HashSet::with_capacity(self.commands.len());
        for command in &self.commands {
            if command.id.is_empty() {
                return Err(AppError::invalid_page(&self.id, "command id is empty"));
            }
            if !seen.insert(command.id.as_str()) {
                return Err(AppError::invalid_page(
                    &self.id,
                    format!("duplicate command id '{}'", command.id),
                ));
            }
            if command.intent == CommandIntent::Page
                && command
                    .child_page_id
                    .as_deref()
                    .is_none_or(|child| child.trim().is_empty())
            {
                return Err(AppError::invalid_page(
                    &self.id,
                    format!("command '{}' opens a page but has no child page id", command.id),
                ));
            }
        }
        Ok(())
    }
}
