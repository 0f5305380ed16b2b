use serde::{Deserialize, Serialize};

use super::page::Page;

/// Outcome of an execute or submit call. Decides the next stack mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CommandResult {
    Close,
    Stay,
    PushPage { page: Page },
    ReplacePage { page: Page },
    PopPage,
    RefreshPage,
    Error { message: String },
}

impl CommandResult {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn push(page: Page) -> Self {
        Self::PushPage { page }
    }

    pub fn replace(page: Page) -> Self {
        Self::ReplacePage { page }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Close => "close",
            Self::Stay => "stay",
            Self::PushPage { .. } => "push-page",
            Self::ReplacePage { .. } => "replace-page",
            Self::PopPage => "pop-page",
            Self::RefreshPage => "refresh-page",
            Self::Error { .. } => "error",
        }
    }
}

/// Answer to a child or refresh load.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadReply {
    Page(Page),
    Result(CommandResult),
}

impl From<Page> for LoadReply {
    fn from(page: Page) -> Self {
        Self::Page(page)
    }
}

impl From<CommandResult> for LoadReply {
    fn from(result: CommandResult) -> Self {
        Self::Result(result)
    }
}
