use crate::model::{Command, Meta, Page};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    Root,
    Child,
    Refresh,
}

/// Describes one page load, kept around so a failed load can be re-issued.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    pub kind: LoadKind,
    pub page_id: Option<String>,
    pub item_id: Option<String>,
    pub query: Option<String>,
    pub meta: Option<Meta>,
}

impl LoadRequest {
    pub fn root() -> Self {
        Self {
            kind: LoadKind::Root,
            page_id: None,
            item_id: None,
            query: None,
            meta: None,
        }
    }

    pub fn child(
        page_id: impl Into<String>,
        item_id: impl Into<String>,
        query: Option<String>,
        meta: Option<Meta>,
    ) -> Self {
        Self {
            kind: LoadKind::Child,
            page_id: Some(page_id.into()),
            item_id: Some(item_id.into()),
            query,
            meta,
        }
    }

    /// Reload the top of `stack`. A lone root page reloads through the root call.
    pub fn refresh(
        stack: &[Page],
        item_id: Option<String>,
        query: Option<String>,
        meta: Option<Meta>,
    ) -> Self {
        let page_id = match stack {
            [] | [_] => None,
            [.., top] => Some(top.id.clone()),
        };
        let item_id = item_id.or_else(|| page_id.clone());
        Self {
            kind: LoadKind::Refresh,
            page_id,
            item_id,
            query,
            meta,
        }
    }

    pub fn uses_root_call(&self) -> bool {
        self.page_id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineContext {
    pub stack: Vec<Page>,
    pub query: String,
    pub active_item_id: Option<String>,
    pub last_error: Option<String>,
    pub pending_load: Option<LoadRequest>,
    /// Command whose execute is in flight. Submits clear it, so a refresh
    /// answering a submit reloads by the top page id.
    pub pending_command: Option<Command>,
    pub invocation_meta: Option<Meta>,
    pub input_value: Option<String>,
}

impl EngineContext {
    pub fn top(&self) -> Option<&Page> {
        self.stack.last()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// `None` for an empty (whitespace-only) query.
    pub fn query_arg(&self) -> Option<String> {
        if self.query.trim().is_empty() {
            None
        } else {
            Some(self.query.clone())
        }
    }
}
