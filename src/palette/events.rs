#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Next,
    Prev,
    Home,
    End,
}

/// Inputs the host feeds into the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Open,
    Close,
    Toggle,
    QueryChanged { query: String },
    Nav(NavDirection),
    Activate { id: Option<String> },
    Submit { value: Option<String> },
    Back,
    Retry,
}

impl EngineEvent {
    pub fn query(query: impl Into<String>) -> Self {
        Self::QueryChanged {
            query: query.into(),
        }
    }

    pub fn activate(id: impl Into<String>) -> Self {
        Self::Activate {
            id: Some(id.into()),
        }
    }

    pub fn activate_current() -> Self {
        Self::Activate { id: None }
    }

    pub fn submit(value: impl Into<String>) -> Self {
        Self::Submit {
            value: Some(value.into()),
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Open => "palette.open",
            Self::Close => "palette.close",
            Self::Toggle => "palette.toggle",
            Self::QueryChanged { .. } => "query.changed",
            Self::Nav(NavDirection::Next) => "nav.next",
            Self::Nav(NavDirection::Prev) => "nav.prev",
            Self::Nav(NavDirection::Home) => "nav.home",
            Self::Nav(NavDirection::End) => "nav.end",
            Self::Activate { .. } => "item.activate",
            Self::Submit { .. } => "input.submit",
            Self::Back => "page.back",
            Self::Retry => "retry",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenState {
    LoadingPage,
    Browsing,
    Executing,
    SubmittingInput,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    #[default]
    Closed,
    Open(OpenState),
}

impl EngineState {
    pub fn id(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open(OpenState::LoadingPage) => "open.loadingPage",
            Self::Open(OpenState::Browsing) => "open.browsing",
            Self::Open(OpenState::Executing) => "open.executing",
            Self::Open(OpenState::SubmittingInput) => "open.submittingInput",
            Self::Open(OpenState::Error) => "open.error",
        }
    }

    pub fn is_open(self) -> bool {
        matches!(self, Self::Open(_))
    }

    /// An adapter call is outstanding.
    pub fn is_awaiting(self) -> bool {
        matches!(
            self,
            Self::Open(OpenState::LoadingPage | OpenState::Executing | OpenState::SubmittingInput)
        )
    }
}
