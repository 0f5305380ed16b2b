use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::model::{Meta, PageMode, Shortcut};

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Catalog {
    pub root: String,
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
    #[serde(default)]
    pub pages: Vec<CatalogPage>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct CatalogPage {
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub mode: PageMode,
    pub placeholder: Option<String>,
    pub submit_label: Option<String>,
    pub empty_state_text: Option<String>,
    pub commands: Vec<CatalogCommand>,
    pub on_submit: Option<SubmitAction>,
    pub meta: Option<Meta>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct CatalogCommand {
    pub id: String,
    pub label: String,
    pub subtitle: Option<String>,
    pub keywords: Vec<String>,
    pub hidden: bool,
    pub disabled: bool,
    /// Page opened by this command. Mutually exclusive with `effect`.
    pub opens: Option<String>,
    pub effect: Option<Effect>,
    pub shortcuts: Vec<Shortcut>,
    pub meta: Option<Meta>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Effect {
    Set {
        setting: String,
        value: String,
        #[serde(default)]
        then: FollowUp,
    },
    Toggle {
        setting: String,
        #[serde(default = "default_on")]
        on: String,
        #[serde(default = "default_off")]
        off: String,
    },
    Push {
        page: String,
    },
    Replace {
        page: String,
    },
    Pop,
    Refresh,
    Stay,
    Close,
    Fail {
        message: String,
    },
}

/// What happens after a setting is written.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FollowUp {
    #[default]
    Refresh,
    Pop,
    Stay,
    Close,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SubmitAction {
    pub setting: String,
    #[serde(default)]
    pub then: FollowUp,
    #[serde(default = "default_true")]
    pub required: bool,
}

fn ensure_known(page_ids: &HashSet<&str>, target: &str, source: &str) -> AppResult<()> {
    if page_ids.contains(target) {
        Ok(())
    } else {
        Err(AppError::catalog(format!(
            "{source} refers to unknown page '{target}'"
        )))
    }
}

fn default_on() -> String {
    "on".to_string()
}

fn default_off() -> String {
    "off".to_string()
}

fn default_true() -> bool {
    true
}

impl Catalog {
    pub fn from_toml_str(raw: &str) -> AppResult<Self> {
        let catalog = toml::from_str::<Self>(raw)
            .map_err(|source| AppError::catalog(format!("failed to parse catalog: {source}")))?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(AppError::invalid_argument(format!(
                "catalog path is not a regular file: {}",
                path.display()
            )));
        }

        let raw = fs::read_to_string(path).map_err(|source| {
            AppError::io_with_context(source, format!("failed to read catalog: {}", path.display()))
        })?;
        Self::from_toml_str(&raw).map_err(|err| match err {
            AppError::Catalog(message) => {
                AppError::catalog(format!("{}: {message}", path.display()))
            }
            other => other,
        })
    }

    pub fn page(&self, id: &str) -> Option<&CatalogPage> {
        self.pages.iter().find(|page| page.id == id)
    }

    pub fn validate(&self) -> AppResult<()> {
        let mut page_ids = HashSet::with_capacity(self.pages.len());
        for page in &self.pages {
            if !page_ids.insert(page.id.as_str()) {
                return Err(AppError::catalog(format!("duplicate page id '{}'", page.id)));
            }
        }
        if !page_ids.contains(self.root.as_str()) {
            return Err(AppError::catalog(format!(
                "root page '{}' is not defined",
                self.root
            )));
        }

        for page in &self.pages {
            if page.mode == PageMode::Input && page.on_submit.is_none() {
                return Err(AppError::catalog(format!(
                    "input page '{}' has no on_submit action",
                    page.id
                )));
            }
            let mut command_ids = HashSet::with_capacity(page.commands.len());
            for command in &page.commands {
                let source = format!("command '{}' on page '{}'", command.id, page.id);
                if !command_ids.insert(command.id.as_str()) {
                    return Err(AppError::catalog(format!("duplicate {source}")));
                }
                match (&command.opens, &command.effect) {
                    (Some(target), None) => ensure_known(&page_ids, target, &source)?,
                    (None, Some(Effect::Push { page } | Effect::Replace { page })) => {
                        ensure_known(&page_ids, page, &source)?
                    }
                    (None, Some(_)) => {}
                    (Some(_), Some(_)) => {
                        return Err(AppError::catalog(format!(
                            "{source} has both `opens` and `effect`"
                        )));
                    }
                    (None, None) => {
                        return Err(AppError::catalog(format!(
                            "{source} has neither `opens` nor `effect`"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
