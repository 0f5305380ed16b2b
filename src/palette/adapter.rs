use async_trait::async_trait;

use crate::error::AppResult;
use crate::model::{CommandResult, LoadReply, Meta, Page};

/// Supplies pages and runs commands on behalf of the engine.
///
/// Calls run on the tokio runtime and may be abandoned when the palette closes
/// before they finish; the engine then discards whatever they return. Loads
/// must be safe to repeat with the same arguments.
#[async_trait]
pub trait PaletteAdapter: Send + Sync {
    async fn load_root(&self) -> AppResult<Page>;

    /// Called when a page-intent command `item_id` on page `page_id` is activated,
    /// and to refresh a page that is not the root.
    async fn load_child(
        &self,
        page_id: &str,
        item_id: &str,
        query: Option<&str>,
        meta: Option<&Meta>,
    ) -> AppResult<LoadReply>;

    async fn execute(
        &self,
        item_id: &str,
        page_id: &str,
        query: Option<&str>,
        meta: Option<&Meta>,
    ) -> AppResult<CommandResult>;

    async fn submit(&self, page_id: &str, value: &str, meta: Option<&Meta>)
    -> AppResult<CommandResult>;

    /// Fired once per open/close transition.
    fn on_open_change(&self, is_open: bool) {
        let _ = is_open;
    }
}
