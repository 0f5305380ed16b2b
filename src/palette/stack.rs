//! Stack transitions. Every function here is a pure fold over [`EngineContext`];
//! none of them talk to the adapter.

use crate::model::{CommandResult, Page};

use super::context::{EngineContext, LoadKind};
use super::events::NavDirection;
use super::filter::filter_commands;

pub fn apply_loaded_page(ctx: &mut EngineContext, page: Page, kind: LoadKind) {
    match kind {
        LoadKind::Root => {
            ctx.stack.clear();
            ctx.stack.push(page);
        }
        LoadKind::Child => ctx.stack.push(page),
        LoadKind::Refresh => replace_top(ctx, page),
    }
    ctx.pending_load = None;
    ctx.pending_command = None;
    enter_top_page(ctx);
}

/// Folds a stack-level result. `Close` and `RefreshPage` are left to the engine.
pub fn apply_result(ctx: &mut EngineContext, result: CommandResult) {
    match result {
        CommandResult::PushPage { page } => {
            ctx.stack.push(page);
            ctx.pending_command = None;
            enter_top_page(ctx);
        }
        CommandResult::ReplacePage { page } => {
            replace_top(ctx, page);
            ctx.pending_command = None;
            enter_top_page(ctx);
        }
        CommandResult::PopPage => {
            ctx.pending_command = None;
            pop_page(ctx);
        }
        CommandResult::Stay => {
            ctx.pending_command = None;
        }
        CommandResult::Error { message } => {
            ctx.last_error = Some(message);
            ctx.pending_command = None;
        }
        CommandResult::Close | CommandResult::RefreshPage => {}
    }
}

/// Drops the top page. The root page is never popped.
pub fn pop_page(ctx: &mut EngineContext) -> bool {
    if ctx.stack.len() <= 1 {
        return false;
    }
    ctx.stack.pop();
    enter_top_page(ctx);
    true
}

pub fn move_active_id(ctx: &mut EngineContext, direction: NavDirection) {
    let Some(page) = ctx.stack.last() else {
        ctx.active_item_id = None;
        return;
    };
    let filtered = filter_commands(page, &ctx.query);
    if filtered.is_empty() {
        ctx.active_item_id = None;
        return;
    }

    let last = filtered.len() - 1;
    let current = ctx
        .active_item_id
        .as_deref()
        .and_then(|id| filtered.iter().position(|command| command.id == id));
    let next = match (direction, current) {
        (NavDirection::Home, _) => 0,
        (NavDirection::End, _) => last,
        (NavDirection::Next, Some(idx)) => (idx + 1) % filtered.len(),
        (NavDirection::Next, None) => 0,
        (NavDirection::Prev, Some(0)) => last,
        (NavDirection::Prev, Some(idx)) => idx - 1,
        (NavDirection::Prev, None) => last,
    };
    ctx.active_item_id = Some(filtered[next].id.clone());
}

/// First visible command of the current top page under the current query.
pub fn first_filtered_id(ctx: &EngineContext) -> Option<String> {
    let page = ctx.stack.last()?;
    filter_commands(page, &ctx.query)
        .first()
        .map(|command| command.id.clone())
}

fn replace_top(ctx: &mut EngineContext, page: Page) {
    // An empty stack falls back to a push.
    ctx.stack.pop();
    ctx.stack.push(page);
}

fn enter_top_page(ctx: &mut EngineContext) {
    ctx.query.clear();
    ctx.active_item_id = first_filtered_id(ctx);
    ctx.invocation_meta = ctx.stack.last().and_then(|page| page.meta.clone());
    ctx.last_error = None;
}
