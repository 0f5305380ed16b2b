mod page;
mod result;

pub use page::{Command, CommandIntent, Meta, Page, PageMode, Shortcut};
pub use result::{CommandResult, LoadReply};
