use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::DataStore;

/// Removes every node, anchor and link.
pub fn run<S: DataStore>(store: &mut S) -> Result<CmdResult<()>> {
    store.clear()?;
    Ok(CmdResult::new(()).with_message(CmdMessage::success("Vault cleared")))
}
