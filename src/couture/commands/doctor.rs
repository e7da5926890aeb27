use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{DataStore, DoctorReport};

/// Repairs what interrupted cascades can leave behind and rebuilds the
/// search index.
pub fn run<S: DataStore>(store: &mut S) -> Result<CmdResult<DoctorReport>> {
    let report = store.doctor()?;
    let mut result = CmdResult::new(report);

    if result.payload.is_clean() {
        result.add_message(CmdMessage::info("No inconsistencies found."));
    } else {
        let fixes = [
            (result.payload.rehomed_nodes, "node path(s) re-homed"),
            (result.payload.removed_stranded_nodes, "stranded node(s) removed"),
            (result.payload.repaired_children, "children list(s) repaired"),
            (result.payload.removed_dangling_anchors, "dangling anchor(s) removed"),
            (result.payload.removed_dangling_links, "dangling link(s) removed"),
        ];
        for (count, what) in fixes {
            if count > 0 {
                result.add_message(CmdMessage::success(format!("{} {}", count, what)));
            }
        }
    }
    let indexed = CmdMessage::info(format!("Indexed {} node(s)", result.payload.indexed_nodes));
    result.add_message(indexed);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn clean_vault_reports_nothing_to_fix() {
        let mut f = StoreFixture::new();
        f.outfit("Look");
        let result = run(&mut f.store).unwrap();
        assert!(result.payload.is_clean());
        assert_eq!(result.payload.indexed_nodes, 1);
        assert_eq!(result.messages[0].content, "No inconsistencies found.");
    }

    #[test]
    fn reports_each_kind_of_fix() {
        let mut f = StoreFixture::new();
        let outfit = f.outfit("Look");
        f.clothing("Shirt", None, &outfit);
        f.store.delete_node(&outfit.node_id).unwrap();

        let result = run(&mut f.store).unwrap();
        assert_eq!(result.payload.removed_stranded_nodes, 1);
        assert!(result
            .messages
            .iter()
            .any(|m| m.content == "1 stranded node(s) removed"));
    }
}
