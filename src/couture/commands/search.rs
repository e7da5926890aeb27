use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Node, NodeType};
use crate::store::DataStore;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSort {
    #[default]
    Relevance,
    Newest,
    Oldest,
}

impl FromStr for SearchSort {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "relevance" => Ok(SearchSort::Relevance),
            "newest" => Ok(SearchSort::Newest),
            "oldest" => Ok(SearchSort::Oldest),
            other => Err(format!("unknown sort order '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub term: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<NodeType>,
    #[serde(default)]
    pub sort: SearchSort,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Self::default()
        }
    }

    pub fn of_type(mut self, node_type: NodeType) -> Self {
        self.node_type = Some(node_type);
        self
    }

    pub fn sorted(mut self, sort: SearchSort) -> Self {
        self.sort = sort;
        self
    }
}

/// Case- and diacritic-insensitive search over titles and content.
///
/// No match is not a failure: the result is simply empty. The same holds for
/// a term with no searchable characters.
pub fn run<S: DataStore>(store: &S, query: &SearchQuery) -> Result<CmdResult<Vec<Node>>> {
    let mut nodes: Vec<Node> = store
        .search_nodes(&query.term)?
        .into_iter()
        .filter(|n| query.node_type.map_or(true, |t| n.node_type() == t))
        .collect();

    // sort_by is stable, so equal dates keep relevance order
    match query.sort {
        SearchSort::Relevance => {}
        SearchSort::Newest => nodes.sort_by(|a, b| b.date_created.cmp(&a.date_created)),
        SearchSort::Oldest => nodes.sort_by(|a, b| a.date_created.cmp(&b.date_created)),
    }

    debug!(term = %query.term, hits = nodes.len(), "search finished");
    if nodes.is_empty() {
        let message = CmdMessage::info(format!("No matches for '{}'", query.term));
        return Ok(CmdResult::new(nodes).with_message(message));
    }
    Ok(CmdResult::new(nodes))
}
