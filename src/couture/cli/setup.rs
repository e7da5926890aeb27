use clap::{Args, Parser, Subcommand, ValueEnum};
use couture::commands::search::SearchSort;
use couture::model::NodeType;
use std::path::PathBuf;

/// "v0.3.2" for tagged release builds, "v0.3.2 (dev abc1234)" otherwise.
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            format!("v{}", VERSION)
        } else {
            format!("v{} (dev {})", VERSION, GIT_HASH)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "couture",
    bin_name = "couture",
    version = get_version(),
    disable_help_subcommand = true
)]
#[command(about = "Hypermedia vault for outfits, clothing and notes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Print the raw response as JSON
    #[arg(long, global = true, help_heading = "Options")]
    pub json: bool,

    /// Vault directory (overrides COUTURE_DATA_DIR and couture.toml)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Relevance,
    Newest,
    Oldest,
}

impl From<SortArg> for SearchSort {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Relevance => SearchSort::Relevance,
            SortArg::Newest => SearchSort::Newest,
            SortArg::Oldest => SearchSort::Oldest,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a node
    #[command(alias = "n", display_order = 1)]
    Create {
        /// Node type: text, image, outfit, media, clothingitem, pdf
        #[arg(value_parser = clap::value_parser!(NodeType))]
        node_type: NodeType,

        /// Title words
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,

        /// Create inside this node
        #[arg(long, short = 'p', value_name = "NODE_ID")]
        parent: Option<String>,

        /// Body text
        #[arg(long, short = 'c')]
        content: Option<String>,

        /// Extra fields, e.g. --set price=19.99 --set brand=Acme
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        fields: Vec<String>,
    },

    /// Show one or more nodes
    #[command(alias = "v", display_order = 2)]
    Get {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Show a subtree, or the whole forest
    #[command(display_order = 3)]
    Tree {
        /// Root of the subtree (all roots when omitted)
        id: Option<String>,
    },

    /// List root nodes
    #[command(alias = "ls", display_order = 4)]
    Roots,

    /// Update fields of a node
    #[command(alias = "u", display_order = 5)]
    Update {
        id: String,

        /// Field assignments, e.g. --set title=Summer --set price=12
        #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
        fields: Vec<String>,
    },

    /// Delete a node with its subtree, anchors and links
    #[command(alias = "rm", display_order = 6)]
    Delete { id: String },

    /// Move a node under another node, or to the root with "root"
    #[command(alias = "mv", display_order = 7)]
    Move { id: String, target: String },

    /// Search titles and content
    #[command(display_order = 8)]
    Search {
        #[arg(required = true, num_args = 1..)]
        term: Vec<String>,

        /// Only nodes of this type
        #[arg(long = "type", short = 't', value_parser = clap::value_parser!(NodeType))]
        node_type: Option<NodeType>,

        #[arg(long, short = 's', value_enum, default_value_t = SortArg::Relevance)]
        sort: SortArg,
    },

    /// Add a comment to a node
    #[command(display_order = 9)]
    Comment {
        id: String,

        /// Who is commenting
        #[arg(long, short = 'n')]
        name: String,

        #[arg(required = true, num_args = 1..)]
        comment: Vec<String>,
    },

    /// Sum the prices of an outfit's clothing items
    #[command(display_order = 10)]
    Total { id: String },

    /// Manage anchors
    #[command(subcommand, display_order = 20)]
    Anchor(AnchorCommands),

    /// Manage links
    #[command(subcommand, display_order = 21)]
    Link(LinkCommands),

    /// Check and repair vault consistency
    #[command(display_order = 30)]
    Doctor,

    /// Delete everything in the vault
    #[command(display_order = 31)]
    Clear {
        /// Required to actually clear
        #[arg(long)]
        yes: bool,
    },

    /// Show the effective configuration
    #[command(display_order = 32)]
    Config {
        /// Print a commented couture.toml instead
        #[arg(long)]
        template: bool,
    },
}

#[derive(Args, Debug)]
pub struct ExtentArg {
    /// Extent as JSON, e.g. '{"type":"media","timestamp":12.5}'. Whole node when omitted
    #[arg(long, short = 'e')]
    pub extent: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum AnchorCommands {
    /// Mark a region of a node
    Create {
        node_id: String,
        #[command(flatten)]
        extent: ExtentArg,
    },

    /// List the anchors on a node
    List { node_id: String },

    /// Show anchors by id
    Get {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Replace an anchor's extent
    Update {
        id: String,
        #[command(flatten)]
        extent: ExtentArg,
    },

    /// Delete an anchor (and its links), or every anchor on a node
    Delete {
        #[arg(required_unless_present = "node", conflicts_with = "node")]
        id: Option<String>,

        #[arg(long, value_name = "NODE_ID")]
        node: Option<String>,
    },

    /// Remove anchors on a node that are no longer referenced
    Cleanup {
        node_id: String,

        /// Anchors still referenced by the node's content
        #[arg(long = "keep", value_name = "ANCHOR_ID")]
        keep: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum LinkCommands {
    /// Link two anchors
    Create { anchor1: String, anchor2: String },

    /// List links touching an anchor or a node
    List {
        #[arg(long, required_unless_present = "node", conflicts_with = "node")]
        anchor: Option<String>,

        #[arg(long)]
        node: Option<String>,
    },

    /// Show a link
    Get { id: String },

    /// Delete links
    Delete {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },
}
