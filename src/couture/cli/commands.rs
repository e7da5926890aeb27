//! # CLI Layer
//!
//! This module is **one possible client** of the vault, not the application
//! itself. It is the only place that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Decides the process exit status
//! - Parses arguments
//! - Formats output for humans
//!
//! ## Flow
//!
//! 1. **Parse** arguments with clap (`setup.rs`)
//! 2. **Configure**: load `VaultConfig`, install the log subscriber
//! 3. **Dispatch** to one `VaultApi` method per subcommand
//! 4. **Print** the payload and messages, or the raw response with `--json`
//!
//! An unsuccessful response is printed like any other and makes the process
//! exit with status 1. Infrastructure errors bubble up to `main`.

use super::print::{
    print_anchors, print_config, print_deletion, print_json, print_links, print_messages,
    print_node, print_nodes, print_removal, print_report, print_total, print_trees,
};
use super::setup::{AnchorCommands, Cli, Commands, ExtentArg, LinkCommands};
use clap::Parser;
use couture::api::{ServiceResponse, VaultApi};
use couture::commands::move_node::MoveTarget;
use couture::commands::search::SearchQuery;
use couture::config::VaultConfig;
use couture::error::{Result, VaultError};
use couture::fields::NodeProperty;
use couture::logging::{init_logging, LogFormat};
use couture::model::{AnchorId, LinkId, NodeDraft, NodeId};
use couture::store::fs::FileStore;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

struct AppContext {
    api: VaultApi<FileStore>,
    json: bool,
}

impl AppContext {
    /// Prints a response and reports whether it was successful.
    fn emit<T: Serialize>(&self, response: ServiceResponse<T>, show: impl FnOnce(&T)) -> bool {
        if self.json {
            print_json(&response);
        } else {
            if let Some(payload) = &response.payload {
                show(payload);
            }
            print_messages(&response.messages);
        }
        response.success
    }
}

/// Runs the CLI. `Ok(false)` means the request was understood but failed.
pub fn run() -> Result<bool> {
    let cli = Cli::parse();

    let config = match &cli.data_dir {
        Some(dir) => VaultConfig {
            data_dir: Some(dir.clone()),
            ..VaultConfig::load_from(Some(dir.as_path()))?
        },
        None => VaultConfig::load()?,
    };
    let level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    init_logging(level, config.log_format.parse::<LogFormat>()?)?;

    let data_dir = config.data_dir()?;
    if let Commands::Config { template } = cli.command {
        return handle_config(&config, &data_dir.display().to_string(), template, cli.json);
    }

    debug!(data_dir = %data_dir.display(), "opening vault");
    let mut ctx = AppContext {
        api: VaultApi::with_max_depth(FileStore::open(data_dir), config.max_depth),
        json: cli.json,
    };

    match cli.command {
        Commands::Create {
            node_type,
            title,
            parent,
            content,
            fields,
        } => {
            let mut draft = NodeDraft::new(node_type, title.join(" "));
            if let Some(content) = content {
                draft = draft.with_content(content);
            }
            if let Some(parent) = parent {
                draft = draft.under(NodeId::from(parent));
            }
            handle_create(&mut ctx, draft, &fields)
        }
        Commands::Get { ids } => handle_get(&ctx, ids),
        Commands::Tree { id } => handle_tree(&ctx, id),
        Commands::Roots => {
            let response = ctx.api.find_roots()?;
            Ok(ctx.emit(response, |nodes| print_nodes(nodes)))
        }
        Commands::Update { id, fields } => handle_update(&mut ctx, id, &fields),
        Commands::Delete { id } => {
            let response = ctx.api.delete_node(&NodeId::from(id))?;
            Ok(ctx.emit(response, print_deletion))
        }
        Commands::Move { id, target } => {
            let target: MoveTarget = target.parse().unwrap_or_else(|never| match never {});
            let response = ctx.api.move_node(&NodeId::from(id), &target)?;
            Ok(ctx.emit(response, print_node))
        }
        Commands::Search {
            term,
            node_type,
            sort,
        } => {
            let mut query = SearchQuery::new(term.join(" ")).sorted(sort.into());
            if let Some(node_type) = node_type {
                query = query.of_type(node_type);
            }
            let response = ctx.api.search_with(&query)?;
            Ok(ctx.emit(response, |nodes| {
                if !nodes.is_empty() {
                    print_nodes(nodes)
                }
            }))
        }
        Commands::Comment { id, name, comment } => {
            let response = ctx
                .api
                .add_comment(&NodeId::from(id), &name, &comment.join(" "))?;
            Ok(ctx.emit(response, |_| {}))
        }
        Commands::Total { id } => {
            let response = ctx.api.outfit_total(&NodeId::from(id))?;
            Ok(ctx.emit(response, |total| print_total(*total)))
        }
        Commands::Anchor(command) => handle_anchor(&mut ctx, command),
        Commands::Link(command) => handle_link(&mut ctx, command),
        Commands::Doctor => {
            let response = ctx.api.doctor()?;
            Ok(ctx.emit(response, print_report))
        }
        Commands::Clear { yes } => {
            if !yes {
                let response: ServiceResponse<()> =
                    ServiceResponse::failure("Refusing to clear the vault without --yes");
                return Ok(ctx.emit(response, |_| {}));
            }
            let response = ctx.api.clear_all()?;
            Ok(ctx.emit(response, |_| {}))
        }
        Commands::Config { .. } => Ok(true),
    }
}

fn parse_fields(fields: &[String]) -> Result<Vec<NodeProperty>> {
    fields.iter().map(|f| NodeProperty::parse(f)).collect()
}

/// Malformed user input is a failed request, not a crash.
fn input_failure<T: Serialize>(ctx: &AppContext, err: VaultError) -> Result<bool> {
    if !err.is_expected() {
        return Err(err);
    }
    let response: ServiceResponse<T> = ServiceResponse::failure(err.to_string());
    Ok(ctx.emit(response, |_| {}))
}

fn handle_create(ctx: &mut AppContext, draft: NodeDraft, fields: &[String]) -> Result<bool> {
    let fields = match parse_fields(fields) {
        Ok(fields) => fields,
        Err(e) => return input_failure::<()>(ctx, e),
    };
    let response = ctx.api.create_from_draft_with(draft, &fields)?;
    Ok(ctx.emit(response, |node| println!("{}", node.node_id.as_str())))
}

fn handle_get(ctx: &AppContext, ids: Vec<String>) -> Result<bool> {
    if let [id] = ids.as_slice() {
        let response = ctx.api.get_node(&NodeId::from(id.as_str()))?;
        return Ok(ctx.emit(response, print_node));
    }
    let ids: Vec<NodeId> = ids.into_iter().map(NodeId::from).collect();
    let response = ctx.api.get_nodes_by_id(&ids)?;
    Ok(ctx.emit(response, |nodes| print_nodes(nodes)))
}

fn handle_tree(ctx: &AppContext, id: Option<String>) -> Result<bool> {
    match id {
        Some(id) => {
            let response = ctx.api.get_tree(&NodeId::from(id))?;
            Ok(ctx.emit(response, |tree| print_trees(std::slice::from_ref(tree))))
        }
        None => {
            let response = ctx.api.find_root_trees()?;
            Ok(ctx.emit(response, |trees| print_trees(trees)))
        }
    }
}

fn handle_update(ctx: &mut AppContext, id: String, fields: &[String]) -> Result<bool> {
    let properties = match parse_fields(fields) {
        Ok(properties) => properties,
        Err(e) => return input_failure::<()>(ctx, e),
    };
    let response = ctx.api.update_node(&NodeId::from(id), &properties)?;
    Ok(ctx.emit(response, |_| {}))
}

/// `--extent` as JSON; no flag means the whole node.
fn parse_extent(extent: ExtentArg) -> Result<Value> {
    match extent.extent {
        None => Ok(Value::Null),
        Some(raw) => serde_json::from_str(&raw)
            .map_err(|e| VaultError::Validation(format!("extent is not valid JSON: {}", e))),
    }
}

fn handle_anchor(ctx: &mut AppContext, command: AnchorCommands) -> Result<bool> {
    match command {
        AnchorCommands::Create { node_id, extent } => {
            let extent = match parse_extent(extent) {
                Ok(extent) => extent,
                Err(e) => return input_failure::<()>(ctx, e),
            };
            let response = ctx.api.create_anchor(&NodeId::from(node_id), extent)?;
            Ok(ctx.emit(response, |anchor| println!("{}", anchor.anchor_id.as_str())))
        }
        AnchorCommands::List { node_id } => {
            let response = ctx.api.get_anchors_by_node_id(&NodeId::from(node_id))?;
            Ok(ctx.emit(response, |anchors| print_anchors(anchors)))
        }
        AnchorCommands::Get { ids } => {
            if let [id] = ids.as_slice() {
                let response = ctx.api.get_anchor(&AnchorId::from(id.as_str()))?;
                return Ok(ctx.emit(response, |anchor| {
                    print_anchors(std::slice::from_ref(anchor))
                }));
            }
            let ids: Vec<AnchorId> = ids.into_iter().map(AnchorId::from).collect();
            let response = ctx.api.get_anchors_by_id(&ids)?;
            Ok(ctx.emit(response, |anchors| print_anchors(anchors)))
        }
        AnchorCommands::Update { id, extent } => {
            let extent = match parse_extent(extent) {
                Ok(extent) => extent,
                Err(e) => return input_failure::<()>(ctx, e),
            };
            let response = ctx.api.update_extent(&AnchorId::from(id), extent)?;
            Ok(ctx.emit(response, |anchor| {
                print_anchors(std::slice::from_ref(anchor))
            }))
        }
        AnchorCommands::Delete { id, node } => {
            let response = match (id, node) {
                (_, Some(node)) => ctx.api.delete_anchors_by_node_id(&NodeId::from(node))?,
                (Some(id), None) => ctx.api.delete_anchor(&AnchorId::from(id))?,
                (None, None) => ServiceResponse::failure("Give an anchor id or --node"),
            };
            Ok(ctx.emit(response, print_removal))
        }
        AnchorCommands::Cleanup { node_id, keep } => {
            let keep: Vec<AnchorId> = keep.into_iter().map(AnchorId::from).collect();
            let response = ctx
                .api
                .cleanup_orphan_anchors(&NodeId::from(node_id), &keep)?;
            Ok(ctx.emit(response, print_removal))
        }
    }
}

fn handle_link(ctx: &mut AppContext, command: LinkCommands) -> Result<bool> {
    match command {
        LinkCommands::Create { anchor1, anchor2 } => {
            // the CLI only knows anchor ids; look up the nodes they sit on
            let mut ends = Vec::with_capacity(2);
            for id in [anchor1, anchor2] {
                let response = ctx.api.get_anchor(&AnchorId::from(id))?;
                match response.payload {
                    Some(anchor) => ends.push(anchor),
                    None => return Ok(ctx.emit(response, |_| {})),
                }
            }
            let response = ctx.api.create_link(
                &ends[0].anchor_id,
                &ends[0].node_id,
                &ends[1].anchor_id,
                &ends[1].node_id,
            )?;
            Ok(ctx.emit(response, |link| println!("{}", link.link_id.as_str())))
        }
        LinkCommands::List { anchor, node } => {
            let response = match (anchor, node) {
                (Some(anchor), _) => ctx.api.get_links_by_anchor_id(&AnchorId::from(anchor))?,
                (None, Some(node)) => ctx.api.get_links_by_node_id(&NodeId::from(node))?,
                (None, None) => ServiceResponse::failure("Give --anchor or --node"),
            };
            Ok(ctx.emit(response, |links| print_links(links)))
        }
        LinkCommands::Get { id } => {
            let response = ctx.api.get_link(&LinkId::from(id))?;
            Ok(ctx.emit(response, |link| print_links(std::slice::from_ref(link))))
        }
        LinkCommands::Delete { ids } => {
            let ids: Vec<LinkId> = ids.into_iter().map(LinkId::from).collect();
            let response = ctx.api.delete_links(&ids)?;
            Ok(ctx.emit(response, |_| {}))
        }
    }
}

fn handle_config(config: &VaultConfig, data_dir: &str, template: bool, json: bool) -> Result<bool> {
    if template {
        print!("{}", VaultConfig::template());
    } else if json {
        let effective = VaultConfig {
            data_dir: Some(data_dir.into()),
            ..config.clone()
        };
        print_json(&ServiceResponse::ok(couture::commands::CmdResult::new(effective)));
    } else {
        print_config(config, data_dir);
    }
    Ok(true)
}
