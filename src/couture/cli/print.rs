use chrono::{DateTime, Utc};
use colored::Colorize;
use couture::api::ServiceResponse;
use couture::commands::anchors::AnchorRemoval;
use couture::commands::delete::NodeDeletion;
use couture::commands::get::NodeTree;
use couture::commands::{CmdMessage, MessageLevel};
use couture::config::VaultConfig;
use couture::model::{Anchor, Extent, Link, Node, NodeType};
use couture::store::DoctorReport;
use serde::Serialize;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const ID_WIDTH: usize = 24;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => eprintln!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_json<T: Serialize>(response: &ServiceResponse<T>) {
    match serde_json::to_string_pretty(response) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("{}", format!("cannot encode response: {}", e).red()),
    }
}

fn type_label(node_type: NodeType) -> colored::ColoredString {
    let label = format!("{:<12}", node_type.as_str());
    match node_type {
        NodeType::Outfit => label.magenta(),
        NodeType::ClothingItem => label.cyan(),
        NodeType::Image | NodeType::Media | NodeType::Pdf => label.blue(),
        NodeType::Text => label.normal(),
    }
}

/// One line per node: type, title with a content preview, id, age.
fn node_line(node: &Node, indent: usize) -> String {
    let prefix = "  ".repeat(indent);
    let id = format!("{:<width$}", node.node_id.as_str(), width = ID_WIDTH);
    let time_ago = format_time_ago(node.date_created);

    let preview: String = node
        .content
        .chars()
        .take(50)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect();
    let text = if preview.is_empty() {
        node.title.clone()
    } else {
        format!("{} {}", node.title, preview)
    };

    let fixed = prefix.width() + 13 + ID_WIDTH + 1 + TIME_WIDTH;
    let available = LINE_WIDTH.saturating_sub(fixed);
    let shown = truncate_to_width(&text, available);
    let padding = available.saturating_sub(shown.width());

    format!(
        "{}{} {}{} {}{}",
        prefix,
        type_label(node.node_type()),
        shown,
        " ".repeat(padding),
        id.dimmed(),
        time_ago.dimmed()
    )
}

pub(super) fn print_nodes(nodes: &[Node]) {
    if nodes.is_empty() {
        println!("No nodes found.");
        return;
    }
    for node in nodes {
        println!("{}", node_line(node, 0));
    }
}

pub(super) fn print_node(node: &Node) {
    println!("{} {}", type_label(node.node_type()), node.title.bold());
    println!("{}", node.node_id.as_str().dimmed());
    println!("--------------------------------");
    let path: Vec<&str> = node.file_path.path.iter().map(|id| id.as_str()).collect();
    println!("{:<14}{}", "path", path.join(" / "));
    if !node.file_path.children.is_empty() {
        println!("{:<14}{}", "children", node.file_path.children.len());
    }
    println!("{:<14}{}", "created", format_time_ago(node.date_created).trim());
    for name in couture::fields::updatable_fields(node.node_type()) {
        if matches!(name, "title" | "content" | "filePath" | "comments") {
            continue;
        }
        if let Some(value) = node.get_field(name) {
            if !value.is_null() {
                let shown = value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string());
                println!("{:<14}{}", name, shown);
            }
        }
    }
    if !node.content.is_empty() {
        println!();
        println!("{}", node.content);
    }
    if !node.comments.is_empty() {
        println!();
        for comment in &node.comments {
            println!(
                "{} {} {}",
                comment.name.bold(),
                format_time_ago(comment.timestamp).trim().dimmed(),
                comment.comment
            );
        }
    }
}

pub(super) fn print_trees(trees: &[NodeTree]) {
    if trees.is_empty() {
        println!("No nodes found.");
        return;
    }
    for tree in trees {
        print_tree(tree, 0);
    }
}

fn print_tree(tree: &NodeTree, depth: usize) {
    println!("{}", node_line(&tree.node, depth));
    for child in &tree.children {
        print_tree(child, depth + 1);
    }
}

fn describe_extent(extent: Option<&Extent>) -> String {
    match extent {
        None => "whole node".to_string(),
        Some(Extent::Text {
            start_character,
            end_character,
            text,
        }) => format!("text {}..{} \"{}\"", start_character, end_character, text),
        Some(Extent::Image {
            left,
            top,
            width,
            height,
        }) => format!("image {}x{} at ({}, {})", width, height, left, top),
        Some(Extent::Media { timestamp }) => format!("media at {}s", timestamp),
        Some(Extent::ClothingItem) => "clothing item".to_string(),
    }
}

pub(super) fn print_anchors(anchors: &[Anchor]) {
    if anchors.is_empty() {
        println!("No anchors found.");
        return;
    }
    for anchor in anchors {
        println!(
            "{:<width$} {} {}",
            anchor.anchor_id.as_str().yellow(),
            anchor.node_id.as_str().dimmed(),
            describe_extent(anchor.extent.as_ref()),
            width = ID_WIDTH
        );
    }
}

pub(super) fn print_links(links: &[Link]) {
    if links.is_empty() {
        println!("No links found.");
        return;
    }
    for link in links {
        println!(
            "{} {} ({}) {} {} ({})",
            link.link_id.as_str().yellow(),
            link.anchor1_id.as_str(),
            link.anchor1_node_id.as_str().dimmed(),
            "<->".dimmed(),
            link.anchor2_id.as_str(),
            link.anchor2_node_id.as_str().dimmed()
        );
    }
}

pub(super) fn print_deletion(deletion: &NodeDeletion) {
    for id in &deletion.deleted_nodes {
        println!("{} {}", "-".red(), id.as_str().dimmed());
    }
}

pub(super) fn print_removal(removal: &AnchorRemoval) {
    for id in &removal.kept_anchors {
        println!("{} {}", "kept".yellow(), id.as_str());
    }
}

pub(super) fn print_total(total: f64) {
    println!("{}", format!("{:.2}", total).bold());
}

pub(super) fn print_report(report: &DoctorReport) {
    let rows = [
        ("re-homed nodes", report.rehomed_nodes),
        ("stranded nodes", report.removed_stranded_nodes),
        ("children lists", report.repaired_children),
        ("dangling anchors", report.removed_dangling_anchors),
        ("dangling links", report.removed_dangling_links),
        ("indexed nodes", report.indexed_nodes),
    ];
    for (label, count) in rows {
        let count = count.to_string();
        println!("{:<18}{}", label, if count == "0" { count.dimmed() } else { count.bold() });
    }
}

pub(super) fn print_config(config: &VaultConfig, data_dir: &str) {
    println!("{:<12}{}", "data_dir", data_dir);
    println!("{:<12}{}", "log_level", config.log_level);
    println!("{:<12}{}", "log_format", config.log_format);
    println!("{:<12}{}", "max_depth", config.max_depth);
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
