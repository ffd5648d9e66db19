//! Help text - renders the command tree, or a drilled-down part of it

use crate::domain::entities::CommandTree;

pub const HELP_KEYWORD: &str = "help";

fn push_line(out: &mut String, path: &str, description: &str) {
    out.push_str(&format!("{:12} - {}\n", path, description));
}

/// Render every node below `level`, depth first. Group nodes that have
/// subcommands are pure namespaces: their own line is skipped and their
/// children are listed under their name.
fn list_level(level: &CommandTree, base: &str, out: &mut String) {
    for (name, node) in level.iter() {
        let path = if base.is_empty() {
            name.to_string()
        } else {
            format!("{} {}", base, name)
        };

        if !(node.handler().is_group() && node.has_subcommands()) {
            push_line(out, &path, node.description());
        }
        list_level(node.subcommands(), &path, out);
    }
}

/// Render help for `tokens`, whose first entry is the help keyword (or empty).
/// Tokens after the keyword address a command; those past the deepest match
/// are reported as not found and rendering continues with what did match.
pub fn render_help(tokens: &[String], tree: &CommandTree) -> String {
    if tree.is_empty() {
        return "No commands available.".to_string();
    }

    let args: Vec<String> = tokens
        .iter()
        .skip(1)
        .filter(|t| !t.is_empty())
        .cloned()
        .collect();

    let mut out = String::new();
    if args.is_empty() {
        list_level(tree, "", &mut out);
        return out.trim_end().to_string();
    }

    let resolution = tree.resolve(&args);
    let consumed = resolution.as_ref().map(|r| r.consumed()).unwrap_or(0);

    if consumed < args.len() {
        let mut found = args[..consumed].join(" ");
        if !found.is_empty() {
            found.push(' ');
        }
        out.push_str(&format!(
            "Could not find command: {}*{}*\n\n",
            found,
            args[consumed..].join(" ")
        ));
    }

    match resolution {
        Some(res) => {
            let path = res.name();
            push_line(&mut out, &path, res.node.description());
            if res.node.has_subcommands() {
                out.push('\n');
                list_level(res.node.subcommands(), &path, &mut out);
            }
        }
        None => list_level(tree, "", &mut out),
    }

    out.trim_end().to_string()
}
