use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::errors::{BotError, ConstructionError};
use crate::application::messaging::CommandContext;

/// What the run loop should do after a command finishes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Shutdown { reason: String },
}

/// A command implementation. Handlers send their own replies through
/// `ctx.channel` and may hold a dialog with the author before returning.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, ctx: CommandContext<'_>) -> Result<Flow, BotError>;
}

/// Handler slot of a command node
#[derive(Clone)]
pub enum Handler {
    /// No-op marker: the node only groups its subcommands
    Group,
    Leaf(Arc<dyn CommandHandler>),
}

impl Handler {
    pub fn leaf<H: CommandHandler + 'static>(handler: H) -> Self {
        Handler::Leaf(Arc::new(handler))
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Handler::Group)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Group => write!(f, "Group"),
            Handler::Leaf(_) => write!(f, "Leaf"),
        }
    }
}

/// A validated entry of the command tree. Only produced by `CommandTreeBuilder`.
#[derive(Debug, Clone)]
pub struct CommandNode {
    description: String,
    handler: Handler,
    subcommands: CommandTree,
    wants_command_tree: bool,
    wants_auto_responses: bool,
}

impl CommandNode {
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    pub fn subcommands(&self) -> &CommandTree {
        &self.subcommands
    }

    pub fn has_subcommands(&self) -> bool {
        !self.subcommands.is_empty()
    }

    pub fn wants_command_tree(&self) -> bool {
        self.wants_command_tree
    }

    pub fn wants_auto_responses(&self) -> bool {
        self.wants_auto_responses
    }
}

/// Unvalidated description of a command, consumed by `CommandTreeBuilder`
pub struct CommandSpec {
    description: Option<String>,
    handler: Handler,
    subcommands: Vec<(String, CommandSpec)>,
    wants_command_tree: bool,
    wants_auto_responses: bool,
}

impl CommandSpec {
    pub fn new(handler: Handler) -> Self {
        Self {
            description: None,
            handler,
            subcommands: Vec::new(),
            wants_command_tree: false,
            wants_auto_responses: false,
        }
    }

    pub fn leaf<H: CommandHandler + 'static>(handler: H) -> Self {
        Self::new(Handler::leaf(handler))
    }

    pub fn group() -> Self {
        Self::new(Handler::Group)
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_subcommand(mut self, name: impl Into<String>, spec: CommandSpec) -> Self {
        self.subcommands.push((name.into(), spec));
        self
    }

    /// Inject the live command tree into the handler's context
    pub fn wants_command_tree(mut self) -> Self {
        self.wants_command_tree = true;
        self
    }

    /// Inject the auto-response registry into the handler's context
    pub fn wants_auto_responses(mut self) -> Self {
        self.wants_auto_responses = true;
        self
    }

    fn build(self, path: &str) -> Result<CommandNode, ConstructionError> {
        let description = self
            .description
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| ConstructionError::MissingDescription(path.to_string()))?;

        let subcommands = build_level(self.subcommands, Some(path))?;

        Ok(CommandNode {
            description,
            handler: self.handler,
            subcommands,
            wants_command_tree: self.wants_command_tree,
            wants_auto_responses: self.wants_auto_responses,
        })
    }
}

fn build_level(entries: Vec<(String, CommandSpec)>, parent: Option<&str>) -> Result<CommandTree, ConstructionError> {
    let mut nodes = BTreeMap::new();
    for (name, spec) in entries {
        let path = match parent {
            Some(parent) => format!("{} {}", parent, name),
            None => name.clone(),
        };
        // Tokens are lower-cased and split on spaces, so anything else is unreachable
        let reachable = !name.is_empty()
            && !name.chars().any(char::is_whitespace)
            && name.to_lowercase() == name;
        if !reachable {
            return Err(ConstructionError::InvalidName(path));
        }
        if nodes.contains_key(&name) {
            return Err(ConstructionError::DuplicateName(path));
        }
        let node = spec.build(&path)?;
        nodes.insert(name, node);
    }
    Ok(CommandTree { nodes })
}

/// Builds the command tree once at startup
#[derive(Default)]
pub struct CommandTreeBuilder {
    entries: Vec<(String, CommandSpec)>,
}

impl CommandTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn command(mut self, name: impl Into<String>, spec: CommandSpec) -> Self {
        self.entries.push((name.into(), spec));
        self
    }

    pub fn build(self) -> Result<CommandTree, ConstructionError> {
        build_level(self.entries, None)
    }
}

/// Mapping from token to command node, ordered by name
#[derive(Debug, Clone, Default)]
pub struct CommandTree {
    nodes: BTreeMap<String, CommandNode>,
}

/// Result of walking the tree with a token sequence
#[derive(Debug)]
pub struct Resolution<'a> {
    pub node: &'a CommandNode,
    /// Names of the matched nodes, root first
    pub path: Vec<&'a str>,
}

impl Resolution<'_> {
    /// Number of leading tokens that matched
    pub fn consumed(&self) -> usize {
        self.path.len()
    }

    pub fn name(&self) -> String {
        self.path.join(" ")
    }
}

impl CommandTree {
    pub fn builder() -> CommandTreeBuilder {
        CommandTreeBuilder::new()
    }

    pub fn get(&self, name: &str) -> Option<&CommandNode> {
        self.nodes.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommandNode)> {
        self.nodes.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Longest matched prefix. Walking stops at the first token that is not a
    /// subcommand of the current node; the last matched node is the target and
    /// the remaining tokens are left to its handler as arguments.
    pub fn resolve<'a>(&'a self, tokens: &[String]) -> Option<Resolution<'a>> {
        let mut current: Option<&'a CommandNode> = None;
        let mut level = self;
        let mut path = Vec::new();

        for token in tokens {
            match level.nodes.get_key_value(token.as_str()) {
                Some((name, node)) => {
                    current = Some(node);
                    path.push(name.as_str());
                    level = &node.subcommands;
                }
                None => break,
            }
        }

        current.map(|node| Resolution { node, path })
    }
}
