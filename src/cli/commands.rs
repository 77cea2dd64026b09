//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::arena::{NodeId, TreeArena};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::errors::TreeError;
use crate::traversal::Traversal;

pub fn execute_command(cli: &Cli, settings: &Settings) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Show { file, coordinates }) => {
            show(file, *coordinates || settings.show_coordinates)
        }
        Some(Commands::Walk { file, order, from }) => walk(
            file,
            order.unwrap_or(settings.order),
            from.as_deref(),
            settings.show_coordinates,
        ),
        Some(Commands::Dump { file }) => dump(file),
        Some(Commands::Find { file, value, order }) => {
            find(file, value, order.unwrap_or(settings.order))
        }
        Some(Commands::Prune { file, value }) => prune(file, value),
        Some(Commands::Config { command }) => config(command, settings),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

fn load_tree(file: &Path) -> CliResult<(TreeArena<String>, NodeId)> {
    let content = std::fs::read_to_string(file).map_err(|source| CliError::Io {
        path: file.to_path_buf(),
        source,
    })?;
    let mut tree = TreeArena::new();
    let root = tree.from_toml(&content)?;
    debug!(size = tree.len(), "loaded tree");
    Ok((tree, root))
}

/// Parses a child-index path such as `0.2`; the empty string is the root.
pub fn parse_index_path(path: &str) -> CliResult<Vec<usize>> {
    if path.trim().is_empty() {
        return Ok(Vec::new());
    }
    path.split('.')
        .map(|part| {
            part.trim()
                .parse::<usize>()
                .map_err(|_| CliError::InvalidArgs(format!("bad index '{part}' in path '{path}'")))
        })
        .collect()
}

fn format_index_path(path: &[usize]) -> String {
    path.iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

#[instrument]
fn show(file: &Path, coordinates: bool) -> CliResult<()> {
    let (tree, root) = load_tree(file)?;
    output::info(&tree.to_tree_string(root, coordinates)?);
    Ok(())
}

#[instrument]
fn walk(file: &Path, order: Traversal, from: Option<&str>, coordinates: bool) -> CliResult<()> {
    let (tree, root) = load_tree(file)?;
    let start = match from {
        Some(path) => tree.descend(root, &parse_index_path(path)?)?,
        None => root,
    };
    for id in tree.walk(start, order)? {
        let element = tree.element(id)?;
        if coordinates {
            let node = tree.get_node(id).ok_or(TreeError::MissingNode(id))?;
            output::located(element, node.x(), node.y());
        } else {
            output::info(element);
        }
    }
    Ok(())
}

#[instrument]
fn dump(file: &Path) -> CliResult<()> {
    let (tree, root) = load_tree(file)?;
    output::info(&tree.dump(root)?);
    Ok(())
}

#[instrument]
fn find(file: &Path, value: &str, order: Traversal) -> CliResult<()> {
    let (tree, root) = load_tree(file)?;
    let found = tree.find_value(root, order, Some(root), &value.to_string())?;
    let Some(id) = found else {
        return Err(CliError::NotFound(value.to_string()));
    };
    output::info(&format_index_path(&tree.index_path(id)?));
    Ok(())
}

#[instrument]
fn prune(file: &Path, value: &str) -> CliResult<()> {
    let (mut tree, root) = load_tree(file)?;
    if tree.element(root)? == value {
        output::warning("the root is never removed");
    }
    let removed = tree.remove_value(root, &value.to_string())?;
    debug!(count = removed.len(), "pruned");
    output::info(&tree.to_toml(root)?);
    Ok(())
}

fn config(command: &ConfigCommands, settings: &Settings) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::action("global", &path.display()),
            None => output::warning("no home directory, global config disabled"),
        },
    }
    Ok(())
}
