//! Lexigraph command-line interface.
//!
//! Loads a thesaurus directory once, runs one structural query and prints
//! the result (human-readable by default, `--json` where offered). The
//! query engine is constructed here and passed to each command explicitly;
//! there is no ambient global instance.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use lexigraph_graph::{Pos, Thesaurus, TreeNode, UnknownPosTag};
use lexigraph_ingest_xml::{load_dir, LoadSummary};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lexigraph")]
#[command(
    author,
    version,
    about = "Structural queries over a thesaurus hierarchy"
)]
struct Cli {
    /// Directory containing the thesaurus record sets.
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print load and graph statistics.
    Stats,
    /// List root synsets (no parents, at least one child).
    Roots {
        /// Restrict to one part of speech (N, V or Adj).
        #[arg(long, value_parser = parse_pos)]
        pos: Option<Pos>,
    },
    /// List synsets with no hierarchy relations at all.
    Isolated,
    /// List the direct children of a synset.
    Children { id: String },
    /// List all transitive descendants of a synset.
    Descendants { id: String },
    /// Print the hyponym tree under a root synset.
    Tree {
        root: String,
        /// Emit the tree as JSON instead of indented text.
        #[arg(long)]
        json: bool,
    },
    /// Group the roots into connected components of overlapping subtrees.
    Components,
}

fn parse_pos(tag: &str) -> Result<Pos, String> {
    tag.parse().map_err(|e: UnknownPosTag| e.to_string())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let (thesaurus, summary) = load_dir(&cli.dir)?;

    match cli.command {
        Commands::Stats => print_stats(&thesaurus, &summary)?,
        Commands::Roots { pos } => print_roots(&thesaurus, pos),
        Commands::Isolated => print_isolated(&thesaurus),
        Commands::Children { id } => {
            for child in thesaurus.children(&id)? {
                println!("{child}");
            }
        }
        Commands::Descendants { id } => {
            for descendant in thesaurus.descendants(&id)? {
                println!("{descendant}");
            }
        }
        Commands::Tree { root, json } => {
            let tree = thesaurus.tree(&root)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tree)?);
            } else {
                print_tree(&tree, 0);
            }
        }
        Commands::Components => print_components(&thesaurus)?,
    }

    Ok(())
}

fn print_stats(thesaurus: &Thesaurus, summary: &LoadSummary) -> Result<()> {
    let components = thesaurus.connected_components()?;

    println!("{}", "thesaurus statistics".bold());
    println!("  senses:               {}", summary.senses);
    println!("  synsets:              {}", summary.synsets);
    println!("  relations applied:    {}", summary.relations_applied);
    println!("  roots:                {}", thesaurus.roots(None).len());
    println!(
        "  isolated synsets:     {}",
        thesaurus.without_relations().len()
    );
    println!("  connected components: {}", components.len());
    for path in &summary.skipped_files {
        println!("  {} {}", "skipped:".yellow(), path.display());
    }
    Ok(())
}

fn print_roots(thesaurus: &Thesaurus, pos: Option<Pos>) {
    for root in thesaurus.roots(pos) {
        println!(
            "{}  {}  {}",
            root.id.cyan(),
            root.part_of_speech,
            root.name
        );
    }
}

fn print_isolated(thesaurus: &Thesaurus) {
    for synset in thesaurus.without_relations() {
        println!(
            "{}  {}  {}",
            synset.id.cyan(),
            synset.part_of_speech,
            synset.name
        );
    }
}

fn print_tree(node: &TreeNode, depth: usize) {
    for (name, subtree) in &node.0 {
        println!("{}{}", "  ".repeat(depth), name);
        print_tree(subtree, depth + 1);
    }
}

fn print_components(thesaurus: &Thesaurus) -> Result<()> {
    let components = thesaurus.connected_components()?;
    println!(
        "{} connected component(s)",
        components.len().to_string().bold()
    );
    for (idx, group) in components.iter().enumerate() {
        let mut names = Vec::with_capacity(group.len());
        for root_id in group {
            names.push(thesaurus.synset(root_id)?.name);
        }
        println!(
            "{} {}",
            format!("[{idx}]").cyan(),
            group
                .iter()
                .zip(names)
                .map(|(id, name)| format!("{id} ({name})"))
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    Ok(())
}
