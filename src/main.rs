//! CLI entry point for objex

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use objex::output::{DisplayNode, OutputConfig, SortColumn, TreeFormatter, print_json};
use objex::tree::{DEFAULT_ENTRY_MODULE, DEFAULT_MAX_CHILDREN, DEFAULT_MAX_DEPTH};
use objex::{
    CategoryFilter, ExploreConfig, Explorer, demo_namespace, export_paths, load_snapshot_file,
    select_nodes,
};
use tracing_subscriber::prelude::*;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Column to sort siblings by
#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortBy {
    Key,
    Type,
    Category,
    Size,
    Value,
}

impl From<SortBy> for SortColumn {
    fn from(sort: SortBy) -> Self {
        match sort {
            SortBy::Key => SortColumn::Key,
            SortBy::Type => SortColumn::Type,
            SortBy::Category => SortColumn::Category,
            SortBy::Size => SortColumn::Size,
            SortBy::Value => SortColumn::Value,
        }
    }
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "objex")]
#[command(about = "Browse an object graph as a tree of containers, instances and cycles")]
#[command(version)]
struct Args {
    /// JSON snapshot to explore (the built-in demo namespace when omitted)
    snapshot: Option<PathBuf>,

    /// Dotted attribute path of the root object (empty for the globals)
    #[arg(short, long, default_value = "")]
    root: String,

    /// Expand at most N levels below the root
    #[arg(short = 'L', long = "level", default_value_t = DEFAULT_MAX_DEPTH)]
    level: usize,

    /// Show at most N children per node
    #[arg(short = 'n', long = "max-children", default_value_t = DEFAULT_MAX_CHILDREN)]
    max_children: usize,

    /// Hide mappings (dict, Series, DataFrame, ...)
    #[arg(long = "no-mapping")]
    no_mapping: bool,

    /// Hide sequences (list, tuple, arrays, ...)
    #[arg(long = "no-sequence")]
    no_sequence: bool,

    /// Hide instances of classes defined in the entry module
    #[arg(long = "no-owned")]
    no_owned: bool,

    /// Hide instances of library classes
    #[arg(long = "no-library")]
    no_library: bool,

    /// Hide scalars and other leaf values
    #[arg(long = "no-scalar")]
    no_scalar: bool,

    /// List only the root's direct children
    #[arg(long = "collapse")]
    collapse: bool,

    /// Column used to naturally sort siblings
    #[arg(long = "sort", value_name = "COLUMN", default_value = "key", conflicts_with = "no_sort")]
    sort: SortBy,

    /// Keep children in traversal order
    #[arg(long = "no-sort")]
    no_sort: bool,

    /// Output in JSON format
    #[arg(long = "json")]
    json: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Print the access paths of nodes whose key or path matches GLOB
    /// (can be used multiple times)
    #[arg(short = 'c', long = "copy", value_name = "GLOB")]
    copy: Vec<String>,

    /// Module whose classes count as owned code
    #[arg(long = "entry-module", default_value = DEFAULT_ENTRY_MODULE)]
    entry_module: String,

    /// Log traversal details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let namespace = match &args.snapshot {
        Some(path) => match load_snapshot_file(path) {
            Ok(namespace) => namespace,
            Err(e) => {
                eprintln!("objex: {}", e);
                process::exit(1);
            }
        },
        None => demo_namespace(),
    };

    let filter = CategoryFilter {
        mapping: !args.no_mapping,
        sequence: !args.no_sequence,
        owned: !args.no_owned,
        library: !args.no_library,
        scalar: !args.no_scalar,
    };
    let config = ExploreConfig {
        max_depth: args.level,
        max_children_per_node: args.max_children,
        filter,
        auto_expand: !args.collapse,
        entry_module: args.entry_module.clone(),
    };

    let mut explorer = Explorer::new(namespace, config);
    if let Err(e) = explorer.explore(&args.root) {
        eprintln!("objex: {}", e);
        process::exit(1);
    }
    let Some(explored) = explorer.current() else {
        process::exit(1);
    };

    if !args.copy.is_empty() {
        let selected = select_nodes(&explored.root, &args.copy);
        if selected.is_empty() {
            eprintln!("objex: no node matches {}", args.copy.join(", "));
            process::exit(1);
        }
        println!("{}", export_paths(selected));
        return;
    }

    let sort = if args.no_sort {
        None
    } else {
        Some(SortColumn::from(args.sort))
    };
    let display = DisplayNode::from_node(explorer.namespace().heap(), &explored.root, sort);

    let result = if args.json {
        print_json(&display)
    } else {
        let output_config = OutputConfig {
            use_color: should_use_color(args.color),
            sort,
            auto_expand: explorer.config().auto_expand,
        };
        TreeFormatter::new(output_config).print(&display)
    };
    if let Err(e) = result {
        eprintln!("objex: error writing output: {}", e);
        process::exit(1);
    }

    if !explorer.status().is_empty() {
        eprintln!("objex: {}", explorer.status());
    }
}
