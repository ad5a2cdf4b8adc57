//! Tree formatter for console output
//!
//! `TreeFormatter` renders a [`DisplayNode`] tree one row per node, using
//! the usual `├──`/`└──` connectors. Multi-line previews continue below
//! their row, indented under the node.

use std::io;

use termcolor::{Color, ColorChoice, ColorSpec, NoColor, StandardStream, WriteColor};

use crate::tree::{Category, display_path};

use super::config::OutputConfig;
use super::display::DisplayNode;

pub const CIRCULAR_MARKER: &str = "(circular)";

/// Formatter for explored trees.
pub struct TreeFormatter {
    config: OutputConfig,
}

#[derive(Debug, Default)]
struct Counts {
    shown: usize,
    circular: usize,
    hidden: usize,
}

impl Counts {
    fn summary(&self) -> String {
        let mut line = format!("{} nodes, {} circular", self.shown, self.circular);
        if self.hidden > 0 {
            line.push_str(&format!(", {} hidden", self.hidden));
        }
        line
    }
}

impl TreeFormatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn format(&self, root: &DisplayNode) -> String {
        let mut out = NoColor::new(Vec::new());
        // Writing into a Vec cannot fail.
        if self.write_tree(root, &mut out).is_err() {
            return String::new();
        }
        String::from_utf8_lossy(&out.into_inner()).into_owned()
    }

    pub fn print(&self, root: &DisplayNode) -> io::Result<()> {
        let choice = if self.config.use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stdout = StandardStream::stdout(choice);
        self.write_tree(root, &mut stdout)
    }

    fn write_tree<W: WriteColor>(&self, root: &DisplayNode, out: &mut W) -> io::Result<()> {
        self.write_row(out, root, display_path(&root.row.path), false)?;
        let cont = if root.children.is_empty() { "" } else { "│   " };
        self.write_preview_tail(out, root, cont)?;

        let mut counts = Counts::default();
        self.write_children(out, root, "", &mut counts)?;

        writeln!(out)?;
        writeln!(out, "{}", counts.summary())?;
        Ok(())
    }

    fn write_children<W: WriteColor>(
        &self,
        out: &mut W,
        node: &DisplayNode,
        prefix: &str,
        counts: &mut Counts,
    ) -> io::Result<()> {
        for (i, child) in node.children.iter().enumerate() {
            let is_last = i == node.children.len() - 1;
            let connector = if is_last { "└── " } else { "├── " };
            let child_prefix = if is_last {
                format!("{}    ", prefix)
            } else {
                format!("{}│   ", prefix)
            };
            let collapsed = !self.config.auto_expand && !child.children.is_empty();

            write!(out, "{}{}", prefix, connector)?;
            self.write_row(out, child, &child.row.key, collapsed)?;

            counts.shown += 1;
            if child.cyclic {
                counts.circular += 1;
            }

            let shows_children = !collapsed && !child.children.is_empty();
            let cont = if shows_children {
                format!("{}│   ", child_prefix)
            } else {
                format!("{}    ", child_prefix)
            };
            self.write_preview_tail(out, child, &cont)?;

            if shows_children {
                self.write_children(out, child, &child_prefix, counts)?;
            } else if !child.children.is_empty() {
                counts.hidden += child.count() - 1;
            }
        }
        Ok(())
    }

    /// Writes `name: type [category] size=N  preview`, with only the
    /// preview's first line, and a hidden-children marker in collapsed mode.
    fn write_row<W: WriteColor>(
        &self,
        out: &mut W,
        node: &DisplayNode,
        name: &str,
        collapsed: bool,
    ) -> io::Result<()> {
        let row = &node.row;
        if node.cyclic {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        } else {
            out.set_color(&category_color(row.category))?;
        }
        write!(out, "{}", name)?;
        out.reset()?;

        write!(out, ": ")?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        write!(out, "{}", row.type_name)?;
        out.reset()?;

        out.set_color(ColorSpec::new().set_dimmed(true))?;
        write!(out, " [{}]", row.category)?;
        out.reset()?;

        if row.size != "none" {
            write!(out, " size={}", row.size)?;
        }

        let first = row.preview.lines().next().unwrap_or("");
        if !first.is_empty() {
            write!(out, "  {}", first)?;
        }

        if node.cyclic {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
            write!(out, " {}", CIRCULAR_MARKER)?;
            out.reset()?;
        }
        if collapsed {
            out.set_color(ColorSpec::new().set_dimmed(true))?;
            write!(out, " (+{})", node.children.len())?;
            out.reset()?;
        }
        writeln!(out)?;
        Ok(())
    }

    fn write_preview_tail<W: WriteColor>(
        &self,
        out: &mut W,
        node: &DisplayNode,
        cont_prefix: &str,
    ) -> io::Result<()> {
        for line in node.row.preview.lines().skip(1) {
            writeln!(out, "{}  {}", cont_prefix, line)?;
        }
        Ok(())
    }
}

fn category_color(category: Category) -> ColorSpec {
    let mut spec = ColorSpec::new();
    match category {
        Category::Mapping | Category::Sequence => {
            spec.set_fg(Some(Color::Blue)).set_bold(true);
        }
        Category::InstanceOwned => {
            spec.set_fg(Some(Color::Green)).set_bold(true);
        }
        Category::InstanceLibrary => {
            spec.set_fg(Some(Color::Magenta));
        }
        Category::ScalarLike => {
            spec.set_fg(Some(Color::White));
        }
    }
    spec
}
