//! Newick serialization of lineage trees.

use crate::compute::tree::{LineageTree, NodeId};
use crate::error::Result;
use std::io::Write;
use std::path::Path;

/// Characters that force a label into single quotes.
const QUOTE_TRIGGERS: &[char] = &['(', ')', '[', ']', '\'', ':', ';', ',', '_'];

fn write_label<W: Write>(writer: &mut W, label: &str) -> Result<()> {
    if label.chars().any(|c| c.is_whitespace() || QUOTE_TRIGGERS.contains(&c)) {
        write!(writer, "'{}'", label.replace('\'', "''"))?;
    } else {
        write!(writer, "{}", label)?;
    }
    Ok(())
}

fn write_node<W: Write>(tree: &LineageTree, id: NodeId, writer: &mut W) -> Result<()> {
    let Some(node) = tree.node(id) else {
        return Ok(());
    };

    if !node.children.is_empty() {
        write!(writer, "(")?;
        for (i, &child) in node.children.iter().enumerate() {
            if i > 0 {
                write!(writer, ",")?;
            }
            write_node(tree, child, writer)?;
        }
        write!(writer, ")")?;
    }
    if let Some(label) = node.label.as_deref() {
        write_label(writer, label)?;
    }
    if let Some(length) = node.length {
        write!(writer, ":{:?}", length)?;
    }
    Ok(())
}

/// Write `tree` in Newick format followed by a newline.
pub fn write_newick<W: Write>(tree: &LineageTree, writer: &mut W) -> Result<()> {
    write_node(tree, tree.root(), writer)?;
    writeln!(writer, ";")?;
    Ok(())
}

/// Render `tree` as a single Newick line, without the trailing newline.
///
/// # Examples
///
/// ```
/// use quadlineage::compute::tree::LineageTree;
/// use quadlineage::io::to_newick;
/// use quadlineage_types::lineage::LineagePath;
///
/// let a = LineagePath::parse("1.").unwrap();
/// let b = LineagePath::parse("2.").unwrap();
/// let mut tree = LineageTree::from_lineages([("a", &a), ("b", &b)]);
/// assert_eq!(to_newick(&tree)?, "((a)1,(b)2);");
///
/// tree.assign_default_lengths(1.0);
/// assert_eq!(to_newick(&tree)?, "((a:1.0)1:1.0,(b:1.0)2:1.0):1.0;");
/// # Ok::<(), quadlineage::LineageError>(())
/// ```
pub fn to_newick(tree: &LineageTree) -> Result<String> {
    let mut buf = Vec::new();
    write_newick(tree, &mut buf)?;
    let mut text = String::from_utf8_lossy(&buf).into_owned();
    text.truncate(text.trim_end().len());
    Ok(text)
}

/// Write `tree` to a Newick file.
pub fn write_newick_file<P: AsRef<Path>>(tree: &LineageTree, path: P) -> Result<()> {
    super::with_file_writer(path, |w| write_newick(tree, w))
}
