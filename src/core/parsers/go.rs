use anyhow::{Result, anyhow, bail};
use tree_sitter::{Node, Parser, Tree};

/// A Go source file with its syntax tree.
///
/// The tree borrows nothing, so a `ParsedGoFile` can be shared across the
/// rayon workers that run the per-file passes.
pub struct ParsedGoFile {
    pub file_path: String,
    pub source: String,
    pub tree: Tree,
    /// Name from the `package` clause.
    pub package_name: String,
    /// Byte offset of the start of every line.
    line_starts: Vec<usize>,
}

impl ParsedGoFile {
    /// 1-based line and column (in characters) for a byte offset.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line_index = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let line_start = self.line_starts[line_index];
        let col = self
            .source
            .get(line_start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(offset - line_start);
        (line_index + 1, col + 1)
    }

    /// Content of a 1-based line, without the trailing newline.
    pub fn source_line(&self, line: usize) -> &str {
        let Some(&start) = self.line_starts.get(line.wrapping_sub(1)) else {
            return "";
        };
        let end = self
            .line_starts
            .get(line)
            .copied()
            .unwrap_or(self.source.len());
        self.source[start..end].trim_end_matches(['\n', '\r'])
    }

    /// Source text covered by a node.
    pub fn text(&self, node: Node) -> &str {
        node_text(node, self.source.as_bytes())
    }
}

/// Text of a node, or an empty string if it is not valid UTF-8.
pub fn node_text<'a>(node: Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

/// Parse Go source code into a syntax tree.
///
/// tree-sitter recovers from syntax errors, but a tree with error nodes
/// cannot be type-resolved reliably, so such files are rejected with the
/// position of the first error.
pub fn parse_go_source(code: String, file_path: &str) -> Result<ParsedGoFile> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|e| anyhow!("Failed to load Go grammar: {}", e))?;

    let tree = parser
        .parse(&code, None)
        .ok_or_else(|| anyhow!("Failed to parse go source: parser returned no tree"))?;

    let root = tree.root_node();
    if root.has_error() {
        let position = first_error(root)
            .map(|n| n.start_position())
            .unwrap_or_else(|| root.start_position());
        bail!(
            "Syntax error at {}:{}",
            position.row + 1,
            position.column + 1
        );
    }

    let package_name = {
        let mut cursor = root.walk();
        root.named_children(&mut cursor)
            .find(|n| n.kind() == "package_clause")
            .and_then(|clause| clause.named_child(0))
            .map(|name| node_text(name, code.as_bytes()).to_string())
            .ok_or_else(|| anyhow!("Missing package clause"))?
    };

    let line_starts = std::iter::once(0)
        .chain(code.match_indices('\n').map(|(i, _)| i + 1))
        .collect();

    Ok(ParsedGoFile {
        file_path: file_path.to_string(),
        source: code,
        tree,
        package_name,
        line_starts,
    })
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            if let Some(found) = first_error(child) {
                return Some(found);
            }
        }
    }
    None
}
