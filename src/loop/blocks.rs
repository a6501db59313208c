//! Markdown → `Block` conversion (spec §4.7). A small line-oriented parser;
//! deliberately hand-rolled rather than pulled from a markdown crate, since
//! the rule set is a handful of line-prefix checks, not full CommonMark.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::domain::Block;

fn block_id(content: &str, ordinal: usize) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    ordinal.hash(&mut hasher);
    format!("blk_{:016x}", hasher.finish())
}

fn is_list_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    if trimmed.starts_with("- ") || trimmed.starts_with("* ") {
        return true;
    }
    match trimmed.find(". ") {
        Some(dot_index) => trimmed[..dot_index].chars().all(|c| c.is_ascii_digit()) && dot_index > 0,
        None => false,
    }
}

fn list_item_text(line: &str) -> String {
    let trimmed = line.trim_start();
    if let Some(rest) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* ")) {
        return rest.to_string();
    }
    if let Some(dot_index) = trimmed.find(". ") {
        if trimmed[..dot_index].chars().all(|c| c.is_ascii_digit()) {
            return trimmed[dot_index + 2..].to_string();
        }
    }
    trimmed.to_string()
}

fn heading_level(line: &str) -> Option<(u8, String)> {
    let trimmed = line.trim_start();
    let hashes = trimmed.chars().take_while(|&c| c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &trimmed[hashes..];
    if !rest.starts_with(' ') {
        return None;
    }
    Some((hashes as u8, rest.trim().to_string()))
}

/// Converts markdown content into a flat, ordered list of `Block`s per the
/// line-classification rules in spec §4.7. Idempotent: re-parsing the
/// blocks' own `text` fields back through this function (after rejoining
/// paragraphs with blank lines) reproduces the same classification.
pub fn parse_blocks(content: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut paragraph_buf: Vec<String> = Vec::new();
    let mut ordinal = 0usize;

    let flush_paragraph = |buf: &mut Vec<String>, blocks: &mut Vec<Block>, ordinal: &mut usize| {
        if buf.is_empty() {
            return;
        }
        let text = buf.join(" ");
        let id = block_id(&text, *ordinal);
        blocks.push(Block::new(id, crate::domain::BlockType::Paragraph, text));
        *ordinal += 1;
        buf.clear();
    };

    for line in content.lines() {
        if line.trim().is_empty() {
            flush_paragraph(&mut paragraph_buf, &mut blocks, &mut ordinal);
            continue;
        }

        if let Some((level, text)) = heading_level(line) {
            flush_paragraph(&mut paragraph_buf, &mut blocks, &mut ordinal);
            let id = block_id(&text, ordinal);
            blocks.push(Block::heading(id, text, level));
            ordinal += 1;
            continue;
        }

        if is_list_line(line) {
            flush_paragraph(&mut paragraph_buf, &mut blocks, &mut ordinal);
            let text = list_item_text(line);
            let id = block_id(&text, ordinal);
            blocks.push(Block::new(id, crate::domain::BlockType::ListItem, text));
            ordinal += 1;
            continue;
        }

        paragraph_buf.push(line.trim().to_string());
    }

    flush_paragraph(&mut paragraph_buf, &mut blocks, &mut ordinal);
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BlockType;

    #[test]
    fn empty_input_yields_empty_list() {
        assert!(parse_blocks("").is_empty());
    }

    #[test]
    fn heading_level_matches_hash_count() {
        let blocks = parse_blocks("## Section Title\n\nBody text.");
        assert_eq!(blocks[0].block_type, BlockType::Heading);
        assert_eq!(blocks[0].metadata["level"], 2);
        assert_eq!(blocks[0].text, "Section Title");
        assert_eq!(blocks[1].block_type, BlockType::Paragraph);
    }

    #[test]
    fn list_lines_become_list_items() {
        let blocks = parse_blocks("- first\n* second\n1. third");
        assert_eq!(blocks.len(), 3);
        assert!(blocks.iter().all(|b| b.block_type == BlockType::ListItem));
        assert_eq!(blocks[0].text, "first");
        assert_eq!(blocks[2].text, "third");
    }

    #[test]
    fn blank_separated_lines_join_into_one_paragraph() {
        let blocks = parse_blocks("line one\nline two\n\nline three");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text, "line one line two");
        assert_eq!(blocks[1].text, "line three");
    }

    #[test]
    fn block_ids_are_deterministic_for_same_content() {
        let a = parse_blocks("# Title");
        let b = parse_blocks("# Title");
        assert_eq!(a[0].id, b[0].id);
    }
}
