//! Markdown checklist to content block conversion.

use taskscribe_types::page::ContentBlock;

/// Prefix marking an unchecked checklist item.
pub const CHECKLIST_MARKER: &str = "- [ ]";

/// Convert a `- [ ]` checklist into unchecked to-do blocks, in source order.
///
/// Lines that are blank, that do not start with the marker once leading
/// whitespace is ignored, or that carry no text after it are skipped.
/// Indentation is not preserved: sub-tasks come out at the same level as their
/// parents because the page-create call cannot carry nested children.
// TODO: emit indented items as children of the preceding task once pages are
// created with a follow-up append-children call.
pub fn parse_tasks_to_blocks(markdown: &str) -> Vec<ContentBlock> {
    markdown
        .lines()
        .filter_map(|line| {
            line.trim()
                .strip_prefix(CHECKLIST_MARKER)
                .map(str::trim)
                .filter(|text| !text.is_empty())
        })
        .map(ContentBlock::todo)
        .collect()
}
