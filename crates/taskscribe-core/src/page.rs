//! Summary page assembly and submission.

use taskscribe_types::page::{ContentBlock, CreatedPage, HeadingLevel, NewPage, WorkspaceError};
use taskscribe_types::task::TaskListOutput;

use crate::markdown::parse_tasks_to_blocks;
use crate::workspace::Workspace;

/// Heading above the summary paragraph.
pub const SUMMARY_HEADING: &str = "Summary";

/// Heading above the task checklist.
pub const TASKS_HEADING: &str = "Tasks";

/// Block layout of a summary page: summary heading and paragraph, then the
/// tasks heading followed by one to-do per checklist line.
pub fn build_page_blocks(output: &TaskListOutput) -> Vec<ContentBlock> {
    let mut blocks = vec![
        ContentBlock::heading(HeadingLevel::H2, SUMMARY_HEADING),
        ContentBlock::paragraph(output.summary.clone()),
        ContentBlock::heading(HeadingLevel::H3, TASKS_HEADING),
    ];
    blocks.extend(parse_tasks_to_blocks(&output.tasks));
    blocks
}

/// Build the page for `output` under `parent_page_id` without submitting it.
pub fn build_task_page(parent_page_id: &str, output: &TaskListOutput) -> NewPage {
    NewPage {
        parent_page_id: parent_page_id.to_string(),
        title: output.page_title.clone(),
        children: build_page_blocks(output),
    }
}

/// Create the summary page. Failures propagate untouched.
pub async fn create_task_page<W: Workspace>(
    workspace: &W,
    parent_page_id: &str,
    output: &TaskListOutput,
) -> Result<CreatedPage, WorkspaceError> {
    let page = build_task_page(parent_page_id, output);
    tracing::debug!(
        parent = %parent_page_id,
        title = %page.title,
        blocks = page.children.len(),
        "creating summary page"
    );
    workspace.create_page(&page).await
}
