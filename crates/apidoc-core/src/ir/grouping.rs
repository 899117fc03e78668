use super::types::OperationGroup;

/// Concatenate several transformed documents into one sequence, preserving
/// document order and the order of groups inside each document.
pub fn merge_documents(documents: Vec<Vec<OperationGroup>>) -> Vec<OperationGroup> {
    documents.into_iter().flatten().collect()
}

/// Index of the group named `tag`. The first match wins.
pub(crate) fn find_group(groups: &[OperationGroup], tag: &str) -> Option<usize> {
    groups.iter().position(|g| g.name == tag)
}
