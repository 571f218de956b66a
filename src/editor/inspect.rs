use crate::document::{Block, Document, List, NodeId, NodePath};

pub(crate) fn node_text(document: &Document, id: NodeId) -> Option<&str> {
    let path = document.locate(id)?;
    document.text(&path)
}

/// Every content-bearing node in reading order.
pub(crate) fn content_nodes(document: &Document) -> Vec<NodeId> {
    let mut result = Vec::new();
    for block in &document.blocks {
        match block {
            Block::Paragraph(paragraph) => result.push(paragraph.id()),
            Block::List(list) => collect_list_nodes(list, &mut result),
        }
    }
    result
}

fn collect_list_nodes(list: &List, result: &mut Vec<NodeId>) {
    for item in &list.items {
        result.push(item.id());
        if let Some(sublist) = &item.sublist {
            collect_list_nodes(sublist, result);
        }
    }
}

/// Labels describing where `id` sits, outermost first.
pub fn breadcrumbs_for_node(document: &Document, id: NodeId) -> Option<Vec<String>> {
    match document.locate(id)? {
        NodePath::Paragraph(_) => Some(vec!["Paragraph".to_string()]),
        NodePath::Item(path) => {
            let index = path.index();
            let mut labels = vec!["List".to_string()];
            labels.extend(
                path.list()
                    .steps()
                    .iter()
                    .chain(std::iter::once(&index))
                    .map(|idx| format!("Item {}", idx + 1)),
            );
            Some(labels)
        }
    }
}
