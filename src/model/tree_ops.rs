//! 树操作：按节点ID添加、删除、编辑、查找
//!
//! 所有操作都是纯函数：输入树不变，返回新树。目标不存在时返回原树的副本。
//! 遍历顺序为深度优先先序，子节点按现有顺序访问；ID 重复时只作用于先序中的第一个。

use crate::model::node::{Node, NodeId, NodePatch};

/// 把 `child` 追加到 `parent_id` 节点的子节点末尾
pub fn add_child(tree: &Node, parent_id: &NodeId, child: Node) -> Node {
    let rewritten = rewrite_first(tree, parent_id, move |parent| {
        let mut children = parent.children.clone();
        children.push(child);
        parent.shallow_with(children)
    });
    rewritten.unwrap_or_else(|_| {
        tracing::debug!("添加子节点：未找到父节点 {}", parent_id);
        tree.clone()
    })
}

/// 删除节点；目标为根时只清空根的子节点，根本身保留
pub fn remove_node(tree: &Node, node_id: &NodeId) -> Node {
    if tree.id == *node_id {
        return tree.shallow_with(Vec::new());
    }
    remove_first(tree, node_id).unwrap_or_else(|| {
        tracing::debug!("删除节点：未找到 {}", node_id);
        tree.clone()
    })
}

/// 把 `patch` 中提供的字段合并到目标节点
pub fn edit_node(tree: &Node, node_id: &NodeId, patch: &NodePatch) -> Node {
    rewrite_first(tree, node_id, |target| patch.apply(target)).unwrap_or_else(|_| {
        tracing::debug!("编辑节点：未找到 {}", node_id);
        tree.clone()
    })
}

/// 先序查找第一个匹配的节点
pub fn find_node<'a>(tree: &'a Node, node_id: &NodeId) -> Option<&'a Node> {
    if tree.id == *node_id {
        return Some(tree);
    }
    tree.children.iter().find_map(|child| find_node(child, node_id))
}

/// 找到第一个匹配节点并用 `f` 替换，沿途复制祖先；未命中时把 `f` 交还调用方
fn rewrite_first<F>(node: &Node, id: &NodeId, f: F) -> Result<Node, F>
where
    F: FnOnce(&Node) -> Node,
{
    if node.id == *id {
        return Ok(f(node));
    }
    let mut f = f;
    for (idx, child) in node.children.iter().enumerate() {
        match rewrite_first(child, id, f) {
            Ok(updated) => return Ok(replace_child(node, idx, updated)),
            Err(unused) => f = unused,
        }
    }
    Err(f)
}

fn remove_first(node: &Node, id: &NodeId) -> Option<Node> {
    for (idx, child) in node.children.iter().enumerate() {
        if child.id == *id {
            let mut children = node.children.clone();
            children.remove(idx);
            return Some(node.shallow_with(children));
        }
        if let Some(updated) = remove_first(child, id) {
            return Some(replace_child(node, idx, updated));
        }
    }
    None
}

fn replace_child(node: &Node, idx: usize, updated: Node) -> Node {
    let mut children = Vec::with_capacity(node.children.len());
    children.extend_from_slice(&node.children[..idx]);
    children.push(updated);
    children.extend_from_slice(&node.children[idx + 1..]);
    node.shallow_with(children)
}
