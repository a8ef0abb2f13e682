//! 大纲（Outline）：把节点树压平为带深度的行，供编辑面板缩进展示

use crate::model::config::{ConfigKey, ConfigValue};
use crate::model::node::{Node, NodeId, NodeKind};

const PREVIEW_MAX_CHARS: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub struct OutlineRow {
    /// 节点ID（用于回传给树操作）
    pub id: NodeId,
    pub kind: NodeKind,
    /// 类型的显示名，如 "Row Node"
    pub label: &'static str,
    /// 节点深度（用于UI缩进显示）
    pub depth: usize,
    /// 直接子节点数量
    pub children: usize,
    /// 配置的简短预览
    pub preview: String,
}

/// 深度优先先序压平整棵树，根节点深度为 0
pub fn build_outline(root: &Node) -> Vec<OutlineRow> {
    let mut out = Vec::with_capacity(root.count());
    fn walk(out: &mut Vec<OutlineRow>, node: &Node, depth: usize) {
        out.push(OutlineRow {
            id: node.id.clone(),
            kind: node.kind,
            label: node.kind.label(),
            depth,
            children: node.children.len(),
            preview: preview_of(node),
        });
        for child in &node.children {
            walk(out, child, depth + 1);
        }
    }
    walk(&mut out, root, 0);
    out
}

fn preview_of(node: &Node) -> String {
    let mut parts: Vec<String> = ConfigKey::ALL
        .iter()
        .filter_map(|key| node.config.get(*key).map(|v| format!("{}={}", key, display_value(&v))))
        .collect();
    parts.extend(node.config.extra.keys().map(|k| format!("{}=..", k)));

    let joined = parts.join(", ");
    if joined.chars().count() > PREVIEW_MAX_CHARS {
        let truncated: String = joined.chars().take(PREVIEW_MAX_CHARS).collect();
        format!("{}...", truncated)
    } else {
        joined
    }
}

fn display_value(value: &ConfigValue) -> String {
    match value {
        ConfigValue::Number(n) => n.to_string(),
        ConfigValue::Bool(b) => b.to_string(),
        ConfigValue::Text(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::{Align, Colour, UiConfig};
    use serde_json::json;

    #[test]
    fn test_outline_order_and_depth() {
        let tree = Node::with_id("root", NodeKind::Root)
            .with_child(
                Node::with_id("row", NodeKind::Row)
                    .with_child(Node::with_id("a", NodeKind::Box))
                    .with_child(Node::with_id("b", NodeKind::Text)),
            )
            .with_child(Node::with_id("col", NodeKind::Column));

        let rows = build_outline(&tree);

        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["root", "row", "a", "b", "col"]);

        let depths: Vec<usize> = rows.iter().map(|r| r.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 2, 1]);

        assert_eq!(rows[0].children, tree.children.len());
        assert_eq!(rows[1].children, 2);
        assert_eq!(rows[1].label, "Row Node");
        assert_eq!(rows[4].kind, NodeKind::Column);
    }

    #[test]
    fn test_outline_preview() {
        let config = UiConfig {
            align: Some(Align::CenterMiddle),
            colour: Some(Colour::new("G.C.RED")),
            ..Default::default()
        };
        let tree = Node::with_id("root", NodeKind::Root).with_config(config);
        let rows = build_outline(&tree);
        assert_eq!(rows[0].preview, "align=cm, colour=G.C.RED");

        let mut long = UiConfig::default();
        long.text = Some("一段非常非常长的文本内容，用来检查预览是否被截断显示".into());
        long.extra.insert("tooltip".into(), json!({"title": "x"}));
        let rows = build_outline(&Node::with_id("t", NodeKind::Text).with_config(long));
        assert!(rows[0].preview.ends_with("..."));

        let rows = build_outline(&Node::with_id("e", NodeKind::Box));
        assert_eq!(rows[0].preview, "");
    }
}
