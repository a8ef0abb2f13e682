//! 节点模型：UI 树的节点实体与导入时的宽松形态

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::model::config::UiConfig;
use crate::model::normalize::IdGenerator;

/// 节点身份标识，树内唯一，创建后不可变
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// 节点类型（封闭枚举），决定布局语义
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    #[default]
    #[serde(rename = "G.UIT.ROOT")]
    Root,
    #[serde(rename = "G.UIT.R")]
    Row,
    #[serde(rename = "G.UIT.C")]
    Column,
    #[serde(rename = "G.UIT.B")]
    Box,
    #[serde(rename = "G.UIT.T")]
    Text,
}

impl NodeKind {
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Root,
        NodeKind::Row,
        NodeKind::Column,
        NodeKind::Box,
        NodeKind::Text,
    ];

    /// 游戏框架中的类型标签，JSON 与脚本导出共用
    pub fn tag(self) -> &'static str {
        match self {
            NodeKind::Root => "G.UIT.ROOT",
            NodeKind::Row => "G.UIT.R",
            NodeKind::Column => "G.UIT.C",
            NodeKind::Box => "G.UIT.B",
            NodeKind::Text => "G.UIT.T",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }

    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Root => "Root Node",
            NodeKind::Row => "Row Node",
            NodeKind::Column => "Column Node",
            NodeKind::Box => "Box Node",
            NodeKind::Text => "Text Node",
        }
    }

    /// 叶子类型通常不带子节点
    pub fn is_leaf(self) -> bool {
        matches!(self, NodeKind::Box | NodeKind::Text)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// 规范化后的节点；字段顺序即 JSON 导出顺序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "n")]
    pub kind: NodeKind,
    #[serde(default)]
    pub config: UiConfig,
    #[serde(rename = "nodes", default)]
    pub children: Vec<Node>,
}

impl Node {
    /// 新建节点：分配新ID，配置与子节点为空
    pub fn new(kind: NodeKind, ids: &mut dyn IdGenerator) -> Self {
        Self::with_id(ids.next_id(), kind)
    }

    pub fn with_id(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            config: UiConfig::default(),
            children: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: UiConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// 子树中的节点总数（含自身）
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }

    /// 仅复制自身字段，子节点另行提供
    pub(crate) fn shallow_with(&self, children: Vec<Node>) -> Self {
        Self {
            id: self.id.clone(),
            kind: self.kind,
            config: self.config.clone(),
            children,
        }
    }
}

/// 编辑节点时提交的部分字段；节点身份不可修改
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub kind: Option<NodeKind>,
    pub config: Option<UiConfig>,
}

impl NodePatch {
    pub fn kind(kind: NodeKind) -> Self {
        Self { kind: Some(kind), config: None }
    }

    pub fn config(config: UiConfig) -> Self {
        Self { kind: None, config: Some(config) }
    }

    /// 只覆盖提供了的字段
    pub fn apply(&self, node: &Node) -> Node {
        let mut updated = node.clone();
        if let Some(kind) = self.kind {
            updated.kind = kind;
        }
        if let Some(config) = &self.config {
            updated.config = config.clone();
        }
        updated
    }
}

/// 外部来源（文件导入）的节点形态，所有字段都可能缺失
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    #[serde(default, deserialize_with = "id_or_none")]
    pub id: Option<String>,
    #[serde(rename = "n", default, deserialize_with = "kind_or_none")]
    pub kind: Option<NodeKind>,
    #[serde(default)]
    pub config: Option<UiConfig>,
    #[serde(rename = "nodes", default)]
    pub children: Option<Vec<RawNode>>,
}

/// 数字ID取其文本形式，其它非字符串值视同缺失
fn id_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(id)) => Some(id),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// 空字符串视同缺失；未知标签视为格式错误
fn kind_or_none<'de, D>(deserializer: D) -> Result<Option<NodeKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let tag: Option<String> = Option::deserialize(deserializer)?;
    match tag.as_deref() {
        None | Some("") => Ok(None),
        Some(tag) => NodeKind::from_tag(tag)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("未知节点类型: {}", tag))),
    }
}

impl From<&Node> for RawNode {
    fn from(node: &Node) -> Self {
        Self {
            id: Some(node.id.as_str().to_string()),
            kind: Some(node.kind),
            config: Some(node.config.clone()),
            children: Some(node.children.iter().map(RawNode::from).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::normalize::SequentialIds;
    use serde_json::json;

    #[test]
    fn test_new_node_is_empty_with_fresh_id() {
        let mut ids = SequentialIds::new("n");
        let a = Node::new(NodeKind::Row, &mut ids);
        let b = Node::new(NodeKind::Row, &mut ids);

        assert_ne!(a.id, b.id);
        assert!(a.config.is_empty());
        assert!(a.children.is_empty());
    }

    #[test]
    fn test_node_wire_format() {
        let node = Node::with_id("root", NodeKind::Root).with_child(Node::with_id("t", NodeKind::Text));
        let value = serde_json::to_value(&node).unwrap();

        assert_eq!(
            value,
            json!({
                "id": "root",
                "n": "G.UIT.ROOT",
                "config": {},
                "nodes": [{"id": "t", "n": "G.UIT.T", "config": {}, "nodes": []}]
            })
        );
    }

    #[test]
    fn test_kind_tags_and_labels() {
        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(NodeKind::Column.label(), "Column Node");
        assert!(NodeKind::Box.is_leaf());
        assert!(!NodeKind::Row.is_leaf());
    }

    #[test]
    fn test_raw_node_tolerates_missing_fields() {
        let raw: RawNode = serde_json::from_value(json!({"nodes": [{"n": ""}]})).unwrap();
        assert_eq!(raw.id, None);
        assert_eq!(raw.kind, None);
        assert_eq!(raw.config, None);

        let children = raw.children.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].kind, None, "空类型标签应视为缺失");
    }

    #[test]
    fn test_raw_node_accepts_non_string_id() {
        let raw: RawNode = serde_json::from_value(json!({"id": 7})).unwrap();
        assert_eq!(raw.id.as_deref(), Some("7"));

        let raw: RawNode = serde_json::from_value(json!({"id": {"nested": true}})).unwrap();
        assert_eq!(raw.id, None, "无法作为ID的值视同缺失");
    }

    #[test]
    fn test_raw_node_rejects_unknown_kind() {
        let result = serde_json::from_value::<RawNode>(json!({"n": "G.UIT.X"}));
        assert!(result.is_err(), "未知节点类型应该解析失败");
        assert!(result.unwrap_err().to_string().contains("G.UIT.X"));
    }

    #[test]
    fn test_patch_only_overrides_supplied_fields() {
        let mut config = UiConfig::default();
        config.text = Some("Hi".into());
        let node = Node::with_id("x", NodeKind::Box).with_config(config.clone());

        let retyped = NodePatch::kind(NodeKind::Text).apply(&node);
        assert_eq!(retyped.kind, NodeKind::Text);
        assert_eq!(retyped.config, config);

        let reconfigured = NodePatch::config(UiConfig::default()).apply(&node);
        assert_eq!(reconfigured.kind, NodeKind::Box);
        assert!(reconfigured.config.is_empty());
        assert_eq!(reconfigured.id, node.id);
    }
}
