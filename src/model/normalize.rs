//! 规范化：把外部来源的（可能残缺的）树补全为结构完整的节点树
//!
//! 这是唯一的信任边界，树操作假定输入已经过这里。

use std::fmt;

use serde_json::Value;
use uuid::Uuid;

use crate::model::node::{Node, NodeId, RawNode};

/// 节点ID来源；测试中可替换为确定性的实现
pub trait IdGenerator: fmt::Debug {
    fn next_id(&mut self) -> NodeId;
}

/// 随机 UUID v4
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> NodeId {
        NodeId::new(Uuid::new_v4().to_string())
    }
}

/// 递增序号：`<prefix>-1`、`<prefix>-2` ...
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), next: 1 }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> NodeId {
        let id = NodeId::new(format!("{}-{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

/// 递归补全：缺失/空ID生成新ID，缺失类型为 Root，缺失配置为空，缺失子节点为空序列
pub fn normalize(raw: RawNode, ids: &mut dyn IdGenerator) -> Node {
    let id = match raw.id {
        Some(id) if !id.is_empty() => NodeId::new(id),
        _ => ids.next_id(),
    };
    let children = raw
        .children
        .unwrap_or_default()
        .into_iter()
        .map(|child| normalize(child, ids))
        .collect();

    Node {
        id,
        kind: raw.kind.unwrap_or_default(),
        config: raw.config.unwrap_or_default(),
        children,
    }
}

/// 从任意 JSON 值规范化；形态不符（如未知节点类型）时返回解析错误
pub fn normalize_value(value: Value, ids: &mut dyn IdGenerator) -> Result<Node, serde_json::Error> {
    let raw: RawNode = serde_json::from_value(value)?;
    Ok(normalize(raw, ids))
}

/// 导出前的防御性再规范化：只补齐空ID，其余原样复制
pub fn renormalize(node: &Node, ids: &mut dyn IdGenerator) -> Node {
    let id = if node.id.is_empty() { ids.next_id() } else { node.id.clone() };
    Node {
        id,
        kind: node.kind,
        config: node.config.clone(),
        children: node.children.iter().map(|child| renormalize(child, ids)).collect(),
    }
}
