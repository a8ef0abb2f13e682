//! 性能基准测试模块
//!
//! 用于测试大树的规范化、树操作和两种导出的耗时

use std::time::Instant;

use serde_json::{json, Value};

use crate::export::json::{from_json_str, to_json};
use crate::export::script::to_script_literal;
use crate::model::config::{Colour, UiConfig};
use crate::model::node::{Node, NodeKind, NodePatch};
use crate::model::normalize::{normalize_value, IdGenerator, SequentialIds};
use crate::model::settings::ExportSettings;
use crate::model::tree_ops::{add_child, edit_node, find_node, remove_node};

/// 性能测试结果
#[derive(Debug)]
pub struct PerformanceResult {
    pub operation: String,
    pub duration_ms: u128,
    pub success: bool,
    pub details: String,
}

impl PerformanceResult {
    pub fn new(operation: &str, duration_ms: u128, success: bool, details: &str) -> Self {
        Self {
            operation: operation.to_string(),
            duration_ms,
            success,
            details: details.to_string(),
        }
    }
}

/// 生成不带ID的原始树（模拟外部导入），行列交替，叶子为文本/盒子
pub fn generate_raw_tree(depth: usize, width: usize) -> Value {
    fn create_level(current_depth: usize, max_depth: usize, width: usize) -> Value {
        if current_depth >= max_depth {
            return json!({"n": "G.UIT.T", "config": {"text": "叶子节点", "scale": 0.4}});
        }
        let kind = if current_depth % 2 == 0 { "G.UIT.R" } else { "G.UIT.C" };
        let children: Vec<Value> = (0..width)
            .map(|i| match i % 3 {
                0 => json!({"n": "G.UIT.B", "config": {"w": 1, "h": 1, "colour": "G.C.BLUE"}}),
                _ => create_level(current_depth + 1, max_depth, width),
            })
            .collect();
        json!({"n": kind, "config": {"padding": 0.05, "align": "cm"}, "nodes": children})
    }

    json!({
        "n": "G.UIT.ROOT",
        "config": {"r": 0.1, "minw": 8, "colour": "G.C.BLACK"},
        "nodes": [create_level(0, depth, width)]
    })
}

/// 生成规范化后的大树
pub fn generate_large_tree(depth: usize, width: usize, ids: &mut dyn IdGenerator) -> Result<Node, serde_json::Error> {
    normalize_value(generate_raw_tree(depth, width), ids)
}

/// 测试规范化性能
pub fn benchmark_normalize(raw: &Value, ids: &mut dyn IdGenerator) -> PerformanceResult {
    let start = Instant::now();
    let result = normalize_value(raw.clone(), ids);
    let duration = start.elapsed();

    match result {
        Ok(tree) => PerformanceResult::new("规范化", duration.as_millis(), true, &format!("规范化了 {} 个节点", tree.count())),
        Err(e) => PerformanceResult::new("规范化", duration.as_millis(), false, &format!("规范化失败: {}", e)),
    }
}

/// 测试JSON导出与回读性能
pub fn benchmark_json_round_trip(tree: &Node, ids: &mut dyn IdGenerator) -> PerformanceResult {
    let start = Instant::now();
    let result = to_json(tree, ids, &ExportSettings::default()).and_then(|export| from_json_str(&export.content, ids));
    let duration = start.elapsed();

    match result {
        Ok(back) => PerformanceResult::new(
            "JSON往返",
            duration.as_millis(),
            back == *tree,
            &format!("往返了 {} 个节点", back.count()),
        ),
        Err(e) => PerformanceResult::new("JSON往返", duration.as_millis(), false, &format!("往返失败: {}", e)),
    }
}

/// 测试脚本导出性能
pub fn benchmark_script_export(tree: &Node, ids: &mut dyn IdGenerator) -> PerformanceResult {
    let start = Instant::now();
    let script = to_script_literal(tree, ids, &ExportSettings::default());
    let duration = start.elapsed();

    PerformanceResult::new(
        "脚本导出",
        duration.as_millis(),
        script.ends_with("\nend"),
        &format!("生成了 {} 字符", script.len()),
    )
}

/// 测试对最深处节点的查找、编辑、添加、删除
pub fn benchmark_mutations(tree: &Node, ids: &mut dyn IdGenerator) -> Vec<PerformanceResult> {
    let mut results = Vec::new();
    let target = deepest_last(tree).id.clone();

    let start = Instant::now();
    let found = find_node(tree, &target).is_some();
    results.push(PerformanceResult::new("查找", start.elapsed().as_millis(), found, &format!("目标: {}", target)));

    let patch = NodePatch::config(UiConfig { colour: Some(Colour::new("G.C.RED")), ..Default::default() });
    let start = Instant::now();
    let edited = edit_node(tree, &target, &patch);
    let ok = find_node(&edited, &target).is_some_and(|n| n.config.colour.is_some());
    results.push(PerformanceResult::new("编辑", start.elapsed().as_millis(), ok, "替换配置"));

    let child = Node::new(NodeKind::Box, ids);
    let child_id = child.id.clone();
    let start = Instant::now();
    let added = add_child(tree, &target, child);
    let ok = find_node(&added, &child_id).is_some();
    results.push(PerformanceResult::new("添加", start.elapsed().as_millis(), ok, "追加盒子节点"));

    let start = Instant::now();
    let removed = remove_node(&added, &child_id);
    let ok = removed.count() == tree.count();
    results.push(PerformanceResult::new("删除", start.elapsed().as_millis(), ok, "删除刚添加的节点"));

    results
}

fn deepest_last(node: &Node) -> &Node {
    node.children.last().map_or(node, deepest_last)
}

/// 运行综合性能测试
pub fn run_performance_suite() -> Vec<PerformanceResult> {
    let mut results = Vec::new();
    let mut ids = SequentialIds::new("bench");

    // 测试不同规模的数据
    let test_cases = [
        (3, 6),  // 小型
        (4, 8),  // 中型
        (5, 10), // 大型
    ];

    for (depth, width) in test_cases {
        tracing::info!("测试规模：深度{}，宽度{}", depth, width);

        let raw = generate_raw_tree(depth, width);
        results.push(benchmark_normalize(&raw, &mut ids));

        let tree = match generate_large_tree(depth, width, &mut ids) {
            Ok(tree) => tree,
            Err(e) => {
                tracing::error!("生成测试树失败: {}", e);
                continue;
            }
        };
        results.push(benchmark_json_round_trip(&tree, &mut ids));
        results.push(benchmark_script_export(&tree, &mut ids));
        results.extend(benchmark_mutations(&tree, &mut ids));
    }

    for r in &results {
        tracing::info!("{}: {}ms ({}) {}", r.operation, r.duration_ms, r.details, if r.success { "成功" } else { "失败" });
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_large_tree() {
        let mut ids = SequentialIds::new("g");
        let tree = generate_large_tree(2, 3, &mut ids).expect("生成测试树失败");
        assert_eq!(tree.kind, NodeKind::Root);
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].kind, NodeKind::Row);
        assert!(tree.count() > 5);
    }

    #[test]
    fn test_performance_suite_covers_every_size() {
        let results = run_performance_suite();
        assert_eq!(results.len(), 3 * 7, "每种规模都应生成测试树并跑完全部项目");
        for r in &results {
            assert!(r.success, "{} 失败: {}", r.operation, r.details);
        }
    }

    #[test]
    fn test_performance_benchmarks() {
        let mut ids = SequentialIds::new("g");
        let raw = generate_raw_tree(3, 5);

        let normalize_result = benchmark_normalize(&raw, &mut ids);
        assert!(normalize_result.success);
        assert!(normalize_result.duration_ms < 1000); // 应该在1秒内完成

        let tree = generate_large_tree(3, 5, &mut ids).expect("生成测试树失败");
        let round_trip = benchmark_json_round_trip(&tree, &mut ids);
        assert!(round_trip.success, "{}", round_trip.details);
        assert!(round_trip.duration_ms < 1000);

        assert!(benchmark_script_export(&tree, &mut ids).success);

        for r in benchmark_mutations(&tree, &mut ids) {
            assert!(r.success, "{} 失败: {}", r.operation, r.details);
        }
    }
}
