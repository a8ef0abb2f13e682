//! JSON 导出与导入：无损、保序、可回读

use std::path::Path;

use chrono::NaiveDate;

use crate::export::today_utc;
use crate::model::data_core::AppError;
use crate::model::node::Node;
use crate::model::normalize::{normalize_value, renormalize, IdGenerator};
use crate::model::settings::ExportSettings;
use crate::utils::fs::read_json_file;

pub const JSON_EXTENSION: &str = "json";

/// 导出结果：建议的文件名与内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonExport {
    pub filename: String,
    pub content: String,
}

/// 以今天的日期命名导出
pub fn to_json(tree: &Node, ids: &mut dyn IdGenerator, settings: &ExportSettings) -> Result<JsonExport, AppError> {
    to_json_dated(tree, ids, settings, today_utc())
}

/// 2 空格缩进，键顺序固定为 id / n / config / nodes
pub fn to_json_dated(
    tree: &Node,
    ids: &mut dyn IdGenerator,
    settings: &ExportSettings,
    date: NaiveDate,
) -> Result<JsonExport, AppError> {
    let normalized = renormalize(tree, ids);
    let content = serde_json::to_string_pretty(&normalized).map_err(|e| AppError::Export(e.to_string()))?;
    Ok(JsonExport {
        filename: settings.filename(JSON_EXTENSION, date),
        content,
    })
}

/// 解析 JSON 文本并规范化
pub fn from_json_str(content: &str, ids: &mut dyn IdGenerator) -> Result<Node, AppError> {
    let value = serde_json::from_str(content)?;
    Ok(normalize_value(value, ids)?)
}

/// 导入用户选择的文件；`None` 表示用户取消了选择，不是错误
pub fn import_json_file(path: Option<&Path>, ids: &mut dyn IdGenerator) -> Result<Option<Node>, AppError> {
    let Some(path) = path else {
        tracing::info!("用户取消了文件选择");
        return Ok(None);
    };
    let value = read_json_file(path)?;
    let tree = normalize_value(value, ids)?;
    tracing::info!("导入成功: {}，共 {} 个节点", path.display(), tree.count());
    Ok(Some(tree))
}
