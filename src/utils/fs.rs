//! IO helper: file read/write for imports and exports

use std::{fs, path::Path};

use serde_json::Value;
use crate::model::data_core::AppError;

/// 读取UTF-8文本文件
pub fn read_text_file(p: &Path) -> Result<String, AppError> {
    Ok(fs::read_to_string(p)?)
}

/// 从文件读取JSON数据；读取失败与解析失败分别报告
pub fn read_json_file(p: &Path) -> Result<Value, AppError> {
    let text = read_text_file(p)?;
    let v: Value = serde_json::from_str(&text)?;
    Ok(v)
}

/// 写出文本文件（覆盖已有内容）
pub fn write_text_file(p: &Path, content: &str) -> Result<(), AppError> {
    fs::write(p, content)?;
    Ok(())
}
