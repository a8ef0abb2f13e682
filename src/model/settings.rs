//! 导出设置：文件名前缀、脚本构造函数名、缩进

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::data_core::AppError;
use crate::utils::fs::read_text_file;

pub const DEFAULT_FILE_PREFIX: &str = "UIForge";
pub const DEFAULT_FUNCTION_NAME: &str = "CreateUI";
pub const DEFAULT_INDENT: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// 导出文件名前缀：`<prefix>-YYYY-MM-DD.<ext>`
    pub file_prefix: String,
    /// 脚本导出中包裹根节点的无参构造函数名
    pub function_name: String,
    /// 脚本导出每层缩进的空格数（JSON 固定为 2）
    pub indent: usize,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            function_name: DEFAULT_FUNCTION_NAME.to_string(),
            indent: DEFAULT_INDENT,
        }
    }
}

impl ExportSettings {
    /// 从 JSON 设置文件加载，缺失的字段使用默认值
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = read_text_file(path)?;
        let settings: Self = serde_json::from_str(&text)?;
        tracing::info!("已加载导出设置: {}", path.display());
        Ok(settings)
    }

    pub fn filename(&self, extension: &str, date: NaiveDate) -> String {
        format!("{}-{}.{}", self.file_prefix, date.format("%Y-%m-%d"), extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_filename_uses_date_convention() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        let settings = ExportSettings::default();
        assert_eq!(settings.filename("json", date), "UIForge-2025-03-07.json");
        assert_eq!(settings.filename("lua", date), "UIForge-2025-03-07.lua");
    }

    #[test]
    fn test_load_partial_settings() {
        let mut file = NamedTempFile::new().expect("创建临时文件失败");
        file.write_all(br#"{"function_name": "BuildShop"}"#).expect("写入临时文件失败");

        let settings = ExportSettings::load(file.path()).unwrap();
        assert_eq!(settings.function_name, "BuildShop");
        assert_eq!(settings.file_prefix, DEFAULT_FILE_PREFIX);
        assert_eq!(settings.indent, DEFAULT_INDENT);
    }

    #[test]
    fn test_load_invalid_settings() {
        let mut file = NamedTempFile::new().expect("创建临时文件失败");
        file.write_all(b"{\"indent\": \"wide\"}").expect("写入临时文件失败");
        assert!(matches!(ExportSettings::load(file.path()), Err(AppError::Parse(_))));
    }
}
