//! VM桥接层：编辑器界面与 EditorState 之间共享的状态文案
//!
//! 界面层（树面板、配置表单、预览）在本库之外实现，这里只提供公共常量

// === 常量定义（消除魔法值） ===
pub const STATUS_READY: &str = "就绪";
pub const STATUS_IMPORTED: &str = "导入完成";
pub const STATUS_IMPORT_CANCELLED: &str = "已取消导入";
pub const STATUS_EXPORTED: &str = "导出完成";
pub const STATUS_COPIED: &str = "已复制到剪贴板";
pub const STATUS_ERROR_PREFIX: &str = "错误: ";
