//! UI 布局树编辑核心
//!
//! 提供节点模型、纯函数式树操作、导入规范化，以及 JSON / 游戏脚本表字面量两种导出。
//! 界面组件、预览渲染与文件选择框由宿主程序负责。

pub mod export;
pub mod model;
pub mod utils;
pub mod vm;

// 重新导出主要类型
pub use export::json::{from_json_str, import_json_file, to_json, JsonExport};
pub use export::script::{to_script_export, to_script_literal, ScriptExport};
pub use model::config::{Align, Colour, ConfigError, ConfigKey, ConfigValue, UiConfig, ValueType};
pub use model::data_core::{AppError, EditorState, ImportOutcome};
pub use model::node::{Node, NodeId, NodeKind, NodePatch, RawNode};
pub use model::normalize::{normalize, normalize_value, IdGenerator, SequentialIds, UuidGenerator};
pub use model::outline::{build_outline, OutlineRow};
pub use model::settings::ExportSettings;
pub use model::tree_ops::{add_child, edit_node, find_node, remove_node};
