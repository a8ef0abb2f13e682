//! EditorState：编辑器持有的当前树，以及导入/导出入口
//!
//! 每次操作先完整计算出新树再替换，失败的导入不会改动当前树。

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::export::json::{import_json_file, to_json, JsonExport};
use crate::export::script::{to_script_export, ScriptExport};
use crate::model::config::UiConfig;
use crate::model::node::{Node, NodeId, NodeKind, NodePatch};
use crate::model::normalize::{IdGenerator, UuidGenerator};
use crate::model::settings::ExportSettings;
use crate::model::tree_ops;
use crate::utils::clipboard::{copy_to_clipboard, ClipboardError};
use crate::utils::fs::write_text_file;
use crate::vm::bridge::*;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("界面文件格式无效: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("导出失败: {0}")]
    Export(String),
    #[error("剪贴板错误: {0}")]
    Clipboard(#[from] ClipboardError),
    #[error("状态错误: {0}")]
    State(String),
}

/// 导入的结果：取消选择不是错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    Imported { nodes: usize },
    Cancelled,
}

#[derive(Debug)]
pub struct EditorState {
    tree: Node,
    pub source_path: Option<PathBuf>,
    pub status_message: String,
    pub settings: ExportSettings,
    ids: Box<dyn IdGenerator>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorState {
    pub fn new() -> Self {
        Self::with_id_generator(Box::new(UuidGenerator))
    }

    /// 从一个空的根节点开始
    pub fn with_id_generator(mut ids: Box<dyn IdGenerator>) -> Self {
        let tree = Node::new(NodeKind::Root, ids.as_mut());
        Self {
            tree,
            source_path: None,
            status_message: STATUS_READY.to_string(),
            settings: ExportSettings::default(),
            ids,
        }
    }

    pub fn tree(&self) -> &Node {
        &self.tree
    }

    pub fn root_id(&self) -> &NodeId {
        &self.tree.id
    }

    pub fn find(&self, node_id: &NodeId) -> Option<&Node> {
        tree_ops::find_node(&self.tree, node_id)
    }

    /// 在父节点下新建指定类型的子节点；父节点不存在时返回 None 且树不变
    pub fn add_child(&mut self, parent_id: &NodeId, kind: NodeKind) -> Option<NodeId> {
        if self.find(parent_id).is_none() {
            tracing::warn!("父节点不存在: {}", parent_id);
            return None;
        }
        let child = Node::new(kind, self.ids.as_mut());
        let child_id = child.id.clone();
        self.tree = tree_ops::add_child(&self.tree, parent_id, child);
        Some(child_id)
    }

    /// 删除节点；删除根节点等同于清空
    pub fn remove(&mut self, node_id: &NodeId) {
        self.tree = tree_ops::remove_node(&self.tree, node_id);
    }

    pub fn clear(&mut self) {
        let root_id = self.tree.id.clone();
        self.remove(&root_id);
    }

    pub fn edit(&mut self, node_id: &NodeId, patch: &NodePatch) {
        self.tree = tree_ops::edit_node(&self.tree, node_id, patch);
    }

    pub fn set_kind(&mut self, node_id: &NodeId, kind: NodeKind) {
        self.edit(node_id, &NodePatch::kind(kind));
    }

    /// 用配置表单保存的整份配置替换节点配置
    pub fn set_config(&mut self, node_id: &NodeId, config: UiConfig) {
        self.edit(node_id, &NodePatch::config(config));
    }

    /// 导入JSON文件；`None` 表示用户在文件选择框中取消
    pub fn import_json(&mut self, path: Option<&Path>) -> Result<ImportOutcome, AppError> {
        match import_json_file(path, self.ids.as_mut()) {
            Ok(Some(tree)) => {
                let nodes = tree.count();
                self.tree = tree;
                self.source_path = path.map(Path::to_path_buf);
                self.status_message = STATUS_IMPORTED.to_string();
                Ok(ImportOutcome::Imported { nodes })
            }
            Ok(None) => {
                self.status_message = STATUS_IMPORT_CANCELLED.to_string();
                Ok(ImportOutcome::Cancelled)
            }
            Err(e) => {
                tracing::error!("导入失败: {}", e);
                self.status_message = format!("{}{}", STATUS_ERROR_PREFIX, e);
                Err(e)
            }
        }
    }

    pub fn export_json(&mut self) -> Result<JsonExport, AppError> {
        to_json(&self.tree, self.ids.as_mut(), &self.settings)
    }

    pub fn export_script(&mut self) -> ScriptExport {
        to_script_export(&self.tree, self.ids.as_mut(), &self.settings)
    }

    /// 把JSON导出写入目录，返回完整路径
    pub fn save_json_to(&mut self, dir: &Path) -> Result<PathBuf, AppError> {
        let export = self.export_json()?;
        self.write_export(dir, &export.filename, &export.content)
    }

    pub fn save_script_to(&mut self, dir: &Path) -> Result<PathBuf, AppError> {
        let export = self.export_script();
        self.write_export(dir, &export.filename, &export.content)
    }

    pub fn copy_script_to_clipboard(&mut self) -> Result<(), AppError> {
        let export = self.export_script();
        let written = copy_to_clipboard(&export.content)?;
        tracing::info!("脚本已复制到剪贴板，长度: {} 字符", written);
        self.status_message = STATUS_COPIED.to_string();
        Ok(())
    }

    fn write_export(&mut self, dir: &Path, filename: &str, content: &str) -> Result<PathBuf, AppError> {
        if !dir.is_dir() {
            return Err(AppError::State(format!("导出目录不存在: {}", dir.display())));
        }
        let path = dir.join(filename);
        write_text_file(&path, content)?;
        tracing::info!("导出文件已保存到: {}", path.display());
        self.status_message = STATUS_EXPORTED.to_string();
        Ok(path)
    }
}
