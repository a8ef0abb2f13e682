//! Clipboard  把导出的脚本文本放进系统剪贴板

use copypasta::{ClipboardContext, ClipboardProvider};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("无法打开系统剪贴板: {0}")]
    Unavailable(String),
    #[error("写入剪贴板失败: {0}")]
    Write(String),
}

fn open_context() -> Result<ClipboardContext, ClipboardError> {
    ClipboardContext::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))
}

/// 将文本复制到系统剪贴板，返回写入的字符数
pub fn copy_to_clipboard(text: &str) -> Result<usize, ClipboardError> {
    let mut ctx = open_context()?;
    ctx.set_contents(text.to_owned())
        .map_err(|e| ClipboardError::Write(e.to_string()))?;
    Ok(text.chars().count())
}

/// 读取剪贴板文本（用于测试）
#[cfg(test)]
pub fn get_clipboard_contents() -> Result<String, ClipboardError> {
    open_context()?
        .get_contents()
        .map_err(|e| ClipboardError::Unavailable(e.to_string()))
}
