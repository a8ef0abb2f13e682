//! 导出器：JSON（可回读）与游戏脚本表字面量（只写）
//!
//! 两者在输出前都会对树做一次防御性再规范化。

pub mod json;
pub mod script;

use chrono::{NaiveDate, Utc};

/// 导出文件名使用的日期（UTC）
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}
