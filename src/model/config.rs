//! 节点配置：稀疏的布局/外观/行为字段，以及导出时使用的“已识别键”表

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use thiserror::Error;

/// 子节点在当前节点内的对齐方式（九宫格方位）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Align {
    #[serde(rename = "tl")]
    TopLeft,
    #[serde(rename = "tm")]
    TopMiddle,
    #[serde(rename = "tr")]
    TopRight,
    #[serde(rename = "cl")]
    CenterLeft,
    #[serde(rename = "cm")]
    CenterMiddle,
    #[serde(rename = "cr")]
    CenterRight,
    #[serde(rename = "bl")]
    BottomLeft,
    #[serde(rename = "bm")]
    BottomMiddle,
    #[serde(rename = "br")]
    BottomRight,
}

impl Align {
    pub const ALL: [Align; 9] = [
        Align::TopLeft,
        Align::TopMiddle,
        Align::TopRight,
        Align::CenterLeft,
        Align::CenterMiddle,
        Align::CenterRight,
        Align::BottomLeft,
        Align::BottomMiddle,
        Align::BottomRight,
    ];

    /// 导出格式中的短代码（如 "cm"）
    pub fn as_str(self) -> &'static str {
        match self {
            Align::TopLeft => "tl",
            Align::TopMiddle => "tm",
            Align::TopRight => "tr",
            Align::CenterLeft => "cl",
            Align::CenterMiddle => "cm",
            Align::CenterRight => "cr",
            Align::BottomLeft => "bl",
            Align::BottomMiddle => "bm",
            Align::BottomRight => "br",
        }
    }

    /// 下拉框中显示的名称
    pub fn label(self) -> &'static str {
        match self {
            Align::TopLeft => "Top Left",
            Align::TopMiddle => "Top Middle",
            Align::TopRight => "Top Right",
            Align::CenterLeft => "Center Left",
            Align::CenterMiddle => "Center Middle",
            Align::CenterRight => "Center Right",
            Align::BottomLeft => "Bottom Left",
            Align::BottomMiddle => "Bottom Middle",
            Align::BottomRight => "Bottom Right",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == code)
    }
}

/// 颜色引用，按原样保存（调色板名称或 `HEX("...")`），不做校验
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Colour(String);

impl Colour {
    /// 游戏内置调色板
    pub const PALETTE: &'static [&'static str] = &[
        "G.C.MULT", "G.C.CHIPS", "G.C.MONEY", "G.C.XMULT", "G.C.FILTER",
        "G.C.BLUE", "G.C.RED", "G.C.GREEN", "G.C.PALE_GREEN", "G.C.ORANGE", "G.C.IMPORTANT",
        "G.C.GOLD", "G.C.YELLOW", "G.C.CLEAR", "G.C.WHITE", "G.C.PURPLE", "G.C.BLACK",
        "G.C.L_BLACK", "G.C.GREY", "G.C.CHANCE", "G.C.JOKER_GREY", "G.C.VOUCHER", "G.C.BOOSTER",
        "G.C.EDITION", "G.C.DARK_EDITION", "G.C.ETERNAL", "G.C.PERISHABLE", "G.C.RENTAL",
        "G.C.UI.TEXT_LIGHT", "G.C.UI.TEXT_DARK", "G.C.UI.TEXT_INACTIVE", "G.C.UI.BACKGROUND_LIGHT",
        "G.C.UI.BACKGROUND_WHITE", "G.C.UI.BACKGROUND_DARK", "G.C.UI.BACKGROUND_INACTIVE",
        "G.C.UI.OUTLINE_LIGHT", "G.C.UI.OUTLINE_LIGHT_TRANS", "G.C.UI.OUTLINE_DARK",
        "G.C.UI.TRANSPARENT_LIGHT", "G.C.UI.TRANSPARENT_DARK", "G.C.UI.HOVER",
    ];

    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// 十六进制颜色，导出为 `HEX("rrggbb")`
    pub fn hex(rgb: &str) -> Self {
        Self(format!("HEX(\"{}\")", rgb.trim_start_matches('#')))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_palette(&self) -> bool {
        Self::PALETTE.contains(&self.0.as_str())
    }

    /// 去掉 "G.C." 前缀后的显示名
    pub fn short_name(&self) -> &str {
        self.0.strip_prefix("G.C.").unwrap_or(&self.0)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 配置字段的语义类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Number,
    Bool,
    Text,
    Colour,
    Align,
}

/// 已识别的配置键，顺序即导出顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    Align,
    H,
    MinH,
    MaxH,
    W,
    MinW,
    MaxW,
    Padding,
    R,
    Colour,
    NoFill,
    Outline,
    OutlineColour,
    Emboss,
    Hover,
    Shadow,
    Juice,
    Id,
    RefTable,
    RefValue,
    Func,
    Button,
    Text,
    Scale,
    Vert,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 25] = [
        ConfigKey::Align,
        ConfigKey::H,
        ConfigKey::MinH,
        ConfigKey::MaxH,
        ConfigKey::W,
        ConfigKey::MinW,
        ConfigKey::MaxW,
        ConfigKey::Padding,
        ConfigKey::R,
        ConfigKey::Colour,
        ConfigKey::NoFill,
        ConfigKey::Outline,
        ConfigKey::OutlineColour,
        ConfigKey::Emboss,
        ConfigKey::Hover,
        ConfigKey::Shadow,
        ConfigKey::Juice,
        ConfigKey::Id,
        ConfigKey::RefTable,
        ConfigKey::RefValue,
        ConfigKey::Func,
        ConfigKey::Button,
        ConfigKey::Text,
        ConfigKey::Scale,
        ConfigKey::Vert,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::Align => "align",
            ConfigKey::H => "h",
            ConfigKey::MinH => "minh",
            ConfigKey::MaxH => "maxh",
            ConfigKey::W => "w",
            ConfigKey::MinW => "minw",
            ConfigKey::MaxW => "maxw",
            ConfigKey::Padding => "padding",
            ConfigKey::R => "r",
            ConfigKey::Colour => "colour",
            ConfigKey::NoFill => "no_fill",
            ConfigKey::Outline => "outline",
            ConfigKey::OutlineColour => "outline_colour",
            ConfigKey::Emboss => "emboss",
            ConfigKey::Hover => "hover",
            ConfigKey::Shadow => "shadow",
            ConfigKey::Juice => "juice",
            ConfigKey::Id => "id",
            ConfigKey::RefTable => "ref_table",
            ConfigKey::RefValue => "ref_value",
            ConfigKey::Func => "func",
            ConfigKey::Button => "button",
            ConfigKey::Text => "text",
            ConfigKey::Scale => "scale",
            ConfigKey::Vert => "vert",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    pub fn value_type(self) -> ValueType {
        match self {
            ConfigKey::Align => ValueType::Align,
            ConfigKey::Colour | ConfigKey::OutlineColour => ValueType::Colour,
            ConfigKey::NoFill
            | ConfigKey::Hover
            | ConfigKey::Shadow
            | ConfigKey::Juice
            | ConfigKey::Vert => ValueType::Bool,
            ConfigKey::Id
            | ConfigKey::RefTable
            | ConfigKey::RefValue
            | ConfigKey::Func
            | ConfigKey::Button
            | ConfigKey::Text => ValueType::Text,
            ConfigKey::H
            | ConfigKey::MinH
            | ConfigKey::MaxH
            | ConfigKey::W
            | ConfigKey::MinW
            | ConfigKey::MaxW
            | ConfigKey::Padding
            | ConfigKey::R
            | ConfigKey::Outline
            | ConfigKey::Emboss
            | ConfigKey::Scale => ValueType::Number,
        }
    }

    /// 只对文本节点有意义的键
    pub fn is_text_only(self) -> bool {
        matches!(self, ConfigKey::Text | ConfigKey::Scale | ConfigKey::Vert)
    }

    /// 字符串值在脚本导出中不加引号（符号引用而非字符串字面量）
    pub fn emits_bare(self) -> bool {
        matches!(self, ConfigKey::Colour | ConfigKey::RefTable)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单个配置值的统一视图
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("配置项 {key} 需要 {expected:?} 类型的值")]
    TypeMismatch { key: ConfigKey, expected: ValueType },
    #[error("无效的对齐方式: {0}")]
    InvalidAlign(String),
}

/// 节点配置记录；所有字段可选，缺省即交给游戏框架自行决定
///
/// 已识别的键若值的类型与字段不符（如 `"align": "center"`），原样放进 `extra`，
/// 同一个键不会同时出现在字段和 `extra` 中。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "whole_number")]
    pub h: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "whole_number")]
    pub minh: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "whole_number")]
    pub maxh: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "whole_number")]
    pub w: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "whole_number")]
    pub minw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "whole_number")]
    pub maxw: Option<f64>,
    /// 内边距，常用 0.05 或 0.1
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "whole_number")]
    pub padding: Option<f64>,
    /// 圆角
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "whole_number")]
    pub r: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colour: Option<Colour>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "whole_number")]
    pub outline: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline_colour: Option<Colour>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "whole_number")]
    pub emboss: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<bool>,
    /// 加载时播放 juice_up 动画
    #[serde(skip_serializing_if = "Option::is_none")]
    pub juice: Option<bool>,
    /// 用户可见的自定义ID，与节点身份无关
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_value: Option<String>,
    /// 绘制时回调（G.FUNCS 中的函数名）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub func: Option<String>,
    /// 点击回调（G.FUNCS 中的函数名）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "whole_number")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vert: Option<bool>,
    /// 未识别的键，以及类型不符的已识别键：原样保留，不做解释
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl<'de> Deserialize<'de> for UiConfig {
    /// 宽松读取：只校验整体是对象，单个值放不进对应字段时转入 `extra`
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = BTreeMap::<String, Value>::deserialize(deserializer)?;
        let mut config = UiConfig::default();
        for (name, value) in entries {
            match ConfigKey::parse(&name) {
                Some(key) if config.fill_from_json(key, &value) => {}
                _ => {
                    config.extra.insert(name, value);
                }
            }
        }
        Ok(config)
    }
}

/// 超过该值的整数无法用 f64 精确表示
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// 整数值写成 `8` 而不是 `8.0`
fn whole_number<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => serializer.serialize_i64(*n as i64),
        Some(n) => serializer.serialize_f64(*n),
        None => serializer.serialize_none(),
    }
}

/// 能无损放进 f64 的 JSON 数字
fn exact_f64(number: &Number) -> Option<f64> {
    if let Some(i) = number.as_i64() {
        return (i.unsigned_abs() as f64 <= MAX_SAFE_INTEGER).then_some(i as f64);
    }
    if number.is_u64() {
        return None;
    }
    number.as_f64()
}

impl UiConfig {
    pub fn is_empty(&self) -> bool {
        self.extra.is_empty() && ConfigKey::ALL.iter().all(|k| self.get(*k).is_none())
    }

    /// 按键读取当前值
    pub fn get(&self, key: ConfigKey) -> Option<ConfigValue> {
        match key.value_type() {
            ValueType::Align => self.align.map(|a| ConfigValue::Text(a.as_str().to_string())),
            ValueType::Colour => {
                let slot = if key == ConfigKey::Colour { &self.colour } else { &self.outline_colour };
                slot.as_ref().map(|c| ConfigValue::Text(c.as_str().to_string()))
            }
            ValueType::Number => self.number_ref(key).map(ConfigValue::Number),
            ValueType::Bool => self.flag_ref(key).map(ConfigValue::Bool),
            ValueType::Text => self.text_ref(key).map(|s| ConfigValue::Text(s.to_string())),
        }
    }

    /// 写入一个值；类型不符时返回错误且不修改记录
    pub fn set(&mut self, key: ConfigKey, value: ConfigValue) -> Result<(), ConfigError> {
        let expected = key.value_type();
        match (expected, value) {
            (ValueType::Align, ConfigValue::Text(code)) => {
                let align = Align::parse(&code).ok_or(ConfigError::InvalidAlign(code))?;
                self.align = Some(align);
            }
            (ValueType::Colour, ConfigValue::Text(reference)) => {
                *self.colour_slot(key) = Some(Colour::new(reference));
            }
            (ValueType::Number, ConfigValue::Number(n)) => {
                if let Some(slot) = self.number_slot(key) {
                    *slot = Some(n);
                }
            }
            (ValueType::Bool, ConfigValue::Bool(b)) => {
                if let Some(slot) = self.flag_slot(key) {
                    *slot = Some(b);
                }
            }
            (ValueType::Text, ConfigValue::Text(s)) => {
                if let Some(slot) = self.text_slot(key) {
                    *slot = Some(s);
                }
            }
            _ => return Err(ConfigError::TypeMismatch { key, expected }),
        }
        self.extra.remove(key.as_str());
        Ok(())
    }

    /// 导入时的写入：类型相符则写入字段并返回 true，否则不修改
    fn fill_from_json(&mut self, key: ConfigKey, value: &Value) -> bool {
        let value = match (key.value_type(), value) {
            (ValueType::Number, Value::Number(n)) => exact_f64(n).map(ConfigValue::Number),
            (ValueType::Bool, Value::Bool(b)) => Some(ConfigValue::Bool(*b)),
            (ValueType::Text | ValueType::Colour | ValueType::Align, Value::String(s)) => {
                Some(ConfigValue::Text(s.clone()))
            }
            _ => None,
        };
        value.is_some_and(|v| self.set(key, v).is_ok())
    }

    /// 移除一个键（恢复为框架默认），包括 `extra` 中同名的原样值
    pub fn clear(&mut self, key: ConfigKey) {
        self.extra.remove(key.as_str());
        match key.value_type() {
            ValueType::Align => self.align = None,
            ValueType::Colour => *self.colour_slot(key) = None,
            ValueType::Number => {
                if let Some(slot) = self.number_slot(key) {
                    *slot = None;
                }
            }
            ValueType::Bool => {
                if let Some(slot) = self.flag_slot(key) {
                    *slot = None;
                }
            }
            ValueType::Text => {
                if let Some(slot) = self.text_slot(key) {
                    *slot = None;
                }
            }
        }
    }

    /// 复选框语义：勾选写入 true，取消勾选移除该键
    pub fn set_flag(&mut self, key: ConfigKey, checked: bool) -> Result<(), ConfigError> {
        if key.value_type() != ValueType::Bool {
            return Err(ConfigError::TypeMismatch { key, expected: ValueType::Bool });
        }
        if checked {
            self.set(key, ConfigValue::Bool(true))
        } else {
            self.clear(key);
            Ok(())
        }
    }

    /// 数字输入框语义：无法解析（含空串、NaN）时移除该键
    pub fn set_number_input(&mut self, key: ConfigKey, input: &str) -> Result<(), ConfigError> {
        if key.value_type() != ValueType::Number {
            return Err(ConfigError::TypeMismatch { key, expected: ValueType::Number });
        }
        match input.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => self.set(key, ConfigValue::Number(n)),
            _ => {
                self.clear(key);
                Ok(())
            }
        }
    }

    fn colour_slot(&mut self, key: ConfigKey) -> &mut Option<Colour> {
        if key == ConfigKey::Colour {
            &mut self.colour
        } else {
            &mut self.outline_colour
        }
    }

    fn number_ref(&self, key: ConfigKey) -> Option<f64> {
        match key {
            ConfigKey::H => self.h,
            ConfigKey::MinH => self.minh,
            ConfigKey::MaxH => self.maxh,
            ConfigKey::W => self.w,
            ConfigKey::MinW => self.minw,
            ConfigKey::MaxW => self.maxw,
            ConfigKey::Padding => self.padding,
            ConfigKey::R => self.r,
            ConfigKey::Outline => self.outline,
            ConfigKey::Emboss => self.emboss,
            ConfigKey::Scale => self.scale,
            _ => None,
        }
    }

    fn number_slot(&mut self, key: ConfigKey) -> Option<&mut Option<f64>> {
        match key {
            ConfigKey::H => Some(&mut self.h),
            ConfigKey::MinH => Some(&mut self.minh),
            ConfigKey::MaxH => Some(&mut self.maxh),
            ConfigKey::W => Some(&mut self.w),
            ConfigKey::MinW => Some(&mut self.minw),
            ConfigKey::MaxW => Some(&mut self.maxw),
            ConfigKey::Padding => Some(&mut self.padding),
            ConfigKey::R => Some(&mut self.r),
            ConfigKey::Outline => Some(&mut self.outline),
            ConfigKey::Emboss => Some(&mut self.emboss),
            ConfigKey::Scale => Some(&mut self.scale),
            _ => None,
        }
    }

    fn flag_ref(&self, key: ConfigKey) -> Option<bool> {
        match key {
            ConfigKey::NoFill => self.no_fill,
            ConfigKey::Hover => self.hover,
            ConfigKey::Shadow => self.shadow,
            ConfigKey::Juice => self.juice,
            ConfigKey::Vert => self.vert,
            _ => None,
        }
    }

    fn flag_slot(&mut self, key: ConfigKey) -> Option<&mut Option<bool>> {
        match key {
            ConfigKey::NoFill => Some(&mut self.no_fill),
            ConfigKey::Hover => Some(&mut self.hover),
            ConfigKey::Shadow => Some(&mut self.shadow),
            ConfigKey::Juice => Some(&mut self.juice),
            ConfigKey::Vert => Some(&mut self.vert),
            _ => None,
        }
    }

    fn text_ref(&self, key: ConfigKey) -> Option<&str> {
        let slot = match key {
            ConfigKey::Id => &self.id,
            ConfigKey::RefTable => &self.ref_table,
            ConfigKey::RefValue => &self.ref_value,
            ConfigKey::Func => &self.func,
            ConfigKey::Button => &self.button,
            ConfigKey::Text => &self.text,
            _ => return None,
        };
        slot.as_deref()
    }

    fn text_slot(&mut self, key: ConfigKey) -> Option<&mut Option<String>> {
        match key {
            ConfigKey::Id => Some(&mut self.id),
            ConfigKey::RefTable => Some(&mut self.ref_table),
            ConfigKey::RefValue => Some(&mut self.ref_value),
            ConfigKey::Func => Some(&mut self.func),
            ConfigKey::Button => Some(&mut self.button),
            ConfigKey::Text => Some(&mut self.text),
            _ => None,
        }
    }
}
