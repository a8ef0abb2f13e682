//! 游戏脚本（Lua）表字面量导出
//!
//! 只写：没有对应的解析器。字符串值加引号，`colour` 与 `ref_table` 除外，
//! 它们在目标格式中是符号引用。

use chrono::NaiveDate;
use serde_json::Value;

use crate::export::today_utc;
use crate::model::config::{ConfigKey, ConfigValue, UiConfig};
use crate::model::node::Node;
use crate::model::normalize::{renormalize, IdGenerator};
use crate::model::settings::ExportSettings;

pub const SCRIPT_EXTENSION: &str = "lua";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptExport {
    pub filename: String,
    pub content: String,
}

/// 把整棵树包进具名无参构造函数
pub fn to_script_literal(tree: &Node, ids: &mut dyn IdGenerator, settings: &ExportSettings) -> String {
    let normalized = renormalize(tree, ids);
    let unit = " ".repeat(settings.indent);

    let mut out = format!("local function {}()\n{}return ", settings.function_name, unit);
    write_node(&mut out, &normalized, 1, &unit);
    out.push_str("\nend");
    out
}

pub fn to_script_export(tree: &Node, ids: &mut dyn IdGenerator, settings: &ExportSettings) -> ScriptExport {
    to_script_export_dated(tree, ids, settings, today_utc())
}

pub fn to_script_export_dated(
    tree: &Node,
    ids: &mut dyn IdGenerator,
    settings: &ExportSettings,
    date: NaiveDate,
) -> ScriptExport {
    ScriptExport {
        filename: settings.filename(SCRIPT_EXTENSION, date),
        content: to_script_literal(tree, ids, settings),
    }
}

/// 从当前位置写出 `{ ... }`，字段缩进 level+1 层，右括号缩进 level 层
fn write_node(out: &mut String, node: &Node, level: usize, unit: &str) {
    let pad = unit.repeat(level + 1);
    out.push_str("{\n");
    out.push_str(&format!("{}n = {},\n", pad, node.kind.tag()));

    if !node.config.is_empty() {
        out.push_str(&format!("{}config = {{{}}},\n", pad, config_entries(&node.config).join(", ")));
    }

    if node.children.is_empty() {
        out.push_str(&format!("{}nodes = {{}}\n", pad));
    } else {
        out.push_str(&format!("{}nodes = {{\n", pad));
        let child_pad = unit.repeat(level + 2);
        let last = node.children.len() - 1;
        for (idx, child) in node.children.iter().enumerate() {
            out.push_str(&child_pad);
            write_node(out, child, level + 2, unit);
            out.push_str(if idx < last { ",\n" } else { "\n" });
        }
        out.push_str(&format!("{}}}\n", pad));
    }

    out.push_str(&unit.repeat(level));
    out.push('}');
}

/// 已识别的键按固定顺序在前（类型不符的原样值也在其位置输出），未识别的键按键名排序在后
fn config_entries(config: &UiConfig) -> Vec<String> {
    let known = ConfigKey::ALL.iter().filter_map(|key| match config.get(*key) {
        Some(value) => Some(format!("{} = {}", key, format_value(*key, &value))),
        None => config
            .extra
            .get(key.as_str())
            .map(|value| format!("{} = {}", key, format_json(key.as_str(), value))),
    });
    let extra = config
        .extra
        .iter()
        .filter(|(key, _)| ConfigKey::parse(key).is_none())
        .map(|(key, value)| format!("{} = {}", table_key(key), format_json(key, value)));
    known.chain(extra).collect()
}

fn format_value(key: ConfigKey, value: &ConfigValue) -> String {
    match value {
        ConfigValue::Text(s) if key.emits_bare() => s.clone(),
        ConfigValue::Text(s) => quote(s),
        ConfigValue::Number(n) => n.to_string(),
        ConfigValue::Bool(b) => b.to_string(),
    }
}

/// 未识别的值：标量直接输出，数组/对象输出为嵌套表
fn format_json(key: &str, value: &Value) -> String {
    match value {
        Value::String(s) if ConfigKey::parse(key).is_some_and(ConfigKey::emits_bare) => s.clone(),
        Value::String(s) => quote(s),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "nil".to_string(),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(|item| format_json("", item)).collect();
            format!("{{{}}}", items.join(", "))
        }
        Value::Object(map) => {
            let fields: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{} = {}", table_key(k), format_json(k, v)))
                .collect();
            format!("{{{}}}", fields.join(", "))
        }
    }
}

/// 合法标识符直接作键，否则用 `["..."]`
fn table_key(key: &str) -> String {
    let mut chars = key.chars();
    let is_ident = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if is_ident {
        key.to_string()
    } else {
        format!("[{}]", quote(key))
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::{Align, Colour};
    use crate::model::node::NodeKind;
    use crate::model::normalize::SequentialIds;
    use serde_json::json;

    fn render(tree: &Node) -> String {
        to_script_literal(tree, &mut SequentialIds::new("gen"), &ExportSettings::default())
    }

    #[test]
    fn test_quoting_rule() {
        let config = UiConfig {
            colour: Some(Colour::new("G.C.RED")),
            ref_table: Some("G.GAME".into()),
            text: Some("Hi".into()),
            ..Default::default()
        };
        let out = render(&Node::with_id("t", NodeKind::Text).with_config(config));

        assert!(out.contains("colour = G.C.RED"), "{}", out);
        assert!(out.contains("ref_table = G.GAME"), "{}", out);
        assert!(out.contains("text = \"Hi\""), "{}", out);
    }

    #[test]
    fn test_scalar_formatting() {
        let config = UiConfig {
            align: Some(Align::CenterMiddle),
            minw: Some(4.0),
            padding: Some(0.15),
            outline_colour: Some(Colour::new("G.C.WHITE")),
            hover: Some(true),
            vert: Some(false),
            ..Default::default()
        };
        let out = render(&Node::with_id("b", NodeKind::Box).with_config(config));

        assert!(out.contains(
            "config = {align = \"cm\", minw = 4, padding = 0.15, outline_colour = \"G.C.WHITE\", hover = true, vert = false},"
        ), "{}", out);
    }

    #[test]
    fn test_full_layout() {
        let root_cfg = UiConfig { r: Some(0.1), colour: Some(Colour::new("G.C.BLACK")), ..Default::default() };
        let tree = Node::with_id("root", NodeKind::Root)
            .with_config(root_cfg)
            .with_child(Node::with_id("row", NodeKind::Row).with_child(Node::with_id("b", NodeKind::Box)))
            .with_child(Node::with_id("col", NodeKind::Column));

        let expected = "\
local function CreateUI()
  return {
    n = G.UIT.ROOT,
    config = {r = 0.1, colour = G.C.BLACK},
    nodes = {
      {
        n = G.UIT.R,
        nodes = {
          {
            n = G.UIT.B,
            nodes = {}
          }
        }
      },
      {
        n = G.UIT.C,
        nodes = {}
      }
    }
  }
end";
        assert_eq!(render(&tree), expected);
    }

    #[test]
    fn test_settings_change_wrapper_and_indent() {
        let settings = ExportSettings {
            function_name: "BuildShop".into(),
            indent: 4,
            ..Default::default()
        };
        let out = to_script_literal(&Node::with_id("root", NodeKind::Root), &mut SequentialIds::new("gen"), &settings);
        assert_eq!(out, "local function BuildShop()\n    return {\n        n = G.UIT.ROOT,\n        nodes = {}\n    }\nend");
    }

    #[test]
    fn test_unknown_keys_are_emitted() {
        let mut config = UiConfig { text: Some("say \"hi\"".into()), ..Default::default() };
        config.extra.insert("tooltip".into(), json!({"title": "T", "text": ["L1", "L2"]}));
        config.extra.insert("maybe".into(), json!(null));
        config.extra.insert("odd-key".into(), json!(3));
        let out = render(&Node::with_id("t", NodeKind::Text).with_config(config));

        assert!(out.contains("text = \"say \\\"hi\\\"\""), "{}", out);
        assert!(out.contains("maybe = nil"), "{}", out);
        assert!(out.contains("[\"odd-key\"] = 3"), "{}", out);
        assert!(out.contains("tooltip = {text = {\"L1\", \"L2\"}, title = \"T\"}"), "{}", out);
    }

    #[test]
    fn test_mismatched_values_are_emitted_as_is() {
        let config: UiConfig = serde_json::from_value(json!({
            "align": "center",
            "colour": 5,
            "h": null,
            "text": "Hi"
        }))
        .unwrap();
        let out = render(&Node::with_id("t", NodeKind::Text).with_config(config));

        assert!(out.contains("config = {align = \"center\", h = nil, colour = 5, text = \"Hi\"},"), "{}", out);
    }

    #[test]
    fn test_script_export_filename() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        let export = to_script_export_dated(
            &Node::with_id("root", NodeKind::Root),
            &mut SequentialIds::new("gen"),
            &ExportSettings::default(),
            date,
        );
        assert_eq!(export.filename, "UIForge-2025-12-31.lua");
        assert!(export.content.starts_with("local function CreateUI()"));
    }
}
