use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

use crate::model::null_default;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualDescription {
    #[serde(default, deserialize_with = "null_default")]
    pub gender: String,
    #[serde(default, deserialize_with = "null_default")]
    pub body_type: String,
    #[serde(default, deserialize_with = "null_default")]
    pub condition: String,
    #[serde(default, deserialize_with = "null_default")]
    pub visible_clothing: String,
}

impl VisualDescription {
    /// One-line appearance summary for the character sheet.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let head: Vec<&str> = [self.gender.as_str(), self.body_type.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        if !head.is_empty() {
            out.push_str(&head.join(", "));
            out.push('.');
        }
        if !self.condition.is_empty() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&self.condition);
            out.push('.');
        }
        if !self.visible_clothing.is_empty() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&format!("Wearing {}.", self.visible_clothing));
        }
        out
    }
}

/// A role-playing attribute: either a bare value or a category of named values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpgElement {
    Category(BTreeMap<String, Value>),
    Scalar(Value),
}

impl RpgElement {
    /// Rows as (label, value) pairs. A scalar is shown under its own category name.
    pub fn rows(&self, category: &str) -> Vec<(String, String)> {
        match self {
            RpgElement::Category(map) => map
                .iter()
                .map(|(k, v)| (k.clone(), display_value(v)))
                .collect(),
            RpgElement::Scalar(v) => vec![(category.to_string(), display_value(v))],
        }
    }
}

/// Character sheet. Always replaced wholesale by the latest fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub backstory: String,
    #[serde(default, deserialize_with = "null_default")]
    pub visual_description: VisualDescription,
    #[serde(default, deserialize_with = "null_default")]
    pub rpg_elements: BTreeMap<String, RpgElement>,
    #[serde(default)]
    pub money: Option<Number>,

    /// Backend-owned fields the client does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PlayerInfo {
    pub fn money_label(&self) -> String {
        match &self.money {
            Some(m) => format!("${m}"),
            None => "$0".into(),
        }
    }
}

pub fn display_value(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => "-".into(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = r#"{
        "name": "Ash",
        "backstory": "Raised by wolves.",
        "visualDescription": {
            "gender": "Female",
            "bodyType": "lean",
            "condition": "Healthy",
            "visibleClothing": "a green cloak"
        },
        "rpgElements": {
            "stats": { "strength": 12, "agility": "high" },
            "level": 3
        },
        "money": 40,
        "currentLocation": "loc_forest"
    }"#;

    #[test]
    fn decodes_nested_and_scalar_rpg_elements() {
        let p: PlayerInfo = serde_json::from_str(SHEET).unwrap();
        assert_eq!(
            p.rpg_elements["stats"].rows("stats"),
            vec![
                ("agility".to_string(), "high".to_string()),
                ("strength".to_string(), "12".to_string())
            ]
        );
        assert_eq!(
            p.rpg_elements["level"].rows("level"),
            vec![("level".to_string(), "3".to_string())]
        );
    }

    #[test]
    fn unknown_fields_are_kept_opaque() {
        let p: PlayerInfo = serde_json::from_str(SHEET).unwrap();
        assert_eq!(p.extra["currentLocation"], Value::from("loc_forest"));
        assert_eq!(p.money_label(), "$40");
    }

    #[test]
    fn appearance_summary() {
        let p: PlayerInfo = serde_json::from_str(SHEET).unwrap();
        assert_eq!(
            p.visual_description.summary(),
            "Female, lean. Healthy. Wearing a green cloak."
        );
        assert_eq!(VisualDescription::default().summary(), "");
    }

    #[test]
    fn null_fields_decode_as_empty() {
        let p: PlayerInfo = serde_json::from_str(
            r#"{"name":"Ash","backstory":null,"visualDescription":null,"rpgElements":null,"money":null}"#,
        )
        .unwrap();
        assert_eq!(p.name, "Ash");
        assert_eq!(p.backstory, "");
        assert_eq!(p.visual_description, VisualDescription::default());
        assert!(p.rpg_elements.is_empty());
        assert_eq!(p.money_label(), "$0");

        let v: VisualDescription =
            serde_json::from_str(r#"{"gender":null,"bodyType":"tall","condition":null}"#).unwrap();
        assert_eq!(v.summary(), "tall.");
    }
}
