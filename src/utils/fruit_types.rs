// This file contains the fruit record struct and the form field normalizer.
#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ***************************************************************************
//                                Constants
// ***************************************************************************
// Value a browser submits for a checked checkbox that has no value attribute.
pub const CHECKBOX_ON   : &str = "on";

// Form field names with special handling.
pub const FIELD_NAME    : &str = "name";
pub const FIELD_COLOR   : &str = "color";
pub const FIELD_READY   : &str = "readyToEat";

// ---------------------------------------------------------------------------
// Fruit:
// ---------------------------------------------------------------------------
/** A single fruit record.  Any form fields other than name, color and
 * readyToEat are kept in extra and serialized alongside the known fields,
 * so the submitted form determines the record's shape.
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fruit {
    pub name: String,
    pub color: String,
    #[serde(rename = "readyToEat")]
    pub ready_to_eat: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Fruit {
    pub fn new(name: &str, color: &str, ready_to_eat: bool) -> Self {
        Fruit {
            name: name.to_string(),
            color: color.to_string(),
            ready_to_eat,
            extra: BTreeMap::new(),
        }
    }

    // ---------------------------------------------------------------------------
    // from_form:
    // ---------------------------------------------------------------------------
    /** Build a record from the decoded key/value pairs of a form-urlencoded
     * body.  The readyToEat field is normalized to a boolean, name and color
     * are taken verbatim (empty when absent), and every other field lands in
     * extra.  When a key repeats, the last value wins.
     */
    pub fn from_form(fields: Vec<(String, String)>) -> Self {
        let mut name = String::new();
        let mut color = String::new();
        let mut ready: Option<String> = None;
        let mut extra = BTreeMap::new();

        for (key, value) in fields {
            match key.as_str() {
                FIELD_NAME  => name = value,
                FIELD_COLOR => color = value,
                FIELD_READY => ready = Some(value),
                _ => {extra.insert(key, value);},
            }
        }

        Fruit {
            name,
            color,
            ready_to_eat: normalize_checkbox(ready.as_deref()),
            extra,
        }
    }
}

// ---------------------------------------------------------------------------
// normalize_checkbox:
// ---------------------------------------------------------------------------
/** A checkbox is true only when it was submitted with the checked sentinel.
 * Unchecked boxes are omitted from the body, so None is false, as is any
 * other value.
 */
pub fn normalize_checkbox(raw: Option<&str>) -> bool {
    raw == Some(CHECKBOX_ON)
}

// ---------------------------------------------------------------------------
// seed_fruits:
// ---------------------------------------------------------------------------
/** The records the store holds when the process starts. */
pub fn seed_fruits() -> Vec<Fruit> {
    vec![
        Fruit::new("apple", "red", true),
        Fruit::new("pear", "green", false),
        Fruit::new("banana", "yellow", true),
    ]
}
