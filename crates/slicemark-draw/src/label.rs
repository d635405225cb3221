//! Annotation labels: a text expression with `{flag}` placeholders rendered
//! from quantification values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A measured value shown in a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: String,
}

impl Quantity {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }
}

/// Label content carried by a label node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelText {
    /// User-editable expression, e.g. `"{length}"`.
    pub text_expr: String,
    /// Values substituted into the expression.
    pub quant: BTreeMap<String, Quantity>,
    /// Rendered text.
    pub text: String,
    /// Font size used for rendering and hit-testing.
    pub font_size: f64,
}

impl LabelText {
    /// Builds a label and renders its text.
    pub fn new(text_expr: impl Into<String>, quant: BTreeMap<String, Quantity>, font_size: f64) -> Self {
        let text_expr = text_expr.into();
        let text = replace_flags(&text_expr, &quant);
        Self {
            text_expr,
            quant,
            text,
            font_size,
        }
    }

    /// Replaces the expression and re-renders the text.
    pub fn set_text_expr(&mut self, text_expr: impl Into<String>) {
        self.text_expr = text_expr.into();
        self.text = replace_flags(&self.text_expr, &self.quant);
    }
}

/// Substitutes every `{key}` in `expr` with the matching quantity.
///
/// Unknown keys are left untouched.
pub fn replace_flags(expr: &str, quant: &BTreeMap<String, Quantity>) -> String {
    let mut text = expr.to_string();
    for (key, quantity) in quant {
        let flag = format!("{{{}}}", key);
        if text.contains(&flag) {
            let value = if quantity.unit.is_empty() {
                format!("{:.2}", quantity.value)
            } else {
                format!("{:.2} {}", quantity.value, quantity.unit)
            };
            text = text.replace(&flag, &value);
        }
    }
    text
}
