//! Parameter descriptors and scenario values

use serde::{Deserialize, Serialize};

use crate::calculator::DerivedField;

/// Catalog grouping, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Project,
    Financial,
    Senior,
    Mezzanine,
    Equity,
    Outputs,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Project,
        Category::Financial,
        Category::Senior,
        Category::Mezzanine,
        Category::Equity,
        Category::Outputs,
    ];
}

/// How a formula-kind parameter gets its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormulaRef {
    /// Produced by the named calculator function
    Derived(DerivedField),
    /// Position by equity IRR, assigned once the viable set is known
    Ranking,
    /// Set by the constraint filter
    AllConstraintsMet,
}

/// Parameter kind with its bounds or option set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ParameterKind {
    Number {
        min: f64,
        max: f64,
        step: f64,
        default: f64,
    },
    Select {
        options: &'static [&'static str],
        default: &'static str,
    },
    Boolean {
        default: bool,
    },
    Text {
        default: &'static str,
    },
    Formula(FormulaRef),
}

/// Immutable descriptor for one catalog parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub category: Category,
    pub kind: ParameterKind,
}

impl ParameterDefinition {
    pub fn is_formula(&self) -> bool {
        matches!(self.kind, ParameterKind::Formula(_))
    }

    pub fn is_numeric_input(&self) -> bool {
        matches!(self.kind, ParameterKind::Number { .. })
    }

    /// Default value for input parameters; `None` for formulas
    pub fn default_value(&self) -> Option<ParamValue> {
        match &self.kind {
            ParameterKind::Number { default, .. } => Some(ParamValue::Number(*default)),
            ParameterKind::Select { default, .. } => Some(ParamValue::Text((*default).to_string())),
            ParameterKind::Boolean { default } => Some(ParamValue::Flag(*default)),
            ParameterKind::Text { default } => Some(ParamValue::Text((*default).to_string())),
            ParameterKind::Formula(_) => None,
        }
    }

    /// Check that a supplied value fits this parameter's kind
    pub fn accepts(&self, value: &ParamValue) -> bool {
        match (&self.kind, value) {
            (ParameterKind::Number { .. }, ParamValue::Number(_)) => true,
            (ParameterKind::Select { options, .. }, ParamValue::Text(s)) => options.contains(&s.as_str()),
            (ParameterKind::Boolean { .. }, ParamValue::Flag(_)) => true,
            (ParameterKind::Text { .. }, ParamValue::Text(_)) => true,
            _ => false,
        }
    }

    pub(crate) fn expected_type(&self) -> &'static str {
        match self.kind {
            ParameterKind::Number { .. } => "number",
            ParameterKind::Select { .. } => "one of the listed options",
            ParameterKind::Boolean { .. } => "boolean",
            ParameterKind::Text { .. } => "text",
            ParameterKind::Formula(_) => "calculated value",
        }
    }
}

/// A concrete parameter value inside a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Flag(bool),
    Text(String),
}

impl ParamValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            ParamValue::Flag(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Number(v)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Flag(b)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_accepts_only_listed_options() {
        let def = ParameterDefinition {
            id: "Currency_00",
            name: "Currency",
            category: Category::Project,
            kind: ParameterKind::Select {
                options: &["EUR", "USD", "GBP"],
                default: "EUR",
            },
        };

        assert!(def.accepts(&ParamValue::from("GBP")));
        assert!(!def.accepts(&ParamValue::from("JPY")));
        assert!(!def.accepts(&ParamValue::Number(1.0)));
        assert_eq!(def.default_value(), Some(ParamValue::from("EUR")));
    }

    #[test]
    fn test_param_value_untagged_json() {
        let values: Vec<ParamValue> = serde_json::from_str(r#"[1.5, true, "GBP"]"#).unwrap();
        assert_eq!(values[0], ParamValue::Number(1.5));
        assert_eq!(values[1], ParamValue::Flag(true));
        assert_eq!(values[2], ParamValue::from("GBP"));
    }
}
