use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Label used for the false branch when an operator has no inverse.
pub const ELSE_LABEL: &str = "Else";

static CONDITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"if\s*\(\s*([A-Za-z_][A-Za-z0-9_]*)\s*(<=|>=|==|!=|<|>)\s*([^\s()]+)\s*\)")
        .expect("condition pattern is valid")
});

/// Comparison operators accepted in conditional expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Equal,
    NotEqual,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
        }
    }
}

impl FromStr for Operator {
    type Err = ();

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "<" => Ok(Operator::LessThan),
            "<=" => Ok(Operator::LessThanOrEqual),
            ">" => Ok(Operator::GreaterThan),
            ">=" => Ok(Operator::GreaterThanOrEqual),
            "==" => Ok(Operator::Equal),
            "!=" => Ok(Operator::NotEqual),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The structured form of a conditional node's expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCondition {
    pub variable: String,
    pub operator: Operator,
    pub value: String,
    pub true_label: String,
    pub false_label: String,
}

impl ParsedCondition {
    /// Picks the branch label for an outgoing edge of the conditional node.
    pub fn label_for_handle(&self, source_handle: Option<&str>) -> &str {
        if source_handle == Some("true") {
            &self.true_label
        } else {
            &self.false_label
        }
    }
}

/// Inversion table for operator tokens: `<=`/`>`, `<`/`>=`, `==`/`!=`.
pub fn invert_operator(token: &str) -> Option<&'static str> {
    match token {
        "<=" => Some(">"),
        ">" => Some("<="),
        "<" => Some(">="),
        ">=" => Some("<"),
        "==" => Some("!="),
        "!=" => Some("=="),
        _ => None,
    }
}

/// Builds the `(true, false)` labels for a comparison.
/// Operators outside the inversion table get [`ELSE_LABEL`] as their false label.
pub fn branch_labels(variable: &str, operator: &str, value: &str) -> (String, String) {
    let true_label = format!("{}{}{}", variable, operator, value);
    let false_label = match invert_operator(operator) {
        Some(inverse) => format!("{}{}{}", variable, inverse, value),
        None => ELSE_LABEL.to_string(),
    };
    (true_label, false_label)
}

/// Extracts `variable op value` from text loosely shaped like `if (Age <= 65) { ... }`.
///
/// Returns `None` when the text does not contain such a comparison.
pub fn parse_condition(text: &str) -> Option<ParsedCondition> {
    let captures = CONDITION_RE.captures(text)?;
    let variable = captures.get(1)?.as_str();
    let operator_token = captures.get(2)?.as_str();
    let value = captures.get(3)?.as_str();
    let operator = operator_token.parse().ok()?;

    let (true_label, false_label) = branch_labels(variable, operator_token, value);
    Some(ParsedCondition {
        variable: variable.to_string(),
        operator,
        value: value.to_string(),
        true_label,
        false_label,
    })
}
