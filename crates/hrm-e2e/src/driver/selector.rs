// Selector - Structured element queries
//
// A `SelectorChain` is the driver-independent description of "which element":
// a sequence of descendant queries and filters. Drivers either interpret the
// structure directly (FakeBrowser) or render it to Playwright selector-engine
// syntax, where chain steps are joined with " >> ".

use std::fmt;

/// A single element query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// CSS selector
    Css(String),
    /// ARIA role with optional accessible name (case-insensitive)
    Role { role: String, name: Option<String> },
    /// Element associated with a `<label>` or `aria-label`
    Label(String),
    /// Input by placeholder text
    Placeholder(String),
    /// Element containing text (case-insensitive substring)
    Text(String),
    /// Attribute equality, or substring match when `contains` is set
    Attribute {
        name: String,
        value: String,
        contains: bool,
    },
    /// XPath expression
    XPath(String),
}

impl Selector {
    pub fn css(css: impl Into<String>) -> Self {
        Selector::Css(css.into())
    }

    pub fn role(role: impl Into<String>, name: impl Into<String>) -> Self {
        Selector::Role {
            role: role.into(),
            name: Some(name.into()),
        }
    }

    pub fn label(label: impl Into<String>) -> Self {
        Selector::Label(label.into())
    }

    pub fn placeholder(text: impl Into<String>) -> Self {
        Selector::Placeholder(text.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Selector::Text(text.into())
    }

    pub fn attr(name: impl Into<String>, value: impl Into<String>) -> Self {
        Selector::Attribute {
            name: name.into(),
            value: value.into(),
            contains: false,
        }
    }

    pub fn attr_contains(name: impl Into<String>, value: impl Into<String>) -> Self {
        Selector::Attribute {
            name: name.into(),
            value: value.into(),
            contains: true,
        }
    }

    pub fn xpath(xpath: impl Into<String>) -> Self {
        Selector::XPath(xpath.into())
    }

    /// Renders this query in Playwright selector-engine syntax.
    pub fn to_engine_string(&self) -> String {
        match self {
            Selector::Css(css) => css.clone(),
            Selector::Role { role, name: None } => format!("role={}", role),
            Selector::Role {
                role,
                name: Some(name),
            } => format!("role={}[name={}i]", role, quote(name)),
            Selector::Label(label) => format!("internal:label={}i", quote(label)),
            Selector::Placeholder(text) => {
                format!("internal:attr=[placeholder={}i]", quote(text))
            }
            Selector::Text(text) => format!("internal:text={}i", quote(text)),
            Selector::Attribute {
                name,
                value,
                contains: false,
            } => format!("[{}={}]", name, quote(value)),
            Selector::Attribute {
                name,
                value,
                contains: true,
            } => format!("[{}*={} i]", name, quote(value)),
            Selector::XPath(xpath) => format!("xpath={}", xpath),
        }
    }
}

/// One step of a selector chain
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    /// Descendants of the current set matching the query
    Query(Selector),
    /// The nth element of the current set (negative counts from the end)
    Nth(i32),
    /// Elements of the current set whose text contains the value
    HasText(String),
}

impl Step {
    fn to_engine_string(&self) -> String {
        match self {
            Step::Query(selector) => selector.to_engine_string(),
            Step::Nth(index) => format!("nth={}", index),
            Step::HasText(text) => format!("internal:has-text={}i", quote(text)),
        }
    }
}

/// Ordered sequence of steps resolving to a set of elements
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SelectorChain {
    steps: Vec<Step>,
}

impl SelectorChain {
    pub fn new(selector: Selector) -> Self {
        Self {
            steps: vec![Step::Query(selector)],
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn push(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Appends every step of `other`, scoping it inside this chain.
    pub fn join(mut self, other: &SelectorChain) -> Self {
        self.steps.extend(other.steps.iter().cloned());
        self
    }

    /// Playwright selector-engine rendering of the whole chain
    pub fn to_engine_string(&self) -> String {
        self.steps
            .iter()
            .map(Step::to_engine_string)
            .collect::<Vec<_>>()
            .join(" >> ")
    }
}

impl From<Selector> for SelectorChain {
    fn from(selector: Selector) -> Self {
        SelectorChain::new(selector)
    }
}

impl fmt::Display for SelectorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_engine_string())
    }
}

fn quote(value: &str) -> String {
    // JSON string escaping is what the selector engine expects
    serde_json::Value::String(value.to_string()).to_string()
}
