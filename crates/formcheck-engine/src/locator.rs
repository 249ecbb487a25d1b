//! Locator descriptors and the logical-field model.
//!
//! A logical field ("the Email input") is a name, an ordered list of
//! alternative locators, and the check its interaction must satisfy. Order
//! encodes priority; adding a fallback strategy is a data change, not a new
//! code path.

use serde::{Deserialize, Serialize};

/// How a selector string is interpreted by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Css,
    XPath,
    Id,
    Name,
    TagName,
}

impl Strategy {
    fn as_str(self) -> &'static str {
        match self {
            Strategy::Css => "css",
            Strategy::XPath => "xpath",
            Strategy::Id => "id",
            Strategy::Name => "name",
            Strategy::TagName => "tag",
        }
    }
}

/// A single query descriptor: strategy plus selector. Pure data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    pub strategy: Strategy,
    pub selector: String,
}

impl Locator {
    pub fn new(strategy: Strategy, selector: impl Into<String>) -> Self {
        Self {
            strategy,
            selector: selector.into(),
        }
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Self::new(Strategy::Css, selector)
    }

    pub fn xpath(selector: impl Into<String>) -> Self {
        Self::new(Strategy::XPath, selector)
    }

    pub fn id(selector: impl Into<String>) -> Self {
        Self::new(Strategy::Id, selector)
    }

    pub fn name(selector: impl Into<String>) -> Self {
        Self::new(Strategy::Name, selector)
    }

    pub fn tag(selector: impl Into<String>) -> Self {
        Self::new(Strategy::TagName, selector)
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.strategy.as_str(), self.selector)
    }
}

/// The check a field's interaction must satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expected {
    /// Element merely has to exist (page-ready anchors).
    Present,
    /// Type this value and read it back verbatim.
    Text(String),
    /// Radio button ends up selected.
    RadioSelected,
    /// Checkbox ends up selected.
    CheckboxSelected,
    /// Set this value on the textarea inside the element's shadow root.
    ShadowText(String),
}

/// A named field with its ranked locator candidates and expected outcome.
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalField {
    pub name: String,
    pub candidates: Vec<Locator>,
    pub expect: Expected,
}

impl LogicalField {
    pub fn new(name: impl Into<String>, candidates: Vec<Locator>, expect: Expected) -> Self {
        Self {
            name: name.into(),
            candidates,
            expect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locator_display_includes_strategy() {
        assert_eq!(Locator::id("fname").to_string(), "id:fname");
        assert_eq!(
            Locator::css("input[type='email']").to_string(),
            "css:input[type='email']"
        );
    }

    #[test]
    fn candidates_keep_insertion_order() {
        let field = LogicalField::new(
            "Email",
            vec![Locator::id("email"), Locator::name("email")],
            Expected::Text("a@b.c".into()),
        );
        assert_eq!(field.candidates[0], Locator::id("email"));
        assert_eq!(field.candidates[1], Locator::name("email"));
    }
}
