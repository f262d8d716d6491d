//! Element locator strategies.
//!
//! Provides Selenium-like `By` locators for finding elements, including
//! the Appium-specific accessibility-id strategy.
//!
//! # Example
//!
//! ```ignore
//! use appdriver::By;
//!
//! // Resource/element ID
//! let field = session.find_element(By::id("username")).await?;
//!
//! // Accessibility ID (content-desc on Android, accessibility label on iOS)
//! let button = session.find_element(By::accessibility_id("Submit")).await?;
//!
//! // XPath
//! let cell = session.find_element(By::xpath("//android.widget.TextView[2]")).await?;
//!
//! // Strategy resolved from an external element repository
//! let by = By::from_strategy("accessibilityId", "Submit")?;
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// By Enum
// ============================================================================

/// Element locator strategy.
///
/// The strategy set is closed: locators defined externally (e.g. in JSON
/// element repositories) are resolved through [`By::from_strategy`], which
/// rejects unknown strategy names at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", content = "value")]
pub enum By {
    /// Element ID / resource ID.
    #[serde(rename = "id")]
    Id(String),

    /// Name attribute.
    #[serde(rename = "name")]
    Name(String),

    /// XPath expression.
    ///
    /// # Example
    /// ```ignore
    /// By::xpath("//android.widget.Button[@text='OK']")
    /// ```
    #[serde(rename = "xpath")]
    XPath(String),

    /// Class name (native widget class on mobile).
    #[serde(rename = "className")]
    ClassName(String),

    /// CSS selector (webview / browser contexts).
    #[serde(rename = "cssSelector")]
    Css(String),

    /// Tag name.
    #[serde(rename = "tagName")]
    TagName(String),

    /// Link text (for anchor elements in web contexts).
    #[serde(rename = "linkText")]
    LinkText(String),

    /// Partial link text.
    #[serde(rename = "partialLinkText")]
    PartialLinkText(String),

    /// Accessibility ID.
    ///
    /// Maps to `content-desc` on Android and the accessibility identifier
    /// on iOS.
    #[serde(rename = "accessibilityId")]
    AccessibilityId(String),
}

impl By {
    /// Creates an ID locator.
    #[inline]
    pub fn id(value: impl Into<String>) -> Self {
        Self::Id(value.into())
    }

    /// Creates a name attribute locator.
    #[inline]
    pub fn name(value: impl Into<String>) -> Self {
        Self::Name(value.into())
    }

    /// Creates an XPath locator.
    #[inline]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// Creates a class name locator.
    #[inline]
    pub fn class_name(value: impl Into<String>) -> Self {
        Self::ClassName(value.into())
    }

    /// Creates a CSS selector locator.
    #[inline]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Creates a tag name locator.
    #[inline]
    pub fn tag_name(value: impl Into<String>) -> Self {
        Self::TagName(value.into())
    }

    /// Creates a link text locator.
    #[inline]
    pub fn link_text(value: impl Into<String>) -> Self {
        Self::LinkText(value.into())
    }

    /// Creates a partial link text locator.
    #[inline]
    pub fn partial_link_text(value: impl Into<String>) -> Self {
        Self::PartialLinkText(value.into())
    }

    /// Creates an accessibility ID locator.
    #[inline]
    pub fn accessibility_id(value: impl Into<String>) -> Self {
        Self::AccessibilityId(value.into())
    }

    /// Resolves a strategy name and value pair into a locator.
    ///
    /// Used when locator strategies are defined externally and must be
    /// converted at runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLocatorStrategy`] if `strategy` is not one
    /// of the supported strategy names.
    pub fn from_strategy(strategy: &str, value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        match strategy {
            "id" => Ok(Self::Id(value)),
            "name" => Ok(Self::Name(value)),
            "xpath" => Ok(Self::XPath(value)),
            "className" => Ok(Self::ClassName(value)),
            "cssSelector" => Ok(Self::Css(value)),
            "tagName" => Ok(Self::TagName(value)),
            "linkText" => Ok(Self::LinkText(value)),
            "partialLinkText" => Ok(Self::PartialLinkText(value)),
            "accessibilityId" => Ok(Self::AccessibilityId(value)),
            other => Err(Error::invalid_locator_strategy(other)),
        }
    }

    /// Returns the wire-protocol `using` string for this strategy.
    #[must_use]
    pub fn using(&self) -> &'static str {
        match self {
            Self::Id(_) => "id",
            Self::Name(_) => "name",
            Self::XPath(_) => "xpath",
            Self::ClassName(_) => "class name",
            Self::Css(_) => "css selector",
            Self::TagName(_) => "tag name",
            Self::LinkText(_) => "link text",
            Self::PartialLinkText(_) => "partial link text",
            Self::AccessibilityId(_) => "accessibility id",
        }
    }

    /// Returns the locator value.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Id(v)
            | Self::Name(v)
            | Self::XPath(v)
            | Self::ClassName(v)
            | Self::Css(v)
            | Self::TagName(v)
            | Self::LinkText(v)
            | Self::PartialLinkText(v)
            | Self::AccessibilityId(v) => v,
        }
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.using(), self.value())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_id() {
        let by = By::id("username");
        assert_eq!(by.using(), "id");
        assert_eq!(by.value(), "username");
    }

    #[test]
    fn test_by_accessibility_id() {
        let by = By::accessibility_id("Submit");
        assert_eq!(by.using(), "accessibility id");
        assert_eq!(by.value(), "Submit");
    }

    #[test]
    fn test_by_xpath() {
        let by = By::xpath("//button");
        assert_eq!(by.using(), "xpath");
        assert_eq!(by.value(), "//button");
    }

    #[test]
    fn test_wire_using_strings() {
        assert_eq!(By::class_name("a").using(), "class name");
        assert_eq!(By::css("#a").using(), "css selector");
        assert_eq!(By::tag_name("a").using(), "tag name");
        assert_eq!(By::link_text("a").using(), "link text");
        assert_eq!(By::partial_link_text("a").using(), "partial link text");
        assert_eq!(By::name("a").using(), "name");
    }

    #[test]
    fn test_from_strategy_resolves_all() {
        let cases = [
            ("id", By::id("v")),
            ("name", By::name("v")),
            ("xpath", By::xpath("v")),
            ("className", By::class_name("v")),
            ("cssSelector", By::css("v")),
            ("tagName", By::tag_name("v")),
            ("linkText", By::link_text("v")),
            ("partialLinkText", By::partial_link_text("v")),
            ("accessibilityId", By::accessibility_id("v")),
        ];

        for (strategy, expected) in cases {
            assert_eq!(By::from_strategy(strategy, "v").unwrap(), expected);
        }
    }

    #[test]
    fn test_from_strategy_rejects_unknown() {
        let err = By::from_strategy("telepathy", "v").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidLocatorStrategy { strategy } if strategy == "telepathy"
        ));
    }
}
