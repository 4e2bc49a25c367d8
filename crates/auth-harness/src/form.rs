//! Form interaction driver
//!
//! Locates fields and controls from configured [`FieldLocator`]s, mutates
//! their contents, and reads back the observable validation state the suites
//! assert on. All element lookups honor the session's implicit wait: a
//! bounded retry loop, failing with [`HarnessError::ElementNotFound`] when
//! the budget is spent.
//!
//! A click is never an exception-driven branch. [`FieldHandle::click`]
//! returns [`ClickOutcome`], so "the button refused the click" is an ordinary
//! value that negative-path cases can treat as a pass.

use chromiumoxide::{Element, Page};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::config::{PageSelectors, ValidationConfig};
use crate::error::{HarnessError, HarnessResult};
use crate::page::{Tab, WaitCondition};

/// Where a field or control lives on a page
///
/// Stable for the lifetime of a suite; resolved fresh on every navigation.
/// Deserialized from configuration, never constructed from literals inside
/// suite logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldLocator {
    /// The n-th element matching a CSS selector (for pages that render the
    /// same id more than once)
    Nth { css: String, index: usize },
    /// A CSS selector
    Css { css: String },
    /// An element id
    Id { id: String },
}

impl FieldLocator {
    /// The CSS selector this locator queries with
    pub fn selector(&self) -> String {
        match self {
            FieldLocator::Nth { css, .. } => css.clone(),
            FieldLocator::Css { css } => css.clone(),
            FieldLocator::Id { id } => format!("#{}", id),
        }
    }

    /// Human-readable form for logs and error messages
    pub fn describe(&self) -> String {
        match self {
            FieldLocator::Nth { css, index } => format!("{}[{}]", css, index),
            FieldLocator::Css { css } => css.clone(),
            FieldLocator::Id { id } => format!("#{}", id),
        }
    }

    /// One lookup attempt. Absence is `Ok(None)` so that polling loops keep
    /// retrying until their own deadline decides. The automation layer
    /// reports "nothing matched" as an error too; only failures that classify
    /// as absence are folded, anything else surfaces as a transport error.
    pub(crate) async fn resolve(&self, page: &Page) -> HarnessResult<Option<Element>> {
        match self {
            FieldLocator::Nth { css, index } => match page.find_elements(css.as_str()).await {
                Ok(mut elements) => {
                    if *index < elements.len() {
                        Ok(Some(elements.swap_remove(*index)))
                    } else {
                        Ok(None)
                    }
                }
                Err(e) if is_absence_failure(&e.to_string()) => Ok(None),
                Err(e) => Err(e.into()),
            },
            _ => match page.find_element(self.selector()).await {
                Ok(element) => Ok(Some(element)),
                Err(e) if is_absence_failure(&e.to_string()) => Ok(None),
                Err(e) => Err(e.into()),
            },
        }
    }
}

/// A live reference to a located element
#[derive(Debug)]
pub struct FieldHandle {
    element: Element,
    description: String,
}

/// Snapshot of a field's observable state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldState {
    /// The element's CSS class list
    pub css_classes: Vec<String>,
    /// The element's inner text, trimmed
    pub text: String,
    /// Whether the element is rendered and visible
    pub is_displayed: bool,
    /// Whether the element accepts interaction (`!disabled`)
    pub is_enabled: bool,
}

impl FieldState {
    /// Whether the class list carries the configured invalid-marker class
    pub fn is_invalid(&self, marker_class: &str) -> bool {
        self.css_classes.iter().any(|c| c == marker_class)
    }
}

/// The result of dispatching a click
///
/// `Rejected` is an expected outcome in negative-path cases (disabled or
/// obscured submit controls), distinct from transport errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click was dispatched
    Clicked,
    /// The control refused the click; the reason text says why
    Rejected(String),
}

impl ClickOutcome {
    pub fn was_rejected(&self) -> bool {
        matches!(self, ClickOutcome::Rejected(_))
    }
}

const STATE_JS: &str = r#"function() {
    const rect = this.getBoundingClientRect();
    const style = window.getComputedStyle(this);
    return JSON.stringify({
        displayed: rect.width > 0 && rect.height > 0
            && style.visibility !== 'hidden' && style.display !== 'none',
        enabled: !this.disabled
    });
}"#;

const CLEAR_JS: &str = r#"function() {
    this.value = '';
    this.dispatchEvent(new Event('input', { bubbles: true }));
    this.dispatchEvent(new Event('change', { bubbles: true }));
}"#;

#[derive(Deserialize)]
struct JsState {
    displayed: bool,
    enabled: bool,
}

async fn eval_state(element: &Element) -> HarnessResult<JsState> {
    let returns = element.call_js_fn(STATE_JS, false).await?;
    let raw = returns
        .result
        .value
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default();
    serde_json::from_str(&raw)
        .map_err(|e| HarnessError::Config(format!("unreadable element state: {}", e)))
}

pub(crate) async fn element_is_displayed(element: &Element) -> HarnessResult<bool> {
    Ok(eval_state(element).await?.displayed)
}

/// Failure texts the automation layer produces when a lookup simply matched
/// nothing. A dead connection or protocol fault does not classify, so it
/// escapes the retry loop instead of burning the whole implicit wait.
fn is_absence_failure(reason: &str) -> bool {
    const MARKERS: [&str; 3] = ["not found", "could not find node", "no node"];
    let reason = reason.to_ascii_lowercase();
    MARKERS.iter().any(|m| reason.contains(m))
}

/// Failure texts the automation layer produces when an element is present but
/// cannot take the click. Anything else is an unanticipated transport error.
fn is_interactability_failure(reason: &str) -> bool {
    const MARKERS: [&str; 4] = [
        "not clickable",
        "not visible",
        "could not compute content quads",
        "not interactable",
    ];
    let reason = reason.to_ascii_lowercase();
    MARKERS.iter().any(|m| reason.contains(m))
}

impl FieldHandle {
    /// Empty the field, firing the input events client-side validation
    /// listens for
    pub async fn clear(&self) -> HarnessResult<()> {
        debug!("Clearing {}", self.description);
        self.element.call_js_fn(CLEAR_JS, false).await?;
        Ok(())
    }

    /// Append keystrokes to the field (does not clear first)
    pub async fn type_text(&self, text: &str) -> HarnessResult<()> {
        debug!("Typing into {}", self.description);
        self.element.focus().await?;
        self.element.type_str(text).await?;
        Ok(())
    }

    /// Dispatch a click, reporting refusal as a value
    pub async fn click(&self) -> HarnessResult<ClickOutcome> {
        let state = self.read_state().await?;
        if !state.is_enabled {
            debug!("Click on {} rejected: control is disabled", self.description);
            return Ok(ClickOutcome::Rejected(format!(
                "{} is disabled",
                self.description
            )));
        }

        match self.element.click().await {
            Ok(_) => Ok(ClickOutcome::Clicked),
            Err(e) if is_interactability_failure(&e.to_string()) => {
                debug!("Click on {} rejected: {}", self.description, e);
                Ok(ClickOutcome::Rejected(e.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Snapshot the observable state used by assertions
    pub async fn read_state(&self) -> HarnessResult<FieldState> {
        let class_attr = self.element.attribute("class").await?.unwrap_or_default();
        let text = self.element.inner_text().await?.unwrap_or_default();
        let js_state = eval_state(&self.element).await?;

        Ok(FieldState {
            css_classes: class_attr.split_whitespace().map(str::to_string).collect(),
            text: text.trim().to_string(),
            is_displayed: js_state.displayed,
            is_enabled: js_state.enabled,
        })
    }

    /// The locator description this handle was resolved from
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl Tab {
    /// Resolve a locator to a live element, honoring the implicit wait
    ///
    /// # Errors
    ///
    /// [`HarnessError::ElementNotFound`] if nothing matches within the
    /// implicit timeout.
    pub async fn locate(&self, locator: &FieldLocator) -> HarnessResult<FieldHandle> {
        let timeout = self.timeouts().implicit();
        let deadline = Instant::now() + timeout;

        loop {
            if let Some(element) = locator.resolve(self.page()).await? {
                return Ok(FieldHandle {
                    element,
                    description: locator.describe(),
                });
            }
            if Instant::now() >= deadline {
                return Err(HarnessError::ElementNotFound {
                    selector: locator.describe(),
                    timeout,
                });
            }
            tokio::time::sleep(self.timeouts().poll()).await;
        }
    }

    /// Click the page's configured submit control
    pub async fn submit(&self, selectors: &PageSelectors) -> HarnessResult<ClickOutcome> {
        let control = self.locate(&selectors.submit).await?;
        control.click().await
    }
}

/// A single table-driven test case: named inputs plus the expected outcome
///
/// Immutable once defined; consumed once per run against a freshly navigated
/// page.
#[derive(Debug, Clone)]
pub struct FormCase {
    /// What this case demonstrates
    pub description: String,
    /// Field values by logical field name, applied in order
    pub fields: Vec<(String, String)>,
    /// The outcome the case asserts
    pub expected: ExpectedOutcome,
}

impl FormCase {
    pub fn new(description: &str, fields: &[(&str, &str)], expected: ExpectedOutcome) -> Self {
        Self {
            description: description.to_string(),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            expected,
        }
    }
}

/// What a table-driven case expects to observe
#[derive(Debug, Clone, PartialEq)]
pub enum ExpectedOutcome {
    /// The named field carries / does not carry the invalid marker
    FieldValid { field: String, valid: bool },
    /// The inline error element shows / does not show the given text
    ErrorShown { text: String, shown: bool },
    /// The submit control is enabled / disabled
    SubmitEnabled(bool),
}

/// What was actually observed for an [`ExpectedOutcome`]
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    FieldValidity { field: String, valid: bool },
    ErrorMessage { shown: bool },
    SubmitEnabled(bool),
}

impl ExpectedOutcome {
    /// Read the corresponding observable state off the page
    pub async fn observe(
        &self,
        tab: &Tab,
        selectors: &PageSelectors,
        validation: &ValidationConfig,
    ) -> HarnessResult<ValidationOutcome> {
        match self {
            ExpectedOutcome::FieldValid { field, .. } => {
                let handle = tab.locate(selectors.field(field)?).await?;
                let state = handle.read_state().await?;
                Ok(ValidationOutcome::FieldValidity {
                    field: field.clone(),
                    valid: !state.is_invalid(&validation.invalid_marker_class),
                })
            }
            ExpectedOutcome::ErrorShown { text, .. } => {
                let condition = WaitCondition::ElementTextIs {
                    locator: FieldLocator::Css {
                        css: validation.error_message_selector.clone(),
                    },
                    text: text.clone(),
                };
                // Bounded wait either way: the message gets the settle window
                // to appear, and its absence after that window is itself an
                // observation.
                let absent = tab.confirm_absent(&condition).await?;
                Ok(ValidationOutcome::ErrorMessage { shown: !absent })
            }
            ExpectedOutcome::SubmitEnabled(_) => {
                let control = tab.locate(&selectors.submit).await?;
                let state = control.read_state().await?;
                Ok(ValidationOutcome::SubmitEnabled(state.is_enabled))
            }
        }
    }

    /// Whether an observation satisfies this expectation
    pub fn matches(&self, observed: &ValidationOutcome) -> bool {
        match (self, observed) {
            (
                ExpectedOutcome::FieldValid { valid: expected, .. },
                ValidationOutcome::FieldValidity { valid: actual, .. },
            ) => expected == actual,
            (
                ExpectedOutcome::ErrorShown { shown: expected, .. },
                ValidationOutcome::ErrorMessage { shown: actual },
            ) => expected == actual,
            (
                ExpectedOutcome::SubmitEnabled(expected),
                ValidationOutcome::SubmitEnabled(actual),
            ) => expected == actual,
            _ => false,
        }
    }

    /// Human-readable form for assertion messages
    pub fn describe(&self) -> String {
        match self {
            ExpectedOutcome::FieldValid { field, valid: true } => format!("field '{field}' valid"),
            ExpectedOutcome::FieldValid { field, valid: false } => {
                format!("field '{field}' invalid")
            }
            ExpectedOutcome::ErrorShown { text, shown: true } => format!("error '{text}' shown"),
            ExpectedOutcome::ErrorShown { text, shown: false } => {
                format!("error '{text}' not shown")
            }
            ExpectedOutcome::SubmitEnabled(true) => "submit control enabled".to_string(),
            ExpectedOutcome::SubmitEnabled(false) => "submit control disabled".to_string(),
        }
    }
}

/// Clear and fill every field of a case, in order
pub async fn fill_form(
    tab: &Tab,
    selectors: &PageSelectors,
    fields: &[(String, String)],
) -> HarnessResult<()> {
    for (name, value) in fields {
        let handle = tab.locate(selectors.field(name)?).await?;
        handle.clear().await?;
        handle.type_text(value).await?;
    }
    Ok(())
}
