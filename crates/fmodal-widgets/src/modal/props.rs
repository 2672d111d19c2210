#![forbid(unsafe_code)]

//! Modal configuration.
//!
//! [`ModalProps`] holds everything about a modal except its open flag, its
//! close callback and its body, which are passed to
//! [`ModalController`](super::ModalController) directly.
//!
//! With the `config` feature, props can be loaded from JSON or TOML. Missing
//! keys take their defaults:
//!
//! ```toml
//! title = "Saved"
//! close_text = "OK"
//! max_width = 320
//! fade_duration_ms = 150
//! close_on_backdrop = false
//! ```

use std::time::Duration;

/// Heading shown when the caller does not supply one.
pub const DEFAULT_TITLE: &str = "Success!";
/// Label of the close control when the caller does not supply one.
pub const DEFAULT_CLOSE_TEXT: &str = "Close";
/// Width cap applied when `max_width` is unset.
pub const DEFAULT_MAX_WIDTH: u16 = 400;
/// Length of both the enter and exit transitions.
pub const DEFAULT_FADE_DURATION_MS: u64 = 300;

/// Modal configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct ModalProps {
    /// Heading; an empty string omits the heading entirely.
    pub title: String,
    pub close_text: String,
    /// Width cap; `None` means [`DEFAULT_MAX_WIDTH`].
    pub max_width: Option<u16>,
    /// Passed through to the content container for caller styling hooks.
    pub class_name: String,
    pub fade_duration_ms: u64,
    pub close_on_backdrop: bool,
    pub close_on_escape: bool,
}

impl Default for ModalProps {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_owned(),
            close_text: DEFAULT_CLOSE_TEXT.to_owned(),
            max_width: None,
            class_name: String::new(),
            fade_duration_ms: DEFAULT_FADE_DURATION_MS,
            close_on_backdrop: true,
            close_on_escape: true,
        }
    }
}

impl ModalProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn close_text(mut self, text: impl Into<String>) -> Self {
        self.close_text = text.into();
        self
    }

    pub fn max_width(mut self, width: u16) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn class_name(mut self, class: impl Into<String>) -> Self {
        self.class_name = class.into();
        self
    }

    /// Set the enter/exit transition length (millisecond precision).
    pub fn fade_duration(mut self, duration: Duration) -> Self {
        self.fade_duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn close_on_backdrop(mut self, close: bool) -> Self {
        self.close_on_backdrop = close;
        self
    }

    pub fn close_on_escape(mut self, close: bool) -> Self {
        self.close_on_escape = close;
        self
    }

    /// The transition length as a [`Duration`].
    #[inline]
    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.fade_duration_ms)
    }

    /// The width cap actually rendered.
    #[inline]
    pub fn effective_max_width(&self) -> u16 {
        self.max_width.unwrap_or(DEFAULT_MAX_WIDTH)
    }

    /// The heading, or `None` when it should not render.
    pub fn title_text(&self) -> Option<&str> {
        (!self.title.is_empty()).then_some(self.title.as_str())
    }
}

#[cfg(feature = "config")]
mod load {
    use super::ModalProps;

    /// Errors from loading [`ModalProps`].
    #[derive(Debug, thiserror::Error)]
    pub enum ConfigError {
        #[error("invalid modal config JSON: {0}")]
        Json(#[from] serde_json::Error),
        #[error("invalid modal config TOML: {0}")]
        Toml(#[from] toml::de::Error),
        #[error("max_width must be greater than zero")]
        ZeroMaxWidth,
    }

    impl ModalProps {
        /// Parse and validate props from a JSON object.
        pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
            let props: Self = serde_json::from_str(input)?;
            props.validate()?;
            Ok(props)
        }

        /// Parse and validate props from a TOML table.
        pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
            let props: Self = toml::from_str(input)?;
            props.validate()?;
            Ok(props)
        }

        /// Reject values that cannot render.
        pub fn validate(&self) -> Result<(), ConfigError> {
            if self.max_width == Some(0) {
                return Err(ConfigError::ZeroMaxWidth);
            }
            Ok(())
        }
    }
}

#[cfg(feature = "config")]
pub use load::ConfigError;
