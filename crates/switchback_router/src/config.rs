//! Configuration for the router.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use switchback_foundation::{Error, Result};

/// Configuration for the router.
///
/// Controls the descriptor grammar and every message the router sends on
/// its own behalf.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RouterConfig {
    /// Descriptor word that binds the next typed parameter.
    pub placeholder: String,

    /// Completions starting with this prefix bypass prefix filtering.
    pub always_shown_prefix: String,

    /// Prefix of every usage line.
    pub command_prefix: String,

    /// First line of a failure report.
    pub help_header: String,

    /// Prefix of each failure reason line.
    pub warning_prefix: String,

    /// Sent when no command word matches.
    pub unknown_command_message: String,

    /// Sent when a command fails without any usable candidate.
    pub no_help_message: String,

    /// Sent when a handler or parser fails internally.
    pub internal_error_message: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            placeholder: "<?>".to_string(),
            always_shown_prefix: "#".to_string(),
            command_prefix: "/".to_string(),
            help_header: "Command help".to_string(),
            warning_prefix: "Warning: ".to_string(),
            unknown_command_message: "Command not found. Try /help for more commands.".to_string(),
            no_help_message: "No help available for this command.".to_string(),
            internal_error_message: "Something went wrong running this command. See the console for details."
                .to_string(),
        }
    }
}

impl RouterConfig {
    /// Checks that the configuration can be used.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the placeholder is empty or contains
    /// whitespace, since descriptors are split on whitespace.
    pub fn validate(&self) -> Result<()> {
        if self.placeholder.is_empty() || self.placeholder.contains(char::is_whitespace) {
            return Err(Error::config(format!(
                "placeholder {:?} must be a single non-empty word",
                self.placeholder
            )));
        }
        Ok(())
    }

    /// Returns true if a completion bypasses prefix filtering.
    #[must_use]
    pub fn is_always_shown(&self, suggestion: &str) -> bool {
        !self.always_shown_prefix.is_empty() && suggestion.starts_with(&self.always_shown_prefix)
    }

    /// Builder method to set the placeholder token.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Builder method to set the always-shown prefix.
    #[must_use]
    pub fn with_always_shown_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.always_shown_prefix = prefix.into();
        self
    }

    /// Builder method to set the usage line prefix.
    #[must_use]
    pub fn with_command_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.command_prefix = prefix.into();
        self
    }

    /// Builder method to set the failure report header.
    #[must_use]
    pub fn with_help_header(mut self, header: impl Into<String>) -> Self {
        self.help_header = header.into();
        self
    }

    /// Builder method to set the warning prefix.
    #[must_use]
    pub fn with_warning_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.warning_prefix = prefix.into();
        self
    }

    /// Builder method to set the unknown-command message.
    #[must_use]
    pub fn with_unknown_command_message(mut self, message: impl Into<String>) -> Self {
        self.unknown_command_message = message.into();
        self
    }

    /// Builder method to set the no-help message.
    #[must_use]
    pub fn with_no_help_message(mut self, message: impl Into<String>) -> Self {
        self.no_help_message = message.into();
        self
    }

    /// Builder method to set the internal-error message.
    #[must_use]
    pub fn with_internal_error_message(mut self, message: impl Into<String>) -> Self {
        self.internal_error_message = message.into();
        self
    }
}
