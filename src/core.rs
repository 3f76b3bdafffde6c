/*
 * This module consolidates the platform-agnostic parts of the dialog library:
 * the option set and its constructors, the error taxonomy, the cancellation
 * context, the internal tri-state outcome every adapter reports, and the
 * value types (colors, file filters) shared by all back-ends. It also holds
 * the UTF-16 buffer helpers used by the Win32 adapter, kept here so they can
 * be tested on any platform, and the settings used by the command-line tool.
 */
pub mod color;
pub mod config;
pub mod context;
pub mod error;
pub mod file_filter;
pub mod options;
pub mod outcome;
pub mod path_utils;
pub mod wide_buffer;

pub use color::Rgb;
pub use context::DialogContext;
pub use error::{ContextError, DialogError, Result};
pub use file_filter::{FileFilter, FileFilters};
pub use options::{DialogIcon, DialogOption, Options};
pub use outcome::{MessageReply, RawOutcome};

// Re-export config related items
pub use config::{ConfigError, ConfigManagerOperations, CoreConfigManager, Settings};
