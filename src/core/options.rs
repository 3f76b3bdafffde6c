/*
 * The option model shared by every dialog operation.
 *
 * Callers describe a dialog as a list of `DialogOption` commands. Resolving
 * them is a strict left fold over a default `Options` record: commands are
 * applied in order and a later command overwrites the field an earlier one
 * set. No command reads another field, so commands touching different fields
 * commute. Platform defaults for unset fields are chosen by the adapters, not
 * here; an unset string field stays `None`, which is distinct from
 * `Some(String::new())`.
 */
use super::color::Rgb;
use super::context::DialogContext;
use super::file_filter::FileFilters;
use std::path::PathBuf;

// The stock dialog icons. "No icon" is `Option::None` on `Options::icon`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogIcon {
    Error,
    Warning,
    Info,
    Question,
}

impl DialogIcon {
    /*
     * Maps the icon names accepted on the command line (`error`,
     * `dialog-error`, ...) to an icon. Unknown names yield `None`.
     */
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "error" | "dialog-error" => Some(DialogIcon::Error),
            "warning" | "dialog-warning" => Some(DialogIcon::Warning),
            "info" | "dialog-information" => Some(DialogIcon::Info),
            "question" | "dialog-question" => Some(DialogIcon::Question),
            _ => None,
        }
    }

    pub(crate) fn freedesktop_name(self) -> &'static str {
        match self {
            DialogIcon::Error => "dialog-error",
            DialogIcon::Warning => "dialog-warning",
            DialogIcon::Info => "dialog-information",
            DialogIcon::Question => "dialog-question",
        }
    }
}

/// The resolved configuration of one dialog call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    // General
    pub title: Option<String>,

    // File selection
    pub filename: Option<String>,
    pub directory: bool,
    pub confirm_overwrite: bool,
    pub confirm_create: bool,
    pub show_hidden: bool,
    pub file_filters: FileFilters,
    pub multiple_selection: bool,

    // Color selection
    pub color: Option<Rgb>,
    pub show_palette: bool,

    // Messages
    pub icon: Option<DialogIcon>,
    pub ok_label: Option<String>,
    pub cancel_label: Option<String>,
    pub extra_button: Option<String>,
    pub no_wrap: bool,
    pub ellipsize: bool,
    pub default_cancel: bool,

    pub context: Option<DialogContext>,
    /// Replaces the helper program (`zenity`, `osascript`) on platforms that use one.
    pub program: Option<PathBuf>,
}

impl Options {
    /// Folds `options` over a default record, in order.
    pub fn apply<I>(options: I) -> Self
    where
        I: IntoIterator<Item = DialogOption>,
    {
        options.into_iter().fold(Options::default(), |mut acc, opt| {
            opt.apply_to(&mut acc);
            acc
        })
    }
}

/*
 * A single configuration command. Construct these with the free functions
 * below (`title`, `icon`, ...) rather than naming the variants directly.
 */
#[derive(Debug, Clone, PartialEq)]
pub enum DialogOption {
    Title(String),
    Icon(DialogIcon),
    OkLabel(String),
    CancelLabel(String),
    ExtraButton(String),
    NoWrap,
    Ellipsize,
    DefaultCancel,
    Filename(String),
    Directory,
    ConfirmOverwrite,
    ConfirmCreate,
    ShowHidden,
    FileFilters(FileFilters),
    MultipleSelection,
    Color(Rgb),
    ShowPalette,
    Context(DialogContext),
    Program(PathBuf),
}

impl DialogOption {
    fn apply_to(self, o: &mut Options) {
        match self {
            DialogOption::Title(t) => o.title = Some(t),
            DialogOption::Icon(i) => o.icon = Some(i),
            DialogOption::OkLabel(l) => o.ok_label = Some(l),
            DialogOption::CancelLabel(l) => o.cancel_label = Some(l),
            DialogOption::ExtraButton(l) => o.extra_button = Some(l),
            DialogOption::NoWrap => o.no_wrap = true,
            DialogOption::Ellipsize => o.ellipsize = true,
            DialogOption::DefaultCancel => o.default_cancel = true,
            DialogOption::Filename(f) => o.filename = Some(f),
            DialogOption::Directory => o.directory = true,
            DialogOption::ConfirmOverwrite => o.confirm_overwrite = true,
            DialogOption::ConfirmCreate => o.confirm_create = true,
            DialogOption::ShowHidden => o.show_hidden = true,
            DialogOption::FileFilters(f) => o.file_filters = f,
            DialogOption::MultipleSelection => o.multiple_selection = true,
            DialogOption::Color(c) => o.color = Some(c),
            DialogOption::ShowPalette => o.show_palette = true,
            DialogOption::Context(c) => o.context = Some(c),
            DialogOption::Program(p) => o.program = Some(p),
        }
    }
}

/// Sets the dialog title.
pub fn title(title: impl Into<String>) -> DialogOption {
    DialogOption::Title(title.into())
}

/// Sets the dialog icon.
pub fn icon(icon: DialogIcon) -> DialogOption {
    DialogOption::Icon(icon)
}

/// Sets the label of the OK button.
pub fn ok_label(label: impl Into<String>) -> DialogOption {
    DialogOption::OkLabel(label.into())
}

/// Sets the label of the Cancel button.
pub fn cancel_label(label: impl Into<String>) -> DialogOption {
    DialogOption::CancelLabel(label.into())
}

/*
 * Adds an extra button to a message dialog. Pressing it makes the operation
 * return `DialogError::ExtraButton`; the caller already knows the label.
 */
pub fn extra_button(label: impl Into<String>) -> DialogOption {
    DialogOption::ExtraButton(label.into())
}

/// Disables text wrapping (zenity only).
pub fn no_wrap() -> DialogOption {
    DialogOption::NoWrap
}

/// Enables ellipsizing of the dialog text (zenity only).
pub fn ellipsize() -> DialogOption {
    DialogOption::Ellipsize
}

/// Gives the Cancel button focus by default.
pub fn default_cancel() -> DialogOption {
    DialogOption::DefaultCancel
}

/// Sets the initial file name or directory of a picker.
pub fn filename(filename: impl Into<String>) -> DialogOption {
    DialogOption::Filename(filename.into())
}

/// Turns a file picker into a directory picker.
pub fn directory() -> DialogOption {
    DialogOption::Directory
}

/// Asks for confirmation before returning an existing file from a save picker.
pub fn confirm_overwrite() -> DialogOption {
    DialogOption::ConfirmOverwrite
}

/// Asks for confirmation before returning a file that does not exist (Windows only).
pub fn confirm_create() -> DialogOption {
    DialogOption::ConfirmCreate
}

/// Shows hidden files (Windows and macOS only).
pub fn show_hidden() -> DialogOption {
    DialogOption::ShowHidden
}

pub fn file_filters(filters: impl Into<FileFilters>) -> DialogOption {
    DialogOption::FileFilters(filters.into())
}

/*
 * Allows selecting several entries. `select_file_multiple` sets this itself
 * and the single-path pickers clear it.
 */
pub fn multiple_selection() -> DialogOption {
    DialogOption::MultipleSelection
}

/// Sets the initial color of a color picker.
pub fn color(color: Rgb) -> DialogOption {
    DialogOption::Color(color)
}

/// Shows the palette of a color picker.
pub fn show_palette() -> DialogOption {
    DialogOption::ShowPalette
}

/// Attaches a context that can dismiss the dialog.
pub fn context(ctx: DialogContext) -> DialogOption {
    DialogOption::Context(ctx)
}

pub fn program(path: impl Into<PathBuf>) -> DialogOption {
    DialogOption::Program(path.into())
}
