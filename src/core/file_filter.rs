/*
 * Named pattern lists that restrict which files a picker shows.
 *
 * A `FileFilter` is a display name plus an ordered list of glob patterns. The
 * patterns are handed to the native facility untouched: they are never
 * deduplicated or validated here. Each platform adapter translates the list
 * into its own representation; the translations that are plain text live in
 * this module, the UTF-16 buffer used by Win32 lives in `wide_buffer`.
 */
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileFilter {
    pub name: String,
    pub patterns: Vec<String>,
}

impl FileFilter {
    pub fn new<N, I, P>(name: N, patterns: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        FileFilter {
            name: name.into(),
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /*
     * Renders the value of a zenity `--file-filter` argument:
     * `NAME | PATTERN1 PATTERN2 ...`. A nameless filter is rendered as the
     * bare pattern list, which zenity also accepts.
     */
    pub(crate) fn to_zenity_spec(&self) -> String {
        let patterns = self.patterns.join(" ");
        if self.name.is_empty() {
            patterns
        } else {
            format!("{} | {}", self.name, patterns)
        }
    }
}

/*
 * Parses the command-line form `NAME | PATTERN1 PATTERN2 ...`.
 * Without a `|` the whole value is the pattern list and the name is empty.
 */
impl FromStr for FileFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, patterns) = match s.split_once('|') {
            Some((name, rest)) => (name.trim().to_string(), rest),
            None => (String::new(), s),
        };
        Ok(FileFilter {
            name,
            patterns: patterns.split_whitespace().map(str::to_string).collect(),
        })
    }
}

/// An ordered list of filters, as accepted by the `file_filters` option.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileFilters(pub Vec<FileFilter>);

impl FileFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, filter: FileFilter) {
        self.0.push(filter);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileFilter> {
        self.0.iter()
    }

    /// Turns the accumulated filters into a single option.
    pub fn build(self) -> super::options::DialogOption {
        super::options::DialogOption::FileFilters(self)
    }
}

impl From<Vec<FileFilter>> for FileFilters {
    fn from(filters: Vec<FileFilter>) -> Self {
        FileFilters(filters)
    }
}

impl FromIterator<FileFilter> for FileFilters {
    fn from_iter<T: IntoIterator<Item = FileFilter>>(iter: T) -> Self {
        FileFilters(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FileFilters {
    type Item = &'a FileFilter;
    type IntoIter = std::slice::Iter<'a, FileFilter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/*
 * Flattens filters into the single pattern list the AppleScript chooser
 * takes as `ofType`. Filter names are dropped; the chooser has no notion of
 * named filter groups.
 */
pub(crate) fn apple_patterns(filters: &FileFilters) -> Vec<String> {
    filters
        .iter()
        .flat_map(|f| f.patterns.iter().cloned())
        .collect()
}
