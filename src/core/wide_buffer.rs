/*
 * UTF-16 buffer protocol used by the Win32 common dialogs.
 *
 * The Win32 adapter exchanges strings with the OS through null-terminated
 * wide-character buffers. This module holds the encoding and decoding rules
 * so they can be exercised on every target:
 *  - filter lists: `name\0pat1;pat2;\0` per filter, closed by an extra `\0`;
 *  - multi-select results: either one path, or a directory followed by file
 *    names, each null-terminated, closed by a second consecutive `\0`.
 * Malformed buffers are reported as `DialogError::Decode`, never as a panic.
 */
use super::error::{DialogError, Result};
use super::file_filter::FileFilters;

/// Size in `u16` units of the result buffer for single-path pickers.
pub const PATH_BUF_LEN: usize = 32_768;

/// Size in `u16` units of the result buffer for multi-select pickers.
pub const MULTI_SELECT_BUF_LEN: usize = PATH_BUF_LEN + 1024 * 256;

/// Encodes `s` as UTF-16 with a trailing null.
pub fn encode_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/*
 * Builds the double-null-terminated filter buffer for `OPENFILENAMEW`.
 * Every pattern is followed by `;`, matching what the common dialog accepts.
 * A nameless filter is labelled with its patterns, since an empty label would
 * read as the end of the list. An empty filter list yields `None` so the
 * caller passes a null pointer and the dialog falls back to showing all files.
 */
pub fn filter_buffer(filters: &FileFilters) -> Option<Vec<u16>> {
    if filters.is_empty() {
        return None;
    }
    let mut buf = Vec::new();
    for filter in filters {
        if filter.name.is_empty() {
            buf.extend(filter.patterns.join(" ").encode_utf16());
        } else {
            buf.extend(filter.name.encode_utf16());
        }
        buf.push(0);
        for pattern in &filter.patterns {
            buf.extend(pattern.encode_utf16());
            buf.push(u16::from(b';'));
        }
        buf.push(0);
    }
    buf.push(0);
    Some(buf)
}

/*
 * Copies `name` into the start of a result buffer so the dialog shows it as
 * the initial file name. At least one trailing null is always preserved; a
 * name that does not fit is rejected rather than truncated.
 */
pub fn prefill(buffer: &mut [u16], name: &str) -> Result<()> {
    let encoded: Vec<u16> = name.encode_utf16().collect();
    if encoded.len() >= buffer.len() {
        return Err(DialogError::Decode(format!(
            "initial file name is longer than {} characters",
            buffer.len().saturating_sub(1)
        )));
    }
    buffer[..encoded.len()].copy_from_slice(&encoded);
    buffer[encoded.len()] = 0;
    Ok(())
}

/// Decodes the first null-terminated string of `buffer`.
pub fn string_from_wide(buffer: &[u16]) -> Result<String> {
    let len = buffer
        .iter()
        .position(|&c| c == 0)
        .ok_or_else(|| DialogError::Decode("wide string is not null-terminated".into()))?;
    String::from_utf16(&buffer[..len])
        .map_err(|e| DialogError::Decode(format!("invalid UTF-16 in dialog result: {e}")))
}

/*
 * Splits a multi-select result into full paths.
 *
 * Null-delimited runs are collected until the double-null terminator. With
 * more than one run, the first is the directory and every following run is a
 * file name inside it. With exactly one run, that run already is the full
 * path and is returned unchanged.
 */
pub fn decode_multi_select(buffer: &[u16]) -> Result<Vec<String>> {
    let mut runs: Vec<&[u16]> = Vec::new();
    let mut start = 0;
    let mut terminated = false;
    for (i, &unit) in buffer.iter().enumerate() {
        if unit != 0 {
            continue;
        }
        if i == start {
            // Empty run: this null directly follows the previous one.
            terminated = true;
            break;
        }
        runs.push(&buffer[start..i]);
        start = i + 1;
    }
    if !terminated {
        return Err(DialogError::Decode(
            "multi-select buffer has no double-null terminator".into(),
        ));
    }

    let mut decoded = runs
        .into_iter()
        .map(|run| {
            String::from_utf16(run)
                .map_err(|e| DialogError::Decode(format!("invalid UTF-16 in dialog result: {e}")))
        })
        .collect::<Result<Vec<String>>>()?;

    if decoded.len() <= 1 {
        return Ok(decoded);
    }
    let base = decoded.remove(0);
    Ok(decoded
        .into_iter()
        .map(|name| join_windows_path(&base, &name))
        .collect())
}

fn join_windows_path(base: &str, name: &str) -> String {
    if base.ends_with('\\') || base.ends_with('/') {
        format!("{base}{name}")
    } else {
        format!("{base}\\{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::file_filter::FileFilter;

    fn wide(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    // Inverse of `filter_buffer`, for checking what the dialog will see.
    fn decode_filter_buffer(buf: &[u16]) -> Vec<(String, Vec<String>)> {
        let strings: Vec<String> = buf
            .split(|&c| c == 0)
            .map(String::from_utf16_lossy)
            .collect();
        let mut filters = Vec::new();
        let mut iter = strings.into_iter();
        while let (Some(name), Some(patterns)) = (iter.next(), iter.next()) {
            if name.is_empty() && patterns.is_empty() {
                break;
            }
            let patterns = patterns
                .split(';')
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
            filters.push((name, patterns));
        }
        filters
    }

    #[test]
    fn test_filter_buffer_round_trip() {
        // Arrange
        let filters = FileFilters::from(vec![FileFilter::new("Images", ["*.png", "*.jpg"])]);

        // Act
        let buf = filter_buffer(&filters).expect("non-empty filters produce a buffer");

        // Assert
        assert_eq!(&buf[buf.len() - 2..], &[0, 0], "buffer must end in a double null");
        assert_eq!(
            decode_filter_buffer(&buf),
            vec![(
                "Images".to_string(),
                vec!["*.png".to_string(), "*.jpg".to_string()]
            )]
        );
    }

    #[test]
    fn test_filter_buffer_layout_for_two_filters() {
        let filters = FileFilters::from(vec![
            FileFilter::new("Text", ["*.txt"]),
            FileFilter::new("", ["*.rs", "*.toml"]),
        ]);
        let buf = filter_buffer(&filters).unwrap();
        let mut expected = wide("Text\0*.txt;\0*.rs *.toml\0*.rs;*.toml;\0");
        expected.push(0);
        assert_eq!(buf, expected);
    }

    #[test]
    fn test_empty_filter_list_yields_no_buffer() {
        assert_eq!(filter_buffer(&FileFilters::new()), None);
    }

    #[test]
    fn test_decode_multi_select_joins_base_directory() {
        let buf = wide("C:\\dir\0a.txt\0b.txt\0\0");
        assert_eq!(
            decode_multi_select(&buf).unwrap(),
            vec!["C:\\dir\\a.txt", "C:\\dir\\b.txt"]
        );
    }

    #[test]
    fn test_decode_multi_select_single_path_is_not_joined() {
        let buf = wide("C:\\dir\\a.txt\0\0");
        assert_eq!(decode_multi_select(&buf).unwrap(), vec!["C:\\dir\\a.txt"]);
    }

    #[test]
    fn test_decode_multi_select_root_directory_has_no_doubled_separator() {
        let buf = wide("C:\\\0a.txt\0b.txt\0\0");
        assert_eq!(
            decode_multi_select(&buf).unwrap(),
            vec!["C:\\a.txt", "C:\\b.txt"]
        );
    }

    #[test]
    fn test_decode_multi_select_ignores_garbage_after_terminator() {
        let mut buf = wide("C:\\x.txt\0\0stale\0");
        buf.resize(64, 0);
        assert_eq!(decode_multi_select(&buf).unwrap(), vec!["C:\\x.txt"]);
    }

    #[test]
    fn test_decode_multi_select_in_large_zeroed_buffer() {
        let mut buf = vec![0u16; MULTI_SELECT_BUF_LEN];
        let content = wide("D:\\photos\0one.png\0two.png\0three.png");
        buf[..content.len()].copy_from_slice(&content);
        assert_eq!(decode_multi_select(&buf).unwrap().len(), 3);
    }

    #[test]
    fn test_decode_multi_select_empty_buffer_yields_empty_list() {
        assert_eq!(decode_multi_select(&[0, 0]).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_decode_multi_select_unterminated_is_decode_error() {
        let buf = wide("C:\\dir\0a.txt");
        assert!(matches!(
            decode_multi_select(&buf),
            Err(DialogError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_multi_select_invalid_utf16_is_decode_error() {
        let buf = vec![0xD800, 0, 0];
        assert!(matches!(
            decode_multi_select(&buf),
            Err(DialogError::Decode(_))
        ));
    }

    #[test]
    fn test_prefill_keeps_trailing_null() {
        let mut buf = vec![7u16; 8];
        prefill(&mut buf, "a.txt").unwrap();
        assert_eq!(string_from_wide(&buf).unwrap(), "a.txt");

        let mut tiny = vec![0u16; 3];
        assert!(prefill(&mut tiny, "abc").is_err());
    }

    #[test]
    fn test_string_from_wide_requires_terminator() {
        assert_eq!(string_from_wide(&encode_wide("C:\\x")).unwrap(), "C:\\x");
        assert!(string_from_wide(&wide("abc")).is_err());
    }
}
