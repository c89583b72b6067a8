// ABOUTME: In-place rewriting of key=value lines in the properties file.
// ABOUTME: Applies config-changes overrides in insertion order.

use std::path::Path;

use indexmap::IndexMap;

/// Result of applying overrides to a properties document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchReport {
    /// Number of lines rewritten (including lines already holding the value).
    pub matched_lines: usize,
    /// Keys for which no `key=` line exists.
    pub unmatched_keys: Vec<String>,
    /// Whether the document content changed.
    pub changed: bool,
}

/// Replace the value of every line starting with `key=` for each override.
///
/// Only lines beginning exactly with `key=` match, so `foo` leaves
/// `foobar=...` untouched. Line endings and all other lines are preserved.
pub fn patch_properties(content: &str, changes: &IndexMap<String, String>) -> (String, PatchReport) {
    let mut lines: Vec<(String, &str)> = content
        .split_inclusive('\n')
        .map(split_line_ending)
        .map(|(body, ending)| (body.to_string(), ending))
        .collect();

    let mut report = PatchReport::default();

    for (key, value) in changes {
        let prefix = format!("{key}=");
        let mut matched = false;

        for (body, _) in lines.iter_mut().filter(|(body, _)| body.starts_with(&prefix)) {
            *body = format!("{prefix}{value}");
            matched = true;
            report.matched_lines += 1;
        }

        if !matched {
            report.unmatched_keys.push(key.clone());
        }
    }

    let patched: String = lines
        .iter()
        .flat_map(|(body, ending)| [body.as_str(), *ending])
        .collect();
    report.changed = patched != content;

    (patched, report)
}

fn split_line_ending(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

/// Apply `changes` to the file at `path`, rewriting it only if its content
/// changes. An empty override set never touches the file.
pub async fn patch_file(
    path: &Path,
    changes: &IndexMap<String, String>,
) -> std::io::Result<PatchReport> {
    if changes.is_empty() {
        return Ok(PatchReport::default());
    }

    let content = tokio::fs::read_to_string(path).await?;
    let (patched, report) = patch_properties(&content, changes);

    if report.changed {
        tokio::fs::write(path, patched).await?;
    }

    Ok(report)
}
