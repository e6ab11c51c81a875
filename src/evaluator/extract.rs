// src/evaluator/extract.rs

use std::collections::HashMap;
use std::ops::Range;
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use regex::Regex;

/// Compiled matchers keyed by entry point. Entry points come from the catalog,
/// so the map stays as small as the catalog.
static MATCHERS: LazyLock<Mutex<HashMap<String, Arc<EntryPointMatcher>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Locates an entry point's definition in submitted source.
#[derive(Debug)]
pub struct EntryPointMatcher {
    declaration: Regex,
    binding: Regex,
}

impl EntryPointMatcher {
    pub fn new(entry_point: &str) -> Result<Self, regex::Error> {
        let name = regex::escape(entry_point);

        let declaration = Regex::new(&format!(r"\b(?:async\s+)?function\s+{}\b", name))?;
        // `$` is a valid identifier character, so `\b` alone is not a safe boundary.
        // The trailing class rejects `==`, `===` and `=>`.
        let binding = Regex::new(&format!(
            r"(?:^|[^A-Za-z0-9_$.])((?:(?:const|let|var)\s+)?{}\s*=)(?:[^=>]|$)",
            name
        ))?;

        Ok(Self {
            declaration,
            binding,
        })
    }

    /// Returns `source` starting at the entry point's definition, dropping any
    /// leading comments or prose left over from the starter template.
    ///
    /// A `function <name>` declaration wins; otherwise the first binding
    /// (`const twoSum = (nums, target) => ...`) is used. Mentions inside
    /// comments never count.
    pub fn isolate<'a>(&self, source: &'a str) -> Option<&'a str> {
        let comments = comment_spans(source);
        let in_code = |start: &usize| !comments.iter().any(|span| span.contains(start));

        let start = self
            .declaration
            .find_iter(source)
            .map(|found| found.start())
            .find(in_code)
            .or_else(|| {
                self.binding
                    .captures_iter(source)
                    .filter_map(|caps| caps.get(1))
                    .map(|found| found.start())
                    .find(in_code)
            })?;

        Some(&source[start..])
    }
}

/// Cached form of [`EntryPointMatcher::isolate`].
pub fn isolate_entry_point<'a>(source: &'a str, entry_point: &str) -> Option<&'a str> {
    matcher_for(entry_point)?.isolate(source)
}

fn matcher_for(entry_point: &str) -> Option<Arc<EntryPointMatcher>> {
    let mut cache = MATCHERS.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(matcher) = cache.get(entry_point) {
        return Some(Arc::clone(matcher));
    }

    let matcher = Arc::new(EntryPointMatcher::new(entry_point).ok()?);
    cache.insert(entry_point.to_string(), Arc::clone(&matcher));
    Some(matcher)
}

/// Byte ranges of `//` and `/* */` comments. String literals are skipped so a
/// `"//"` inside one does not open a comment.
fn comment_spans(source: &str) -> Vec<Range<usize>> {
    let bytes = source.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'"' | b'\'' | b'`') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' {
                        i += 1;
                    } else if bytes[i] == b'\n' && quote != b'`' {
                        break;
                    }
                    i += 1;
                }
                i += 1;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                let end = source[i..].find('\n').map_or(bytes.len(), |n| i + n);
                spans.push(i..end);
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = source[i + 2..]
                    .find("*/")
                    .map_or(bytes.len(), |n| i + 2 + n + 2);
                spans.push(i..end);
                i = end;
            }
            _ => i += 1,
        }
    }

    spans
}
