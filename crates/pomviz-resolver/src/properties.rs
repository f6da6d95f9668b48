//! `${name}` placeholder substitution over a table of POM properties.

use std::collections::BTreeMap;

/// Upper bound on rescans of a value, so self-referencing properties terminate.
pub const MAX_SUBSTITUTION_PASSES: usize = 64;

/// Substitution stops growing a value past this many bytes.
pub const MAX_RESOLVED_LEN: usize = 64 * 1024;

/// Property name to value mapping for one manifest resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyTable {
    values: BTreeMap<String, String>,
}

impl PropertyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Apply `entries` on top of this table; on collision the entry wins.
    pub fn overlay<K, V>(&mut self, entries: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in entries {
            self.insert(k, v);
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Substitute placeholders in `value` using this table. See [`resolve`].
    pub fn resolve(&self, value: &str) -> String {
        resolve(value, self)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertyTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        table.overlay(iter);
        table
    }
}

/// Replace every `${name}` in `value` with `table[name]`, or the empty string
/// when the property is undefined, rescanning until no placeholder is left.
///
/// Rescanning stops when a pass changes nothing, after
/// [`MAX_SUBSTITUTION_PASSES`] passes, or once the value exceeds
/// [`MAX_RESOLVED_LEN`]; a cyclic property therefore leaves its placeholder
/// in place instead of looping. A `${` with no closing `}` and an empty
/// `${}` are kept verbatim.
pub fn resolve(value: &str, table: &PropertyTable) -> String {
    let mut current = value.to_string();
    for _ in 0..MAX_SUBSTITUTION_PASSES {
        let Some(next) = substitute_once(&current, table) else {
            break;
        };
        if next == current {
            break;
        }
        current = next;
        if current.len() > MAX_RESOLVED_LEN {
            tracing::debug!("property expansion exceeded {MAX_RESOLVED_LEN} bytes, stopping");
            break;
        }
    }
    current
}

/// One left-to-right pass. Returns `None` when `input` has no placeholder.
fn substitute_once(input: &str, table: &PropertyTable) -> Option<String> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    let mut found = false;

    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        if len == 0 {
            // `${}` names nothing; keep it.
            out.push_str(&rest[..start + 3]);
            rest = &rest[start + 3..];
            continue;
        }
        found = true;
        let name = &rest[start + 2..start + 2 + len];
        out.push_str(&rest[..start]);
        out.push_str(table.get(name).unwrap_or_default());
        rest = &rest[start + 2 + len + 1..];
    }

    if !found {
        return None;
    }
    out.push_str(rest);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &str)]) -> PropertyTable {
        entries.iter().copied().collect()
    }

    #[test]
    fn no_placeholder_is_unchanged() {
        assert_eq!(resolve("1.2.3", &PropertyTable::new()), "1.2.3");
    }

    #[test]
    fn substitutes_multiple_placeholders() {
        let t = table(&[("major", "2"), ("minor", "3")]);
        assert_eq!(resolve("${major}.${minor}.0", &t), "2.3.0");
    }

    #[test]
    fn undefined_property_becomes_empty() {
        assert_eq!(resolve("v${missing}", &PropertyTable::new()), "v");
    }

    #[test]
    fn nested_values_are_rescanned() {
        let t = table(&[("a", "${b}"), ("b", "${c}-x"), ("c", "7")]);
        assert_eq!(resolve("${a}", &t), "7-x");
    }

    #[test]
    fn self_reference_terminates() {
        let t = table(&[("a", "${a}")]);
        assert_eq!(resolve("${a}", &t), "${a}");
    }

    #[test]
    fn mutual_reference_terminates() {
        let t = table(&[("a", "${b}"), ("b", "${a}")]);
        let out = resolve("${a}", &t);
        assert!(out == "${a}" || out == "${b}", "got: {out}");
    }

    #[test]
    fn exponential_growth_is_capped() {
        let t = table(&[("a", "${a}${a}")]);
        let out = resolve("${a}", &t);
        assert!(out.len() <= 2 * MAX_RESOLVED_LEN + 8);
    }

    #[test]
    fn unclosed_placeholder_kept_verbatim() {
        let t = table(&[("a", "1")]);
        assert_eq!(resolve("${a}-${oops", &t), "1-${oops");
    }

    #[test]
    fn empty_placeholder_kept_verbatim() {
        let t = table(&[("", "never"), ("a", "1")]);
        assert_eq!(resolve("x${}y", &t), "x${}y");
        assert_eq!(resolve("${}${a}", &t), "${}1");
    }

    #[test]
    fn resolving_twice_changes_nothing() {
        let tables = [
            PropertyTable::new(),
            table(&[("a", "${b}"), ("b", "${c}-x"), ("c", "7")]),
            table(&[("a", "{b}"), ("b", "2.0")]),
            table(&[("a", "{missing}"), ("v", "1")]),
        ];
        let values = [
            "1.2.3",
            "${a}",
            "${a}.${b}",
            "v${missing}",
            "${a}-${oops",
            "$${a}",
            "x${}y",
            "${v}${}",
        ];
        for t in &tables {
            for value in values {
                let once = resolve(value, t);
                assert_eq!(resolve(&once, t), once, "value {value:?} in {t:?}");
            }
        }
    }

    #[test]
    fn overlay_later_entries_win() {
        let mut t = table(&[("v", "parent"), ("only.parent", "p")]);
        t.overlay([("v", "child")]);
        assert_eq!(t.get("v"), Some("child"));
        assert_eq!(t.get("only.parent"), Some("p"));
        assert_eq!(t.len(), 2);
    }
}
