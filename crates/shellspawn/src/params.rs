//! Structured command-line parameters.
//!
//! Parameter collections are modeled as a closed set of variants
//! ([`Param::Bare`], [`Param::Pair`], [`Param::Group`]) produced by a
//! single normalization pass ([`Params::flatten`]) before rendering,
//! instead of branching on runtime shape throughout the builder.

use std::path::{Path, PathBuf};

/// A single stringifiable command-line atom.
///
/// Conversions exist for strings, numbers, booleans, characters, and
/// paths, so parameter values can be passed without manual formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scalar(String);

impl Scalar {
    /// The raw, unescaped text of this atom.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar(value)
    }
}

impl From<&String> for Scalar {
    fn from(value: &String) -> Self {
        Scalar(value.clone())
    }
}

impl From<&Path> for Scalar {
    fn from(value: &Path) -> Self {
        Scalar(value.to_string_lossy().into_owned())
    }
}

impl From<PathBuf> for Scalar {
    fn from(value: PathBuf) -> Self {
        Scalar(value.to_string_lossy().into_owned())
    }
}

macro_rules! scalar_from_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Self {
                    Scalar(value.to_string())
                }
            }
        )*
    };
}

scalar_from_display!(i32, i64, u32, u64, usize, f64, bool, char);

/// How a parameter key renders on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// No key at all; the group's values become positional tokens.
    None,
    /// Symbolic flag identifier: rendered with a leading `--` (or `-` for
    /// a single-character name), underscores converted to dashes, and a
    /// trailing `=` selecting assignment-style joining.
    Sym(String),
    /// Literal key used as-is, except unsafe characters are escaped. A
    /// detected leading `-`/`--` prefix and trailing `=` marker are
    /// preserved unescaped.
    Lit(String),
}

impl Key {
    /// Symbolic key, e.g. `Key::sym("dry_run")` renders `--dry-run`.
    pub fn sym(name: impl Into<String>) -> Self {
        Key::Sym(name.into())
    }

    /// Literal key, e.g. `Key::lit("--user=")` renders `--user=` with
    /// assignment-style joining.
    pub fn lit(key: impl Into<String>) -> Self {
        Key::Lit(key.into())
    }
}

/// The value side of a parameter group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// No value; the key alone renders as a switch flag.
    None,
    /// One scalar token.
    One(Scalar),
    /// Several scalar tokens, rendered in order.
    Many(Vec<Scalar>),
}

/// One parameter entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// A lone token; renders exactly like a literal key with no value, so
    /// `Bare("log")` gives `log` and `Bare("--force")` gives `--force`.
    Bare(Scalar),
    /// A key/value group.
    Pair(Key, Value),
    /// A nested grouping, flattened in place during normalization.
    Group(Vec<Param>),
}

/// Ordered parameter collection.
///
/// Duplicate keys are allowed and each renders independently, in original
/// order. Mapping-style sources can be collected through [`FromIterator`];
/// iterate a `BTreeMap` to get deterministic group order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<Param>);

impl Params {
    pub fn new() -> Self {
        Params(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, param: Param) {
        self.0.push(param);
    }

    /// Append one bareword token: `bare("log")` renders `log`.
    pub fn bare(mut self, token: impl Into<Scalar>) -> Self {
        self.0.push(Param::Bare(token.into()));
        self
    }

    /// Append positional values with no key: `positional(["a", "b"])`
    /// renders `a b`.
    pub fn positional<I>(mut self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Scalar>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.0.push(Param::Pair(Key::None, Value::Many(values)));
        self
    }

    /// Append a symbolic switch: `flag("oneline")` renders `--oneline`.
    pub fn flag(mut self, name: impl Into<String>) -> Self {
        self.0.push(Param::Pair(Key::Sym(name.into()), Value::None));
        self
    }

    /// Append a symbolic key with one value: `opt("grep", "abc")` renders
    /// `--grep abc`.
    pub fn opt(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.0
            .push(Param::Pair(Key::Sym(name.into()), Value::One(value.into())));
        self
    }

    /// Append a symbolic key with several values: `opts("f", ["a", "b"])`
    /// renders `-f a b`.
    pub fn opts<I>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Scalar>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.0
            .push(Param::Pair(Key::Sym(name.into()), Value::Many(values)));
        self
    }

    /// Append a symbolic key in assignment style: `assign("mode", "fast")`
    /// renders `--mode=fast`.
    pub fn assign(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        let mut name = name.into();
        if !name.ends_with('=') {
            name.push('=');
        }
        self.0
            .push(Param::Pair(Key::Sym(name), Value::One(value.into())));
        self
    }

    /// Append a literal key with no value: `key("--")` renders `--`.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.0.push(Param::Pair(Key::Lit(key.into()), Value::None));
        self
    }

    /// Append a literal key with one value: `key_value("--user", "bob")`
    /// renders `--user bob`.
    pub fn key_value(mut self, key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.0
            .push(Param::Pair(Key::Lit(key.into()), Value::One(value.into())));
        self
    }

    /// Append a literal key with several values.
    pub fn key_values<I>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Scalar>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.0
            .push(Param::Pair(Key::Lit(key.into()), Value::Many(values)));
        self
    }

    /// Append a nested grouping; it is flattened in place when the
    /// command line is built, preserving its position.
    pub fn group(mut self, params: Params) -> Self {
        self.0.push(Param::Group(params.0));
        self
    }

    /// Normalize into an ordered sequence of `(key, value)` groups with
    /// all nesting flattened. The caller's structure is never mutated;
    /// groups are cloned out.
    pub(crate) fn flatten(&self) -> Vec<(Key, Value)> {
        let mut groups = Vec::with_capacity(self.0.len());
        flatten_into(&self.0, &mut groups);
        groups
    }
}

fn flatten_into(params: &[Param], groups: &mut Vec<(Key, Value)>) {
    for param in params {
        match param {
            Param::Bare(token) => {
                groups.push((Key::Lit(token.as_str().to_string()), Value::None));
            }
            Param::Pair(key, value) => groups.push((key.clone(), value.clone())),
            Param::Group(entries) => flatten_into(entries, groups),
        }
    }
}

impl FromIterator<Param> for Params {
    fn from_iter<I: IntoIterator<Item = Param>>(iter: I) -> Self {
        Params(iter.into_iter().collect())
    }
}

impl FromIterator<(Key, Value)> for Params {
    fn from_iter<I: IntoIterator<Item = (Key, Value)>>(iter: I) -> Self {
        Params(
            iter.into_iter()
                .map(|(key, value)| Param::Pair(key, value))
                .collect(),
        )
    }
}

impl Extend<Param> for Params {
    fn extend<I: IntoIterator<Item = Param>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_conversions_stringify() {
        assert_eq!(Scalar::from(1i64).as_str(), "1");
        assert_eq!(Scalar::from(true).as_str(), "true");
        assert_eq!(Scalar::from(2.5f64).as_str(), "2.5");
        assert_eq!(Scalar::from(Path::new("/usr/bin/env")).as_str(), "/usr/bin/env");
    }

    #[test]
    fn flatten_preserves_order_and_duplicates() {
        let params = Params::new().opt("abc", 1).opt("abc", 2);
        let groups = params.flatten();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, Key::Sym("abc".to_string()));
        assert_eq!(groups[1].1, Value::One(Scalar::from(2)));
    }

    #[test]
    fn flatten_expands_nested_groups_in_place() {
        let inner = Params::new().assign("abc_def", "ghi");
        let params = Params::new().bare("log").group(inner).bare("feature");
        let groups = params.flatten();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].0, Key::Lit("log".to_string()));
        assert_eq!(groups[1].0, Key::Sym("abc_def=".to_string()));
        assert_eq!(groups[2].0, Key::Lit("feature".to_string()));
    }

    #[test]
    fn bareword_normalizes_to_literal_key() {
        let groups = Params::new().bare("--force").flatten();
        assert_eq!(groups, vec![(Key::Lit("--force".to_string()), Value::None)]);
    }

    #[test]
    fn flatten_does_not_mutate_the_source() {
        let params = Params::new().opt("user", "bob");
        let before = params.clone();
        let _ = params.flatten();
        let _ = params.flatten();
        assert_eq!(params, before);
    }

    #[test]
    fn mapping_sources_collect_in_iteration_order() {
        use std::collections::BTreeMap;

        let mut map = BTreeMap::new();
        map.insert("b", "2");
        map.insert("a", "1");
        let params: Params = map
            .into_iter()
            .map(|(k, v)| (Key::lit(k), Value::One(Scalar::from(v))))
            .collect();
        let groups = params.flatten();
        assert_eq!(groups[0].0, Key::Lit("a".to_string()));
        assert_eq!(groups[1].0, Key::Lit("b".to_string()));
    }
}
