//! Command-line assembly from a command and structured parameters.
//!
//! [`build`] renders a [`Params`] collection into the parameter portion of
//! a command line and appends it to the command. Parameter keys and values
//! are sanitized so that no value can terminate its token or smuggle in
//! another shell command; the command itself is trusted and never escaped.

use crate::escape::shell_escape;
use crate::params::{Key, Params, Scalar, Value};

/// Build the full command line.
///
/// With empty `params` the command is returned verbatim (stringified).
/// Otherwise each parameter group renders as `key<joiner>value...`, where
/// the joiner is `=`-style (no space) when the rendered key ends in `=`,
/// and groups join with single spaces. Identical inputs always produce
/// byte-identical output, and the caller's parameter structure is never
/// mutated.
///
/// # Examples
///
/// ```
/// use shellspawn::{build_command_line, Params};
///
/// let params = Params::new().opt("user", "bob").assign("mode", "fast");
/// assert_eq!(build_command_line("adduser", &params), "adduser --user bob --mode=fast");
/// ```
pub fn build(command: impl Into<Scalar>, params: &Params) -> String {
    let command = command.into().into_string();
    let rendered = assemble(params);
    if rendered.is_empty() {
        command
    } else {
        format!("{command} {rendered}")
    }
}

/// Render the parameter portion: normalized groups, each non-empty group
/// joined internally by its joiner, then groups joined by single spaces.
/// Groups that render nothing are dropped entirely, never leaving a stray
/// space.
fn assemble(params: &Params) -> String {
    let mut rendered = Vec::new();
    for (key, value) in params.flatten() {
        let key_token = render_key(&key);
        let joiner = match &key_token {
            Some(k) if k.ends_with('=') => "",
            _ => " ",
        };

        let mut tokens = Vec::new();
        if let Some(k) = key_token {
            tokens.push(k);
        }
        match &value {
            Value::None => {}
            Value::One(v) => tokens.push(shell_escape(v.as_str())),
            Value::Many(vs) => tokens.extend(vs.iter().map(|v| shell_escape(v.as_str()))),
        }
        if tokens.is_empty() {
            continue;
        }
        rendered.push(tokens.join(joiner));
    }
    rendered.join(" ")
}

fn render_key(key: &Key) -> Option<String> {
    match key {
        Key::None => None,
        Key::Sym(name) => Some(render_literal(&dash_symbol(name))),
        Key::Lit(key) if key.is_empty() => None,
        Key::Lit(key) => Some(render_literal(key)),
    }
}

/// Prefix a symbolic name with `--`, or `-` when the name (ignoring a
/// trailing `=`) is a single character, and convert underscores to dashes.
fn dash_symbol(name: &str) -> String {
    let bare = name.strip_suffix('=').unwrap_or(name);
    let dash = if bare.chars().count() == 1 { "-" } else { "--" };
    format!("{dash}{}", name.replace('_', "-"))
}

/// Render a literal key: a detected leading `-`/`--` prefix and trailing
/// `=` marker stay unescaped, everything between is sanitized.
fn render_literal(key: &str) -> String {
    let (body, suffix) = match key.strip_suffix('=') {
        Some(rest) if !rest.is_empty() => (rest, "="),
        _ => (key, ""),
    };
    let (prefix, middle) = if let Some(rest) = body.strip_prefix("--") {
        if rest.is_empty() {
            ("-", "-")
        } else {
            ("--", rest)
        }
    } else if let Some(rest) = body.strip_prefix('-') {
        if rest.is_empty() {
            ("", "-")
        } else {
            ("-", rest)
        }
    } else {
        ("", body)
    };
    format!("{prefix}{}{suffix}", shell_escape(middle))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::params::Param;

    fn assert_params(params: Params, expected: &str) {
        let built = build("true", &params);
        let want = format!("true {expected}");
        assert_eq!(built, want.trim_end());
    }

    #[test]
    fn without_params() {
        assert_eq!(build("true", &Params::new()), "true");
    }

    #[test]
    fn with_path_command() {
        assert_eq!(build(Path::new("/usr/bin/env"), &Params::new()), "/usr/bin/env");
    }

    #[test]
    fn with_path_command_and_params() {
        let params = Params::new().key("-v");
        assert_eq!(build(Path::new("/usr/bin/env"), &params), "/usr/bin/env -v");
    }

    #[test]
    fn literal_key_with_value() {
        assert_params(Params::new().key_value("--user", "bob"), "--user bob");
    }

    #[test]
    fn literal_key_with_trailing_equals() {
        assert_params(Params::new().key_value("--user=", "bob"), "--user=bob");
    }

    #[test]
    fn value_requiring_sanitization() {
        assert_params(
            Params::new().key_value("--pass", "P@$s w0rd%"),
            "--pass P\\@\\$s\\ w0rd\\%",
        );
    }

    #[test]
    fn key_requiring_sanitization() {
        assert_params(Params::new().key_value("--h&x0r=", "xxx"), "--h\\&x0r=xxx");
    }

    #[test]
    fn symbolic_key() {
        assert_params(Params::new().opt("abc", "def"), "--abc def");
    }

    #[test]
    fn symbolic_key_with_assignment() {
        assert_params(Params::new().assign("abc", "def"), "--abc=def");
    }

    #[test]
    fn symbolic_key_with_underscore() {
        assert_params(Params::new().opt("abc_def", "ghi"), "--abc-def ghi");
    }

    #[test]
    fn symbolic_key_with_underscore_and_assignment() {
        assert_params(Params::new().assign("abc_def", "ghi"), "--abc-def=ghi");
    }

    #[test]
    fn single_character_symbolic_key_takes_one_dash() {
        assert_params(Params::new().opt("k", "value"), "-k value");
        assert_params(Params::new().assign("k", "value"), "-k=value");
    }

    #[test]
    fn none_key_renders_positionals() {
        assert_params(Params::new().positional(["def"]), "def");
        assert_params(Params::new().positional(["a", "b"]), "a b");
    }

    #[test]
    fn value_none_renders_key_alone() {
        assert_params(Params::new().key("--abc"), "--abc");
    }

    #[test]
    fn empty_group_renders_nothing() {
        assert_params(Params::new().positional(Vec::<String>::new()), "");
        let mut params = Params::new();
        params.push(Param::Pair(Key::None, Value::None));
        assert_params(params, "");
    }

    #[test]
    fn empty_group_between_others_leaves_no_extra_space() {
        let mut params = Params::new().key("--abc");
        params.push(Param::Pair(Key::None, Value::None));
        params = params.key("--def");
        assert_params(params, "--abc --def");
    }

    #[test]
    fn double_dash_key_renders_literally() {
        assert_params(Params::new().key("--"), "--");
    }

    #[test]
    fn value_as_list() {
        assert_params(Params::new().key_values("--abc", ["def", "ghi"]), "--abc def ghi");
    }

    #[test]
    fn numeric_values_stringify() {
        assert_params(Params::new().key_value("--abc", 1), "--abc 1");
        assert_params(Params::new().key_values("--abc", [1, 2]), "--abc 1 2");
    }

    #[test]
    fn path_value_sanitizes_through_the_same_path() {
        assert_params(
            Params::new().key_value("--abc", Path::new("/usr/bin/env")),
            "--abc /usr/bin/env",
        );
    }

    #[test]
    fn path_key_is_sanitized() {
        let params = Params::new().bare(Path::new("/usr/bin/env"));
        assert_params(params, "/usr/bin/env");
    }

    #[test]
    fn empty_value_still_produces_a_token() {
        assert_params(Params::new().opt("pass", ""), "--pass ''");
    }

    #[test]
    fn duplicate_keys_render_in_order() {
        let params = Params::new().key_value("--abc", 1).key_value("--abc", 2);
        assert_params(params, "--abc 1 --abc 2");
    }

    #[test]
    fn barewords_keep_detected_prefixes() {
        assert_params(Params::new().bare("--abc"), "--abc");
        assert_params(Params::new().bare("abc"), "abc");
    }

    #[test]
    fn nested_group_renders_in_position() {
        let inner = Params::new().assign("abc_def", "ghi");
        assert_params(Params::new().bare("log").group(inner), "log --abc-def=ghi");
    }

    /// The real-world mixed form: barewords, a literal short flag, a
    /// symbolic switch, and a symbolic option, all in one collection.
    #[test]
    fn mixed_forms_compose() {
        let params = Params::new()
            .bare("log")
            .bare("feature")
            .key("-E")
            .flag("oneline")
            .opt("grep", "abc");
        assert_params(params, "log feature -E --oneline --grep abc");
    }

    #[test]
    fn building_twice_is_byte_identical() {
        let params = Params::new().opt("pass", "P@$s w0rd%").positional(["a b", "c"]);
        let first = build("cmd", &params);
        let second = build("cmd", &params);
        assert_eq!(first, second);
    }

    /// Splitting the built line with shell rules recovers the exact
    /// original values, which is the injection-safety property.
    #[test]
    fn built_line_round_trips_through_shell_splitting() {
        let params = Params::new().opt("out", "; rm /some/file");
        let built = build("echo", &params);
        let tokens = shell_words::split(&built).expect("built line should tokenize");
        assert_eq!(tokens, ["echo", "--out", "; rm /some/file"]);
    }
}
