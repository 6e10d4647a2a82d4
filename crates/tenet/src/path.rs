//! Path template handling.

/// Rewrites `{name}` placeholders into the router's `:name` syntax.
///
/// Braces that do not enclose a parameter name are kept as they are.
pub(crate) fn to_router_path(template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) if is_param_name(&after[..close]) => {
                out.push(':');
                out.push_str(&after[..close]);
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

fn is_param_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Appends `path` to `prefix`. A bare `/` path adds nothing to a non-empty
/// prefix.
pub(crate) fn join(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let joined = if path == "/" && !prefix.is_empty() {
        prefix.to_string()
    } else if path.is_empty() || path.starts_with('/') {
        format!("{prefix}{path}")
    } else {
        format!("{prefix}/{path}")
    };

    if joined.is_empty() {
        "/".to_string()
    } else {
        joined
    }
}

/// Removes a leading `base` segment sequence from `path`.
pub(crate) fn strip_base<'a>(path: &'a str, base: &str) -> &'a str {
    if base.is_empty() {
        return path;
    }
    match path.strip_prefix(base) {
        Some("") => "/",
        Some(rest) if rest.starts_with('/') => rest,
        _ => path,
    }
}
