//! IRI scheme detection and RFC 3986 reference resolution.

/// Length of the URI scheme at the start of `iri`, not counting the `:`.
///
/// ```text
/// scheme ::= ALPHA ( ALPHA | DIGIT | "+" | "-" | "." )* ":"
/// ```
pub fn scheme_len(iri: &str) -> Option<usize> {
    let mut chars = iri.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() => {}
        _ => return None,
    }
    for (i, c) in chars {
        match c {
            ':' => return Some(i),
            c if c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.') => {}
            _ => return None,
        }
    }
    None
}

/// Whether `iri` starts with a URI scheme.
pub fn is_absolute(iri: &str) -> bool {
    scheme_len(iri).is_some()
}

/// The five RFC 3986 components of an IRI reference.
#[derive(Debug, Default, PartialEq)]
struct Parts<'a> {
    scheme: Option<&'a str>,
    authority: Option<&'a str>,
    path: &'a str,
    query: Option<&'a str>,
    fragment: Option<&'a str>,
}

fn split(iri: &str) -> Parts<'_> {
    let mut parts = Parts::default();
    let mut rest = iri;

    if let Some(len) = scheme_len(rest) {
        parts.scheme = Some(&rest[..len]);
        rest = &rest[len + 1..];
    }

    if let Some(pos) = rest.find('#') {
        parts.fragment = Some(&rest[pos + 1..]);
        rest = &rest[..pos];
    }

    if let Some(pos) = rest.find('?') {
        parts.query = Some(&rest[pos + 1..]);
        rest = &rest[..pos];
    }

    if let Some(after_slashes) = rest.strip_prefix("//") {
        let auth_end = after_slashes.find('/').unwrap_or(after_slashes.len());
        parts.authority = Some(&after_slashes[..auth_end]);
        rest = &after_slashes[auth_end..];
    }

    parts.path = rest;
    parts
}

/// Resolve `reference` against the absolute IRI `base` (RFC 3986 section 5.2.2).
pub fn resolve(base: &str, reference: &str) -> String {
    let r = split(reference);
    if r.scheme.is_some() {
        return recompose(
            r.scheme,
            r.authority,
            &remove_dot_segments(r.path),
            r.query,
            r.fragment,
        );
    }

    let b = split(base);
    let (authority, path, query) = if r.authority.is_some() {
        (r.authority, remove_dot_segments(r.path), r.query)
    } else if r.path.is_empty() {
        (b.authority, b.path.to_string(), r.query.or(b.query))
    } else if r.path.starts_with('/') {
        (b.authority, remove_dot_segments(r.path), r.query)
    } else {
        let merged = if b.authority.is_some() && b.path.is_empty() {
            format!("/{}", r.path)
        } else {
            let base_dir = match b.path.rfind('/') {
                Some(pos) => &b.path[..=pos],
                None => "",
            };
            format!("{}{}", base_dir, r.path)
        };
        (b.authority, remove_dot_segments(&merged), r.query)
    };

    recompose(b.scheme, authority, &path, query, r.fragment)
}

fn recompose(
    scheme: Option<&str>,
    authority: Option<&str>,
    path: &str,
    query: Option<&str>,
    fragment: Option<&str>,
) -> String {
    let mut result = String::new();
    if let Some(scheme) = scheme {
        result.push_str(scheme);
        result.push(':');
    }
    if let Some(auth) = authority {
        result.push_str("//");
        result.push_str(auth);
    }
    result.push_str(path);
    if let Some(q) = query {
        result.push('?');
        result.push_str(q);
    }
    if let Some(f) = fragment {
        result.push('#');
        result.push_str(f);
    }
    result
}

/// Remove dot segments from a path (RFC 3986 section 5.2.4).
fn remove_dot_segments(path: &str) -> String {
    let mut input = path;
    let mut output = String::with_capacity(path.len());

    while !input.is_empty() {
        if let Some(rest) = input.strip_prefix("../") {
            input = rest;
        } else if let Some(rest) = input.strip_prefix("./") {
            input = rest;
        } else if input.starts_with("/./") {
            input = &input[2..];
        } else if input == "/." {
            input = "/";
        } else if input.starts_with("/../") || input == "/.." {
            input = if input == "/.." { "/" } else { &input[3..] };
            match output.rfind('/') {
                Some(pos) => output.truncate(pos),
                None => output.clear(),
            }
        } else if input == "." || input == ".." {
            input = "";
        } else {
            // Move the first segment (with its leading slash, if any) to the output.
            let start = usize::from(input.starts_with('/'));
            let end = input[start..]
                .find('/')
                .map(|pos| pos + start)
                .unwrap_or(input.len());
            output.push_str(&input[..end]);
            input = &input[end..];
        }
    }

    output
}
