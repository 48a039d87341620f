//! Template functions.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use minijinja::value::{Rest, ViaDeserialize};
use minijinja::{Environment, Error, ErrorKind, Value};
use pkgdoc_render::{
    Declaration, PackageRef, ServicePrefixes, annotate_decl, breadcrumbs, command_name,
    comment_html, import_path_html, relative_age, relative_path,
};

/// Malformed arguments to the `map` template function.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    /// Keys and values must come in pairs.
    #[error("map requires an even number of arguments, got {0}")]
    OddArgumentCount(usize),
    /// Every key must be a string.
    #[error("map key at argument {index} must be a string")]
    NonStringKey {
        /// Zero-based argument index of the offending key.
        index: usize,
    },
}

/// Build a mapping from alternating key and value arguments.
///
/// # Errors
///
/// Returns [`MapError`] for an odd number of arguments or a non-string key.
pub fn build_map(args: &[Value]) -> Result<BTreeMap<String, Value>, MapError> {
    if args.len() % 2 != 0 {
        return Err(MapError::OddArgumentCount(args.len()));
    }
    let mut map = BTreeMap::new();
    for (pair, kv) in args.chunks_exact(2).enumerate() {
        let key = kv[0]
            .as_str()
            .ok_or(MapError::NonStringKey { index: pair * 2 })?;
        map.insert(key.to_owned(), kv[1].clone());
    }
    Ok(map)
}

/// Register all documentation helpers on `env`.
pub(crate) fn register(env: &mut Environment<'static>, services: ServicePrefixes) {
    env.add_function("comment", |text: &str| {
        Value::from_safe_string(comment_html(text))
    });
    env.add_function("decl", move |decl: ViaDeserialize<Declaration>| {
        annotate_decl(&decl.0, &services)
            .map(Value::from_safe_string)
            .map_err(|err| {
                Error::new(ErrorKind::InvalidOperation, "malformed declaration annotations")
                    .with_source(err)
            })
    });
    env.add_function("breadcrumbs", |pkg: ViaDeserialize<PackageRef>| {
        Value::from_safe_string(breadcrumbs(&pkg.import_path, &pkg.project_root))
    });
    env.add_function("commandName", |pkg: ViaDeserialize<PackageRef>| {
        Value::from_safe_string(command_name(&pkg.import_path))
    });
    env.add_function("importPath", |path: &str| {
        Value::from_safe_string(import_path_html(path))
    });
    env.add_function("relativePath", |path: &str, parent: Option<Value>| {
        let parent = parent.as_ref().and_then(Value::as_str);
        Value::from_safe_string(relative_path(path, parent))
    });
    env.add_function("relativeTime", |t: Value| {
        parse_timestamp(&t).map(relative_age)
    });
    env.add_function("map", |args: Rest<Value>| {
        build_map(&args)
            .map(Value::from_serialize)
            .map_err(|err| {
                Error::new(ErrorKind::InvalidOperation, err.to_string()).with_source(err)
            })
    });
    env.add_function("equal", |a: Value, b: Value| a == b);
}

/// Accept RFC 3339 strings and integer Unix seconds.
fn parse_timestamp(t: &Value) -> Result<DateTime<Utc>, Error> {
    if let Some(s) = t.as_str() {
        return DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|err| {
                Error::new(
                    ErrorKind::InvalidOperation,
                    format!("invalid timestamp {s:?}"),
                )
                .with_source(err)
            });
    }
    i64::try_from(t.clone())
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidOperation,
                format!("expected timestamp, got {}", t.kind()),
            )
        })
}
