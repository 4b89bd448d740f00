//! Lexical path helpers shared by the link manager and the CLI layer.
use std::ffi::{OsStr, OsString};
use std::path::{Component, Path, PathBuf};

/// The marker a managed entry's first home-relative component starts with.
pub const DOT: char = '.';

/// Normalise `path` lexically: drop `.` components and fold `..` into the
/// preceding component.  Symbolic links are never resolved, so a dotfile
/// link keeps its own name instead of turning into its target.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Make `path` absolute against `cwd` (when relative) and normalise it.
#[must_use]
pub fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&cwd.join(path))
    }
}

/// Return `name` without its leading dot, or `None` if it has none (or is
/// nothing but the dot).
#[must_use]
pub fn undot(name: &str) -> Option<&str> {
    name.strip_prefix(DOT).filter(|rest| !rest.is_empty())
}

/// Return the dotted form of a storage entry name.
#[must_use]
pub fn dotted(name: &OsStr) -> OsString {
    let mut out = OsString::from(DOT.to_string());
    out.push(name);
    out
}

/// Map a home-relative path to its storage-relative counterpart by stripping
/// the dot from the first component.  Returns `None` when the first
/// component carries no dot.
#[must_use]
pub fn relative_target(relative: &Path) -> Option<PathBuf> {
    let mut components = relative.components();
    let first = match components.next()? {
        Component::Normal(name) => name.to_str()?,
        _ => return None,
    };
    let mut out = PathBuf::from(undot(first)?);
    out.extend(components);
    Some(out)
}

/// Resolve the target of a link at `link` whose raw `read_link` value is
/// `raw`.  Relative targets are interpreted against the link's parent.
#[must_use]
pub fn resolve_link_target(link: &Path, raw: &Path) -> PathBuf {
    if raw.is_absolute() {
        normalize(raw)
    } else {
        let parent = link.parent().unwrap_or_else(|| Path::new("/"));
        normalize(&parent.join(raw))
    }
}
