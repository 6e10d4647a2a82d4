//! Radix tree node implementation.
//!
//! Paths are split on `/`. Each segment is static (`users`), a named
//! parameter (`:id`) or a catch-all (`*rest`, last segment only).

use crate::error::RouterError;
use crate::method_router::MethodRouter;
use crate::params::Params;

/// Type of path segment in the radix tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Static path segment (e.g., "users", "api")
    Static,
    /// Named parameter (e.g., ":id")
    Param(String),
    /// Catch-all (e.g., "*path")
    Wildcard(String),
}

/// A node in the radix tree.
#[derive(Debug, Clone)]
pub struct Node<T> {
    segment: String,
    kind: SegmentKind,
    methods: Option<MethodRouter<T>>,
    /// Sorted by segment for binary search.
    static_children: Vec<Node<T>>,
    param_child: Option<Box<Node<T>>>,
    wildcard_child: Option<Box<Node<T>>>,
}

impl<T> Node<T> {
    fn new(segment: impl Into<String>, kind: SegmentKind) -> Self {
        Self {
            segment: segment.into(),
            kind,
            methods: None,
            static_children: Vec::new(),
            param_child: None,
            wildcard_child: None,
        }
    }

    /// Creates a root node for the tree.
    #[must_use]
    pub fn root() -> Self {
        Self::new("", SegmentKind::Static)
    }

    /// The segment this node matches.
    #[must_use]
    pub fn segment(&self) -> &str {
        &self.segment
    }

    /// The kind of segment.
    #[must_use]
    pub fn kind(&self) -> &SegmentKind {
        &self.kind
    }

    /// Mounts `value` for `method` at `path`.
    pub fn insert(&mut self, path: &str, method: http::Method, value: T) -> Result<(), RouterError> {
        let segments = parse_path(path)?;
        let target = self.descend(&segments, path)?;
        target
            .methods
            .get_or_insert_with(MethodRouter::new)
            .insert(method.clone(), value)
            .map_err(|_| RouterError::DuplicateRoute {
                method,
                path: path.to_string(),
            })
    }

    // Finds or creates the node for `segments`.
    fn descend(
        &mut self,
        segments: &[(String, SegmentKind)],
        path: &str,
    ) -> Result<&mut Node<T>, RouterError> {
        let Some(((segment, kind), remaining)) = segments.split_first() else {
            return Ok(self);
        };

        match kind {
            SegmentKind::Static => {
                let index = match self
                    .static_children
                    .binary_search_by(|child| child.segment.as_str().cmp(segment))
                {
                    Ok(index) => index,
                    Err(index) => {
                        self.static_children
                            .insert(index, Node::new(segment.clone(), SegmentKind::Static));
                        index
                    }
                };
                self.static_children[index].descend(remaining, path)
            }
            SegmentKind::Param(name) => {
                let child = self
                    .param_child
                    .get_or_insert_with(|| Box::new(Node::new(segment.clone(), kind.clone())));
                if let SegmentKind::Param(existing) = &child.kind {
                    if existing != name {
                        return Err(RouterError::ConflictingParameter {
                            path: path.to_string(),
                            existing: existing.clone(),
                            new: name.clone(),
                        });
                    }
                }
                child.descend(remaining, path)
            }
            SegmentKind::Wildcard(name) => {
                if !remaining.is_empty() {
                    return Err(RouterError::WildcardNotLast {
                        path: path.to_string(),
                    });
                }
                let child = self
                    .wildcard_child
                    .get_or_insert_with(|| Box::new(Node::new(segment.clone(), kind.clone())));
                if let SegmentKind::Wildcard(existing) = &child.kind {
                    if existing != name {
                        return Err(RouterError::ConflictingParameter {
                            path: path.to_string(),
                            existing: existing.clone(),
                            new: name.clone(),
                        });
                    }
                }
                Ok(child.as_mut())
            }
        }
    }

    /// Matches a concrete path against the tree.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(&MethodRouter<T>, Params)> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut params = Params::new();
        let methods = self.match_segments(&segments, &mut params)?;
        Some((methods, params))
    }

    fn match_segments<'a>(
        &'a self,
        segments: &[&str],
        params: &mut Params,
    ) -> Option<&'a MethodRouter<T>> {
        let Some((segment, remaining)) = segments.split_first() else {
            return self.methods.as_ref();
        };

        // static beats parameter beats catch-all
        if let Ok(index) = self
            .static_children
            .binary_search_by(|child| child.segment.as_str().cmp(segment))
        {
            if let Some(found) = self.static_children[index].match_segments(remaining, params) {
                return Some(found);
            }
        }

        if let Some(child) = &self.param_child {
            if let SegmentKind::Param(name) = &child.kind {
                let mark = params.len();
                params.push(name.clone(), *segment);
                if let Some(found) = child.match_segments(remaining, params) {
                    return Some(found);
                }
                params.truncate(mark);
            }
        }

        if let Some(child) = &self.wildcard_child {
            if let (SegmentKind::Wildcard(name), Some(methods)) = (&child.kind, &child.methods) {
                params.push(name.clone(), segments.join("/"));
                return Some(methods);
            }
        }

        None
    }
}

fn parse_path(path: &str) -> Result<Vec<(String, SegmentKind)>, RouterError> {
    let named = |name: &str| {
        if name.is_empty() {
            Err(RouterError::UnnamedParameter {
                path: path.to_string(),
            })
        } else {
            Ok(name.to_string())
        }
    };

    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| {
            let kind = if let Some(name) = s.strip_prefix(':') {
                SegmentKind::Param(named(name)?)
            } else if let Some(name) = s.strip_prefix('*') {
                SegmentKind::Wildcard(named(name)?)
            } else {
                SegmentKind::Static
            };
            Ok((s.to_string(), kind))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_parse_path() {
        let segments = parse_path("/files/:bucket/*key").unwrap();
        assert_eq!(
            segments,
            vec![
                ("files".to_string(), SegmentKind::Static),
                (":bucket".to_string(), SegmentKind::Param("bucket".to_string())),
                ("*key".to_string(), SegmentKind::Wildcard("key".to_string())),
            ]
        );
        assert!(matches!(
            parse_path("/users/:"),
            Err(RouterError::UnnamedParameter { .. })
        ));
    }

    #[test]
    fn test_static_priority_over_param() {
        let mut root = Node::root();
        root.insert("/users/me", Method::GET, "me").unwrap();
        root.insert("/users/:id", Method::GET, "show").unwrap();

        let (methods, params) = root.match_path("/users/me").unwrap();
        assert_eq!(methods.get(&Method::GET), Some(&"me"));
        assert!(params.is_empty());

        let (methods, params) = root.match_path("/users/42").unwrap();
        assert_eq!(methods.get(&Method::GET), Some(&"show"));
        assert_eq!(params.get("id"), Some("42"));
    }

    #[test]
    fn test_failed_param_branch_leaves_no_capture() {
        let mut root = Node::root();
        root.insert("/a/:x/b", Method::GET, "param").unwrap();
        root.insert("/a/*rest", Method::GET, "rest").unwrap();

        let (methods, params) = root.match_path("/a/1/c").unwrap();
        assert_eq!(methods.get(&Method::GET), Some(&"rest"));
        assert_eq!(params.get("x"), None);
        assert_eq!(params.get("rest"), Some("1/c"));
    }

    #[test]
    fn test_conflicting_parameter_names() {
        let mut root = Node::root();
        root.insert("/users/:id", Method::GET, 1).unwrap();
        let err = root.insert("/users/:name", Method::PUT, 2).unwrap_err();
        assert!(matches!(err, RouterError::ConflictingParameter { .. }));
    }

    #[test]
    fn test_wildcard_must_be_last() {
        let mut root = Node::root();
        let err = root.insert("/files/*path/meta", Method::GET, 1).unwrap_err();
        assert_eq!(
            err,
            RouterError::WildcardNotLast {
                path: "/files/*path/meta".to_string()
            }
        );
    }

    #[test]
    fn test_root_route() {
        let mut root = Node::root();
        root.insert("/", Method::GET, "index").unwrap();
        let (methods, _) = root.match_path("/").unwrap();
        assert_eq!(methods.get(&Method::GET), Some(&"index"));
    }
}
