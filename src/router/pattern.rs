//! Path pattern compiler.
//!
//! パスパターンのコンパイラ
//!
//! A pattern is split on `/`. Every non-empty piece becomes one segment:
//! `:name` is a named parameter, anything else is literal text compared by
//! exact string equality. Empty pieces (leading, doubled) are dropped, but a
//! trailing `/` is remembered so that `/users` and `/users/` stay distinct.
//! A pattern without segments only matches `/`.

use std::fmt;

use smallvec::SmallVec;

use crate::error::{RouterError, RouterResult};
use crate::router::params::Params;

/// Captured parameter values, borrowed from the matched path.
pub type Captures<'p> = SmallVec<[&'p str; 4]>;

/// パターンの1セグメント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// そのままの文字列と一致
    Literal(Box<str>),
    /// `/` を含まない空でない1セグメントと一致
    Param(Box<str>),
}

/// Compiled path pattern. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: Box<str>,
    segments: Vec<Segment>,
    trailing_slash: bool,
}

impl PathPattern {
    /// パターン文字列をコンパイルする
    ///
    /// Fails only when the same parameter name appears twice.
    ///
    /// ```rust
    /// # use domain_router::router::PathPattern;
    /// let pattern = PathPattern::compile("/users/:id").unwrap();
    /// assert_eq!(pattern.captures("/users/5").unwrap().as_slice(), &["5"]);
    /// assert!(pattern.captures("/users/5/").is_none());
    /// assert!(PathPattern::compile("/:id/:id").is_err());
    /// ```
    pub fn compile(pattern: &str) -> RouterResult<PathPattern> {
        let mut segments = Vec::new();
        for part in pattern.split('/').filter(|s| !s.is_empty()) {
            match part.strip_prefix(':') {
                Some(name) => {
                    let duplicated = segments
                        .iter()
                        .any(|s| matches!(s, Segment::Param(n) if &**n == name));
                    if duplicated {
                        return Err(RouterError::DuplicateParam {
                            pattern: pattern.to_string(),
                            name: name.to_string(),
                        });
                    }
                    segments.push(Segment::Param(name.into()));
                }
                None => segments.push(Segment::Literal(part.into())),
            }
        }
        let trailing_slash = !segments.is_empty() && pattern.ends_with('/');

        Ok(PathPattern {
            raw: pattern.into(),
            segments,
            trailing_slash,
        })
    }

    /// 元のパターン文字列
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// パラメータ名 (宣言順)
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(&**name),
            Segment::Literal(_) => None,
        })
    }

    pub fn param_count(&self) -> usize {
        self.param_names().count()
    }

    /// パス全体と照合して、パラメータの値を宣言順で返す
    /// 前方一致や部分一致はしない
    pub fn captures<'p>(&self, path: &'p str) -> Option<Captures<'p>> {
        if self.segments.is_empty() {
            return (path == "/").then(SmallVec::new);
        }

        let rest = path.strip_prefix('/')?;
        let rest = if self.trailing_slash {
            rest.strip_suffix('/')?
        } else {
            rest
        };

        let mut parts = rest.split('/');
        let mut captured = SmallVec::new();
        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(text) => {
                    if part != &**text {
                        return None;
                    }
                }
                Segment::Param(_) => {
                    if part.is_empty() {
                        return None;
                    }
                    captured.push(part);
                }
            }
        }

        // セグメント数は完全一致
        if parts.next().is_some() {
            return None;
        }
        Some(captured)
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.captures(path).is_some()
    }

    /// 名前と値を組にして返す
    pub fn extract(&self, path: &str) -> Option<Params> {
        let captured = self.captures(path)?;
        let mut params = Params::new();
        for (name, value) in self.param_names().zip(captured) {
            params.push(name, value);
        }
        Some(params)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
