use std::{fmt, slice};

use smallvec::SmallVec;

// ほとんどのルートはパラメータ 4 個以下なのでヒープに乗せない
const SMALL: usize = 4;

/// パスから取り出した名前付きパラメータ
/// 順番はパターンで宣言した順
///
/// ```rust
/// # use domain_router::router::PathPattern;
/// let pattern = PathPattern::compile("/users/:id/posts/:post").unwrap();
/// let params = pattern.extract("/users/5/posts/hello").unwrap();
///
/// assert_eq!(params.get("id"), Some("5"));
/// assert_eq!(params.get("post"), Some("hello"));
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Params {
    inner: SmallVec<[(String, String); SMALL]>,
}

impl Params {
    pub fn new() -> Params {
        Params {
            inner: SmallVec::new(),
        }
    }

    pub(crate) fn push(&mut self, name: &str, value: &str) {
        self.inner.push((name.to_string(), value.to_string()));
    }

    /// 名前で値を取得する
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> ParamsIter<'_> {
        ParamsIter {
            inner: self.inner.iter(),
        }
    }
}

impl fmt::Debug for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// An iterator over `(name, value)` pairs in declaration order.
pub struct ParamsIter<'p> {
    inner: slice::Iter<'p, (String, String)>,
}

impl<'p> Iterator for ParamsIter<'p> {
    type Item = (&'p str, &'p str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for ParamsIter<'_> {}

impl<'p> IntoIterator for &'p Params {
    type Item = (&'p str, &'p str);
    type IntoIter = ParamsIter<'p>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spills_past_inline_capacity() {
        let mut params = Params::new();
        for i in 0..(SMALL + 2) {
            params.push(&format!("k{}", i), &i.to_string());
        }
        assert_eq!(params.len(), SMALL + 2);
        assert_eq!(params.get("k5"), Some("5"));
        let names: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["k0", "k1", "k2", "k3", "k4", "k5"]);
    }

    #[test]
    fn debug_is_a_map() {
        let mut params = Params::new();
        params.push("id", "5");
        assert_eq!(format!("{:?}", params), r#"{"id": "5"}"#);
    }
}
