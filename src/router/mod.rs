//! Ordered route table (first match wins)
//!
//! 順序付きルートテーブル（先に登録したものが勝つ）

use std::fmt;

use ahash::AHashMap as Map;
use log::debug;
use smallvec::SmallVec;

use crate::error::RouterResult;
use crate::middleware::Chain;
use crate::scope::ScopeId;
use crate::utils::method::Method;

pub mod params;
pub mod pattern;

pub use params::Params;
pub use pattern::{PathPattern, Segment};

/// One registered route.
///
/// Never mutated after it is appended to a [`RouteTable`].
///
/// 登録済みのルート1件。テーブルに入った後は変更されない。
pub struct RouteEntry<C> {
    scope: ScopeId,
    method: Method,
    pattern: PathPattern,
    chain: Chain<C>,
}

impl<C> RouteEntry<C> {
    pub fn scope(&self) -> &ScopeId {
        &self.scope
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn chain(&self) -> &Chain<C> {
        &self.chain
    }
}

impl<C> fmt::Debug for RouteEntry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("scope", &self.scope)
            .field("method", &self.method)
            .field("pattern", &self.pattern.as_str())
            .field("chain", &self.chain)
            .finish()
    }
}

/// Result of a successful resolution.
///
/// 解決結果（一致したルートと取り出したパラメータ）
pub struct RouteMatch<'t, C> {
    /// テーブル内の位置 (= 登録順)
    pub index: usize,
    pub entry: &'t RouteEntry<C>,
    pub params: Params,
}

impl<'t, C> RouteMatch<'t, C> {
    pub fn chain(&self) -> &'t Chain<C> {
        &self.entry.chain
    }
}

impl<C> fmt::Debug for RouteMatch<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("index", &self.index)
            .field("entry", &self.entry)
            .field("params", &self.params)
            .finish()
    }
}

// scope → method → テーブル内の位置 (昇順)
type Candidates = SmallVec<[usize; 8]>;

/// Append-only route registry.
///
/// Resolution is a scan in insertion order over the entries that share the
/// request's scope and method; the first entry whose pattern matches wins.
/// The per-scope/per-method index only narrows the scan, it never reorders it.
///
/// 追加のみのルート登録簿。
/// 同じスコープ・メソッドの候補だけを登録順に走査し、最初に一致したものを返す。
pub struct RouteTable<C> {
    entries: Vec<RouteEntry<C>>,
    index: Map<ScopeId, Map<Method, Candidates>>,
}

impl<C> RouteTable<C> {
    pub fn new() -> Self {
        RouteTable {
            entries: Vec::new(),
            index: Map::default(),
        }
    }

    /// ルートを末尾に追加する
    ///
    /// Fails only when the pattern repeats a parameter name; the table is
    /// left untouched in that case.
    pub fn register(
        &mut self,
        scope: ScopeId,
        method: Method,
        pattern: &str,
        chain: Chain<C>,
    ) -> RouterResult<()> {
        let pattern = PathPattern::compile(pattern)?;
        let position = self.entries.len();

        debug!("route #{}: [{}] {} {}", position, scope, method, pattern);

        self.index
            .entry(scope.clone())
            .or_default()
            .entry(method)
            .or_default()
            .push(position);
        self.entries.push(RouteEntry {
            scope,
            method,
            pattern,
            chain,
        });
        Ok(())
    }

    /// (scope, method, path) を解決する
    #[inline]
    pub fn resolve(&self, scope: &ScopeId, method: Method, path: &str) -> Option<RouteMatch<'_, C>> {
        let candidates = self.index.get(scope)?.get(&method)?;
        candidates.iter().find_map(|&index| {
            let entry = &self.entries[index];
            entry.pattern.extract(path).map(|params| RouteMatch {
                index,
                entry,
                params,
            })
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 登録順のすべてのエントリ
    pub fn entries(&self) -> &[RouteEntry<C>] {
        &self.entries
    }

    /// 登録されているスコープ
    pub fn scopes(&self) -> impl Iterator<Item = &ScopeId> {
        self.index.keys()
    }
}

impl<C> Default for RouteTable<C> {
    fn default() -> Self {
        RouteTable::new()
    }
}

impl<C> fmt::Debug for RouteTable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::middleware::{BoxedHandler, Next, from_fn};

    fn noop() -> BoxedHandler<()> {
        from_fn(|_ctx: &mut Context<()>| Ok(Next::Continue))
    }

    fn chain_of(h: &BoxedHandler<()>) -> Chain<()> {
        [h.clone()].into_iter().collect()
    }

    fn api() -> ScopeId {
        ScopeId::new("api")
    }

    #[test]
    fn literal_then_param_routes() {
        let (list, show) = (noop(), noop());
        let mut table = RouteTable::new();
        table.register(api(), Method::GET, "/users", chain_of(&list)).unwrap();
        table.register(api(), Method::GET, "/users/:id", chain_of(&show)).unwrap();

        let m = table.resolve(&api(), Method::GET, "/users").unwrap();
        assert_eq!(m.index, 0);
        assert!(m.params.is_empty());
        assert!(m.chain().same_handlers(&[&list]));

        let m = table.resolve(&api(), Method::GET, "/users/5").unwrap();
        assert_eq!(m.index, 1);
        assert_eq!(m.params.get("id"), Some("5"));
        assert!(m.chain().same_handlers(&[&show]));
    }

    #[test]
    fn first_match_wins_deterministically() {
        let (first, second) = (noop(), noop());
        let mut table = RouteTable::new();
        table.register(api(), Method::GET, "/users/:id", chain_of(&first)).unwrap();
        table.register(api(), Method::GET, "/users/me", chain_of(&second)).unwrap();

        for _ in 0..16 {
            let m = table.resolve(&api(), Method::GET, "/users/me").unwrap();
            assert_eq!(m.index, 0);
            assert_eq!(m.params.get("id"), Some("me"));
            assert!(m.chain().same_handlers(&[&first]));
        }
    }

    #[test]
    fn order_survives_interleaved_scopes_and_methods() {
        let mut table: RouteTable<()> = RouteTable::new();
        let admin = ScopeId::new("admin");
        table.register(admin.clone(), Method::GET, "/:page", Chain::empty()).unwrap();
        table.register(api(), Method::POST, "/:page", Chain::empty()).unwrap();
        table.register(api(), Method::GET, "/:page", Chain::empty()).unwrap();
        table.register(admin.clone(), Method::GET, "/home", Chain::empty()).unwrap();
        table.register(api(), Method::GET, "/home", Chain::empty()).unwrap();

        assert_eq!(table.resolve(&admin, Method::GET, "/home").unwrap().index, 0);
        assert_eq!(table.resolve(&api(), Method::GET, "/home").unwrap().index, 2);
        assert_eq!(table.resolve(&api(), Method::POST, "/home").unwrap().index, 1);
        assert_eq!(table.len(), 5);
        assert_eq!(table.scopes().count(), 2);
    }

    #[test]
    fn scope_and_method_must_both_match() {
        let mut table: RouteTable<()> = RouteTable::new();
        table.register(api(), Method::GET, "/users", Chain::empty()).unwrap();

        assert!(table.resolve(&ScopeId::new("admin"), Method::GET, "/users").is_none());
        assert!(table.resolve(&api(), Method::DELETE, "/users").is_none());
        assert!(table.resolve(&api(), Method::GET, "/users/").is_none());
        assert!(table.resolve(&api(), Method::GET, "/users").is_some());
    }

    #[test]
    fn empty_chain_still_matches() {
        let mut table: RouteTable<()> = RouteTable::new();
        table.register(api(), Method::PUT, "/noop", Chain::empty()).unwrap();
        let m = table.resolve(&api(), Method::PUT, "/noop").unwrap();
        assert!(m.chain().is_empty());
    }

    #[test]
    fn duplicates_are_kept_not_merged() {
        let mut table: RouteTable<()> = RouteTable::new();
        table.register(api(), Method::GET, "/same", Chain::empty()).unwrap();
        table.register(api(), Method::GET, "/same", Chain::empty()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve(&api(), Method::GET, "/same").unwrap().index, 0);
    }

    #[test]
    fn failed_registration_leaves_table_untouched() {
        let mut table: RouteTable<()> = RouteTable::new();
        assert!(table.register(api(), Method::GET, "/:a/:a", Chain::empty()).is_err());
        assert!(table.is_empty());
        assert!(table.resolve(&api(), Method::GET, "/x/y").is_none());
        assert_eq!(table.scopes().count(), 0);
    }
}
