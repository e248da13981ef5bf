//! Routing scopes.
//!
//! ルーティングスコープ
//!
//! A [`Scope`] is the registration handle for one routing namespace. It owns
//! the namespace's [`MiddlewareSet`] and stamps every route it registers with
//! its [`ScopeId`]. The middleware is copied into the route's chain at the
//! moment of registration:
//!
//! ```rust
//! use domain_router::middleware::{from_fn, Next};
//! use domain_router::router::RouteTable;
//! use domain_router::scope::Scope;
//! use domain_router::context::{Context, DefaultContext};
//!
//! let auth = from_fn(|_c: &mut Context<DefaultContext>| Ok(Next::Continue));
//! let list = from_fn(|c: &mut Context<DefaultContext>| {
//!     c.res.text("users");
//!     Ok(Next::Continue)
//! });
//!
//! let mut table = RouteTable::new();
//! let mut api = Scope::new("api").with_middleware([auth]);
//! api.get(&mut table, "/users", [list]).unwrap();
//! assert_eq!(table.len(), 1);
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::error::RouterResult;
use crate::middleware::{BoxedHandler, Chain, MiddlewareSet};
use crate::router::RouteTable;
use crate::utils::method::Method;

/// スコープの識別子
/// 呼び出し側が明示的に決める (自動生成はしない)
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(Arc<str>);

impl ScopeId {
    pub fn new(id: &str) -> ScopeId {
        ScopeId(Arc::from(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ScopeId {
    fn from(id: &str) -> Self {
        ScopeId::new(id)
    }
}

impl From<String> for ScopeId {
    fn from(id: String) -> Self {
        ScopeId(Arc::from(id))
    }
}

impl From<&ScopeId> for ScopeId {
    fn from(id: &ScopeId) -> Self {
        id.clone()
    }
}

impl Borrow<str> for ScopeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeId({:?})", &*self.0)
    }
}

/// ルート登録用のスコープ
pub struct Scope<C> {
    id: ScopeId,
    middleware: MiddlewareSet<C>,
}

impl<C> Scope<C> {
    pub fn new(id: impl Into<ScopeId>) -> Scope<C> {
        Scope {
            id: id.into(),
            middleware: MiddlewareSet::new(),
        }
    }

    pub fn id(&self) -> &ScopeId {
        &self.id
    }

    pub fn middleware(&self) -> &MiddlewareSet<C> {
        &self.middleware
    }

    /// ビルダー形式でミドルウェアを足す
    pub fn with_middleware<I>(mut self, handlers: I) -> Self
    where
        I: IntoIterator<Item = BoxedHandler<C>>,
    {
        self.middleware.add(handlers);
        self
    }

    /// 以降に登録するルートの前に付くミドルウェアを足す
    pub fn use_handlers<I>(&mut self, handlers: I) -> &mut Self
    where
        I: IntoIterator<Item = BoxedHandler<C>>,
    {
        self.middleware.add(handlers);
        self
    }

    /// ミドルウェアを取り除く (登録済みのルートには影響しない)
    pub fn remove<'a, I>(&mut self, handlers: I) -> &mut Self
    where
        C: 'a,
        I: IntoIterator<Item = &'a BoxedHandler<C>>,
    {
        self.middleware.remove(handlers);
        self
    }

    /// 今のミドルウェア + handlers の固定チェーン
    pub fn chain<I>(&self, handlers: I) -> Chain<C>
    where
        I: IntoIterator<Item = BoxedHandler<C>>,
    {
        self.middleware.snapshot_and_combine(handlers)
    }

    /// ルートを登録する
    pub fn register<I>(
        &mut self,
        table: &mut RouteTable<C>,
        method: Method,
        pattern: &str,
        handlers: I,
    ) -> RouterResult<&mut Self>
    where
        I: IntoIterator<Item = BoxedHandler<C>>,
    {
        let chain = self.chain(handlers);
        debug!(
            "scope {}: {} {} ({} middleware, {} handlers in chain)",
            self.id,
            method,
            pattern,
            self.middleware.len(),
            chain.len()
        );
        table.register(self.id.clone(), method, pattern, chain)?;
        Ok(self)
    }

    pub fn get<I>(&mut self, table: &mut RouteTable<C>, pattern: &str, handlers: I) -> RouterResult<&mut Self>
    where
        I: IntoIterator<Item = BoxedHandler<C>>,
    {
        self.register(table, Method::GET, pattern, handlers)
    }

    pub fn post<I>(&mut self, table: &mut RouteTable<C>, pattern: &str, handlers: I) -> RouterResult<&mut Self>
    where
        I: IntoIterator<Item = BoxedHandler<C>>,
    {
        self.register(table, Method::POST, pattern, handlers)
    }

    pub fn put<I>(&mut self, table: &mut RouteTable<C>, pattern: &str, handlers: I) -> RouterResult<&mut Self>
    where
        I: IntoIterator<Item = BoxedHandler<C>>,
    {
        self.register(table, Method::PUT, pattern, handlers)
    }

    pub fn delete<I>(&mut self, table: &mut RouteTable<C>, pattern: &str, handlers: I) -> RouterResult<&mut Self>
    where
        I: IntoIterator<Item = BoxedHandler<C>>,
    {
        self.register(table, Method::DELETE, pattern, handlers)
    }
}

impl<C> fmt::Debug for Scope<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("id", &self.id)
            .field("middleware", &self.middleware)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::middleware::{Next, from_fn};

    fn noop() -> BoxedHandler<()> {
        from_fn(|_ctx: &mut Context<()>| Ok(Next::Continue))
    }

    #[test]
    fn scope_id_equality_is_by_string() {
        assert_eq!(ScopeId::new("api"), ScopeId::from("api".to_string()));
        assert_ne!(ScopeId::new("api"), ScopeId::new("API"));
        assert_eq!(ScopeId::new("admin").to_string(), "admin");
    }

    #[test]
    fn registration_snapshots_middleware() {
        let (a, b, h) = (noop(), noop(), noop());
        let mut table = RouteTable::new();
        let mut scope = Scope::new("api");

        scope.use_handlers([a.clone()]);
        scope.get(&mut table, "/x", [h.clone()]).unwrap();
        scope.use_handlers([b.clone()]);

        let matched = table.resolve(&"api".into(), Method::GET, "/x").unwrap();
        assert!(matched.chain().same_handlers(&[&a, &h]));
    }

    #[test]
    fn remove_only_affects_later_routes() {
        let (a, h) = (noop(), noop());
        let mut table = RouteTable::new();
        let mut scope = Scope::new("api").with_middleware([a.clone()]);

        scope
            .get(&mut table, "/before", [h.clone()])
            .unwrap()
            .remove([&a])
            .get(&mut table, "/after", [h.clone()])
            .unwrap();

        let id = scope.id().clone();
        let before = table.resolve(&id, Method::GET, "/before").unwrap();
        let after = table.resolve(&id, Method::GET, "/after").unwrap();
        assert!(before.chain().same_handlers(&[&a, &h]));
        assert!(after.chain().same_handlers(&[&h]));
    }

    #[test]
    fn duplicate_param_registration_fails() {
        let mut table = RouteTable::new();
        let mut scope: Scope<()> = Scope::new("api");
        assert!(scope.get(&mut table, "/:id/:id", []).is_err());
        assert!(table.is_empty());
    }
}
