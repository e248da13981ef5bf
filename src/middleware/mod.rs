//! Handlers, middleware sets and frozen chains.
//!
//! ハンドラ・ミドルウェア集合・固定済みチェーン

use std::fmt;
use std::sync::Arc;

use crate::context::Context;
use crate::error::HandlerError;

pub mod timeout;

/// ハンドラの戻り値
/// チェーンを続けるか止めるか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    /// 次のハンドラへ
    Continue,
    /// ここで止める (レスポンスは書き終わっている前提)
    Halt,
}

impl From<bool> for Next {
    #[inline]
    fn from(cont: bool) -> Self {
        if cont { Next::Continue } else { Next::Halt }
    }
}

pub type HandlerResult = Result<Next, HandlerError>;

/// Trait for a single step of a route's chain.
///
/// Middleware and terminal actions share this one capability. Returning
/// `Next::Halt` or an error stops the chain.
///
/// ルートのチェーンの1ステップ
/// ミドルウェアも最終ハンドラも同じトレイトで表す
#[async_trait::async_trait]
pub trait Handler<C>: Send + Sync {
    async fn handle(&self, ctx: &mut Context<C>) -> HandlerResult;
}

#[async_trait::async_trait]
impl<C, F> Handler<C> for F
where
    C: Send + 'static,
    F: Fn(&mut Context<C>) -> HandlerResult + Send + Sync,
{
    async fn handle(&self, ctx: &mut Context<C>) -> HandlerResult {
        self(ctx)
    }
}

/// 共有されるハンドラ参照
/// 同一性は `Arc` のポインタで判定する
pub type BoxedHandler<C> = Arc<dyn Handler<C>>;

/// 同期クロージャをハンドラにする
pub fn from_fn<C, F>(f: F) -> BoxedHandler<C>
where
    C: Send + 'static,
    F: Fn(&mut Context<C>) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// スコープごとのミドルウェア集合
///
/// Changes only affect chains taken after the change; chains already handed
/// out by [`MiddlewareSet::snapshot_and_combine`] keep their own copy.
pub struct MiddlewareSet<C> {
    handlers: Vec<BoxedHandler<C>>,
}

impl<C> MiddlewareSet<C> {
    pub fn new() -> Self {
        MiddlewareSet {
            handlers: Vec::new(),
        }
    }

    /// 末尾に追加する
    pub fn add<I>(&mut self, handlers: I)
    where
        I: IntoIterator<Item = BoxedHandler<C>>,
    {
        self.handlers.extend(handlers);
    }

    /// 同一のハンドラ (同じ Arc) をすべて取り除く
    pub fn remove<'a, I>(&mut self, handlers: I)
    where
        C: 'a,
        I: IntoIterator<Item = &'a BoxedHandler<C>>,
    {
        for target in handlers {
            self.handlers.retain(|h| !Arc::ptr_eq(h, target));
        }
    }

    pub fn contains(&self, handler: &BoxedHandler<C>) -> bool {
        self.handlers.iter().any(|h| Arc::ptr_eq(h, handler))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// 今の中身をコピーして、後ろにルートのハンドラを足した固定チェーンを作る
    pub fn snapshot_and_combine<I>(&self, route_handlers: I) -> Chain<C>
    where
        I: IntoIterator<Item = BoxedHandler<C>>,
    {
        self.handlers
            .iter()
            .cloned()
            .chain(route_handlers)
            .collect()
    }
}

impl<C> Default for MiddlewareSet<C> {
    fn default() -> Self {
        MiddlewareSet::new()
    }
}

impl<C> Clone for MiddlewareSet<C> {
    fn clone(&self) -> Self {
        MiddlewareSet {
            handlers: self.handlers.clone(),
        }
    }
}

impl<C> fmt::Debug for MiddlewareSet<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareSet")
            .field("len", &self.handlers.len())
            .finish()
    }
}

/// 登録時に固定されたハンドラ列
/// 空でもよい (一致はするが何もしない)
pub struct Chain<C> {
    handlers: Arc<[BoxedHandler<C>]>,
}

impl<C> Chain<C> {
    pub fn empty() -> Self {
        Chain {
            handlers: Arc::from(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&BoxedHandler<C>> {
        self.handlers.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BoxedHandler<C>> {
        self.handlers.iter()
    }

    /// 同じハンドラが同じ順番で並んでいるか
    pub fn same_handlers(&self, expected: &[&BoxedHandler<C>]) -> bool {
        self.handlers.len() == expected.len()
            && self
                .handlers
                .iter()
                .zip(expected)
                .all(|(h, e)| Arc::ptr_eq(h, e))
    }
}

impl<C> Clone for Chain<C> {
    fn clone(&self) -> Self {
        Chain {
            handlers: Arc::clone(&self.handlers),
        }
    }
}

impl<C> FromIterator<BoxedHandler<C>> for Chain<C> {
    fn from_iter<T: IntoIterator<Item = BoxedHandler<C>>>(iter: T) -> Self {
        Chain {
            handlers: iter.into_iter().collect(),
        }
    }
}

impl<C> fmt::Debug for Chain<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("len", &self.handlers.len())
            .finish()
    }
}
