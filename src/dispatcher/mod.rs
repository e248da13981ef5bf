//! Request dispatcher
//!
//! リクエストの振り分けとチェーン実行
//!
//! ```text
//! (scope, method, path)
//!     → RouteTable::resolve        一致なし / パスなし → Fallback::on_not_found
//!     → params / query を属性へ
//!     → chain[0] → chain[1] → ...  Halt で停止、Err で Fallback::on_error
//! ```

use std::fmt;
use std::sync::Arc;

use log::{debug, error, info, warn};
use parking_lot::RwLock;

use crate::config::DispatchConfig;
use crate::context::Context;
use crate::middleware::{Chain, Next};
use crate::router::RouteTable;
use crate::scope::ScopeId;
use crate::utils::method::Method;

pub mod fallback;

pub use fallback::{DefaultFallback, Fallback};

/// なぜ NotFound になったか
/// フォールバックには区別せずに渡す
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Miss {
    /// リクエストにパスがない
    NoPathInfo,
    /// 一致するルートがない
    NoRouteMatch,
}

/// ディスパッチ1回の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 全ハンドラが Continue を返した
    Completed,
    /// `at` 番目のハンドラが Halt を返した
    Halted { at: usize },
    /// `at` 番目のハンドラがエラーを返した (on_error 済み)
    Failed { at: usize },
    /// on_not_found 済み
    NotFound(Miss),
}

impl Outcome {
    /// ルートに一致したか
    pub fn is_matched(&self) -> bool {
        !matches!(self, Outcome::NotFound(_))
    }
}

/// Copy-on-write holder of the current route table.
///
/// Readers clone the `Arc` and release the lock immediately, so a swap never
/// waits on in-flight requests and those requests keep the table they started
/// with.
///
/// ルートテーブルの差し替え用 (読む側はロックをすぐ離す)
pub struct SharedTable<C> {
    current: RwLock<Arc<RouteTable<C>>>,
}

impl<C> SharedTable<C> {
    pub fn new(table: RouteTable<C>) -> Self {
        SharedTable {
            current: RwLock::new(Arc::new(table)),
        }
    }

    /// 今のテーブルのスナップショット
    #[inline]
    pub fn load(&self) -> Arc<RouteTable<C>> {
        Arc::clone(&self.current.read())
    }

    /// テーブルを丸ごと差し替えて古い方を返す
    pub fn swap(&self, table: RouteTable<C>) -> Arc<RouteTable<C>> {
        std::mem::replace(&mut *self.current.write(), Arc::new(table))
    }
}

/// Builder for [`Dispatcher`].
pub struct DispatcherBuilder<C> {
    table: RouteTable<C>,
    fallback: Option<Arc<dyn Fallback<C>>>,
    config: DispatchConfig,
}

impl<C: Send + 'static> DispatcherBuilder<C> {
    /// NotFound / エラー時の処理を差し替える
    pub fn fallback<F>(mut self, fallback: F) -> Self
    where
        F: Fallback<C> + 'static,
    {
        self.fallback = Some(Arc::new(fallback));
        self
    }

    pub fn config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Dispatcher<C> {
        info!(
            "dispatcher ready: {} routes, param prefix {:?}, query prefix {:?} (expose: {})",
            self.table.len(),
            self.config.param_prefix,
            self.config.query_prefix,
            self.config.expose_query
        );
        Dispatcher {
            table: SharedTable::new(self.table),
            fallback: self.fallback.unwrap_or_else(|| Arc::new(DefaultFallback)),
            config: self.config,
        }
    }
}

/// Resolves requests against a [`RouteTable`] and runs the matched chain.
///
/// `Dispatcher` is `Send + Sync`; share it behind an `Arc` and call
/// [`Dispatcher::route`] from as many workers as needed.
///
/// ルートを解決してチェーンを実行する
pub struct Dispatcher<C> {
    table: SharedTable<C>,
    fallback: Arc<dyn Fallback<C>>,
    config: DispatchConfig,
}

impl<C: Send + 'static> Dispatcher<C> {
    pub fn new(table: RouteTable<C>) -> Dispatcher<C> {
        Dispatcher::builder(table).build()
    }

    pub fn builder(table: RouteTable<C>) -> DispatcherBuilder<C> {
        DispatcherBuilder {
            table,
            fallback: None,
            config: DispatchConfig::default(),
        }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// 今のルートテーブル
    pub fn table(&self) -> Arc<RouteTable<C>> {
        self.table.load()
    }

    /// ルートテーブルを差し替える
    /// 実行中のリクエストは古いテーブルのまま最後まで走る
    pub fn swap_table(&self, table: RouteTable<C>) -> Arc<RouteTable<C>> {
        let routes = table.len();
        let old = self.table.swap(table);
        info!("route table swapped: {} -> {} routes", old.len(), routes);
        old
    }

    /// コンテキストからスコープとパスを読んでディスパッチする
    pub async fn route(&self, method: Method, ctx: &mut Context<C>) -> Outcome {
        let scope = ctx.req.scope.clone();
        let path = ctx.req.path.clone();
        self.dispatch(&scope, method, path.as_deref(), ctx).await
    }

    /// (scope, method, path) でルートを解決してチェーンを実行する
    pub async fn dispatch(
        &self,
        scope: &ScopeId,
        method: Method,
        path: Option<&str>,
        ctx: &mut Context<C>,
    ) -> Outcome {
        let Some(path) = path else {
            warn!("[{}] {} <no path> - not found", scope, method);
            return self.not_found(Miss::NoPathInfo, ctx).await;
        };

        let table = self.table.load();
        let Some(matched) = table.resolve(scope, method, path) else {
            warn!("[{}] {} {} - not found", scope, method, path);
            return self.not_found(Miss::NoRouteMatch, ctx).await;
        };
        debug!(
            "[{}] {} {} -> route #{} {} {:?}",
            scope,
            method,
            path,
            matched.index,
            matched.entry.pattern(),
            matched.params
        );

        let chain = matched.chain().clone();
        ctx.req.params = matched.params;
        ctx.req.expose_params(&self.config.param_prefix);
        if self.config.expose_query {
            ctx.req.expose_query(&self.config.query_prefix);
        }

        let outcome = self.run_chain(&chain, ctx).await;
        debug!("[{}] {} {} - {:?} ({})", scope, method, path, outcome, ctx.res.code);
        outcome
    }

    /// チェーンを先頭から順に実行する
    /// Continue なら次へ、Halt ならそこで終了、Err なら on_error を呼んで終了
    pub async fn run_chain(&self, chain: &Chain<C>, ctx: &mut Context<C>) -> Outcome {
        for (at, handler) in chain.iter().enumerate() {
            match handler.handle(ctx).await {
                Ok(Next::Continue) => {}
                Ok(Next::Halt) => {
                    debug!("chain halted at handler #{} of {}", at, chain.len());
                    return Outcome::Halted { at };
                }
                Err(err) => {
                    error!("handler #{} of {} failed: {}", at, chain.len(), err);
                    self.fallback.on_error(&err, ctx).await;
                    return Outcome::Failed { at };
                }
            }
        }
        Outcome::Completed
    }

    async fn not_found(&self, miss: Miss, ctx: &mut Context<C>) -> Outcome {
        self.fallback.on_not_found(ctx).await;
        Outcome::NotFound(miss)
    }
}

impl<C> fmt::Debug for Dispatcher<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.table.load().len())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::from_fn;
    use crate::request::Req;

    fn counter(hits: Arc<std::sync::atomic::AtomicUsize>, next: Next) -> crate::middleware::BoxedHandler<()> {
        from_fn(move |_c: &mut Context<()>| {
            hits.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(next)
        })
    }

    #[tokio::test]
    async fn run_chain_stops_at_halt() {
        let hits = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let chain: Chain<()> = [
            counter(hits.clone(), Next::Continue),
            counter(hits.clone(), Next::Halt),
            counter(hits.clone(), Next::Continue),
        ]
        .into_iter()
        .collect();
        let dispatcher = Dispatcher::new(RouteTable::new());
        let mut ctx = Context::new(Req::new("api", Some("/")), ());
        assert_eq!(dispatcher.run_chain(&chain, &mut ctx).await, Outcome::Halted { at: 1 });
        assert_eq!(hits.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_table_is_not_found() {
        let dispatcher: Dispatcher<()> = Dispatcher::new(RouteTable::new());
        let mut ctx = Context::new(Req::new("api", Some("/")), ());
        let outcome = dispatcher.route(Method::GET, &mut ctx).await;
        assert_eq!(outcome, Outcome::NotFound(Miss::NoRouteMatch));
        assert!(!outcome.is_matched());
        assert_eq!(ctx.res.code, 404);
    }

    #[test]
    fn shared_table_swap_keeps_old_snapshot() {
        let shared: SharedTable<()> = SharedTable::new(RouteTable::new());
        let before = shared.load();
        let mut next = RouteTable::new();
        next.register("api".into(), Method::GET, "/", Chain::empty()).unwrap();
        let old = shared.swap(next);
        assert!(Arc::ptr_eq(&before, &old));
        assert!(before.is_empty());
        assert_eq!(shared.load().len(), 1);
    }
}
