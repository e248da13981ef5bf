use std::sync::Arc;
use std::time::Duration;

use log::warn;

use crate::context::Context;
use crate::error::HandlerError;
use crate::middleware::{BoxedHandler, Handler, HandlerResult};
use crate::utils::status::status_code;
use crate::utils::with_timeout;

/// ハンドラ1回の呼び出しに期限を付けるラッパー
/// 期限切れはハンドラの失敗 (504) として扱う
pub struct Timeout<C> {
    inner: BoxedHandler<C>,
    limit: Duration,
}

impl<C> Timeout<C> {
    pub fn new(inner: BoxedHandler<C>, limit: Duration) -> Self {
        Timeout { inner, limit }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }
}

impl<C: Send + 'static> Timeout<C> {
    pub fn into_boxed(self) -> BoxedHandler<C> {
        Arc::new(self)
    }
}

#[async_trait::async_trait]
impl<C: Send + 'static> Handler<C> for Timeout<C> {
    async fn handle(&self, ctx: &mut Context<C>) -> HandlerResult {
        match with_timeout(self.inner.handle(ctx), self.limit).await {
            Ok(result) => result,
            Err(()) => {
                warn!("handler timed out after {:?}", self.limit);
                Err(HandlerError::msg(format!("handler timed out after {:?}", self.limit))
                    .with_status(status_code::GATEWAY_TIMEOUT))
            }
        }
    }
}
