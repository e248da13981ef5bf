use log::debug;

use crate::context::Context;
use crate::error::{HandlerError, HttpError};

/// Collaborator invoked when the dispatcher cannot complete a request itself.
///
/// The embedding application decides what a miss or a failure looks like.
///
/// 一致しなかったとき・ハンドラが失敗したときに呼ばれる
#[async_trait::async_trait]
pub trait Fallback<C>: Send + Sync {
    /// パスがない or 一致するルートがない
    async fn on_not_found(&self, ctx: &mut Context<C>);
    /// ハンドラがエラーを返した
    async fn on_error(&self, err: &HandlerError, ctx: &mut Context<C>);
}

/// 素のテキストで 404 / 500 を書くだけのフォールバック
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFallback;

#[async_trait::async_trait]
impl<C: Send + 'static> Fallback<C> for DefaultFallback {
    async fn on_not_found(&self, ctx: &mut Context<C>) {
        ctx.res = HttpError::NotFound.err_res();
    }

    async fn on_error(&self, err: &HandlerError, ctx: &mut Context<C>) {
        debug!("default fallback rendering error: {}", err);
        ctx.res = HttpError::from(err).err_res();
    }
}
