use crate::request::Req;
use crate::response::Res;

/// ハンドラに渡されるコンテキスト
/// `c` はアプリケーションの状態 (ミドルウェア間の受け渡しにも使う)
pub struct Context<C> {
    pub req: Req,
    pub res: Res,
    pub c: C,
}

impl<C> Context<C> {
    pub fn new(req: Req, c: C) -> Context<C> {
        Context {
            req,
            res: Res::new(),
            c,
        }
    }

    /// レスポンスを取り出して捨てる
    pub fn into_res(self) -> Res {
        self.res
    }
}

#[derive(Clone, Debug, Default)]
pub struct DefaultContext {}

impl DefaultContext {
    pub fn new() -> DefaultContext {
        DefaultContext {}
    }
}

impl Context<DefaultContext> {
    /// 状態を持たないコンテキスト
    pub fn plain(req: Req) -> Context<DefaultContext> {
        Context::new(req, DefaultContext::new())
    }
}
