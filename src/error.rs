use std::fmt;

use thiserror::Error;

use crate::response::Res;
use crate::utils::status::status_code;

/// 登録・設定まわりのエラー
#[derive(Error, Debug)]
pub enum RouterError {
    /// 1つのパターン内でパラメータ名が重複している (`/:id/:id`)
    #[error("duplicate parameter `{name}` in pattern `{pattern}`")]
    DuplicateParam { pattern: String, name: String },

    #[error("invalid dispatch config: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

pub type RouterResult<T> = Result<T, RouterError>;

/// ハンドラが返す実行時エラー
///
/// Any `std::error::Error + Send + Sync` converts into it with `?`.
///
/// 任意のエラーを `?` で包めるように `std::error::Error` は実装しない
pub struct HandlerError {
    status: Option<u16>,
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl HandlerError {
    /// 文字列だけのエラー
    pub fn msg(message: impl Into<String>) -> HandlerError {
        let message: String = message.into();
        HandlerError {
            status: None,
            source: message.into(),
        }
    }

    /// ステータスコードのヒントを付ける
    /// フォールバックがレスポンスを組み立てるときに使う
    pub fn with_status(mut self, status: u16) -> HandlerError {
        self.status = Some(status);
        self
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn source(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.source.as_ref()
    }

    /// 元のエラーを型付きで取り出す
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.downcast_ref::<E>()
    }
}

impl<E> From<E> for HandlerError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(err: E) -> Self {
        HandlerError {
            status: None,
            source: Box::new(err),
        }
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "[{}] {}", status, self.source),
            None => write!(f, "{}", self.source),
        }
    }
}

impl fmt::Debug for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerError")
            .field("status", &self.status)
            .field("source", &self.source)
            .finish()
    }
}

/// レスポンスとして返せるエラー
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Not Found")]
    NotFound,
    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
    #[error("Gateway Timeout")]
    GatewayTimeout,
    #[error("Status: {0}, Message: {1}")]
    CUSTOM(u16, String),
}

impl HttpError {
    pub fn status(&self) -> u16 {
        match self {
            HttpError::NotFound => status_code::NOT_FOUND,
            HttpError::InternalServerError(_) => status_code::INTERNAL_SERVER_ERROR,
            HttpError::GatewayTimeout => status_code::GATEWAY_TIMEOUT,
            HttpError::CUSTOM(status, _) => *status,
        }
    }

    pub fn err_res(&self) -> Res {
        let mut res = Res::new();
        res.set_status(self.status());
        match self {
            HttpError::CUSTOM(_, message) => res.text(message),
            other => res.text(&other.to_string()),
        };
        res
    }
}

impl From<&HandlerError> for HttpError {
    fn from(err: &HandlerError) -> Self {
        match err.status() {
            None | Some(status_code::INTERNAL_SERVER_ERROR) => {
                HttpError::InternalServerError(err.source().to_string())
            }
            Some(status_code::GATEWAY_TIMEOUT) => HttpError::GatewayTimeout,
            Some(status) => HttpError::CUSTOM(status, err.source().to_string()),
        }
    }
}
