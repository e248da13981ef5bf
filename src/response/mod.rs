use crate::utils::header::Header;
use crate::utils::status::status_code;

/// ハンドラとフォールバックが書き込むレスポンス
/// 送信はトランスポート層の仕事なのでここでは保持するだけ
#[derive(Debug, Clone)]
pub struct Res {
    /// ステータスコード
    pub code: u16,
    /// ヘッダ
    pub header: Header,
    /// ボディ
    pub body: String,
}

/// レスポンス構築するやつ
impl Res {
    pub fn new() -> Res {
        Res {
            code: status_code::OK,
            header: Header::new(),
            body: String::new(),
        }
    }

    /// テキストレスポンス
    #[inline]
    pub fn text(&mut self, text: &str) -> &mut Self {
        self.body_with("text/plain", text)
    }

    /// HTMLレスポンス
    #[inline]
    pub fn html(&mut self, text: &str) -> &mut Self {
        self.body_with("text/html", text)
    }

    /// JSONレスポンス
    #[inline]
    pub fn json(&mut self, text: &str) -> &mut Self {
        self.body_with("application/json", text)
    }

    /// JSONレスポンス (serde_json::Value から)
    #[inline]
    pub fn json_value(&mut self, value: &serde_json::Value) -> &mut Self {
        let text = value.to_string();
        self.body_with("application/json", &text)
    }

    #[inline]
    pub fn set_status(&mut self, code: u16) -> &mut Self {
        self.code = code;
        self
    }

    #[inline]
    pub fn set_header(&mut self, key: &str, value: &str) -> &mut Self {
        self.header.set(key, value);
        self
    }

    /// まだ何も書かれていないか
    pub fn is_untouched(&self) -> bool {
        self.code == status_code::OK && self.body.is_empty() && self.header.is_empty()
    }

    fn body_with(&mut self, content_type: &str, text: &str) -> &mut Self {
        self.header.set("Content-Type", content_type);
        self.header.set("Content-Length", &text.len().to_string());
        self.body = text.to_string();
        self
    }
}

impl Default for Res {
    fn default() -> Self {
        Res::new()
    }
}
