/// レスポンスヘッダ
/// キーは大文字小文字を区別せずに比較する
#[derive(Debug, Default, Clone)]
pub struct Header {
    /// ヘッダのキーと値のペア
    /// リニアサーチの方が早い
    pub headers: Vec<(String, String)>,
}

impl Header {
    pub fn new() -> Header {
        Header {
            headers: Vec::new(),
        }
    }

    /// 同じキーがあれば置き換える
    pub fn set(&mut self, key: &str, value: &str) {
        match self.index(key) {
            Some(i) => self.headers[i].1 = value.to_string(),
            None => self.headers.push((key.to_string(), value.to_string())),
        }
    }

    /// 重複を許して追加する (Set-Cookie など)
    pub fn append(&mut self, key: &str, value: &str) {
        self.headers.push((key.to_string(), value.to_string()));
    }

    pub fn del(&mut self, key: &str) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(key));
    }

    /// ヘッダを取得する
    /// 任意のキーに対応するヘッダを線形探索します
    pub fn get(&self, key: &str) -> Option<&str> {
        self.headers.iter().find(|(k, _)| k.eq_ignore_ascii_case(key)).map(|(_, v)| v.as_str())
    }

    pub fn gets(&self, key: &str) -> Vec<&str> {
        self.headers.iter().filter(|(k, _)| k.eq_ignore_ascii_case(key)).map(|(_, v)| v.as_str()).collect()
    }

    pub fn index(&self, key: &str) -> Option<usize> {
        self.headers.iter().position(|(k, _)| k.eq_ignore_ascii_case(key))
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_case_insensitively() {
        let mut header = Header::new();
        header.set("Content-Type", "text/plain");
        header.set("content-type", "text/html");
        assert_eq!(header.len(), 1);
        assert_eq!(header.get("CONTENT-TYPE"), Some("text/html"));
    }

    #[test]
    fn append_keeps_duplicates() {
        let mut header = Header::new();
        header.append("Set-Cookie", "a=1");
        header.append("Set-Cookie", "b=2");
        assert_eq!(header.gets("set-cookie"), vec!["a=1", "b=2"]);
        header.del("SET-COOKIE");
        assert!(header.is_empty());
    }
}
