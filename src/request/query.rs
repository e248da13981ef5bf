/// クエリ文字列のデコード
/// 例: "tags=a&tags=b&q=rust" -> [("tags", ["a", "b"]), ("q", ["rust"])]
///
/// キーの順番は最初に現れた順、同じキーの値は出現順にまとめる
/// `=` のないペアと空のキーは捨てる
/// パーセントデコードはしない (トランスポート層の仕事)
pub fn parse(raw: &str) -> Vec<(String, Vec<String>)> {
    let mut pairs: Vec<(String, Vec<String>)> = Vec::new();
    for (key, value) in raw.split('&').filter_map(|s| s.split_once('=')) {
        if key.is_empty() {
            continue;
        }
        match pairs.iter_mut().find(|(k, _)| k == key) {
            Some((_, values)) => values.push(value.to_string()),
            None => pairs.push((key.to_string(), vec![value.to_string()])),
        }
    }
    pairs
}

/// "/users/5?active=true" を パス と クエリ に分ける
/// フラグメントは捨てる
#[inline]
pub fn split_target(target: &str) -> (&str, Option<&str>) {
    let target = target.split('#').next().unwrap_or(target);
    match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    }
}
