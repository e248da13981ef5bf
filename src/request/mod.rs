use ahash::AHashMap as Map;

use crate::router::params::Params;
use crate::scope::ScopeId;

pub mod query;

/// リクエスト属性の値
/// クエリの同じキーが複数あると `Many` になる
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
    One(String),
    Many(Vec<String>),
}

impl Attribute {
    /// 単一値ならそれ、複数なら最初の値
    pub fn first(&self) -> Option<&str> {
        match self {
            Attribute::One(v) => Some(v.as_str()),
            Attribute::Many(vs) => vs.first().map(String::as_str),
        }
    }

    pub fn as_one(&self) -> Option<&str> {
        match self {
            Attribute::One(v) => Some(v.as_str()),
            Attribute::Many(_) => None,
        }
    }

    pub fn values(&self) -> Vec<&str> {
        match self {
            Attribute::One(v) => vec![v.as_str()],
            Attribute::Many(vs) => vs.iter().map(String::as_str).collect(),
        }
    }
}

/// ディスパッチャに渡すリクエスト
///
/// The transport layer fills `scope`, `path` and `query`; the dispatcher
/// fills `params` and the namespaced attributes.
pub struct Req {
    /// どのスコープで解決するか
    pub scope: ScopeId,
    /// パス情報 (クエリなし)
    /// None ならパスなし扱いで NotFound
    pub path: Option<String>,
    /// 生のクエリ文字列 (`?` の後ろ)
    pub query: Option<String>,
    /// 一致したルートのパラメータ
    pub params: Params,
    attributes: Map<String, Attribute>,
}

impl Req {
    #[inline]
    pub fn new(scope: impl Into<ScopeId>, path: Option<&str>) -> Req {
        Req {
            scope: scope.into(),
            path: path.map(str::to_string),
            query: None,
            params: Params::new(),
            attributes: Map::default(),
        }
    }

    /// "/users/5?active=true" のようなリクエストターゲットから作る
    #[inline]
    pub fn from_target(scope: impl Into<ScopeId>, target: &str) -> Req {
        let (path, query) = query::split_target(target);
        let mut req = Req::new(scope, Some(path));
        req.query = query.map(str::to_string);
        req
    }

    pub fn with_query(mut self, query: &str) -> Req {
        self.query = Some(query.to_string());
        self
    }

    /// パスパラメータを取得する
    #[inline]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// 属性を取得する
    #[inline]
    pub fn attribute(&self, key: &str) -> Option<&Attribute> {
        self.attributes.get(key)
    }

    /// 属性をセットする (同じキーは上書き)
    #[inline]
    pub fn set_attribute(&mut self, key: impl Into<String>, value: Attribute) {
        self.attributes.insert(key.into(), value);
    }

    #[inline]
    pub fn remove_attribute(&mut self, key: &str) -> Option<Attribute> {
        self.attributes.remove(key)
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// 一致したパラメータを `prefix + name` で属性に流し込む
    pub(crate) fn expose_params(&mut self, prefix: &str) {
        for (name, value) in self.params.iter() {
            self.attributes
                .insert(format!("{}{}", prefix, name), Attribute::One(value.to_string()));
        }
    }

    /// クエリを `prefix + key` で属性に流し込む
    pub(crate) fn expose_query(&mut self, prefix: &str) {
        let Some(raw) = self.query.as_deref() else {
            return;
        };
        for (key, mut values) in query::parse(raw) {
            let value = if values.len() == 1 {
                Attribute::One(values.remove(0))
            } else {
                Attribute::Many(values)
            };
            self.attributes.insert(format!("{}{}", prefix, key), value);
        }
    }
}
