use serde::Serialize;

/// The `{data, meta?}` wrapper every successful response uses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T, M = ()> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<M>,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self { data, meta: None }
    }
}

impl<T, M> Envelope<T, M> {
    pub fn with_meta(data: T, meta: M) -> Self {
        Self {
            data,
            meta: Some(meta),
        }
    }
}

/// Echo of the `/data` query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataMeta {
    pub indicator: String,
    pub year: i32,
}
