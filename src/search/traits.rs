use crate::model::{SearchError, SearchRequest};
use serde_json::Value;

#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn search(&self, request: &SearchRequest) -> Result<Value, SearchError>;
}
