//! Offset/limit pagination contract

use crate::error::Result;
use crate::transport::HttpResponse;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// `_metadata` block of every paged list response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metadata {
    pub limit: i32,
    pub offset: i32,
    pub total_count: i32,
}

/// A decoded page of a list endpoint
pub trait ListResponse {
    type Item;

    fn metadata(&self) -> &Metadata;

    fn into_items(self) -> Vec<Self::Item>;
}

/// Request builder of a paged list endpoint
#[async_trait]
pub trait PagedRequest: Clone + Send + Sync {
    type Response: ListResponse + Send;

    /// Rebuild the request for the page starting at `offset`.
    fn with_offset(self, offset: i32) -> Self;

    async fn execute_page(&self) -> Result<(Self::Response, HttpResponse)>;
}

/// Implements [`ListResponse`] for a list DTO holding its items in `$field`.
macro_rules! list_response {
    ($list:ty, $field:ident, $item:ty) => {
        impl $crate::pagination::ListResponse for $list {
            type Item = $item;

            fn metadata(&self) -> &$crate::pagination::Metadata {
                &self.metadata
            }

            fn into_items(self) -> Vec<$item> {
                self.$field
            }
        }
    };
}

/// Implements [`PagedRequest`] for a builder with an `offset` field and an
/// inherent `execute`.
macro_rules! paged_request {
    ($request:ty, $response:ty) => {
        #[async_trait::async_trait]
        impl $crate::pagination::PagedRequest for $request {
            type Response = $response;

            fn with_offset(mut self, offset: i32) -> Self {
                self.offset = Some(offset);
                self
            }

            async fn execute_page(
                &self,
            ) -> $crate::error::Result<($response, $crate::transport::HttpResponse)> {
                self.execute().await
            }
        }
    };
}

pub(crate) use list_response;
pub(crate) use paged_request;
