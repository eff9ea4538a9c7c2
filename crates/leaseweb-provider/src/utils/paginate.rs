//! Offset pagination over list endpoints

use super::interrupted_error;
use leaseweb_framework::Context;
use leaseweb_sdk::{ListResponse, PagedRequest, SdkError};
use tracing::debug;

type Item<R> = <<R as PagedRequest>::Response as ListResponse>::Item;

/// Fetch every page of `request`, starting at offset 0.
///
/// Pagination stops once `offset + limit` reaches `totalCount`. Cancellation
/// is checked before each page; on any error the pages fetched so far are
/// discarded.
pub async fn paginate<R>(ctx: &Context, request: R) -> Result<Vec<Item<R>>, SdkError>
where
    R: PagedRequest,
    Item<R>: Send,
{
    let mut request = request.with_offset(0);
    let mut items = Vec::new();

    loop {
        if let Some(reason) = ctx.interrupted() {
            return Err(interrupted_error(reason));
        }

        let (page, _) = super::call(ctx, request.execute_page()).await?;
        let metadata = *page.metadata();
        items.extend(page.into_items());

        let next = metadata.offset + metadata.limit;
        debug!(
            offset = metadata.offset,
            limit = metadata.limit,
            total_count = metadata.total_count,
            "Fetched page"
        );
        if metadata.limit <= 0 || next >= metadata.total_count {
            return Ok(items);
        }
        request = request.with_offset(next);
    }
}
