//! Offset pagination over list endpoints

use std::future::Future;

use crate::error::Error;

/// Collect every record from an offset-paginated listing.
///
/// `fetch_batch(skip, limit)` is awaited once per page, strictly in sequence,
/// starting at `skip = 0`. A batch shorter than `batch_size` ends the walk.
/// After `max_pages` full batches the walk stops with
/// [`Error::PaginationLimit`]; `None` never stops on its own.
pub async fn fetch_all<T, F, Fut>(
    batch_size: usize,
    max_pages: Option<usize>,
    mut fetch_batch: F,
) -> Result<Vec<T>, Error>
where
    F: FnMut(usize, usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>, Error>>,
{
    if batch_size == 0 {
        return Err(Error::validation("batch size must be greater than zero"));
    }

    let mut all = Vec::new();
    let mut skip = 0;
    let mut full_pages = 0;

    loop {
        let batch = fetch_batch(skip, batch_size).await?;
        let len = batch.len();
        all.extend(batch);

        if len < batch_size {
            break;
        }

        full_pages += 1;
        if max_pages.map_or(false, |max| full_pages >= max) {
            log::warn!(
                "fetch_all stopped after {} full pages of {} records",
                full_pages,
                batch_size
            );
            return Err(Error::PaginationLimit {
                pages: full_pages,
                fetched: all.len(),
            });
        }
        skip += batch_size;
    }

    log::debug!("fetch_all collected {} records", all.len());
    Ok(all)
}
