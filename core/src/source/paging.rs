//! Assembly of continuation-token pages into one ordered event list.
//!
//! The log host returns at most one page of events per query together with
//! the timestamp the next page starts at. Callers of a [`DataSource`] only
//! ever see the assembled result.
//!
//! [`DataSource`]: super::DataSource

use crate::combat_log::Event;

use super::SourceError;

/// One page of a paginated event query
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub data: Vec<Event>,
    /// Start of the next page; `None` on the last page
    pub next_page_timestamp: Option<i64>,
}

/// Fetch pages starting at `start_time` until the source reports no
/// continuation. A continuation that does not move past the current cursor
/// is an error rather than an endless loop.
pub fn collect_pages<F>(start_time: i64, mut fetch_page: F) -> Result<Vec<Event>, SourceError>
where
    F: FnMut(i64) -> Result<Page, SourceError>,
{
    let mut events = Vec::new();
    let mut cursor = Some(start_time);
    let mut pages = 0usize;

    while let Some(start) = cursor {
        let page = fetch_page(start)?;
        pages += 1;
        tracing::debug!(
            start,
            count = page.data.len(),
            next = ?page.next_page_timestamp,
            "Fetched event page"
        );
        events.extend(page.data);

        cursor = match page.next_page_timestamp {
            Some(next) if next <= start => {
                return Err(SourceError::StalledPagination { cursor: next });
            }
            next => next,
        };
    }

    tracing::debug!(pages, total = events.len(), "Assembled paginated events");
    Ok(events)
}
