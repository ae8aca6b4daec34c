//! Backward pagination over the truncating export endpoint
//!
//! The provider returns at most [`PAGE_CAPACITY`](super::PAGE_CAPACITY)
//! records per requested range, keeps the most recent ones when a range
//! overflows, and offers no cursor and no "has more" signal. The engine
//! therefore walks backward in one-month windows and treats the oldest date
//! in each page as suspect: the page may have been cut mid-day, so records
//! on that boundary date are withheld and the next window re-requests the
//! date in full. When a window collapses onto a single day (that day alone
//! met or exceeded capacity), one dedicated single-day request is made and
//! emitted verbatim - a day whose own volume exceeds capacity loses its
//! older records, which is an accepted provider limitation, not retried.
//!
//! Correctness leans on the provider sorting pages newest-first. That is an
//! observed external contract the partitioning cannot verify; if it ever
//! changes, duplication and loss avoidance break silently.

use chrono::{Months, NaiveDate, Utc};
use futures_util::{stream, StreamExt};
use tracing::debug;

use super::{FetchResult, PageFetcher, SessionStream};
use crate::{request_offset, Session};

/// Start of the window ending at `cursor`: one calendar month back,
/// saturating at the calendar's lower bound.
fn window_start(cursor: NaiveDate) -> NaiveDate {
    cursor
        .checked_sub_months(Months::new(1))
        .unwrap_or(NaiveDate::MIN)
}

/// Lazily walks the provider's session history backward from an end date.
///
/// One [`next_segment`](Self::next_segment) call issues one page request
/// (plus, at most once per run, the dedicated single-day request) and
/// returns the records that are now safe to emit, newest first. Segments
/// concatenate into a non-increasing-by-date, duplicate-free sequence
/// covering all retained records up to and including the end date.
///
/// State between steps is the window-end cursor plus the boundary-date
/// records withheld from the previous page; restarting from scratch is the
/// only way to replay, and re-issues every request.
pub struct SessionHistory<F> {
    fetcher: F,
    /// End date of the next window; `None` once the history is drained.
    cursor: Option<NaiveDate>,
    /// Records on the previous page's boundary date. Superseded by the next
    /// non-empty page (which re-covers their date in full), emitted as the
    /// final segment if the next page is empty.
    withheld: Vec<Session>,
}

impl<F: PageFetcher> SessionHistory<F> {
    /// Create an engine that walks backward from `end_date` (inclusive).
    pub fn new(fetcher: F, end_date: NaiveDate) -> Self {
        Self {
            fetcher,
            cursor: Some(end_date),
            withheld: Vec::new(),
        }
    }

    /// Create an engine ending at the current date in the provider's
    /// request timezone.
    pub fn from_today(fetcher: F) -> Self {
        let today = Utc::now().with_timezone(&request_offset()).date_naive();
        Self::new(fetcher, today)
    }

    /// Produce the next emittable segment, or `None` once the history is
    /// exhausted.
    ///
    /// # Errors
    /// Propagates the fetcher's error and drains the engine: later calls
    /// return `Ok(None)`. Already-returned segments stand; this is a live
    /// sequence, not a transaction.
    pub async fn next_segment(&mut self) -> FetchResult<Option<Vec<Session>>> {
        loop {
            let Some(cursor) = self.cursor else {
                return Ok(None);
            };

            let start = window_start(cursor);
            let page = match self.fetcher.fetch_page(start, cursor).await {
                Ok(page) => page,
                Err(e) => {
                    self.cursor = None;
                    self.withheld.clear();
                    return Err(e);
                }
            };

            if page.is_empty() {
                debug!("Empty page for {} to {}; history exhausted", start, cursor);
                self.cursor = None;
                let tail = std::mem::take(&mut self.withheld);
                return Ok(if tail.is_empty() { None } else { Some(tail) });
            }

            // This page re-covers the previous boundary date in full, so the
            // withheld copies are superseded by what it carries.
            self.withheld.clear();

            // SAFETY: unwrap() is safe because the empty-page case returned above
            let earliest = page.last().unwrap().request_date();

            if earliest >= cursor {
                // The month window collapsed onto the cursor day itself: that
                // single day met or exceeded capacity. Fetch it once,
                // directly, and emit whatever comes back - older records the
                // provider dropped on that day are unrecoverable.
                debug!("Window collapsed onto {}; fetching the day directly", cursor);
                self.cursor = None;
                let day = self.fetcher.fetch_page(cursor, cursor).await?;
                return Ok(if day.is_empty() { None } else { Some(day) });
            }

            let (segment, boundary): (Vec<Session>, Vec<Session>) = page
                .into_iter()
                .partition(|session| session.request_date() > earliest);

            debug!(
                "Emitting {} sessions after {}, withholding {} on it",
                segment.len(),
                earliest,
                boundary.len()
            );

            self.withheld = boundary;
            self.cursor = Some(earliest);

            if !segment.is_empty() {
                return Ok(Some(segment));
            }
            // Every record sat on the boundary date; nothing is safe to emit
            // yet, so fall through to the next window.
        }
    }

    /// Adapt the engine into a per-record stream.
    ///
    /// Pages are still fetched one at a time, only when the consumer pulls
    /// past the previous segment's tail. An error is yielded once and ends
    /// the stream.
    pub fn into_stream(self) -> SessionStream
    where
        F: 'static,
    {
        let stream = stream::unfold((self, false), |(mut history, done)| async move {
            if done {
                return None;
            }

            match history.next_segment().await {
                Ok(Some(segment)) => {
                    let items: Vec<FetchResult<Session>> =
                        segment.into_iter().map(Ok).collect();
                    Some((stream::iter(items), (history, false)))
                }
                Ok(None) => None,
                Err(e) => Some((stream::iter(vec![Err(e)]), (history, true))),
            }
        })
        .flatten();

        Box::pin(stream)
    }
}
