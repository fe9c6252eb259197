//! Month-by-month, court-by-court extract retrieval.

use std::collections::HashSet;

use futures::Stream;
use jpextract_core::{
    CaseType, CodeError, CourtId, DateRange, Extract, ExtractFormat, ExtractRequest, ExtractType,
};
use tracing::info;

use crate::{ExtractClient, FetchError};

/// What to retrieve: one extract type and case-type filter over a date
/// range, for a set of courts (all sixteen unless narrowed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractQuery {
    dates: DateRange,
    extract: ExtractType,
    case_type: CaseType,
    courts: Vec<CourtId>,
}

impl ExtractQuery {
    pub fn new(
        dates: DateRange,
        extract: ExtractType,
        case_type: CaseType,
    ) -> Result<Self, CodeError> {
        if extract.category() != case_type.category() {
            return Err(CodeError::CategoryMismatch {
                extract: extract.name(),
                extract_category: extract.category().name(),
                case_type: case_type.name(),
                case_category: case_type.category().name(),
            });
        }
        Ok(Self {
            dates,
            extract,
            case_type,
            courts: CourtId::ALL.to_vec(),
        })
    }

    /// Restrict to `courts`, kept in first-seen order with repeats dropped.
    /// An empty list keeps all courts.
    pub fn with_courts(mut self, courts: Vec<CourtId>) -> Self {
        if !courts.is_empty() {
            let mut seen = HashSet::new();
            self.courts = courts.into_iter().filter(|c| seen.insert(*c)).collect();
        }
        self
    }

    pub fn dates(&self) -> DateRange {
        self.dates
    }

    pub fn extract(&self) -> ExtractType {
        self.extract
    }

    pub fn case_type(&self) -> CaseType {
        self.case_type
    }

    pub fn courts(&self) -> &[CourtId] {
        &self.courts
    }

    /// Every request the query expands to: month chunks in order, and within
    /// each chunk every court in order.
    pub fn requests(&self) -> impl Iterator<Item = Result<ExtractRequest, CodeError>> + '_ {
        self.dates.month_chunks().flat_map(move |chunk| {
            self.courts.iter().map(move |&court| {
                ExtractRequest::new(self.extract, court, self.case_type, ExtractFormat::Xml, chunk)
            })
        })
    }
}

impl ExtractClient {
    /// Lazily retrieve every extract in `query`.
    ///
    /// Requests are issued one at a time as the stream is polled. (court,
    /// chunk) pairs without data are skipped, so every yielded table has rows.
    /// The first error ends the stream; items already yielded stand, so
    /// callers should persist each one as it arrives.
    pub fn extracts<'a>(
        &'a self,
        query: &'a ExtractQuery,
    ) -> impl Stream<Item = Result<Extract, FetchError>> + 'a {
        futures::stream::try_unfold(query.requests(), move |mut requests| async move {
            let next = self.next_extract(&mut requests).await;
            next.map(|extract| extract.map(|e| (e, requests)))
        })
    }

    /// Issue requests until one returns rows or `requests` runs out.
    async fn next_extract<I>(&self, requests: &mut I) -> Result<Option<Extract>, FetchError>
    where
        I: Iterator<Item = Result<ExtractRequest, CodeError>>,
    {
        for request in requests {
            let request = request?;
            let dates = request.dates();
            info!(
                court = %request.court(),
                from = %dates.from(),
                to = %dates.to(),
                "retrieving extract"
            );
            if let Some(table) = self.get_extract(&request).await? {
                return Ok(Some(Extract {
                    court: request.court(),
                    dates,
                    table,
                }));
            }
        }
        Ok(None)
    }
}
