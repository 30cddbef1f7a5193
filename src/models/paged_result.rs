//! # Paged Result
//!
//! The value returned from one paginated call. It owns no cursor or
//! connection; everything needed to render page links is carried as plain
//! data, and first/last page and page count are derived on read so they can
//! never disagree with the stored fields.

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq)]
pub struct PagedResult<T> {
    items: Vec<T>,
    continuation_token: Option<String>,
    items_per_page: u32,
    total_count: u64,
    cost_metric: f64,
    elapsed_ms: u64,
    offset: Option<u32>,
}

/// Paging metadata with every derived property resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub continuation_token: Option<String>,
    pub items_per_page: u32,
    pub total_count: u64,
    pub cost_metric: f64,
    pub elapsed_ms: u64,
    pub is_first_page: bool,
    pub is_last_page: bool,
    pub number_of_pages: u64,
    pub current_page: Option<u64>,
}

impl<T> PagedResult<T> {
    pub fn new(
        items: Vec<T>,
        continuation_token: Option<String>,
        items_per_page: u32,
        total_count: u64,
        cost_metric: f64,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            items,
            continuation_token,
            items_per_page,
            total_count,
            cost_metric,
            elapsed_ms,
            offset: None,
        }
    }

    /// Record the offset an offset-limit page was fetched at
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn continuation_token(&self) -> Option<&str> {
        self.continuation_token.as_deref()
    }

    pub fn items_per_page(&self) -> u32 {
        self.items_per_page
    }

    /// Size of the whole filtered set, not of this page
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn cost_metric(&self) -> f64 {
        self.cost_metric
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn offset(&self) -> Option<u32> {
        self.offset
    }

    pub fn is_last_page(&self) -> bool {
        self.continuation_token.is_none()
    }

    pub fn is_first_page(&self) -> bool {
        self.continuation_token.is_none() && self.total_count <= u64::from(self.items_per_page)
    }

    /// `ceil(total_count / items_per_page)`; zero only for an empty set
    pub fn number_of_pages(&self) -> u64 {
        if self.items_per_page == 0 {
            return 0;
        }
        self.total_count.div_ceil(u64::from(self.items_per_page))
    }

    /// 1-indexed page number, known only for offset-limit pages
    pub fn current_page(&self) -> Option<u64> {
        match (self.offset, self.items_per_page) {
            (Some(offset), per_page) if per_page > 0 => {
                Some(u64::from(offset) / u64::from(per_page) + 1)
            }
            _ => None,
        }
    }

    /// Whether a further page exists: by offset arithmetic for offset-limit
    /// pages, by the presence of a continuation token otherwise
    pub fn has_next_page(&self) -> bool {
        match self.offset {
            Some(offset) => u64::from(offset) + (self.items.len() as u64) < self.total_count,
            None => self.continuation_token.is_some(),
        }
    }

    pub fn metadata(&self) -> PageMetadata {
        PageMetadata {
            continuation_token: self.continuation_token.clone(),
            items_per_page: self.items_per_page,
            total_count: self.total_count,
            cost_metric: self.cost_metric,
            elapsed_ms: self.elapsed_ms,
            is_first_page: self.is_first_page(),
            is_last_page: self.is_last_page(),
            number_of_pages: self.number_of_pages(),
            current_page: self.current_page(),
        }
    }

    /// Project every item to zero or more `U` values, dropping any value the
    /// `is_duplicate` predicate matches against one already emitted. Paging
    /// metadata is carried over unchanged.
    ///
    /// `items().len() <= items_per_page()` holds only for results returned by
    /// the paginator, not for mapped ones: unnesting can yield more values than
    /// `items_per_page`, and the metadata still describes the source page.
    pub fn map<U, I, F, D>(self, mut transform: F, mut is_duplicate: D) -> PagedResult<U>
    where
        F: FnMut(T) -> I,
        I: IntoIterator<Item = U>,
        D: FnMut(&U, &U) -> bool,
    {
        let mut items: Vec<U> = Vec::with_capacity(self.items.len());
        for item in self.items {
            for candidate in transform(item) {
                if !items.iter().any(|existing| is_duplicate(existing, &candidate)) {
                    items.push(candidate);
                }
            }
        }

        PagedResult {
            items,
            continuation_token: self.continuation_token,
            items_per_page: self.items_per_page,
            total_count: self.total_count,
            cost_metric: self.cost_metric,
            elapsed_ms: self.elapsed_ms,
            offset: self.offset,
        }
    }
}

impl<T: Serialize> Serialize for PagedResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct View<'a, T> {
            items: &'a [T],
            #[serde(flatten)]
            metadata: PageMetadata,
        }

        View {
            items: &self.items,
            metadata: self.metadata(),
        }
        .serialize(serializer)
    }
}
