use serde::Serialize;

pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MAX_PER_PAGE: i64 = 100;

/// A clamped, 1-indexed page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, per_page: DEFAULT_PER_PAGE }
    }
}

impl PageRequest {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// Lenient parsing of raw query values: anything that is not an integer
    /// reads as 0 and is clamped like any other out-of-range value.
    pub fn from_params(page: Option<&str>, per_page: Option<&str>) -> Self {
        let page = page.map(lenient_int).unwrap_or(1);
        let per_page = match per_page.map(str::trim) {
            None | Some("") => DEFAULT_PER_PAGE,
            Some(raw) => lenient_int(raw),
        };
        Self::new(page, per_page)
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

fn lenient_int(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PageMeta {
    pub fn new(request: PageRequest, total: i64) -> Self {
        Self {
            page: request.page,
            per_page: request.per_page,
            total,
            total_pages: (total + request.per_page - 1) / request.per_page,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn empty(request: PageRequest) -> Self {
        Self { items: Vec::new(), meta: PageMeta::new(request, 0) }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page { items: self.items.into_iter().map(f).collect(), meta: self.meta }
    }
}
