use serde::Serialize;

/// Columns a book listing may be ordered by. Anything else falls back to
/// `created_at`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Title,
    Author,
    #[default]
    CreatedAt,
    Rating,
}

impl SortField {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("title") => SortField::Title,
            Some("author") => SortField::Author,
            Some("created_at") => SortField::CreatedAt,
            Some("rating") => SortField::Rating,
            _ => SortField::default(),
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::Author => "author",
            SortField::CreatedAt => "created_at",
            SortField::Rating => "rating",
        }
    }
}

/// Defaults to descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            _ => SortDirection::default(),
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl BookSort {
    pub fn parse(field: Option<&str>, direction: Option<&str>) -> Self {
        Self {
            field: SortField::parse(field),
            direction: SortDirection::parse(direction),
        }
    }
}
