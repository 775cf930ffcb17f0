// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every handler here runs behind `require_auth` and receives the resolved
// `CurrentUser`; all lookups are scoped through that user's id.
pub mod book_tags; // POST/DELETE /books/:id/tags[/:tag_id]
pub mod books;     // /books, /books/:id, /books/search
pub mod tags;      // /tags, /tags/:id/books
