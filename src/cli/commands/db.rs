use clap::Subcommand;
use serde::Serialize;
use serde_json::json;
use sqlx::SqlitePool;

use crate::auth::password::hash_password_blocking;
use crate::cli::{open_database, utils::output_success, OutputFormat};
use crate::config::AppConfig;
use crate::database::models::{BookFields, BookStatus, User};
use crate::database::{BookRepository, DatabaseManager, TagRepository, UserRepository};
use crate::services::TagService;

pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEMO_PASSWORD: &str = "password123";

const SEED_TAGS: [&str; 8] = [
    "fiction",
    "non-fiction",
    "sci-fi",
    "fantasy",
    "biography",
    "self-help",
    "technical",
    "programming",
];

struct SampleBook {
    title: &'static str,
    author: &'static str,
    isbn: &'static str,
    status: BookStatus,
    rating: Option<i64>,
    notes: Option<&'static str>,
    url: Option<&'static str>,
    tags: &'static [&'static str],
}

const SAMPLE_BOOKS: &[SampleBook] = &[
    SampleBook {
        title: "The Pragmatic Programmer",
        author: "David Thomas, Andrew Hunt",
        isbn: "978-0135957059",
        status: BookStatus::Read,
        rating: Some(5),
        notes: Some("Essential reading for any software developer. Great practical advice."),
        url: None,
        tags: &["programming", "technical"],
    },
    SampleBook {
        title: "Clean Code",
        author: "Robert C. Martin",
        isbn: "978-0132350884",
        status: BookStatus::Read,
        rating: Some(4),
        notes: Some("Good principles for writing maintainable code."),
        url: None,
        tags: &["programming", "technical"],
    },
    SampleBook {
        title: "Dune",
        author: "Frank Herbert",
        isbn: "978-0441172719",
        status: BookStatus::Read,
        rating: Some(5),
        notes: Some("A masterpiece of science fiction."),
        url: None,
        tags: &["fiction", "sci-fi"],
    },
    SampleBook {
        title: "Foundation",
        author: "Isaac Asimov",
        isbn: "978-0553293357",
        status: BookStatus::Reading,
        rating: None,
        notes: Some("Classic sci-fi series."),
        url: None,
        tags: &["fiction", "sci-fi"],
    },
    SampleBook {
        title: "The Name of the Wind",
        author: "Patrick Rothfuss",
        isbn: "978-0756404741",
        status: BookStatus::Unread,
        rating: None,
        notes: None,
        url: Some("https://www.patrickrothfuss.com/content/books.asp"),
        tags: &["fiction", "fantasy"],
    },
    SampleBook {
        title: "Sapiens: A Brief History of Humankind",
        author: "Yuval Noah Harari",
        isbn: "978-0062316097",
        status: BookStatus::Read,
        rating: Some(4),
        notes: Some("Fascinating overview of human history."),
        url: None,
        tags: &["non-fiction"],
    },
    SampleBook {
        title: "Atomic Habits",
        author: "James Clear",
        isbn: "978-0735211292",
        status: BookStatus::Read,
        rating: Some(5),
        notes: Some("Practical guide to building good habits."),
        url: None,
        tags: &["non-fiction", "self-help"],
    },
    SampleBook {
        title: "Steve Jobs",
        author: "Walter Isaacson",
        isbn: "978-1451648539",
        status: BookStatus::Reading,
        rating: None,
        notes: None,
        url: None,
        tags: &["non-fiction", "biography"],
    },
    SampleBook {
        title: "Designing Data-Intensive Applications",
        author: "Martin Kleppmann",
        isbn: "978-1449373320",
        status: BookStatus::Unread,
        rating: None,
        notes: Some("Comprehensive guide to data systems."),
        url: None,
        tags: &["technical", "programming"],
    },
    SampleBook {
        title: "The Hobbit",
        author: "J.R.R. Tolkien",
        isbn: "978-0547928227",
        status: BookStatus::Read,
        rating: Some(5),
        notes: None,
        url: None,
        tags: &["fiction", "fantasy"],
    },
    SampleBook {
        title: "1984",
        author: "George Orwell",
        isbn: "978-0451524935",
        status: BookStatus::Read,
        rating: Some(4),
        notes: Some("Chilling and thought-provoking."),
        url: None,
        tags: &["fiction"],
    },
    SampleBook {
        title: "Refactoring",
        author: "Martin Fowler",
        isbn: "978-0134757599",
        status: BookStatus::Unread,
        rating: None,
        notes: None,
        url: None,
        tags: &["technical", "programming"],
    },
];

impl SampleBook {
    fn fields(&self) -> BookFields {
        BookFields {
            title: self.title.to_string(),
            author: self.author.to_string(),
            isbn: Some(self.isbn.to_string()),
            status: self.status,
            rating: self.rating,
            notes: self.notes.map(str::to_string),
            url: self.url.map(str::to_string),
        }
    }
}

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Apply pending schema migrations")]
    Migrate,

    #[command(about = "Create the demo user with sample books and tags (idempotent)")]
    Seed,
}

/// What the demo account holds after seeding.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SeedSummary {
    pub user_id: i64,
    pub email: String,
    pub books: i64,
    pub tags: i64,
}

pub async fn handle(cmd: DbCommands, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        DbCommands::Migrate => {
            let pool = DatabaseManager::connect(&config.database).await?;
            DatabaseManager::migrate(&pool).await?;
            output_success(
                &output_format,
                &format!("Migrations applied to {}", config.database.url),
                None,
            )
        }
        DbCommands::Seed => {
            let pool = open_database(config).await?;
            let summary = seed(&pool).await?;
            output_success(
                &output_format,
                &format!(
                    "Seeded {} with {} book(s) and {} tag(s)",
                    summary.email, summary.books, summary.tags
                ),
                Some(json!({ "seed": summary })),
            )
        }
    }
}

/// Create the demo account and its library unless they already exist.
/// Running it again changes nothing.
pub async fn seed(pool: &SqlitePool) -> anyhow::Result<SeedSummary> {
    let users = UserRepository::new(pool.clone());
    let books = BookRepository::new(pool.clone());
    let tags = TagRepository::new(pool.clone());
    let tag_service = TagService::new(tags.clone());

    let user = demo_user(&users).await?;

    for name in SEED_TAGS {
        tags.find_or_create(user.id, name).await?;
    }

    for sample in SAMPLE_BOOKS {
        let book = match books.find_by_title(user.id, sample.title).await? {
            Some(book) => book,
            None => books.create(user.id, &sample.fields()).await?,
        };
        tag_service.attach(user.id, &book, sample.tags).await?;
    }

    Ok(SeedSummary {
        user_id: user.id,
        email: user.email,
        books: books.count(user.id).await?,
        tags: tags.count(user.id).await?,
    })
}

async fn demo_user(users: &UserRepository) -> anyhow::Result<User> {
    if let Some(user) = users.find_by_email(DEMO_EMAIL).await? {
        return Ok(user);
    }
    let digest = hash_password_blocking(DEMO_PASSWORD.to_string()).await?;
    Ok(users.create(DEMO_EMAIL, &digest).await?)
}
