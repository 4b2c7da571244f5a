//! Shared fixtures: a catalog seeded with ten rows of every entity type.

#![allow(dead_code)]

use catalog_kit::backend::InMemoryBackend;
use catalog_kit::hasher::{Argon2Hasher, KdfParams, PasswordHasher};
use catalog_kit::model::{Author, AuthorDto, Book, BookDto, Genre, GenreDto, User, UserDto};
use catalog_kit::repository::InMemoryStore;
use catalog_kit::{Catalog, CatalogConfig, Record, Store, UnitOfWork};
use chrono::{Datelike, NaiveDate, Utc};

pub const SEEDED: i64 = 10;

pub type TestCatalog = Catalog<InMemoryStore, InMemoryBackend>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn current_year() -> i32 {
    Utc::now().year()
}

pub fn test_config() -> CatalogConfig {
    CatalogConfig::default().with_kdf(KdfParams::fast())
}

pub fn empty_catalog() -> TestCatalog {
    catalog_with(test_config())
}

pub fn catalog_with(config: CatalogConfig) -> TestCatalog {
    init_logging();
    Catalog::with_config(InMemoryStore::new(), InMemoryBackend::new(), config)
}

/// Catalog holding `Genre{i}`, `FirstName{i} SurName{i}`, `Title{i}` and
/// `Username{i}` for i in 1..=10. Book i belongs to author i and genre i and
/// sits on user i's shelf. User i signs in with `Password{i}`.
pub async fn seeded_catalog() -> TestCatalog {
    seeded_catalog_with(test_config()).await
}

pub async fn seeded_catalog_with(config: CatalogConfig) -> TestCatalog {
    let catalog = catalog_with(config);
    let hasher = Argon2Hasher::new(KdfParams::fast());
    let mut session = catalog
        .store()
        .write()
        .await
        .expect("Failed to open session");

    for i in 1..=SEEDED {
        Genre::insert(
            &mut session,
            Genre {
                id: 0,
                name: format!("Genre{}", i),
                book_ids: Vec::new(),
            },
        )
        .await
        .expect("Failed to seed genre");

        Author::insert(
            &mut session,
            Author {
                id: 0,
                first_name: format!("FirstName{}", i),
                surname: format!("SurName{}", i),
                date_of_birth: NaiveDate::from_ymd_opt(1950 + i as i32, 1, 1).expect("valid date"),
                country: format!("Country{}", i),
                book_ids: Vec::new(),
            },
        )
        .await
        .expect("Failed to seed author");
    }

    for i in 1..=SEEDED {
        Book::insert(
            &mut session,
            Book {
                id: 0,
                title: format!("Title{}", i),
                description: format!("Description{}", i),
                year: current_year(),
                content: Vec::new(),
                author_id: Some(i),
                genre_id: Some(i),
                user_ids: Vec::new(),
            },
        )
        .await
        .expect("Failed to seed book");
    }

    for i in 1..=SEEDED {
        User::insert(
            &mut session,
            User {
                id: 0,
                first_name: format!("FirstName{}", i),
                last_name: format!("LastName{}", i),
                username: format!("Username{}", i),
                email: format!("email{}@gmail.com", i),
                password_digest: hasher
                    .hash(&format!("Password{}", i))
                    .expect("Failed to hash"),
                registered_at: Utc::now(),
                profile_picture: Vec::new(),
                book_ids: vec![i],
            },
        )
        .await
        .expect("Failed to seed user");
    }

    session.save().await.expect("Failed to save seed");
    drop(session);
    catalog.store().reset_scan_counters();
    catalog
}

pub fn new_genre(name: &str) -> GenreDto {
    GenreDto {
        name: name.to_string(),
        ..GenreDto::default()
    }
}

pub fn new_author(full_name: &str) -> AuthorDto {
    AuthorDto {
        id: 0,
        full_name: full_name.to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1980, 5, 17),
        country: "Croatia".to_string(),
        book_ids: Vec::new(),
    }
}

pub fn new_book(title: &str, author_id: i64, genre_id: i64) -> BookDto {
    BookDto {
        id: 0,
        title: title.to_string(),
        description: "Long enough description".to_string(),
        year: 2001,
        content: Some(vec![1, 2, 3]),
        author_id,
        genre_id,
        user_ids: Vec::new(),
    }
}

pub fn new_user(username: &str, email: &str) -> UserDto {
    UserDto {
        id: 0,
        full_name: "New Reader".to_string(),
        username: username.to_string(),
        email: email.to_string(),
        password: "Secret123".to_string(),
        profile_picture: Some(Vec::new()),
        registered_at: None,
        book_ids: Vec::new(),
    }
}
