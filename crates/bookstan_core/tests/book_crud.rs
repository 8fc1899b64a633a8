use bookstan_core::db::migrations::latest_version;
use bookstan_core::db::open_db_in_memory;
use bookstan_core::{
    Book, BookRepository, BookRequest, BookService, BookServiceError, BookSortField, BookStore,
    PageRequest, RepoError, SortOrder, SqliteBookRepository, SqliteBookStore, TxMode,
};
use rusqlite::Connection;

fn hobbit() -> BookRequest {
    BookRequest::new("O Hobbit", "J.R.R. Tolkien", 1937)
        .with_genre("Fantasia")
        .with_isbn("978-0547928227")
}

#[test]
fn create_assigns_id_and_echoes_input() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookStore::try_new(&conn).unwrap());

    let created = service.create(&hobbit()).unwrap();

    assert!(created.id > 0);
    assert_eq!(created.title, "O Hobbit");
    assert_eq!(created.author, "J.R.R. Tolkien");
    assert_eq!(created.genre.as_deref(), Some("Fantasia"));
    assert_eq!(created.publication_year, Some(1937));
    assert_eq!(created.isbn.as_deref(), Some("978-0547928227"));
}

#[test]
fn created_book_is_readable_and_reads_are_stable() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookStore::try_new(&conn).unwrap());

    let created = service.create(&hobbit()).unwrap();
    let id = created.id;

    let first = service.get_by_id(id).unwrap();
    let second = service.get_by_id(id).unwrap();
    assert_eq!(first, created);
    assert_eq!(first, second);
}

#[test]
fn invalid_create_is_rejected_and_nothing_is_stored() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookStore::try_new(&conn).unwrap());

    let mut request = hobbit();
    request.title = Some(String::new());
    let err = service.create(&request).unwrap_err();

    match err {
        BookServiceError::Validation(ref violations) => {
            assert_eq!(violations.len(), 2);
            assert!(violations.iter().all(|violation| violation.field == "title"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(service.list().unwrap().is_empty());
}

#[test]
fn unknown_id_is_not_found_for_every_lookup() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookStore::try_new(&conn).unwrap());

    let get_err = service.get_by_id(999).unwrap_err();
    let update_err = service.update(999, &hobbit()).unwrap_err();
    let delete_err = service.delete(999).unwrap_err();

    for err in [get_err, update_err, delete_err] {
        assert!(matches!(err, BookServiceError::NotFound(999)));
        assert_eq!(err.to_string(), "Book not found with ID: 999");
    }
}

#[test]
fn update_replaces_every_field_but_keeps_id() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookStore::try_new(&conn).unwrap());

    let created = service.create(&hobbit()).unwrap();
    let id = created.id;

    let replacement = BookRequest::new("O Senhor dos Anéis", "J.R.R. Tolkien", 1954);
    let updated = service.update(id, &replacement).unwrap();

    assert_eq!(updated.id, id);
    assert_eq!(updated.title, "O Senhor dos Anéis");
    assert_eq!(updated.publication_year, Some(1954));
    assert_eq!(updated.genre, None);
    assert_eq!(updated.isbn, None);
    assert_eq!(service.get_by_id(id).unwrap(), updated);
}

#[test]
fn invalid_update_wins_over_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookStore::try_new(&conn).unwrap());

    let err = service
        .update(999, &BookRequest::default())
        .unwrap_err();
    assert!(matches!(err, BookServiceError::Validation(_)));
}

#[test]
fn delete_then_get_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookStore::try_new(&conn).unwrap());

    let id = service.create(&hobbit()).unwrap().id;

    service.delete(id).unwrap();
    let err = service.get_by_id(id).unwrap_err();
    assert!(matches!(err, BookServiceError::NotFound(missing) if missing == id));
}

#[test]
fn duplicate_isbn_is_unexpected_failure_not_validation() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookStore::try_new(&conn).unwrap());

    service.create(&hobbit()).unwrap();
    let err = service
        .create(&BookRequest::new("Outro", "Outra Pessoa", 2000).with_isbn("978-0547928227"))
        .unwrap_err();

    assert!(matches!(err, BookServiceError::Unexpected(RepoError::Db(_))));
    assert_eq!(service.list().unwrap().len(), 1);
}

#[test]
fn failed_update_rolls_back_and_keeps_original_row() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookStore::try_new(&conn).unwrap());

    service.create(&hobbit()).unwrap();
    let other = service
        .create(&BookRequest::new("1984", "George Orwell", 1949))
        .unwrap();
    let other_id = other.id;

    let conflicting = BookRequest::new("1984 (edição nova)", "George Orwell", 1949)
        .with_isbn("978-0547928227");
    let err = service.update(other_id, &conflicting).unwrap_err();
    assert!(matches!(err, BookServiceError::Unexpected(_)));

    assert_eq!(service.get_by_id(other_id).unwrap(), other);
}

#[test]
fn list_returns_every_book_in_id_order() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookStore::try_new(&conn).unwrap());

    for (title, year) in [("O Hobbit", 1937), ("1984", 1949), ("Duna", 1965)] {
        service
            .create(&BookRequest::new(title, "Autor", year))
            .unwrap();
    }

    let titles: Vec<String> = service
        .list()
        .unwrap()
        .into_iter()
        .map(|book| book.title)
        .collect();
    assert_eq!(titles, vec!["O Hobbit", "1984", "Duna"]);
}

#[test]
fn paged_list_sorted_by_title() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookStore::try_new(&conn).unwrap());

    for (title, author, year) in [
        ("O Hobbit", "J.R.R. Tolkien", 1937),
        ("1984", "George Orwell", 1949),
        ("A Revolução dos Bichos", "George Orwell", 1945),
    ] {
        service
            .create(&BookRequest::new(title, author, year))
            .unwrap();
    }

    let first = service
        .list_page(&PageRequest::of(0, 2).sorted_by(SortOrder::asc(BookSortField::Title)))
        .unwrap();
    let first_titles: Vec<&str> = first.content.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(first_titles, vec!["1984", "A Revolução dos Bichos"]);
    assert_eq!(first.total_elements, 3);
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.page_number, 0);
    assert_eq!(first.page_size, 2);

    let second = service
        .list_page(&PageRequest::of(1, 2).sorted_by(SortOrder::asc(BookSortField::Title)))
        .unwrap();
    let second_titles: Vec<&str> = second.content.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(second_titles, vec!["O Hobbit"]);
    assert_eq!(second.total_elements, 3);
    assert_eq!(second.total_pages, 2);
    assert_eq!(second.page_number, 1);
}

#[test]
fn default_page_holds_everything_and_past_end_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookStore::try_new(&conn).unwrap());

    for title in ["Duna", "Neuromancer", "Fundação"] {
        service
            .create(&BookRequest::new(title, "Autor", 1960))
            .unwrap();
    }

    let page = service.list_page(&PageRequest::default()).unwrap();
    assert_eq!(page.content.len(), 3);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.page_size, 20);

    let past_end = service.list_page(&PageRequest::of(5, 2)).unwrap();
    assert!(past_end.content.is_empty());
    assert_eq!(past_end.total_elements, 3);
    assert_eq!(past_end.total_pages, 2);
}

#[test]
fn paged_list_sorts_descending_with_id_tiebreak() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookStore::try_new(&conn).unwrap());

    let older = service
        .create(&BookRequest::new("Primeiro", "Autor", 1950))
        .unwrap();
    let newer = service
        .create(&BookRequest::new("Segundo", "Autor", 1990))
        .unwrap();
    let same_year = service
        .create(&BookRequest::new("Terceiro", "Autor", 1990))
        .unwrap();

    let page = service
        .list_page(
            &PageRequest::of(0, 10).sorted_by(SortOrder::desc(BookSortField::PublicationYear)),
        )
        .unwrap();
    let ids: Vec<_> = page.content.iter().map(|book| book.id).collect();
    assert_eq!(ids, vec![newer.id, same_year.id, older.id]);
}

#[test]
fn repository_save_and_delete_contract() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::new(&conn);

    let saved = repo
        .save(&Book {
            title: "Duna".to_string(),
            author: "Frank Herbert".to_string(),
            publication_year: Some(1965),
            ..Book::default()
        })
        .unwrap();
    let id = saved.id.unwrap();
    assert!(repo.exists_by_id(id).unwrap());

    let missing = Book {
        id: Some(id + 100),
        ..saved.clone()
    };
    assert!(matches!(repo.save(&missing), Err(RepoError::NotFound(_))));

    repo.delete_by_id(id).unwrap();
    assert!(!repo.exists_by_id(id).unwrap());
    assert!(matches!(repo.delete_by_id(id), Err(RepoError::NotFound(missing)) if missing == id));
}

#[test]
fn store_rejects_publication_year_before_1000_on_direct_save() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::new(&conn);

    let err = repo
        .save(&Book {
            title: "Beowulf".to_string(),
            author: "Anônimo".to_string(),
            publication_year: Some(999),
            ..Book::default()
        })
        .unwrap_err();

    match err {
        RepoError::Db(ref db_err) => assert!(db_err.is_constraint_violation()),
        other => panic!("unexpected error: {other}"),
    }
    assert!(repo.find_all().unwrap().is_empty());

    let undated = repo
        .save(&Book {
            title: "Beowulf".to_string(),
            author: "Anônimo".to_string(),
            ..Book::default()
        })
        .unwrap();
    assert_eq!(undated.publication_year, None);
}

#[test]
fn store_rejects_lowering_stored_year_below_1000() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteBookStore::try_new(&conn).unwrap();

    let result = store.with_transaction(TxMode::ReadWrite, |repo| -> Result<Book, RepoError> {
        let mut saved = repo.save(&Book {
            title: "Duna".to_string(),
            author: "Frank Herbert".to_string(),
            publication_year: Some(1965),
            ..Book::default()
        })?;
        saved.publication_year = Some(999);
        repo.save(&saved)
    });
    assert!(matches!(result, Err(RepoError::Db(ref err)) if err.is_constraint_violation()));

    let count = store
        .with_transaction(TxMode::ReadOnly, |repo| repo.find_all().map(|rows| rows.len()))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn read_write_scope_rolls_back_on_error() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteBookStore::try_new(&conn).unwrap();

    let result = store.with_transaction(TxMode::ReadWrite, |repo| -> Result<(), RepoError> {
        repo.save(&Book {
            title: "Rascunho".to_string(),
            author: "Autor".to_string(),
            publication_year: Some(2000),
            ..Book::default()
        })?;
        Err(RepoError::NotFound(42))
    });
    assert!(result.is_err());

    let count = store
        .with_transaction(TxMode::ReadOnly, |repo| repo.find_all().map(|rows| rows.len()))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn store_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteBookStore::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn store_rejects_connection_without_books_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteBookStore::try_new(&conn),
        Err(RepoError::MissingRequiredTable("books"))
    ));
}

#[test]
fn store_rejects_connection_missing_isbn_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            genre TEXT,
            publication_year INTEGER
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteBookStore::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "books",
            column: "isbn"
        })
    ));
}
