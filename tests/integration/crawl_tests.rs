//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small fake catalog and run the
//! full crawl cycle end-to-end, including persistence.

use folio_crawl::config::{Config, CrawlOptions, SinkKind};
use folio_crawl::crawler::{run_crawl, Crawler, Fetcher};
use folio_crawl::model::Record;
use folio_crawl::output::{interchange_path, restore_collections};
use folio_crawl::storage::{read_documents, SqliteDocumentStore};
use folio_crawl::{EntityKind, VisitState};
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Renders a minimal book page
fn book_page(title: &str, isbn: &str, authors: &[(&str, &str)], similar: &[&str]) -> String {
    let author_links: String = authors
        .iter()
        .map(|(name, href)| {
            format!(
                r#"<a class="authorName" href="{}"><span itemprop="name">{}</span></a>"#,
                href, name
            )
        })
        .collect();
    let covers: String = similar
        .iter()
        .map(|href| {
            format!(
                r#"<li class="cover"><a href="{}"><img src="/covers/x.jpg"></a></li>"#,
                href
            )
        })
        .collect();

    format!(
        r#"<html><head><meta property="books:isbn" content="{isbn}"></head>
        <body>
            <img id="coverImage" src="/covers/{title}.jpg">
            <h1 id="bookTitle">
                {title}
            </h1>
            <div id="bookAuthors">{author_links}</div>
            <span itemprop="ratingValue">4.20</span>
            <meta itemprop="ratingCount" content="1000">
            <meta itemprop="reviewCount" content="50">
            <div id="relatedWorksRow"><ul>{covers}</ul></div>
        </body></html>"#
    )
}

/// Renders a minimal author page
fn author_page(name: &str, books: &[&str], similar_href: &str) -> String {
    let rows: String = books
        .iter()
        .map(|href| {
            format!(
                r#"<tr itemtype="http://schema.org/Book"><td><a href="{}"><span itemprop="name">t</span></a></td></tr>"#,
                href
            )
        })
        .collect();

    format!(
        r#"<html><body>
            <h1 class="authorName"><span itemprop="name">{name}</span></h1>
            <img alt="{name}" src="/photos/{name}.jpg">
            <span class="average">4.01</span>
            <span itemprop="ratingCount" content="900"></span>
            <span itemprop="reviewCount" content="80"></span>
            <a href="{similar_href}">Similar authors</a>
            <table>{rows}</table>
        </body></html>"#
    )
}

fn similar_authors_page(subject: &str, others: &[(&str, &str)]) -> String {
    let links: String = others
        .iter()
        .map(|(name, href)| {
            format!(
                r#"<a href="{}"><span itemprop="name">{}</span></a>"#,
                href, name
            )
        })
        .collect();

    format!(
        r#"<html><body>
            <a href="/author/show/x"><span itemprop="name">{subject}</span></a>
            {links}
        </body></html>"#
    )
}

async fn mount(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mounts a two-book, one-author catalog:
/// book 1 -> similar book 2, book 3; both books written by author 10
async fn mount_small_catalog(server: &MockServer) {
    mount(
        server,
        "/book/show/1",
        book_page(
            "First",
            "111",
            &[("Ann Writer", "/author/show/10")],
            &["/book/show/2", "/book/show/3"],
        ),
    )
    .await;
    mount(
        server,
        "/book/show/2",
        book_page("Second", "222", &[("Ann Writer", "/author/show/10")], &[]),
    )
    .await;
    mount(
        server,
        "/book/show/3",
        book_page("Third", "333", &[], &["/book/show/1"]),
    )
    .await;
    mount(
        server,
        "/author/show/10",
        author_page("Ann Writer", &["/book/show/1", "/book/show/4"], "/author/similar/10"),
    )
    .await;
    mount(
        server,
        "/author/similar/10",
        similar_authors_page("Ann Writer", &[("Bo Poet", "/author/show/11")]),
    )
    .await;
}

/// Creates a test configuration writing under `dir`
fn test_config(dir: &Path, sink: SinkKind) -> Config {
    let mut config = Config::default();
    config.user_agent.crawler_name = "TestBot".to_string();
    config.user_agent.crawler_version = "1.0.0".to_string();
    config.output.database_path = dir.join("library.db").display().to_string();
    config.output.export_dir = dir.join("data").display().to_string();
    config.output.sink = sink;
    config
}

fn book_urls(docs: &[serde_json::Value]) -> Vec<String> {
    docs.iter()
        .filter_map(|doc| doc["url"].as_str().map(str::to_string))
        .collect()
}

#[tokio::test]
async fn test_seed_and_similar_books_are_visited_in_order() {
    let server = MockServer::start().await;
    mount_small_catalog(&server).await;
    let base = server.uri();

    let mut crawler = Crawler::new(Fetcher::new(&Config::default()).unwrap());
    let report = crawler
        .run(&CrawlOptions::new(3, 0, format!("{}/book/show/1", base)))
        .await
        .unwrap();

    assert_eq!(report.books.visited, 3);
    assert_eq!(report.books.fetch_failed, 0);

    let books = &crawler.store().books;
    let urls: Vec<_> = books.all().iter().map(|b| b.url().to_string()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/book/show/1", base),
            format!("{}/book/show/2", base),
            format!("{}/book/show/3", base),
        ]
    );

    let first = books.get(0).unwrap();
    assert_eq!(first.title, "First");
    assert_eq!(first.isbn, "111");
    assert_eq!(first.rating, "4.20");
    assert_eq!(first.rating_count, "1000");
    assert_eq!(first.review_count, "50");
    assert_eq!(first.id, Some(1));
    assert_eq!(first.image_url, format!("{}/covers/First.jpg", base));
    assert_eq!(first.author_names, vec!["Ann Writer"]);
    assert_eq!(first.author_urls, vec![format!("{}/author/show/10", base)]);

    // Book 3 links back to book 1, which is already known
    assert_eq!(books.len(), 3);
    assert_eq!(crawler.store().authors.len(), 1);
}

#[tokio::test]
async fn test_author_traversal_follows_books_and_similar_authors() {
    let server = MockServer::start().await;
    mount_small_catalog(&server).await;
    let base = server.uri();

    let mut crawler = Crawler::new(Fetcher::new(&Config::default()).unwrap());
    let report = crawler
        .run(&CrawlOptions::new(3, 5, format!("{}/book/show/1", base)))
        .await
        .unwrap();

    // Author 11 has no page mounted, so its visit fails; then the list runs out
    assert_eq!(report.authors.visited, 2);
    assert_eq!(report.authors.fetch_failed, 1);
    assert!(report.authors.exhausted);

    let store = crawler.store();
    let ann = store
        .authors
        .find_by_url(&format!("{}/author/show/10", base))
        .unwrap();
    assert_eq!(ann.name, "Ann Writer");
    assert_eq!(ann.id, Some(10));
    assert_eq!(ann.rating, "4.01");
    assert_eq!(ann.image_url, format!("{}/photos/Ann%20Writer.jpg", base));
    assert_eq!(
        ann.related_author_urls,
        vec![format!("{}/author/show/11", base)]
    );
    assert_eq!(
        ann.authored_book_urls,
        vec![
            format!("{}/book/show/1", base),
            format!("{}/book/show/4", base)
        ]
    );

    // book 4 was discovered through the author and stays a pending stub
    assert_eq!(store.books.len(), 4);
    assert_eq!(store.books.state(3), Some(VisitState::Pending));
    assert_eq!(report.books_pending, 1);
}

#[tokio::test]
async fn test_deferred_crawl_exports_and_imports() {
    let server = MockServer::start().await;
    mount_small_catalog(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), SinkKind::Sqlite);

    let options = CrawlOptions::new(2, 1, format!("{}/book/show/1", server.uri()));
    let report = run_crawl(&config, &options).await.unwrap();

    let export_dir = Path::new(&config.output.export_dir);
    let exported_books = read_documents(&interchange_path(export_dir, EntityKind::Books)).unwrap();
    let exported_authors =
        read_documents(&interchange_path(export_dir, EntityKind::Authors)).unwrap();

    // Stubs are exported alongside visited records
    assert_eq!(exported_books.len(), 4);
    assert_eq!(exported_authors.len(), 2);
    assert_eq!(report.books.persisted, 4);
    assert_eq!(report.authors.persisted, 2);

    let database = SqliteDocumentStore::new(Path::new(&config.output.database_path)).unwrap();
    assert_eq!(database.count("books").unwrap(), 4);
    assert_eq!(database.count("authors").unwrap(), 2);
    assert_eq!(
        book_urls(&database.documents("books").unwrap()),
        book_urls(&exported_books)
    );
}

#[tokio::test]
async fn test_real_time_crawl_persists_only_visited_records() {
    let server = MockServer::start().await;
    mount_small_catalog(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), SinkKind::Sqlite);

    let options = CrawlOptions::new(2, 1, format!("{}/book/show/1", server.uri())).real_time(true);
    let report = run_crawl(&config, &options).await.unwrap();

    assert_eq!(report.books.persisted, 2);
    assert_eq!(report.authors.persisted, 1);

    let database = SqliteDocumentStore::new(Path::new(&config.output.database_path)).unwrap();
    assert_eq!(database.count("books").unwrap(), 2);
    assert_eq!(database.count("authors").unwrap(), 1);

    // No interchange files in real-time mode
    let export_dir = Path::new(&config.output.export_dir);
    assert!(!interchange_path(export_dir, EntityKind::Books).exists());
}

#[tokio::test]
async fn test_real_time_crawl_to_json_lines() {
    let server = MockServer::start().await;
    mount_small_catalog(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), SinkKind::Jsonl);

    let options = CrawlOptions::new(1, 0, format!("{}/book/show/1", server.uri())).real_time(true);
    run_crawl(&config, &options).await.unwrap();

    let lines = read_documents(&Path::new(&config.output.export_dir).join("books.jsonl")).unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["title"], "First");
}

#[tokio::test]
async fn test_restore_reimports_exported_files() {
    let server = MockServer::start().await;
    mount_small_catalog(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), SinkKind::Sqlite);

    let options = CrawlOptions::new(1, 0, format!("{}/book/show/1", server.uri()));
    run_crawl(&config, &options).await.unwrap();

    let mut fresh = SqliteDocumentStore::new_in_memory().unwrap();
    let (books, authors) =
        restore_collections(Path::new(&config.output.export_dir), &mut fresh).unwrap();

    assert_eq!(books, 3);
    assert_eq!(authors, 1);
    assert_eq!(fresh.count("books").unwrap(), 3);
}

#[tokio::test]
async fn test_author_names_stay_paired_with_author_urls() {
    let server = MockServer::start().await;
    // Named spans outside the author links must not shift the pairing
    mount(
        &server,
        "/book/show/5",
        r#"<html><body>
            <h1 id="bookTitle">Dune</h1>
            <div itemprop="publisher"><span itemprop="name">Ace Books</span></div>
            <a class="authorName" href="/author/show/58"><span itemprop="name">Frank Herbert</span></a>
            <span itemprop="name">Illustrator</span>
        </body></html>"#
            .to_string(),
    )
    .await;

    let mut crawler = Crawler::new(Fetcher::new(&Config::default()).unwrap());
    crawler
        .crawl_books(&format!("{}/book/show/5", server.uri()), 1)
        .await
        .unwrap();

    let book = crawler.store().books.get(0).unwrap();
    assert_eq!(book.author_names, vec!["Frank Herbert"]);
    assert_eq!(
        book.author_urls,
        vec![format!("{}/author/show/58", server.uri())]
    );
    assert!(book.similar_book_urls.is_empty());
    assert!(book.isbn.is_empty());
}

#[tokio::test]
async fn test_invalid_seed_is_rejected_before_crawling() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), SinkKind::Sqlite);

    let result = run_crawl(&config, &CrawlOptions::new(1, 1, "book/show/1")).await;

    assert!(result.is_err());
    assert!(!Path::new(&config.output.database_path).exists());
}

#[tokio::test]
async fn test_unusable_output_fails_before_crawling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(book_page("X", "1", &[], &[])),
        )
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();
    let mut config = test_config(dir.path(), SinkKind::Sqlite);
    config.output.database_path = blocker.join("library.db").display().to_string();

    let options = CrawlOptions::new(3, 3, format!("{}/book/show/1", server.uri()));
    let result = run_crawl(&config, &options).await;

    assert!(result.is_err());
    let export_dir = Path::new(&config.output.export_dir);
    assert!(!interchange_path(export_dir, EntityKind::Books).exists());
}
