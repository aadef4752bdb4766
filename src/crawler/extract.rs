//! Field extraction for book and author pages
//!
//! Every selector yields an `Option`: `None` means the selector matched
//! nothing on the page. [`settle`] is the one place absent fields turn into
//! empty values (and get logged).

use crate::crawler::links::resolve_link;
use crate::model::{Author, Book};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Raw extraction result for a book page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPage {
    pub title: Option<String>,
    pub isbn: Option<String>,
    pub rating: Option<String>,
    pub rating_count: Option<String>,
    pub review_count: Option<String>,
    pub image_url: Option<String>,
    pub author_names: Option<Vec<String>>,
    pub author_urls: Option<Vec<String>>,
    pub similar_book_urls: Option<Vec<String>>,
}

/// Raw extraction result for an author page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorPage {
    pub name: Option<String>,
    pub rating: Option<String>,
    pub rating_count: Option<String>,
    pub review_count: Option<String>,
    pub image_url: Option<String>,
    pub authored_book_urls: Option<Vec<String>>,

    /// Link to the separate page listing similar authors
    pub similar_authors_url: Option<String>,

    /// Filled in from the similar-authors page, when it could be fetched
    pub related_author_urls: Option<Vec<String>>,
}

/// Default-on-absent policy shared by every extracted field
pub fn settle<T: Default>(field: &'static str, value: Option<T>, page_url: &str) -> T {
    match value {
        Some(value) => value,
        None => {
            tracing::warn!("Missing {} at {}", field, page_url);
            T::default()
        }
    }
}

/// Pairs author names with author URLs by position
///
/// Mismatched lengths are truncated to the shorter list so index `i` of the
/// returned names always describes index `i` of the returned URLs.
pub fn align_authors(
    mut names: Vec<String>,
    mut urls: Vec<String>,
    page_url: &str,
) -> (Vec<String>, Vec<String>) {
    if names.len() != urls.len() {
        tracing::warn!(
            "Author names ({}) and author URLs ({}) differ in length at {}; keeping {}",
            names.len(),
            urls.len(),
            page_url,
            names.len().min(urls.len())
        );
        let keep = names.len().min(urls.len());
        names.truncate(keep);
        urls.truncate(keep);
    }
    (names, urls)
}

impl BookPage {
    /// Overwrites every extracted field of `book` with this page's values
    pub fn write_into(self, book: &mut Book, page_url: &str) {
        book.title = settle("title", self.title, page_url);
        book.isbn = settle("isbn", self.isbn, page_url);
        book.rating = settle("rating", self.rating, page_url);
        book.rating_count = settle("rating count", self.rating_count, page_url);
        book.review_count = settle("review count", self.review_count, page_url);
        book.image_url = settle("image url", self.image_url, page_url);
        book.similar_book_urls = settle("similar books", self.similar_book_urls, page_url);

        let names = settle("author names", self.author_names, page_url);
        let urls = settle("author urls", self.author_urls, page_url);
        let (names, urls) = align_authors(names, urls, page_url);
        book.author_names = names;
        book.author_urls = urls;
    }
}

impl AuthorPage {
    /// Overwrites every extracted field of `author` with this page's values
    pub fn write_into(self, author: &mut Author, page_url: &str) {
        author.name = settle("author name", self.name, page_url);
        author.rating = settle("author rating", self.rating, page_url);
        author.rating_count = settle("author rating count", self.rating_count, page_url);
        author.review_count = settle("author review count", self.review_count, page_url);
        author.image_url = settle("author image url", self.image_url, page_url);
        author.authored_book_urls = settle("authored books", self.authored_book_urls, page_url);
        author.related_author_urls =
            settle("related authors", self.related_author_urls, page_url);
    }
}

/// Extracts book fields and reference URLs from a book page
pub fn parse_book_page(html: &str, page_url: &Url) -> BookPage {
    let document = Html::parse_document(html);
    let (author_names, author_urls) = author_links(&document, page_url);

    BookPage {
        title: first_text(&document, "h1#bookTitle"),
        isbn: first_attr(&document, r#"meta[property="books:isbn"]"#, "content"),
        rating: first_text(&document, r#"span[itemprop="ratingValue"]"#),
        rating_count: first_attr(&document, r#"meta[itemprop="ratingCount"]"#, "content"),
        review_count: first_attr(&document, r#"meta[itemprop="reviewCount"]"#, "content"),
        image_url: first_attr(&document, "img#coverImage", "src")
            .and_then(|src| resolve_link(&src, page_url)),
        author_names,
        author_urls,
        similar_book_urls: similar_books(&document, page_url),
    }
}

/// Extracts author fields and reference URLs from an author page
///
/// `related_author_urls` is left `None`; those live on a separate page
/// (see [`AuthorPage::similar_authors_url`] and [`parse_related_authors`]).
pub fn parse_author_page(html: &str, page_url: &Url) -> AuthorPage {
    let document = Html::parse_document(html);
    let name = first_text(&document, r#"h1.authorName span[itemprop="name"]"#);
    let image_url = name
        .as_deref()
        .and_then(|name| image_with_alt(&document, name))
        .and_then(|src| resolve_link(&src, page_url));

    AuthorPage {
        rating: first_text(&document, "span.average"),
        rating_count: first_attr(&document, r#"span[itemprop="ratingCount"]"#, "content"),
        review_count: first_attr(&document, r#"span[itemprop="reviewCount"]"#, "content"),
        image_url,
        authored_book_urls: authored_books(&document, page_url),
        similar_authors_url: similar_authors_link(&document, page_url),
        related_author_urls: None,
        name,
    }
}

/// Extracts related author URLs from a similar-authors page
///
/// The first `itemprop="name"` entry on that page is the subject author
/// and is skipped. Duplicates are dropped, keeping first-seen order.
pub fn parse_related_authors(html: &str, page_url: &Url) -> Option<Vec<String>> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(r#"span[itemprop="name"]"#).ok()?;

    let mut seen = HashSet::new();
    let urls = document
        .select(&selector)
        .skip(1)
        .filter_map(parent_href)
        .filter_map(|href| resolve_link(&href, page_url))
        .filter(|url| seen.insert(url.clone()))
        .collect();

    Some(urls)
}

/// First non-empty text node of the first matching element, trimmed
fn first_text(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document.select(&selector).next().and_then(leading_text)
}

fn first_attr(document: &Html, css: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr(attr))
        .map(|value| value.trim().to_string())
}

/// Name and URL of every `a.authorName` link, read from the same anchor
///
/// The name is the anchor's `itemprop="name"` span, or its own text when the
/// span is missing. Anchors yielding no name or no usable URL are dropped
/// from both lists. `(None, None)` when the page has no author links.
fn author_links(document: &Html, page_url: &Url) -> (Option<Vec<String>>, Option<Vec<String>>) {
    let (Ok(anchors), Ok(name)) = (
        Selector::parse("a.authorName[href]"),
        Selector::parse(r#"span[itemprop="name"]"#),
    ) else {
        return (None, None);
    };

    let mut matched = false;
    let mut names = Vec::new();
    let mut urls = Vec::new();

    for anchor in document.select(&anchors) {
        matched = true;
        let author_name = anchor
            .select(&name)
            .next()
            .and_then(leading_text)
            .or_else(|| leading_text(anchor));
        let author_url = anchor
            .value()
            .attr("href")
            .and_then(|href| resolve_link(href, page_url));

        if let (Some(author_name), Some(author_url)) = (author_name, author_url) {
            names.push(author_name);
            urls.push(author_url);
        }
    }

    if matched {
        (Some(names), Some(urls))
    } else {
        (None, None)
    }
}

fn leading_text(element: ElementRef<'_>) -> Option<String> {
    element
        .text()
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

fn parent_href(element: ElementRef<'_>) -> Option<String> {
    let parent = element.parent().and_then(ElementRef::wrap)?;
    parent.value().attr("href").map(str::to_string)
}

/// Cover links in the related-works block; `None` if the block is missing
fn similar_books(document: &Html, page_url: &Url) -> Option<Vec<String>> {
    let block = Selector::parse(r#"div[id^="relatedWorks"]"#).ok()?;
    let cover_image = Selector::parse("li.cover img").ok()?;

    let related = document.select(&block).next()?;
    let urls = related
        .select(&cover_image)
        .filter_map(parent_href)
        .filter_map(|href| resolve_link(&href, page_url))
        .collect();

    Some(urls)
}

/// Book links from the author's book table; `None` if the table is missing
fn authored_books(document: &Html, page_url: &Url) -> Option<Vec<String>> {
    let rows = Selector::parse(r#"tr[itemtype="http://schema.org/Book"]"#).ok()?;
    let name = Selector::parse(r#"span[itemprop="name"]"#).ok()?;

    let rows: Vec<ElementRef<'_>> = document.select(&rows).collect();
    if rows.is_empty() {
        return None;
    }

    let urls = rows
        .into_iter()
        .filter_map(|row| row.select(&name).next())
        .filter_map(parent_href)
        .filter_map(|href| resolve_link(&href, page_url))
        .collect();

    Some(urls)
}

fn similar_authors_link(document: &Html, page_url: &Url) -> Option<String> {
    let anchors = Selector::parse("a[href]").ok()?;
    document
        .select(&anchors)
        .find(|anchor| anchor.text().collect::<String>().trim() == "Similar authors")
        .and_then(|anchor| anchor.value().attr("href"))
        .and_then(|href| resolve_link(href, page_url))
}

fn image_with_alt(document: &Html, alt: &str) -> Option<String> {
    let images = Selector::parse("img[alt][src]").ok()?;
    document
        .select(&images)
        .find(|image| image.value().attr("alt") == Some(alt))
        .and_then(|image| image.value().attr("src"))
        .map(str::to_string)
}
