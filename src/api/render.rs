//! HTML building blocks for the form UI.
//!
//! Pages are assembled from plain strings. Every value that came from a
//! user or from the data file goes through [`escape`].

use std::fmt::Write;

use crate::library::{Book, Statistics};

/// Sidebar actions of the form UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add,
    Remove,
    Search,
    Display,
    Stats,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Add,
        Action::Remove,
        Action::Search,
        Action::Display,
        Action::Stats,
    ];

    /// Value used in the `action` query parameter.
    pub fn slug(&self) -> &'static str {
        match self {
            Action::Add => "add",
            Action::Remove => "remove",
            Action::Search => "search",
            Action::Display => "display",
            Action::Stats => "stats",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Action::Add => "Add Book",
            Action::Remove => "Remove Book",
            Action::Search => "Search",
            Action::Display => "Display All",
            Action::Stats => "Statistics",
        }
    }

    /// Unknown or missing values fall back to `Add`, the first action.
    pub fn from_slug(slug: Option<&str>) -> Self {
        Self::ALL
            .into_iter()
            .find(|a| Some(a.slug()) == slug)
            .unwrap_or(Action::Add)
    }
}

/// Banner shown above the current view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Warning(String),
    Error(String),
}

impl Notice {
    fn render(&self) -> String {
        let (class, text) = match self {
            Notice::Success(t) => ("success", t),
            Notice::Warning(t) => ("warning", t),
            Notice::Error(t) => ("error", t),
        };
        format!(r#"<div class="notice {class}">{}</div>"#, escape(text))
    }
}

/// Escape text for use in HTML content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// One book as an HTML line.
pub fn book_line(book: &Book) -> String {
    let status = if book.read { "✅ Read" } else { "❌ Unread" };
    format!(
        "<strong>{}</strong> by <em>{}</em> ({}) - {} - {}",
        escape(&book.title),
        escape(&book.author),
        book.year,
        escape(&book.genre),
        status
    )
}

/// Unordered list of books.
pub fn book_list<'a>(books: impl IntoIterator<Item = &'a Book>) -> String {
    let mut html = String::from(r#"<ul class="books">"#);
    for book in books {
        let _ = write!(html, "<li>{}</li>", book_line(book));
    }
    html.push_str("</ul>");
    html
}

/// `<select>` with the given options, marking `selected`.
pub fn select<'a>(
    name: &str,
    options: impl IntoIterator<Item = &'a str>,
    selected: Option<&str>,
) -> String {
    let mut html = format!(r#"<select name="{}">"#, escape(name));
    for option in options {
        let mark = if Some(option) == selected { " selected" } else { "" };
        let _ = write!(
            html,
            r#"<option value="{0}"{1}>{0}</option>"#,
            escape(option),
            mark
        );
    }
    html.push_str("</select>");
    html
}

/// Statistics as a grid of metrics.
pub fn metrics(stats: &Statistics) -> String {
    let rows = [
        ("📚 Total Books", stats.total.to_string()),
        ("✅ Books Read", stats.read.to_string()),
        ("❌ Books Unread", stats.unread.to_string()),
        ("📈 Percentage Read", stats.percent_label()),
    ];

    let mut html = String::from(r#"<dl class="metrics">"#);
    for (label, value) in rows {
        let _ = write!(html, "<dt>{label}</dt><dd>{value}</dd>");
    }
    html.push_str("</dl>");
    html
}

const STYLE: &str = "body{font-family:sans-serif;margin:0;display:flex}\
nav{width:14rem;padding:1rem;background:#f0f2f6;min-height:100vh}\
nav a{display:block;padding:.3rem 0}nav a.active{font-weight:bold}\
main{padding:1rem 2rem;max-width:48rem}\
.notice{padding:.6rem;border-radius:4px;margin:.6rem 0}\
.success{background:#dff0d8}.warning{background:#fcf8e3}.error{background:#f2dede}\
dl.metrics dt{color:#555}dl.metrics dd{font-size:1.6rem;margin:0 0 .8rem 0}";

/// Full page: sidebar, reset control, optional notice, and the view body.
pub fn page(active: Action, notice: Option<&Notice>, body: &str) -> String {
    let mut nav = String::from("<nav><h3>Choose Action</h3>");
    for action in Action::ALL {
        let class = if action == active { r#" class="active""# } else { "" };
        let _ = write!(
            nav,
            r#"<a href="/?action={}"{}>{}</a>"#,
            action.slug(),
            class,
            action.label()
        );
    }
    nav.push_str("</nav>");

    let notice = notice.map(Notice::render).unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>📚 Personal Library Manager</title><style>{STYLE}</style></head>
<body>
{nav}
<main>
<h1>📚 Personal Library Manager</h1>
<p>Manage your book collection easily!</p>
<form method="post" action="/reset"><button type="submit">🧹 Reset Entire Library</button></form>
{notice}
{body}
</main>
</body>
</html>"#
    )
}
