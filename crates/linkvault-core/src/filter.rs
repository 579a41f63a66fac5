use linkvault_api::Bookmark;

/// Client-side search over already loaded bookmarks.
///
/// Case-insensitive substring match on title or URL. A blank query keeps
/// everything in load order.
pub fn filter_bookmarks<'a>(bookmarks: &'a [Bookmark], query: &str) -> Vec<&'a Bookmark> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return bookmarks.iter().collect();
    }

    bookmarks
        .iter()
        .filter(|b| {
            b.title.to_lowercase().contains(&query) || b.url.to_lowercase().contains(&query)
        })
        .collect()
}

/// "3 of 10" style summary for a filtered view
pub fn results_label(shown: usize, total: usize) -> String {
    format!("{} of {}", shown, total)
}
