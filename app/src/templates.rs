use crate::models::{MediaItem, MediaKind, TrendingEntry};
use crate::session::UiState;
use crate::tmdb::poster_url;

const NO_POSTER: &str = "/static/no-movie.svg";

pub fn render_index(state: &UiState) -> String {
    let mut html = String::new();

    html.push_str(&base_start("ReelFinder"));

    html.push_str(&format!(
        r#"
    <div class="pattern"></div>
    <div class="wrapper">
        <header>
            <h1>Find <span class="text-gradient">Movies</span> You'll Enjoy Without the Hassle</h1>
            <form class="search" action="/search" method="get">
                <input id="search-input" type="text" name="q" placeholder="Search through thousands of movies and series" value="{}" data-seq="{}" autocomplete="off">
            </form>
        </header>
        <div id="trending" data-pending="{}">{}</div>
        <section class="all-movies">
            <div id="results" data-pending="{}">{}</div>
        </section>
    </div>
"#,
        escape(&state.search_term),
        state.input_seq,
        !state.trending_ready,
        render_trending(&state.trending),
        !state.is_settled(),
        render_results(state)
    ));

    html.push_str(SEARCH_SCRIPT);
    html.push_str(&base_end());
    html
}

/// Empty when there is nothing trending, so the section disappears.
pub fn render_trending(trending: &[TrendingEntry]) -> String {
    if trending.is_empty() {
        return String::new();
    }

    let mut html = String::from(r#"<section class="trending"><h2>Trending Movies</h2><ul>"#);
    for entry in trending {
        let poster = entry.poster_url.as_deref().unwrap_or(NO_POSTER);
        html.push_str(&format!(
            r#"<li><p>{}</p><img src="{}" alt="{}"></li>"#,
            entry.rank,
            escape(poster),
            escape(&entry.title)
        ));
    }
    html.push_str("</ul></section>");
    html
}

/// Spinner, error, or the two poster-bearing sublists.
pub fn render_results(state: &UiState) -> String {
    if state.loading {
        return r#"<div class="spinner" role="status" aria-label="Loading"></div>"#.to_string();
    }

    if let Some(error) = &state.error {
        return format!(
            r#"<p class="text-red-500">{}</p>"#,
            escape(error.user_message())
        );
    }

    let mut html = String::from(r#"<h2>New Movies</h2>"#);
    html.push_str(&render_card_list(&state.items, MediaKind::Movie));
    html.push_str(r#"<h2>New TV Shows</h2>"#);
    html.push_str(&render_card_list(&state.items, MediaKind::Tv));
    html
}

fn render_card_list(items: &[MediaItem], kind: MediaKind) -> String {
    let mut html = String::from("<ul>");
    for item in items
        .iter()
        .filter(|i| i.kind() == kind && i.poster_path().is_some())
    {
        html.push_str(&format!(
            r#"<li id="{}-{}"><a href="{}" target="_blank" rel="noopener noreferrer">{}</a></li>"#,
            kind,
            item.id(),
            item.detail_url(),
            render_card(item)
        ));
    }
    html.push_str("</ul>");
    html
}

pub fn render_card(item: &MediaItem) -> String {
    let poster = item
        .poster_path()
        .map(poster_url)
        .unwrap_or_else(|| NO_POSTER.to_string());
    let rating = if item.vote_average() > 0.0 {
        format!("{:.1}", item.vote_average())
    } else {
        "N/A".to_string()
    };
    let year = item.year().unwrap_or("N/A");

    format!(
        r#"<div class="movie-card"><img src="{}" alt="{}"><div class="mt-4"><h3>{}</h3><div class="content"><div class="rating"><img src="/static/star.svg" alt="Star Icon"><p>{}</p></div><span>•</span><p class="lang">{}</p><span>•</span><p class="year">{}</p></div></div></div>"#,
        escape(&poster),
        escape(item.title()),
        escape(item.title()),
        rating,
        escape(item.original_language()),
        escape(year)
    )
}

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

// Keystrokes go to the server, which debounces them. The page polls
// /api/state until every posted keystroke has been searched, then swaps in
// the fragments. A page served mid-search or before trending has loaded
// starts polling straight away.
const SEARCH_SCRIPT: &str = r#"
    <script>
    (function () {
        const input = document.getElementById('search-input');
        const results = document.getElementById('results');
        const trending = document.getElementById('trending');
        let seq = Number(input.dataset.seq) || 0;
        let inflight = 0;
        let poller = null;

        async function fragment(url, target) {
            const res = await fetch(url);
            if (res.ok) target.innerHTML = await res.text();
        }

        async function refresh() {
            const res = await fetch('/api/state');
            if (!res.ok) return;
            const state = await res.json();
            const settled = inflight === 0 && !state.loading
                && state.debounced_term === state.search_term;

            if (state.loading || settled) await fragment('/fragment/results', results);
            if (state.trending_ready && trending.dataset.pending === 'true') {
                await fragment('/fragment/trending', trending);
                trending.dataset.pending = 'false';
            }
            if (settled && trending.dataset.pending !== 'true') {
                results.dataset.pending = 'false';
                clearInterval(poller);
                poller = null;
            }
        }

        function startPolling() {
            if (!poller) poller = setInterval(refresh, 400);
        }

        input.addEventListener('input', function () {
            seq += 1;
            inflight += 1;
            fetch('/api/input', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ q: input.value, seq: seq }),
            }).finally(function () { inflight -= 1; });
            results.dataset.pending = 'true';
            startPolling();
        });

        input.form.addEventListener('submit', function (e) { e.preventDefault(); });

        if (results.dataset.pending === 'true' || trending.dataset.pending === 'true') {
            startPolling();
        }
    })();
    </script>
"#;

fn base_start(title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{}</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <main>"#,
        escape(title)
    )
}

fn base_end() -> String {
    String::from(r#"</main></body></html>"#)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::models::{Movie, Series};

    fn movie(id: i64, poster: Option<&str>) -> MediaItem {
        MediaItem::Movie(Movie {
            id,
            title: format!("Movie {}", id),
            poster_path: poster.map(str::to_string),
            release_date: Some("2024-03-01".to_string()),
            original_language: "en".to_string(),
            vote_average: 7.26,
            popularity: 1.0,
        })
    }

    fn show(id: i64, poster: Option<&str>) -> MediaItem {
        MediaItem::Tv(Series {
            id,
            name: format!("Show {}", id),
            poster_path: poster.map(str::to_string),
            first_air_date: None,
            original_language: "ko".to_string(),
            vote_average: 0.0,
            popularity: 1.0,
            origin_country: vec!["KR".to_string()],
        })
    }

    #[test]
    fn spinner_wins_over_error_and_items() {
        let state = UiState {
            loading: true,
            error: Some(SearchError::FetchFailure),
            items: vec![movie(1, Some("/a.jpg"))],
            ..UiState::default()
        };
        let html = render_results(&state);
        assert!(html.contains("spinner"));
        assert!(!html.contains("Failed to fetch"));
        assert!(!html.contains("Movie 1"));
    }

    #[test]
    fn error_message_replaces_lists() {
        let state = UiState {
            error: Some(SearchError::EmptyResult),
            ..UiState::default()
        };
        let html = render_results(&state);
        assert!(html.contains("No movies or series found!"));
        assert!(!html.contains("New Movies"));
    }

    #[test]
    fn posterless_items_are_never_rendered() {
        let state = UiState {
            items: vec![
                movie(1, Some("/a.jpg")),
                movie(2, None),
                show(3, None),
                show(4, Some("/d.jpg")),
                show(5, Some("")),
            ],
            ..UiState::default()
        };
        let html = render_results(&state);

        assert!(html.contains(r#"id="movie-1""#));
        assert!(html.contains(r#"id="tv-4""#));
        assert!(!html.contains("Movie 2"));
        assert!(!html.contains("Show 3"));
        assert!(!html.contains("Show 5"));
    }

    #[test]
    fn sublists_are_split_by_kind_and_link_out() {
        let state = UiState {
            items: vec![show(4, Some("/d.jpg")), movie(1, Some("/a.jpg"))],
            ..UiState::default()
        };
        let html = render_results(&state);

        let movies_at = html.find("New Movies").unwrap();
        let shows_at = html.find("New TV Shows").unwrap();
        let movie_at = html.find("Movie 1").unwrap();
        let show_at = html.find("Show 4").unwrap();
        assert!(movies_at < movie_at && movie_at < shows_at && shows_at < show_at);

        assert!(html.contains(r#"href="https://www.themoviedb.org/tv/4" target="_blank" rel="noopener noreferrer""#));
        assert!(html.contains(r#"href="https://www.themoviedb.org/movie/1""#));
    }

    #[test]
    fn card_shows_rating_language_and_year() {
        let html = render_card(&movie(1, Some("/a.jpg")));
        assert!(html.contains("https://image.tmdb.org/t/p/w500/a.jpg"));
        assert!(html.contains("<p>7.3</p>"));
        assert!(html.contains(r#"<p class="lang">en</p>"#));
        assert!(html.contains(r#"<p class="year">2024</p>"#));

        let html = render_card(&show(2, Some("/b.jpg")));
        assert!(html.contains("<p>N/A</p>"));
        assert!(html.contains(r#"<p class="year">N/A</p>"#));
    }

    #[test]
    fn trending_section_is_omitted_when_empty() {
        assert!(render_trending(&[]).is_empty());

        let html = render_trending(&[TrendingEntry {
            rank: 1,
            title: "Dune".to_string(),
            poster_url: None,
            search_term: "dune".to_string(),
        }]);
        assert!(html.contains("Trending Movies"));
        assert!(html.contains("<p>1</p>"));
        assert!(html.contains(NO_POSTER));
    }

    #[test]
    fn page_marks_unfinished_work_for_the_startup_poll() {
        let busy = render_index(&UiState {
            loading: true,
            ..UiState::default()
        });
        assert!(busy.contains(r#"<div id="results" data-pending="true">"#));
        assert!(busy.contains(r#"<div id="trending" data-pending="true">"#));
        assert!(busy.contains("if (results.dataset.pending === 'true'"));

        let idle = render_index(&UiState {
            trending_ready: true,
            input_seq: 7,
            ..UiState::default()
        });
        assert!(idle.contains(r#"<div id="results" data-pending="false">"#));
        assert!(idle.contains(r#"<div id="trending" data-pending="false">"#));
        assert!(idle.contains(r#"data-seq="7""#));
    }

    #[test]
    fn polling_waits_on_search_state_not_a_fixed_window() {
        let html = render_index(&UiState::default());
        assert!(html.contains("fetch('/api/state')"));
        assert!(html.contains("state.debounced_term === state.search_term"));
        assert!(!html.contains("quiet"));
    }

    #[test]
    fn user_text_is_escaped() {
        let state = UiState {
            search_term: r#""><script>alert(1)</script>"#.to_string(),
            ..UiState::default()
        };
        let html = render_index(&state);
        assert!(!html.contains("<script>alert(1)"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
