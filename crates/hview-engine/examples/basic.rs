//! Example: a movie listing navigating without reloads
//!
//! Serves two pages from memory and walks one session through them,
//! printing the target regions as placeholder fragments land.

use hview_engine::Session;
use hview_net::StaticFetcher;

const INDEX: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Movies</title>
    <style>@view-transition { navigation: auto; }</style>
</head>
<body>
    <h-view match="/movies*"></h-view>
    <h1 id="title">Movies</h1>
    <ul id="movies"></ul>
    <ul id="genres"></ul>
</body>
</html>"#;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let fetcher = StaticFetcher::new()
        .route_chunked(
            "/movies",
            [
                r#"<h-template for="movies"><li>Heat</li><li>Alien</li></h-template>"#,
                r#"<h-template for="genres"><li>Drama</li><li>Horror</li></h-template>"#,
            ],
        )
        .route(
            "/movies?q=alien",
            r#"<h-template for="title">Movies - alien</h-template>
               <h-template for="movies"><li>Alien</li></h-template>"#,
        );

    let mut session = Session::load(INDEX, "https://example.com/movies", fetcher)?;
    println!("hView Engine v{} loaded '{}'", hview_engine::VERSION, session.document().title());

    smol::block_on(async {
        session.navigate("/movies").await?;
        print_region(&session, "movies");
        print_region(&session, "genres");

        // A query-only navigation: the path pattern keeps matching while
        // the listing content is replaced.
        session.navigate("?q=alien").await?;
        print_region(&session, "title");
        print_region(&session, "movies");
        Ok::<_, anyhow::Error>(())
    })?;

    println!("now at {}", session.current_url());
    Ok(())
}

fn print_region(session: &Session<StaticFetcher>, id: &str) {
    if let Some(node) = session.document().get_element_by_id(id) {
        println!("#{id}: {}", session.document().tree().text_content(node));
    }
}
