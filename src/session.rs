use crate::console::{Console, ConsoleError};
use crate::navigator::select_field_and_location;
use crate::presenter::{Launcher, present_and_select};
use crate::scraper::{ScraperError, WebScraper};
use crate::types::{Catalog, ResultsPage};

/// Where search result pages come from.
pub trait ListingSource {
    fn base_url(&self) -> &str;
    fn fetch_results(&self, url: &str) -> Result<ResultsPage, ScraperError>;
}

impl ListingSource for WebScraper {
    fn base_url(&self) -> &str {
        WebScraper::base_url(self)
    }

    fn fetch_results(&self, url: &str) -> Result<ResultsPage, ScraperError> {
        WebScraper::fetch_results(self, url)
    }
}

/// Runs select, search and browse rounds until the console is closed.
///
/// A failed search is reported and the next round starts from the field menu.
pub fn run_session(
    source: &dyn ListingSource,
    catalog: &Catalog,
    console: &mut dyn Console,
    launcher: &dyn Launcher,
) -> Result<(), ConsoleError> {
    loop {
        let selection = select_field_and_location(catalog, console)?;

        let url = match selection.search_url(source.base_url()) {
            Ok(url) => url,
            Err(e) => {
                log::error!("Cannot search {}: {}", selection, e);
                console.say(&format!("{e}"));
                continue;
            }
        };

        console.say("");
        console.say("Searching...");

        match source.fetch_results(&url) {
            Ok(page) => present_and_select(&page, console, launcher)?,
            Err(e) => {
                log::warn!("Search for {} failed: {}", url, e);
                console.say(&format!("Search failed: {e}"));
                console.say("Please try again or change your selection.");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::fs;

    use super::*;
    use crate::console::testing::ScriptedConsole;
    use crate::parser::{ParseError, parse_catalog, parse_results_page};
    use crate::presenter::testing::RecordingLauncher;

    const BASE: &str = "https://www.internships.com";

    /// Serves fixture pages and records the URLs asked for. An empty queue
    /// answers with a parse failure.
    struct FixtureSource {
        pages: RefCell<Vec<&'static str>>,
        requested: RefCell<Vec<String>>,
    }

    impl FixtureSource {
        fn new(pages: &[&'static str]) -> Self {
            Self {
                pages: RefCell::new(pages.iter().rev().copied().collect()),
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl ListingSource for FixtureSource {
        fn base_url(&self) -> &str {
            BASE
        }

        fn fetch_results(&self, url: &str) -> Result<ResultsPage, ScraperError> {
            self.requested.borrow_mut().push(url.to_string());
            let Some(path) = self.pages.borrow_mut().pop() else {
                return Err(ParseError::MissingField("postings container".into()).into());
            };
            let html = fs::read_to_string(path).expect("Failed to read fixture");
            Ok(parse_results_page(&html, BASE)?)
        }
    }

    fn catalog() -> Catalog {
        let html = fs::read_to_string("fixtures/sitemap.html").expect("Failed to read fixture");
        parse_catalog(&html, BASE).expect("Failed to parse sitemap")
    }

    #[test]
    fn test_session_searches_and_opens_postings() {
        let source = FixtureSource::new(&["fixtures/results.html"]);
        let mut console = ScriptedConsole::new(&["Computer Science", "texas", "austin", "1", "x"]);
        let launcher = RecordingLauncher::default();

        let result = run_session(&source, &catalog(), &mut console, &launcher);

        assert!(matches!(result, Err(ConsoleError::Closed)));
        assert_eq!(
            *source.requested.borrow(),
            vec!["https://www.internships.com/computer-science/austin-tx"]
        );
        assert_eq!(
            *launcher.opened.borrow(),
            vec!["https://www.internships.com/posting/abc123"]
        );
        assert!(console.printed("Engineering Internships in Austin, TX"));
    }

    #[test]
    fn test_failed_search_returns_to_menus() {
        let source = FixtureSource::new(&[]);
        let mut console = ScriptedConsole::new(&["business", "all", "all", "new york", "all"]);
        let launcher = RecordingLauncher::default();

        let result = run_session(&source, &catalog(), &mut console, &launcher);

        assert!(matches!(result, Err(ConsoleError::Closed)));
        assert_eq!(
            *source.requested.borrow(),
            vec![
                "https://www.internships.com/business",
                "https://www.internships.com/new-york",
            ]
        );
        assert_eq!(console.count_printed("Search failed"), 2);
        assert_eq!(console.count_printed("Field Selection"), 3);
    }

    #[test]
    fn test_empty_results_start_a_new_search() {
        let source = FixtureSource::new(&["fixtures/results_empty.html"]);
        let mut console = ScriptedConsole::new(&["accounting", "all", ""]);
        let launcher = RecordingLauncher::default();

        let result = run_session(&source, &catalog(), &mut console, &launcher);

        assert!(matches!(result, Err(ConsoleError::Closed)));
        assert!(console.printed("There are no available internships"));
        assert_eq!(console.count_printed("Field Selection"), 2);
        assert!(launcher.opened.borrow().is_empty());
    }
}
