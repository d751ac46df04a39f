use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::types::{Catalog, Directory, Link, Posting, ResultsPage, State};
use crate::utils::absolute_url;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Missing required field: {0}")]
    MissingField(String),
    #[error("Malformed field: {0}")]
    MalformedField(String),
}

const COMPANY_LOCATION_DELIMITER: &str = " | ";

macro_rules! selector {
    ($name:ident, $css:literal) => {
        static $name: LazyLock<Selector> =
            LazyLock::new(|| Selector::parse($css).expect(concat!("invalid selector: ", $css)));
    };
}

selector!(SEL_CATEGORIES, "div#categories");
selector!(SEL_LOCATIONS, "div#locations");
selector!(SEL_UL, "ul");
selector!(SEL_LI, "li");
selector!(SEL_ANCHOR, "a");
selector!(SEL_PAGE_TITLE, "div.col-9.col-md-12.content h1");
selector!(SEL_SALARY, "div.row.salary-wrap div.salary");
selector!(SEL_POSTINGS, "div#postings");
selector!(SEL_POSTING, "a.row.posting");
selector!(SEL_DAYS, "div.days span");
selector!(SEL_TITLE, "div.desc h4");
selector!(SEL_COMPANY_LOCATION, "div.desc h5");
selector!(SEL_DESCRIPTION, "div.desc p.description");
selector!(SEL_PILLS, "div.pills li");

static RE_TITLE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Find\s+\d{4}\s+").expect("invalid regex: title prefix"));

fn elem_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn first_text(element: ElementRef, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|e| normalize_whitespace(&elem_text(e)))
}

/// Name and absolute URL of the first anchor under `element`.
fn anchor_link(element: ElementRef, base_url: &str) -> Option<Link> {
    let anchor = element.select(&SEL_ANCHOR).next()?;
    let href = anchor.value().attr("href")?;
    let name = normalize_whitespace(&elem_text(anchor));
    if name.is_empty() {
        return None;
    }
    Some(Link::new(name, absolute_url(base_url, href)))
}

pub fn parse_catalog(html: &str, base_url: &str) -> Result<Catalog, ParseError> {
    let document = Html::parse_document(html);

    let categories_root = document
        .select(&SEL_CATEGORIES)
        .next()
        .ok_or_else(|| ParseError::MissingField("sitemap categories (div#categories)".into()))?;
    let locations_root = document
        .select(&SEL_LOCATIONS)
        .next()
        .ok_or_else(|| ParseError::MissingField("sitemap locations (div#locations)".into()))?;

    let categories = parse_categories(categories_root, base_url);
    let locations = parse_locations(locations_root, base_url);

    log::debug!(
        "Parsed {} categories and {} states from sitemap",
        categories.len(),
        locations.len()
    );

    Ok(Catalog {
        categories,
        locations,
    })
}

fn parse_categories(root: ElementRef, base_url: &str) -> Directory<Link> {
    let mut categories = Directory::new();

    for group in root.select(&SEL_UL) {
        // The first item of each group is its letter heading.
        for entry in group.select(&SEL_LI).skip(1) {
            match anchor_link(entry, base_url) {
                Some(link) => categories.insert(link),
                None => log::debug!(
                    "Skipping category entry without a link: '{}'",
                    normalize_whitespace(&elem_text(entry))
                ),
            }
        }
    }

    categories
}

fn parse_locations(root: ElementRef, base_url: &str) -> Directory<State> {
    let mut locations = Directory::new();

    for group in root.select(&SEL_UL) {
        let Some(city_list) = group.select(&SEL_UL).next() else {
            continue;
        };

        let Some(state) = group
            .select(&SEL_LI)
            .next()
            .and_then(|item| anchor_link(item, base_url))
        else {
            log::debug!("Skipping location group without a state link");
            continue;
        };

        let cities: Directory<Link> = city_list
            .select(&SEL_LI)
            .filter_map(|item| anchor_link(item, base_url))
            .collect();

        if cities.is_empty() {
            log::debug!("Skipping {}: no cities listed", state.name);
            continue;
        }

        locations.insert(State {
            name: state.name,
            url: state.url,
            cities,
        });
    }

    locations
}

pub fn parse_results_page(html: &str, base_url: &str) -> Result<ResultsPage, ParseError> {
    let document = Html::parse_document(html);

    let heading = document
        .select(&SEL_PAGE_TITLE)
        .next()
        .map(|e| normalize_whitespace(&elem_text(e)))
        .ok_or_else(|| ParseError::MissingField("page title heading".into()))?;
    let title = RE_TITLE_PREFIX.replace(&heading, "").into_owned();

    let average_pay = document
        .select(&SEL_SALARY)
        .next()
        .map(|e| normalize_whitespace(&elem_text(e)))
        .filter(|s| !s.is_empty());

    let container = document
        .select(&SEL_POSTINGS)
        .next()
        .ok_or_else(|| ParseError::MissingField("postings container (div#postings)".into()))?;

    let mut postings = Vec::new();
    for (i, entry) in container.select(&SEL_POSTING).enumerate() {
        match parse_posting(entry, base_url) {
            Ok(posting) => postings.push(posting),
            Err(e) => log::warn!("Skipping posting #{}: {}", i + 1, e),
        }
    }

    Ok(ResultsPage {
        title,
        average_pay,
        postings,
    })
}

pub fn parse_posting(entry: ElementRef, base_url: &str) -> Result<Posting, ParseError> {
    let href = entry
        .value()
        .attr("href")
        .ok_or_else(|| ParseError::MissingField("posting href".into()))?;

    let date_posted = first_text(entry, &SEL_DAYS)
        .ok_or_else(|| ParseError::MissingField("posting date".into()))?;
    let title = first_text(entry, &SEL_TITLE)
        .ok_or_else(|| ParseError::MissingField("posting title".into()))?;
    let company_location = first_text(entry, &SEL_COMPANY_LOCATION)
        .ok_or_else(|| ParseError::MissingField("posting company and location".into()))?;

    let (company, location) = split_company_location(&company_location)?;

    let brief_description = first_text(entry, &SEL_DESCRIPTION).unwrap_or_default();

    let attributes = entry
        .select(&SEL_PILLS)
        .map(|e| normalize_whitespace(&elem_text(e)))
        .filter(|s| !s.is_empty())
        .collect();

    Ok(Posting {
        link: absolute_url(base_url, href),
        date_posted,
        title,
        company,
        location,
        brief_description,
        attributes,
    })
}

fn split_company_location(text: &str) -> Result<(String, String), ParseError> {
    let parts: Vec<&str> = text.split(COMPANY_LOCATION_DELIMITER).collect();
    match parts.as_slice() {
        [company, location] => Ok((company.trim().to_string(), location.trim().to_string())),
        _ => Err(ParseError::MalformedField(format!(
            "expected 'Company{}Location', got '{}'",
            COMPANY_LOCATION_DELIMITER, text
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const BASE: &str = "https://www.internships.com";

    #[test]
    fn test_parse_catalog_from_fixture() {
        let html = fs::read_to_string("fixtures/sitemap.html").expect("Failed to read fixture");

        let catalog = parse_catalog(&html, BASE).expect("Failed to parse sitemap");

        assert_eq!(
            catalog.categories.names(),
            vec!["Accounting", "Advertising", "Business", "Computer Science"]
        );
        assert_eq!(
            catalog.categories.get("computer science").unwrap().url,
            "https://www.internships.com/computer-science"
        );

        // Alaska has no city list, Nowhere has no state anchor and Empty has
        // only anchor-less cities.
        assert_eq!(catalog.locations.names(), vec!["New York", "Texas"]);

        let texas = catalog.locations.get("TEXAS").expect("Texas should be listed");
        assert_eq!(texas.url, "https://www.internships.com/texas");
        assert_eq!(texas.cities.names(), vec!["Austin", "Dallas", "Houston"]);
        assert_eq!(
            texas.cities.get("austin").unwrap().url,
            "https://www.internships.com/austin-tx"
        );
    }

    #[test]
    fn test_parse_catalog_missing_categories() {
        let html = r#"<div id="locations"><ul></ul></div>"#;

        let err = parse_catalog(html, BASE).expect_err("should fail without categories");
        assert!(matches!(err, ParseError::MissingField(_)));
    }

    #[test]
    fn test_parse_catalog_missing_locations() {
        let html = r#"<div id="categories"><ul><li>A</li></ul></div>"#;

        let err = parse_catalog(html, BASE).expect_err("should fail without locations");
        assert!(matches!(err, ParseError::MissingField(_)));
    }

    #[test]
    fn test_parse_results_page_from_fixture() {
        let html = fs::read_to_string("fixtures/results.html").expect("Failed to read fixture");

        let page = parse_results_page(&html, BASE).expect("Failed to parse results page");

        assert_eq!(page.title, "Engineering Internships in Austin, TX");
        assert_eq!(page.average_pay.as_deref(), Some("$18.50"));
        // The third entry lacks the company/location delimiter.
        assert_eq!(page.postings.len(), 2);

        let first = &page.postings[0];
        assert_eq!(first.link, "https://www.internships.com/posting/abc123");
        assert_eq!(first.date_posted, "2d");
        assert_eq!(first.title, "Mechanical Engineering Intern");
        assert_eq!(first.company, "Acme Robotics");
        assert_eq!(first.location, "Austin, TX");
        assert_eq!(first.brief_description, "Help build robots.");
        assert_eq!(first.attributes, vec!["Paid", "Part Time", "Remote"]);

        let second = &page.postings[1];
        assert_eq!(second.title, "Civil Intern");
        assert_eq!(second.brief_description, "");
        assert!(second.attributes.is_empty());
    }

    #[test]
    fn test_parse_results_page_empty() {
        let html = fs::read_to_string("fixtures/results_empty.html").expect("Failed to read fixture");

        let page = parse_results_page(&html, BASE).expect("Failed to parse results page");

        assert_eq!(page.title, "Law Internships in Alaska");
        assert!(page.average_pay.is_none());
        assert!(page.postings.is_empty());
    }

    #[test]
    fn test_parse_results_page_missing_container() {
        let html = r#"
            <div class="col-9 col-md-12 content"><h1>Find 2022 Law Internships</h1></div>
        "#;

        let err = parse_results_page(html, BASE).expect_err("should fail without postings");
        assert!(matches!(err, ParseError::MissingField(_)));
    }

    #[test]
    fn test_parse_results_page_missing_title() {
        let html = r#"<div id="postings"></div>"#;

        let err = parse_results_page(html, BASE).expect_err("should fail without a title");
        assert!(matches!(err, ParseError::MissingField(_)));
    }

    #[test]
    fn test_title_without_year_prefix_is_kept() {
        let html = r#"
            <div class="col-9 col-md-12 content"><h1>  Law Internships </h1></div>
            <div id="postings"></div>
        "#;

        let page = parse_results_page(html, BASE).expect("Failed to parse");
        assert_eq!(page.title, "Law Internships");
    }

    #[test]
    fn test_split_company_location() {
        assert_eq!(
            split_company_location("Acme | Austin, TX").unwrap(),
            ("Acme".to_string(), "Austin, TX".to_string())
        );
        assert!(matches!(
            split_company_location("Acme - Austin, TX"),
            Err(ParseError::MalformedField(_))
        ));
        assert!(matches!(
            split_company_location("Acme | Austin | TX"),
            Err(ParseError::MalformedField(_))
        ));
    }
}
