use crate::console::{Console, ConsoleError};
use crate::types::{Posting, ResultsPage};
use crate::utils::SEPARATOR;

const COLUMN_GAP: &str = "  ";

/// Opens a posting's link somewhere the user can read it. Anything shown to
/// the user goes through `console`.
pub trait Launcher {
    fn open(&self, url: &str, console: &mut dyn Console);
}

/// Hands links to the system's default browser without waiting on it.
pub struct BrowserLauncher;

impl Launcher for BrowserLauncher {
    fn open(&self, url: &str, console: &mut dyn Console) {
        console.say("Opening internship link in your browser...");
        console.say("");
        log::info!("Opening {} in the default browser", url);
        if let Err(e) = webbrowser::open(url) {
            log::warn!("Failed to open {}: {}", url, e);
        }
    }
}

/// Prints links instead of launching a browser, for headless sessions.
pub struct PrintLauncher;

impl Launcher for PrintLauncher {
    fn open(&self, url: &str, console: &mut dyn Console) {
        console.say(&format!("Internship link: {url}"));
        console.say("");
    }
}

/// One line per posting: `[index]`, title, company and location, each column
/// padded to its widest cell.
pub fn render_table(postings: &[Posting]) -> Vec<String> {
    let rows: Vec<[String; 4]> = postings
        .iter()
        .enumerate()
        .map(|(i, p)| {
            [
                format!("[{}]", i + 1),
                p.title.clone(),
                p.company.clone(),
                p.location.clone(),
            ]
        })
        .collect();

    let mut widths = [0usize; 4];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    rows.iter()
        .map(|row| {
            row.iter()
                .zip(widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join(COLUMN_GAP)
        })
        .collect()
}

fn parse_index(input: &str, count: usize) -> Option<usize> {
    if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    input
        .parse::<usize>()
        .ok()
        .filter(|i| (1..=count).contains(i))
}

/// Shows a results page and opens postings by index until the user asks for a
/// new search with `X`.
pub fn present_and_select(
    page: &ResultsPage,
    console: &mut dyn Console,
    launcher: &dyn Launcher,
) -> Result<(), ConsoleError> {
    console.say("");
    console.say(SEPARATOR);
    console.say(&page.title);
    console.say(SEPARATOR);

    if page.postings.is_empty() {
        console.say("There are no available internships which match your criteria.");
        console.ask(
            "Press ENTER to update your field/location selection and search again.",
            &[],
        )?;
        return Ok(());
    }

    let count = page.postings.len();
    console.say(&format!("Selected {} most recent postings.", count));
    console.say(&format!(
        "Average Hourly Pay: {}",
        page.average_pay.as_deref().unwrap_or("N/A")
    ));
    console.say("");
    console.say(SEPARATOR);
    for line in render_table(&page.postings) {
        console.say(&line);
    }
    console.say(SEPARATOR);

    let options = vec!["X".to_string()];
    let mut prompt = format!(
        "Please select an internship by its ID to learn more (1-{}): ",
        count
    );

    loop {
        let input = console.ask(&prompt, &options)?;
        let input = input.trim();

        if input.eq_ignore_ascii_case("x") {
            return Ok(());
        }

        match parse_index(input, count) {
            Some(index) => {
                let posting = &page.postings[index - 1];
                launcher.open(&posting.link, console);
                prompt = format!(
                    "Please select another internship by its ID to learn more (1-{}), or type 'X' to update your field/location selection and search again: ",
                    count
                );
            }
            None => console.say(&format!(
                "Invalid selection. Please enter a number from 1-{} or type 'X' to search again.",
                count
            )),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;

    use super::Launcher;
    use crate::console::Console;

    #[derive(Debug, Default)]
    pub(crate) struct RecordingLauncher {
        pub(crate) opened: RefCell<Vec<String>>,
    }

    impl Launcher for RecordingLauncher {
        fn open(&self, url: &str, _console: &mut dyn Console) {
            self.opened.borrow_mut().push(url.to_string());
        }
    }
}
