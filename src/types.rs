use std::collections::HashMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize, Serializer};

use crate::utils::{compose_search_url, path_id};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Select a field or a location; searching everything at once is not supported")]
    InvalidSelection,
    #[error("Unknown field '{0}'")]
    UnknownField(String),
    #[error("Unknown state '{0}'")]
    UnknownState(String),
    #[error("Unknown city '{city}' in {state}")]
    UnknownCity { state: String, city: String },
    #[error("A city can only be chosen together with its state")]
    CityWithoutState,
}

/// Anything that can be listed in a [`Directory`] under a display name.
pub trait Named {
    fn name(&self) -> &str;
}

/// A named page on the site, e.g. a field of study or a city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub name: String,
    pub url: String,
}

impl Link {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

impl Named for Link {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct State {
    pub name: String,
    pub url: String,
    pub cities: Directory<Link>,
}

impl Named for State {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Insertion-ordered entries with a case-insensitive name index.
///
/// Names keep the casing they were scraped with so they can be shown back to
/// the user, while [`Directory::get`] matches any casing. Inserting a name
/// that is already present (ignoring case) replaces the earlier entry in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory<T> {
    entries: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for Directory<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Named> Directory<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: T) {
        let key = entry.name().to_lowercase();
        match self.index.get(&key) {
            Some(&i) => self.entries[i] = entry,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.index
            .get(&name.trim().to_lowercase())
            .map(|&i| &self.entries[i])
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name().to_string()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Named> FromIterator<T> for Directory<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut directory = Directory::new();
        for entry in iter {
            directory.insert(entry);
        }
        directory
    }
}

impl<T: Serialize> Serialize for Directory<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.entries)
    }
}

/// Fields and locations scraped once from the sitemap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Catalog {
    pub categories: Directory<Link>,
    pub locations: Directory<State>,
}

impl Display for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Fields ({}):", self.categories.len())?;
        for category in self.categories.iter() {
            writeln!(f, "  {:<40} {}", category.name, category.url)?;
        }
        writeln!(f, "\nLocations ({}):", self.locations.len())?;
        for state in self.locations.iter() {
            writeln!(f, "  {:<40} {}", state.name, state.url)?;
            for city in state.cities.iter() {
                writeln!(f, "    {:<38} {}", city.name, city.url)?;
            }
        }
        Ok(())
    }
}

/// One resolved search axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    pub url: String,
}

impl From<&Link> for Choice {
    fn from(link: &Link) -> Self {
        Self {
            label: link.name.clone(),
            url: link.url.clone(),
        }
    }
}

impl From<&State> for Choice {
    fn from(state: &State) -> Self {
        Self {
            label: state.name.clone(),
            url: state.url.clone(),
        }
    }
}

/// The field and location to search. `None` on an axis means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub field: Option<Choice>,
    pub location: Option<Choice>,
}

impl Selection {
    pub fn is_unrestricted(&self) -> bool {
        self.field.is_none() && self.location.is_none()
    }

    pub fn field_id(&self) -> Option<&str> {
        self.field.as_ref().map(|c| path_id(&c.url))
    }

    pub fn location_id(&self) -> Option<&str> {
        self.location.as_ref().map(|c| path_id(&c.url))
    }

    pub fn search_url(&self, base_url: &str) -> Result<String, SelectionError> {
        compose_search_url(base_url, self.field_id(), self.location_id())
    }
}

impl Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = |choice: &Option<Choice>| {
            choice
                .as_ref()
                .map_or_else(|| "All".to_string(), |c| c.label.clone())
        };
        write!(
            f,
            "Field: {} | Location: {}",
            label(&self.field),
            label(&self.location)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub link: String,
    pub date_posted: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub brief_description: String,
    pub attributes: Vec<String>,
}

impl Display for Posting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} | {} | {} ({})",
            self.title, self.company, self.location, self.date_posted
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsPage {
    pub title: String,
    pub average_pay: Option<String>,
    pub postings: Vec<Posting>,
}
