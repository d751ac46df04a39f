use crate::console::{Console, ConsoleError};
use crate::types::{Catalog, Choice, Directory, Link, Named, Selection, SelectionError, State};
use crate::utils::{OPTIONS_PER_LINE, SEPARATOR, option_lines};

/// Answer meaning "do not restrict this axis".
pub const ALL: &str = "all";

const FIELD_PROMPT: &str =
    "What field would you like to search internships in (type 'all' for any)? ";
const STATE_PROMPT: &str =
    "What state are you looking for internships around (type 'all' for any)? ";
const CITY_PROMPT: &str =
    "Which of these cities are you looking for internships around (type 'all' for any)? ";

enum Answer<'a, T> {
    All,
    Pick(&'a T),
}

fn is_all(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case(ALL)
}

fn restricted(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !is_all(v))
}

fn print_heading(console: &mut dyn Console, heading: &str) {
    console.say("");
    console.say(SEPARATOR);
    console.say(heading);
    console.say(SEPARATOR);
}

fn print_options(console: &mut dyn Console, names: &[String]) {
    console.say("Options:");
    for line in option_lines(names, OPTIONS_PER_LINE) {
        console.say(&line);
    }
    console.say(SEPARATOR);
}

/// Prompts until the answer names an entry of `directory` or is "all".
fn choose<'a, T: Named>(
    console: &mut dyn Console,
    directory: &'a Directory<T>,
    prompt: &str,
    rejection: &str,
) -> Result<Answer<'a, T>, ConsoleError> {
    let mut options = directory.names();
    options.push(ALL.to_string());

    loop {
        let input = console.ask(prompt, &options)?;
        if let Some(entry) = directory.get(&input) {
            return Ok(Answer::Pick(entry));
        }
        if is_all(&input) {
            return Ok(Answer::All);
        }
        console.say(rejection);
    }
}

/// Walks the user through field, state and city menus.
///
/// A pass that leaves both axes unrestricted is rejected and the menus start
/// over from the field, so the returned selection always restricts at least
/// one axis.
pub fn select_field_and_location(
    catalog: &Catalog,
    console: &mut dyn Console,
) -> Result<Selection, ConsoleError> {
    loop {
        let selection = select_once(catalog, console)?;
        if !selection.is_unrestricted() {
            log::debug!("Selected {}", selection);
            return Ok(selection);
        }

        console.say("");
        console.say("Please narrow down your search with either a field or location selection!");
        console.say("Starting over...");
    }
}

fn select_once(catalog: &Catalog, console: &mut dyn Console) -> Result<Selection, ConsoleError> {
    print_heading(console, "Field Selection");
    print_options(console, &catalog.categories.names());

    let field = match choose(
        console,
        &catalog.categories,
        FIELD_PROMPT,
        "Invalid field. Please enter a valid field.",
    )? {
        Answer::Pick(category) => Some(Choice::from(category)),
        Answer::All => None,
    };

    print_heading(console, "State Selection");
    print_options(console, &catalog.locations.names());

    let location = match choose(
        console,
        &catalog.locations,
        STATE_PROMPT,
        "That state is not supported. Please try another state.",
    )? {
        Answer::Pick(state) => Some(select_city(console, state)?),
        Answer::All => None,
    };

    Ok(Selection { field, location })
}

fn select_city(console: &mut dyn Console, state: &State) -> Result<Choice, ConsoleError> {
    if state.cities.is_empty() {
        return Ok(Choice::from(state));
    }

    print_heading(console, "City Selection");
    console.say(&format!(
        "Internships are available around: {}",
        state.cities.names().join(", ")
    ));
    console.say(SEPARATOR);

    Ok(
        match choose(
            console,
            &state.cities,
            CITY_PROMPT,
            "That city is not supported. Please try another city.",
        )? {
            Answer::Pick(city) => city_choice(city, state),
            Answer::All => Choice::from(state),
        },
    )
}

fn city_choice(city: &Link, state: &State) -> Choice {
    Choice {
        label: format!("{}, {}", city.name, state.name),
        url: city.url.clone(),
    }
}

/// Resolves names given up front (e.g. on the command line) with the same
/// matching rules as the interactive menus. `None` or "all" leaves an axis
/// unrestricted.
pub fn resolve_selection(
    catalog: &Catalog,
    field: Option<&str>,
    state: Option<&str>,
    city: Option<&str>,
) -> Result<Selection, SelectionError> {
    let field = restricted(field)
        .map(|name| {
            catalog
                .categories
                .get(name)
                .map(Choice::from)
                .ok_or_else(|| SelectionError::UnknownField(name.to_string()))
        })
        .transpose()?;

    let location = match (restricted(state), restricted(city)) {
        (None, None) => None,
        (None, Some(_)) => return Err(SelectionError::CityWithoutState),
        (Some(state_name), city_name) => {
            let state = catalog
                .locations
                .get(state_name)
                .ok_or_else(|| SelectionError::UnknownState(state_name.to_string()))?;
            match city_name {
                None => Some(Choice::from(state)),
                Some(city_name) => {
                    let city = state.cities.get(city_name).ok_or_else(|| {
                        SelectionError::UnknownCity {
                            state: state.name.clone(),
                            city: city_name.to_string(),
                        }
                    })?;
                    Some(city_choice(city, state))
                }
            }
        }
    };

    let selection = Selection { field, location };
    if selection.is_unrestricted() {
        return Err(SelectionError::InvalidSelection);
    }
    Ok(selection)
}
