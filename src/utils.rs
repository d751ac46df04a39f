use crate::types::SelectionError;

pub const SEPARATOR: &str = "-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=";

/// How many option names are printed per line in selection menus.
pub const OPTIONS_PER_LINE: usize = 6;

/// Last path segment of a URL, ignoring trailing slashes.
pub fn path_id(url: &str) -> &str {
    url.trim_matches('/').rsplit('/').next().unwrap_or_default()
}

pub fn compose_search_url(
    base_url: &str,
    field_id: Option<&str>,
    location_id: Option<&str>,
) -> Result<String, SelectionError> {
    let base = base_url.trim_end_matches('/');
    match (field_id, location_id) {
        (Some(field), Some(location)) => Ok(format!("{base}/{field}/{location}")),
        (Some(id), None) | (None, Some(id)) => Ok(format!("{base}/{id}")),
        (None, None) => Err(SelectionError::InvalidSelection),
    }
}

pub fn absolute_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{}{}", base_url.trim_end_matches('/'), href)
    } else {
        format!("{}/{}", base_url.trim_end_matches('/'), href)
    }
}

/// Groups names into comma-separated lines for menu display.
pub fn option_lines(names: &[String], per_line: usize) -> Vec<String> {
    names
        .chunks(per_line.max(1))
        .map(|chunk| chunk.join(", "))
        .collect()
}
