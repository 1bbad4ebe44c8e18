//! Year filter expansion.
//!
//! A raw year filter is a comma-separated list where each segment is a
//! literal year, an inclusive `start-end` range, or the literal `LATEST`
//! (case-insensitive), which resolves to the single most recent year any
//! observation exists for. Non-numeric segments are ignored.

/// Expands a raw year filter into the concrete set of years it names.
///
/// `available_years` is the distinct-years list of the underlying data set,
/// consulted only to resolve `LATEST`. Duplicates are collapsed, first
/// occurrence wins.
pub fn expand_year_filter(raw: &str, available_years: &[String]) -> Vec<String> {
    let mut years: Vec<String> = Vec::new();

    for segment in raw.split(',') {
        let segment = segment.trim();

        if segment.eq_ignore_ascii_case("LATEST") {
            if let Some(latest) = latest_year(available_years) {
                push_unique(&mut years, latest);
            }
            continue;
        }

        let interval: Vec<&str> = segment.split('-').collect();
        match interval.as_slice() {
            [single] if is_year(single) => push_unique(&mut years, (*single).to_string()),
            [start, end] if is_year(start) && is_year(end) => {
                if let (Ok(start), Ok(end)) = (start.parse::<i32>(), end.parse::<i32>()) {
                    for year in start..=end {
                        push_unique(&mut years, year.to_string());
                    }
                }
            }
            _ => {}
        }
    }

    years
}

/// The most recent year in the list, by numeric value.
pub fn latest_year(available_years: &[String]) -> Option<String> {
    available_years
        .iter()
        .filter_map(|year| year.parse::<i32>().ok().map(|n| (n, year)))
        .max_by_key(|(n, _)| *n)
        .map(|(_, year)| year.clone())
}

fn is_year(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

fn push_unique(years: &mut Vec<String>, year: String) {
    if !years.contains(&year) {
        years.push(year);
    }
}
