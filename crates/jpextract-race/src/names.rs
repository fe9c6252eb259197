//! Defendant name normalisation.
//!
//! Defendant fields are free text written by filing clerks: several parties,
//! aliases and boilerplate such as "and all other occupants". The race model
//! wants a single person's first and last name, so the field is first cut
//! down to the first listed individual and then split into name parts.

use std::sync::LazyLock;

use regex::Regex;

/// Which side of a match survives.
#[derive(Clone, Copy)]
enum Keep {
    Before,
    After,
}

/// Stripping rules, applied in order. Each rule cuts at its first match, if
/// any, and the remainder is trimmed before the next rule runs.
static RULES: LazyLock<Vec<(Regex, Keep)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(r"(?i)(all )?(of )?(the )?(other )?occupants").unwrap(),
            Keep::Before,
        ),
        (
            Regex::new(r"(?i) (and\b|&|\bet ?all?$)").unwrap(),
            Keep::Before,
        ),
        (
            Regex::new(r"(?i) (a/k/a|aka|fka|d/b/a|dba) ").unwrap(),
            Keep::Before,
        ),
        (Regex::new(r"(?i)^mr\.? or mrs\.? ").unwrap(), Keep::After),
        (Regex::new(r"(?i) or ").unwrap(), Keep::After),
        (Regex::new(r"(?i) (serving|served) ").unwrap(), Keep::After),
    ]
});

const TITLES: &[&str] = &["mr", "mrs", "ms", "miss", "dr"];
const SUFFIXES: &[&str] = &["jr", "sr", "ii", "iii", "iv", "v"];
/// Lowercase words that join the following token into a compound surname.
const PARTICLES: &[&str] = &[
    "abu", "bin", "da", "dal", "de", "del", "della", "der", "di", "dos", "du", "ibn", "la", "le",
    "san", "st", "van", "von",
];

/// Cut a defendant field down to the first listed individual.
pub fn strip_defendant_name(name: &str) -> String {
    let mut name = name.trim().to_string();
    for (re, keep) in RULES.iter() {
        if let Some(m) = re.find(&name) {
            name = match keep {
                Keep::Before => name[..m.start()].trim().to_string(),
                Keep::After => name[m.end()..].trim().to_string(),
            };
        }
    }
    name
}

/// Isolate the first listed defendant and parse it into name parts.
pub fn extract_first_defendant_name(name: &str) -> ParsedName {
    ParsedName::parse(&strip_defendant_name(name))
}

/// A personal name split into parts. Absent parts are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedName {
    pub title: String,
    pub first: String,
    pub middle: String,
    pub last: String,
    pub suffix: String,
}

impl ParsedName {
    /// Parse `First Middle Last` or `Last, First Middle`, setting aside
    /// leading titles and trailing suffixes. A lone token is a first name.
    /// Particles such as `De La` stay with the surname that follows them.
    pub fn parse(name: &str) -> Self {
        let mut parsed = Self::default();
        let mut suffixes: Vec<&str> = Vec::new();

        let pieces: Vec<&str> = name
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        // "Smith, John Jr" and "John Smith, Jr" both put the family name
        // somewhere other than the end of the token list.
        let (mut tokens, comma_last) = match pieces.as_slice() {
            [] => return parsed,
            [whole] => (whole.split_whitespace().collect::<Vec<_>>(), None),
            [head, rest @ ..] if rest.iter().all(|p| is_suffix(p)) => {
                suffixes.extend(rest.iter().copied());
                (head.split_whitespace().collect(), None)
            }
            [last, given, rest @ ..] => {
                suffixes.extend(rest.iter().copied());
                (given.split_whitespace().collect(), Some(*last))
            }
        };

        let mut titles = Vec::new();
        while tokens.len() > 1 && is_title(tokens[0]) {
            titles.push(tokens.remove(0));
        }
        let mut trailing = Vec::new();
        while tokens.len() > 1 && tokens.last().is_some_and(|t| is_suffix(t)) {
            trailing.extend(tokens.pop());
        }
        trailing.reverse();
        trailing.append(&mut suffixes);

        parsed.title = titles.join(" ");
        parsed.suffix = trailing.join(" ");
        match comma_last {
            Some(last) => {
                parsed.last = last.to_string();
                if let Some((first, middle)) = tokens.split_first() {
                    parsed.first = first.to_string();
                    parsed.middle = middle.join(" ");
                }
            }
            None => match tokens.as_slice() {
                [] => {}
                [only] => parsed.first = only.to_string(),
                [first, rest @ ..] => {
                    // Particles directly before the final token belong to the surname.
                    let mut split = rest.len() - 1;
                    while split > 0 && is_particle(rest[split - 1]) {
                        split -= 1;
                    }
                    parsed.first = first.to_string();
                    parsed.middle = rest[..split].join(" ");
                    parsed.last = rest[split..].join(" ");
                }
            },
        }
        parsed
    }
}

fn normalized(token: &str) -> String {
    token.trim_end_matches('.').to_ascii_lowercase()
}

fn is_title(token: &str) -> bool {
    TITLES.contains(&normalized(token).as_str())
}

fn is_suffix(token: &str) -> bool {
    SUFFIXES.contains(&normalized(token).as_str())
}

fn is_particle(token: &str) -> bool {
    PARTICLES.contains(&normalized(token).as_str())
}
