//! Candidate domain construction.
//!
//! Turns word parts and TLDs into the ordered list of domains a search will
//! check. Composition is plain string concatenation; nothing here validates
//! the result as a hostname.
//!
//! # Examples
//!
//! ```
//! use domainr_lib::build_query;
//!
//! let first = vec!["super".to_string()];
//! let tlds = vec!["com".to_string(), "io".to_string()];
//! assert_eq!(build_query(&first, &[], &tlds, false), vec!["super.com", "super.io"]);
//! ```

use crate::tlds::known_tlds;
use crate::types::SearchRequest;

/// Build candidate domains from word parts and TLDs.
///
/// 1. Base names are every `first + second` pair, first part outermost. With
///    no second parts the first parts are used verbatim.
/// 2. Each base name is joined with each TLD (`base.tld`), base outermost.
/// 3. With `tld_substitution`, each base name whose ending matches a known
///    TLD (case-insensitive) also yields `head.tld`, one candidate per match,
///    using the reference TLD's spelling. These follow all primary candidates.
///
/// No de-duplication happens here; callers clean their input lists first.
pub fn build_query(
    first_parts: &[String],
    second_parts: &[String],
    tlds: &[String],
    tld_substitution: bool,
) -> Vec<String> {
    let base_domains = base_domains(first_parts, second_parts);

    let mut domains: Vec<String> = base_domains
        .iter()
        .flat_map(|base| tlds.iter().map(move |tld| format!("{}.{}", base, tld)))
        .collect();

    if tld_substitution {
        domains.extend(base_domains.iter().flat_map(|base| substitute_tlds(base)));
    }

    domains
}

/// Build candidates for a whole request.
pub fn build_request(request: &SearchRequest) -> Vec<String> {
    build_query(
        &request.first_parts,
        &request.second_parts,
        &request.tlds,
        request.tld_substitution,
    )
}

fn base_domains(first_parts: &[String], second_parts: &[String]) -> Vec<String> {
    if second_parts.is_empty() {
        return first_parts.to_vec();
    }

    first_parts
        .iter()
        .flat_map(|first| {
            second_parts
                .iter()
                .map(move |second| format!("{}{}", first, second))
        })
        .collect()
}

/// Reinterpret the end of `base` as a TLD, once per matching reference TLD.
///
/// `superyachts` becomes `super.yachts`. A base that is nothing but a TLD
/// has no head left and produces nothing.
fn substitute_tlds(base: &str) -> Vec<String> {
    known_tlds()
        .iter()
        .filter_map(|tld| {
            let cut = base.len().checked_sub(tld.len())?;
            if cut == 0 || !base.is_char_boundary(cut) {
                return None;
            }
            let (head, tail) = base.split_at(cut);
            tail.eq_ignore_ascii_case(tld)
                .then(|| format!("{}.{}", head, tld))
        })
        .collect()
}

/// Split a whitespace-separated line into unique parts, keeping first-seen order.
///
/// ```
/// use domainr_lib::parse_parts;
///
/// assert_eq!(parse_parts("get  my get app"), vec!["get", "my", "app"]);
/// ```
pub fn parse_parts(line: &str) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for part in line.split_whitespace() {
        if !unique.iter().any(|seen| seen == part) {
            unique.push(part.to_string());
        }
    }
    unique
}
