//! Reference set of known top-level domains.
//!
//! The list drives two things: TLD substitution in the query builder, where
//! the tail of a base name is reinterpreted as a TLD, and validation of the
//! TLDs a user types in. Entries are lowercase and sorted.

use crate::error::DomainrError;
use std::collections::HashSet;

const KNOWN_TLDS: &[&str] = &[
    "ac", "academy", "accountant", "accountants", "actor", "ad", "ae", "aero", "af", "ag",
    "agency", "ai", "airforce", "al", "am", "ao", "apartments", "app", "aq", "ar", "archi",
    "army", "art", "as", "asia", "associates", "at", "attorney", "au", "auction", "audio",
    "auto", "autos", "aw", "ax", "az", "ba", "baby", "band", "bank", "bar", "bargains",
    "bb", "bd", "be", "beer", "best", "bet", "bf", "bg", "bh", "bi", "bid", "bike", "bingo",
    "bio", "biz", "bj", "black", "blog", "blue", "bm", "bn", "bo", "boats", "bond", "boo",
    "book", "boston", "boutique", "br", "bs", "bt", "build", "builders", "business", "buy",
    "buzz", "bw", "by", "bz", "ca", "cab", "cafe", "cam", "camera", "camp", "capital",
    "car", "cards", "care", "career", "careers", "cars", "casa", "cash", "casino", "cat",
    "catering", "cc", "cd", "center", "ceo", "cf", "cg", "ch", "chat", "cheap", "church",
    "ci", "city", "ck", "cl", "claims", "cleaning", "click", "clinic", "clothing", "cloud",
    "club", "cm", "cn", "co", "coach", "codes", "coffee", "college", "com", "community",
    "company", "computer", "condos", "construction", "consulting", "contractors", "cooking",
    "cool", "coop", "country", "coupons", "courses", "cr", "credit", "creditcard",
    "cricket", "cruises", "cu", "cv", "cw", "cx", "cy", "cymru", "cz", "dance", "date",
    "dating", "de", "deals", "degree", "delivery", "democrat", "dental", "dentist",
    "design", "dev", "diamonds", "diet", "digital", "direct", "directory", "discount", "dj",
    "dk", "dm", "do", "doctor", "dog", "domains", "download", "dz", "earth", "ec", "eco",
    "education", "ee", "eg", "email", "energy", "engineer", "engineering", "enterprises",
    "equipment", "es", "estate", "et", "eu", "events", "exchange", "expert", "exposed",
    "express", "fail", "faith", "family", "fan", "fans", "farm", "fashion", "fi", "film",
    "finance", "financial", "fish", "fishing", "fit", "fitness", "fj", "fk", "flights",
    "florist", "flowers", "fm", "fo", "football", "forsale", "foundation", "fr", "fun",
    "fund", "furniture", "futbol", "fyi", "ga", "gallery", "game", "games", "garden", "gd",
    "ge", "gf", "gg", "gh", "gi", "gift", "gifts", "gives", "gl", "glass", "global", "gm",
    "gmbh", "gn", "gold", "golf", "gov", "gp", "gq", "gr", "graphics", "gratis", "green",
    "gripe", "group", "gs", "gt", "gu", "guide", "guitars", "guru", "gw", "gy", "hair",
    "haus", "health", "healthcare", "help", "hiphop", "hiv", "hk", "hm", "hn", "hockey",
    "holdings", "holiday", "homes", "horse", "hospital", "host", "hosting", "house", "how",
    "hr", "ht", "hu", "icu", "id", "ie", "il", "im", "immo", "immobilien", "in", "inc",
    "industries", "info", "ink", "institute", "insure", "int", "international",
    "investments", "io", "iq", "ir", "irish", "is", "it", "je", "jetzt", "jewelry", "jm",
    "jo", "jobs", "jp", "juegos", "kaufen", "ke", "kg", "kh", "ki", "kim", "kitchen",
    "kiwi", "km", "kn", "kp", "kr", "kw", "ky", "kz", "la", "land", "law", "lawyer", "lb",
    "lc", "lease", "legal", "lgbt", "li", "life", "lighting", "limited", "limo", "link",
    "live", "lk", "llc", "loan", "loans", "lol", "london", "love", "lr", "ls", "lt", "ltd",
    "lu", "luxury", "lv", "ly", "ma", "maison", "management", "market", "marketing", "mba",
    "mc", "md", "me", "media", "memorial", "men", "menu", "mg", "mh", "miami", "mil", "mk",
    "ml", "mm", "mn", "mo", "mobi", "moda", "moe", "mom", "money", "monster", "mortgage",
    "motorcycles", "mov", "movie", "mp", "mq", "mr", "ms", "mt", "mu", "museum", "music",
    "mv", "mw", "mx", "my", "mz", "na", "name", "navy", "nc", "ne", "net", "network",
    "news", "nf", "ng", "ngo", "ni", "ninja", "nl", "no", "np", "nr", "nu", "nyc", "nz",
    "om", "one", "onl", "online", "ooo", "org", "organic", "pa", "page", "partners",
    "parts", "party", "pe", "pet", "pf", "pg", "ph", "photo", "photography", "photos",
    "pics", "pictures", "pink", "pizza", "pk", "pl", "place", "plumbing", "plus", "pm",
    "pn", "poker", "porn", "pr", "press", "pro", "productions", "promo", "properties",
    "property", "ps", "pt", "pub", "pw", "py", "qa", "quest", "racing", "radio", "re",
    "realestate", "realty", "recipes", "red", "rehab", "reise", "reisen", "rent", "rentals",
    "repair", "report", "republican", "rest", "restaurant", "review", "reviews", "rich",
    "rip", "ro", "rocks", "rodeo", "rs", "ru", "run", "rw", "sa", "sale", "salon", "sarl",
    "sb", "sc", "school", "schule", "science", "sd", "se", "security", "services", "sexy",
    "sg", "sh", "shiksha", "shoes", "shop", "shopping", "show", "si", "singles", "site",
    "sk", "ski", "sl", "sm", "sn", "so", "soccer", "social", "software", "solar",
    "solutions", "space", "sr", "ss", "st", "storage", "store", "stream", "studio", "study",
    "style", "su", "sucks", "supplies", "supply", "support", "surf", "surgery", "sv", "sx",
    "sy", "systems", "sz", "tattoo", "tax", "taxi", "tc", "td", "team", "tech",
    "technology", "tel", "tennis", "tf", "tg", "th", "theater", "tickets", "tienda", "tips",
    "tires", "tj", "tk", "tl", "tm", "tn", "to", "today", "tools", "top", "tours", "town",
    "toys", "tr", "trade", "trading", "training", "travel", "tt", "tube", "tv", "tw", "tz",
    "ua", "ug", "uk", "university", "uno", "us", "uy", "uz", "va", "vacations", "vc", "ve",
    "vegas", "ventures", "vet", "vg", "vi", "video", "villas", "vin", "vip", "vision", "vn",
    "vodka", "vote", "voting", "voyage", "vu", "wales", "watch", "webcam", "website",
    "wedding", "wf", "wiki", "win", "wine", "work", "works", "world", "ws", "wtf", "xxx",
    "xyz", "yachts", "ye", "yoga", "yt", "za", "zm", "zone", "zw",
];

lazy_static::lazy_static! {
    static ref KNOWN_TLD_SET: HashSet<&'static str> = KNOWN_TLDS.iter().copied().collect();
}

/// All reference TLDs, lowercase and in a stable order.
pub fn known_tlds() -> &'static [&'static str] {
    KNOWN_TLDS
}

/// Whether `tld` is in the reference set (case-insensitive).
pub fn is_known_tld(tld: &str) -> bool {
    KNOWN_TLD_SET.contains(tld.to_ascii_lowercase().as_str())
}

/// Check that every user-supplied TLD is a known one.
///
/// Fails on the first unknown entry. A leading dot is not accepted; TLDs are
/// entered bare (`com`, not `.com`).
pub fn validate_tlds<S: AsRef<str>>(tlds: &[S]) -> Result<(), DomainrError> {
    for tld in tlds {
        let tld = tld.as_ref();
        if !is_known_tld(tld) {
            return Err(DomainrError::validation(format!("Invalid TLD: {}", tld)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_list_is_sorted_lowercase_and_unique() {
        assert!(KNOWN_TLDS.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(KNOWN_TLDS
            .iter()
            .all(|tld| tld.chars().all(|c| c.is_ascii_lowercase())));
    }

    #[test]
    fn test_is_known_tld_case_insensitive() {
        assert!(is_known_tld("com"));
        assert!(is_known_tld("YACHTS"));
        assert!(is_known_tld("Io"));
        assert!(!is_known_tld("notatld"));
        assert!(!is_known_tld(""));
    }

    #[test]
    fn test_validate_tlds() {
        assert!(validate_tlds(&["com", "io", "dev"]).is_ok());
        assert!(validate_tlds::<&str>(&[]).is_ok());

        let err = validate_tlds(&["com", ".net", "org"]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid TLD: .net");

        let err = validate_tlds(&["comm"]).unwrap_err();
        assert!(matches!(err, DomainrError::Validation { .. }));
    }
}
