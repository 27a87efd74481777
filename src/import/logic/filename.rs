use std::sync::LazyLock;

use regex::Regex;

use crate::model::ParsedFilename;

// Patterns are literals; construction cannot fail.
#[allow(clippy::expect_used)]
static COMP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)[_/]\s*Comp\s+(.+)$").expect("valid comp pattern"));
#[allow(clippy::expect_used)]
static TAKE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)#([0-9]+)$").expect("valid take pattern"));
#[allow(clippy::expect_used)]
static BIP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)_bip$").expect("valid bip pattern"));

/// Split a recording filename into logical track, take number and comp label.
///
/// Rules run against the stem, first match wins:
/// 1. `<base>_ Comp <label>` or `<base>/ Comp <label>`
/// 2. `<base>#<digits>`
/// 3. `<base>_bip`
/// 4. the whole stem
pub fn classify(filename: &str) -> ParsedFilename {
    let stem = filename.rsplit_once('.').map_or(filename, |(stem, _)| stem);

    if let Some(caps) = COMP_PATTERN.captures(stem) {
        let base = caps.get(1).map_or("", |m| m.as_str());
        let label = caps.get(2).map_or("", |m| m.as_str());
        return ParsedFilename {
            track_name: base.trim().to_string(),
            take_number: 0,
            is_comp: true,
            comp_label: format!("Comp {}", label.trim()),
        };
    }

    if let Some(caps) = TAKE_PATTERN.captures(stem) {
        let base = caps.get(1).map_or("", |m| m.as_str());
        // Absurdly long digit runs saturate instead of failing.
        let take = caps
            .get(2)
            .map_or(0, |m| m.as_str().parse::<u32>().unwrap_or(u32::MAX));
        return plain(base, take);
    }

    if let Some(base) = BIP_PATTERN.captures(stem).and_then(|caps| caps.get(1)) {
        return plain(base.as_str(), 0);
    }

    plain(stem, 0)
}

fn plain(track_name: &str, take_number: u32) -> ParsedFilename {
    ParsedFilename {
        track_name: track_name.to_string(),
        take_number,
        is_comp: false,
        comp_label: String::new(),
    }
}
