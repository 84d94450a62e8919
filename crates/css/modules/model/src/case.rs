//! Property name case conversion.
//!
//! Models are usually written with camelCase property names
//! (`backgroundColor`, `WebkitTransition`). The text writer needs the
//! hyphenated form that CSS expects (`background-color`,
//! `-webkit-transition`).

/// Vendor prefixes recognized at the start of a camelCase property name.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum VendorPrefix {
    Webkit,
    Moz,
    Ms,
}

impl VendorPrefix {
    /// Every recognized prefix, in detection order.
    pub const ALL: [Self; 3] = [Self::Webkit, Self::Moz, Self::Ms];

    /// The prefix token as it appears in a camelCase property name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Webkit => "Webkit",
            Self::Moz => "Moz",
            Self::Ms => "ms",
        }
    }

    /// Build the prefixed camelCase name for an unprefixed camelCase property.
    ///
    /// `Webkit` + `transform` gives `WebkitTransform`.
    pub fn apply(self, property: &str) -> String {
        let mut out = String::with_capacity(property.len() + 6);
        out.push_str(self.as_str());
        let mut characters = property.chars();
        if let Some(first) = characters.next() {
            out.push(first.to_ascii_uppercase());
            out.push_str(characters.as_str());
        }
        out
    }

    /// Detect the prefix of a camelCase property name.
    ///
    /// The token must be followed by an uppercase letter, so `msFlex` is
    /// prefixed while `mask` or `Mozart` style names are not.
    pub fn detect(property: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|prefix| {
            property
                .strip_prefix(prefix.as_str())
                .and_then(|rest| rest.chars().next())
                .is_some_and(|next| next.is_ascii_uppercase())
        })
    }
}

/// Checks if a camelCase property name starts with a vendor prefix.
pub fn is_prefixed_property(property: &str) -> bool {
    VendorPrefix::detect(property).is_some()
}

/// Transform a property name into hyphenated param case.
///
/// - `backgroundColor` becomes `background-color`;
/// - vendor-prefixed names get a leading hyphen (`msFlex` becomes `-ms-flex`);
/// - custom properties (`--mainColor`) are returned untouched;
/// - names that are already hyphenated keep their shape, including a leading
///   hyphen (`-webkit-box`).
pub fn to_param_case(property: &str) -> String {
    if property.starts_with("--") {
        return property.to_owned();
    }

    let characters: Vec<char> = property.chars().collect();
    let mut out = String::with_capacity(property.len() + 4);
    if is_prefixed_property(property) || property.starts_with('-') {
        out.push('-');
    }

    let mut wrote_word = false;
    let mut pending_separator = false;
    for (index, &character) in characters.iter().enumerate() {
        if !character.is_alphanumeric() {
            pending_separator = true;
            continue;
        }
        if character.is_uppercase() && starts_new_word(&characters, index) {
            pending_separator = true;
        }
        if pending_separator && wrote_word {
            out.push('-');
        }
        pending_separator = false;
        out.extend(character.to_lowercase());
        wrote_word = true;
    }
    out
}

/// An uppercase letter starts a word after a lowercase letter or digit
/// (`fontSize`), or when it ends an acronym (`XMLHttp` splits before `Http`).
fn starts_new_word(characters: &[char], index: usize) -> bool {
    let Some(previous) = index.checked_sub(1).and_then(|prev| characters.get(prev)) else {
        return false;
    };
    if previous.is_lowercase() || previous.is_numeric() {
        return true;
    }
    previous.is_uppercase()
        && characters
            .get(index + 1)
            .is_some_and(|next| next.is_lowercase())
}

/// Transform a hyphenated property name into camelCase.
///
/// `box-shadow` becomes `boxShadow`; `-webkit-transform` becomes
/// `WebkitTransform` and `-ms-flex` becomes `msFlex` so the result round-trips
/// through [`to_param_case`]. Custom properties are returned untouched.
pub fn to_camel_case(property: &str) -> String {
    if property.starts_with("--") || !property.contains('-') {
        return property.to_owned();
    }

    let (prefix, rest) = match property.strip_prefix('-') {
        Some(unprefixed) => {
            let (token, tail) = unprefixed.split_once('-').unwrap_or((unprefixed, ""));
            let vendor = VendorPrefix::ALL
                .into_iter()
                .find(|prefix| prefix.as_str().eq_ignore_ascii_case(token));
            match vendor {
                Some(vendor) => (Some(vendor), tail),
                None => (None, unprefixed),
            }
        }
        None => (None, property),
    };

    let mut out = String::with_capacity(property.len());
    if let Some(vendor) = prefix {
        out.push_str(vendor.as_str());
    }
    for segment in rest.split('-').filter(|segment| !segment.is_empty()) {
        let mut characters = segment.chars();
        let Some(first) = characters.next() else {
            continue;
        };
        if out.is_empty() {
            out.push(first);
        } else {
            out.extend(first.to_uppercase());
        }
        out.push_str(characters.as_str());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_becomes_param_case() {
        assert_eq!(to_param_case("color"), "color");
        assert_eq!(to_param_case("backgroundColor"), "background-color");
        assert_eq!(to_param_case("borderTopLeftRadius"), "border-top-left-radius");
        assert_eq!(to_param_case("zIndex"), "z-index");
    }

    #[test]
    fn vendor_prefixed_names_get_a_leading_hyphen() {
        assert_eq!(to_param_case("WebkitTransition"), "-webkit-transition");
        assert_eq!(to_param_case("MozBoxSizing"), "-moz-box-sizing");
        assert_eq!(to_param_case("msFlex"), "-ms-flex");
    }

    #[test]
    fn lookalike_names_are_not_prefixed() {
        assert!(!is_prefixed_property("mask"));
        assert!(!is_prefixed_property("msx"));
        assert_eq!(to_param_case("mask"), "mask");
    }

    #[test]
    fn hyphenated_and_custom_names_pass_through() {
        assert_eq!(to_param_case("font-size"), "font-size");
        assert_eq!(to_param_case("-webkit-box"), "-webkit-box");
        assert_eq!(to_param_case("--mainColor"), "--mainColor");
    }

    #[test]
    fn acronyms_split_before_the_next_word() {
        assert_eq!(to_param_case("XMLHttp"), "xml-http");
    }

    #[test]
    fn camel_case_round_trips_prefixed_names() {
        assert_eq!(to_camel_case("box-shadow"), "boxShadow");
        assert_eq!(to_camel_case("-webkit-transform"), "WebkitTransform");
        assert_eq!(to_camel_case("-ms-flex"), "msFlex");
        assert_eq!(to_param_case(&to_camel_case("-moz-user-select")), "-moz-user-select");
    }

    #[test]
    fn vendor_prefix_applies_to_camel_names() {
        assert_eq!(VendorPrefix::Webkit.apply("transform"), "WebkitTransform");
        assert_eq!(VendorPrefix::Ms.apply("flexGrow"), "msFlexGrow");
    }
}
