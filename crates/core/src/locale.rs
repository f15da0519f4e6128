use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }

    pub fn direction(&self) -> &'static str {
        match self {
            Self::En => "ltr",
            Self::Ar => "rtl",
        }
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "en" => Ok(Self::En),
            "ar" => Ok(Self::Ar),
            other => Err(format!("unsupported locale `{other}` (expected en|ar)")),
        }
    }
}

/// Picks the Arabic variant of a field when the locale asks for it and the
/// variant is present and non-blank; otherwise the default field.
pub fn localize<'a>(field: &'a str, field_ar: Option<&'a str>, locale: Locale) -> &'a str {
    match (locale, field_ar) {
        (Locale::Ar, Some(value)) if !value.trim().is_empty() => value,
        _ => field,
    }
}

#[cfg(test)]
mod tests {
    use super::{localize, Locale};

    #[test]
    fn arabic_variant_wins_only_for_arabic_locale() {
        assert_eq!(localize("Range Rover", Some("رنج روفر"), Locale::Ar), "رنج روفر");
        assert_eq!(localize("Range Rover", Some("رنج روفر"), Locale::En), "Range Rover");
    }

    #[test]
    fn missing_or_blank_variant_falls_back_to_default() {
        assert_eq!(localize("Tesla", None, Locale::Ar), "Tesla");
        assert_eq!(localize("Tesla", Some("  "), Locale::Ar), "Tesla");
    }

    #[test]
    fn parses_locale_codes() {
        assert_eq!("AR".parse::<Locale>(), Ok(Locale::Ar));
        assert_eq!("".parse::<Locale>(), Ok(Locale::En));
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn arabic_reads_right_to_left() {
        assert_eq!(Locale::Ar.direction(), "rtl");
        assert_eq!(Locale::En.direction(), "ltr");
    }
}
