use serde::{Deserialize, Serialize};

use crate::locale::{localize, Locale};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustFeature {
    pub id: String,
    pub icon: String,
    pub title: String,
    pub title_ar: String,
    pub description: String,
    pub description_ar: String,
}

/// Which fields a catalog card shows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardConfiguration {
    pub show_year: bool,
    pub show_brand: bool,
    pub show_rating: bool,
    pub show_price: bool,
    pub show_availability: bool,
    pub show_highlight: bool,
    pub show_specs: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailsPageLabels {
    pub specs_title: String,
    pub specs_title_ar: String,
    pub features_title: String,
    pub features_title_ar: String,
    pub rental_conditions_title: String,
    pub rental_conditions_title_ar: String,
    pub booking_panel_title: String,
    pub booking_panel_title_ar: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub company_name: String,
    pub logo_url: Option<String>,
    pub primary_color: String,
    pub whatsapp_number: String,
    pub contact_email: String,
    pub currency: String,
    pub hero_title1: String,
    pub hero_title1_ar: String,
    pub hero_title2: String,
    pub hero_title2_ar: String,
    pub hero_subtitle: String,
    pub hero_subtitle_ar: String,
    pub hero_badge: String,
    pub hero_badge_ar: String,
    pub trust_title: String,
    pub trust_title_ar: String,
    pub trust_features: Vec<TrustFeature>,
    pub card_config: CardConfiguration,
    pub details_labels: DetailsPageLabels,
}

/// Localized hero copy for the home page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HeroCopy<'a> {
    pub badge: &'a str,
    pub title1: &'a str,
    pub title2: &'a str,
    pub subtitle: &'a str,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            company_name: "Q Cars".to_string(),
            logo_url: None,
            primary_color: "#4F46E5".to_string(),
            whatsapp_number: "971502990802".to_string(),
            contact_email: "info@qcars.com".to_string(),
            currency: "AED".to_string(),
            hero_title1: "Drive the".to_string(),
            hero_title1_ar: "قُد".to_string(),
            hero_title2: "Extraordinary.".to_string(),
            hero_title2_ar: "الاستثنائي.".to_string(),
            hero_subtitle: "Experience the perfect blend of performance and luxury.".to_string(),
            hero_subtitle_ar: "استمتع بمزيج مثالي من الأداء والفخامة.".to_string(),
            hero_badge: "Premium Fleet 2024".to_string(),
            hero_badge_ar: "أسطول النخبة ٢٠٢٤".to_string(),
            trust_title: "Why Choose Us".to_string(),
            trust_title_ar: "لماذا تختارنا".to_string(),
            trust_features: Vec::new(),
            card_config: CardConfiguration {
                show_year: true,
                show_brand: true,
                show_rating: true,
                show_price: true,
                show_availability: true,
                show_highlight: true,
                show_specs: true,
            },
            details_labels: DetailsPageLabels {
                specs_title: "Vehicle Specifications".to_string(),
                specs_title_ar: "مواصفات المركبة".to_string(),
                features_title: "Premium Features".to_string(),
                features_title_ar: "ميزات مميزة".to_string(),
                rental_conditions_title: "Rental Conditions".to_string(),
                rental_conditions_title_ar: "شروط التأجير".to_string(),
                booking_panel_title: "Daily Rate".to_string(),
                booking_panel_title_ar: "السعر اليومي".to_string(),
            },
        }
    }
}

impl Settings {
    pub fn hero(&self, locale: Locale) -> HeroCopy<'_> {
        HeroCopy {
            badge: localize(&self.hero_badge, Some(&self.hero_badge_ar), locale),
            title1: localize(&self.hero_title1, Some(&self.hero_title1_ar), locale),
            title2: localize(&self.hero_title2, Some(&self.hero_title2_ar), locale),
            subtitle: localize(&self.hero_subtitle, Some(&self.hero_subtitle_ar), locale),
        }
    }

    pub fn trust_title(&self, locale: Locale) -> &str {
        localize(&self.trust_title, Some(&self.trust_title_ar), locale)
    }
}

/// Stored settings may predate fields added later; every field is optional
/// and unknown fields are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsPatch {
    pub company_name: Option<String>,
    /// A blank string clears the logo.
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub whatsapp_number: Option<String>,
    pub contact_email: Option<String>,
    pub currency: Option<String>,
    pub hero_title1: Option<String>,
    pub hero_title1_ar: Option<String>,
    pub hero_title2: Option<String>,
    pub hero_title2_ar: Option<String>,
    pub hero_subtitle: Option<String>,
    pub hero_subtitle_ar: Option<String>,
    pub hero_badge: Option<String>,
    pub hero_badge_ar: Option<String>,
    pub trust_title: Option<String>,
    pub trust_title_ar: Option<String>,
    pub trust_features: Option<Vec<TrustFeature>>,
    pub card_config: Option<CardConfigurationPatch>,
    pub details_labels: Option<DetailsPageLabelsPatch>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfigurationPatch {
    pub show_year: Option<bool>,
    pub show_brand: Option<bool>,
    pub show_rating: Option<bool>,
    pub show_price: Option<bool>,
    pub show_availability: Option<bool>,
    pub show_highlight: Option<bool>,
    pub show_specs: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailsPageLabelsPatch {
    pub specs_title: Option<String>,
    pub specs_title_ar: Option<String>,
    pub features_title: Option<String>,
    pub features_title_ar: Option<String>,
    pub rental_conditions_title: Option<String>,
    pub rental_conditions_title_ar: Option<String>,
    pub booking_panel_title: Option<String>,
    pub booking_panel_title_ar: Option<String>,
}

impl From<&Settings> for SettingsPatch {
    fn from(settings: &Settings) -> Self {
        let card = &settings.card_config;
        let labels = &settings.details_labels;
        Self {
            company_name: Some(settings.company_name.clone()),
            logo_url: settings.logo_url.clone(),
            primary_color: Some(settings.primary_color.clone()),
            whatsapp_number: Some(settings.whatsapp_number.clone()),
            contact_email: Some(settings.contact_email.clone()),
            currency: Some(settings.currency.clone()),
            hero_title1: Some(settings.hero_title1.clone()),
            hero_title1_ar: Some(settings.hero_title1_ar.clone()),
            hero_title2: Some(settings.hero_title2.clone()),
            hero_title2_ar: Some(settings.hero_title2_ar.clone()),
            hero_subtitle: Some(settings.hero_subtitle.clone()),
            hero_subtitle_ar: Some(settings.hero_subtitle_ar.clone()),
            hero_badge: Some(settings.hero_badge.clone()),
            hero_badge_ar: Some(settings.hero_badge_ar.clone()),
            trust_title: Some(settings.trust_title.clone()),
            trust_title_ar: Some(settings.trust_title_ar.clone()),
            trust_features: Some(settings.trust_features.clone()),
            card_config: Some(CardConfigurationPatch {
                show_year: Some(card.show_year),
                show_brand: Some(card.show_brand),
                show_rating: Some(card.show_rating),
                show_price: Some(card.show_price),
                show_availability: Some(card.show_availability),
                show_highlight: Some(card.show_highlight),
                show_specs: Some(card.show_specs),
            }),
            details_labels: Some(DetailsPageLabelsPatch {
                specs_title: Some(labels.specs_title.clone()),
                specs_title_ar: Some(labels.specs_title_ar.clone()),
                features_title: Some(labels.features_title.clone()),
                features_title_ar: Some(labels.features_title_ar.clone()),
                rental_conditions_title: Some(labels.rental_conditions_title.clone()),
                rental_conditions_title_ar: Some(labels.rental_conditions_title_ar.clone()),
                booking_panel_title: Some(labels.booking_panel_title.clone()),
                booking_panel_title_ar: Some(labels.booking_panel_title_ar.clone()),
            }),
        }
    }
}

fn take<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Field-by-field merge of stored settings over the current defaults. Fields
/// missing from `current` keep their default value.
pub fn merge(current: SettingsPatch, defaults: Settings) -> Settings {
    let mut merged = defaults;

    take(&mut merged.company_name, current.company_name);
    if let Some(url) = current.logo_url {
        merged.logo_url = Some(url).filter(|url| !url.trim().is_empty());
    }
    take(&mut merged.primary_color, current.primary_color);
    take(&mut merged.whatsapp_number, current.whatsapp_number);
    take(&mut merged.contact_email, current.contact_email);
    take(&mut merged.currency, current.currency);
    take(&mut merged.hero_title1, current.hero_title1);
    take(&mut merged.hero_title1_ar, current.hero_title1_ar);
    take(&mut merged.hero_title2, current.hero_title2);
    take(&mut merged.hero_title2_ar, current.hero_title2_ar);
    take(&mut merged.hero_subtitle, current.hero_subtitle);
    take(&mut merged.hero_subtitle_ar, current.hero_subtitle_ar);
    take(&mut merged.hero_badge, current.hero_badge);
    take(&mut merged.hero_badge_ar, current.hero_badge_ar);
    take(&mut merged.trust_title, current.trust_title);
    take(&mut merged.trust_title_ar, current.trust_title_ar);
    take(&mut merged.trust_features, current.trust_features);

    if let Some(card) = current.card_config {
        let target = &mut merged.card_config;
        take(&mut target.show_year, card.show_year);
        take(&mut target.show_brand, card.show_brand);
        take(&mut target.show_rating, card.show_rating);
        take(&mut target.show_price, card.show_price);
        take(&mut target.show_availability, card.show_availability);
        take(&mut target.show_highlight, card.show_highlight);
        take(&mut target.show_specs, card.show_specs);
    }

    if let Some(labels) = current.details_labels {
        let target = &mut merged.details_labels;
        take(&mut target.specs_title, labels.specs_title);
        take(&mut target.specs_title_ar, labels.specs_title_ar);
        take(&mut target.features_title, labels.features_title);
        take(&mut target.features_title_ar, labels.features_title_ar);
        take(&mut target.rental_conditions_title, labels.rental_conditions_title);
        take(&mut target.rental_conditions_title_ar, labels.rental_conditions_title_ar);
        take(&mut target.booking_panel_title, labels.booking_panel_title);
        take(&mut target.booking_panel_title_ar, labels.booking_panel_title_ar);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::{merge, CardConfigurationPatch, Settings, SettingsPatch};
    use crate::locale::Locale;

    #[test]
    fn missing_fields_keep_defaults() {
        let stored = SettingsPatch {
            company_name: Some("Desert Drives".to_string()),
            card_config: Some(CardConfigurationPatch {
                show_rating: Some(false),
                ..CardConfigurationPatch::default()
            }),
            ..SettingsPatch::default()
        };

        let merged = merge(stored, Settings::default());

        assert_eq!(merged.company_name, "Desert Drives");
        assert_eq!(merged.whatsapp_number, "971502990802");
        assert!(!merged.card_config.show_rating);
        assert!(merged.card_config.show_price);
        assert_eq!(merged.details_labels.booking_panel_title, "Daily Rate");
    }

    #[test]
    fn old_shaped_json_with_unknown_fields_still_merges() {
        let stored: SettingsPatch = serde_json::from_str(
            r#"{"company_name":"Legacy","retired_banner":"gone","card_config":{"show_year":false}}"#,
        )
        .expect("legacy settings should decode");

        let merged = merge(stored, Settings::default());

        assert_eq!(merged.company_name, "Legacy");
        assert!(!merged.card_config.show_year);
        assert_eq!(merged.hero_title1, "Drive the");
    }

    #[test]
    fn full_patch_round_trips_through_merge() {
        let mut settings = Settings::default();
        settings.hero_badge = "Summer Fleet".to_string();
        settings.logo_url = Some("https://cdn.example.com/logo.png".to_string());

        let merged = merge(SettingsPatch::from(&settings), Settings::default());

        assert_eq!(merged, settings);
    }

    #[test]
    fn blank_logo_url_clears_the_logo() {
        let mut current = Settings::default();
        current.logo_url = Some("https://cdn.example.com/logo.png".to_string());

        let kept = merge(SettingsPatch::default(), current.clone());
        let cleared = merge(
            SettingsPatch { logo_url: Some(String::new()), ..SettingsPatch::default() },
            current,
        );

        assert_eq!(kept.logo_url.as_deref(), Some("https://cdn.example.com/logo.png"));
        assert_eq!(cleared.logo_url, None);
    }

    #[test]
    fn hero_copy_is_localized() {
        let settings = Settings::default();

        assert_eq!(settings.hero(Locale::En).title2, "Extraordinary.");
        assert_eq!(settings.hero(Locale::Ar).title2, "الاستثنائي.");
        assert_eq!(settings.trust_title(Locale::Ar), "لماذا تختارنا");
    }
}
