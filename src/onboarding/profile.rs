//! Profile accumulator — the answers collected across the flow.
//!
//! A plain in-memory record, mutated one answer at a time through the
//! reducer in [`super::actions`]. Nothing here is server-validated; the only
//! local rules are the interest cap and set-toggle semantics.

use serde::{Deserialize, Serialize};

/// Maximum number of interest themes a user may select.
pub const MAX_INTERESTS: usize = 5;

/// An interest theme offered on the passions screen.
#[derive(Debug, Clone, Copy)]
pub struct Interest {
    pub id: &'static str,
    pub emoji: &'static str,
    pub label: &'static str,
}

/// The interest catalog, as shown in the app.
pub const INTERESTS: [Interest; 17] = [
    Interest { id: "sport", emoji: "⚽", label: "Sport" },
    Interest { id: "musique", emoji: "🎵", label: "Musique & Concerts" },
    Interest { id: "arts", emoji: "🎭", label: "Arts & Culture" },
    Interest { id: "festivals", emoji: "🎪", label: "Festivals" },
    Interest { id: "gastro", emoji: "🍷", label: "Gastronomie" },
    Interest { id: "nature", emoji: "🌿", label: "Nature & Plein air" },
    Interest { id: "business", emoji: "💼", label: "Business & Pro" },
    Interest { id: "famille", emoji: "👨‍👩‍👧‍👦", label: "Famille & Kids" },
    Interest { id: "bienetre", emoji: "🧘", label: "Bien-être" },
    Interest { id: "tech", emoji: "🚀", label: "Tech & Innovation" },
    Interest { id: "mode", emoji: "👗", label: "Mode & Design" },
    Interest { id: "nightlife", emoji: "🌙", label: "Nightlife" },
    Interest { id: "patrimoine", emoji: "🏛️", label: "Patrimoine" },
    Interest { id: "cinema", emoji: "🎬", label: "Cinéma & Séries" },
    Interest { id: "communaute", emoji: "🤝", label: "Communauté" },
    Interest { id: "education", emoji: "📚", label: "Éducation" },
    Interest { id: "religion", emoji: "🕊️", label: "Spiritualité" },
];

/// Music genres offered on the music screen.
pub const MUSIC_GENRES: [&str; 12] = [
    "Pop", "Rock", "Hip-Hop", "Electro", "Jazz", "Classique",
    "World Music", "Metal", "R&B / Soul", "Reggae", "Afrobeat", "Variété",
];

/// Sports offered as optional favorites on the sport screen.
pub const SPORT_TYPES: [&str; 12] = [
    "Football", "Basketball", "Tennis", "Rugby", "Athlétisme", "Cyclisme",
    "Sports de combat", "Natation", "Sports extrêmes", "Esport", "Danse", "Autre",
];

/// How the user relates to sport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SportRelation {
    #[serde(rename = "spectateur")]
    Spectator,
    #[serde(rename = "pratiquant")]
    Practitioner,
    #[serde(rename = "les-deux")]
    Both,
    #[serde(rename = "bof")]
    NotForMe,
}

impl SportRelation {
    /// Whether the favorite-sports chips are shown for this choice.
    pub fn wants_favorites(&self) -> bool {
        !matches!(self, Self::NotForMe)
    }
}

/// Who the user usually goes out with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Companion {
    Solo,
    Couple,
    #[serde(rename = "famille")]
    Family,
    #[serde(rename = "amis")]
    Friends,
    Depends,
}

/// Default search radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Distance {
    #[serde(rename = "5km")]
    Neighborhood,
    #[serde(rename = "20km")]
    City,
    #[serde(rename = "100km")]
    Region,
    #[serde(rename = "national")]
    National,
    #[serde(rename = "international")]
    International,
}

/// Outing budget bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Budget {
    #[serde(rename = "free")]
    Free,
    #[serde(rename = "30")]
    UpTo30,
    #[serde(rename = "100")]
    UpTo100,
    #[serde(rename = "nolimit")]
    NoLimit,
}

/// How often the user goes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    #[serde(rename = "rare")]
    Occasional,
    #[serde(rename = "weekly")]
    Weekly,
    #[serde(rename = "multi")]
    SeveralPerWeek,
    #[serde(rename = "spontaneous")]
    Spontaneous,
}

/// When the user is available. Multi-select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeSlot {
    #[serde(rename = "semaine")]
    Weekdays,
    #[serde(rename = "weekend")]
    Weekend,
    #[serde(rename = "soir")]
    Evenings,
    #[serde(rename = "vacances")]
    Holidays,
    #[serde(rename = "anytime")]
    Anytime,
}

/// Appetite for novelty versus familiar picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscoveryStyle {
    #[serde(rename = "discover")]
    Explorer,
    #[serde(rename = "routine")]
    Loyal,
    #[serde(rename = "both")]
    Mixed,
}

/// Preferred event scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ambiance {
    #[serde(rename = "big")]
    Big,
    #[serde(rename = "intimate")]
    Intimate,
    #[serde(rename = "both")]
    Either,
}

/// Accumulated preference answers.
///
/// Serialized with the app's wire field names (camelCase) so the stored
/// payload matches what the backend expects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OnboardingProfile {
    pub interests: Vec<String>,
    pub sport_type: Option<SportRelation>,
    pub sport_prefs: Vec<String>,
    pub music_genres: Vec<String>,
    pub companion: Option<Companion>,
    pub distance: Option<Distance>,
    pub budget: Option<Budget>,
    pub frequency: Option<Frequency>,
    pub when: Vec<TimeSlot>,
    pub discovery: Option<DiscoveryStyle>,
    pub ambiance: Option<Ambiance>,
}

/// Everything the flow accumulates for one user: identity, preference
/// answers, and the notification choice.
///
/// Created empty when the flow mounts, mutated per step, persisted only by
/// the finalizer. Restart does not clear it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OnboardingState {
    pub first_name: String,
    pub last_name: String,
    pub profile: OnboardingProfile,
    pub notif_choice: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_ids_match_the_app_wire_format() {
        let cases = [
            (serde_json::to_string(&SportRelation::Both).unwrap(), "\"les-deux\""),
            (serde_json::to_string(&SportRelation::NotForMe).unwrap(), "\"bof\""),
            (serde_json::to_string(&Companion::Friends).unwrap(), "\"amis\""),
            (serde_json::to_string(&Distance::Neighborhood).unwrap(), "\"5km\""),
            (serde_json::to_string(&Budget::UpTo30).unwrap(), "\"30\""),
            (serde_json::to_string(&Frequency::Occasional).unwrap(), "\"rare\""),
            (serde_json::to_string(&TimeSlot::Weekdays).unwrap(), "\"semaine\""),
            (serde_json::to_string(&DiscoveryStyle::Explorer).unwrap(), "\"discover\""),
            (serde_json::to_string(&Ambiance::Either).unwrap(), "\"both\""),
        ];
        for (got, want) in cases {
            assert_eq!(got, want);
        }
    }

    #[test]
    fn empty_profile_serializes_with_camel_case_keys() {
        let json = serde_json::to_value(OnboardingProfile::default()).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("sportType"));
        assert!(obj.contains_key("sportPrefs"));
        assert!(obj.contains_key("musicGenres"));
        assert!(obj["companion"].is_null());
        assert!(obj["interests"].as_array().unwrap().is_empty());
    }

    #[test]
    fn profile_roundtrips_through_wire_json() {
        let profile = OnboardingProfile {
            interests: vec!["sport".into(), "musique".into(), "tech".into()],
            sport_type: Some(SportRelation::Spectator),
            sport_prefs: vec!["Football".into()],
            music_genres: vec!["Rock".into(), "Jazz".into()],
            companion: Some(Companion::Friends),
            distance: Some(Distance::City),
            budget: Some(Budget::Free),
            frequency: Some(Frequency::Weekly),
            when: vec![TimeSlot::Weekend, TimeSlot::Evenings],
            discovery: Some(DiscoveryStyle::Mixed),
            ambiance: Some(Ambiance::Intimate),
        };
        let json = serde_json::to_string(&profile).unwrap();
        let parsed: OnboardingProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, profile);
    }

    #[test]
    fn not_for_me_hides_favorites() {
        assert!(SportRelation::Spectator.wants_favorites());
        assert!(SportRelation::Both.wants_favorites());
        assert!(!SportRelation::NotForMe.wants_favorites());
    }

    #[test]
    fn catalogs_have_unique_ids() {
        let mut ids: Vec<&str> = INTERESTS.iter().map(|i| i.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), INTERESTS.len());
    }
}
