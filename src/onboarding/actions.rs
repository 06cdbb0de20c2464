//! Reducer for the accumulated onboarding state.
//!
//! Every mutation the screens perform goes through [`OnboardingState::apply`]
//! with one action per user gesture. All transitions are total: there is no
//! invalid action, only no-ops.

use super::profile::{
    Ambiance, Budget, Companion, DiscoveryStyle, Distance, Frequency, OnboardingState,
    SportRelation, TimeSlot, MAX_INTERESTS,
};

/// One user gesture on a screen.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileAction {
    ToggleInterest(String),
    SetSportRelation(SportRelation),
    ToggleSportPref(String),
    ToggleMusicGenre(String),
    SetCompanion(Companion),
    SetDistance(Distance),
    SetBudget(Budget),
    SetFrequency(Frequency),
    ToggleWhen(TimeSlot),
    SetDiscovery(DiscoveryStyle),
    SetAmbiance(Ambiance),
    SetFirstName(String),
    SetLastName(String),
    SetNotifChoice(bool),
}

/// Toggle membership: present removes, absent appends.
fn toggle<T: PartialEq>(list: &mut Vec<T>, item: T) {
    if let Some(pos) = list.iter().position(|x| *x == item) {
        list.remove(pos);
    } else {
        list.push(item);
    }
}

impl OnboardingState {
    /// Apply one action. Total over any state.
    pub fn apply(&mut self, action: ProfileAction) {
        match action {
            ProfileAction::ToggleInterest(id) => {
                let interests = &mut self.profile.interests;
                if let Some(pos) = interests.iter().position(|i| *i == id) {
                    interests.remove(pos);
                } else if interests.len() < MAX_INTERESTS {
                    interests.push(id);
                }
                // At the cap, selecting another theme is a no-op.
            }
            ProfileAction::SetSportRelation(rel) => self.profile.sport_type = Some(rel),
            ProfileAction::ToggleSportPref(sport) => toggle(&mut self.profile.sport_prefs, sport),
            ProfileAction::ToggleMusicGenre(genre) => toggle(&mut self.profile.music_genres, genre),
            ProfileAction::SetCompanion(c) => self.profile.companion = Some(c),
            ProfileAction::SetDistance(d) => self.profile.distance = Some(d),
            ProfileAction::SetBudget(b) => self.profile.budget = Some(b),
            ProfileAction::SetFrequency(f) => self.profile.frequency = Some(f),
            ProfileAction::ToggleWhen(slot) => toggle(&mut self.profile.when, slot),
            ProfileAction::SetDiscovery(d) => self.profile.discovery = Some(d),
            ProfileAction::SetAmbiance(a) => self.profile.ambiance = Some(a),
            ProfileAction::SetFirstName(name) => self.first_name = name,
            ProfileAction::SetLastName(name) => self.last_name = name,
            ProfileAction::SetNotifChoice(choice) => self.notif_choice = Some(choice),
        }
    }
}
