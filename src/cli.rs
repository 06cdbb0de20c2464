//! Terminal front-end — renders the flow and reports gestures back to it.
//!
//! A plain stdin/stdout driver. All state lives in [`OnboardingFlow`]; this
//! module only declares the views and maps typed commands onto flow calls,
//! so it stays out of the way of the flow's own contracts.

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::onboarding::actions::ProfileAction;
use crate::onboarding::auth::AuthMode;
use crate::onboarding::profile::{
    Ambiance, Budget, Companion, DiscoveryStyle, Distance, Frequency, SportRelation, TimeSlot,
    INTERESTS, MUSIC_GENRES, SPORT_TYPES,
};
use crate::onboarding::{OnboardingFlow, Screen};

/// Parse a 1-based option number within `max`.
fn parse_choice(input: &str, max: usize) -> Option<usize> {
    input
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=max).contains(n))
        .map(|n| n - 1)
}

/// Interactive wizard over stdin/stdout.
pub struct Wizard {
    flow: OnboardingFlow,
}

impl Wizard {
    pub fn new(flow: OnboardingFlow) -> Self {
        Self { flow }
    }

    /// Run until the user leaves from the done screen (or EOF).
    pub async fn run(mut self) -> anyhow::Result<()> {
        let stdin = tokio::io::stdin();
        let reader = BufReader::new(stdin);
        let mut lines = reader.lines();

        self.flow.bootstrap().await;

        loop {
            self.render();
            eprint!("> ");
            let Some(line) = lines.next_line().await? else {
                break; // EOF
            };
            let line = line.trim().to_string();
            if line.eq_ignore_ascii_case("quit") {
                break;
            }
            if !self.handle(&line).await {
                break;
            }
        }
        Ok(())
    }

    fn render(&self) {
        let screen = self.flow.screen();
        println!();
        if !matches!(screen, Screen::Welcome | Screen::Done) {
            println!("[{}%]", self.flow.percent());
        }
        match screen {
            Screen::Welcome => {
                println!("GEDEON — Global Event Directory");
                println!("Tous les événements du monde. Du concert au village jusqu'aux JO.");
                println!("(n) Commencer");
            }
            Screen::AuthEmail => {
                println!("Connexion / inscription");
                println!("Mode actuel : {}", self.mode_label());
                println!("Commandes : email <adresse> | switch | n | b");
                if !self.flow.auth().form.email.is_empty() && !self.flow.auth().can_proceed_email()
                {
                    println!("Email invalide");
                }
            }
            Screen::AuthCredentials => {
                let auth = self.flow.auth();
                match auth.mode {
                    AuthMode::Register => println!("Créer ton compte"),
                    AuthMode::Login => println!("Se connecter"),
                }
                println!(
                    "Commandes : pseudo <p> | pwd <mot de passe> | pwd2 <confirmation> | \
                     submit | forgot | resend | confirm | switch | b"
                );
                if let Some(error) = &auth.error {
                    println!("! {error}");
                }
                if let Some(info) = &auth.info {
                    println!("- {info}");
                }
                if let Some(forgot) = &auth.forgot_info {
                    println!("- {forgot}");
                }
                if auth.pending_confirm {
                    println!(
                        "Confirmation email : ouvre le lien reçu, puis tape `confirm`."
                    );
                }
            }
            Screen::Identity => {
                println!("Comment tu t'appelles ? (infos privées)");
                println!("Commandes : prenom <p> | nom <n> | n | b");
            }
            Screen::QuestionsIntro => {
                println!("Te connaître en 10 questions (≈ 1 minute)");
                println!("(n) C'est parti !  (skip) Passer pour l'instant");
            }
            Screen::Interests => {
                println!("① Tes passions — choisis 3 à 5 thèmes");
                for (i, interest) in INTERESTS.iter().enumerate() {
                    let mark = if self
                        .flow
                        .state()
                        .profile
                        .interests
                        .iter()
                        .any(|id| id == interest.id)
                    {
                        "x"
                    } else {
                        " "
                    };
                    println!("[{mark}] {:2}. {} {}", i + 1, interest.emoji, interest.label);
                }
                println!(
                    "{}/5 sélectionnés — numéro pour basculer, n / b",
                    self.flow.state().profile.interests.len()
                );
            }
            Screen::Sport => {
                println!("② Le sport, pour toi c'est...");
                println!("1. Spectateur  2. Pratiquant  3. Les deux !  4. Pas trop mon truc");
                if self
                    .flow
                    .state()
                    .profile
                    .sport_type
                    .is_some_and(|s| s.wants_favorites())
                {
                    println!("Sports préférés (optionnel) : s<numéro> pour basculer");
                    for (i, sport) in SPORT_TYPES.iter().enumerate() {
                        println!("  s{:2}. {sport}", i + 1);
                    }
                }
            }
            Screen::Music => {
                println!("③ Quels sons te font vibrer ? (autant que tu veux)");
                for (i, genre) in MUSIC_GENRES.iter().enumerate() {
                    println!("{:2}. {genre}", i + 1);
                }
                println!("numéro pour basculer, n, b, ou `none` (pas de préférence)");
            }
            Screen::Companion => {
                println!("④ Tu sors plutôt...");
                println!("1. En solo  2. En couple  3. En famille  4. Entre amis  5. Ça dépend");
            }
            Screen::Distance => {
                println!("⑤ Jusqu'où tu irais ?");
                println!(
                    "1. Mon quartier (<5 km)  2. Ma ville (<20 km)  3. Ma région (<100 km)  \
                     4. Partout dans le pays  5. Sans frontières !"
                );
            }
            Screen::Budget => {
                println!("⑥ Budget sorties");
                println!(
                    "1. Gratuit c'est bien  2. Jusqu'à 30€  3. Jusqu'à 100€  \
                     4. Le prix n'est pas un frein"
                );
            }
            Screen::Frequency => {
                println!("⑦ Tu sors à quelle fréquence ?");
                println!(
                    "1. 1-2 fois par mois  2. Chaque semaine  3. Plusieurs fois par semaine  \
                     4. Quand l'envie me prend"
                );
            }
            Screen::When => {
                println!("⑧ C'est quand pour toi ? (plusieurs choix possibles)");
                println!(
                    "1. En semaine  2. Le weekend  3. En soirée  4. Vacances / fériés  \
                     5. Tout le temps !"
                );
            }
            Screen::Discovery => {
                println!("⑨ Ton style de sortie");
                println!("1. Explorateur  2. Fidèle  3. Les deux");
            }
            Screen::Ambiance => {
                println!("⑩ L'ambiance idéale (dernière question !)");
                println!("1. En grand  2. Intimiste  3. Les deux me vont");
            }
            Screen::Notifications => {
                println!("Notifications — pas obligatoire, mais conseillé !");
                println!("1. Oui, m'alerter  2. Plus tard");
                println!("(n) Finaliser");
            }
            Screen::Done => {
                let first_name = &self.flow.state().first_name;
                if first_name.is_empty() {
                    println!("Bienvenue !");
                } else {
                    println!("Bienvenue {first_name} !");
                }
                println!("Ton profil est prêt. GEDEON va te proposer des événements sur mesure.");
                for id in &self.flow.state().profile.interests {
                    if let Some(interest) = INTERESTS.iter().find(|i| i.id == *id) {
                        println!("  {} {}", interest.emoji, interest.label);
                    }
                }
                println!("(restart) Refaire l'onboarding  (quit) Explorer GEDEON");
            }
        }
    }

    fn mode_label(&self) -> &'static str {
        match self.flow.auth().mode {
            AuthMode::Register => "Créer un compte",
            AuthMode::Login => "Se connecter",
        }
    }

    /// Dispatch one command. Returns false to exit.
    async fn handle(&mut self, line: &str) -> bool {
        match line {
            "n" => {
                if self.flow.can_continue() {
                    match self.flow.screen() {
                        // The credentials screen advances via submit only.
                        Screen::AuthCredentials => self.flow.submit_auth().await,
                        Screen::Notifications => {
                            if let Err(e) = self.flow.finalize().await {
                                println!("! Enregistrement impossible : {e}");
                            }
                        }
                        _ => {
                            self.flow.advance().await;
                        }
                    }
                } else {
                    println!("(complète cette étape d'abord)");
                }
                return true;
            }
            "b" => {
                self.flow.retreat().await;
                return true;
            }
            _ => {}
        }

        match self.flow.screen() {
            Screen::AuthEmail => self.handle_auth_email(line),
            Screen::AuthCredentials => self.handle_auth_credentials(line).await,
            Screen::Identity => self.handle_identity(line),
            Screen::QuestionsIntro => {
                if line == "skip" {
                    self.flow.skip_questions();
                }
            }
            Screen::Interests => {
                if let Some(i) = parse_choice(line, INTERESTS.len()) {
                    self.flow
                        .dispatch(ProfileAction::ToggleInterest(INTERESTS[i].id.to_string()));
                }
            }
            Screen::Sport => self.handle_sport(line),
            Screen::Music => {
                if line == "none" {
                    self.flow.advance().await;
                } else if let Some(i) = parse_choice(line, MUSIC_GENRES.len()) {
                    self.flow
                        .dispatch(ProfileAction::ToggleMusicGenre(MUSIC_GENRES[i].to_string()));
                }
            }
            Screen::Companion => {
                const OPTIONS: [Companion; 5] = [
                    Companion::Solo,
                    Companion::Couple,
                    Companion::Family,
                    Companion::Friends,
                    Companion::Depends,
                ];
                if let Some(i) = parse_choice(line, OPTIONS.len()) {
                    self.flow.dispatch(ProfileAction::SetCompanion(OPTIONS[i]));
                }
            }
            Screen::Distance => {
                const OPTIONS: [Distance; 5] = [
                    Distance::Neighborhood,
                    Distance::City,
                    Distance::Region,
                    Distance::National,
                    Distance::International,
                ];
                if let Some(i) = parse_choice(line, OPTIONS.len()) {
                    self.flow.dispatch(ProfileAction::SetDistance(OPTIONS[i]));
                }
            }
            Screen::Budget => {
                const OPTIONS: [Budget; 4] =
                    [Budget::Free, Budget::UpTo30, Budget::UpTo100, Budget::NoLimit];
                if let Some(i) = parse_choice(line, OPTIONS.len()) {
                    self.flow.dispatch(ProfileAction::SetBudget(OPTIONS[i]));
                }
            }
            Screen::Frequency => {
                const OPTIONS: [Frequency; 4] = [
                    Frequency::Occasional,
                    Frequency::Weekly,
                    Frequency::SeveralPerWeek,
                    Frequency::Spontaneous,
                ];
                if let Some(i) = parse_choice(line, OPTIONS.len()) {
                    self.flow.dispatch(ProfileAction::SetFrequency(OPTIONS[i]));
                }
            }
            Screen::When => {
                const OPTIONS: [TimeSlot; 5] = [
                    TimeSlot::Weekdays,
                    TimeSlot::Weekend,
                    TimeSlot::Evenings,
                    TimeSlot::Holidays,
                    TimeSlot::Anytime,
                ];
                if let Some(i) = parse_choice(line, OPTIONS.len()) {
                    self.flow.dispatch(ProfileAction::ToggleWhen(OPTIONS[i]));
                }
            }
            Screen::Discovery => {
                const OPTIONS: [DiscoveryStyle; 3] = [
                    DiscoveryStyle::Explorer,
                    DiscoveryStyle::Loyal,
                    DiscoveryStyle::Mixed,
                ];
                if let Some(i) = parse_choice(line, OPTIONS.len()) {
                    self.flow.dispatch(ProfileAction::SetDiscovery(OPTIONS[i]));
                }
            }
            Screen::Ambiance => {
                const OPTIONS: [Ambiance; 3] =
                    [Ambiance::Big, Ambiance::Intimate, Ambiance::Either];
                if let Some(i) = parse_choice(line, OPTIONS.len()) {
                    self.flow.dispatch(ProfileAction::SetAmbiance(OPTIONS[i]));
                }
            }
            Screen::Notifications => {
                if line == "1" {
                    self.flow.dispatch(ProfileAction::SetNotifChoice(true));
                } else if line == "2" {
                    self.flow.dispatch(ProfileAction::SetNotifChoice(false));
                }
            }
            Screen::Done => {
                if line == "restart" {
                    self.flow.restart();
                }
            }
            Screen::Welcome => {}
        }
        true
    }

    fn handle_auth_email(&mut self, line: &str) {
        if let Some(email) = line.strip_prefix("email ") {
            self.flow.auth_mut().form.email = email.trim().to_string();
        } else if line == "switch" {
            self.flow.auth_mut().switch_mode();
        }
    }

    async fn handle_auth_credentials(&mut self, line: &str) {
        if let Some(pseudo) = line.strip_prefix("pseudo ") {
            self.flow.auth_mut().form.pseudo = pseudo.trim().to_string();
        } else if let Some(pwd) = line.strip_prefix("pwd2 ") {
            self.flow.auth_mut().form.set_password2(pwd);
        } else if let Some(pwd) = line.strip_prefix("pwd ") {
            self.flow.auth_mut().form.set_password(pwd);
        } else {
            match line {
                "submit" => {
                    if self.flow.can_continue() {
                        self.flow.submit_auth().await;
                    } else {
                        println!("(formulaire incomplet)");
                    }
                }
                "forgot" => self.flow.forgot_password().await,
                "resend" => self.flow.resend_confirmation().await,
                "confirm" => self.flow.confirm_and_login().await,
                "switch" => self.flow.auth_mut().switch_mode(),
                _ => {}
            }
        }
    }

    fn handle_identity(&mut self, line: &str) {
        if let Some(name) = line.strip_prefix("prenom ") {
            self.flow
                .dispatch(ProfileAction::SetFirstName(name.trim().to_string()));
        } else if let Some(name) = line.strip_prefix("nom ") {
            self.flow
                .dispatch(ProfileAction::SetLastName(name.trim().to_string()));
        }
    }

    fn handle_sport(&mut self, line: &str) {
        if let Some(rest) = line.strip_prefix('s') {
            if let Some(i) = parse_choice(rest, SPORT_TYPES.len()) {
                self.flow
                    .dispatch(ProfileAction::ToggleSportPref(SPORT_TYPES[i].to_string()));
                return;
            }
        }
        const OPTIONS: [SportRelation; 4] = [
            SportRelation::Spectator,
            SportRelation::Practitioner,
            SportRelation::Both,
            SportRelation::NotForMe,
        ];
        if let Some(i) = parse_choice(line, OPTIONS.len()) {
            self.flow.dispatch(ProfileAction::SetSportRelation(OPTIONS[i]));
        }
    }
}
