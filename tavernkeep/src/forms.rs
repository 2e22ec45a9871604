//! Form state for the auth screens and the character sheet.
//!
//! Validation failures block submission locally before any network call
//! is made; the caller surfaces the returned message as a flash notice.

use gamemaster::{CharacterRecord, Statistics};
use tavernkeep_core::{Ability, AbilityScores, Class, Race};

// ============================================================================
// Login / register
// ============================================================================

/// Fields on the auth screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthField {
    #[default]
    Username,
    Password,
    Confirm,
}

/// State for the login and register forms.
#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    /// Username on login, email on register.
    pub username: String,
    pub password: String,
    pub confirm: String,
    pub field: AuthField,
}

impl AuthForm {
    /// Move to the next field. The confirm field only exists on register.
    pub fn next_field(&mut self, registering: bool) {
        self.field = match (self.field, registering) {
            (AuthField::Username, _) => AuthField::Password,
            (AuthField::Password, true) => AuthField::Confirm,
            (AuthField::Password, false) => AuthField::Username,
            (AuthField::Confirm, _) => AuthField::Username,
        };
    }

    pub fn prev_field(&mut self, registering: bool) {
        self.field = match (self.field, registering) {
            (AuthField::Username, true) => AuthField::Confirm,
            (AuthField::Username, false) => AuthField::Password,
            (AuthField::Password, _) => AuthField::Username,
            (AuthField::Confirm, _) => AuthField::Password,
        };
    }

    pub fn type_char(&mut self, c: char) {
        self.active_field_mut().push(c);
    }

    pub fn backspace(&mut self) {
        self.active_field_mut().pop();
    }

    fn active_field_mut(&mut self) -> &mut String {
        match self.field {
            AuthField::Username => &mut self.username,
            AuthField::Password => &mut self.password,
            AuthField::Confirm => &mut self.confirm,
        }
    }

    /// Local validation for login.
    pub fn validate_login(&self) -> Result<(), String> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err("Username and password are required".to_string());
        }
        Ok(())
    }

    /// Local validation for register.
    pub fn validate_register(&self) -> Result<(), String> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err("Email and password are required".to_string());
        }
        if self.password != self.confirm {
            return Err("Passwords do not match".to_string());
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// Character sheet
// ============================================================================

/// Fields on the character sheet, in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Race,
    Class,
    Players,
    Stat(Ability),
}

const FIELD_COUNT: usize = 10;

/// State for the character creation/edit form.
#[derive(Debug, Clone)]
pub struct CharacterForm {
    pub name: String,
    pub race_index: usize,
    pub class_index: usize,
    /// Number of players at the table, 4-6.
    pub players: u8,
    pub scores: AbilityScores,
    pub field_index: usize,
    /// Server id when editing an existing record.
    pub editing: Option<i64>,
    /// Level carried over from the record being edited.
    pub level: u8,
}

impl Default for CharacterForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            race_index: 0,
            class_index: 0,
            players: 4,
            scores: AbilityScores::new(10, 10, 10, 10, 10, 10),
            field_index: 0,
            editing: None,
            level: 1,
        }
    }
}

impl CharacterForm {
    /// The field under the cursor.
    pub fn field(&self) -> FormField {
        match self.field_index {
            0 => FormField::Name,
            1 => FormField::Race,
            2 => FormField::Class,
            3 => FormField::Players,
            i => FormField::Stat(Ability::all()[i - 4]),
        }
    }

    pub fn next_field(&mut self) {
        self.field_index = (self.field_index + 1) % FIELD_COUNT;
    }

    pub fn prev_field(&mut self) {
        self.field_index = (self.field_index + FIELD_COUNT - 1) % FIELD_COUNT;
    }

    pub fn race(&self) -> Race {
        Race::all()[self.race_index]
    }

    pub fn class(&self) -> Class {
        Class::all()[self.class_index]
    }

    /// Adjust the field under the cursor left (-1) or right (+1).
    pub fn adjust(&mut self, delta: i8) {
        match self.field() {
            FormField::Name => {}
            FormField::Race => {
                let count = Race::all().len();
                self.race_index = (self.race_index + count).wrapping_add_signed(delta as isize) % count;
            }
            FormField::Class => {
                let count = Class::all().len();
                self.class_index =
                    (self.class_index + count).wrapping_add_signed(delta as isize) % count;
            }
            FormField::Players => {
                self.players = self.players.saturating_add_signed(delta).clamp(4, 6);
            }
            FormField::Stat(ability) => {
                let value = self
                    .scores
                    .get(ability)
                    .saturating_add_signed(delta)
                    .clamp(8, 20);
                self.scores.set(ability, value);
            }
        }
    }

    pub fn type_char(&mut self, c: char) {
        if self.field() == FormField::Name {
            self.name.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.field() == FormField::Name {
            self.name.pop();
        }
    }

    /// Load an existing record for editing.
    pub fn load_record(&mut self, record: &CharacterRecord) {
        self.name = record.name.clone();
        self.race_index = Race::from_name(&record.race)
            .and_then(|r| Race::all().iter().position(|x| *x == r))
            .unwrap_or(0);
        self.class_index = Class::from_name(&record.class)
            .and_then(|c| Class::all().iter().position(|x| *x == c))
            .unwrap_or(0);
        self.players = record.players.clamp(4, 6);
        self.scores = AbilityScores::new(
            record.stats.strength,
            record.stats.constitution,
            record.stats.intelligence,
            record.stats.wisdom,
            record.stats.dexterity,
            record.stats.charisma,
        );
        self.editing = record.id;
        self.level = record.level.max(1);
        self.field_index = 0;
    }

    /// Local validation before submission.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("A character needs a name".to_string());
        }
        Ok(())
    }

    /// The wire record this form describes.
    pub fn build_record(&self) -> CharacterRecord {
        CharacterRecord {
            id: self.editing,
            name: self.name.trim().to_string(),
            race: self.race().name().to_string(),
            class: self.class().name().to_string(),
            players: self.players,
            level: self.level,
            stats: Statistics {
                strength: self.scores.strength,
                constitution: self.scores.constitution,
                intelligence: self.scores.intelligence,
                wisdom: self.scores.wisdom,
                dexterity: self.scores.dexterity,
                charisma: self.scores.charisma,
            },
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_field_cycle() {
        let mut form = AuthForm::default();
        form.next_field(false);
        assert_eq!(form.field, AuthField::Password);
        form.next_field(false);
        assert_eq!(form.field, AuthField::Username);

        form.next_field(true);
        form.next_field(true);
        assert_eq!(form.field, AuthField::Confirm);
    }

    #[test]
    fn test_register_validation_requires_matching_passwords() {
        let mut form = AuthForm {
            username: "hero@example.test".to_string(),
            password: "secret".to_string(),
            confirm: "different".to_string(),
            ..Default::default()
        };
        assert!(form.validate_register().is_err());

        form.confirm = "secret".to_string();
        assert!(form.validate_register().is_ok());
    }

    #[test]
    fn test_login_validation_requires_fields() {
        let form = AuthForm::default();
        assert!(form.validate_login().is_err());
    }

    #[test]
    fn test_form_field_order() {
        let mut form = CharacterForm::default();
        assert_eq!(form.field(), FormField::Name);
        for _ in 0..4 {
            form.next_field();
        }
        assert_eq!(form.field(), FormField::Stat(Ability::Strength));
        for _ in 0..6 {
            form.next_field();
        }
        assert_eq!(form.field(), FormField::Name);
    }

    #[test]
    fn test_stat_adjust_clamps() {
        let mut form = CharacterForm::default();
        form.field_index = 4; // Strength
        for _ in 0..20 {
            form.adjust(1);
        }
        assert_eq!(form.scores.strength, 20);
        for _ in 0..20 {
            form.adjust(-1);
        }
        assert_eq!(form.scores.strength, 8);
    }

    #[test]
    fn test_players_clamps_to_table_size() {
        let mut form = CharacterForm::default();
        form.field_index = 3;
        form.adjust(-1);
        assert_eq!(form.players, 4);
        for _ in 0..5 {
            form.adjust(1);
        }
        assert_eq!(form.players, 6);
    }

    #[test]
    fn test_validate_requires_name() {
        let mut form = CharacterForm::default();
        assert!(form.validate().is_err());
        form.name = "Grimjaw".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_build_record_round_trip() {
        let mut form = CharacterForm::default();
        form.name = "Grimjaw".to_string();
        form.race_index = 4; // Orc
        form.class_index = 0; // Barbarian
        let record = form.build_record();
        assert_eq!(record.race, "Orc");
        assert_eq!(record.level, 1);
        assert_eq!(record.id, None);

        let mut edit = CharacterForm::default();
        edit.load_record(&record);
        assert_eq!(edit.race(), Race::Orc);
        assert_eq!(edit.name, "Grimjaw");
    }
}
