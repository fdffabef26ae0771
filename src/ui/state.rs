/// Aktuell vy i applikationen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    FamilyTree,
    Silsila,
    Guide,
    Settings,
}

impl View {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Home => "Hem",
            Self::FamilyTree => "Släktträd",
            Self::Silsila => "Silsila",
            Self::Guide => "Böneguide",
            Self::Settings => "Inställningar",
        }
    }
}

/// Centraliserat applikationstillstånd
#[derive(Debug, Default)]
pub struct AppState {
    /// Aktuell vy
    pub current_view: View,

    /// Blockerande meddelande (t.ex. misslyckad uppläsning)
    pub alert_message: Option<String>,

    /// Statusmeddelande
    pub status_message: Option<StatusMessage>,

    /// Dark mode
    pub dark_mode: bool,

    /// Satt när inställningar ändrats och klienterna behöver byggas om
    pub settings_changed: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigera till vy
    pub fn navigate(&mut self, view: View) {
        self.current_view = view;
    }

    /// Visa blockerande dialog
    pub fn show_alert(&mut self, message: &str) {
        self.alert_message = Some(message.to_string());
    }

    pub fn close_alert(&mut self) {
        self.alert_message = None;
    }

    /// Visa statusmeddelande
    pub fn show_status(&mut self, message: &str, status_type: StatusType) {
        self.status_message = Some(StatusMessage {
            text: message.to_string(),
            status_type,
            created_at: std::time::Instant::now(),
        });
    }

    /// Visa framgångsmeddelande
    pub fn show_success(&mut self, message: &str) {
        self.show_status(message, StatusType::Success);
    }

    /// Visa felmeddelande
    pub fn show_error(&mut self, message: &str) {
        self.show_status(message, StatusType::Error);
    }

    /// Rensa statusmeddelande om det är för gammalt
    pub fn clear_old_status(&mut self) {
        if let Some(ref status) = self.status_message {
            if status.created_at.elapsed().as_secs() > 5 {
                self.status_message = None;
            }
        }
    }
}

/// Statusmeddelande
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub status_type: StatusType,
    pub created_at: std::time::Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusType {
    Success,
    Error,
    Info,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_lifecycle() {
        let mut state = AppState::new();
        assert_eq!(state.current_view, View::Home);

        state.show_alert("Uppläsningen misslyckades");
        assert_eq!(state.alert_message.as_deref(), Some("Uppläsningen misslyckades"));
        state.close_alert();
        assert!(state.alert_message.is_none());
    }

    #[test]
    fn test_fresh_status_is_kept() {
        let mut state = AppState::new();
        state.show_success("Sparat");
        state.clear_old_status();
        assert_eq!(
            state.status_message.map(|s| s.status_type),
            Some(StatusType::Success)
        );
    }
}
