use huurprijs_core::{
    Config, FieldId, InteractionController, PredictError, PredictionClient, PredictionResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    Unknown,
    Online,
    Offline,
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub struct App {
    pub should_quit: bool,

    // Conversation state
    pub controller: InteractionController,
    pub client: PredictionClient,
    pub service_status: ServiceStatus,
    /// Esc hides the error banner; a new error shows it again.
    pub error_hidden: bool,

    // Form state
    pub focused: usize, // index into FieldId::ALL
    pub cursor: usize,  // char position in the focused field

    // Chat pane
    pub chat_scroll: u16,
    pub chat_height: u16, // Height of chat area for scroll calculations
    pub chat_width: u16,  // Width of chat area for wrap calculations

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation
}

impl App {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = PredictionClient::new(&config.service_url(), config.timeout())?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: PredictionClient) -> Self {
        let controller = InteractionController::new();
        let cursor = controller.fields().get(FieldId::ALL[0]).chars().count();

        Self {
            should_quit: false,
            controller,
            client,
            service_status: ServiceStatus::Unknown,
            error_hidden: false,
            focused: 0,
            cursor,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            animation_frame: 0,
        }
    }

    pub fn focused_field(&self) -> FieldId {
        FieldId::ALL[self.focused]
    }

    pub fn focused_value(&self) -> &str {
        self.controller.fields().get(self.focused_field())
    }

    /// The error banner text, if there is one to show.
    pub fn visible_error(&self) -> Option<&str> {
        if self.error_hidden {
            None
        } else {
            self.controller.state().error()
        }
    }

    // Field focus
    pub fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % FieldId::ALL.len();
        self.cursor_end();
    }

    pub fn focus_prev(&mut self) {
        self.focused = (self.focused + FieldId::ALL.len() - 1) % FieldId::ALL.len();
        self.cursor_end();
    }

    // Editing the focused field
    pub fn insert_char(&mut self, c: char) {
        let mut value = self.focused_value().to_string();
        let byte_pos = char_to_byte_index(&value, self.cursor);
        value.insert(byte_pos, c);
        self.controller.edit(self.focused_field(), value);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let mut value = self.focused_value().to_string();
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&value, self.cursor);
            value.remove(byte_pos);
            self.controller.edit(self.focused_field(), value);
        }
    }

    pub fn delete(&mut self) {
        let mut value = self.focused_value().to_string();
        if self.cursor < value.chars().count() {
            let byte_pos = char_to_byte_index(&value, self.cursor);
            value.remove(byte_pos);
            self.controller.edit(self.focused_field(), value);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.focused_value().chars().count();
        self.cursor = (self.cursor + 1).min(char_count);
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.focused_value().chars().count();
    }

    /// Feed a finished exchange back into the controller.
    pub fn finish_prediction(&mut self, outcome: Result<PredictionResult, PredictError>) {
        self.controller.settle(outcome);
        self.error_hidden = false;
        self.scroll_chat_to_bottom();
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.controller.state().is_submitting() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_chat_up(&mut self) {
        let half_page = (self.chat_height / 2).max(1);
        self.chat_scroll = self.chat_scroll.saturating_sub(half_page);
    }

    pub fn scroll_chat_down(&mut self) {
        let half_page = (self.chat_height / 2).max(1);
        let max_scroll = clamp_scroll(self.chat_line_count().saturating_sub(self.chat_height as usize));
        self.chat_scroll = self.chat_scroll.saturating_add(half_page).min(max_scroll);
    }

    /// Scroll chat to bottom so the newest message (or "Thinking...") is visible
    pub fn scroll_chat_to_bottom(&mut self) {
        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        self.chat_scroll = clamp_scroll(self.chat_line_count().saturating_sub(visible_height as usize));
    }

    /// Wrapped line count of the chat pane as rendered.
    fn chat_line_count(&self) -> usize {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: usize = 0;

        for msg in self.controller.transcript().iter() {
            total_lines = total_lines.saturating_add(1); // Role line ("You:" or "Assistant:")
            for line in msg.content().lines() {
                // Use character count, not byte length, for proper UTF-8 handling
                let char_count = line.chars().count();
                total_lines = total_lines.saturating_add(char_count.div_ceil(wrap_width).max(1));
            }
            total_lines = total_lines.saturating_add(1); // Blank line after message
        }

        if self.controller.state().is_submitting() {
            total_lines = total_lines.saturating_add(2); // "Assistant:" + "Thinking..."
        }

        total_lines
    }
}

/// Paragraph scroll offsets are `u16`; longer conversations pin to the limit.
fn clamp_scroll(lines: usize) -> u16 {
    u16::try_from(lines).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use huurprijs_core::client::DEFAULT_TIMEOUT;
    use huurprijs_core::format::WELCOME;
    use huurprijs_core::{Effect, InteractionState, IntervalType};

    fn app() -> App {
        let client = PredictionClient::new("http://127.0.0.1:1", DEFAULT_TIMEOUT).unwrap();
        App::with_client(client)
    }

    #[test]
    fn test_char_to_byte_index_utf8() {
        assert_eq!(char_to_byte_index("m²x", 2), 3);
        assert_eq!(char_to_byte_index("abc", 10), 3);
    }

    #[test]
    fn test_starts_on_first_field_with_cursor_at_end() {
        let app = app();
        assert_eq!(app.focused_field(), FieldId::AreaM2);
        assert_eq!(app.cursor, 2);
    }

    #[test]
    fn test_focus_wraps_both_ways() {
        let mut app = app();
        app.focus_prev();
        assert_eq!(app.focused_field(), FieldId::FloorCount);
        app.focus_next();
        assert_eq!(app.focused_field(), FieldId::AreaM2);
    }

    #[test]
    fn test_editing_goes_through_controller() {
        let mut app = app();
        app.backspace();
        app.backspace();
        app.insert_char('9');
        app.insert_char('0');
        assert_eq!(app.controller.fields().area_m2(), "90");

        app.cursor_home();
        app.delete();
        assert_eq!(app.controller.fields().area_m2(), "0");
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn test_insert_in_middle() {
        let mut app = app();
        app.cursor_left();
        app.insert_char('.');
        assert_eq!(app.controller.fields().area_m2(), "7.5");
        app.cursor_right();
        app.cursor_right();
        assert_eq!(app.cursor, 3);
    }

    #[test]
    fn test_error_banner_can_be_hidden_and_reappears() {
        let mut app = app();
        assert!(matches!(app.controller.submit(), Effect::Dispatch(_)));
        app.finish_prediction(Err(PredictError::Timeout));
        assert!(app.visible_error().is_some());

        app.error_hidden = true;
        assert!(app.visible_error().is_none());
        assert!(matches!(app.controller.state(), InteractionState::Error(_)));

        app.controller.submit();
        app.finish_prediction(Err(PredictError::Timeout));
        assert!(app.visible_error().is_some());
    }

    #[test]
    fn test_tick_animates_only_while_submitting() {
        let mut app = app();
        app.tick_animation();
        assert_eq!(app.animation_frame, 0);

        app.controller.submit();
        app.tick_animation();
        app.tick_animation();
        app.tick_animation();
        assert_eq!(app.animation_frame, 0);
        app.tick_animation();
        assert_eq!(app.animation_frame, 1);
    }

    #[test]
    fn test_scroll_to_bottom_with_small_pane() {
        let mut app = app();
        app.chat_height = 2;
        app.chat_width = 80;
        app.scroll_chat_to_bottom();
        // welcome: role line + 2 content lines + blank line
        assert_eq!(app.chat_scroll, 2);
    }

    #[test]
    fn test_line_exactly_pane_width_takes_one_row() {
        let mut app = app();
        let widest = WELCOME.lines().map(|l| l.chars().count()).max().unwrap();
        app.chat_width = widest as u16;
        app.chat_height = 1;
        app.scroll_chat_to_bottom();
        // role line + 2 content lines + blank line, minus the visible row
        assert_eq!(app.chat_scroll, 3);
    }

    #[test]
    fn test_long_conversation_pins_scroll_instead_of_overflowing() {
        let mut app = app();
        app.chat_width = 80;
        app.chat_height = 10;
        let result = PredictionResult::new(1500.0, 1450.0, 1550.0, IntervalType::FixedAbs50).unwrap();

        // Each exchange renders 12 rows, so this passes u16::MAX
        for _ in 0..6_000 {
            assert!(matches!(app.controller.submit(), Effect::Dispatch(_)));
            app.controller.settle(Ok(result));
        }
        assert_eq!(app.controller.transcript().len(), 12_001);

        app.scroll_chat_to_bottom();
        assert_eq!(app.chat_scroll, u16::MAX);
        app.scroll_chat_down();
        assert_eq!(app.chat_scroll, u16::MAX);
        app.scroll_chat_up();
        assert_eq!(app.chat_scroll, u16::MAX - 5);
    }
}
