//! Single-shot chat exchange: one instruction turn, one prompt turn, one text answer

use serde::Serialize;

/// Speaker of a chat turn sent to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// What the summarizer asks of the model
#[derive(Debug, Clone, PartialEq)]
pub struct ChatPrompt {
    /// Standing instructions, sent as the system turn
    pub instructions: String,
    /// The actual question, sent as the user turn
    pub prompt: String,
    pub temperature: f32,
}

impl ChatPrompt {
    pub fn new(instructions: impl Into<String>, prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            instructions: instructions.into(),
            prompt: prompt.into(),
            temperature,
        }
    }

    /// Turns in the order the model sees them
    pub fn turns(&self) -> [ChatTurn; 2] {
        [
            ChatTurn {
                role: ChatRole::System,
                content: self.instructions.clone(),
            },
            ChatTurn {
                role: ChatRole::User,
                content: self.prompt.clone(),
            },
        ]
    }
}

/// Text answer from the model
#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletion {
    pub id: String,
    pub model: String,
    pub text: String,
    /// The model stopped at its token limit
    pub cut_off: bool,
    pub total_tokens: Option<u32>,
}

impl ChatCompletion {
    pub fn new(id: impl Into<String>, model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            model: model.into(),
            text: text.into(),
            cut_off: false,
            total_tokens: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turns_put_instructions_first() {
        let prompt = ChatPrompt::new("You summarize READMEs", "README content:\n# axum", 0.2);
        let [system, user] = prompt.turns();

        assert_eq!(system.role, ChatRole::System);
        assert_eq!(system.content, "You summarize READMEs");
        assert_eq!(user.role, ChatRole::User);
        assert!(user.content.ends_with("# axum"));
    }

    #[test]
    fn test_turn_wire_shape() {
        let prompt = ChatPrompt::new("be brief", "hi", 0.0);
        let json = serde_json::to_value(prompt.turns()).unwrap();

        assert_eq!(
            json,
            serde_json::json!([
                { "role": "system", "content": "be brief" },
                { "role": "user", "content": "hi" }
            ])
        );
    }
}
