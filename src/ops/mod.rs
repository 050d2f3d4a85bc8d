pub mod form;
pub mod project_list;
pub mod task_list;

use form::FormError;

/// User interaction a view needs in the middle of an operation: a yes/no
/// confirmation before destructive calls, and a blocking notice on failure.
pub trait Prompt {
    fn confirm(&mut self, message: &str) -> bool;
    fn alert(&mut self, message: &str);
}

/// Result of a user-initiated mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The request succeeded and the view was refreshed
    Done,
    /// The user declined the confirmation; nothing was sent
    Declined,
    /// The form did not validate; nothing was sent
    Invalid(FormError),
    /// The request failed and the user was alerted
    Failed,
}

#[cfg(test)]
pub mod test_prompt {
    use super::Prompt;

    /// Answers every confirmation with `answer` and records what was shown
    #[derive(Debug, Default)]
    pub struct ScriptedPrompt {
        pub answer: bool,
        pub confirms: Vec<String>,
        pub alerts: Vec<String>,
    }

    impl ScriptedPrompt {
        pub fn yes() -> Self {
            ScriptedPrompt {
                answer: true,
                ..Default::default()
            }
        }

        pub fn no() -> Self {
            ScriptedPrompt::default()
        }
    }

    impl Prompt for ScriptedPrompt {
        fn confirm(&mut self, message: &str) -> bool {
            self.confirms.push(message.to_string());
            self.answer
        }

        fn alert(&mut self, message: &str) {
            self.alerts.push(message.to_string());
        }
    }
}
