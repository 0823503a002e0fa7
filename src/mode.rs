/// Which of the two remote capabilities an exchange targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Chat,
    ImageGeneration,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Chat => "Chat",
            Mode::ImageGeneration => "Generate image",
        }
    }
}
