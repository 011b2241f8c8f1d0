/// Handle onto the raw-text editing surface. The real surface is an external
/// text-editor widget exposing a get/set pair; the engine never inspects
/// anything beyond the current text.
pub trait TextSurface {
    fn get_value(&self) -> String;
    fn set_value(&mut self, text: &str);
}

/// In-memory surface for tests and headless embedding.
#[derive(Debug, Clone, Default)]
pub struct BufferSurface {
    text: String,
}

impl BufferSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TextSurface for BufferSurface {
    fn get_value(&self) -> String {
        self.text.clone()
    }

    fn set_value(&mut self, text: &str) {
        self.text = text.to_string();
    }
}
