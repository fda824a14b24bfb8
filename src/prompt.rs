pub struct Prompt {
    prefix: String,
}

impl Prompt {
    pub fn new() -> Self {
        Self {
            prefix: String::from(":"),
        }
    }

    pub fn get_string(&self) -> String {
        format!("{} ", self.prefix)
    }
}

impl Default for Prompt {
    fn default() -> Self {
        Self::new()
    }
}
