//! Step domain model

/// Placeholder replaced by the configured vendor root when commands are rendered
pub const VENDOR_ROOT_PLACEHOLDER: &str = "{{ vendor_root }}";

/// A single QA tool invocation in the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Unique step identifier, also the config key under `run`
    pub name: String,

    /// Label printed in status lines (`START PHPUNIT`)
    pub title: String,

    /// Command templates, executed in order
    pub commands: Vec<String>,

    /// Whether the tool rewrites files in place
    pub mutating: bool,

    /// Older config keys that also enable this step
    pub aliases: Vec<String>,
}

impl Step {
    /// Create a non-mutating step with a single command
    pub fn new(name: impl Into<String>, title: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            commands: vec![command.into()],
            mutating: false,
            aliases: Vec::new(),
        }
    }

    /// Mark the step as capable of modifying the working tree
    pub fn mutating(mut self) -> Self {
        self.mutating = true;
        self
    }

    /// Append another command, run after the previous ones succeed
    pub fn then(mut self, command: impl Into<String>) -> Self {
        self.commands.push(command.into());
        self
    }

    /// Accept a legacy config key for this step
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// All keys that refer to this step, primary name first
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Render the command lines with the vendor root substituted
    pub fn render_commands(&self, vendor_root: &str) -> Vec<String> {
        self.commands
            .iter()
            .map(|template| template.replace(VENDOR_ROOT_PLACEHOLDER, vendor_root))
            .collect()
    }
}
