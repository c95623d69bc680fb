use std::fmt;

// ---------------------------------------------------------------------------
// FlagDefinition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagDefinition {
    /// Long name without the leading dashes.
    pub name: String,
    pub short: Option<char>,
    pub description: String,
    pub takes_value: bool,
    /// Literal candidates offered for the value; `None` means free-form.
    pub values: Option<Vec<String>>,
}

impl FlagDefinition {
    /// A boolean flag.
    pub fn switch(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short: None,
            description: description.into(),
            takes_value: false,
            values: None,
        }
    }

    /// A flag taking an arbitrary value.
    pub fn value(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            takes_value: true,
            ..Self::switch(name, description)
        }
    }

    /// A flag whose value is one of `values`.
    pub fn choice(
        name: impl Into<String>,
        description: impl Into<String>,
        values: &[&str],
    ) -> Self {
        Self {
            takes_value: true,
            values: Some(values.iter().map(|v| (*v).to_string()).collect()),
            ..Self::switch(name, description)
        }
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }
}

// ---------------------------------------------------------------------------
// PositionalKind
// ---------------------------------------------------------------------------

/// How trailing positional arguments of a leaf command are completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionalKind {
    /// No specific strategy; the shell's default completion.
    Any,
    ChangeId,
    SpecId,
    ChangeOrSpecId,
    Path,
    Shell,
}

impl PositionalKind {
    pub fn all() -> &'static [PositionalKind] {
        &[
            PositionalKind::Any,
            PositionalKind::ChangeId,
            PositionalKind::SpecId,
            PositionalKind::ChangeOrSpecId,
            PositionalKind::Path,
            PositionalKind::Shell,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PositionalKind::Any => "any",
            PositionalKind::ChangeId => "change-id",
            PositionalKind::SpecId => "spec-id",
            PositionalKind::ChangeOrSpecId => "change-or-spec-id",
            PositionalKind::Path => "path",
            PositionalKind::Shell => "shell",
        }
    }
}

impl fmt::Display for PositionalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CommandDefinition
// ---------------------------------------------------------------------------

/// What a command does with the words after its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandBody {
    /// Selects one of the subcommands.
    Dispatch(Vec<CommandDefinition>),
    /// Takes flags and, optionally, positional arguments.
    Leaf { positional: Option<PositionalKind> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDefinition {
    pub name: String,
    pub description: String,
    pub flags: Vec<FlagDefinition>,
    pub body: CommandBody,
}

impl CommandDefinition {
    pub fn leaf(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            flags: Vec::new(),
            body: CommandBody::Leaf { positional: None },
        }
    }

    pub fn group(
        name: impl Into<String>,
        description: impl Into<String>,
        subcommands: Vec<CommandDefinition>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            flags: Vec::new(),
            body: CommandBody::Dispatch(subcommands),
        }
    }

    pub fn flag(mut self, flag: FlagDefinition) -> Self {
        self.flags.push(flag);
        self
    }

    /// Accept positional arguments completed by `kind`.
    ///
    /// Has no effect on a dispatch node: subcommands take precedence.
    pub fn positional(mut self, kind: PositionalKind) -> Self {
        if let CommandBody::Leaf { positional } = &mut self.body {
            *positional = Some(kind);
        }
        self
    }

    pub fn subcommands(&self) -> &[CommandDefinition] {
        match &self.body {
            CommandBody::Dispatch(subs) => subs,
            CommandBody::Leaf { .. } => &[],
        }
    }
}
