//! Zsh completion script generation.
//!
//! The script is built on `_arguments` and `_describe`. Every command gets
//! its own function named after its full command path
//! (`_spectest_change_show`), and dispatch nodes hand the remaining words to
//! the selected child.

use super::{backslash_escape, single_quote};
use crate::completion::model::{CommandBody, CommandDefinition, FlagDefinition, PositionalKind};
use crate::completion::provider::CandidateKind;
use crate::completion::{
    sanitize_function_name, CompletionGenerator, Shell, OWNERSHIP_HEADER, PROGRAM_NAME,
};

/// Characters `_arguments` treats specially inside `[description]`.
const DESCRIPTION_SPECIALS: &[char] = &['[', ']', ':'];
/// Characters that would break a `(v1 v2)` value list.
const VALUE_SPECIALS: &[char] = &[' ', '(', ')'];

#[derive(Debug, Clone)]
pub struct ZshGenerator {
    program: String,
}

impl Default for ZshGenerator {
    fn default() -> Self {
        Self::new(PROGRAM_NAME)
    }
}

impl ZshGenerator {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn root_function(&self) -> String {
        format!("_{}", sanitize_function_name(&self.program))
    }

    /// Name of the helper that completes positional values of `kind`.
    pub fn helper_function(&self, kind: DynamicHelper) -> String {
        format!("{}_complete_{}", self.root_function(), kind.suffix())
    }

    fn write_top_level(&self, out: &mut Vec<String>, root: &str, commands: &[CommandDefinition]) {
        out.push("  local context state line".to_string());
        out.push("  typeset -A opt_args".to_string());
        out.push(String::new());
        out.push("  local -a commands".to_string());
        out.push("  commands=(".to_string());
        for cmd in commands {
            out.push(format!("    {}", describe_entry(cmd)));
        }
        out.push("  )".to_string());
        out.push(String::new());
        push_arguments(
            out,
            "_arguments -C",
            &["\"1: :->command\"".to_string(), "\"*::arg:->args\"".to_string()],
        );
        out.push(String::new());
        out.push("  case $state in".to_string());
        out.push("    command)".to_string());
        out.push(format!("      _describe \"{} command\" commands", self.program));
        out.push("      ;;".to_string());
        out.push("    args)".to_string());
        out.push("      case $words[1] in".to_string());
        for cmd in commands {
            out.push(format!("        {})", cmd.name));
            out.push(format!("          {root}_{}", sanitize_function_name(&cmd.name)));
            out.push("          ;;".to_string());
        }
        out.push("      esac".to_string());
        out.push("      ;;".to_string());
        out.push("  esac".to_string());
    }

    // -----------------------------------------------------------------------
    // Command functions
    // -----------------------------------------------------------------------

    fn write_command(&self, out: &mut Vec<String>, parent_fn: &str, cmd: &CommandDefinition) {
        let func = format!("{parent_fn}_{}", sanitize_function_name(&cmd.name));

        out.push(format!("{func}() {{"));
        match &cmd.body {
            CommandBody::Dispatch(subs) if !subs.is_empty() => {
                self.write_dispatch(out, &func, "subcommand", &cmd.flags, subs);
            }
            CommandBody::Dispatch(_) => self.write_leaf(out, &cmd.flags, None),
            CommandBody::Leaf { positional } => self.write_leaf(out, &cmd.flags, *positional),
        }
        out.push("}".to_string());

        for sub in cmd.subcommands() {
            out.push(String::new());
            self.write_command(out, &func, sub);
        }
    }

    /// Body of a function that selects among `subs` and delegates to them.
    fn write_dispatch(
        &self,
        out: &mut Vec<String>,
        func: &str,
        label: &str,
        flags: &[FlagDefinition],
        subs: &[CommandDefinition],
    ) {
        out.push("  local context state line".to_string());
        out.push("  typeset -A opt_args".to_string());
        out.push(String::new());
        out.push("  local -a subcommands".to_string());
        out.push("  subcommands=(".to_string());
        for sub in subs {
            out.push(format!("    {}", describe_entry(sub)));
        }
        out.push("  )".to_string());
        out.push(String::new());

        let mut specs: Vec<String> = flags.iter().map(flag_spec).collect();
        specs.push("\"1: :->subcommand\"".to_string());
        specs.push("\"*::arg:->args\"".to_string());
        push_arguments(out, "_arguments -C", &specs);

        out.push(String::new());
        out.push("  case $state in".to_string());
        out.push("    subcommand)".to_string());
        out.push(format!("      _describe \"{label}\" subcommands"));
        out.push("      ;;".to_string());
        out.push("    args)".to_string());
        out.push("      case $words[1] in".to_string());
        for sub in subs {
            out.push(format!("        {})", sub.name));
            out.push(format!("          {func}_{}", sanitize_function_name(&sub.name)));
            out.push("          ;;".to_string());
        }
        out.push("      esac".to_string());
        out.push("      ;;".to_string());
        out.push("  esac".to_string());
    }

    fn write_leaf(
        &self,
        out: &mut Vec<String>,
        flags: &[FlagDefinition],
        positional: Option<PositionalKind>,
    ) {
        let mut specs: Vec<String> = flags.iter().map(flag_spec).collect();
        if let Some(kind) = positional {
            specs.push(self.positional_spec(kind));
        }
        push_arguments(out, "_arguments", &specs);
    }

    fn positional_spec(&self, kind: PositionalKind) -> String {
        match kind {
            PositionalKind::ChangeId => {
                format!("'*: :{}'", self.helper_function(DynamicHelper::Changes))
            }
            PositionalKind::SpecId => {
                format!("'*: :{}'", self.helper_function(DynamicHelper::Specs))
            }
            PositionalKind::ChangeOrSpecId => {
                format!("'*: :{}'", self.helper_function(DynamicHelper::Items))
            }
            PositionalKind::Path => "'*:path:_files'".to_string(),
            PositionalKind::Shell => {
                let names: Vec<String> = Shell::names()
                    .iter()
                    .map(|n| escape_value(n))
                    .collect();
                single_quote(&format!("*:shell:({})", names.join(" ")))
            }
            PositionalKind::Any => "'*: :_default'".to_string(),
        }
    }

    // -----------------------------------------------------------------------
    // Dynamic helpers
    // -----------------------------------------------------------------------

    fn write_dynamic_helpers(&self, out: &mut Vec<String>) {
        let root = self.root_function();
        let reader = format!("{root}_read_candidates");
        // Not `reply`: zstyle -e hooks run inside _describe may overwrite it.
        let items = format!("{root}_candidates");

        out.push("# Dynamic completion helpers".to_string());
        out.push(String::new());
        out.push(format!(
            "# Appends \"id:label\" pairs from `{} __complete --type <type>` to ${items}",
            self.program
        ));
        out.push(format!("{reader}() {{"));
        out.push("  local id desc".to_string());
        out.push("  while IFS=$'\\t' read -r id desc; do".to_string());
        out.push("    [[ -n $id && -n $desc ]] || continue".to_string());
        out.push(format!("    {items}+=(\"${{id//:/\\\\:}}:$desc\")"));
        out.push(format!(
            "  done < <({} __complete --type \"$1\" 2>/dev/null)",
            self.program
        ));
        out.push("}".to_string());
        out.push(String::new());

        for helper in DynamicHelper::all() {
            out.push(format!("{}() {{", self.helper_function(*helper)));
            out.push(format!("  local -a {items}"));
            for kind in helper.sources() {
                out.push(format!("  {reader} {}", kind.as_str()));
            }
            out.push(format!("  _describe \"{}\" {items}", helper.label()));
            out.push("}".to_string());
            out.push(String::new());
        }
    }
}

impl CompletionGenerator for ZshGenerator {
    fn shell(&self) -> Shell {
        Shell::Zsh
    }

    fn generate(&self, commands: &[CommandDefinition]) -> String {
        let root = self.root_function();
        let mut out: Vec<String> = Vec::new();

        out.push(format!("#compdef {}", self.program));
        out.push(String::new());
        out.push(format!("# Zsh completion script for {}", self.program));
        out.push(OWNERSHIP_HEADER.to_string());
        out.push(String::new());

        out.push(format!("{root}() {{"));
        self.write_top_level(&mut out, &root, commands);
        out.push("}".to_string());
        out.push(String::new());

        for cmd in commands {
            self.write_command(&mut out, &root, cmd);
            out.push(String::new());
        }

        self.write_dynamic_helpers(&mut out);

        out.push("if [[ $zsh_eval_context[-1] == loadautofunc ]]; then".to_string());
        out.push(format!("  {root} \"$@\""));
        out.push("else".to_string());
        out.push(format!("  compdef {root} {}", self.program));
        out.push("fi".to_string());
        out.push(String::new());

        out.join("\n")
    }
}

// ---------------------------------------------------------------------------
// DynamicHelper
// ---------------------------------------------------------------------------

/// Script functions that complete identifiers by querying the CLI at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DynamicHelper {
    Changes,
    Specs,
    Items,
}

impl DynamicHelper {
    pub fn all() -> &'static [DynamicHelper] {
        &[DynamicHelper::Changes, DynamicHelper::Specs, DynamicHelper::Items]
    }

    fn suffix(self) -> &'static str {
        match self {
            DynamicHelper::Changes => "changes",
            DynamicHelper::Specs => "specs",
            DynamicHelper::Items => "items",
        }
    }

    fn label(self) -> &'static str {
        match self {
            DynamicHelper::Changes => "change",
            DynamicHelper::Specs => "spec",
            DynamicHelper::Items => "item",
        }
    }

    fn sources(self) -> &'static [CandidateKind] {
        match self {
            DynamicHelper::Changes => &[CandidateKind::Changes],
            DynamicHelper::Specs => &[CandidateKind::Specs],
            DynamicHelper::Items => &[CandidateKind::Changes, CandidateKind::Specs],
        }
    }
}

// ---------------------------------------------------------------------------
// Spec building
// ---------------------------------------------------------------------------

/// Emit `head` followed by one spec per line, continuation markers on all
/// but the last.
fn push_arguments(out: &mut Vec<String>, head: &str, specs: &[String]) {
    if specs.is_empty() {
        out.push("  _message 'no more arguments'".to_string());
        return;
    }
    out.push(format!("  {head} \\"));
    for (i, spec) in specs.iter().enumerate() {
        let continuation = if i + 1 < specs.len() { " \\" } else { "" };
        out.push(format!("    {spec}{continuation}"));
    }
}

/// `'name:description'` entry for a `_describe` array.
fn describe_entry(cmd: &CommandDefinition) -> String {
    single_quote(&format!(
        "{}:{}",
        backslash_escape(&cmd.name, &[':']),
        cmd.description
    ))
}

/// An `_arguments` spec for one flag.
///
/// With a short alias both spellings exclude each other:
/// `'(-y --yes)'{-y,--yes}'[Skip prompts]'`.
pub fn flag_spec(flag: &FlagDefinition) -> String {
    let mut rest = format!("[{}]", escape_description(&flag.description));
    if flag.takes_value {
        match flag.values.as_deref() {
            Some(values) if !values.is_empty() => {
                let list: Vec<String> = values.iter().map(|v| escape_value(v)).collect();
                rest.push_str(&format!(":value:({})", list.join(" ")));
            }
            _ => rest.push_str(":value:"),
        }
    }

    match flag.short {
        Some(short) => format!(
            "'(-{short} --{name})'{{-{short},--{name}}}{}",
            single_quote(&rest),
            name = flag.name
        ),
        None => single_quote(&format!("--{}{rest}", flag.name)),
    }
}

/// Escape text for an `_arguments` `[description]`.
pub fn escape_description(desc: &str) -> String {
    backslash_escape(desc, DESCRIPTION_SPECIALS)
}

/// Escape one literal of a `(v1 v2)` value list.
pub fn escape_value(value: &str) -> String {
    backslash_escape(value, VALUE_SPECIALS)
}
