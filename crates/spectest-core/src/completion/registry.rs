//! The spectest command surface as seen by shell completion.
//!
//! Declaration order is preserved in generated scripts, so commands are listed
//! in the order users should see them.

use super::model::{CommandDefinition, FlagDefinition, PositionalKind};
use std::sync::OnceLock;

const ITEM_TYPES: &[&str] = &["change", "spec"];

/// The process-wide command tree, built on first use.
pub fn command_registry() -> &'static [CommandDefinition] {
    static REGISTRY: OnceLock<Vec<CommandDefinition>> = OnceLock::new();
    REGISTRY.get_or_init(build)
}

fn json_flag() -> FlagDefinition {
    FlagDefinition::switch("json", "Output as JSON")
}

fn strict_flag() -> FlagDefinition {
    FlagDefinition::switch("strict", "Enable strict validation mode")
}

fn no_interactive_flag() -> FlagDefinition {
    FlagDefinition::switch("no-interactive", "Disable interactive prompts")
}

fn shell_flag() -> FlagDefinition {
    FlagDefinition::choice("shell", "Shell to use", super::Shell::names())
}

fn build() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::leaf("init", "Initialize spectest in your project")
            .flag(FlagDefinition::value(
                "tools",
                "Configure AI tools non-interactively (e.g. \"all\", \"none\", or a comma-separated list)",
            ))
            .positional(PositionalKind::Path),
        CommandDefinition::leaf("update", "Update spectest instruction files")
            .positional(PositionalKind::Path),
        CommandDefinition::leaf("list", "List items (changes by default)")
            .flag(FlagDefinition::switch("specs", "List specs instead of changes"))
            .flag(FlagDefinition::switch("archived", "List archived changes"))
            .flag(json_flag()),
        CommandDefinition::leaf("view", "Display an interactive dashboard of specs and changes"),
        CommandDefinition::leaf("validate", "Validate changes and specs")
            .flag(FlagDefinition::switch("all", "Validate all changes and specs"))
            .flag(FlagDefinition::switch("changes", "Validate all changes"))
            .flag(FlagDefinition::switch("specs", "Validate all specs"))
            .flag(FlagDefinition::choice(
                "type",
                "Disambiguate item type when names collide",
                ITEM_TYPES,
            ))
            .flag(strict_flag())
            .flag(json_flag())
            .flag(FlagDefinition::value(
                "concurrency",
                "Max concurrent validations (defaults to 6)",
            ))
            .flag(no_interactive_flag())
            .positional(PositionalKind::ChangeOrSpecId),
        CommandDefinition::leaf("show", "Show a change or spec")
            .flag(json_flag())
            .flag(FlagDefinition::choice(
                "type",
                "Disambiguate item type when names collide",
                ITEM_TYPES,
            ))
            .flag(no_interactive_flag())
            .flag(FlagDefinition::switch(
                "deltas-only",
                "Show only deltas (JSON only, change)",
            ))
            .flag(FlagDefinition::switch(
                "requirements",
                "Show only requirements, exclude scenarios (JSON only, spec)",
            ))
            .flag(FlagDefinition::switch(
                "no-scenarios",
                "Exclude scenario content (JSON only, spec)",
            ))
            .flag(
                FlagDefinition::value("requirement", "Show specific requirement by ID (JSON only, spec)")
                    .short('r'),
            )
            .positional(PositionalKind::ChangeOrSpecId),
        CommandDefinition::leaf("archive", "Archive a completed change and update main specs")
            .flag(FlagDefinition::switch("yes", "Skip confirmation prompts").short('y'))
            .flag(FlagDefinition::switch(
                "skip-specs",
                "Skip spec update operations",
            ))
            .flag(FlagDefinition::switch("no-validate", "Skip validation"))
            .positional(PositionalKind::ChangeId),
        CommandDefinition::group(
            "change",
            "Manage spectest change proposals",
            vec![
                CommandDefinition::leaf("show", "Show a change proposal")
                    .flag(json_flag())
                    .flag(FlagDefinition::switch(
                        "deltas-only",
                        "Show only deltas (JSON only)",
                    ))
                    .flag(no_interactive_flag())
                    .positional(PositionalKind::ChangeId),
                CommandDefinition::leaf("list", "List all active changes")
                    .flag(json_flag())
                    .flag(FlagDefinition::switch(
                        "long",
                        "Show id and title with counts",
                    )),
                CommandDefinition::leaf("validate", "Validate a change proposal")
                    .flag(strict_flag())
                    .flag(json_flag())
                    .flag(no_interactive_flag())
                    .positional(PositionalKind::ChangeId),
            ],
        ),
        CommandDefinition::group(
            "spec",
            "Manage and view spectest specifications",
            vec![
                CommandDefinition::leaf("show", "Display a specific specification")
                    .flag(json_flag())
                    .flag(FlagDefinition::switch(
                        "requirements",
                        "Show only requirements, exclude scenarios (JSON only)",
                    ))
                    .flag(FlagDefinition::switch(
                        "no-scenarios",
                        "Exclude scenario content (JSON only)",
                    ))
                    .flag(
                        FlagDefinition::value(
                            "requirement",
                            "Show specific requirement by ID (JSON only)",
                        )
                        .short('r'),
                    )
                    .flag(no_interactive_flag())
                    .positional(PositionalKind::SpecId),
                CommandDefinition::leaf("list", "List all available specifications")
                    .flag(json_flag())
                    .flag(FlagDefinition::switch(
                        "long",
                        "Show id and title with counts",
                    )),
                CommandDefinition::leaf("validate", "Validate a specification structure")
                    .flag(strict_flag())
                    .flag(json_flag())
                    .flag(no_interactive_flag())
                    .positional(PositionalKind::SpecId),
            ],
        ),
        CommandDefinition::group(
            "completion",
            "Manage shell completions for spectest",
            vec![
                CommandDefinition::leaf("generate", "Generate completion script and print it")
                    .flag(shell_flag())
                    .positional(PositionalKind::Shell),
                CommandDefinition::leaf("install", "Install completion script for your shell")
                    .flag(shell_flag())
                    .flag(FlagDefinition::switch(
                        "verbose",
                        "Show detailed installation output",
                    ))
                    .positional(PositionalKind::Shell),
                CommandDefinition::leaf("uninstall", "Remove completion script for your shell")
                    .flag(shell_flag())
                    .flag(FlagDefinition::switch("yes", "Skip confirmation prompt").short('y'))
                    .positional(PositionalKind::Shell),
            ],
        ),
    ]
}
